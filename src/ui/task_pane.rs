use crate::app::AppState;
use crate::domain::{InputMode, Pane, Task, TaskState};
use crate::ui::theme::Theme;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

fn checkbox(state: TaskState) -> &'static str {
    match state {
        TaskState::Todo => "[ ] ",
        TaskState::Completed => "[✓] ",
        TaskState::Delegated => "[→] ",
        TaskState::Delayed => "[‖] ",
    }
}

/// First visible row so that `selected` stays inside a window of `height` rows
pub fn scroll_offset(selected: usize, height: usize) -> usize {
    if height == 0 {
        return selected;
    }
    selected.saturating_sub(height - 1)
}

/// Create a single line for a task
/// Format: ▸ [ ] P1 ▾ Write proposal ●
pub fn create_task_line(task: &Task, depth: usize, selected: bool, theme: &Theme) -> Line<'static> {
    let mut spans = Vec::new();

    spans.push(Span::styled(
        if selected { "▸ " } else { "  " },
        theme.title_style(),
    ));

    if depth > 0 {
        spans.push(Span::styled(
            format!("{}└ ", "  ".repeat(depth - 1)),
            theme.tree_style(),
        ));
    }

    let running = task.is_running();
    spans.push(Span::styled(checkbox(task.state), theme.state_style(task.state, running)));

    if !task.priority.badge().is_empty() {
        spans.push(Span::styled(
            format!("{} ", task.priority.badge()),
            theme.priority_style(task.priority),
        ));
    }

    if task.has_children() {
        let icon = if task.expanded { "▾ " } else { "▸ " };
        spans.push(Span::styled(icon, theme.tree_style()));
    }

    spans.push(Span::styled(task.title.clone(), theme.state_style(task.state, running)));

    if running {
        spans.push(Span::styled(" ●", theme.state_style(task.state, true)));
    }

    Line::from(spans)
}

/// Prompt, search and filter lines shown above the list
fn header_lines(app: &AppState) -> Vec<Line<'static>> {
    let theme = &app.theme;
    let mut lines = Vec::new();

    if let Some(entry) = &app.text_entry {
        lines.push(Line::from(vec![
            Span::styled(format!("{}: ", entry.prompt()), theme.key_style()),
            Span::styled(entry.buffer.clone(), theme.text_style()),
            Span::styled("█", theme.title_style()),
        ]));
    }

    if app.mode == InputMode::Search {
        lines.push(Line::from(vec![
            Span::styled("Search: ", theme.key_style()),
            Span::styled(app.search.query.clone(), theme.text_style()),
            Span::styled("█", theme.title_style()),
        ]));
    } else if app.search.locked {
        lines.push(Line::from(vec![
            Span::styled("Search: ", theme.key_style()),
            Span::styled(app.search.query.clone(), theme.text_style()),
            Span::styled("  (Esc clears)", theme.muted_style()),
        ]));
    }

    if app.mode == InputMode::FilterPending {
        lines.push(Line::styled(
            "Filter: t todo  c done  d delegated  x delayed  1/2/3 priority",
            theme.secondary_style(),
        ));
    } else if let Some(filter) = app.filter {
        lines.push(Line::styled(format!("Filter: {}", filter), theme.secondary_style()));
    }

    lines
}

/// Render the tasks pane
pub fn render_task_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let theme = &app.theme;
    let focused = app.pane == Pane::Tasks;
    let stats = app.day_stats();
    let title = format!(
        " 2 Tasks: {} ({}/{} · {}%) ",
        app.selected_date.long_label(),
        stats.completed,
        stats.total,
        stats.percent()
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style(focused))
        .title(Span::styled(title, theme.title_style()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let header = header_lines(app);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(header.len() as u16), Constraint::Min(0)])
        .split(inner);
    if !header.is_empty() {
        f.render_widget(Paragraph::new(header), chunks[0]);
    }
    let list_area = chunks[1];

    if app.view.is_empty() {
        let message = if app.is_filtered() {
            "No tasks match."
        } else {
            "No tasks. Press 'a' to add one."
        };
        f.render_widget(Paragraph::new(Line::styled(message, theme.muted_style())), list_area);
        return;
    }

    let key = app.day_key();
    let offset = scroll_offset(app.selected_index, list_area.height as usize);
    let items: Vec<ListItem> = app
        .view
        .iter()
        .enumerate()
        .skip(offset)
        .filter_map(|(idx, row)| {
            let task = app.tasks.find(&key, row.id)?;
            let selected = focused && idx == app.selected_index;
            let item = ListItem::new(create_task_line(task, row.depth, selected, theme));
            Some(if selected {
                item.style(theme.selected_style())
            } else {
                item
            })
        })
        .collect();

    f.render_widget(List::new(items), list_area);
}
