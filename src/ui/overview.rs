use crate::app::AppState;
use crate::domain::calendar::{GRID_DAYS, GRID_WEEKS};
use crate::domain::{task_stats, CalendarGrid, GridCell, Task, TaskState};
use crate::ui::theme::Theme;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Titles shown per day before collapsing into "+N more"
const PREVIEW_TITLES: usize = 3;

/// Header text for a day cell, e.g. "14 (1/3)"
pub fn cell_title(day: u32, tasks: &[Task]) -> String {
    let stats = task_stats(tasks);
    if stats.total == 0 {
        day.to_string()
    } else {
        format!("{} ({}/{})", day, stats.completed, stats.total)
    }
}

/// Top-level task previews for one day
pub fn preview_lines(tasks: &[Task], theme: &Theme) -> Vec<Line<'static>> {
    let mut lines: Vec<Line> = tasks
        .iter()
        .take(PREVIEW_TITLES)
        .map(|task| {
            let prefix = if task.state == TaskState::Completed { "● " } else { "○ " };
            Line::from(vec![
                Span::styled(prefix, theme.state_style(task.state, task.is_running())),
                Span::styled(task.title.clone(), theme.text_style()),
            ])
        })
        .collect();

    if tasks.len() > PREVIEW_TITLES {
        lines.push(Line::styled(
            format!("+{} more", tasks.len() - PREVIEW_TITLES),
            theme.muted_style(),
        ));
    }

    lines
}

fn render_cell(
    f: &mut Frame,
    app: &AppState,
    grid: &CalendarGrid,
    cell: &GridCell,
    area: Rect,
) {
    let theme = &app.theme;
    if !grid.is_current_month(cell.date) {
        return;
    }

    let tasks = app.tasks.tasks_for_date(&cell.date.key());
    let mut title_style = theme.text_style();
    if cell.date == app.selected_date {
        title_style = theme.title_style();
    }
    if cell.date.is_today() {
        title_style = title_style
            .fg(theme.palette.calendar_today)
            .add_modifier(Modifier::BOLD);
    }

    let paragraph = Paragraph::new(preview_lines(tasks, theme)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border_style(cell.date == app.selected_date))
            .title(Span::styled(cell_title(cell.date.day(), tasks), title_style)),
    );
    f.render_widget(paragraph, area);
}

/// Render the full-screen month overview for `app.viewing_month`
pub fn render_overview(f: &mut Frame, app: &AppState, area: Rect) {
    let theme = &app.theme;
    let viewing = app.viewing_month;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(0),    // Grid
            Constraint::Length(1), // Footer
        ])
        .split(area);

    let header = Line::from(Span::styled(
        format!(" Overview: {} {}", viewing.month_name(), viewing.year()),
        theme.title_style(),
    ));
    f.render_widget(Paragraph::new(header), chunks[0]);

    let grid = CalendarGrid::generate(viewing);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Ratio(1, GRID_WEEKS as u32); GRID_WEEKS])
        .split(chunks[1]);

    for (week, row) in grid.weeks.iter().zip(rows.iter()) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, GRID_DAYS as u32); GRID_DAYS])
            .split(*row);
        for (cell, column) in week.iter().zip(columns.iter()) {
            render_cell(f, app, &grid, cell, *column);
        }
    }

    let footer = Line::from(vec![
        Span::styled(" n/p", theme.key_style()),
        Span::styled(" month   ", theme.hint_style()),
        Span::styled(": / Esc", theme.key_style()),
        Span::styled(" return", theme.hint_style()),
    ]);
    f.render_widget(Paragraph::new(footer), chunks[2]);
}
