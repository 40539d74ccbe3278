use crate::app::AppState;
use crate::domain::Dialog;
use crate::export::{ExportFormat, ExportScope};
use crate::ui::{
    layout::create_modal_area,
    theme::{Theme, THEME_NAMES},
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const HELP_SECTIONS: [(&str, &[(&str, &str)]); 4] = [
    (
        "Global",
        &[
            ("Ctrl+C", "Exit (press twice)"),
            ("Ctrl+U", "Undo"),
            ("Ctrl+T", "Theme"),
            ("Ctrl+E", "Export"),
            ("?", "This help"),
            (":", "Month overview"),
            ("/", "Search tasks"),
            ("Esc", "Clear search/filter"),
            ("1/2/3", "Switch panes"),
            ("Tab", "Next pane"),
        ],
    ),
    (
        "Calendar",
        &[
            ("h/l", "Previous/next day"),
            ("j/k", "Next/previous week"),
            ("n/p", "Next/previous month"),
            ("t", "Jump to today"),
        ],
    ),
    (
        "Tasks",
        &[
            ("j/k", "Navigate down/up"),
            ("a / A", "Add task / subtask"),
            ("e", "Edit task"),
            ("d", "Delete task"),
            ("v", "View details"),
            ("Space", "Toggle complete"),
            ("D", "Delegate task"),
            ("x", "Toggle delayed"),
            ("s", "Start/stop timer"),
            ("1/2/3 0", "Set/clear priority"),
            ("f", "Filter by state or priority"),
            ("Enter / ←", "Expand / collapse"),
        ],
    ),
    (
        "Timeline",
        &[
            ("j/k", "Scroll"),
            ("PgDn/PgUp", "Page"),
            ("C", "Clear day"),
        ],
    ),
];

const THEME_DESCRIPTIONS: [&str; 4] = [
    "Deep space with violet accents",
    "Classic green/amber CRT",
    "Clean grayscale",
    "Arctic blue palette",
];

fn render_dialog(f: &mut Frame, theme: &Theme, area: Rect, title: &str, lines: Vec<Line>) {
    // borders plus one blank line of breathing room
    let modal_area = create_modal_area(area, lines.len() as u16 + 3);

    // Clear the area behind the modal
    f.render_widget(Clear, modal_area);

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style(true))
                .title(Span::styled(format!(" {} ", title), theme.modal_title_style()))
                .style(theme.modal_style()),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, modal_area);
}

fn key_line(theme: &Theme, key: &str, desc: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<12}", key), theme.key_style()),
        Span::styled(desc.to_string(), theme.text_style()),
    ])
}

pub fn help_lines(theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (title, keys) in HELP_SECTIONS {
        lines.push(Line::styled(title, theme.title_style()));
        lines.extend(keys.iter().map(|(key, desc)| key_line(theme, key, desc)));
        lines.push(Line::raw(""));
    }
    lines.push(Line::styled("Esc or ? to close", theme.muted_style()));
    lines
}

pub fn theme_lines(theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (idx, (name, desc)) in THEME_NAMES.iter().zip(THEME_DESCRIPTIONS).enumerate() {
        let mut spans = vec![
            Span::styled(format!("  {}  ", idx + 1), theme.key_style()),
            Span::styled(*name, theme.text_style()),
        ];
        if *name == theme.name {
            spans.push(Span::styled(" ✓", theme.success_style()));
        }
        lines.push(Line::from(spans));
        lines.push(Line::styled(format!("      {}", desc), theme.muted_style()));
    }
    lines.push(Line::raw(""));
    lines.push(Line::styled("Press number to select, Esc to close", theme.muted_style()));
    lines
}

fn choice_line(theme: &Theme, key: &str, label: &str, chosen: bool) -> Line<'static> {
    let marker = if chosen { "●" } else { "○" };
    Line::from(vec![
        Span::styled(format!("  {} ", marker), theme.success_style()),
        Span::styled(format!("{}. ", key), theme.key_style()),
        Span::styled(label.to_string(), theme.text_style()),
    ])
}

pub fn export_lines(app: &AppState) -> Vec<Line<'static>> {
    let theme = &app.theme;
    let draft = app.export_draft;
    let mut lines = vec![Line::styled("Format:", theme.title_style())];
    for (key, format) in [
        ("1", ExportFormat::Markdown),
        ("2", ExportFormat::Json),
        ("3", ExportFormat::Text),
    ] {
        lines.push(choice_line(theme, key, format.label(), draft.format == format));
    }
    lines.push(Line::raw(""));
    lines.push(Line::styled("Scope:", theme.title_style()));
    for (key, scope) in [
        ("d", ExportScope::Day),
        ("m", ExportScope::Month),
        ("a", ExportScope::All),
    ] {
        lines.push(choice_line(theme, key, scope.label(), draft.scope == scope));
    }
    lines.push(Line::raw(""));
    lines.push(Line::styled("Enter to export, Esc to close", theme.muted_style()));
    lines
}

fn clear_timeline_lines(app: &AppState) -> Vec<Line<'static>> {
    let theme = &app.theme;
    vec![
        Line::raw(format!(
            "This removes all {} timeline events for {}.",
            app.day_events().len(),
            app.selected_date.long_label()
        )),
        Line::raw("Ctrl+U can bring them back."),
        Line::raw(""),
        Line::from(vec![
            Span::styled("  [y]", theme.success_style()),
            Span::raw(" Yes, clear   "),
            Span::styled("[n]", theme.error_style()),
            Span::raw(" No, cancel"),
        ]),
    ]
}

/// Field lines for the selected task, or a placeholder when nothing is selected
pub fn detail_lines(app: &AppState) -> Vec<Line<'static>> {
    let theme = &app.theme;
    let Some(task) = app.selected_task() else {
        return vec![Line::styled("No task selected", theme.muted_style())];
    };

    let label = |text: &str| Span::styled(format!("{:<10}", text), theme.title_style());
    let running = task.is_running();
    let mut lines = vec![
        Line::from(label("Title:")),
        Line::styled(task.title.clone(), theme.text_style()),
        Line::raw(""),
        Line::from(vec![
            label("State:"),
            Span::styled(task.state.name(), theme.state_style(task.state, false)),
        ]),
        Line::from(vec![
            label("Priority:"),
            Span::styled(task.priority.label(), theme.priority_style(task.priority)),
        ]),
        Line::from(vec![
            label("Created:"),
            Span::styled(
                task.created_at.format("%b %-d, %Y %-I:%M %p").to_string(),
                theme.muted_style(),
            ),
        ]),
    ];
    if let Some(start) = task.start_time {
        lines.push(Line::from(vec![
            label("Started:"),
            Span::styled(start.format("%-I:%M %p").to_string(), theme.muted_style()),
        ]));
    }
    if let Some(stop) = task.stop_time {
        lines.push(Line::from(vec![
            label("Stopped:"),
            Span::styled(stop.format("%-I:%M %p").to_string(), theme.muted_style()),
        ]));
    }
    if running {
        lines.push(Line::from(vec![
            label("Status:"),
            Span::styled("Running", theme.state_style(task.state, true)),
        ]));
    }
    if task.has_children() {
        lines.push(Line::from(vec![
            label("Subtasks:"),
            Span::styled(task.children.len().to_string(), theme.text_style()),
        ]));
    }
    lines.push(Line::raw(""));
    lines.push(Line::styled("Press any key to close", theme.muted_style()));
    lines
}

/// Render the active dialog, if any
pub fn render_modal(f: &mut Frame, app: &AppState, area: Rect) {
    let theme = &app.theme;
    let (title, lines) = match app.dialog {
        Dialog::None => return,
        Dialog::Help => ("Help", help_lines(theme)),
        Dialog::Theme => ("Select Theme", theme_lines(theme)),
        Dialog::Export => ("Export Tasks", export_lines(app)),
        Dialog::ConfirmClearTimeline => ("Clear Timeline?", clear_timeline_lines(app)),
        Dialog::TaskDetail => ("Task Details", detail_lines(app)),
    };
    render_dialog(f, theme, area, title, lines);
}
