use crate::app::{AppState, StatusKind};
use crate::domain::{InputMode, Pane};
use crate::ui::theme::Theme;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// (key, description) pairs for the current mode and pane
pub fn hint_pairs(mode: InputMode, pane: Pane) -> Vec<(&'static str, &'static str)> {
    match mode {
        InputMode::TextInput => return vec![("Enter", "save"), ("Esc", "cancel")],
        InputMode::Search => return vec![("Enter", "keep"), ("Esc", "clear")],
        InputMode::FilterPending => {
            return vec![("t/c/d/x", "state"), ("1/2/3", "priority"), ("Esc", "cancel")]
        }
        InputMode::Normal => {}
    }

    let mut pairs = match pane {
        Pane::Calendar => vec![
            ("h/l", "day"),
            ("j/k", "week"),
            ("n/p", "month"),
            ("t", "today"),
        ],
        Pane::Tasks => vec![
            ("j/k", "nav"),
            ("a/A", "add"),
            ("e", "edit"),
            ("d", "del"),
            ("Space", "done"),
            ("D", "delegate"),
            ("x", "delay"),
            ("s", "start"),
            ("1/2/3", "priority"),
            ("f", "filter"),
            ("v", "details"),
        ],
        Pane::Timeline => vec![("j/k", "scroll"), ("C", "clear")],
    };
    pairs.extend([
        ("Tab", "next"),
        ("/", "search"),
        ("^U", "undo"),
        ("?", "help"),
        (":", "overview"),
    ]);
    pairs
}

fn hint_line(pairs: &[(&'static str, &'static str)], theme: &Theme) -> Line<'static> {
    let mut spans = vec![Span::raw(" ")];
    for (idx, (key, desc)) in pairs.iter().enumerate() {
        if idx > 0 {
            spans.push(Span::styled(" │ ", theme.tree_style()));
        }
        spans.push(Span::styled(*key, theme.key_style()));
        spans.push(Span::styled(format!(" {}", desc), theme.hint_style()));
    }
    Line::from(spans)
}

/// Render the keybindings hint bar
pub fn render_keybindings(f: &mut Frame, app: &AppState, area: Rect) {
    let line = hint_line(&hint_pairs(app.mode, app.pane), &app.theme);
    f.render_widget(Paragraph::new(line), area);
}

/// Exit prompt, then status message, then the unsaved marker
pub fn status_line(app: &AppState) -> Line<'static> {
    let theme = &app.theme;
    if app.exit_confirm.is_some() {
        return Line::styled(
            " Press Ctrl+C again or y to quit, any other key to stay",
            theme.warning_style(),
        );
    }
    if let Some(status) = &app.status {
        let style = match status.kind {
            StatusKind::Info => theme.success_style(),
            StatusKind::Error => theme.error_style(),
        };
        return Line::styled(format!(" {}", status.text), style);
    }
    if app.is_dirty() {
        return Line::styled(" unsaved changes", theme.muted_style());
    }
    Line::raw("")
}

pub fn render_status_line(f: &mut Frame, app: &AppState, area: Rect) {
    f.render_widget(Paragraph::new(status_line(app)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::LoadedState;
    use crate::domain::CalendarDate;
    use std::time::Instant;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    fn create_test_app() -> AppState {
        AppState::with_date(LoadedState::default(), CalendarDate::from_ymd(2024, 6, 1).unwrap())
    }

    #[test]
    fn test_hint_pairs_follow_pane() {
        let tasks = hint_pairs(InputMode::Normal, Pane::Tasks);
        assert!(tasks.contains(&("Space", "done")));
        assert!(tasks.contains(&("?", "help")));

        let timeline = hint_pairs(InputMode::Normal, Pane::Timeline);
        assert!(timeline.contains(&("C", "clear")));
        assert!(!timeline.contains(&("Space", "done")));
    }

    #[test]
    fn test_text_modes_replace_pane_hints() {
        let pairs = hint_pairs(InputMode::TextInput, Pane::Tasks);
        assert_eq!(pairs, vec![("Enter", "save"), ("Esc", "cancel")]);
    }

    #[test]
    fn test_hint_line_format() {
        let line = hint_line(&[("a", "add"), ("d", "del")], &Theme::default());
        assert_eq!(line_text(&line), " a add │ d del");
    }

    #[test]
    fn test_status_line_priority() {
        let mut app = create_test_app();
        assert_eq!(line_text(&status_line(&app)), "");

        app.add_task("Write");
        assert_eq!(line_text(&status_line(&app)), " unsaved changes");

        app.set_status("Exported", StatusKind::Info);
        assert_eq!(line_text(&status_line(&app)), " Exported");

        app.arm_exit(Instant::now());
        assert!(line_text(&status_line(&app)).contains("Ctrl+C again"));
    }
}
