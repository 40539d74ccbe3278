use crate::app::AppState;
use crate::domain::{CalendarDate, EventKind, Pane, TimelineEvent};
use crate::ui::theme::Theme;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn event_style(kind: EventKind, theme: &Theme) -> Style {
    let palette = &theme.palette;
    match kind {
        EventKind::Created => Style::default().fg(palette.accent),
        EventKind::Started => Style::default().fg(palette.task_running),
        EventKind::Completed => Style::default().fg(palette.task_completed),
        EventKind::Delegated => Style::default().fg(palette.task_delegated),
        EventKind::Delayed => Style::default().fg(palette.task_delayed),
        EventKind::Updated => theme.secondary_style(),
    }
}

/// Lines for the events from `offset` on. Each event is a description line
/// and a timestamp line, joined to the next event by a connector.
pub fn timeline_lines(events: &[TimelineEvent], offset: usize, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    if events.is_empty() {
        lines.push(Line::styled("No activities yet.", theme.muted_style()));
        lines.push(Line::styled("Press 's' to start a task.", theme.muted_style()));
        return lines;
    }

    if offset > 0 {
        lines.push(Line::styled(format!("↑ {} more above", offset), theme.muted_style()));
    }

    for (idx, event) in events.iter().enumerate().skip(offset) {
        lines.push(Line::from(vec![
            Span::raw(" "),
            Span::styled(event.kind.icon(), event_style(event.kind, theme)),
            Span::raw(" "),
            Span::styled(event.kind.description(), theme.secondary_style()),
            Span::raw(" "),
            Span::styled(event.task_title.clone(), theme.text_style()),
        ]));
        lines.push(Line::styled(format!("   {}", event.time_label()), theme.muted_style()));
        if idx + 1 < events.len() {
            lines.push(Line::styled(" │", theme.tree_style()));
        }
    }

    lines
}

/// Pane title, e.g. " 3 Timeline: Jun 1 (4) "
pub fn timeline_title(date: CalendarDate, event_count: usize) -> String {
    format!(
        " 3 Timeline: {} {} ({}) ",
        date.short_month_name(),
        date.day(),
        event_count
    )
}

/// Render the timeline pane
pub fn render_timeline_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let theme = &app.theme;
    let events = app.day_events();
    let title = timeline_title(app.selected_date, events.len());

    let paragraph = Paragraph::new(timeline_lines(events, app.timeline_scroll, theme)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border_style(app.pane == Pane::Timeline))
            .title(Span::styled(title, theme.title_style())),
    );

    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Task;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn test_timeline_title() {
        let date = CalendarDate::from_ymd(2024, 6, 1).unwrap();
        assert_eq!(timeline_title(date, 4), " 3 Timeline: Jun 1 (4) ");
    }

    #[test]
    fn test_empty_timeline() {
        let lines = timeline_lines(&[], 0, &Theme::default());
        assert_eq!(line_text(&lines[0]), "No activities yet.");
    }

    #[test]
    fn test_timeline_lines() {
        let task = Task::new("Write proposal", "2024-06-01");
        let events = vec![
            TimelineEvent::new(&task, EventKind::Created),
            TimelineEvent::new(&task, EventKind::Started),
        ];
        let lines = timeline_lines(&events, 0, &Theme::default());

        // two lines per event plus one connector between them
        assert_eq!(lines.len(), 5);
        assert_eq!(line_text(&lines[0]), " + created Write proposal");
        assert_eq!(line_text(&lines[2]), " │");
        assert_eq!(line_text(&lines[3]), " ○ started Write proposal");
    }

    #[test]
    fn test_scrolled_timeline() {
        let task = Task::new("Write proposal", "2024-06-01");
        let events = vec![
            TimelineEvent::new(&task, EventKind::Created),
            TimelineEvent::new(&task, EventKind::Completed),
        ];
        let lines = timeline_lines(&events, 1, &Theme::default());

        assert_eq!(line_text(&lines[0]), "↑ 1 more above");
        assert_eq!(line_text(&lines[1]), " ● completed Write proposal");
        assert_eq!(lines.len(), 3);
    }
}
