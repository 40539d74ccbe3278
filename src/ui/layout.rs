use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Calendar column never shrinks below a full 7x4 grid plus borders
const CALENDAR_MIN_WIDTH: u16 = 30;
const TIMELINE_MIN_WIDTH: u16 = 28;

/// Main layout structure
pub struct MainLayout {
    pub keybindings_area: Rect,
    pub calendar_area: Rect,
    pub tasks_area: Rect,
    pub timeline_area: Rect,
    pub status_area: Rect,
}

/// Create the main layout
/// - Top bar: keybindings (1 row)
/// - Main area: Calendar (20%) | Tasks | Timeline (30%)
/// - Bottom bar: status line (1 row)
pub fn create_layout(area: Rect) -> MainLayout {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Keybindings bar
            Constraint::Min(0),    // Panes
            Constraint::Length(1), // Status line
        ])
        .split(area);

    let content = main_chunks[1];
    let calendar_width = (content.width / 5).max(CALENDAR_MIN_WIDTH);
    let timeline_width = (content.width * 3 / 10).max(TIMELINE_MIN_WIDTH);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(calendar_width),
            Constraint::Min(0),
            Constraint::Length(timeline_width),
        ])
        .split(content);

    MainLayout {
        keybindings_area: main_chunks[0],
        calendar_area: columns[0],
        tasks_area: columns[1],
        timeline_area: columns[2],
        status_area: main_chunks[2],
    }
}

/// Create centered modal area with a fixed height
pub fn create_modal_area(area: Rect, height: u16) -> Rect {
    let vertical_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height.min(area.height)),
            Constraint::Min(0),
        ])
        .split(area);

    let horizontal_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(20),
            Constraint::Percentage(60),
            Constraint::Percentage(20),
        ])
        .split(vertical_chunks[1]);

    horizontal_chunks[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_layout() {
        let area = Rect::new(0, 0, 150, 40);
        let layout = create_layout(area);

        assert_eq!(layout.keybindings_area.height, 1);
        assert_eq!(layout.status_area.height, 1);
        assert_eq!(layout.calendar_area.width, 30);
        assert_eq!(layout.timeline_area.width, 45);
        assert_eq!(layout.tasks_area.width, 75);
        assert_eq!(layout.tasks_area.height, 38);
    }

    #[test]
    fn test_narrow_layout_keeps_minimum_widths() {
        let area = Rect::new(0, 0, 80, 24);
        let layout = create_layout(area);

        assert_eq!(layout.calendar_area.width, CALENDAR_MIN_WIDTH);
        assert_eq!(layout.timeline_area.width, TIMELINE_MIN_WIDTH);
        assert_eq!(layout.tasks_area.width, 22);
    }

    #[test]
    fn test_create_modal_area() {
        let area = Rect::new(0, 0, 100, 50);
        let modal = create_modal_area(area, 16);

        assert!(modal.width < area.width);
        assert_eq!(modal.height, 16);

        let tiny = create_modal_area(Rect::new(0, 0, 100, 10), 16);
        assert_eq!(tiny.height, 10);
    }
}
