pub mod calendar_pane;
pub mod keybindings;
pub mod layout;
pub mod modal;
pub mod overview;
pub mod task_pane;
pub mod theme;
pub mod timeline_pane;

use crate::app::AppState;
use calendar_pane::render_calendar_pane;
use keybindings::{render_keybindings, render_status_line};
use layout::create_layout;
use modal::render_modal;
use overview::render_overview;
use ratatui::{widgets::Block, Frame};
use task_pane::render_task_pane;
use timeline_pane::render_timeline_pane;

pub use theme::Theme;

/// Main render function - draws the entire UI
pub fn render(f: &mut Frame, app: &AppState) {
    let size = f.size();

    // Paint the theme background first so every pane inherits it
    f.render_widget(Block::default().style(app.theme.base_style()), size);

    // Overview replaces the panes entirely
    if app.show_overview {
        render_overview(f, app, size);
        render_status_line(f, app, create_layout(size).status_area);
        return;
    }

    let layout = create_layout(size);

    render_keybindings(f, app, layout.keybindings_area);
    render_calendar_pane(f, app, layout.calendar_area);
    render_task_pane(f, app, layout.tasks_area);
    render_timeline_pane(f, app, layout.timeline_area);
    render_status_line(f, app, layout.status_area);

    render_modal(f, app, size);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::LoadedState;
    use crate::domain::{CalendarDate, Dialog};
    use ratatui::{backend::TestBackend, Terminal};

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    fn create_test_app() -> AppState {
        AppState::with_date(LoadedState::default(), CalendarDate::from_ymd(2024, 6, 1).unwrap())
    }

    #[test]
    fn test_render_main_screen() {
        let mut app = create_test_app();
        app.add_task("Write proposal");

        let mut terminal = Terminal::new(TestBackend::new(140, 30)).unwrap();
        terminal.draw(|f| render(f, &app)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Calendar"));
        assert!(text.contains("June 2024"));
        assert!(text.contains("Write proposal"));
        assert!(text.contains("created"));
    }

    #[test]
    fn test_render_overview_and_dialog() {
        let mut app = create_test_app();
        app.toggle_overview();

        let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();
        terminal.draw(|f| render(f, &app)).unwrap();
        assert!(screen_text(&terminal).contains("Overview: June 2024"));

        app.toggle_overview();
        app.toggle_dialog(Dialog::Help);
        terminal.draw(|f| render(f, &app)).unwrap();
        assert!(screen_text(&terminal).contains("Month overview"));
    }

    #[test]
    fn test_render_tiny_terminal_does_not_panic() {
        let mut app = create_test_app();
        app.add_task("Write proposal");
        app.toggle_dialog(Dialog::Export);

        let mut terminal = Terminal::new(TestBackend::new(20, 5)).unwrap();
        terminal.draw(|f| render(f, &app)).unwrap();
    }
}
