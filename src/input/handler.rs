use super::command::Command;
use crate::app::{AppState, TIMELINE_PAGE};
use crate::domain::{Dialog, InputMode, Pane};
use std::time::Instant;

/// Apply one command to the state machine. Returns true when the app should quit.
pub fn handle_command(app: &mut AppState, command: Command) -> bool {
    handle_command_at(app, command, Instant::now())
}

/// Same as [`handle_command`] with an explicit clock
pub fn handle_command_at(app: &mut AppState, command: Command, now: Instant) -> bool {
    // Ticks and I/O completions never count as user input
    match command {
        Command::Tick => {
            app.tick(now);
            return false;
        }
        Command::Loaded(loaded) => {
            app.apply_loaded(*loaded);
            return false;
        }
        Command::Saved(outcome) => {
            app.on_saved(outcome);
            return false;
        }
        Command::Exported(result) => {
            app.on_exported(result);
            return false;
        }
        _ => {}
    }

    // An armed exit prompt swallows the next command
    if app.exit_confirm.is_some() {
        if matches!(command, Command::Interrupt | Command::Confirm) {
            return true;
        }
        app.disarm_exit();
        return false;
    }

    if command == Command::Interrupt {
        app.arm_exit(now);
        return false;
    }

    if app.show_overview {
        handle_overview(app, command);
        return false;
    }

    if app.dialog != Dialog::None {
        handle_dialog(app, command);
        return false;
    }

    match app.mode {
        InputMode::TextInput => handle_text_input(app, command),
        InputMode::Search => handle_search(app, command),
        InputMode::FilterPending => handle_filter_pending(app, command),
        InputMode::Normal => handle_normal(app, command),
    }
    false
}

fn handle_overview(app: &mut AppState, command: Command) {
    match command {
        Command::ToggleOverview | Command::Cancel => app.toggle_overview(),
        Command::MoveMonths(months) => app.move_viewing_month(months),
        _ => {}
    }
}

fn handle_dialog(app: &mut AppState, command: Command) {
    if command == Command::CloseDialog {
        app.close_dialog();
        return;
    }

    match app.dialog {
        Dialog::Theme => {
            if let Command::SelectTheme(number) = command {
                app.select_theme(number);
            }
        }
        Dialog::Export => match command {
            Command::SetExportFormat(format) => app.set_export_format(format),
            Command::SetExportScope(scope) => app.set_export_scope(scope),
            Command::RunExport => app.run_export(),
            _ => {}
        },
        Dialog::ConfirmClearTimeline => match command {
            Command::Confirm => app.confirm_clear_timeline(),
            Command::Deny => app.close_dialog(),
            _ => {}
        },
        Dialog::TaskDetail => app.close_dialog(),
        Dialog::Help | Dialog::None => {}
    }
}

fn handle_text_input(app: &mut AppState, command: Command) {
    match command {
        Command::Insert(c) => app.entry_insert(c),
        Command::Backspace => app.entry_backspace(),
        Command::Submit => app.submit_entry(),
        Command::Cancel => app.cancel_entry(),
        _ => {}
    }
}

fn handle_search(app: &mut AppState, command: Command) {
    match command {
        Command::Insert(c) => app.search_insert(c),
        Command::Backspace => app.search_backspace(),
        Command::Submit => app.submit_search(),
        Command::Cancel => app.cancel_search(),
        _ => {}
    }
}

fn handle_filter_pending(app: &mut AppState, command: Command) {
    match command {
        Command::ApplyFilter(filter) => app.apply_filter(filter),
        _ => app.cancel_filter(),
    }
}

fn handle_normal(app: &mut AppState, command: Command) {
    match command {
        Command::Undo => app.undo(),
        Command::ToggleDialog(dialog) => app.toggle_dialog(dialog),
        Command::ToggleOverview => app.toggle_overview(),
        Command::FocusPane(pane) => app.focus_pane(pane),
        Command::NextPane => app.focus_pane(app.pane.next()),
        Command::PrevPane => app.focus_pane(app.pane.prev()),
        Command::StartSearch => app.start_search(),
        Command::ClearFilters => app.clear_filters(),
        other => match app.pane {
            Pane::Calendar => handle_calendar(app, other),
            Pane::Tasks => handle_tasks(app, other),
            Pane::Timeline => handle_timeline(app, other),
        },
    }
}

fn handle_calendar(app: &mut AppState, command: Command) {
    match command {
        Command::MoveDays(days) => app.move_days(days),
        Command::MoveMonths(months) => app.move_months(months),
        Command::GoToday => app.go_today(),
        _ => {}
    }
}

fn handle_tasks(app: &mut AppState, command: Command) {
    match command {
        Command::SelectNext => app.move_selection_down(),
        Command::SelectPrev => app.move_selection_up(),
        Command::AddTask => app.begin_add_task(),
        Command::AddSubtask => app.begin_add_subtask(),
        Command::EditTask => app.begin_edit_task(),
        Command::DeleteTask => app.delete_selected(),
        Command::ToggleComplete => app.toggle_complete(),
        Command::Delegate => app.delegate(),
        Command::ToggleDelay => app.toggle_delay(),
        Command::ToggleRunning => app.toggle_running(),
        Command::ToggleExpand => app.toggle_expand(),
        Command::Collapse => app.collapse(),
        Command::SetPriority(priority) => app.set_priority(priority),
        Command::StartFilter => app.start_filter(),
        Command::ShowDetails => app.show_details(),
        _ => {}
    }
}

fn handle_timeline(app: &mut AppState, command: Command) {
    match command {
        Command::ScrollDown => app.scroll_timeline_down(1),
        Command::ScrollUp => app.scroll_timeline_up(1),
        Command::PageDown => app.scroll_timeline_down(TIMELINE_PAGE),
        Command::PageUp => app.scroll_timeline_up(TIMELINE_PAGE),
        Command::RequestClearTimeline => app.request_clear_timeline(),
        _ => {}
    }
}
