use super::command::Command;
use crate::app::AppState;
use crate::domain::{Dialog, InputMode, Pane, Priority, TaskFilter, TaskState};
use crate::export::{ExportFormat, ExportScope};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Translate a key press into a command for the current mode, if it means anything
pub fn command_for_key(app: &AppState, key: KeyEvent) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    if app.exit_confirm.is_some() {
        return Some(match key.code {
            KeyCode::Char('c') if ctrl => Command::Interrupt,
            KeyCode::Char('y') | KeyCode::Char('Y') => Command::Confirm,
            _ => Command::Deny,
        });
    }

    if ctrl && key.code == KeyCode::Char('c') {
        return Some(Command::Interrupt);
    }

    if app.show_overview {
        return overview_key(key);
    }

    if app.dialog != Dialog::None {
        return dialog_key(app.dialog, key);
    }

    match app.mode {
        InputMode::TextInput | InputMode::Search => text_key(key),
        InputMode::FilterPending => Some(filter_key(key)),
        InputMode::Normal => normal_key(app, key, ctrl),
    }
}

fn overview_key(key: KeyEvent) -> Option<Command> {
    match key.code {
        KeyCode::Char(':') => Some(Command::ToggleOverview),
        KeyCode::Esc | KeyCode::Char('q') => Some(Command::Cancel),
        KeyCode::Char('n') | KeyCode::Char('l') | KeyCode::Right => Some(Command::MoveMonths(1)),
        KeyCode::Char('p') | KeyCode::Char('h') | KeyCode::Left => Some(Command::MoveMonths(-1)),
        _ => None,
    }
}

fn dialog_key(dialog: Dialog, key: KeyEvent) -> Option<Command> {
    if matches!(key.code, KeyCode::Esc | KeyCode::Char('q')) {
        return Some(Command::CloseDialog);
    }

    match dialog {
        Dialog::Help => match key.code {
            KeyCode::Char('?') => Some(Command::CloseDialog),
            _ => None,
        },
        Dialog::Theme => match key.code {
            KeyCode::Char(c @ '1'..='4') => c.to_digit(10).map(|n| Command::SelectTheme(n as usize)),
            _ => None,
        },
        Dialog::Export => match key.code {
            KeyCode::Char('1') => Some(Command::SetExportFormat(ExportFormat::Markdown)),
            KeyCode::Char('2') => Some(Command::SetExportFormat(ExportFormat::Json)),
            KeyCode::Char('3') => Some(Command::SetExportFormat(ExportFormat::Text)),
            KeyCode::Char('d') => Some(Command::SetExportScope(ExportScope::Day)),
            KeyCode::Char('m') => Some(Command::SetExportScope(ExportScope::Month)),
            KeyCode::Char('a') => Some(Command::SetExportScope(ExportScope::All)),
            KeyCode::Enter => Some(Command::RunExport),
            _ => None,
        },
        Dialog::ConfirmClearTimeline => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => Some(Command::Confirm),
            KeyCode::Char('n') | KeyCode::Char('N') => Some(Command::Deny),
            _ => None,
        },
        Dialog::TaskDetail => Some(Command::CloseDialog),
        Dialog::None => None,
    }
}

fn text_key(key: KeyEvent) -> Option<Command> {
    let chorded = key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
    match key.code {
        KeyCode::Char(_) if chorded => None,
        KeyCode::Char(c) => Some(Command::Insert(c)),
        KeyCode::Backspace => Some(Command::Backspace),
        KeyCode::Enter => Some(Command::Submit),
        KeyCode::Esc => Some(Command::Cancel),
        _ => None,
    }
}

fn filter_key(key: KeyEvent) -> Command {
    let filter = match key.code {
        KeyCode::Char('t') => TaskFilter::State(TaskState::Todo),
        KeyCode::Char('c') => TaskFilter::State(TaskState::Completed),
        KeyCode::Char('d') => TaskFilter::State(TaskState::Delegated),
        KeyCode::Char('x') => TaskFilter::State(TaskState::Delayed),
        KeyCode::Char('1') => TaskFilter::Priority(Priority::High),
        KeyCode::Char('2') => TaskFilter::Priority(Priority::Medium),
        KeyCode::Char('3') => TaskFilter::Priority(Priority::Low),
        _ => return Command::Cancel,
    };
    Command::ApplyFilter(filter)
}

fn normal_key(app: &AppState, key: KeyEvent, ctrl: bool) -> Option<Command> {
    if ctrl {
        return match key.code {
            KeyCode::Char('u') => Some(Command::Undo),
            KeyCode::Char('t') => Some(Command::ToggleDialog(Dialog::Theme)),
            KeyCode::Char('e') => Some(Command::ToggleDialog(Dialog::Export)),
            KeyCode::Char('d') if app.pane == Pane::Timeline => Some(Command::PageDown),
            KeyCode::Char('b') if app.pane == Pane::Timeline => Some(Command::PageUp),
            _ => None,
        };
    }

    // Digits set priority on a selected task, otherwise they jump to a pane
    let priority_target = app.pane == Pane::Tasks && app.selected_task().is_some();
    let global = match key.code {
        KeyCode::Char('?') => Some(Command::ToggleDialog(Dialog::Help)),
        KeyCode::Char(':') => Some(Command::ToggleOverview),
        KeyCode::Char('/') => Some(Command::StartSearch),
        KeyCode::Char('1') if priority_target => Some(Command::SetPriority(Priority::High)),
        KeyCode::Char('2') if priority_target => Some(Command::SetPriority(Priority::Medium)),
        KeyCode::Char('3') if priority_target => Some(Command::SetPriority(Priority::Low)),
        KeyCode::Char('1') => Some(Command::FocusPane(Pane::Calendar)),
        KeyCode::Char('2') => Some(Command::FocusPane(Pane::Tasks)),
        KeyCode::Char('3') => Some(Command::FocusPane(Pane::Timeline)),
        KeyCode::Tab => Some(Command::NextPane),
        KeyCode::BackTab => Some(Command::PrevPane),
        KeyCode::Esc => Some(Command::ClearFilters),
        _ => None,
    };
    if global.is_some() {
        return global;
    }

    match app.pane {
        Pane::Calendar => calendar_key(key),
        Pane::Tasks => tasks_key(key),
        Pane::Timeline => timeline_key(key),
    }
}

fn calendar_key(key: KeyEvent) -> Option<Command> {
    match key.code {
        KeyCode::Char('h') | KeyCode::Left => Some(Command::MoveDays(-1)),
        KeyCode::Char('l') | KeyCode::Right => Some(Command::MoveDays(1)),
        KeyCode::Char('k') | KeyCode::Up => Some(Command::MoveDays(-7)),
        KeyCode::Char('j') | KeyCode::Down => Some(Command::MoveDays(7)),
        KeyCode::Char('n') => Some(Command::MoveMonths(1)),
        KeyCode::Char('p') => Some(Command::MoveMonths(-1)),
        KeyCode::Char('t') | KeyCode::Char('T') => Some(Command::GoToday),
        _ => None,
    }
}

fn tasks_key(key: KeyEvent) -> Option<Command> {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => Some(Command::SelectNext),
        KeyCode::Char('k') | KeyCode::Up => Some(Command::SelectPrev),
        KeyCode::Char('a') => Some(Command::AddTask),
        KeyCode::Char('A') => Some(Command::AddSubtask),
        KeyCode::Char('e') => Some(Command::EditTask),
        KeyCode::Char('d') => Some(Command::DeleteTask),
        KeyCode::Char(' ') => Some(Command::ToggleComplete),
        KeyCode::Char('D') => Some(Command::Delegate),
        KeyCode::Char('x') => Some(Command::ToggleDelay),
        KeyCode::Char('s') => Some(Command::ToggleRunning),
        KeyCode::Enter | KeyCode::Right => Some(Command::ToggleExpand),
        KeyCode::Left => Some(Command::Collapse),
        KeyCode::Char('0') => Some(Command::SetPriority(Priority::None)),
        KeyCode::Char('f') => Some(Command::StartFilter),
        KeyCode::Char('v') => Some(Command::ShowDetails),
        _ => None,
    }
}

fn timeline_key(key: KeyEvent) -> Option<Command> {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => Some(Command::ScrollDown),
        KeyCode::Char('k') | KeyCode::Up => Some(Command::ScrollUp),
        KeyCode::PageDown => Some(Command::PageDown),
        KeyCode::PageUp => Some(Command::PageUp),
        KeyCode::Char('C') => Some(Command::RequestClearTimeline),
        _ => None,
    }
}
