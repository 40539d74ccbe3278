use crate::app::LoadedState;
use crate::domain::{Dialog, Pane, Priority, TaskFilter};
use crate::export::{ExportFormat, ExportScope};
use crate::persistence::SaveOutcome;
use std::path::PathBuf;

/// Everything the state machine reacts to: user intents plus tick and I/O completions
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    // Lifecycle
    Interrupt,
    Confirm,
    Deny,
    Tick,

    // Text entry
    Insert(char),
    Backspace,
    Submit,
    Cancel,

    // Global
    Undo,
    ToggleDialog(Dialog),
    CloseDialog,
    ToggleOverview,
    FocusPane(Pane),
    NextPane,
    PrevPane,
    StartSearch,
    ClearFilters,

    // Calendar pane
    MoveDays(i64),
    MoveMonths(i32),
    GoToday,

    // Tasks pane
    SelectNext,
    SelectPrev,
    AddTask,
    AddSubtask,
    EditTask,
    DeleteTask,
    ToggleComplete,
    Delegate,
    ToggleDelay,
    ToggleRunning,
    ToggleExpand,
    Collapse,
    SetPriority(Priority),
    StartFilter,
    ApplyFilter(TaskFilter),
    ShowDetails,

    // Timeline pane
    ScrollDown,
    ScrollUp,
    PageDown,
    PageUp,
    RequestClearTimeline,

    // Dialogs
    SelectTheme(usize),
    SetExportFormat(ExportFormat),
    SetExportScope(ExportScope),
    RunExport,

    // Completions
    Loaded(Box<LoadedState>),
    Saved(SaveOutcome),
    Exported(Result<PathBuf, String>),
}
