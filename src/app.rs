use crate::domain::{
    build_view, task_stats, CalendarDate, Dialog, EventKind, InputMode, Pane, Priority, Task,
    TaskFilter, TaskState, TaskStats, TaskTree, Timeline, TimelineEvent, ViewRow,
};
use crate::export::{ExportFormat, ExportRequest, ExportScope};
use crate::persistence::{SaveOutcome, SaveRequest, Schema, Settings};
use crate::ui::theme::Theme;
use crate::undo::UndoStack;
use log::{debug, error, info};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// How long Ctrl+C stays armed waiting for confirmation
pub const EXIT_CONFIRM_WINDOW: Duration = Duration::from_secs(3);
/// How long a status line message stays visible
pub const STATUS_DURATION: Duration = Duration::from_secs(4);
/// Rows moved by a timeline page up/down
pub const TIMELINE_PAGE: usize = 10;

/// Model handed over by the loader
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedState {
    pub tasks: TaskTree,
    pub timeline: Timeline,
    pub theme: Theme,
    /// Settings block as read, written back unchanged apart from the theme
    pub settings: Settings,
}

impl From<Schema> for LoadedState {
    fn from(schema: Schema) -> Self {
        Self {
            tasks: schema.tasks,
            timeline: schema.timeline,
            theme: Theme::by_name_or_default(&schema.settings.theme),
            settings: schema.settings,
        }
    }
}

/// What a submitted text entry does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryTarget {
    NewTask,
    NewSubtask { parent: Uuid },
    Rename { task: Uuid },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEntry {
    pub buffer: String,
    pub target: EntryTarget,
}

impl TextEntry {
    pub fn prompt(&self) -> &'static str {
        match self.target {
            EntryTarget::NewTask => "New task",
            EntryTarget::NewSubtask { .. } => "New subtask",
            EntryTarget::Rename { .. } => "Rename",
        }
    }
}

/// Live search query. Locked once submitted with Enter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    pub query: String,
    pub locked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
    pub expires_at: Instant,
}

/// Choices made in the export dialog so far
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportDraft {
    pub format: ExportFormat,
    pub scope: ExportScope,
}

/// Main application state
pub struct AppState {
    pub tasks: TaskTree,
    pub timeline: Timeline,
    pub undo: UndoStack,

    pub selected_date: CalendarDate,
    /// Month shown by the overview; follows the selected date
    pub viewing_month: CalendarDate,

    pub pane: Pane,
    pub mode: InputMode,
    pub dialog: Dialog,
    pub exit_confirm: Option<Instant>,
    pub show_overview: bool,

    pub text_entry: Option<TextEntry>,
    pub search: SearchState,
    pub filter: Option<TaskFilter>,

    /// Visible task rows for the selected date
    pub view: Vec<ViewRow>,
    pub selected_index: usize,
    pub timeline_scroll: usize,

    pub status: Option<StatusMessage>,
    pub export_draft: ExportDraft,
    pub theme: Theme,

    settings: Settings,
    dirty: bool,
    revision: u64,
    requested_revision: Option<u64>,
    pending_export: Option<ExportRequest>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(LoadedState::default())
    }
}

impl AppState {
    pub fn new(loaded: LoadedState) -> Self {
        Self::with_date(loaded, CalendarDate::today())
    }

    /// State opened on a specific date
    pub fn with_date(loaded: LoadedState, date: CalendarDate) -> Self {
        let mut app = Self {
            tasks: loaded.tasks,
            timeline: loaded.timeline,
            undo: UndoStack::default(),
            selected_date: date,
            viewing_month: date,
            pane: Pane::default(),
            mode: InputMode::default(),
            dialog: Dialog::default(),
            exit_confirm: None,
            show_overview: false,
            text_entry: None,
            search: SearchState::default(),
            filter: None,
            view: Vec::new(),
            selected_index: 0,
            timeline_scroll: 0,
            status: None,
            export_draft: ExportDraft::default(),
            theme: loaded.theme,
            settings: loaded.settings,
            dirty: false,
            revision: 0,
            requested_revision: None,
            pending_export: None,
        };
        app.refresh_view();
        app
    }

    /// Replace the model with freshly loaded data. Not undoable and not dirty.
    pub fn apply_loaded(&mut self, loaded: LoadedState) {
        self.tasks = loaded.tasks;
        self.timeline = loaded.timeline;
        self.theme = loaded.theme;
        self.settings = loaded.settings;
        self.undo.clear();
        self.selected_index = 0;
        self.timeline_scroll = 0;
        self.refresh_view();
    }

    pub fn day_key(&self) -> String {
        self.selected_date.key()
    }

    pub fn day_tasks(&self) -> &[Task] {
        self.tasks.tasks_for_date(&self.day_key())
    }

    pub fn day_events(&self) -> &[TimelineEvent] {
        self.timeline.events_for_date(&self.day_key())
    }

    pub fn day_stats(&self) -> TaskStats {
        task_stats(self.day_tasks())
    }

    /// Recompute visible rows and keep the selection in range
    pub fn refresh_view(&mut self) {
        let key = self.day_key();
        self.view = build_view(self.tasks.tasks_for_date(&key), &self.search.query, self.filter);
        if self.view.is_empty() {
            self.selected_index = 0;
        } else if self.selected_index >= self.view.len() {
            self.selected_index = self.view.len() - 1;
        }
        let max_scroll = self.day_events().len().saturating_sub(1);
        self.timeline_scroll = self.timeline_scroll.min(max_scroll);
    }

    pub fn is_filtered(&self) -> bool {
        !self.search.query.is_empty() || self.filter.is_some()
    }

    // Selection

    pub fn selected_task_id(&self) -> Option<Uuid> {
        self.view.get(self.selected_index).map(|row| row.id)
    }

    pub fn selected_task(&self) -> Option<&Task> {
        let id = self.selected_task_id()?;
        self.tasks.find(&self.day_key(), id)
    }

    fn selected_task_mut(&mut self) -> Option<&mut Task> {
        let id = self.selected_task_id()?;
        let key = self.day_key();
        self.tasks.find_mut(&key, id)
    }

    pub fn move_selection_down(&mut self) {
        if self.selected_index + 1 < self.view.len() {
            self.selected_index += 1;
        }
    }

    pub fn move_selection_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    fn select_task(&mut self, id: Uuid) {
        if let Some(idx) = self.view.iter().position(|row| row.id == id) {
            self.selected_index = idx;
        }
    }

    // Calendar

    pub fn select_date(&mut self, date: CalendarDate) {
        if date == self.selected_date {
            return;
        }
        self.selected_date = date;
        self.viewing_month = date;
        self.selected_index = 0;
        self.timeline_scroll = 0;
        self.refresh_view();
    }

    pub fn move_days(&mut self, days: i64) {
        self.select_date(self.selected_date.add_days(days));
    }

    pub fn move_months(&mut self, months: i32) {
        self.select_date(self.selected_date.add_months(months));
    }

    pub fn go_today(&mut self) {
        self.select_date(CalendarDate::today());
    }

    /// Page the overview without touching the selected date
    pub fn move_viewing_month(&mut self, months: i32) {
        self.viewing_month = self.viewing_month.add_months(months);
    }

    pub fn toggle_overview(&mut self) {
        self.show_overview = !self.show_overview;
        if self.show_overview {
            self.viewing_month = self.selected_date;
        }
    }

    // Focus and dialogs

    pub fn focus_pane(&mut self, pane: Pane) {
        self.pane = pane;
    }

    pub fn toggle_dialog(&mut self, dialog: Dialog) {
        self.dialog = if self.dialog == dialog { Dialog::None } else { dialog };
    }

    pub fn close_dialog(&mut self) {
        self.dialog = Dialog::None;
    }

    pub fn show_details(&mut self) {
        if self.selected_task().is_some() {
            self.dialog = Dialog::TaskDetail;
        }
    }

    // Exit confirmation

    pub fn arm_exit(&mut self, now: Instant) {
        self.exit_confirm = Some(now);
    }

    pub fn disarm_exit(&mut self) {
        self.exit_confirm = None;
    }

    /// Expire the exit prompt and stale status messages
    pub fn tick(&mut self, now: Instant) {
        if let Some(armed_at) = self.exit_confirm {
            if now.saturating_duration_since(armed_at) >= EXIT_CONFIRM_WINDOW {
                self.exit_confirm = None;
            }
        }
        if self.status.as_ref().is_some_and(|status| now >= status.expires_at) {
            self.status = None;
        }
    }

    // Status line

    pub fn set_status(&mut self, text: impl Into<String>, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
            expires_at: Instant::now() + STATUS_DURATION,
        });
    }

    // Undo and persistence bookkeeping

    fn push_undo(&mut self) {
        self.undo.push(&self.tasks, &self.timeline);
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
        self.revision += 1;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn undo(&mut self) {
        if self.undo.restore(&mut self.tasks, &mut self.timeline) {
            info!("Undo ({} snapshots left)", self.undo.len());
            self.mark_dirty();
            self.refresh_view();
            self.set_status("Undone", StatusKind::Info);
        } else {
            self.set_status("Nothing to undo", StatusKind::Info);
        }
    }

    /// Snapshot to hand to the saver, once per revision
    pub fn take_save_request(&mut self) -> Option<SaveRequest> {
        if !self.dirty || self.requested_revision == Some(self.revision) {
            return None;
        }
        self.requested_revision = Some(self.revision);
        Some(SaveRequest {
            revision: self.revision,
            schema: self.schema(),
        })
    }

    pub fn schema(&self) -> Schema {
        let settings = Settings {
            theme: self.theme.name.to_string(),
            ..self.settings.clone()
        };
        Schema::new(self.tasks.clone(), self.timeline.clone(), settings)
    }

    pub fn on_saved(&mut self, outcome: SaveOutcome) {
        match outcome.result {
            Ok(()) => {
                if outcome.revision == self.revision {
                    self.dirty = false;
                }
            }
            Err(message) => {
                error!("Save failed for revision {}: {}", outcome.revision, message);
                self.set_status(format!("Save failed: {}", message), StatusKind::Error);
            }
        }
    }

    // Text entry

    pub fn begin_add_task(&mut self) {
        self.begin_entry(EntryTarget::NewTask, String::new());
    }

    pub fn begin_add_subtask(&mut self) {
        if let Some(parent) = self.selected_task_id() {
            self.begin_entry(EntryTarget::NewSubtask { parent }, String::new());
        }
    }

    pub fn begin_edit_task(&mut self) {
        if let Some(task) = self.selected_task() {
            let target = EntryTarget::Rename { task: task.id };
            let title = task.title.clone();
            self.begin_entry(target, title);
        }
    }

    fn begin_entry(&mut self, target: EntryTarget, buffer: String) {
        self.text_entry = Some(TextEntry { buffer, target });
        self.mode = InputMode::TextInput;
    }

    pub fn entry_insert(&mut self, c: char) {
        if let Some(entry) = self.text_entry.as_mut() {
            entry.buffer.push(c);
        }
    }

    pub fn entry_backspace(&mut self) {
        if let Some(entry) = self.text_entry.as_mut() {
            entry.buffer.pop();
        }
    }

    pub fn cancel_entry(&mut self) {
        self.text_entry = None;
        self.mode = InputMode::Normal;
    }

    /// Apply the entry. A blank buffer changes nothing.
    pub fn submit_entry(&mut self) {
        let entry = self.text_entry.take();
        self.mode = InputMode::Normal;
        let Some(entry) = entry else {
            return;
        };
        let title = entry.buffer.trim();
        if title.is_empty() {
            return;
        }
        match entry.target {
            EntryTarget::NewTask => {
                self.add_task(title);
            }
            EntryTarget::NewSubtask { parent } => {
                self.add_subtask(parent, title);
            }
            EntryTarget::Rename { task } => self.rename_task(task, title),
        }
    }

    // Task mutations

    /// Give `task` an ID no other task in the tree uses
    pub fn ensure_unique_id(&self, task: &mut Task) {
        while self.tasks.contains_id(task.id) {
            task.regenerate_id();
        }
    }

    /// Add a top-level task on the selected date
    pub fn add_task(&mut self, title: &str) -> Uuid {
        let key = self.day_key();
        let mut task = Task::new(title, key.clone());
        self.ensure_unique_id(&mut task);
        let id = task.id;

        self.push_undo();
        self.timeline.add_event(&key, TimelineEvent::new(&task, EventKind::Created));
        self.tasks.add_task(task);
        self.mark_dirty();
        self.refresh_view();
        self.select_task(id);
        id
    }

    pub fn add_subtask(&mut self, parent_id: Uuid, title: &str) -> Option<Uuid> {
        let key = self.day_key();
        self.tasks.find(&key, parent_id)?;
        let mut child = Task::new(title, key.clone());
        self.ensure_unique_id(&mut child);
        let id = child.id;
        let event = TimelineEvent::new(&child, EventKind::Created);

        self.push_undo();
        if let Some(parent) = self.tasks.find_mut(&key, parent_id) {
            parent.expanded = true;
            parent.add_child(child);
        }
        self.timeline.add_event(&key, event);
        self.mark_dirty();
        self.refresh_view();
        self.select_task(id);
        Some(id)
    }

    pub fn rename_task(&mut self, id: Uuid, title: &str) {
        let key = self.day_key();
        if self.tasks.find(&key, id).is_none() {
            return;
        }
        self.push_undo();
        if let Some(task) = self.tasks.find_mut(&key, id) {
            task.rename(title);
        }
        self.mark_dirty();
        self.refresh_view();
    }

    /// Delete the selected task, its subtree and their history on this date
    pub fn delete_selected(&mut self) {
        let Some(id) = self.selected_task_id() else {
            return;
        };
        let key = self.day_key();
        self.push_undo();
        if let Some(removed) = self.tasks.take_task(&key, id) {
            for task_id in removed.subtree_ids() {
                self.timeline.remove_events_by_task(&key, task_id);
            }
            debug!("Deleted task {} ({} in subtree)", removed.id, removed.subtree_ids().len());
        }
        self.mark_dirty();
        self.refresh_view();
    }

    fn change_selected_state(&mut self, new_state: TaskState) {
        let Some(previous) = self.selected_task().map(|task| task.state) else {
            return;
        };
        let key = self.day_key();
        self.push_undo();
        let event = self.selected_task_mut().map(|task| {
            task.set_state(new_state);
            TimelineEvent::state_change(task, previous, new_state)
        });
        if let Some(event) = event {
            self.timeline.add_event(&key, event);
        }
        self.mark_dirty();
        self.refresh_view();
    }

    pub fn toggle_complete(&mut self) {
        if let Some(state) = self.selected_task().map(|task| task.state) {
            let next = if state == TaskState::Completed {
                TaskState::Todo
            } else {
                TaskState::Completed
            };
            self.change_selected_state(next);
        }
    }

    pub fn delegate(&mut self) {
        self.change_selected_state(TaskState::Delegated);
    }

    pub fn toggle_delay(&mut self) {
        if let Some(state) = self.selected_task().map(|task| task.state) {
            let next = if state == TaskState::Delayed {
                TaskState::Todo
            } else {
                TaskState::Delayed
            };
            self.change_selected_state(next);
        }
    }

    /// Start the selected task, or stop it if it is running
    pub fn toggle_running(&mut self) {
        if self.selected_task().is_none() {
            return;
        }
        let key = self.day_key();
        self.push_undo();
        let event = self.selected_task_mut().and_then(|task| {
            if task.is_running() {
                task.stop();
                None
            } else {
                task.start();
                Some(TimelineEvent::new(task, EventKind::Started))
            }
        });
        if let Some(event) = event {
            self.timeline.add_event(&key, event);
        }
        self.mark_dirty();
        self.refresh_view();
    }

    pub fn set_priority(&mut self, priority: Priority) {
        if self.selected_task().is_none() {
            return;
        }
        self.push_undo();
        if let Some(task) = self.selected_task_mut() {
            task.set_priority(priority);
        }
        self.mark_dirty();
        self.refresh_view();
    }

    pub fn toggle_expand(&mut self) {
        if let Some(task) = self.selected_task_mut() {
            if task.has_children() {
                task.toggle_expanded();
            }
        }
        self.refresh_view();
    }

    pub fn collapse(&mut self) {
        if let Some(task) = self.selected_task_mut() {
            task.expanded = false;
        }
        self.refresh_view();
    }

    // Search and filter

    pub fn start_search(&mut self) {
        self.search = SearchState::default();
        self.mode = InputMode::Search;
        self.refresh_view();
    }

    pub fn search_insert(&mut self, c: char) {
        self.search.query.push(c);
        self.refresh_view();
    }

    pub fn search_backspace(&mut self) {
        self.search.query.pop();
        self.refresh_view();
    }

    pub fn submit_search(&mut self) {
        self.search.locked = !self.search.query.is_empty();
        self.mode = InputMode::Normal;
        self.refresh_view();
    }

    pub fn cancel_search(&mut self) {
        self.search = SearchState::default();
        self.mode = InputMode::Normal;
        self.refresh_view();
    }

    pub fn start_filter(&mut self) {
        self.mode = InputMode::FilterPending;
    }

    pub fn apply_filter(&mut self, filter: TaskFilter) {
        self.filter = Some(filter);
        self.mode = InputMode::Normal;
        self.selected_index = 0;
        self.refresh_view();
    }

    pub fn cancel_filter(&mut self) {
        self.mode = InputMode::Normal;
    }

    pub fn clear_filters(&mut self) {
        self.search = SearchState::default();
        self.filter = None;
        self.refresh_view();
    }

    // Timeline

    pub fn scroll_timeline_down(&mut self, rows: usize) {
        let max_scroll = self.day_events().len().saturating_sub(1);
        self.timeline_scroll = (self.timeline_scroll + rows).min(max_scroll);
    }

    pub fn scroll_timeline_up(&mut self, rows: usize) {
        self.timeline_scroll = self.timeline_scroll.saturating_sub(rows);
    }

    pub fn request_clear_timeline(&mut self) {
        self.dialog = Dialog::ConfirmClearTimeline;
    }

    pub fn confirm_clear_timeline(&mut self) {
        let key = self.day_key();
        self.push_undo();
        let cleared = self.timeline.clear_date(&key);
        info!("Cleared {} timeline events on {}", cleared, key);
        self.timeline_scroll = 0;
        self.dialog = Dialog::None;
        self.mark_dirty();
        self.refresh_view();
    }

    // Theme

    /// Switch to the n-th theme in dialog order. Persisted, not undoable.
    pub fn select_theme(&mut self, number: usize) {
        let Some(theme) = Theme::by_number(number) else {
            return;
        };
        info!("Theme changed to {}", theme.name);
        self.theme = theme;
        self.dialog = Dialog::None;
        self.mark_dirty();
        self.set_status(format!("Theme: {}", theme.name), StatusKind::Info);
    }

    // Export

    pub fn set_export_format(&mut self, format: ExportFormat) {
        self.export_draft.format = format;
    }

    pub fn set_export_scope(&mut self, scope: ExportScope) {
        self.export_draft.scope = scope;
    }

    /// Queue the drafted export for the event loop and close the dialog
    pub fn run_export(&mut self) {
        self.pending_export = Some(ExportRequest {
            format: self.export_draft.format,
            scope: self.export_draft.scope,
            anchor: self.selected_date,
        });
        self.dialog = Dialog::None;
    }

    pub fn take_export_request(&mut self) -> Option<ExportRequest> {
        self.pending_export.take()
    }

    pub fn on_exported(&mut self, result: Result<PathBuf, String>) {
        match result {
            Ok(path) => {
                info!("Exported to {}", path.display());
                self.set_status(format!("Exported to {}", path.display()), StatusKind::Info);
            }
            Err(message) => {
                error!("Export failed: {}", message);
                self.set_status(format!("Export failed: {}", message), StatusKind::Error);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn june_first() -> CalendarDate {
        CalendarDate::from_ymd(2024, 6, 1).unwrap()
    }

    fn create_test_app() -> AppState {
        AppState::with_date(LoadedState::default(), june_first())
    }

    fn titles(app: &AppState) -> Vec<String> {
        app.view
            .iter()
            .filter_map(|row| app.tasks.find(&app.day_key(), row.id))
            .map(|task| task.title.clone())
            .collect()
    }

    #[test]
    fn test_app_state_new() {
        let app = create_test_app();
        assert_eq!(app.pane, Pane::Tasks);
        assert_eq!(app.mode, InputMode::Normal);
        assert_eq!(app.dialog, Dialog::None);
        assert!(app.view.is_empty());
        assert!(!app.is_dirty());
        assert_eq!(app.theme.name, "ultraviolet");
    }

    #[test]
    fn test_add_task_records_created_event() {
        let mut app = create_test_app();
        let id = app.add_task("Write report");

        let task = app.selected_task().unwrap();
        assert_eq!(task.id, id);
        assert_eq!(task.state, TaskState::Todo);
        assert_eq!(task.priority, Priority::None);
        assert_eq!(task.date, "2024-06-01");

        let events = app.day_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::Created);
        assert_eq!(events[0].task_id, id);
        assert!(app.is_dirty());
        assert_eq!(app.undo.len(), 1);
    }

    #[test]
    fn test_complete_then_undo_scenario() {
        let mut app = create_test_app();
        app.add_task("Write report");

        app.toggle_complete();
        let task = app.selected_task().unwrap();
        assert_eq!(task.state, TaskState::Completed);
        let events = app.day_events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].kind, EventKind::Completed);
        assert_eq!(events[1].task_title, "Write report");

        app.undo();
        assert_eq!(app.selected_task().unwrap().state, TaskState::Todo);
        assert_eq!(app.day_events().len(), 1);
        assert_eq!(app.day_events()[0].kind, EventKind::Created);
    }

    #[test]
    fn test_toggle_complete_twice_returns_to_todo() {
        let mut app = create_test_app();
        app.add_task("Task");
        app.toggle_complete();
        app.toggle_complete();
        assert_eq!(app.selected_task().unwrap().state, TaskState::Todo);
        assert_eq!(app.day_events()[2].kind, EventKind::Updated);
    }

    #[test]
    fn test_delay_and_delegate() {
        let mut app = create_test_app();
        app.add_task("Task");

        app.toggle_delay();
        assert_eq!(app.selected_task().unwrap().state, TaskState::Delayed);
        app.toggle_delay();
        assert_eq!(app.selected_task().unwrap().state, TaskState::Todo);
        app.delegate();
        assert_eq!(app.selected_task().unwrap().state, TaskState::Delegated);

        let kinds: Vec<_> = app.day_events().iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![EventKind::Created, EventKind::Delayed, EventKind::Updated, EventKind::Delegated]
        );
    }

    #[test]
    fn test_toggle_running() {
        let mut app = create_test_app();
        app.add_task("Focus");

        app.toggle_running();
        assert!(app.selected_task().unwrap().is_running());
        assert_eq!(app.day_events().last().unwrap().kind, EventKind::Started);

        app.toggle_running();
        assert!(!app.selected_task().unwrap().is_running());
        // Stopping records no event
        assert_eq!(app.day_events().len(), 2);
    }

    #[test]
    fn test_search_scenario() {
        let mut app = create_test_app();
        app.add_task("Buy milk");
        app.add_task("Write report");

        app.start_search();
        for c in "rep".chars() {
            app.search_insert(c);
        }
        assert_eq!(titles(&app), vec!["Write report"]);

        app.clear_filters();
        assert_eq!(titles(&app), vec!["Buy milk", "Write report"]);
    }

    #[test]
    fn test_search_submit_and_cancel() {
        let mut app = create_test_app();
        app.add_task("Buy milk");
        app.add_task("Write report");

        app.start_search();
        app.search_insert('m');
        app.submit_search();
        assert!(app.search.locked);
        assert_eq!(app.mode, InputMode::Normal);
        assert_eq!(titles(&app), vec!["Buy milk"]);

        app.start_search();
        app.search_insert('x');
        app.cancel_search();
        assert_eq!(app.search, SearchState::default());
        assert_eq!(titles(&app).len(), 2);
    }

    #[test]
    fn test_filter_composes_with_search() {
        let mut app = create_test_app();
        app.add_task("Report draft");
        app.toggle_complete();
        app.add_task("Report final");
        app.add_task("Groceries");
        app.toggle_complete();

        app.apply_filter(TaskFilter::State(TaskState::Completed));
        assert_eq!(titles(&app), vec!["Report draft", "Groceries"]);

        app.start_search();
        for c in "report".chars() {
            app.search_insert(c);
        }
        assert_eq!(titles(&app), vec!["Report draft"]);

        app.clear_filters();
        assert_eq!(titles(&app).len(), 3);
    }

    #[test]
    fn test_delete_with_children_scenario() {
        let mut app = create_test_app();
        let parent = app.add_task("Parent");
        let a = app.add_subtask(parent, "A").unwrap();
        let b = app.add_subtask(parent, "B").unwrap();
        let sibling = app.add_task("Sibling");
        assert_eq!(app.view.len(), 4);

        app.select_task(parent);
        app.delete_selected();

        assert_eq!(titles(&app), vec!["Sibling"]);
        let remaining: Vec<_> = app.day_events().iter().map(|e| e.task_id).collect();
        assert_eq!(remaining, vec![sibling]);
        assert!(!app.tasks.contains_id(a));
        assert!(!app.tasks.contains_id(b));

        app.undo();
        assert_eq!(app.view.len(), 4);
        assert_eq!(app.day_events().len(), 4);
    }

    #[test]
    fn test_delete_keeps_events_on_other_dates() {
        let mut app = create_test_app();
        let id = app.add_task("Task");
        // Same task ID referenced from another day's log
        let other_event = app.day_events()[0].clone();
        app.timeline.add_event("2024-06-02", other_event);

        app.select_task(id);
        app.delete_selected();

        assert!(app.day_events().is_empty());
        assert_eq!(app.timeline.events_for_date("2024-06-02").len(), 1);
    }

    #[test]
    fn test_delete_last_row_clamps_selection() {
        let mut app = create_test_app();
        app.add_task("One");
        app.add_task("Two");
        assert_eq!(app.selected_index, 1);

        app.delete_selected();
        assert_eq!(app.selected_index, 0);
        app.delete_selected();
        assert_eq!(app.selected_index, 0);
        assert!(app.selected_task().is_none());

        // Deleting with nothing selected is a no-op
        let undo_depth = app.undo.len();
        app.delete_selected();
        assert_eq!(app.undo.len(), undo_depth);
    }

    #[test]
    fn test_collapse_hides_children() {
        let mut app = create_test_app();
        let parent = app.add_task("Parent");
        app.add_subtask(parent, "Child");
        assert_eq!(app.view.len(), 2);

        app.select_task(parent);
        app.collapse();
        assert_eq!(app.view.len(), 1);
        app.toggle_expand();
        assert_eq!(app.view.len(), 2);
        assert_eq!(app.view[1].depth, 1);
    }

    #[test]
    fn test_toggle_expand_ignores_leaf() {
        let mut app = create_test_app();
        app.add_task("Leaf");
        app.toggle_expand();
        assert!(app.selected_task().unwrap().expanded);
    }

    #[test]
    fn test_text_entry_flow() {
        let mut app = create_test_app();
        app.begin_add_task();
        assert_eq!(app.mode, InputMode::TextInput);
        for c in "Buy milkk".chars() {
            app.entry_insert(c);
        }
        app.entry_backspace();
        app.submit_entry();

        assert_eq!(app.mode, InputMode::Normal);
        assert!(app.text_entry.is_none());
        assert_eq!(titles(&app), vec!["Buy milk"]);
    }

    #[test]
    fn test_blank_entry_submits_nothing() {
        let mut app = create_test_app();
        app.begin_add_task();
        app.entry_insert(' ');
        app.submit_entry();
        assert!(app.view.is_empty());
        assert!(app.undo.is_empty());
        assert!(!app.is_dirty());
    }

    #[test]
    fn test_rename_via_entry_is_undoable() {
        let mut app = create_test_app();
        app.add_task("Old title");
        app.begin_edit_task();
        assert_eq!(app.text_entry.as_ref().unwrap().buffer, "Old title");

        app.text_entry.as_mut().unwrap().buffer = "New title".to_string();
        app.submit_entry();
        assert_eq!(app.selected_task().unwrap().title, "New title");

        app.undo();
        assert_eq!(app.selected_task().unwrap().title, "Old title");
    }

    #[test]
    fn test_subtask_entry() {
        let mut app = create_test_app();
        let parent = app.add_task("Parent");
        app.begin_add_subtask();
        assert_eq!(
            app.text_entry.as_ref().unwrap().target,
            EntryTarget::NewSubtask { parent }
        );
        app.entry_insert('x');
        app.submit_entry();

        let parent_task = app.tasks.find("2024-06-01", parent).unwrap();
        assert_eq!(parent_task.children.len(), 1);
        assert_eq!(parent_task.children[0].parent_id, Some(parent));
        assert_eq!(app.selected_task().unwrap().title, "x");
    }

    #[test]
    fn test_ensure_unique_id() {
        let mut app = create_test_app();
        let id = app.add_task("Existing");
        let mut clash = app.selected_task().unwrap().clone();
        assert_eq!(clash.id, id);

        app.ensure_unique_id(&mut clash);
        assert_ne!(clash.id, id);
    }

    #[test]
    fn test_set_priority() {
        let mut app = create_test_app();
        app.add_task("Task");
        app.set_priority(Priority::Medium);
        assert_eq!(app.selected_task().unwrap().priority, Priority::Medium);
        app.undo();
        assert_eq!(app.selected_task().unwrap().priority, Priority::None);
    }

    #[test]
    fn test_date_navigation_resets_selection() {
        let mut app = create_test_app();
        app.add_task("One");
        app.add_task("Two");
        assert_eq!(app.selected_index, 1);

        app.move_days(1);
        assert_eq!(app.day_key(), "2024-06-02");
        assert_eq!(app.selected_index, 0);
        assert!(app.view.is_empty());

        app.move_days(-1);
        assert_eq!(app.view.len(), 2);

        app.move_months(1);
        assert_eq!(app.day_key(), "2024-07-01");
        assert_eq!(app.viewing_month, app.selected_date);
    }

    #[test]
    fn test_overview_month_paging_keeps_selection() {
        let mut app = create_test_app();
        app.toggle_overview();
        app.move_viewing_month(2);
        assert_eq!(app.viewing_month.month(), 8);
        assert_eq!(app.day_key(), "2024-06-01");
    }

    #[test]
    fn test_dirty_revision_bookkeeping() {
        let mut app = create_test_app();
        assert!(app.take_save_request().is_none());

        app.add_task("One");
        let first = app.take_save_request().unwrap();
        assert_eq!(first.revision, app.revision());
        // Same revision isn't requested twice
        assert!(app.take_save_request().is_none());

        // Edit lands while the first save is in flight
        app.add_task("Two");
        app.on_saved(SaveOutcome { revision: first.revision, result: Ok(()) });
        assert!(app.is_dirty());

        let second = app.take_save_request().unwrap();
        app.on_saved(SaveOutcome { revision: second.revision, result: Ok(()) });
        assert!(!app.is_dirty());
    }

    #[test]
    fn test_failed_save_stays_dirty_until_next_edit() {
        let mut app = create_test_app();
        app.add_task("One");
        let request = app.take_save_request().unwrap();
        app.on_saved(SaveOutcome {
            revision: request.revision,
            result: Err("disk full".to_string()),
        });

        assert!(app.is_dirty());
        assert_eq!(app.status.as_ref().unwrap().kind, StatusKind::Error);
        assert!(app.take_save_request().is_none());

        app.add_task("Two");
        assert!(app.take_save_request().is_some());
    }

    #[test]
    fn test_clear_timeline_is_undoable() {
        let mut app = create_test_app();
        app.add_task("One");
        app.add_task("Two");
        app.request_clear_timeline();
        assert_eq!(app.dialog, Dialog::ConfirmClearTimeline);

        app.confirm_clear_timeline();
        assert!(app.day_events().is_empty());
        assert_eq!(app.dialog, Dialog::None);
        // Tasks are untouched
        assert_eq!(app.view.len(), 2);

        app.undo();
        assert_eq!(app.day_events().len(), 2);
    }

    #[test]
    fn test_timeline_scroll_clamped() {
        let mut app = create_test_app();
        for title in ["a", "b", "c"] {
            app.add_task(title);
        }
        app.scroll_timeline_down(TIMELINE_PAGE);
        assert_eq!(app.timeline_scroll, 2);
        app.scroll_timeline_up(1);
        assert_eq!(app.timeline_scroll, 1);
        app.scroll_timeline_up(TIMELINE_PAGE);
        assert_eq!(app.timeline_scroll, 0);
    }

    #[test]
    fn test_select_theme_persists() {
        let mut app = create_test_app();
        app.dialog = Dialog::Theme;
        app.select_theme(4);
        assert_eq!(app.theme.name, "nord");
        assert_eq!(app.dialog, Dialog::None);
        assert_eq!(app.take_save_request().unwrap().schema.settings.theme, "nord");

        // Out of range leaves everything alone
        app.select_theme(9);
        assert_eq!(app.theme.name, "nord");
    }

    #[test]
    fn test_export_request() {
        let mut app = create_test_app();
        app.dialog = Dialog::Export;
        app.set_export_format(ExportFormat::Json);
        app.set_export_scope(ExportScope::Month);
        app.run_export();

        let request = app.take_export_request().unwrap();
        assert_eq!(request.format, ExportFormat::Json);
        assert_eq!(request.scope, ExportScope::Month);
        assert_eq!(request.anchor, june_first());
        assert!(app.take_export_request().is_none());
        assert_eq!(app.dialog, Dialog::None);
    }

    #[test]
    fn test_tick_expires_exit_and_status() {
        let mut app = create_test_app();
        let now = Instant::now();
        app.arm_exit(now);
        app.set_status("hello", StatusKind::Info);

        app.tick(now + Duration::from_secs(1));
        assert!(app.exit_confirm.is_some());
        assert!(app.status.is_some());

        app.tick(now + EXIT_CONFIRM_WINDOW + STATUS_DURATION);
        assert!(app.exit_confirm.is_none());
        assert!(app.status.is_none());
    }

    #[test]
    fn test_apply_loaded() {
        let mut app = create_test_app();
        app.add_task("Stale");

        let mut tasks = TaskTree::new();
        tasks.add_task(Task::new("Loaded", "2024-06-01"));
        app.apply_loaded(LoadedState {
            tasks,
            timeline: Timeline::new(),
            theme: Theme::by_name("minimal").unwrap(),
            settings: Settings::default(),
        });

        assert_eq!(titles(&app), vec!["Loaded"]);
        assert_eq!(app.theme.name, "minimal");
        assert!(app.undo.is_empty());
    }

    #[test]
    fn test_loaded_settings_survive_save() {
        let mut schema = Schema::default();
        schema.settings.theme = "terminal".to_string();
        schema.settings.date_format = "2006-01-02".to_string();
        schema.settings.skipped_version = Some("1.4.0".to_string());

        let mut app = AppState::with_date(LoadedState::from(schema), june_first());
        app.select_theme(4);

        let saved = app.take_save_request().unwrap().schema.settings;
        assert_eq!(saved.theme, "nord");
        assert_eq!(saved.date_format, "2006-01-02");
        assert_eq!(saved.skipped_version.as_deref(), Some("1.4.0"));
    }
}
