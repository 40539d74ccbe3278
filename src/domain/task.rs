use super::enums::{Priority, TaskState};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

fn default_expanded() -> bool {
    true
}

/// A task or subtask. Children are owned; a task's subtree always shares its date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub state: TaskState,
    #[serde(default)]
    pub priority: Priority,
    pub created_at: DateTime<Local>,
    pub updated_at: DateTime<Local>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Local>>,
    #[serde(default, rename = "endTime", skip_serializing_if = "Option::is_none")]
    pub stop_time: Option<DateTime<Local>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Task>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Uuid>,
    /// Date key (YYYY-MM-DD) this task is filed under
    pub date: String,
    /// Whether children are shown in the task list (UI only, never persisted)
    #[serde(skip, default = "default_expanded")]
    pub expanded: bool,
}

impl Task {
    pub fn new(title: impl Into<String>, date: impl Into<String>) -> Self {
        let now = Local::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            state: TaskState::Todo,
            priority: Priority::None,
            created_at: now,
            updated_at: now,
            start_time: None,
            stop_time: None,
            children: Vec::new(),
            parent_id: None,
            date: date.into(),
            expanded: true,
        }
    }

    /// Running means started, not stopped, and still todo
    pub fn is_running(&self) -> bool {
        self.start_time.is_some() && self.stop_time.is_none() && self.state == TaskState::Todo
    }

    /// Change state. Completing stamps the stop time; children are untouched.
    pub fn set_state(&mut self, state: TaskState) {
        let now = Local::now();
        self.state = state;
        self.updated_at = now;
        if state == TaskState::Completed {
            self.stop_time = Some(now);
        }
    }

    pub fn set_priority(&mut self, priority: Priority) {
        self.priority = priority;
        self.updated_at = Local::now();
    }

    /// Start the clock. Clears any previous stop so a stopped task can run again.
    pub fn start(&mut self) {
        let now = Local::now();
        self.start_time = Some(now);
        self.stop_time = None;
        self.state = TaskState::Todo;
        self.updated_at = now;
    }

    pub fn stop(&mut self) {
        let now = Local::now();
        self.stop_time = Some(now);
        self.updated_at = now;
    }

    pub fn rename(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.updated_at = Local::now();
    }

    pub fn toggle_expanded(&mut self) {
        self.expanded = !self.expanded;
    }

    /// Adopt a child, moving its whole subtree onto this task's date
    pub fn add_child(&mut self, mut child: Task) {
        child.parent_id = Some(self.id);
        child.assign_date(&self.date);
        self.children.push(child);
        self.updated_at = Local::now();
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// IDs of this task and every descendant, pre-order
    pub fn subtree_ids(&self) -> Vec<Uuid> {
        let mut ids = vec![self.id];
        for child in &self.children {
            ids.extend(child.subtree_ids());
        }
        ids
    }

    /// Give this task a fresh random ID (used when a generated ID collides)
    pub fn regenerate_id(&mut self) {
        let new_id = Uuid::new_v4();
        self.id = new_id;
        for child in &mut self.children {
            child.parent_id = Some(new_id);
        }
    }

    fn assign_date(&mut self, date: &str) {
        self.date = date.to_string();
        for child in &mut self.children {
            child.assign_date(date);
        }
    }
}

/// Top-level tasks per date key, in display order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskTree(BTreeMap<String, Vec<Task>>);

impl TaskTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tasks for a date; an absent date is an empty list
    pub fn tasks_for_date(&self, date: &str) -> &[Task] {
        self.0.get(date).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Append a top-level task to its own date
    pub fn add_task(&mut self, task: Task) {
        self.0.entry(task.date.clone()).or_default().push(task);
    }

    /// Remove the first task with `id` found by a pre-order walk of `date`,
    /// returning it together with its subtree
    pub fn take_task(&mut self, date: &str, id: Uuid) -> Option<Task> {
        let tasks = self.0.get_mut(date)?;
        take_from(tasks, id)
    }

    pub fn remove_task(&mut self, date: &str, id: Uuid) -> bool {
        self.take_task(date, id).is_some()
    }

    pub fn find(&self, date: &str, id: Uuid) -> Option<&Task> {
        find_in(self.tasks_for_date(date), id)
    }

    pub fn find_mut(&mut self, date: &str, id: Uuid) -> Option<&mut Task> {
        let tasks = self.0.get_mut(date)?;
        find_in_mut(tasks, id)
    }

    /// Whether any task on any date carries this ID
    pub fn contains_id(&self, id: Uuid) -> bool {
        self.0.values().any(|tasks| find_in(tasks, id).is_some())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<Task>)> {
        self.0.iter()
    }

    /// Dates that hold at least one task
    pub fn dates(&self) -> impl Iterator<Item = &String> {
        self.0.iter().filter(|(_, tasks)| !tasks.is_empty()).map(|(date, _)| date)
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(Vec::is_empty)
    }
}

fn take_from(tasks: &mut Vec<Task>, id: Uuid) -> Option<Task> {
    for idx in 0..tasks.len() {
        if tasks[idx].id == id {
            return Some(tasks.remove(idx));
        }
        if let Some(found) = take_from(&mut tasks[idx].children, id) {
            return Some(found);
        }
    }
    None
}

fn find_in(tasks: &[Task], id: Uuid) -> Option<&Task> {
    for task in tasks {
        if task.id == id {
            return Some(task);
        }
        if let Some(found) = find_in(&task.children, id) {
            return Some(found);
        }
    }
    None
}

fn find_in_mut(tasks: &mut [Task], id: Uuid) -> Option<&mut Task> {
    for task in tasks.iter_mut() {
        if task.id == id {
            return Some(task);
        }
        if let Some(found) = find_in_mut(&mut task.children, id) {
            return Some(found);
        }
    }
    None
}
