use super::enums::TaskState;
use super::task::Task;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// What happened to a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Created,
    Started,
    Completed,
    Delegated,
    Delayed,
    Updated,
}

impl EventKind {
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Created => "+",
            Self::Started => "○",
            Self::Completed => "●",
            Self::Delegated => "→",
            Self::Delayed => "‖",
            Self::Updated => "•",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Started => "started",
            Self::Completed => "completed",
            Self::Delegated => "delegated",
            Self::Delayed => "delayed",
            Self::Updated => "updated",
        }
    }

    /// Kind recorded for a transition into `state`
    pub fn for_state(state: TaskState) -> Self {
        match state {
            TaskState::Completed => Self::Completed,
            TaskState::Delegated => Self::Delegated,
            TaskState::Delayed => Self::Delayed,
            TaskState::Todo => Self::Updated,
        }
    }
}

/// One immutable entry in the activity log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEvent {
    pub id: Uuid,
    pub task_id: Uuid,
    /// Title as it was when the event was recorded
    pub task_title: String,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub timestamp: DateTime<Local>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_state: Option<TaskState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_state: Option<TaskState>,
}

impl TimelineEvent {
    pub fn new(task: &Task, kind: EventKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            task_id: task.id,
            task_title: task.title.clone(),
            kind,
            timestamp: Local::now(),
            previous_state: None,
            new_state: None,
        }
    }

    /// Event for a state transition; the kind depends only on the new state
    pub fn state_change(task: &Task, previous: TaskState, new: TaskState) -> Self {
        Self {
            previous_state: Some(previous),
            new_state: Some(new),
            ..Self::new(task, EventKind::for_state(new))
        }
    }

    pub fn time_label(&self) -> String {
        self.timestamp.format("%-I:%M %p").to_string()
    }
}

/// Append-only activity log per date key
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timeline(BTreeMap<String, Vec<TimelineEvent>>);

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_event(&mut self, date: &str, event: TimelineEvent) {
        self.0.entry(date.to_string()).or_default().push(event);
    }

    /// Events for a date in the order they were recorded
    pub fn events_for_date(&self, date: &str) -> &[TimelineEvent] {
        self.0.get(date).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Drop every event on `date` that refers to `task_id`. Returns how many went.
    pub fn remove_events_by_task(&mut self, date: &str, task_id: Uuid) -> usize {
        let Some(events) = self.0.get_mut(date) else {
            return 0;
        };
        let before = events.len();
        events.retain(|event| event.task_id != task_id);
        before - events.len()
    }

    pub fn clear_date(&mut self, date: &str) -> usize {
        self.0.remove(date).map(|events| events.len()).unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<TimelineEvent>)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(Vec::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: &str = "2024-06-01";

    #[test]
    fn test_icons() {
        assert_eq!(EventKind::Created.icon(), "+");
        assert_eq!(EventKind::Started.icon(), "○");
        assert_eq!(EventKind::Completed.icon(), "●");
        assert_eq!(EventKind::Delegated.icon(), "→");
        assert_eq!(EventKind::Delayed.icon(), "‖");
        assert_eq!(EventKind::Updated.icon(), "•");
    }

    #[test]
    fn test_state_change_classified_by_new_state() {
        let task = Task::new("Write report", DAY);
        let event = TimelineEvent::state_change(&task, TaskState::Todo, TaskState::Completed);
        assert_eq!(event.kind, EventKind::Completed);
        assert_eq!(event.previous_state, Some(TaskState::Todo));
        assert_eq!(event.new_state, Some(TaskState::Completed));

        // Back to todo is just an update, whatever it came from
        let event = TimelineEvent::state_change(&task, TaskState::Delayed, TaskState::Todo);
        assert_eq!(event.kind, EventKind::Updated);
        let event = TimelineEvent::state_change(&task, TaskState::Completed, TaskState::Delayed);
        assert_eq!(event.kind, EventKind::Delayed);
    }

    #[test]
    fn test_event_copies_title() {
        let mut task = Task::new("Original", DAY);
        let event = TimelineEvent::new(&task, EventKind::Created);
        task.rename("Renamed");
        assert_eq!(event.task_title, "Original");
        assert_eq!(event.task_id, task.id);
    }

    #[test]
    fn test_append_order_preserved() {
        let mut timeline = Timeline::new();
        let task = Task::new("Task", DAY);
        let first = TimelineEvent::new(&task, EventKind::Created);
        let mut second = TimelineEvent::new(&task, EventKind::Started);
        // Earlier timestamp must not reorder
        second.timestamp = first.timestamp - chrono::Duration::hours(1);
        let first_id = first.id;

        timeline.add_event(DAY, first);
        timeline.add_event(DAY, second);

        let events = timeline.events_for_date(DAY);
        assert_eq!(events[0].id, first_id);
        assert_eq!(events[1].kind, EventKind::Started);
    }

    #[test]
    fn test_remove_events_by_task_scoped_to_date() {
        let mut timeline = Timeline::new();
        let target = Task::new("Target", DAY);
        let other = Task::new("Other", DAY);
        timeline.add_event(DAY, TimelineEvent::new(&target, EventKind::Created));
        timeline.add_event(DAY, TimelineEvent::new(&other, EventKind::Created));
        timeline.add_event(DAY, TimelineEvent::new(&target, EventKind::Started));
        timeline.add_event("2024-06-02", TimelineEvent::new(&target, EventKind::Updated));

        assert_eq!(timeline.remove_events_by_task(DAY, target.id), 2);
        assert_eq!(timeline.events_for_date(DAY).len(), 1);
        assert_eq!(timeline.events_for_date(DAY)[0].task_id, other.id);
        assert_eq!(timeline.events_for_date("2024-06-02").len(), 1);
        assert_eq!(timeline.remove_events_by_task("1999-01-01", target.id), 0);
    }

    #[test]
    fn test_clear_date() {
        let mut timeline = Timeline::new();
        let task = Task::new("Task", DAY);
        timeline.add_event(DAY, TimelineEvent::new(&task, EventKind::Created));
        timeline.add_event("2024-06-02", TimelineEvent::new(&task, EventKind::Created));

        assert_eq!(timeline.clear_date(DAY), 1);
        assert!(timeline.events_for_date(DAY).is_empty());
        assert!(!timeline.is_empty());
        assert_eq!(timeline.clear_date(DAY), 0);
    }

    #[test]
    fn test_event_serializes_type_field() {
        let task = Task::new("Task", DAY);
        let event = TimelineEvent::state_change(&task, TaskState::Todo, TaskState::Delegated);
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "delegated");
        assert_eq!(value["previousState"], "todo");
        assert_eq!(value["newState"], "delegated");
        assert_eq!(value["taskTitle"], "Task");
    }
}
