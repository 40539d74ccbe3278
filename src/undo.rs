use crate::domain::{TaskTree, Timeline};
use std::collections::VecDeque;

pub const DEFAULT_UNDO_CAPACITY: usize = 50;

/// Independent copy of the task tree and timeline
#[derive(Debug, Clone, PartialEq)]
pub struct UndoState {
    pub tasks: TaskTree,
    pub timeline: Timeline,
}

/// Bounded stack of whole-model snapshots. The oldest entry is evicted on overflow.
#[derive(Debug, Clone)]
pub struct UndoStack {
    entries: VecDeque<UndoState>,
    capacity: usize,
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new(DEFAULT_UNDO_CAPACITY)
    }
}

impl UndoStack {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Snapshot the current model. Later edits to `tasks`/`timeline` don't reach the copy.
    pub fn push(&mut self, tasks: &TaskTree, timeline: &Timeline) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(UndoState {
            tasks: tasks.clone(),
            timeline: timeline.clone(),
        });
    }

    pub fn pop(&mut self) -> Option<UndoState> {
        self.entries.pop_back()
    }

    /// Replace the model with the most recent snapshot; `false` when there is none
    pub fn restore(&mut self, tasks: &mut TaskTree, timeline: &mut Timeline) -> bool {
        match self.pop() {
            Some(state) => {
                *tasks = state.tasks;
                *timeline = state.timeline;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EventKind, Task, TaskState, TimelineEvent};
    use pretty_assertions::assert_eq;

    const DAY: &str = "2024-06-01";

    fn model() -> (TaskTree, Timeline) {
        let mut tasks = TaskTree::new();
        let mut timeline = Timeline::new();
        let mut parent = Task::new("Parent", DAY);
        parent.add_child(Task::new("Child", DAY));
        timeline.add_event(DAY, TimelineEvent::new(&parent, EventKind::Created));
        tasks.add_task(parent);
        (tasks, timeline)
    }

    #[test]
    fn test_push_pop_restores_despite_mutation() {
        let (mut tasks, mut timeline) = model();
        let before = (tasks.clone(), timeline.clone());
        let mut stack = UndoStack::default();

        stack.push(&tasks, &timeline);

        // Mutate deep inside the tree after the snapshot
        let parent_id = tasks.tasks_for_date(DAY)[0].id;
        let parent = tasks.find_mut(DAY, parent_id).unwrap();
        parent.children[0].rename("Changed");
        parent.set_state(TaskState::Completed);
        timeline.clear_date(DAY);

        assert!(stack.restore(&mut tasks, &mut timeline));
        assert_eq!(tasks, before.0);
        assert_eq!(timeline, before.1);
        assert!(stack.is_empty());
    }

    #[test]
    fn test_restore_empty_is_noop() {
        let (mut tasks, mut timeline) = model();
        let before = tasks.clone();
        let mut stack = UndoStack::default();
        assert!(!stack.restore(&mut tasks, &mut timeline));
        assert_eq!(tasks, before);
    }

    #[test]
    fn test_capacity_never_exceeded() {
        let (mut tasks, timeline) = model();
        let mut stack = UndoStack::new(DEFAULT_UNDO_CAPACITY);
        for i in 0..DEFAULT_UNDO_CAPACITY + 10 {
            tasks.add_task(Task::new(format!("Task {}", i), DAY));
            stack.push(&tasks, &timeline);
            assert!(stack.len() <= stack.capacity());
        }
        assert_eq!(stack.len(), DEFAULT_UNDO_CAPACITY);
    }

    #[test]
    fn test_overflow_evicts_oldest() {
        let timeline = Timeline::new();
        let mut tasks = TaskTree::new();
        let mut stack = UndoStack::new(2);

        for title in ["one", "two", "three"] {
            tasks.add_task(Task::new(title, DAY));
            stack.push(&tasks, &timeline);
        }

        assert_eq!(stack.len(), 2);
        assert_eq!(stack.pop().unwrap().tasks.tasks_for_date(DAY).len(), 3);
        assert_eq!(stack.pop().unwrap().tasks.tasks_for_date(DAY).len(), 2);
        assert!(stack.pop().is_none());
    }

    #[test]
    fn test_zero_capacity_keeps_nothing() {
        let (tasks, timeline) = model();
        let mut stack = UndoStack::new(0);
        stack.push(&tasks, &timeline);
        assert!(stack.is_empty());
    }
}
