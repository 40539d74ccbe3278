use super::enums::{Priority, TaskState};
use super::task::Task;
use std::fmt;
use std::slice;
use uuid::Uuid;

/// A row of the visible task list. Holds the ID, never a reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewRow {
    pub id: Uuid,
    /// Depth in the tree (0 = top-level task)
    pub depth: usize,
}

/// Pre-order walk over a task forest yielding `(task, depth)`
#[derive(Debug, Clone)]
pub struct Flatten<'a> {
    stack: Vec<(slice::Iter<'a, Task>, usize)>,
    expanded_only: bool,
}

impl<'a> Iterator for Flatten<'a> {
    type Item = (&'a Task, usize);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (iter, depth) = self.stack.last_mut()?;
            let depth = *depth;
            match iter.next() {
                Some(task) => {
                    let descend = !task.children.is_empty() && (task.expanded || !self.expanded_only);
                    if descend {
                        self.stack.push((task.children.iter(), depth + 1));
                    }
                    return Some((task, depth));
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

/// Flatten a hierarchy. With `expanded_only`, collapsed subtrees are skipped entirely.
pub fn flatten(tasks: &[Task], expanded_only: bool) -> Flatten<'_> {
    Flatten {
        stack: vec![(tasks.iter(), 0)],
        expanded_only,
    }
}

/// Structured filter picked in filter-pending mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskFilter {
    State(TaskState),
    Priority(Priority),
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            Self::State(state) => task.state == *state,
            Self::Priority(priority) => task.priority == *priority,
        }
    }
}

impl fmt::Display for TaskFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::State(state) => write!(f, "state: {}", state),
            Self::Priority(priority) => write!(f, "priority: {}", priority.badge()),
        }
    }
}

/// Case-insensitive substring match; an empty query matches everything
pub fn title_matches(task: &Task, query: &str) -> bool {
    query.is_empty() || task.title.to_lowercase().contains(&query.to_lowercase())
}

/// Visible rows: expanded tasks, then the search query, then the structured filter
pub fn build_view(tasks: &[Task], query: &str, filter: Option<TaskFilter>) -> Vec<ViewRow> {
    flatten(tasks, true)
        .filter(|(task, _)| title_matches(task, query))
        .filter(|(task, _)| filter.map_or(true, |f| f.matches(task)))
        .map(|(task, depth)| ViewRow { id: task.id, depth })
        .collect()
}

/// Completion counts over a whole forest, collapsed or not
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
}

impl TaskStats {
    /// Whole-number percentage complete; zero for an empty list
    pub fn percent(&self) -> u16 {
        if self.total == 0 {
            return 0;
        }
        ((self.completed * 100) / self.total) as u16
    }
}

pub fn task_stats(tasks: &[Task]) -> TaskStats {
    flatten(tasks, false).fold(TaskStats::default(), |mut stats, (task, _)| {
        stats.total += 1;
        if task.state == TaskState::Completed {
            stats.completed += 1;
        }
        stats
    })
}
