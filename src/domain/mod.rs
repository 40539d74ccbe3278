pub mod calendar;
pub mod enums;
pub mod task;
pub mod timeline;
pub mod views;

pub use calendar::{CalendarDate, CalendarGrid, GridCell};
pub use enums::{Dialog, InputMode, Pane, Priority, TaskState};
pub use task::{Task, TaskTree};
pub use timeline::{EventKind, Timeline, TimelineEvent};
pub use views::{build_view, flatten, task_stats, TaskFilter, TaskStats, ViewRow};
