use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskState {
    #[default]
    Todo,
    Completed,
    Delegated,
    Delayed,
}

impl TaskState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::Completed => "completed",
            Self::Delegated => "delegated",
            Self::Delayed => "delayed",
        }
    }

    /// Checkbox glyph used in lists and plain-text export
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Todo => "○",
            Self::Completed => "●",
            Self::Delegated => "→",
            Self::Delayed => "‖",
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Task priority, persisted as 0 (none) through 3 (low)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Priority {
    #[default]
    None,
    High,
    Medium,
    Low,
}

impl Priority {
    /// Short badge like "P1"; empty for no priority
    pub fn badge(&self) -> &'static str {
        match self {
            Self::None => "",
            Self::High => "P1",
            Self::Medium => "P2",
            Self::Low => "P3",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::High => "P1 (Critical)",
            Self::Medium => "P2 (Important)",
            Self::Low => "P3 (Normal)",
        }
    }
}

impl From<Priority> for u8 {
    fn from(priority: Priority) -> u8 {
        match priority {
            Priority::None => 0,
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
        }
    }
}

impl TryFrom<u8> for Priority {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::High),
            2 => Ok(Self::Medium),
            3 => Ok(Self::Low),
            other => Err(format!("invalid priority {}", other)),
        }
    }
}

/// Which pane has keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pane {
    Calendar,
    #[default]
    Tasks,
    Timeline,
}

impl Pane {
    pub fn next(self) -> Self {
        match self {
            Self::Calendar => Self::Tasks,
            Self::Tasks => Self::Timeline,
            Self::Timeline => Self::Calendar,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Calendar => Self::Timeline,
            Self::Tasks => Self::Calendar,
            Self::Timeline => Self::Tasks,
        }
    }
}

/// How keystrokes are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing a task title (new task, new subtask or rename)
    TextInput,
    /// Typing a live search query
    Search,
    /// Waiting for the key that picks a state/priority filter
    FilterPending,
}

/// Modal dialog currently on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialog {
    #[default]
    None,
    Help,
    Theme,
    Export,
    ConfirmClearTimeline,
    TaskDetail,
}
