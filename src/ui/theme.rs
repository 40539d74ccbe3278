use crate::domain::{Priority, TaskState};
use ratatui::style::{Color, Modifier, Style};

pub const DEFAULT_THEME: &str = "ultraviolet";

/// Theme names in the order the theme dialog lists them
pub const THEME_NAMES: [&str; 4] = ["ultraviolet", "terminal", "minimal", "nord"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub surface: Color,
    pub border: Color,

    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,

    pub primary: Color,
    pub secondary: Color,
    pub accent: Color,

    pub success: Color,
    pub warning: Color,
    pub error: Color,

    pub calendar_today: Color,
    pub calendar_with_tasks: Color,
    pub calendar_other_month: Color,

    pub task_todo: Color,
    pub task_completed: Color,
    pub task_delegated: Color,
    pub task_delayed: Color,
    pub task_running: Color,

    pub priority_high: Color,
    pub priority_medium: Color,
    pub priority_low: Color,
}

const fn hex(rgb: u32) -> Color {
    Color::Rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
}

const ULTRAVIOLET: Palette = Palette {
    background: hex(0x0d0d14),
    surface: hex(0x1a1625),
    border: hex(0x2d2640),
    text_primary: hex(0xe5e7eb),
    text_secondary: hex(0x9ca3af),
    text_muted: hex(0x6b7280),
    primary: hex(0xa855f7),
    secondary: hex(0xc084fc),
    accent: hex(0xe879f9),
    success: hex(0x22d3ee),
    warning: hex(0xf59e0b),
    error: hex(0xf43f5e),
    calendar_today: hex(0x22d3ee),
    calendar_with_tasks: hex(0xc084fc),
    calendar_other_month: hex(0x4b5563),
    task_todo: hex(0xe5e7eb),
    task_completed: hex(0x22d3ee),
    task_delegated: hex(0xc084fc),
    task_delayed: hex(0xf59e0b),
    task_running: hex(0xe879f9),
    priority_high: hex(0xf43f5e),
    priority_medium: hex(0xf59e0b),
    priority_low: hex(0x9ca3af),
};

const TERMINAL: Palette = Palette {
    background: hex(0x000000),
    surface: hex(0x0a0a0a),
    border: hex(0x333333),
    text_primary: hex(0x00ff00),
    text_secondary: hex(0x00cc00),
    text_muted: hex(0x006600),
    primary: hex(0x00ff00),
    secondary: hex(0xffb000),
    accent: hex(0xff6600),
    success: hex(0x00ff00),
    warning: hex(0xffb000),
    error: hex(0xff0000),
    calendar_today: hex(0xffb000),
    calendar_with_tasks: hex(0x00cc00),
    calendar_other_month: hex(0x333333),
    task_todo: hex(0x00ff00),
    task_completed: hex(0x006600),
    task_delegated: hex(0xffb000),
    task_delayed: hex(0xff6600),
    task_running: hex(0x00ffff),
    priority_high: hex(0xff0000),
    priority_medium: hex(0xffb000),
    priority_low: hex(0x006600),
};

const MINIMAL: Palette = Palette {
    background: hex(0x1a1a1a),
    surface: hex(0x262626),
    border: hex(0x404040),
    text_primary: hex(0xffffff),
    text_secondary: hex(0xa3a3a3),
    text_muted: hex(0x737373),
    primary: hex(0xffffff),
    secondary: hex(0xd4d4d4),
    accent: hex(0xa3a3a3),
    success: hex(0xffffff),
    warning: hex(0xd4d4d4),
    error: hex(0xa3a3a3),
    calendar_today: hex(0xffffff),
    calendar_with_tasks: hex(0xd4d4d4),
    calendar_other_month: hex(0x525252),
    task_todo: hex(0xffffff),
    task_completed: hex(0x737373),
    task_delegated: hex(0xa3a3a3),
    task_delayed: hex(0xd4d4d4),
    task_running: hex(0xffffff),
    priority_high: hex(0xffffff),
    priority_medium: hex(0xd4d4d4),
    priority_low: hex(0xa3a3a3),
};

const NORD: Palette = Palette {
    background: hex(0x2e3440),
    surface: hex(0x3b4252),
    border: hex(0x4c566a),
    text_primary: hex(0xeceff4),
    text_secondary: hex(0xe5e9f0),
    text_muted: hex(0xd8dee9),
    primary: hex(0x88c0d0),
    secondary: hex(0x81a1c1),
    accent: hex(0x5e81ac),
    success: hex(0xa3be8c),
    warning: hex(0xebcb8b),
    error: hex(0xbf616a),
    calendar_today: hex(0xa3be8c),
    calendar_with_tasks: hex(0x81a1c1),
    calendar_other_month: hex(0x4c566a),
    task_todo: hex(0xeceff4),
    task_completed: hex(0xa3be8c),
    task_delegated: hex(0xb48ead),
    task_delayed: hex(0xebcb8b),
    task_running: hex(0x88c0d0),
    priority_high: hex(0xbf616a),
    priority_medium: hex(0xebcb8b),
    priority_low: hex(0x4c566a),
};

/// Named colour scheme. Passed explicitly to every render function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub name: &'static str,
    pub palette: Palette,
}

impl Default for Theme {
    fn default() -> Self {
        Self::ultraviolet()
    }
}

impl Theme {
    pub fn ultraviolet() -> Self {
        Self {
            name: "ultraviolet",
            palette: ULTRAVIOLET,
        }
    }

    /// Look up a theme by name
    pub fn by_name(name: &str) -> Option<Self> {
        let palette = match name {
            "ultraviolet" => ULTRAVIOLET,
            "terminal" => TERMINAL,
            "minimal" => MINIMAL,
            "nord" => NORD,
            _ => return None,
        };
        let name = THEME_NAMES.iter().find(|candidate| **candidate == name)?;
        Some(Self { name, palette })
    }

    /// Look up by name, falling back to the default for unknown names
    pub fn by_name_or_default(name: &str) -> Self {
        Self::by_name(name).unwrap_or_default()
    }

    /// 1-based position as listed in the theme dialog
    pub fn by_number(number: usize) -> Option<Self> {
        let name = THEME_NAMES.get(number.checked_sub(1)?)?;
        Self::by_name(name)
    }

    pub fn base_style(&self) -> Style {
        Style::default().fg(self.palette.text_primary).bg(self.palette.background)
    }

    pub fn text_style(&self) -> Style {
        Style::default().fg(self.palette.text_primary)
    }

    pub fn secondary_style(&self) -> Style {
        Style::default().fg(self.palette.text_secondary)
    }

    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.palette.text_muted)
    }

    pub fn selected_style(&self) -> Style {
        Style::default()
            .fg(self.palette.background)
            .bg(self.palette.primary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn title_style(&self) -> Style {
        Style::default().fg(self.palette.primary).add_modifier(Modifier::BOLD)
    }

    /// Pane border, brighter when the pane has focus
    pub fn border_style(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.palette.primary)
        } else {
            Style::default().fg(self.palette.border)
        }
    }

    pub fn modal_style(&self) -> Style {
        Style::default().fg(self.palette.text_primary).bg(self.palette.surface)
    }

    pub fn modal_title_style(&self) -> Style {
        Style::default().fg(self.palette.accent).add_modifier(Modifier::BOLD)
    }

    pub fn hint_style(&self) -> Style {
        Style::default().fg(self.palette.text_muted)
    }

    pub fn key_style(&self) -> Style {
        Style::default().fg(self.palette.secondary).add_modifier(Modifier::BOLD)
    }

    pub fn success_style(&self) -> Style {
        Style::default().fg(self.palette.success)
    }

    pub fn warning_style(&self) -> Style {
        Style::default().fg(self.palette.warning).add_modifier(Modifier::BOLD)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.palette.error).add_modifier(Modifier::BOLD)
    }

    pub fn state_style(&self, state: TaskState, running: bool) -> Style {
        if running {
            return Style::default()
                .fg(self.palette.task_running)
                .add_modifier(Modifier::BOLD);
        }
        match state {
            TaskState::Todo => Style::default().fg(self.palette.task_todo),
            TaskState::Completed => Style::default()
                .fg(self.palette.task_completed)
                .add_modifier(Modifier::CROSSED_OUT),
            TaskState::Delegated => Style::default().fg(self.palette.task_delegated),
            TaskState::Delayed => Style::default().fg(self.palette.task_delayed),
        }
    }

    pub fn priority_style(&self, priority: Priority) -> Style {
        match priority {
            Priority::None => self.muted_style(),
            Priority::High => Style::default()
                .fg(self.palette.priority_high)
                .add_modifier(Modifier::BOLD),
            Priority::Medium => Style::default().fg(self.palette.priority_medium),
            Priority::Low => Style::default().fg(self.palette.priority_low),
        }
    }

    pub fn tree_style(&self) -> Style {
        Style::default().fg(self.palette.border)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_by_name() {
        assert_eq!(Theme::by_name("nord").unwrap().name, "nord");
        assert!(Theme::by_name("solarized").is_none());
        assert_eq!(Theme::by_name_or_default("solarized").name, DEFAULT_THEME);
    }

    #[test]
    fn test_by_number_matches_dialog_order() {
        for (idx, name) in THEME_NAMES.iter().enumerate() {
            assert_eq!(Theme::by_number(idx + 1).unwrap().name, *name);
        }
        assert!(Theme::by_number(0).is_none());
        assert!(Theme::by_number(5).is_none());
    }

    #[test]
    fn test_hex_colour() {
        assert_eq!(hex(0xa855f7), Color::Rgb(0xa8, 0x55, 0xf7));
        assert_eq!(Theme::default().palette.primary, Color::Rgb(0xa8, 0x55, 0xf7));
    }
}
