use crate::app::AppState;
use crate::domain::{CalendarDate, CalendarGrid, Pane, TaskTree};
use crate::ui::theme::Theme;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const WEEKDAYS: [&str; 7] = [" Su ", " Mo ", " Tu ", " We ", " Th ", " Fr ", " Sa "];

/// Style for one day cell. Selection wins over today, which wins over the rest.
fn day_style(
    theme: &Theme,
    cell_date: CalendarDate,
    selected: CalendarDate,
    in_month: bool,
    has_tasks: bool,
) -> Style {
    let palette = &theme.palette;
    if cell_date == selected {
        theme.selected_style()
    } else if cell_date.is_today() {
        Style::default()
            .fg(palette.calendar_today)
            .add_modifier(Modifier::BOLD)
    } else if !in_month {
        Style::default().fg(palette.calendar_other_month)
    } else if has_tasks {
        Style::default().fg(palette.calendar_with_tasks)
    } else {
        theme.text_style()
    }
}

/// Month header, weekday row and six week rows for `viewing`
pub fn calendar_lines(
    tasks: &TaskTree,
    viewing: CalendarDate,
    selected: CalendarDate,
    theme: &Theme,
) -> Vec<Line<'static>> {
    let grid = CalendarGrid::generate(viewing);
    let mut lines = Vec::with_capacity(grid.weeks.len() + 3);

    lines.push(Line::from(Span::styled(
        format!("{} {}", viewing.month_name(), viewing.year()),
        theme.title_style(),
    )));
    lines.push(Line::raw(""));
    lines.push(Line::from(
        WEEKDAYS
            .iter()
            .map(|wd| Span::styled(*wd, theme.muted_style()))
            .collect::<Vec<_>>(),
    ));

    for week in &grid.weeks {
        let spans: Vec<Span> = week
            .iter()
            .map(|cell| {
                let has_tasks = !tasks.tasks_for_date(&cell.date.key()).is_empty();
                let text = if cell.date == selected {
                    format!("[{:>2}]", cell.date.day())
                } else {
                    format!(" {:>2} ", cell.date.day())
                };
                Span::styled(
                    text,
                    day_style(theme, cell.date, selected, cell.in_month, has_tasks),
                )
            })
            .collect();
        lines.push(Line::from(spans));
    }

    lines
}

/// Render the calendar pane
pub fn render_calendar_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let theme = &app.theme;
    let lines = calendar_lines(&app.tasks, app.viewing_month, app.selected_date, theme);

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border_style(app.pane == Pane::Calendar))
            .title(Span::styled(" 1 Calendar ", theme.title_style())),
    );

    f.render_widget(paragraph, area);
}
