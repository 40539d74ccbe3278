use chrono::{Datelike, Duration, Local, Months, NaiveDate, Weekday};
use std::fmt;
use std::str::FromStr;

/// Key format used to index tasks and timeline events by day
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// A calendar day. Arithmetic always yields a valid, normalized date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    /// Build from a year/month/day triple, `None` if the triple is not a real day
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Canonical `YYYY-MM-DD` key
    pub fn key(&self) -> String {
        self.0.format(DATE_KEY_FORMAT).to_string()
    }

    /// Shift by whole days. Saturates at the edges of the representable range.
    pub fn add_days(&self, days: i64) -> Self {
        let shifted = Duration::try_days(days).and_then(|delta| self.0.checked_add_signed(delta));
        match shifted {
            Some(date) => Self(date),
            None if days < 0 => Self(NaiveDate::MIN),
            None => Self(NaiveDate::MAX),
        }
    }

    /// Shift by whole months, clamping the day to the target month's length
    /// (Jan 31 + 1 month is the last day of February).
    pub fn add_months(&self, months: i32) -> Self {
        let step = Months::new(months.unsigned_abs());
        let shifted = if months >= 0 {
            self.0.checked_add_months(step)
        } else {
            self.0.checked_sub_months(step)
        };
        match shifted {
            Some(date) => Self(date),
            None if months < 0 => Self(NaiveDate::MIN),
            None => Self(NaiveDate::MAX),
        }
    }

    pub fn first_day_of_month(&self) -> Self {
        Self(self.0.with_day(1).unwrap_or(self.0))
    }

    pub fn days_in_month(&self) -> u32 {
        let (year, month) = if self.month() == 12 {
            (self.year() + 1, 1)
        } else {
            (self.year(), self.month() + 1)
        };
        NaiveDate::from_ymd_opt(year, month, 1)
            .and_then(|first_of_next| first_of_next.pred_opt())
            .map(|last| last.day())
            .unwrap_or(31)
    }

    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    pub fn is_today(&self) -> bool {
        *self == Self::today()
    }

    pub fn is_same_month(&self, other: &CalendarDate) -> bool {
        self.year() == other.year() && self.month() == other.month()
    }

    pub fn month_name(&self) -> String {
        self.0.format("%B").to_string()
    }

    pub fn short_month_name(&self) -> String {
        self.0.format("%b").to_string()
    }

    /// Long human form, e.g. "Saturday, June 1, 2024"
    pub fn long_label(&self) -> String {
        self.0.format("%A, %B %-d, %Y").to_string()
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_KEY_FORMAT))
    }
}

impl FromStr for CalendarDate {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, DATE_KEY_FORMAT).map(Self)
    }
}

/// One day in a month grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
    pub date: CalendarDate,
    /// False for the leading/trailing days borrowed from adjacent months
    pub in_month: bool,
}

pub const GRID_WEEKS: usize = 6;
pub const GRID_DAYS: usize = 7;

/// Six Sunday-first weeks covering a month
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarGrid {
    pub year: i32,
    pub month: u32,
    pub weeks: [[GridCell; GRID_DAYS]; GRID_WEEKS],
}

impl CalendarGrid {
    /// Lay out the month containing `anchor`, starting at the Sunday on or before the 1st
    pub fn generate(anchor: CalendarDate) -> Self {
        let first = anchor.first_day_of_month();
        let offset = first.weekday().num_days_from_sunday() as i64;
        let start = first.add_days(-offset);

        let placeholder = GridCell {
            date: start,
            in_month: false,
        };
        let mut weeks = [[placeholder; GRID_DAYS]; GRID_WEEKS];

        let mut current = start;
        for week in weeks.iter_mut() {
            for cell in week.iter_mut() {
                *cell = GridCell {
                    date: current,
                    in_month: current.is_same_month(&anchor),
                };
                current = current.add_days(1);
            }
        }

        Self {
            year: anchor.year(),
            month: anchor.month(),
            weeks,
        }
    }

    /// All 42 cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = &GridCell> {
        self.weeks.iter().flat_map(|week| week.iter())
    }

    pub fn contains(&self, date: CalendarDate) -> bool {
        self.cells().any(|cell| cell.date == date)
    }

    pub fn is_current_month(&self, date: CalendarDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}
