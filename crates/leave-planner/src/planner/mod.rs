//! Year/month/day structures for planning views.
//!
//! Grids carry no leave data; overlaying requests is left to the presentation
//! layer.

use chrono::{Datelike, Local, NaiveDate};
use serde::Serialize;
use tracing::debug;

use crate::leave::dates::{add_months, dates_equal, days_in_month, is_weekend};
use crate::leave::domain::LeaveRequest;

const MONTHS_PER_YEAR: u32 = 12;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthDescriptor {
    /// First day of the month.
    pub date: NaiveDate,
    pub days: Vec<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub is_current_month: bool,
    pub is_weekend: bool,
    pub is_today: bool,
    pub leaves: Vec<LeaveRequest>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearDirection {
    Previous,
    Next,
}

impl YearDirection {
    const fn months(self) -> i32 {
        match self {
            Self::Previous => -12,
            Self::Next => 12,
        }
    }
}

/// The twelve months of `year`, January first.
pub fn month_grid(year: i32) -> Vec<MonthDescriptor> {
    (1..=MONTHS_PER_YEAR)
        .filter_map(|month| {
            NaiveDate::from_ymd_opt(year, month, 1).map(|date| MonthDescriptor {
                date,
                days: days_in_month(year, month),
            })
        })
        .collect()
}

/// Year view anchored on a reference date.
///
/// The month set is cached per reference date and rebuilt only when
/// navigation moves the reference.
#[derive(Debug, Clone)]
pub struct YearPlanner {
    reference: NaiveDate,
    today: NaiveDate,
    cache_key: NaiveDate,
    months: Vec<MonthDescriptor>,
}

impl YearPlanner {
    pub fn new(reference: NaiveDate, today: NaiveDate) -> Self {
        Self {
            reference,
            today,
            cache_key: reference,
            months: month_grid(reference.year()),
        }
    }

    /// Planner for the current local date, used both as reference and "today".
    pub fn for_today() -> Self {
        let today = Local::now().date_naive();
        Self::new(today, today)
    }

    pub fn reference(&self) -> NaiveDate {
        self.reference
    }

    pub fn year(&self) -> i32 {
        self.reference.year()
    }

    pub fn months(&self) -> &[MonthDescriptor] {
        &self.months
    }

    /// Day cells for the zero-based `month_index`; `None` past December.
    pub fn day_grid(&self, month_index: usize) -> Option<Vec<CalendarDay>> {
        let month = self.months.get(month_index)?;
        Some(
            month
                .days
                .iter()
                .map(|date| CalendarDay {
                    date: *date,
                    is_current_month: true,
                    is_weekend: is_weekend(date),
                    is_today: dates_equal(date, &self.today),
                    leaves: Vec::new(),
                })
                .collect(),
        )
    }

    /// Moves the reference one year back or forward. At the edge of the
    /// supported calendar range the reference stays put.
    pub fn navigate_year(&mut self, direction: YearDirection) {
        if let Some(reference) = add_months(self.reference, direction.months()) {
            self.reference = reference;
        }
        self.refresh();
    }

    fn refresh(&mut self) {
        if self.cache_key == self.reference {
            return;
        }
        debug!(reference = %self.reference, "rebuilding planner months");
        self.months = month_grid(self.reference.year());
        self.cache_key = self.reference;
    }
}
