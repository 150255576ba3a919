use crate::core::selector::{classify_day, SelectionContext};
use crate::domain::model::{CalendarDate, DayStatus, Selection};
use crate::utils::error::BookingError;
use chrono::Datelike;
use serde::Serialize;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    pub date: CalendarDate,
    pub status: DayStatus,
}

/// One month laid out for a Monday-first grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthView {
    pub year: i32,
    pub month: u32,
    /// Empty cells before the 1st.
    pub leading_blanks: u32,
    pub days: Vec<CalendarDay>,
}

/// The month currently shown in the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthCursor {
    year: i32,
    month: u32,
}

impl MonthCursor {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn containing(date: CalendarDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn previous(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                month: self.month - 1,
                ..self
            }
        }
    }

    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                month: self.month + 1,
                ..self
            }
        }
    }

    pub fn first_day(&self) -> Option<CalendarDate> {
        CalendarDate::from_ymd(self.year, self.month, 1)
    }

    pub fn days(&self) -> impl Iterator<Item = CalendarDate> {
        let month = self.month;
        self.first_day()
            .into_iter()
            .flat_map(|first| first.as_naive().iter_days())
            .take_while(move |d| d.month() == month)
            .map(CalendarDate::from)
    }

    pub fn render(&self, selection: Selection, ctx: &SelectionContext<'_>) -> MonthView {
        let leading_blanks = self
            .first_day()
            .map(|d| d.weekday().num_days_from_monday())
            .unwrap_or(0);

        let days = self
            .days()
            .map(|date| CalendarDay {
                date,
                status: classify_day(date, selection, ctx),
            })
            .collect();

        MonthView {
            year: self.year,
            month: self.month,
            leading_blanks,
            days,
        }
    }
}

impl FromStr for MonthCursor {
    type Err = BookingError;

    /// Parses `YYYY-MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || BookingError::InvalidDate {
            value: s.to_string(),
        };
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year = year.parse().map_err(|_| invalid())?;
        let month = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).ok_or_else(invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::availability::AvailabilityStore;
    use crate::domain::model::{BookedDates, SelectionMode};

    fn date(m: u32, d: u32) -> CalendarDate {
        CalendarDate::from_ymd(2026, m, d).unwrap()
    }

    #[test]
    fn test_month_layout() {
        let availability = AvailabilityStore::empty();
        let ctx = SelectionContext {
            today: date(1, 1),
            mode: SelectionMode::Booking,
            availability: &availability,
        };

        // June 2026 starts on a Monday
        let june = MonthCursor::new(2026, 6).unwrap().render(Selection::Empty, &ctx);
        assert_eq!(june.leading_blanks, 0);
        assert_eq!(june.days.len(), 30);

        // February 2026 starts on a Sunday
        let feb = MonthCursor::new(2026, 2).unwrap().render(Selection::Empty, &ctx);
        assert_eq!(feb.leading_blanks, 6);
        assert_eq!(feb.days.len(), 28);
        assert_eq!(feb.days.last().unwrap().date, date(2, 28));

        let dec = MonthCursor::new(2026, 12).unwrap();
        assert_eq!(dec.days().count(), 31);
    }

    #[test]
    fn test_navigation_wraps_years() {
        let jan = MonthCursor::new(2027, 1).unwrap();
        assert_eq!(jan.previous(), MonthCursor::new(2026, 12).unwrap());
        assert_eq!(jan.previous().next(), jan);
        assert!(MonthCursor::new(2026, 13).is_none());
        assert_eq!(MonthCursor::containing(date(6, 17)).month(), 6);

        assert_eq!("2026-06".parse::<MonthCursor>().unwrap(), MonthCursor::new(2026, 6).unwrap());
        assert!("2026-00".parse::<MonthCursor>().is_err());
        assert!("June".parse::<MonthCursor>().is_err());
    }

    #[test]
    fn test_render_classifies_days() {
        let availability = AvailabilityStore::from_booked_dates(BookedDates {
            booked: vec![date(6, 20)],
            paid: vec![],
        });
        let ctx = SelectionContext {
            today: date(6, 5),
            mode: SelectionMode::Booking,
            availability: &availability,
        };
        let selection = Selection::Complete {
            check_in: date(6, 8),
            check_out: date(6, 11),
        };

        let view = MonthCursor::new(2026, 6).unwrap().render(selection, &ctx);
        let status = |d: u32| view.days[(d - 1) as usize].status;

        assert_eq!(status(4), DayStatus::Disabled);
        assert_eq!(status(5), DayStatus::Free);
        assert_eq!(status(8), DayStatus::SelectedEndpoint);
        assert_eq!(status(9), DayStatus::InRange);
        assert_eq!(status(11), DayStatus::SelectedEndpoint);
        assert_eq!(status(20), DayStatus::Unavailable);
    }
}
