//! Check-in / check-out selection driven by calendar clicks.
//!
//! The selector moves between three states: nothing picked, a check-in
//! waiting for its check-out, and a complete stay. In booking mode a stay can
//! only be completed when every day from check-in through check-out is free.

use crate::core::availability::AvailabilityStore;
use crate::domain::model::{CalendarDate, DayStatus, Selection, SelectionMode};
use crate::utils::error::{BookingError, Result};

/// Everything a click is judged against besides the current selection.
#[derive(Debug, Clone, Copy)]
pub struct SelectionContext<'a> {
    pub today: CalendarDate,
    pub mode: SelectionMode,
    pub availability: &'a AvailabilityStore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    Past,
    Unavailable,
    /// The wizard has left the dates step.
    Locked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    Ignored(IgnoreReason),
    Started(CalendarDate),
    Completed {
        check_in: CalendarDate,
        check_out: CalendarDate,
    },
}

#[derive(Debug, Clone, Default)]
pub struct DateRangeSelector {
    selection: Selection,
}

impl DateRangeSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn clear(&mut self) {
        self.selection = Selection::Empty;
    }

    /// Applies a click on `date`.
    ///
    /// Past days, and unavailable days in booking mode, are ignored. A range
    /// that would cross an unavailable day in booking mode is rejected with
    /// [`BookingError::RangeConflict`] and the pending check-in is kept.
    pub fn click_date(
        &mut self,
        date: CalendarDate,
        ctx: &SelectionContext<'_>,
    ) -> Result<ClickOutcome> {
        if date < ctx.today {
            return Ok(ClickOutcome::Ignored(IgnoreReason::Past));
        }
        let constrained = ctx.mode.respects_availability();
        if constrained && ctx.availability.is_unavailable(date) {
            return Ok(ClickOutcome::Ignored(IgnoreReason::Unavailable));
        }

        match self.selection {
            Selection::Partial { check_in } if date > check_in => {
                if constrained {
                    if let Some(conflict) = ctx.availability.first_conflict(check_in, date) {
                        tracing::info!(
                            "Rejected range {}..={}: {} is unavailable",
                            check_in,
                            date,
                            conflict
                        );
                        return Err(BookingError::RangeConflict {
                            check_in,
                            check_out: date,
                            conflict,
                        });
                    }
                }
                tracing::debug!("Selected stay {} -> {}", check_in, date);
                self.selection = Selection::Complete {
                    check_in,
                    check_out: date,
                };
                Ok(ClickOutcome::Completed {
                    check_in,
                    check_out: date,
                })
            }
            _ => {
                tracing::debug!("Check-in set to {}", date);
                self.selection = Selection::Partial { check_in: date };
                Ok(ClickOutcome::Started(date))
            }
        }
    }

    pub fn classify(&self, date: CalendarDate, ctx: &SelectionContext<'_>) -> DayStatus {
        classify_day(date, self.selection, ctx)
    }
}

/// Display status of a day; earlier checks win.
pub fn classify_day(
    date: CalendarDate,
    selection: Selection,
    ctx: &SelectionContext<'_>,
) -> DayStatus {
    if date < ctx.today {
        DayStatus::Disabled
    } else if ctx.availability.is_unavailable(date) {
        DayStatus::Unavailable
    } else if selection.is_endpoint(date) {
        DayStatus::SelectedEndpoint
    } else if selection.is_inside(date) {
        DayStatus::InRange
    } else {
        DayStatus::Free
    }
}
