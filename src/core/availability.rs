use crate::domain::model::{BookedDates, CalendarDate};
use crate::domain::ports::ReservationService;
use std::collections::BTreeSet;

/// Dates that cannot be booked, loaded once from the reservation service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvailabilityStore {
    booked: BTreeSet<CalendarDate>,
    paid: BTreeSet<CalendarDate>,
    loaded: bool,
}

impl AvailabilityStore {
    /// A store with nothing reserved, used until the load finishes.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_booked_dates(dates: BookedDates) -> Self {
        Self {
            booked: dates.booked.into_iter().collect(),
            paid: dates.paid.into_iter().collect(),
            loaded: true,
        }
    }

    /// Fetches reserved dates. A failed fetch yields an empty store so the
    /// calendar stays usable.
    pub async fn load<S: ReservationService + ?Sized>(service: &S) -> Self {
        match service.booked_dates().await {
            Ok(dates) => {
                let store = Self::from_booked_dates(dates);
                tracing::info!(
                    "Loaded availability: {} booked, {} paid",
                    store.booked.len(),
                    store.paid.len()
                );
                store
            }
            Err(e) => {
                tracing::warn!("Failed to load booked dates, treating all dates as free: {}", e);
                Self::empty()
            }
        }
    }

    pub fn is_unavailable(&self, date: CalendarDate) -> bool {
        self.booked.contains(&date) || self.paid.contains(&date)
    }

    /// First unavailable day of the closed range `[start, end]`.
    pub fn first_conflict(&self, start: CalendarDate, end: CalendarDate) -> Option<CalendarDate> {
        start.days_through(end).find(|d| self.is_unavailable(*d))
    }

    /// Whether data from the service has been installed.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn booked(&self) -> &BTreeSet<CalendarDate> {
        &self.booked
    }

    pub fn paid(&self) -> &BTreeSet<CalendarDate> {
        &self.paid
    }
}
