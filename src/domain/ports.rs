use crate::domain::model::{
    BookedDates, CalendarDate, PaymentDetails, RateTable, ReservationRequest,
};
use crate::utils::error::Result;
use async_trait::async_trait;

/// The external service that owns reservations.
#[async_trait]
pub trait ReservationService: Send + Sync {
    /// Dates already reserved, pending and paid.
    async fn booked_dates(&self) -> Result<BookedDates>;

    /// Fire-and-forget submission; `Ok` means the transport succeeded.
    async fn create_request(&self, request: &ReservationRequest) -> Result<()>;
}

pub trait ConfigProvider: Send + Sync {
    fn service_endpoint(&self) -> &str;
    fn rate_table(&self) -> RateTable;
    fn payment_details(&self) -> PaymentDetails;
    fn default_guest_count(&self) -> u8;
}

/// Source of "today" for past-date checks.
pub trait Clock: Send + Sync {
    fn today(&self) -> CalendarDate;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> CalendarDate {
        chrono::Local::now().date_naive().into()
    }
}

/// Always reports the same day.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub CalendarDate);

impl Clock for FixedClock {
    fn today(&self) -> CalendarDate {
        self.0
    }
}
