use crate::domain::model::{CalendarDate, RateTable};
use serde::Serialize;

/// Price breakdown for a stay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Quote {
    pub nights: u32,
    pub weekday_nights: u32,
    pub weekend_nights: u32,
    pub total: u64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PricingCalculator {
    rates: RateTable,
}

impl PricingCalculator {
    pub fn new(rates: RateTable) -> Self {
        Self { rates }
    }

    pub fn rates(&self) -> RateTable {
        self.rates
    }

    pub fn nightly_rate(&self, night: CalendarDate) -> u64 {
        if night.is_weekend_night() {
            self.rates.weekend
        } else {
            self.rates.weekday
        }
    }

    /// Total for the nights in `[check_in, check_out)`; zero for a missing or
    /// inverted range.
    pub fn price(&self, check_in: Option<CalendarDate>, check_out: Option<CalendarDate>) -> u64 {
        self.quote(check_in, check_out).total
    }

    pub fn quote(&self, check_in: Option<CalendarDate>, check_out: Option<CalendarDate>) -> Quote {
        let (Some(check_in), Some(check_out)) = (check_in, check_out) else {
            return Quote::default();
        };

        check_in
            .nights_until(check_out)
            .fold(Quote::default(), |mut quote, night| {
                quote.nights += 1;
                if night.is_weekend_night() {
                    quote.weekend_nights += 1;
                } else {
                    quote.weekday_nights += 1;
                }
                quote.total += self.nightly_rate(night);
                quote
            })
    }
}
