pub mod availability;
pub mod calendar;
pub mod contact;
pub mod mode;
pub mod pricing;
pub mod selector;
pub mod wizard;

pub use crate::domain::model::{
    CalendarDate, GuestDetails, ReservationRequest, Selection, SelectionMode,
};
pub use crate::domain::ports::{Clock, ConfigProvider, ReservationService};
pub use crate::utils::error::Result;
