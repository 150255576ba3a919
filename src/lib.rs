pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use adapters::http::HttpReservationService;
pub use core::wizard::{Confirmation, PaymentInstructions, ReservationWizard, WizardView};
pub use domain::model::{
    CalendarDate, GuestDetails, PaymentMethod, ReservationRequest, Selection, SelectionMode,
    WizardStep,
};
pub use utils::error::{BookingError, Result};
