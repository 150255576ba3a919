use crate::domain::model::{CalendarDate, FieldErrors, WizardStep};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Reservation service request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid calendar date: '{value}'")]
    InvalidDate { value: String },

    #[error("Range {check_in}..={check_out} includes unavailable date {conflict}")]
    RangeConflict {
        check_in: CalendarDate,
        check_out: CalendarDate,
        conflict: CalendarDate,
    },

    #[error("Contact form has {} invalid field(s)", .errors.len())]
    ValidationError { errors: FieldErrors },

    #[error("Cannot move from {from} to {to}")]
    StepUnavailable { from: WizardStep, to: WizardStep },

    #[error("A reservation request is already being sent")]
    SubmissionInFlight,

    #[error("Reservation request failed: {message}")]
    SubmissionFailed { message: String },
}

impl BookingError {
    /// Short text suitable for showing to the guest.
    pub fn user_friendly_message(&self) -> String {
        match self {
            BookingError::RangeConflict { .. } => {
                "The selected period includes booked dates.".to_string()
            }
            BookingError::ValidationError { .. } => {
                "Please correct the highlighted fields.".to_string()
            }
            BookingError::SubmissionFailed { .. } | BookingError::ApiError(_) => {
                "Could not send the request.".to_string()
            }
            BookingError::SubmissionInFlight => "Your request is being sent.".to_string(),
            BookingError::StepUnavailable { .. } => "This step is not available yet.".to_string(),
            BookingError::ConfigError { .. }
            | BookingError::InvalidConfigValueError { .. }
            | BookingError::TomlError(_) => format!("Configuration problem: {}", self),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            BookingError::RangeConflict { .. } => "Pick dates that do not cross a booked night",
            BookingError::ValidationError { .. } => {
                "Fill in the required fields and accept the terms"
            }
            BookingError::SubmissionFailed { .. } | BookingError::ApiError(_) => {
                "Try again later or contact us directly"
            }
            BookingError::SubmissionInFlight => "Wait for the current request to finish",
            BookingError::StepUnavailable { .. } => "Complete the current step first",
            BookingError::InvalidDate { .. } => "Use the YYYY-MM-DD date format",
            BookingError::ConfigError { .. }
            | BookingError::InvalidConfigValueError { .. }
            | BookingError::TomlError(_) => "Check the configuration file",
            BookingError::IoError(_) => "Check that the configuration file can be read",
        }
    }

    /// Whether the same action may succeed if repeated unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            BookingError::ApiError(_)
                | BookingError::SubmissionFailed { .. }
                | BookingError::SubmissionInFlight
        )
    }
}

pub type Result<T> = std::result::Result<T, BookingError>;
