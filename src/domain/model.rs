use crate::utils::error::BookingError;
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub const MIN_GUESTS: u8 = 1;
pub const MAX_GUESTS: u8 = 8;
pub const DEFAULT_GUEST_COUNT: u8 = 2;

pub const DEFAULT_WEEKDAY_RATE: u64 = 10;
pub const DEFAULT_WEEKEND_RATE: u64 = 15;

/// Prefix placed in front of the guest comment for waitlist requests.
pub const WAITLIST_MARKER: &str = "[WAITLIST]";

/// A day on the calendar, without time of day or timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
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

    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    /// Friday and Saturday nights are billed at the weekend rate.
    pub fn is_weekend_night(&self) -> bool {
        matches!(self.weekday(), Weekday::Fri | Weekday::Sat)
    }

    /// Every day of the closed range `[self, end]`; empty when `end < self`.
    pub fn days_through(self, end: CalendarDate) -> impl Iterator<Item = CalendarDate> {
        self.0
            .iter_days()
            .take_while(move |d| *d <= end.0)
            .map(CalendarDate)
    }

    /// Every night of the half-open range `[self, end)`.
    pub fn nights_until(self, end: CalendarDate) -> impl Iterator<Item = CalendarDate> {
        self.0
            .iter_days()
            .take_while(move |d| *d < end.0)
            .map(CalendarDate)
    }

    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for CalendarDate {
    type Err = BookingError;

    /// Accepts `YYYY-MM-DD`, or a timestamp whose first ten characters are one
    /// (`YYYY-MM-DDTHH:MM:SS...`); only the calendar day is kept.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let day_part = match trimmed.char_indices().nth(10) {
            None => trimmed,
            Some((idx, 'T')) | Some((idx, ' ')) => &trimmed[..idx],
            Some(_) => {
                return Err(BookingError::InvalidDate {
                    value: s.to_string(),
                })
            }
        };

        NaiveDate::parse_from_str(day_part, "%Y-%m-%d")
            .map(Self)
            .map_err(|_| BookingError::InvalidDate {
                value: s.to_string(),
            })
    }
}

impl Serialize for CalendarDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CalendarDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    #[default]
    Booking,
    Waitlist,
}

impl SelectionMode {
    pub fn toggled(self) -> Self {
        match self {
            SelectionMode::Booking => SelectionMode::Waitlist,
            SelectionMode::Waitlist => SelectionMode::Booking,
        }
    }

    /// Whether unavailable dates restrict what can be selected.
    pub fn respects_availability(self) -> bool {
        self == SelectionMode::Booking
    }
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionMode::Booking => write!(f, "booking"),
            SelectionMode::Waitlist => write!(f, "waitlist"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Empty,
    Partial {
        check_in: CalendarDate,
    },
    Complete {
        check_in: CalendarDate,
        check_out: CalendarDate,
    },
}

impl Selection {
    pub fn check_in(&self) -> Option<CalendarDate> {
        match self {
            Selection::Empty => None,
            Selection::Partial { check_in } | Selection::Complete { check_in, .. } => {
                Some(*check_in)
            }
        }
    }

    pub fn check_out(&self) -> Option<CalendarDate> {
        match self {
            Selection::Complete { check_out, .. } => Some(*check_out),
            _ => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Selection::Complete { .. })
    }

    pub fn is_endpoint(&self, date: CalendarDate) -> bool {
        self.check_in() == Some(date) || self.check_out() == Some(date)
    }

    /// Strictly between the endpoints of a complete selection.
    pub fn is_inside(&self, date: CalendarDate) -> bool {
        match self {
            Selection::Complete {
                check_in,
                check_out,
            } => *check_in < date && date < *check_out,
            _ => false,
        }
    }
}

/// Display classification of one calendar day, highest precedence first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DayStatus {
    Disabled,
    Unavailable,
    SelectedEndpoint,
    InRange,
    Free,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactField {
    Name,
    Phone,
    Email,
    Consent,
}

impl fmt::Display for ContactField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContactField::Name => "name",
            ContactField::Phone => "phone",
            ContactField::Email => "email",
            ContactField::Consent => "consent",
        };
        f.write_str(name)
    }
}

pub type FieldErrors = BTreeMap<ContactField, String>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuestDetails {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub guests: u8,
    pub comment: String,
    pub promo_code: String,
}

impl GuestDetails {
    pub fn new(guests: u8) -> Self {
        Self {
            name: String::new(),
            phone: String::new(),
            email: String::new(),
            guests: guests.clamp(MIN_GUESTS, MAX_GUESTS),
            comment: String::new(),
            promo_code: String::new(),
        }
    }
}

impl Default for GuestDetails {
    fn default() -> Self {
        Self::new(DEFAULT_GUEST_COUNT)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethod {
    #[default]
    BankTransferByPhone,
    QrCode,
}

impl PaymentMethod {
    pub fn wire_value(&self) -> &'static str {
        match self {
            PaymentMethod::BankTransferByPhone => "bank-transfer-by-phone",
            PaymentMethod::QrCode => "qr-code",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_value())
    }
}

impl FromStr for PaymentMethod {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "bank-transfer-by-phone" | "phone" => Ok(PaymentMethod::BankTransferByPhone),
            "qr-code" | "qr" => Ok(PaymentMethod::QrCode),
            other => Err(BookingError::InvalidConfigValueError {
                field: "payment_method".to_string(),
                value: other.to_string(),
                reason: "Expected 'bank-transfer-by-phone' or 'qr-code'".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum WizardStep {
    Dates = 1,
    Contact = 2,
    Confirmation = 3,
}

impl WizardStep {
    pub fn number(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            WizardStep::Dates => "dates",
            WizardStep::Contact => "contact",
            WizardStep::Confirmation => "confirmation",
        };
        write!(f, "step {} ({})", self.number(), label)
    }
}

/// Snapshot handed to the reservation service; never changed once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationRequest {
    pub check_in: CalendarDate,
    pub check_out: CalendarDate,
    pub guests: u8,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub comment: String,
    pub promo_code: String,
    pub payment_method: PaymentMethod,
    pub newsletter_opt_in: bool,
    pub mode: SelectionMode,
}

impl ReservationRequest {
    pub fn new(
        check_in: CalendarDate,
        check_out: CalendarDate,
        details: &GuestDetails,
        mode: SelectionMode,
        payment_method: PaymentMethod,
        newsletter_opt_in: bool,
    ) -> Self {
        let comment = match mode {
            SelectionMode::Booking => details.comment.clone(),
            SelectionMode::Waitlist => format!("{} {}", WAITLIST_MARKER, details.comment),
        };

        Self {
            check_in,
            check_out,
            guests: details.guests,
            name: details.name.clone(),
            phone: details.phone.clone(),
            email: details.email.clone(),
            comment,
            promo_code: details.promo_code.clone(),
            payment_method,
            newsletter_opt_in,
            mode,
        }
    }

    /// Form fields of the `createRequest` call, in wire order.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("action", "createRequest".to_string()),
            ("checkIn", self.check_in.to_string()),
            ("checkOut", self.check_out.to_string()),
            ("guests", self.guests.to_string()),
            ("name", self.name.clone()),
            ("phone", self.phone.clone()),
            ("email", self.email.clone()),
            ("comment", self.comment.clone()),
            ("promoCode", self.promo_code.clone()),
            ("paymentMethod", self.payment_method.wire_value().to_string()),
            (
                "newsletterOptIn",
                if self.newsletter_opt_in { "yes" } else { "no" }.to_string(),
            ),
        ]
    }
}

/// Dates already taken, as reported by the reservation service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookedDates {
    pub booked: Vec<CalendarDate>,
    pub paid: Vec<CalendarDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateTable {
    pub weekday: u64,
    pub weekend: u64,
}

impl Default for RateTable {
    fn default() -> Self {
        Self {
            weekday: DEFAULT_WEEKDAY_RATE,
            weekend: DEFAULT_WEEKEND_RATE,
        }
    }
}

/// Where and how the guest pays once the request is accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentDetails {
    pub phone: String,
    pub bank: String,
    pub recipient: String,
    pub qr_image: Option<String>,
    pub receipt_contact: Option<String>,
}
