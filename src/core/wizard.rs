//! The three-step reservation flow: pick dates, leave contacts, get payment
//! instructions.
//!
//! [`ReservationWizard`] owns every piece of session state (availability,
//! selection, mode, guest details) and exposes transitions as methods. A
//! presenter calls them in response to user events and renders
//! [`ReservationWizard::view`] afterwards.

use crate::core::availability::AvailabilityStore;
use crate::core::calendar::{MonthCursor, MonthView};
use crate::core::contact::{format_phone, ContactFormValidator};
use crate::core::mode::SelectionModeController;
use crate::core::pricing::{PricingCalculator, Quote};
use crate::core::selector::{ClickOutcome, DateRangeSelector, IgnoreReason, SelectionContext};
use crate::domain::model::{
    CalendarDate, ContactField, FieldErrors, GuestDetails, PaymentDetails, PaymentMethod,
    ReservationRequest, Selection, SelectionMode, WizardStep, MAX_GUESTS, MIN_GUESTS,
};
use crate::domain::ports::{Clock, ConfigProvider, ReservationService, SystemClock};
use crate::utils::error::{BookingError, Result};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Submission {
    Idle,
    InFlight(ReservationRequest),
    Sent(ReservationRequest),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "method", rename_all = "kebab-case")]
pub enum PaymentInstructions {
    BankTransferByPhone {
        phone: String,
        bank: String,
        recipient: String,
    },
    QrCode {
        image: Option<String>,
    },
}

/// What the guest sees once the request has been sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Confirmation {
    pub request: ReservationRequest,
    pub quote: Quote,
    pub instructions: PaymentInstructions,
    pub receipt_contact: Option<String>,
}

/// Read-only projection for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WizardView {
    pub step: WizardStep,
    pub mode: SelectionMode,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub quote: Quote,
    pub errors: FieldErrors,
    pub can_continue: bool,
    pub can_submit: bool,
    pub submitting: bool,
    pub notice: Option<String>,
}

pub struct ReservationWizard<S: ReservationService, K: Clock = SystemClock> {
    service: S,
    clock: K,
    pricing: PricingCalculator,
    payment: PaymentDetails,
    availability: AvailabilityStore,
    selector: DateRangeSelector,
    mode: SelectionModeController,
    details: GuestDetails,
    consent: bool,
    newsletter: bool,
    payment_method: PaymentMethod,
    errors: FieldErrors,
    step: WizardStep,
    submission: Submission,
    notice: Option<String>,
}

impl<S: ReservationService> ReservationWizard<S, SystemClock> {
    pub fn new<C: ConfigProvider>(service: S, config: &C) -> Self {
        Self::with_clock(service, config, SystemClock)
    }
}

impl<S: ReservationService, K: Clock> ReservationWizard<S, K> {
    pub fn with_clock<C: ConfigProvider>(service: S, config: &C, clock: K) -> Self {
        Self {
            service,
            clock,
            pricing: PricingCalculator::new(config.rate_table()),
            payment: config.payment_details(),
            availability: AvailabilityStore::empty(),
            selector: DateRangeSelector::new(),
            mode: SelectionModeController::default(),
            details: GuestDetails::new(config.default_guest_count()),
            consent: false,
            newsletter: false,
            payment_method: PaymentMethod::default(),
            errors: FieldErrors::new(),
            step: WizardStep::Dates,
            submission: Submission::Idle,
            notice: None,
        }
    }

    // --- availability ---

    /// Loads reserved dates from the service and installs them. The calendar
    /// is usable before this finishes.
    pub async fn load_availability(&mut self) -> bool {
        let store = AvailabilityStore::load(&self.service).await;
        self.install_availability(store)
    }

    /// Installs loaded availability. Only the first successful load is
    /// kept, and an existing selection is not re-checked against it.
    pub fn install_availability(&mut self, store: AvailabilityStore) -> bool {
        if self.availability.is_loaded() {
            tracing::debug!("Availability already loaded, ignoring new data");
            return false;
        }
        self.availability = store;
        true
    }

    pub fn availability(&self) -> &AvailabilityStore {
        &self.availability
    }

    // --- step 1: dates ---

    pub fn click_date(&mut self, date: CalendarDate) -> Result<ClickOutcome> {
        if self.step != WizardStep::Dates {
            return Ok(ClickOutcome::Ignored(IgnoreReason::Locked));
        }

        let ctx = SelectionContext {
            today: self.clock.today(),
            mode: self.mode.mode(),
            availability: &self.availability,
        };
        match self.selector.click_date(date, &ctx) {
            Ok(outcome) => {
                if !matches!(outcome, ClickOutcome::Ignored(_)) {
                    self.notice = None;
                }
                Ok(outcome)
            }
            Err(e) => {
                self.notice = Some(e.user_friendly_message());
                Err(e)
            }
        }
    }

    pub fn toggle_mode(&mut self) -> Result<SelectionMode> {
        self.require_step(WizardStep::Dates, WizardStep::Dates)?;
        self.notice = None;
        Ok(self.mode.toggle(&mut self.selector))
    }

    pub fn quote(&self) -> Quote {
        let selection = self.selector.selection();
        self.pricing
            .quote(selection.check_in(), selection.check_out())
    }

    pub fn month_view(&self, cursor: MonthCursor) -> MonthView {
        let ctx = SelectionContext {
            today: self.clock.today(),
            mode: self.mode.mode(),
            availability: &self.availability,
        };
        cursor.render(self.selector.selection(), &ctx)
    }

    pub fn can_continue(&self) -> bool {
        self.step == WizardStep::Dates && self.selector.selection().is_complete()
    }

    pub fn continue_to_contact(&mut self) -> Result<()> {
        if !self.can_continue() {
            return Err(BookingError::StepUnavailable {
                from: self.step,
                to: WizardStep::Contact,
            });
        }
        self.step = WizardStep::Contact;
        self.notice = None;
        tracing::info!("Moved to {}", self.step);
        Ok(())
    }

    // --- step 2: contact ---

    /// Returns to the calendar; entered guest details are kept.
    pub fn back_to_dates(&mut self) -> Result<()> {
        self.require_step(WizardStep::Contact, WizardStep::Dates)?;
        self.step = WizardStep::Dates;
        tracing::info!("Moved back to {}", self.step);
        Ok(())
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        self.ensure_editable()?;
        self.details.name = name.into();
        self.errors.remove(&ContactField::Name);
        Ok(())
    }

    /// Stores the phone number through the input mask.
    pub fn set_phone(&mut self, phone: &str) -> Result<()> {
        self.ensure_editable()?;
        self.details.phone = format_phone(phone);
        self.errors.remove(&ContactField::Phone);
        Ok(())
    }

    pub fn set_email(&mut self, email: impl Into<String>) -> Result<()> {
        self.ensure_editable()?;
        self.details.email = email.into();
        self.errors.remove(&ContactField::Email);
        Ok(())
    }

    pub fn set_guest_count(&mut self, guests: u8) -> Result<()> {
        self.ensure_editable()?;
        self.details.guests = guests.clamp(MIN_GUESTS, MAX_GUESTS);
        Ok(())
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) -> Result<()> {
        self.ensure_editable()?;
        self.details.comment = comment.into();
        Ok(())
    }

    pub fn set_promo_code(&mut self, promo_code: impl Into<String>) -> Result<()> {
        self.ensure_editable()?;
        self.details.promo_code = promo_code.into();
        Ok(())
    }

    pub fn set_consent(&mut self, consent: bool) -> Result<()> {
        self.ensure_editable()?;
        self.consent = consent;
        if consent {
            self.errors.remove(&ContactField::Consent);
        }
        Ok(())
    }

    pub fn set_newsletter(&mut self, opt_in: bool) -> Result<()> {
        self.ensure_editable()?;
        self.newsletter = opt_in;
        Ok(())
    }

    pub fn set_payment_method(&mut self, method: PaymentMethod) -> Result<()> {
        self.ensure_editable()?;
        self.payment_method = method;
        Ok(())
    }

    pub fn can_submit(&self) -> bool {
        self.step == WizardStep::Contact
            && !self.is_submitting()
            && self.selector.selection().is_complete()
            && ContactFormValidator::validate(&self.details, self.consent).is_empty()
    }

    /// Validates the form and freezes a request snapshot. While the request
    /// is in flight no second one can be started.
    pub fn begin_submission(&mut self) -> Result<ReservationRequest> {
        if self.is_submitting() {
            return Err(BookingError::SubmissionInFlight);
        }
        self.require_step(WizardStep::Contact, WizardStep::Confirmation)?;

        let Selection::Complete {
            check_in,
            check_out,
        } = self.selector.selection()
        else {
            return Err(BookingError::StepUnavailable {
                from: self.step,
                to: WizardStep::Confirmation,
            });
        };

        let errors = ContactFormValidator::validate(&self.details, self.consent);
        if !errors.is_empty() {
            tracing::debug!("Contact form rejected: {:?}", errors.keys().collect::<Vec<_>>());
            self.errors = errors.clone();
            return Err(BookingError::ValidationError { errors });
        }
        self.errors.clear();

        let request = ReservationRequest::new(
            check_in,
            check_out,
            &self.details,
            self.mode.mode(),
            self.payment_method,
            self.newsletter,
        );
        tracing::info!(
            "Sending {} request for {} -> {} ({} guests)",
            request.mode,
            request.check_in,
            request.check_out,
            request.guests
        );
        self.notice = None;
        self.submission = Submission::InFlight(request.clone());
        Ok(request)
    }

    /// Records the transport outcome of the in-flight request.
    pub fn complete_submission(&mut self, outcome: Result<()>) -> Result<()> {
        let request = match std::mem::replace(&mut self.submission, Submission::Idle) {
            Submission::InFlight(request) => request,
            other => {
                self.submission = other;
                return Err(BookingError::StepUnavailable {
                    from: self.step,
                    to: WizardStep::Confirmation,
                });
            }
        };

        match outcome {
            Ok(()) => {
                tracing::info!(
                    "Reservation request sent for {} -> {}",
                    request.check_in,
                    request.check_out
                );
                self.submission = Submission::Sent(request);
                self.step = WizardStep::Confirmation;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Reservation request failed: {}", e);
                let failure = BookingError::SubmissionFailed {
                    message: e.to_string(),
                };
                self.notice = Some(format!(
                    "{} {}.",
                    failure.user_friendly_message(),
                    failure.recovery_suggestion()
                ));
                Err(failure)
            }
        }
    }

    /// Validates, sends and records the outcome in one call.
    pub async fn submit(&mut self) -> Result<()> {
        let request = self.begin_submission()?;
        let outcome = self.service.create_request(&request).await;
        self.complete_submission(outcome)
    }

    // --- step 3: confirmation ---

    pub fn confirmation(&self) -> Option<Confirmation> {
        let Submission::Sent(request) = &self.submission else {
            return None;
        };

        let instructions = match request.payment_method {
            PaymentMethod::BankTransferByPhone => PaymentInstructions::BankTransferByPhone {
                phone: self.payment.phone.clone(),
                bank: self.payment.bank.clone(),
                recipient: self.payment.recipient.clone(),
            },
            PaymentMethod::QrCode => PaymentInstructions::QrCode {
                image: self.payment.qr_image.clone(),
            },
        };

        Some(Confirmation {
            request: request.clone(),
            quote: self
                .pricing
                .quote(Some(request.check_in), Some(request.check_out)),
            instructions,
            receipt_contact: self.payment.receipt_contact.clone(),
        })
    }

    // --- projections ---

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode.mode()
    }

    pub fn selection(&self) -> Selection {
        self.selector.selection()
    }

    pub fn details(&self) -> &GuestDetails {
        &self.details
    }

    pub fn consent(&self) -> bool {
        self.consent
    }

    pub fn newsletter(&self) -> bool {
        self.newsletter
    }

    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.submission, Submission::InFlight(_))
    }

    /// Terminal success flag.
    pub fn is_complete(&self) -> bool {
        matches!(self.submission, Submission::Sent(_))
    }

    pub fn view(&self) -> WizardView {
        let selection = self.selector.selection();
        WizardView {
            step: self.step,
            mode: self.mode.mode(),
            check_in: selection.check_in().map(|d| d.to_string()),
            check_out: selection.check_out().map(|d| d.to_string()),
            quote: self.quote(),
            errors: self.errors.clone(),
            can_continue: self.can_continue(),
            can_submit: self.can_submit(),
            submitting: self.is_submitting(),
            notice: self.notice.clone(),
        }
    }

    fn require_step(&self, expected: WizardStep, target: WizardStep) -> Result<()> {
        if self.step != expected {
            return Err(BookingError::StepUnavailable {
                from: self.step,
                to: target,
            });
        }
        Ok(())
    }

    fn ensure_editable(&self) -> Result<()> {
        if self.step == WizardStep::Confirmation {
            return Err(BookingError::StepUnavailable {
                from: self.step,
                to: WizardStep::Contact,
            });
        }
        Ok(())
    }
}
