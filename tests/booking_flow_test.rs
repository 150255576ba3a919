use anyhow::Result;
use async_trait::async_trait;
use httpmock::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use stay_booking::core::calendar::MonthCursor;
use stay_booking::core::selector::{ClickOutcome, IgnoreReason};
use stay_booking::domain::model::{BookedDates, ContactField, DayStatus};
use stay_booking::domain::ports::{FixedClock, ReservationService};
use stay_booking::{
    BookingError, CalendarDate, HttpReservationService, PaymentInstructions, ReservationRequest,
    ReservationWizard, Selection, SelectionMode, TomlConfig, WizardStep,
};

fn date(m: u32, d: u32) -> CalendarDate {
    CalendarDate::from_ymd(2026, m, d).unwrap()
}

fn config_for(endpoint: &str) -> TomlConfig {
    TomlConfig::from_toml_str(&format!(
        r#"
[service]
endpoint = "{}"

[rates]
weekday = 3000
weekend = 4500

[payment]
phone = "8 (900) 000-00-00"
bank = "Test Bank"
recipient = "Host"
receipt_contact = "https://t.me/host_bot"
"#,
        endpoint
    ))
    .unwrap()
}

fn wizard_for(server: &MockServer) -> ReservationWizard<HttpReservationService, FixedClock> {
    let config = config_for(&server.url("/exec"));
    let service = HttpReservationService::from_config(&config);
    ReservationWizard::with_clock(service, &config, FixedClock(date(6, 1)))
}

fn fill_contacts<S: ReservationService>(wizard: &mut ReservationWizard<S, FixedClock>) {
    wizard.set_name("Anna").unwrap();
    wizard.set_phone("89991234567").unwrap();
    wizard.set_email("anna@example.com").unwrap();
    wizard.set_consent(true).unwrap();
}

#[tokio::test]
async fn test_full_booking_flow() -> Result<()> {
    let server = MockServer::start();

    let dates_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/exec")
            .query_param("action", "getBookedDates");
        then.status(200).json_body(serde_json::json!({
            "booked": ["2026-06-10"],
            "paid": ["2026-06-20"]
        }));
    });
    let create_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/exec")
            .body_contains("action=createRequest")
            .body_contains("checkIn=2026-06-12")
            .body_contains("checkOut=2026-06-15");
        then.status(200);
    });

    let mut wizard = wizard_for(&server);
    assert!(wizard.load_availability().await);
    dates_mock.assert();
    assert!(wizard.availability().is_unavailable(date(6, 10)));

    let june = wizard.month_view(MonthCursor::new(2026, 6).unwrap());
    assert_eq!(june.days[9].status, DayStatus::Unavailable);

    // A range over the paid 20th is rejected and the check-in is kept.
    wizard.click_date(date(6, 12))?;
    assert!(matches!(
        wizard.click_date(date(6, 22)),
        Err(BookingError::RangeConflict { conflict, .. }) if conflict == date(6, 20)
    ));
    assert_eq!(wizard.selection(), Selection::Partial { check_in: date(6, 12) });
    assert_eq!(
        wizard.notice(),
        Some("The selected period includes booked dates.")
    );

    wizard.click_date(date(6, 15))?;
    assert_eq!(wizard.notice(), None);
    // Fri and Sat nights at the weekend rate, Sun at the weekday rate.
    assert_eq!(wizard.quote().total, 4500 + 4500 + 3000);

    wizard.continue_to_contact()?;
    fill_contacts(&mut wizard);
    wizard.set_payment_method(stay_booking::PaymentMethod::QrCode)?;
    wizard.submit().await?;

    create_mock.assert();
    assert_eq!(wizard.step(), WizardStep::Confirmation);
    let confirmation = wizard.confirmation().unwrap();
    assert_eq!(confirmation.quote.total, 12000);
    assert_eq!(confirmation.instructions, PaymentInstructions::QrCode { image: None });
    assert_eq!(
        confirmation.receipt_contact.as_deref(),
        Some("https://t.me/host_bot")
    );

    // Calendar is locked once the request is sent.
    assert_eq!(
        wizard.click_date(date(6, 22))?,
        ClickOutcome::Ignored(IgnoreReason::Locked)
    );
    Ok(())
}

#[tokio::test]
async fn test_availability_failure_keeps_calendar_usable() -> Result<()> {
    let server = MockServer::start();

    let dates_mock = server.mock(|when, then| {
        when.method(GET).path("/exec");
        then.status(500).body("Internal Server Error");
    });

    let mut wizard = wizard_for(&server);
    wizard.load_availability().await;

    dates_mock.assert();
    assert!(!wizard.availability().is_loaded());

    wizard.click_date(date(6, 8))?;
    wizard.click_date(date(6, 12))?;
    assert!(wizard.can_continue());
    Ok(())
}

#[tokio::test]
async fn test_waitlist_over_booked_dates() -> Result<()> {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/exec");
        then.status(200).json_body(serde_json::json!({
            "booked": ["2026-06-10", "2026-06-11"],
            "paid": []
        }));
    });
    let create_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/exec")
            .body_contains("comment=%5BWAITLIST%5D");
        then.status(200);
    });

    let mut wizard = wizard_for(&server);
    wizard.load_availability().await;

    assert_eq!(wizard.toggle_mode()?, SelectionMode::Waitlist);
    wizard.click_date(date(6, 9))?;
    wizard.click_date(date(6, 12))?;
    assert!(wizard.selection().is_complete());

    wizard.continue_to_contact()?;
    fill_contacts(&mut wizard);
    wizard.submit().await?;

    create_mock.assert();
    assert_eq!(
        wizard.confirmation().unwrap().request.mode,
        SelectionMode::Waitlist
    );
    Ok(())
}

#[tokio::test]
async fn test_invalid_contacts_do_not_reach_the_service() -> Result<()> {
    let server = MockServer::start();

    let create_mock = server.mock(|when, then| {
        when.method(POST).path("/exec");
        then.status(200);
    });

    let mut wizard = wizard_for(&server);
    wizard.click_date(date(6, 8))?;
    wizard.click_date(date(6, 12))?;
    wizard.continue_to_contact()?;
    wizard.set_name("Anna")?;
    wizard.set_phone("999")?;
    wizard.set_email("anna@")?;

    let err = wizard.submit().await.unwrap_err();
    assert!(matches!(err, BookingError::ValidationError { .. }));
    assert!(wizard.errors().contains_key(&ContactField::Phone));
    assert!(wizard.errors().contains_key(&ContactField::Email));
    assert!(wizard.errors().contains_key(&ContactField::Consent));
    assert!(!wizard.errors().contains_key(&ContactField::Name));

    create_mock.assert_hits(0);
    assert_eq!(wizard.step(), WizardStep::Contact);
    Ok(())
}

#[tokio::test]
async fn test_server_error_reply_still_confirms() -> Result<()> {
    let server = MockServer::start();

    let create_mock = server.mock(|when, then| {
        when.method(POST).path("/exec");
        then.status(500).body("Internal Server Error");
    });

    let mut wizard = wizard_for(&server);
    wizard.click_date(date(6, 8))?;
    wizard.click_date(date(6, 12))?;
    wizard.continue_to_contact()?;
    fill_contacts(&mut wizard);

    wizard.submit().await?;

    create_mock.assert_hits(1);
    assert_eq!(wizard.step(), WizardStep::Confirmation);
    assert_eq!(wizard.notice(), None);
    Ok(())
}

/// Sends to a dead address until switched online, then to the mock server.
struct Relay {
    offline: HttpReservationService,
    online: HttpReservationService,
    reachable: Arc<AtomicBool>,
}

impl Relay {
    fn current(&self) -> &HttpReservationService {
        if self.reachable.load(Ordering::SeqCst) {
            &self.online
        } else {
            &self.offline
        }
    }
}

#[async_trait]
impl ReservationService for Relay {
    async fn booked_dates(&self) -> stay_booking::Result<BookedDates> {
        self.current().booked_dates().await
    }

    async fn create_request(&self, request: &ReservationRequest) -> stay_booking::Result<()> {
        self.current().create_request(request).await
    }
}

fn closed_endpoint() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/exec", port)
}

#[tokio::test]
async fn test_failed_submission_can_be_retried() -> Result<()> {
    let server = MockServer::start();

    let create_mock = server.mock(|when, then| {
        when.method(POST).path("/exec");
        then.status(200);
    });

    let config = config_for(&server.url("/exec"));
    let reachable = Arc::new(AtomicBool::new(false));
    let relay = Relay {
        offline: HttpReservationService::new(closed_endpoint()),
        online: HttpReservationService::from_config(&config),
        reachable: reachable.clone(),
    };
    let mut wizard = ReservationWizard::with_clock(relay, &config, FixedClock(date(6, 1)));

    wizard.click_date(date(6, 8))?;
    wizard.click_date(date(6, 12))?;
    wizard.continue_to_contact()?;
    fill_contacts(&mut wizard);

    let err = wizard.submit().await.unwrap_err();
    assert!(matches!(err, BookingError::SubmissionFailed { .. }));
    assert_eq!(wizard.step(), WizardStep::Contact);
    assert!(!wizard.is_submitting());
    assert!(wizard
        .notice()
        .unwrap()
        .starts_with("Could not send the request."));
    create_mock.assert_hits(0);

    reachable.store(true, Ordering::SeqCst);
    wizard.submit().await?;

    create_mock.assert_hits(1);
    assert!(wizard.is_complete());
    assert_eq!(wizard.notice(), None);
    Ok(())
}
