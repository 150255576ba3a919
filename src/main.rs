use clap::Parser;
use stay_booking::core::calendar::{MonthCursor, MonthView};
use stay_booking::domain::model::DayStatus;
use stay_booking::domain::ports::{Clock, SystemClock};
use stay_booking::utils::{logger, validation::Validate};
use stay_booking::{
    BookingError, CliConfig, Confirmation, HttpReservationService, PaymentInstructions,
    ReservationWizard,
};

fn fail(e: &BookingError) -> ! {
    tracing::error!("❌ {}", e);
    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(if e.is_retryable() { 2 } else { 1 });
}

fn print_month(view: &MonthView) {
    println!("      {:04}-{:02}", view.year, view.month);
    println!("Mo Tu We Th Fr Sa Su");
    let mut line = "   ".repeat(view.leading_blanks as usize);
    let mut column = view.leading_blanks;
    for day in &view.days {
        let mark = match day.status {
            DayStatus::Disabled => format!("{:>2}", "."),
            DayStatus::Unavailable => format!("{:>2}", "x"),
            DayStatus::SelectedEndpoint => format!("{:>2}", "*"),
            DayStatus::InRange => format!("{:>2}", "-"),
            DayStatus::Free => format!("{:>2}", day.date.day()),
        };
        line.push_str(&mark);
        column += 1;
        if column % 7 == 0 {
            println!("{}", line.trim_end());
            line.clear();
        } else {
            line.push(' ');
        }
    }
    if !line.trim().is_empty() {
        println!("{}", line.trim_end());
    }
    println!(". past  x booked  * check-in/out  - stay");
}

fn print_confirmation(confirmation: &Confirmation) {
    let request = &confirmation.request;
    println!("✅ Request sent ({})", request.mode);
    println!(
        "📅 {} -> {}, {} night(s), {} guest(s)",
        request.check_in, request.check_out, confirmation.quote.nights, request.guests
    );
    println!("💰 Total: {}", confirmation.quote.total);
    match &confirmation.instructions {
        PaymentInstructions::BankTransferByPhone {
            phone,
            bank,
            recipient,
        } => {
            println!("Pay by bank transfer to phone {} ({}), recipient {}", phone, bank, recipient);
        }
        PaymentInstructions::QrCode { image } => match image {
            Some(image) => println!("Pay by scanning the QR code: {}", image),
            None => println!("Pay by QR code; the host will send it to you"),
        },
    }
    if let Some(contact) = &confirmation.receipt_contact {
        println!("Send the payment receipt to {}", contact);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting stay-booking CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = match cli.resolve_config() {
        Ok(config) => config,
        Err(e) => fail(&e),
    };
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed");
        fail(&e);
    }

    let service = HttpReservationService::from_config(&config);
    let mut wizard = ReservationWizard::new(service, &config);

    wizard.load_availability().await;
    if !wizard.availability().is_loaded() {
        println!("⚠️  Could not load booked dates; every date is shown as free");
    }

    if cli.waitlist {
        wizard.toggle_mode()?;
    }

    for date in [cli.check_in, cli.check_out].into_iter().flatten() {
        if let Err(e) = wizard.click_date(date) {
            tracing::warn!("{}", e);
            if let Some(notice) = wizard.notice() {
                eprintln!("❌ {}", notice);
            }
        }
    }

    let cursor = cli.month.unwrap_or_else(|| {
        let anchor = wizard
            .selection()
            .check_in()
            .unwrap_or_else(|| SystemClock.today());
        MonthCursor::containing(anchor)
    });
    print_month(&wizard.month_view(cursor));

    let view = wizard.view();
    println!();
    println!("Mode: {}", view.mode);
    match (&view.check_in, &view.check_out) {
        (Some(check_in), Some(check_out)) => {
            println!(
                "📅 {} -> {}: {} night(s) ({} weekday, {} weekend), total {}",
                check_in,
                check_out,
                view.quote.nights,
                view.quote.weekday_nights,
                view.quote.weekend_nights,
                view.quote.total
            );
        }
        (Some(check_in), None) => println!("📅 Check-in {}; pick a check-out date", check_in),
        _ => println!("📅 Pick a check-in date"),
    }

    if !cli.has_contact_details() {
        return Ok(());
    }

    if let Err(e) = wizard.continue_to_contact() {
        fail(&e);
    }
    wizard.set_name(cli.name.clone().unwrap_or_default())?;
    wizard.set_phone(cli.phone.as_deref().unwrap_or_default())?;
    wizard.set_email(cli.email.clone().unwrap_or_default())?;
    if let Some(guests) = cli.guests {
        wizard.set_guest_count(guests)?;
    }
    if let Some(comment) = &cli.comment {
        wizard.set_comment(comment.clone())?;
    }
    if let Some(promo_code) = &cli.promo_code {
        wizard.set_promo_code(promo_code.clone())?;
    }
    wizard.set_payment_method(cli.payment)?;
    wizard.set_newsletter(cli.newsletter)?;
    wizard.set_consent(cli.consent)?;

    match wizard.submit().await {
        Ok(()) => {
            if let Some(confirmation) = wizard.confirmation() {
                print_confirmation(&confirmation);
            }
        }
        Err(BookingError::ValidationError { errors }) => {
            for (field, message) in &errors {
                eprintln!("❌ {:?}: {}", field, message);
            }
            std::process::exit(1);
        }
        Err(e) => {
            if let Some(notice) = wizard.notice() {
                eprintln!("❌ {}", notice);
            }
            fail(&e);
        }
    }

    Ok(())
}
