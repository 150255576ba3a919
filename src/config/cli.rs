use crate::config::toml_config::TomlConfig;
use crate::core::calendar::MonthCursor;
use crate::domain::model::{CalendarDate, PaymentMethod};
use crate::utils::error::{BookingError, Result};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "stay-booking")]
#[command(about = "Pick stay dates, see the price and send a reservation request")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Reservation service endpoint (overrides the config file)
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Month to show, as YYYY-MM
    #[arg(long)]
    pub month: Option<MonthCursor>,

    #[arg(long)]
    pub check_in: Option<CalendarDate>,

    #[arg(long)]
    pub check_out: Option<CalendarDate>,

    /// Ask for a place on the waitlist instead of a firm booking
    #[arg(long)]
    pub waitlist: bool,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub guests: Option<u8>,

    #[arg(long)]
    pub comment: Option<String>,

    #[arg(long)]
    pub promo_code: Option<String>,

    /// bank-transfer-by-phone or qr-code
    #[arg(long, default_value = "bank-transfer-by-phone")]
    pub payment: PaymentMethod,

    #[arg(long, help = "Subscribe to news and offers")]
    pub newsletter: bool,

    #[arg(long, help = "Consent to personal data processing")]
    pub consent: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

impl CliConfig {
    /// Loads the config file if given, otherwise falls back to built-in
    /// defaults around `--endpoint`.
    pub fn resolve_config(&self) -> Result<TomlConfig> {
        let mut config = match (&self.config, &self.endpoint) {
            (Some(path), _) => TomlConfig::from_file(path)?,
            (None, Some(endpoint)) => TomlConfig::with_endpoint(endpoint.clone()),
            (None, None) => {
                return Err(BookingError::ConfigError {
                    message: "either --config or --endpoint is required".to_string(),
                })
            }
        };

        if let Some(endpoint) = &self.endpoint {
            config.service.endpoint = endpoint.clone();
        }
        Ok(config)
    }

    /// Whether any contact field was supplied, i.e. the user wants to submit.
    pub fn has_contact_details(&self) -> bool {
        self.name.is_some() || self.phone.is_some() || self.email.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::ConfigProvider;

    #[test]
    fn test_parse_arguments() {
        let cli = CliConfig::parse_from([
            "stay-booking",
            "--endpoint",
            "https://script.example.com/exec",
            "--month",
            "2026-06",
            "--check-in",
            "2026-06-08",
            "--check-out",
            "2026-06-12",
            "--payment",
            "qr-code",
            "--waitlist",
        ]);

        assert_eq!(cli.month, MonthCursor::new(2026, 6));
        assert_eq!(cli.check_in, CalendarDate::from_ymd(2026, 6, 8));
        assert_eq!(cli.payment, PaymentMethod::QrCode);
        assert!(cli.waitlist);
        assert!(!cli.has_contact_details());

        let config = cli.resolve_config().unwrap();
        assert_eq!(config.service_endpoint(), "https://script.example.com/exec");
    }

    #[test]
    fn test_endpoint_or_config_required() {
        let cli = CliConfig::parse_from(["stay-booking"]);
        assert!(matches!(
            cli.resolve_config(),
            Err(BookingError::ConfigError { .. })
        ));
    }
}
