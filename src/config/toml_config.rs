use crate::domain::model::{PaymentDetails, RateTable, DEFAULT_GUEST_COUNT};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub service: ServiceConfig,
    pub rates: Option<RatesConfig>,
    pub guests: Option<GuestsConfig>,
    pub payment: Option<PaymentConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub endpoint: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatesConfig {
    pub weekday: Option<u64>,
    pub weekend: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuestsConfig {
    pub default: Option<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentConfig {
    pub phone: Option<String>,
    pub bank: Option<String>,
    pub recipient: Option<String>,
    pub qr_image: Option<String>,
    pub receipt_contact: Option<String>,
}

impl TomlConfig {
    /// Built-in rates and guest defaults with the given service endpoint.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            service: ServiceConfig {
                endpoint: endpoint.into(),
            },
            rates: None,
            guests: None,
            payment: None,
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);
        Ok(toml::from_str(&processed_content)?)
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_http_url("service.endpoint", &self.service.endpoint)?;

        let rates = self.rate_table();
        validation::validate_rate("rates.weekday", rates.weekday)?;
        validation::validate_rate("rates.weekend", rates.weekend)?;

        if let Some(guests) = self.guests.as_ref().and_then(|g| g.default) {
            validation::validate_guest_count("guests.default", guests)?;
        }

        if let Some(payment) = &self.payment {
            if let Some(phone) = &payment.phone {
                validation::validate_non_empty("payment.phone", phone)?;
            }
            if let Some(contact) = &payment.receipt_contact {
                validation::validate_http_url("payment.receipt_contact", contact)?;
            }
        }

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn service_endpoint(&self) -> &str {
        &self.service.endpoint
    }

    fn rate_table(&self) -> RateTable {
        let defaults = RateTable::default();
        match &self.rates {
            Some(rates) => RateTable {
                weekday: rates.weekday.unwrap_or(defaults.weekday),
                weekend: rates.weekend.unwrap_or(defaults.weekend),
            },
            None => defaults,
        }
    }

    fn payment_details(&self) -> PaymentDetails {
        match &self.payment {
            Some(p) => PaymentDetails {
                phone: p.phone.clone().unwrap_or_default(),
                bank: p.bank.clone().unwrap_or_default(),
                recipient: p.recipient.clone().unwrap_or_default(),
                qr_image: p.qr_image.clone(),
                receipt_contact: p.receipt_contact.clone(),
            },
            None => PaymentDetails::default(),
        }
    }

    fn default_guest_count(&self) -> u8 {
        self.guests
            .as_ref()
            .and_then(|g| g.default)
            .unwrap_or(DEFAULT_GUEST_COUNT)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{DEFAULT_WEEKDAY_RATE, DEFAULT_WEEKEND_RATE};
    use crate::utils::error::BookingError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[service]
endpoint = "https://script.example.com/exec"

[rates]
weekday = 3000
weekend = 4500

[guests]
default = 4

[payment]
phone = "8 (900) 000-00-00"
bank = "Test Bank"
recipient = "Host"
receipt_contact = "https://t.me/host_bot"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.service_endpoint(), "https://script.example.com/exec");
        assert_eq!(
            config.rate_table(),
            RateTable {
                weekday: 3000,
                weekend: 4500
            }
        );
        assert_eq!(config.default_guest_count(), 4);
        assert_eq!(config.payment_details().bank, "Test Bank");
        assert!(config.payment_details().qr_image.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = TomlConfig::from_toml_str(
            r#"
[service]
endpoint = "https://script.example.com/exec"
"#,
        )
        .unwrap();

        assert_eq!(config.rate_table().weekday, DEFAULT_WEEKDAY_RATE);
        assert_eq!(config.rate_table().weekend, DEFAULT_WEEKEND_RATE);
        assert_eq!(config.default_guest_count(), DEFAULT_GUEST_COUNT);
        assert_eq!(config.payment_details(), PaymentDetails::default());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("STAY_BOOKING_TEST_ENDPOINT", "https://env.example.com/exec");

        let config = TomlConfig::from_toml_str(
            r#"
[service]
endpoint = "${STAY_BOOKING_TEST_ENDPOINT}"
"#,
        )
        .unwrap();
        assert_eq!(config.service.endpoint, "https://env.example.com/exec");

        std::env::remove_var("STAY_BOOKING_TEST_ENDPOINT");
    }

    #[test]
    fn test_config_validation() {
        let bad_endpoint = TomlConfig::with_endpoint("invalid-url");
        assert!(bad_endpoint.validate().is_err());

        let zero_rate = TomlConfig::from_toml_str(
            r#"
[service]
endpoint = "https://script.example.com/exec"

[rates]
weekend = 0
"#,
        )
        .unwrap();
        assert!(matches!(
            zero_rate.validate(),
            Err(BookingError::InvalidConfigValueError { ref field, .. }) if field == "rates.weekend"
        ));

        let too_many_guests = TomlConfig::from_toml_str(
            r#"
[service]
endpoint = "https://script.example.com/exec"

[guests]
default = 9
"#,
        )
        .unwrap();
        assert!(too_many_guests.validate().is_err());
    }

    #[test]
    fn test_missing_service_section_is_an_error() {
        let err = TomlConfig::from_toml_str("[rates]\nweekday = 1\n").unwrap_err();
        assert!(matches!(err, BookingError::TomlError(_)));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[service]\nendpoint = \"https://file.example.com/exec\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.service_endpoint(), "https://file.example.com/exec");
    }
}
