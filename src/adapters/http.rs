use crate::domain::model::{BookedDates, CalendarDate, ReservationRequest};
use crate::domain::ports::{ConfigProvider, ReservationService};
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

/// Reservation service reached over HTTP: `GET ?action=getBookedDates` and a
/// form `POST` for `createRequest`.
///
/// The HTTP status is not inspected. A reply with a JSON body is read as
/// availability, and any reply to the `POST` counts as delivered; only
/// transport and decoding errors fail.
#[derive(Debug, Clone)]
pub struct HttpReservationService {
    client: Client,
    endpoint: String,
}

#[derive(Debug, Deserialize, Default)]
struct BookedDatesResponse {
    #[serde(default)]
    booked: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    paid: Option<Vec<serde_json::Value>>,
}

impl HttpReservationService {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self::new(config.service_endpoint())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn parse_dates(kind: &str, raw: Option<Vec<serde_json::Value>>) -> Vec<CalendarDate> {
    raw.unwrap_or_default()
        .into_iter()
        .filter_map(|value| match value.as_str().map(str::parse::<CalendarDate>) {
            Some(Ok(date)) => Some(date),
            _ => {
                tracing::warn!("Skipping unparseable {} date: {}", kind, value);
                None
            }
        })
        .collect()
}

#[async_trait]
impl ReservationService for HttpReservationService {
    async fn booked_dates(&self) -> Result<BookedDates> {
        tracing::debug!("Fetching booked dates from: {}", self.endpoint);
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("action", "getBookedDates")])
            .send()
            .await?;

        tracing::debug!("Booked dates response status: {}", response.status());
        let body: Option<BookedDatesResponse> = response.json().await?;
        let body = body.unwrap_or_default();

        Ok(BookedDates {
            booked: parse_dates("booked", body.booked),
            paid: parse_dates("paid", body.paid),
        })
    }

    async fn create_request(&self, request: &ReservationRequest) -> Result<()> {
        tracing::debug!("Posting createRequest to: {}", self.endpoint);
        let response = self
            .client
            .post(&self.endpoint)
            .form(&request.form_fields())
            .send()
            .await?;

        tracing::debug!("createRequest response status: {}", response.status());
        Ok(())
    }
}
