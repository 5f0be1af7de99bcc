//! Provider implementation for the Twente Milieu waste collection API.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use reqwest::header::{REFERER, USER_AGENT};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use ophaaldag_core::{
    model::{AddressId, DateRange, TrashType, WasteSchedule},
    ports::{ApiError, WastePort},
};

const BASE_URL: &str = "https://wasteapi.2go-mobile.com/api";

// The API is keyed by collector; this is Twente Milieu's code.
const COMPANY_CODE: &str = "8d97bb56-5afd-4cbc-a651-b4f7314264b4";

// Any well-formed request is accepted; these mimic the collector's web app.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_11_2) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/47.0.2526.106 Safari/537.36";
const REFERER_PAGE: &str = "https://www.twentemilieu.nl/enschede";

const DATE_FORMAT: &str = "%Y-%m-%d";
// Pickup dates arrive as "YYYY-MM-DDTHH:MM:SS"; only the date part matters.
const DATE_PREFIX_LEN: usize = 10;

/// Response wrapper from /api/FetchAdress
#[derive(Debug, Deserialize)]
struct AddressResponse {
    #[serde(rename = "dataList", default)]
    data_list: Vec<AddressEntry>,
}

/// Single candidate address from /api/FetchAdress
#[derive(Debug, Deserialize)]
struct AddressEntry {
    #[serde(rename = "UniqueId")]
    unique_id: String,
    // street/city fields exist in the payload, we only need the id
}

/// Response wrapper from /api/GetCalendar
#[derive(Debug, Deserialize)]
struct CalendarResponse {
    #[serde(rename = "dataList", default)]
    data_list: Vec<CalendarEntry>,
}

/// Pickup dates for one trash stream from /api/GetCalendar
#[derive(Debug, Deserialize)]
struct CalendarEntry {
    #[serde(rename = "_pickupTypeText")]
    pickup_type_text: String,
    #[serde(rename = "pickupDates", default)]
    pickup_dates: Vec<String>,
}

/// Twente Milieu backend bound to the collector's fixed company code.
pub struct TwenteMilieuPort {
    client: Client,
    base_url: String,
}

impl TwenteMilieuPort {
    /// Create a port talking to the production API.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self::with_base_url(client, BASE_URL)
    }

    /// Create a port against a custom base URL, e.g. a local mock server.
    #[must_use]
    pub fn with_base_url(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// POST `payload` form-encoded to `{base_url}/{action}`, merging in the
    /// fixed company code, and decode the JSON response body.
    async fn post<T: DeserializeOwned>(
        &self,
        action: &str,
        payload: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let mut form: Vec<(&str, &str)> = vec![("companyCode", COMPANY_CODE)];
        form.extend_from_slice(payload);

        debug!(action, "requesting waste API");

        self.client
            .post(format!("{}/{action}", self.base_url))
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .header(REFERER, REFERER_PAGE)
            .form(&form)
            .send()
            .await
            .map_err(ApiError::from)?
            .error_for_status()
            .map_err(ApiError::from)?
            .json()
            .await
            .map_err(ApiError::from)
    }
}

#[async_trait]
impl WastePort for TwenteMilieuPort {
    async fn resolve_address(
        &self,
        postcode: &str,
        house_number: &str,
    ) -> Result<AddressId, ApiError> {
        let response: AddressResponse = self
            .post(
                "FetchAdress",
                &[("postCode", postcode), ("houseNumber", house_number)],
            )
            .await?;

        // Unknown addresses come back as HTTP 200 with an empty dataList.
        response
            .data_list
            .into_iter()
            .next()
            .map(|entry| AddressId(entry.unique_id))
            .ok_or(ApiError::AddressNotFound)
    }

    async fn calendar(
        &self,
        address_id: &AddressId,
        range: DateRange,
    ) -> Result<Vec<WasteSchedule>, ApiError> {
        let start = range.start.format(DATE_FORMAT).to_string();
        let end = range.end.format(DATE_FORMAT).to_string();

        let response: CalendarResponse = self
            .post(
                "GetCalendar",
                &[
                    ("uniqueAddressId", address_id.0.as_str()),
                    ("startDate", start.as_str()),
                    ("endDate", end.as_str()),
                ],
            )
            .await?;

        let mut schedules = Vec::new();

        for entry in response.data_list {
            let trash_type = TrashType::from_label(&entry.pickup_type_text);

            for pickup_date in &entry.pickup_dates {
                schedules.push(WasteSchedule {
                    trash_type: trash_type.clone(),
                    pickup_date: parse_pickup_date(pickup_date)?,
                });
            }
        }

        Ok(schedules)
    }
}

/// Parse the date part of a pickup timestamp, ignoring the time-of-day suffix.
fn parse_pickup_date(raw: &str) -> Result<NaiveDate, ApiError> {
    let date_part = raw
        .get(..DATE_PREFIX_LEN)
        .ok_or_else(|| ApiError::MalformedResponse(format!("Pickup date too short: {raw:?}")))?;

    NaiveDate::parse_from_str(date_part, DATE_FORMAT).map_err(ApiError::from)
}

#[cfg(test)]
mod tests {
    use mockito::{Matcher, Server, ServerGuard};

    use super::*;

    fn port_for(server: &ServerGuard) -> TwenteMilieuPort {
        TwenteMilieuPort::with_base_url(Client::new(), server.url())
    }

    fn range(start: NaiveDate, end: NaiveDate) -> DateRange {
        DateRange { start, end }
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    #[tokio::test]
    async fn resolve_address_extracts_the_first_unique_id() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/FetchAdress")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("companyCode".into(), COMPANY_CODE.into()),
                Matcher::UrlEncoded("postCode".into(), "7541GE".into()),
                Matcher::UrlEncoded("houseNumber".into(), "12".into()),
            ]))
            .with_body(r#"{"dataList":[{"UniqueId":"abc-123"},{"UniqueId":"def-456"}]}"#)
            .create_async()
            .await;

        let port = port_for(&server);
        let id = port
            .resolve_address("7541GE", "12")
            .await
            .expect("address should resolve");

        assert_eq!(id, AddressId("abc-123".to_owned()));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn empty_data_list_is_address_not_found() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/FetchAdress")
            .with_body(r#"{"dataList":[]}"#)
            .create_async()
            .await;

        let port = port_for(&server);
        let err = port
            .resolve_address("9999ZZ", "1")
            .await
            .expect_err("unknown address should fail");

        assert!(matches!(err, ApiError::AddressNotFound));
    }

    #[tokio::test]
    async fn calendar_yields_one_schedule_per_type_date_pair() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/GetCalendar")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("companyCode".into(), COMPANY_CODE.into()),
                Matcher::UrlEncoded("uniqueAddressId".into(), "abc-123".into()),
                Matcher::UrlEncoded("startDate".into(), "2024-03-01".into()),
                Matcher::UrlEncoded("endDate".into(), "2024-03-31".into()),
            ]))
            .with_body(
                r#"{"dataList":[
                    {"_pickupTypeText":"GREY","pickupDates":["2024-03-01T00:00:00","2024-03-15T00:00:00"]},
                    {"_pickupTypeText":"PAPER","pickupDates":["2024-03-08T00:00:00"]}
                ]}"#,
            )
            .create_async()
            .await;

        let port = port_for(&server);
        let schedules = port
            .calendar(
                &AddressId("abc-123".to_owned()),
                range(date(2024, 3, 1), date(2024, 3, 31)),
            )
            .await
            .expect("calendar should parse");

        assert_eq!(
            schedules,
            vec![
                WasteSchedule {
                    trash_type: TrashType::Grey,
                    pickup_date: date(2024, 3, 1),
                },
                WasteSchedule {
                    trash_type: TrashType::Grey,
                    pickup_date: date(2024, 3, 15),
                },
                WasteSchedule {
                    trash_type: TrashType::Paper,
                    pickup_date: date(2024, 3, 8),
                },
            ]
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn server_errors_surface_as_network_errors() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/FetchAdress")
            .with_status(500)
            .create_async()
            .await;

        let port = port_for(&server);
        let err = port
            .resolve_address("7541GE", "12")
            .await
            .expect_err("server error should fail");

        assert!(matches!(err, ApiError::Network(_)));
    }

    #[test]
    fn pickup_dates_parse_only_their_date_prefix() {
        assert_eq!(
            parse_pickup_date("2024-03-01T00:00:00").expect("date should parse"),
            date(2024, 3, 1)
        );
        assert!(matches!(
            parse_pickup_date("2024-03"),
            Err(ApiError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_pickup_date("2024-13-01T00:00:00"),
            Err(ApiError::Parse(_))
        ));
    }
}
