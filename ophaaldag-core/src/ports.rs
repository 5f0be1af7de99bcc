//! Error taxonomy and the trait seam between the reader and the waste API.

use async_trait::async_trait;
use chrono::ParseError as ChronoParseError;
use reqwest::Error as ReqwestError;

use crate::model::{AddressId, DateRange, WasteSchedule};

#[derive(thiserror::Error, Debug)]
/// Errors that can occur on the fetch path.
pub enum ApiError {
    /// Transport failure: connection, timeout, HTTP error status, or an
    /// undecodable response body.
    #[error("Network error: {0}")]
    Network(#[from] ReqwestError),
    /// A pickup date in the calendar payload did not match the wire format.
    #[error("Parse error: {0}")]
    Parse(#[from] ChronoParseError),
    /// Address lookup answered with no candidates. The upstream echoes
    /// HTTP 200 with an empty result set in this case.
    #[error("Address not found")]
    AddressNotFound,
    /// Response decoded but is structurally unusable.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

#[async_trait]
/// Trait for the waste collector backend.
pub trait WastePort: Send + Sync {
    /// Resolve a postcode/house-number pair to the collector's address id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::AddressNotFound`] when the collector knows no such
    /// address, or a transport error when the request fails.
    async fn resolve_address(
        &self,
        postcode: &str,
        house_number: &str,
    ) -> Result<AddressId, ApiError>;

    /// Fetch pickup events for an address within the given date range.
    ///
    /// Records are returned in payload order; callers sort before storing.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] when the request fails or the payload cannot
    /// be parsed.
    async fn calendar(
        &self,
        address_id: &AddressId,
        range: DateRange,
    ) -> Result<Vec<WasteSchedule>, ApiError>;
}
