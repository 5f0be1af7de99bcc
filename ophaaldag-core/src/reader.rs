//! Once-per-day cached reader over the waste API and its query surface.

use std::sync::Arc;

use chrono::{Duration, Local, NaiveDate};
use tracing::{debug, warn};

use crate::model::{DateRange, TrashType, WasteSchedule};
use crate::ports::{ApiError, WastePort};

/// Days of upcoming schedule requested per refresh.
const FETCH_WINDOW_DAYS: i64 = 30;

/// Cached schedule reader for a single configured address.
///
/// Owns the resolve → fetch → parse pipeline behind a once-per-calendar-day
/// throttle and exposes pure queries over the resulting snapshot. `refresh`
/// borrows the reader mutably, so overlapping fetches cannot happen.
pub struct WasteApiReader {
    port: Arc<dyn WastePort>,
    postcode: String,
    house_number: String,
    schedules: Vec<WasteSchedule>,
    last_updated: Option<NaiveDate>,
}

impl WasteApiReader {
    /// Create a reader for the given address. No network activity happens
    /// until the first [`refresh`](Self::refresh).
    #[must_use]
    pub fn new(
        port: Arc<dyn WastePort>,
        postcode: impl Into<String>,
        house_number: impl Into<String>,
    ) -> Self {
        Self {
            port,
            postcode: postcode.into(),
            house_number: house_number.into(),
            schedules: Vec::new(),
            last_updated: None,
        }
    }

    /// Postcode this reader was configured with.
    #[must_use]
    pub fn postcode(&self) -> &str {
        &self.postcode
    }

    /// House number this reader was configured with.
    #[must_use]
    pub fn house_number(&self) -> &str {
        &self.house_number
    }

    /// Date of the last refresh attempt, or `None` before the first call.
    #[must_use]
    pub fn last_updated(&self) -> Option<NaiveDate> {
        self.last_updated
    }

    /// Current snapshot, sorted ascending by pickup date.
    #[must_use]
    pub fn schedules(&self) -> &[WasteSchedule] {
        &self.schedules
    }

    /// Refresh the schedule snapshot, at most once per calendar day.
    ///
    /// The watermark advances before the fetch is attempted, so a failed
    /// attempt is not retried until the next calendar day.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] when address resolution or the calendar fetch
    /// fails; the snapshot is cleared in that case.
    pub async fn refresh(&mut self) -> Result<(), ApiError> {
        self.refresh_with_today(Local::now().date_naive()).await
    }

    pub(crate) async fn refresh_with_today(&mut self, today: NaiveDate) -> Result<(), ApiError> {
        if self.last_updated == Some(today) {
            debug!(%today, "schedule already refreshed today, skipping fetch");
            return Ok(());
        }
        self.last_updated = Some(today);

        match self.fetch(today).await {
            Ok(mut schedules) => {
                // Stable sort: same-date records keep payload order.
                schedules.sort_by_key(|schedule| schedule.pickup_date);
                self.schedules = schedules;
                debug!(count = self.schedules.len(), "schedule snapshot replaced");
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "refresh failed, clearing schedule snapshot");
                self.schedules.clear();
                Err(err)
            }
        }
    }

    async fn fetch(&self, today: NaiveDate) -> Result<Vec<WasteSchedule>, ApiError> {
        let address_id = self
            .port
            .resolve_address(&self.postcode, &self.house_number)
            .await?;

        let range = DateRange {
            start: today,
            end: today + Duration::days(FETCH_WINDOW_DAYS),
        };

        self.port.calendar(&address_id, range).await
    }

    /// Earliest upcoming pickup, or `None` when the snapshot is empty.
    #[must_use]
    pub fn next_collection(&self) -> Option<&WasteSchedule> {
        self.schedules.first()
    }

    /// Earliest upcoming pickup of the given trash stream.
    #[must_use]
    pub fn next_collection_of(&self, trash_type: &TrashType) -> Option<&WasteSchedule> {
        self.schedules
            .iter()
            .find(|schedule| &schedule.trash_type == trash_type)
    }

    /// First pickup scheduled exactly on the given date. Same-date ties
    /// resolve to the earliest-stored record.
    #[must_use]
    pub fn collection_on(&self, date: NaiveDate) -> Option<&WasteSchedule> {
        self.schedules
            .iter()
            .find(|schedule| schedule.pickup_date == date)
    }

    /// Pickup scheduled today, if any.
    #[must_use]
    pub fn collection_today(&self) -> Option<&WasteSchedule> {
        self.collection_on(Local::now().date_naive())
    }

    /// Pickup scheduled tomorrow, if any.
    #[must_use]
    pub fn collection_tomorrow(&self) -> Option<&WasteSchedule> {
        self.collection_on(Local::now().date_naive() + Duration::days(1))
    }
}
