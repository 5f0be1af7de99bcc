//! Sensor adapters translating the schedule snapshot into display states.

use chrono::{Duration, Local, NaiveDate};

use crate::model::TrashType;
use crate::reader::WasteApiReader;

/// Prefix applied to every sensor display name.
pub const SENSOR_PREFIX: &str = "Twentemilieu ";

#[derive(Debug, Clone, PartialEq, Eq)]
/// What a sensor reports on.
pub enum SensorKind {
    /// Whatever stream is collected today, if any.
    Today,
    /// Whatever stream is collected tomorrow, if any.
    Tomorrow,
    /// The next pickup of one specific trash stream.
    ByType(TrashType),
}

impl SensorKind {
    /// Map a configured resource key to a sensor kind.
    ///
    /// Keys other than `today`/`tomorrow` select a trash stream; streams the
    /// collector does not pre-define fall back to [`TrashType::Other`].
    #[must_use]
    pub fn from_key(key: &str) -> Self {
        match key.trim().to_lowercase().as_str() {
            "today" => Self::Today,
            "tomorrow" => Self::Tomorrow,
            _ => Self::ByType(TrashType::from_label(key)),
        }
    }
}

#[derive(Debug, Clone)]
/// One host-visible sensor reading from the shared reader snapshot.
///
/// All variants share a single capability: produce an optional display state
/// from the current snapshot. Fetch errors never surface here; an empty
/// snapshot simply renders as an absent state.
pub struct WasteSensor {
    kind: SensorKind,
}

impl WasteSensor {
    /// Create a sensor of the given kind.
    #[must_use]
    pub fn new(kind: SensorKind) -> Self {
        Self { kind }
    }

    /// The kind this sensor was configured with.
    #[must_use]
    pub fn kind(&self) -> &SensorKind {
        &self.kind
    }

    /// Display name, e.g. `Twentemilieu Restafval`.
    #[must_use]
    pub fn name(&self) -> String {
        let suffix = match &self.kind {
            SensorKind::Today => "Today".to_owned(),
            SensorKind::Tomorrow => "Tomorrow".to_owned(),
            SensorKind::ByType(trash_type) => trash_type.display_name(),
        };
        format!("{SENSOR_PREFIX}{suffix}")
    }

    /// Icon identifier.
    #[must_use]
    pub fn icon(&self) -> &'static str {
        match &self.kind {
            SensorKind::Today | SensorKind::Tomorrow => "mdi:recycle",
            SensorKind::ByType(trash_type) => trash_type.icon(),
        }
    }

    /// Produce the display state from the reader's current snapshot.
    #[must_use]
    pub fn state(&self, reader: &WasteApiReader) -> Option<String> {
        self.state_on(reader, Local::now().date_naive())
    }

    /// Display state anchored to an explicit `today`.
    #[must_use]
    pub fn state_on(&self, reader: &WasteApiReader, today: NaiveDate) -> Option<String> {
        match &self.kind {
            SensorKind::Today => reader
                .collection_on(today)
                .map(|schedule| schedule.trash_type.display_name()),
            SensorKind::Tomorrow => reader
                .collection_on(today + Duration::days(1))
                .map(|schedule| schedule.trash_type.display_name()),
            SensorKind::ByType(trash_type) => {
                let schedule = reader.next_collection_of(trash_type)?;
                format_pickup_date(schedule.pickup_date, today)
            }
        }
    }
}

/// Format a pickup date relative to `today`, the way the collector's app does:
/// a bare date when more than a week out, weekday-qualified within the week,
/// and `Tomorrow,`/`Today,` prefixes on the last two days. Dates in the past
/// have no display state.
#[must_use]
pub fn format_pickup_date(pickup: NaiveDate, today: NaiveDate) -> Option<String> {
    let days_until = (pickup - today).num_days();
    match days_until {
        days if days >= 8 => Some(pickup.format("%d-%m-%Y").to_string()),
        days if days > 1 => Some(pickup.format("%A, %d-%m-%Y").to_string()),
        1 => Some(pickup.format("Tomorrow, %d-%m-%Y").to_string()),
        0 => Some(pickup.format("Today, %d-%m-%Y").to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;
    use crate::model::{AddressId, DateRange, WasteSchedule};
    use crate::ports::{ApiError, WastePort};

    /// Port that serves a fixed snapshot without touching the network.
    struct StaticPort(Vec<WasteSchedule>);

    #[async_trait]
    impl WastePort for StaticPort {
        async fn resolve_address(
            &self,
            _postcode: &str,
            _house_number: &str,
        ) -> Result<AddressId, ApiError> {
            Ok(AddressId("static".to_owned()))
        }

        async fn calendar(
            &self,
            _address_id: &AddressId,
            _range: DateRange,
        ) -> Result<Vec<WasteSchedule>, ApiError> {
            Ok(self.0.clone())
        }
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    async fn reader_with(schedules: Vec<WasteSchedule>, today: NaiveDate) -> WasteApiReader {
        let port = Arc::new(StaticPort(schedules));
        let mut reader = WasteApiReader::new(port, "7541GE", "12");
        reader
            .refresh_with_today(today)
            .await
            .expect("static refresh should succeed");
        reader
    }

    fn grey_on(pickup_date: NaiveDate) -> WasteSchedule {
        WasteSchedule {
            trash_type: TrashType::Grey,
            pickup_date,
        }
    }

    #[test]
    fn far_out_pickups_format_as_a_bare_date() {
        let today = date(2024, 3, 1);
        let state = format_pickup_date(date(2024, 3, 9), today);
        assert_eq!(state.as_deref(), Some("09-03-2024"));
    }

    #[test]
    fn pickups_within_the_week_carry_the_weekday() {
        let today = date(2024, 3, 1);
        // 2024-03-05 is a Tuesday.
        let state = format_pickup_date(date(2024, 3, 5), today);
        assert_eq!(state.as_deref(), Some("Tuesday, 05-03-2024"));
    }

    #[test]
    fn the_last_two_days_get_relative_prefixes() {
        let today = date(2024, 3, 1);
        assert_eq!(
            format_pickup_date(date(2024, 3, 2), today).as_deref(),
            Some("Tomorrow, 02-03-2024")
        );
        assert_eq!(
            format_pickup_date(today, today).as_deref(),
            Some("Today, 01-03-2024")
        );
    }

    #[test]
    fn past_pickups_have_no_state() {
        let today = date(2024, 3, 1);
        assert_eq!(format_pickup_date(date(2024, 2, 29), today), None);
    }

    #[tokio::test]
    async fn by_type_sensor_reports_the_next_matching_pickup() {
        let today = date(2024, 3, 1);
        let reader = reader_with(
            vec![grey_on(date(2024, 3, 2)), grey_on(date(2024, 3, 16))],
            today,
        )
        .await;

        let sensor = WasteSensor::new(SensorKind::from_key("grey"));
        assert_eq!(sensor.name(), "Twentemilieu Restafval");
        assert_eq!(
            sensor.state_on(&reader, today).as_deref(),
            Some("Tomorrow, 02-03-2024")
        );
    }

    #[tokio::test]
    async fn today_sensor_names_the_collected_stream() {
        let today = date(2024, 3, 1);
        let reader = reader_with(vec![grey_on(today)], today).await;

        let sensor = WasteSensor::new(SensorKind::Today);
        assert_eq!(sensor.state_on(&reader, today).as_deref(), Some("Restafval"));
    }

    #[tokio::test]
    async fn today_sensor_is_absent_without_a_matching_pickup() {
        let today = date(2024, 3, 1);
        let reader = reader_with(vec![grey_on(date(2024, 3, 4))], today).await;

        let sensor = WasteSensor::new(SensorKind::Today);
        assert_eq!(sensor.state_on(&reader, today), None);

        let tomorrow_sensor = WasteSensor::new(SensorKind::Tomorrow);
        assert_eq!(tomorrow_sensor.state_on(&reader, today), None);
    }
}
