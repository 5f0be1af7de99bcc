//! Domain data structures for addresses, trash streams, and pickup schedules.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Identifier assigned to a resolved address by the waste collector.
pub struct AddressId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Waste streams recognized by the collector.
pub enum TrashType {
    /// Residual/gray bin.
    Grey,
    /// Organic waste (GFT).
    Green,
    /// Paper and cardboard.
    Paper,
    /// Packaging (PMD).
    Packages,
    /// Upstream-reported stream outside the built-in set, stored by its
    /// uppercased label.
    Other(String),
}

impl TrashType {
    /// Parse an upstream type label, case-insensitively.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let key = label.trim().to_uppercase();
        match key.as_str() {
            "GREY" => Self::Grey,
            "GREEN" => Self::Green,
            "PAPER" => Self::Paper,
            "PACKAGES" => Self::Packages,
            _ => Self::Other(key),
        }
    }

    /// Canonical uppercase key used for matching and configuration.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Grey => "GREY",
            Self::Green => "GREEN",
            Self::Paper => "PAPER",
            Self::Packages => "PACKAGES",
            Self::Other(label) => label.as_str(),
        }
    }

    /// Display name as shown by the collector's own app.
    ///
    /// Unknown streams synthesize a title-cased name from their key instead
    /// of being rejected.
    #[must_use]
    pub fn display_name(&self) -> String {
        match self {
            Self::Grey => "Restafval".to_owned(),
            Self::Green => "Groente, fruit- en tuinafval".to_owned(),
            Self::Paper => "Papier en karton".to_owned(),
            Self::Packages => "PMD".to_owned(),
            Self::Other(label) => title_case(label),
        }
    }

    /// Icon identifier for display surfaces.
    #[must_use]
    pub fn icon(&self) -> &'static str {
        "mdi:recycle"
    }
}

impl fmt::Display for TrashType {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One scheduled collection event for one trash stream on one date.
pub struct WasteSchedule {
    /// Stream being collected.
    pub trash_type: TrashType,
    /// Date of the pickup.
    pub pickup_date: NaiveDate,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
/// Inclusive start/end range for requested schedules.
pub struct DateRange {
    /// Start date (inclusive).
    pub start: NaiveDate,
    /// End date (inclusive).
    pub end: NaiveDate,
}

fn title_case(label: &str) -> String {
    label
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
            })
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_parse_case_insensitively() {
        assert_eq!(TrashType::from_label("grey"), TrashType::Grey);
        assert_eq!(TrashType::from_label("Packages"), TrashType::Packages);
        assert_eq!(
            TrashType::from_label("tree"),
            TrashType::Other("TREE".to_owned())
        );
    }

    #[test]
    fn unknown_streams_synthesize_a_display_name() {
        let christmas = TrashType::from_label("CHRISTMAS TREE");
        assert_eq!(christmas.display_name(), "Christmas Tree");
        assert_eq!(christmas.icon(), "mdi:recycle");
    }

    #[test]
    fn known_streams_keep_the_collector_names() {
        assert_eq!(TrashType::Grey.display_name(), "Restafval");
        assert_eq!(TrashType::Packages.display_name(), "PMD");
    }
}
