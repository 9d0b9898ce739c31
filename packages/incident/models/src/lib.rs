#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Incident record and temporal taxonomy types.
//!
//! This crate defines the canonical in-memory representation of a
//! police-recorded incident and the derived temporal features (`Month`,
//! `Season`) shared by every stage of the hotspot pipeline. Records are
//! immutable once loaded; the only thing ever attached after the fact is
//! the cluster label, which lives in a parallel vector owned by the
//! snapshot, not on the record itself.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Cluster label sentinel for points too sparse to join any cluster.
pub const NOISE_LABEL: u32 = 0;

/// Calendar month as an ordered categorical with chronological `Ord`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Month {
    /// January
    Jan = 1,
    /// February
    Feb = 2,
    /// March
    Mar = 3,
    /// April
    Apr = 4,
    /// May
    May = 5,
    /// June
    Jun = 6,
    /// July
    Jul = 7,
    /// August
    Aug = 8,
    /// September
    Sep = 9,
    /// October
    Oct = 10,
    /// November
    Nov = 11,
    /// December
    Dec = 12,
}

impl Month {
    /// Returns the 1-based month number.
    #[must_use]
    pub const fn number(self) -> u8 {
        self as u8
    }

    /// Creates a month from a 1-based month number.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not in the range 1-12.
    pub const fn from_number(value: u8) -> Result<Self, InvalidMonthError> {
        match value {
            1 => Ok(Self::Jan),
            2 => Ok(Self::Feb),
            3 => Ok(Self::Mar),
            4 => Ok(Self::Apr),
            5 => Ok(Self::May),
            6 => Ok(Self::Jun),
            7 => Ok(Self::Jul),
            8 => Ok(Self::Aug),
            9 => Ok(Self::Sep),
            10 => Ok(Self::Oct),
            11 => Ok(Self::Nov),
            12 => Ok(Self::Dec),
            _ => Err(InvalidMonthError { value }),
        }
    }

    /// Returns the meteorological season this month belongs to.
    #[must_use]
    pub const fn season(self) -> Season {
        match self {
            Self::Dec | Self::Jan | Self::Feb => Season::Winter,
            Self::Mar | Self::Apr | Self::May => Season::Spring,
            Self::Jun | Self::Jul | Self::Aug => Season::Summer,
            Self::Sep | Self::Oct | Self::Nov => Season::Autumn,
        }
    }

    /// Returns all months in chronological order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Jan,
            Self::Feb,
            Self::Mar,
            Self::Apr,
            Self::May,
            Self::Jun,
            Self::Jul,
            Self::Aug,
            Self::Sep,
            Self::Oct,
            Self::Nov,
            Self::Dec,
        ]
    }
}

/// Error returned when attempting to create a [`Month`] from an invalid
/// month number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidMonthError {
    /// The invalid month number that was provided.
    pub value: u8,
}

impl std::fmt::Display for InvalidMonthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid month number {}: expected 1-12", self.value)
    }
}

impl std::error::Error for InvalidMonthError {}

/// Meteorological season, derived deterministically from [`Month`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Season {
    /// December through February
    Winter,
    /// March through May
    Spring,
    /// June through August
    Summer,
    /// September through November
    Autumn,
}

impl Season {
    /// Returns all seasons in calendar order starting from winter.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Winter, Self::Spring, Self::Summer, Self::Autumn]
    }
}

/// A single police-recorded incident after cleaning.
///
/// `date` is a year-month value with the day pinned to 1 (source data is
/// year-month granularity). `lat`/`lng` are WGS84 (EPSG:4326) and are
/// guaranteed present: rows without coordinates never survive ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    /// Free-text category label from the source (e.g. `"violent-crime"`).
    pub category: String,
    /// Incident date at year-month granularity, day assumed to be 1.
    pub date: NaiveDate,
    /// WGS84 latitude.
    pub lat: f64,
    /// WGS84 longitude.
    pub lng: f64,
    /// Calendar month, derived from `date`.
    pub month: Month,
    /// Season, derived from `month`.
    pub season: Season,
}

impl Incident {
    /// Builds an incident from its source fields, deriving `month` and
    /// `season` from the date.
    ///
    /// # Panics
    ///
    /// Never panics: a `NaiveDate` month is always in 1-12.
    #[must_use]
    pub fn new(category: String, date: NaiveDate, lat: f64, lng: f64) -> Self {
        let month = Month::from_number(u8::try_from(date.month()).unwrap_or(1))
            .unwrap_or(Month::Jan);
        Self {
            category,
            date,
            lat,
            lng,
            month,
            season: month.season(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_number_roundtrip() {
        for v in 1..=12u8 {
            let month = Month::from_number(v).unwrap();
            assert_eq!(month.number(), v);
        }
        assert!(Month::from_number(0).is_err());
        assert!(Month::from_number(13).is_err());
    }

    #[test]
    fn months_are_chronologically_ordered() {
        let all = Month::all();
        for pair in all.windows(2) {
            assert!(pair[0] < pair[1], "{:?} should sort before {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn season_mapping_is_total() {
        for month in Month::all() {
            // Every month maps to exactly one of the four seasons.
            assert!(Season::all().contains(&month.season()));
        }
        assert_eq!(Month::Dec.season(), Season::Winter);
        assert_eq!(Month::Feb.season(), Season::Winter);
        assert_eq!(Month::Mar.season(), Season::Spring);
        assert_eq!(Month::Aug.season(), Season::Summer);
        assert_eq!(Month::Nov.season(), Season::Autumn);
    }

    #[test]
    fn incident_derives_temporal_features() {
        let date = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        let incident = Incident::new("burglary".to_string(), date, 51.5, -0.12);
        assert_eq!(incident.month, Month::Jul);
        assert_eq!(incident.season, Season::Summer);
    }
}
