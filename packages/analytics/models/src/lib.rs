#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filter state and view result types for the hotspot analytics layer.
//!
//! These types model the dashboard's reactive graph explicitly: the two
//! filter inputs (date range, category set) form a [`FilterState`], the
//! derived filtered-dataset node is computed from it, and every dependent
//! view returns a [`ViewResult`] so an empty subset renders as a
//! placeholder instead of an error.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use hotspot_map_incident_models::Month;
use serde::{Deserialize, Serialize};

/// The dashboard's two reactive inputs.
///
/// `None` in either slot means "no restriction". Date bounds are inclusive
/// at both ends.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    /// Inclusive `(from, to)` date range.
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    /// Categories to keep; empty set matches nothing.
    pub categories: Option<BTreeSet<String>>,
}

impl FilterState {
    /// A filter that keeps everything.
    #[must_use]
    pub const fn unrestricted() -> Self {
        Self {
            date_range: None,
            categories: None,
        }
    }

    /// Whether an incident with this date and category survives the filter.
    #[must_use]
    pub fn matches(&self, date: NaiveDate, category: &str) -> bool {
        if let Some((from, to)) = self.date_range
            && (date < from || date > to)
        {
            return false;
        }
        if let Some(categories) = &self.categories
            && !categories.contains(category)
        {
            return false;
        }
        true
    }
}

/// Result of a view computation: data, or an explicit no-data placeholder.
///
/// Every filter-dependent view degrades to `NoData` on an empty subset
/// rather than erroring or rendering a broken chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ViewResult<T> {
    /// The view has content.
    Data(T),
    /// The filtered subset was empty; render a placeholder.
    NoData,
}

impl<T> ViewResult<T> {
    /// Returns the contained data, if any.
    #[must_use]
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Data(data) => Some(data),
            Self::NoData => None,
        }
    }

    /// Whether this is the no-data placeholder.
    #[must_use]
    pub const fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData)
    }
}

/// One bar of the category overview: a category and its incident count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    /// Category label.
    pub category: String,
    /// Number of incidents.
    pub count: u64,
}

/// Monthly counts for one category across the ordered months.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendSeries {
    /// Category this series belongs to.
    pub category: String,
    /// One `(month, count)` point per month with at least one incident,
    /// in chronological month order.
    pub points: Vec<(Month, u64)>,
}

/// One map marker: an incident's geographic position plus popup fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapMarker {
    /// WGS84 latitude.
    pub lat: f64,
    /// WGS84 longitude.
    pub lng: f64,
    /// Category label for the popup.
    pub category: String,
    /// Cluster label for coloring (0 = noise).
    pub cluster: u32,
}

/// Percentage share of one category within a cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryShare {
    /// Category label.
    pub category: String,
    /// Incident count within the cluster.
    pub count: u64,
    /// Share of the cluster, in percent.
    pub percent: f64,
}

/// Composition profile of one non-noise cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterProfile {
    /// Cluster label.
    pub cluster: u32,
    /// Total incidents in the cluster (after filtering).
    pub size: u64,
    /// Top categories by share, largest first (at most 3).
    pub top_categories: Vec<CategoryShare>,
}
