#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the hotspot dashboard server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the analytics types to allow independent evolution of the API
//! contract; an empty view serializes as `{ "noData": true }` rather than
//! an error status.

use chrono::NaiveDate;
use hotspot_map_analytics_models::{CategoryCount, ClusterProfile, MapMarker, TrendSeries, ViewResult};
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the server considers itself healthy.
    pub healthy: bool,
    /// Crate version string.
    pub version: String,
}

/// Dataset metadata used to populate the dashboard's pickers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMeta {
    /// Total analyzed incidents.
    pub incident_count: u64,
    /// Earliest incident date, if any records exist.
    pub date_from: Option<NaiveDate>,
    /// Latest incident date, if any records exist.
    pub date_to: Option<NaiveDate>,
    /// Distinct categories, sorted.
    pub categories: Vec<String>,
    /// Number of non-noise clusters.
    pub cluster_count: u64,
}

/// Query parameters shared by the filter-dependent endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterParams {
    /// Inclusive start date (`YYYY-MM-DD`).
    pub from: Option<NaiveDate>,
    /// Inclusive end date (`YYYY-MM-DD`).
    pub to: Option<NaiveDate>,
    /// Comma-separated category names.
    pub categories: Option<String>,
}

/// Query parameters for the trends endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendParams {
    /// Comma-separated category names to plot. Absent means all.
    pub categories: Option<String>,
}

/// A view payload, or the explicit no-data placeholder.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all_fields = "camelCase", untagged)]
pub enum ApiView<T> {
    /// The view has content.
    Data {
        /// The view payload.
        data: T,
    },
    /// The filtered subset was empty.
    NoData {
        /// Always `true`; lets clients branch without inspecting `data`.
        no_data: bool,
    },
}

impl<T> From<ViewResult<T>> for ApiView<T> {
    fn from(result: ViewResult<T>) -> Self {
        match result {
            ViewResult::Data(data) => Self::Data { data },
            ViewResult::NoData => Self::NoData { no_data: true },
        }
    }
}

/// Overview endpoint payload.
pub type ApiOverview = ApiView<Vec<CategoryCount>>;

/// Trends endpoint payload.
pub type ApiTrends = ApiView<Vec<TrendSeries>>;

/// Map endpoint payload.
pub type ApiMap = ApiView<Vec<MapMarker>>;

/// Cluster profiles endpoint payload.
pub type ApiClusters = ApiView<Vec<ClusterProfile>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_result_converts_to_api_view() {
        let data: ApiView<u32> = ViewResult::Data(5).into();
        assert!(matches!(data, ApiView::Data { data: 5 }));

        let empty: ApiView<u32> = ViewResult::NoData.into();
        assert!(matches!(empty, ApiView::NoData { no_data: true }));
    }
}
