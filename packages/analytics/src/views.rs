//! The four dashboard view computations.
//!
//! All views read from the snapshot (or a filtered view of it) and none
//! mutate anything. Each returns a [`ViewResult`] so an empty subset
//! surfaces as an explicit placeholder.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use hotspot_map_analytics_models::{
    CategoryCount, CategoryShare, ClusterProfile, FilterState, MapMarker, TrendSeries, ViewResult,
};
use hotspot_map_incident_models::{Month, NOISE_LABEL};

use crate::{FilteredView, Snapshot};

/// Number of clusters shown in the composition view.
pub const TOP_CLUSTERS: usize = 4;

/// Number of categories profiled per cluster.
pub const TOP_CATEGORIES_PER_CLUSTER: usize = 3;

/// Category overview: incident count per category, descending.
///
/// Reads the full snapshot; this view is not filter-dependent.
#[must_use]
pub fn overview(snapshot: &Snapshot) -> ViewResult<Vec<CategoryCount>> {
    if snapshot.is_empty() {
        return ViewResult::NoData;
    }

    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for incident in snapshot.incidents() {
        *counts.entry(&incident.category).or_default() += 1;
    }

    let mut bars: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(category, count)| CategoryCount {
            category: category.to_string(),
            count,
        })
        .collect();
    // Descending by count; name order breaks ties deterministically.
    bars.sort_by(|a, b| b.count.cmp(&a.count).then(a.category.cmp(&b.category)));

    ViewResult::Data(bars)
}

/// Monthly trends for a selected set of categories: one series per
/// category, months in chronological order.
#[must_use]
pub fn trends(snapshot: &Snapshot, categories: &BTreeSet<String>) -> ViewResult<Vec<TrendSeries>> {
    let state = FilterState {
        date_range: None,
        categories: Some(categories.clone()),
    };
    let view = snapshot.filter(&state);
    if view.is_empty() {
        return ViewResult::NoData;
    }

    let mut grouped: BTreeMap<&str, BTreeMap<Month, u64>> = BTreeMap::new();
    for (incident, _) in view.iter() {
        *grouped
            .entry(&incident.category)
            .or_default()
            .entry(incident.month)
            .or_default() += 1;
    }

    let series = grouped
        .into_iter()
        .map(|(category, by_month)| TrendSeries {
            category: category.to_string(),
            // BTreeMap iteration gives chronological month order.
            points: by_month.into_iter().collect(),
        })
        .collect();

    ViewResult::Data(series)
}

/// Hotspot map markers: one per surviving incident, colored by cluster.
#[must_use]
pub fn map_markers(view: &FilteredView<'_>) -> ViewResult<Vec<MapMarker>> {
    if view.is_empty() {
        return ViewResult::NoData;
    }

    let markers = view
        .iter()
        .map(|(incident, cluster)| MapMarker {
            lat: incident.lat,
            lng: incident.lng,
            category: incident.category.clone(),
            cluster,
        })
        .collect();

    ViewResult::Data(markers)
}

/// Cluster composition: top clusters by size, each profiled by its top
/// categories' percentage share.
///
/// Noise points are excluded before ranking. A filtered subset with zero
/// clustered points yields the placeholder.
#[must_use]
pub fn cluster_profiles(view: &FilteredView<'_>) -> ViewResult<Vec<ClusterProfile>> {
    let mut by_cluster: BTreeMap<u32, BTreeMap<&str, u64>> = BTreeMap::new();
    for (incident, cluster) in view.iter() {
        if cluster == NOISE_LABEL {
            continue;
        }
        *by_cluster
            .entry(cluster)
            .or_default()
            .entry(&incident.category)
            .or_default() += 1;
    }

    if by_cluster.is_empty() {
        return ViewResult::NoData;
    }

    let mut ranked: Vec<(u32, BTreeMap<&str, u64>)> = by_cluster.into_iter().collect();
    // Largest first; cluster ID breaks ties deterministically.
    ranked.sort_by(|a, b| {
        let size_a: u64 = a.1.values().sum();
        let size_b: u64 = b.1.values().sum();
        size_b.cmp(&size_a).then(a.0.cmp(&b.0))
    });
    ranked.truncate(TOP_CLUSTERS);

    let profiles = ranked
        .into_iter()
        .map(|(cluster, categories)| {
            let size: u64 = categories.values().sum();

            let mut shares: Vec<CategoryShare> = categories
                .into_iter()
                .map(|(category, count)| CategoryShare {
                    category: category.to_string(),
                    count,
                    #[allow(clippy::cast_precision_loss)]
                    percent: count as f64 / size as f64 * 100.0,
                })
                .collect();
            shares.sort_by(|a, b| b.count.cmp(&a.count).then(a.category.cmp(&b.category)));
            shares.truncate(TOP_CATEGORIES_PER_CLUSTER);

            ClusterProfile {
                cluster,
                size,
                top_categories: shares,
            }
        })
        .collect();

    ViewResult::Data(profiles)
}
