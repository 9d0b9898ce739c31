#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Immutable labeled snapshot and the derived filtered views.
//!
//! The pipeline builds one [`Snapshot`] at startup (incidents plus their
//! cluster labels) and every consumer reads from it; nothing mutates it
//! afterwards. Filtering produces an index-based [`FilteredView`] — the
//! derived node of the dashboard's reactive graph — and the four view
//! computations in [`views`] read from either the snapshot or a filtered
//! view. Clustering is never re-run on a filtered subset; labels are
//! assigned once over the full dataset and filtered post-hoc.

pub mod views;

use std::collections::BTreeSet;

use chrono::NaiveDate;
use hotspot_map_analytics_models::FilterState;
use hotspot_map_incident_models::{Incident, NOISE_LABEL};

/// The labeled dataset: one cluster label per incident, same order.
#[derive(Debug)]
pub struct Snapshot {
    incidents: Vec<Incident>,
    labels: Vec<u32>,
}

/// Error building a snapshot from mismatched inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelMismatchError {
    /// Number of incidents provided.
    pub incidents: usize,
    /// Number of labels provided.
    pub labels: usize,
}

impl std::fmt::Display for LabelMismatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "label count {} does not match incident count {}",
            self.labels, self.incidents
        )
    }
}

impl std::error::Error for LabelMismatchError {}

impl Snapshot {
    /// Builds the snapshot from cleaned incidents and their cluster labels.
    ///
    /// # Errors
    ///
    /// Returns an error if the label vector length does not match the
    /// incident count.
    pub fn build(incidents: Vec<Incident>, labels: Vec<u32>) -> Result<Self, LabelMismatchError> {
        if incidents.len() != labels.len() {
            return Err(LabelMismatchError {
                incidents: incidents.len(),
                labels: labels.len(),
            });
        }
        log::debug!("Snapshot built: {} labeled incidents", incidents.len());
        Ok(Self { incidents, labels })
    }

    /// Number of records.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.incidents.len()
    }

    /// Whether the snapshot holds no records.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.incidents.is_empty()
    }

    /// All incidents, in load order.
    #[must_use]
    pub fn incidents(&self) -> &[Incident] {
        &self.incidents
    }

    /// Cluster labels, position-matched to [`Self::incidents`].
    #[must_use]
    pub fn labels(&self) -> &[u32] {
        &self.labels
    }

    /// Number of distinct non-noise clusters.
    #[must_use]
    pub fn cluster_count(&self) -> usize {
        self.labels
            .iter()
            .filter(|&&l| l != NOISE_LABEL)
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Number of noise-labeled records.
    #[must_use]
    pub fn noise_count(&self) -> usize {
        self.labels.iter().filter(|&&l| l == NOISE_LABEL).count()
    }

    /// Earliest and latest incident dates, if any records exist.
    #[must_use]
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.incidents.iter().map(|i| i.date).min()?;
        let max = self.incidents.iter().map(|i| i.date).max()?;
        Some((min, max))
    }

    /// Sorted set of distinct category labels.
    #[must_use]
    pub fn categories(&self) -> BTreeSet<String> {
        self.incidents
            .iter()
            .map(|i| i.category.clone())
            .collect()
    }

    /// Applies a filter, producing the derived filtered-dataset node.
    #[must_use]
    pub fn filter(&self, state: &FilterState) -> FilteredView<'_> {
        let indices = (0..self.incidents.len())
            .filter(|&i| {
                let incident = &self.incidents[i];
                state.matches(incident.date, &incident.category)
            })
            .collect();
        FilteredView {
            snapshot: self,
            indices,
        }
    }
}

/// A read-only subset of the snapshot, held as row indices.
#[derive(Debug)]
pub struct FilteredView<'a> {
    snapshot: &'a Snapshot,
    indices: Vec<usize>,
}

impl FilteredView<'_> {
    /// Number of surviving records.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether the filter matched nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Iterates surviving `(incident, cluster label)` pairs in load order.
    pub fn iter(&self) -> impl Iterator<Item = (&Incident, u32)> {
        self.indices
            .iter()
            .map(|&i| (&self.snapshot.incidents[i], self.snapshot.labels[i]))
    }

    /// Re-applies a filter to this view's rows.
    ///
    /// Applying the same state twice yields the same row set (filtering is
    /// idempotent).
    #[must_use]
    pub fn refilter(&self, state: &FilterState) -> FilteredView<'_> {
        let indices = self
            .indices
            .iter()
            .copied()
            .filter(|&i| {
                let incident = &self.snapshot.incidents[i];
                state.matches(incident.date, &incident.category)
            })
            .collect();
        FilteredView {
            snapshot: self.snapshot,
            indices,
        }
    }
}
