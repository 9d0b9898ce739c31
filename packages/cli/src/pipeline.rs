//! Linear pipeline: load -> clean -> project -> cluster -> snapshot.
//!
//! Runs once per invocation. Clustering happens here, over the full
//! cleaned dataset; the views downstream only ever filter the labeled
//! snapshot, they never re-cluster a subset.

use std::path::Path;
use std::time::Instant;

use hotspot_map_analytics::Snapshot;
use hotspot_map_cluster::Dbscan;
use hotspot_map_ingest::load_incidents;
use hotspot_map_projection::project_all;

/// Default neighborhood radius in meters, tuned for the reference dataset.
pub const DEFAULT_EPS_METERS: f64 = 250.0;

/// Default minimum neighbor count for a core point.
pub const DEFAULT_MIN_PTS: usize = 10;

/// Clustering parameters, fixed for one pipeline run.
#[derive(Debug, Clone, Copy)]
pub struct PipelineParams {
    /// DBSCAN neighborhood radius in meters.
    pub eps_meters: f64,
    /// DBSCAN minimum neighbor count.
    pub min_pts: usize,
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self {
            eps_meters: DEFAULT_EPS_METERS,
            min_pts: DEFAULT_MIN_PTS,
        }
    }
}

/// Everything the presentation layer needs from one pipeline run.
#[derive(Debug)]
pub struct PipelineOutput {
    /// The immutable labeled dataset.
    pub snapshot: Snapshot,
    /// Total data rows in the input file.
    pub total_rows: usize,
    /// Rows dropped for missing coordinates.
    pub dropped_missing_coords: usize,
}

/// Runs the full pipeline over the incident file at `input`.
///
/// # Errors
///
/// Returns an error if the file cannot be loaded or the cleaned data and
/// label vector disagree (which would indicate a bug in the projection or
/// clustering stage).
pub fn run(
    input: &Path,
    params: &PipelineParams,
) -> Result<PipelineOutput, Box<dyn std::error::Error>> {
    let start = Instant::now();

    let outcome = load_incidents(input)?;

    let planar = project_all(&outcome.incidents);
    let labels = Dbscan::new(params.eps_meters, params.min_pts).assign(&planar);

    let snapshot = Snapshot::build(outcome.incidents, labels)?;

    log::info!(
        "Pipeline complete: {} incidents, {} cluster(s), {} noise point(s) in {:.1}s",
        snapshot.len(),
        snapshot.cluster_count(),
        snapshot.noise_count(),
        start.elapsed().as_secs_f64()
    );

    Ok(PipelineOutput {
        snapshot,
        total_rows: outcome.total_rows,
        dropped_missing_coords: outcome.dropped_missing_coords,
    })
}
