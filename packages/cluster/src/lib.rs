#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Density-based hotspot clustering (DBSCAN) over planar coordinates.
//!
//! Builds an R-tree over the projected incident points and runs a single
//! DBSCAN pass with fixed parameters. A point is a core point if at least
//! `min_pts` *other* points lie within `eps` meters; clusters grow by BFS
//! expansion from core points in input order, so the labeling is
//! deterministic for a fixed input order and parameter pair. Points dense
//! enough to join nothing are labeled with the noise sentinel `0`; real
//! clusters are numbered from 1. Cluster IDs carry no meaning beyond
//! grouping.

use std::collections::VecDeque;

use hotspot_map_incident_models::NOISE_LABEL;
use hotspot_map_projection::PlanarCoord;
use rstar::{AABB, PointDistance, RTree, RTreeObject};

/// A projected incident point stored in the R-tree with its row index.
struct IndexedPoint {
    index: usize,
    position: [f64; 2],
}

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position)
    }
}

impl PointDistance for IndexedPoint {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.position[0] - point[0];
        let dy = self.position[1] - point[1];
        dx * dx + dy * dy
    }
}

/// Fixed-parameter DBSCAN cluster assigner.
#[derive(Debug, Clone, Copy)]
pub struct Dbscan {
    /// Neighborhood radius in meters.
    eps: f64,
    /// Minimum number of *other* points within `eps` for a core point.
    min_pts: usize,
}

impl Dbscan {
    /// Creates an assigner with the given neighborhood radius (meters) and
    /// minimum neighbor count.
    #[must_use]
    pub const fn new(eps: f64, min_pts: usize) -> Self {
        Self { eps, min_pts }
    }

    /// Assigns one cluster label per input point.
    ///
    /// The output has exactly one label per input, position for position.
    /// Labels are [`NOISE_LABEL`] (0) or positive cluster IDs starting
    /// at 1.
    #[must_use]
    pub fn assign(&self, points: &[PlanarCoord]) -> Vec<u32> {
        let tree = RTree::bulk_load(
            points
                .iter()
                .enumerate()
                .map(|(index, p)| IndexedPoint {
                    index,
                    position: [p.easting, p.northing],
                })
                .collect(),
        );

        let eps2 = self.eps * self.eps;
        let neighbors_of = |i: usize| -> Vec<usize> {
            let pos = [points[i].easting, points[i].northing];
            tree.locate_within_distance(pos, eps2)
                .map(|entry| entry.index)
                .filter(|&j| j != i)
                .collect()
        };

        let mut labels = vec![NOISE_LABEL; points.len()];
        let mut visited = vec![false; points.len()];
        let mut next_cluster = 1u32;

        for i in 0..points.len() {
            if visited[i] {
                continue;
            }
            visited[i] = true;

            let seed_neighbors = neighbors_of(i);
            if seed_neighbors.len() < self.min_pts {
                // Not a core point; stays noise unless a later cluster
                // expansion reaches it.
                continue;
            }

            let cluster = next_cluster;
            next_cluster += 1;
            labels[i] = cluster;

            let mut queue: VecDeque<usize> = seed_neighbors.into();
            while let Some(j) = queue.pop_front() {
                if labels[j] == NOISE_LABEL {
                    // Border or unprocessed point joins the cluster that
                    // reached it first.
                    labels[j] = cluster;
                }
                if visited[j] {
                    continue;
                }
                visited[j] = true;

                let neighbors = neighbors_of(j);
                if neighbors.len() >= self.min_pts {
                    queue.extend(neighbors);
                }
            }
        }

        let cluster_count = next_cluster - 1;
        let noise = labels.iter().filter(|&&l| l == NOISE_LABEL).count();
        log::info!(
            "DBSCAN (eps={}m, min_pts={}): {cluster_count} cluster(s), {noise} noise point(s) of {}",
            self.eps,
            self.min_pts,
            points.len()
        );

        labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(easting: f64, northing: f64) -> PlanarCoord {
        PlanarCoord { easting, northing }
    }

    /// Five tight points within 10m of each other plus three isolated ones.
    fn tight_and_isolated() -> Vec<PlanarCoord> {
        vec![
            coord(1000.0, 1000.0),
            coord(1005.0, 1002.0),
            coord(1003.0, 1007.0),
            coord(998.0, 1004.0),
            coord(1001.0, 996.0),
            coord(5000.0, 5000.0),
            coord(9000.0, 1000.0),
            coord(1000.0, 9000.0),
        ]
    }

    #[test]
    fn one_label_per_point() {
        let points = tight_and_isolated();
        let labels = Dbscan::new(20.0, 3).assign(&points);
        assert_eq!(labels.len(), points.len());
    }

    #[test]
    fn tight_group_shares_a_label_and_outliers_are_noise() {
        let points = tight_and_isolated();
        let labels = Dbscan::new(20.0, 3).assign(&points);

        let first = labels[0];
        assert_ne!(first, NOISE_LABEL);
        for label in &labels[..5] {
            assert_eq!(*label, first);
        }
        for label in &labels[5..] {
            assert_eq!(*label, NOISE_LABEL);
        }
    }

    #[test]
    fn two_separate_groups_get_distinct_labels() {
        let mut points = Vec::new();
        for i in 0..4 {
            points.push(coord(f64::from(i), 0.0));
        }
        for i in 0..4 {
            points.push(coord(10_000.0 + f64::from(i), 0.0));
        }

        let labels = Dbscan::new(5.0, 3).assign(&points);
        assert_ne!(labels[0], NOISE_LABEL);
        assert_ne!(labels[4], NOISE_LABEL);
        assert_ne!(labels[0], labels[4]);
        assert!(labels[..4].iter().all(|&l| l == labels[0]));
        assert!(labels[4..].iter().all(|&l| l == labels[4]));
    }

    #[test]
    fn assignment_is_deterministic() {
        let points = tight_and_isolated();
        let dbscan = Dbscan::new(20.0, 3);
        assert_eq!(dbscan.assign(&points), dbscan.assign(&points));
    }

    #[test]
    fn density_reachability_holds_within_clusters() {
        let points = tight_and_isolated();
        let eps = 20.0;
        let labels = Dbscan::new(eps, 3).assign(&points);

        // For any two same-cluster points, a chain of same-cluster points
        // each within eps of the next must connect them.
        for i in 0..points.len() {
            for j in (i + 1)..points.len() {
                if labels[i] != labels[j] || labels[i] == NOISE_LABEL {
                    continue;
                }
                let members: Vec<usize> = (0..points.len())
                    .filter(|&k| labels[k] == labels[i])
                    .collect();
                assert!(
                    chain_exists(&points, &members, i, j, eps),
                    "no eps-chain between points {i} and {j}"
                );
            }
        }
    }

    fn chain_exists(
        points: &[PlanarCoord],
        members: &[usize],
        from: usize,
        to: usize,
        eps: f64,
    ) -> bool {
        let mut reached = vec![from];
        let mut frontier = vec![from];
        while let Some(current) = frontier.pop() {
            if current == to {
                return true;
            }
            for &candidate in members {
                if !reached.contains(&candidate)
                    && points[current].distance(&points[candidate]) <= eps
                {
                    reached.push(candidate);
                    frontier.push(candidate);
                }
            }
        }
        false
    }

    #[test]
    fn empty_input_yields_empty_labels() {
        let labels = Dbscan::new(20.0, 3).assign(&[]);
        assert!(labels.is_empty());
    }
}
