#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Static report generation from the labeled snapshot.
//!
//! Renders the category overview, monthly trends, and cluster composition
//! as PNG charts plus a Markdown summary, all written to one output
//! directory. Views that come back empty are skipped and noted in the
//! summary instead of producing broken charts.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use hotspot_map_analytics::views::{self, TOP_CLUSTERS};
use hotspot_map_analytics::{FilteredView, Snapshot};
use hotspot_map_analytics_models::{
    CategoryCount, ClusterProfile, FilterState, TrendSeries, ViewResult,
};
use plotters::prelude::*;
use thiserror::Error;

/// Output file name for the category overview chart.
pub const OUTPUT_OVERVIEW_PNG: &str = "overview.png";

/// Output file name for the monthly trends chart.
pub const OUTPUT_TRENDS_PNG: &str = "trends.png";

/// Output file name for the cluster composition chart.
pub const OUTPUT_CLUSTERS_PNG: &str = "cluster_profiles.png";

/// Output file name for the Markdown summary.
pub const OUTPUT_SUMMARY_MD: &str = "summary.md";

/// Colors used to distinguish clusters and trend series.
const SERIES_COLORS: [RGBColor; 8] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
];

/// Errors raised while writing report artifacts.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Output directory or summary file could not be written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Chart rendering failed.
    #[error("chart rendering failed: {0}")]
    Chart(String),
}

/// Source accounting carried into the summary document.
#[derive(Debug, Clone, Copy)]
pub struct SourceStats {
    /// Total data rows in the input file.
    pub total_rows: usize,
    /// Rows dropped for missing coordinates.
    pub dropped_missing_coords: usize,
}

/// Files written by a successful report run.
#[derive(Debug, Clone)]
pub struct ReportArtifacts {
    /// Paths of every artifact written, in generation order.
    pub files: Vec<PathBuf>,
}

/// Renders every chart plus the Markdown summary into `out_dir`.
///
/// # Errors
///
/// Returns an error if the output directory cannot be created or a chart
/// or the summary fails to write. Empty views are not errors; the affected
/// chart is skipped and the summary says so.
pub fn generate_report(
    snapshot: &Snapshot,
    stats: SourceStats,
    out_dir: &Path,
) -> Result<ReportArtifacts, ReportError> {
    std::fs::create_dir_all(out_dir)?;

    let mut files = Vec::new();

    let overview = views::overview(snapshot);
    if let ViewResult::Data(bars) = &overview {
        let path = out_dir.join(OUTPUT_OVERVIEW_PNG);
        render_overview_chart(bars, &path)?;
        log::info!("Wrote {}", path.display());
        files.push(path);
    } else {
        log::warn!("Overview view empty; skipping {OUTPUT_OVERVIEW_PNG}");
    }

    let trends = views::trends(snapshot, &snapshot.categories());
    if let ViewResult::Data(series) = &trends {
        let path = out_dir.join(OUTPUT_TRENDS_PNG);
        render_trends_chart(series, &path)?;
        log::info!("Wrote {}", path.display());
        files.push(path);
    } else {
        log::warn!("Trend view empty; skipping {OUTPUT_TRENDS_PNG}");
    }

    let full_view = snapshot.filter(&FilterState::unrestricted());
    let profiles = views::cluster_profiles(&full_view);
    if let ViewResult::Data(profiles) = &profiles {
        let path = out_dir.join(OUTPUT_CLUSTERS_PNG);
        render_cluster_chart(profiles, &path)?;
        log::info!("Wrote {}", path.display());
        files.push(path);
    } else {
        log::warn!("No clustered points; skipping {OUTPUT_CLUSTERS_PNG}");
    }

    let summary_path = out_dir.join(OUTPUT_SUMMARY_MD);
    let summary = build_summary(snapshot, stats, &full_view, &overview, &profiles);
    std::fs::write(&summary_path, summary)?;
    log::info!("Wrote {}", summary_path.display());
    files.push(summary_path);

    Ok(ReportArtifacts { files })
}

/// Category bar chart, descending, with a count label above each bar.
fn render_overview_chart(bars: &[CategoryCount], path: &Path) -> Result<(), ReportError> {
    let root = BitMapBackend::new(path, (900, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(to_chart_error)?;

    let max_count = bars.iter().map(|b| b.count).max().unwrap_or(1);
    #[allow(clippy::cast_precision_loss)]
    let y_max = max_count as f64 * 1.15;
    #[allow(clippy::cast_precision_loss)]
    let x_max = bars.len() as f64;

    let mut chart = ChartBuilder::on(&root)
        .caption("Incidents per category", ("sans-serif", 28))
        .margin(12)
        .x_label_area_size(90)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..x_max, 0f64..y_max)
        .map_err(to_chart_error)?;

    let labels: Vec<&str> = bars.iter().map(|b| b.category.as_str()).collect();
    chart
        .configure_mesh()
        .disable_x_mesh()
        .y_desc("Incidents")
        .x_labels(bars.len())
        .x_label_formatter(&|x| {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let idx = *x as usize;
            labels.get(idx).map_or(String::new(), ToString::to_string)
        })
        .axis_desc_style(("sans-serif", 16))
        .draw()
        .map_err(to_chart_error)?;

    for (i, bar) in bars.iter().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let x = i as f64;
        #[allow(clippy::cast_precision_loss)]
        let height = bar.count as f64;
        let color = SERIES_COLORS[i % SERIES_COLORS.len()];

        chart
            .draw_series(std::iter::once(Rectangle::new(
                [(x + 0.1, 0.0), (x + 0.9, height)],
                color.filled(),
            )))
            .map_err(to_chart_error)?;
        chart
            .draw_series(std::iter::once(Text::new(
                bar.count.to_string(),
                (x + 0.35, height + y_max * 0.02),
                ("sans-serif", 16),
            )))
            .map_err(to_chart_error)?;
    }

    root.present().map_err(to_chart_error)?;
    Ok(())
}

/// Monthly trend lines, one series per category across the ordered months.
fn render_trends_chart(series: &[TrendSeries], path: &Path) -> Result<(), ReportError> {
    let root = BitMapBackend::new(path, (900, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(to_chart_error)?;

    let max_count = series
        .iter()
        .flat_map(|s| s.points.iter().map(|(_, c)| *c))
        .max()
        .unwrap_or(1);
    #[allow(clippy::cast_precision_loss)]
    let y_max = max_count as f64 * 1.1;

    let mut chart = ChartBuilder::on(&root)
        .caption("Monthly incident trends", ("sans-serif", 28))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(1f64..12f64, 0f64..y_max)
        .map_err(to_chart_error)?;

    chart
        .configure_mesh()
        .x_desc("Month")
        .y_desc("Incidents")
        .x_labels(12)
        .axis_desc_style(("sans-serif", 16))
        .draw()
        .map_err(to_chart_error)?;

    for (i, trend) in series.iter().enumerate() {
        let color = SERIES_COLORS[i % SERIES_COLORS.len()];
        let points: Vec<(f64, f64)> = trend
            .points
            .iter()
            .map(|(month, count)| {
                #[allow(clippy::cast_precision_loss)]
                (f64::from(month.number()), *count as f64)
            })
            .collect();

        chart
            .draw_series(LineSeries::new(points, color.stroke_width(2)))
            .map_err(to_chart_error)?
            .label(trend.category.clone())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 18, y)], color.stroke_width(2))
            });
    }

    chart
        .configure_series_labels()
        .border_style(BLACK)
        .background_style(WHITE.mix(0.85))
        .draw()
        .map_err(to_chart_error)?;

    root.present().map_err(to_chart_error)?;
    Ok(())
}

/// Faceted horizontal bars: one panel per top cluster, top categories by
/// percentage share within each.
fn render_cluster_chart(profiles: &[ClusterProfile], path: &Path) -> Result<(), ReportError> {
    let root = BitMapBackend::new(path, (900, 700)).into_drawing_area();
    root.fill(&WHITE).map_err(to_chart_error)?;

    let panels = root.split_evenly((2, TOP_CLUSTERS.div_ceil(2)));

    for (panel, profile) in panels.iter().zip(profiles) {
        let rows = profile.top_categories.len().max(1);

        let mut chart = ChartBuilder::on(panel)
            .caption(
                format!("Cluster {} ({} incidents)", profile.cluster, profile.size),
                ("sans-serif", 18),
            )
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(110)
            .build_cartesian_2d(0f64..100f64, 0f64..rows as f64)
            .map_err(to_chart_error)?;

        let names: Vec<&str> = profile
            .top_categories
            .iter()
            .map(|s| s.category.as_str())
            .collect();
        chart
            .configure_mesh()
            .disable_y_mesh()
            .x_desc("% of cluster")
            .y_labels(rows)
            .y_label_formatter(&|y| {
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let idx = *y as usize;
                names.get(idx).map_or(String::new(), ToString::to_string)
            })
            .axis_desc_style(("sans-serif", 13))
            .draw()
            .map_err(to_chart_error)?;

        for (row, share) in profile.top_categories.iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let y = row as f64;
            let color = SERIES_COLORS[row % SERIES_COLORS.len()];
            chart
                .draw_series(std::iter::once(Rectangle::new(
                    [(0.0, y + 0.15), (share.percent, y + 0.85)],
                    color.filled(),
                )))
                .map_err(to_chart_error)?;
        }
    }

    root.present().map_err(to_chart_error)?;
    Ok(())
}

/// Builds the Markdown summary document.
fn build_summary(
    snapshot: &Snapshot,
    stats: SourceStats,
    full_view: &FilteredView<'_>,
    overview: &ViewResult<Vec<CategoryCount>>,
    profiles: &ViewResult<Vec<ClusterProfile>>,
) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# Hotspot analysis summary\n");
    let _ = writeln!(out, "- Input rows: {}", stats.total_rows);
    let _ = writeln!(
        out,
        "- Dropped (missing coordinates): {}",
        stats.dropped_missing_coords
    );
    let _ = writeln!(out, "- Analyzed incidents: {}", snapshot.len());
    if let Some((from, to)) = snapshot.date_range() {
        let _ = writeln!(out, "- Date range: {from} to {to}");
    }
    let _ = writeln!(out, "- Clusters found: {}", snapshot.cluster_count());
    let _ = writeln!(out, "- Noise points: {}", snapshot.noise_count());
    let _ = writeln!(out, "- Filtered view size: {}", full_view.len());

    let _ = writeln!(out, "\n## Categories\n");
    match overview {
        ViewResult::Data(bars) => {
            for bar in bars {
                let _ = writeln!(out, "- {}: {}", bar.category, bar.count);
            }
        }
        ViewResult::NoData => {
            let _ = writeln!(out, "_No data._");
        }
    }

    let _ = writeln!(out, "\n## Top clusters\n");
    match profiles {
        ViewResult::Data(profiles) => {
            for profile in profiles {
                let _ = writeln!(
                    out,
                    "- Cluster {} ({} incidents): {}",
                    profile.cluster,
                    profile.size,
                    profile
                        .top_categories
                        .iter()
                        .map(|s| format!("{} {:.1}%", s.category, s.percent))
                        .collect::<Vec<_>>()
                        .join(", ")
                );
            }
        }
        ViewResult::NoData => {
            let _ = writeln!(out, "_No clustered points._");
        }
    }

    out
}

fn to_chart_error<E: std::fmt::Display>(error: E) -> ReportError {
    ReportError::Chart(error.to_string())
}
