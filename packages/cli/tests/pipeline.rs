//! End-to-end pipeline test over a synthetic incident file.

use std::io::Write as _;

use hotspot_map_analytics::views;
use hotspot_map_analytics_models::{FilterState, ViewResult};
use hotspot_map_cli::pipeline::{self, PipelineParams};
use hotspot_map_incident_models::NOISE_LABEL;
use tempfile::NamedTempFile;

/// Ten rows: two missing coordinates, five clustered within ~10 m of each
/// other in central London, three isolated in other cities.
fn create_test_csv() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "category,date,lat,long").unwrap();

    // Tight group (pairwise well within 100 m).
    writeln!(file, "burglary,2024-01,51.50000,-0.12000").unwrap();
    writeln!(file, "burglary,2024-02,51.50003,-0.12004").unwrap();
    writeln!(file, "robbery,2024-03,51.50006,-0.11997").unwrap();
    writeln!(file, "burglary,2024-04,51.49995,-0.12003").unwrap();
    writeln!(file, "theft,2024-05,51.50001,-0.11995").unwrap();

    // Missing coordinates, dropped during cleaning.
    writeln!(file, "theft,2024-06,,-0.12000").unwrap();
    writeln!(file, "arson,2024-07,51.50000,").unwrap();

    // Isolated incidents, far from everything else.
    writeln!(file, "arson,2024-08,52.20530,0.12180").unwrap();
    writeln!(file, "theft,2024-09,53.48080,-2.24260").unwrap();
    writeln!(file, "robbery,2024-10,55.86420,-4.25180").unwrap();

    file
}

#[test]
fn end_to_end_scenario() {
    let file = create_test_csv();
    let params = PipelineParams {
        eps_meters: 100.0,
        min_pts: 3,
    };

    let output = pipeline::run(file.path(), &params).unwrap();

    // Two rows dropped, eight survive.
    assert_eq!(output.total_rows, 10);
    assert_eq!(output.dropped_missing_coords, 2);
    assert_eq!(output.snapshot.len(), 8);

    // The five tight rows share one non-zero label; the isolated three are
    // noise.
    let labels = output.snapshot.labels();
    assert_eq!(labels.len(), 8);
    let shared = labels[0];
    assert_ne!(shared, NOISE_LABEL);
    assert!(labels[..5].iter().all(|&l| l == shared));
    assert!(labels[5..].iter().all(|&l| l == NOISE_LABEL));

    // The composition view reports exactly one cluster with 5 members.
    let view = output.snapshot.filter(&FilterState::unrestricted());
    let profiles = match views::cluster_profiles(&view) {
        ViewResult::Data(profiles) => profiles,
        ViewResult::NoData => panic!("expected one cluster"),
    };
    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0].size, 5);
    assert_eq!(profiles[0].top_categories[0].category, "burglary");
    assert!((profiles[0].top_categories[0].percent - 60.0).abs() < 1e-9);
}

#[test]
fn empty_filter_degrades_to_placeholders_everywhere() {
    let file = create_test_csv();
    let output = pipeline::run(file.path(), &PipelineParams::default()).unwrap();

    let nothing = FilterState {
        date_range: Some((
            chrono_date(2030, 1, 1),
            chrono_date(2030, 12, 31),
        )),
        categories: None,
    };
    let view = output.snapshot.filter(&nothing);

    assert!(views::map_markers(&view).is_no_data());
    assert!(views::cluster_profiles(&view).is_no_data());

    let unknown = ["no-such-category".to_string()].into_iter().collect();
    assert!(views::trends(&output.snapshot, &unknown).is_no_data());
}

fn chrono_date(year: i32, month: u32, day: u32) -> chrono::NaiveDate {
    chrono::NaiveDate::from_ymd_opt(year, month, day).unwrap()
}
