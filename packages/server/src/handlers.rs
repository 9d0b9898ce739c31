//! HTTP handler functions for the hotspot dashboard API.

use std::collections::BTreeSet;

use actix_web::{HttpResponse, web};
use hotspot_map_analytics::views;
use hotspot_map_analytics_models::FilterState;
use hotspot_map_server_models::{
    ApiClusters, ApiHealth, ApiMap, ApiMeta, ApiOverview, ApiTrends, FilterParams, TrendParams,
};

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/meta`
///
/// Dataset metadata for populating the date-range picker and the category
/// multi-selects.
pub async fn meta(state: web::Data<AppState>) -> HttpResponse {
    let snapshot = &state.snapshot;
    let (date_from, date_to) = snapshot
        .date_range()
        .map_or((None, None), |(from, to)| (Some(from), Some(to)));

    HttpResponse::Ok().json(ApiMeta {
        incident_count: snapshot.len() as u64,
        date_from,
        date_to,
        categories: snapshot.categories().into_iter().collect(),
        cluster_count: snapshot.cluster_count() as u64,
    })
}

/// `GET /api/overview`
///
/// Unfiltered incident counts per category, descending.
pub async fn overview(state: web::Data<AppState>) -> HttpResponse {
    let result: ApiOverview = views::overview(&state.snapshot).into();
    HttpResponse::Ok().json(result)
}

/// `GET /api/trends?categories=a,b`
///
/// Monthly counts per selected category. Absent `categories` plots all.
pub async fn trends(state: web::Data<AppState>, params: web::Query<TrendParams>) -> HttpResponse {
    let selected = params
        .categories
        .as_deref()
        .map_or_else(|| state.snapshot.categories(), parse_categories);

    let result: ApiTrends = views::trends(&state.snapshot, &selected).into();
    HttpResponse::Ok().json(result)
}

/// `GET /api/map?from=&to=&categories=`
///
/// One marker per incident surviving the filter, colored by cluster.
pub async fn map(state: web::Data<AppState>, params: web::Query<FilterParams>) -> HttpResponse {
    let filter = to_filter_state(&params);
    let view = state.snapshot.filter(&filter);
    let result: ApiMap = views::map_markers(&view).into();
    HttpResponse::Ok().json(result)
}

/// `GET /api/clusters?from=&to=&categories=`
///
/// Composition profiles of the top clusters within the filtered subset.
pub async fn clusters(
    state: web::Data<AppState>,
    params: web::Query<FilterParams>,
) -> HttpResponse {
    let filter = to_filter_state(&params);
    let view = state.snapshot.filter(&filter);
    let result: ApiClusters = views::cluster_profiles(&view).into();
    HttpResponse::Ok().json(result)
}

/// Parses a comma-separated category list.
fn parse_categories(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Converts query parameters into the analytics filter state.
///
/// A one-sided date range is left open on the missing side by using the
/// minimum/maximum representable date, which matches "no restriction" for
/// that side.
fn to_filter_state(params: &FilterParams) -> FilterState {
    let date_range = match (params.from, params.to) {
        (None, None) => None,
        (from, to) => Some((
            from.unwrap_or(chrono::NaiveDate::MIN),
            to.unwrap_or(chrono::NaiveDate::MAX),
        )),
    };

    FilterState {
        date_range,
        categories: params.categories.as_deref().map(parse_categories),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, test};
    use chrono::NaiveDate;
    use hotspot_map_analytics::Snapshot;
    use hotspot_map_incident_models::Incident;

    use super::*;

    fn sample_state() -> web::Data<AppState> {
        let incidents = vec![
            Incident::new(
                "burglary".to_string(),
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                51.50,
                -0.12,
            ),
            Incident::new(
                "robbery".to_string(),
                NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
                51.51,
                -0.11,
            ),
            Incident::new(
                "burglary".to_string(),
                NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                51.52,
                -0.10,
            ),
        ];
        let snapshot = Snapshot::build(incidents, vec![1, 0, 1]).unwrap();
        web::Data::new(AppState {
            snapshot: Arc::new(snapshot),
        })
    }

    #[actix_rt::test]
    async fn health_reports_ok() {
        let app = test::init_service(
            App::new()
                .app_data(sample_state())
                .route("/api/health", web::get().to(health)),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/api/health").to_request())
            .await;
        assert!(resp.status().is_success());
    }

    #[actix_rt::test]
    async fn meta_lists_categories_and_range() {
        let app = test::init_service(
            App::new()
                .app_data(sample_state())
                .route("/api/meta", web::get().to(meta)),
        )
        .await;

        let body: serde_json::Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get().uri("/api/meta").to_request(),
        )
        .await;
        assert_eq!(body["incidentCount"], 3);
        assert_eq!(body["categories"], serde_json::json!(["burglary", "robbery"]));
        assert_eq!(body["clusterCount"], 1);
    }

    #[actix_rt::test]
    async fn map_filter_with_no_matches_returns_placeholder_not_error() {
        let app = test::init_service(
            App::new()
                .app_data(sample_state())
                .route("/api/map", web::get().to(map)),
        )
        .await;

        let body: serde_json::Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri("/api/map?from=2030-01-01&to=2030-12-31")
                .to_request(),
        )
        .await;
        assert_eq!(body["noData"], true);
    }

    #[actix_rt::test]
    async fn clusters_endpoint_profiles_filtered_subset() {
        let app = test::init_service(
            App::new()
                .app_data(sample_state())
                .route("/api/clusters", web::get().to(clusters)),
        )
        .await;

        let body: serde_json::Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get().uri("/api/clusters").to_request(),
        )
        .await;
        let profiles = body["data"].as_array().unwrap();
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0]["cluster"], 1);
        assert_eq!(profiles[0]["size"], 2);
    }

    #[std::prelude::v1::test]
    fn one_sided_ranges_stay_open() {
        let params = FilterParams {
            from: Some(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()),
            to: None,
            categories: None,
        };
        let state = to_filter_state(&params);
        let (from, to) = state.date_range.unwrap();
        assert_eq!(from, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(to, chrono::NaiveDate::MAX);
    }
}
