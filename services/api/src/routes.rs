use crate::infra::{load_snapshot, AppState};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tn_counsel::counselling::report::views::RecommendationView;
use tn_counsel::counselling::{
    FilterOptions, NormalizedWeights, RowFilter, ScoringRequest, Tier, TierSelection,
    TopTierSummary, WeightInputs,
};
use tn_counsel::error::{AppError, RequestError};
use tracing::info;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RecommendationRequest {
    pub(crate) college_tiers: Vec<String>,
    pub(crate) branch_tiers: Vec<String>,
    pub(crate) district_tiers: Vec<String>,
    pub(crate) weights: WeightInputs,
    pub(crate) filters: RowFilter,
    pub(crate) limit: Option<usize>,
}

impl RecommendationRequest {
    fn scoring_request(&self) -> Result<ScoringRequest, RequestError> {
        Ok(ScoringRequest {
            college_tiers: parse_selection(&self.college_tiers)?,
            branch_tiers: parse_selection(&self.branch_tiers)?,
            district_tiers: parse_selection(&self.district_tiers)?,
            weights: self.weights.validated()?,
        })
    }
}

fn parse_selection(labels: &[String]) -> Result<TierSelection, RequestError> {
    let tiers = labels
        .iter()
        .map(|label| label.parse::<Tier>())
        .collect::<Result<Vec<_>, _>>()?;
    Ok(TierSelection::from_user(tiers))
}

#[derive(Debug, Serialize)]
pub(crate) struct RecommendationResponse {
    pub(crate) year: u16,
    pub(crate) computed_at: DateTime<Utc>,
    pub(crate) total_rows: usize,
    pub(crate) visible_rows: usize,
    pub(crate) weights: NormalizedWeights,
    pub(crate) recommendations: Vec<RecommendationView>,
}

#[derive(Debug, Serialize)]
pub(crate) struct TopTierResponse {
    pub(crate) year: u16,
    pub(crate) summary: TopTierSummary,
}

#[derive(Debug, Serialize)]
pub(crate) struct ReloadResponse {
    pub(crate) year: u16,
    pub(crate) rows: usize,
    pub(crate) computed_at: DateTime<Utc>,
}

pub(crate) fn counselling_routes() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/recommendations", post(recommendations_endpoint))
        .route("/api/v1/summary/top-tier", get(top_tier_endpoint))
        .route("/api/v1/filters", get(filter_options_endpoint))
        .route("/api/v1/dataset/reload", post(reload_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn recommendations_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<RecommendationRequest>,
) -> Result<Json<RecommendationResponse>, AppError> {
    let request = payload.scoring_request()?;
    let snapshot = state.snapshot()?;
    let scored = snapshot.score(&request);

    let visible = payload.filters.visible(&scored);
    let visible_rows = visible.len();
    let limit = payload.limit.unwrap_or(visible_rows);
    let recommendations = visible
        .into_iter()
        .take(limit)
        .map(|row| row.to_view())
        .collect();

    Ok(Json(RecommendationResponse {
        year: snapshot.year(),
        computed_at: snapshot.computed_at(),
        total_rows: scored.len(),
        visible_rows,
        weights: request.weights.normalize(),
        recommendations,
    }))
}

pub(crate) async fn top_tier_endpoint(
    Extension(state): Extension<AppState>,
) -> Result<Json<TopTierResponse>, AppError> {
    let snapshot = state.snapshot()?;
    Ok(Json(TopTierResponse {
        year: snapshot.year(),
        summary: TopTierSummary::from_rows(snapshot.master()),
    }))
}

pub(crate) async fn filter_options_endpoint(
    Extension(state): Extension<AppState>,
) -> Result<Json<FilterOptions>, AppError> {
    let snapshot = state.snapshot()?;
    Ok(Json(FilterOptions::from_rows(snapshot.master())))
}

pub(crate) async fn reload_endpoint(
    Extension(state): Extension<AppState>,
) -> Result<Json<ReloadResponse>, AppError> {
    let config = state.dataset.clone();
    let snapshot = tokio::task::spawn_blocking(move || load_snapshot(&config))
        .await
        .map_err(|err| AppError::State(format!("dataset reload task failed: {err}")))??;

    let response = ReloadResponse {
        year: snapshot.year(),
        rows: snapshot.master().len(),
        computed_at: snapshot.computed_at(),
    };
    state.replace_snapshot(snapshot)?;
    info!(year = response.year, rows = response.rows, "dataset snapshot reloaded");

    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::fixtures;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    fn app(ready: bool) -> Router {
        counselling_routes().layer(Extension(fixtures::app_state(ready)))
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = router.oneshot(request).await.expect("router responds");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        let body = serde_json::from_slice(&bytes).expect("json body");
        (status, body)
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request builds")
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request builds")
    }

    #[tokio::test]
    async fn readiness_reports_initializing_until_flagged() {
        let (status, body) = send(app(false), get_request("/ready")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "initializing");

        let (status, body) = send(app(true), get_request("/ready")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ready");
    }

    #[tokio::test]
    async fn recommendations_use_default_selection_and_weights() {
        let (status, body) = send(
            app(true),
            post_json("/api/v1/recommendations", json!({ "limit": 3 })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["year"], 2020);
        assert_eq!(body["total_rows"], 16);
        assert_eq!(body["visible_rows"], 16);
        assert_eq!(body["weights"]["college"], 0.25);

        let rows = body["recommendations"].as_array().expect("rows array");
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0]["choose_order"], 1);
        assert_eq!(rows[0]["college"], "College of Engineering Guindy");
        assert_eq!(rows[0]["branch_code"], "CS");
        assert_eq!(rows[0]["sum_of_tiers"], 12);
        assert_eq!(rows[0]["final_score"], 5.75);
        assert_eq!(rows[2]["college_code"], "4");
    }

    #[tokio::test]
    async fn filters_narrow_rows_without_renumbering() {
        let payload = json!({
            "district_tiers": ["next best", "Rest"],
            "filters": { "districts": ["Madurai"] }
        });
        let (status, body) = send(app(true), post_json("/api/v1/recommendations", payload)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["visible_rows"], 3);
        let rows = body["recommendations"].as_array().expect("rows array");
        assert!(rows.iter().all(|row| row["district"] == "Madurai"));
        // Madurai is the only Next-Best district, so its best row leads overall.
        assert_eq!(rows[0]["college_code"], "6");
        assert_eq!(rows[0]["choose_order"], 1);
        assert!(rows
            .windows(2)
            .all(|pair| pair[0]["choose_order"].as_u64() < pair[1]["choose_order"].as_u64()));
    }

    #[tokio::test]
    async fn unknown_tier_labels_are_bad_requests() {
        let payload = json!({ "college_tiers": ["Elite"] });
        let (status, body) = send(app(true), post_json("/api/v1/recommendations", payload)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().expect("error text").contains("Elite"));
    }

    #[tokio::test]
    async fn weights_outside_slider_range_are_bad_requests() {
        let payload = json!({ "weights": { "district": 150.0 } });
        let (status, _) = send(app(true), post_json("/api/v1/recommendations", payload)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);

        let payload = json!({ "weights": { "college": 40.5 } });
        let (status, body) = send(app(true), post_json("/api/v1/recommendations", payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().expect("error text").contains("whole number"));
    }

    #[tokio::test]
    async fn top_tier_summary_lists_top_colleges() {
        let (status, body) = send(app(true), get_request("/api/v1/summary/top-tier")).await;

        assert_eq!(status, StatusCode::OK);
        let colleges = body["summary"]["colleges"].as_array().expect("colleges");
        assert_eq!(colleges.len(), 2);
        assert_eq!(colleges[0]["name"], "College of Engineering Guindy");
        assert_eq!(colleges[0]["rank"], 1);
        assert_eq!(body["summary"]["districts"][0]["name"], "Chennai");
    }

    #[tokio::test]
    async fn filter_options_list_distinct_names() {
        let (status, body) = send(app(true), get_request("/api/v1/filters")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["districts"].as_array().map(Vec::len), Some(5));
        assert_eq!(body["branches"][0], "Civil Engineering");
    }

    #[tokio::test]
    async fn reload_recomputes_snapshot() {
        let (status, body) = send(app(true), post_json("/api/v1/dataset/reload", json!({}))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["year"], 2020);
        assert_eq!(body["rows"], 16);
    }
}
