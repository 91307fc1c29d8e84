use anyhow::Context;
use axum::body::Body;
use axum::extract::State;
use axum::http::{header, HeaderValue, Method, Request};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use bytes::Bytes;
use features::LoanApplication;
use protocol::{MessageResponse, PredictResponse};
use std::time::Instant;
use tower_http::cors::{AllowOrigin, CorsLayer};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

pub(crate) fn router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/predict", post(predict))
        .with_state(state)
        .layer(cors)
        .layer(middleware::from_fn(log_http_request))
}

pub(crate) fn cors_layer(allowed_origins: &[String]) -> anyhow::Result<CorsLayer> {
    let origins = allowed_origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin)
                .with_context(|| format!("invalid cors origin {origin:?}"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]))
}

async fn index() -> Json<MessageResponse> {
    Json(MessageResponse::hello())
}

async fn health() -> &'static str {
    "ok"
}

async fn predict(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<PredictResponse>, ApiError> {
    let request_id = Uuid::new_v4();
    match score(&state, &body, request_id) {
        Ok(score) => {
            tracing::info!(request_id = %request_id, score, "prediction served");
            Ok(Json(PredictResponse::new(score)))
        }
        Err(err) => {
            tracing::warn!(
                request_id = %request_id,
                kind = err.kind(),
                error = %err,
                "prediction rejected"
            );
            Err(err)
        }
    }
}

fn score(state: &AppState, body: &[u8], request_id: Uuid) -> Result<f32, ApiError> {
    let value: serde_json::Value = serde_json::from_slice(body)?;
    let application = LoanApplication::from_json(&value)?;
    let encoding = state.encoder.encode(&application);
    for dropped in &encoding.dropped {
        // Kept permissive, but unknown labels usually mean upstream data drift.
        tracing::warn!(
            request_id = %request_id,
            field = dropped.field.name(),
            value = %dropped.value,
            "unrecognized category dropped"
        );
    }
    let score = state.booster.predict(&encoding.row.to_f32())?;
    Ok(score)
}

async fn log_http_request(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let origin = req
        .headers()
        .get(header::ORIGIN)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-")
        .to_string();
    let started = Instant::now();
    let response = next.run(req).await;
    let status = response.status();
    tracing::info!(
        method = %method,
        uri = %uri,
        origin = %origin,
        status = %status,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "http request"
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use booster::Booster;
    use features::{FeatureEncoder, FeatureSchema, FEATURE_COLUMNS};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn stump(feature: usize, threshold: f32, left: f32, right: f32) -> Value {
        json!({
            "left_children": [1, -1, -1],
            "right_children": [2, -1, -1],
            "split_indices": [feature, 0, 0],
            "split_conditions": [threshold, left, right],
            "default_left": [0, 0, 0],
            "split_type": [0, 0, 0]
        })
    }

    fn model_json(names: &[&str], trees: Vec<Value>) -> String {
        json!({
            "learner": {
                "feature_names": names,
                "gradient_booster": {
                    "name": "gbtree",
                    "model": {"tree_info": vec![0; trees.len()], "trees": trees}
                },
                "learner_model_param": {
                    "base_score": "5E-1",
                    "num_class": "0",
                    "num_feature": names.len().to_string(),
                    "num_target": "1"
                },
                "objective": {"name": "binary:logistic"}
            }
        })
        .to_string()
    }

    /// fico (column 12) and the B2 indicator (column 19) drive the score.
    fn test_state() -> AppState {
        let raw = model_json(
            &FEATURE_COLUMNS,
            vec![stump(12, 700.0, 0.8, -0.4), stump(19, 0.5, 0.0, 0.3)],
        );
        let booster = Booster::from_json_str(&raw).expect("booster");
        let encoder = FeatureEncoder::new(FeatureSchema::new());
        booster
            .check_schema(encoder.schema().columns())
            .expect("schema");
        AppState::new(booster, encoder)
    }

    fn test_router(state: AppState) -> Router {
        let cors = cors_layer(&protocol::config::default_allowed_origins()).expect("cors");
        router(state, cors)
    }

    fn sample_body() -> Value {
        json!({
            "annual_inc": 60000,
            "pub_rec": 0,
            "fico": 700,
            "sub_grade": "B2",
            "home_ownership": "RENT",
            "application_type": "Individual",
            "loan_amnt": 10000,
            "mort_acc": 1,
            "funded_amnt_inv": 10000.0,
            "dti": 15.5,
            "open_acc": 8,
            "pub_rec_bankruptcies": 0,
            "purpose": "debt_consolidation",
            "term": 36,
            "revol_bal": 5000,
            "revol_util": 40.0,
            "verification_status": "Verified",
            "int_rate": 12.5,
            "installment": 300.0
        })
    }

    async fn post_predict(app: Router, body: impl Into<Body>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/predict")
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .expect("request");
        let response = app.oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let value = serde_json::from_slice(&bytes).expect("json body");
        (status, value)
    }

    #[tokio::test]
    async fn index_says_hello() {
        let request = Request::builder().uri("/").body(Body::empty()).expect("request");
        let response = test_router(test_state()).oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let value: Value = serde_json::from_slice(&bytes).expect("json");
        assert_eq!(value, json!({"message": "Hello World"}));
    }

    #[tokio::test]
    async fn predicts_reference_application() {
        let (status, value) =
            post_predict(test_router(test_state()), sample_body().to_string()).await;
        assert_eq!(status, StatusCode::OK);

        // fico 700 is not < 700 (-0.4), B2 is set (0.3), base score 0.5 adds no margin.
        let margin = -0.4_f32 + 0.3_f32;
        let expected = f64::from(1.0 / (1.0 + (-margin).exp()));
        let score = value["xgb_prediction"].as_f64().expect("float prediction");
        assert!((score - expected).abs() < 1e-9, "{score} != {expected}");
        assert_eq!(value.as_object().map(|object| object.len()), Some(1));
    }

    #[tokio::test]
    async fn unknown_sub_grade_is_scored_without_indicator() {
        let mut body = sample_body();
        body["sub_grade"] = json!("Z9");
        let (status, value) = post_predict(test_router(test_state()), body.to_string()).await;
        assert_eq!(status, StatusCode::OK);

        let margin = -0.4_f32 + 0.0_f32;
        let expected = f64::from(1.0 / (1.0 + (-margin).exp()));
        let score = value["xgb_prediction"].as_f64().expect("float prediction");
        assert!((score - expected).abs() < 1e-9);
    }

    #[tokio::test]
    async fn missing_field_is_a_client_error() {
        let mut body = sample_body();
        body.as_object_mut().expect("object").remove("fico");
        let (status, value) = post_predict(test_router(test_state()), body.to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let message = value["error"].as_str().expect("error message");
        assert!(message.contains("fico"));
        assert!(message.contains("field required"));
    }

    #[tokio::test]
    async fn malformed_json_is_a_client_error() {
        let (status, value) = post_predict(test_router(test_state()), "{\"fico\": ").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let message = value["error"].as_str().expect("error message");
        assert!(message.starts_with("invalid JSON body"));
    }

    #[tokio::test]
    async fn scoring_failure_is_reported_as_client_error() {
        let raw = model_json(&["a", "b", "c"], vec![stump(0, 1.0, 0.0, 0.0)]);
        let booster = Booster::from_json_str(&raw).expect("booster");
        let state = AppState::new(booster, FeatureEncoder::new(FeatureSchema::new()));
        let (status, value) = post_predict(test_router(state), sample_body().to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let message = value["error"].as_str().expect("error message");
        assert!(message.contains("expected: 3, got 73"));
    }

    #[tokio::test]
    async fn cors_allows_listed_origins_only() {
        let preflight = |origin: &str| {
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/predict")
                .header(header::ORIGIN, origin)
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .expect("request")
        };

        let response = test_router(test_state())
            .oneshot(preflight("http://localhost:3000"))
            .await
            .expect("response");
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .and_then(|value| value.to_str().ok()),
            Some("http://localhost:3000")
        );

        let response = test_router(test_state())
            .oneshot(preflight("https://attacker.example"))
            .await
            .expect("response");
        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }

    #[test]
    fn rejects_unrepresentable_origin() {
        assert!(cors_layer(&["http://bad\norigin".to_string()]).is_err());
    }

    #[test]
    fn shipped_model_matches_schema() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../model/xgb_model.json");
        let booster = Booster::from_json_file(path).expect("shipped model");
        booster
            .check_schema(&FEATURE_COLUMNS)
            .expect("shipped model schema");
        assert!(booster.num_trees() > 0);
    }
}
