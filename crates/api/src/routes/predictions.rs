//! Prediction Routes

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use feature_engine::PassengerRecord;
use serde::{Deserialize, Serialize};
use storage::PredictionRecord;
use uuid::Uuid;

use crate::{ApiError, SharedState};

/// Body for a prediction request
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    /// Session to record the result under; a new one is issued when absent
    pub session_id: Option<String>,
    pub passenger: PassengerRecord,
}

/// Response for a successful prediction
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub session_id: String,
    /// 0 = not satisfied, 1 = satisfied
    pub prediction: u8,
    pub label: &'static str,
    pub latency_us: u64,
    pub timestamp_ms: u64,
}

/// Query parameters for session-scoped endpoints
#[derive(Debug, Deserialize)]
pub struct SessionQuery {
    pub session_id: String,
}

/// Run the pipeline on one submission
pub async fn create_prediction(
    State(state): State<SharedState>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, ApiError> {
    let session_id = request
        .session_id
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let result = state.submit(&session_id, &request.passenger)?;

    Ok(Json(PredictResponse {
        session_id,
        prediction: result.prediction.label(),
        label: result.prediction.as_str(),
        latency_us: result.latency_us,
        timestamp_ms: result.timestamp_ms,
    }))
}

/// Get a session's most recent result
pub async fn get_latest(
    State(state): State<SharedState>,
    Query(params): Query<SessionQuery>,
) -> Result<Json<PredictionRecord>, ApiError> {
    Ok(Json(state.repository.get_latest(&params.session_id)?))
}

/// Forget a session's result
pub async fn clear_latest(
    State(state): State<SharedState>,
    Query(params): Query<SessionQuery>,
) -> Result<StatusCode, ApiError> {
    if state.repository.clear_session(&params.session_id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(storage::StorageError::NotFound(params.session_id).into())
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn passenger(travel_class: &str, rating: i64) -> Value {
        json!({
            "gender": "Female",
            "customer_type": "Loyal Customer",
            "age": 30,
            "travel_type": "Business travel",
            "travel_class": travel_class,
            "flight_distance": 500,
            "ratings": {
                "seat_comfort": rating, "departure_arrival_time_convenient": rating,
                "food_and_drink": rating, "gate_location": rating, "inflight_wifi": rating,
                "inflight_entertainment": rating, "online_support": rating,
                "ease_of_online_booking": rating, "onboard_service": rating,
                "leg_room_service": rating, "baggage_handling": rating,
                "checkin_service": rating, "cleanliness": rating, "online_boarding": rating
            },
            "departure_delay_minutes": 0,
            "arrival_delay_minutes": 0
        })
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap_or(Value::Null)
        };
        (status, value)
    }

    fn post_json(body: Value) -> Request<Body> {
        Request::post("/api/v1/predictions")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_predict_and_fetch_latest() {
        let app = test_support::router();

        let (status, body) = send(
            &app,
            post_json(json!({ "session_id": "abc", "passenger": passenger("Eco", 5) })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["session_id"], "abc");
        assert_eq!(body["prediction"], 1);
        assert_eq!(body["label"], "Satisfied");

        let (status, latest) = send(
            &app,
            Request::get("/api/v1/predictions/latest?session_id=abc")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(latest["label"], 1);

        // A second submission replaces the first
        send(
            &app,
            post_json(json!({ "session_id": "abc", "passenger": passenger("Eco", 1) })),
        )
        .await;
        let (_, latest) = send(
            &app,
            Request::get("/api/v1/predictions/latest?session_id=abc")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(latest["label"], 0);
        assert_eq!(latest["message"], "Not Satisfied");
    }

    #[tokio::test]
    async fn test_session_issued_when_absent() {
        let app = test_support::router();
        let (status, body) = send(&app, post_json(json!({ "passenger": passenger("Eco Plus", 3) }))).await;

        assert_eq!(status, StatusCode::OK);
        let session = body["session_id"].as_str().unwrap();
        assert!(uuid::Uuid::parse_str(session).is_ok());
        assert_eq!(body["prediction"], 0);
    }

    #[tokio::test]
    async fn test_unknown_class_is_unprocessable() {
        let app = test_support::router();
        let (status, body) = send(
            &app,
            post_json(json!({ "session_id": "s", "passenger": passenger("First", 3) })),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "invalid_category");
        assert_eq!(body["fields"][0]["field"], "travel_class");

        let (status, _) = send(
            &app,
            Request::get("/api/v1/predictions/latest?session_id=s")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_out_of_range_rating_is_unprocessable() {
        let app = test_support::router();
        let mut record = passenger("Eco", 3);
        record["ratings"]["cleanliness"] = json!(6);
        record["age"] = json!(-1);

        let (status, body) = send(&app, post_json(json!({ "passenger": record }))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "invalid_input");
        assert_eq!(body["fields"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_record_must_be_nested_under_passenger() {
        let app = test_support::router();
        let mut flat = passenger("Eco", 3);
        flat["session_id"] = json!("flat");

        let (status, _) = send(&app, post_json(flat)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, body) = send(
            &app,
            post_json(json!({ "session_id": "nested", "passenger": passenger("Eco", 3) })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["session_id"], "nested");
    }

    #[tokio::test]
    async fn test_clear_latest() {
        let app = test_support::router();
        send(&app, post_json(json!({ "session_id": "gone", "passenger": passenger("Eco", 3) }))).await;

        let delete = || {
            Request::delete("/api/v1/predictions/latest?session_id=gone")
                .body(Body::empty())
                .unwrap()
        };
        let (status, _) = send(&app, delete()).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, delete()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
