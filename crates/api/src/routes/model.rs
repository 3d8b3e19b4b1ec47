//! Model Contract Routes

use axum::{extract::State, Json};
use feature_engine::CategoryEncoder;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::SharedState;

/// Loaded column contract and accepted categorical labels
#[derive(Debug, Serialize)]
pub struct ColumnsResponse {
    pub columns: Vec<String>,
    pub classifier: String,
    pub categories: BTreeMap<&'static str, Vec<&'static str>>,
}

/// Get the column order the artifacts were fitted on
pub async fn get_columns(State(state): State<SharedState>) -> Json<ColumnsResponse> {
    Json(ColumnsResponse {
        columns: state.pipeline.columns().to_vec(),
        classifier: state.pipeline.describe_classifier(),
        categories: CategoryEncoder::closed_sets().into_iter().collect(),
    })
}

#[cfg(test)]
mod tests {
    use crate::test_support;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_columns_contract() {
        let response = test_support::router()
            .oneshot(Request::get("/api/v1/model/columns").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let columns = value["columns"].as_array().unwrap();
        assert_eq!(columns.len(), 22);
        assert_eq!(columns[0], "Gender");
        assert_eq!(columns[21], "Arrival Delay in Minutes");
        assert_eq!(value["categories"]["travel_class"][1], "Eco Plus");
    }
}
