//! HTTP routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;

use pokedex_domain::{DomainError, StrongPokemonReport, TrainerId, TrainerRoster};

use crate::app::App;

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/trainers", get(list_trainers).post(create_trainer))
        .route(
            "/api/trainers/{id}",
            put(update_trainer).delete(delete_trainer),
        )
        .route("/api/trainers/{trainer_id}/pokemon", get(trainer_pokemon))
        .route(
            "/api/trainers/with-pokemon-above/{min_level}",
            get(trainers_with_strong_pokemon),
        )
        .route("/api/pokemon", get(list_pokemon).post(create_pokemon))
        .route(
            "/api/pokemon/{id}",
            put(update_pokemon).delete(delete_pokemon),
        )
}

/// Probe the store; 503 with the underlying error when it misbehaves.
async fn health(State(app): State<Arc<App>>) -> Result<Json<Value>, ApiError> {
    app.health
        .ping()
        .await
        .map_err(|e| ApiError::Unavailable(e.to_string()))?;
    Ok(Json(json!({"status": "healthy"})))
}

async fn list_trainers(State(app): State<Arc<App>>) -> Result<Json<Vec<Value>>, ApiError> {
    Ok(Json(app.use_cases.trainers.list().await?))
}

async fn create_trainer(
    State(app): State<Arc<App>>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let id = app.use_cases.trainers.create(body).await?;
    Ok((StatusCode::CREATED, Json(json!({"_id": id}))))
}

async fn update_trainer(
    State(app): State<Arc<App>>,
    Path(id): Path<String>,
    Json(patch): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let modified = app.use_cases.trainers.update(&id, patch).await?;
    Ok(Json(json!({"modified_count": modified})))
}

async fn delete_trainer(
    State(app): State<Arc<App>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let outcome = app.use_cases.trainers.delete(&id).await?;
    Ok(Json(json!({
        "trainer_deleted": outcome.trainer_deleted,
        "pokemon_deleted": outcome.pokemon_deleted,
    })))
}

async fn list_pokemon(State(app): State<Arc<App>>) -> Result<Json<Vec<Value>>, ApiError> {
    Ok(Json(app.use_cases.pokemon.list().await?))
}

async fn create_pokemon(
    State(app): State<Arc<App>>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let id = app.use_cases.pokemon.create(body).await?;
    Ok((StatusCode::CREATED, Json(json!({"_id": id}))))
}

async fn update_pokemon(
    State(app): State<Arc<App>>,
    Path(id): Path<String>,
    Json(patch): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let modified = app.use_cases.pokemon.update(&id, patch).await?;
    Ok(Json(json!({"modified_count": modified})))
}

async fn delete_pokemon(
    State(app): State<Arc<App>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let deleted = app.use_cases.pokemon.delete(&id).await?;
    Ok(Json(json!({"deleted_count": deleted})))
}

/// One trainer joined with all of its pokemon.
async fn trainer_pokemon(
    State(app): State<Arc<App>>,
    Path(trainer_id): Path<i64>,
) -> Result<Json<TrainerRoster>, ApiError> {
    let roster = app
        .use_cases
        .rosters
        .trainer_with_pokemon(TrainerId::new(trainer_id))
        .await?;
    Ok(Json(roster))
}

/// Owners grouped by strong pokemon, or the explicit empty indicator.
async fn trainers_with_strong_pokemon(
    State(app): State<Arc<App>>,
    Path(min_level): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let report = app
        .use_cases
        .rosters
        .trainers_with_pokemon_above(min_level)
        .await?;

    let body = match report {
        StrongPokemonReport::Empty { min_level } => json!({
            "message": format!("No trainers found with pokemon above level {min_level}"),
        }),
        StrongPokemonReport::Grouped(groups) => json!({"results": groups}),
    };
    Ok(Json(body))
}

// =============================================================================
// Errors
// =============================================================================

/// API error rendered as a JSON `{"error": ...}` body.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
    Unavailable(String),
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
        };
        (status, Json(json!({"error": message}))).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match &err {
            DomainError::Validation(_) => ApiError::BadRequest(err.to_string()),
            DomainError::NotFound { .. } | DomainError::Referential { .. } => {
                ApiError::NotFound(err.to_string())
            }
            DomainError::Transient(_) | DomainError::Permanent(_) => {
                ApiError::Internal(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    use crate::infrastructure::ports::{
        MockPokemonRepo, MockRosterQueries, MockStoreHealth, MockTrainerRepo,
    };

    struct Mocks {
        trainer: MockTrainerRepo,
        pokemon: MockPokemonRepo,
        roster: MockRosterQueries,
        health: MockStoreHealth,
    }

    impl Mocks {
        fn new() -> Self {
            Self {
                trainer: MockTrainerRepo::new(),
                pokemon: MockPokemonRepo::new(),
                roster: MockRosterQueries::new(),
                health: MockStoreHealth::new(),
            }
        }

        fn into_router(self) -> Router {
            let app = App::from_ports(
                Arc::new(self.trainer),
                Arc::new(self.pokemon),
                Arc::new(self.roster),
                Arc::new(self.health),
            );
            routes().with_state(Arc::new(app))
        }
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .expect("request")
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn listing_trainers_returns_the_cleaned_documents() {
        let mut mocks = Mocks::new();
        mocks.trainer.expect_list().returning(|| {
            Ok(vec![
                json!({"_id": "64f000000000000000000001", "trainerID": 1, "trainername": "Ash"}),
            ])
        });

        let response = mocks
            .into_router()
            .oneshot(get_request("/api/trainers"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body[0]["trainername"], json!("Ash"));
    }

    #[tokio::test]
    async fn creating_a_trainer_returns_201_and_the_new_id() {
        let mut mocks = Mocks::new();
        mocks
            .trainer
            .expect_insert()
            .returning(|_| Ok("64f000000000000000000001".to_string()));

        let response = mocks
            .into_router()
            .oneshot(json_request(
                "POST",
                "/api/trainers",
                json!({"trainerID": 1, "trainername": "Ash"}),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = body_json(response).await;
        assert_eq!(body, json!({"_id": "64f000000000000000000001"}));
    }

    #[tokio::test]
    async fn an_empty_trainer_body_is_a_400_with_an_error_field() {
        let response = Mocks::new()
            .into_router()
            .oneshot(json_request("POST", "/api/trainers", json!({})))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn a_dangling_pokemon_reference_is_a_404() {
        let mut mocks = Mocks::new();
        mocks
            .pokemon
            .expect_insert_owned()
            .returning(|trainer_id, _| Err(DomainError::referential(trainer_id)));

        let response = mocks
            .into_router()
            .oneshot(json_request(
                "POST",
                "/api/pokemon",
                json!({"trainerID": 99, "pokename": "Mewtwo"}),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(response).await;
        assert_eq!(body, json!({"error": "Trainer 99 not found"}));
    }

    #[tokio::test]
    async fn a_cascade_delete_reports_both_counts() {
        let mut mocks = Mocks::new();
        mocks
            .trainer
            .expect_find_by_id()
            .returning(|_| Ok(Some(json!({"trainerID": 1}))));
        mocks.trainer.expect_delete().returning(|_| Ok(1));
        mocks
            .pokemon
            .expect_delete_by_trainer()
            .returning(|_| Ok(2));

        let response = mocks
            .into_router()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/trainers/64f000000000000000000001")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body, json!({"trainer_deleted": 1, "pokemon_deleted": 2}));
    }

    #[tokio::test]
    async fn an_unknown_roster_trainer_is_a_404() {
        let mut mocks = Mocks::new();
        mocks
            .roster
            .expect_trainer_with_pokemon()
            .returning(|_| Ok(None));

        let response = mocks
            .into_router()
            .oneshot(get_request("/api/trainers/5/pokemon"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn an_empty_strong_pokemon_report_is_a_message_not_an_error() {
        let mut mocks = Mocks::new();
        mocks
            .roster
            .expect_trainers_with_pokemon_above()
            .returning(|_| Ok(Vec::new()));

        let response = mocks
            .into_router()
            .oneshot(get_request("/api/trainers/with-pokemon-above/99"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(
            body,
            json!({"message": "No trainers found with pokemon above level 99"})
        );
    }

    #[tokio::test]
    async fn a_failing_store_probe_is_a_503() {
        let mut mocks = Mocks::new();
        mocks
            .health
            .expect_ping()
            .returning(|| Err(DomainError::transient("no primary available")));

        let response = mocks
            .into_router()
            .oneshot(get_request("/api/health"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body = body_json(response).await;
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn a_healthy_store_probe_is_a_200() {
        let mut mocks = Mocks::new();
        mocks.health.expect_ping().returning(|| Ok(()));

        let response = mocks
            .into_router()
            .oneshot(get_request("/api/health"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body, json!({"status": "healthy"}));
    }
}
