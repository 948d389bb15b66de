use crate::core::{AppEvent, IntentOutcome, IntentReply};
use crate::notify::{ToastManager, ToastView};
use crate::scene::SceneFrame;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use sonic_proto::error::CatalogError;
use sonic_proto::protocol::{AppSnapshot, Collection, Intent, Track};
use sonic_proto::state::StateManager;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot, watch, Mutex};
use tower_http::cors::CorsLayer;
use tracing::{error, info};

/// Everything a route needs.  Reads go straight to the shared state; writes
/// are turned into intents for the app core.
#[derive(Clone)]
pub struct HttpState {
    pub state_manager: Arc<StateManager>,
    pub event_tx: mpsc::Sender<AppEvent>,
    pub notifications: Arc<Mutex<ToastManager>>,
    pub scene_rx: watch::Receiver<SceneFrame>,
}

#[derive(Deserialize)]
struct CreateCollectionBody {
    name: String,
}

#[derive(Deserialize)]
struct SearchBody {
    query: String,
}

/// `{"trackId": ..}` picks from the last results, `{"track": {..}}` selects
/// any track, `{}` clears the selection.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SelectBody {
    #[serde(default)]
    track_id: Option<String>,
    #[serde(default)]
    track: Option<Track>,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

enum ApiError {
    Catalog(CatalogError),
    CoreUnavailable,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Catalog(e @ CatalogError::InvalidArgument(_)) => {
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            ApiError::Catalog(e @ CatalogError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, e.to_string())
            }
            ApiError::CoreUnavailable => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "app core is not running".to_string(),
            ),
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

pub fn router(state: HttpState) -> Router {
    Router::new()
        .route("/api/state", get(get_state))
        .route(
            "/api/collections",
            get(list_collections).post(create_collection),
        )
        .route(
            "/api/collections/:id",
            get(get_collection).delete(delete_collection),
        )
        .route("/api/collections/:id/tracks", post(add_track))
        .route(
            "/api/collections/:id/tracks/:track_id",
            delete(remove_track),
        )
        .route("/api/search", post(search))
        .route("/api/select", post(select))
        .route("/api/play", post(play))
        .route("/api/pause", post(pause))
        .route("/api/notifications", get(notifications))
        .route("/api/scene", get(scene))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub fn start_server(
    bind_address: String,
    port: u16,
    state: HttpState,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let app = router(state);

        let addr = format!("{}:{}", bind_address, port);
        let listener = match TcpListener::bind(&addr).await {
            Ok(l) => l,
            Err(e) => {
                error!("Failed to bind HTTP server to {}: {}", addr, e);
                return;
            }
        };

        info!("HTTP API server listening on http://{}", addr);

        if let Err(e) = axum::serve(listener, app).await {
            error!("HTTP server error: {}", e);
        }
    })
}

/// Send an intent to the core and wait for its outcome.
async fn dispatch(state: &HttpState, intent: Intent) -> Result<IntentOutcome, ApiError> {
    let (reply_tx, reply_rx) = oneshot::channel::<IntentReply>();
    let evt = AppEvent::Intent {
        intent,
        reply: Some(reply_tx),
    };
    if state.event_tx.send(evt).await.is_err() {
        error!("Failed to send intent: core gone");
        return Err(ApiError::CoreUnavailable);
    }
    reply_rx
        .await
        .map_err(|_| ApiError::CoreUnavailable)?
        .map_err(ApiError::Catalog)
}

async fn get_state(State(state): State<HttpState>) -> Json<AppSnapshot> {
    Json(state.state_manager.get_state().await)
}

async fn list_collections(State(state): State<HttpState>) -> Json<Vec<Collection>> {
    Json(state.state_manager.get_state().await.collections)
}

async fn get_collection(
    State(state): State<HttpState>,
    Path(id): Path<String>,
) -> Result<Json<Collection>, ApiError> {
    state
        .state_manager
        .collection(&id)
        .await
        .map(Json)
        .map_err(ApiError::Catalog)
}

async fn create_collection(
    State(state): State<HttpState>,
    Json(body): Json<CreateCollectionBody>,
) -> Result<Response, ApiError> {
    info!("HTTP API: Create collection {:?}", body.name);
    let outcome = dispatch(&state, Intent::CreateCollection { name: body.name }).await?;
    Ok(match outcome {
        IntentOutcome::Created(collection) => {
            (StatusCode::CREATED, Json(collection)).into_response()
        }
        _ => StatusCode::OK.into_response(),
    })
}

async fn delete_collection(
    State(state): State<HttpState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    info!("HTTP API: Delete collection {}", id);
    dispatch(&state, Intent::DeleteCollection { collection_id: id }).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn add_track(
    State(state): State<HttpState>,
    Path(id): Path<String>,
    Json(track): Json<Track>,
) -> Result<StatusCode, ApiError> {
    info!("HTTP API: Add {} to collection {}", track.id, id);
    let intent = Intent::AddTrack {
        collection_id: id,
        track,
    };
    dispatch(&state, intent).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn remove_track(
    State(state): State<HttpState>,
    Path((id, track_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    info!("HTTP API: Remove {} from collection {}", track_id, id);
    let intent = Intent::RemoveTrack {
        collection_id: id,
        track_id,
    };
    dispatch(&state, intent).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn search(
    State(state): State<HttpState>,
    Json(body): Json<SearchBody>,
) -> Result<StatusCode, ApiError> {
    info!("HTTP API: Search {:?}", body.query);
    dispatch(&state, Intent::Search { query: body.query }).await?;
    Ok(StatusCode::ACCEPTED)
}

async fn select(
    State(state): State<HttpState>,
    Json(body): Json<SelectBody>,
) -> Result<StatusCode, ApiError> {
    let intent = match body {
        SelectBody {
            track_id: Some(track_id),
            ..
        } => Intent::SelectResult { track_id },
        SelectBody { track, .. } => Intent::Select { track },
    };
    dispatch(&state, intent).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn play(State(state): State<HttpState>) -> Result<StatusCode, ApiError> {
    info!("HTTP API: Play");
    dispatch(&state, Intent::SetPlaying { playing: true }).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn pause(State(state): State<HttpState>) -> Result<StatusCode, ApiError> {
    info!("HTTP API: Pause");
    dispatch(&state, Intent::SetPlaying { playing: false }).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn notifications(State(state): State<HttpState>) -> Json<Vec<ToastView>> {
    Json(state.notifications.lock().await.visible())
}

async fn scene(State(state): State<HttpState>) -> Json<SceneFrame> {
    Json(state.scene_rx.borrow().clone())
}
