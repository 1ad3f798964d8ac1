//! Axum web server with WebSocket streaming of board views.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use slotboard_engine::{
    render, Board, BoardInput, BoardView, KindMatrix, Quotas, Scheduled, SlotDetail, SlotKind,
    Timer, TokenType,
};
use tokio::sync::{broadcast, RwLock};
use tower_http::cors::CorsLayer;
use tracing::{debug, info, warn};

use crate::error::Error;

/// Shared application state.
pub struct AppState {
    board: RwLock<Board>,
    updates: broadcast::Sender<BoardView>,
}

impl AppState {
    /// Wrap a board for sharing between handlers.
    pub fn new(board: Board) -> Arc<Self> {
        let (updates, _) = broadcast::channel(64);
        Arc::new(Self {
            board: RwLock::new(board),
            updates,
        })
    }

    /// Current rendered view.
    pub async fn view(&self) -> BoardView {
        render(&*self.board.read().await)
    }

    /// Read-only access to the board.
    pub async fn read<T>(&self, f: impl FnOnce(&Board) -> T) -> T {
        f(&*self.board.read().await)
    }

    /// Views published after every change.
    pub fn subscribe(&self) -> broadcast::Receiver<BoardView> {
        self.updates.subscribe()
    }

    /// Run a mutation, publish the resulting view and start the timers it
    /// queued.
    pub async fn update<T>(self: &Arc<Self>, f: impl FnOnce(&mut Board) -> T) -> (T, BoardView) {
        let mut board = self.board.write().await;
        let out = f(&mut board);
        let scheduled = board.take_scheduled();
        let view = render(&board);
        drop(board);

        // No subscribers is fine
        let _ = self.updates.send(view.clone());
        self.spawn_timers(scheduled);
        (out, view)
    }

    /// Run a presentation timer now.
    pub async fn fire(&self, timer: Timer) {
        let mut board = self.board.write().await;
        if board.fire(timer) {
            let view = render(&board);
            drop(board);
            let _ = self.updates.send(view);
        }
    }

    fn spawn_timers(self: &Arc<Self>, scheduled: Vec<Scheduled>) {
        for s in scheduled {
            let state = Arc::clone(self);
            tokio::spawn(async move {
                tokio::time::sleep(s.delay()).await;
                state.fire(s.timer).await;
            });
        }
    }
}

/// Slotboard web server.
///
/// Every page, socket and admin connection drives the one board it owns;
/// there is no per-client state.
pub struct SlotboardServer {
    state: Arc<AppState>,
}

impl SlotboardServer {
    /// Create a server around a board.
    pub fn new(board: Board) -> Self {
        Self {
            state: AppState::new(board),
        }
    }

    /// Shared state, for the admin socket.
    pub fn state(&self) -> Arc<AppState> {
        Arc::clone(&self.state)
    }

    /// Build the router for the server.
    pub fn router(&self) -> Router {
        Router::new()
            // Serve the widget page
            .route("/", get(index_handler))
            .route("/health", get(health))
            // Board interaction
            .route("/api/view", get(view_handler))
            .route("/api/input", post(input_handler))
            .route("/api/place", post(place_handler))
            .route("/api/remove", post(remove_handler))
            .route("/api/reset", post(reset_handler))
            // Configuration
            .route("/api/grid", get(get_grid_handler).put(set_grid_handler))
            .route("/api/slots", get(slots_handler))
            .route("/api/slots/{index}/kind", put(set_kind_handler))
            .route("/api/quotas", get(get_quotas_handler).put(set_quotas_handler))
            // WebSocket for live views
            .route("/ws", get(ws_handler))
            .layer(CorsLayer::permissive())
            .with_state(self.state.clone())
    }

    /// Run the server on the given address.
    pub async fn serve(self, addr: SocketAddr) -> Result<(), std::io::Error> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("Slotboard running on http://{}", addr);
        if !addr.ip().is_loopback() {
            warn!("Bound to {}: every client shares one board", addr.ip());
        }
        axum::serve(listener, self.router()).await
    }
}

/// JSON error body.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
    kind: &'static str,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, kind) = match &self {
            Error::Placement(e) if e.is_placement_conflict() => (StatusCode::CONFLICT, e.kind()),
            Error::Placement(e) => (StatusCode::BAD_REQUEST, e.kind()),
            Error::Config(_) => (StatusCode::BAD_REQUEST, "config"),
            Error::Serialization(_) => (StatusCode::BAD_REQUEST, "serialization"),
            Error::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "io"),
        };
        let body = ErrorBody {
            error: self.to_string(),
            kind,
        };
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, Error>;

async fn index_handler() -> Html<&'static str> {
    Html(include_str!("../static/index.html"))
}

async fn health() -> &'static str {
    "OK"
}

async fn view_handler(State(state): State<Arc<AppState>>) -> Json<BoardView> {
    Json(state.view().await)
}

/// UI events answer with the new view; occupied and quota failures are
/// already on it as a notice.
async fn input_handler(
    State(state): State<Arc<AppState>>,
    Json(input): Json<BoardInput>,
) -> ApiResult<BoardView> {
    let (result, view) = state.update(|board| board.apply(input)).await;
    match result {
        Err(e) if !e.is_placement_conflict() => Err(e.into()),
        _ => Ok(Json(view)),
    }
}

#[derive(Deserialize)]
struct PlaceRequest {
    slot: usize,
    token: TokenType,
}

async fn place_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PlaceRequest>,
) -> ApiResult<BoardView> {
    let (result, view) = state.update(|board| board.place(req.slot, req.token)).await;
    result?;
    Ok(Json(view))
}

#[derive(Deserialize)]
struct RemoveRequest {
    slot: usize,
}

#[derive(Serialize)]
struct RemoveResponse {
    removed: Option<TokenType>,
    view: BoardView,
}

async fn remove_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RemoveRequest>,
) -> ApiResult<RemoveResponse> {
    let (result, view) = state.update(|board| board.remove(req.slot)).await;
    Ok(Json(RemoveResponse {
        removed: result?,
        view,
    }))
}

async fn reset_handler(State(state): State<Arc<AppState>>) -> Json<BoardView> {
    let ((), view) = state.update(Board::reset).await;
    Json(view)
}

async fn get_grid_handler(State(state): State<Arc<AppState>>) -> Json<KindMatrix> {
    Json(state.read(|b| b.engine().grid_configuration()).await)
}

async fn set_grid_handler(
    State(state): State<Arc<AppState>>,
    Json(rows): Json<Vec<Vec<SlotKind>>>,
) -> ApiResult<KindMatrix> {
    let (result, _) = state
        .update(|board| {
            board
                .set_grid_configuration(&rows)
                .map(|()| board.engine().grid_configuration())
        })
        .await;
    Ok(Json(result?))
}

async fn slots_handler(State(state): State<Arc<AppState>>) -> Json<Vec<SlotDetail>> {
    Json(state.read(|b| b.engine().slot_details()).await)
}

#[derive(Deserialize)]
struct KindRequest {
    kind: SlotKind,
}

async fn set_kind_handler(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
    Json(req): Json<KindRequest>,
) -> ApiResult<Vec<SlotDetail>> {
    let (result, _) = state
        .update(|board| {
            board
                .set_slot_kind(index, req.kind)
                .map(|()| board.engine().slot_details())
        })
        .await;
    Ok(Json(result?))
}

async fn get_quotas_handler(State(state): State<Arc<AppState>>) -> Json<Quotas> {
    Json(state.read(|b| b.engine().quotas()).await)
}

async fn set_quotas_handler(
    State(state): State<Arc<AppState>>,
    Json(quotas): Json<Quotas>,
) -> Json<Quotas> {
    let (quotas, _) = state
        .update(|board| {
            board.configure(&quotas);
            board.engine().quotas()
        })
        .await;
    Json(quotas)
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

async fn send_view(socket: &mut WebSocket, view: &BoardView) -> Result<(), Error> {
    let json = serde_json::to_string(view)?;
    socket
        .send(Message::Text(json.into()))
        .await
        .map_err(|e| Error::Io(std::io::Error::other(e)))
}

async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    // Subscribe first so no update slips between snapshot and stream
    let mut updates = state.subscribe();
    let view = state.view().await;
    if send_view(&mut socket, &view).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            msg = socket.recv() => match msg {
                Some(Ok(Message::Text(text))) => {
                    match serde_json::from_str::<BoardInput>(text.as_str()) {
                        Ok(input) => {
                            let (result, _) = state.update(|board| board.apply(input)).await;
                            if let Err(e) = result {
                                debug!("board input rejected: {}", e);
                            }
                        }
                        Err(e) => warn!("invalid board input: {}", e),
                    }
                }
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
            update = updates.recv() => match update {
                Ok(view) => {
                    if send_view(&mut socket, &view).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!(skipped, "websocket lagged, resending current view");
                    let view = state.view().await;
                    if send_view(&mut socket, &view).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
        }
    }
}
