//! HTTP API for the roster.

use crate::error::Error;
use crate::node::NodeState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use roster_core::{
    evaluate, Attendance, Category, CategorySelector, EventLabels, Item, Member,
    ResolvedAssignment, Roster,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

type AppState = Arc<NodeState>;

type ApiResult<T> = Result<Json<T>, StatusCode>;

/// Build the API router.
pub fn build_router(state: AppState) -> Router {
    // CORS layer for browser access
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let static_dir = state.config.static_dir.clone();

    let router = Router::new()
        // Health
        .route("/health", get(health))
        .route("/ready", get(ready))
        // Whole document
        .route("/api/v1/roster", get(get_roster))
        // Members
        .route("/api/v1/members", get(list_members).post(create_member))
        .route(
            "/api/v1/members/:id",
            get(get_member).put(rename_member).delete(delete_member),
        )
        .route("/api/v1/members/:id/attendance", put(set_attendance))
        .route("/api/v1/members/:id/attendance/:slot", put(set_attendance_slot))
        .route("/api/v1/members/:id/items", put(assign_item))
        .route(
            "/api/v1/members/:id/items/:category_id",
            delete(unassign_item),
        )
        // Categories and items
        .route("/api/v1/categories", get(list_categories).post(create_category))
        .route(
            "/api/v1/categories/:id",
            get(get_category).put(rename_category).delete(delete_category),
        )
        .route("/api/v1/categories/:id/items", post(create_item))
        .route(
            "/api/v1/categories/:id/items/:item_id",
            put(rename_item).delete(delete_item),
        )
        // Event slot labels
        .route("/api/v1/events", get(list_events))
        .route("/api/v1/events/:slot", put(set_event_label))
        // Eligibility
        .route(
            "/api/v1/eligible-members/:selector/:item_id",
            get(eligible_members),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    }
}

/// Map an error onto a response status, logging server-side failures.
fn error_status(e: Error) -> StatusCode {
    if e.is_not_found() {
        StatusCode::NOT_FOUND
    } else if e.is_invalid_input() {
        StatusCode::BAD_REQUEST
    } else {
        tracing::error!("Request failed: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// Apply a roster mutation through storage and return its value as JSON.
async fn mutate<T>(
    state: &NodeState,
    f: impl FnOnce(&mut Roster) -> roster_core::Result<T>,
) -> ApiResult<T> {
    state.storage.update(f).await.map(Json).map_err(error_status)
}

// --- Health endpoints ---

async fn health() -> &'static str {
    "OK"
}

async fn ready() -> &'static str {
    "OK"
}

async fn get_roster(State(state): State<AppState>) -> Json<Roster> {
    Json(state.storage.snapshot().await)
}

// --- Member endpoints ---

/// Member with derived attendance figures and resolved item names.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MemberView {
    #[serde(flatten)]
    member: Member,
    attended: usize,
    meets_attendance: bool,
    assignments: Vec<ResolvedAssignment>,
}

impl MemberView {
    fn new(roster: &Roster, member: &Member) -> Self {
        Self {
            member: member.clone(),
            attended: member.attendance.count(),
            meets_attendance: member.attendance.meets_threshold(),
            assignments: roster.resolved_assignments(member),
        }
    }
}

#[derive(Debug, Deserialize)]
struct NameRequest {
    name: String,
}

async fn list_members(State(state): State<AppState>) -> Json<Vec<MemberView>> {
    let members = state
        .storage
        .read(|roster| {
            roster
                .members_sorted()
                .into_iter()
                .map(|m| MemberView::new(roster, m))
                .collect()
        })
        .await;
    Json(members)
}

async fn create_member(
    State(state): State<AppState>,
    Json(req): Json<NameRequest>,
) -> Result<(StatusCode, Json<Member>), StatusCode> {
    let member = mutate(&state, |r| r.add_member(&req.name)).await?;
    tracing::info!(id = %member.id, "Created member {}", member.name);
    Ok((StatusCode::CREATED, member))
}

async fn get_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<MemberView> {
    state
        .storage
        .read(|roster| roster.member(&id).map(|m| MemberView::new(roster, m)))
        .await
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn rename_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<NameRequest>,
) -> ApiResult<Member> {
    mutate(&state, |r| r.rename_member(&id, &req.name)).await
}

async fn delete_member(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
    match state.storage.update(|r| r.remove_member(&id)).await {
        Ok(member) => {
            tracing::info!(id = %member.id, "Deleted member {}", member.name);
            StatusCode::NO_CONTENT
        }
        Err(e) => error_status(e),
    }
}

#[derive(Debug, Deserialize)]
struct AttendanceRequest {
    attendance: Vec<bool>,
}

async fn set_attendance(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AttendanceRequest>,
) -> ApiResult<Member> {
    let attendance = Attendance::try_from_flags(&req.attendance)
        .map_err(|e| error_status(e.into()))?;
    mutate(&state, |r| r.set_attendance(&id, attendance)).await
}

#[derive(Debug, Deserialize)]
struct SlotRequest {
    present: bool,
}

async fn set_attendance_slot(
    State(state): State<AppState>,
    Path((id, slot)): Path<(String, usize)>,
    Json(req): Json<SlotRequest>,
) -> ApiResult<Member> {
    mutate(&state, |r| r.set_attendance_slot(&id, slot, req.present)).await
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssignRequest {
    category_id: String,
    item_id: String,
}

async fn assign_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AssignRequest>,
) -> ApiResult<Member> {
    mutate(&state, |r| r.assign_item(&id, &req.category_id, &req.item_id)).await
}

async fn unassign_item(
    State(state): State<AppState>,
    Path((id, category_id)): Path<(String, String)>,
) -> ApiResult<Member> {
    mutate(&state, |r| r.unassign_item(&id, &category_id)).await
}

// --- Category endpoints ---

async fn list_categories(State(state): State<AppState>) -> Json<Vec<Category>> {
    Json(state.storage.read(|roster| roster.categories.clone()).await)
}

async fn create_category(
    State(state): State<AppState>,
    Json(req): Json<NameRequest>,
) -> Result<(StatusCode, Json<Category>), StatusCode> {
    let category = mutate(&state, |r| r.add_category(&req.name)).await?;
    tracing::info!(id = %category.id, "Created category {}", category.name);
    Ok((StatusCode::CREATED, category))
}

async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Category> {
    state
        .storage
        .read(|roster| roster.category(&id).cloned())
        .await
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn rename_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<NameRequest>,
) -> ApiResult<Category> {
    mutate(&state, |r| r.rename_category(&id, &req.name)).await
}

async fn delete_category(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
    match state.storage.update(|r| r.remove_category(&id)).await {
        Ok(category) => {
            tracing::info!(id = %category.id, "Deleted category {}", category.name);
            StatusCode::NO_CONTENT
        }
        Err(e) => error_status(e),
    }
}

async fn create_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<NameRequest>,
) -> Result<(StatusCode, Json<Item>), StatusCode> {
    let item = mutate(&state, |r| r.add_item(&id, &req.name)).await?;
    Ok((StatusCode::CREATED, item))
}

async fn rename_item(
    State(state): State<AppState>,
    Path((id, item_id)): Path<(String, String)>,
    Json(req): Json<NameRequest>,
) -> ApiResult<Item> {
    mutate(&state, |r| r.rename_item(&id, &item_id, &req.name)).await
}

async fn delete_item(
    State(state): State<AppState>,
    Path((id, item_id)): Path<(String, String)>,
) -> StatusCode {
    match state.storage.update(|r| r.remove_item(&id, &item_id)).await {
        Ok(_) => StatusCode::NO_CONTENT,
        Err(e) => error_status(e),
    }
}

// --- Event endpoints ---

#[derive(Debug, Deserialize)]
struct EventLabelRequest {
    label: Option<String>,
}

async fn list_events(State(state): State<AppState>) -> Json<EventLabels> {
    Json(state.storage.read(|roster| roster.events.clone()).await)
}

async fn set_event_label(
    State(state): State<AppState>,
    Path(slot): Path<usize>,
    Json(req): Json<EventLabelRequest>,
) -> ApiResult<EventLabels> {
    mutate(&state, |r| {
        r.set_event_label(slot, req.label)?;
        Ok(r.events.clone())
    })
    .await
}

// --- Eligibility ---

async fn eligible_members(
    State(state): State<AppState>,
    Path((selector, item_id)): Path<(String, String)>,
) -> Json<Vec<Member>> {
    let selector = CategorySelector::parse(&selector);
    let eligible = state
        .storage
        .read(|roster| evaluate(roster, &selector, &item_id))
        .await;
    Json(eligible)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeConfig;
    use crate::storage::Storage;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request};
    use serde_json::{json, Value};
    use tempfile::{tempdir, TempDir};
    use tower::ServiceExt;

    async fn test_app() -> (Router, TempDir) {
        let dir = tempdir().unwrap();
        let config = NodeConfig::from_lookup(|key| match key {
            "ROSTER_DATA_FILE" => Some(dir.path().join("db.json").to_string_lossy().into_owned()),
            _ => None,
        })
        .unwrap();
        let storage = Arc::new(Storage::open(&config.data_file).await.unwrap());
        let state = Arc::new(NodeState { storage, config });
        (build_router(state), dir)
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(body) => {
                request = request.header("content-type", "application/json");
                Body::from(body.to_string())
            }
            None => Body::empty(),
        };
        let response = app.clone().oneshot(request.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    async fn create(app: &Router, uri: &str, name: &str) -> String {
        let (status, body) = send(app, Method::POST, uri, Some(json!({ "name": name }))).await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_str().unwrap().to_string()
    }

    async fn attend(app: &Router, member_id: &str, events: usize) {
        let flags: Vec<bool> = (0..8).map(|slot| slot < events).collect();
        let (status, _) = send(
            app,
            Method::PUT,
            &format!("/api/v1/members/{}/attendance", member_id),
            Some(json!({ "attendance": flags })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    async fn assign(app: &Router, member_id: &str, category_id: &str, item_id: &str) -> StatusCode {
        send(
            app,
            Method::PUT,
            &format!("/api/v1/members/{}/items", member_id),
            Some(json!({ "categoryId": category_id, "itemId": item_id })),
        )
        .await
        .0
    }

    #[tokio::test]
    async fn health() {
        let (app, _dir) = test_app().await;
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn ring_eligibility_over_http() {
        let (app, _dir) = test_app().await;

        let ring1 = create(&app, "/api/v1/categories", "Ring 1").await;
        let ring2 = create(&app, "/api/v1/categories", "Ring 2").await;
        let signet1 = create(&app, &format!("/api/v1/categories/{}/items", ring1), "Signet").await;
        let signet2 = create(&app, &format!("/api/v1/categories/{}/items", ring2), "Signet").await;

        let zed = create(&app, "/api/v1/members", "Zed").await;
        let amy = create(&app, "/api/v1/members", "Amy").await;
        let lou = create(&app, "/api/v1/members", "Lou").await;
        attend(&app, &zed, 4).await;
        attend(&app, &amy, 8).await;
        attend(&app, &lou, 3).await;
        assert_eq!(assign(&app, &zed, &ring1, &signet1).await, StatusCode::OK);
        assert_eq!(assign(&app, &amy, &ring2, &signet2).await, StatusCode::OK);
        assert_eq!(assign(&app, &lou, &ring2, &signet2).await, StatusCode::OK);

        let (status, body) = send(
            &app,
            Method::GET,
            &format!("/api/v1/eligible-members/ring/{}", signet1),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Amy", "Zed"]);

        let (_, body) = send(
            &app,
            Method::GET,
            &format!("/api/v1/eligible-members/{}/{}", ring1, signet1),
            None,
        )
        .await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["name"], "Zed");
        assert_eq!(body[0]["items"][0]["categoryId"], ring1.as_str());
    }

    #[tokio::test]
    async fn unknown_item_is_empty_not_error() {
        let (app, _dir) = test_app().await;
        let (status, body) =
            send(&app, Method::GET, "/api/v1/eligible-members/ring/nope", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn member_crud_and_validation() {
        let (app, _dir) = test_app().await;

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/v1/members",
            Some(json!({ "name": "  " })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let id = create(&app, "/api/v1/members", "Alice").await;
        let uri = format!("/api/v1/members/{}", id);

        let (status, body) = send(&app, Method::PUT, &uri, Some(json!({ "name": "Alicia" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Alicia");

        let (status, _) = send(
            &app,
            Method::PUT,
            &format!("{}/attendance", uri),
            Some(json!({ "attendance": [true, true] })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(
            &app,
            Method::PUT,
            &format!("{}/attendance/5", uri),
            Some(json!({ "present": true })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["attendance"][5], true);

        let (status, _) = send(
            &app,
            Method::PUT,
            &format!("{}/attendance/8", uri),
            Some(json!({ "present": true })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["attended"], 1);
        assert_eq!(body["meetsAttendance"], false);

        let (status, _) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn assignment_replaces_by_category() {
        let (app, _dir) = test_app().await;
        let cloak = create(&app, "/api/v1/categories", "Cloak").await;
        let first = create(&app, &format!("/api/v1/categories/{}/items", cloak), "Red").await;
        let second = create(&app, &format!("/api/v1/categories/{}/items", cloak), "Blue").await;
        let member = create(&app, "/api/v1/members", "Alice").await;

        assert_eq!(assign(&app, &member, &cloak, &first).await, StatusCode::OK);
        assert_eq!(assign(&app, &member, &cloak, &second).await, StatusCode::OK);
        assert_eq!(assign(&app, &member, &cloak, "missing").await, StatusCode::NOT_FOUND);

        let (_, body) = send(&app, Method::GET, &format!("/api/v1/members/{}", member), None).await;
        assert_eq!(body["items"].as_array().unwrap().len(), 1);
        assert_eq!(body["assignments"][0]["itemName"], "Blue");

        let (status, body) = send(
            &app,
            Method::DELETE,
            &format!("/api/v1/members/{}/items/{}", member, cloak),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["items"], json!([]));
    }

    #[tokio::test]
    async fn deleting_category_leaves_members_intact() {
        let (app, _dir) = test_app().await;
        let ring = create(&app, "/api/v1/categories", "Ring 1").await;
        let signet = create(&app, &format!("/api/v1/categories/{}/items", ring), "Signet").await;
        let member = create(&app, "/api/v1/members", "Alice").await;
        attend(&app, &member, 8).await;
        assign(&app, &member, &ring, &signet).await;

        let (status, _) = send(
            &app,
            Method::DELETE,
            &format!("/api/v1/categories/{}", ring),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(
            &app,
            Method::GET,
            &format!("/api/v1/eligible-members/{}/{}", ring, signet),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));

        let (_, body) = send(&app, Method::GET, "/api/v1/members", None).await;
        assert_eq!(body[0]["assignments"], json!([]));
    }

    #[tokio::test]
    async fn event_labels() {
        let (app, _dir) = test_app().await;

        let (status, body) = send(
            &app,
            Method::PUT,
            "/api/v1/events/0",
            Some(json!({ "label": "2024-05-01" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0], "2024-05-01");

        let (status, _) = send(
            &app,
            Method::PUT,
            "/api/v1/events/9",
            Some(json!({ "label": "x" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, body) = send(&app, Method::GET, "/api/v1/events", None).await;
        assert_eq!(body.as_array().unwrap().len(), 8);
    }

    #[tokio::test]
    async fn roster_document_shape() {
        let (app, _dir) = test_app().await;
        create(&app, "/api/v1/members", "Alice").await;

        let (status, body) = send(&app, Method::GET, "/api/v1/roster", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["members"][0]["attendance"].as_array().unwrap().len(), 8);
        assert!(body["categories"].is_array());
    }
}
