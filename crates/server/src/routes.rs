//! `/api/users` handlers.
//!
//! Handlers parse the path id first, then the body, validate client input
//! against the user schema (minus `id`), and hand typed values to the
//! service. All store work runs on the blocking pool via [`AppState::run`].
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::Value;
use service::{NewUser, User, UserPatch};

use crate::{ApiError, AppState};

/// Body of successful create/update/delete responses.
#[derive(Debug, Serialize)]
struct Mutation {
    success: bool,
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<User>,
}

impl Mutation {
    fn ok(message: &'static str, user: Option<User>) -> Json<Self> {
        Json(Self {
            success: true,
            message,
            user,
        })
    }
}

pub(crate) fn router() -> Router<AppState> {
    let users = get(list_users).post(create_user).fallback(route_not_found);
    let user = get(get_user)
        .put(update_user)
        .delete(delete_user)
        .fallback(route_not_found);

    Router::new()
        .route("/", get(health))
        .route("/api/users", users.clone())
        .route("/api/users/", users)
        .route("/api/users/:id", user.clone())
        .route("/api/users/:id/", user)
        .fallback(route_not_found)
}

pub(crate) async fn route_not_found() -> ApiError {
    ApiError::RouteNotFound
}

async fn health() -> Json<Value> {
    Json(serde_json::json!({ "success": true, "message": "ok" }))
}

/// Accepts non-negative integers, including integral numbers written as
/// `1.0` or `1e0`. Other numbers cannot match a stored id and yield 404;
/// anything non-numeric is a 400.
fn parse_id(raw: &str) -> Result<u64, ApiError> {
    if let Ok(id) = raw.parse::<u64>() {
        return Ok(id);
    }
    match raw.parse::<f64>() {
        Ok(n) if n.is_finite() && n >= 0.0 && n.fract() == 0.0 && n < u64::MAX as f64 => {
            Ok(n as u64)
        }
        Ok(n) if n.is_finite() => Err(ApiError::NotFound("User not found".to_string())),
        _ => Err(ApiError::BadRequest("Invalid id format".to_string())),
    }
}

async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(state.run(|users| users.list()).await?))
}

async fn get_user(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<Json<User>, ApiError> {
    let id = parse_id(&raw)?;
    Ok(Json(state.run(move |users| users.get(id)).await?))
}

async fn create_user(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Mutation>, ApiError> {
    let Json(body) = body?;

    let user = state
        .run(move |users| {
            let fields = users.input_schema().validate(&body)?;
            let new: NewUser = serde_json::from_value(Value::Object(fields))?;
            users.create(&new)
        })
        .await?;

    Ok(Mutation::ok("User created", Some(user)))
}

async fn update_user(
    State(state): State<AppState>,
    Path(raw): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Mutation>, ApiError> {
    let id = parse_id(&raw)?;
    let Json(body) = body?;

    let user = state
        .run(move |users| {
            let fields = users.input_schema().validate_partial(&body)?;
            let patch: UserPatch = serde_json::from_value(Value::Object(fields))?;
            users.update(id, &patch)
        })
        .await?;

    Ok(Mutation::ok("User updated", Some(user)))
}

async fn delete_user(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<Json<Mutation>, ApiError> {
    let id = parse_id(&raw)?;
    state.run(move |users| users.delete(id)).await?;
    Ok(Mutation::ok("User deleted", None))
}
