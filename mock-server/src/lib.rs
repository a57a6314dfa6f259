//! In-memory implementation of the users REST API.
//!
//! Serves the same contract the admin screen is written against, so it
//! doubles as a local backend and as the peer for integration tests.
//! Records live in insertion order behind a `tokio` `RwLock`.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use uuid::Uuid;

pub mod config;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[default]
    Male,
    Female,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub birthday: String,
    pub gender: Gender,
}

/// Body accepted by both POST and PUT. Any `id` in a PUT body is ignored in
/// favor of the path.
#[derive(Deserialize)]
pub struct UserInput {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub birthday: String,
    #[serde(default)]
    pub gender: Gender,
}

pub type Db = Arc<RwLock<Vec<User>>>;

pub fn app() -> Router {
    app_with(Vec::new())
}

/// Router preloaded with `users`.
pub fn app_with(users: Vec<User>) -> Router {
    let db: Db = Arc::new(RwLock::new(users));
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/{id}", get(get_user).put(update_user).delete(delete_user))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_users(State(db): State<Db>) -> Json<Vec<User>> {
    Json(db.read().await.clone())
}

async fn create_user(
    State(db): State<Db>,
    Json(input): Json<UserInput>,
) -> (StatusCode, Json<User>) {
    let user = User {
        id: Uuid::new_v4().to_string(),
        name: input.name,
        address: input.address,
        phone: input.phone,
        birthday: input.birthday,
        gender: input.gender,
    };
    db.write().await.push(user.clone());
    tracing::info!(user_id = %user.id, "user created");
    (StatusCode::CREATED, Json(user))
}

async fn get_user(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<User>, StatusCode> {
    let users = db.read().await;
    users
        .iter()
        .find(|u| u.id == id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn update_user(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<UserInput>,
) -> Result<Json<User>, StatusCode> {
    let mut users = db.write().await;
    let user = users
        .iter_mut()
        .find(|u| u.id == id)
        .ok_or(StatusCode::NOT_FOUND)?;
    user.name = input.name;
    user.address = input.address;
    user.phone = input.phone;
    user.birthday = input.birthday;
    user.gender = input.gender;
    tracing::info!(user_id = %id, "user replaced");
    Ok(Json(user.clone()))
}

async fn delete_user(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<StatusCode, StatusCode> {
    let mut users = db.write().await;
    let before = users.len();
    users.retain(|u| u.id != id);
    if users.len() == before {
        return Err(StatusCode::NOT_FOUND);
    }
    tracing::info!(user_id = %id, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}
