//! In-memory stand-in for the CloudHealth AWS Account endpoints.
//!
//! Every route requires `?api_key=` matching the key the router was built
//! with. Accounts get sequential ids starting at 1 and names are unique.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};

/// Page size used when `per_page` is absent.
pub const DEFAULT_PER_PAGE: usize = 30;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AwsAccount {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    pub authentication: Authentication,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Authentication {
    pub protocol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assume_role_arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assume_role_external_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AwsAccountList {
    pub aws_accounts: Vec<AwsAccount>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Params {
    pub api_key: Option<String>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

#[derive(Debug, Default)]
pub struct Store {
    accounts: BTreeMap<i64, AwsAccount>,
    next_id: i64,
}

impl Store {
    fn name_taken(&self, name: &str, except: Option<i64>) -> bool {
        self.accounts
            .values()
            .any(|a| a.name == name && Some(a.id) != except)
    }
}

pub type Db = Arc<RwLock<Store>>;

#[derive(Clone)]
pub struct AppState {
    api_key: Arc<str>,
    db: Db,
}

/// Failure responses, rendered as `{"error": "..."}`.
#[derive(Debug)]
pub enum Rejection {
    Unauthorized,
    NotFound,
    NameTaken(String),
    InvalidBody(String),
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Rejection::Unauthorized => (StatusCode::UNAUTHORIZED, "invalid api_key".to_string()),
            Rejection::NotFound => (StatusCode::NOT_FOUND, "record not found".to_string()),
            Rejection::NameTaken(name) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("name `{name}` has already been taken"),
            ),
            Rejection::InvalidBody(reason) => (StatusCode::UNPROCESSABLE_ENTITY, reason),
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

pub fn app(api_key: &str) -> Router {
    let state = AppState {
        api_key: Arc::from(api_key),
        db: Arc::new(RwLock::new(Store::default())),
    };
    Router::new()
        .route("/aws_accounts", get(list_accounts).post(create_account))
        .route(
            "/aws_accounts/{id}",
            get(get_account).put(update_account).delete(delete_account),
        )
        .with_state(state)
}

pub async fn run(listener: TcpListener, api_key: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app(api_key)).await
}

fn authorize(state: &AppState, params: &Params) -> Result<(), Rejection> {
    match params.api_key.as_deref() {
        Some(key) if key == &*state.api_key => Ok(()),
        _ => Err(Rejection::Unauthorized),
    }
}

/// Decode a request body. Runs after `authorize` so a bad key wins over a bad body.
fn parse_account(body: &Bytes) -> Result<AwsAccount, Rejection> {
    serde_json::from_slice(body).map_err(|e| Rejection::InvalidBody(e.to_string()))
}

async fn list_accounts(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> Result<Json<AwsAccountList>, Rejection> {
    authorize(&state, &params)?;
    // CloudHealth treats page 0 like page 1.
    let page = params.page.unwrap_or(1).max(1);
    let per_page = params.per_page.unwrap_or(DEFAULT_PER_PAGE);

    let store = state.db.read().await;
    let aws_accounts: Vec<AwsAccount> = store
        .accounts
        .values()
        .skip((page - 1).saturating_mul(per_page))
        .take(per_page)
        .cloned()
        .collect();
    debug!(page, per_page, returned = aws_accounts.len(), "listed aws accounts");
    Ok(Json(AwsAccountList { aws_accounts }))
}

async fn create_account(
    State(state): State<AppState>,
    Query(params): Query<Params>,
    body: Bytes,
) -> Result<(StatusCode, Json<AwsAccount>), Rejection> {
    authorize(&state, &params)?;
    let input = parse_account(&body)?;
    let mut store = state.db.write().await;
    if store.name_taken(&input.name, None) {
        return Err(Rejection::NameTaken(input.name));
    }
    store.next_id += 1;
    let account = AwsAccount {
        id: store.next_id,
        ..input
    };
    store.accounts.insert(account.id, account.clone());
    info!(id = account.id, name = %account.name, "created aws account");
    Ok((StatusCode::CREATED, Json(account)))
}

async fn get_account(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<Params>,
) -> Result<Json<AwsAccount>, Rejection> {
    authorize(&state, &params)?;
    let store = state.db.read().await;
    store.accounts.get(&id).cloned().map(Json).ok_or(Rejection::NotFound)
}

async fn update_account(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<Params>,
    body: Bytes,
) -> Result<Json<AwsAccount>, Rejection> {
    authorize(&state, &params)?;
    let input = parse_account(&body)?;
    let mut store = state.db.write().await;
    if !store.accounts.contains_key(&id) {
        return Err(Rejection::NotFound);
    }
    if store.name_taken(&input.name, Some(id)) {
        return Err(Rejection::NameTaken(input.name));
    }
    let account = AwsAccount { id, ..input };
    store.accounts.insert(id, account.clone());
    info!(id, name = %account.name, "updated aws account");
    Ok(Json(account))
}

async fn delete_account(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<Params>,
) -> Result<StatusCode, Rejection> {
    authorize(&state, &params)?;
    let mut store = state.db.write().await;
    store
        .accounts
        .remove(&id)
        .map(|_| {
            info!(id, "deleted aws account");
            StatusCode::NO_CONTENT
        })
        .ok_or(Rejection::NotFound)
}
