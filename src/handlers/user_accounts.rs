use crate::error::ApiError;
use crate::filter::UserAccountFilter;
use crate::repository::{InsertOutcome, WriteOutcome};
use crate::schemas::{
    fold_field_names, AppState, DeleteUserAccountRequest, IdQuery, SearchQuery, UserAccount,
    WireFields,
};
use axum::{
    body::Bytes,
    extract::{Query, State},
    response::{Html, Json},
};
use model::entities::user_account;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, instrument, trace, warn};

/// Body returned by the write endpoints when at least one row changed.
const SUCCESS: &str = "success";

fn write_message(rows_affected: u64) -> String {
    if rows_affected > 0 {
        SUCCESS.to_string()
    } else {
        String::new()
    }
}

/// Decodes the first JSON value of the body; anything after it is ignored.
fn decode_body<T: DeserializeOwned + WireFields>(body: &Bytes) -> Result<T, ApiError> {
    let malformed = |e: serde_json::Error| {
        debug!("Failed to decode request body: {}", e);
        ApiError::MalformedInput("Incorrect UserAccounts")
    };

    let value = serde_json::Deserializer::from_slice(body)
        .into_iter::<Value>()
        .next()
        .ok_or_else(|| ApiError::MalformedInput("Incorrect UserAccounts"))?
        .map_err(malformed)?;
    serde_json::from_value(fold_field_names(value, T::FIELDS)).map_err(malformed)
}

fn parse_id(raw: Option<&str>) -> Result<i64, ApiError> {
    raw.unwrap_or_default().parse::<i64>().map_err(|e| {
        debug!("Rejected id {:?}: {}", raw, e);
        ApiError::MalformedInput("Incorrect ID")
    })
}

impl From<SearchQuery> for UserAccountFilter {
    fn from(query: SearchQuery) -> Self {
        UserAccountFilter::new(query.id_number, query.full_name, query.role)
    }
}

/// Service banner
pub async fn index() -> Html<String> {
    Html(format!(
        "<p>{} API (user accounts)</p><p>Version {}</p>",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    ))
}

/// Any method other than POST on a write route
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// List every user account
#[utoipa::path(
    get,
    path = "/UserAccounts",
    tag = "user_accounts",
    responses(
        (status = 200, description = "All user accounts", body = Vec<UserAccount>),
        (status = 500, description = "Store unreachable", body = String)
    )
)]
#[instrument(skip(state))]
pub async fn list_user_accounts(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserAccount>>, ApiError> {
    trace!("Entering list_user_accounts function");

    let result = state
        .with_repository(|repo| async move { repo.list_all().await })
        .await?;
    let accounts = state.settle("list user accounts", result, Vec::new)?;

    info!("Returning {} user accounts", accounts.len());
    Ok(Json(accounts.into_iter().map(UserAccount::from).collect()))
}

/// Search user accounts by id number prefix, full name prefix and exact role
#[utoipa::path(
    get,
    path = "/UserAccounts/Search",
    tag = "user_accounts",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching user accounts", body = Vec<UserAccount>),
        (status = 500, description = "Store unreachable", body = String)
    )
)]
#[instrument(skip(state))]
pub async fn search_user_accounts(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<UserAccount>>, ApiError> {
    let filter = UserAccountFilter::from(query);
    debug!("Searching user accounts with {:?}", filter);

    let result = state
        .with_repository(|repo| async move { repo.search(&filter).await })
        .await?;
    let accounts = state.settle("search user accounts", result, Vec::new)?;

    info!("Search returned {} user accounts", accounts.len());
    Ok(Json(accounts.into_iter().map(UserAccount::from).collect()))
}

/// Count user accounts matching the same criteria as search
#[utoipa::path(
    get,
    path = "/UserAccounts/Count",
    tag = "user_accounts",
    params(SearchQuery),
    responses(
        (status = 200, description = "Number of matching accounts, as plain text", body = String),
        (status = 500, description = "Store unreachable", body = String)
    )
)]
#[instrument(skip(state))]
pub async fn count_user_accounts(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<String, ApiError> {
    let filter = UserAccountFilter::from(query);

    let result = state
        .with_repository(|repo| async move { repo.count(&filter).await })
        .await?;
    let count = state.settle("count user accounts", result, || 0)?;

    debug!("Counted {} user accounts", count);
    Ok(count.to_string())
}

/// Fetch one user account by id
#[utoipa::path(
    get,
    path = "/UserAccounts/Id",
    tag = "user_accounts",
    params(IdQuery),
    responses(
        (status = 200, description = "The user account", body = UserAccount),
        (status = 400, description = "Id is not an integer", body = String),
        (status = 404, description = "No such account (strict mode only)", body = String),
        (status = 500, description = "Store unreachable", body = String)
    )
)]
#[instrument(skip(state))]
pub async fn get_user_account(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<UserAccount>, ApiError> {
    let id = parse_id(query.id.as_deref())?;

    let result = state
        .with_repository(|repo| async move { repo.get_by_id(id).await })
        .await?;
    let account = state
        .settle("get user account", result.map(UserAccount::from), UserAccount::default)?;

    Ok(Json(account))
}

/// Insert a user account; the store assigns the id
#[utoipa::path(
    post,
    path = "/UserAccounts/Insert",
    tag = "user_accounts",
    request_body = UserAccount,
    responses(
        (status = 200, description = "\"success\" when a row was inserted, empty otherwise", body = String),
        (status = 400, description = "Body is not a user account", body = String),
        (status = 405, description = "Not a POST request", body = String),
        (status = 500, description = "Store unreachable", body = String)
    )
)]
#[instrument(skip(state, body))]
pub async fn insert_user_account(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<String, ApiError> {
    let account: UserAccount = decode_body(&body)?;
    let record: user_account::Model = UserAccount { id: 0, ..account }.into();

    let result = state
        .with_repository(|repo| async move { repo.insert(&record).await })
        .await?;
    let outcome = state.settle("insert user account", result, || InsertOutcome::NoRowsAffected)?;

    match outcome {
        InsertOutcome::Inserted(id) => info!("User account {} inserted", id),
        InsertOutcome::NoRowsAffected => warn!("Insert touched no rows"),
    }
    Ok(write_message(outcome.rows_affected()))
}

/// Overwrite every field of the user account with the given id
#[utoipa::path(
    post,
    path = "/UserAccounts/Update",
    tag = "user_accounts",
    request_body = UserAccount,
    responses(
        (status = 200, description = "\"success\" when a row changed, empty otherwise", body = String),
        (status = 400, description = "Body is not a user account", body = String),
        (status = 405, description = "Not a POST request", body = String),
        (status = 500, description = "Store unreachable", body = String)
    )
)]
#[instrument(skip(state, body))]
pub async fn update_user_account(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<String, ApiError> {
    let account: UserAccount = decode_body(&body)?;
    let id = account.id;
    let record: user_account::Model = account.into();

    let result = state
        .with_repository(|repo| async move { repo.update(&record).await })
        .await?;
    let outcome = state.settle("update user account", result, || WriteOutcome::NoRowsAffected)?;

    if outcome == WriteOutcome::NoRowsAffected {
        warn!("Update of user account {} touched no rows", id);
    } else {
        info!("User account {} updated", id);
    }
    Ok(write_message(outcome.rows_affected()))
}

/// Delete the user account with the given id
#[utoipa::path(
    post,
    path = "/UserAccounts/Delete",
    tag = "user_accounts",
    request_body = DeleteUserAccountRequest,
    responses(
        (status = 200, description = "\"success\" when a row was deleted, empty otherwise", body = String),
        (status = 400, description = "Body is not a delete request", body = String),
        (status = 405, description = "Not a POST request", body = String),
        (status = 500, description = "Store unreachable", body = String)
    )
)]
#[instrument(skip(state, body))]
pub async fn delete_user_account(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<String, ApiError> {
    let request: DeleteUserAccountRequest = decode_body(&body)?;
    let id = request.id;

    let result = state
        .with_repository(|repo| async move { repo.delete(id).await })
        .await?;
    let outcome = state.settle("delete user account", result, || WriteOutcome::NoRowsAffected)?;

    if outcome == WriteOutcome::NoRowsAffected {
        warn!("User account {} not found for deletion (no rows affected)", id);
    } else {
        info!("User account {} deleted", id);
    }
    Ok(write_message(outcome.rows_affected()))
}
