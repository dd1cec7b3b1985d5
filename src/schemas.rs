use crate::error::ApiError;
use crate::repository::UserAccountRepository;
use crate::store::{ConnectionProvider, StoreError};
use model::entities::user_account;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::future::Future;
use std::sync::Arc;
use tracing::{error, warn};
use utoipa::{IntoParams, OpenApi, ToSchema};

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Source of per-request store connections
    pub store: Arc<dyn ConnectionProvider>,
    /// Surface store failures as error statuses instead of empty bodies
    pub strict_errors: bool,
}

impl AppState {
    pub fn new(store: Arc<dyn ConnectionProvider>, strict_errors: bool) -> Self {
        Self {
            store,
            strict_errors,
        }
    }

    /// Acquires a connection, runs `operation` against a repository built on
    /// it and releases the connection again.
    ///
    /// The outer error is the request-aborting kind (store unreachable); the
    /// inner result is the repository outcome, left for [`AppState::settle`].
    pub async fn with_repository<T, F, Fut>(
        &self,
        operation: F,
    ) -> Result<Result<T, StoreError>, ApiError>
    where
        F: FnOnce(UserAccountRepository) -> Fut,
        Fut: Future<Output = Result<T, StoreError>>,
    {
        let connection = self
            .store
            .acquire()
            .await
            .map_err(ApiError::StoreUnreachable)?;

        let result = operation(UserAccountRepository::new(connection.clone())).await;
        self.store.release(connection).await;
        Ok(result)
    }

    /// Logs a failed repository call and decides how the response degrades.
    ///
    /// Outside strict mode the request still succeeds with `fallback()`.
    pub fn settle<T>(
        &self,
        operation: &str,
        result: Result<T, StoreError>,
        fallback: impl FnOnce() -> T,
    ) -> Result<T, ApiError> {
        match result {
            Ok(value) => Ok(value),
            Err(err) => {
                match &err {
                    StoreError::NotFound(_) => warn!("{}: {}", operation, err),
                    _ => error!("{} failed: {}", operation, err),
                }
                if self.strict_errors {
                    Err(ApiError::from(err))
                } else {
                    Ok(fallback())
                }
            }
        }
    }
}

/// A user account as it travels over the wire.
///
/// Missing keys decode to their zero value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase", default)]
pub struct UserAccount {
    /// Store-assigned identity; ignored on insert
    pub id: i64,
    pub id_number: String,
    pub full_name: String,
    pub username: String,
    pub password: String,
    pub section: String,
    pub role: String,
}

impl From<user_account::Model> for UserAccount {
    fn from(model: user_account::Model) -> Self {
        Self {
            id: model.id,
            id_number: model.id_number,
            full_name: model.full_name,
            username: model.username,
            password: model.password,
            section: model.section,
            role: model.role,
        }
    }
}

impl From<UserAccount> for user_account::Model {
    fn from(account: UserAccount) -> Self {
        Self {
            id: account.id,
            id_number: account.id_number,
            full_name: account.full_name,
            username: account.username,
            password: account.password,
            section: account.section,
            role: account.role,
        }
    }
}

/// Request body for deleting a user account
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct DeleteUserAccountRequest {
    #[serde(rename = "Id")]
    pub id: i64,
}

/// Request bodies whose keys are matched without regard to case.
pub trait WireFields {
    /// Canonical key spellings, as serialized.
    const FIELDS: &'static [&'static str];
}

impl WireFields for UserAccount {
    const FIELDS: &'static [&'static str] = &[
        "Id", "IdNumber", "FullName", "Username", "Password", "Section", "Role",
    ];
}

impl WireFields for DeleteUserAccountRequest {
    const FIELDS: &'static [&'static str] = &["Id"];
}

/// Rewrites the keys of a JSON object to their canonical spelling.
///
/// A key that matches a field exactly wins over one that only matches
/// case-insensitively. Keys matching no field are dropped, and `null`
/// becomes an empty object.
pub fn fold_field_names(value: Value, fields: &[&str]) -> Value {
    let map = match value {
        Value::Object(map) => map,
        Value::Null => return Value::Object(Map::new()),
        other => return other,
    };

    let mut folded = Map::new();
    let mut exact = Vec::new();
    for (key, field_value) in map {
        if fields.contains(&key.as_str()) {
            exact.push((key, field_value));
            continue;
        }
        let lowered = key.to_lowercase();
        if let Some(field) = fields.iter().find(|f| f.to_lowercase() == lowered) {
            folded.insert(field.to_string(), field_value);
        }
    }
    folded.extend(exact);
    Value::Object(folded)
}

/// Query parameters shared by the search and count endpoints.
/// Empty values are treated as not supplied.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Prefix of the external id number
    pub id_number: Option<String>,
    /// Prefix of the full name
    pub full_name: Option<String>,
    /// Exact role
    pub role: Option<String>,
}

/// Query parameters for the lookup-by-id endpoint
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct IdQuery {
    /// Integer identity of the account
    pub id: Option<String>,
}

/// Health check response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::user_accounts::list_user_accounts,
        crate::handlers::user_accounts::search_user_accounts,
        crate::handlers::user_accounts::count_user_accounts,
        crate::handlers::user_accounts::get_user_account,
        crate::handlers::user_accounts::insert_user_account,
        crate::handlers::user_accounts::update_user_account,
        crate::handlers::user_accounts::delete_user_account,
    ),
    components(
        schemas(
            UserAccount,
            DeleteUserAccountRequest,
            HealthResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "user_accounts", description = "User account endpoints"),
    ),
    info(
        title = "User Accounts API",
        description = "List, search, count and maintain user accounts",
        version = "0.1.0",
    )
)]
pub struct ApiDoc;
