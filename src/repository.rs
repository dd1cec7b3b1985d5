use crate::filter::UserAccountFilter;
use crate::store::StoreError;
use model::entities::user_account;
use sea_orm::{
    ActiveValue::{NotSet, Set},
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityName, EntityTrait, IdenStatic,
    Iterable, QueryFilter, Statement,
};
use tracing::{debug, instrument, trace};

/// Result of an update or delete. Touching no rows is a normal outcome
/// (stale id, nothing to change), not a store failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Applied(u64),
    NoRowsAffected,
}

impl WriteOutcome {
    fn from_rows(rows: u64) -> Self {
        if rows == 0 {
            WriteOutcome::NoRowsAffected
        } else {
            WriteOutcome::Applied(rows)
        }
    }

    pub fn rows_affected(&self) -> u64 {
        match self {
            WriteOutcome::Applied(rows) => *rows,
            WriteOutcome::NoRowsAffected => 0,
        }
    }
}

/// Result of an insert, carrying the identity the store assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted(i64),
    NoRowsAffected,
}

impl InsertOutcome {
    pub fn rows_affected(&self) -> u64 {
        match self {
            InsertOutcome::Inserted(_) => 1,
            InsertOutcome::NoRowsAffected => 0,
        }
    }
}

/// Data access for user accounts over one store connection.
///
/// Every call goes to the store; nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct UserAccountRepository {
    db: DatabaseConnection,
}

impl UserAccountRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// All accounts in whatever order the store returns them.
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<user_account::Model>, StoreError> {
        let accounts = user_account::Entity::find()
            .all(&self.db)
            .await
            .map_err(StoreError::operation("list_all"))?;
        debug!("Listed {} user accounts", accounts.len());
        Ok(accounts)
    }

    /// Accounts matching every supplied criterion.
    #[instrument(skip(self))]
    pub async fn search(
        &self,
        filter: &UserAccountFilter,
    ) -> Result<Vec<user_account::Model>, StoreError> {
        let statement = self.filtered_statement(&select_columns(), filter);
        trace!("Search statement: {}", statement.sql);

        let accounts = user_account::Entity::find()
            .from_raw_sql(statement)
            .all(&self.db)
            .await
            .map_err(StoreError::operation("search"))?;
        debug!("Search matched {} user accounts", accounts.len());
        Ok(accounts)
    }

    /// Number of accounts matching every supplied criterion.
    #[instrument(skip(self))]
    pub async fn count(&self, filter: &UserAccountFilter) -> Result<i64, StoreError> {
        let statement = self.filtered_statement("COUNT(*) AS total", filter);
        trace!("Count statement: {}", statement.sql);

        let row = self
            .db
            .query_one(statement)
            .await
            .map_err(StoreError::operation("count"))?;

        match row {
            Some(row) => row
                .try_get::<i64>("", "total")
                .map_err(StoreError::operation("count")),
            None => Ok(0),
        }
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: i64) -> Result<user_account::Model, StoreError> {
        user_account::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(StoreError::operation("get_by_id"))?
            .ok_or(StoreError::NotFound(id))
    }

    /// Inserts a new account. The `id` of the given record is ignored.
    #[instrument(skip(self, account), fields(id_number = %account.id_number))]
    pub async fn insert(&self, account: &user_account::Model) -> Result<InsertOutcome, StoreError> {
        match user_account::Entity::insert(writable_fields(account))
            .exec(&self.db)
            .await
        {
            Ok(result) => {
                debug!("Inserted user account {}", result.last_insert_id);
                Ok(InsertOutcome::Inserted(result.last_insert_id))
            }
            Err(DbErr::RecordNotInserted) => Ok(InsertOutcome::NoRowsAffected),
            Err(e) => Err(StoreError::operation("insert")(e)),
        }
    }

    /// Overwrites every field except `id` on the account with the given `id`.
    #[instrument(skip(self, account), fields(id = account.id))]
    pub async fn update(&self, account: &user_account::Model) -> Result<WriteOutcome, StoreError> {
        let result = user_account::Entity::update_many()
            .set(writable_fields(account))
            .filter(user_account::Column::Id.eq(account.id))
            .exec(&self.db)
            .await
            .map_err(StoreError::operation("update"))?;
        debug!("Update touched {} rows", result.rows_affected);
        Ok(WriteOutcome::from_rows(result.rows_affected))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<WriteOutcome, StoreError> {
        let result = user_account::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(StoreError::operation("delete"))?;
        debug!("Delete touched {} rows", result.rows_affected);
        Ok(WriteOutcome::from_rows(result.rows_affected))
    }

    fn filtered_statement(&self, projection: &str, filter: &UserAccountFilter) -> Statement {
        let backend = self.db.get_database_backend();
        let predicate = filter.build(backend);
        let sql = format!(
            "SELECT {} FROM {} WHERE {}",
            projection,
            user_account::Entity.table_name(),
            predicate.sql
        );
        Statement::from_sql_and_values(backend, sql, predicate.values)
    }
}

fn select_columns() -> String {
    user_account::Column::iter()
        .map(|column| column.as_str().to_owned())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Active model with every column but the key set.
fn writable_fields(account: &user_account::Model) -> user_account::ActiveModel {
    user_account::ActiveModel {
        id: NotSet,
        id_number: Set(account.id_number.clone()),
        full_name: Set(account.full_name.clone()),
        username: Set(account.username.clone()),
        password: Set(account.password.clone()),
        section: Set(account.section.clone()),
        role: Set(account.role.clone()),
    }
}
