//! Builds the `WHERE` predicate shared by the search and count operations.
//!
//! Each criterion becomes a [`FilterClause`] that carries its SQL fragment
//! and its bound value together, so the statement text and the positional
//! arguments cannot drift apart. Values are only ever bound, never spliced
//! into the statement.

use model::entities::user_account;
use sea_orm::{DbBackend, IdenStatic, Value};

/// How a clause compares its column with the supplied value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// `column LIKE 'value%'`. Case sensitivity follows the store's collation.
    Prefix,
    /// `column = 'value'`.
    Exact,
}

/// One criterion: a column, a comparison and the value it is bound to.
#[derive(Debug, Clone)]
pub struct FilterClause {
    column: user_account::Column,
    mode: MatchMode,
    value: String,
}

impl FilterClause {
    fn new(column: user_account::Column, mode: MatchMode, value: String) -> Self {
        Self {
            column,
            mode,
            value,
        }
    }

    fn fragment(&self, placeholder: &str) -> String {
        let operator = match self.mode {
            MatchMode::Prefix => "LIKE",
            MatchMode::Exact => "=",
        };
        format!("{} {} {}", self.column.as_str(), operator, placeholder)
    }

    fn bound_value(&self) -> Value {
        match self.mode {
            MatchMode::Prefix => Value::from(format!("{}%", self.value)),
            MatchMode::Exact => Value::from(self.value.clone()),
        }
    }
}

/// Optional search criteria for user accounts.
///
/// An empty string counts as "not supplied", so searching for a literally
/// empty value is not possible. [`UserAccountFilter::new`] is the only place
/// that rule is applied; the fields are private so every filter goes
/// through it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserAccountFilter {
    id_number_prefix: Option<String>,
    full_name_prefix: Option<String>,
    role_exact: Option<String>,
}

impl UserAccountFilter {
    /// Creates a filter from raw request values, treating empty strings as absent.
    pub fn new(
        id_number_prefix: Option<String>,
        full_name_prefix: Option<String>,
        role_exact: Option<String>,
    ) -> Self {
        Self {
            id_number_prefix: id_number_prefix.filter(|v| !v.is_empty()),
            full_name_prefix: full_name_prefix.filter(|v| !v.is_empty()),
            role_exact: role_exact.filter(|v| !v.is_empty()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.clauses().is_empty()
    }

    /// Clauses in their fixed order: `id_number`, `full_name`, `role`.
    pub fn clauses(&self) -> Vec<FilterClause> {
        let criteria = [
            (
                user_account::Column::IdNumber,
                MatchMode::Prefix,
                &self.id_number_prefix,
            ),
            (
                user_account::Column::FullName,
                MatchMode::Prefix,
                &self.full_name_prefix,
            ),
            (
                user_account::Column::Role,
                MatchMode::Exact,
                &self.role_exact,
            ),
        ];

        criteria
            .into_iter()
            .filter_map(|(column, mode, value)| {
                value
                    .as_ref()
                    .map(|v| FilterClause::new(column, mode, v.clone()))
            })
            .collect()
    }

    /// Renders the predicate with placeholders for the given backend.
    pub fn build(&self, backend: DbBackend) -> Predicate {
        let mut sql = String::from("1=1");
        let mut values = Vec::new();

        for (index, clause) in self.clauses().iter().enumerate() {
            let placeholder = match backend {
                DbBackend::Postgres => format!("${}", index + 1),
                _ => "?".to_string(),
            };
            sql.push_str(" AND ");
            sql.push_str(&clause.fragment(&placeholder));
            values.push(clause.bound_value());
        }

        Predicate { sql, values }
    }
}

/// A rendered predicate and its positional arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub sql: String,
    pub values: Vec<Value>,
}
