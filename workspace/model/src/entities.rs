//! SeaORM entity modules for the user account store.
//!
//! The service manages a single table, so there are no relations to declare.

pub mod user_account;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::user_account::Entity as UserAccount;
}

#[cfg(test)]
mod test {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{
        ActiveModelTrait, ColumnTrait, Database, DatabaseConnection, DbErr, EntityTrait,
        PaginatorTrait, QueryFilter, Set,
    };

    use super::*;
    use prelude::*;

    async fn setup_db() -> Result<DatabaseConnection, DbErr> {
        let db = Database::connect("sqlite::memory:").await?;
        Migrator::up(&db, None).await.expect("Migrations failed.");
        Ok(db)
    }

    fn account(id_number: &str, full_name: &str, role: &str) -> user_account::ActiveModel {
        user_account::ActiveModel {
            id_number: Set(id_number.to_string()),
            full_name: Set(full_name.to_string()),
            username: Set(full_name.to_lowercase().replace(' ', ".")),
            password: Set("secret".to_string()),
            section: Set("S1".to_string()),
            role: Set(role.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_entity_integration() -> Result<(), DbErr> {
        let db = setup_db().await?;

        let first = account("A1", "Jane Doe", "admin").insert(&db).await?;
        let second = account("B2", "John Roe", "clerk").insert(&db).await?;

        // Identities are assigned by the store
        assert!(first.id > 0);
        assert_ne!(first.id, second.id);

        let all = UserAccount::find().all(&db).await?;
        assert_eq!(all.len(), 2);
        assert!(all.iter().any(|a| a.full_name == "Jane Doe"));

        let admins = UserAccount::find()
            .filter(user_account::Column::Role.eq("admin"))
            .count(&db)
            .await?;
        assert_eq!(admins, 1);

        let fetched = UserAccount::find_by_id(second.id).one(&db).await?;
        assert_eq!(fetched, Some(second));

        Ok(())
    }

    #[tokio::test]
    async fn test_empty_strings_are_stored() -> Result<(), DbErr> {
        let db = setup_db().await?;

        let blank = account("", "", "").insert(&db).await?;
        let stored = UserAccount::find_by_id(blank.id)
            .one(&db)
            .await?
            .expect("row should exist");

        assert_eq!(stored.id_number, "");
        assert_eq!(stored.role, "");
        Ok(())
    }
}
