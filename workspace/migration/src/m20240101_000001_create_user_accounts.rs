use crate::entity_iden::EntityIden;
use model::entities::prelude::*;
use model::entities::user_account;
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserAccount::table())
                    .if_not_exists()
                    .col(
                        big_integer(UserAccount::column(user_account::Column::Id))
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(string(UserAccount::column(user_account::Column::IdNumber)))
                    .col(string(UserAccount::column(user_account::Column::FullName)))
                    .col(string(UserAccount::column(user_account::Column::Username)))
                    .col(string(UserAccount::column(user_account::Column::Password)))
                    .col(string(UserAccount::column(user_account::Column::Section)))
                    .col(string(UserAccount::column(user_account::Column::Role)))
                    .to_owned(),
            )
            .await?;

        // Search filters on these columns
        manager
            .create_index(
                Index::create()
                    .name("idx_user_accounts_id_number")
                    .table(UserAccount::table())
                    .col(UserAccount::column(user_account::Column::IdNumber))
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_user_accounts_role")
                    .table(UserAccount::table())
                    .col(UserAccount::column(user_account::Column::Role))
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserAccount::table()).to_owned())
            .await
    }
}
