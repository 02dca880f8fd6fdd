//! Initial schema: users, accounts, expense categories, incomes, expenses,
//! transfers, and the append-only postings ledger.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::FirstName).string().not_null())
                    .col(ColumnDef::new(Users::LastName).string().not_null())
                    .col(ColumnDef::new(Users::Salt).string().not_null())
                    .col(ColumnDef::new(Users::Hash).string().not_null())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .col(
                        ColumnDef::new(Accounts::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Accounts::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Accounts::Name).string().not_null())
                    .col(ColumnDef::new(Accounts::Kind).string().not_null())
                    .col(ColumnDef::new(Accounts::State).string().not_null())
                    .col(
                        ColumnDef::new(Accounts::InitialAmount)
                            .decimal_len(16, 4)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Accounts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_accounts_user")
                            .from(Accounts::Table, Accounts::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ExpenseCategories::Table)
                    .col(
                        ColumnDef::new(ExpenseCategories::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ExpenseCategories::Name).string().not_null())
                    .col(ColumnDef::new(ExpenseCategories::ParentId).big_integer())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_expense_categories_parent")
                            .from(ExpenseCategories::Table, ExpenseCategories::ParentId)
                            .to(ExpenseCategories::Table, ExpenseCategories::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Incomes::Table)
                    .col(
                        ColumnDef::new(Incomes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Incomes::AccountId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Incomes::Amount)
                            .decimal_len(16, 4)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Incomes::Date).date().not_null())
                    .col(ColumnDef::new(Incomes::Source).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_incomes_account")
                            .from(Incomes::Table, Incomes::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Expenses::Table)
                    .col(
                        ColumnDef::new(Expenses::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Expenses::AccountId).big_integer().not_null())
                    .col(ColumnDef::new(Expenses::CategoryId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Expenses::Amount)
                            .decimal_len(16, 4)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Expenses::Date).date().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_expenses_account")
                            .from(Expenses::Table, Expenses::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_expenses_category")
                            .from(Expenses::Table, Expenses::CategoryId)
                            .to(ExpenseCategories::Table, ExpenseCategories::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Transfers::Table)
                    .col(
                        ColumnDef::new(Transfers::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Transfers::FromAccountId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transfers::ToAccountId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transfers::Amount)
                            .decimal_len(16, 4)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transfers::Date).date().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transfers_from_account")
                            .from(Transfers::Table, Transfers::FromAccountId)
                            .to(Accounts::Table, Accounts::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transfers_to_account")
                            .from(Transfers::Table, Transfers::ToAccountId)
                            .to(Accounts::Table, Accounts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Postings::Table)
                    .col(
                        ColumnDef::new(Postings::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Postings::AccountId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Postings::Debit)
                            .decimal_len(16, 4)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Postings::Credit)
                            .decimal_len(16, 4)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Postings::Balance)
                            .decimal_len(16, 4)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Postings::Description).string().not_null())
                    .col(
                        ColumnDef::new(Postings::Date)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_postings_account")
                            .from(Postings::Table, Postings::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Balance reads scan "latest posting per account" constantly.
        manager
            .create_index(
                Index::create()
                    .name("idx_postings_account_identity")
                    .table(Postings::Table)
                    .col(Postings::AccountId)
                    .col(Postings::Id)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_accounts_user")
                    .table(Accounts::Table)
                    .col(Accounts::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Postings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Transfers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Expenses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Incomes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ExpenseCategories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Role,
    Email,
    FirstName,
    LastName,
    Salt,
    Hash,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Accounts {
    Table,
    Id,
    UserId,
    Name,
    Kind,
    State,
    InitialAmount,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ExpenseCategories {
    Table,
    Id,
    Name,
    ParentId,
}

#[derive(DeriveIden)]
enum Incomes {
    Table,
    Id,
    AccountId,
    Amount,
    Date,
    Source,
}

#[derive(DeriveIden)]
enum Expenses {
    Table,
    Id,
    AccountId,
    CategoryId,
    Amount,
    Date,
}

#[derive(DeriveIden)]
enum Transfers {
    Table,
    Id,
    FromAccountId,
    ToAccountId,
    Amount,
    Date,
}

#[derive(DeriveIden)]
enum Postings {
    Table,
    Id,
    AccountId,
    Debit,
    Credit,
    Balance,
    Description,
    Date,
}
