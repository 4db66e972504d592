use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string(Users::Username).unique_key())
                    .to_owned(),
            )
            .await?;

        // Create clients table
        manager
            .create_table(
                Table::create()
                    .table(Clients::Table)
                    .if_not_exists()
                    .col(pk_auto(Clients::Id))
                    .col(integer(Clients::OwnerId))
                    .col(string(Clients::Name))
                    .col(string_null(Clients::Email))
                    .col(string_null(Clients::Phone))
                    .col(string_null(Clients::Notes))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_client_owner")
                            .from(Clients::Table, Clients::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create service_orders table
        manager
            .create_table(
                Table::create()
                    .table(ServiceOrders::Table)
                    .if_not_exists()
                    .col(pk_auto(ServiceOrders::Id))
                    .col(integer(ServiceOrders::OwnerId))
                    .col(integer_null(ServiceOrders::ClientId))
                    .col(string(ServiceOrders::Description))
                    .col(decimal(ServiceOrders::Value).decimal_len(16, 4))
                    .col(date(ServiceOrders::ExecutionDate))
                    .col(string(ServiceOrders::Status))
                    .col(boolean(ServiceOrders::Settled).default(false))
                    .col(date_null(ServiceOrders::SettlementDate))
                    .col(decimal_null(ServiceOrders::PaidAmount).decimal_len(16, 4))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_order_owner")
                            .from(ServiceOrders::Table, ServiceOrders::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_order_client")
                            .from(ServiceOrders::Table, ServiceOrders::ClientId)
                            .to(Clients::Table, Clients::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create contracts table
        manager
            .create_table(
                Table::create()
                    .table(Contracts::Table)
                    .if_not_exists()
                    .col(pk_auto(Contracts::Id))
                    .col(integer(Contracts::OwnerId))
                    .col(integer(Contracts::ClientId))
                    .col(string_null(Contracts::Description))
                    .col(decimal(Contracts::TotalValue).decimal_len(16, 4))
                    .col(integer(Contracts::InstallmentCount))
                    .col(decimal(Contracts::InstallmentValue).decimal_len(16, 4))
                    .col(integer(Contracts::DueDay))
                    .col(date(Contracts::StartDate))
                    .col(date_null(Contracts::EndDate))
                    .col(string(Contracts::Status))
                    .col(string_null(Contracts::Notes))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contract_owner")
                            .from(Contracts::Table, Contracts::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contract_client")
                            .from(Contracts::Table, Contracts::ClientId)
                            .to(Clients::Table, Clients::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create installments table
        manager
            .create_table(
                Table::create()
                    .table(Installments::Table)
                    .if_not_exists()
                    .col(pk_auto(Installments::Id))
                    .col(integer(Installments::OwnerId))
                    .col(integer_null(Installments::ContractId))
                    .col(integer(Installments::SequenceNumber))
                    .col(decimal(Installments::Amount).decimal_len(16, 4))
                    .col(date(Installments::DueDate))
                    .col(string(Installments::Status))
                    .col(date_null(Installments::PaymentDate))
                    .col(decimal_null(Installments::PaidAmount).decimal_len(16, 4))
                    .col(string_null(Installments::PaymentMethod))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_installment_owner")
                            .from(Installments::Table, Installments::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_installment_contract")
                            .from(Installments::Table, Installments::ContractId)
                            .to(Contracts::Table, Contracts::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One sequence number per contract
        manager
            .create_index(
                Index::create()
                    .name("idx_installment_contract_sequence")
                    .table(Installments::Table)
                    .col(Installments::ContractId)
                    .col(Installments::SequenceNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create categories table
        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(pk_auto(Categories::Id))
                    .col(integer(Categories::OwnerId))
                    .col(string(Categories::Name))
                    .col(string(Categories::Color))
                    .col(string(Categories::Kind))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_category_owner")
                            .from(Categories::Table, Categories::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create ledger_entries table
        manager
            .create_table(
                Table::create()
                    .table(LedgerEntries::Table)
                    .if_not_exists()
                    .col(pk_auto(LedgerEntries::Id))
                    .col(integer(LedgerEntries::OwnerId))
                    .col(string(LedgerEntries::Kind))
                    .col(integer_null(LedgerEntries::CategoryId))
                    .col(string(LedgerEntries::Description))
                    .col(decimal(LedgerEntries::Amount).decimal_len(16, 4))
                    .col(date(LedgerEntries::EntryDate))
                    .col(string(LedgerEntries::Status))
                    .col(date_null(LedgerEntries::PaymentDate))
                    .col(string_null(LedgerEntries::PaymentMethod))
                    .col(string(LedgerEntries::Origin))
                    .col(integer_null(LedgerEntries::ReferenceId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ledger_entry_owner")
                            .from(LedgerEntries::Table, LedgerEntries::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ledger_entry_category")
                            .from(LedgerEntries::Table, LedgerEntries::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create profit_goals table
        manager
            .create_table(
                Table::create()
                    .table(ProfitGoals::Table)
                    .if_not_exists()
                    .col(pk_auto(ProfitGoals::Id))
                    .col(integer(ProfitGoals::OwnerId))
                    .col(integer(ProfitGoals::Year))
                    .col(integer(ProfitGoals::Month))
                    .col(decimal(ProfitGoals::TargetValue).decimal_len(16, 4))
                    .col(string_null(ProfitGoals::Notes))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_profit_goal_owner")
                            .from(ProfitGoals::Table, ProfitGoals::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One goal per owner per calendar month
        manager
            .create_index(
                Index::create()
                    .name("idx_profit_goal_owner_month")
                    .table(ProfitGoals::Table)
                    .col(ProfitGoals::OwnerId)
                    .col(ProfitGoals::Year)
                    .col(ProfitGoals::Month)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProfitGoals::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LedgerEntries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Installments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Contracts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ServiceOrders::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Clients::Table).to_owned())
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
    Username,
}

#[derive(DeriveIden)]
enum Clients {
    Table,
    Id,
    OwnerId,
    Name,
    Email,
    Phone,
    Notes,
}

#[derive(DeriveIden)]
enum ServiceOrders {
    Table,
    Id,
    OwnerId,
    ClientId,
    Description,
    Value,
    ExecutionDate,
    Status,
    Settled,
    SettlementDate,
    PaidAmount,
}

#[derive(DeriveIden)]
enum Contracts {
    Table,
    Id,
    OwnerId,
    ClientId,
    Description,
    TotalValue,
    InstallmentCount,
    InstallmentValue,
    DueDay,
    StartDate,
    EndDate,
    Status,
    Notes,
}

#[derive(DeriveIden)]
enum Installments {
    Table,
    Id,
    OwnerId,
    ContractId,
    SequenceNumber,
    Amount,
    DueDate,
    Status,
    PaymentDate,
    PaidAmount,
    PaymentMethod,
}

#[derive(DeriveIden)]
enum Categories {
    Table,
    Id,
    OwnerId,
    Name,
    Color,
    Kind,
}

#[derive(DeriveIden)]
enum LedgerEntries {
    Table,
    Id,
    OwnerId,
    Kind,
    CategoryId,
    Description,
    Amount,
    EntryDate,
    Status,
    PaymentDate,
    PaymentMethod,
    Origin,
    ReferenceId,
}

#[derive(DeriveIden)]
enum ProfitGoals {
    Table,
    Id,
    OwnerId,
    Year,
    Month,
    TargetValue,
    Notes,
}
