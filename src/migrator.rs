use sea_orm_migration::prelude::*;

/// Schema owner for the rental operations store.
///
/// Runs against Postgres in production and SQLite in the integration suite;
/// every column type used here is supported by both backends.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_inventory_items_table::Migration),
            Box::new(m20240101_000002_create_pull_sheets_table::Migration),
            Box::new(m20240101_000003_create_pull_sheet_items_table::Migration),
            Box::new(m20240101_000004_create_scan_tables::Migration),
            Box::new(m20240101_000005_create_substitutions_table::Migration),
            Box::new(m20240101_000006_create_inventory_movements_table::Migration),
            Box::new(m20240101_000007_create_token_tables::Migration),
        ]
    }
}

mod m20240101_000001_create_inventory_items_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_inventory_items_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(InventoryItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(InventoryItems::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryItems::Barcode)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(InventoryItems::Name).string().not_null())
                        .col(ColumnDef::new(InventoryItems::Category).string().not_null())
                        .col(ColumnDef::new(InventoryItems::Location).string())
                        .col(
                            ColumnDef::new(InventoryItems::QuantityOnHand)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(InventoryItems::DailyRate).decimal())
                        .col(
                            ColumnDef::new(InventoryItems::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryItems::UpdatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_inventory_items_category")
                        .table(InventoryItems::Table)
                        .col(InventoryItems::Category)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(InventoryItems::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum InventoryItems {
        Table,
        Id,
        Barcode,
        Name,
        Category,
        Location,
        QuantityOnHand,
        DailyRate,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000002_create_pull_sheets_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_pull_sheets_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(PullSheets::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(PullSheets::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(PullSheets::JobId).uuid().not_null())
                        .col(
                            ColumnDef::new(PullSheets::Status)
                                .string_len(32)
                                .not_null(),
                        )
                        .col(ColumnDef::new(PullSheets::ScheduledOutAt).timestamp())
                        .col(ColumnDef::new(PullSheets::ExpectedReturnAt).timestamp())
                        .col(ColumnDef::new(PullSheets::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(PullSheets::UpdatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_pull_sheets_status_return")
                        .table(PullSheets::Table)
                        .col(PullSheets::Status)
                        .col(PullSheets::ExpectedReturnAt)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PullSheets::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum PullSheets {
        Table,
        Id,
        JobId,
        Status,
        ScheduledOutAt,
        ExpectedReturnAt,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000003_create_pull_sheet_items_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_pull_sheet_items_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(PullSheetItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PullSheetItems::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PullSheetItems::PullSheetId).uuid().not_null())
                        .col(
                            ColumnDef::new(PullSheetItems::InventoryItemId)
                                .uuid()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PullSheetItems::ItemName).string().not_null())
                        .col(
                            ColumnDef::new(PullSheetItems::QtyRequested)
                                .integer()
                                .not_null()
                                .default(1),
                        )
                        .col(
                            ColumnDef::new(PullSheetItems::QtyPulled)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(PullSheetItems::QtyFulfilled)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(PullSheetItems::PrepStatus)
                                .string_len(32)
                                .not_null(),
                        )
                        .col(ColumnDef::new(PullSheetItems::Notes).string())
                        .col(
                            ColumnDef::new(PullSheetItems::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PullSheetItems::UpdatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_pull_sheet_items_sheet")
                        .table(PullSheetItems::Table)
                        .col(PullSheetItems::PullSheetId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PullSheetItems::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum PullSheetItems {
        Table,
        Id,
        PullSheetId,
        InventoryItemId,
        ItemName,
        QtyRequested,
        QtyPulled,
        QtyFulfilled,
        PrepStatus,
        Notes,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000004_create_scan_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_scan_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(PullSheetItemScans::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PullSheetItemScans::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PullSheetItemScans::PullSheetItemId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PullSheetItemScans::Barcode)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PullSheetItemScans::ScanStatus)
                                .string_len(16)
                                .not_null(),
                        )
                        .col(ColumnDef::new(PullSheetItemScans::ScannedBy).string())
                        .col(
                            ColumnDef::new(PullSheetItemScans::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            // Duplicate detection path: (line, barcode, status) probed on every
            // active-pull scan.
            manager
                .create_index(
                    Index::create()
                        .name("idx_item_scans_dup_check")
                        .table(PullSheetItemScans::Table)
                        .col(PullSheetItemScans::PullSheetItemId)
                        .col(PullSheetItemScans::Barcode)
                        .col(PullSheetItemScans::ScanStatus)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(PullSheetScans::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PullSheetScans::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PullSheetScans::PullSheetId).uuid().not_null())
                        .col(ColumnDef::new(PullSheetScans::PullSheetItemId).uuid())
                        .col(
                            ColumnDef::new(PullSheetScans::InventoryItemId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PullSheetScans::ScanType)
                                .string_len(16)
                                .not_null(),
                        )
                        .col(ColumnDef::new(PullSheetScans::ScannedBy).string())
                        .col(ColumnDef::new(PullSheetScans::Notes).string())
                        .col(
                            ColumnDef::new(PullSheetScans::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_sheet_scans_sheet")
                        .table(PullSheetScans::Table)
                        .col(PullSheetScans::PullSheetId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PullSheetItemScans::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(PullSheetScans::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum PullSheetItemScans {
        Table,
        Id,
        PullSheetItemId,
        Barcode,
        ScanStatus,
        ScannedBy,
        CreatedAt,
    }

    #[derive(Iden)]
    enum PullSheetScans {
        Table,
        Id,
        PullSheetId,
        PullSheetItemId,
        InventoryItemId,
        ScanType,
        ScannedBy,
        Notes,
        CreatedAt,
    }
}

mod m20240101_000005_create_substitutions_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000005_create_substitutions_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Substitutions::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Substitutions::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Substitutions::PullSheetId).uuid().not_null())
                        .col(
                            ColumnDef::new(Substitutions::PullSheetItemId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Substitutions::OriginalItemId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Substitutions::OriginalItemName)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Substitutions::SubstituteItemId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Substitutions::SubstituteItemName)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Substitutions::Reason).string().not_null())
                        .col(
                            ColumnDef::new(Substitutions::QtyAffected)
                                .integer()
                                .not_null()
                                .default(1),
                        )
                        .col(
                            ColumnDef::new(Substitutions::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Substitutions::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum Substitutions {
        Table,
        Id,
        PullSheetId,
        PullSheetItemId,
        OriginalItemId,
        OriginalItemName,
        SubstituteItemId,
        SubstituteItemName,
        Reason,
        QtyAffected,
        CreatedAt,
    }
}

mod m20240101_000006_create_inventory_movements_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000006_create_inventory_movements_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(InventoryMovements::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(InventoryMovements::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryMovements::InventoryItemId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryMovements::MovementType)
                                .string_len(32)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryMovements::QuantityDelta)
                                .integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(InventoryMovements::Notes).string())
                        .col(
                            ColumnDef::new(InventoryMovements::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(InventoryMovements::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum InventoryMovements {
        Table,
        Id,
        InventoryItemId,
        MovementType,
        QuantityDelta,
        Notes,
        CreatedAt,
    }
}

mod m20240101_000007_create_token_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000007_create_token_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(TokenAccounts::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(TokenAccounts::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TokenAccounts::OwnerId)
                                .uuid()
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(TokenAccounts::Balance)
                                .big_integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(TokenAccounts::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TokenAccounts::UpdatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(TokenTransactions::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(TokenTransactions::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TokenTransactions::AccountId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TokenTransactions::Kind)
                                .string_len(16)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TokenTransactions::Amount)
                                .big_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(TokenTransactions::Reason).string())
                        .col(
                            ColumnDef::new(TokenTransactions::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(TokenTransactions::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(TokenAccounts::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum TokenAccounts {
        Table,
        Id,
        OwnerId,
        Balance,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(Iden)]
    enum TokenTransactions {
        Table,
        Id,
        AccountId,
        Kind,
        Amount,
        Reason,
        CreatedAt,
    }
}
