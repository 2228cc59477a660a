use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250901_000001_create_users_table::Migration),
            Box::new(m20250901_000002_create_cylinders_table::Migration),
            Box::new(m20250901_000003_create_orders_table::Migration),
            Box::new(m20250901_000004_create_safety_records_table::Migration),
            Box::new(m20250901_000005_create_announcements_table::Migration),
            Box::new(m20250901_000006_create_ratings_table::Migration),
        ]
    }
}

// Migration implementations

mod m20250901_000001_create_users_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250901_000001_create_users_table"
        }
    }

    pub(super) fn table() -> TableCreateStatement {
        Table::create()
            .table(Users::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Users::Id)
                    .big_integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(
                ColumnDef::new(Users::Username)
                    .string_len(64)
                    .not_null()
                    .unique_key(),
            )
            .col(ColumnDef::new(Users::Role).string_len(32).not_null())
            .col(ColumnDef::new(Users::Phone).string_len(32).null())
            .col(ColumnDef::new(Users::RealName).string_len(64).null())
            .col(ColumnDef::new(Users::StationId).big_integer().null())
            .col(
                ColumnDef::new(Users::CreatedAt)
                    .timestamp_with_time_zone()
                    .not_null(),
            )
            .col(
                ColumnDef::new(Users::UpdatedAt)
                    .timestamp_with_time_zone()
                    .not_null(),
            )
            .to_owned()
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager.create_table(table()).await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_users_role")
                        .table(Users::Table)
                        .col(Users::Role)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Users {
        Table,
        Id,
        Username,
        Role,
        Phone,
        RealName,
        StationId,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250901_000002_create_cylinders_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250901_000002_create_cylinders_table"
        }
    }

    pub(super) fn table() -> TableCreateStatement {
        Table::create()
            .table(Cylinders::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Cylinders::Id)
                    .big_integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(
                ColumnDef::new(Cylinders::SerialCode)
                    .string_len(64)
                    .not_null()
                    .unique_key(),
            )
            .col(ColumnDef::new(Cylinders::Specs).string_len(32).not_null())
            .col(ColumnDef::new(Cylinders::Status).string_len(32).not_null())
            .col(
                ColumnDef::new(Cylinders::Manufacturer)
                    .string_len(128)
                    .null(),
            )
            .col(ColumnDef::new(Cylinders::ManufactureDate).date().null())
            .col(ColumnDef::new(Cylinders::ExpiryDate).date().null())
            .col(ColumnDef::new(Cylinders::LastCheckDate).date().null())
            .col(ColumnDef::new(Cylinders::StationId).big_integer().null())
            .col(
                ColumnDef::new(Cylinders::CreatedAt)
                    .timestamp_with_time_zone()
                    .not_null(),
            )
            .col(
                ColumnDef::new(Cylinders::UpdatedAt)
                    .timestamp_with_time_zone()
                    .not_null(),
            )
            .to_owned()
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager.create_table(table()).await?;

            // The allocator filters by (specs, status) and scans ascending id.
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_cylinders_specs_status")
                        .table(Cylinders::Table)
                        .col(Cylinders::Specs)
                        .col(Cylinders::Status)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_cylinders_status")
                        .table(Cylinders::Table)
                        .col(Cylinders::Status)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Cylinders::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Cylinders {
        Table,
        Id,
        SerialCode,
        Specs,
        Status,
        Manufacturer,
        ManufactureDate,
        ExpiryDate,
        LastCheckDate,
        StationId,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250901_000003_create_orders_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250901_000003_create_orders_table"
        }
    }

    pub(super) fn table() -> TableCreateStatement {
        Table::create()
            .table(Orders::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Orders::Id)
                    .big_integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(
                ColumnDef::new(Orders::OrderNo)
                    .string_len(64)
                    .not_null()
                    .unique_key(),
            )
            .col(ColumnDef::new(Orders::CustomerId).big_integer().not_null())
            .col(ColumnDef::new(Orders::CourierId).big_integer().null())
            .col(ColumnDef::new(Orders::Specs).string_len(32).not_null())
            .col(ColumnDef::new(Orders::Quantity).integer().not_null())
            .col(
                ColumnDef::new(Orders::UnitPrice)
                    .decimal_len(10, 2)
                    .not_null(),
            )
            .col(
                ColumnDef::new(Orders::TotalAmount)
                    .decimal_len(10, 2)
                    .not_null(),
            )
            .col(ColumnDef::new(Orders::Address).string_len(255).not_null())
            .col(
                ColumnDef::new(Orders::ContactName)
                    .string_len(64)
                    .not_null(),
            )
            .col(
                ColumnDef::new(Orders::ContactPhone)
                    .string_len(32)
                    .not_null(),
            )
            .col(ColumnDef::new(Orders::Remark).string_len(255).null())
            .col(ColumnDef::new(Orders::Status).string_len(32).not_null())
            .col(
                ColumnDef::new(Orders::CreatedAt)
                    .timestamp_with_time_zone()
                    .not_null(),
            )
            .col(
                ColumnDef::new(Orders::AssignedAt)
                    .timestamp_with_time_zone()
                    .null(),
            )
            .col(
                ColumnDef::new(Orders::CompletedAt)
                    .timestamp_with_time_zone()
                    .null(),
            )
            .col(
                ColumnDef::new(Orders::UpdatedAt)
                    .timestamp_with_time_zone()
                    .not_null(),
            )
            .to_owned()
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager.create_table(table()).await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_orders_customer_id")
                        .table(Orders::Table)
                        .col(Orders::CustomerId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_orders_courier_id")
                        .table(Orders::Table)
                        .col(Orders::CourierId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_orders_status")
                        .table(Orders::Table)
                        .col(Orders::Status)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_orders_created_at")
                        .table(Orders::Table)
                        .col(Orders::CreatedAt)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Orders::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Orders {
        Table,
        Id,
        OrderNo,
        CustomerId,
        CourierId,
        Specs,
        Quantity,
        UnitPrice,
        TotalAmount,
        Address,
        ContactName,
        ContactPhone,
        Remark,
        Status,
        CreatedAt,
        AssignedAt,
        CompletedAt,
        UpdatedAt,
    }
}

mod m20250901_000004_create_safety_records_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250901_000004_create_safety_records_table"
        }
    }

    pub(super) fn table() -> TableCreateStatement {
        Table::create()
            .table(SafetyRecords::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(SafetyRecords::Id)
                    .big_integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(
                ColumnDef::new(SafetyRecords::OrderId)
                    .big_integer()
                    .not_null(),
            )
            .col(
                ColumnDef::new(SafetyRecords::InspectorId)
                    .big_integer()
                    .not_null(),
            )
            .col(ColumnDef::new(SafetyRecords::CheckItems).json().null())
            .col(
                ColumnDef::new(SafetyRecords::HazardLevel)
                    .string_len(32)
                    .not_null(),
            )
            .col(
                ColumnDef::new(SafetyRecords::HazardDescription)
                    .text()
                    .null(),
            )
            .col(ColumnDef::new(SafetyRecords::Photos).json().null())
            .col(
                ColumnDef::new(SafetyRecords::RectifyStatus)
                    .string_len(32)
                    .null(),
            )
            .col(ColumnDef::new(SafetyRecords::RectifyPhotos).json().null())
            .col(
                ColumnDef::new(SafetyRecords::CreatedAt)
                    .timestamp_with_time_zone()
                    .not_null(),
            )
            .to_owned()
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager.create_table(table()).await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_safety_records_order_id")
                        .table(SafetyRecords::Table)
                        .col(SafetyRecords::OrderId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_safety_records_inspector_id")
                        .table(SafetyRecords::Table)
                        .col(SafetyRecords::InspectorId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_safety_records_hazard_level")
                        .table(SafetyRecords::Table)
                        .col(SafetyRecords::HazardLevel)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(SafetyRecords::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum SafetyRecords {
        Table,
        Id,
        OrderId,
        InspectorId,
        CheckItems,
        HazardLevel,
        HazardDescription,
        Photos,
        RectifyStatus,
        RectifyPhotos,
        CreatedAt,
    }
}

mod m20250901_000005_create_announcements_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250901_000005_create_announcements_table"
        }
    }

    pub(super) fn table() -> TableCreateStatement {
        Table::create()
            .table(Announcements::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Announcements::Id)
                    .big_integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(
                ColumnDef::new(Announcements::Title)
                    .string_len(128)
                    .not_null(),
            )
            .col(ColumnDef::new(Announcements::Content).text().not_null())
            .col(
                ColumnDef::new(Announcements::AuthorId)
                    .big_integer()
                    .not_null(),
            )
            .col(
                ColumnDef::new(Announcements::IsTop)
                    .boolean()
                    .not_null()
                    .default(false),
            )
            .col(
                ColumnDef::new(Announcements::CreatedAt)
                    .timestamp_with_time_zone()
                    .not_null(),
            )
            .col(
                ColumnDef::new(Announcements::UpdatedAt)
                    .timestamp_with_time_zone()
                    .not_null(),
            )
            .to_owned()
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager.create_table(table()).await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Announcements::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Announcements {
        Table,
        Id,
        Title,
        Content,
        AuthorId,
        IsTop,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250901_000006_create_ratings_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250901_000006_create_ratings_table"
        }
    }

    pub(super) fn table() -> TableCreateStatement {
        Table::create()
            .table(Ratings::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Ratings::Id)
                    .big_integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(
                ColumnDef::new(Ratings::OrderId)
                    .big_integer()
                    .not_null()
                    .unique_key(),
            )
            .col(ColumnDef::new(Ratings::CustomerId).big_integer().not_null())
            .col(ColumnDef::new(Ratings::Score).small_integer().not_null())
            .col(ColumnDef::new(Ratings::Comment).text().null())
            .col(
                ColumnDef::new(Ratings::CreatedAt)
                    .timestamp_with_time_zone()
                    .not_null(),
            )
            .to_owned()
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager.create_table(table()).await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Ratings::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Ratings {
        Table,
        Id,
        OrderId,
        CustomerId,
        Score,
        Comment,
        CreatedAt,
    }
}
