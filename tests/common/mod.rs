#![allow(dead_code)]

use gridcrate::{
    Datatable, DatatableSource, GridConfig, GridError, OffsetPagination, TableCatalog, join_alias,
};
use sea_orm::{
    Database, DatabaseConnection, DbErr, EntityTrait, JoinType, QuerySelect,
    RelationTrait, Schema, Select, Set, sea_query::Alias,
};
use sea_orm_migration::prelude::*;
use serde_json::{Value, json};

pub mod user {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "users")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub name: String,
        pub email: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod department {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "departments")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub name: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod employee {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "employees")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub name: String,
        pub department_id: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::department::Entity",
            from = "Column::DepartmentId",
            to = "super::department::Column::Id"
        )]
        Department,
    }

    impl Related<super::department::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Department.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(CreateTables)]
    }
}

pub struct CreateTables;

#[async_trait::async_trait]
impl MigrationName for CreateTables {
    fn name(&self) -> &'static str {
        "m20240101_000001_create_grid_tables"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateTables {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let schema = Schema::new(manager.get_database_backend());
        manager
            .create_table(schema.create_table_from_entity(user::Entity))
            .await?;
        manager
            .create_table(schema.create_table_from_entity(department::Entity))
            .await?;
        manager
            .create_table(schema.create_table_from_entity(employee::Entity))
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(employee::Entity).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(department::Entity).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(user::Entity).to_owned())
            .await?;
        Ok(())
    }
}

pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    // RUST_LOG=gridcrate=debug shows the translated requests
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let db = Database::connect("sqlite::memory:").await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

/// Users that matter for the search tests, plus 20 fillers named
/// `User 01`..`User 20` that match neither "ann" nor "jo".
pub const NAMED_USERS: [(&str, &str); 7] = [
    ("Ann Lee", "ann.lee@example.com"),
    ("Ann Jones", "aj@example.com"),
    ("Bob Stone", "bob@example.com"),
    ("Annie Cole", "johnny.c@example.com"),
    ("John Smith", "jsmith@example.com"),
    ("Renée Blanc", "renee@example.com"),
    ("Café Crème", "cafe@example.com"),
];

pub const TOTAL_USERS: u64 = 27;

pub async fn seed_users(db: &DatabaseConnection) -> Result<(), DbErr> {
    let fillers: Vec<(String, String)> = (1..=20)
        .map(|i| (format!("User {i:02}"), format!("user{i:02}@example.com")))
        .collect();
    let users = NAMED_USERS
        .iter()
        .map(|(name, email)| ((*name).to_string(), (*email).to_string()))
        .chain(fillers)
        .map(|(name, email)| user::ActiveModel {
            name: Set(name),
            email: Set(email),
            ..Default::default()
        });
    user::Entity::insert_many(users).exec(db).await?;
    Ok(())
}

/// Every user name, in the order SQLite sorts them
pub fn sorted_user_names() -> Vec<String> {
    let mut names: Vec<String> = NAMED_USERS
        .iter()
        .map(|(name, _)| (*name).to_string())
        .chain((1..=20).map(|i| format!("User {i:02}")))
        .collect();
    names.sort();
    names
}

pub async fn seed_staff(db: &DatabaseConnection) -> Result<(), DbErr> {
    department::Entity::insert_many([
        department::ActiveModel {
            id: Set(1),
            name: Set("Engineering".to_string()),
        },
        department::ActiveModel {
            id: Set(2),
            name: Set("Sales".to_string()),
        },
    ])
    .exec(db)
    .await?;

    let staff = [("Ada", 1), ("Grace", 1), ("Linus", 2)].map(|(name, department_id)| {
        employee::ActiveModel {
            name: Set(name.to_string()),
            department_id: Set(department_id),
            ..Default::default()
        }
    });
    employee::Entity::insert_many(staff).exec(db).await?;
    Ok(())
}

pub struct UserTable;

impl DatatableSource for UserTable {
    type Entity = user::Entity;
    type Row = Value;

    fn raw_records(&self) -> Select<user::Entity> {
        user::Entity::find()
    }

    fn data(&self, records: Vec<user::Model>) -> Vec<Value> {
        records
            .into_iter()
            .map(|user| json!({"name": user.name, "email": user.email}))
            .collect()
    }
}

/// Grid columns: 0 = name, 1 = email
pub fn user_table() -> Result<Datatable<UserTable, OffsetPagination>, GridError> {
    Datatable::builder()
        .source(UserTable)
        .pagination(OffsetPagination)
        .config(GridConfig::for_backend(sea_orm::DatabaseBackend::Sqlite))
        .sortable_columns(["name", "email"])
        .searchable_columns(["name", "email"])
        .build()
}

pub struct StaffTable;

impl StaffTable {
    pub fn department_alias() -> String {
        join_alias(&["department", "employee"])
    }
}

impl DatatableSource for StaffTable {
    type Entity = employee::Entity;
    type Row = Value;

    fn raw_records(&self) -> Select<employee::Entity> {
        employee::Entity::find().join_as(
            JoinType::InnerJoin,
            employee::Relation::Department.def(),
            Alias::new(Self::department_alias()),
        )
    }

    fn data(&self, records: Vec<employee::Model>) -> Vec<Value> {
        records
            .into_iter()
            .map(|employee| json!({"name": employee.name}))
            .collect()
    }
}

/// Grid columns: 0 = employee name, 1 = department name
pub fn staff_table() -> Result<Datatable<StaffTable, OffsetPagination>, GridError> {
    Datatable::builder()
        .source(StaffTable)
        .pagination(OffsetPagination)
        .config(GridConfig::for_backend(sea_orm::DatabaseBackend::Sqlite))
        .catalog(
            TableCatalog::new()
                .with_entity::<employee::Entity>()
                .with_entity::<department::Entity>(),
        )
        .sortable_column("name")
        .sortable_column(["employee", "department.name"])
        .searchable_column("name")
        .searchable_column(["employee", "department.name"])
        .build()
}

pub fn names(data: &[Value]) -> Vec<String> {
    data.iter()
        .filter_map(|row| row["name"].as_str().map(ToString::to_string))
        .collect()
}
