//! PostgreSQL store
//!
//! One `PgPool` is owned by the store and shared by every request. The
//! pool connects lazily; `init` proves connectivity on a dedicated
//! connection so an unreachable host fails startup instead of the first
//! request.
//!
//! `CREATE TABLE IF NOT EXISTS` leaves an older table alone, so `init`
//! also records the real type of `completed` and writes bind to it.

use async_trait::async_trait;
use once_cell::sync::OnceCell;
use sqlx::postgres::{PgArguments, PgConnectOptions, PgConnection, PgPoolOptions, PgRow};
use sqlx::query::Query;
use sqlx::{Connection, PgPool, Postgres, Row};

use super::TodoStore;
use crate::config::DatabaseConfig;
use crate::error::StoreError;
use crate::models::{StoredFlag, TodoItem, UpdateItemRequest};

/// Maximum connections for the shared pool.
const MAX_CONNECTIONS: u32 = 10;

const CREATE_TABLE: &str =
    "CREATE TABLE IF NOT EXISTS todo_items (id varchar(36), name varchar(255), completed boolean)";

const COMPLETED_COLUMN_TYPE: &str = r#"
    SELECT data_type::text
    FROM information_schema.columns
    WHERE table_schema = current_schema()
      AND table_name = 'todo_items'
      AND column_name = 'completed'
"#;

/// Storage type of the `completed` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlagColumn {
    Bool,
    Int2,
    Int4,
    Int8,
}

impl FlagColumn {
    fn from_data_type(data_type: &str) -> Self {
        match data_type {
            "smallint" => Self::Int2,
            "integer" => Self::Int4,
            "bigint" => Self::Int8,
            _ => Self::Bool,
        }
    }

    fn bind<'q>(
        self,
        query: Query<'q, Postgres, PgArguments>,
        completed: bool,
    ) -> Query<'q, Postgres, PgArguments> {
        let flag = i16::from(completed);
        match self {
            Self::Bool => query.bind(completed),
            Self::Int2 => query.bind(flag),
            Self::Int4 => query.bind(i32::from(flag)),
            Self::Int8 => query.bind(i64::from(flag)),
        }
    }
}

/// Store backed by the `todo_items` table.
pub struct PostgresStore {
    pool: PgPool,
    options: PgConnectOptions,
    host: String,
    flag_column: OnceCell<FlagColumn>,
}

impl PostgresStore {
    /// Build the store and its (not yet connected) pool.
    pub fn new(config: &DatabaseConfig) -> Self {
        let host = config.host().unwrap_or("localhost").to_owned();
        Self::with_options(connect_options(config), host)
    }

    fn with_options(options: PgConnectOptions, host: String) -> Self {
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_lazy_with(options.clone());

        Self {
            pool,
            options,
            host,
            flag_column: OnceCell::new(),
        }
    }

    /// Column type found by `init`; boolean until then.
    fn flag_column(&self) -> FlagColumn {
        self.flag_column.get().copied().unwrap_or(FlagColumn::Bool)
    }
}

fn connect_options(config: &DatabaseConfig) -> PgConnectOptions {
    let mut options = PgConnectOptions::new().port(config.port());

    if let Some(host) = config.host() {
        options = options.host(host);
    }
    if let Some(user) = &config.user {
        options = options.username(user);
    }
    if let Some(password) = &config.password {
        options = options.password(password);
    }
    if let Some(database) = &config.database {
        options = options.database(database);
    }

    options
}

/// Shape a row into an item, normalizing `completed` to a bool.
///
/// Columns are nullable, so missing text reads as empty and a missing
/// flag reads as not completed.
fn item_from_row(row: &PgRow) -> Result<TodoItem, sqlx::Error> {
    Ok(TodoItem {
        id: row.try_get::<Option<String>, _>("id")?.unwrap_or_default(),
        name: row.try_get::<Option<String>, _>("name")?.unwrap_or_default(),
        completed: stored_flag(row)?.is_set(),
    })
}

fn stored_flag(row: &PgRow) -> Result<StoredFlag, sqlx::Error> {
    match row.try_get::<Option<bool>, _>("completed") {
        Ok(flag) => Ok(StoredFlag::Bool(flag.unwrap_or(false))),
        Err(sqlx::Error::ColumnDecode { .. }) => {
            if let Ok(value) = row.try_get::<Option<i16>, _>("completed") {
                return Ok(StoredFlag::Int(value.map_or(0, i64::from)));
            }
            if let Ok(value) = row.try_get::<Option<i32>, _>("completed") {
                return Ok(StoredFlag::Int(value.map_or(0, i64::from)));
            }
            let value = row.try_get::<Option<i64>, _>("completed")?;
            Ok(StoredFlag::Int(value.unwrap_or(0)))
        }
        Err(err) => Err(err),
    }
}

#[async_trait]
impl TodoStore for PostgresStore {
    async fn init(&self) -> Result<(), StoreError> {
        let mut conn = PgConnection::connect_with(&self.options)
            .await
            .map_err(StoreError::Connection)?;

        sqlx::query(CREATE_TABLE)
            .execute(&mut conn)
            .await
            .map_err(StoreError::Schema)?;

        let data_type: Option<String> = sqlx::query_scalar(COMPLETED_COLUMN_TYPE)
            .fetch_optional(&mut conn)
            .await
            .map_err(StoreError::Schema)?;
        let column = data_type
            .as_deref()
            .map_or(FlagColumn::Bool, FlagColumn::from_data_type);
        if column != FlagColumn::Bool {
            tracing::info!(?column, "todo_items.completed is not boolean; binding integers");
        }
        let _ = self.flag_column.set(column);

        if let Err(err) = conn.close().await {
            tracing::debug!(error = %err, "error closing startup connection");
        }

        tracing::info!(host = %self.host, "Connected to Postgres");
        Ok(())
    }

    async fn teardown(&self) -> Result<(), StoreError> {
        if self.pool.is_closed() {
            return Ok(());
        }

        let had_connections = self.pool.size() > 0;
        self.pool.close().await;
        if had_connections {
            tracing::info!("Postgres connection pool closed");
        } else {
            tracing::debug!("Postgres connection pool closed (never used)");
        }
        Ok(())
    }

    async fn get_items(&self) -> Result<Vec<TodoItem>, StoreError> {
        let rows = sqlx::query("SELECT id, name, completed FROM todo_items")
            .fetch_all(&self.pool)
            .await?;

        let items = rows
            .iter()
            .map(item_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    async fn get_item(&self, id: &str) -> Result<Option<TodoItem>, StoreError> {
        let row = sqlx::query("SELECT id, name, completed FROM todo_items WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(item_from_row).transpose()?)
    }

    async fn store_item(&self, item: &TodoItem) -> Result<(), StoreError> {
        let query = sqlx::query("INSERT INTO todo_items (id, name, completed) VALUES ($1, $2, $3)")
            .bind(&item.id)
            .bind(&item.name);

        self.flag_column()
            .bind(query, item.completed)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn update_item(&self, id: &str, update: &UpdateItemRequest) -> Result<(), StoreError> {
        let query = sqlx::query("UPDATE todo_items SET name = $1, completed = $2 WHERE id = $3")
            .bind(&update.name);

        self.flag_column()
            .bind(query, update.completed)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn remove_item(&self, id: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM todo_items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
