use crate::models::PropertyRecord;
use crate::scrapers::TableShape;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::mysql::MySqlConnectOptions;
use sqlx::{ConnectOptions, Connection};
use tracing::{debug, warn};

/// Destination for finished records
#[async_trait]
pub trait RecordSink: Send + Sync {
    async fn insert(&self, record: &PropertyRecord) -> Result<()>;
}

/// Writes each record with its own short-lived MySQL connection
pub struct MySqlSink {
    options: MySqlConnectOptions,
    table: TableShape,
    sql: String,
}

impl MySqlSink {
    pub fn new(options: MySqlConnectOptions, table: TableShape) -> Self {
        let sql = table.insert_sql();
        Self {
            options,
            table,
            sql,
        }
    }
}

#[async_trait]
impl RecordSink for MySqlSink {
    async fn insert(&self, record: &PropertyRecord) -> Result<()> {
        let row = record.to_row();

        let mut conn = self
            .options
            .connect()
            .await
            .context("Failed to connect to MySQL")?;

        let mut query = sqlx::query(&self.sql)
            .bind(&row.title)
            .bind(&row.price)
            .bind(&row.address)
            .bind(&row.key_features)
            .bind(&row.description)
            .bind(&row.images)
            .bind(&row.price_per_month)
            .bind(&row.price_per_week)
            .bind(&row.right_image_url)
            .bind(row.latitude)
            .bind(row.longitude);
        if self.table.with_country {
            query = query.bind(row.country);
        }

        let result = query.execute(&mut conn).await;
        let done = settle_insert(result, conn.close().await, self.table.name)?;

        debug!(
            "Inserted {} row(s) into {} for {}",
            done.rows_affected(),
            self.table.name,
            record.source_url
        );
        Ok(())
    }
}

/// Outcome of an insert once its connection is closed. Only the insert
/// decides success: a row that was written stays reported as written even
/// if closing the connection afterwards fails.
fn settle_insert<T>(
    insert: Result<T, sqlx::Error>,
    close: Result<(), sqlx::Error>,
    table: &str,
) -> Result<T> {
    if let Err(e) = close {
        warn!("Failed to close MySQL connection: {}", e);
    }
    insert.with_context(|| format!("Failed to insert record into {}", table))
}
