use async_trait::async_trait;
use jiff::Timestamp;
use linkpulse_core::error::StorageError;
use linkpulse_core::repository::{ReadRepository, Repository, Result};
use linkpulse_core::{NewShortLink, Owner, ShortId, ShortLink, VisitRecord};
use sqlx::mysql::{MySqlConnection, MySqlRow};
use sqlx::{Connection, MySql, MySqlPool, Row, Transaction};
use std::collections::HashMap;
use tracing::{debug, trace};

/// MySQL implementation of the repository contract.
///
/// Links live in `short_links`, visits in the append-only `link_visits`
/// table (cascade-deleted with their link). The `UNIQUE` index on
/// `short_links.short_id` is what makes inserts collision-safe, and every
/// visit is applied in a transaction that holds the link's row lock while it
/// bumps `click_count` and appends the visit row.
///
/// Reads that return visits run inside a `REPEATABLE READ` transaction, so the
/// counter and the history come from the same snapshot whatever isolation
/// level the server or session defaults to.
#[derive(Debug, Clone)]
pub struct MySqlRepository {
    pool: MySqlPool,
}

impl MySqlRepository {
    /// Creates a repository from an existing MySQL connection pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Creates a repository by opening a new MySQL connection pool.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = MySqlPool::connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Applies the embedded schema migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StorageError::Operation(format!("migration failed: {e}")))
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

fn parse_timestamp(microseconds: i64) -> Result<Timestamp> {
    Timestamp::from_microsecond(microseconds).map_err(|e| {
        StorageError::InvalidData(format!("invalid timestamp '{}': {e}", microseconds))
    })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

/// Starts a `REPEATABLE READ` transaction on `conn`.
///
/// `SET TRANSACTION` without a scope applies to the next transaction only,
/// so the pooled connection keeps its session default afterwards.
async fn begin_snapshot(conn: &mut MySqlConnection) -> Result<Transaction<'_, MySql>> {
    sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ")
        .execute(&mut *conn)
        .await
        .map_err(map_sqlx_error)?;

    conn.begin().await.map_err(map_sqlx_error)
}

fn visit_from_row(row: &MySqlRow) -> Result<VisitRecord> {
    let visited_at: i64 = row.try_get("visited_at").map_err(map_sqlx_error)?;
    let browser: String = row.try_get("browser").map_err(map_sqlx_error)?;
    let os: String = row.try_get("os").map_err(map_sqlx_error)?;
    let device: String = row.try_get("device").map_err(map_sqlx_error)?;

    Ok(VisitRecord {
        timestamp: parse_timestamp(visited_at)?,
        referrer: row.try_get("referrer").map_err(map_sqlx_error)?,
        user_agent: row.try_get("user_agent").map_err(map_sqlx_error)?,
        browser: browser.parse()?,
        os: os.parse()?,
        device: device.parse()?,
    })
}

fn link_from_row(row: &MySqlRow, visits: Vec<VisitRecord>) -> Result<ShortLink> {
    let short_id: String = row.try_get("short_id").map_err(map_sqlx_error)?;
    let owner: String = row.try_get("owner").map_err(map_sqlx_error)?;
    let created_at: i64 = row.try_get("created_at").map_err(map_sqlx_error)?;

    Ok(ShortLink {
        owner: Owner::new(owner).map_err(|e| StorageError::InvalidData(e.to_string()))?,
        long_url: row.try_get("long_url").map_err(map_sqlx_error)?,
        short_id: ShortId::new(short_id).map_err(|e| StorageError::InvalidData(e.to_string()))?,
        click_count: row.try_get("click_count").map_err(map_sqlx_error)?,
        visits,
        created_at: parse_timestamp(created_at)?,
    })
}

#[async_trait]
impl ReadRepository for MySqlRepository {
    async fn get(&self, id: &ShortId) -> Result<Option<ShortLink>> {
        let mut conn = self.pool.acquire().await.map_err(map_sqlx_error)?;
        let mut tx = begin_snapshot(&mut conn).await?;

        let row = sqlx::query(
            r#"
            SELECT id, short_id, owner, long_url, click_count, created_at
            FROM short_links
            WHERE short_id = ?
            LIMIT 1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        let Some(row) = row else {
            tx.commit().await.map_err(map_sqlx_error)?;
            return Ok(None);
        };

        let link_id: u64 = row.try_get("id").map_err(map_sqlx_error)?;
        let visits = sqlx::query(
            r#"
            SELECT visited_at, referrer, user_agent, browser, os, device
            FROM link_visits
            WHERE link_id = ?
            ORDER BY id
            "#,
        )
        .bind(link_id)
        .fetch_all(&mut *tx)
        .await
        .map_err(map_sqlx_error)?
        .iter()
        .map(visit_from_row)
        .collect::<Result<Vec<_>>>()?;

        tx.commit().await.map_err(map_sqlx_error)?;

        link_from_row(&row, visits).map(Some)
    }

    async fn exists(&self, id: &ShortId) -> Result<bool> {
        let exists = sqlx::query(
            r#"
            SELECT 1
            FROM short_links
            WHERE short_id = ?
            LIMIT 1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?
        .is_some();

        Ok(exists)
    }

    async fn list_by_owner(&self, owner: &Owner) -> Result<Vec<ShortLink>> {
        let mut conn = self.pool.acquire().await.map_err(map_sqlx_error)?;
        let mut tx = begin_snapshot(&mut conn).await?;

        let link_rows = sqlx::query(
            r#"
            SELECT id, short_id, owner, long_url, click_count, created_at
            FROM short_links
            WHERE owner = ?
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(owner.as_str())
        .fetch_all(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        let visit_rows = sqlx::query(
            r#"
            SELECT v.link_id, v.visited_at, v.referrer, v.user_agent, v.browser, v.os, v.device
            FROM link_visits v
            JOIN short_links l ON l.id = v.link_id
            WHERE l.owner = ?
            ORDER BY v.id
            "#,
        )
        .bind(owner.as_str())
        .fetch_all(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;

        let mut visits_by_link: HashMap<u64, Vec<VisitRecord>> = HashMap::new();
        for row in &visit_rows {
            let link_id: u64 = row.try_get("link_id").map_err(map_sqlx_error)?;
            visits_by_link
                .entry(link_id)
                .or_default()
                .push(visit_from_row(row)?);
        }

        link_rows
            .iter()
            .map(|row| {
                let link_id: u64 = row.try_get("id").map_err(map_sqlx_error)?;
                let visits = visits_by_link.remove(&link_id).unwrap_or_default();
                link_from_row(row, visits)
            })
            .collect()
    }
}

#[async_trait]
impl Repository for MySqlRepository {
    async fn insert(&self, id: &ShortId, link: NewShortLink) -> Result<ShortLink> {
        let result = sqlx::query(
            r#"
            INSERT INTO short_links (short_id, owner, long_url, click_count, created_at)
            VALUES (?, ?, ?, 0, ?)
            "#,
        )
        .bind(id.as_str())
        .bind(link.owner.as_str())
        .bind(&link.long_url)
        .bind(link.created_at.as_microsecond())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(link.into_link(id.clone())),
            Err(err) if is_unique_violation(&err) => Err(StorageError::Conflict(id.to_string())),
            Err(err) => Err(map_sqlx_error(err)),
        }
    }

    async fn record_visit(&self, id: &ShortId, visit: VisitRecord) -> Result<Option<String>> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let row = sqlx::query(
            r#"
            SELECT id, long_url
            FROM short_links
            WHERE short_id = ?
            FOR UPDATE
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        let Some(row) = row else {
            trace!(short_id = %id, "visit for unknown short id");
            tx.rollback().await.map_err(map_sqlx_error)?;
            return Ok(None);
        };

        let link_id: u64 = row.try_get("id").map_err(map_sqlx_error)?;
        let long_url: String = row.try_get("long_url").map_err(map_sqlx_error)?;

        sqlx::query("UPDATE short_links SET click_count = click_count + 1 WHERE id = ?")
            .bind(link_id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        sqlx::query(
            r#"
            INSERT INTO link_visits (link_id, visited_at, referrer, user_agent, browser, os, device)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(link_id)
        .bind(visit.timestamp.as_microsecond())
        .bind(&visit.referrer)
        .bind(&visit.user_agent)
        .bind(visit.browser.as_str())
        .bind(visit.os.as_str())
        .bind(visit.device.as_str())
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;
        debug!(short_id = %id, "visit recorded");

        Ok(Some(long_url))
    }

    async fn delete(&self, id: &ShortId, owner: &Owner) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM short_links
            WHERE short_id = ?
              AND owner = ?
            "#,
        )
        .bind(id.as_str())
        .bind(owner.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }
}
