//! SQLite repository adapter.
#![allow(clippy::collapsible_if)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{FromRow, SqlitePool};
use std::str::FromStr;

use gateway_types::{
    CardNumber, CardRegistry, NewPayment, Payment, PaymentId, PaymentRepository, PaymentStatus,
    RepoError, Transition, TransitionOutcome,
};

use crate::types::text::{format_timestamp, parse_decimal, parse_timestamp};
use crate::types::{db_err, parse_status};

// ─────────────────────────────────────────────────────────────────────────────
// Row types
// ─────────────────────────────────────────────────────────────────────────────

/// Payment row from database.
#[derive(FromRow)]
struct PaymentRow {
    id: i64,
    total: String,
    interest_rate: String,
    installments: i32,
    card: String,
    cvv: String,
    status: i64,
    created_at: String,
}

impl PaymentRow {
    fn into_domain(self) -> Result<Payment, RepoError> {
        Ok(Payment {
            id: PaymentId::new(self.id),
            total: parse_decimal(&self.total)?,
            interest_rate: parse_decimal(&self.interest_rate)?,
            installments: self.installments,
            card: CardNumber::normalize(&self.card),
            cvv: self.cvv,
            status: parse_status(self.status)?,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// SQLite Repository
// ─────────────────────────────────────────────────────────────────────────────

/// SQLite repository implementation.
pub struct SqliteRepo {
    pool: SqlitePool,
}

impl SqliteRepo {
    /// Creates a new SQLite repository and ensures the schema exists.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        // Ensure on-disk SQLite target directory exists (no-op for in-memory).
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            // Remove query parameters
            let path = path.split('?').next().unwrap_or(path);
            if path != ":memory:" {
                let p = std::path::Path::new(path);
                if let Some(parent) = p.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        // An in-memory database lives exactly as long as its connection.
        let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
        };
        let pool = pool_options.connect_with(options).await?;

        let repo = Self { pool };
        repo.create_schema().await?;
        Ok(repo)
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Creates the database schema if it does not exist yet.
    pub async fn create_schema(&self) -> Result<(), RepoError> {
        let ddl = include_str!("../migrations/0001_create_tables.sql");
        sqlx::query(ddl).execute(&self.pool).await.map_err(db_err)?;
        Ok(())
    }

    /// Registers a card, or moves the expiry of an existing one.
    pub async fn register_card(
        &self,
        card: &CardNumber,
        expires_at: DateTime<Utc>,
    ) -> Result<(), RepoError> {
        sqlx::query(
            r#"INSERT INTO cards (number, expires_at) VALUES (?, ?)
               ON CONFLICT(number) DO UPDATE SET expires_at = excluded.expires_at"#,
        )
        .bind(card.as_str())
        .bind(format_timestamp(expires_at))
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Port implementations
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl CardRegistry for SqliteRepo {
    async fn is_admissible(
        &self,
        card: &CardNumber,
        now: DateTime<Utc>,
    ) -> Result<bool, RepoError> {
        let count: i64 =
            sqlx::query_scalar(r#"SELECT COUNT(*) FROM cards WHERE number = ? AND expires_at > ?"#)
                .bind(card.as_str())
                .bind(format_timestamp(now))
                .fetch_one(&self.pool)
                .await
                .map_err(db_err)?;

        Ok(count > 0)
    }
}

#[async_trait]
impl PaymentRepository for SqliteRepo {
    async fn insert_payment(&self, payment: NewPayment) -> Result<PaymentId, RepoError> {
        let now = format_timestamp(Utc::now());

        let result = sqlx::query(
            r#"INSERT INTO payments (total, interest_rate, installments, card, cvv, status, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(payment.total.to_string())
        .bind(payment.interest_rate.to_string())
        .bind(payment.installments)
        .bind(payment.card.as_str())
        .bind(&payment.cvv)
        .bind(PaymentStatus::Pending.code())
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(PaymentId::new(result.last_insert_rowid()))
    }

    async fn get_payment(&self, id: PaymentId) -> Result<Option<Payment>, RepoError> {
        let row: Option<PaymentRow> = sqlx::query_as(
            r#"SELECT id, total, interest_rate, installments, card, cvv, status, created_at
               FROM payments WHERE id = ?"#,
        )
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.map(PaymentRow::into_domain).transpose()
    }

    async fn get_status(&self, id: PaymentId) -> Result<Option<PaymentStatus>, RepoError> {
        let code: Option<i64> = sqlx::query_scalar(r#"SELECT status FROM payments WHERE id = ?"#)
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        code.map(parse_status).transpose()
    }

    async fn apply_transition(
        &self,
        id: PaymentId,
        transition: Transition,
    ) -> Result<TransitionOutcome, RepoError> {
        let target = transition.target();

        // Guard and write in one statement: the row only changes if it is not
        // in the blocking state at the moment of the write.
        let result = sqlx::query(r#"UPDATE payments SET status = ? WHERE id = ? AND status <> ?"#)
            .bind(target.code())
            .bind(id.get())
            .bind(transition.blocked_by().code())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if result.rows_affected() > 0 {
            return Ok(TransitionOutcome::Applied(target));
        }

        // The blocking state is terminal, so this read cannot race.
        match self.get_status(id).await? {
            None => Ok(TransitionOutcome::NotFound),
            Some(current) => Ok(TransitionOutcome::Rejected(current)),
        }
    }
}
