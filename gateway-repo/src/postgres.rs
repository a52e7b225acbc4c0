//! PostgreSQL repository adapter.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};

use gateway_types::{
    CardNumber, CardRegistry, NewPayment, Payment, PaymentId, PaymentRepository, PaymentStatus,
    RepoError, Transition, TransitionOutcome,
};

use crate::types::{db_err, parse_status};

// ─────────────────────────────────────────────────────────────────────────────
// Row types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(FromRow)]
struct PaymentRow {
    id: i64,
    total: Decimal,
    interest_rate: Decimal,
    installments: i32,
    card: String,
    cvv: String,
    status: i16,
    created_at: DateTime<Utc>,
}

impl PaymentRow {
    fn into_domain(self) -> Result<Payment, RepoError> {
        Ok(Payment {
            id: PaymentId::new(self.id),
            total: self.total,
            interest_rate: self.interest_rate,
            installments: self.installments,
            card: CardNumber::normalize(&self.card),
            cvv: self.cvv,
            status: parse_status(self.status.into())?,
            created_at: self.created_at,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// PostgreSQL Repository
// ─────────────────────────────────────────────────────────────────────────────

/// PostgreSQL repository. Status transitions rely on the row lock taken by
/// a single conditional `UPDATE`.
pub struct PostgresRepo {
    pool: PgPool,
}

/// Executes SQL statements from a schema file, splitting by semicolons.
async fn execute_script(pool: &PgPool, sql: &str, name: &str) -> Result<(), anyhow::Error> {
    for statement in sql.split(';') {
        let stmt = statement.trim();
        if !stmt.is_empty() {
            sqlx::query(stmt)
                .execute(pool)
                .await
                .map_err(|e| anyhow::anyhow!("Schema script {} failed: {}", name, e))?;
        }
    }
    Ok(())
}

impl PostgresRepo {
    /// Creates a new PostgreSQL repository and ensures the schema exists.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        execute_script(
            &pool,
            include_str!("../migrations/0001_create_tables_pg.sql"),
            "0001",
        )
        .await?;
        Ok(Self { pool })
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates the database schema if it does not exist yet.
    pub async fn create_schema(&self) -> Result<(), RepoError> {
        execute_script(
            &self.pool,
            include_str!("../migrations/0001_create_tables_pg.sql"),
            "0001",
        )
        .await
        .map_err(|e| RepoError::Database(e.to_string()))
    }

    /// Registers a card, or moves the expiry of an existing one.
    pub async fn register_card(
        &self,
        card: &CardNumber,
        expires_at: DateTime<Utc>,
    ) -> Result<(), RepoError> {
        sqlx::query(
            r#"INSERT INTO cards (number, expires_at) VALUES ($1, $2)
               ON CONFLICT (number) DO UPDATE SET expires_at = EXCLUDED.expires_at"#,
        )
        .bind(card.as_str())
        .bind(expires_at)
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
impl CardRegistry for PostgresRepo {
    async fn is_admissible(
        &self,
        card: &CardNumber,
        now: DateTime<Utc>,
    ) -> Result<bool, RepoError> {
        let count: i64 = sqlx::query_scalar(
            r#"SELECT COUNT(*) FROM cards WHERE number = $1 AND expires_at > $2"#,
        )
        .bind(card.as_str())
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(count > 0)
    }
}

#[async_trait]
impl PaymentRepository for PostgresRepo {
    async fn insert_payment(&self, payment: NewPayment) -> Result<PaymentId, RepoError> {
        let id: i64 = sqlx::query_scalar(
            r#"INSERT INTO payments (total, interest_rate, installments, card, cvv, status, created_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING id"#,
        )
        .bind(payment.total)
        .bind(payment.interest_rate)
        .bind(payment.installments)
        .bind(payment.card.as_str())
        .bind(&payment.cvv)
        .bind(PaymentStatus::Pending.code())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(PaymentId::new(id))
    }

    async fn get_payment(&self, id: PaymentId) -> Result<Option<Payment>, RepoError> {
        let row: Option<PaymentRow> = sqlx::query_as(
            r#"SELECT id, total, interest_rate, installments, card, cvv, status, created_at
               FROM payments WHERE id = $1"#,
        )
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.map(PaymentRow::into_domain).transpose()
    }

    async fn get_status(&self, id: PaymentId) -> Result<Option<PaymentStatus>, RepoError> {
        let code: Option<i16> = sqlx::query_scalar(r#"SELECT status FROM payments WHERE id = $1"#)
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        code.map(|c| parse_status(c.into())).transpose()
    }

    async fn apply_transition(
        &self,
        id: PaymentId,
        transition: Transition,
    ) -> Result<TransitionOutcome, RepoError> {
        let target = transition.target();

        let updated: Option<i16> = sqlx::query_scalar(
            r#"UPDATE payments SET status = $1 WHERE id = $2 AND status <> $3 RETURNING status"#,
        )
        .bind(target.code())
        .bind(id.get())
        .bind(transition.blocked_by().code())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        if let Some(code) = updated {
            return Ok(TransitionOutcome::Applied(parse_status(code.into())?));
        }

        // The blocking state is terminal, so this read cannot race.
        match self.get_status(id).await? {
            None => Ok(TransitionOutcome::NotFound),
            Some(current) => Ok(TransitionOutcome::Rejected(current)),
        }
    }
}
