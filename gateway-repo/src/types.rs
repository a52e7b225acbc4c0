//! Parsing helpers shared by the SQL adapters.

use gateway_types::{PaymentStatus, RepoError};

// ─────────────────────────────────────────────────────────────────────────────
// Parsing helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Maps a stored status ordinal back to the enum.
pub fn parse_status(code: i64) -> Result<PaymentStatus, RepoError> {
    PaymentStatus::from_code(code)
        .ok_or_else(|| RepoError::Corrupt(format!("Unknown payment status code: {}", code)))
}

pub fn db_err(e: sqlx::Error) -> RepoError {
    tracing::error!(error = %e, "database operation failed");
    RepoError::Database(e.to_string())
}

// ─────────────────────────────────────────────────────────────────────────────
// SQLite text encodings
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(feature = "sqlite")]
pub mod text {
    use chrono::{DateTime, SecondsFormat, Utc};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    use gateway_types::RepoError;

    /// Fixed-width RFC 3339 in UTC, so string order equals time order.
    pub fn format_timestamp(at: DateTime<Utc>) -> String {
        at.to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, RepoError> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| RepoError::Corrupt(format!("Bad timestamp {:?}: {}", s, e)))
    }

    pub fn parse_decimal(s: &str) -> Result<Decimal, RepoError> {
        Decimal::from_str(s).map_err(|e| RepoError::Corrupt(format!("Bad decimal {:?}: {}", s, e)))
    }

}
