//! Database layer — migrations and queries over the two log tables.

use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use tracing::info;

use crate::errors::{LoggerError, Result};
use crate::models::{CharityTransfer, DonationLog, NewDonation, NewTransfer};

/// Establish a SQLite connection pool and run pending migrations.
pub async fn init_pool(database_url: &str) -> Result<SqlitePool> {
    // Make sure the file is created if it doesn't exist yet.
    let url = if database_url.starts_with("sqlite:") {
        database_url.to_string()
    } else {
        format!("sqlite:{database_url}")
    };

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Database migrations applied successfully");
    Ok(pool)
}

// ─────────────────────────────────────────────────────────
// Writes
// ─────────────────────────────────────────────────────────

/// Insert a donation record. The timestamp is assigned here, at write time.
///
/// A second record with the same `tx_hash` fails with
/// [`LoggerError::Duplicate`] and leaves the stored row untouched; under
/// concurrent duplicate submissions the UNIQUE index picks the single winner.
pub async fn insert_donation(pool: &SqlitePool, new: &NewDonation) -> Result<DonationLog> {
    let timestamp = chrono::Utc::now().timestamp();
    let inserted = sqlx::query_as::<_, DonationLog>(
        r#"
        INSERT INTO donation_logs (donor, amount, tx_hash, timestamp)
        VALUES (?1, ?2, ?3, ?4)
        RETURNING id, donor, amount, tx_hash, timestamp
        "#,
    )
    .bind(&new.donor)
    .bind(&new.amount)
    .bind(&new.tx_hash)
    .bind(timestamp)
    .fetch_one(pool)
    .await;

    match inserted {
        Ok(row) => Ok(row),
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
            Err(LoggerError::Duplicate(new.tx_hash.clone()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Insert a transfer record. Same duplicate semantics as donations; the
/// uniqueness scope is per event kind, so a settlement shares its `tx_hash`
/// with the donation that triggered it.
pub async fn insert_transfer(pool: &SqlitePool, new: &NewTransfer) -> Result<CharityTransfer> {
    let timestamp = chrono::Utc::now().timestamp();
    let inserted = sqlx::query_as::<_, CharityTransfer>(
        r#"
        INSERT INTO charity_transfers (recipient, total_transferred, tx_hash, timestamp)
        VALUES (?1, ?2, ?3, ?4)
        RETURNING id, recipient, total_transferred, tx_hash, timestamp
        "#,
    )
    .bind(&new.recipient)
    .bind(&new.total_transferred)
    .bind(&new.tx_hash)
    .bind(timestamp)
    .fetch_one(pool)
    .await;

    match inserted {
        Ok(row) => Ok(row),
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
            Err(LoggerError::Duplicate(new.tx_hash.clone()))
        }
        Err(e) => Err(e.into()),
    }
}

// ─────────────────────────────────────────────────────────
// Reads
// ─────────────────────────────────────────────────────────

/// All donation records, newest first.
pub async fn list_donations(pool: &SqlitePool) -> Result<Vec<DonationLog>> {
    let rows = sqlx::query_as::<_, DonationLog>(
        r#"
        SELECT id, donor, amount, tx_hash, timestamp
        FROM   donation_logs
        ORDER  BY timestamp DESC, id DESC
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// All transfer records, newest first.
pub async fn list_transfers(pool: &SqlitePool) -> Result<Vec<CharityTransfer>> {
    let rows = sqlx::query_as::<_, CharityTransfer>(
        r#"
        SELECT id, recipient, total_transferred, tx_hash, timestamp
        FROM   charity_transfers
        ORDER  BY timestamp DESC, id DESC
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

// ─────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────
