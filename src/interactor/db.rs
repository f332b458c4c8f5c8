use crate::entity::TransactionRecord;
use log::debug;
use sqlx::{postgres::PgQueryResult, Error as SqlxError, PgPool, Row};

// Highest ledger index stored so far, None when the table is empty
pub async fn get_max_ledger_index(pool: &PgPool) -> Result<Option<i64>, SqlxError> {
    let row = sqlx::query("SELECT MAX(ledger_index) AS max_ledger_index FROM token_transactions")
        .fetch_one(pool)
        .await?;

    let max: Option<i64> = row.try_get("max_ledger_index")?;
    Ok(max)
}

// Insert a transaction unless its hash is already stored.
// rows_affected() is 0 when the row already existed.
pub async fn insert_transaction_if_absent(
    pool: &PgPool,
    record: &TransactionRecord,
) -> Result<PgQueryResult, SqlxError> {
    let result = sqlx::query(
        "INSERT INTO token_transactions (
            transaction_hash, ledger_index, from_address, to_address,
            memo, amount, created_at, transaction_timestamp
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (transaction_hash) DO NOTHING",
    )
    .bind(&record.transaction_hash)
    .bind(record.ledger_index)
    .bind(record.from_address.as_deref())
    .bind(record.to_address.as_deref())
    .bind(record.memo.as_deref())
    .bind(record.amount)
    .bind(record.created_at)
    .bind(record.transaction_timestamp)
    .execute(pool)
    .await?;

    debug!(
        "Insert {} at ledger {}: {} row(s) affected",
        record.transaction_hash,
        record.ledger_index,
        result.rows_affected()
    );

    Ok(result)
}
