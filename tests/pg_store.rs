//! Round trip against a real PostgreSQL. Run with
//! `TEST_DATABASE_URL=postgres://... cargo test -- --ignored`.

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::env;
use std::sync::Arc;
use xrpl_token_feed::{InsertOutcome, LedgerStore, PgLedgerStore, TransactionRecord};

async fn get_transaction_by_hash(pool: &PgPool, hash: &str) -> Option<TransactionRecord> {
    sqlx::query_as::<_, TransactionRecord>(
        "SELECT transaction_hash, ledger_index, from_address, to_address,
                memo, amount, created_at, transaction_timestamp
         FROM token_transactions
         WHERE transaction_hash = $1",
    )
    .bind(hash)
    .fetch_optional(pool)
    .await
    .unwrap()
}

async fn count_transactions(pool: &PgPool) -> i64 {
    sqlx::query("SELECT COUNT(*) AS count FROM token_transactions")
        .fetch_one(pool)
        .await
        .unwrap()
        .try_get("count")
        .unwrap()
}

#[tokio::test]
#[ignore]
async fn insert_if_absent_is_idempotent() {
    let url = env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL must be set");
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("connect");
    sqlx::migrate!("./migrations").run(&pool).await.expect("migrate");

    let hash = format!("TEST{}", Utc::now().timestamp_nanos_opt().unwrap_or_default());
    let record = TransactionRecord {
        transaction_hash: hash.clone(),
        ledger_index: 7_000_000_000,
        from_address: Some("rFrom".to_string()),
        to_address: None,
        memo: Some("hello".to_string()),
        amount: Some(Decimal::new(1_234_567, 6)),
        created_at: Utc::now(),
        transaction_timestamp: None,
    };

    let pool = Arc::new(pool);
    let store = PgLedgerStore::new(pool.clone());

    assert_eq!(store.insert_if_absent(&record).await.unwrap(), InsertOutcome::Inserted);
    assert_eq!(
        store.insert_if_absent(&record).await.unwrap(),
        InsertOutcome::AlreadyPresent
    );
    assert!(store.max_ledger_index().await.unwrap().unwrap() >= 7_000_000_000);

    let stored = get_transaction_by_hash(&pool, &hash).await.unwrap();
    assert_eq!(stored.amount, record.amount);
    assert_eq!(stored.memo, record.memo);
    assert!(count_transactions(&pool).await >= 1);

    sqlx::query("DELETE FROM token_transactions WHERE transaction_hash = $1")
        .bind(&hash)
        .execute(&*pool)
        .await
        .unwrap();
}
