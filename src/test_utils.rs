use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};
use std::sync::Once;

static INIT: Once = Once::new();

pub struct TestContext {
    pub pool: Pool<Sqlite>,
}

pub async fn init_test_db() -> TestContext {
    INIT.call_once(|| {
        // Initialize logger only once
        let _ = env_logger::builder().is_test(true).try_init();
    });

    // Create an in-memory database for each test
    let pool = SqlitePoolOptions::new()
        .max_connections(1) // Single connection: every statement sees the same in-memory DB
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");

    crate::database::schema::ensure_schema(&pool)
        .await
        .expect("Failed to apply schema");

    TestContext { pool }
}
