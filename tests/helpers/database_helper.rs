//! Test database helper utilities
//!
//! Provides a migrated PostgreSQL database, either from `TEST_DATABASE_URL`
//! or a throwaway container. When neither is available the database tests
//! are skipped.

use std::sync::Once;

use sqlx::PgPool;
use testcontainers::runners::AsyncRunner;
use testcontainers::ContainerAsync;
use testcontainers_modules::postgres::Postgres as PostgresImage;

use sk_portal::database::DatabaseService;

static INIT: Once = Once::new();

const TABLES: &[&str] = &[
    "audit_logs",
    "registered_attendees",
    "event_attendees",
    "published_events",
    "events",
    "profile_archives",
    "profiles",
    "accounts",
];

/// Test database helper that manages PostgreSQL test database setup
pub struct TestDatabase {
    pub pool: PgPool,
    pub database_url: String,
    _container: Option<ContainerAsync<PostgresImage>>,
}

impl TestDatabase {
    /// Migrated, empty database; `None` when no PostgreSQL is reachable
    pub async fn new() -> Option<Self> {
        INIT.call_once(|| {
            let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        });

        match Self::connect().await {
            Ok(db) => Some(db),
            Err(e) => {
                eprintln!("skipping database test, no PostgreSQL available: {e}");
                None
            }
        }
    }

    async fn connect() -> Result<Self, Box<dyn std::error::Error>> {
        let (database_url, container) = match std::env::var("TEST_DATABASE_URL") {
            Ok(url) => (url, None),
            Err(_) => {
                let container = PostgresImage::default()
                    .with_db_name("test_sk_portal")
                    .with_user("test_user")
                    .with_password("test_password")
                    .start()
                    .await?;
                let host = container.get_host().await?;
                let port = container.get_host_port_ipv4(5432).await?;
                let url = format!("postgresql://test_user:test_password@{host}:{port}/test_sk_portal");
                (url, Some(container))
            }
        };

        let pool = PgPool::connect(&database_url).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;

        let db = Self {
            pool,
            database_url,
            _container: container,
        };
        db.cleanup().await?;
        Ok(db)
    }

    pub fn service(&self) -> DatabaseService {
        DatabaseService::new(self.pool.clone())
    }

    /// Clean all test data from the database
    pub async fn cleanup(&self) -> Result<(), sqlx::Error> {
        sqlx::query(&format!("TRUNCATE {} RESTART IDENTITY CASCADE", TABLES.join(", ")))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Count records in a table
    pub async fn count_records(&self, table: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&self.pool)
            .await
    }
}

/// Bind a `TestDatabase` or return early from the test when none is available
#[macro_export]
macro_rules! require_db {
    () => {
        match $crate::helpers::TestDatabase::new().await {
            Some(db) => db,
            None => return,
        }
    };
}
