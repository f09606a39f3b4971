pub mod schema;
pub mod daily_snapshot;

use std::time::Duration;

use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use diesel::{PgConnection, SqliteConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use thiserror::Error;

pub type PgPool = Pool<ConnectionManager<PgConnection>>;
pub type SqlitePool = Pool<ConnectionManager<SqliteConnection>>;

const POSTGRES_MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations/postgres");
const SQLITE_MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations/sqlite");

pub const DEFAULT_SQLITE_PATH: &str = "database.db";

/// Storage medium selected from the connection string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseUrl {
    Postgres(String),
    Sqlite(String),
}

impl DatabaseUrl {
    /// `None` falls back to a local SQLite file.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
            return DatabaseUrl::Sqlite(DEFAULT_SQLITE_PATH.to_string());
        };

        if let Some(rest) = raw.strip_prefix("postgres://") {
            return DatabaseUrl::Postgres(format!("postgresql://{rest}"));
        }
        if raw.starts_with("postgresql://") {
            return DatabaseUrl::Postgres(raw.to_string());
        }

        // `sqlite:///rel.db` is relative and `sqlite:////abs.db` absolute.
        let path = raw
            .strip_prefix("sqlite:///")
            .or_else(|| raw.strip_prefix("sqlite://"))
            .or_else(|| raw.strip_prefix("sqlite:"))
            .unwrap_or(raw);

        DatabaseUrl::Sqlite(path.to_string())
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            DatabaseUrl::Postgres(_) => "postgres",
            DatabaseUrl::Sqlite(_) => "sqlite",
        }
    }
}

#[derive(Clone)]
pub enum DbPool {
    Postgres(PgPool),
    Sqlite(SqlitePool),
}

/// Runs `$body` with `$conn` bound to a pooled connection of whichever backend
/// the pool holds. Evaluates to `Result<T, r2d2::Error>` where `T` is the type
/// of `$body`, so `$body` must type-check against both backends.
macro_rules! with_connection {
    ($pool:expr, |$conn:ident| $body:expr) => {
        match $pool {
            $crate::db::DbPool::Postgres(pool) => match pool.get() {
                Ok(mut pooled) => {
                    let $conn: &mut diesel::PgConnection = &mut pooled;
                    Ok($body)
                }
                Err(source) => Err(source),
            },
            $crate::db::DbPool::Sqlite(pool) => match pool.get() {
                Ok(mut pooled) => {
                    let $conn: &mut diesel::SqliteConnection = &mut pooled;
                    Ok($body)
                }
                Err(source) => Err(source),
            },
        }
    };
}

pub(crate) use with_connection;

#[derive(Debug)]
struct SqlitePragmas;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute("PRAGMA busy_timeout = 5000; PRAGMA journal_mode = WAL;")
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

#[derive(Debug, Error)]
pub enum ConnectPoolError {
    #[error("BuildPool: {source}")]
    BuildPool {
        #[from]
        source: r2d2::Error,
    },
}

pub fn connect_pool(url: &DatabaseUrl) -> Result<DbPool, ConnectPoolError> {
    let pool = match url {
        DatabaseUrl::Postgres(url) => DbPool::Postgres(
            Pool::builder()
                .max_size(8)
                .connection_timeout(Duration::from_secs(10))
                .build(ConnectionManager::<PgConnection>::new(url))?,
        ),
        DatabaseUrl::Sqlite(path) => DbPool::Sqlite(
            Pool::builder()
                .max_size(4)
                .connection_timeout(Duration::from_secs(10))
                .connection_customizer(Box::new(SqlitePragmas))
                .build(ConnectionManager::<SqliteConnection>::new(path))?,
        ),
    };

    Ok(pool)
}

#[derive(Debug, Error)]
pub enum RunMigrationsError {
    #[error("GetConnectionFromPool: {source}")]
    GetConnectionFromPool {
        #[from]
        source: r2d2::Error,
    },

    #[error("RunPendingMigrations: {source}")]
    RunPendingMigrations {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Applies pending migrations and returns the versions that ran. Running it
/// against an up-to-date database is a no-op.
pub fn run_migrations(pool: &DbPool) -> Result<Vec<String>, RunMigrationsError> {
    let applied: Result<Vec<String>, _> = match pool {
        DbPool::Postgres(pool) => pool
            .get()?
            .run_pending_migrations(POSTGRES_MIGRATIONS)
            .map(|versions| versions.iter().map(ToString::to_string).collect()),
        DbPool::Sqlite(pool) => pool
            .get()?
            .run_pending_migrations(SQLITE_MIGRATIONS)
            .map(|versions| versions.iter().map(ToString::to_string).collect()),
    };

    applied.map_err(|source| RunMigrationsError::RunPendingMigrations { source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_url_falls_back_to_local_sqlite() {
        assert_eq!(
            DatabaseUrl::parse(None),
            DatabaseUrl::Sqlite(DEFAULT_SQLITE_PATH.to_string())
        );
        assert_eq!(
            DatabaseUrl::parse(Some("  ")),
            DatabaseUrl::Sqlite(DEFAULT_SQLITE_PATH.to_string())
        );
    }

    #[test]
    fn postgres_scheme_is_normalised() {
        assert_eq!(
            DatabaseUrl::parse(Some("postgres://user:pw@db:5432/stats")),
            DatabaseUrl::Postgres("postgresql://user:pw@db:5432/stats".to_string())
        );
        assert_eq!(
            DatabaseUrl::parse(Some("postgresql://db/stats")),
            DatabaseUrl::Postgres("postgresql://db/stats".to_string())
        );
    }

    #[test]
    fn sqlite_prefixes_are_stripped() {
        assert_eq!(
            DatabaseUrl::parse(Some("sqlite:///database.db")),
            DatabaseUrl::Sqlite("database.db".to_string())
        );
        assert_eq!(
            DatabaseUrl::parse(Some("sqlite:////tmp/stats.db")),
            DatabaseUrl::Sqlite("/tmp/stats.db".to_string())
        );
        assert_eq!(
            DatabaseUrl::parse(Some("sqlite:stats.db")),
            DatabaseUrl::Sqlite("stats.db".to_string())
        );
        assert_eq!(
            DatabaseUrl::parse(Some("data/stats.db")),
            DatabaseUrl::Sqlite("data/stats.db".to_string())
        );
    }
}
