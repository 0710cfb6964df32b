//! sqlx binding helpers
//!
//! Bind a [`SqlFilter`]'s arguments onto an `sqlx` query in placeholder order.
//!
//! ```no_run
//! # #[cfg(feature = "sqlite")]
//! # async fn example(pool: sqlx::SqlitePool) -> Result<(), Box<dyn std::error::Error>> {
//! use scopefilter::{filter, PermissionSet, ScopeAttribute};
//!
//! let permissions = PermissionSet::new().grant("datasources:read", "datasources:id:3");
//! let acl = filter(&permissions, "data_source.id", "datasources", ScopeAttribute::Id, &["datasources:read"])?;
//!
//! let sql = format!("SELECT name FROM data_source WHERE {}", acl.where_clause);
//! let rows = acl.bind_sqlite(sqlx::query(&sql)).fetch_all(&pool).await?;
//! # let _ = rows;
//! # Ok(())
//! # }
//! ```

use crate::predicate::SqlFilter;
use crate::types::ScopeValue;

#[cfg(feature = "sqlite")]
use sqlx::sqlite::{Sqlite, SqliteArguments};

#[cfg(feature = "postgres")]
use sqlx::postgres::{PgArguments, Postgres};

use sqlx::query::Query;

impl SqlFilter {
    /// Binds the filter arguments onto a SQLite query
    #[cfg(feature = "sqlite")]
    pub fn bind_sqlite<'q>(
        &self,
        mut query: Query<'q, Sqlite, SqliteArguments<'q>>,
    ) -> Query<'q, Sqlite, SqliteArguments<'q>> {
        for arg in &self.args {
            query = match arg {
                ScopeValue::Int(n) => query.bind(*n),
                ScopeValue::Str(s) => query.bind(s.clone()),
            };
        }
        query
    }

    /// Binds the filter arguments onto a PostgreSQL query
    #[cfg(feature = "postgres")]
    pub fn bind_postgres<'q>(
        &self,
        mut query: Query<'q, Postgres, PgArguments>,
    ) -> Query<'q, Postgres, PgArguments> {
        for arg in &self.args {
            query = match arg {
                ScopeValue::Int(n) => query.bind(*n),
                ScopeValue::Str(s) => query.bind(s.clone()),
            };
        }
        query
    }
}
