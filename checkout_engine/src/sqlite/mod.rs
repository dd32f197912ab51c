pub(crate) mod addresses;
pub(crate) mod carts;
mod db;
pub(crate) mod items;
pub(crate) mod orders;

use std::str::FromStr;

pub use db::SqliteDatabase;
use sqlx::{
    migrate::Migrator,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};

use crate::traits::CheckoutError;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Creates a connection pool and brings the schema up to date. The pool is the only database
/// handle in the process; connection acquisition is scoped per request.
pub async fn new_pool(url: &str, max_connections: u32) -> Result<SqlitePool, CheckoutError> {
    let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new().max_connections(max_connections).connect_with(options).await?;
    MIGRATOR.run(&pool).await.map_err(|e| CheckoutError::DatabaseError(e.to_string()))?;
    Ok(pool)
}
