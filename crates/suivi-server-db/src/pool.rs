// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use sqlx::sqlite::{
	SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use std::str::FromStr;
use suivi_server_config::DatabaseConfig;

use crate::error::DbError;
use crate::schema::create_schema;

/// Create a SqlitePool with WAL mode and foreign keys enforced.
///
/// An in-memory url gets a single pinned connection, since every new
/// connection would open an empty database.
///
/// # Errors
/// Returns `DbError::Internal` if the URL is invalid.
#[tracing::instrument(skip(config), fields(memory = config.is_memory()))]
pub async fn create_pool(config: &DatabaseConfig) -> Result<SqlitePool, DbError> {
	let options = SqliteConnectOptions::from_str(&config.url)
		.map_err(|e| DbError::Internal(format!("Invalid database URL: {e}")))?
		.journal_mode(SqliteJournalMode::Wal)
		.synchronous(SqliteSynchronous::Normal)
		.foreign_keys(true)
		.create_if_missing(true);

	let pool = if config.is_memory() {
		pinned_pool_options().connect_with(options).await?
	} else {
		SqlitePool::connect_with(options).await?
	};

	tracing::debug!("database pool created");
	Ok(pool)
}

fn pinned_pool_options() -> SqlitePoolOptions {
	SqlitePoolOptions::new()
		.max_connections(1)
		.min_connections(1)
		.idle_timeout(None)
		.max_lifetime(None)
}

/// A single-connection in-memory pool with the schema applied.
///
/// The database lives as long as its one connection, so the connection is
/// never recycled.
#[tracing::instrument]
pub async fn create_memory_pool() -> Result<SqlitePool, DbError> {
	let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

	let pool = pinned_pool_options().connect_with(options).await?;

	create_schema(&pool).await?;
	Ok(pool)
}
