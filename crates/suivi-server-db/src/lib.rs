// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! SQLite repositories for the suivi authorization core.
//!
//! Each repository implements the matching read contract from
//! `suivi-server-auth` and adds the `save_*` operations write paths use.

pub mod action;
pub mod appointment;
pub mod beneficiary;
pub mod counselor;
pub mod error;
pub mod pool;
pub mod schema;

use sqlx::sqlite::SqlitePool;
use std::sync::Arc;
use suivi_server_auth::Repositories;

pub use action::SqliteActionRepository;
pub use appointment::SqliteAppointmentRepository;
pub use beneficiary::SqliteBeneficiaryRepository;
pub use counselor::SqliteCounselorRepository;
pub use error::{DbError, Result};
pub use pool::{create_memory_pool, create_pool};
pub use schema::create_schema;

/// Every repository over one pool, ready for a `PolicyEvaluator`.
pub fn sqlite_repositories(pool: &SqlitePool) -> Repositories {
	Repositories::new(
		Arc::new(SqliteCounselorRepository::new(pool.clone())),
		Arc::new(SqliteBeneficiaryRepository::new(pool.clone())),
		Arc::new(SqliteAppointmentRepository::new(pool.clone())),
		Arc::new(SqliteActionRepository::new(pool.clone())),
	)
}
