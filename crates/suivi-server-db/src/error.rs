// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use suivi_server_auth::RepositoryError;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
	#[error("Database error: {0}")]
	Sqlx(#[from] sqlx::Error),

	#[error("Corrupt {entity} {id}: {message}")]
	Corrupt {
		entity: &'static str,
		id: String,
		message: String,
	},

	#[error("Internal: {0}")]
	Internal(String),
}

impl DbError {
	pub(crate) fn corrupt(entity: &'static str, id: &str, message: impl ToString) -> Self {
		DbError::Corrupt {
			entity,
			id: id.to_string(),
			message: message.to_string(),
		}
	}
}

impl From<DbError> for RepositoryError {
	fn from(err: DbError) -> Self {
		match err {
			DbError::Corrupt {
				entity,
				id,
				message,
			} => RepositoryError::Corrupt {
				entity,
				id,
				message,
			},
			other => RepositoryError::Backend(other.to_string()),
		}
	}
}

pub type Result<T> = std::result::Result<T, DbError>;
