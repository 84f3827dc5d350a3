// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use async_trait::async_trait;
use sqlx::{sqlite::SqlitePool, Row};
use suivi_server_auth::{Action, ActionId, ActionRepository, BeneficiaryId, RepositoryError};

use crate::error::DbError;

#[derive(Clone)]
pub struct SqliteActionRepository {
	pool: SqlitePool,
}

impl SqliteActionRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Insert an action or move it to another beneficiary.
	#[tracing::instrument(skip(self, action), fields(action_id = %action.id))]
	pub async fn save_action(&self, action: &Action) -> Result<(), DbError> {
		sqlx::query(
			r#"
			INSERT INTO actions (id, beneficiary_id)
			VALUES (?, ?)
			ON CONFLICT(id) DO UPDATE SET
				beneficiary_id = excluded.beneficiary_id
			"#,
		)
		.bind(action.id.as_str())
		.bind(action.beneficiary_id.as_str())
		.execute(&self.pool)
		.await?;

		tracing::debug!(action_id = %action.id, "action saved");
		Ok(())
	}

	#[tracing::instrument(skip(self), fields(action_id = %id))]
	pub async fn get_action(&self, id: &ActionId) -> Result<Option<Action>, DbError> {
		let row = sqlx::query("SELECT id, beneficiary_id FROM actions WHERE id = ?")
			.bind(id.as_str())
			.fetch_optional(&self.pool)
			.await?;

		Ok(row.map(|r| row_to_action(&r)))
	}
}

fn row_to_action(row: &sqlx::sqlite::SqliteRow) -> Action {
	let id: String = row.get("id");
	let beneficiary_id: String = row.get("beneficiary_id");

	Action {
		id: ActionId::new(id),
		beneficiary_id: BeneficiaryId::new(beneficiary_id),
	}
}

#[async_trait]
impl ActionRepository for SqliteActionRepository {
	async fn get(&self, id: &ActionId) -> Result<Option<Action>, RepositoryError> {
		Ok(self.get_action(id).await?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::pool::create_memory_pool;

	async fn make_repo() -> SqliteActionRepository {
		SqliteActionRepository::new(create_memory_pool().await.unwrap())
	}

	#[tokio::test]
	async fn saved_action_keeps_its_beneficiary() {
		let repo = make_repo().await;
		repo.save_action(&Action::new("act1", "b1")).await.unwrap();

		let loaded = repo.get(&"act1".into()).await.unwrap();
		assert_eq!(loaded, Some(Action::new("act1", "b1")));
	}

	#[tokio::test]
	async fn save_moves_action_to_other_beneficiary() {
		let repo = make_repo().await;
		repo.save_action(&Action::new("act1", "b1")).await.unwrap();
		repo.save_action(&Action::new("act1", "b2")).await.unwrap();

		let loaded = repo.get(&"act1".into()).await.unwrap().unwrap();
		assert_eq!(loaded.beneficiary_id, BeneficiaryId::new("b2"));
	}

	#[tokio::test]
	async fn missing_action_is_none() {
		let repo = make_repo().await;
		assert_eq!(repo.get(&"ghost".into()).await.unwrap(), None);
	}
}
