// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use async_trait::async_trait;
use sqlx::{sqlite::SqlitePool, Row};
use suivi_server_auth::{
	AgencyId, Counselor, CounselorId, CounselorRepository, Organization, RepositoryError,
};

use crate::error::DbError;

#[derive(Clone)]
pub struct SqliteCounselorRepository {
	pool: SqlitePool,
}

impl SqliteCounselorRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Insert or replace a counselor.
	#[tracing::instrument(skip(self, counselor), fields(counselor_id = %counselor.id))]
	pub async fn save_counselor(&self, counselor: &Counselor) -> Result<(), DbError> {
		sqlx::query(
			r#"
			INSERT INTO counselors (id, organization, agency_id, first_name, last_name)
			VALUES (?, ?, ?, ?, ?)
			ON CONFLICT(id) DO UPDATE SET
				organization = excluded.organization,
				agency_id = excluded.agency_id,
				first_name = excluded.first_name,
				last_name = excluded.last_name
			"#,
		)
		.bind(counselor.id.as_str())
		.bind(counselor.organization.code())
		.bind(counselor.agency_id.as_ref().map(|id| id.as_str()))
		.bind(&counselor.first_name)
		.bind(&counselor.last_name)
		.execute(&self.pool)
		.await?;

		tracing::debug!(counselor_id = %counselor.id, "counselor saved");
		Ok(())
	}

	#[tracing::instrument(skip(self), fields(counselor_id = %id))]
	pub async fn get_counselor(&self, id: &CounselorId) -> Result<Option<Counselor>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, organization, agency_id, first_name, last_name
			FROM counselors
			WHERE id = ?
			"#,
		)
		.bind(id.as_str())
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| row_to_counselor(&r)).transpose()
	}
}

fn row_to_counselor(row: &sqlx::sqlite::SqliteRow) -> Result<Counselor, DbError> {
	let id: String = row.get("id");
	let organization: String = row.get("organization");
	let agency_id: Option<String> = row.get("agency_id");

	let organization = organization
		.parse::<Organization>()
		.map_err(|e| DbError::corrupt("counselor", &id, e))?;

	Ok(Counselor {
		id: CounselorId::new(id),
		organization,
		agency_id: agency_id.map(AgencyId::new),
		first_name: row.get("first_name"),
		last_name: row.get("last_name"),
	})
}

#[async_trait]
impl CounselorRepository for SqliteCounselorRepository {
	async fn get(&self, id: &CounselorId) -> Result<Option<Counselor>, RepositoryError> {
		Ok(self.get_counselor(id).await?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::pool::create_memory_pool;

	async fn make_repo() -> SqliteCounselorRepository {
		SqliteCounselorRepository::new(create_memory_pool().await.unwrap())
	}

	#[tokio::test]
	async fn save_and_get_roundtrip() {
		let repo = make_repo().await;
		let counselor = Counselor::new("c1", Organization::PassEmploi)
			.with_agency("a1")
			.with_name("Nils", "Tavernier");
		repo.save_counselor(&counselor).await.unwrap();

		let loaded = repo.get(&"c1".into()).await.unwrap();
		assert_eq!(loaded, Some(counselor));
	}

	#[tokio::test]
	async fn save_overwrites_agency() {
		let repo = make_repo().await;
		let mut counselor = Counselor::new("c1", Organization::Milo).with_agency("a1");
		repo.save_counselor(&counselor).await.unwrap();
		counselor.agency_id = None;
		repo.save_counselor(&counselor).await.unwrap();

		let loaded = repo.get(&"c1".into()).await.unwrap().unwrap();
		assert_eq!(loaded.agency_id, None);
	}

	#[tokio::test]
	async fn missing_counselor_is_none() {
		let repo = make_repo().await;
		assert_eq!(repo.get(&"ghost".into()).await.unwrap(), None);
	}

	#[tokio::test]
	async fn unknown_organization_is_corrupt() {
		let repo = make_repo().await;
		sqlx::query("INSERT INTO counselors (id, organization) VALUES ('c1', 'PLANET_EXPRESS')")
			.execute(&repo.pool)
			.await
			.unwrap();

		let err = repo.get(&"c1".into()).await.unwrap_err();
		assert!(matches!(err, RepositoryError::Corrupt { entity: "counselor", .. }));
	}
}
