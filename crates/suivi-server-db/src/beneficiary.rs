// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use async_trait::async_trait;
use sqlx::{sqlite::SqlitePool, Row};
use suivi_server_auth::{
	Beneficiary, BeneficiaryId, BeneficiaryRepository, CounselorId, Organization,
	RepositoryError,
};

use crate::error::DbError;

const SELECT_BENEFICIARY: &str = r#"
	SELECT id, organization, counselor_id, previous_counselor_id, shares_favorites
	FROM beneficiaries
"#;

#[derive(Clone)]
pub struct SqliteBeneficiaryRepository {
	pool: SqlitePool,
}

impl SqliteBeneficiaryRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Insert or replace a beneficiary, including its transfer state.
	#[tracing::instrument(skip(self, beneficiary), fields(beneficiary_id = %beneficiary.id))]
	pub async fn save_beneficiary(&self, beneficiary: &Beneficiary) -> Result<(), DbError> {
		sqlx::query(
			r#"
			INSERT INTO beneficiaries (id, organization, counselor_id, previous_counselor_id, shares_favorites)
			VALUES (?, ?, ?, ?, ?)
			ON CONFLICT(id) DO UPDATE SET
				organization = excluded.organization,
				counselor_id = excluded.counselor_id,
				previous_counselor_id = excluded.previous_counselor_id,
				shares_favorites = excluded.shares_favorites
			"#,
		)
		.bind(beneficiary.id.as_str())
		.bind(beneficiary.organization.code())
		.bind(beneficiary.current_counselor_id.as_ref().map(|id| id.as_str()))
		.bind(beneficiary.previous_counselor_id.as_ref().map(|id| id.as_str()))
		.bind(beneficiary.shares_favorites as i32)
		.execute(&self.pool)
		.await?;

		tracing::debug!(beneficiary_id = %beneficiary.id, "beneficiary saved");
		Ok(())
	}

	#[tracing::instrument(skip(self), fields(beneficiary_id = %id))]
	pub async fn get_beneficiary(&self, id: &BeneficiaryId) -> Result<Option<Beneficiary>, DbError> {
		let sql = format!("{SELECT_BENEFICIARY} WHERE id = ?");
		let row = sqlx::query(&sql)
			.bind(id.as_str())
			.fetch_optional(&self.pool)
			.await?;

		row.map(|r| row_to_beneficiary(&r)).transpose()
	}

	/// Beneficiaries among `ids`, optionally restricted to one current counselor.
	#[tracing::instrument(skip(self, ids), fields(requested = ids.len()))]
	pub async fn list_beneficiaries(
		&self,
		ids: &[BeneficiaryId],
		counselor_id: Option<&CounselorId>,
	) -> Result<Vec<Beneficiary>, DbError> {
		if ids.is_empty() {
			return Ok(Vec::new());
		}

		let placeholders = vec!["?"; ids.len()].join(", ");
		let mut sql = format!("{SELECT_BENEFICIARY} WHERE id IN ({placeholders})");
		if counselor_id.is_some() {
			sql.push_str(" AND counselor_id = ?");
		}

		let mut query = sqlx::query(&sql);
		for id in ids {
			query = query.bind(id.as_str());
		}
		if let Some(counselor_id) = counselor_id {
			query = query.bind(counselor_id.as_str());
		}

		let rows = query.fetch_all(&self.pool).await?;
		rows.iter().map(row_to_beneficiary).collect()
	}
}

fn row_to_beneficiary(row: &sqlx::sqlite::SqliteRow) -> Result<Beneficiary, DbError> {
	let id: String = row.get("id");
	let organization: String = row.get("organization");
	let counselor_id: Option<String> = row.get("counselor_id");
	let previous_counselor_id: Option<String> = row.get("previous_counselor_id");
	let shares_favorites: i32 = row.get("shares_favorites");

	let organization = organization
		.parse::<Organization>()
		.map_err(|e| DbError::corrupt("beneficiary", &id, e))?;

	Ok(Beneficiary {
		id: BeneficiaryId::new(id),
		organization,
		current_counselor_id: counselor_id.map(CounselorId::new),
		previous_counselor_id: previous_counselor_id.map(CounselorId::new),
		shares_favorites: shares_favorites != 0,
	})
}

#[async_trait]
impl BeneficiaryRepository for SqliteBeneficiaryRepository {
	async fn get(&self, id: &BeneficiaryId) -> Result<Option<Beneficiary>, RepositoryError> {
		Ok(self.get_beneficiary(id).await?)
	}

	async fn find_by_ids(&self, ids: &[BeneficiaryId]) -> Result<Vec<Beneficiary>, RepositoryError> {
		Ok(self.list_beneficiaries(ids, None).await?)
	}

	async fn find_owned_by(
		&self,
		ids: &[BeneficiaryId],
		counselor_id: &CounselorId,
	) -> Result<Vec<Beneficiary>, RepositoryError> {
		Ok(self.list_beneficiaries(ids, Some(counselor_id)).await?)
	}
}
