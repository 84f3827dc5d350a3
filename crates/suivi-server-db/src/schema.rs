// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Table definitions for the relationship data the policies read.

use sqlx::sqlite::SqlitePool;

use crate::error::DbError;

const STATEMENTS: &[&str] = &[
	r#"
	CREATE TABLE IF NOT EXISTS counselors (
		id TEXT PRIMARY KEY,
		organization TEXT NOT NULL,
		agency_id TEXT,
		first_name TEXT NOT NULL DEFAULT '',
		last_name TEXT NOT NULL DEFAULT ''
	)
	"#,
	"CREATE INDEX IF NOT EXISTS idx_counselors_agency ON counselors(agency_id)",
	r#"
	CREATE TABLE IF NOT EXISTS beneficiaries (
		id TEXT PRIMARY KEY,
		organization TEXT NOT NULL,
		counselor_id TEXT,
		previous_counselor_id TEXT,
		shares_favorites INTEGER NOT NULL DEFAULT 0
	)
	"#,
	"CREATE INDEX IF NOT EXISTS idx_beneficiaries_counselor ON beneficiaries(counselor_id)",
	r#"
	CREATE TABLE IF NOT EXISTS appointments (
		id TEXT PRIMARY KEY,
		appointment_type TEXT NOT NULL,
		title TEXT NOT NULL,
		subtitle TEXT NOT NULL,
		comment TEXT,
		modality TEXT,
		date TEXT NOT NULL,
		duration_minutes INTEGER NOT NULL,
		precision_text TEXT,
		address TEXT,
		organizer TEXT,
		counselor_present INTEGER NOT NULL DEFAULT 1,
		invitation INTEGER,
		creator_id TEXT NOT NULL,
		creator_first_name TEXT NOT NULL DEFAULT '',
		creator_last_name TEXT NOT NULL DEFAULT '',
		agency_id TEXT,
		closed_at TEXT,
		max_participants INTEGER
	)
	"#,
	r#"
	CREATE TABLE IF NOT EXISTS appointment_participants (
		appointment_id TEXT NOT NULL REFERENCES appointments(id) ON DELETE CASCADE,
		beneficiary_id TEXT NOT NULL,
		position INTEGER NOT NULL,
		present INTEGER,
		PRIMARY KEY (appointment_id, beneficiary_id)
	)
	"#,
	r#"
	CREATE TABLE IF NOT EXISTS actions (
		id TEXT PRIMARY KEY,
		beneficiary_id TEXT NOT NULL
	)
	"#,
	"CREATE INDEX IF NOT EXISTS idx_actions_beneficiary ON actions(beneficiary_id)",
];

/// Creates every table and index if missing.
#[tracing::instrument(skip(pool))]
pub async fn create_schema(pool: &SqlitePool) -> Result<(), DbError> {
	for statement in STATEMENTS {
		sqlx::query(statement).execute(pool).await?;
	}
	tracing::debug!(statements = STATEMENTS.len(), "schema ready");
	Ok(())
}
