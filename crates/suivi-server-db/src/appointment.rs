// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Appointment persistence.
//!
//! Participants are stored as beneficiary ids only. Their counselor and that
//! counselor's agency are joined in at read time, so a beneficiary transfer is
//! reflected in every appointment they take part in.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqlitePool, Row};
use suivi_server_auth::{
	AgencyId, Appointment, AppointmentCreator, AppointmentId, AppointmentParticipant,
	AppointmentRepository, AppointmentType, BeneficiaryId, CounselorId, RepositoryError,
};

use crate::error::DbError;

#[derive(Clone)]
pub struct SqliteAppointmentRepository {
	pool: SqlitePool,
}

impl SqliteAppointmentRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Insert or replace an appointment and its participant list.
	#[tracing::instrument(
        skip(self, appointment),
        fields(appointment_id = %appointment.id, participants = appointment.participants.len())
    )]
	pub async fn save_appointment(&self, appointment: &Appointment) -> Result<(), DbError> {
		let mut tx = self.pool.begin().await?;

		sqlx::query(
			r#"
			INSERT INTO appointments (
				id, appointment_type, title, subtitle, comment, modality, date, duration_minutes,
				precision_text, address, organizer, counselor_present, invitation,
				creator_id, creator_first_name, creator_last_name, agency_id, closed_at, max_participants
			)
			VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
			ON CONFLICT(id) DO UPDATE SET
				appointment_type = excluded.appointment_type,
				title = excluded.title,
				subtitle = excluded.subtitle,
				comment = excluded.comment,
				modality = excluded.modality,
				date = excluded.date,
				duration_minutes = excluded.duration_minutes,
				precision_text = excluded.precision_text,
				address = excluded.address,
				organizer = excluded.organizer,
				counselor_present = excluded.counselor_present,
				invitation = excluded.invitation,
				creator_id = excluded.creator_id,
				creator_first_name = excluded.creator_first_name,
				creator_last_name = excluded.creator_last_name,
				agency_id = excluded.agency_id,
				closed_at = excluded.closed_at,
				max_participants = excluded.max_participants
			"#,
		)
		.bind(appointment.id.as_str())
		.bind(appointment.appointment_type.code())
		.bind(&appointment.title)
		.bind(&appointment.subtitle)
		.bind(appointment.comment.as_deref())
		.bind(appointment.modality.as_deref())
		.bind(appointment.date.to_rfc3339())
		.bind(i64::from(appointment.duration_minutes))
		.bind(appointment.precision.as_deref())
		.bind(appointment.address.as_deref())
		.bind(appointment.organizer.as_deref())
		.bind(appointment.counselor_present as i32)
		.bind(appointment.invitation.map(|i| i as i32))
		.bind(appointment.creator.id.as_str())
		.bind(&appointment.creator.first_name)
		.bind(&appointment.creator.last_name)
		.bind(appointment.agency_id.as_ref().map(|id| id.as_str()))
		.bind(appointment.closed_at.map(|d| d.to_rfc3339()))
		.bind(appointment.max_participants.map(i64::from))
		.execute(&mut *tx)
		.await?;

		sqlx::query("DELETE FROM appointment_participants WHERE appointment_id = ?")
			.bind(appointment.id.as_str())
			.execute(&mut *tx)
			.await?;

		for (position, participant) in appointment.participants.iter().enumerate() {
			sqlx::query(
				r#"
				INSERT OR IGNORE INTO appointment_participants
					(appointment_id, beneficiary_id, position, present)
				VALUES (?, ?, ?, ?)
				"#,
			)
			.bind(appointment.id.as_str())
			.bind(participant.beneficiary_id.as_str())
			.bind(position as i64)
			.bind(participant.present.map(|p| p as i32))
			.execute(&mut *tx)
			.await?;
		}

		tx.commit().await?;
		tracing::debug!(appointment_id = %appointment.id, "appointment saved");
		Ok(())
	}

	/// Loads an appointment with its participants' current counselors.
	#[tracing::instrument(skip(self), fields(appointment_id = %id))]
	pub async fn get_appointment(&self, id: &AppointmentId) -> Result<Option<Appointment>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, appointment_type, title, subtitle, comment, modality, date, duration_minutes,
				precision_text, address, organizer, counselor_present, invitation,
				creator_id, creator_first_name, creator_last_name, agency_id, closed_at, max_participants
			FROM appointments
			WHERE id = ?
			"#,
		)
		.bind(id.as_str())
		.fetch_optional(&self.pool)
		.await?;

		let Some(row) = row else {
			return Ok(None);
		};

		let participants: Vec<AppointmentParticipant> = sqlx::query(
			r#"
			SELECT p.beneficiary_id, p.present, b.counselor_id, c.agency_id AS counselor_agency_id
			FROM appointment_participants p
			LEFT JOIN beneficiaries b ON b.id = p.beneficiary_id
			LEFT JOIN counselors c ON c.id = b.counselor_id
			WHERE p.appointment_id = ?
			ORDER BY p.position
			"#,
		)
		.bind(id.as_str())
		.fetch_all(&self.pool)
		.await?
		.iter()
		.map(row_to_participant)
		.collect();

		row_to_appointment(&row, participants).map(Some)
	}
}

fn row_to_participant(row: &sqlx::sqlite::SqliteRow) -> AppointmentParticipant {
	let beneficiary_id: String = row.get("beneficiary_id");
	let counselor_id: Option<String> = row.get("counselor_id");
	let counselor_agency_id: Option<String> = row.get("counselor_agency_id");
	let present: Option<i32> = row.get("present");

	AppointmentParticipant {
		beneficiary_id: BeneficiaryId::new(beneficiary_id),
		counselor_id: counselor_id.map(CounselorId::new),
		counselor_agency_id: counselor_agency_id.map(AgencyId::new),
		present: present.map(|p| p != 0),
	}
}

fn parse_date(id: &str, value: &str) -> Result<DateTime<Utc>, DbError> {
	DateTime::parse_from_rfc3339(value)
		.map(|d| d.with_timezone(&Utc))
		.map_err(|e| DbError::corrupt("appointment", id, format!("invalid date: {e}")))
}

fn to_u32(id: &str, column: &str, value: i64) -> Result<u32, DbError> {
	u32::try_from(value)
		.map_err(|_| DbError::corrupt("appointment", id, format!("{column} out of range: {value}")))
}

fn row_to_appointment(
	row: &sqlx::sqlite::SqliteRow,
	participants: Vec<AppointmentParticipant>,
) -> Result<Appointment, DbError> {
	let id: String = row.get("id");
	let appointment_type: String = row.get("appointment_type");
	let date: String = row.get("date");
	let duration_minutes: i64 = row.get("duration_minutes");
	let counselor_present: i32 = row.get("counselor_present");
	let invitation: Option<i32> = row.get("invitation");
	let agency_id: Option<String> = row.get("agency_id");
	let closed_at: Option<String> = row.get("closed_at");
	let max_participants: Option<i64> = row.get("max_participants");
	let creator_id: String = row.get("creator_id");

	let appointment_type = appointment_type
		.parse::<AppointmentType>()
		.map_err(|e| DbError::corrupt("appointment", &id, e))?;

	Ok(Appointment {
		appointment_type,
		title: row.get("title"),
		subtitle: row.get("subtitle"),
		comment: row.get("comment"),
		modality: row.get("modality"),
		date: parse_date(&id, &date)?,
		duration_minutes: to_u32(&id, "duration_minutes", duration_minutes)?,
		participants,
		precision: row.get("precision_text"),
		address: row.get("address"),
		organizer: row.get("organizer"),
		counselor_present: counselor_present != 0,
		invitation: invitation.map(|i| i != 0),
		creator: AppointmentCreator {
			id: CounselorId::new(creator_id),
			first_name: row.get("creator_first_name"),
			last_name: row.get("creator_last_name"),
		},
		agency_id: agency_id.map(AgencyId::new),
		closed_at: closed_at.map(|d| parse_date(&id, &d)).transpose()?,
		max_participants: max_participants
			.map(|m| to_u32(&id, "max_participants", m))
			.transpose()?,
		id: AppointmentId::new(id),
	})
}

#[async_trait]
impl AppointmentRepository for SqliteAppointmentRepository {
	async fn get(&self, id: &AppointmentId) -> Result<Option<Appointment>, RepositoryError> {
		Ok(self.get_appointment(id).await?)
	}
}
