// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Appointment creation, update and closure rules.
//!
//! These run on write paths after authorization succeeded, against freshly
//! loaded entities. They never consult an earlier authorization decision.
//!
//! # Collective appointments
//!
//! - The creating counselor must belong to an agency; the appointment is
//!   scoped to it
//! - Every initial participant's counselor must belong to that agency
//! - `max_participants`, when set, must cover the participant count
//! - Closing needs the appointment to have taken place and records who
//!   attended; once closed, no update is accepted
//!
//! # Individual appointments
//!
//! - Every participant must be counseled by the creator
//! - `max_participants` is rejected
//! - An update keeps at least one participant
//! - A counselor interview keeps the counselor present

use std::collections::BTreeSet;
use tracing::{debug, instrument};

use crate::appointment::{
	Appointment, AppointmentChanges, AppointmentCreator, AppointmentDraft, AppointmentKind,
	AppointmentParticipant, AppointmentType,
};
use crate::clock::Clock;
use crate::counselor::Counselor;
use crate::error::AppointmentRuleError;
use crate::types::{AppointmentId, BeneficiaryId};

const DEFAULT_TITLE: &str = "Rendez-vous conseiller";

#[derive(Debug, Clone, Copy, Default)]
pub struct AppointmentRules;

impl AppointmentRules {
	pub fn new() -> Self {
		Self
	}

	/// Builds a new appointment from `draft` created by `creator`.
	#[instrument(
        level = "debug",
        skip(self, draft, participants, creator),
        fields(counselor_id = %creator.id, participants = participants.len())
    )]
	pub fn validate_create(
		&self,
		draft: AppointmentDraft,
		participants: &[AppointmentParticipant],
		creator: &Counselor,
	) -> Result<Appointment, AppointmentRuleError> {
		let appointment_type = match draft.appointment_type.as_deref() {
			None => AppointmentType::default(),
			Some(code) => code
				.parse::<AppointmentType>()
				.map_err(|_| AppointmentRuleError::UnrecognizedType(code.to_string()))?,
		};
		let participants = distinct_participants(participants);

		let agency_id = match appointment_type.kind() {
			AppointmentKind::Collective => {
				let agency_id = creator
					.agency_id
					.clone()
					.filter(|id| !id.is_blank())
					.ok_or_else(|| AppointmentRuleError::CounselorWithoutAgency {
						counselor_id: creator.id.clone(),
					})?;
				if let Some(outsider) = participants.iter().find(|p| !p.is_in_agency(&agency_id)) {
					return Err(AppointmentRuleError::BeneficiaryNotLinkedToAgency {
						beneficiary_id: outsider.beneficiary_id.clone(),
						agency_id,
					});
				}
				check_capacity(draft.max_participants, participants.len())?;
				Some(agency_id)
			}
			AppointmentKind::Individual => {
				if draft.max_participants.is_some() {
					return Err(AppointmentRuleError::CapacityNotAllowedForIndividual);
				}
				if let Some(outsider) = participants.iter().find(|p| !p.is_counseled_by(&creator.id)) {
					return Err(AppointmentRuleError::BeneficiaryNotLinkedToCounselor {
						counselor_id: creator.id.clone(),
						beneficiary_id: outsider.beneficiary_id.clone(),
					});
				}
				None
			}
		};

		let appointment = Appointment {
			id: AppointmentId::generate(),
			appointment_type,
			title: draft.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
			subtitle: format!("avec {}", creator.first_name),
			comment: draft.comment,
			modality: draft.modality,
			date: draft.date,
			duration_minutes: draft.duration_minutes,
			participants,
			precision: draft.precision,
			address: draft.address,
			organizer: draft.organizer,
			counselor_present: draft.counselor_present.unwrap_or(true),
			invitation: draft.invitation,
			creator: AppointmentCreator {
				id: creator.id.clone(),
				first_name: creator.first_name.clone(),
				last_name: creator.last_name.clone(),
			},
			agency_id,
			closed_at: None,
			max_participants: draft.max_participants,
		};
		debug!(appointment_id = %appointment.id, kind = ?appointment.kind(), "appointment created");
		Ok(appointment)
	}

	/// Applies `changes` to `existing`.
	#[instrument(
        level = "debug",
        skip(self, existing, changes),
        fields(appointment_id = %existing.id, kind = ?existing.kind())
    )]
	pub fn validate_update(
		&self,
		existing: &Appointment,
		changes: AppointmentChanges,
	) -> Result<Appointment, AppointmentRuleError> {
		let participants = distinct_participants(&changes.participants);

		match existing.kind() {
			AppointmentKind::Collective => {
				if existing.is_closed() {
					return Err(AppointmentRuleError::ClosedAppointment);
				}
				check_capacity(changes.max_participants, participants.len())?;
			}
			AppointmentKind::Individual => {
				if participants.is_empty() {
					return Err(AppointmentRuleError::EmptyParticipants);
				}
				if !changes.counselor_present && existing.appointment_type.requires_counselor_presence()
				{
					return Err(AppointmentRuleError::CounselorPresenceRequired);
				}
				if changes.max_participants.is_some() {
					return Err(AppointmentRuleError::CapacityNotAllowedForIndividual);
				}
			}
		}

		Ok(Appointment {
			comment: changes.comment,
			date: changes.date,
			duration_minutes: changes.duration_minutes,
			modality: changes.modality,
			participants,
			address: changes.address,
			organizer: changes.organizer,
			counselor_present: changes.counselor_present,
			max_participants: changes.max_participants,
			..existing.clone()
		})
	}

	/// Closes a collective appointment at `clock.now()` and records which
	/// participants attended.
	#[instrument(
        level = "debug",
        skip(self, existing, attendees, clock),
        fields(appointment_id = %existing.id, attendees = attendees.len())
    )]
	pub fn validate_close(
		&self,
		existing: &Appointment,
		attendees: &[BeneficiaryId],
		clock: &dyn Clock,
	) -> Result<Appointment, AppointmentRuleError> {
		if !existing.is_collective() {
			return Err(AppointmentRuleError::NotCollective);
		}
		if existing.is_closed() {
			return Err(AppointmentRuleError::ClosedAppointment);
		}
		let now = clock.now();
		if existing.date > now {
			return Err(AppointmentRuleError::NotYetHeld);
		}
		if let Some(stranger) = attendees.iter().find(|id| !existing.has_participant(id)) {
			return Err(AppointmentRuleError::AttendeeNotParticipant {
				beneficiary_id: stranger.clone(),
			});
		}

		let participants = existing
			.participants
			.iter()
			.map(|p| AppointmentParticipant {
				present: Some(attendees.contains(&p.beneficiary_id)),
				..p.clone()
			})
			.collect();
		Ok(Appointment {
			participants,
			closed_at: Some(now),
			..existing.clone()
		})
	}
}

/// Participants with repeated beneficiaries dropped, first occurrence kept.
fn distinct_participants(participants: &[AppointmentParticipant]) -> Vec<AppointmentParticipant> {
	let mut seen = BTreeSet::new();
	participants
		.iter()
		.filter(|p| seen.insert(p.beneficiary_id.clone()))
		.cloned()
		.collect()
}

fn check_capacity(max_participants: Option<u32>, participants: usize) -> Result<(), AppointmentRuleError> {
	match max_participants {
		Some(max) if (max as usize) < participants => Err(AppointmentRuleError::CapacityExceeded {
			max_participants: max,
			participants,
		}),
		_ => Ok(()),
	}
}
