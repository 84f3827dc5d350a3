// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Appointments, individual or collective.
//!
//! The [`AppointmentType`] decides the [`AppointmentKind`]: workshops and
//! group information sessions are collective events scoped to the creating
//! counselor's agency, everything else is an individual appointment between a
//! counselor and their beneficiaries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::types::{AgencyId, AppointmentId, BeneficiaryId, CounselorId, UnknownCodeError};

/// Authorization regime of an appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentKind {
	Individual,
	Collective,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppointmentType {
	#[serde(rename = "ACTIVITE_EXTERIEURES")]
	ExternalActivity,
	#[serde(rename = "ATELIER")]
	Workshop,
	#[default]
	#[serde(rename = "ENTRETIEN_INDIVIDUEL_CONSEILLER")]
	CounselorInterview,
	#[serde(rename = "ENTRETIEN_PARTENAIRE")]
	PartnerInterview,
	#[serde(rename = "INFORMATION_COLLECTIVE")]
	GroupInformation,
	#[serde(rename = "VISITE")]
	Visit,
	#[serde(rename = "PRESTATION")]
	Service,
	#[serde(rename = "AUTRE")]
	Other,
}

impl AppointmentType {
	pub fn all() -> &'static [AppointmentType] {
		&[
			AppointmentType::ExternalActivity,
			AppointmentType::Workshop,
			AppointmentType::CounselorInterview,
			AppointmentType::PartnerInterview,
			AppointmentType::GroupInformation,
			AppointmentType::Visit,
			AppointmentType::Service,
			AppointmentType::Other,
		]
	}

	pub fn code(&self) -> &'static str {
		match self {
			AppointmentType::ExternalActivity => "ACTIVITE_EXTERIEURES",
			AppointmentType::Workshop => "ATELIER",
			AppointmentType::CounselorInterview => "ENTRETIEN_INDIVIDUEL_CONSEILLER",
			AppointmentType::PartnerInterview => "ENTRETIEN_PARTENAIRE",
			AppointmentType::GroupInformation => "INFORMATION_COLLECTIVE",
			AppointmentType::Visit => "VISITE",
			AppointmentType::Service => "PRESTATION",
			AppointmentType::Other => "AUTRE",
		}
	}

	pub fn kind(&self) -> AppointmentKind {
		match self {
			AppointmentType::Workshop | AppointmentType::GroupInformation => {
				AppointmentKind::Collective
			}
			_ => AppointmentKind::Individual,
		}
	}

	/// The single-counselor individual type, where the counselor must attend.
	pub fn requires_counselor_presence(&self) -> bool {
		matches!(self, AppointmentType::CounselorInterview)
	}
}

impl fmt::Display for AppointmentType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.code())
	}
}

impl FromStr for AppointmentType {
	type Err = UnknownCodeError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		AppointmentType::all()
			.iter()
			.copied()
			.find(|t| t.code() == s)
			.ok_or_else(|| UnknownCodeError {
				kind: "appointment type",
				code: s.to_string(),
			})
	}
}

/// A participant with their counselor relationship preloaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentParticipant {
	pub beneficiary_id: BeneficiaryId,
	pub counselor_id: Option<CounselorId>,
	pub counselor_agency_id: Option<AgencyId>,
	/// Attendance, recorded when a collective appointment is closed.
	pub present: Option<bool>,
}

impl AppointmentParticipant {
	pub fn new(beneficiary_id: impl Into<BeneficiaryId>) -> Self {
		Self {
			beneficiary_id: beneficiary_id.into(),
			counselor_id: None,
			counselor_agency_id: None,
			present: None,
		}
	}

	pub fn with_counselor(
		mut self,
		counselor_id: impl Into<CounselorId>,
		agency_id: Option<AgencyId>,
	) -> Self {
		self.counselor_id = Some(counselor_id.into());
		self.counselor_agency_id = agency_id;
		self
	}

	pub fn is_counseled_by(&self, counselor_id: &CounselorId) -> bool {
		!counselor_id.is_blank() && self.counselor_id.as_ref() == Some(counselor_id)
	}

	pub fn is_in_agency(&self, agency_id: &AgencyId) -> bool {
		!agency_id.is_blank() && self.counselor_agency_id.as_ref() == Some(agency_id)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentCreator {
	pub id: CounselorId,
	pub first_name: String,
	pub last_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
	Scheduled,
	Closed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
	pub id: AppointmentId,
	pub appointment_type: AppointmentType,
	pub title: String,
	pub subtitle: String,
	pub comment: Option<String>,
	pub modality: Option<String>,
	pub date: DateTime<Utc>,
	pub duration_minutes: u32,
	pub participants: Vec<AppointmentParticipant>,
	pub precision: Option<String>,
	pub address: Option<String>,
	pub organizer: Option<String>,
	pub counselor_present: bool,
	pub invitation: Option<bool>,
	pub creator: AppointmentCreator,
	/// Set for collective appointments; legacy collective rows may lack it.
	pub agency_id: Option<AgencyId>,
	pub closed_at: Option<DateTime<Utc>>,
	pub max_participants: Option<u32>,
}

impl Appointment {
	pub fn kind(&self) -> AppointmentKind {
		self.appointment_type.kind()
	}

	pub fn is_collective(&self) -> bool {
		self.kind() == AppointmentKind::Collective
	}

	pub fn is_closed(&self) -> bool {
		self.closed_at.is_some()
	}

	pub fn status(&self) -> AppointmentStatus {
		if self.is_closed() {
			AppointmentStatus::Closed
		} else {
			AppointmentStatus::Scheduled
		}
	}

	pub fn creator_id(&self) -> &CounselorId {
		&self.creator.id
	}

	pub fn participant_ids(&self) -> BTreeSet<BeneficiaryId> {
		self
			.participants
			.iter()
			.map(|p| p.beneficiary_id.clone())
			.collect()
	}

	pub fn has_participant(&self, beneficiary_id: &BeneficiaryId) -> bool {
		!beneficiary_id.is_blank()
			&& self
				.participants
				.iter()
				.any(|p| &p.beneficiary_id == beneficiary_id)
	}

	/// The agency a collective appointment is scoped to, ignoring blank values.
	pub fn scoped_agency(&self) -> Option<&AgencyId> {
		if !self.is_collective() {
			return None;
		}
		self.agency_id.as_ref().filter(|id| !id.is_blank())
	}
}

/// Inputs for a new appointment, before the creation rules run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AppointmentDraft {
	/// Raw type code. `None` means a counselor interview.
	pub appointment_type: Option<String>,
	pub title: Option<String>,
	pub comment: Option<String>,
	pub modality: Option<String>,
	pub date: DateTime<Utc>,
	pub duration_minutes: u32,
	pub precision: Option<String>,
	pub address: Option<String>,
	pub organizer: Option<String>,
	pub counselor_present: Option<bool>,
	pub invitation: Option<bool>,
	pub max_participants: Option<u32>,
}

/// Replacement values for an existing appointment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentChanges {
	pub comment: Option<String>,
	pub date: DateTime<Utc>,
	pub duration_minutes: u32,
	pub modality: Option<String>,
	pub participants: Vec<AppointmentParticipant>,
	pub address: Option<String>,
	pub organizer: Option<String>,
	pub counselor_present: bool,
	pub max_participants: Option<u32>,
}

impl AppointmentChanges {
	/// Changes that keep every field of `appointment` as it is.
	pub fn from_appointment(appointment: &Appointment) -> Self {
		Self {
			comment: appointment.comment.clone(),
			date: appointment.date,
			duration_minutes: appointment.duration_minutes,
			modality: appointment.modality.clone(),
			participants: appointment.participants.clone(),
			address: appointment.address.clone(),
			organizer: appointment.organizer.clone(),
			counselor_present: appointment.counselor_present,
			max_participants: appointment.max_participants,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn collective_types() {
		let collective: Vec<_> = AppointmentType::all()
			.iter()
			.filter(|t| t.kind() == AppointmentKind::Collective)
			.collect();
		assert_eq!(
			collective,
			vec![&AppointmentType::Workshop, &AppointmentType::GroupInformation]
		);
	}

	#[test]
	fn type_codes_roundtrip_through_serde() {
		for t in AppointmentType::all() {
			let json = serde_json::to_string(t).unwrap();
			assert_eq!(json, format!("\"{}\"", t.code()));
			assert_eq!(t.code().parse::<AppointmentType>().unwrap(), *t);
		}
	}

	#[test]
	fn unknown_type_code_is_rejected() {
		assert!("RDV".parse::<AppointmentType>().is_err());
		assert!("".parse::<AppointmentType>().is_err());
		assert!("atelier".parse::<AppointmentType>().is_err());
	}

	#[test]
	fn default_type_is_counselor_interview() {
		assert_eq!(AppointmentType::default(), AppointmentType::CounselorInterview);
		assert!(AppointmentType::default().requires_counselor_presence());
	}

	#[test]
	fn blank_ids_never_match_participants() {
		let p = AppointmentParticipant::new("b1").with_counselor("", Some(AgencyId::new("")));
		assert!(!p.is_counseled_by(&CounselorId::new("")));
		assert!(!p.is_in_agency(&AgencyId::new("")));
	}
}
