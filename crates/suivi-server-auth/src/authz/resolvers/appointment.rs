// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Appointment access regimes.
//!
//! | regime | counselor | beneficiary |
//! |---|---|---|
//! | individual | counsels a participant | is a participant |
//! | collective with agency | same agency, counsels a participant, or (inter-agency) shares an agency with a participant's counselor | their counselor is in the agency |
//! | collective without agency | individual rules when the legacy fallback is on, otherwise nobody | same |

use crate::appointment::{Appointment, AppointmentKind};
use crate::counselor::Counselor;
use crate::types::{AgencyId, BeneficiaryId};

pub trait AppointmentScopeResolver: Send + Sync {
	/// Whether `counselor` may access `appointment`. `inter_agency` tells if the
	/// counselor's organization allows agency-wide access.
	fn counselor_may_access(
		&self,
		counselor: &Counselor,
		appointment: &Appointment,
		inter_agency: bool,
	) -> bool;

	/// Whether a beneficiary, whose counselor belongs to `counselor_agency`,
	/// may access `appointment`.
	fn beneficiary_may_access(
		&self,
		beneficiary_id: &BeneficiaryId,
		counselor_agency: Option<&AgencyId>,
		appointment: &Appointment,
	) -> bool;
}

enum Regime<'a> {
	Individual,
	Collective(&'a AgencyId),
	LegacyCollective,
}

fn regime(appointment: &Appointment) -> Regime<'_> {
	match appointment.kind() {
		AppointmentKind::Individual => Regime::Individual,
		AppointmentKind::Collective => match appointment.scoped_agency() {
			Some(agency_id) => Regime::Collective(agency_id),
			None => Regime::LegacyCollective,
		},
	}
}

#[derive(Debug, Clone, Copy)]
pub struct AppointmentScope {
	legacy_collective_fallback: bool,
}

impl AppointmentScope {
	pub fn new(legacy_collective_fallback: bool) -> Self {
		Self {
			legacy_collective_fallback,
		}
	}
}

impl Default for AppointmentScope {
	fn default() -> Self {
		Self::new(true)
	}
}

fn counsels_participant(counselor: &Counselor, appointment: &Appointment) -> bool {
	appointment
		.participants
		.iter()
		.any(|p| p.is_counseled_by(&counselor.id))
}

impl AppointmentScopeResolver for AppointmentScope {
	fn counselor_may_access(
		&self,
		counselor: &Counselor,
		appointment: &Appointment,
		inter_agency: bool,
	) -> bool {
		match regime(appointment) {
			Regime::Individual => counsels_participant(counselor, appointment),
			Regime::LegacyCollective => {
				self.legacy_collective_fallback && counsels_participant(counselor, appointment)
			}
			Regime::Collective(agency_id) => {
				if counselor.agency_id.as_ref() == Some(agency_id) {
					return true;
				}
				if counsels_participant(counselor, appointment) {
					return true;
				}
				match (&counselor.agency_id, inter_agency) {
					(Some(own_agency), true) => appointment
						.participants
						.iter()
						.any(|p| p.is_in_agency(own_agency)),
					_ => false,
				}
			}
		}
	}

	fn beneficiary_may_access(
		&self,
		beneficiary_id: &BeneficiaryId,
		counselor_agency: Option<&AgencyId>,
		appointment: &Appointment,
	) -> bool {
		match regime(appointment) {
			Regime::Individual => appointment.has_participant(beneficiary_id),
			Regime::LegacyCollective => {
				self.legacy_collective_fallback && appointment.has_participant(beneficiary_id)
			}
			Regime::Collective(agency_id) => counselor_agency == Some(agency_id),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::appointment::AppointmentParticipant;
	use crate::testing::fixtures;
	use crate::types::Organization;

	fn counselor(id: &str, agency: Option<&str>) -> Counselor {
		let c = Counselor::new(id, Organization::Milo);
		match agency {
			Some(a) => c.with_agency(a),
			None => c,
		}
	}

	mod individual {
		use super::*;

		#[test]
		fn counselor_of_participant_is_authorized() {
			let mut rdv = fixtures::individual_appointment("rdv1", "c9");
			rdv.participants = vec![AppointmentParticipant::new("b1").with_counselor("c1", None)];
			let scope = AppointmentScope::default();

			assert!(scope.counselor_may_access(&counselor("c1", None), &rdv, false));
			assert!(!scope.counselor_may_access(&counselor("c2", Some("a1")), &rdv, true));
		}

		#[test]
		fn creator_alone_is_not_enough() {
			let rdv = fixtures::individual_appointment("rdv1", "c1");
			let scope = AppointmentScope::default();
			assert!(!scope.counselor_may_access(&counselor("c1", None), &rdv, true));
		}

		#[test]
		fn beneficiary_must_be_participant() {
			let mut rdv = fixtures::individual_appointment("rdv1", "c1");
			rdv.participants = vec![AppointmentParticipant::new("b1")];
			let scope = AppointmentScope::default();

			assert!(scope.beneficiary_may_access(&"b1".into(), None, &rdv));
			assert!(!scope.beneficiary_may_access(&"b2".into(), None, &rdv));
		}
	}

	mod collective {
		use super::*;

		#[test]
		fn same_agency_counselor_is_authorized() {
			let rdv = fixtures::collective_appointment("rdv1", "c9", Some("a1"));
			let scope = AppointmentScope::default();

			assert!(scope.counselor_may_access(&counselor("c1", Some("a1")), &rdv, false));
			assert!(!scope.counselor_may_access(&counselor("c2", Some("a2")), &rdv, false));
			assert!(!scope.counselor_may_access(&counselor("c3", None), &rdv, true));
		}

		#[test]
		fn counselor_of_participant_from_other_agency_is_authorized() {
			let mut rdv = fixtures::collective_appointment("rdv1", "c9", Some("a1"));
			rdv.participants = vec![AppointmentParticipant::new("b1")
				.with_counselor("c2", Some(AgencyId::new("a2")))];
			let scope = AppointmentScope::default();

			assert!(scope.counselor_may_access(&counselor("c2", Some("a2")), &rdv, false));
		}

		#[test]
		fn inter_agency_colleague_of_participant_counselor() {
			let mut rdv = fixtures::collective_appointment("rdv1", "c9", Some("a1"));
			rdv.participants = vec![AppointmentParticipant::new("b1")
				.with_counselor("c2", Some(AgencyId::new("a2")))];
			let scope = AppointmentScope::default();
			let colleague = counselor("c3", Some("a2"));

			assert!(scope.counselor_may_access(&colleague, &rdv, true));
			assert!(!scope.counselor_may_access(&colleague, &rdv, false));
		}

		#[test]
		fn beneficiary_needs_counselor_in_agency() {
			let mut rdv = fixtures::collective_appointment("rdv1", "c9", Some("a1"));
			rdv.participants = vec![AppointmentParticipant::new("b1")];
			let scope = AppointmentScope::default();
			let a1 = AgencyId::new("a1");
			let a2 = AgencyId::new("a2");

			assert!(scope.beneficiary_may_access(&"b2".into(), Some(&a1), &rdv));
			assert!(!scope.beneficiary_may_access(&"b1".into(), Some(&a2), &rdv));
			assert!(!scope.beneficiary_may_access(&"b1".into(), None, &rdv));
		}
	}

	mod legacy_collective {
		use super::*;

		fn legacy() -> Appointment {
			let mut rdv = fixtures::collective_appointment("rdv1", "c9", None);
			rdv.participants = vec![AppointmentParticipant::new("b1")
				.with_counselor("c1", Some(AgencyId::new("a1")))];
			rdv
		}

		#[test]
		fn degrades_to_participant_check() {
			let scope = AppointmentScope::new(true);
			let rdv = legacy();

			assert!(scope.counselor_may_access(&counselor("c1", Some("a1")), &rdv, true));
			assert!(!scope.counselor_may_access(&counselor("c2", Some("a1")), &rdv, true));
			assert!(scope.beneficiary_may_access(&"b1".into(), None, &rdv));
			assert!(!scope.beneficiary_may_access(&"b2".into(), None, &rdv));
		}

		#[test]
		fn denies_everyone_without_fallback() {
			let scope = AppointmentScope::new(false);
			let rdv = legacy();

			assert!(!scope.counselor_may_access(&counselor("c1", Some("a1")), &rdv, true));
			assert!(!scope.beneficiary_may_access(&"b1".into(), Some(&AgencyId::new("a1")), &rdv));
		}

		#[test]
		fn blank_agency_counts_as_legacy() {
			let mut rdv = legacy();
			rdv.agency_id = Some(AgencyId::new(""));
			let scope = AppointmentScope::new(false);

			assert!(!scope.counselor_may_access(&counselor("c1", Some("")), &rdv, true));
		}
	}
}
