// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use crate::appointment::Appointment;
use crate::beneficiary::Beneficiary;
use crate::types::CounselorId;

/// Ownership by direct relationship match.
pub trait OwnershipResolver: Send + Sync {
	/// True iff `counselor_id` is the beneficiary's current counselor.
	fn owns_beneficiary(&self, counselor_id: &CounselorId, beneficiary: &Beneficiary) -> bool;

	/// True iff `counselor_id` created the appointment or counsels one of its
	/// participants.
	fn owns_appointment(&self, counselor_id: &CounselorId, appointment: &Appointment) -> bool;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DirectOwnership;

impl OwnershipResolver for DirectOwnership {
	fn owns_beneficiary(&self, counselor_id: &CounselorId, beneficiary: &Beneficiary) -> bool {
		!counselor_id.is_blank() && beneficiary.current_counselor_id.as_ref() == Some(counselor_id)
	}

	fn owns_appointment(&self, counselor_id: &CounselorId, appointment: &Appointment) -> bool {
		if counselor_id.is_blank() {
			return false;
		}
		appointment.creator_id() == counselor_id
			|| appointment
				.participants
				.iter()
				.any(|p| p.is_counseled_by(counselor_id))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::fixtures;
	use crate::types::Organization;

	#[test]
	fn current_counselor_owns_beneficiary() {
		let b = Beneficiary::new("b1", Organization::Milo).with_counselor("c1");
		assert!(DirectOwnership.owns_beneficiary(&CounselorId::new("c1"), &b));
		assert!(!DirectOwnership.owns_beneficiary(&CounselorId::new("c2"), &b));
	}

	#[test]
	fn previous_counselor_does_not_own() {
		let b = Beneficiary::new("b1", Organization::Milo)
			.with_counselor("c2")
			.with_previous_counselor("c1");
		assert!(!DirectOwnership.owns_beneficiary(&CounselorId::new("c1"), &b));
	}

	#[test]
	fn unassigned_beneficiary_is_owned_by_nobody() {
		let b = Beneficiary::new("b1", Organization::Milo);
		assert!(!DirectOwnership.owns_beneficiary(&CounselorId::new("c1"), &b));
		assert!(!DirectOwnership.owns_beneficiary(&CounselorId::new(""), &b));
	}

	#[test]
	fn creator_and_participant_counselors_own_appointment() {
		let mut appointment = fixtures::individual_appointment("rdv1", "c1");
		appointment.participants =
			vec![crate::appointment::AppointmentParticipant::new("b1").with_counselor("c2", None)];

		assert!(DirectOwnership.owns_appointment(&CounselorId::new("c1"), &appointment));
		assert!(DirectOwnership.owns_appointment(&CounselorId::new("c2"), &appointment));
		assert!(!DirectOwnership.owns_appointment(&CounselorId::new("c3"), &appointment));
	}
}
