// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use thiserror::Error;

use crate::types::{AgencyId, BeneficiaryId, CounselorId};

/// Errors surfaced to use-case handlers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthzError {
	#[error("insufficient rights")]
	InsufficientRights,

	#[error("resource not found")]
	NotFound,

	#[error("invalid appointment: {0}")]
	InvalidAppointmentRule(#[from] AppointmentRuleError),
}

/// A violated appointment creation, update or closure rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppointmentRuleError {
	#[error("unrecognized appointment type '{0}'")]
	UnrecognizedType(String),

	#[error("counselor {counselor_id} has no agency")]
	CounselorWithoutAgency { counselor_id: CounselorId },

	#[error("beneficiary {beneficiary_id} is not linked to agency {agency_id}")]
	BeneficiaryNotLinkedToAgency {
		beneficiary_id: BeneficiaryId,
		agency_id: AgencyId,
	},

	#[error("beneficiary {beneficiary_id} is not linked to counselor {counselor_id}")]
	BeneficiaryNotLinkedToCounselor {
		counselor_id: CounselorId,
		beneficiary_id: BeneficiaryId,
	},

	#[error("capacity of {max_participants} exceeded by {participants} participants")]
	CapacityExceeded {
		max_participants: u32,
		participants: usize,
	},

	#[error("participant capacity is only allowed on collective appointments")]
	CapacityNotAllowedForIndividual,

	#[error("a closed collective appointment can no longer be modified")]
	ClosedAppointment,

	#[error("at least one beneficiary is required")]
	EmptyParticipants,

	#[error("counselor presence cannot be turned off for a counselor interview")]
	CounselorPresenceRequired,

	#[error("only collective appointments can be closed")]
	NotCollective,

	#[error("the appointment has not taken place yet")]
	NotYetHeld,

	#[error("beneficiary {beneficiary_id} is not a participant")]
	AttendeeNotParticipant { beneficiary_id: BeneficiaryId },
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn rule_errors_convert_into_authz_error() {
		let err: AuthzError = AppointmentRuleError::ClosedAppointment.into();
		assert_eq!(
			err,
			AuthzError::InvalidAppointmentRule(AppointmentRuleError::ClosedAppointment)
		);
		assert_eq!(
			err.to_string(),
			"invalid appointment: a closed collective appointment can no longer be modified"
		);
	}

	#[test]
	fn capacity_message_names_both_numbers() {
		let err = AppointmentRuleError::CapacityExceeded {
			max_participants: 2,
			participants: 3,
		};
		assert_eq!(err.to_string(), "capacity of 2 exceeded by 3 participants");
	}
}
