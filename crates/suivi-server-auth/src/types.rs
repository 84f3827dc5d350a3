// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core type definitions shared by the authorization engine.
//!
//! - **ID newtypes**: Type-safe wrappers around the opaque string identifiers
//!   used by the platform ([`CounselorId`], [`BeneficiaryId`], [`AgencyId`],
//!   [`AppointmentId`], [`ActionId`], [`ActorId`]) preventing accidental mixing
//! - **Organizations**: The partner programs a counselor or beneficiary
//!   belongs to ([`Organization`])
//! - **Roles**: Escalations carried by an authenticated actor ([`Role`])
//!
//! IDs serialize transparently as strings. An ID that is empty or only
//! whitespace is *blank*; blank IDs never match anything.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// =============================================================================
// ID Newtypes
// =============================================================================

macro_rules! define_id_type {
	($name:ident, $doc:expr) => {
		#[doc = $doc]
		#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name(String);

		impl $name {
			/// Create an ID from its string form.
			pub fn new(id: impl Into<String>) -> Self {
				Self(id.into())
			}

			/// Generate a new random ID.
			pub fn generate() -> Self {
				Self(Uuid::new_v4().to_string())
			}

			/// Borrow the string form.
			pub fn as_str(&self) -> &str {
				&self.0
			}

			/// Returns true for an empty or whitespace-only ID.
			pub fn is_blank(&self) -> bool {
				self.0.trim().is_empty()
			}

			/// Get the inner string value.
			pub fn into_inner(self) -> String {
				self.0
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				f.write_str(&self.0)
			}
		}

		impl From<&str> for $name {
			fn from(id: &str) -> Self {
				Self(id.to_string())
			}
		}

		impl From<String> for $name {
			fn from(id: String) -> Self {
				Self(id)
			}
		}
	};
}

define_id_type!(ActorId, "Identifier of an authenticated actor.");
define_id_type!(CounselorId, "Unique identifier for a counselor.");
define_id_type!(BeneficiaryId, "Unique identifier for a beneficiary.");
define_id_type!(AgencyId, "Unique identifier for an agency.");
define_id_type!(AppointmentId, "Unique identifier for an appointment.");
define_id_type!(ActionId, "Unique identifier for an action on a beneficiary's plan.");

/// Error returned when a wire code does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} code '{code}'")]
pub struct UnknownCodeError {
	pub kind: &'static str,
	pub code: String,
}

// =============================================================================
// Organizations
// =============================================================================

/// Partner program an actor, counselor or beneficiary belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Organization {
	Milo,
	PassEmploi,
	PoleEmploi,
	PoleEmploiBrsa,
	PoleEmploiAij,
	ConseilDept,
	AvenirPro,
}

impl Organization {
	/// Returns all known organizations.
	pub fn all() -> &'static [Organization] {
		&[
			Organization::Milo,
			Organization::PassEmploi,
			Organization::PoleEmploi,
			Organization::PoleEmploiBrsa,
			Organization::PoleEmploiAij,
			Organization::ConseilDept,
			Organization::AvenirPro,
		]
	}

	/// Wire code of the organization.
	pub fn code(&self) -> &'static str {
		match self {
			Organization::Milo => "MILO",
			Organization::PassEmploi => "PASS_EMPLOI",
			Organization::PoleEmploi => "POLE_EMPLOI",
			Organization::PoleEmploiBrsa => "POLE_EMPLOI_BRSA",
			Organization::PoleEmploiAij => "POLE_EMPLOI_AIJ",
			Organization::ConseilDept => "CONSEIL_DEPT",
			Organization::AvenirPro => "AVENIR_PRO",
		}
	}
}

impl fmt::Display for Organization {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.code())
	}
}

impl FromStr for Organization {
	type Err = UnknownCodeError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let code = s.trim();
		Organization::all()
			.iter()
			.copied()
			.find(|org| org.code() == code)
			.ok_or_else(|| UnknownCodeError {
				kind: "organization",
				code: s.to_string(),
			})
	}
}

// =============================================================================
// Roles
// =============================================================================

/// Role escalations an actor may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
	/// Manages the counselors of an agency.
	Supervisor,
}

impl fmt::Display for Role {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Role::Supervisor => write!(f, "SUPERVISOR"),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn blank_ids_are_detected() {
		assert!(CounselorId::new("").is_blank());
		assert!(CounselorId::new("  \t").is_blank());
		assert!(!CounselorId::new("c1").is_blank());
	}

	#[test]
	fn generated_ids_are_unique() {
		assert_ne!(AppointmentId::generate(), AppointmentId::generate());
	}

	#[test]
	fn id_serializes_transparently() {
		let id = BeneficiaryId::new("b1");
		assert_eq!(serde_json::to_string(&id).unwrap(), "\"b1\"");
	}

	#[test]
	fn organization_codes_roundtrip() {
		for org in Organization::all() {
			assert_eq!(org.code().parse::<Organization>().unwrap(), *org);
		}
	}

	#[test]
	fn organization_serde_matches_code() {
		for org in Organization::all() {
			let json = serde_json::to_string(org).unwrap();
			assert_eq!(json, format!("\"{}\"", org.code()));
		}
	}

	#[test]
	fn unknown_organization_is_rejected() {
		let err = "MILO_LEGACY".parse::<Organization>().unwrap_err();
		assert_eq!(err.kind, "organization");
		assert_eq!(err.code, "MILO_LEGACY");
	}
}
