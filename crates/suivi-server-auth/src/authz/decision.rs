// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::AuthzError;

/// Why a policy denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
	InsufficientRights,
	/// The resource the policy is about does not exist.
	NotFound,
}

/// Outcome of a policy evaluation. Never cached across requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum AuthorizationDecision {
	Authorized,
	Denied(DenialReason),
}

impl AuthorizationDecision {
	pub fn deny() -> Self {
		AuthorizationDecision::Denied(DenialReason::InsufficientRights)
	}

	pub fn not_found() -> Self {
		AuthorizationDecision::Denied(DenialReason::NotFound)
	}

	/// `Authorized` when `allowed`, otherwise `Denied(InsufficientRights)`.
	pub fn from_bool(allowed: bool) -> Self {
		if allowed {
			AuthorizationDecision::Authorized
		} else {
			Self::deny()
		}
	}

	pub fn is_authorized(&self) -> bool {
		matches!(self, AuthorizationDecision::Authorized)
	}

	pub fn denial_reason(&self) -> Option<DenialReason> {
		match self {
			AuthorizationDecision::Authorized => None,
			AuthorizationDecision::Denied(reason) => Some(*reason),
		}
	}

	pub fn into_result(self) -> Result<(), AuthzError> {
		match self {
			AuthorizationDecision::Authorized => Ok(()),
			AuthorizationDecision::Denied(DenialReason::InsufficientRights) => {
				Err(AuthzError::InsufficientRights)
			}
			AuthorizationDecision::Denied(DenialReason::NotFound) => Err(AuthzError::NotFound),
		}
	}
}

impl fmt::Display for AuthorizationDecision {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			AuthorizationDecision::Authorized => write!(f, "authorized"),
			AuthorizationDecision::Denied(DenialReason::InsufficientRights) => {
				write!(f, "denied: insufficient rights")
			}
			AuthorizationDecision::Denied(DenialReason::NotFound) => write!(f, "denied: not found"),
		}
	}
}
