// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The authenticated principal making a request.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::types::{ActorId, BeneficiaryId, CounselorId, Organization, Role};

/// Which side of the counseling relationship the actor is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActorKind {
	Counselor,
	Beneficiary,
}

/// Authenticated actor. Immutable for the duration of a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
	pub id: ActorId,
	pub kind: ActorKind,
	pub organization: Organization,
	#[serde(default)]
	pub roles: BTreeSet<Role>,
}

impl Actor {
	pub fn counselor(id: impl Into<ActorId>, organization: Organization) -> Self {
		Self {
			id: id.into(),
			kind: ActorKind::Counselor,
			organization,
			roles: BTreeSet::new(),
		}
	}

	pub fn beneficiary(id: impl Into<ActorId>, organization: Organization) -> Self {
		Self {
			id: id.into(),
			kind: ActorKind::Beneficiary,
			organization,
			roles: BTreeSet::new(),
		}
	}

	pub fn with_role(mut self, role: Role) -> Self {
		self.roles.insert(role);
		self
	}

	pub fn has_role(&self, role: Role) -> bool {
		self.roles.contains(&role)
	}

	/// The counselor this actor acts as, if it is a counselor with a usable id.
	pub fn counselor_id(&self) -> Option<CounselorId> {
		match self.kind {
			ActorKind::Counselor if !self.id.is_blank() => Some(CounselorId::new(self.id.as_str())),
			_ => None,
		}
	}

	/// The beneficiary this actor acts as, if it is a beneficiary with a usable id.
	pub fn beneficiary_id(&self) -> Option<BeneficiaryId> {
		match self.kind {
			ActorKind::Beneficiary if !self.id.is_blank() => {
				Some(BeneficiaryId::new(self.id.as_str()))
			}
			_ => None,
		}
	}
}
