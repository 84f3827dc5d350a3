// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::{Deserialize, Serialize};

use crate::types::{AgencyId, CounselorId, Organization};

/// A counselor as seen by the authorization layer.
///
/// Agency membership lives here: a counselor belongs to at most one agency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counselor {
	pub id: CounselorId,
	pub organization: Organization,
	pub agency_id: Option<AgencyId>,
	pub first_name: String,
	pub last_name: String,
}

impl Counselor {
	pub fn new(id: impl Into<CounselorId>, organization: Organization) -> Self {
		Self {
			id: id.into(),
			organization,
			agency_id: None,
			first_name: String::new(),
			last_name: String::new(),
		}
	}

	pub fn with_agency(mut self, agency_id: impl Into<AgencyId>) -> Self {
		self.agency_id = Some(agency_id.into());
		self
	}

	pub fn with_name(mut self, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
		self.first_name = first_name.into();
		self.last_name = last_name.into();
		self
	}

	/// True when both counselors have an agency and it is the same one.
	pub fn shares_agency_with(&self, other: &Counselor) -> bool {
		match (&self.agency_id, &other.agency_id) {
			(Some(a), Some(b)) => !a.is_blank() && a == b,
			_ => false,
		}
	}
}
