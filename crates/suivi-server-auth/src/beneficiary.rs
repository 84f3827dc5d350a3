// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Beneficiaries and their counselor assignment.
//!
//! A beneficiary is assigned to at most one current counselor. During a
//! temporary transfer the counselor who held the file before the transfer is
//! kept as the previous counselor, so they can still act on it and later
//! reclaim it.

use serde::{Deserialize, Serialize};

use crate::types::{BeneficiaryId, CounselorId, Organization};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Beneficiary {
	pub id: BeneficiaryId,
	pub organization: Organization,
	pub current_counselor_id: Option<CounselorId>,
	pub previous_counselor_id: Option<CounselorId>,
	/// Whether the beneficiary lets counselors see their saved favorites.
	#[serde(default)]
	pub shares_favorites: bool,
}

impl Beneficiary {
	pub fn new(id: impl Into<BeneficiaryId>, organization: Organization) -> Self {
		Self {
			id: id.into(),
			organization,
			current_counselor_id: None,
			previous_counselor_id: None,
			shares_favorites: false,
		}
	}

	pub fn with_counselor(mut self, counselor_id: impl Into<CounselorId>) -> Self {
		self.current_counselor_id = Some(counselor_id.into());
		self
	}

	pub fn with_previous_counselor(mut self, counselor_id: impl Into<CounselorId>) -> Self {
		self.previous_counselor_id = Some(counselor_id.into());
		self
	}

	pub fn with_shared_favorites(mut self, shares: bool) -> Self {
		self.shares_favorites = shares;
		self
	}

	pub fn is_temporarily_transferred(&self) -> bool {
		self.previous_counselor_id.is_some()
	}

	/// Moves the beneficiary to `target`.
	///
	/// A temporary transfer remembers the counselor the file came from, unless
	/// an earlier temporary transfer already recorded one. Transferring back to
	/// the remembered counselor, or any definitive transfer, clears it.
	pub fn transfer_to(&mut self, target: CounselorId, temporary: bool) {
		let source = self.current_counselor_id.take();
		let previous = self.previous_counselor_id.take();

		self.previous_counselor_id = if previous.as_ref() == Some(&target) {
			None
		} else if temporary {
			previous.or(source).filter(|id| *id != target)
		} else {
			None
		};
		self.current_counselor_id = Some(target);
	}

	/// Hands the beneficiary back to `counselor` for good.
	pub fn reclaim(&mut self, counselor: CounselorId) {
		self.current_counselor_id = Some(counselor);
		self.previous_counselor_id = None;
	}
}
