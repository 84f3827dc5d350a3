// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::{Deserialize, Serialize};

use crate::types::{ActionId, BeneficiaryId};

/// An action on a beneficiary's plan, reduced to the link policies need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
	pub id: ActionId,
	pub beneficiary_id: BeneficiaryId,
}

impl Action {
	pub fn new(id: impl Into<ActionId>, beneficiary_id: impl Into<BeneficiaryId>) -> Self {
		Self {
			id: id.into(),
			beneficiary_id: beneficiary_id.into(),
		}
	}
}
