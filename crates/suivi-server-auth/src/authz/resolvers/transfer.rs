// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use crate::beneficiary::Beneficiary;
use crate::types::CounselorId;

/// Ownership that survives a temporary transfer.
pub trait TransferHistoryResolver: Send + Sync {
	/// True iff `counselor_id` is the current or the previous counselor.
	fn was_owner(&self, counselor_id: &CounselorId, beneficiary: &Beneficiary) -> bool;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TransferHistory;

impl TransferHistoryResolver for TransferHistory {
	fn was_owner(&self, counselor_id: &CounselorId, beneficiary: &Beneficiary) -> bool {
		if counselor_id.is_blank() {
			return false;
		}
		beneficiary.current_counselor_id.as_ref() == Some(counselor_id)
			|| beneficiary.previous_counselor_id.as_ref() == Some(counselor_id)
	}
}
