// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

use crate::authz::settings::InterAgencyOrganizations;
use crate::repository::CounselorRepository;
use crate::types::{CounselorId, Organization};

/// Agency-wide fallback between colleagues.
#[async_trait]
pub trait AgencyScopeResolver: Send + Sync {
	/// Whether counselors of `organization` may act for colleagues of their agency.
	fn is_inter_agency_enabled(&self, organization: Organization) -> bool;

	/// True iff both counselors exist, both have an agency, and it is the same.
	/// Any missing data or lookup failure answers false.
	async fn same_agency_as(&self, actor: &CounselorId, target: &CounselorId) -> bool;
}

/// Resolves agency membership through the counselor repository.
pub struct RepositoryAgencyScope {
	counselors: Arc<dyn CounselorRepository>,
	organizations: InterAgencyOrganizations,
}

impl RepositoryAgencyScope {
	pub fn new(
		counselors: Arc<dyn CounselorRepository>,
		organizations: InterAgencyOrganizations,
	) -> Self {
		Self {
			counselors,
			organizations,
		}
	}
}

#[async_trait]
impl AgencyScopeResolver for RepositoryAgencyScope {
	fn is_inter_agency_enabled(&self, organization: Organization) -> bool {
		self.organizations.contains(organization)
	}

	async fn same_agency_as(&self, actor: &CounselorId, target: &CounselorId) -> bool {
		if actor.is_blank() || target.is_blank() {
			return false;
		}

		let (actor, target) = match (
			self.counselors.get(actor).await,
			self.counselors.get(target).await,
		) {
			(Ok(Some(actor)), Ok(Some(target))) => (actor, target),
			(Err(e), _) | (_, Err(e)) => {
				warn!(error = %e, "counselor lookup failed during agency check");
				return false;
			}
			_ => return false,
		};

		actor.shares_agency_with(&target)
	}
}
