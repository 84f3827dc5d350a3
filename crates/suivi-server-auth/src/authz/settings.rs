// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::collections::BTreeSet;

use suivi_server_config::{AuthzConfig, ConfigError};

use crate::types::Organization;

/// Organizations where counselors of one agency may act for each other.
///
/// Fixed for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterAgencyOrganizations(BTreeSet<Organization>);

impl InterAgencyOrganizations {
	pub fn new(organizations: impl IntoIterator<Item = Organization>) -> Self {
		Self(organizations.into_iter().collect())
	}

	pub fn none() -> Self {
		Self(BTreeSet::new())
	}

	pub fn contains(&self, organization: Organization) -> bool {
		self.0.contains(&organization)
	}
}

impl Default for InterAgencyOrganizations {
	fn default() -> Self {
		Self::new([Organization::Milo, Organization::PassEmploi])
	}
}

/// Engine-wide knobs resolved from the `authz` configuration section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
	pub inter_agency: InterAgencyOrganizations,
	/// Let collective appointments without an agency fall back to the
	/// participant check. When off they deny everyone.
	pub legacy_collective_fallback: bool,
}

impl Default for EngineSettings {
	fn default() -> Self {
		Self {
			inter_agency: InterAgencyOrganizations::default(),
			legacy_collective_fallback: true,
		}
	}
}

impl TryFrom<&AuthzConfig> for EngineSettings {
	type Error = ConfigError;

	fn try_from(config: &AuthzConfig) -> Result<Self, Self::Error> {
		let organizations = config
			.inter_agency_organizations
			.iter()
			.map(|code| {
				code.parse::<Organization>()
					.map_err(|e| ConfigError::InvalidValue {
						key: "authz.inter_agency_organizations".to_string(),
						message: e.to_string(),
					})
			})
			.collect::<Result<Vec<_>, _>>()?;

		Ok(Self {
			inter_agency: InterAgencyOrganizations::new(organizations),
			legacy_collective_fallback: config.legacy_collective_fallback,
		})
	}
}
