// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authorization engine configuration section.

use serde::{Deserialize, Serialize};

/// Organization codes allowed to use agency-wide fallback when nothing else
/// is configured.
pub const DEFAULT_INTER_AGENCY_ORGANIZATIONS: &[&str] = &["MILO", "PASS_EMPLOI"];

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AuthzConfigLayer {
	pub inter_agency_organizations: Option<Vec<String>>,
	pub legacy_collective_fallback: Option<bool>,
}

impl AuthzConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.inter_agency_organizations.is_some() {
			self.inter_agency_organizations = other.inter_agency_organizations;
		}
		if other.legacy_collective_fallback.is_some() {
			self.legacy_collective_fallback = other.legacy_collective_fallback;
		}
	}

	pub fn finalize(self) -> AuthzConfig {
		AuthzConfig {
			inter_agency_organizations: self
				.inter_agency_organizations
				.unwrap_or_else(default_inter_agency_organizations),
			legacy_collective_fallback: self.legacy_collective_fallback.unwrap_or(true),
		}
	}
}

/// Resolved authorization settings.
///
/// Organization codes are kept as strings here; the engine parses them at
/// boot and refuses to start on an unknown code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthzConfig {
	pub inter_agency_organizations: Vec<String>,
	/// Collective appointments created before agency tagging fall back to a
	/// participant check when true, and deny everyone when false.
	pub legacy_collective_fallback: bool,
}

impl Default for AuthzConfig {
	fn default() -> Self {
		Self {
			inter_agency_organizations: default_inter_agency_organizations(),
			legacy_collective_fallback: true,
		}
	}
}

fn default_inter_agency_organizations() -> Vec<String> {
	DEFAULT_INTER_AGENCY_ORGANIZATIONS
		.iter()
		.map(|code| code.to_string())
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_values() {
		let config = AuthzConfig::default();
		assert_eq!(
			config.inter_agency_organizations,
			vec!["MILO".to_string(), "PASS_EMPLOI".to_string()]
		);
		assert!(config.legacy_collective_fallback);
	}

	#[test]
	fn test_layer_finalize_defaults() {
		assert_eq!(AuthzConfigLayer::default().finalize(), AuthzConfig::default());
	}

	#[test]
	fn test_layer_finalize_with_values() {
		let layer = AuthzConfigLayer {
			inter_agency_organizations: Some(vec!["MILO".to_string()]),
			legacy_collective_fallback: Some(false),
		};
		let config = layer.finalize();
		assert_eq!(config.inter_agency_organizations, vec!["MILO".to_string()]);
		assert!(!config.legacy_collective_fallback);
	}

	#[test]
	fn test_empty_list_is_kept() {
		let layer = AuthzConfigLayer {
			inter_agency_organizations: Some(Vec::new()),
			..Default::default()
		};
		assert!(layer.finalize().inter_agency_organizations.is_empty());
	}

	#[test]
	fn test_merge_overwrites() {
		let mut base = AuthzConfigLayer {
			inter_agency_organizations: Some(vec!["MILO".to_string()]),
			legacy_collective_fallback: Some(true),
		};
		base.merge(AuthzConfigLayer {
			inter_agency_organizations: None,
			legacy_collective_fallback: Some(false),
		});
		assert_eq!(
			base.inter_agency_organizations,
			Some(vec!["MILO".to_string()])
		);
		assert_eq!(base.legacy_collective_fallback, Some(false));
	}

	#[test]
	fn test_deserialize_layer_partial() {
		let layer: AuthzConfigLayer = toml::from_str("legacy_collective_fallback = false").unwrap();
		assert!(layer.inter_agency_organizations.is_none());
		assert_eq!(layer.legacy_collective_fallback, Some(false));
	}
}
