// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Partial configuration layer merged across sources.

use serde::Deserialize;

use crate::sections::{AuthzConfigLayer, DatabaseConfigLayer, LoggingConfigLayer};

/// One source's view of the configuration. Absent sections leave lower
/// precedence values untouched when merged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerConfigLayer {
	#[serde(default)]
	pub authz: Option<AuthzConfigLayer>,
	#[serde(default)]
	pub database: Option<DatabaseConfigLayer>,
	#[serde(default)]
	pub logging: Option<LoggingConfigLayer>,
}

impl ServerConfigLayer {
	pub fn merge(&mut self, other: ServerConfigLayer) {
		merge_section(&mut self.authz, other.authz, AuthzConfigLayer::merge);
		merge_section(&mut self.database, other.database, DatabaseConfigLayer::merge);
		merge_section(&mut self.logging, other.logging, LoggingConfigLayer::merge);
	}
}

fn merge_section<T>(base: &mut Option<T>, other: Option<T>, merge: fn(&mut T, T)) {
	match (base.as_mut(), other) {
		(Some(existing), Some(overlay)) => merge(existing, overlay),
		(None, Some(overlay)) => *base = Some(overlay),
		(_, None) => {}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn merge_keeps_base_when_overlay_section_missing() {
		let mut base = ServerConfigLayer {
			database: Some(DatabaseConfigLayer {
				url: Some("sqlite:base.db".to_string()),
			}),
			..Default::default()
		};
		base.merge(ServerConfigLayer::default());
		assert_eq!(
			base.database.and_then(|d| d.url),
			Some("sqlite:base.db".to_string())
		);
	}

	#[test]
	fn merge_overlays_fields_within_section() {
		let mut base = ServerConfigLayer {
			logging: Some(LoggingConfigLayer {
				level: Some("info".to_string()),
				format: None,
			}),
			..Default::default()
		};
		let overlay = ServerConfigLayer {
			logging: Some(LoggingConfigLayer {
				level: Some("debug".to_string()),
				format: None,
			}),
			..Default::default()
		};
		base.merge(overlay);
		assert_eq!(
			base.logging.and_then(|l| l.level),
			Some("debug".to_string())
		);
	}

	#[test]
	fn deserializes_from_toml_sections() {
		let layer: ServerConfigLayer = toml::from_str(
			r#"
[authz]
inter_agency_organizations = ["MILO"]

[database]
url = "sqlite:/var/lib/suivi/data.db"
"#,
		)
		.unwrap();
		assert_eq!(
			layer.authz.and_then(|a| a.inter_agency_organizations),
			Some(vec!["MILO".to_string()])
		);
		assert!(layer.logging.is_none());
	}
}
