// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Relationship store location.
//!
//! Only SQLite is supported. The url is handed to the sqlx SQLite driver as
//! is, so both file paths (`sqlite:./suivi.db`) and `sqlite::memory:` work.

use serde::Deserialize;

use crate::error::ConfigError;

const DEFAULT_DATABASE_URL: &str = "sqlite:./suivi.db";
const SQLITE_SCHEME: &str = "sqlite:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
	pub url: String,
}

impl DatabaseConfig {
	/// True for a private in-memory database.
	pub fn is_memory(&self) -> bool {
		self.url.starts_with("sqlite::memory:")
	}

	/// Rejects urls the SQLite adapters cannot open.
	pub fn validate(&self) -> Result<(), ConfigError> {
		let invalid = |message: &str| ConfigError::InvalidValue {
			key: "database.url".to_string(),
			message: message.to_string(),
		};
		let Some(location) = self.url.strip_prefix(SQLITE_SCHEME) else {
			return Err(invalid("only sqlite: urls are supported"));
		};
		if location.trim().is_empty() {
			return Err(invalid("missing database path"));
		}
		Ok(())
	}
}

impl Default for DatabaseConfig {
	fn default() -> Self {
		DatabaseConfigLayer::default().finalize()
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseConfigLayer {
	#[serde(default)]
	pub url: Option<String>,
}

impl DatabaseConfigLayer {
	pub fn merge(&mut self, other: DatabaseConfigLayer) {
		if other.url.is_some() {
			self.url = other.url;
		}
	}

	pub fn finalize(self) -> DatabaseConfig {
		DatabaseConfig {
			url: self
				.url
				.map(|url| url.trim().to_string())
				.unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn config(url: &str) -> DatabaseConfig {
		DatabaseConfigLayer {
			url: Some(url.to_string()),
		}
		.finalize()
	}

	#[test]
	fn test_default_is_local_sqlite_file() {
		let config = DatabaseConfig::default();
		assert_eq!(config.url, "sqlite:./suivi.db");
		assert!(config.validate().is_ok());
		assert!(!config.is_memory());
	}

	#[test]
	fn test_url_is_trimmed() {
		assert_eq!(config("  sqlite:/var/lib/suivi/data.db ").url, "sqlite:/var/lib/suivi/data.db");
	}

	#[test]
	fn test_memory_url_is_accepted() {
		let config = config("sqlite::memory:");
		assert!(config.is_memory());
		assert!(config.validate().is_ok());
	}

	#[test]
	fn test_other_schemes_are_rejected() {
		for url in ["postgres://localhost/suivi", "./suivi.db", "sqlite:", "sqlite:  "] {
			let err = config(url).validate().unwrap_err();
			assert!(
				matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "database.url"),
				"{url} should be rejected"
			);
		}
	}
}
