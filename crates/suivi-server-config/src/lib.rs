// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Centralized configuration for the suivi authorization core.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Type-safe configuration sections for the authorization engine, the
//!   database adapters and logging
//! - Consistent environment variable naming (`SUIVI_SERVER_*`)
//! - [`init_tracing`] to install the process-wide tracing subscriber
//!
//! # Usage
//!
//! ```ignore
//! use suivi_server_config::{init_tracing, load_config};
//!
//! let config = load_config()?;
//! init_tracing(&config.logging)?;
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;
mod telemetry;

pub use error::ConfigError;
pub use layer::ServerConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};
pub use telemetry::init_tracing;

use tracing::{debug, info};

/// Fully resolved server configuration.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
	pub authz: AuthzConfig,
	pub database: DatabaseConfig,
	pub logging: LoggingConfig,
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`SUIVI_SERVER_*`)
/// 2. Config file (`/etc/suivi/server.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

fn load_from_sources(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<ServerConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ServerConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
fn finalize(layer: ServerConfigLayer) -> Result<ServerConfig, ConfigError> {
	let authz = layer.authz.unwrap_or_default().finalize();
	let database = layer.database.unwrap_or_default().finalize();
	let logging = layer.logging.unwrap_or_default().finalize();

	validate_config(&authz, &database)?;

	info!(
		inter_agency_organizations = ?authz.inter_agency_organizations,
		legacy_collective_fallback = authz.legacy_collective_fallback,
		database = %database.url,
		log_level = %logging.level,
		"Server configuration loaded"
	);

	Ok(ServerConfig {
		authz,
		database,
		logging,
	})
}

/// Validate cross-field configuration rules.
fn validate_config(authz: &AuthzConfig, database: &DatabaseConfig) -> Result<(), ConfigError> {
	if authz
		.inter_agency_organizations
		.iter()
		.any(|code| code.trim().is_empty())
	{
		return Err(ConfigError::Validation(
			"authz.inter_agency_organizations contains an empty organization code".to_string(),
		));
	}

	database.validate()
}
