// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Tracing subscriber bootstrap.

use tracing_subscriber::EnvFilter;

use crate::error::ConfigError;
use crate::sections::{LogFormat, LoggingConfig};

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level when it is set and valid.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), ConfigError> {
	let filter = build_filter(&config.level)?;
	let builder = tracing_subscriber::fmt().with_env_filter(filter);

	let result = match config.format {
		LogFormat::Json => builder.json().try_init(),
		LogFormat::Pretty => builder.try_init(),
	};

	result.map_err(|e| ConfigError::Tracing(e.to_string()))
}

fn build_filter(level: &str) -> Result<EnvFilter, ConfigError> {
	EnvFilter::try_from_default_env()
		.or_else(|_| EnvFilter::try_new(level))
		.map_err(|e| ConfigError::InvalidValue {
			key: "logging.level".to_string(),
			message: e.to_string(),
		})
}
