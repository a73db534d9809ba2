// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Service configuration, loaded once at startup from an optional `config`
// file and `DOCUSCAN__*` environment variables.

use std::path::PathBuf;

use ::config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{DocuscanError, Result};
use crate::PaperSize;

/// Static service configuration. Changing any of it requires a restart.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub pdf: PdfConfig,
    pub paperless: PaperlessConfig,
    pub storage: StorageConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound on request bodies; base64 scans are large.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8888,
            max_body_bytes: 256 * 1024 * 1024,
        }
    }
}

/// Page composition defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// JPEG quality (1-100) used when a request does not specify one.
    pub compression_quality: u8,
    /// Longest allowed image edge in pixels before downscaling.
    pub max_image_size: u32,
    pub paper_size: PaperSize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            compression_quality: 98,
            max_image_size: 5000,
            paper_size: PaperSize::A4,
        }
    }
}

/// Fallback Paperless-ngx connection, used when neither the request nor the
/// saved user settings provide one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaperlessConfig {
    pub enabled: bool,
    pub url: String,
    pub token: String,
    pub default_tags: String,
}

impl Default for PaperlessConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: String::new(),
            token: String::new(),
            default_tags: "scanned,mobile".to_string(),
        }
    }
}

/// Where persistent state lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub settings_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            settings_file: PathBuf::from("/app/data/settings.json"),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from `config.{toml,json,yaml}` in the working
    /// directory (optional) layered under `DOCUSCAN__SECTION__KEY` variables.
    pub fn load() -> Result<Self> {
        Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(
                Environment::with_prefix("DOCUSCAN")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .and_then(|c| c.try_deserialize::<ServiceConfig>())
            .map_err(|e| DocuscanError::Config(e.to_string()))
    }
}
