// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 pstation contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Emulator configuration file.
//!
//! Loaded from a TOML file (default `pstation.toml`, overridable with
//! `--config`). Absence of the file is not an error — [`Config::default`]
//! applies.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{EmulatorError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub bios: bool,
    pub cdrom: bool,
    pub verbose: bool,
    pub trace: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log: LogConfig,

    #[serde(rename = "debug_info_window")]
    pub debug_info_window: bool,

    #[serde(rename = "show_framebuffer")]
    pub show_framebuffer: bool,
}

impl Config {
    /// Load configuration from `path`. Returns the default configuration if
    /// the file does not exist; returns an error if it exists but cannot be
    /// parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("no config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path)?;
        toml::from_str(&text).map_err(|e| EmulatorError::Config(e.to_string()))
    }

    /// Build an `env_logger` filter string reflecting this configuration's
    /// logging knobs, matching spec §6's `log.bios`/`log.cdrom`/
    /// `log.verbose`/`log.trace` booleans to module-path filters rather than
    /// a bespoke logging facility.
    pub fn log_filter(&self) -> String {
        let base = if self.log.trace {
            "trace"
        } else if self.log.verbose {
            "debug"
        } else {
            "info"
        };

        let mut filter = format!("pstation={base}");
        if self.log.bios {
            filter.push_str(",pstation::core::memory=trace");
        }
        if self.log.cdrom {
            filter.push_str(",pstation::core::cdrom=trace");
        }
        filter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_yields_defaults() {
        let cfg = Config::load(Path::new("/nonexistent/pstation.toml")).unwrap();
        assert!(!cfg.log.verbose);
        assert!(!cfg.show_framebuffer);
    }

    #[test]
    fn parses_expected_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
            [log]
            bios = true
            trace = true

            debug_info_window = true
            show_framebuffer = true
            "#
        )
        .unwrap();

        let cfg = Config::load(file.path()).unwrap();
        assert!(cfg.log.bios);
        assert!(cfg.log.trace);
        assert!(!cfg.log.cdrom);
        assert!(cfg.debug_info_window);
        assert!(cfg.show_framebuffer);
    }

    #[test]
    fn log_filter_escalates_with_trace() {
        let mut cfg = Config::default();
        assert_eq!(cfg.log_filter(), "pstation=info");
        cfg.log.verbose = true;
        assert_eq!(cfg.log_filter(), "pstation=debug");
        cfg.log.trace = true;
        cfg.log.bios = true;
        assert_eq!(
            cfg.log_filter(),
            "pstation=trace,pstation::core::memory=trace"
        );
    }
}
