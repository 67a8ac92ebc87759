//! Engine Configuration Module
//!
//! Centralized place for engine settings. Configuration is loaded from an
//! optional JSON file next to the binary; a missing file falls back to the
//! defaults and a malformed file logs a warning and falls back, so a bad
//! config can never keep the engine from starting.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Window caption.
    pub window_title: String,
    /// Initial client-area width in logical pixels.
    pub window_width: u32,
    /// Initial client-area height in logical pixels.
    pub window_height: u32,
    /// Per-frame budget for the frame pacer, in milliseconds.
    pub target_frame_time_ms: u64,
    /// Emit a trace log line every this many frames.
    pub frame_log_interval: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window_title: "Opal Engine".to_string(),
            window_width: 1024,
            window_height: 768,
            target_frame_time_ms: 16,
            frame_log_interval: 60,
        }
    }
}

impl EngineConfig {
    /// Loads configuration from `path`, falling back to defaults when the
    /// file is absent or malformed.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(config) => {
                    log::info!("Loaded engine configuration from {}.", path.display());
                    config
                }
                Err(e) => {
                    log::warn!(
                        "Malformed configuration file {}: {e}. Using defaults.",
                        path.display()
                    );
                    Self::default()
                }
            },
            Err(_) => {
                log::debug!(
                    "No configuration file at {}, using defaults.",
                    path.display()
                );
                Self::default()
            }
        }
    }

    pub fn target_frame_time(&self) -> Duration {
        Duration::from_millis(self.target_frame_time_ms)
    }
}
