//! Configuration file management for sweepscope.
//!
//! Loads and saves application configuration from a TOML file in the user's
//! config directory. All numeric parameters are validated before a stream is
//! constructed so that a bad config fails at startup, never mid-tick.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Sweeping window configuration, shared by all channels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Width of the visible time window in milliseconds
    #[serde(default = "default_time_view_ms")]
    pub time_view_ms: u32,
    /// Fraction of the window blanked ahead of the write cursor (0.01 = 1%)
    #[serde(default = "default_gap_fraction")]
    pub gap_fraction: f64,
    /// Number of stacked display lanes channels are distributed across
    #[serde(default = "default_axis_count")]
    pub axis_count: usize,
}

/// Sample stream configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Samples produced per second, per channel
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    /// Number of channels in the stream
    #[serde(default = "default_channel_count")]
    pub channel_count: usize,
    /// Ceiling on elapsed time credited to one tick, in milliseconds
    #[serde(default = "default_max_catch_up_ms")]
    pub max_catch_up_ms: u32,
    /// Seed for the demo waveform amplitudes (omit for a fixed default)
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_time_view_ms() -> u32 {
    5000
}

fn default_gap_fraction() -> f64 {
    0.01
}

fn default_axis_count() -> usize {
    10
}

fn default_sample_rate() -> u32 {
    1000
}

fn default_channel_count() -> usize {
    100
}

fn default_max_catch_up_ms() -> u32 {
    2000
}

/// Complete application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepscopeConfig {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub stream: StreamConfig,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            time_view_ms: default_time_view_ms(),
            gap_fraction: default_gap_fraction(),
            axis_count: default_axis_count(),
        }
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            channel_count: default_channel_count(),
            max_catch_up_ms: default_max_catch_up_ms(),
            seed: None,
        }
    }
}

impl Default for SweepscopeConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            stream: StreamConfig::default(),
        }
    }
}

impl SweepscopeConfig {
    /// Loads configuration from the user's config directory.
    ///
    /// A missing file yields the defaults; a malformed file is an error.
    ///
    /// # Errors
    /// - If the config directory cannot be determined
    /// - If the file exists but cannot be read or parsed
    pub fn load() -> Result<Self> {
        let config_path = get_config_path()?;
        if !config_path.exists() {
            tracing::debug!(
                "No config file at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&config_path)?;
        let config: SweepscopeConfig = toml::from_str(&content)
            .map_err(|e| anyhow!("Malformed config {}: {e}", config_path.display()))?;
        Ok(config)
    }

    /// Saves configuration to the user's config directory.
    ///
    /// # Errors
    /// - If the config directory cannot be determined or created
    /// - If the file cannot be written
    pub fn save(&self) -> Result<()> {
        let config_path = get_config_path()?;
        let content = toml::to_string_pretty(self)?;
        fs::write(&config_path, content)?;
        tracing::info!("Configuration saved to {}", config_path.display());
        Ok(())
    }

    /// Number of logical slots per channel buffer.
    ///
    /// Derived from the visible time window and the sample rate, rounded up
    /// so the window never shows less time than configured.
    pub fn capacity(&self) -> usize {
        let slots = self.stream.sample_rate as f64 * self.window.time_view_ms as f64 / 1000.0;
        slots.ceil() as usize
    }

    /// Rejects configurations the stream cannot run with.
    ///
    /// Runs before any buffer or pacing state is constructed.
    ///
    /// # Errors
    /// - If any of capacity, sample rate, channel count, or axis count is zero
    /// - If the gap fraction is outside `[0, 1)`
    /// - If `max_catch_up_ms` exceeds `time_view_ms` (a single catch-up batch
    ///   could then exceed the window capacity, which one apply cannot absorb)
    pub fn validate(&self) -> Result<()> {
        if self.stream.sample_rate == 0 {
            return Err(anyhow!("stream.sample_rate must be positive"));
        }
        if self.stream.channel_count == 0 {
            return Err(anyhow!("stream.channel_count must be positive"));
        }
        if self.window.time_view_ms == 0 || self.capacity() == 0 {
            return Err(anyhow!("window.time_view_ms must be positive"));
        }
        if self.window.axis_count == 0 {
            return Err(anyhow!("window.axis_count must be positive"));
        }
        if !(0.0..1.0).contains(&self.window.gap_fraction) {
            return Err(anyhow!(
                "window.gap_fraction must be in [0, 1), got {}",
                self.window.gap_fraction
            ));
        }
        if self.stream.max_catch_up_ms > self.window.time_view_ms {
            return Err(anyhow!(
                "stream.max_catch_up_ms ({}) must not exceed window.time_view_ms ({}): \
                 one catch-up batch must fit in the window",
                self.stream.max_catch_up_ms,
                self.window.time_view_ms
            ));
        }
        Ok(())
    }
}

/// Retrieves the path to the config file, creating the directory if needed.
///
/// # Errors
/// - If the home directory cannot be determined
/// - If the config directory cannot be created
pub fn get_config_path() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not find home directory"))?;
    let config_path = home
        .join(".config")
        .join("sweepscope")
        .join("sweepscope.toml");

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)?;
    }

    Ok(config_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = SweepscopeConfig::default();
        config.validate().unwrap();
        assert_eq!(config.capacity(), 5000);
    }

    #[test]
    fn empty_toml_parses_to_defaults() {
        let config: SweepscopeConfig = toml::from_str("").unwrap();
        assert_eq!(config.stream.sample_rate, 1000);
        assert_eq!(config.stream.channel_count, 100);
        assert_eq!(config.window.time_view_ms, 5000);
        assert_eq!(config.window.gap_fraction, 0.01);
    }

    #[test]
    fn partial_toml_keeps_remaining_defaults() {
        let config: SweepscopeConfig =
            toml::from_str("[stream]\nsample_rate = 250\nchannel_count = 4\n").unwrap();
        assert_eq!(config.stream.sample_rate, 250);
        assert_eq!(config.stream.channel_count, 4);
        assert_eq!(config.window.axis_count, 10);
    }

    #[test]
    fn capacity_rounds_up() {
        let mut config = SweepscopeConfig::default();
        config.stream.sample_rate = 333;
        config.window.time_view_ms = 100;
        // 33.3 slots round up to 34
        assert_eq!(config.capacity(), 34);
    }

    #[test]
    fn rejects_zero_parameters() {
        let mut config = SweepscopeConfig::default();
        config.stream.sample_rate = 0;
        assert!(config.validate().is_err());

        let mut config = SweepscopeConfig::default();
        config.stream.channel_count = 0;
        assert!(config.validate().is_err());

        let mut config = SweepscopeConfig::default();
        config.window.time_view_ms = 0;
        assert!(config.validate().is_err());

        let mut config = SweepscopeConfig::default();
        config.window.axis_count = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_gap_fraction() {
        let mut config = SweepscopeConfig::default();
        config.window.gap_fraction = 1.0;
        assert!(config.validate().is_err());
        config.window.gap_fraction = -0.01;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_catch_up_wider_than_the_window() {
        let mut config = SweepscopeConfig::default();
        config.window.time_view_ms = 1000;
        config.stream.max_catch_up_ms = 2000;
        assert!(config.validate().is_err());
    }
}
