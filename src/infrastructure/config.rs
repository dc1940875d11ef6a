// Runtime configuration loading
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct RuntimeConfig {
    pub server: ServerConfig,
    pub stream: StreamConfig,
    pub chart: ChartConfig,
    pub table: TableConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct StreamConfig {
    /// Operating preset name: "normal" or "stress".
    pub preset: String,
    pub initial_count: usize,
    pub frame_rate_hz: u32,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            preset: "normal".to_string(),
            initial_count: 1000,
            frame_rate_hz: 60,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ChartConfig {
    pub width: u32,
    pub height: u32,
    pub show_grid: bool,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 400,
            show_grid: true,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct TableConfig {
    pub row_height: f64,
    pub container_height: f64,
    pub overscan: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            row_height: 40.0,
            container_height: 400.0,
            overscan: 5,
        }
    }
}

pub fn load_runtime_config() -> anyhow::Result<RuntimeConfig> {
    load_runtime_config_from("config/runtime")
}

/// Loads the runtime config. A missing file falls back to built-in defaults;
/// present keys override them individually.
pub fn load_runtime_config_from(name: &str) -> anyhow::Result<RuntimeConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name(name).required(false))
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Writes the built-in default config so a fresh checkout has a file to edit.
pub fn write_default_config(path: impl AsRef<Path>) -> anyhow::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let rendered = toml::to_string_pretty(&RuntimeConfig::default())?;
    std::fs::write(path, rendered)?;
    Ok(())
}
