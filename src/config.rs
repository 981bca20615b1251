//! Parses config file
use std::{
    env,
    fs::OpenOptions,
    io::Read,
    path::{Path, PathBuf},
};

use clap::ValueEnum;
use eyre::eyre;
use serde::Deserialize;
use stdset::{
    constants::{MAX_ZOOM, MIN_ZOOM},
    IndexPolicy, Palette, RenderOptions,
};

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyName {
    Full,
    LowNibble,
}

impl From<PolicyName> for IndexPolicy {
    fn from(value: PolicyName) -> Self {
        match value {
            PolicyName::Full => IndexPolicy::Full,
            PolicyName::LowNibble => IndexPolicy::LowNibble,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum PaletteName {
    Vga,
    Grayscale,
}

impl PaletteName {
    pub fn build(self) -> Palette {
        match self {
            PaletteName::Vga => Palette::vga(),
            PaletteName::Grayscale => Palette::grayscale(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ExportFormat {
    Png,
    Bmp,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Bmp => "bmp",
        }
    }

    pub fn image_format(self) -> image::ImageFormat {
        match self {
            ExportFormat::Png => image::ImageFormat::Png,
            ExportFormat::Bmp => image::ImageFormat::Bmp,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub zoom: u32,
    pub index_policy: PolicyName,
    pub palette: PaletteName,
    pub grid_lines: bool,
    pub grid_rows: usize,
    pub grid_columns: usize,
    pub layout_width: usize,
    pub layout_height: usize,
    pub export_format: ExportFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            zoom: 8,
            index_policy: PolicyName::Full,
            palette: PaletteName::Vga,
            grid_lines: true,
            grid_rows: 5,
            grid_columns: 10,
            layout_width: 20,
            layout_height: 15,
            export_format: ExportFormat::Png,
        }
    }
}

impl Config {
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions::new(self.zoom, self.grid_lines)
    }
}

pub static CONFIG_FILE_NAME: &str = "stdview.toml";

/// Parse `stdview.toml` in the same folder as the binary. No file means default config.
pub fn parse_config() -> eyre::Result<Config> {
    let path = match env::current_exe() {
        Ok(path) => path
            .parent()
            .map(|parent| parent.join(CONFIG_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME)),
        Err(_) => PathBuf::from(CONFIG_FILE_NAME),
    };

    if !path.exists() {
        log::debug!("No config at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    parse_config_from_file(path.as_path())
}

pub fn parse_config_from_file(path: &Path) -> eyre::Result<Config> {
    let mut file = OpenOptions::new()
        .read(true)
        .open(path.as_os_str())
        .map_err(|op| eyre!("Cannot open config {}: {op}", path.display()))?;
    let mut buffer = String::new();

    file.read_to_string(&mut buffer)?;

    parse_config_from_str(&buffer)
}

pub fn parse_config_from_str(s: &str) -> eyre::Result<Config> {
    let mut config: Config = toml::from_str(s)?;

    if !(MIN_ZOOM..=MAX_ZOOM).contains(&config.zoom) {
        log::warn!(
            "Zoom {} is outside {MIN_ZOOM}..={MAX_ZOOM}, clamping",
            config.zoom
        );
        config.zoom = config.zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    Ok(config)
}
