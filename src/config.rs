/*
 *  config.rs
 *
 *  monolcd - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  YAML and command line configuration
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use serde::{Deserialize, Serialize};
use clap::{ArgAction, Args, Parser, ValueHint};
use dirs_next::home_dir;
use std::{fs, path::{Path, PathBuf}};
use thiserror::Error;

use crate::constants::DEFAULT_MAX_ICONS;
use crate::display::engine::{EngineContext, EngineSettings};
use crate::display::error::DisplayError;
use crate::display::fonts::{DoubleWidthFont, Language};
use crate::display::hardware::{HardwareOverride, HardwareProfile};
use crate::display::mode::{ClockLayout, ModeOverride, ModeTable};

/// Error type for config loading/validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Display error: {0}")]
    Display(#[from] DisplayError),
}

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub log_level: Option<String>,     // e.g., "info" | "debug"
    pub display: Option<DisplayConfig>,
    pub fonts: Option<FontConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DisplayConfig {
    pub hardware: Option<String>,      // profile name, e.g. "tm13264cbcg"
    pub mode: Option<usize>,
    pub contrast: Option<u8>,          // 0-100
    pub rewrite_contrast: Option<bool>,
    pub clock_style: Option<u8>,       // 0-4
    pub clock_disable_date: Option<bool>,
    pub icon_spacing: Option<usize>,
    pub max_icons: Option<usize>,      // 0-7
    pub greyscale_config: Option<u8>,  // 0 | 1
    pub hardware_override: Option<HardwareOverride>,
    pub mode_override: Option<ModeOverride>,
}

/// Double-width font blobs loaded at startup.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FontConfig {
    pub chinese: Option<PathBuf>,
    pub japanese: Option<PathBuf>,
    pub japanese_index: Option<PathBuf>,
    pub language: Option<Language>,
}

pub const DEFAULT_HARDWARE: &str = "tm13264cbcg";

impl DisplayConfig {
    /// Named profile with any overrides applied.
    pub fn hardware_profile(&self) -> Result<HardwareProfile, ConfigError> {
        let name = self.hardware.as_deref().unwrap_or(DEFAULT_HARDWARE);
        let mut hw = HardwareProfile::by_name(name)?;
        if let Some(o) = self.hardware_override.as_ref() {
            hw = hw.with_overrides(o);
        }
        Ok(hw)
    }

    pub fn engine_settings(&self) -> EngineSettings {
        let defaults = EngineSettings::default();
        EngineSettings {
            mode: self.mode.unwrap_or(defaults.mode),
            mode_override: self.mode_override.clone().unwrap_or_default(),
            clock_style: self.clock_style.and_then(ClockLayout::from_style),
            clock_disable_date: self.clock_disable_date.unwrap_or(false),
            icon_spacing: self.icon_spacing.unwrap_or(defaults.icon_spacing),
            max_icons: self.max_icons.unwrap_or(defaults.max_icons),
            greyscale_config: self.greyscale_config.unwrap_or(defaults.greyscale_config),
            rewrite_contrast: self.rewrite_contrast.unwrap_or(false),
        }
    }
}

impl FontConfig {
    /// Reads the configured blobs into the engine.
    pub fn load_into(&self, engine: &mut EngineContext) -> Result<(), ConfigError> {
        if let Some(path) = self.chinese.as_ref() {
            engine.load_font(DoubleWidthFont::chinese(fs::read(path)?)?);
        }
        match (self.japanese.as_ref(), self.japanese_index.as_ref()) {
            (Some(data), Some(index)) => {
                let index = fs::read(index)?;
                engine.load_font(DoubleWidthFont::japanese(&index, fs::read(data)?)?);
            }
            (None, None) => {}
            _ => {
                return Err(ConfigError::Validation(
                    "fonts.japanese and fonts.japanese_index go together".into(),
                ))
            }
        }
        if let Some(language) = self.language {
            engine.set_language(language);
        }
        Ok(())
    }
}

/// CLI overrides. All fields are Options so we can layer them over YAML.
#[derive(Debug, Parser, Clone, Default)]
#[command(name = "monolcd", version, about = "Monochrome LCD renderer preview")]
pub struct Cli {
    /// Path to a YAML config file (overrides search)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub log_level: Option<String>,
    /// Hardware profile name
    #[arg(long)]
    pub hardware: Option<String>,
    /// Display mode id
    #[arg(long)]
    pub mode: Option<usize>,
    #[arg(long)]
    pub contrast: Option<u8>,
    #[arg(long)]
    pub clock_style: Option<u8>,
    #[arg(long)]
    pub max_icons: Option<usize>,
    /// dump fully merged config (after overrides) and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub dump_config: bool,
    #[command(flatten)]
    pub preview: PreviewArgs,
}

/// What the preview renders.
#[derive(Debug, Args, Clone, Default)]
pub struct PreviewArgs {
    /// Text line, repeat for more rows
    #[arg(long = "text", value_name = "TEXT")]
    pub lines: Vec<String>,
    /// Row index drawn inverted, repeatable
    #[arg(long = "invert", value_name = "ROW")]
    pub inverted: Vec<usize>,
    /// Hex id drawn as a Code-39 barcode on the row after the text
    #[arg(long)]
    pub barcode: Option<String>,
    /// Cursor as column,row,width
    #[arg(long, value_delimiter = ',')]
    pub cursor: Vec<usize>,
    /// Draw the big clock instead of text
    #[arg(long, action = ArgAction::SetTrue)]
    pub clock: bool,
    /// Time as HH:MM (defaults to local time)
    #[arg(long)]
    pub time: Option<String>,
    /// Alarm as HH:MM
    #[arg(long)]
    pub alarm: Option<String>,
    /// Date line for clock layouts with one
    #[arg(long)]
    pub date: Option<String>,
    #[arg(long, action = ArgAction::SetTrue)]
    pub twelve_hour: bool,
    /// Status line clock at this column
    #[arg(long)]
    pub small_clock: Option<usize>,
    /// Icon bitmask
    #[arg(long)]
    pub icons: Option<u32>,
    /// Signal strength 0-100, below zero is off
    #[arg(long, allow_hyphen_values = true)]
    pub signal: Option<i32>,
    #[arg(long, action = ArgAction::SetTrue)]
    pub zoom: bool,
    /// Write a PBM image instead of ASCII art
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub pbm: Option<PathBuf>,
    /// Print the controller byte stream of init plus one flush
    #[arg(long, action = ArgAction::SetTrue)]
    pub dump_stream: bool,
}

/// Public entry point: read YAML, merge CLI, validate.
pub fn load(cli: &Cli) -> Result<Config, ConfigError> {
    // 1) defaults (from `Default` impl)
    let mut cfg = Config::default();

    // 2) YAML file (explicit path or search)
    if let Some(p) = cli.config.as_ref() {
        if p.exists() {
            let y = read_yaml(p)?;
            merge(&mut cfg, y);
        } else {
            return Err(ConfigError::Validation(format!(
                "Config file not found: {}",
                p.display()
            )));
        }
    } else if let Some(p) = find_config_file() {
        let y = read_yaml(&p)?;
        merge(&mut cfg, y);
    }

    // 3) CLI overrides (highest precedence)
    apply_cli_overrides(&mut cfg, cli);

    // 4) Validate
    validate(&cfg)?;
    Ok(cfg)
}

/// Try common locations in order (first hit wins).
fn find_config_file() -> Option<PathBuf> {
    // XDG-style: ~/.config/monolcd/config.yaml
    if let Some(home) = home_dir() {
        let p = home.join(".config/monolcd/config.yaml");
        if p.exists() { return Some(p) }
        let p = home.join(".config/monolcd.yaml");
        if p.exists() { return Some(p) }
    }
    // project local
    for candidate in &["monolcd.yaml", "config/monolcd.yaml"] {
        let p = PathBuf::from(candidate);
        if p.exists() { return Some(p) }
    }
    None
}

pub fn read_yaml(path: &Path) -> Result<Config, ConfigError> {
    let s = fs::read_to_string(path)?;
    parse_yaml(&s)
}

pub fn parse_yaml(s: &str) -> Result<Config, ConfigError> {
    let cfg: Config = serde_yaml::from_str(s)?;
    Ok(cfg)
}

/// Shallow merge `src` into `dst`, Option-by-Option.
pub fn merge(dst: &mut Config, src: Config) {
    // top-level
    if src.log_level.is_some()      { dst.log_level = src.log_level; }
    // display
    match (&mut dst.display, src.display) {
        (None, Some(c)) => dst.display = Some(c),
        (Some(d), Some(s)) => merge_display(d, s),
        _ => {}
    }
    if src.fonts.is_some()          { dst.fonts = src.fonts; }
}

fn merge_display(dst: &mut DisplayConfig, src: DisplayConfig) {
    if src.hardware.is_some()           { dst.hardware = src.hardware; }
    if src.mode.is_some()               { dst.mode = src.mode; }
    if src.contrast.is_some()           { dst.contrast = src.contrast; }
    if src.rewrite_contrast.is_some()   { dst.rewrite_contrast = src.rewrite_contrast; }
    if src.clock_style.is_some()        { dst.clock_style = src.clock_style; }
    if src.clock_disable_date.is_some() { dst.clock_disable_date = src.clock_disable_date; }
    if src.icon_spacing.is_some()       { dst.icon_spacing = src.icon_spacing; }
    if src.max_icons.is_some()          { dst.max_icons = src.max_icons; }
    if src.greyscale_config.is_some()   { dst.greyscale_config = src.greyscale_config; }
    if src.hardware_override.is_some()  { dst.hardware_override = src.hardware_override; }
    if src.mode_override.is_some()      { dst.mode_override = src.mode_override; }
}

fn apply_cli_overrides(cfg: &mut Config, cli: &Cli) {
    if cli.log_level.is_some()       { cfg.log_level = cli.log_level.clone(); }
    let any_case = cli.hardware.is_some()
        || cli.mode.is_some()
        || cli.contrast.is_some()
        || cli.clock_style.is_some()
        || cli.max_icons.is_some();

    if any_case && cfg.display.is_none() {
        cfg.display = Some(DisplayConfig::default());
    }
    if let Some(display) = cfg.display.as_mut() {
        if cli.hardware.is_some()     { display.hardware = cli.hardware.clone(); }
        if cli.mode.is_some()         { display.mode = cli.mode; }
        if cli.contrast.is_some()     { display.contrast = cli.contrast; }
        if cli.clock_style.is_some()  { display.clock_style = cli.clock_style; }
        if cli.max_icons.is_some()    { display.max_icons = cli.max_icons; }
    }
}

/// Ranges and names the engine would otherwise reject later.
pub fn validate(cfg: &Config) -> Result<(), ConfigError> {
    let Some(display) = cfg.display.as_ref() else {
        return Ok(());
    };
    if let Some(name) = display.hardware.as_deref() {
        if HardwareProfile::by_name(name).is_err() {
            let known: Vec<&str> = HardwareProfile::names().collect();
            return Err(ConfigError::Validation(format!(
                "unknown display hardware '{}', expected one of {}", name, known.join("|")
            )));
        }
    }
    if let Some(mode) = display.mode {
        if ModeTable::standard().selectable(mode).is_err() {
            return Err(ConfigError::Validation(format!("display mode {} cannot be selected", mode)));
        }
    }
    if display.contrast.is_some_and(|c| c > 100) {
        return Err(ConfigError::Validation("display contrast must be 0..=100".into()));
    }
    if display.max_icons.is_some_and(|n| n > DEFAULT_MAX_ICONS) {
        return Err(ConfigError::Validation(format!("display max_icons must be 0..={}", DEFAULT_MAX_ICONS)));
    }
    if display.clock_style.is_some_and(|s| ClockLayout::from_style(s).is_none()) {
        return Err(ConfigError::Validation("display clock_style must be 0..=4".into()));
    }
    if display.greyscale_config.is_some_and(|g| g > 1) {
        return Err(ConfigError::Validation("display greyscale_config must be 0|1".into()));
    }
    if let Some(o) = display.hardware_override.as_ref() {
        if o.width == Some(0) || o.height == Some(0) {
            return Err(ConfigError::Validation("display width/height must be > 0".into()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::hardware::RowLookup;
    use crate::display::mode::IconKind;

    const SAMPLE: &str = r#"
log_level: debug
display:
  hardware: config1009
  mode: 6
  contrast: 40
  clock_style: 4
  max_icons: 5
  hardware_override:
    y_offset: 0
    row_lookup: split
  mode_override:
    icon_kind: 8x8
    icon_y: 56
fonts:
  language: chinese
"#;

    fn display(cfg: &Config) -> &DisplayConfig {
        cfg.display.as_ref().unwrap()
    }

    #[test]
    fn test_config_parses_sample() {
        let cfg = parse_yaml(SAMPLE).unwrap();
        validate(&cfg).unwrap();
        assert_eq!(cfg.log_level.as_deref(), Some("debug"));
        let d = display(&cfg);
        assert_eq!(d.mode, Some(6));
        assert_eq!(d.hardware_override.as_ref().unwrap().row_lookup, Some(RowLookup::Split));
        assert_eq!(d.mode_override.as_ref().unwrap().icon_kind, Some(IconKind::Icon8x8));
        assert_eq!(cfg.fonts.as_ref().unwrap().language, Some(Language::Chinese));

        let settings = d.engine_settings();
        assert_eq!(settings.clock_style, Some(ClockLayout::BigAlarmIcons));
        assert_eq!(settings.max_icons, 5);
        assert_eq!(settings.icon_spacing, 2);
        assert_eq!(d.hardware_profile().unwrap().name, "config1009");
    }

    #[test]
    fn test_config_merge_layers() {
        let mut cfg = parse_yaml(SAMPLE).unwrap();
        let cli = Cli { mode: Some(7), contrast: Some(90), ..Default::default() };
        apply_cli_overrides(&mut cfg, &cli);
        assert_eq!(display(&cfg).mode, Some(7));
        assert_eq!(display(&cfg).contrast, Some(90));
        assert_eq!(display(&cfg).clock_style, Some(4));

        let later = parse_yaml("display:\n  mode: 1\n").unwrap();
        merge(&mut cfg, later);
        assert_eq!(display(&cfg).mode, Some(1));
        assert_eq!(display(&cfg).hardware.as_deref(), Some("config1009"));
    }

    #[test]
    fn test_config_validation_rejects() {
        for bad in [
            "display:\n  hardware: st7565\n",
            "display:\n  mode: 11\n",
            "display:\n  mode: 9\n",
            "display:\n  contrast: 101\n",
            "display:\n  max_icons: 8\n",
            "display:\n  clock_style: 5\n",
            "display:\n  greyscale_config: 2\n",
            "display:\n  hardware_override:\n    width: 0\n",
        ] {
            let cfg = parse_yaml(bad).unwrap();
            assert!(matches!(validate(&cfg), Err(ConfigError::Validation(_))), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_config_empty_uses_defaults() {
        let cfg = Config::default();
        validate(&cfg).unwrap();
        let d = cfg.display.unwrap_or_default();
        assert_eq!(d.hardware_profile().unwrap().name, DEFAULT_HARDWARE);
        assert_eq!(d.engine_settings(), EngineSettings::default());
    }

    #[test]
    fn test_config_japanese_needs_index() {
        let hw = HardwareProfile::by_name(DEFAULT_HARDWARE).unwrap();
        let mut engine = EngineContext::init(hw, &EngineSettings::default()).unwrap();
        let fonts = FontConfig { japanese: Some("jp.bin".into()), ..Default::default() };
        assert!(matches!(fonts.load_into(&mut engine), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_config_missing_font_file() {
        let hw = HardwareProfile::by_name(DEFAULT_HARDWARE).unwrap();
        let mut engine = EngineContext::init(hw, &EngineSettings::default()).unwrap();
        let fonts = FontConfig { chinese: Some("/nonexistent/monolcd/cn.bin".into()), ..Default::default() };
        assert!(matches!(fonts.load_into(&mut engine), Err(ConfigError::Io(_))));
    }
}
