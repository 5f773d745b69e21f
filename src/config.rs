/*
 *  config.rs
 *
 *  BadgeScope - a scope that fits on a lanyard
 *  (c) 2020-26 Stuart Hunter
 *
 *  Layered configuration - defaults, YAML file, CLI overrides
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
use clap::{ArgAction, Parser, ValueHint};
use dirs_next::home_dir;
use std::{fs, path::{Path, PathBuf}};
use thiserror::Error;

use crate::constants::*;
use crate::geometry::GraphGeometry;
use crate::input::ButtonState;
use crate::scope::{ScopeContext, Timing};

/// Error type for config loading/validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Top-level scope configuration. Every field is optional, unset means default.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub log_level: Option<String>,     // e.g., "info" | "debug"
    pub display: Option<DisplayConfig>,
    pub graph: Option<GraphConfig>,
    pub sources: Option<SourcesConfig>,
    pub run: Option<RunConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DisplayConfig {
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// refresh calls needed before a frame is on the panel
    pub refresh_passes: Option<u32>,
    pub minimum_fps: Option<u32>,
    /// PPM output, `{frame}` expands to the frame number
    pub snapshot_path: Option<PathBuf>,
    pub snapshot_every: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct GraphConfig {
    pub x_left: Option<i32>,
    pub x_right: Option<i32>,
    pub y_top: Option<i32>,
    pub y_bottom: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SourcesConfig {
    pub microphone: Option<SourceConfig>,
    pub light: Option<SourceConfig>,
    pub accelerometer: Option<SourceConfig>,
    pub sawtooth: Option<SawtoothConfig>,
}

/// Where a channel's samples come from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceConfig {
    #[default]
    Simulated,
    /// sensor not fitted, channel comes up disabled
    Absent,
    I2c {
        bus: String,        // e.g. "/dev/i2c-1"
        address: u8,        // e.g. 0x18
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SawtoothConfig {
    pub peak: Option<i32>,
    pub step: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RunConfig {
    /// stop after this many cycles, forever when unset
    pub cycles: Option<u64>,
    pub run_slow: Option<bool>,
    pub tick_us: Option<u32>,
    /// one entry per scan, e.g. "select", "a+left", ""
    pub buttons: Option<Vec<String>>,
    pub led_brightness: Option<u8>,
}

/// CLI overrides. All fields are Options so we can layer them over YAML.
#[derive(Debug, Parser, Clone, Default)]
#[command(name = "badgescope", about = "BadgeScope - badge oscilloscope", disable_help_flag = false)]
pub struct Cli {
    /// Path to a YAML config file (overrides search)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub log_level: Option<String>,
    #[arg(long)]
    pub display_width: Option<u32>,
    #[arg(long)]
    pub display_height: Option<u32>,
    #[arg(long)]
    pub refresh_passes: Option<u32>,
    #[arg(long)]
    pub minimum_fps: Option<u32>,
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub snapshot_path: Option<PathBuf>,
    #[arg(long)]
    pub snapshot_every: Option<u64>,
    /// accelerometer I2C bus, e.g. /dev/i2c-1
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub accel_bus: Option<String>,
    /// accelerometer I2C address, decimal or 0x-prefixed hex
    #[arg(long, value_parser = parse_address)]
    pub accel_address: Option<u8>,
    /// run without an accelerometer
    #[arg(long, action = ArgAction::SetTrue)]
    pub no_accel: bool,
    #[arg(long)]
    pub cycles: Option<u64>,
    /// pace the loop to 10 cycles a second
    #[arg(long, action = ArgAction::SetTrue)]
    pub run_slow: bool,
    #[arg(long)]
    pub tick_us: Option<u32>,
    /// button script, comma separated scans
    #[arg(long, value_delimiter = ',')]
    pub buttons: Option<Vec<String>>,
    #[arg(long)]
    pub led_brightness: Option<u8>,
    /// dump fully merged config (after overrides) and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub dump_config: bool,
}

fn parse_address(s: &str) -> Result<u8, String> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => s.parse::<u8>(),
    };
    parsed.map_err(|e| format!("invalid I2C address '{s}': {e}"))
}

/// Public entry point: parse CLI, read YAML, merge, validate.
pub fn load() -> Result<Config, ConfigError> {
    let cli = Cli::parse();
    let cfg = load_with(&cli)?;

    if cli.dump_config {
        // Pretty YAML of effective config (nice for debugging)
        let s = serde_yaml::to_string(&cfg)?;
        println!("{s}");
        std::process::exit(0);
    }

    Ok(cfg)
}

/// Layer an already parsed command line over defaults and the YAML file
pub fn load_with(cli: &Cli) -> Result<Config, ConfigError> {
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
    // XDG-style: ~/.config/badgescope/config.yaml
    if let Some(home) = home_dir() {
        let p = home.join(".config/badgescope/config.yaml");
        if p.exists() { return Some(p) }
        let p = home.join(".config/badgescope.yaml");
        if p.exists() { return Some(p) }
    }
    // project local
    for candidate in &["badgescope.yaml", "config.yaml"] {
        let p = PathBuf::from(candidate);
        if p.exists() { return Some(p) }
    }
    None
}

fn read_yaml(path: &Path) -> Result<Config, ConfigError> {
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
    match (&mut dst.display, src.display) {
        (None, Some(c)) => dst.display = Some(c),
        (Some(d), Some(s)) => merge_display(d, s),
        _ => {}
    }
    match (&mut dst.graph, src.graph) {
        (None, Some(c)) => dst.graph = Some(c),
        (Some(d), Some(s)) => merge_graph(d, s),
        _ => {}
    }
    match (&mut dst.sources, src.sources) {
        (None, Some(c)) => dst.sources = Some(c),
        (Some(d), Some(s)) => merge_sources(d, s),
        _ => {}
    }
    match (&mut dst.run, src.run) {
        (None, Some(c)) => dst.run = Some(c),
        (Some(d), Some(s)) => merge_run(d, s),
        _ => {}
    }
}

fn merge_display(dst: &mut DisplayConfig, src: DisplayConfig) {
    if src.width.is_some()          { dst.width = src.width; }
    if src.height.is_some()         { dst.height = src.height; }
    if src.refresh_passes.is_some() { dst.refresh_passes = src.refresh_passes; }
    if src.minimum_fps.is_some()    { dst.minimum_fps = src.minimum_fps; }
    if src.snapshot_path.is_some()  { dst.snapshot_path = src.snapshot_path; }
    if src.snapshot_every.is_some() { dst.snapshot_every = src.snapshot_every; }
}

fn merge_graph(dst: &mut GraphConfig, src: GraphConfig) {
    if src.x_left.is_some()   { dst.x_left = src.x_left; }
    if src.x_right.is_some()  { dst.x_right = src.x_right; }
    if src.y_top.is_some()    { dst.y_top = src.y_top; }
    if src.y_bottom.is_some() { dst.y_bottom = src.y_bottom; }
}

fn merge_sources(dst: &mut SourcesConfig, src: SourcesConfig) {
    if src.microphone.is_some()    { dst.microphone = src.microphone; }
    if src.light.is_some()         { dst.light = src.light; }
    if src.accelerometer.is_some() { dst.accelerometer = src.accelerometer; }
    match (&mut dst.sawtooth, src.sawtooth) {
        (None, Some(c)) => dst.sawtooth = Some(c),
        (Some(d), Some(s)) => {
            if s.peak.is_some() { d.peak = s.peak; }
            if s.step.is_some() { d.step = s.step; }
        }
        _ => {}
    }
}

fn merge_run(dst: &mut RunConfig, src: RunConfig) {
    if src.cycles.is_some()         { dst.cycles = src.cycles; }
    if src.run_slow.is_some()       { dst.run_slow = src.run_slow; }
    if src.tick_us.is_some()        { dst.tick_us = src.tick_us; }
    if src.buttons.is_some()        { dst.buttons = src.buttons; }
    if src.led_brightness.is_some() { dst.led_brightness = src.led_brightness; }
}

fn apply_cli_overrides(cfg: &mut Config, cli: &Cli) {
    if cli.log_level.is_some()       { cfg.log_level = cli.log_level.clone(); }

    let any_display = cli.display_width.is_some()
        || cli.display_height.is_some()
        || cli.refresh_passes.is_some()
        || cli.minimum_fps.is_some()
        || cli.snapshot_path.is_some()
        || cli.snapshot_every.is_some();
    if any_display {
        let display = cfg.display.get_or_insert_with(DisplayConfig::default);
        if cli.display_width.is_some()  { display.width = cli.display_width; }
        if cli.display_height.is_some() { display.height = cli.display_height; }
        if cli.refresh_passes.is_some() { display.refresh_passes = cli.refresh_passes; }
        if cli.minimum_fps.is_some()    { display.minimum_fps = cli.minimum_fps; }
        if cli.snapshot_path.is_some()  { display.snapshot_path = cli.snapshot_path.clone(); }
        if cli.snapshot_every.is_some() { display.snapshot_every = cli.snapshot_every; }
    }

    if cli.no_accel {
        let sources = cfg.sources.get_or_insert_with(SourcesConfig::default);
        sources.accelerometer = Some(SourceConfig::Absent);
    } else if cli.accel_bus.is_some() || cli.accel_address.is_some() {
        let sources = cfg.sources.get_or_insert_with(SourcesConfig::default);
        // fill whichever half the file did not give
        let (bus, address) = match &sources.accelerometer {
            Some(SourceConfig::I2c { bus, address }) => (bus.clone(), *address),
            _ => ("/dev/i2c-1".to_string(), LIS3DH_DEFAULT_ADDRESS),
        };
        sources.accelerometer = Some(SourceConfig::I2c {
            bus: cli.accel_bus.clone().unwrap_or(bus),
            address: cli.accel_address.unwrap_or(address),
        });
    }

    let any_run = cli.cycles.is_some()
        || cli.run_slow
        || cli.tick_us.is_some()
        || cli.buttons.is_some()
        || cli.led_brightness.is_some();
    if any_run {
        let run = cfg.run.get_or_insert_with(RunConfig::default);
        if cli.cycles.is_some()         { run.cycles = cli.cycles; }
        if cli.run_slow                 { run.run_slow = Some(true); }
        if cli.tick_us.is_some()        { run.tick_us = cli.tick_us; }
        if cli.buttons.is_some()        { run.buttons = cli.buttons.clone(); }
        if cli.led_brightness.is_some() { run.led_brightness = cli.led_brightness; }
    }
}

/// Put any invariants here (required fields, ranges, etc.)
pub fn validate(cfg: &Config) -> Result<(), ConfigError> {
    let (w, h) = cfg.display_size();
    if w == 0 || h == 0 {
        return Err(ConfigError::Validation("display width/height must be > 0".into()));
    }
    if cfg.refresh_passes() == 0 {
        return Err(ConfigError::Validation("display refresh_passes must be >= 1".into()));
    }

    let g = cfg.geometry();
    if g.x_left >= g.x_right || g.y_top >= g.y_bottom {
        return Err(ConfigError::Validation(
            "graph needs x_left < x_right and y_top < y_bottom".into(),
        ));
    }
    // frame sits one pixel outside the graph and must stay on the panel
    if g.x_left < 1 || g.y_top < 1 || g.x_right + 1 >= w as i32 || g.y_bottom + 1 >= h as i32 {
        return Err(ConfigError::Validation(format!(
            "graph {}..{} x {}..{} with its frame does not fit a {}x{} display",
            g.x_left, g.x_right, g.y_top, g.y_bottom, w, h
        )));
    }

    let (peak, step) = cfg.sawtooth();
    if !(1..ADC_MIDSCALE).contains(&peak) {
        return Err(ConfigError::Validation("sawtooth peak must be 1..=32767".into()));
    }
    if step < 1 {
        return Err(ConfigError::Validation("sawtooth step must be >= 1".into()));
    }

    if let Some(sources) = cfg.sources.as_ref() {
        for (name, src) in [("microphone", &sources.microphone), ("light", &sources.light)] {
            if matches!(src, Some(SourceConfig::I2c { .. })) {
                return Err(ConfigError::Validation(format!("{name} source cannot be i2c")));
            }
        }
    }

    cfg.button_script()?;
    Ok(())
}

impl Config {
    pub fn display_size(&self) -> (u32, u32) {
        let d = self.display.as_ref();
        (
            d.and_then(|d| d.width).unwrap_or(DISPLAY_WIDTH),
            d.and_then(|d| d.height).unwrap_or(DISPLAY_HEIGHT),
        )
    }

    pub fn refresh_passes(&self) -> u32 {
        self.display.as_ref().and_then(|d| d.refresh_passes).unwrap_or(1)
    }

    pub fn snapshot(&self) -> Option<(PathBuf, u64)> {
        let d = self.display.as_ref()?;
        let path = d.snapshot_path.clone()?;
        Some((path, d.snapshot_every.unwrap_or(1)))
    }

    pub fn geometry(&self) -> GraphGeometry {
        let d = GraphGeometry::default();
        match self.graph.as_ref() {
            Some(g) => GraphGeometry::new(
                g.x_left.unwrap_or(d.x_left),
                g.x_right.unwrap_or(d.x_right),
                g.y_top.unwrap_or(d.y_top),
                g.y_bottom.unwrap_or(d.y_bottom),
            ),
            None => d,
        }
    }

    pub fn timing(&self) -> Timing {
        let base = Timing::default();
        let run = self.run.as_ref();
        Timing {
            tick_us: run.and_then(|r| r.tick_us).unwrap_or(base.tick_us),
            minimum_fps: self.display.as_ref().and_then(|d| d.minimum_fps).unwrap_or(base.minimum_fps),
            run_slow: run.and_then(|r| r.run_slow).unwrap_or(base.run_slow),
        }
    }

    pub fn context(&self) -> ScopeContext {
        ScopeContext { geometry: self.geometry(), timing: self.timing() }
    }

    pub fn cycles(&self) -> Option<u64> {
        self.run.as_ref().and_then(|r| r.cycles)
    }

    pub fn led_brightness(&self) -> u8 {
        self.run.as_ref().and_then(|r| r.led_brightness).unwrap_or(255)
    }

    /// Parsed button script, empty when none is configured
    pub fn button_script(&self) -> Result<Vec<ButtonState>, ConfigError> {
        let entries = match self.run.as_ref().and_then(|r| r.buttons.as_ref()) {
            Some(e) => e,
            None => return Ok(Vec::new()),
        };
        entries
            .iter()
            .map(|e| e.parse::<ButtonState>().map_err(|m| ConfigError::Validation(format!("button script: {m}"))))
            .collect()
    }

    pub fn sawtooth(&self) -> (i32, i32) {
        let s = self.sources.as_ref().and_then(|s| s.sawtooth.as_ref());
        (
            s.and_then(|s| s.peak).unwrap_or(SAWTOOTH_PEAK),
            s.and_then(|s| s.step).unwrap_or(SAWTOOTH_STEP),
        )
    }

    pub fn microphone(&self) -> SourceConfig {
        self.sources.as_ref().and_then(|s| s.microphone.clone()).unwrap_or_default()
    }

    pub fn light(&self) -> SourceConfig {
        self.sources.as_ref().and_then(|s| s.light.clone()).unwrap_or_default()
    }

    pub fn accelerometer(&self) -> SourceConfig {
        self.sources.as_ref().and_then(|s| s.accelerometer.clone()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = r#"
log_level: debug
display:
  refresh_passes: 2
  snapshot_path: /tmp/frame-{frame}.ppm
graph:
  x_left: 12
sources:
  accelerometer:
    type: i2c
    bus: /dev/i2c-1
    address: 24
  light:
    type: absent
  sawtooth:
    peak: 8000
run:
  cycles: 50
  buttons: ["", "select", "a+left"]
"#;

    #[test]
    fn test_defaults_are_valid() {
        let cfg = Config::default();
        validate(&cfg).unwrap();
        assert_eq!(cfg.geometry(), GraphGeometry::default());
        assert_eq!(cfg.display_size(), (160, 128));
        assert_eq!(cfg.refresh_passes(), 1);
        assert_eq!(cfg.timing(), Timing::default());
        assert_eq!(cfg.accelerometer(), SourceConfig::Simulated);
        assert_eq!(cfg.cycles(), None);
        assert!(cfg.button_script().unwrap().is_empty());
    }

    #[test]
    fn test_parse_yaml() {
        let cfg = parse_yaml(YAML).unwrap();
        validate(&cfg).unwrap();
        assert_eq!(cfg.refresh_passes(), 2);
        assert_eq!(cfg.geometry().x_left, 12);
        assert_eq!(cfg.geometry().x_right, GRAPH_X_RIGHT);
        assert_eq!(
            cfg.accelerometer(),
            SourceConfig::I2c { bus: "/dev/i2c-1".into(), address: 0x18 }
        );
        assert_eq!(cfg.light(), SourceConfig::Absent);
        assert_eq!(cfg.microphone(), SourceConfig::Simulated);
        assert_eq!(cfg.sawtooth(), (8000, SAWTOOTH_STEP));
        assert_eq!(cfg.snapshot().unwrap().1, 1);
        assert_eq!(cfg.button_script().unwrap().len(), 3);
    }

    #[test]
    fn test_merge_keeps_unset_fields() {
        let mut cfg = parse_yaml(YAML).unwrap();
        let over = parse_yaml("run:\n  run_slow: true\ngraph:\n  y_top: 30\n").unwrap();
        merge(&mut cfg, over);
        assert_eq!(cfg.cycles(), Some(50));
        assert!(cfg.timing().run_slow);
        assert_eq!(cfg.geometry().x_left, 12);
        assert_eq!(cfg.geometry().y_top, 30);
    }

    #[test]
    fn test_cli_overrides_yaml() {
        let mut cfg = parse_yaml(YAML).unwrap();
        let cli = Cli::try_parse_from([
            "badgescope",
            "--cycles", "5",
            "--run-slow",
            "--accel-address", "0x19",
            "--buttons", "select,a+left,b",
        ])
        .unwrap();
        apply_cli_overrides(&mut cfg, &cli);
        assert_eq!(cfg.cycles(), Some(5));
        assert!(cfg.timing().run_slow);
        assert_eq!(
            cfg.accelerometer(),
            SourceConfig::I2c { bus: "/dev/i2c-1".into(), address: 0x19 }
        );
        assert_eq!(cfg.button_script().unwrap().len(), 3);
    }

    #[test]
    fn test_no_accel_flag() {
        let mut cfg = Config::default();
        let cli = Cli::try_parse_from(["badgescope", "--no-accel"]).unwrap();
        apply_cli_overrides(&mut cfg, &cli);
        assert_eq!(cfg.accelerometer(), SourceConfig::Absent);
    }

    #[test]
    fn test_rejects_graph_off_panel() {
        let cfg = parse_yaml("graph:\n  x_right: 159\n").unwrap();
        assert!(matches!(validate(&cfg), Err(ConfigError::Validation(_))));
        let cfg = parse_yaml("graph:\n  y_top: 0\n").unwrap();
        assert!(validate(&cfg).is_err());
        let cfg = parse_yaml("graph:\n  x_left: 140\n").unwrap();
        assert!(validate(&cfg).is_err());
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(validate(&parse_yaml("display:\n  refresh_passes: 0\n").unwrap()).is_err());
        assert!(validate(&parse_yaml("sources:\n  sawtooth:\n    peak: 40000\n").unwrap()).is_err());
        assert!(validate(&parse_yaml("sources:\n  sawtooth:\n    step: 0\n").unwrap()).is_err());
        assert!(validate(&parse_yaml("run:\n  buttons: [\"turbo\"]\n").unwrap()).is_err());
        let mic_i2c = "sources:\n  microphone:\n    type: i2c\n    bus: /dev/i2c-1\n    address: 1\n";
        assert!(validate(&parse_yaml(mic_i2c).unwrap()).is_err());
    }

    #[test]
    fn test_parse_address() {
        assert_eq!(parse_address("0x18"), Ok(0x18));
        assert_eq!(parse_address("25"), Ok(25));
        assert!(parse_address("0x1ff").is_err());
    }

    #[test]
    fn test_missing_explicit_file() {
        let cli = Cli { config: Some(PathBuf::from("/nonexistent/badgescope.yaml")), ..Cli::default() };
        assert!(matches!(load_with(&cli), Err(ConfigError::Validation(_))));
    }
}
