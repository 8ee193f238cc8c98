/// External configuration loader.
///
/// Reads `config.toml` from an explicit path, or searches the executable's
/// directory, the CWD and the data directories.
/// Falls back to sensible defaults if the file is missing or incomplete.
///
/// ```toml
/// [speed]
/// tick_rate_ms = 33
///
/// [input]
/// drain_order = "lifo"   # or "fifo"
///
/// [gamepad]
/// quit = ["Select"]
/// ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::sim::queue::DrainOrder;

const CONFIG_FILE: &str = "config.toml";

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub speed: SpeedConfig,
    pub input: InputConfig,
    pub gamepad: GamepadConfig,
}

#[derive(Clone, Debug)]
pub struct SpeedConfig {
    pub tick_rate_ms: u64,
}

#[derive(Clone, Debug)]
pub struct InputConfig {
    pub drain_order: DrainOrder,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub quit: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} parse error: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    speed: TomlSpeed,
    #[serde(default)]
    input: TomlInput,
    #[serde(default)]
    gamepad: TomlGamepad,
}

#[derive(Deserialize, Debug)]
struct TomlSpeed {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
}

#[derive(Deserialize, Debug, Default)]
struct TomlInput {
    #[serde(default)]
    drain_order: DrainOrder,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_quit")]
    quit: Vec<String>,
}

// ── Defaults ──

fn default_tick_rate() -> u64 { 33 }   // ~30 ticks per second
fn default_quit() -> Vec<String> { vec!["Select".into()] }

impl Default for TomlSpeed {
    fn default() -> Self {
        TomlSpeed { tick_rate_ms: default_tick_rate() }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad { quit: default_quit() }
    }
}

impl From<TomlConfig> for GameConfig {
    fn from(cfg: TomlConfig) -> Self {
        let tick_rate_ms = if cfg.speed.tick_rate_ms == 0 {
            log::warn!("tick_rate_ms = 0 is not allowed, using 1");
            1
        } else {
            cfg.speed.tick_rate_ms
        };
        GameConfig {
            speed: SpeedConfig { tick_rate_ms },
            input: InputConfig { drain_order: cfg.input.drain_order },
            gamepad: GamepadConfig { quit: cfg.gamepad.quit },
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        TomlConfig::default().into()
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config. With `explicit`, only that file is tried; otherwise
    /// search order is (1) exe directory, (2) CWD, (3) data directories.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load(explicit: Option<&Path>) -> Self {
        let found = match explicit {
            Some(path) => Some(read_config(path)),
            None => candidate_dirs()
                .into_iter()
                .map(|d| d.join(CONFIG_FILE))
                .find(|p| p.exists())
                .map(|p| read_config(&p)),
        };

        match found {
            Some(Ok(cfg)) => cfg,
            Some(Err(e)) => {
                log::warn!("{e}");
                log::warn!("Using default settings.");
                GameConfig::default()
            }
            None => {
                log::info!("no {CONFIG_FILE} found, using defaults");
                GameConfig::default()
            }
        }
    }

    /// Parse config text. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<TomlConfig>(text).map(GameConfig::from)
    }
}

fn read_config(path: &Path) -> Result<GameConfig, ConfigError> {
    let text = std::fs::read_to_string(path)
        .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
    let cfg = GameConfig::from_toml_str(&text)
        .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
    log::info!("loaded {}", path.display());
    Ok(cfg)
}

/// Candidate directories to search: exe dir + CWD + data paths (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG data home (~/.local/share/boulderbox)
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/boulderbox");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    // 4. System data directory (/usr/share/boulderbox)
    let sys = PathBuf::from("/usr/share/boulderbox");
    if sys.is_dir() && !dirs.iter().any(|d| d == &sys) {
        dirs.push(sys);
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}
