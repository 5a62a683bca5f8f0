//! Visualizer settings: defaults, optional TOML file, command-line flags.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use pathviz_core::Point;
use serde::Deserialize;

/// Largest accepted column or row count.
pub const MAX_SIDE: i32 = 1000;

pub const USAGE: &str = "\
Usage: pathviz [OPTIONS]

Options:
  --config FILE   read settings from a TOML file (flags override it)
  --cols N        grid columns, at most 1000 (default 21)
  --rows N        grid rows, at most 1000 (default 21)
  --walls P       wall probability per cell, 0 <= P < 1 (default 0.4)
  --fps N         search steps per second (default 60)
  --seed N        seed for the wall layout
  --log FILE      write log records to FILE; RUST_LOG sets the level
  -h, --help      print this help

Without --log, records go to stderr and are capped at warn, since
anything written there lands on top of the board.

Keys: q/Esc quit, space pause, s step while paused, r new layout";

/// Everything the front end needs to build and animate a search.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VisualizerConfig {
    pub cols: i32,
    pub rows: i32,
    /// Probability that a non-endpoint cell becomes a wall.
    pub wall_density: f64,
    pub fps: u32,
    /// Fixed seed for reproducible layouts; random when absent.
    pub seed: Option<u64>,
    /// Log destination; stderr when absent.
    pub log_file: Option<PathBuf>,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            cols: 21,
            rows: 21,
            wall_density: 0.4,
            fps: 60,
            seed: None,
            log_file: None,
        }
    }
}

/// Errors raised while assembling a [`VisualizerConfig`].
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A flag that is not recognised.
    UnknownFlag(String),
    /// A flag given without its value.
    MissingValue(String),
    /// A flag value that does not parse.
    InvalidValue { flag: String, value: String },
    /// The config file could not be read or parsed.
    File { path: String, reason: String },
    /// Settings parsed but are out of range.
    OutOfRange(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownFlag(flag) => write!(f, "unknown flag {flag}"),
            Self::MissingValue(flag) => write!(f, "{flag} needs a value"),
            Self::InvalidValue { flag, value } => write!(f, "invalid value {value:?} for {flag}"),
            Self::File { path, reason } => write!(f, "config {path}: {reason}"),
            Self::OutOfRange(reason) => write!(f, "invalid settings: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl VisualizerConfig {
    /// Start cell: the top-left corner.
    pub fn start(&self) -> Point {
        Point::ZERO
    }

    /// End cell: the bottom-right corner.
    pub fn end(&self) -> Point {
        Point::new(self.cols - 1, self.rows - 1)
    }

    /// Interval between search steps.
    pub fn tick(&self) -> Duration {
        Duration::from_secs(1) / self.fps.max(1)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::File {
            path: "<inline>".into(),
            reason: e.to_string(),
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let file_err = |reason: String| ConfigError::File {
            path: path.display().to_string(),
            reason,
        };
        let text = std::fs::read_to_string(path).map_err(|e| file_err(e.to_string()))?;
        toml::from_str(&text).map_err(|e| file_err(e.to_string()))
    }

    /// Build settings from command-line arguments (program name excluded).
    ///
    /// `--config` is applied first wherever it appears; other flags override
    /// the file in order.
    pub fn from_args<I>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        let mut pairs = Vec::new();
        let mut it = args.iter();
        while let Some(flag) = it.next() {
            let value = it
                .next()
                .ok_or_else(|| ConfigError::MissingValue(flag.clone()))?;
            pairs.push((flag.as_str(), value.as_str()));
        }

        let mut cfg = match pairs.iter().rev().find(|(flag, _)| *flag == "--config") {
            Some((_, path)) => Self::load(path)?,
            None => Self::default(),
        };

        for (flag, value) in pairs {
            match flag {
                "--config" => {}
                "--cols" => cfg.cols = parse(flag, value)?,
                "--rows" => cfg.rows = parse(flag, value)?,
                "--walls" => cfg.wall_density = parse(flag, value)?,
                "--fps" => cfg.fps = parse(flag, value)?,
                "--seed" => cfg.seed = Some(parse(flag, value)?),
                "--log" => cfg.log_file = Some(PathBuf::from(value)),
                _ => return Err(ConfigError::UnknownFlag(flag.to_string())),
            }
        }
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject settings the front end cannot animate.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cols <= 0 || self.rows <= 0 {
            return Err(ConfigError::OutOfRange(format!(
                "grid must be at least 1x1, got {}x{}",
                self.cols, self.rows
            )));
        }
        if self.cols > MAX_SIDE || self.rows > MAX_SIDE {
            return Err(ConfigError::OutOfRange(format!(
                "grid sides are capped at {MAX_SIDE}, got {}x{}",
                self.cols, self.rows
            )));
        }
        if self.start() == self.end() {
            return Err(ConfigError::OutOfRange(
                "grid needs at least two cells for distinct start and end".into(),
            ));
        }
        if !(0.0..1.0).contains(&self.wall_density) {
            return Err(ConfigError::OutOfRange(format!(
                "wall density must be in [0, 1), got {}",
                self.wall_density
            )));
        }
        if self.fps == 0 || self.fps > 1000 {
            return Err(ConfigError::OutOfRange(format!(
                "fps must be between 1 and 1000, got {}",
                self.fps
            )));
        }
        Ok(())
    }
}

fn parse<T: std::str::FromStr>(flag: &str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        flag: flag.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_classic_board() {
        let cfg = VisualizerConfig::from_args(Vec::<String>::new()).unwrap();
        assert_eq!(cfg, VisualizerConfig::default());
        assert_eq!(cfg.end(), Point::new(20, 20));
        assert_eq!(cfg.tick(), Duration::from_secs(1) / 60);
    }

    #[test]
    fn flags_override_defaults() {
        let cfg =
            VisualizerConfig::from_args(["--cols", "10", "--rows", "5", "--walls", "0.25", "--seed", "7"])
                .unwrap();
        assert_eq!(cfg.cols, 10);
        assert_eq!(cfg.rows, 5);
        assert_eq!(cfg.wall_density, 0.25);
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.end(), Point::new(9, 4));
    }

    #[test]
    fn bad_flags_are_reported() {
        assert_eq!(
            VisualizerConfig::from_args(["--colour", "red"]),
            Err(ConfigError::UnknownFlag("--colour".into()))
        );
        assert_eq!(
            VisualizerConfig::from_args(["--cols"]),
            Err(ConfigError::MissingValue("--cols".into()))
        );
        assert!(matches!(
            VisualizerConfig::from_args(["--fps", "fast"]),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn out_of_range_settings_are_rejected() {
        for args in [
            ["--cols", "0"],
            ["--walls", "1.0"],
            ["--fps", "0"],
            ["--rows", "-3"],
        ] {
            assert!(matches!(
                VisualizerConfig::from_args(args),
                Err(ConfigError::OutOfRange(_))
            ));
        }
        let single = VisualizerConfig::from_args(["--cols", "1", "--rows", "1"]);
        assert!(matches!(single, Err(ConfigError::OutOfRange(_))));
    }

    #[test]
    fn oversized_grids_are_rejected() {
        let widest = VisualizerConfig::from_args(["--cols", "1000", "--rows", "1000"]).unwrap();
        assert_eq!(widest.end(), Point::new(999, 999));
        for args in [["--cols", "1001"], ["--rows", "40000"]] {
            assert!(matches!(
                VisualizerConfig::from_args(args),
                Err(ConfigError::OutOfRange(_))
            ));
        }
        let from_file = VisualizerConfig::from_toml_str("cols = 70000\n").unwrap();
        assert!(from_file.validate().is_err());
    }

    #[test]
    fn log_flag_sets_the_log_file() {
        let cfg = VisualizerConfig::from_args(["--log", "/tmp/pathviz.log"]).unwrap();
        assert_eq!(cfg.log_file, Some(PathBuf::from("/tmp/pathviz.log")));
        let cfg = VisualizerConfig::from_toml_str("log_file = 'run.log'\n").unwrap();
        assert_eq!(cfg.log_file.as_deref(), Some(Path::new("run.log")));
        assert_eq!(VisualizerConfig::default().log_file, None);
    }

    #[test]
    fn toml_fills_missing_fields_with_defaults() {
        let cfg = VisualizerConfig::from_toml_str("cols = 40\nseed = 99\n").unwrap();
        assert_eq!(cfg.cols, 40);
        assert_eq!(cfg.rows, 21);
        assert_eq!(cfg.seed, Some(99));
        assert!(VisualizerConfig::from_toml_str("colour = 'red'").is_err());
    }

    #[test]
    fn file_then_flags() {
        let path = std::env::temp_dir().join(format!("pathviz-config-{}.toml", std::process::id()));
        std::fs::write(&path, "cols = 30\nrows = 12\nwall_density = 0.1\n").unwrap();
        let path_str = path.to_string_lossy().into_owned();

        let cfg = VisualizerConfig::from_args(["--rows", "8", "--config", path_str.as_str()]).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(cfg.cols, 30);
        assert_eq!(cfg.rows, 8);
        assert_eq!(cfg.wall_density, 0.1);
    }

    #[test]
    fn missing_file_is_a_file_error() {
        let r = VisualizerConfig::from_args(["--config", "/nonexistent/pathviz.toml"]);
        assert!(matches!(r, Err(ConfigError::File { .. })));
    }
}
