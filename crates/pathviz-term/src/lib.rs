//! Terminal front end for pathviz.
//!
//! Builds a random wall layout, then animates the A* search one expansion
//! per tick: open cells green, closed cells red, the final path blue.

pub mod config;
pub mod driver;
pub mod layout;
pub mod render;

pub use config::{ConfigError, VisualizerConfig, USAGE};
pub use driver::{Command, Frame, Paint, Surface, TickDriver};
pub use render::{board_fits, TerminalSurface};
