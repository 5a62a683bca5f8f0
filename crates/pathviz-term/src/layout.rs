//! Random wall layouts.

use pathviz_core::{new_search, Point, Range, SearchEngine, SearchError};
use rand::{Rng, RngExt};

use crate::config::VisualizerConfig;

/// Pick walls independently per cell with probability `wall_density`.
///
/// The start and end cells are never walled.
pub fn random_walls(cfg: &VisualizerConfig, rng: &mut impl Rng) -> Vec<Point> {
    let (start, end) = (cfg.start(), cfg.end());
    Range::with_size(cfg.cols, cfg.rows)
        .iter()
        .filter(|&p| p != start && p != end)
        .filter(|_| {
            let r: f64 = rng.random();
            r < cfg.wall_density
        })
        .collect()
}

/// A fresh searching engine over a random layout.
pub fn build_engine(cfg: &VisualizerConfig, rng: &mut impl Rng) -> Result<SearchEngine, SearchError> {
    let walls = random_walls(cfg, rng);
    log::debug!(
        "layout {}x{} with {} walls",
        cfg.cols,
        cfg.rows,
        walls.len()
    );
    new_search(cfg.cols, cfg.rows, walls, cfg.start(), cfg.end())
}
