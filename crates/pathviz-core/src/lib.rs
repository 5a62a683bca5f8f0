//! **pathviz-core**: incremental A* search over a fixed 8-connected grid.
//!
//! The crate owns everything with algorithmic content in the pathviz
//! visualizer; drawing and input live in front-end crates that only talk to
//! the [`SearchEngine`] API:
//!
//! - [`Grid`] owns all [`Cell`]s and their fixed adjacency
//! - [`Frontier`] is the open set, popping the lowest `f` first with ties
//!   going to the earliest insertion
//! - [`SearchEngine`] performs one expansion per [`step`](SearchEngine::step)
//!   and exposes the open, closed and path cells for rendering
//!
//! ```
//! use pathviz_core::{new_search, Point, Step};
//!
//! let mut engine = new_search(5, 5, [], Point::new(0, 0), Point::new(4, 4)).unwrap();
//! let path = loop {
//!     match engine.step() {
//!         Step::Searching => continue,
//!         Step::Success(path) => break path,
//!         other => panic!("unexpected {other:?}"),
//!     }
//! };
//! assert_eq!(path.len(), 5);
//! ```

pub mod cell;
pub mod distance;
pub mod engine;
pub mod error;
pub mod frontier;
pub mod geom;
pub mod grid;

pub use cell::{Cell, CellId};
pub use distance::manhattan;
pub use engine::{new_search, SearchEngine, SearchState, Step};
pub use error::{EmptyFrontier, SearchError};
pub use frontier::Frontier;
pub use geom::{Point, Range};
pub use grid::Grid;
