//! The [`Grid`] type: owner of every [`Cell`] and of the fixed 8-way
//! adjacency between them.

use smallvec::SmallVec;

use crate::cell::{Cell, CellId};
use crate::error::SearchError;
use crate::geom::{Point, Range};

/// Compass steps in neighbour order: E, W, S, N, then NW, NE, SW, SE.
///
/// The order decides frontier insertion order and therefore tie-breaking.
const DIRECTIONS: [Point; 8] = [
    Point::new(1, 0),
    Point::new(-1, 0),
    Point::new(0, 1),
    Point::new(0, -1),
    Point::new(-1, -1),
    Point::new(1, -1),
    Point::new(-1, 1),
    Point::new(1, 1),
];

pub(crate) type Neighbors = SmallVec<[CellId; 8]>;

/// A fixed-size `cols x rows` grid of cells stored row-major.
///
/// Neighbour lists hold [`CellId`]s into the same storage, so cells never own
/// each other.
#[derive(Clone, Debug)]
pub struct Grid {
    rng: Range,
    cells: Vec<Cell>,
    adjacency: Vec<Neighbors>,
    start: Option<CellId>,
    end: Option<CellId>,
}

impl Grid {
    /// Allocate a `cols x rows` grid and compute its adjacency.
    ///
    /// Fails with [`SearchError::InvalidConfiguration`] when either dimension
    /// is not positive.
    pub fn new(cols: i32, rows: i32) -> Result<Self, SearchError> {
        if cols <= 0 || rows <= 0 {
            return Err(SearchError::invalid(format!(
                "grid dimensions must be positive, got {cols}x{rows}"
            )));
        }
        let rng = Range::with_size(cols, rows);
        let mut grid = Self {
            rng,
            cells: rng.iter().map(Cell::new).collect(),
            adjacency: Vec::new(),
            start: None,
            end: None,
        };
        grid.compute_adjacency();
        Ok(grid)
    }

    /// Rebuild every neighbour list from the grid bounds.
    ///
    /// Each in-bounds compass step contributes exactly one entry; nothing
    /// wraps around the edges.
    pub fn compute_adjacency(&mut self) {
        let rng = self.rng;
        let width = self.cols() as usize;
        self.adjacency = rng
            .iter()
            .map(|p| {
                DIRECTIONS
                    .iter()
                    .map(|&d| p + d)
                    .filter(|&n| rng.contains(n))
                    .map(|n| CellId(n.y as usize * width + n.x as usize))
                    .collect()
            })
            .collect();
    }

    #[inline]
    pub fn cols(&self) -> i32 {
        self.rng.width()
    }

    #[inline]
    pub fn rows(&self) -> i32 {
        self.rng.height()
    }

    #[inline]
    pub fn range(&self) -> Range {
        self.rng
    }

    /// Number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always `false`: construction rejects empty grids.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.rng.contains(p)
    }

    /// Id of the cell at `p`, or `None` when out of bounds.
    #[inline]
    pub fn id(&self, p: Point) -> Option<CellId> {
        self.contains(p)
            .then(|| CellId(p.y as usize * self.cols() as usize + p.x as usize))
    }

    #[inline]
    pub fn point(&self, id: CellId) -> Point {
        self.cells[id.0].pos()
    }

    #[inline]
    pub fn cell(&self, id: CellId) -> &Cell {
        &self.cells[id.0]
    }

    pub fn cell_at(&self, p: Point) -> Option<&Cell> {
        self.id(p).map(|id| self.cell(id))
    }

    /// Ids of the cells one compass step away from `id`.
    #[inline]
    pub fn neighbors(&self, id: CellId) -> &[CellId] {
        &self.adjacency[id.0]
    }

    /// Row-major iterator over every cell.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.cells.iter()
    }

    /// Coordinates of every wall, row-major.
    pub fn walls(&self) -> Vec<Point> {
        self.cells
            .iter()
            .filter(|c| c.is_wall())
            .map(Cell::pos)
            .collect()
    }

    #[inline]
    pub fn start(&self) -> Option<CellId> {
        self.start
    }

    #[inline]
    pub fn end(&self) -> Option<CellId> {
        self.end
    }

    // -----------------------------------------------------------------------
    // Role edits (reached through SearchEngine, which enforces Idle)
    // -----------------------------------------------------------------------

    pub(crate) fn set_wall(&mut self, p: Point, wall: bool) -> Result<(), SearchError> {
        let id = self.checked_id(p, "wall")?;
        let cell = &mut self.cells[id.0];
        if wall && (cell.start || cell.end) {
            return Err(SearchError::invalid(format!(
                "cannot place a wall on the {} cell {p}",
                if cell.start { "start" } else { "end" }
            )));
        }
        cell.wall = wall;
        Ok(())
    }

    pub(crate) fn set_start(&mut self, p: Point) -> Result<(), SearchError> {
        let id = self.checked_role_target(p, "start")?;
        if let Some(old) = self.start.take() {
            self.cells[old.0].start = false;
        }
        self.cells[id.0].start = true;
        self.start = Some(id);
        Ok(())
    }

    pub(crate) fn set_end(&mut self, p: Point) -> Result<(), SearchError> {
        let id = self.checked_role_target(p, "end")?;
        if let Some(old) = self.end.take() {
            self.cells[old.0].end = false;
        }
        self.cells[id.0].end = true;
        self.end = Some(id);
        Ok(())
    }

    pub(crate) fn cell_mut(&mut self, id: CellId) -> &mut Cell {
        &mut self.cells[id.0]
    }

    pub(crate) fn clear_search_state(&mut self) {
        for c in &mut self.cells {
            c.clear_search_state();
        }
    }

    fn checked_id(&self, p: Point, what: &str) -> Result<CellId, SearchError> {
        self.id(p).ok_or_else(|| {
            SearchError::invalid(format!("{what} {p} is outside the grid {}", self.rng))
        })
    }

    fn checked_role_target(&self, p: Point, role: &str) -> Result<CellId, SearchError> {
        let id = self.checked_id(p, role)?;
        if self.cells[id.0].wall {
            return Err(SearchError::invalid(format!("{role} {p} is a wall")));
        }
        Ok(id)
    }
}
