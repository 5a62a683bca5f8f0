//! The [`Cell`] record and its [`CellId`] handle.

use crate::geom::Point;

/// Index of a cell inside its [`Grid`](crate::Grid) storage.
///
/// Ids are only meaningful for the grid that produced them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellId(pub(crate) usize);

impl CellId {
    /// The raw row-major index.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// One grid node: its fixed coordinate, role flags and per-search state.
///
/// Search fields (`g`, `h`, `f`, `predecessor`) are written only by the
/// engine; everything outside the crate sees them read-only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    pos: Point,
    pub(crate) g: u32,
    pub(crate) h: u32,
    pub(crate) f: u32,
    pub(crate) wall: bool,
    pub(crate) start: bool,
    pub(crate) end: bool,
    pub(crate) predecessor: Option<CellId>,
}

impl Cell {
    pub(crate) fn new(pos: Point) -> Self {
        Self {
            pos,
            g: 0,
            h: 0,
            f: 0,
            wall: false,
            start: false,
            end: false,
            predecessor: None,
        }
    }

    #[inline]
    pub fn pos(&self) -> Point {
        self.pos
    }

    /// Best known cost from the start cell.
    #[inline]
    pub fn g(&self) -> u32 {
        self.g
    }

    /// Heuristic estimate to the goal, set when the cell is first opened.
    #[inline]
    pub fn h(&self) -> u32 {
        self.h
    }

    /// Priority key, `g + h`.
    #[inline]
    pub fn f(&self) -> u32 {
        self.f
    }

    #[inline]
    pub fn is_wall(&self) -> bool {
        self.wall
    }

    #[inline]
    pub fn is_start(&self) -> bool {
        self.start
    }

    #[inline]
    pub fn is_end(&self) -> bool {
        self.end
    }

    /// The cell this one was reached from on its current best path.
    #[inline]
    pub fn predecessor(&self) -> Option<CellId> {
        self.predecessor
    }

    pub(crate) fn clear_search_state(&mut self) {
        self.g = 0;
        self.h = 0;
        self.f = 0;
        self.predecessor = None;
    }
}
