//! The step-wise A* state machine.
//!
//! A [`SearchEngine`] owns its [`Grid`] and advances one expansion per
//! [`step`](SearchEngine::step) call so a caller can draw between steps.

use std::fmt;

use crate::cell::CellId;
use crate::distance::manhattan;
use crate::error::{EmptyFrontier, SearchError};
use crate::frontier::Frontier;
use crate::geom::Point;
use crate::grid::{Grid, Neighbors};

/// Lifecycle of a search.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchState {
    /// Grid may be edited; no search state exists yet.
    Idle,
    /// Frontier seeded, expanding one cell per step.
    Searching,
    /// The goal was reached and a path is available.
    Success,
    /// The frontier ran dry before the goal was reached.
    Failure,
}

impl SearchState {
    /// Whether further steps have no effect.
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Failure)
    }
}

impl fmt::Display for SearchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Searching => "searching",
            Self::Success => "solved",
            Self::Failure => "exhausted",
        })
    }
}

/// Result of one [`SearchEngine::step`] call.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Step {
    /// The engine is idle and the grid has no valid start/end pair.
    Idle,
    /// One cell was expanded; the goal has not been reached yet.
    Searching,
    /// The goal was reached. The path runs from the end cell back to the
    /// start cell.
    Success(Vec<Point>),
    /// No path exists. This is a normal outcome, not an error.
    Failure,
}

/// Incremental A* over a [`Grid`].
///
/// Every move costs 1, diagonals included, and the heuristic is
/// [`manhattan`]. Closed cells are never re-opened.
#[derive(Clone, Debug)]
pub struct SearchEngine {
    grid: Grid,
    frontier: Frontier,
    closed: Vec<bool>,
    closed_order: Vec<CellId>,
    path: Vec<CellId>,
    goal: Option<CellId>,
    state: SearchState,
    expansions: usize,
}

/// Build a grid from a full description and start searching it.
///
/// Fails with [`SearchError::InvalidConfiguration`] if the dimensions are not
/// positive, if `start` or `end` is out of bounds, if they are equal, or if
/// either is listed among `walls`. Walls outside the grid are rejected too.
/// The returned engine is already [`SearchState::Searching`] with the start
/// cell in the frontier.
pub fn new_search(
    cols: i32,
    rows: i32,
    walls: impl IntoIterator<Item = Point>,
    start: Point,
    end: Point,
) -> Result<SearchEngine, SearchError> {
    let grid = Grid::new(cols, rows)?;
    for (role, p) in [("start", start), ("end", end)] {
        if !grid.contains(p) {
            return Err(SearchError::invalid(format!(
                "{role} {p} is outside the {cols}x{rows} grid"
            )));
        }
    }
    if start == end {
        return Err(SearchError::invalid(format!(
            "start and end must differ, both are {start}"
        )));
    }

    let mut engine = SearchEngine::new(grid);
    for w in walls {
        if w == start || w == end {
            let role = if w == start { "start" } else { "end" };
            return Err(SearchError::invalid(format!("{role} {w} is marked as a wall")));
        }
        engine.set_wall(w, true)?;
    }
    engine.set_start(start)?;
    engine.set_end(end)?;
    engine.begin()?;
    Ok(engine)
}

impl SearchEngine {
    /// Wrap `grid` in an idle engine.
    pub fn new(grid: Grid) -> Self {
        let len = grid.len();
        Self {
            grid,
            frontier: Frontier::with_capacity(len),
            closed: vec![false; len],
            closed_order: Vec::new(),
            path: Vec::new(),
            goal: None,
            state: SearchState::Idle,
            expansions: 0,
        }
    }

    #[inline]
    pub fn state(&self) -> SearchState {
        self.state
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Number of cells popped from the frontier so far, the goal included.
    #[inline]
    pub fn expansions(&self) -> usize {
        self.expansions
    }

    pub fn start(&self) -> Option<Point> {
        self.grid.start().map(|id| self.grid.point(id))
    }

    pub fn end(&self) -> Option<Point> {
        self.grid.end().map(|id| self.grid.point(id))
    }

    // -----------------------------------------------------------------------
    // Grid edits (Idle only)
    // -----------------------------------------------------------------------

    /// Mark or clear a wall at `p`.
    pub fn set_wall(&mut self, p: Point, wall: bool) -> Result<(), SearchError> {
        self.ensure_idle()?;
        self.grid.set_wall(p, wall)
    }

    /// Move the start role to `p`.
    pub fn set_start(&mut self, p: Point) -> Result<(), SearchError> {
        self.ensure_idle()?;
        self.grid.set_start(p)
    }

    /// Move the end role to `p`.
    pub fn set_end(&mut self, p: Point) -> Result<(), SearchError> {
        self.ensure_idle()?;
        self.grid.set_end(p)
    }

    fn ensure_idle(&self) -> Result<(), SearchError> {
        if self.state != SearchState::Idle {
            return Err(SearchError::IllegalMutation { state: self.state });
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Transition from Idle to Searching by seeding the frontier with the
    /// start cell.
    ///
    /// Requires distinct start and end cells. Calling it in any other state
    /// is an [`IllegalMutation`](SearchError::IllegalMutation): use
    /// [`reset`](Self::reset) first.
    pub fn begin(&mut self) -> Result<(), SearchError> {
        self.ensure_idle()?;
        let (Some(start), Some(goal)) = (self.grid.start(), self.grid.end()) else {
            return Err(SearchError::invalid("start and end must both be set"));
        };
        if start == goal {
            return Err(SearchError::invalid(format!(
                "start and end must differ, both are {}",
                self.grid.point(start)
            )));
        }

        let h = manhattan(self.grid.point(start), self.grid.point(goal));
        let cell = self.grid.cell_mut(start);
        cell.g = 0;
        cell.h = h;
        cell.f = h;
        cell.predecessor = None;
        self.frontier.insert(start, h);
        self.goal = Some(goal);
        self.state = SearchState::Searching;
        log::debug!(
            "search started on {}x{} grid: {} -> {}",
            self.grid.cols(),
            self.grid.rows(),
            self.grid.point(start),
            self.grid.point(goal)
        );
        Ok(())
    }

    /// Drop all search state and return to Idle. Walls and roles are kept.
    pub fn reset(&mut self) {
        self.grid.clear_search_state();
        self.frontier.clear();
        self.closed.iter_mut().for_each(|c| *c = false);
        self.closed_order.clear();
        self.path.clear();
        self.goal = None;
        self.expansions = 0;
        self.state = SearchState::Idle;
        log::debug!("search reset");
    }

    /// Advance the search by one expansion.
    ///
    /// While Idle this first tries [`begin`](Self::begin); if the grid has no
    /// valid start/end pair nothing happens and [`Step::Idle`] is returned.
    /// Terminal states repeat their outcome without doing any work.
    pub fn step(&mut self) -> Step {
        match self.state {
            SearchState::Idle => {
                if let Err(e) = self.begin() {
                    log::trace!("step ignored while idle: {e}");
                    return Step::Idle;
                }
            }
            SearchState::Searching => {}
            SearchState::Success => return Step::Success(self.path_cells()),
            SearchState::Failure => return Step::Failure,
        }
        self.expand()
    }

    fn expand(&mut self) -> Step {
        let current = match self.frontier.pop_min() {
            Ok(id) => id,
            Err(EmptyFrontier) => {
                self.state = SearchState::Failure;
                log::info!("no path: frontier exhausted after {} expansions", self.expansions);
                return Step::Failure;
            }
        };
        self.expansions += 1;

        let Some(goal) = self.goal else {
            // Searching always has a goal; treat a missing one as exhausted.
            self.state = SearchState::Failure;
            return Step::Failure;
        };

        if current == goal {
            self.path = self.trace_back(current);
            self.state = SearchState::Success;
            log::info!(
                "path found: {} cells after {} expansions",
                self.path.len(),
                self.expansions
            );
            return Step::Success(self.path_cells());
        }

        self.closed[current.index()] = true;
        self.closed_order.push(current);

        let tentative = self.grid.cell(current).g + 1;
        let goal_pos = self.grid.point(goal);
        let neighbors = Neighbors::from_slice(self.grid.neighbors(current));
        log::trace!(
            "expand {} g={} ({} neighbours)",
            self.grid.point(current),
            tentative - 1,
            neighbors.len()
        );

        for n in neighbors {
            if self.closed[n.index()] {
                continue;
            }
            let cell = self.grid.cell_mut(n);
            if cell.wall {
                continue;
            }
            if !self.frontier.contains(n) {
                cell.g = tentative;
                cell.h = manhattan(cell.pos(), goal_pos);
                cell.f = cell.g + cell.h;
                cell.predecessor = Some(current);
                self.frontier.insert(n, cell.f);
            } else if tentative < cell.g {
                // h is unchanged; predecessor follows the improved g.
                cell.g = tentative;
                cell.f = tentative + cell.h;
                cell.predecessor = Some(current);
                self.frontier.decrease(n, cell.f);
            }
        }

        Step::Searching
    }

    fn trace_back(&self, goal: CellId) -> Vec<CellId> {
        let mut path = Vec::new();
        let mut cur = Some(goal);
        while let Some(id) = cur {
            path.push(id);
            cur = self.grid.cell(id).predecessor();
            debug_assert!(path.len() <= self.grid.len(), "predecessor cycle");
        }
        path
    }

    // -----------------------------------------------------------------------
    // Introspection
    // -----------------------------------------------------------------------

    /// Cells currently in the open set, in insertion order.
    pub fn frontier_cells(&self) -> Vec<Point> {
        self.frontier.iter().map(|id| self.grid.point(id)).collect()
    }

    /// Cells already finalised, in the order they were closed.
    pub fn closed_cells(&self) -> Vec<Point> {
        self.closed_order.iter().map(|&id| self.grid.point(id)).collect()
    }

    /// The path from end to start. Empty until [`SearchState::Success`].
    pub fn path_cells(&self) -> Vec<Point> {
        self.path.iter().map(|&id| self.grid.point(id)).collect()
    }

    /// Whether the cell at `p` is in the open set.
    pub fn is_open(&self, p: Point) -> bool {
        self.grid.id(p).is_some_and(|id| self.frontier.contains(id))
    }

    /// Whether the cell at `p` has been closed.
    pub fn is_closed(&self, p: Point) -> bool {
        self.grid.id(p).is_some_and(|id| self.closed[id.index()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: i32, y: i32) -> Point {
        Point::new(x, y)
    }

    fn run(engine: &mut SearchEngine) -> Step {
        loop {
            match engine.step() {
                Step::Searching => continue,
                other => return other,
            }
        }
    }

    #[test]
    fn open_grid_diagonal_route() {
        let mut e = new_search(5, 5, [], p(0, 0), p(4, 4)).unwrap();
        assert_eq!(e.state(), SearchState::Searching);
        assert_eq!(e.frontier_cells(), vec![p(0, 0)]);

        let Step::Success(path) = run(&mut e) else {
            panic!("expected a path");
        };
        assert!(e.expansions() <= 25);
        assert_eq!(path, vec![p(4, 4), p(3, 3), p(2, 2), p(1, 1), p(0, 0)]);
        assert_eq!(e.path_cells(), path);
        assert_eq!(e.state(), SearchState::Success);
    }

    #[test]
    fn adjacent_endpoints_take_two_expansions() {
        let mut e = new_search(4, 4, [], p(1, 1), p(2, 1)).unwrap();
        assert_eq!(e.step(), Step::Searching);
        assert_eq!(e.step(), Step::Success(vec![p(2, 1), p(1, 1)]));
        assert_eq!(e.expansions(), 2);
    }

    #[test]
    fn disconnected_start_fails() {
        let walls = [p(1, 0), p(0, 1), p(1, 1)];
        let mut e = new_search(3, 3, walls, p(0, 0), p(2, 2)).unwrap();
        assert_eq!(e.step(), Step::Searching);
        assert!(e.frontier_cells().is_empty());
        assert_eq!(e.step(), Step::Failure);
        assert_eq!(e.expansions(), 1);
        assert!(e.path_cells().is_empty());
        // Terminal: nothing changes afterwards.
        assert_eq!(e.step(), Step::Failure);
        assert_eq!(e.expansions(), 1);
    }

    #[test]
    fn route_around_wall_column() {
        // Column x=2 is blocked except at the bottom row.
        let walls = [p(2, 0), p(2, 1), p(2, 2), p(2, 3)];
        let mut e = new_search(5, 5, walls, p(0, 0), p(4, 0)).unwrap();
        let Step::Success(path) = run(&mut e) else {
            panic!("expected a path");
        };
        assert!(path.contains(&p(2, 4)));
        assert!(path.windows(2).all(|w| w[0].is_adjacent(w[1])));
        assert!(path.iter().all(|&c| !e.grid().cell_at(c).unwrap().is_wall()));
    }

    #[test]
    fn invalid_configurations_are_rejected() {
        let bad = [
            new_search(1, 1, [], p(0, 0), p(0, 0)),
            new_search(0, 3, [], p(0, 0), p(1, 1)),
            new_search(3, 3, [], p(0, 0), p(3, 0)),
            new_search(3, 3, [], p(-1, 0), p(2, 2)),
            new_search(3, 3, [p(2, 2)], p(0, 0), p(2, 2)),
            new_search(3, 3, [p(0, 0)], p(0, 0), p(2, 2)),
            new_search(3, 3, [p(5, 5)], p(0, 0), p(2, 2)),
        ];
        for r in bad {
            assert!(matches!(r, Err(SearchError::InvalidConfiguration { .. })));
        }
    }

    #[test]
    fn edits_rejected_while_searching() {
        let mut e = new_search(4, 4, [], p(0, 0), p(3, 3)).unwrap();
        e.step();
        let frontier = e.frontier_cells();
        let closed = e.closed_cells();

        assert_eq!(
            e.set_wall(p(2, 2), true),
            Err(SearchError::IllegalMutation {
                state: SearchState::Searching
            })
        );
        assert!(e.set_start(p(1, 1)).is_err());
        assert!(e.set_end(p(1, 2)).is_err());
        assert!(e.begin().is_err());

        assert!(!e.grid().cell_at(p(2, 2)).unwrap().is_wall());
        assert_eq!(e.start(), Some(p(0, 0)));
        assert_eq!(e.frontier_cells(), frontier);
        assert_eq!(e.closed_cells(), closed);
        assert_eq!(e.state(), SearchState::Searching);
    }

    #[test]
    fn edits_rejected_after_terminal() {
        let mut e = new_search(2, 1, [], p(0, 0), p(1, 0)).unwrap();
        assert!(matches!(run(&mut e), Step::Success(_)));
        assert!(matches!(
            e.set_wall(p(0, 0), false),
            Err(SearchError::IllegalMutation {
                state: SearchState::Success
            })
        ));
    }

    #[test]
    fn idle_step_is_noop_until_configured() {
        let mut e = SearchEngine::new(Grid::new(3, 3).unwrap());
        assert_eq!(e.step(), Step::Idle);
        e.set_start(p(0, 0)).unwrap();
        assert_eq!(e.step(), Step::Idle);
        e.set_end(p(0, 0)).unwrap();
        // Same cell holds both roles: still not startable.
        assert_eq!(e.step(), Step::Idle);
        assert_eq!(e.state(), SearchState::Idle);

        e.set_end(p(2, 0)).unwrap();
        assert_eq!(e.step(), Step::Searching);
        assert_eq!(e.state(), SearchState::Searching);
        assert_eq!(e.closed_cells(), vec![p(0, 0)]);
    }

    #[test]
    fn reset_allows_editing_and_rerun() {
        let mut e = new_search(5, 5, [], p(0, 0), p(4, 4)).unwrap();
        let first = run(&mut e);
        e.reset();
        assert_eq!(e.state(), SearchState::Idle);
        assert!(e.frontier_cells().is_empty());
        assert!(e.closed_cells().is_empty());
        assert!(e.path_cells().is_empty());
        assert_eq!(e.expansions(), 0);
        assert!(e.grid().cells().all(|c| c.predecessor().is_none()));

        e.begin().unwrap();
        assert_eq!(run(&mut e), first);

        e.reset();
        e.set_wall(p(1, 1), true).unwrap();
        let Step::Success(path) = run(&mut e) else {
            panic!("expected a path");
        };
        assert!(!path.contains(&p(1, 1)));
    }

    #[test]
    fn costs_follow_the_path() {
        let walls = [p(1, 1), p(2, 1), p(3, 1)];
        let mut e = new_search(5, 4, walls, p(2, 0), p(2, 3)).unwrap();
        let Step::Success(path) = run(&mut e) else {
            panic!("expected a path");
        };
        let g: Vec<u32> = path
            .iter()
            .rev()
            .map(|&c| e.grid().cell_at(c).unwrap().g())
            .collect();
        assert_eq!(g, (0..path.len() as u32).collect::<Vec<_>>());
    }

    #[test]
    fn relaxed_frontier_member_takes_new_predecessor() {
        // (1,2) is first reached from (2,1) at cost 3, then from (0,1) at 2.
        let mut e = new_search(3, 4, [p(1, 1), p(2, 2)], p(0, 0), p(2, 3)).unwrap();
        let id = |e: &SearchEngine, q| e.grid().id(q).unwrap();
        let relaxed = p(1, 2);

        for _ in 0..3 {
            assert_eq!(e.step(), Step::Searching);
        }
        let cell = e.grid().cell_at(relaxed).unwrap();
        assert!(e.is_open(relaxed));
        assert_eq!((cell.g(), cell.h(), cell.f()), (3, 2, 5));
        assert_eq!(cell.predecessor(), Some(id(&e, p(2, 1))));

        assert_eq!(e.step(), Step::Searching);
        let cell = e.grid().cell_at(relaxed).unwrap();
        assert!(e.is_open(relaxed));
        assert_eq!((cell.g(), cell.h(), cell.f()), (2, 2, 4));
        assert_eq!(cell.predecessor(), Some(id(&e, p(0, 1))));

        assert_eq!(
            run(&mut e),
            Step::Success(vec![p(2, 3), p(1, 2), p(0, 1), p(0, 0)])
        );
    }

    #[test]
    fn open_and_closed_are_disjoint() {
        let mut e = new_search(6, 6, [p(3, 3)], p(0, 0), p(5, 5)).unwrap();
        for _ in 0..6 {
            e.step();
            for c in e.frontier_cells() {
                assert!(e.is_open(c));
                assert!(!e.is_closed(c));
            }
            for c in e.closed_cells() {
                assert!(e.is_closed(c));
                assert!(!e.is_open(c));
            }
        }
    }

    #[test]
    fn state_display() {
        assert_eq!(SearchState::Searching.to_string(), "searching");
        assert!(SearchState::Failure.is_terminal());
        assert!(!SearchState::Idle.is_terminal());
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn step_round_trip() {
        let step = Step::Success(vec![Point::new(1, 1), Point::new(0, 0)]);
        let json = serde_json::to_string(&step).unwrap();
        let back: Step = serde_json::from_str(&json).unwrap();
        assert_eq!(back, step);
    }

    #[test]
    fn state_round_trip() {
        let json = serde_json::to_string(&SearchState::Failure).unwrap();
        let back: SearchState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, SearchState::Failure);
    }
}
