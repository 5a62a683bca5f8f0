//! The tick loop: one engine step per frame, drawn through a [`Surface`].

use std::time::{Duration, Instant};

use pathviz_core::{Point, SearchEngine, SearchError, SearchState, Step};

/// How a single cell should be drawn.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Paint {
    Empty,
    Wall,
    Open,
    Closed,
    Path,
    Start,
    End,
}

/// Classify every cell row-major, roles first, then path over closed over
/// open.
pub fn paint_grid(engine: &SearchEngine) -> Vec<Paint> {
    let mut paints: Vec<Paint> = engine
        .grid()
        .cells()
        .map(|c| {
            if c.is_start() {
                Paint::Start
            } else if c.is_end() {
                Paint::End
            } else if c.is_wall() {
                Paint::Wall
            } else {
                Paint::Empty
            }
        })
        .collect();

    let grid = engine.grid();
    let mut overlay = |points: Vec<Point>, paint: Paint| {
        for p in points {
            if let Some(id) = grid.id(p) {
                let slot = &mut paints[id.index()];
                if matches!(*slot, Paint::Empty | Paint::Open | Paint::Closed) {
                    *slot = paint;
                }
            }
        }
    };
    overlay(engine.frontier_cells(), Paint::Open);
    overlay(engine.closed_cells(), Paint::Closed);
    overlay(engine.path_cells(), Paint::Path);
    paints
}

/// The cells that changed since the previous frame plus the status line.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub cols: i32,
    pub rows: i32,
    pub changes: Vec<(Point, Paint)>,
    pub state: SearchState,
    pub expansions: usize,
    pub paused: bool,
}

/// User intent read from the surface between ticks.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Quit,
    TogglePause,
    /// Advance one expansion while paused.
    Step,
    /// Throw the current layout away and start a fresh one.
    Regenerate,
    /// The surface lost its contents (e.g. a resize); repaint every cell.
    Redraw,
}

/// A drawing back-end (terminal, test recorder, ...).
pub trait Surface {
    /// Prepare the output device.
    fn init(&mut self) -> Result<(), Box<dyn std::error::Error>>;

    /// Paint a frame.
    fn draw(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>>;

    /// Wait up to `timeout` for a command.
    fn poll(&mut self, timeout: Duration) -> Result<Option<Command>, Box<dyn std::error::Error>>;

    /// Restore the output device. Called even when the loop fails.
    fn close(&mut self);
}

/// Drives a [`SearchEngine`] at a fixed cadence.
pub struct TickDriver {
    engine: SearchEngine,
    tick: Duration,
    paused: bool,
    prev: Vec<Paint>,
}

impl TickDriver {
    pub fn new(engine: SearchEngine, tick: Duration) -> Self {
        Self {
            engine,
            tick,
            paused: false,
            prev: Vec::new(),
        }
    }

    #[inline]
    pub fn engine(&self) -> &SearchEngine {
        &self.engine
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Swap in a new engine; the next frame repaints every cell.
    pub fn replace_engine(&mut self, engine: SearchEngine) {
        self.engine = engine;
        self.invalidate();
    }

    /// Forget what was last drawn so the next frame carries every cell.
    pub fn invalidate(&mut self) {
        self.prev.clear();
    }

    /// One timed tick: step unless paused.
    pub fn tick(&mut self) -> Option<Step> {
        (!self.paused).then(|| self.advance())
    }

    fn advance(&mut self) -> Step {
        let was_terminal = self.engine.state().is_terminal();
        let step = self.engine.step();
        if !was_terminal {
            match &step {
                Step::Success(path) => log::info!("solution of {} cells", path.len()),
                Step::Failure => log::info!("no solution"),
                _ => {}
            }
        }
        step
    }

    /// Diff the engine state against what was last drawn.
    pub fn frame(&mut self) -> Frame {
        let paints = paint_grid(&self.engine);
        let grid = self.engine.grid();
        let changes = paints
            .iter()
            .enumerate()
            .filter(|&(i, p)| self.prev.get(i) != Some(p))
            .map(|(i, &p)| {
                let cols = grid.cols() as usize;
                (Point::new((i % cols) as i32, (i / cols) as i32), p)
            })
            .collect();
        let frame = Frame {
            cols: grid.cols(),
            rows: grid.rows(),
            changes,
            state: self.engine.state(),
            expansions: self.engine.expansions(),
            paused: self.paused,
        };
        self.prev = paints;
        frame
    }

    /// Run until the surface asks to quit.
    ///
    /// `regenerate` builds the engine used after [`Command::Regenerate`].
    pub fn run<S, F>(&mut self, surface: &mut S, regenerate: F) -> Result<(), Box<dyn std::error::Error>>
    where
        S: Surface,
        F: FnMut() -> Result<SearchEngine, SearchError>,
    {
        surface.init()?;
        let result = self.run_loop(surface, regenerate);
        surface.close();
        result
    }

    fn run_loop<S, F>(&mut self, surface: &mut S, mut regenerate: F) -> Result<(), Box<dyn std::error::Error>>
    where
        S: Surface,
        F: FnMut() -> Result<SearchEngine, SearchError>,
    {
        loop {
            let started = Instant::now();
            self.tick();
            surface.draw(&self.frame())?;

            let wait = self.tick.saturating_sub(started.elapsed());
            match surface.poll(wait)? {
                Some(Command::Quit) => return Ok(()),
                Some(Command::TogglePause) => {
                    self.paused = !self.paused;
                    log::debug!("paused: {}", self.paused);
                }
                Some(Command::Step) if self.paused => {
                    self.advance();
                }
                Some(Command::Step) => {}
                Some(Command::Regenerate) => {
                    self.replace_engine(regenerate()?);
                    log::debug!("layout regenerated");
                }
                Some(Command::Redraw) => self.invalidate(),
                None => {}
            }
        }
    }
}
