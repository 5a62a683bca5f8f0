//! Terminal A* visualizer.
//!
//! Run: cargo run --bin pathviz -- --cols 30 --rows 20 --log pathviz.log

use std::fs::File;

use crossterm::terminal;
use pathviz_term::{board_fits, layout, TerminalSurface, TickDriver, VisualizerConfig, USAGE};
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

fn init_logger(cfg: &VisualizerConfig) -> std::io::Result<()> {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    match &cfg.log_file {
        Some(path) => {
            let file = File::create(path)?;
            builder.target(env_logger::Target::Pipe(Box::new(file))).init();
        }
        None => {
            builder.init();
            // stderr shares the alternate screen with the board.
            log::set_max_level(log::max_level().min(log::LevelFilter::Warn));
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        println!("{USAGE}");
        return Ok(());
    }

    let cfg = match VisualizerConfig::from_args(args) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error: {e}\n\n{USAGE}");
            std::process::exit(2);
        }
    };
    init_logger(&cfg)?;

    let seed = cfg.seed.unwrap_or_else(|| rand::rng().random());
    log::info!(
        "{}x{} grid, wall density {}, {} fps, seed {seed}",
        cfg.cols,
        cfg.rows,
        cfg.wall_density,
        cfg.fps
    );
    if let Ok(size) = terminal::size() {
        if !board_fits(cfg.cols, cfg.rows, size) {
            log::warn!(
                "{}x{} board does not fit the {}x{} terminal and will be clipped",
                cfg.cols,
                cfg.rows,
                size.0,
                size.1
            );
        }
    }
    let mut rng = StdRng::seed_from_u64(seed);

    let engine = layout::build_engine(&cfg, &mut rng)?;
    let mut driver = TickDriver::new(engine, cfg.tick());
    let mut surface = TerminalSurface::new();
    driver.run(&mut surface, || layout::build_engine(&cfg, &mut rng))
}
