use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;

use mazevolve::{
    Board, Coord, GeneticOptimizer, MazeGenerator, OptimizerConfig,
    generators::get_rng,
    maze::render,
    solvers::{Agent, Bfs},
};

/// Search for the maze-solving strategy that handles random mazes best.
#[derive(Parser, Debug)]
#[command(name = "mazevolve")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of rows in each maze
    #[arg(long, default_value = "21")]
    rows: u16,

    /// Number of columns in each maze
    #[arg(long, default_value = "21")]
    cols: u16,

    /// Start cell as `row,col`
    #[arg(long, value_parser = parse_coord, default_value = "0,0")]
    start: Coord,

    /// Target cell as `row,col` (default: bottom-right corner)
    #[arg(long, value_parser = parse_coord)]
    target: Option<Coord>,

    /// Population size
    #[arg(short, long, default_value = "10")]
    population: usize,

    /// Number of generations
    #[arg(short, long, default_value = "3")]
    generations: usize,

    /// Mazes generated per fitness evaluation
    #[arg(short, long, default_value = "1")]
    trials: usize,

    /// Training episodes for the Q-learning solver
    #[arg(long, default_value = "30")]
    episodes: usize,

    /// Probability of mutating each hyperparameter
    #[arg(long, default_value = "0.2")]
    mutation_rate: f64,

    /// Fraction of dead ends opened up after carving
    #[arg(long, default_value = "1.0")]
    break_chance: f64,

    /// Random seed (default: random)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Draw a sample maze and its BFS solution before searching
    #[arg(long)]
    show_maze: bool,

    /// Write logs to `mazevolve.log` in this directory instead of stderr
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_coord(s: &str) -> Result<Coord, String> {
    let (row, col) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `row,col`, got `{s}`"))?;
    let row = row.trim().parse::<u16>().map_err(|e| format!("bad row `{row}`: {e}"))?;
    let col = col.trim().parse::<u16>().map_err(|e| format!("bad column `{col}`: {e}"))?;
    Ok((row, col))
}

/// Install the global subscriber. The returned guard flushes the log file on drop.
fn init_logging(verbose: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::never(dir, "mazevolve.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_max_level(level)
                .with_ansi(false)
                .with_writer(writer)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt()
                .with_max_level(level)
                .with_writer(std::io::stderr)
                .init();
            None
        }
    }
}

fn show_sample_maze(template: &Board, config: &OptimizerConfig) -> std::io::Result<()> {
    let mut board = template.blank_copy();
    let mut rng = get_rng(config.seed);
    MazeGenerator::new(&mut rng)
        .run(&mut board, config.break_chance)
        .map_err(std::io::Error::other)?;

    let path = Bfs::new(&board).solve().map_err(std::io::Error::other)?;
    if let Some(path) = path {
        board.set_path(path);
    }

    let mut stdout = std::io::stdout();
    if let Ok((term_width, term_height)) = crossterm::terminal::size() {
        if !render::fits_terminal(&board, term_width, term_height) {
            tracing::warn!(
                "Terminal size ({}x{}) is too small to show the whole maze",
                term_width,
                term_height
            );
        }
    }
    render::render_board(&board, &mut stdout)?;
    stdout.flush()
}

fn main() -> std::io::Result<()> {
    let args = Args::parse();
    let _guard = init_logging(args.verbose, args.log_dir.as_deref());

    if args.rows == 0 || args.cols == 0 {
        eprintln!("Rows and columns must be at least 1.");
        return Ok(());
    }
    let target = args.target.unwrap_or((args.rows - 1, args.cols - 1));
    let board = Board::new(args.rows, args.cols, args.start, target).map_err(std::io::Error::other)?;

    let config = OptimizerConfig {
        population_size: args.population,
        generations: args.generations,
        trials: args.trials,
        episode_budget: args.episodes,
        mutation_rate: args.mutation_rate,
        break_chance: args.break_chance,
        seed: args.seed,
    };

    if args.show_maze {
        show_sample_maze(&board, &config)?;
    }

    println!("Running genetic algorithm to find the best strategy across randomized mazes...");
    println!("  Maze: {}x{}, start {:?}, target {:?}", args.rows, args.cols, args.start, target);
    println!("  Population: {}, generations: {}", config.population_size, config.generations);

    let mut optimizer = GeneticOptimizer::new(board, config);
    let evolution = optimizer.run().map_err(std::io::Error::other)?;

    println!();
    for stats in &evolution.history {
        println!(
            "  Generation {:>2}: best {:.4}  mean {:.4}  worst {:.4}",
            stats.generation, stats.best_fitness, stats.mean_fitness, stats.worst_fitness
        );
    }
    println!();
    println!("Best strategy found: {} (fitness {:.4})", evolution.best, evolution.best_fitness);
    Ok(())
}
