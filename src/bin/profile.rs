use std::time::Instant;

use mazevolve::{Board, MazeGenerator, generators::get_rng, solvers::Agent, solvers::Bfs};

/// Generate and solve the largest maze repeatedly. Usage: `profile [iterations] [seed]`
fn main() -> std::io::Result<()> {
    let mut args = std::env::args();
    args.next(); // Skip executable name
    let num_iters = args.next().and_then(|s| s.parse::<usize>().ok()).unwrap_or(10);
    let seed = args.next().and_then(|s| s.parse::<u64>().ok());

    let size = u8::MAX as u16;
    let template = Board::new(size, size, (0, 0), (size - 1, size - 1)).map_err(std::io::Error::other)?;
    let mut rng = get_rng(seed);

    let started = Instant::now();
    let mut solved = 0;
    for _ in 0..num_iters {
        let mut board = template.blank_copy();
        MazeGenerator::new(&mut rng)
            .run(&mut board, 1.0)
            .map_err(std::io::Error::other)?;
        if matches!(Bfs::new(&board).solve(), Ok(Some(_))) {
            solved += 1;
        }
    }
    println!(
        "{} mazes ({}x{}) generated, {} solved in {:.3}s",
        num_iters,
        size,
        size,
        solved,
        started.elapsed().as_secs_f64()
    );
    Ok(())
}
