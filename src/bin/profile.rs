use mazestep::{GenerationMode, Session, Solver};

/// Headless run: generate and solve repeatedly without rendering, logging the stats.
/// Usage: profile [iterations] [size]
fn main() {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args();
    args.next(); // Skip executable name
    let num_iters = args.next().and_then(|s| s.parse::<usize>().ok()).unwrap_or(1);
    let size = args.next().and_then(|s| s.parse::<usize>().ok()).unwrap_or(50);

    let mut session = Session::default();
    if let Err(e) = session.create_grid(size) {
        eprintln!("{}", e);
        return;
    }

    let start = std::time::Instant::now();
    for i in 0..num_iters {
        if let Err(e) = session.generate(GenerationMode::Incremental) {
            tracing::error!("[profile] Generation failed: {}", e);
            return;
        }
        session.run_to_end();
        let carved = session.stats().cells_carved;

        for solver in [Solver::Dfs, Solver::Bfs] {
            if let Err(e) = session.solve(solver) {
                tracing::error!("[profile] Solve failed: {}", e);
                return;
            }
            let last = session.run_to_end();
            let stats = session.stats();
            tracing::info!(
                "[profile] #{} {}: carved {}, solved {}, path length {}, explored {}, efficiency {:.1}%",
                i,
                solver,
                carved,
                last.is_solved(),
                stats.path_length,
                stats.cells_explored,
                stats.efficiency()
            );
        }
    }
    tracing::info!(
        "[profile] {} iterations on {}x{} took {:?}",
        num_iters,
        size,
        size,
        start.elapsed()
    );
}
