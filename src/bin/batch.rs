use clap::Parser;
use itertools::Itertools;
use rand::{rngs::StdRng, Rng, SeedableRng};
use rayon::prelude::*;
use std::process::ExitCode;
use std::time::Instant;
use subgraph_extend::verify::check_solution;
use subgraph_extend::{solve_approx, solve_exact, Graph};

/// Run the exact and approximate solvers side by side over a batch of
/// seeded random instances, audit every returned solution, and summarize
/// cost ratios and runtimes.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of instances
    #[arg(long, default_value_t = 20)]
    count: usize,

    /// Pattern vertex count
    #[arg(long, default_value_t = 4)]
    n1: usize,

    /// Host vertex count
    #[arg(long, default_value_t = 7)]
    n2: usize,

    /// Copies per instance
    #[arg(long, default_value_t = 2)]
    k: usize,

    /// Arc probability in both graphs
    #[arg(long, default_value_t = 0.3)]
    density: f64,

    /// Largest arc multiplicity
    #[arg(long, default_value_t = 2)]
    max_multiplicity: usize,

    /// Base seed; instance i uses seed + i
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

struct Outcome {
    seed: u64,
    exact_cost: usize,
    approx_cost: usize,
    exact_ms: u128,
    approx_ms: u128,
    violations: Vec<String>,
}

fn random_graph(n: usize, density: f64, max_multiplicity: usize, rng: &mut StdRng) -> Graph {
    let mut graph = Graph::new(n);
    for u in 0..n {
        for v in 0..n {
            if rng.gen::<f64>() < density {
                graph.adj[u][v] = rng.gen_range(1..=max_multiplicity.max(1));
            }
        }
    }
    graph
}

fn run_instance(args: &Args, seed: u64) -> Outcome {
    let mut rng = StdRng::seed_from_u64(seed);
    let pattern = random_graph(args.n1, args.density, args.max_multiplicity, &mut rng);
    let host = random_graph(args.n2, args.density, args.max_multiplicity, &mut rng);

    let started = Instant::now();
    let exact = solve_exact(&pattern, &host, args.k, false);
    let exact_ms = started.elapsed().as_millis();

    let started = Instant::now();
    let approx = solve_approx(&pattern, &host, args.k);
    let approx_ms = started.elapsed().as_millis();

    let mut violations = Vec::new();
    if exact.found {
        violations.extend(
            check_solution(&pattern, &host, args.k, &exact)
                .into_iter()
                .map(|v| format!("exact: {v}")),
        );
    } else {
        violations.push("exact: no solution".to_string());
    }
    if approx.found {
        violations.extend(
            check_solution(&pattern, &host, args.k, &approx)
                .into_iter()
                .map(|v| format!("approx: {v}")),
        );
    } else {
        violations.push("approx: no solution".to_string());
    }
    if exact.found && approx.found && approx.cost < exact.cost {
        violations.push(format!(
            "approx cost {} beats exact cost {}",
            approx.cost, exact.cost
        ));
    }

    Outcome {
        seed,
        exact_cost: exact.cost,
        approx_cost: approx.cost,
        exact_ms,
        approx_ms,
        violations,
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    if args.n1 == 0 || args.n2 < args.n1 || args.k == 0 {
        eprintln!("Error: need 0 < n1 <= n2 and k >= 1.");
        return ExitCode::FAILURE;
    }

    let outcomes: Vec<Outcome> = (0..args.count as u64)
        .into_par_iter()
        .map(|i| run_instance(&args, args.seed + i))
        .collect();

    let mut failures = 0usize;
    for outcome in &outcomes {
        if outcome.violations.is_empty() {
            println!(
                "seed {:>4}  exact {:>4} ({:>5} ms)  approx {:>4} ({:>5} ms)",
                outcome.seed,
                outcome.exact_cost,
                outcome.exact_ms,
                outcome.approx_cost,
                outcome.approx_ms
            );
        } else {
            failures += 1;
            println!("seed {:>4}  FAILED", outcome.seed);
            for violation in &outcome.violations {
                println!("    {violation}");
            }
        }
    }

    let solved: Vec<&Outcome> = outcomes.iter().filter(|o| o.violations.is_empty()).collect();
    let matched = solved
        .iter()
        .filter(|o| o.approx_cost == o.exact_cost)
        .count();
    let worst_gap = solved
        .iter()
        .map(|o| o.approx_cost - o.exact_cost)
        .max()
        .unwrap_or(0);
    let mean_gap = if solved.is_empty() {
        0.0
    } else {
        solved
            .iter()
            .map(|o| (o.approx_cost - o.exact_cost) as f64)
            .sum::<f64>()
            / solved.len() as f64
    };

    println!();
    println!(
        "{} instances, {} clean, {} optimal approximations, gap mean {:.2} max {}",
        outcomes.len(),
        outcomes.len() - failures,
        matched,
        mean_gap,
        worst_gap
    );
    if failures > 0 {
        let bad = outcomes
            .iter()
            .filter(|o| !o.violations.is_empty())
            .map(|o| o.seed)
            .join(", ");
        println!("failing seeds: {bad}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
