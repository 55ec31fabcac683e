use clap::Parser;
use itertools::Itertools;
use std::fmt::Write as _;
use std::path::PathBuf;
use std::process::ExitCode;
use subgraph_extend::parser::{load_instance, Instance};
use subgraph_extend::{solve_approx, solve_exact, Graph, Solution};

/// Compute the cheapest extension of a host multigraph that carries k
/// image-distinct embedded copies of a pattern multigraph.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input file: n1, the n1 x n1 pattern matrix, n2, the n2 x n2 host
    /// matrix, and an optional k (default 1)
    input: PathBuf,

    /// Use the greedy constructor with local-search refinement instead of
    /// the exhaustive branch-and-bound
    #[arg(short = 'a', long = "approx")]
    approx: bool,

    /// Machine-readable output: vertex count, extended matrix, cost
    #[arg(short = 'r', long = "raw")]
    raw: bool,
}

fn matrix_lines(out: &mut String, graph: &Graph) {
    for row in &graph.adj {
        let _ = writeln!(out, "{}", row.iter().join(" "));
    }
}

fn render_verbose(instance: &Instance, solution: &Solution) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", instance.pattern.num_vertices());
    matrix_lines(&mut out, &instance.pattern);
    let _ = writeln!(out, "{}", instance.host.num_vertices());
    matrix_lines(&mut out, &instance.host);
    let _ = writeln!(out, "{}", instance.k);
    let _ = writeln!(out);
    let _ = writeln!(out, "Extension cost: {}", solution.cost);
    for (i, mapping) in solution.mappings.iter().enumerate() {
        let pairs = mapping
            .iter()
            .enumerate()
            .map(|(u, v)| format!("{u}->{v}"))
            .join(" ");
        let _ = writeln!(out, "Copy {}: {}", i + 1, pairs);
    }
    matrix_lines(&mut out, &solution.extended);
    out
}

fn render_raw(solution: &Solution) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", solution.extended.num_vertices());
    matrix_lines(&mut out, &solution.extended);
    let _ = writeln!(out, "{}", solution.cost);
    out
}

fn run(args: &Args) -> Result<String, String> {
    let instance = load_instance(&args.input).map_err(|e| e.to_string())?;
    instance.validate().map_err(|e| e.to_string())?;

    let solution = if args.approx {
        solve_approx(&instance.pattern, &instance.host, instance.k)
    } else {
        solve_exact(&instance.pattern, &instance.host, instance.k, false)
    };
    if !solution.found {
        return Err(format!(
            "no extension admits {} image-distinct copies of the pattern",
            instance.k
        ));
    }

    let report = if args.raw {
        render_raw(&solution)
    } else {
        render_verbose(&instance, &solution)
    };
    std::fs::write("out.txt", &report).map_err(|e| format!("cannot write out.txt: {e}"))?;
    Ok(report)
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    match run(&args) {
        Ok(report) => {
            print!("{report}");
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("Error: {message}");
            ExitCode::FAILURE
        }
    }
}
