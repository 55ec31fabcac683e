use clap::Parser;
use rand::seq::SliceRandom;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

/// Generate random problem instances in the solver input format:
///
/// <n1>
/// <n1 x n1 pattern adjacency matrix>
/// <n2>
/// <n2 x n2 host adjacency matrix>
/// <k>
///
/// A random injective placement of the pattern is planted into the host:
/// part of its arcs are fully satisfied up front, part are forced into a
/// multiplicity deficit, so instances are neither trivial nor hopeless.
#[derive(Parser, Debug)]
#[command(author, version, about = "Generate random pattern/host instances")]
struct Args {
    /// Pattern vertex count (n1)
    #[arg(long)]
    n1: usize,

    /// Host vertex count (n2), at least n1
    #[arg(long)]
    n2: usize,

    /// Number of copies to request in the instance
    #[arg(long, default_value_t = 1)]
    k: usize,

    /// Arc probability in the pattern
    #[arg(long, default_value_t = 0.35)]
    density_pattern: f64,

    /// Arc probability in the host
    #[arg(long, default_value_t = 0.20)]
    density_host: f64,

    /// Self-loop probability, applied to both graphs
    #[arg(long, default_value_t = 0.10)]
    self_loop_prob: f64,

    /// Probability that a generated arc carries multiplicity above 1
    #[arg(long, default_value_t = 0.15)]
    multi_prob: f64,

    /// Largest multiplicity a multi-arc can carry
    #[arg(long, default_value_t = 4)]
    max_multiplicity: usize,

    /// Fraction of pattern arcs satisfied by the planted placement
    #[arg(long, default_value_t = 0.40)]
    embed_fraction: f64,

    /// Fraction of pattern arcs forced below their required multiplicity
    #[arg(long, default_value_t = 0.35)]
    deficit_fraction: f64,

    /// Random seed (entropy when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Destination file for the instance
    #[arg(long)]
    output: PathBuf,
}

fn arc_multiplicity<R: Rng>(rng: &mut R, multi_prob: f64, max_multiplicity: usize) -> usize {
    if max_multiplicity < 2 || rng.gen::<f64>() >= multi_prob {
        1
    } else {
        rng.gen_range(2..=max_multiplicity)
    }
}

fn random_graph<R: Rng>(n: usize, args: &Args, density: f64, rng: &mut R) -> Vec<Vec<usize>> {
    let mut adj = vec![vec![0usize; n]; n];
    for (i, row) in adj.iter_mut().enumerate() {
        for (j, entry) in row.iter_mut().enumerate() {
            let p = if i == j { args.self_loop_prob } else { density };
            if rng.gen::<f64>() < p {
                *entry = arc_multiplicity(rng, args.multi_prob, args.max_multiplicity);
            }
        }
    }
    adj
}

/// Plant the pattern into the host along a random injective placement:
/// satisfy `embed_fraction` of its arcs outright and force a deficit on the
/// next `deficit_fraction`; the rest are left to chance.
fn plant_embedding<R: Rng>(
    pattern: &[Vec<usize>],
    host: &mut [Vec<usize>],
    placement: &[usize],
    args: &Args,
    rng: &mut R,
) {
    let mut arcs: Vec<(usize, usize)> = Vec::new();
    for (i, row) in pattern.iter().enumerate() {
        for (j, &m) in row.iter().enumerate() {
            if m > 0 {
                arcs.push((i, j));
            }
        }
    }
    arcs.shuffle(rng);

    let embed_end = ((arcs.len() as f64) * args.embed_fraction).round() as usize;
    let deficit_end =
        (embed_end + ((arcs.len() as f64) * args.deficit_fraction).round() as usize).min(arcs.len());

    for (index, &(i, j)) in arcs.iter().enumerate() {
        let (hi, hj) = (placement[i], placement[j]);
        let required = pattern[i][j];
        if index < embed_end {
            if host[hi][hj] < required {
                host[hi][hj] = required;
            }
        } else if index < deficit_end && host[hi][hj] >= required {
            host[hi][hj] = rng.gen_range(0..required);
        }
    }
}

fn write_instance<W: Write>(
    writer: &mut W,
    pattern: &[Vec<usize>],
    host: &[Vec<usize>],
    k: usize,
) -> io::Result<()> {
    writeln!(writer, "{}", pattern.len())?;
    for row in pattern {
        let cells: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        writeln!(writer, "{}", cells.join(" "))?;
    }
    writeln!(writer)?;
    writeln!(writer, "{}", host.len())?;
    for row in host {
        let cells: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        writeln!(writer, "{}", cells.join(" "))?;
    }
    writeln!(writer, "{k}")?;
    Ok(())
}

fn main() -> io::Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.n1 == 0 || args.n2 < args.n1 {
        eprintln!("Error: need 0 < n1 <= n2.");
        std::process::exit(1);
    }
    if args.k == 0 {
        eprintln!("Error: k must be at least 1.");
        std::process::exit(1);
    }
    for (name, p) in [
        ("density_pattern", args.density_pattern),
        ("density_host", args.density_host),
        ("self_loop_prob", args.self_loop_prob),
        ("multi_prob", args.multi_prob),
        ("embed_fraction", args.embed_fraction),
        ("deficit_fraction", args.deficit_fraction),
    ] {
        if !(0.0..=1.0).contains(&p) {
            eprintln!("Error: {name} must lie in [0, 1].");
            std::process::exit(1);
        }
    }

    let mut rng: StdRng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::seed_from_u64(rand::thread_rng().gen()),
    };

    let pattern = random_graph(args.n1, &args, args.density_pattern, &mut rng);
    let mut host = random_graph(args.n2, &args, args.density_host, &mut rng);

    let mut pool: Vec<usize> = (0..args.n2).collect();
    pool.shuffle(&mut rng);
    let placement: Vec<usize> = pool.into_iter().take(args.n1).collect();

    plant_embedding(&pattern, &mut host, &placement, &args, &mut rng);

    let mut writer = File::create(&args.output)?;
    write_instance(&mut writer, &pattern, &host, args.k)?;
    writer.flush()?;

    let pattern_arcs: usize = pattern.iter().flatten().filter(|&&m| m > 0).count();
    let host_arcs: usize = host.iter().flatten().filter(|&&m| m > 0).count();
    println!("Generated instance:");
    println!("  n1 = {}, n2 = {}, k = {}", args.n1, args.n2, args.k);
    if let Some(seed) = args.seed {
        println!("  seed = {seed}");
    }
    println!("  planted placement: {placement:?}");
    println!("  non-zero arcs: pattern = {pattern_arcs}, host = {host_arcs}");
    println!("  output: {:?}", args.output);

    Ok(())
}
