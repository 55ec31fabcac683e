use crate::cost::extension_cost;
use crate::{image_of, Graph, Solution, NO_MAPPING};

/// Audit a reported solution against the instance it claims to solve.
///
/// Returns one message per violated rule; an empty list means the solution
/// stands. Checked: the extension dominates the host entrywise, every copy
/// is complete, in range, injective and edge-covering, the copies occupy
/// pairwise different vertex sets, and the reported cost equals the matrix
/// difference.
pub fn check_solution(pattern: &Graph, host: &Graph, k: usize, solution: &Solution) -> Vec<String> {
    let mut problems = Vec::new();
    if !solution.found {
        problems.push("solution is marked as not found".to_string());
        return problems;
    }

    let n1 = pattern.num_vertices();
    let n2 = host.num_vertices();
    let extended = &solution.extended;

    if extended.num_vertices() != n2 {
        problems.push(format!(
            "extension has {} vertices, host has {}",
            extended.num_vertices(),
            n2
        ));
        return problems;
    }
    for u in 0..n2 {
        for v in 0..n2 {
            if extended.adj[u][v] < host.adj[u][v] {
                problems.push(format!(
                    "extension entry ({u},{v}) = {} dropped below the host's {}",
                    extended.adj[u][v], host.adj[u][v]
                ));
            }
        }
    }

    if solution.mappings.len() != k {
        problems.push(format!(
            "family holds {} copies, expected {}",
            solution.mappings.len(),
            k
        ));
    }

    for (c, mapping) in solution.mappings.iter().enumerate() {
        if mapping.len() != n1 {
            problems.push(format!("copy {c} maps {} vertices, expected {n1}", mapping.len()));
            continue;
        }
        if mapping.iter().any(|&m| m == NO_MAPPING) {
            problems.push(format!("copy {c} is incomplete"));
            continue;
        }
        if mapping.iter().any(|&m| m >= n2) {
            problems.push(format!("copy {c} maps outside the host"));
            continue;
        }
        let image = image_of(mapping);
        if image.windows(2).any(|w| w[0] == w[1]) {
            problems.push(format!("copy {c} is not injective"));
            continue;
        }
        for x in 0..n1 {
            for y in 0..n1 {
                if extended.adj[mapping[x]][mapping[y]] < pattern.adj[x][y] {
                    problems.push(format!(
                        "copy {c} leaves arc {x}->{y} uncovered: needs {}, has {}",
                        pattern.adj[x][y], extended.adj[mapping[x]][mapping[y]]
                    ));
                }
            }
        }
    }

    for a in 0..solution.mappings.len() {
        for b in a + 1..solution.mappings.len() {
            if image_of(&solution.mappings[a]) == image_of(&solution.mappings[b]) {
                problems.push(format!("copies {a} and {b} occupy the same vertex set"));
            }
        }
    }

    let actual = extension_cost(host, extended);
    if solution.cost != actual {
        problems.push(format!(
            "reported cost {} differs from matrix difference {}",
            solution.cost, actual
        ));
    }

    problems
}
