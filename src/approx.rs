use log::debug;

use crate::candidates::candidates_for;
use crate::cost::extension_cost;
use crate::extend::{apply_assignment, rebuild_extension};
use crate::ordering::vertex_order;
use crate::{image_of, Graph, Mapping, Solution, NO_MAPPING};

/// Greedy single-pass construction of a k-copy family.
///
/// Each copy is filled in the shared processing order, always taking the
/// best-ranked candidate that keeps the copy tuple lexicographically at or
/// above the previous copy. When that discipline still produces a duplicate
/// vertex set, a repair sweep retries positions from the back of the copy.
/// The working host grows as assignments commit and is never unwound; the
/// returned extension is rebuilt as the minimal closure of the final family
/// so detours taken along the way cost nothing.
pub fn construct(pattern: &Graph, host: &Graph, k: usize) -> Solution {
    let n1 = pattern.num_vertices();
    let order = vertex_order(pattern);
    let mut working = host.clone();
    let mut family: Vec<Mapping> = vec![vec![NO_MAPPING; n1]; k];

    for copy in 0..k {
        let mut prefix_equal = copy > 0;
        for (pos, &u) in order.iter().enumerate() {
            let last = pos + 1 == n1;
            let ranked = candidates_for(u, pattern, &working, &family[copy]);
            let Some(&first) = ranked.first() else {
                return Solution::not_found(host);
            };
            let mut pick = first;
            if prefix_equal {
                let floor = family[copy - 1][u];
                let admissible = ranked
                    .iter()
                    .find(|c| if last { c.vertex > floor } else { c.vertex >= floor });
                // no admissible target: take the overall best and let the
                // repair sweep restore image uniqueness
                pick = admissible.copied().unwrap_or(first);
                prefix_equal = pick.vertex == floor;
            }
            family[copy][u] = pick.vertex;
            apply_assignment(u, pick.vertex, pattern, &mut working, &family[copy]);
        }

        if copy > 0 && repeats_image(&family, copy) {
            debug!("copy {} landed on a used vertex set, repairing", copy);
            if !repair_copy(pattern, &mut working, &mut family, &order, copy) {
                return Solution::not_found(host);
            }
        }
    }

    let extended = rebuild_extension(pattern, host, &family);
    let cost = extension_cost(host, &extended);
    Solution {
        extended,
        mappings: family,
        cost,
        found: true,
    }
}

fn repeats_image(family: &[Mapping], copy: usize) -> bool {
    let image = image_of(&family[copy]);
    (0..copy).any(|earlier| image_of(&family[earlier]) == image)
}

/// Walk the copy from its last position backwards, swapping one assignment
/// for the best-ranked alternative that makes the vertex set unique.
fn repair_copy(
    pattern: &Graph,
    working: &mut Graph,
    family: &mut [Mapping],
    order: &[usize],
    copy: usize,
) -> bool {
    for &u in order.iter().rev() {
        let displaced = family[copy][u];
        family[copy][u] = NO_MAPPING;
        let ranked = candidates_for(u, pattern, working, &family[copy]);
        for candidate in ranked.iter().filter(|c| c.vertex != displaced) {
            family[copy][u] = candidate.vertex;
            if !repeats_image(family, copy) {
                apply_assignment(u, candidate.vertex, pattern, working, &family[copy]);
                debug!("repaired copy {} by moving {} -> {}", copy, u, candidate.vertex);
                return true;
            }
            family[copy][u] = NO_MAPPING;
        }
        family[copy][u] = displaced;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verify::check_solution;
    use crate::Graph;

    #[test]
    fn test_constructs_distinct_copies() {
        let pattern = Graph::from_adjacency_matrix(vec![vec![0, 1], vec![1, 0]]);
        let host = Graph::new(4);
        let solution = construct(&pattern, &host, 3);
        assert!(solution.found);
        assert!(check_solution(&pattern, &host, 3, &solution).is_empty());
    }

    #[test]
    fn test_zero_cost_when_host_suffices() {
        let pattern = Graph::from_adjacency_matrix(vec![vec![0, 1], vec![0, 0]]);
        let host = Graph::from_adjacency_matrix(vec![
            vec![0, 1, 0],
            vec![0, 0, 1],
            vec![0, 0, 0],
        ]);
        let solution = construct(&pattern, &host, 1);
        assert!(solution.found);
        assert_eq!(solution.cost, 0);
    }

    #[test]
    fn test_gives_up_when_no_distinct_family_exists() {
        let pattern = Graph::from_adjacency_matrix(vec![vec![0, 1], vec![0, 0]]);
        let host = Graph::new(2);
        let solution = construct(&pattern, &host, 2);
        assert!(!solution.found);
    }

    #[test]
    fn test_self_loops_propagate_to_the_extension() {
        let pattern = Graph::from_adjacency_matrix(vec![vec![2]]);
        let host = Graph::new(2);
        let solution = construct(&pattern, &host, 2);
        assert!(solution.found);
        assert_eq!(solution.cost, 4);
        assert_eq!(solution.extended.adj[0][0], 2);
        assert_eq!(solution.extended.adj[1][1], 2);
    }

    #[test]
    fn test_copies_spread_across_hosts() {
        // three single-vertex copies on three hosts: the picks must spread
        // over all vertices even though every choice costs the same
        let pattern = Graph::from_adjacency_matrix(vec![vec![1]]);
        let host = Graph::new(3);
        let solution = construct(&pattern, &host, 3);
        assert!(solution.found);
        assert_eq!(solution.cost, 3);
        assert!(check_solution(&pattern, &host, 3, &solution).is_empty());
    }

    #[test]
    fn test_repair_resolves_a_forced_collision() {
        // the only existing arc pulls both copies onto {0, 2}; the second
        // copy has no admissible target above host 2 and falls back onto the
        // first copy's vertex set, which the repair sweep must break up
        let pattern = Graph::from_adjacency_matrix(vec![vec![0, 1], vec![0, 0]]);
        let host = Graph::from_adjacency_matrix(vec![
            vec![0, 0, 1],
            vec![0, 0, 0],
            vec![0, 0, 0],
        ]);
        let solution = construct(&pattern, &host, 2);
        assert!(solution.found);
        assert_eq!(solution.cost, 1);
        assert!(check_solution(&pattern, &host, 2, &solution).is_empty());
    }
}
