use log::debug;

use crate::cost::extension_cost;
use crate::extend::{rebuild_extension, retighten};
use crate::{image_of, Graph, Mapping, Solution};

/// Hill-climb on a constructed solution: scan every (copy, pattern vertex,
/// host vertex) triple for the single reassignment or in-copy swap that
/// lowers the total cost the most, apply it, and repeat until a full pass
/// finds nothing. Failed inputs pass through untouched.
pub fn refine(pattern: &Graph, host: &Graph, solution: Solution) -> Solution {
    if !solution.found {
        return solution;
    }
    let k = solution.mappings.len();
    let n1 = pattern.num_vertices();
    let n2 = host.num_vertices();

    let mut family = solution.mappings;
    // start from the minimal closure of the family
    let mut extended = rebuild_extension(pattern, host, &family);
    let mut cost = extension_cost(host, &extended);

    loop {
        let mut best_move: Option<(usize, usize, usize)> = None;
        let mut best_cost = cost;

        for copy in 0..k {
            for u in 0..n1 {
                for target in 0..n2 {
                    let current = family[copy][u];
                    if target == current {
                        continue;
                    }
                    let swapped_with = family[copy].iter().position(|&m| m == target);

                    perturb(&mut family, copy, u, target, swapped_with);
                    // a swap keeps the vertex set; a reassignment must not
                    // collide with another copy's set
                    let admissible = swapped_with.is_some() || image_is_unique(&family, copy);
                    if admissible {
                        let mut trial = extended.clone();
                        retighten(&mut trial, host, pattern, &family, &[current, target]);
                        let trial_cost = extension_cost(host, &trial);
                        if trial_cost < best_cost {
                            best_cost = trial_cost;
                            best_move = Some((copy, u, target));
                        }
                    }
                    restore(&mut family, copy, u, current, target, swapped_with);
                }
            }
        }

        let Some((copy, u, target)) = best_move else {
            break;
        };
        let current = family[copy][u];
        let swapped_with = family[copy].iter().position(|&m| m == target);
        perturb(&mut family, copy, u, target, swapped_with);
        retighten(&mut extended, host, pattern, &family, &[current, target]);
        cost = extension_cost(host, &extended);
        debug!("move in copy {}: {} -> {}, cost now {}", copy, u, target, cost);
    }

    // settle the reported cost from the matrices themselves
    let cost = extension_cost(host, &extended);
    Solution {
        extended,
        mappings: family,
        cost,
        found: true,
    }
}

fn perturb(
    family: &mut [Mapping],
    copy: usize,
    u: usize,
    target: usize,
    swapped_with: Option<usize>,
) {
    let current = family[copy][u];
    if let Some(w) = swapped_with {
        family[copy][w] = current;
    }
    family[copy][u] = target;
}

fn restore(
    family: &mut [Mapping],
    copy: usize,
    u: usize,
    current: usize,
    target: usize,
    swapped_with: Option<usize>,
) {
    family[copy][u] = current;
    if let Some(w) = swapped_with {
        family[copy][w] = target;
    }
}

fn image_is_unique(family: &[Mapping], copy: usize) -> bool {
    let image = image_of(&family[copy]);
    family
        .iter()
        .enumerate()
        .all(|(other, mapping)| other == copy || image_of(mapping) != image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verify::check_solution;
    use crate::{Graph, Solution, COST_SENTINEL};

    fn deliberately_bad_single_copy() -> (Graph, Graph, Solution) {
        // the host carries the pattern on vertices {1, 2}; park the second
        // endpoint on vertex 3 so one reassignment fixes the copy
        let pattern = Graph::from_adjacency_matrix(vec![vec![0, 1], vec![1, 0]]);
        let host = Graph::from_adjacency_matrix(vec![
            vec![0, 0, 0, 0],
            vec![0, 0, 1, 0],
            vec![0, 1, 0, 0],
            vec![0, 0, 0, 0],
        ]);
        let family = vec![vec![1, 3]];
        let extended = crate::extend::rebuild_extension(&pattern, &host, &family);
        let cost = crate::cost::extension_cost(&host, &extended);
        let solution = Solution {
            extended,
            mappings: family,
            cost,
            found: true,
        };
        (pattern, host, solution)
    }

    #[test]
    fn test_moves_copy_onto_existing_edges() {
        let (pattern, host, start) = deliberately_bad_single_copy();
        assert_eq!(start.cost, 2);
        let refined = refine(&pattern, &host, start);
        assert_eq!(refined.cost, 0);
        assert!(check_solution(&pattern, &host, 1, &refined).is_empty());
    }

    #[test]
    fn test_never_increases_cost() {
        let (pattern, host, start) = deliberately_bad_single_copy();
        let start_cost = start.cost;
        let refined = refine(&pattern, &host, start);
        assert!(refined.cost <= start_cost);
    }

    #[test]
    fn test_second_run_changes_nothing() {
        let (pattern, host, start) = deliberately_bad_single_copy();
        let once = refine(&pattern, &host, start);
        let cost_once = once.cost;
        let twice = refine(&pattern, &host, once);
        assert_eq!(twice.cost, cost_once);
    }

    #[test]
    fn test_not_found_passes_through() {
        let pattern = Graph::from_adjacency_matrix(vec![vec![1]]);
        let host = Graph::new(1);
        let unsolved = Solution::not_found(&host);
        let result = refine(&pattern, &host, unsolved);
        assert!(!result.found);
        assert_eq!(result.cost, COST_SENTINEL);
    }

    #[test]
    fn test_keeps_images_distinct() {
        // two copies of one self-loop vertex; the cheap move onto the other
        // copy's vertex is forbidden
        let pattern = Graph::from_adjacency_matrix(vec![vec![1]]);
        let host = Graph::from_adjacency_matrix(vec![vec![1, 0], vec![0, 0]]);
        let family = vec![vec![0], vec![1]];
        let extended = crate::extend::rebuild_extension(&pattern, &host, &family);
        let cost = crate::cost::extension_cost(&host, &extended);
        let refined = refine(
            &pattern,
            &host,
            Solution {
                extended,
                mappings: family,
                cost,
                found: true,
            },
        );
        assert_eq!(refined.cost, 1);
        assert!(check_solution(&pattern, &host, 2, &refined).is_empty());
    }
}
