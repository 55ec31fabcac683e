use log::debug;

use crate::candidates::candidates_for;
use crate::extend::{apply_assignment, revert};
use crate::ordering::vertex_order;
use crate::{image_of, Graph, Mapping, Solution, COST_SENTINEL, NO_MAPPING};

/// Branch-and-bound over (copy, position) decisions.
///
/// Copies are filled one after another, each walking the pattern vertices in
/// the shared processing order. A single working host matrix is mutated on
/// commit and unwound from a per-frame change log on backtrack. Identical
/// families that differ only by copy order are cut by requiring the mapping
/// tuples to be lexicographically non-decreasing across copies.
pub fn search(pattern: &Graph, host: &Graph, k: usize, single_solution: bool) -> Solution {
    let mut search = Search {
        pattern,
        order: vertex_order(pattern),
        k,
        single_solution,
        host: host.clone(),
        family: vec![vec![NO_MAPPING; pattern.num_vertices()]; k],
        cost: 0,
        best_cost: COST_SENTINEL,
        best: None,
    };
    search.descend(0, 0, false);
    match search.best {
        Some((extended, mappings)) => Solution {
            extended,
            mappings,
            cost: search.best_cost,
            found: true,
        },
        None => Solution::not_found(host),
    }
}

struct Search<'a> {
    pattern: &'a Graph,
    order: Vec<usize>,
    k: usize,
    single_solution: bool,
    /// Working extension, mutated in place
    host: Graph,
    /// k rows of pattern-indexed assignments
    family: Vec<Mapping>,
    /// Multiplicities added along the current branch
    cost: usize,
    best_cost: usize,
    best: Option<(Graph, Vec<Mapping>)>,
}

impl Search<'_> {
    /// Expand the node (copy, pos). Returns true when the whole search
    /// should stop, which only happens in single-solution mode.
    fn descend(&mut self, copy: usize, pos: usize, prefix_equal: bool) -> bool {
        let n1 = self.pattern.num_vertices();
        let u = self.order[pos];
        let last = pos + 1 == n1;

        for candidate in candidates_for(u, self.pattern, &self.host, &self.family[copy]) {
            // tuples must not decrease relative to the previous copy; on the
            // closing position they must strictly exceed it
            if copy > 0 && prefix_equal {
                let floor = self.family[copy - 1][u];
                if candidate.vertex < floor || (last && candidate.vertex == floor) {
                    continue;
                }
            }
            // two different tuples can still land on the same vertex set
            if last && copy > 0 && self.repeats_earlier_image(copy, candidate.vertex) {
                continue;
            }
            if self.cost.saturating_add(candidate.added) >= self.best_cost {
                continue;
            }

            self.family[copy][u] = candidate.vertex;
            let changes = apply_assignment(
                u,
                candidate.vertex,
                self.pattern,
                &mut self.host,
                &self.family[copy],
            );
            self.cost += candidate.added;
            let still_equal =
                copy > 0 && prefix_equal && candidate.vertex == self.family[copy - 1][u];

            let stop = if !last {
                self.descend(copy, pos + 1, still_equal)
            } else if copy + 1 < self.k {
                self.descend(copy + 1, 0, true)
            } else {
                self.record_family()
            };

            revert(&changes, &mut self.host);
            self.cost -= candidate.added;
            self.family[copy][u] = NO_MAPPING;
            if stop {
                return true;
            }
        }
        false
    }

    /// All k copies are complete and pairwise image-distinct here; the
    /// pruning test above guarantees the branch undercuts the incumbent.
    fn record_family(&mut self) -> bool {
        debug_assert!(self.cost < self.best_cost);
        self.best_cost = self.cost;
        self.best = Some((self.host.clone(), self.family.clone()));
        debug!("incumbent improved to cost {}", self.cost);
        self.single_solution
    }

    /// Would closing the current copy with `vertex` reuse the vertex set of
    /// an earlier copy?
    fn repeats_earlier_image(&self, copy: usize, vertex: usize) -> bool {
        let mut image: Vec<usize> = self.family[copy]
            .iter()
            .copied()
            .filter(|&m| m != NO_MAPPING)
            .collect();
        image.push(vertex);
        image.sort_unstable();
        (0..copy).any(|earlier| image_of(&self.family[earlier]) == image)
    }
}
