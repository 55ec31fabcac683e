use std::cmp::Reverse;

use crate::cost::{delta_cost, delta_exist};
use crate::{Graph, NO_MAPPING};

/// A ranked target for one assignment decision. Rebuilt for every
/// (copy, vertex) position; never stored across decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    /// Host vertex
    pub vertex: usize,
    /// Multiplicities that assigning here would add right now
    pub added: usize,
    /// Requirement units already covered by existing host edges
    pub satisfied: usize,
}

/// All admissible host targets for pattern vertex `u`, best first.
///
/// Hosts already used by the current copy are excluded, which keeps every
/// completed copy injective. The sort prefers high coverage, then low added
/// cost, then high current host degree; index order settles the rest.
pub fn candidates_for(u: usize, pattern: &Graph, host: &Graph, partial: &[usize]) -> Vec<Candidate> {
    let mut used = vec![false; host.num_vertices()];
    for &m in partial.iter() {
        if m != NO_MAPPING {
            used[m] = true;
        }
    }

    let mut ranked: Vec<Candidate> = (0..host.num_vertices())
        .filter(|&v| !used[v])
        .map(|v| Candidate {
            vertex: v,
            added: delta_cost(u, v, pattern, host, partial),
            satisfied: delta_exist(u, v, pattern, host, partial),
        })
        .collect();
    ranked.sort_by_key(|c| (Reverse(c.satisfied), c.added, Reverse(host.degree(c.vertex))));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Graph, NO_MAPPING};

    #[test]
    fn test_used_hosts_are_excluded() {
        let pattern = Graph::from_adjacency_matrix(vec![vec![0, 1], vec![0, 0]]);
        let host = Graph::new(3);
        let partial = vec![NO_MAPPING, 1];
        let ranked = candidates_for(0, &pattern, &host, &partial);
        let vertices: Vec<usize> = ranked.iter().map(|c| c.vertex).collect();
        assert_eq!(vertices.len(), 2);
        assert!(!vertices.contains(&1));
    }

    #[test]
    fn test_coverage_outranks_cost() {
        let pattern = Graph::from_adjacency_matrix(vec![vec![0, 1], vec![0, 0]]);
        // host 2 already carries the needed arc into host 1
        let host = Graph::from_adjacency_matrix(vec![
            vec![0, 0, 0],
            vec![0, 0, 0],
            vec![0, 1, 0],
        ]);
        let partial = vec![NO_MAPPING, 1];
        let ranked = candidates_for(0, &pattern, &host, &partial);
        assert_eq!(ranked[0].vertex, 2);
        assert_eq!(ranked[0].added, 0);
        assert_eq!(ranked[0].satisfied, 1);
    }

    #[test]
    fn test_host_degree_breaks_cost_ties() {
        let pattern = Graph::from_adjacency_matrix(vec![vec![0]]);
        // neither candidate covers anything; host 1 has the busier neighborhood
        let host = Graph::from_adjacency_matrix(vec![
            vec![0, 0, 0],
            vec![0, 1, 0],
            vec![0, 0, 0],
        ]);
        let ranked = candidates_for(0, &pattern, &host, &[NO_MAPPING]);
        assert_eq!(ranked[0].vertex, 1);
    }

    #[test]
    fn test_index_order_is_the_final_tiebreak() {
        let pattern = Graph::from_adjacency_matrix(vec![vec![0]]);
        let host = Graph::new(3);
        let ranked = candidates_for(0, &pattern, &host, &[NO_MAPPING]);
        let vertices: Vec<usize> = ranked.iter().map(|c| c.vertex).collect();
        assert_eq!(vertices, vec![0, 1, 2]);
    }
}
