use crate::Graph;

/// Processing order for the pattern vertices, shared by both solvers.
///
/// Vertices are emitted most-constrained first: at each step the unplaced
/// vertex with the most arcs into the already-ordered prefix wins, total
/// degree breaks ties, and the smallest index decides what remains so the
/// order is deterministic.
pub fn vertex_order(g: &Graph) -> Vec<usize> {
    let n = g.num_vertices();
    let totals: Vec<usize> = (0..n).map(|v| g.degree(v)).collect();

    let mut order: Vec<usize> = Vec::with_capacity(n);
    let mut placed = vec![false; n];
    while order.len() < n {
        let mut best = n;
        let mut best_key = (0, 0);
        for v in 0..n {
            if placed[v] {
                continue;
            }
            let attached: usize = order.iter().map(|&u| g.adj[v][u] + g.adj[u][v]).sum();
            let key = (attached, totals[v]);
            if best == n || key > best_key {
                best = v;
                best_key = key;
            }
        }
        placed[best] = true;
        order.push(best);
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Graph;

    #[test]
    fn test_isolated_vertices_keep_index_order() {
        let order = vertex_order(&Graph::new(4));
        assert_eq!(order, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_highest_degree_leads() {
        // vertex 2 touches everything else
        let g = Graph::from_adjacency_matrix(vec![
            vec![0, 0, 1],
            vec![0, 0, 1],
            vec![1, 1, 0],
        ]);
        let order = vertex_order(&g);
        assert_eq!(order[0], 2);
        // both remaining vertices tie on attachment and degree
        assert_eq!(&order[1..], &[0, 1]);
    }

    #[test]
    fn test_attachment_outranks_degree() {
        // every degree ties at 4, so vertex 0 opens; vertex 3 is the only
        // neighbor of 0 and must come next even though 1 and 2 tie it on degree
        let g = Graph::from_adjacency_matrix(vec![
            vec![0, 0, 0, 3],
            vec![0, 0, 2, 0],
            vec![0, 2, 0, 0],
            vec![1, 0, 0, 0],
        ]);
        let order = vertex_order(&g);
        assert_eq!(order[0], 0);
        assert_eq!(order[1], 3);
    }

    #[test]
    fn test_order_is_a_permutation() {
        let g = Graph::from_adjacency_matrix(vec![
            vec![0, 1, 0, 0, 2],
            vec![0, 0, 1, 0, 0],
            vec![1, 0, 1, 0, 0],
            vec![0, 0, 0, 0, 0],
            vec![0, 1, 0, 1, 0],
        ]);
        let mut order = vertex_order(&g);
        order.sort_unstable();
        assert_eq!(order, vec![0, 1, 2, 3, 4]);
    }
}
