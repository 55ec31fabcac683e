use crate::{Graph, Mapping, NO_MAPPING};

/// One raised entry of the working host matrix: (row, col, previous value).
pub type EdgeChange = (usize, usize, usize);

fn raise(host: &mut Graph, row: usize, col: usize, needed: usize, changes: &mut Vec<EdgeChange>) {
    if needed > host.adj[row][col] {
        changes.push((row, col, host.adj[row][col]));
        host.adj[row][col] = needed;
    }
}

/// Raise host multiplicities so the freshly committed assignment u -> v
/// satisfies every arc between u and the mapped part of the copy, including
/// u's self-loop. Returns the entries actually increased, oldest first, so
/// the caller can unwind them with [`revert`].
///
/// `partial` may already contain the u -> v entry; u's own slot is skipped
/// and the self-loop is handled once, explicitly.
pub fn apply_assignment(
    u: usize,
    v: usize,
    pattern: &Graph,
    host: &mut Graph,
    partial: &[usize],
) -> Vec<EdgeChange> {
    let mut changes = Vec::new();
    for i in 0..pattern.num_vertices() {
        let mi = partial[i];
        if mi == NO_MAPPING || i == u {
            continue;
        }
        raise(host, v, mi, pattern.adj[u][i], &mut changes);
        raise(host, mi, v, pattern.adj[i][u], &mut changes);
    }
    raise(host, v, v, pattern.adj[u][u], &mut changes);
    changes
}

/// Undo a change log produced by [`apply_assignment`]. After apply + revert
/// the host matrix is bitwise identical to its prior state.
pub fn revert(changes: &[EdgeChange], host: &mut Graph) {
    for &(row, col, old) in changes.iter().rev() {
        host.adj[row][col] = old;
    }
}

/// The minimal extension of `original` carrying every copy in `family`:
/// each entry is raised to the largest multiplicity any copy requires of it.
/// All mappings must be complete.
pub fn rebuild_extension(pattern: &Graph, original: &Graph, family: &[Mapping]) -> Graph {
    let mut extended = original.clone();
    for mapping in family {
        for x in 0..pattern.num_vertices() {
            for y in 0..pattern.num_vertices() {
                let (a, b) = (mapping[x], mapping[y]);
                if pattern.adj[x][y] > extended.adj[a][b] {
                    extended.adj[a][b] = pattern.adj[x][y];
                }
            }
        }
    }
    extended
}

/// Re-tighten the rows and columns of the given host vertices: reset them to
/// the original multiplicities, then re-apply the requirements of every copy
/// that touches them. Entries away from `hosts` are left alone. This is how
/// the refiner prices a move without rebuilding the whole matrix.
pub fn retighten(
    extended: &mut Graph,
    original: &Graph,
    pattern: &Graph,
    family: &[Mapping],
    hosts: &[usize],
) {
    let n = extended.num_vertices();
    for &h in hosts {
        for t in 0..n {
            extended.adj[h][t] = original.adj[h][t];
            extended.adj[t][h] = original.adj[t][h];
        }
    }
    for mapping in family {
        for x in 0..pattern.num_vertices() {
            for y in 0..pattern.num_vertices() {
                let (a, b) = (mapping[x], mapping[y]);
                if (hosts.contains(&a) || hosts.contains(&b))
                    && pattern.adj[x][y] > extended.adj[a][b]
                {
                    extended.adj[a][b] = pattern.adj[x][y];
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Graph, NO_MAPPING};

    #[test]
    fn test_apply_then_revert_restores_host() {
        let pattern = Graph::from_adjacency_matrix(vec![vec![1, 2], vec![1, 0]]);
        let mut host = Graph::from_adjacency_matrix(vec![
            vec![0, 1, 0],
            vec![0, 0, 0],
            vec![1, 0, 0],
        ]);
        let before = host.clone();
        let partial = vec![0, 2];
        let changes = apply_assignment(0, 0, &pattern, &mut host, &partial);
        assert!(!changes.is_empty());
        revert(&changes, &mut host);
        assert_eq!(host, before);
    }

    #[test]
    fn test_apply_raises_exactly_the_deficit() {
        let pattern = Graph::from_adjacency_matrix(vec![vec![1, 2], vec![1, 0]]);
        let mut host = Graph::from_adjacency_matrix(vec![vec![0, 1], vec![0, 0]]);
        let partial = vec![0, 1];
        apply_assignment(0, 0, &pattern, &mut host, &partial);
        assert_eq!(host.adj, vec![vec![1, 2], vec![1, 0]]);
    }

    #[test]
    fn test_apply_is_idempotent_on_satisfied_edges() {
        let pattern = Graph::from_adjacency_matrix(vec![vec![0, 1], vec![0, 0]]);
        let mut host = Graph::from_adjacency_matrix(vec![vec![0, 3], vec![0, 0]]);
        let partial = vec![0, 1];
        let changes = apply_assignment(0, 0, &pattern, &mut host, &partial);
        assert!(changes.is_empty());
        assert_eq!(host.adj[0][1], 3);
    }

    #[test]
    fn test_rebuild_takes_max_over_copies() {
        let pattern = Graph::from_adjacency_matrix(vec![vec![0, 2], vec![0, 0]]);
        let original = Graph::new(3);
        let family = vec![vec![0, 1], vec![1, 2]];
        let extended = rebuild_extension(&pattern, &original, &family);
        assert_eq!(extended.adj[0][1], 2);
        assert_eq!(extended.adj[1][2], 2);
        assert_eq!(extended.adj[2][0], 0);
    }

    #[test]
    fn test_retighten_drops_stale_requirements() {
        let pattern = Graph::from_adjacency_matrix(vec![vec![0, 2], vec![0, 0]]);
        let original = Graph::new(3);
        // copy used to sit on (0, 1); it moved to (0, 2)
        let family = vec![vec![0, 2]];
        let mut extended = rebuild_extension(&pattern, &original, &[vec![0, 1]]);
        assert_eq!(extended.adj[0][1], 2);
        retighten(&mut extended, &original, &pattern, &family, &[1, 2]);
        assert_eq!(extended.adj[0][1], 0);
        assert_eq!(extended.adj[0][2], 2);
    }

    #[test]
    fn test_partial_with_unmapped_slots() {
        let pattern = Graph::from_adjacency_matrix(vec![
            vec![0, 1, 1],
            vec![0, 0, 0],
            vec![0, 0, 0],
        ]);
        let mut host = Graph::new(4);
        // only vertex 1 is mapped; the 0 -> 2 requirement must wait
        let partial = vec![3, 0, NO_MAPPING];
        apply_assignment(0, 3, &pattern, &mut host, &partial);
        assert_eq!(host.adj[3][0], 1);
        assert_eq!(host.total_edges(), 1);
    }
}
