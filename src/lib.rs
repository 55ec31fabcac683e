/// A directed multigraph stored as a dense adjacency matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    /// Number of vertices
    pub n: usize,
    /// Adjacency matrix: adj[u][v] = multiplicity of the arc u -> v
    pub adj: Vec<Vec<usize>>,
}

impl Graph {
    pub fn new(n: usize) -> Self {
        Graph {
            n,
            adj: vec![vec![0; n]; n],
        }
    }

    pub fn from_adjacency_matrix(adj: Vec<Vec<usize>>) -> Self {
        let n = adj.len();
        Graph { n, adj }
    }

    pub fn num_vertices(&self) -> usize {
        self.n
    }

    pub fn get_edge(&self, u: usize, v: usize) -> usize {
        self.adj[u][v]
    }

    /// Combined in- and out-degree of v, counting multiplicities.
    /// A self-loop contributes to both directions.
    pub fn degree(&self, v: usize) -> usize {
        (0..self.n).map(|u| self.adj[v][u] + self.adj[u][v]).sum()
    }

    /// Sum of all arc multiplicities.
    pub fn total_edges(&self) -> usize {
        self.adj.iter().flatten().sum()
    }
}

/// Sentinel for a pattern vertex that has not been assigned a host vertex.
pub const NO_MAPPING: usize = usize::MAX;

/// Assignment of pattern vertices to host vertices, indexed by pattern vertex.
/// Entries are host vertices or [`NO_MAPPING`].
pub type Mapping = Vec<usize>;

/// Sorted host vertices used by a mapping. Mappings are injective, so two
/// mappings place their embeddings on the same vertices exactly when their
/// images compare equal.
pub fn image_of(mapping: &[usize]) -> Vec<usize> {
    let mut image: Vec<usize> = mapping.iter().copied().filter(|&v| v != NO_MAPPING).collect();
    image.sort_unstable();
    image
}

/// Cost reported when no extension satisfies the request.
pub const COST_SENTINEL: usize = usize::MAX;

/// Result of a solver run: the extended host graph, the mapping family,
/// the number of added edge multiplicities, and whether a valid family exists.
#[derive(Debug, Clone)]
pub struct Solution {
    pub extended: Graph,
    pub mappings: Vec<Mapping>,
    pub cost: usize,
    pub found: bool,
}

impl Solution {
    /// The failure value: the host graph untouched, no mappings.
    pub fn not_found(host: &Graph) -> Self {
        Solution {
            extended: host.clone(),
            mappings: Vec::new(),
            cost: COST_SENTINEL,
            found: false,
        }
    }
}

fn preconditions_hold(pattern: &Graph, host: &Graph, k: usize) -> bool {
    pattern.num_vertices() >= 1 && host.num_vertices() >= pattern.num_vertices() && k >= 1
}

/// Branch-and-bound search for the cheapest extension of `host` admitting
/// `k` image-distinct embeddings of `pattern`. With `single_solution` the
/// first complete family is returned instead of the cheapest one.
pub fn solve_exact(pattern: &Graph, host: &Graph, k: usize, single_solution: bool) -> Solution {
    if !preconditions_hold(pattern, host, k) {
        return Solution::not_found(host);
    }
    exact::search(pattern, host, k, single_solution)
}

/// Greedy construction of a k-copy family followed by local-search
/// refinement. Cheap, but the cost may exceed the optimum.
pub fn solve_approx(pattern: &Graph, host: &Graph, k: usize) -> Solution {
    if !preconditions_hold(pattern, host, k) {
        return Solution::not_found(host);
    }
    refine::refine(pattern, host, approx::construct(pattern, host, k))
}

// Module declarations
pub mod approx;
pub mod candidates;
pub mod cost;
pub mod exact;
pub mod extend;
pub mod ordering;
pub mod parser;
pub mod refine;
pub mod utils;
pub mod verify;
