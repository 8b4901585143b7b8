//! Weighted adjacency-graph construction (§4.2): from cluster boundaries,
//! build a compressed-sparse-row graph whose edge weight is the number of
//! boundary edges two clusters share.

use crate::loop_runner::LoopRunner;
use crate::util::sorted_intersection_len;

/// A compressed-sparse-row (CSR) undirected weighted graph, in the layout
/// [`crate::partition::GraphPartitioner`] implementations expect.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CsrGraph {
    /// Exclusive prefix sum of vertex degrees; length `vertex_count + 1`.
    pub xadj: Vec<i32>,
    /// Neighbour ids, grouped by vertex according to `xadj`.
    pub adjacency: Vec<i32>,
    /// Edge weights, parallel to `adjacency`.
    pub adjwght: Vec<i32>,
    /// `false` if any vertex has no incident edges, in which case the
    /// partitioner must not be asked to enforce contiguous partitions.
    pub is_contiguous: bool,
}

impl CsrGraph {
    /// Number of vertices in the graph.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.xadj.len().saturating_sub(1)
    }
}

/// Builds a [`CsrGraph`] from per-cluster sorted boundary-edge sequences.
///
/// The forward pass (computing, for every ordered pair `i < j`, the size of
/// the shared boundary) is the dominant cost for large working sets and runs
/// through `loop_runner`. The subsequent resolve pass is sequential: it
/// mirrors each discovered edge `i -> j` back onto `j`, so that CSR rows are
/// bidirectional, then concatenates each row as `prev` edges (found while
/// resolving earlier rows) followed by `forward` edges (found while
/// processing this row) — this exact order is required for the emitted
/// adjacency to match what a deterministic partitioner seed expects run to
/// run.
#[must_use]
pub fn build_adjacency(boundaries: &[Vec<u64>], loop_runner: &LoopRunner) -> CsrGraph {
    let n = boundaries.len();
    if n == 0 {
        return CsrGraph {
            xadj: vec![0],
            adjacency: Vec::new(),
            adjwght: Vec::new(),
            is_contiguous: true,
        };
    }

    let mut adjacency_forward: Vec<Vec<i32>> = vec![Vec::new(); n];
    let mut adjwght_forward: Vec<Vec<i32>> = vec![Vec::new(); n];

    loop_runner.run_collect(n, |i| {
        let mut forward_adj = Vec::new();
        let mut forward_wght = Vec::new();
        for j in (i + 1)..n {
            let shared = sorted_intersection_len(&boundaries[i], &boundaries[j]);
            if shared > 0 {
                forward_adj.push(j as i32);
                #[allow(clippy::cast_possible_wrap, reason = "boundary edge counts fit in i32 for any realistic cluster")]
                forward_wght.push(shared as i32);
            }
        }
        (forward_adj, forward_wght)
    })
    .into_iter()
    .enumerate()
    .for_each(|(i, (adj, wght))| {
        adjacency_forward[i] = adj;
        adjwght_forward[i] = wght;
    });

    let mut is_contiguous = true;
    let mut xadj = vec![0_i32; n + 1];
    let mut adjacency = Vec::new();
    let mut adjwght = Vec::new();
    let mut adjacency_prev: Vec<Vec<i32>> = vec![Vec::new(); n];
    let mut adjwght_prev: Vec<Vec<i32>> = vec![Vec::new(); n];

    for i in 0..n {
        let valence = adjacency_forward[i].len() + adjacency_prev[i].len();
        if valence == 0 {
            is_contiguous = false;
        }
        #[allow(clippy::cast_possible_wrap, reason = "valence is bounded by cluster count")]
        {
            xadj[i + 1] = xadj[i] + valence as i32;
        }
        for (j_idx, &j) in adjacency_forward[i].iter().enumerate() {
            adjacency_prev[j as usize].push(i as i32);
            adjwght_prev[j as usize].push(adjwght_forward[i][j_idx]);
        }
        adjacency.extend_from_slice(&adjacency_prev[i]);
        adjwght.extend_from_slice(&adjwght_prev[i]);
        adjacency.extend_from_slice(&adjacency_forward[i]);
        adjwght.extend_from_slice(&adjwght_forward[i]);
    }

    CsrGraph {
        xadj,
        adjacency,
        adjwght,
        is_contiguous,
    }
}
