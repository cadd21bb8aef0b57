//! Floyd–Warshall engine with incremental single-edge relaxation.
//!
//! The matrix is either **valid** (it equals the true all-pairs shortest
//! distances for the edges inserted so far) or **stale** (one or more
//! relaxations were added without propagation). While stale, reading
//! distances, checking for negative cycles, and propagated insertion are
//! all refused with [`Error::StaleMatrix`]; [`solve`](FloydWarshall::solve)
//! makes the matrix valid again.
//!
//! Only relaxations are supported: an insertion can shorten paths, never
//! lengthen them. Edge deletions and weight increases are out of scope.

use tracing::{debug, trace};

use crate::matrix::DistMatrix;
use crate::{Error, Result};

/// All-pairs shortest-path engine over a fixed vertex set.
///
/// Typical workflow: batch edges with [`add_edge`](Self::add_edge), run one
/// [`solve`](Self::solve), then keep the matrix current across later
/// insertions with [`relax_edge`](Self::relax_edge).
pub struct FloydWarshall {
    dist: DistMatrix,
    needs_solve: bool,
}

impl FloydWarshall {
    // ========================================================================
    // Construction
    // ========================================================================

    /// Engine over `n` vertices with an empty edge set.
    ///
    /// `sentinel` stands for "unreachable" and must be strictly larger than
    /// any shortest distance the graph can attain. It is capped at
    /// `i64::MAX / 4` so that the three-term candidate sums in propagation
    /// cannot overflow.
    ///
    /// The fresh matrix already satisfies APSP for the empty graph, so the
    /// engine starts valid.
    ///
    /// # Panics
    ///
    /// If `sentinel` is not in `1..=i64::MAX / 4`.
    pub fn new(n: usize, sentinel: i64) -> Self {
        assert!(sentinel > 0, "sentinel must be positive, got {sentinel}");
        assert!(
            sentinel <= i64::MAX / 4,
            "sentinel {sentinel} risks overflow; keep it at or below i64::MAX / 4"
        );
        Self {
            dist: DistMatrix::new(n, sentinel),
            needs_solve: false,
        }
    }

    /// Number of vertices.
    pub fn n(&self) -> usize {
        self.dist.n()
    }

    /// The "unreachable" sentinel this engine was built with.
    pub fn sentinel(&self) -> i64 {
        self.dist.sentinel()
    }

    /// True when the matrix reflects APSP for every edge inserted so far.
    pub fn is_valid(&self) -> bool {
        !self.needs_solve
    }

    // ========================================================================
    // Edge insertion
    // ========================================================================

    /// Relax the direct edge `u -> v` in O(1), without propagation.
    ///
    /// A no-op when `weight` does not beat the current direct cost.
    /// Otherwise the matrix becomes stale until the next
    /// [`solve`](Self::solve).
    ///
    /// # Panics
    ///
    /// If `u` or `v` is out of range, or `weight >= sentinel`.
    pub fn add_edge(&mut self, u: usize, v: usize, weight: i64) {
        self.check_edge(u, v, weight);

        if weight >= self.dist.get(u, v) {
            return;
        }
        self.dist.set(u, v, weight);
        self.needs_solve = true;
    }

    /// Relax the direct edge `u -> v` and propagate it to all pairs in
    /// O(n²), keeping the matrix valid.
    ///
    /// Requires a valid matrix: every shortest path that newly routes
    /// through `u -> v` decomposes as (shortest `i -> u`) + edge +
    /// (shortest `v -> j`), and both sub-paths must already be correct.
    /// Relaxations are propagated one at a time; to batch many insertions,
    /// use [`add_edge`](Self::add_edge) and a single [`solve`](Self::solve)
    /// instead.
    ///
    /// A non-improving weight is a no-op.
    ///
    /// # Errors
    ///
    /// [`Error::StaleMatrix`] when called on a stale matrix. Nothing is
    /// mutated in that case.
    ///
    /// # Panics
    ///
    /// If `u` or `v` is out of range, or `weight >= sentinel`.
    pub fn relax_edge(&mut self, u: usize, v: usize, weight: i64) -> Result<()> {
        self.check_edge(u, v, weight);
        self.stale_guard("relax_edge()")?;

        if weight >= self.dist.get(u, v) {
            return Ok(());
        }
        self.dist.set(u, v, weight);
        trace!(u, v, weight, "propagating edge relaxation");

        let n = self.dist.n();
        let sentinel = self.dist.sentinel();
        for i in 0..n {
            let to_u = self.dist.get(i, u);
            if to_u == sentinel {
                continue;
            }
            let through = to_u + weight;
            for j in 0..n {
                let from_v = self.dist.get(v, j);
                if from_v == sentinel {
                    continue;
                }
                let candidate = through + from_v;
                if candidate < self.dist.get(i, j) {
                    self.dist.set(i, j, candidate);
                }
            }
        }
        Ok(())
    }

    // ========================================================================
    // Solving
    // ========================================================================

    /// Compute all-pairs shortest distances with Floyd–Warshall, making the
    /// matrix valid.
    ///
    /// Returns immediately when the matrix is already valid. The returned
    /// reference is read-only; all mutation goes through edge insertion.
    pub fn solve(&mut self) -> &DistMatrix {
        if !self.needs_solve {
            return &self.dist;
        }

        let n = self.dist.n();
        let sentinel = self.dist.sentinel();
        debug!(n, "running full floyd-warshall solve");

        let mut improved: u64 = 0;
        for k in 0..n {
            for i in 0..n {
                let ik = self.dist.get(i, k);
                if ik == sentinel {
                    continue;
                }
                for j in 0..n {
                    let kj = self.dist.get(k, j);
                    if kj == sentinel {
                        continue;
                    }
                    let candidate = ik + kj;
                    if candidate < self.dist.get(i, j) {
                        self.dist.set(i, j, candidate);
                        improved += 1;
                    }
                }
            }
        }

        debug!(improved, "solve complete");
        self.needs_solve = false;
        &self.dist
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// All-pairs shortest distances.
    ///
    /// # Errors
    ///
    /// [`Error::StaleMatrix`] while relaxations are pending.
    pub fn distances(&self) -> Result<&DistMatrix> {
        self.stale_guard("distances()")?;
        Ok(&self.dist)
    }

    /// True when some vertex can reach itself with negative total cost.
    ///
    /// Once this reports true, the stored values are no longer shortest-path
    /// lengths and further relaxation can keep decreasing them. The engine
    /// detects the condition but does not recover from it.
    ///
    /// # Errors
    ///
    /// [`Error::StaleMatrix`] while relaxations are pending.
    pub fn has_negative_cycle(&self) -> Result<bool> {
        self.stale_guard("has_negative_cycle()")?;
        let n = self.dist.n();
        Ok((0..n).any(|v| self.dist.get(v, v) < 0))
    }

    // ========================================================================
    // Shared guards
    // ========================================================================

    /// Single gate for every operation that needs a valid matrix.
    fn stale_guard(&self, operation: &'static str) -> Result<()> {
        if self.needs_solve {
            return Err(Error::StaleMatrix { operation });
        }
        Ok(())
    }

    fn check_edge(&self, u: usize, v: usize, weight: i64) {
        let n = self.dist.n();
        assert!(u < n, "source vertex {u} out of range (n = {n})");
        assert!(v < n, "target vertex {v} out of range (n = {n})");
        assert!(
            weight < self.dist.sentinel(),
            "edge weight {weight} must be strictly below the sentinel {}",
            self.dist.sentinel()
        );
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const INF: i64 = 1_000_000_000;

    #[test]
    fn new_engine_is_valid_and_empty() {
        let fw = FloydWarshall::new(3, INF);
        assert!(fw.is_valid());
        let d = fw.distances().unwrap();
        assert_eq!(d.get(0, 0), 0);
        assert_eq!(d.get(0, 1), INF);
    }

    #[test]
    fn lazy_insert_marks_stale_and_solve_recovers() {
        let mut fw = FloydWarshall::new(4, INF);
        fw.add_edge(0, 1, 3);
        fw.solve();

        fw.add_edge(1, 2, 4);
        assert!(!fw.is_valid());
        assert!(fw.distances().unwrap_err().is_stale());
        assert!(fw.has_negative_cycle().unwrap_err().is_stale());
        assert!(fw.relax_edge(0, 2, 1).unwrap_err().is_stale());

        fw.solve();
        assert!(fw.is_valid());
        fw.relax_edge(0, 2, 1).unwrap();
        assert_eq!(fw.distances().unwrap().get(0, 2), 1);
    }

    #[test]
    fn non_improving_insert_is_a_noop() {
        let mut fw = FloydWarshall::new(3, INF);
        fw.add_edge(0, 1, 3);
        fw.solve();

        fw.add_edge(0, 1, 3);
        assert!(fw.is_valid());
        fw.add_edge(0, 1, 7);
        assert!(fw.is_valid());
        assert_eq!(fw.distances().unwrap().get(0, 1), 3);
    }

    #[test]
    fn propagated_insert_keeps_matrix_current() {
        let mut fw = FloydWarshall::new(3, INF);
        fw.add_edge(0, 1, 3);
        fw.add_edge(1, 2, 4);
        fw.solve();
        assert_eq!(fw.distances().unwrap().get(0, 2), 7);

        fw.relax_edge(0, 2, 1).unwrap();
        let d = fw.distances().unwrap();
        assert_eq!(d.get(0, 2), 1);
        assert_eq!(d.get(0, 1), 3);
        assert_eq!(d.get(1, 2), 4);
        assert!(fw.is_valid());
    }

    #[test]
    fn relaxation_reroutes_longer_paths() {
        // 0 -> 1 -> 2 -> 3 costs 30; relaxing 1 -> 2 down to 1 must shorten
        // every pair routing through it.
        let mut fw = FloydWarshall::new(4, INF);
        fw.add_edge(0, 1, 10);
        fw.add_edge(1, 2, 10);
        fw.add_edge(2, 3, 10);
        fw.solve();
        assert_eq!(fw.distances().unwrap().get(0, 3), 30);

        fw.relax_edge(1, 2, 1).unwrap();
        let d = fw.distances().unwrap();
        assert_eq!(d.get(0, 3), 21);
        assert_eq!(d.get(0, 2), 11);
        assert_eq!(d.get(1, 3), 11);
    }

    #[test]
    fn relaxation_works_on_the_empty_graph() {
        let mut fw = FloydWarshall::new(3, INF);
        fw.relax_edge(0, 1, 5).unwrap();
        fw.relax_edge(1, 2, 5).unwrap();
        assert_eq!(fw.distances().unwrap().get(0, 2), 10);
    }

    #[test]
    fn solve_is_idempotent() {
        let mut fw = FloydWarshall::new(3, INF);
        fw.add_edge(0, 1, 2);
        fw.add_edge(1, 2, 2);
        let first = fw.solve().clone();
        let second = fw.solve().clone();
        assert_eq!(first, second);
    }

    #[test]
    fn negative_cycle_is_detected() {
        let mut fw = FloydWarshall::new(3, INF);
        fw.add_edge(0, 1, 1);
        fw.add_edge(1, 2, 1);
        fw.add_edge(2, 0, -3);
        fw.solve();
        assert!(fw.has_negative_cycle().unwrap());
    }

    #[test]
    fn positive_cycle_is_not_a_negative_cycle() {
        let mut fw = FloydWarshall::new(3, INF);
        fw.add_edge(0, 1, 1);
        fw.add_edge(1, 2, 1);
        fw.add_edge(2, 0, 1);
        fw.solve();
        assert!(!fw.has_negative_cycle().unwrap());
    }

    #[test]
    fn negative_self_loop_shows_as_negative_cycle() {
        let mut fw = FloydWarshall::new(2, INF);
        fw.relax_edge(0, 0, -1).unwrap();
        assert!(fw.has_negative_cycle().unwrap());
    }

    #[test]
    fn unreachable_pairs_keep_the_sentinel() {
        let mut fw = FloydWarshall::new(3, INF);
        fw.add_edge(0, 1, 5);
        fw.solve();
        let d = fw.distances().unwrap();
        assert_eq!(d.get(0, 2), INF);
        assert_eq!(d.get(2, 0), INF);
        assert!(d.is_unreachable(0, 2));
    }

    #[test]
    fn zero_vertex_engine_is_usable() {
        let mut fw = FloydWarshall::new(0, INF);
        fw.solve();
        assert!(!fw.has_negative_cycle().unwrap());
    }

    #[test]
    #[should_panic(expected = "sentinel must be positive")]
    fn zero_sentinel_is_rejected() {
        FloydWarshall::new(3, 0);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn out_of_range_vertex_is_rejected() {
        let mut fw = FloydWarshall::new(2, INF);
        fw.add_edge(0, 2, 1);
    }

    #[test]
    #[should_panic(expected = "strictly below the sentinel")]
    fn sentinel_weight_is_rejected() {
        let mut fw = FloydWarshall::new(2, INF);
        fw.add_edge(0, 1, INF);
    }
}
