//! # apsp-rs — Incremental All-Pairs Shortest Paths
//!
//! Floyd–Warshall APSP for a weighted directed graph on a fixed vertex set,
//! with O(n²) incremental propagation of a single edge relaxation.
//!
//! ## Design Principles
//!
//! 1. **One owner**: `FloydWarshall` exclusively owns the distance matrix;
//!    readers get `&DistMatrix`, never a mutable alias
//! 2. **Two states**: the matrix is valid or stale; every read and every
//!    incremental update is gated on validity by one shared guard
//! 3. **Relaxation only**: inserting an edge can only shorten paths — weight
//!    increases and edge deletions are unsupported
//! 4. **Fail fast on caller bugs**: malformed vertices and weights panic;
//!    out-of-order calls return a catchable [`Error::StaleMatrix`]
//!
//! ## Quick Start
//!
//! ```rust
//! use apsp_rs::FloydWarshall;
//!
//! # fn example() -> apsp_rs::Result<()> {
//! let mut fw = FloydWarshall::new(3, 1_000_000_000);
//! fw.add_edge(0, 1, 3);
//! fw.add_edge(1, 2, 4);
//! fw.solve();
//! assert_eq!(fw.distances()?.get(0, 2), 7);
//!
//! // One new edge: an O(n²) incremental update instead of an O(n³) re-solve.
//! fw.relax_edge(0, 2, 1)?;
//! assert_eq!(fw.distances()?.get(0, 2), 1);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Complexity
//!
//! | Operation | Cost | Notes |
//! |-----------|------|-------|
//! | `new` | O(n²) | matrix allocation |
//! | `add_edge` | O(1) | marks the matrix stale |
//! | `relax_edge` | O(n²) | requires a valid matrix |
//! | `solve` | O(n³) | O(1) when already valid |
//! | `distances` | O(1) | requires a valid matrix |
//! | `has_negative_cycle` | O(n) | requires a valid matrix |

// ============================================================================
// Modules
// ============================================================================

pub mod matrix;
pub mod engine;
pub mod export;
pub mod offline;

// ============================================================================
// Re-exports: the engine and its matrix
// ============================================================================

pub use engine::FloydWarshall;
pub use matrix::DistMatrix;

// ============================================================================
// Re-exports: output mapping
// ============================================================================

pub use export::{with_unreachable, write_json, write_table};

// ============================================================================
// Re-exports: offline query processing
// ============================================================================

pub use offline::{Edge, Problem, Query, solve_offline};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The distance matrix has unpropagated relaxations. Recoverable:
    /// call [`FloydWarshall::solve`] and retry.
    #[error("distance matrix is stale; call solve() before {operation}")]
    StaleMatrix { operation: &'static str },

    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for the out-of-order-call error, as opposed to malformed input.
    pub fn is_stale(&self) -> bool {
        matches!(self, Error::StaleMatrix { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
