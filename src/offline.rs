//! Offline processing of edge-closure query streams.
//!
//! Decremental updates ("this road is now impassable") are not supported by
//! the engine directly, but a fully known query stream can be walked
//! backwards: start from the graph with every closed edge removed, and turn
//! each closure into an incremental re-insertion. Each re-insertion is a
//! relaxation, which the engine propagates in O(n²) instead of an O(n³)
//! re-solve per update.
//!
//! Input format (whitespace separated, all indices 1-based):
//!
//! ```text
//! N M Q
//! A B C        M edge lines: endpoints and weight of an undirected road
//! 1 i          Q query lines: close edge i, or ...
//! 2 x y        ... report the shortest distance x -> y
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::FloydWarshall;
use crate::{Error, Result};

/// Marker reported for unreachable pairs in query answers.
pub const UNREACHABLE: i64 = -1;

/// An undirected road: traversable in both directions at the same cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub u: usize,
    pub v: usize,
    pub weight: i64,
}

/// One entry in the query stream, in submission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Query {
    /// Edge `edge` (index into [`Problem::edges`]) becomes impassable.
    Close { edge: usize },
    /// Report the shortest distance from `from` to `to`.
    Distance { from: usize, to: usize },
}

/// A parsed problem: fixed vertex set, edge list, query stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub n: usize,
    pub edges: Vec<Edge>,
    pub queries: Vec<Query>,
}

impl Problem {
    /// Parse the text format described in the module docs. Blank lines are
    /// skipped; indices are converted to 0-based.
    ///
    /// # Errors
    ///
    /// [`Error::Parse`] with the 1-based line number on malformed or
    /// truncated input, out-of-range endpoints, or out-of-range edge and
    /// vertex references in queries.
    pub fn parse(input: &str) -> Result<Problem> {
        let mut lines = input
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty());

        let (line_no, header) = lines
            .next()
            .ok_or_else(|| parse_err(0, "missing `N M Q` header"))?;
        let header = numbers(line_no, header)?;
        let &[n, m, q] = &header[..] else {
            return Err(parse_err(line_no, "expected exactly `N M Q`"));
        };
        if n < 0 || m < 0 || q < 0 {
            return Err(parse_err(line_no, "counts must be non-negative"));
        }
        let (n, m, q) = (n as usize, m as usize, q as usize);

        let mut edges = Vec::with_capacity(m);
        for _ in 0..m {
            let (line_no, line) = lines
                .next()
                .ok_or_else(|| parse_err(line_no, "missing edge line"))?;
            let fields = numbers(line_no, line)?;
            let &[a, b, c] = &fields[..] else {
                return Err(parse_err(line_no, "expected `A B C`"));
            };
            let (u, v) = (vertex(line_no, a, n)?, vertex(line_no, b, n)?);
            edges.push(Edge { u, v, weight: c });
        }

        let mut queries = Vec::with_capacity(q);
        for _ in 0..q {
            let (line_no, line) = lines
                .next()
                .ok_or_else(|| parse_err(line_no, "missing query line"))?;
            let fields = numbers(line_no, line)?;
            let query = match fields[..] {
                [1, i] => {
                    if !(1..=m as i64).contains(&i) {
                        return Err(parse_err(line_no, format!("edge index {i} out of range")));
                    }
                    Query::Close { edge: (i - 1) as usize }
                }
                [2, x, y] => Query::Distance {
                    from: vertex(line_no, x, n)?,
                    to: vertex(line_no, y, n)?,
                },
                _ => return Err(parse_err(line_no, "expected `1 i` or `2 x y`")),
            };
            queries.push(query);
        }

        Ok(Problem { n, edges, queries })
    }
}

/// Answer every [`Query::Distance`] in the stream, in submission order.
///
/// Builds the engine over the edges that are never closed (both directions
/// per road), runs one O(n³) solve, then walks the queries backwards,
/// re-opening each closed edge with an O(n²) propagated relaxation.
/// Unreachable pairs are reported as [`UNREACHABLE`].
///
/// Each edge is expected to be closed at most once; an edge closed twice is
/// treated as open again before its latest closure.
///
/// The sentinel is `max(n, 1) × 10^9`, so edge weights must stay strictly
/// below that.
///
/// # Panics
///
/// If an edge weight is not below the sentinel.
pub fn solve_offline(problem: &Problem) -> Result<Vec<i64>> {
    let n = problem.n;
    let sentinel = (n as i64).max(1) * 1_000_000_000;

    let mut passable = vec![true; problem.edges.len()];
    for query in &problem.queries {
        if let Query::Close { edge } = query {
            passable[*edge] = false;
        }
    }

    let mut fw = FloydWarshall::new(n, sentinel);
    for (edge, &open) in problem.edges.iter().zip(&passable) {
        if !open {
            continue;
        }
        fw.add_edge(edge.u, edge.v, edge.weight);
        fw.add_edge(edge.v, edge.u, edge.weight);
    }
    fw.solve();

    debug!(
        n,
        edges = problem.edges.len(),
        queries = problem.queries.len(),
        "processing query stream in reverse"
    );

    let mut answers = Vec::new();
    for query in problem.queries.iter().rev() {
        match *query {
            Query::Close { edge } => {
                let e = problem.edges[edge];
                fw.relax_edge(e.u, e.v, e.weight)?;
                fw.relax_edge(e.v, e.u, e.weight)?;
            }
            Query::Distance { from, to } => {
                let d = fw.distances()?.get(from, to);
                answers.push(if d == sentinel { UNREACHABLE } else { d });
            }
        }
    }

    answers.reverse();
    Ok(answers)
}

fn parse_err(line: usize, message: impl Into<String>) -> Error {
    Error::Parse { line: line + 1, message: message.into() }
}

fn numbers(line_no: usize, line: &str) -> Result<Vec<i64>> {
    line.split_whitespace()
        .map(|token| {
            token
                .parse::<i64>()
                .map_err(|_| parse_err(line_no, format!("invalid number `{token}`")))
        })
        .collect()
}

/// Validate a 1-based vertex reference and convert it to 0-based.
fn vertex(line_no: usize, x: i64, n: usize) -> Result<usize> {
    if !(1..=n as i64).contains(&x) {
        return Err(parse_err(line_no, format!("vertex {x} out of range (n = {n})")));
    }
    Ok((x - 1) as usize)
}
