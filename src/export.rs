//! Distance output — sentinel mapping and table rendering.
//!
//! The engine keeps "unreachable" as the sentinel value internally; output
//! formats usually want an application marker such as `-1` instead. The
//! helpers here apply that mapping and render the matrix as plain text or
//! JSON.

use std::io::Write;

use serde::Serialize;

use crate::matrix::DistMatrix;
use crate::Result;

/// Marker used for unreachable cells in the JSON rendering.
const JSON_UNREACHABLE: i64 = -1;

/// Distance table with every unreachable cell replaced by `marker`.
///
/// With negative edge weights present, pick a marker that cannot collide
/// with a real distance.
pub fn with_unreachable(matrix: &DistMatrix, marker: i64) -> Vec<Vec<i64>> {
    (0..matrix.n())
        .map(|i| {
            matrix
                .row(i)
                .iter()
                .map(|&d| if d == matrix.sentinel() { marker } else { d })
                .collect()
        })
        .collect()
}

/// Write the distance table as plain text, one tab-separated row per line,
/// `INF` for unreachable cells.
pub fn write_table(matrix: &DistMatrix, writer: &mut dyn Write) -> Result<()> {
    writeln!(writer, "// apsp-rs distance table")?;
    writeln!(writer, "// Vertices: {}", matrix.n())?;

    for i in 0..matrix.n() {
        let cells: Vec<String> = matrix
            .row(i)
            .iter()
            .map(|&d| format_cell(d, matrix.sentinel()))
            .collect();
        writeln!(writer, "{}", cells.join("\t"))?;
    }
    Ok(())
}

#[derive(Serialize)]
struct JsonTable {
    n: usize,
    unreachable: i64,
    distances: Vec<Vec<i64>>,
}

/// Write the distance table as a JSON object:
/// `{ "n": .., "unreachable": -1, "distances": [[..], ..] }`.
pub fn write_json(matrix: &DistMatrix, writer: &mut dyn Write) -> Result<()> {
    let table = JsonTable {
        n: matrix.n(),
        unreachable: JSON_UNREACHABLE,
        distances: with_unreachable(matrix, JSON_UNREACHABLE),
    };
    serde_json::to_writer(&mut *writer, &table).map_err(std::io::Error::other)?;
    writeln!(writer)?;
    Ok(())
}

/// Format a single cell, mapping the sentinel to `INF`.
fn format_cell(d: i64, sentinel: i64) -> String {
    if d == sentinel {
        "INF".to_string()
    } else {
        d.to_string()
    }
}
