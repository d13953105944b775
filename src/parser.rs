use crate::error::{Result, SeizureError};
use ndarray::Array2;

/// Parse a numeric text matrix from a byte slice (e.g. mmap).
///
/// Values are separated by commas and/or whitespace, one row per line. Empty
/// lines and lines starting with `#` are skipped. A first data line with no
/// numeric values at all is treated as a column header. Every row must have
/// the same number of columns.
pub fn parse_matrix_from_bytes(content: &[u8], source: &str) -> Result<Array2<f64>> {
    let mut all_values: Vec<f64> = Vec::new();
    let mut row_count = 0usize;
    let mut col_count = 0usize;
    let mut current_row: Vec<f64> = Vec::with_capacity(8);
    let mut header_checked = false;

    for (line_idx, raw_line) in content.split(|&b| b == b'\n').enumerate() {
        let line = trim_ascii(raw_line);
        if line.is_empty() || line[0] == b'#' {
            continue;
        }

        current_row.clear();
        let mut bad_token: Option<&[u8]> = None;
        for token in line
            .split(|&b| b == b',' || b.is_ascii_whitespace())
            .filter(|t| !t.is_empty())
        {
            match parse_f64(token) {
                Some(v) => current_row.push(v),
                None => {
                    bad_token.get_or_insert(token);
                }
            }
        }

        if !header_checked {
            header_checked = true;
            if current_row.is_empty() {
                log::debug!("Skipping header line in {}", source);
                continue;
            }
        }

        if let Some(token) = bad_token {
            return Err(SeizureError::StoreRead(format!(
                "{}:{}: '{}' is not a number",
                source,
                line_idx + 1,
                String::from_utf8_lossy(token)
            )));
        }

        if row_count == 0 {
            col_count = current_row.len();
        } else if current_row.len() != col_count {
            return Err(SeizureError::StoreRead(format!(
                "{}:{}: row has {} columns, expected {}",
                source,
                line_idx + 1,
                current_row.len(),
                col_count
            )));
        }

        all_values.extend_from_slice(&current_row);
        row_count += 1;
    }

    if row_count == 0 {
        return Err(SeizureError::StoreRead(format!(
            "{}: no numeric rows found",
            source
        )));
    }

    Array2::from_shape_vec((row_count, col_count), all_values)
        .map_err(|e| SeizureError::StoreRead(format!("{}: {}", source, e)))
}

fn parse_f64(bytes: &[u8]) -> Option<f64> {
    std::str::from_utf8(bytes).ok()?.parse::<f64>().ok()
}

fn trim_ascii(mut bytes: &[u8]) -> &[u8] {
    while let [first, rest @ ..] = bytes {
        if first.is_ascii_whitespace() {
            bytes = rest;
        } else {
            break;
        }
    }
    while let [rest @ .., last] = bytes {
        if last.is_ascii_whitespace() {
            bytes = rest;
        } else {
            break;
        }
    }
    bytes
}
