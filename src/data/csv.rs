//! Loader for digit datasets laid out like the common MNIST CSV export:
//! one sample per row, the class index in the first column and the pixel
//! intensities (0–255) in the remaining columns.
//!
//! - UTF-8, comma-separated
//! - Optional header row (auto-detected: the first row is a header if any
//!   cell is non-numeric)
//! - Double-quoted fields with embedded commas are handled

use crate::data::dataset::{one_hot, Dataset, DatasetError};

/// Parses MNIST-style CSV bytes. Pixels are scaled into [0, 1] and the class
/// index becomes a one-hot label of length `n_classes`.
pub fn parse_mnist_csv(data: &[u8], n_classes: usize) -> Result<Dataset, DatasetError> {
    let text = std::str::from_utf8(data)
        .map_err(|_| DatasetError::Parse("CSV file is not valid UTF-8".into()))?;

    let mut lines = text.lines().peekable();
    if let Some(first) = lines.peek() {
        if is_header(first) {
            lines.next();
        }
    }

    let mut inputs: Vec<Vec<f64>> = Vec::new();
    let mut labels: Vec<Vec<f64>> = Vec::new();

    for (row_idx, line) in lines.enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let row_num = row_idx + 1;
        let cells = parse_csv_row(line);
        let Some((label_cell, pixel_cells)) = cells.split_first() else {
            continue;
        };
        if pixel_cells.is_empty() {
            return Err(DatasetError::Parse(format!(
                "Row {row_num}: expected a class index followed by pixel values"
            )));
        }

        let class: usize = label_cell.trim().parse().map_err(|_| {
            DatasetError::Parse(format!(
                "Row {row_num}: class index '{label_cell}' is not a non-negative integer"
            ))
        })?;
        if class >= n_classes {
            return Err(DatasetError::Parse(format!(
                "Row {row_num}: class index {class} >= n_classes {n_classes}"
            )));
        }

        let pixels = parse_floats(pixel_cells, row_num)?
            .into_iter()
            .map(|p| p / 255.0)
            .collect();
        inputs.push(pixels);
        labels.push(one_hot(class, n_classes));
    }

    if inputs.is_empty() {
        return Err(DatasetError::Parse("CSV contains no data rows after parsing".into()));
    }

    let n_feats = inputs[0].len();
    if let Some((i, row)) = inputs.iter().enumerate().find(|(_, row)| row.len() != n_feats) {
        return Err(DatasetError::Parse(format!(
            "Row {}: pixel count {} does not match first row's {}",
            i + 1,
            row.len(),
            n_feats
        )));
    }

    Dataset::new(inputs, labels)
}

/// Reads and parses an MNIST-style CSV file.
pub fn load_mnist_csv(path: &str, n_classes: usize) -> Result<Dataset, DatasetError> {
    let bytes = std::fs::read(path)?;
    parse_mnist_csv(&bytes, n_classes)
}

fn is_header(line: &str) -> bool {
    parse_csv_row(line).iter().any(|c| {
        let t = c.trim();
        !t.is_empty() && t.parse::<f64>().is_err()
    })
}

fn parse_csv_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }
    fields.push(current);
    fields
}

fn parse_floats(cells: &[String], row_num: usize) -> Result<Vec<f64>, DatasetError> {
    cells.iter()
        .map(|c| {
            c.trim().parse::<f64>().map_err(|_| {
                DatasetError::Parse(format!("Row {row_num}: '{c}' is not a valid number"))
            })
        })
        .collect()
}
