// src/cli/grid.rs
use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use crate::dashboard::format_percent;
use crate::digitization::document::{DocumentShape, OcrDocument};
use crate::digitization::grid::{DenseGrid, GRID_COLS};

use super::CliError;

const CELL_WIDTH: usize = 8;

pub fn run(file: PathBuf) -> Result<(), CliError> {
    let body = fs::read_to_string(&file).map_err(|source| CliError::Io {
        path: file.clone(),
        source,
    })?;
    let document = OcrDocument::from_json(&body).map_err(|source| CliError::Parse {
        path: file.clone(),
        source,
    })?;
    print_document_grid(&document);
    Ok(())
}

pub fn print_document_grid(document: &OcrDocument) {
    if document.shape == DocumentShape::Legacy {
        println!("(legacy response format)");
    }
    if let Some(avg) = document.average_confidence_or_computed() {
        println!("Average confidence {}", format_percent(avg));
    }
    let grid = DenseGrid::build(&document.cells);
    print!("{}", render_grid(&grid));
    let outside = document.cells.len().saturating_sub(grid.filled_count());
    if outside > 0 {
        println!("{} cell(s) outside the grid or duplicated", outside);
    }
}

/// Plain-text table; values read with low confidence are marked with `*`.
pub fn render_grid(grid: &DenseGrid<'_>) -> String {
    let mut out = String::new();
    let _ = write!(out, "{:<8}", "");
    for col in 0..GRID_COLS {
        let _ = write!(out, "{:<width$}", format!("C{}", col + 1), width = CELL_WIDTH);
    }
    out.push('\n');

    for (index, row) in grid.rows().enumerate() {
        let _ = write!(out, "{:<8}", format!("Fila {}", index + 1));
        for slot in row {
            let text = match slot {
                Some(cell) if cell.is_low_confidence() => format!("{}*", cell.value),
                Some(cell) => cell.value.clone(),
                None => "-".to_string(),
            };
            let _ = write!(out, "{:<width$}", text, width = CELL_WIDTH);
        }
        out.truncate(out.trim_end().len());
        out.push('\n');
    }
    out
}
