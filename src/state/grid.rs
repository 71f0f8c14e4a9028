use serde::{Deserialize, Serialize};

/// Cells covered by a panel, counted from the top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellSpan {
    pub row: usize,
    pub col: usize,
    pub row_span: usize,
    pub col_span: usize,
}

impl CellSpan {
    pub const fn single(row: usize, col: usize) -> Self {
        Self {
            row,
            col,
            row_span: 1,
            col_span: 1,
        }
    }

    pub const fn columns(row: usize, col: usize, col_span: usize) -> Self {
        Self {
            row,
            col,
            row_span: 1,
            col_span,
        }
    }
}

/// A rectangle in figure fractions: `(0, 0)` is the top-left corner and
/// `(1, 1)` the bottom-right.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FracRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Row/column grid with relative column widths and row heights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    pub rows: usize,
    pub cols: usize,
    pub width_ratios: Vec<f64>,
    pub height_ratios: Vec<f64>,
}

impl GridSpec {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            width_ratios: vec![1.0; cols],
            height_ratios: vec![1.0; rows],
        }
    }

    /// Use the given column ratios; missing or non-positive entries count as 1.
    pub fn with_width_ratios(mut self, ratios: &[f64]) -> Self {
        self.width_ratios = normalize_ratios(ratios, self.cols);
        self
    }

    /// Use the given row ratios; missing or non-positive entries count as 1.
    pub fn with_height_ratios(mut self, ratios: &[f64]) -> Self {
        self.height_ratios = normalize_ratios(ratios, self.rows);
        self
    }

    /// Fractional rectangle covered by `span`, clamped to the grid.
    pub fn cell_rect(&self, span: CellSpan) -> FracRect {
        let (x, width) = axis_extent(&self.width_ratios, span.col, span.col_span);
        let (y, height) = axis_extent(&self.height_ratios, span.row, span.row_span);
        FracRect { x, y, width, height }
    }
}

fn normalize_ratios(ratios: &[f64], count: usize) -> Vec<f64> {
    (0..count)
        .map(|i| match ratios.get(i) {
            Some(&r) if r.is_finite() && r > 0.0 => r,
            _ => 1.0,
        })
        .collect()
}

fn axis_extent(ratios: &[f64], start: usize, span: usize) -> (f64, f64) {
    let total: f64 = ratios.iter().sum();
    if total <= 0.0 {
        return (0.0, 0.0);
    }
    let start = start.min(ratios.len());
    let end = (start + span.max(1)).min(ratios.len());
    let offset: f64 = ratios[..start].iter().sum();
    let extent: f64 = ratios[start..end].iter().sum();
    (offset / total, extent / total)
}
