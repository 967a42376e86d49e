//! Voice distance matrices

use crate::types::pitch::Pitch;
use std::fmt;

/// Cost of pairing a voice with a slot that does not exist
pub const HIGH_COST: u32 = 1000;

/// `rows x cols` matrix of semitone distances between current voices (rows)
/// and target pitches (columns)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceMatrix {
    rows: usize,
    cols: usize,
    cells: Vec<u32>,
}

impl DistanceMatrix {
    /// `cost[i][j] = |current[i] - target[j]|`
    pub fn between(current: &[Pitch], target: &[Pitch]) -> Self {
        let cells = current
            .iter()
            .flat_map(|&from| target.iter().map(move |&to| from.abs_diff(to)))
            .collect();
        DistanceMatrix {
            rows: current.len(),
            cols: target.len(),
            cells,
        }
    }

    /// Square matrix of side `max(|current|, |target|)`; rows or columns
    /// past either chord's end hold [`HIGH_COST`]
    pub fn square(current: &[Pitch], target: &[Pitch]) -> Self {
        let size = current.len().max(target.len());
        let mut cells = Vec::with_capacity(size * size);
        for row in 0..size {
            for col in 0..size {
                let cost = match (current.get(row), target.get(col)) {
                    (Some(&from), Some(&to)) => from.abs_diff(to),
                    _ => HIGH_COST,
                };
                cells.push(cost);
            }
        }
        DistanceMatrix {
            rows: size,
            cols: size,
            cells,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Option<u32> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        Some(self.cells[row * self.cols + col])
    }

    pub fn row(&self, row: usize) -> &[u32] {
        &self.cells[row * self.cols..(row + 1) * self.cols]
    }
}

impl fmt::Display for DistanceMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            let cells: Vec<String> = self.row(row).iter().map(|c| format!("{:>4}", c)).collect();
            writeln!(f, "  row {}: {}", row, cells.join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_between() {
        let matrix = DistanceMatrix::between(&[48, 60], &[50, 55, 62]);
        assert_eq!(matrix.rows(), 2);
        assert_eq!(matrix.cols(), 3);
        assert_eq!(matrix.row(0), &[2, 7, 14]);
        assert_eq!(matrix.row(1), &[10, 5, 2]);
        assert_eq!(matrix.get(2, 0), None);
    }

    #[test]
    fn test_square_pads_missing_voices() {
        let matrix = DistanceMatrix::square(&[60, 64, 67], &[62, 65]);
        assert_eq!(matrix.rows(), 3);
        assert_eq!(matrix.row(0), &[2, 5, HIGH_COST]);
        assert_eq!(matrix.get(2, 1), Some(2));
        assert_eq!(matrix.get(2, 2), Some(HIGH_COST));
    }
}
