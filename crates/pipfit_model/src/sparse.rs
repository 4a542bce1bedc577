//! Compressed sparse column matrices.

/// A real matrix in compressed sparse column form.
#[derive(Debug, Clone, PartialEq)]
pub struct CscMatrix {
    nrows: usize,
    ncols: usize,
    col_ptr: Vec<usize>,
    row_idx: Vec<usize>,
    values: Vec<f64>,
}

impl CscMatrix {
    /// Builds a matrix from `(row, column, value)` triplets.
    ///
    /// Entries at the same position are summed. Triplets outside the given
    /// shape are ignored.
    pub fn from_triplets(nrows: usize, ncols: usize, triplets: &[(usize, usize, f64)]) -> Self {
        let mut entries: Vec<(usize, usize, f64)> = triplets
            .iter()
            .copied()
            .filter(|&(r, c, _)| r < nrows && c < ncols)
            .collect();
        entries.sort_by(|a, b| (a.1, a.0).cmp(&(b.1, b.0)));

        let mut col_ptr = vec![0usize; ncols + 1];
        let mut row_idx: Vec<usize> = Vec::with_capacity(entries.len());
        let mut values: Vec<f64> = Vec::with_capacity(entries.len());
        let mut last: Option<(usize, usize)> = None;
        for (r, c, v) in entries {
            if last == Some((r, c)) {
                if let Some(acc) = values.last_mut() {
                    *acc += v;
                }
                continue;
            }
            row_idx.push(r);
            values.push(v);
            col_ptr[c + 1] += 1;
            last = Some((r, c));
        }
        for c in 0..ncols {
            col_ptr[c + 1] += col_ptr[c];
        }
        Self {
            nrows,
            ncols,
            col_ptr,
            row_idx,
            values,
        }
    }

    /// Number of rows.
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Number of columns.
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Number of stored entries.
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Stored `(row, value)` entries of column `col`.
    pub fn column(&self, col: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let range = self.col_ptr[col]..self.col_ptr[col + 1];
        self.row_idx[range.clone()]
            .iter()
            .copied()
            .zip(self.values[range].iter().copied())
    }

    /// Computes `A x`.
    pub fn mul_vec(&self, x: &[f64]) -> Vec<f64> {
        let mut y = vec![0.0; self.nrows];
        for (c, &xc) in x.iter().enumerate().take(self.ncols) {
            if xc == 0.0 {
                continue;
            }
            for (r, v) in self.column(c) {
                y[r] += v * xc;
            }
        }
        y
    }

    /// Computes `Aᵀ y`.
    pub fn mul_transpose_vec(&self, y: &[f64]) -> Vec<f64> {
        (0..self.ncols)
            .map(|c| {
                self.column(c)
                    .map(|(r, v)| v * y.get(r).copied().unwrap_or(0.0))
                    .sum::<f64>()
            })
            .collect()
    }
}
