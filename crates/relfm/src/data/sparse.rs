//! Compressed sparse row (CSR) feature matrix.
//!
//! Feature matrices are consumed row by row: every case (or every group, for
//! relation blocks) is a row, and only its non-zero entries are stored.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

/// Error raised when sparse input data is structurally invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SparseError {
    #[error("indptr must have n_rows + 1 = {expected} entries, got {actual}")]
    IndptrLength { expected: usize, actual: usize },

    #[error("indptr must start at 0 and be non-decreasing (violated at position {0})")]
    IndptrNotMonotonic(usize),

    #[error("indices ({indices}) and data ({data}) must both have indptr[n_rows] = {nnz} entries")]
    LengthMismatch {
        indices: usize,
        data: usize,
        nnz: usize,
    },

    #[error("entry references row {row} but matrix has {n_rows} rows")]
    RowOutOfBounds { row: usize, n_rows: usize },

    #[error("row {row} references column {col} but matrix has {n_cols} columns")]
    ColumnOutOfBounds { row: usize, col: usize, n_cols: usize },

    #[error("column indices of row {0} are not strictly increasing")]
    UnsortedIndices(usize),

    #[error("case {case} maps to group {group} but block has {n_groups} groups")]
    GroupOutOfBounds {
        case: usize,
        group: usize,
        n_groups: usize,
    },
}

/// Row-major sparse matrix of `f64` values.
///
/// # Layout
///
/// ```text
/// row i entries: indices[indptr[i]..indptr[i + 1]]  (column ids, strictly increasing)
///                data[indptr[i]..indptr[i + 1]]     (values)
/// ```
///
/// # Example
///
/// ```
/// use relfm::SparseMatrix;
/// use ndarray::array;
///
/// let x = SparseMatrix::from_dense(array![[1.0, 0.0], [0.0, 2.0]].view());
/// assert_eq!(x.nnz(), 2);
///
/// let y = x.dot_vec(array![3.0, 4.0].view());
/// assert_eq!(y, array![3.0, 8.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SparseMatrix {
    n_rows: usize,
    n_cols: usize,
    indptr: Vec<usize>,
    indices: Vec<usize>,
    data: Vec<f64>,
}

impl SparseMatrix {
    /// Create a matrix from raw CSR arrays.
    ///
    /// # Errors
    ///
    /// Returns [`SparseError`] if:
    /// - `indptr` does not have `n_rows + 1` entries, start at 0, or never decrease
    /// - `indices` / `data` lengths disagree with `indptr[n_rows]`
    /// - a column index is `>= n_cols`
    /// - column indices within a row are unsorted or duplicated
    pub fn new(
        n_rows: usize,
        n_cols: usize,
        indptr: Vec<usize>,
        indices: Vec<usize>,
        data: Vec<f64>,
    ) -> Result<Self, SparseError> {
        if indptr.len() != n_rows + 1 {
            return Err(SparseError::IndptrLength {
                expected: n_rows + 1,
                actual: indptr.len(),
            });
        }
        if indptr[0] != 0 {
            return Err(SparseError::IndptrNotMonotonic(0));
        }
        if let Some(pos) = indptr.windows(2).position(|w| w[1] < w[0]) {
            return Err(SparseError::IndptrNotMonotonic(pos + 1));
        }

        let nnz = indptr[n_rows];
        if indices.len() != nnz || data.len() != nnz {
            return Err(SparseError::LengthMismatch {
                indices: indices.len(),
                data: data.len(),
                nnz,
            });
        }

        for row in 0..n_rows {
            let cols = &indices[indptr[row]..indptr[row + 1]];
            if let Some(&col) = cols.iter().find(|&&c| c >= n_cols) {
                return Err(SparseError::ColumnOutOfBounds { row, col, n_cols });
            }
            if cols.windows(2).any(|w| w[1] <= w[0]) {
                return Err(SparseError::UnsortedIndices(row));
            }
        }

        Ok(Self {
            n_rows,
            n_cols,
            indptr,
            indices,
            data,
        })
    }

    /// Create a matrix with no stored entries.
    pub fn zeros(n_rows: usize, n_cols: usize) -> Self {
        Self {
            n_rows,
            n_cols,
            indptr: vec![0; n_rows + 1],
            indices: Vec::new(),
            data: Vec::new(),
        }
    }

    /// Create a matrix from `(row, col, value)` triplets.
    ///
    /// Triplets may come in any order; duplicates are summed. Explicit zeros
    /// are kept as stored entries.
    pub fn from_triplets(
        n_rows: usize,
        n_cols: usize,
        triplets: &[(usize, usize, f64)],
    ) -> Result<Self, SparseError> {
        for &(row, col, _) in triplets {
            if row >= n_rows {
                return Err(SparseError::RowOutOfBounds { row, n_rows });
            }
            if col >= n_cols {
                return Err(SparseError::ColumnOutOfBounds { row, col, n_cols });
            }
        }

        let mut sorted = triplets.to_vec();
        sorted.sort_by_key(|&(row, col, _)| (row, col));

        let mut indptr = vec![0usize; n_rows + 1];
        let mut indices = Vec::with_capacity(sorted.len());
        let mut data: Vec<f64> = Vec::with_capacity(sorted.len());
        let mut last: Option<(usize, usize)> = None;

        for (row, col, value) in sorted {
            if last == Some((row, col)) {
                if let Some(v) = data.last_mut() {
                    *v += value;
                }
                continue;
            }
            indices.push(col);
            data.push(value);
            indptr[row + 1] += 1;
            last = Some((row, col));
        }
        for row in 0..n_rows {
            indptr[row + 1] += indptr[row];
        }

        Ok(Self {
            n_rows,
            n_cols,
            indptr,
            indices,
            data,
        })
    }

    /// Create a matrix from a dense `[n_rows, n_cols]` array, dropping zeros.
    pub fn from_dense(dense: ArrayView2<'_, f64>) -> Self {
        let (n_rows, n_cols) = dense.dim();
        let mut indptr = Vec::with_capacity(n_rows + 1);
        let mut indices = Vec::new();
        let mut data = Vec::new();
        indptr.push(0);

        for row in dense.rows() {
            for (col, &value) in row.iter().enumerate() {
                if value != 0.0 {
                    indices.push(col);
                    data.push(value);
                }
            }
            indptr.push(indices.len());
        }

        Self {
            n_rows,
            n_cols,
            indptr,
            indices,
            data,
        }
    }

    /// Number of rows.
    #[inline]
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of columns.
    #[inline]
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// Number of stored entries.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn indptr(&self) -> &[usize] {
        &self.indptr
    }

    #[inline]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    #[inline]
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Column indices and values of one row.
    #[inline]
    pub fn row(&self, row: usize) -> (&[usize], &[f64]) {
        let range = self.indptr[row]..self.indptr[row + 1];
        (&self.indices[range.clone()], &self.data[range])
    }

    /// Iterate over `(indices, values)` for every row.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = (&[usize], &[f64])> + '_ {
        (0..self.n_rows).map(move |row| self.row(row))
    }

    /// Matrix-vector product `X · v`.
    ///
    /// # Panics
    ///
    /// Panics if `v.len() != n_cols`.
    pub fn dot_vec(&self, v: ArrayView1<'_, f64>) -> Array1<f64> {
        let mut out = vec![0.0; self.n_rows];
        self.dot_into(v, false, &mut out);
        Array1::from_vec(out)
    }

    /// Element-wise-square matrix-vector product `X.² · v`.
    ///
    /// # Panics
    ///
    /// Panics if `v.len() != n_cols`.
    pub fn squared_dot_vec(&self, v: ArrayView1<'_, f64>) -> Array1<f64> {
        let mut out = vec![0.0; self.n_rows];
        self.dot_into(v, true, &mut out);
        Array1::from_vec(out)
    }

    /// Write `X · v` (or `X.² · v` when `square` is set) into `out`.
    ///
    /// `v` may be a strided view, e.g. a slice of one column of a factor matrix.
    ///
    /// # Panics
    ///
    /// Panics if `v.len() != n_cols` or `out.len() != n_rows`.
    pub fn dot_into(&self, v: ArrayView1<'_, f64>, square: bool, out: &mut [f64]) {
        assert_eq!(
            v.len(),
            self.n_cols,
            "vector length {} doesn't match column count {}",
            v.len(),
            self.n_cols
        );
        assert_eq!(out.len(), self.n_rows, "output length must equal row count");

        for (row, slot) in out.iter_mut().enumerate() {
            let (cols, values) = self.row(row);
            *slot = if square {
                cols.iter().zip(values).map(|(&c, &x)| x * x * v[c]).sum()
            } else {
                cols.iter().zip(values).map(|(&c, &x)| x * v[c]).sum()
            };
        }
    }

    /// Matrix with every stored value squared.
    pub fn squared(&self) -> Self {
        Self {
            data: self.data.iter().map(|x| x * x).collect(),
            ..self.clone()
        }
    }

    /// Expand to a dense `[n_rows, n_cols]` array.
    pub fn to_dense(&self) -> Array2<f64> {
        let mut dense = Array2::zeros((self.n_rows, self.n_cols));
        for (row, (cols, values)) in self.rows().enumerate() {
            for (&col, &value) in cols.iter().zip(values) {
                dense[[row, col]] = value;
            }
        }
        dense
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn sample() -> SparseMatrix {
        // [[1, 0, 2],
        //  [0, 0, 0],
        //  [0, 3, 0]]
        SparseMatrix::new(3, 3, vec![0, 2, 2, 3], vec![0, 2, 1], vec![1.0, 2.0, 3.0]).unwrap()
    }

    #[test]
    fn new_accepts_valid_csr() {
        let x = sample();
        assert_eq!(x.n_rows(), 3);
        assert_eq!(x.n_cols(), 3);
        assert_eq!(x.nnz(), 3);
        assert_eq!(x.row(0), (&[0usize, 2][..], &[1.0, 2.0][..]));
        assert_eq!(x.row(1).0.len(), 0);
    }

    #[test]
    fn new_rejects_bad_indptr_length() {
        let err = SparseMatrix::new(2, 2, vec![0, 1], vec![0], vec![1.0]).unwrap_err();
        assert_eq!(err, SparseError::IndptrLength { expected: 3, actual: 2 });
    }

    #[test]
    fn new_rejects_decreasing_indptr() {
        let err = SparseMatrix::new(2, 2, vec![0, 2, 1], vec![0, 1], vec![1.0, 1.0]).unwrap_err();
        assert_eq!(err, SparseError::IndptrNotMonotonic(2));
    }

    #[test]
    fn new_rejects_length_mismatch() {
        let err = SparseMatrix::new(1, 2, vec![0, 2], vec![0, 1], vec![1.0]).unwrap_err();
        assert!(matches!(err, SparseError::LengthMismatch { nnz: 2, .. }));
    }

    #[test]
    fn new_rejects_out_of_bounds_column() {
        let err = SparseMatrix::new(1, 2, vec![0, 1], vec![2], vec![1.0]).unwrap_err();
        assert_eq!(err, SparseError::ColumnOutOfBounds { row: 0, col: 2, n_cols: 2 });
    }

    #[test]
    fn new_rejects_duplicate_columns() {
        let err = SparseMatrix::new(1, 3, vec![0, 2], vec![1, 1], vec![1.0, 1.0]).unwrap_err();
        assert_eq!(err, SparseError::UnsortedIndices(0));
    }

    #[test]
    fn from_triplets_sorts_and_sums_duplicates() {
        let x = SparseMatrix::from_triplets(
            2,
            3,
            &[(1, 2, 1.0), (0, 1, 2.0), (1, 0, 4.0), (1, 2, 0.5)],
        )
        .unwrap();
        assert_eq!(x.indptr(), &[0, 1, 3]);
        assert_eq!(x.indices(), &[1, 0, 2]);
        assert_eq!(x.data(), &[2.0, 4.0, 1.5]);
    }

    #[test]
    fn from_triplets_rejects_out_of_bounds_row() {
        let err = SparseMatrix::from_triplets(1, 1, &[(1, 0, 1.0)]).unwrap_err();
        assert_eq!(err, SparseError::RowOutOfBounds { row: 1, n_rows: 1 });
    }

    #[test]
    fn dense_round_trip() {
        let dense = array![[1.0, 0.0, 2.0], [0.0, 0.0, 0.0], [0.0, 3.0, 0.0]];
        let x = SparseMatrix::from_dense(dense.view());
        assert_eq!(x, sample());
        assert_eq!(x.to_dense(), dense);
    }

    #[test]
    fn products() {
        let x = sample();
        let v = array![1.0, 2.0, 3.0];
        assert_eq!(x.dot_vec(v.view()), array![7.0, 0.0, 6.0]);
        assert_eq!(x.squared_dot_vec(v.view()), array![13.0, 0.0, 18.0]);
        assert_eq!(x.squared().dot_vec(v.view()), x.squared_dot_vec(v.view()));
    }

    #[test]
    fn dot_into_accepts_strided_views() {
        let x = sample();
        let factors = array![[1.0, 10.0], [2.0, 20.0], [3.0, 30.0]];
        let mut out = vec![0.0; 3];
        x.dot_into(factors.column(1), false, &mut out);
        assert_eq!(out, vec![70.0, 0.0, 60.0]);
    }

    #[test]
    #[should_panic(expected = "doesn't match column count")]
    fn dot_vec_panics_on_wrong_length() {
        sample().dot_vec(array![1.0, 2.0].view());
    }

    #[test]
    fn zeros_has_no_entries() {
        let x = SparseMatrix::zeros(4, 2);
        assert_eq!(x.nnz(), 0);
        assert_eq!(x.dot_vec(array![1.0, 1.0].view()), Array1::<f64>::zeros(4));
    }
}
