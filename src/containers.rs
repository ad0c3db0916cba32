//! Homogeneous vectors and matrices of group elements.
//!
//! `GroupVector<T>` and `GroupMatrix<T>` are the runtime-sized containers the
//! argument engine (`src/zkp`) operates on. Every entry must belong to the
//! same group and report the same "element size" (the number of group
//! elements an entry is made of — `1` for a bare `GqElement`/`ZqElement`,
//! `1 + number of recipients` for an `ElGamalCiphertext`). These invariants
//! are checked once at construction rather than threaded through every
//! subsequent operation as type parameters: a const-generic array works
//! for fixed-size curve points, but batch sizes `N` and the shuffle's
//! reshape dimensions `m`/`n` are runtime values chosen by the caller per
//! proof, so the size checks have to live at the value level instead.

use serde::{Deserialize, Serialize};

use crate::error::{CryptoError, CryptoResult};

/// Capability every entry of a [`GroupVector`]/[`GroupMatrix`] must provide:
/// a comparable "which group am I in" key and a fixed element size.
pub trait GroupObject: Clone {
    /// An opaque, comparable identifier for the group this value lives in.
    type GroupKey: PartialEq + Clone;

    fn group_key(&self) -> Self::GroupKey;

    /// Number of underlying group elements this value is made of (1 for a
    /// bare element, `1 + l` for an `l`-recipient ciphertext, etc).
    fn element_size(&self) -> usize;
}

/// A finite, non-empty-by-convention sequence of `T`, all in the same group
/// and sharing the same element size.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupVector<T: GroupObject> {
    entries: Vec<T>,
}

impl<T: GroupObject> GroupVector<T> {
    /// Builds a vector, checking that every entry shares the same group and
    /// element size as the first. An empty vector is always accepted here;
    /// callers that require non-emptiness (most of the argument engine)
    /// check `len() > 0` themselves, since "non-emptiness required only
    /// where stated" per the data model.
    pub fn new(entries: Vec<T>) -> CryptoResult<Self> {
        if let Some(first) = entries.first() {
            let key = first.group_key();
            let size = first.element_size();
            for e in entries.iter().skip(1) {
                if e.group_key() != key {
                    return Err(CryptoError::GroupMismatch(
                        "all GroupVector entries must belong to the same group".into(),
                    ));
                }
                if e.element_size() != size {
                    return Err(CryptoError::ShapeError(
                        "all GroupVector entries must share the same element size".into(),
                    ));
                }
            }
        }
        Ok(GroupVector { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, i: usize) -> CryptoResult<&T> {
        self.entries
            .get(i)
            .ok_or_else(|| CryptoError::InvalidInput(format!("index {i} out of range")))
    }

    pub fn as_slice(&self) -> &[T] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.entries.iter()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.entries
    }

    /// Returns a new vector with `value` appended.
    pub fn append(&self, value: T) -> CryptoResult<GroupVector<T>> {
        let mut entries = self.entries.clone();
        entries.push(value);
        GroupVector::new(entries)
    }

    /// Returns a new vector with `value` prepended.
    pub fn prepend(&self, value: T) -> CryptoResult<GroupVector<T>> {
        let mut entries = Vec::with_capacity(self.entries.len() + 1);
        entries.push(value);
        entries.extend(self.entries.iter().cloned());
        GroupVector::new(entries)
    }

    pub fn slice(&self, start: usize, end: usize) -> CryptoResult<GroupVector<T>> {
        if start > end || end > self.entries.len() {
            return Err(CryptoError::InvalidInput(format!(
                "slice bounds {start}..{end} out of range for length {}",
                self.entries.len()
            )));
        }
        GroupVector::new(self.entries[start..end].to_vec())
    }

    /// Reshapes a length-`m*n` vector into `m` rows of `n` columns,
    /// row-major.
    pub fn into_matrix(self, m: usize, n: usize) -> CryptoResult<GroupMatrix<T>> {
        if self.entries.len() != m * n {
            return Err(CryptoError::ShapeError(format!(
                "cannot reshape vector of length {} into {m}x{n}",
                self.entries.len()
            )));
        }
        GroupMatrix::from_row_major(self.entries, m, n)
    }
}

/// A non-empty rectangular table of `T`. Stored row-major; all entries
/// share a group and element size (checked once at construction).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupMatrix<T: GroupObject> {
    entries: Vec<T>, // row-major, length rows*cols
    rows: usize,
    cols: usize,
}

impl<T: GroupObject> GroupMatrix<T> {
    pub fn from_row_major(entries: Vec<T>, rows: usize, cols: usize) -> CryptoResult<Self> {
        if rows == 0 || cols == 0 {
            return Err(CryptoError::InvalidInput(
                "matrix must be non-empty in both dimensions".into(),
            ));
        }
        if entries.len() != rows * cols {
            return Err(CryptoError::ShapeError(format!(
                "expected {} entries for a {rows}x{cols} matrix, got {}",
                rows * cols,
                entries.len()
            )));
        }
        let key = entries[0].group_key();
        let size = entries[0].element_size();
        for e in entries.iter().skip(1) {
            if e.group_key() != key {
                return Err(CryptoError::GroupMismatch(
                    "all GroupMatrix entries must belong to the same group".into(),
                ));
            }
            if e.element_size() != size {
                return Err(CryptoError::ShapeError(
                    "all GroupMatrix entries must share the same element size".into(),
                ));
            }
        }
        Ok(GroupMatrix { entries, rows, cols })
    }

    /// Builds a matrix from its columns (each an equal-length `Vec<T>`).
    pub fn from_columns(columns: Vec<Vec<T>>) -> CryptoResult<Self> {
        if columns.is_empty() {
            return Err(CryptoError::InvalidInput("matrix must have at least one column".into()));
        }
        let rows = columns[0].len();
        if rows == 0 {
            return Err(CryptoError::InvalidInput("matrix columns must be non-empty".into()));
        }
        if columns.iter().any(|c| c.len() != rows) {
            return Err(CryptoError::ShapeError("all columns must have equal height".into()));
        }
        let cols = columns.len();
        let mut entries = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in &columns {
                entries.push(c[r].clone());
            }
        }
        GroupMatrix::from_row_major(entries, rows, cols)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> CryptoResult<&T> {
        if row >= self.rows || col >= self.cols {
            return Err(CryptoError::InvalidInput(format!(
                "index ({row},{col}) out of range for {}x{}",
                self.rows, self.cols
            )));
        }
        Ok(&self.entries[row * self.cols + col])
    }

    pub fn column(&self, col: usize) -> CryptoResult<Vec<T>> {
        if col >= self.cols {
            return Err(CryptoError::InvalidInput(format!("column {col} out of range")));
        }
        Ok((0..self.rows).map(|r| self.entries[r * self.cols + col].clone()).collect())
    }

    pub fn row(&self, row: usize) -> CryptoResult<Vec<T>> {
        if row >= self.rows {
            return Err(CryptoError::InvalidInput(format!("row {row} out of range")));
        }
        Ok(self.entries[row * self.cols..(row + 1) * self.cols].to_vec())
    }

    pub fn columns(&self) -> Vec<Vec<T>> {
        (0..self.cols).map(|c| self.column(c).expect("c in range")).collect()
    }

    pub fn rows_iter(&self) -> Vec<Vec<T>> {
        (0..self.rows).map(|r| self.row(r).expect("r in range")).collect()
    }

    /// Row-major flattening back into a [`GroupVector`].
    pub fn flatten(&self) -> CryptoResult<GroupVector<T>> {
        GroupVector::new(self.entries.clone())
    }

    pub fn transpose(&self) -> CryptoResult<GroupMatrix<T>> {
        let mut entries = Vec::with_capacity(self.entries.len());
        for c in 0..self.cols {
            for r in 0..self.rows {
                entries.push(self.entries[r * self.cols + c].clone());
            }
        }
        GroupMatrix::from_row_major(entries, self.cols, self.rows)
    }

    /// Returns a new matrix with `column` appended as the new last column.
    pub fn append_column(&self, column: Vec<T>) -> CryptoResult<GroupMatrix<T>> {
        if column.len() != self.rows {
            return Err(CryptoError::ShapeError(
                "appended column must match matrix height".into(),
            ));
        }
        let mut columns = self.columns();
        columns.push(column);
        GroupMatrix::from_columns(columns)
    }

    /// Returns a new matrix with `column` prepended as the new first column.
    pub fn prepend_column(&self, column: Vec<T>) -> CryptoResult<GroupMatrix<T>> {
        if column.len() != self.rows {
            return Err(CryptoError::ShapeError(
                "prepended column must match matrix height".into(),
            ));
        }
        let mut columns = vec![column];
        columns.extend(self.columns());
        GroupMatrix::from_columns(columns)
    }
}
