//! Dense travel matrix over the node index space.

use crate::models::ConfigurationError;

/// Which of the two instance matrices a value belongs to.
///
/// Only used to make construction errors point at the right matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixKind {
    /// Travel cost.
    Cost,
    /// Travel time.
    Time,
}

impl std::fmt::Display for MatrixKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cost => write!(f, "cost"),
            Self::Time => write!(f, "time"),
        }
    }
}

/// A dense `n×n` matrix of non-negative travel values, stored row-major.
///
/// Every off-diagonal entry is guaranteed to be present, finite and
/// non-negative. Diagonal entries are never read by the evaluators and are
/// stored as zero.
///
/// # Examples
///
/// ```
/// use u_vrptw::distance::{MatrixKind, TravelMatrix};
///
/// let m = TravelMatrix::from_rows(
///     MatrixKind::Cost,
///     vec![vec![0.0, 5.0], vec![7.0, 0.0]],
/// )
/// .unwrap();
/// assert_eq!(m.get(0, 1), 5.0);
/// assert_eq!(m.get(1, 0), 7.0);
/// assert_eq!(m.size(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TravelMatrix {
    data: Vec<f64>,
    size: usize,
}

impl TravelMatrix {
    /// Builds a matrix from explicit rows.
    ///
    /// Fails if the rows do not form a square grid or an off-diagonal entry
    /// is negative or non-finite.
    pub fn from_rows(kind: MatrixKind, rows: Vec<Vec<f64>>) -> Result<Self, ConfigurationError> {
        let size = rows.len();
        let mut data = Vec::with_capacity(size * size);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(ConfigurationError::MatrixSizeMismatch {
                    matrix: kind,
                    expected: size,
                    actual: row.len(),
                });
            }
            for (j, value) in row.into_iter().enumerate() {
                if i == j {
                    data.push(0.0);
                    continue;
                }
                check_entry(kind, i, j, value)?;
                data.push(value);
            }
        }
        Ok(Self { data, size })
    }

    /// Builds a matrix from individual `((from, to), value)` entries.
    ///
    /// Every ordered pair of distinct nodes must be given; the first missing
    /// pair (in row-major order) is reported. Later duplicates overwrite
    /// earlier ones.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_vrptw::distance::{MatrixKind, TravelMatrix};
    ///
    /// let ok = TravelMatrix::from_entries(
    ///     MatrixKind::Time,
    ///     2,
    ///     [((0, 1), 3.0), ((1, 0), 4.0)],
    /// );
    /// assert!(ok.is_ok());
    ///
    /// let missing = TravelMatrix::from_entries(MatrixKind::Time, 2, [((0, 1), 3.0)]);
    /// assert!(missing.is_err());
    /// ```
    pub fn from_entries<I>(kind: MatrixKind, size: usize, entries: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = ((usize, usize), f64)>,
    {
        let mut slots: Vec<Option<f64>> = vec![None; size * size];
        for ((from, to), value) in entries {
            if from >= size || to >= size {
                return Err(ConfigurationError::MatrixSizeMismatch {
                    matrix: kind,
                    expected: size,
                    actual: from.max(to) + 1,
                });
            }
            if from == to {
                continue;
            }
            check_entry(kind, from, to, value)?;
            slots[from * size + to] = Some(value);
        }

        let mut data = Vec::with_capacity(size * size);
        for i in 0..size {
            for j in 0..size {
                if i == j {
                    data.push(0.0);
                    continue;
                }
                match slots[i * size + j] {
                    Some(v) => data.push(v),
                    None => {
                        return Err(ConfigurationError::MissingMatrixEntry {
                            matrix: kind,
                            from: i,
                            to: j,
                        })
                    }
                }
            }
        }
        Ok(Self { data, size })
    }

    /// Returns the value for travelling from `from` to `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Number of nodes covered by this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the rows as nested vectors.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.data.chunks(self.size.max(1)).map(|r| r.to_vec()).collect()
    }

    /// Returns the cheapest node to reach from `from` among `candidates`.
    ///
    /// Ties go to the earliest candidate. Returns `None` if `candidates` is
    /// empty.
    pub fn nearest(&self, from: usize, candidates: &[usize]) -> Option<usize> {
        candidates
            .iter()
            .copied()
            .min_by(|&a, &b| self.get(from, a).total_cmp(&self.get(from, b)))
    }
}

fn check_entry(kind: MatrixKind, from: usize, to: usize, value: f64) -> Result<(), ConfigurationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigurationError::InvalidMatrixEntry {
            matrix: kind,
            from,
            to,
            value,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Vec<Vec<f64>> {
        vec![
            vec![0.0, 3.0, 8.0],
            vec![3.0, 0.0, 5.0],
            vec![8.0, 5.0, 0.0],
        ]
    }

    #[test]
    fn test_from_rows() {
        let m = TravelMatrix::from_rows(MatrixKind::Cost, grid()).expect("valid");
        assert_eq!(m.size(), 3);
        assert_eq!(m.get(0, 2), 8.0);
        assert_eq!(m.get(2, 1), 5.0);
    }

    #[test]
    fn test_diagonal_ignored() {
        let mut rows = grid();
        rows[1][1] = f64::NAN;
        let m = TravelMatrix::from_rows(MatrixKind::Cost, rows).expect("diagonal not validated");
        assert_eq!(m.get(1, 1), 0.0);
    }

    #[test]
    fn test_from_rows_ragged() {
        let rows = vec![vec![0.0, 1.0], vec![1.0]];
        let err = TravelMatrix::from_rows(MatrixKind::Time, rows).unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::MatrixSizeMismatch {
                matrix: MatrixKind::Time,
                expected: 2,
                actual: 1,
            }
        ));
    }

    #[test]
    fn test_from_rows_negative() {
        let mut rows = grid();
        rows[0][1] = -1.0;
        let err = TravelMatrix::from_rows(MatrixKind::Cost, rows).unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::InvalidMatrixEntry { from: 0, to: 1, .. }
        ));
    }

    #[test]
    fn test_from_rows_infinite() {
        let mut rows = grid();
        rows[2][0] = f64::INFINITY;
        assert!(TravelMatrix::from_rows(MatrixKind::Cost, rows).is_err());
    }

    #[test]
    fn test_from_entries_missing_pair() {
        let entries = [((0, 1), 1.0), ((1, 0), 1.0), ((0, 2), 1.0), ((2, 0), 1.0), ((1, 2), 1.0)];
        let err = TravelMatrix::from_entries(MatrixKind::Cost, 3, entries).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::MissingMatrixEntry {
                matrix: MatrixKind::Cost,
                from: 2,
                to: 1,
            }
        );
    }

    #[test]
    fn test_from_entries_out_of_range() {
        let err = TravelMatrix::from_entries(MatrixKind::Cost, 2, [((0, 5), 1.0)]).unwrap_err();
        assert!(matches!(err, ConfigurationError::MatrixSizeMismatch { .. }));
    }

    #[test]
    fn test_from_entries_matches_rows() {
        let rows = grid();
        let entries = (0..3)
            .flat_map(|i| (0..3).map(move |j| (i, j)))
            .map(|(i, j)| ((i, j), rows[i][j]));
        let a = TravelMatrix::from_entries(MatrixKind::Cost, 3, entries).expect("complete");
        let b = TravelMatrix::from_rows(MatrixKind::Cost, grid()).expect("valid");
        assert_eq!(a, b);
    }

    #[test]
    fn test_nearest() {
        let m = TravelMatrix::from_rows(MatrixKind::Cost, grid()).expect("valid");
        assert_eq!(m.nearest(0, &[1, 2]), Some(1));
        assert_eq!(m.nearest(0, &[2]), Some(2));
        assert_eq!(m.nearest(0, &[]), None);

        // Equal costs resolve to the first candidate listed.
        let flat = TravelMatrix::from_rows(MatrixKind::Time, vec![vec![2.0; 3]; 3]).expect("valid");
        assert_eq!(flat.nearest(0, &[2, 1]), Some(2));
        assert_eq!(flat.nearest(0, &[1, 2]), Some(1));
    }
}
