use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The adjacency shape of a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Topology {
    /// Square cells with 4 orthogonal neighbors.
    #[default]
    Table,
    /// Hexagonal cells with 6 neighbors, stored on a square array using
    /// column-parity offsets.
    Hex,
}

/// How out-of-range neighbor coordinates are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum WrapPolicy {
    /// Out-of-range neighbors are dropped.
    #[default]
    None,
    /// Columns wrap modulo the width; out-of-range rows are dropped.
    Horizontal,
    /// Rows wrap modulo the height; out-of-range columns are dropped.
    Vertical,
    /// Both axes wrap (toroidal topology).
    Torus,
}

impl WrapPolicy {
    const fn wraps_columns(self) -> bool {
        matches!(self, Self::Horizontal | Self::Torus)
    }

    const fn wraps_rows(self) -> bool {
        matches!(self, Self::Vertical | Self::Torus)
    }
}

/// Errors related to grid construction or access.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// The input shape had zero rows or zero columns.
    #[error("grid shape must have at least one row and one column")]
    EmptyShape,
    /// A row's length disagreed with the first row's.
    #[error("row {row} has length {found}, expected {expected}")]
    JaggedRows {
        /// Index of the offending row.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length found.
        found: usize,
    },
    /// A direct access fell outside `[0,width) x [0,height)`.
    #[error("coordinates ({col}, {row}) are out of bounds")]
    OutOfBounds {
        /// Requested column.
        col: usize,
        /// Requested row.
        row: usize,
    },
}

/// A rectangular 2D container with topology-aware neighbor lookup.
///
/// Coordinates are `(column, row)`, 0-indexed. Width and height are fixed
/// at construction; rows are stored contiguously in row-major order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Grid<T> {
    width: usize,
    height: usize,
    topology: Topology,
    wrap: WrapPolicy,
    data: Vec<T>,
}

impl<T> Grid<T> {
    /// Builds a grid from row data. All rows must share the first row's
    /// length, and the shape must be non-empty.
    pub fn from_rows(
        rows: Vec<Vec<T>>,
        topology: Topology,
        wrap: WrapPolicy,
    ) -> Result<Self, GridError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if width == 0 || height == 0 {
            return Err(GridError::EmptyShape);
        }
        for (row, values) in rows.iter().enumerate() {
            if values.len() != width {
                return Err(GridError::JaggedRows {
                    row,
                    expected: width,
                    found: values.len(),
                });
            }
        }

        Ok(Self {
            width,
            height,
            topology,
            wrap,
            data: rows.into_iter().flatten().collect(),
        })
    }

    /// Width of the grid in columns.
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Height of the grid in rows.
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells.
    pub const fn len(&self) -> usize {
        self.width * self.height
    }

    /// Whether the grid holds no cells. Always false by construction.
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The grid's adjacency topology.
    pub const fn topology(&self) -> Topology {
        self.topology
    }

    /// The grid's wrap policy.
    pub const fn wrap(&self) -> WrapPolicy {
        self.wrap
    }

    #[inline]
    fn index(&self, col: usize, row: usize) -> Option<usize> {
        (col < self.width && row < self.height).then(|| row * self.width + col)
    }

    /// Returns the value at `(col, row)`, or `None` when out of bounds.
    #[inline]
    pub fn get(&self, col: usize, row: usize) -> Option<&T> {
        self.index(col, row).and_then(|idx| self.data.get(idx))
    }

    /// Returns a mutable reference to the value at `(col, row)`.
    #[inline]
    pub fn get_mut(&mut self, col: usize, row: usize) -> Option<&mut T> {
        self.index(col, row)
            .and_then(move |idx| self.data.get_mut(idx))
    }

    /// Overwrites the value at `(col, row)`.
    pub fn set(&mut self, col: usize, row: usize, value: T) -> Result<(), GridError> {
        match self.get_mut(col, row) {
            Some(cell) => {
                *cell = value;
                Ok(())
            }
            None => Err(GridError::OutOfBounds { col, row }),
        }
    }

    /// A whole row as a slice, or `None` when the row is out of range.
    pub fn row(&self, row: usize) -> Option<&[T]> {
        (row < self.height).then(|| &self.data[row * self.width..(row + 1) * self.width])
    }

    /// A whole column, top to bottom.
    pub fn col(&self, col: usize) -> Option<Vec<&T>> {
        (col < self.width).then(|| {
            (0..self.height)
                .filter_map(|row| self.get(col, row))
                .collect()
        })
    }

    /// Iterates all cells with their coordinates, row-major.
    pub fn cells(&self) -> impl Iterator<Item = ((usize, usize), &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(idx, value)| ((idx % self.width, idx / self.width), value))
    }

    /// Raw relative offsets for the grid's topology, before any wrap or
    /// bounds handling. Ordering is fixed per topology and, for hex,
    /// per column parity, so traversal order is reproducible.
    fn relative_coords(topology: Topology, col: usize, row: usize) -> Vec<(isize, isize)> {
        let c = col as isize;
        let r = row as isize;
        match topology {
            Topology::Table => vec![
                (c - 1, r), // left
                (c + 1, r), // right
                (c, r - 1), // above
                (c, r + 1), // below
            ],
            // Odd and even columns use mirrored vertical offsets to
            // approximate hex adjacency on a square storage array.
            Topology::Hex if col % 2 == 1 => vec![
                (c, r - 1),     // above
                (c, r + 1),     // below
                (c - 1, r),     // upper left
                (c - 1, r + 1), // lower left
                (c + 1, r),     // upper right
                (c + 1, r + 1), // lower right
            ],
            Topology::Hex => vec![
                (c, r - 1),     // above
                (c, r + 1),     // below
                (c - 1, r - 1), // upper left
                (c - 1, r),     // lower left
                (c + 1, r - 1), // upper right
                (c + 1, r),     // lower right
            ],
        }
    }

    /// Corrects a raw neighbor coordinate under this grid's wrap policy,
    /// or returns `None` when an unwrapped axis falls out of range.
    ///
    /// # Panics
    ///
    /// Panics when called on a grid whose wrap policy is
    /// [`WrapPolicy::None`]; that is a caller bug, not a data condition.
    fn correct_coord(&self, col: isize, row: isize) -> Option<(usize, usize)> {
        assert!(
            self.wrap != WrapPolicy::None,
            "cannot wrap-correct coordinates on a grid with no wrap policy"
        );
        let width = self.width as isize;
        let height = self.height as isize;

        let col = if self.wrap.wraps_columns() {
            col.rem_euclid(width)
        } else if (0..width).contains(&col) {
            col
        } else {
            return None;
        };
        let row = if self.wrap.wraps_rows() {
            row.rem_euclid(height)
        } else if (0..height).contains(&row) {
            row
        } else {
            return None;
        };

        Some((col as usize, row as usize))
    }

    /// The in-grid neighbor coordinates of `(col, row)` under the grid's
    /// topology and wrap policy: 4 offsets for table, 6 for hex, minus
    /// whatever the wrap policy drops.
    pub fn neighbor_coords(&self, col: usize, row: usize) -> Vec<(usize, usize)> {
        let raw = Self::relative_coords(self.topology, col, row);
        let width = self.width as isize;
        let height = self.height as isize;

        match self.wrap {
            WrapPolicy::None => raw
                .into_iter()
                .filter(|&(c, r)| (0..width).contains(&c) && (0..height).contains(&r))
                .map(|(c, r)| (c as usize, r as usize))
                .collect(),
            _ => raw
                .into_iter()
                .filter_map(|(c, r)| self.correct_coord(c, r))
                .collect(),
        }
    }

    /// The neighbor values of `(col, row)`, in `neighbor_coords` order.
    pub fn neighbors(&self, col: usize, row: usize) -> Vec<&T> {
        self.neighbor_coords(col, row)
            .into_iter()
            .filter_map(|(c, r)| self.get(c, r))
            .collect()
    }
}

impl<T: Clone> Grid<T> {
    /// Builds a `width` x `height` grid with every cell set to `value`.
    pub fn filled(
        width: usize,
        height: usize,
        topology: Topology,
        wrap: WrapPolicy,
        value: T,
    ) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::EmptyShape);
        }
        Ok(Self {
            width,
            height,
            topology,
            wrap,
            data: vec![value; width * height],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rows_rejects_empty_and_jagged_input() {
        assert_eq!(
            Grid::<u8>::from_rows(vec![], Topology::Table, WrapPolicy::None),
            Err(GridError::EmptyShape)
        );
        assert_eq!(
            Grid::<u8>::from_rows(vec![vec![]], Topology::Table, WrapPolicy::None),
            Err(GridError::EmptyShape)
        );
        assert_eq!(
            Grid::from_rows(vec![vec![1, 2], vec![3]], Topology::Table, WrapPolicy::None),
            Err(GridError::JaggedRows {
                row: 1,
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn rows_and_cols_read_back() {
        let grid = Grid::from_rows(
            vec![vec![1, 2, 3], vec![4, 5, 6]],
            Topology::Table,
            WrapPolicy::None,
        )
        .unwrap();
        assert_eq!(grid.row(0), Some([1, 2, 3].as_slice()));
        assert_eq!(grid.row(2), None);
        assert_eq!(grid.col(1), Some(vec![&2, &5]));
        assert_eq!(grid.col(3), None);
        assert_eq!(grid.get(2, 1), Some(&6));
    }

    #[test]
    #[should_panic(expected = "no wrap policy")]
    fn correct_coord_panics_without_wrap() {
        let grid =
            Grid::filled(3, 3, Topology::Table, WrapPolicy::None, 0_u8).unwrap();
        let _ = grid.correct_coord(-1, 0);
    }
}
