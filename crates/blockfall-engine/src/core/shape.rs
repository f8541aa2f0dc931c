use serde::{Serialize, Serializer};

use crate::ShapeError;

/// Largest number of rows or columns a shape may have.
pub const MAX_SHAPE_SIZE: usize = 4;

/// Rectangular binary matrix describing the occupied cells of a piece.
///
/// Cells are addressed as `(row, col)` relative to the piece's top-left anchor.
/// Only the `height × width` top-left region of the backing array is meaningful;
/// everything outside it is kept empty so that derived equality compares shape
/// content only.
///
/// # Example
///
/// ```
/// use blockfall_engine::Shape;
///
/// let t = Shape::from_rows(&[&[0, 1, 0], &[1, 1, 1]]);
/// let rotated = t.rotated_clockwise();
///
/// assert_eq!((rotated.height(), rotated.width()), (3, 2));
/// assert_eq!(rotated, Shape::from_rows(&[&[1, 0], &[1, 1], &[1, 0]]));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    height: usize,
    width: usize,
    cells: [[bool; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE],
}

impl Serialize for Shape {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Format: [[0,1,0],[1,1,1]]
        serializer.collect_seq(
            self.rows()
                .map(|row| row.iter().map(|&cell| u8::from(cell)).collect::<Vec<_>>()),
        )
    }
}

impl Shape {
    /// Builds a shape from rows of `0`/`1` values.
    ///
    /// The rows must be non-empty, rectangular and at most 4×4.
    pub const fn try_from_rows(rows: &[&[u8]]) -> Result<Self, ShapeError> {
        let height = rows.len();
        if height == 0 {
            return Err(ShapeError::NoRows);
        }
        let width = rows[0].len();
        if width == 0 {
            return Err(ShapeError::NoColumns);
        }
        if height > MAX_SHAPE_SIZE || width > MAX_SHAPE_SIZE {
            return Err(ShapeError::TooLarge { height, width });
        }

        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        let mut r = 0;
        while r < height {
            let row = rows[r];
            if row.len() != width {
                return Err(ShapeError::Ragged {
                    row: r,
                    len: row.len(),
                    expected: width,
                });
            }
            let mut c = 0;
            while c < width {
                cells[r][c] = match row[c] {
                    0 => false,
                    1 => true,
                    value => return Err(ShapeError::InvalidCell { row: r, col: c, value }),
                };
                c += 1;
            }
            r += 1;
        }

        Ok(Self {
            height,
            width,
            cells,
        })
    }

    /// Like [`Self::try_from_rows`], but panics on malformed rows.
    ///
    /// Intended for shapes known at compile time, such as the piece catalog.
    #[must_use]
    pub const fn from_rows(rows: &[&[u8]]) -> Self {
        match Self::try_from_rows(rows) {
            Ok(shape) => shape,
            Err(_) => panic!("malformed shape rows"),
        }
    }

    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Returns whether the cell at `(row, col)` is occupied.
    ///
    /// Cells outside the shape's bounds are reported as empty.
    #[must_use]
    pub const fn is_occupied(&self, row: usize, col: usize) -> bool {
        row < self.height && col < self.width && self.cells[row][col]
    }

    /// Iterates over the rows of the shape, each `width` cells long.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> + '_ {
        let width = self.width;
        self.cells[..self.height].iter().map(move |row| &row[..width])
    }

    /// Iterates over occupied cells as `(dx, dy)` offsets from the anchor.
    ///
    /// Offsets are yielded row by row, top to bottom.
    #[expect(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
    pub fn occupied_offsets(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.rows().enumerate().flat_map(|(dy, row)| {
            row.iter()
                .enumerate()
                .filter(|&(_, &cell)| cell)
                .map(move |(dx, _)| (dx as i32, dy as i32))
        })
    }

    /// Returns the shape rotated 90° clockwise.
    ///
    /// An `R×C` shape becomes `C×R` with `out[c][R - 1 - r] = in[r][c]`. No bounds
    /// checking happens here; callers validate the placement afterwards.
    #[must_use]
    pub const fn rotated_clockwise(&self) -> Self {
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        let mut r = 0;
        while r < self.height {
            let mut c = 0;
            while c < self.width {
                cells[c][self.height - 1 - r] = self.cells[r][c];
                c += 1;
            }
            r += 1;
        }
        Self {
            height: self.width,
            width: self.height,
            cells,
        }
    }
}
