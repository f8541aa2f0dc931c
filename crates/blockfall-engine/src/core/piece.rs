use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

use super::{BOARD_WIDTH_I32, shape::Shape};

/// Row at which freshly spawned pieces are anchored.
///
/// Spawning above the visible board gives a short pre-entry window before the
/// piece shows up.
pub const SPAWN_Y: i32 = -2;

/// Color identifier of a settled cell or a piece.
///
/// Each catalog entry has exactly one color, so colors double as an opaque
/// identity for the piece that produced a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum PieceColor {
    Cyan,
    Yellow,
    Purple,
    Green,
    Red,
    Blue,
    Orange,
}

impl PieceColor {
    /// Returns the single character used for this color in board text rows.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceColor;
    ///
    /// assert_eq!(PieceColor::Cyan.as_char(), 'c');
    /// assert_eq!(PieceColor::from_char('o'), Some(PieceColor::Orange));
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceColor::Cyan => 'c',
            PieceColor::Yellow => 'y',
            PieceColor::Purple => 'p',
            PieceColor::Green => 'g',
            PieceColor::Red => 'r',
            PieceColor::Blue => 'b',
            PieceColor::Orange => 'o',
        }
    }

    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'c' => Some(PieceColor::Cyan),
            'y' => Some(PieceColor::Yellow),
            'p' => Some(PieceColor::Purple),
            'g' => Some(PieceColor::Green),
            'r' => Some(PieceColor::Red),
            'b' => Some(PieceColor::Blue),
            'o' => Some(PieceColor::Orange),
            _ => None,
        }
    }
}

/// One of the seven catalog entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// O-piece.
    O = 1,
    /// T-piece.
    T = 2,
    /// S-piece.
    S = 3,
    /// Z-piece.
    Z = 4,
    /// J-piece.
    J = 5,
    /// L-piece.
    L = 6,
}

/// Uniform selection over the catalog. Every draw is independent.
impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

const CATALOG: [(Shape, PieceColor); PieceKind::LEN] = [
    (Shape::from_rows(&[&[1, 1, 1, 1]]), PieceColor::Cyan),
    (Shape::from_rows(&[&[1, 1], &[1, 1]]), PieceColor::Yellow),
    (Shape::from_rows(&[&[0, 1, 0], &[1, 1, 1]]), PieceColor::Purple),
    (Shape::from_rows(&[&[0, 1, 1], &[1, 1, 0]]), PieceColor::Green),
    (Shape::from_rows(&[&[1, 1, 0], &[0, 1, 1]]), PieceColor::Red),
    (Shape::from_rows(&[&[1, 0, 0], &[1, 1, 1]]), PieceColor::Blue),
    (Shape::from_rows(&[&[0, 0, 1], &[1, 1, 1]]), PieceColor::Orange),
];

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Returns the spawn orientation of this piece.
    #[must_use]
    pub const fn shape(self) -> Shape {
        CATALOG[self as usize].0
    }

    #[must_use]
    pub const fn color(self) -> PieceColor {
        CATALOG[self as usize].1
    }
}

/// The queued piece: shape and color, no position yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NextPiece {
    shape: Shape,
    color: PieceColor,
}

impl From<PieceKind> for NextPiece {
    fn from(kind: PieceKind) -> Self {
        Self::new(kind.shape(), kind.color())
    }
}

impl NextPiece {
    #[must_use]
    pub const fn new(shape: Shape, color: PieceColor) -> Self {
        Self { shape, color }
    }

    #[must_use]
    pub const fn shape(&self) -> &Shape {
        &self.shape
    }

    #[must_use]
    pub const fn color(&self) -> PieceColor {
        self.color
    }

    /// Places the queued piece at its spawn position.
    ///
    /// The piece is centered horizontally (`floor(WIDTH / 2 - width / 2)`) and
    /// anchored at [`SPAWN_Y`].
    ///
    /// # Example
    ///
    /// ```
    /// use blockfall_engine::{NextPiece, PieceKind};
    ///
    /// let piece = NextPiece::from(PieceKind::O).spawn();
    /// assert_eq!((piece.x(), piece.y()), (4, -2));
    /// ```
    #[must_use]
    #[expect(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
    pub const fn spawn(&self) -> Piece {
        let x = (BOARD_WIDTH_I32 - self.shape.width() as i32).div_euclid(2);
        Piece::new(self.shape, self.color, x, SPAWN_Y)
    }
}

/// The active falling piece.
///
/// `(x, y)` is the top-left anchor of the shape in board coordinates. `y` may be
/// negative while the piece is still entering from above the board.
/// Pieces are immutable; movement and rotation return new `Piece` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Piece {
    shape: Shape,
    color: PieceColor,
    x: i32,
    y: i32,
}

impl Piece {
    #[must_use]
    pub const fn new(shape: Shape, color: PieceColor, x: i32, y: i32) -> Self {
        Self { shape, color, x, y }
    }

    #[must_use]
    pub const fn shape(&self) -> &Shape {
        &self.shape
    }

    #[must_use]
    pub const fn color(&self) -> PieceColor {
        self.color
    }

    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    #[must_use]
    pub const fn moved(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.shape, self.color, self.x + dx, self.y + dy)
    }

    #[must_use]
    pub const fn with_shape(&self, shape: Shape) -> Self {
        Self::new(shape, self.color, self.x, self.y)
    }

    /// Iterates over the absolute `(x, y)` board positions covered by the piece.
    ///
    /// Positions above the board (`y < 0`) are included.
    pub fn occupied_positions(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape
            .occupied_offsets()
            .map(move |(dx, dy)| (self.x + dx, self.y + dy))
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_catalog_pairs_shape_and_color() {
        assert_eq!(PieceKind::I.shape(), Shape::from_rows(&[&[1, 1, 1, 1]]));
        assert_eq!(PieceKind::I.color(), PieceColor::Cyan);
        assert_eq!(PieceKind::O.color(), PieceColor::Yellow);
        assert_eq!(PieceKind::T.color(), PieceColor::Purple);
        assert_eq!(PieceKind::S.color(), PieceColor::Green);
        assert_eq!(PieceKind::Z.color(), PieceColor::Red);
        assert_eq!(PieceKind::J.color(), PieceColor::Blue);
        assert_eq!(PieceKind::L.color(), PieceColor::Orange);

        for kind in PieceKind::ALL {
            assert_eq!(kind.shape().occupied_offsets().count(), 4, "{kind:?}");
        }
    }

    #[test]
    fn test_spawn_positions() {
        let cases = [
            (PieceKind::I, 3),
            (PieceKind::O, 4),
            (PieceKind::T, 3),
            (PieceKind::S, 3),
            (PieceKind::Z, 3),
            (PieceKind::J, 3),
            (PieceKind::L, 3),
        ];
        for (kind, x) in cases {
            let piece = NextPiece::from(kind).spawn();
            assert_eq!(piece.x(), x, "{kind:?}");
            assert_eq!(piece.y(), SPAWN_Y);
            assert_eq!(piece.color(), kind.color());
        }
    }

    #[test]
    fn test_occupied_positions_are_absolute() {
        let piece = NextPiece::from(PieceKind::O).spawn().moved(1, 3);
        let positions: Vec<_> = piece.occupied_positions().collect();
        assert_eq!(positions, vec![(5, 1), (6, 1), (5, 2), (6, 2)]);
    }

    #[test]
    fn test_uniform_distribution_reaches_every_kind() {
        let mut rng = Pcg32::seed_from_u64(42);
        let mut seen = [0usize; PieceKind::LEN];
        for _ in 0..7000 {
            let kind: PieceKind = rng.random();
            seen[kind as usize] += 1;
        }
        for (i, count) in seen.iter().enumerate() {
            assert!(
                (700..1300).contains(count),
                "kind {:?} drawn {count} times",
                PieceKind::ALL[i]
            );
        }
    }

    #[test]
    fn test_color_char_conversion() {
        for kind in PieceKind::ALL {
            let color = kind.color();
            assert_eq!(PieceColor::from_char(color.as_char()), Some(color));
        }
        assert_eq!(PieceColor::from_char('.'), None);
    }
}
