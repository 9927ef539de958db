//! Static level layouts and the validation applied before a maze is built.

use thiserror::Error;

/// Level shipped with the game.
///
/// `#` marks walls, `.` pellets, `o`/`O` power pellets, `G` ghost spawn
/// points, `P` the player spawn. Every other character is open floor.
pub const DEFAULT_LAYOUT: [&str; 21] = [
    "#####################",
    "#.........#.........#",
    "#o###.###.#.###.###o#",
    "#...................#",
    "#.###.#.#####.#.###.#",
    "#.....#...#...#.....#",
    "#####.### # ###.#####",
    "    #.#   G   #.#    ",
    "#####.# ## ## #.#####",
    "     .  #GGG#  .     ",
    "#####.# ##### #.#####",
    "    #.#       #.#    ",
    "#####.# ##### #.#####",
    "#.........#.........#",
    "#.###.###.#.###.###.#",
    "#o..#.....P.....#..o#",
    "###.#.#.#####.#.#.###",
    "#.....#...#...#.....#",
    "#.#######.#.#######.#",
    "#...................#",
    "#####################",
];

/// Reasons a textual layout is rejected before any maze is constructed.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    /// The layout contained no rows.
    #[error("layout contains no rows")]
    Empty,
    /// The first row contained no characters.
    #[error("layout rows contain no tiles")]
    ZeroWidth,
    /// A row's length differs from the first row.
    #[error("layout row {row} has {found} tiles, expected {expected}")]
    RaggedRow {
        /// Zero-based index of the offending row.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        found: usize,
    },
    /// The layout exceeds the coordinate range of the grid.
    #[error("layout of {columns}x{rows} tiles exceeds the addressable grid")]
    TooLarge {
        /// Number of columns in the layout.
        columns: usize,
        /// Number of rows in the layout.
        rows: usize,
    },
}

/// Checks that `rows` describes a non-empty rectangle and returns its `(columns, rows)`.
pub(crate) fn dimensions<S: AsRef<str>>(rows: &[S]) -> Result<(u32, u32), LayoutError> {
    let first = rows.first().ok_or(LayoutError::Empty)?;
    let expected = first.as_ref().chars().count();
    if expected == 0 {
        return Err(LayoutError::ZeroWidth);
    }

    for (row, line) in rows.iter().enumerate() {
        let found = line.as_ref().chars().count();
        if found != expected {
            return Err(LayoutError::RaggedRow {
                row,
                expected,
                found,
            });
        }
    }

    let too_large = || LayoutError::TooLarge {
        columns: expected,
        rows: rows.len(),
    };
    let columns = u32::try_from(expected).map_err(|_| too_large())?;
    let row_count = u32::try_from(rows.len()).map_err(|_| too_large())?;
    Ok((columns, row_count))
}
