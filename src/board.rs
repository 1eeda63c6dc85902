use anyhow::{Result, bail};

pub const SIZE: usize = 7;
pub const MARBLE_COUNT: usize = 32;
pub const CENTER: Coordinate = Coordinate { x: 3, y: 3 };

const FULL_CHARS: [char; 2] = ['●', '#'];
const OPEN_CHARS: [char; 2] = ['·', '.'];

/// One hole of the 7×7 grid. The four 2×2 corner blocks outside the cross
/// shape are `Invalid` and never change state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Invalid = 0,
    Open = 1,
    Full = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

/// The fixed order in which jumps are tried from a cell.
pub const DIRECTIONS: [Direction; 4] = [
    Direction::Up,
    Direction::Right,
    Direction::Down,
    Direction::Left,
];

impl Direction {
    pub fn offset(&self) -> (i8, i8) {
        match self {
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Direction::Up => "Up",
            Direction::Right => "Right",
            Direction::Down => "Down",
            Direction::Left => "Left",
        }
    }
}

/// A grid position; `x` is the column (0 = left), `y` the row (0 = top).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coordinate {
    pub x: u8,
    pub y: u8,
}

impl Coordinate {
    pub fn new(x: u8, y: u8) -> Self {
        Coordinate { x, y }
    }

    /// The coordinate `steps` cells away in `direction`, or `None` when that
    /// leaves the grid.
    pub fn shifted(&self, direction: Direction, steps: u8) -> Option<Coordinate> {
        let (dx, dy) = direction.offset();
        let x = self.x as i8 + dx * steps as i8;
        let y = self.y as i8 + dy * steps as i8;
        if (0..SIZE as i8).contains(&x) && (0..SIZE as i8).contains(&y) {
            Some(Coordinate {
                x: x as u8,
                y: y as u8,
            })
        } else {
            None
        }
    }
}

pub fn is_corner(x: usize, y: usize) -> bool {
    !(2..=4).contains(&x) && !(2..=4).contains(&y)
}

/// The 7×7 cross-shaped board. A plain value; the solver snapshots it by
/// copy before branching and restores it after a failed branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    cells: [[Cell; SIZE]; SIZE],
}

impl Board {
    /// The standard starting layout: every hole full except the center.
    pub fn standard() -> Self {
        let mut board = Board {
            cells: [[Cell::Full; SIZE]; SIZE],
        };
        for y in 0..SIZE {
            for x in 0..SIZE {
                if is_corner(x, y) {
                    board.cells[y][x] = Cell::Invalid;
                }
            }
        }
        board.set(CENTER, Cell::Open);
        board
    }

    #[inline]
    pub fn get(&self, coord: Coordinate) -> Cell {
        self.cells[coord.y as usize][coord.x as usize]
    }

    #[inline]
    pub fn set(&mut self, coord: Coordinate, cell: Cell) {
        self.cells[coord.y as usize][coord.x as usize] = cell;
    }

    pub fn full_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|&&cell| cell == Cell::Full)
            .count()
    }

    /// Exactly one marble remains, at the center.
    pub fn is_won(&self) -> bool {
        self.get(CENTER) == Cell::Full && self.full_count() == 1
    }

    /// A canonical encoding of all 49 cell states, 2 bits per cell packed
    /// row-major. Boards with identical contents share a fingerprint no
    /// matter how they were reached; distinct contents never collide.
    pub fn fingerprint(&self) -> u128 {
        let mut key = 0u128;
        for row in &self.cells {
            for &cell in row {
                key = (key << 2) | cell as u128;
            }
        }
        key
    }

    pub fn parse(content: &str) -> Result<Self> {
        let rows: Vec<&str> = content
            .lines()
            .map(|line| line.trim_end())
            .filter(|line| !line.is_empty())
            .collect();
        if rows.len() != SIZE {
            bail!("Expected {SIZE} rows, got {}", rows.len());
        }

        let mut board = Board {
            cells: [[Cell::Invalid; SIZE]; SIZE],
        };
        for (y, row) in rows.iter().enumerate() {
            let mut chars = row.chars();
            for x in 0..SIZE {
                board.cells[y][x] = match chars.next() {
                    Some(c) if FULL_CHARS.contains(&c) => Cell::Full,
                    Some(c) if OPEN_CHARS.contains(&c) => Cell::Open,
                    Some(' ') | None => Cell::Invalid,
                    Some(c) => bail!("Invalid character '{c}' at ({x}, {y})"),
                };
            }
            if chars.next().is_some() {
                bail!("Row {y} is longer than {SIZE} cells");
            }
        }

        for y in 0..SIZE {
            for x in 0..SIZE {
                let cell = board.cells[y][x];
                if is_corner(x, y) {
                    if cell != Cell::Invalid {
                        bail!("Cell at ({x}, {y}) lies outside the cross shape");
                    }
                } else if cell == Cell::Invalid {
                    bail!("Missing cell at ({x}, {y}) inside the cross shape");
                }
            }
        }

        Ok(board)
    }

    pub fn to_pretty_string(&self) -> String {
        let mut output = String::new();
        for (y, row) in self.cells.iter().enumerate() {
            if y > 0 {
                output.push('\n');
            }
            let mut line = String::new();
            for &cell in row {
                line.push(match cell {
                    Cell::Invalid => ' ',
                    Cell::Open => '·',
                    Cell::Full => '●',
                });
            }
            output.push_str(line.trim_end());
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::move_::Move;

    #[test]
    fn test_standard_board() {
        let board = Board::standard();
        assert_eq!(board.full_count(), MARBLE_COUNT);
        assert_eq!(board.get(CENTER), Cell::Open);

        let mut invalid = 0;
        let mut open = 0;
        for y in 0..SIZE {
            for x in 0..SIZE {
                match board.get(Coordinate::new(x as u8, y as u8)) {
                    Cell::Invalid => {
                        assert!(is_corner(x, y), "invalid cell at ({x}, {y})");
                        invalid += 1;
                    }
                    Cell::Open => open += 1,
                    Cell::Full => assert!(!is_corner(x, y), "marble at corner ({x}, {y})"),
                }
            }
        }
        assert_eq!(invalid, 16);
        assert_eq!(open, 1);
    }

    #[test]
    fn test_shifted_bounds() {
        let edge = Coordinate::new(3, 1);
        assert_eq!(edge.shifted(Direction::Up, 1), Some(Coordinate::new(3, 0)));
        assert_eq!(edge.shifted(Direction::Up, 2), None);
        assert_eq!(Coordinate::new(0, 3).shifted(Direction::Left, 1), None);
        assert_eq!(
            Coordinate::new(2, 4).shifted(Direction::Down, 2),
            Some(Coordinate::new(2, 6))
        );
    }

    #[test]
    fn test_parse_round_trip() {
        let board = Board::standard();
        let reparsed = Board::parse(&board.to_pretty_string()).unwrap();
        assert_eq!(board, reparsed);

        const ASCII: &str = r#"
  ###
  ###
#######
###.###
#######
  ###
  ###
"#;
        assert_eq!(Board::parse(ASCII).unwrap(), board);
    }

    #[test]
    fn test_parse_rejects_bad_layouts() {
        assert!(Board::parse("###\n###").is_err());
        // marble on a corner cell
        assert!(Board::parse("# ###\n  ###\n#######\n###.###\n#######\n  ###\n  ###").is_err());
        // hole in the cross shape
        assert!(Board::parse("  ###\n  # #\n#######\n###.###\n#######\n  ###\n  ###").is_err());
        // unknown cell character
        assert!(Board::parse("  ###\n  #x#\n#######\n###.###\n#######\n  ###\n  ###").is_err());
    }

    #[test]
    fn test_fingerprint_is_content_only() {
        // Two jumps on disjoint cells reach the same layout in either order.
        const LAYOUT: &str = r#"
  ···
  ···
·······
··##···
·······
  ##·
  ···
"#;
        let a = Move::from_origin(Coordinate::new(2, 3), Direction::Right).unwrap();
        let b = Move::from_origin(Coordinate::new(2, 5), Direction::Right).unwrap();
        let jump = |board: &mut Board, mov: Move| {
            board.set(mov.from, Cell::Open);
            board.set(mov.jumped, Cell::Open);
            board.set(mov.to, Cell::Full);
        };

        let mut first = Board::parse(LAYOUT).unwrap();
        jump(&mut first, a);
        jump(&mut first, b);

        let mut second = Board::parse(LAYOUT).unwrap();
        jump(&mut second, b);
        jump(&mut second, a);

        assert_eq!(first, second);
        assert_eq!(first.fingerprint(), second.fingerprint());
        assert_ne!(
            first.fingerprint(),
            Board::parse(LAYOUT).unwrap().fingerprint()
        );
    }
}
