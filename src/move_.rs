use crate::board::{Board, Cell, Coordinate, Direction};

/// A single jump: the marble at `from` leaps over `jumped` and lands on
/// `to`. A pure descriptor; it carries no behavior and does not validate
/// itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub from: Coordinate,
    pub jumped: Coordinate,
    pub to: Coordinate,
    pub direction: Direction,
}

impl Move {
    /// Builds the candidate jump from `from` in `direction`, or `None` when
    /// the jumped or landing cell would leave the grid.
    pub fn from_origin(from: Coordinate, direction: Direction) -> Option<Self> {
        let jumped = from.shifted(direction, 1)?;
        let to = from.shifted(direction, 2)?;
        Some(Move {
            from,
            jumped,
            to,
            direction,
        })
    }
}

/// Applies a validated move: the caller must have checked it first.
pub fn apply_move(board: &mut Board, mov: Move) {
    board.set(mov.from, Cell::Open);
    board.set(mov.jumped, Cell::Open);
    board.set(mov.to, Cell::Full);
}

/// A move is legal iff its cells are in bounds and consistent with its
/// direction, the initial and jumped cells hold marbles, and the landing
/// cell is open.
pub fn is_move_valid(board: &Board, mov: Move) -> bool {
    match Move::from_origin(mov.from, mov.direction) {
        Some(expected) => {
            expected == mov
                && board.get(mov.from) == Cell::Full
                && board.get(mov.jumped) == Cell::Full
                && board.get(mov.to) == Cell::Open
        }
        None => false,
    }
}

pub fn describe_move(mov: &Move) -> String {
    format!(
        "({}, {}) direction: {}",
        mov.from.x,
        mov.from.y,
        mov.direction.name()
    )
}

pub fn format_moves(moves: &[Move]) -> String {
    let mut output = String::new();
    let width = moves.len().to_string().len();
    for (i, mov) in moves.iter().enumerate() {
        output.push_str(&format!(
            "{:>width$}. {}\n",
            i + 1,
            describe_move(mov),
            width = width
        ));
    }
    output
}
