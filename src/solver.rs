use crate::board::{Board, Cell, Coordinate, DIRECTIONS, MARBLE_COUNT, SIZE};
use crate::move_::{Move, apply_move};

use anyhow::{Result, bail};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use std::time::{Duration, Instant};

type PossibleMoves = SmallVec<[Move; 64]>;

pub fn solve(board: Board) -> Result<SolveResult> {
    let mut solver = Solver::new();
    solver.set_board(board);
    let timer = Instant::now();
    match solver.solve() {
        Some(moves) => Ok(SolveResult {
            states: solver.states_examined(),
            elapsed: timer.elapsed(),
            moves,
        }),
        None => bail!("No solution found."),
    }
}

/// Depth-first backtracking solver with dead-state memoization.
///
/// The solver owns the board for the duration of a search and mutates it in
/// place, snapshotting before branching and restoring after each failed
/// branch. `solve` leaves the board in whatever state the search ended in;
/// call `reset` afterward if the original layout is needed again.
#[derive(Debug, Clone)]
pub struct Solver {
    board: Board,
    dead: FxHashSet<u128>,
    states: u64,
}

impl Default for Solver {
    fn default() -> Self {
        Self::new()
    }
}

impl Solver {
    pub fn new() -> Self {
        Solver {
            board: Board::standard(),
            dead: FxHashSet::default(),
            states: 0,
        }
    }

    /// Restores the standard starting layout. Dead fingerprints encode full
    /// board contents, so the set stays valid across searches and is kept.
    pub fn reset(&mut self) {
        self.board = Board::standard();
    }

    pub fn set_board(&mut self, board: Board) {
        self.board = board;
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn states_examined(&self) -> u64 {
        self.states
    }

    /// Searches for any winning move sequence from the current board.
    ///
    /// Deterministic: cells are scanned row-major and directions tried in
    /// the order Up, Right, Down, Left, and the first solution found is
    /// returned. Returns `None` when the configuration is proven hopeless.
    pub fn solve(&mut self) -> Option<Vec<Move>> {
        self.states = 0;
        let mut path = Vec::with_capacity(MARBLE_COUNT);
        if self.search(&mut path) { Some(path) } else { None }
    }

    // Recursion depth is bounded by the marble count: every jump removes
    // one marble, so at most 32 frames.
    fn search(&mut self, path: &mut Vec<Move>) -> bool {
        self.states += 1;

        let key = self.board.fingerprint();
        if self.dead.contains(&key) {
            return false;
        }

        let moves = self.possible_moves();
        if moves.is_empty() {
            return self.board.is_won();
        }

        let snapshot = self.board;
        for &mov in moves.iter() {
            apply_move(&mut self.board, mov);
            path.push(mov);
            if self.search(path) {
                return true;
            }
            path.pop();
            self.board = snapshot;
        }

        // Every move from here was exhausted without a win; the whole
        // subtree is hopeless.
        self.dead.insert(key);
        false
    }

    fn possible_moves(&self) -> PossibleMoves {
        let mut moves = PossibleMoves::new();
        for y in 0..SIZE as u8 {
            for x in 0..SIZE as u8 {
                let from = Coordinate::new(x, y);
                if self.board.get(from) != Cell::Full {
                    continue;
                }
                for direction in DIRECTIONS {
                    let Some(mov) = Move::from_origin(from, direction) else {
                        continue;
                    };
                    if self.board.get(mov.jumped) == Cell::Full
                        && self.board.get(mov.to) == Cell::Open
                    {
                        moves.push(mov);
                    }
                }
            }
        }
        moves
    }
}

#[derive(Debug, Clone)]
pub struct SolveResult {
    pub states: u64,
    pub elapsed: Duration,
    pub moves: Vec<Move>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::move_::is_move_valid;

    #[test]
    fn test_solve_standard() {
        let mut solver = Solver::new();
        let moves = solver.solve().expect("the standard board is solvable");
        assert_eq!(moves.len(), MARBLE_COUNT - 1);

        // replay against a fresh board, validating every move
        let mut board = Board::standard();
        for mov in &moves {
            assert!(is_move_valid(&board, *mov), "illegal move {mov:?}");
            apply_move(&mut board, *mov);
        }
        assert!(board.is_won());
    }

    #[test]
    fn test_solve_is_deterministic() {
        let mut solver = Solver::new();
        let first = solver.solve().unwrap();
        solver.reset();
        let second = solver.solve().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_initial_move_count() {
        let solver = Solver::new();
        // only four jumps can reach the single open center hole
        assert_eq!(solver.possible_moves().len(), 4);
    }

    #[test]
    fn test_no_solution() {
        // two marbles with no neighbors: no legal moves, not won
        const STUCK: &str = r#"
  ···
  ···
··●····
·······
····●··
  ···
  ···
"#;
        let mut solver = Solver::new();
        solver.set_board(Board::parse(STUCK).unwrap());
        assert!(solver.solve().is_none());
        assert!(solver.states_examined() >= 1);
    }

    #[test]
    fn test_already_won_board() {
        const WON: &str = r#"
  ···
  ···
·······
···●···
·······
  ···
  ···
"#;
        let mut solver = Solver::new();
        solver.set_board(Board::parse(WON).unwrap());
        assert_eq!(solver.solve(), Some(vec![]));
    }

    #[test]
    fn test_reset_after_search() {
        let mut solver = Solver::new();
        solver.solve().unwrap();
        assert_ne!(*solver.board(), Board::standard());
        solver.reset();
        assert_eq!(*solver.board(), *Solver::new().board());
    }

    #[test]
    fn test_solve_fn_reports_failure() {
        const STUCK: &str = r#"
  ●··
  ···
·······
·······
·······
  ···
  ··●
"#;
        let board = Board::parse(STUCK).unwrap();
        assert!(solve(board).is_err());
    }
}
