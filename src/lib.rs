//! This crate provides a backtracking solver for the cross-shaped 33-hole
//! marble solitaire puzzle.

pub mod board;
pub mod move_;
pub mod solver;

pub use crate::board::{Board, Cell, Coordinate, Direction};
pub use crate::move_::{Move, format_moves};
pub use crate::solver::{SolveResult, Solver, solve};
