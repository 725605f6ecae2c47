//! Implementation of the chess rules: board representation, move generation,
//! legality, move application and reversal, end of game detection and move
//! notation.

pub mod attacks;
pub mod board;
pub mod core;
pub mod error;
pub mod game;
pub mod movegen;
pub mod moves;
pub mod notation;
pub mod position;
