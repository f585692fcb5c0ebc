//! Game rules and state management.
//!
//! This module drives the core data structures to implement a single game:
//!
//! - [`GameEngine`] - Field, falling piece, state machine and every player command
//! - [`GameStats`] - Score, cleared lines and the level derived from them
//! - [`RandomSource`] - Injectable source of piece kinds, with [`PieceRng`] as default
//! - [`PieceSeed`] - Seed for deterministic piece sequences
//! - [`GameSnapshot`] - Serializable read-only view of the whole game
//!
//! # Game Flow
//!
//! 1. Create a [`GameEngine`]; the first piece spawns immediately
//! 2. The input layer moves and rotates the piece, and calls
//!    [`GameEngine::move_down`] on every gravity tick
//! 3. When the piece cannot move down it locks, full rows are cleared and
//!    scored, and the next piece spawns
//! 4. Repeat until a new piece collides at spawn, which ends the game
//!
//! # Example
//!
//! ```
//! use blockfall_engine::{DropOutcome, GameEngine, PieceSeed};
//!
//! let seed: PieceSeed = "000102030405060708090a0b0c0d0e0f".parse().unwrap();
//! let mut engine = GameEngine::with_seed(seed);
//!
//! engine.move_right().ok();
//! engine.rotate().ok();
//!
//! // Gravity ticks until the piece locks
//! while let Ok(DropOutcome::Moved) = engine.move_down() {}
//!
//! if engine.state().is_game_over() {
//!     println!("Game over!");
//! }
//! ```

pub use self::{game_engine::*, game_stats::*, random::*, snapshot::*};

mod game_engine;
mod game_stats;
mod random;
mod snapshot;
