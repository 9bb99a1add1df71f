//! Maze Engine Library
//!
//! This crate provides the game logic behind the maze mini-game.
//!
//! # Overview
//!
//! The state module provides:
//!
//! - **Maze Generation** - Perfect (loop-free, fully connected) mazes carved
//!   on odd-sized square grids from an injectable random source.
//!
//! - **Collectibles** - Coins scattered on passages, degrading gracefully
//!   when free cells run out.
//!
//! - **Session State Machine** - `Idle → Running → Won` with validated moves,
//!   coin pickup, elapsed time and win detection.
//!
//! - **Stats** - A best-of record folded from every won session and kept in
//!   a caller-supplied store.
//!
//! # Design Principles
//!
//! 1. **Invalid moves are silent** - A blocked move changes nothing and is
//!    reported only as [`MoveOutcome::Ignored`].
//!
//! 2. **Randomness is injected** - Every random choice goes through a
//!    caller-provided [`rand::Rng`], so seeded runs are reproducible.
//!
//! 3. **No rendering, input or storage** - Renderers pull a [`Snapshot`];
//!    persistence goes through the [`StatsStore`] trait.
//!
//! # Example
//!
//! ```rust
//! use maze_engine::state::{
//!     Difficulty, EngineConfig, GameStatus, MazeGame, MemoryStatsStore,
//! };
//!
//! let config = EngineConfig::default().with_seed(7);
//! let mut game = MazeGame::from_config(&config, MemoryStatsStore::new());
//!
//! game.start(Difficulty::Easy).unwrap();
//!
//! // Follow the solution to the exit
//! let path = game.session().solution().unwrap();
//! for dir in path {
//!     game.tick(0.5);
//!     game.request_move(dir).unwrap();
//! }
//!
//! assert_eq!(game.session().status(), GameStatus::Won);
//! assert_eq!(game.stats().unwrap().completions, 1);
//! ```

pub mod state;

// Re-export everything from state module at crate root
pub use state::*;
