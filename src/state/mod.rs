//! Maze game state.
//!
//! This module provides the core types and the [`MazeGame`] facade:
//!
//! - `grid` - Cells, positions, directions and path queries
//! - `generator` - Perfect maze carving
//! - `placer` - Collectible scattering
//! - `difficulty` - Fixed size / coin table
//! - `config` - Engine tunables
//! - `session` - Per-playthrough state machine
//! - `stats` - Cross-session best-of record and its store boundary
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                            MazeGame                              │
//! │                                                                  │
//! │  start(difficulty)                                               │
//! │     │                                                            │
//! │     ▼                                                            │
//! │  ┌───────────────┐   ┌────────────┐   ┌─────────────────────┐    │
//! │  │ MazeGenerator │──▶│ ItemPlacer │──▶│     GameSession     │    │
//! │  └───────────────┘   └────────────┘   │ Idle → Running → Won│    │
//! │                                       └──────────┬──────────┘    │
//! │                        request_move / tick       │ SessionSummary│
//! │                                                  ▼               │
//! │                                       ┌─────────────────────┐    │
//! │                                       │  StatsAggregator<S> │    │
//! │                                       │   read/merge/write  │    │
//! │                                       └─────────────────────┘    │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything runs synchronously on the caller's thread. A `MazeGame` holds
//! no locks; callers that share one across threads must serialize access.

pub mod config;
pub mod difficulty;
pub mod generator;
pub mod grid;
pub mod placer;
pub mod session;
pub mod stats;

// Re-export commonly used types
pub use config::EngineConfig;
pub use difficulty::{Difficulty, DifficultyParseError, DifficultySettings};
pub use generator::{ConfigurationError, MazeGenerator, MIN_GRID_SIZE};
pub use grid::{Cell, Direction, Grid, Position};
pub use placer::{Collectible, ItemPlacer, Placement, DEFAULT_PLACEMENT_ATTEMPTS};
pub use session::{GameSession, GameStatus, MoveOutcome, SessionSummary, Snapshot};
pub use stats::{
    JsonStatsStore, MemoryStatsStore, StatsAggregator, StatsRecord, StatsStore, StatsStoreError,
};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Session, randomness and stats wired together.
///
/// Wins are folded into the stats store as soon as the winning move lands.
#[derive(Debug)]
pub struct MazeGame<S, R = StdRng> {
    session: GameSession,
    placer: ItemPlacer,
    rng: R,
    stats: StatsAggregator<S>,
}

impl<S: StatsStore> MazeGame<S, StdRng> {
    /// Build from config, seeding the RNG from `config.seed` if set.
    pub fn from_config(config: &EngineConfig, store: S) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, store, rng)
    }
}

impl<S: StatsStore, R: Rng> MazeGame<S, R> {
    pub fn with_rng(config: &EngineConfig, store: S, rng: R) -> Self {
        Self {
            session: GameSession::new(),
            placer: ItemPlacer::new(config.placement_attempts),
            rng,
            stats: StatsAggregator::new(store),
        }
    }

    /// Start a fresh session, abandoning any current one.
    pub fn start(&mut self, difficulty: Difficulty) -> Result<(), ConfigurationError> {
        self.session.start(difficulty, &self.placer, &mut self.rng)
    }

    /// Start a custom-sized session.
    pub fn start_with(&mut self, size: usize, item_count: usize) -> Result<(), ConfigurationError> {
        self.session
            .start_with(size, item_count, &self.placer, &mut self.rng)
    }

    /// Forward a move; on a win the summary is merged into the stats store.
    ///
    /// A store failure is returned after the session has already moved to
    /// `Won`.
    pub fn request_move(&mut self, direction: Direction) -> Result<MoveOutcome, StatsStoreError> {
        let outcome = self.session.request_move(direction);
        if let MoveOutcome::Won(summary) = &outcome {
            self.stats.on_won(summary)?;
        }
        Ok(outcome)
    }

    pub fn tick(&mut self, delta_seconds: f64) {
        self.session.tick(delta_seconds);
    }

    pub fn abandon(&mut self) {
        self.session.abandon();
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn snapshot(&self) -> Option<Snapshot<'_>> {
        self.session.snapshot()
    }

    /// Current stats record, read through the store.
    pub fn stats(&self) -> Result<StatsRecord, StatsStoreError> {
        self.stats.record()
    }

    pub fn store(&self) -> &S {
        self.stats.store()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn make_game(seed: u64) -> MazeGame<MemoryStatsStore> {
        MazeGame::from_config(&EngineConfig::default().with_seed(seed), MemoryStatsStore::new())
    }

    /// Walk the unique solution, ticking once per step.
    fn solve(game: &mut MazeGame<MemoryStatsStore>, step_seconds: f64) -> MoveOutcome {
        let path = game.session().solution().unwrap_or_default();
        let mut outcome = MoveOutcome::Ignored;
        for dir in path {
            game.tick(step_seconds);
            outcome = game.request_move(dir).unwrap();
        }
        outcome
    }

    #[test]
    fn test_easy_playthrough() {
        let mut game = make_game(15);
        game.start(Difficulty::Easy).unwrap();

        let session = game.session();
        let grid = session.grid().unwrap();
        assert!(grid.is_passage(Position::new(1, 1)));
        assert!(grid.is_passage(Position::new(13, 13)));
        let steps = session.solution().unwrap().len();

        let outcome = solve(&mut game, 0.5);
        assert!(matches!(outcome, MoveOutcome::Won(_)));
        assert_eq!(game.session().move_count() as usize, steps);
        assert_eq!(game.session().status(), GameStatus::Won);

        let record = game.stats().unwrap();
        assert_eq!(record.completions, 1);
        assert_eq!(record.best_moves, Some(steps as u32));
    }

    #[test]
    fn test_stats_across_sessions() {
        let mut game = make_game(7);
        let mut times = Vec::new();
        let mut moves = Vec::new();
        let mut coins = 0u64;

        for (i, difficulty) in [Difficulty::Easy, Difficulty::Medium, Difficulty::Easy]
            .into_iter()
            .enumerate()
        {
            game.start(difficulty).unwrap();
            let outcome = solve(&mut game, 1.0 + i as f64);
            let MoveOutcome::Won(summary) = outcome else {
                panic!("session {i} did not finish");
            };
            times.push(summary.elapsed_seconds);
            moves.push(summary.move_count);
            coins += u64::from(summary.collected_count);
        }

        let record = game.stats().unwrap();
        assert_eq!(record.completions, 3);
        assert_eq!(record.coins, coins);
        assert_eq!(record.best_time, times.iter().copied().reduce(f64::min));
        assert_eq!(record.best_moves, moves.iter().copied().min());
    }

    #[test]
    fn test_abandoned_session_not_recorded() {
        let mut game = make_game(3);
        game.start(Difficulty::Hard).unwrap();
        game.tick(5.0);
        game.abandon();

        assert_eq!(game.session().status(), GameStatus::Idle);
        assert_eq!(game.stats().unwrap(), StatsRecord::default());
    }

    #[test]
    fn test_invalid_custom_size() {
        let mut game = make_game(1);
        assert_eq!(
            game.start_with(4, 1),
            Err(ConfigurationError::InvalidSize { size: 4 })
        );
        assert_eq!(game.session().status(), GameStatus::Idle);
    }

    #[test]
    fn test_independent_games_do_not_share_stats() {
        let mut first = make_game(11);
        let second = make_game(11);

        first.start(Difficulty::Easy).unwrap();
        solve(&mut first, 1.0);

        assert_eq!(first.stats().unwrap().completions, 1);
        assert_eq!(second.stats().unwrap().completions, 0);
    }

    #[test]
    fn test_seeded_games_match() {
        let mut a = make_game(42);
        let mut b = make_game(42);
        a.start(Difficulty::Expert).unwrap();
        b.start(Difficulty::Expert).unwrap();
        assert_eq!(a.session().grid(), b.session().grid());
        assert_eq!(a.session().collectibles(), b.session().collectibles());
    }

    #[test]
    fn test_custom_session_summary_has_no_difficulty() {
        let mut game = make_game(5);
        game.start_with(9, 2).unwrap();
        let MoveOutcome::Won(summary) = solve(&mut game, 0.25) else {
            panic!("custom session did not finish");
        };
        assert_eq!(summary.difficulty, None);
        assert_eq!(game.store().read().unwrap().completions, 1);
    }
}
