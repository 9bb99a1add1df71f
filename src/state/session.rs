//! Maze play session.
//!
//! # State Diagram
//!
//! ```text
//!            start                 reach exit
//! ┌──────┐ ─────────▶ ┌─────────┐ ───────────▶ ┌─────┐
//! │ Idle │            │ Running │              │ Won │
//! └──────┘ ◀───────── └─────────┘ ◀─────────── └─────┘
//!           abandon     ▲     │       start
//!                       └─────┘
//!                  move / tick
//! ```
//!
//! Moves and ticks outside `Running`, and moves into walls or off the grid,
//! are ignored without touching any counter.

use rand::Rng;

use super::difficulty::Difficulty;
use super::generator::{ConfigurationError, MazeGenerator};
use super::grid::{Direction, Grid, Position};
use super::placer::{Collectible, ItemPlacer};

/// Session state machine states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameStatus {
    /// No maze generated yet
    #[default]
    Idle,
    /// Accepting moves and ticks
    Running,
    /// Exit reached, session is read-only
    Won,
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Won => "won",
        }
    }

    /// Check if session can receive moves.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Running)
    }

    /// Check if the playthrough is over.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Won)
    }
}

/// What a move request did.
#[derive(Debug, Clone, PartialEq)]
pub enum MoveOutcome {
    /// Blocked, off the grid, or not running. Nothing changed.
    Ignored,
    /// Player moved; `collected` if a coin was picked up on arrival.
    Moved { collected: bool },
    /// Player reached the exit.
    Won(SessionSummary),
}

impl MoveOutcome {
    pub fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored)
    }
}

/// Final numbers of a session, handed to stats on a win.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    /// `None` for custom-sized sessions
    pub difficulty: Option<Difficulty>,
    pub move_count: u32,
    pub elapsed_seconds: f64,
    pub collected_count: u32,
    /// Coins actually placed, which may be fewer than the difficulty asks for
    pub total_collectibles: u32,
    pub finished_at: chrono::DateTime<chrono::Utc>,
}

/// Read-only view for renderers.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub grid: &'a Grid,
    pub player: Position,
    pub entrance: Position,
    pub exit: Position,
    pub collectibles: &'a [Collectible],
}

impl Snapshot<'_> {
    pub fn to_json(&self) -> serde_json::Value {
        let collectibles: Vec<serde_json::Value> =
            self.collectibles.iter().map(|c| c.to_json()).collect();

        serde_json::json!({
            "size": self.grid.size(),
            "grid": self.grid.to_json(),
            "player": self.player.to_json(),
            "entrance": self.entrance.to_json(),
            "exit": self.exit.to_json(),
            "collectibles": collectibles
        })
    }
}

/// One playthrough.
#[derive(Debug, Clone, Default)]
pub struct GameSession {
    status: GameStatus,
    difficulty: Option<Difficulty>,
    grid: Option<Grid>,
    entrance: Position,
    exit: Position,
    collectibles: Vec<Collectible>,
    player: Position,
    move_count: u32,
    elapsed_seconds: f64,
    collected_count: u32,

    /// When the current run began
    pub started_at: Option<chrono::DateTime<chrono::Utc>>,

    /// When the exit was reached
    pub finished_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl GameSession {
    /// Create an idle session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate a maze for `difficulty` and start running.
    ///
    /// On error the previous session is left untouched.
    pub fn start(
        &mut self,
        difficulty: Difficulty,
        placer: &ItemPlacer,
        rng: &mut impl Rng,
    ) -> Result<(), ConfigurationError> {
        let settings = difficulty.settings();
        self.generate_and_begin(Some(difficulty), settings.size, settings.item_count, placer, rng)
    }

    /// Start a custom-sized session outside the difficulty table.
    pub fn start_with(
        &mut self,
        size: usize,
        item_count: usize,
        placer: &ItemPlacer,
        rng: &mut impl Rng,
    ) -> Result<(), ConfigurationError> {
        self.generate_and_begin(None, size, item_count, placer, rng)
    }

    fn generate_and_begin(
        &mut self,
        difficulty: Option<Difficulty>,
        size: usize,
        item_count: usize,
        placer: &ItemPlacer,
        rng: &mut impl Rng,
    ) -> Result<(), ConfigurationError> {
        let grid = MazeGenerator::new().generate(size, rng)?;
        let exclusions = [grid.entrance(), grid.exit()];
        let placement = placer.place(&grid, item_count, &exclusions, rng);

        self.begin(difficulty, grid, placement.collectibles);
        tracing::info!(
            difficulty = difficulty.map(|d| d.as_str()),
            size,
            collectibles = self.collectibles.len(),
            "maze session started"
        );
        Ok(())
    }

    /// Reset every counter and enter `Running` on the given maze.
    pub(crate) fn begin(
        &mut self,
        difficulty: Option<Difficulty>,
        grid: Grid,
        collectibles: Vec<Collectible>,
    ) {
        *self = Self {
            status: GameStatus::Running,
            difficulty,
            entrance: grid.entrance(),
            exit: grid.exit(),
            player: grid.entrance(),
            grid: Some(grid),
            collectibles,
            move_count: 0,
            elapsed_seconds: 0.0,
            collected_count: 0,
            started_at: Some(chrono::Utc::now()),
            finished_at: None,
        };
    }

    /// Drop the current run without recording anything.
    pub fn abandon(&mut self) {
        if self.status.is_active() {
            tracing::debug!(moves = self.move_count, "maze session abandoned");
        }
        *self = Self::new();
    }

    /// Try to move one cell.
    pub fn request_move(&mut self, direction: Direction) -> MoveOutcome {
        if !self.status.is_active() {
            return MoveOutcome::Ignored;
        }
        let Some(grid) = &self.grid else {
            return MoveOutcome::Ignored;
        };
        let Some(target) = self.player.offset(direction, 1, grid.size()) else {
            return MoveOutcome::Ignored;
        };
        if !grid.is_passage(target) {
            return MoveOutcome::Ignored;
        }

        self.player = target;
        self.move_count = self.move_count.saturating_add(1);

        let mut collected = false;
        for coin in self.collectibles.iter_mut().filter(|c| c.position == target) {
            if coin.collect() {
                self.collected_count += 1;
                collected = true;
            }
        }

        if target == self.exit {
            self.status = GameStatus::Won;
            self.finished_at = Some(chrono::Utc::now());
            let summary = self.summary();
            tracing::info!(
                moves = summary.move_count,
                elapsed = summary.elapsed_seconds,
                collected = summary.collected_count,
                "maze solved"
            );
            return MoveOutcome::Won(summary);
        }

        MoveOutcome::Moved { collected }
    }

    /// Advance the elapsed-time counter while running.
    ///
    /// Negative and non-finite deltas are dropped so elapsed time never
    /// decreases.
    pub fn tick(&mut self, delta_seconds: f64) {
        if !self.status.is_active() || !delta_seconds.is_finite() || delta_seconds <= 0.0 {
            return;
        }
        self.elapsed_seconds += delta_seconds;
    }

    /// Current numbers as a summary.
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            difficulty: self.difficulty,
            move_count: self.move_count,
            elapsed_seconds: self.elapsed_seconds,
            collected_count: self.collected_count,
            total_collectibles: self.collectibles.len() as u32,
            finished_at: self.finished_at.unwrap_or_else(chrono::Utc::now),
        }
    }

    /// Renderer view. `None` while idle.
    pub fn snapshot(&self) -> Option<Snapshot<'_>> {
        self.grid.as_ref().map(|grid| Snapshot {
            grid,
            player: self.player,
            entrance: self.entrance,
            exit: self.exit,
            collectibles: &self.collectibles,
        })
    }

    /// Moves from the player's position to the exit.
    pub fn solution(&self) -> Option<Vec<Direction>> {
        self.grid.as_ref()?.shortest_path(self.player, self.exit)
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    pub fn grid(&self) -> Option<&Grid> {
        self.grid.as_ref()
    }

    pub fn player(&self) -> Position {
        self.player
    }

    pub fn entrance(&self) -> Position {
        self.entrance
    }

    pub fn exit(&self) -> Position {
        self.exit
    }

    pub fn collectibles(&self) -> &[Collectible] {
        &self.collectibles
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed_seconds
    }

    pub fn collected_count(&self) -> u32 {
        self.collected_count
    }

    pub fn total_collectibles(&self) -> usize {
        self.collectibles.len()
    }

    /// Convert session state to JSON.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "status": self.status.as_str(),
            "difficulty": self.difficulty.map(|d| d.as_str()),
            "moves": self.move_count,
            "elapsed_seconds": self.elapsed_seconds,
            "collected": self.collected_count,
            "total_collectibles": self.collectibles.len(),
            "snapshot": self.snapshot().map(|s| s.to_json())
        })
    }
}
