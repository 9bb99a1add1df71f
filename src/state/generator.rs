//! Perfect maze generation.
//!
//! Carves a spanning tree over the odd-coordinate sublattice using a
//! randomized depth-first backtracker. The walk keeps its own stack of frames
//! instead of recursing, so the largest grids never hit call-depth limits.
//!
//! ```text
//!   # # # # # # #        every carve step joins one unvisited odd cell
//!   # S . . # . #        to the region through the single wall cell
//!   # # # . # . #        between them, so passages always form a tree
//!   # . . . . . #
//!   # . # # # # #
//!   # . . . . E #
//!   # # # # # # #
//! ```

use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use super::grid::{Cell, Direction, Grid, Position};

/// Smallest grid that still has an interior.
pub const MIN_GRID_SIZE: usize = 5;

/// Invalid generation request or a maze that failed verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("Invalid maze size {size}: must be odd and at least {min}", min = MIN_GRID_SIZE)]
    InvalidSize { size: usize },

    #[error("Exit of {size}x{size} maze is unreachable from the entrance")]
    ExitUnreachable { size: usize },
}

/// One pending step of the depth-first walk.
struct Frame {
    pos: Position,
    directions: [Direction; 4],
    next: usize,
}

impl Frame {
    fn new(pos: Position, rng: &mut impl Rng) -> Self {
        let mut directions = Direction::ALL;
        directions.shuffle(rng);
        Self {
            pos,
            directions,
            next: 0,
        }
    }
}

/// Builds perfect mazes.
#[derive(Debug, Clone, Copy, Default)]
pub struct MazeGenerator;

impl MazeGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Check a requested size without generating anything.
    pub fn validate_size(size: usize) -> Result<(), ConfigurationError> {
        if size < MIN_GRID_SIZE || size % 2 == 0 {
            return Err(ConfigurationError::InvalidSize { size });
        }
        Ok(())
    }

    /// Generate a `size`×`size` perfect maze.
    ///
    /// The entrance (1, 1) and exit (size-2, size-2) are always passages and
    /// the exit is verified reachable before the grid is returned.
    pub fn generate(&self, size: usize, rng: &mut impl Rng) -> Result<Grid, ConfigurationError> {
        Self::validate_size(size)?;

        let mut grid = Grid::walled(size);
        let entrance = grid.entrance();
        grid.set(entrance, Cell::Passage);

        let mut stack = vec![Frame::new(entrance, rng)];
        let mut carved = 1usize;

        while let Some(frame) = stack.last_mut() {
            if frame.next == frame.directions.len() {
                stack.pop();
                continue;
            }

            let from = frame.pos;
            let dir = frame.directions[frame.next];
            frame.next += 1;

            let Some(candidate) = from.offset(dir, 2, size) else {
                continue;
            };
            if !is_interior(candidate, size) || grid.is_passage(candidate) {
                continue;
            }
            let Some(between) = from.offset(dir, 1, size) else {
                continue;
            };

            grid.set(between, Cell::Passage);
            grid.set(candidate, Cell::Passage);
            carved += 1;
            stack.push(Frame::new(candidate, rng));
        }

        let exit = grid.exit();
        grid.set(exit, Cell::Passage);

        if !grid.is_reachable(entrance, exit) {
            tracing::warn!(size, "generated maze has unreachable exit");
            return Err(ConfigurationError::ExitUnreachable { size });
        }

        tracing::debug!(size, carved, passages = grid.passage_count(), "maze generated");
        Ok(grid)
    }
}

fn is_interior(pos: Position, size: usize) -> bool {
    (1..=size - 2).contains(&pos.row) && (1..=size - 2).contains(&pos.col)
}
