//! Collectible placement.
//!
//! Items are scattered by rejection sampling over the whole grid. Each item
//! gets a bounded number of draws; an item that runs out is skipped and the
//! placement reports itself as degraded instead of failing.

use rand::Rng;

use super::grid::{Grid, Position};

/// Default number of draws per item before it is skipped.
pub const DEFAULT_PLACEMENT_ATTEMPTS: u32 = 100;

/// A coin sitting on a passage cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collectible {
    pub position: Position,
    collected: bool,
}

impl Collectible {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            collected: false,
        }
    }

    pub fn is_collected(&self) -> bool {
        self.collected
    }

    /// Mark as collected. Returns true only on the first call.
    pub fn collect(&mut self) -> bool {
        if self.collected {
            return false;
        }
        self.collected = true;
        true
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "row": self.position.row,
            "col": self.position.col,
            "collected": self.collected
        })
    }
}

/// Result of a placement run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub collectibles: Vec<Collectible>,
    /// How many items were asked for
    pub requested: usize,
}

impl Placement {
    /// Fewer items were placed than requested.
    pub fn is_degraded(&self) -> bool {
        self.collectibles.len() < self.requested
    }

    pub fn placed(&self) -> usize {
        self.collectibles.len()
    }

    pub fn skipped(&self) -> usize {
        self.requested - self.collectibles.len()
    }
}

/// Scatters collectibles onto generated passages.
#[derive(Debug, Clone, Copy)]
pub struct ItemPlacer {
    max_attempts: u32,
}

impl Default for ItemPlacer {
    fn default() -> Self {
        Self::new(DEFAULT_PLACEMENT_ATTEMPTS)
    }
}

impl ItemPlacer {
    pub fn new(max_attempts: u32) -> Self {
        Self { max_attempts }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Place up to `count` collectibles on passage cells, avoiding
    /// `exclusions` and each other.
    pub fn place(
        &self,
        grid: &Grid,
        count: usize,
        exclusions: &[Position],
        rng: &mut impl Rng,
    ) -> Placement {
        let mut collectibles: Vec<Collectible> = Vec::with_capacity(count);
        let size = grid.size();

        for item in 0..count {
            let mut spot = None;
            for _ in 0..self.max_attempts {
                let pos = Position::new(rng.gen_range(0..size), rng.gen_range(0..size));
                let free = grid.is_passage(pos)
                    && !exclusions.contains(&pos)
                    && !collectibles.iter().any(|c| c.position == pos);
                if free {
                    spot = Some(pos);
                    break;
                }
            }

            match spot {
                Some(pos) => collectibles.push(Collectible::new(pos)),
                None => tracing::debug!(item, attempts = self.max_attempts, "collectible skipped"),
            }
        }

        let placement = Placement {
            collectibles,
            requested: count,
        };
        if placement.is_degraded() {
            tracing::warn!(
                requested = placement.requested,
                placed = placement.placed(),
                "collectible placement degraded"
            );
        }
        placement
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::generator::MazeGenerator;
    use crate::state::grid::Cell;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn make_maze(size: usize, seed: u64) -> Grid {
        let mut rng = StdRng::seed_from_u64(seed);
        MazeGenerator::new().generate(size, &mut rng).unwrap()
    }

    #[test]
    fn test_place_zero() {
        let grid = make_maze(15, 1);
        let mut rng = StdRng::seed_from_u64(5);
        let placement = ItemPlacer::default().place(&grid, 0, &[], &mut rng);
        assert!(placement.collectibles.is_empty());
        assert!(!placement.is_degraded());
    }

    #[test]
    fn test_placed_on_free_passages() {
        let grid = make_maze(21, 3);
        let exclusions = [grid.entrance(), grid.exit()];
        let mut rng = StdRng::seed_from_u64(11);
        let placement = ItemPlacer::default().place(&grid, 7, &exclusions, &mut rng);

        assert_eq!(placement.placed(), 7);
        for (i, item) in placement.collectibles.iter().enumerate() {
            assert!(grid.is_passage(item.position));
            assert!(!exclusions.contains(&item.position));
            assert!(!item.is_collected());
            assert!(placement.collectibles[i + 1..]
                .iter()
                .all(|other| other.position != item.position));
        }
    }

    #[test]
    fn test_degrades_when_no_room() {
        // Only two passages, both excluded.
        let mut grid = Grid::walled(5);
        grid.set(Position::new(1, 1), Cell::Passage);
        grid.set(Position::new(3, 3), Cell::Passage);
        let mut rng = StdRng::seed_from_u64(0);
        let placement =
            ItemPlacer::new(50).place(&grid, 3, &[grid.entrance(), grid.exit()], &mut rng);

        assert!(placement.is_degraded());
        assert_eq!(placement.placed(), 0);
        assert_eq!(placement.skipped(), 3);
    }

    #[test]
    fn test_zero_attempts_places_nothing() {
        let grid = make_maze(15, 8);
        let mut rng = StdRng::seed_from_u64(8);
        let placement = ItemPlacer::new(0).place(&grid, 4, &[], &mut rng);
        assert_eq!(placement.placed(), 0);
        assert_eq!(placement.requested, 4);
    }

    #[test]
    fn test_collect_once() {
        let mut coin = Collectible::new(Position::new(3, 5));
        assert!(coin.collect());
        assert!(!coin.collect());
        assert!(coin.is_collected());
        assert_eq!(
            coin.to_json(),
            serde_json::json!({"row": 3, "col": 5, "collected": true})
        );
    }
}
