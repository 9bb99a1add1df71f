//! Maze grid primitives.
//!
//! A [`Grid`] is an N×N matrix of [`Cell`]s. Passages sit on the odd
//! coordinate sublattice plus the connectors between them, so walls always
//! separate two passage cells. Grids are produced by the generator and never
//! mutated afterwards.

use std::collections::VecDeque;
use std::fmt;

/// A single maze cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Wall,
    Passage,
}

impl Cell {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wall => "wall",
            Self::Passage => "passage",
        }
    }

    pub fn is_passage(&self) -> bool {
        matches!(self, Self::Passage)
    }
}

/// Movement directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// Row/column delta for one step.
    pub fn delta(&self) -> (isize, isize) {
        match self {
            Self::Up => (-1, 0),
            Self::Down => (1, 0),
            Self::Left => (0, -1),
            Self::Right => (0, 1),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Position `distance` cells away in `direction`, if it stays inside a
    /// `size`×`size` grid.
    pub fn offset(&self, direction: Direction, distance: usize, size: usize) -> Option<Position> {
        let (dr, dc) = direction.delta();
        let row = self.row as isize + dr * distance as isize;
        let col = self.col as isize + dc * distance as isize;
        if row < 0 || col < 0 || row as usize >= size || col as usize >= size {
            return None;
        }
        Some(Position::new(row as usize, col as usize))
    }

    /// Check if two positions share an edge.
    pub fn is_adjacent_to(&self, other: &Position) -> bool {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col) == 1
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({"row": self.row, "col": self.col})
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Square maze grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a grid with every cell walled.
    pub(crate) fn walled(size: usize) -> Self {
        Self {
            size,
            cells: vec![Cell::Wall; size * size],
        }
    }

    pub(crate) fn set(&mut self, pos: Position, cell: Cell) {
        if self.contains(pos) {
            let idx = self.index(pos);
            self.cells[idx] = cell;
        }
    }

    fn index(&self, pos: Position) -> usize {
        pos.row * self.size + pos.col
    }

    /// Side length.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Total number of cells (`size²`).
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Entrance cell, always (1, 1).
    pub fn entrance(&self) -> Position {
        Position::new(1, 1)
    }

    /// Exit cell, always (size-2, size-2).
    pub fn exit(&self) -> Position {
        Position::new(self.size.saturating_sub(2), self.size.saturating_sub(2))
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.size && pos.col < self.size
    }

    /// Get cell at position.
    pub fn get(&self, pos: Position) -> Option<Cell> {
        if self.contains(pos) {
            Some(self.cells[self.index(pos)])
        } else {
            None
        }
    }

    pub fn is_passage(&self, pos: Position) -> bool {
        self.get(pos).is_some_and(|c| c.is_passage())
    }

    /// Iterate over every passage position in row-major order.
    pub fn passages(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_passage())
            .map(move |(i, _)| Position::new(i / self.size, i % self.size))
    }

    pub fn passage_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_passage()).count()
    }

    /// Open passage neighbours of `pos`.
    pub fn open_neighbors(&self, pos: Position) -> impl Iterator<Item = (Direction, Position)> + '_ {
        Direction::ALL.into_iter().filter_map(move |dir| {
            pos.offset(dir, 1, self.size)
                .filter(|next| self.is_passage(*next))
                .map(|next| (dir, next))
        })
    }

    /// Number of edges between horizontally or vertically adjacent passages.
    pub fn open_edge_count(&self) -> usize {
        self.passages()
            .map(|pos| {
                [Direction::Down, Direction::Right]
                    .into_iter()
                    .filter_map(|dir| pos.offset(dir, 1, self.size))
                    .filter(|next| self.is_passage(*next))
                    .count()
            })
            .sum()
    }

    /// Every passage reachable from `start`. Empty if `start` is a wall.
    pub fn reachable_from(&self, start: Position) -> Vec<Position> {
        let mut seen = vec![false; self.cells.len()];
        let mut order = Vec::new();
        if !self.is_passage(start) {
            return order;
        }

        let mut queue = VecDeque::from([start]);
        seen[self.index(start)] = true;
        while let Some(pos) = queue.pop_front() {
            order.push(pos);
            for (_, next) in self.open_neighbors(pos) {
                let idx = self.index(next);
                if !seen[idx] {
                    seen[idx] = true;
                    queue.push_back(next);
                }
            }
        }
        order
    }

    pub fn is_reachable(&self, from: Position, to: Position) -> bool {
        self.shortest_path(from, to).is_some()
    }

    /// Shortest sequence of moves from `from` to `to`, via BFS.
    pub fn shortest_path(&self, from: Position, to: Position) -> Option<Vec<Direction>> {
        if !self.is_passage(from) || !self.is_passage(to) {
            return None;
        }

        let mut came_from: Vec<Option<(Position, Direction)>> = vec![None; self.cells.len()];
        let mut seen = vec![false; self.cells.len()];
        let mut queue = VecDeque::from([from]);
        seen[self.index(from)] = true;

        while let Some(pos) = queue.pop_front() {
            if pos == to {
                let mut path = Vec::new();
                let mut cursor = to;
                while let Some((prev, dir)) = came_from[self.index(cursor)] {
                    path.push(dir);
                    cursor = prev;
                }
                path.reverse();
                return Some(path);
            }
            for (dir, next) in self.open_neighbors(pos) {
                let idx = self.index(next);
                if !seen[idx] {
                    seen[idx] = true;
                    came_from[idx] = Some((pos, dir));
                    queue.push_back(next);
                }
            }
        }
        None
    }

    /// Passages are connected from `root` and contain no cycles.
    pub fn is_perfect(&self, root: Position) -> bool {
        let passages = self.passage_count();
        passages > 0
            && self.reachable_from(root).len() == passages
            && self.open_edge_count() == passages - 1
    }

    /// Convert grid to JSON rows of 0 (wall) / 1 (passage).
    pub fn to_json(&self) -> serde_json::Value {
        let rows: Vec<serde_json::Value> = self
            .cells
            .chunks(self.size)
            .map(|row| {
                let cells: Vec<serde_json::Value> = row
                    .iter()
                    .map(|c| serde_json::json!(u8::from(c.is_passage())))
                    .collect();
                serde_json::Value::Array(cells)
            })
            .collect();
        serde_json::Value::Array(rows)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.size) {
            for cell in row {
                f.write_str(if cell.is_passage() { " " } else { "#" })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
