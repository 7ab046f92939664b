// Copyright 2020 Zachary Stewart
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! What one player has learned about the opponent's board.
use std::collections::VecDeque;

use thiserror::Error;

use crate::board::{Coordinate, Dimensions, Grid, ShotOutcome};

/// State of a single cell of the opponent's board, as far as we know.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Knowledge {
    /// Not shot yet.
    Unknown,
    /// Confirmed to be open water.
    Empty,
    /// Confirmed to hold a ship segment.
    Ship,
}

impl Knowledge {
    /// `None` if unknown, otherwise whether the cell holds a ship.
    pub fn as_option(self) -> Option<bool> {
        match self {
            Knowledge::Unknown => None,
            Knowledge::Empty => Some(false),
            Knowledge::Ship => Some(true),
        }
    }

    /// Returns true if this cell has been resolved either way.
    pub fn is_known(self) -> bool {
        self != Knowledge::Unknown
    }
}

impl Default for Knowledge {
    fn default() -> Self {
        Knowledge::Unknown
    }
}

impl From<bool> for Knowledge {
    fn from(is_ship: bool) -> Self {
        if is_ship {
            Knowledge::Ship
        } else {
            Knowledge::Empty
        }
    }
}

/// Error returned when writing to a [`KnowledgeMap`] fails.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
pub enum KnowledgeError {
    /// The coordinate is not on the board.
    #[error("coordinate {0} is out of bounds")]
    OutOfBounds(Coordinate),
    /// The cell was already resolved to a different value.
    #[error("cell {coord} is already known to be {known:?}")]
    Conflict {
        /// The cell written to.
        coord: Coordinate,
        /// What the cell was already known to hold.
        known: Knowledge,
    },
    /// The cell is not a known ship cell.
    #[error("cell {0} is not a known ship cell")]
    NotShip(Coordinate),
}

/// Per-cell record of what is known about the opponent's board.
///
/// Knowledge only grows: once a cell is resolved it can never be set back to
/// [`Knowledge::Unknown`] or to the opposite value.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct KnowledgeMap {
    grid: Grid<Knowledge>,
}

impl KnowledgeMap {
    /// Construct a map where every cell is unknown.
    pub fn new(dim: Dimensions) -> Self {
        Self {
            grid: Grid::new(dim),
        }
    }

    /// Get the [`Dimensions`] of the opponent's board.
    pub fn dimensions(&self) -> Dimensions {
        self.grid.dim
    }

    /// Get what is known about a cell. Returns `None` if the coordinate is out of
    /// bounds.
    pub fn get(&self, coord: Coordinate) -> Option<Knowledge> {
        self.grid.get(coord).copied()
    }

    /// Returns true if the coordinate is in bounds and not yet resolved.
    pub fn is_unknown(&self, coord: Coordinate) -> bool {
        self.get(coord) == Some(Knowledge::Unknown)
    }

    /// Record what a cell holds. Writing the value a cell already has is a no-op;
    /// anything that would change a resolved cell is rejected.
    pub fn set(&mut self, coord: Coordinate, value: Knowledge) -> Result<(), KnowledgeError> {
        let cell = self
            .grid
            .get_mut(coord)
            .ok_or(KnowledgeError::OutOfBounds(coord))?;
        let known = *cell;
        match known {
            _ if known == value => Ok(()),
            Knowledge::Unknown => {
                *cell = value;
                Ok(())
            }
            _ => Err(KnowledgeError::Conflict { coord, known }),
        }
    }

    /// Record the outcome of a shot at `coord`.
    pub fn record(
        &mut self,
        coord: Coordinate,
        outcome: ShotOutcome,
    ) -> Result<(), KnowledgeError> {
        self.set(coord, Knowledge::from(outcome.is_hit()))
    }

    /// Iterate every coordinate of the board, row-major.
    pub fn positions(&self) -> impl Iterator<Item = Coordinate> {
        self.grid.dim.positions()
    }

    /// Iterate every resolved cell and whether it holds a ship.
    pub fn resolved(&self) -> impl Iterator<Item = (Coordinate, bool)> + '_ {
        self.grid
            .iter()
            .filter_map(|(coord, known)| known.as_option().map(|is_ship| (coord, is_ship)))
    }

    /// Number of cells not yet resolved.
    pub fn unknown_count(&self) -> usize {
        self.grid
            .cells
            .iter()
            .filter(|known| !known.is_known())
            .count()
    }

    /// Flood fill over edge adjacency from `start` through cells whose knowledge
    /// passes `pred`. The result is sorted row-major, and is empty if `start` is out
    /// of bounds or fails `pred` itself.
    pub fn find_connected_cluster<F>(&self, start: Coordinate, pred: F) -> Vec<Coordinate>
    where
        F: Fn(Knowledge) -> bool,
    {
        let passes = |coord| self.get(coord).map_or(false, &pred);
        if !passes(start) {
            return Vec::new();
        }
        let mut seen = Grid::<bool>::new(self.grid.dim);
        seen[start] = true;
        let mut queue = VecDeque::new();
        queue.push_back(start);
        let mut cluster = Vec::new();
        while let Some(coord) = queue.pop_front() {
            cluster.push(coord);
            for next in coord.edge_neighbors() {
                if passes(next) && !seen[next] {
                    seen[next] = true;
                    queue.push_back(next);
                }
            }
        }
        cluster.sort_unstable();
        cluster
    }

    /// Mark every unknown cell surrounding the ship cluster at `coord` as empty, since
    /// no other ship may touch it. Meant for shells that learn a ship was sunk; the
    /// targeting engine works without it. Returns the cells that were newly resolved.
    pub fn outline_sunk(&mut self, coord: Coordinate) -> Result<Vec<Coordinate>, KnowledgeError> {
        match self.get(coord) {
            None => return Err(KnowledgeError::OutOfBounds(coord)),
            Some(Knowledge::Ship) => {}
            Some(_) => return Err(KnowledgeError::NotShip(coord)),
        }
        let cluster = self.find_connected_cluster(coord, |known| known == Knowledge::Ship);
        let mut outline: Vec<Coordinate> = cluster
            .iter()
            .flat_map(|cell| cell.all_neighbors())
            .filter(|&n| self.is_unknown(n))
            .collect();
        outline.sort_unstable();
        outline.dedup();
        for &cell in &outline {
            self.grid[cell] = Knowledge::Empty;
        }
        Ok(outline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ships::ShipKind;

    fn c(row: i32, col: i32) -> Coordinate {
        Coordinate::new(row, col)
    }

    #[test]
    fn set_is_monotonic() {
        let mut map = KnowledgeMap::new(Dimensions::new(5, 5));
        assert_eq!(map.unknown_count(), 25);
        map.set(c(1, 1), Knowledge::Ship).unwrap();
        map.set(c(1, 1), Knowledge::Ship).unwrap();
        assert_eq!(
            map.set(c(1, 1), Knowledge::Empty),
            Err(KnowledgeError::Conflict {
                coord: c(1, 1),
                known: Knowledge::Ship
            })
        );
        assert!(map.set(c(1, 1), Knowledge::Unknown).is_err());
        assert_eq!(
            map.set(c(5, 0), Knowledge::Empty),
            Err(KnowledgeError::OutOfBounds(c(5, 0)))
        );
        assert_eq!(map.get(c(1, 1)), Some(Knowledge::Ship));
        assert_eq!(map.unknown_count(), 24);
    }

    #[test]
    fn record_maps_outcomes() {
        let mut map = KnowledgeMap::new(Dimensions::new(3, 3));
        map.record(c(0, 0), ShotOutcome::Miss).unwrap();
        map.record(c(1, 1), ShotOutcome::Hit(ShipKind::TWO)).unwrap();
        map.record(c(2, 1), ShotOutcome::Sunk(ShipKind::TWO)).unwrap();
        assert_eq!(
            map.resolved().collect::<Vec<_>>(),
            vec![(c(0, 0), false), (c(1, 1), true), (c(2, 1), true)]
        );
    }

    #[test]
    fn cluster_follows_edges_only() {
        let mut map = KnowledgeMap::new(Dimensions::new(6, 6));
        for &cell in &[c(2, 3), c(2, 1), c(2, 2), c(3, 4)] {
            map.set(cell, Knowledge::Ship).unwrap();
        }
        let is_ship = |known| known == Knowledge::Ship;
        assert_eq!(
            map.find_connected_cluster(c(2, 2), is_ship),
            vec![c(2, 1), c(2, 2), c(2, 3)]
        );
        assert_eq!(map.find_connected_cluster(c(3, 4), is_ship), vec![c(3, 4)]);
        assert!(map.find_connected_cluster(c(0, 0), is_ship).is_empty());
        assert!(map.find_connected_cluster(c(-1, 0), |_| true).is_empty());
        assert_eq!(map.find_connected_cluster(c(0, 0), |_| true).len(), 36);
    }

    #[test]
    fn outline_marks_surroundings() {
        let mut map = KnowledgeMap::new(Dimensions::new(4, 4));
        map.set(c(0, 1), Knowledge::Ship).unwrap();
        map.set(c(0, 2), Knowledge::Ship).unwrap();
        map.set(c(1, 1), Knowledge::Empty).unwrap();
        let marked = map.outline_sunk(c(0, 2)).unwrap();
        assert_eq!(marked, vec![c(0, 0), c(0, 3), c(1, 0), c(1, 2), c(1, 3)]);
        assert_eq!(map.unknown_count(), 16 - 8);
        assert_eq!(map.outline_sunk(c(1, 1)), Err(KnowledgeError::NotShip(c(1, 1))));
    }
}
