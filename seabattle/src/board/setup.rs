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
//! Implements the setup phase of the board.
//!
//! [`FleetBuilder`] places and removes ships one at a time while enforcing the
//! placement rules:
//!
//! 1. every cell of a ship is on the board and empty,
//! 2. no cell of a ship touches a different ship, by edge or by corner,
//! 3. a ship of the requested length is still waiting to be placed.
//!
//! Once nothing is left to place, [`FleetBuilder::build`] produces the [`Board`].
use enumflags2::BitFlags;

use crate::{
    board::{
        Adjacency, Board, CannotPlaceReason, Cell, Coordinate, Dimensions, Grid, PlaceError,
        ShipId, ShipInfo,
    },
    config::GameConfig,
    ships::{Fleet, Orientation, Placement, ShipKind},
};

/// Incrementally places a fleet onto a grid.
#[derive(Debug, Clone)]
pub struct FleetBuilder {
    /// Grid for placement of ships. Each cell holds the slot of the ship covering it.
    grid: Grid<Option<usize>>,

    /// Placed ships. Removed ships leave a free slot behind for reuse.
    ships: Vec<Option<ShipInfo>>,

    /// Ships which still need to be placed.
    ships_left: Fleet,
}

impl FleetBuilder {
    /// Begin setup of a board with the given [`Dimensions`] and ships to place.
    pub fn new(dim: Dimensions, fleet: Fleet) -> Self {
        Self {
            grid: Grid::new(dim),
            ships: Vec::new(),
            ships_left: fleet,
        }
    }

    /// Begin setup of a board for the given game.
    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.dimensions(), config.fleet().clone())
    }

    /// Get the [`Dimensions`] of the board being built.
    pub fn dimensions(&self) -> Dimensions {
        self.grid.dim
    }

    /// Get an iterator over every coordinate of the board in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Coordinate> {
        self.grid.dim.positions()
    }

    /// Ships which still need to be placed.
    pub fn ships_left(&self) -> &Fleet {
        &self.ships_left
    }

    /// Returns true once every ship has been placed.
    pub fn ready(&self) -> bool {
        self.ships_left.is_empty()
    }

    /// Returns true if the coordinate is in bounds and holds a ship segment.
    pub fn is_ship(&self, coord: Coordinate) -> bool {
        matches!(self.grid.get(coord), Some(Some(_)))
    }

    /// Check whether a ship of the given kind could be placed at `origin` extending in
    /// `orientation`, without placing it.
    pub fn check_placement(
        &self,
        kind: ShipKind,
        origin: Coordinate,
        orientation: Orientation,
    ) -> Result<(), CannotPlaceReason> {
        for cell in kind.project(origin, orientation) {
            match self.grid.get(cell) {
                None => return Err(CannotPlaceReason::OutOfBounds),
                Some(Some(_)) => return Err(CannotPlaceReason::AlreadyOccupied),
                Some(None) => {}
            }
            if self.touches_ship(cell, BitFlags::all(), &[]) {
                return Err(CannotPlaceReason::TouchesShip);
            }
        }
        if self.ships_left.count(kind) == 0 {
            return Err(CannotPlaceReason::NoShipsLeft);
        }
        Ok(())
    }

    /// Returns true if the ship could legally be placed and every cell it would cover
    /// passes `usable`.
    pub fn can_place<F>(
        &self,
        kind: ShipKind,
        origin: Coordinate,
        orientation: Orientation,
        usable: F,
    ) -> bool
    where
        F: Fn(Coordinate) -> bool,
    {
        self.check_placement(kind, origin, orientation).is_ok()
            && kind.project(origin, orientation).all(usable)
    }

    /// Place a ship of the given kind. Does not consult any usability predicate; call
    /// [`can_place`][Self::can_place] first when one applies.
    pub fn place(
        &mut self,
        kind: ShipKind,
        origin: Coordinate,
        orientation: Orientation,
    ) -> Result<(), PlaceError<Placement>> {
        let placement = Placement::new(kind, origin, orientation);
        if let Err(reason) = self.check_placement(kind, origin, orientation) {
            return Err(PlaceError::new(reason, placement));
        }
        self.ships_left.decrement(kind);
        self.insert_ship(kind, placement.cells().collect());
        Ok(())
    }

    /// Remove a ship previously placed with the same arguments. Fails unless the cells
    /// hold exactly that ship.
    pub fn remove(
        &mut self,
        kind: ShipKind,
        origin: Coordinate,
        orientation: Orientation,
    ) -> Result<(), PlaceError<Placement>> {
        let placement = Placement::new(kind, origin, orientation);
        let slot = match self.grid.get(origin) {
            None => return Err(PlaceError::new(CannotPlaceReason::OutOfBounds, placement)),
            Some(None) => return Err(PlaceError::new(CannotPlaceReason::NotPlaced, placement)),
            Some(&Some(slot)) => slot,
        };
        let matches = match &self.ships[slot] {
            Some(info) => info.kind == kind && placement.cells().eq(info.cells.iter().copied()),
            None => false,
        };
        if !matches {
            return Err(PlaceError::new(CannotPlaceReason::NotPlaced, placement));
        }
        self.take_ship(slot);
        self.ships_left.increment(kind);
        Ok(())
    }

    /// Add a single ship cell, the way a player edits a board by hand. The new cell
    /// joins every ship it shares an edge with; the joined cells must form a straight
    /// run whose length is still available, and must not touch any other ship.
    pub fn add_cell(&mut self, coord: Coordinate) -> Result<(), PlaceError<Coordinate>> {
        let fail = |reason| Err(PlaceError::new(reason, coord));
        match self.grid.get(coord) {
            None => return fail(CannotPlaceReason::OutOfBounds),
            Some(Some(_)) => return fail(CannotPlaceReason::AlreadyOccupied),
            Some(None) => {}
        }

        let mut joined: Vec<usize> = coord
            .edge_neighbors()
            .filter_map(|n| self.grid.get(n).copied().flatten())
            .collect();
        joined.sort_unstable();
        joined.dedup();
        if self.touches_ship(coord, Adjacency::Vertex, &joined) {
            return fail(CannotPlaceReason::TouchesShip);
        }

        let mut cells = vec![coord];
        for &slot in &joined {
            cells.extend(self.ship_info(slot).cells.iter().copied());
        }
        cells.sort_unstable();
        let merged = match Placement::from_cells(&cells) {
            Some(merged) => merged,
            None => return fail(CannotPlaceReason::InvalidShape),
        };

        let mut left = self.ships_left.clone();
        for &slot in &joined {
            left.increment(self.ship_info(slot).kind);
        }
        if !left.decrement(merged.kind) {
            return fail(CannotPlaceReason::NoShipsLeft);
        }

        for slot in joined {
            self.take_ship(slot);
        }
        self.ships_left = left;
        self.insert_ship(merged.kind, cells);
        Ok(())
    }

    /// Remove a single ship cell. Whatever remains of that ship on either side of the
    /// cell becomes a separate, shorter ship.
    pub fn remove_cell(&mut self, coord: Coordinate) -> Result<(), PlaceError<Coordinate>> {
        let fail = |reason| Err(PlaceError::new(reason, coord));
        let slot = match self.grid.get(coord) {
            None => return fail(CannotPlaceReason::OutOfBounds),
            Some(None) => return fail(CannotPlaceReason::NotPlaced),
            Some(&Some(slot)) => slot,
        };
        let info = self.ship_info(slot);
        let split = info
            .cells
            .iter()
            .position(|&cell| cell == coord)
            .expect("grid and ship table agree on ship cells");
        let pieces: Vec<Vec<Coordinate>> = vec![
            info.cells[..split].to_vec(),
            info.cells[split + 1..].to_vec(),
        ]
        .into_iter()
        .filter(|piece| !piece.is_empty())
        .collect();

        let mut left = self.ships_left.clone();
        left.increment(info.kind);
        for piece in &pieces {
            if !left.decrement(ShipKind::new(piece.len())) {
                return fail(CannotPlaceReason::NoShipsLeft);
            }
        }

        self.take_ship(slot);
        self.ships_left = left;
        for piece in pieces {
            self.insert_ship(ShipKind::new(piece.len()), piece);
        }
        Ok(())
    }

    /// Remove every placed ship, returning them to the pool of ships left to place.
    pub fn clear(&mut self) {
        for slot in 0..self.ships.len() {
            if let Some(info) = self.take_ship(slot) {
                self.ships_left.increment(info.kind);
            }
        }
        self.ships.clear();
    }

    /// If every ship has been placed, return the finished [`Board`]. Otherwise returns
    /// `None`; the builder is left untouched either way.
    pub fn build(&self) -> Option<Board> {
        if !self.ready() {
            return None;
        }
        let mut ids = vec![None; self.ships.len()];
        let mut ships = Vec::new();
        for (slot, info) in self.ships.iter().enumerate() {
            if let Some(info) = info {
                ids[slot] = Some(ShipId(ships.len()));
                ships.push(info.clone());
            }
        }
        let mut grid = Grid::new(self.grid.dim);
        for (coord, slot) in self.grid.iter() {
            if let Some(ship) = slot.and_then(|slot| ids[slot]) {
                grid[coord] = Cell::Ship {
                    ship,
                    damaged: false,
                };
            }
        }
        Some(Board::new(grid, ships))
    }

    /// Returns true if any neighbor of `coord` with the given adjacency holds a ship
    /// other than those in `except`.
    fn touches_ship<B>(&self, coord: Coordinate, adjacency: B, except: &[usize]) -> bool
    where
        B: Into<BitFlags<Adjacency>>,
    {
        coord
            .neighbors(adjacency)
            .filter_map(|n| self.grid.get(n).copied().flatten())
            .any(|slot| !except.contains(&slot))
    }

    fn ship_info(&self, slot: usize) -> &ShipInfo {
        self.ships[slot]
            .as_ref()
            .expect("grid only references occupied ship slots")
    }

    /// Record a ship in a free slot and mark its cells. Does not touch `ships_left`.
    fn insert_ship(&mut self, kind: ShipKind, cells: Vec<Coordinate>) {
        let slot = match self.ships.iter().position(Option::is_none) {
            Some(slot) => slot,
            None => {
                self.ships.push(None);
                self.ships.len() - 1
            }
        };
        for &cell in &cells {
            self.grid[cell] = Some(slot);
        }
        self.ships[slot] = Some(ShipInfo { kind, cells });
    }

    /// Clear a ship's slot and cells. Does not touch `ships_left`.
    fn take_ship(&mut self, slot: usize) -> Option<ShipInfo> {
        let info = self.ships.get_mut(slot)?.take()?;
        for &cell in &info.cells {
            self.grid[cell] = None;
        }
        while let Some(None) = self.ships.last() {
            self.ships.pop();
        }
        Some(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(row: i32, col: i32) -> Coordinate {
        Coordinate::new(row, col)
    }

    fn standard() -> FleetBuilder {
        FleetBuilder::new(Dimensions::default(), Fleet::standard())
    }

    fn occupied(builder: &FleetBuilder) -> Vec<Coordinate> {
        builder.positions().filter(|&p| builder.is_ship(p)).collect()
    }

    #[test]
    fn place_and_remove_round_trip() {
        let mut builder = standard();
        builder
            .place(ShipKind::ONE, c(9, 9), Orientation::Horizontal)
            .unwrap();
        let before_left = builder.ships_left().clone();
        let before_cells = occupied(&builder);

        builder
            .place(ShipKind::FOUR, c(2, 3), Orientation::Vertical)
            .unwrap();
        assert_eq!(builder.ships_left().count(ShipKind::FOUR), 0);
        assert_eq!(occupied(&builder).len(), 5);

        builder
            .remove(ShipKind::FOUR, c(2, 3), Orientation::Vertical)
            .unwrap();
        assert_eq!(builder.ships_left(), &before_left);
        assert_eq!(occupied(&builder), before_cells);
    }

    #[test]
    fn rejects_out_of_bounds() {
        let builder = standard();
        assert_eq!(
            builder.check_placement(ShipKind::FOUR, c(0, 7), Orientation::Horizontal),
            Err(CannotPlaceReason::OutOfBounds)
        );
        assert_eq!(
            builder.check_placement(ShipKind::TWO, c(-1, 0), Orientation::Vertical),
            Err(CannotPlaceReason::OutOfBounds)
        );
        assert!(builder
            .check_placement(ShipKind::FOUR, c(0, 6), Orientation::Horizontal)
            .is_ok());
    }

    #[test]
    fn rejects_overlap_and_touching() {
        let mut builder = standard();
        builder
            .place(ShipKind::THREE, c(4, 4), Orientation::Horizontal)
            .unwrap();
        assert_eq!(
            builder.check_placement(ShipKind::TWO, c(4, 5), Orientation::Vertical),
            Err(CannotPlaceReason::AlreadyOccupied)
        );
        // Edge contact.
        assert_eq!(
            builder.check_placement(ShipKind::TWO, c(5, 4), Orientation::Horizontal),
            Err(CannotPlaceReason::TouchesShip)
        );
        // Corner contact.
        assert_eq!(
            builder.check_placement(ShipKind::ONE, c(3, 7), Orientation::Horizontal),
            Err(CannotPlaceReason::TouchesShip)
        );
        assert!(builder
            .check_placement(ShipKind::ONE, c(2, 7), Orientation::Horizontal)
            .is_ok());
    }

    #[test]
    fn rejects_exhausted_kind() {
        let mut builder = standard();
        builder
            .place(ShipKind::FOUR, c(0, 0), Orientation::Horizontal)
            .unwrap();
        let err = builder
            .place(ShipKind::FOUR, c(5, 0), Orientation::Horizontal)
            .unwrap_err();
        assert_eq!(err.reason(), CannotPlaceReason::NoShipsLeft);
        assert_eq!(
            err.placement(),
            &Placement::new(ShipKind::FOUR, c(5, 0), Orientation::Horizontal)
        );
    }

    #[test]
    fn can_place_consults_usability() {
        let builder = standard();
        assert!(builder.can_place(ShipKind::THREE, c(0, 0), Orientation::Vertical, |_| true));
        assert!(!builder.can_place(
            ShipKind::THREE,
            c(0, 0),
            Orientation::Vertical,
            |p| p != c(2, 0)
        ));
        assert!(builder.can_place(
            ShipKind::THREE,
            c(0, 0),
            Orientation::Horizontal,
            |p| p != c(2, 0)
        ));
    }

    #[test]
    fn remove_requires_exact_ship() {
        let mut builder = standard();
        builder
            .place(ShipKind::THREE, c(1, 1), Orientation::Horizontal)
            .unwrap();
        for (kind, origin, orientation) in &[
            (ShipKind::TWO, c(1, 1), Orientation::Horizontal),
            (ShipKind::THREE, c(1, 2), Orientation::Horizontal),
            (ShipKind::THREE, c(1, 1), Orientation::Vertical),
            (ShipKind::ONE, c(7, 7), Orientation::Horizontal),
        ] {
            assert_eq!(
                builder
                    .remove(*kind, *origin, *orientation)
                    .unwrap_err()
                    .reason(),
                CannotPlaceReason::NotPlaced
            );
        }
        assert_eq!(builder.ships_left().count(ShipKind::THREE), 1);
    }

    #[test]
    fn build_requires_full_fleet() {
        let fleet = Fleet::new().with(ShipKind::TWO, 1).with(ShipKind::ONE, 1);
        let mut builder = FleetBuilder::new(Dimensions::new(3, 3), fleet);
        assert!(builder.build().is_none());
        builder
            .place(ShipKind::TWO, c(0, 0), Orientation::Vertical)
            .unwrap();
        assert!(builder.build().is_none());
        builder
            .place(ShipKind::ONE, c(2, 2), Orientation::Horizontal)
            .unwrap();
        let board = builder.build().unwrap();
        assert_eq!(board.ship_cells(), 3);
        assert_eq!(board.iter_ships().count(), 2);
    }

    #[test]
    fn cells_merge_into_ships() {
        let mut builder = standard();
        builder.add_cell(c(0, 0)).unwrap();
        builder.add_cell(c(0, 2)).unwrap();
        assert_eq!(builder.ships_left().count(ShipKind::ONE), 2);

        // Bridging the gap joins both singles into one three-deck ship.
        builder.add_cell(c(0, 1)).unwrap();
        assert_eq!(builder.ships_left().count(ShipKind::ONE), 4);
        assert_eq!(builder.ships_left().count(ShipKind::THREE), 1);
        builder
            .remove(ShipKind::THREE, c(0, 0), Orientation::Horizontal)
            .unwrap();
        assert_eq!(builder.ships_left(), &Fleet::standard());
    }

    #[test]
    fn cells_must_stay_straight_and_apart() {
        let mut builder = standard();
        builder.add_cell(c(3, 3)).unwrap();
        builder.add_cell(c(4, 3)).unwrap();
        assert_eq!(
            builder.add_cell(c(4, 4)).unwrap_err().reason(),
            CannotPlaceReason::InvalidShape
        );
        assert_eq!(
            builder.add_cell(c(5, 4)).unwrap_err().reason(),
            CannotPlaceReason::TouchesShip
        );
        assert_eq!(
            builder.add_cell(c(3, 3)).unwrap_err().reason(),
            CannotPlaceReason::AlreadyOccupied
        );
        assert_eq!(
            builder.add_cell(c(10, 0)).unwrap_err().reason(),
            CannotPlaceReason::OutOfBounds
        );
        let err = builder.remove_cell(c(7, 7)).unwrap_err();
        assert_eq!(err.reason(), CannotPlaceReason::NotPlaced);
        assert_eq!(err.into_placement(), c(7, 7));
    }

    #[test]
    fn cells_cannot_exceed_longest_ship() {
        let mut builder = standard();
        for col in 0..4 {
            builder.add_cell(c(0, col)).unwrap();
        }
        assert_eq!(
            builder.add_cell(c(0, 4)).unwrap_err().reason(),
            CannotPlaceReason::NoShipsLeft
        );
    }

    #[test]
    fn removing_a_middle_cell_splits_the_ship() {
        let mut builder = standard();
        builder
            .place(ShipKind::FOUR, c(2, 2), Orientation::Vertical)
            .unwrap();
        builder.remove_cell(c(3, 2)).unwrap();
        let left = builder.ships_left();
        assert_eq!(left.count(ShipKind::FOUR), 1);
        assert_eq!(left.count(ShipKind::ONE), 3);
        assert_eq!(left.count(ShipKind::TWO), 2);
        assert!(builder.is_ship(c(2, 2)));
        assert!(!builder.is_ship(c(3, 2)));
        builder
            .remove(ShipKind::TWO, c(4, 2), Orientation::Vertical)
            .unwrap();
        assert_eq!(
            builder.remove_cell(c(3, 2)).unwrap_err().reason(),
            CannotPlaceReason::NotPlaced
        );
    }

    #[test]
    fn clear_returns_every_ship() {
        let mut builder = standard();
        builder
            .place(ShipKind::FOUR, c(0, 0), Orientation::Horizontal)
            .unwrap();
        builder.add_cell(c(9, 9)).unwrap();
        builder.clear();
        assert_eq!(builder.ships_left(), &Fleet::standard());
        assert!(occupied(&builder).is_empty());
    }
}
