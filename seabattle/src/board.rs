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
//! Types that make up the game board.

use crate::ships::ShipKind;

pub(crate) use self::grid::Grid;
pub use self::{
    coordinate::{Adjacency, Coordinate},
    dimensions::Dimensions,
    errors::{CannotPlaceReason, CannotShootReason, PlaceError, ShotError},
    setup::FleetBuilder,
};

mod coordinate;
mod dimensions;
mod errors;
mod grid;
pub mod setup;

/// Index of a ship within a single board.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ShipId(pub(crate) usize);

/// A single cell of a finished board.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Cell {
    /// Open water.
    Empty {
        /// Whether this cell has been shot.
        damaged: bool,
    },
    /// A segment of the ship with the given id.
    Ship {
        /// The ship this segment belongs to.
        ship: ShipId,
        /// Whether this segment has been hit.
        damaged: bool,
    },
}

impl Cell {
    /// Returns true if a ship occupies this cell.
    pub fn is_ship(&self) -> bool {
        match self {
            Cell::Empty { .. } => false,
            Cell::Ship { .. } => true,
        }
    }

    /// Returns true if this cell has been shot.
    pub fn damaged(&self) -> bool {
        match *self {
            Cell::Empty { damaged } | Cell::Ship { damaged, .. } => damaged,
        }
    }

    /// The id of the ship occupying this cell, if any.
    pub fn ship(&self) -> Option<ShipId> {
        match *self {
            Cell::Empty { .. } => None,
            Cell::Ship { ship, .. } => Some(ship),
        }
    }

    fn damage(&mut self) {
        match self {
            Cell::Empty { damaged } | Cell::Ship { damaged, .. } => *damaged = true,
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::Empty { damaged: false }
    }
}

/// Kind and cells of one ship on a board.
#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) struct ShipInfo {
    pub(crate) kind: ShipKind,
    /// Cells of the ship, sorted row-major.
    pub(crate) cells: Vec<Coordinate>,
}

/// Handle to a ship that allows getting information about its status.
#[derive(Debug, Copy, Clone)]
pub struct ShipRef<'a> {
    /// ID of the ship.
    id: ShipId,

    /// Grid from the board.
    grid: &'a Grid<Cell>,

    /// Kind and placement of the ship.
    info: &'a ShipInfo,
}

impl<'a> ShipRef<'a> {
    /// Get the ID of the ship.
    pub fn id(&self) -> ShipId {
        self.id
    }

    /// Get the kind of the ship.
    pub fn kind(&self) -> ShipKind {
        self.info.kind
    }

    /// Check if this ship has been sunk.
    pub fn sunk(&self) -> bool {
        self.coords().all(|coord| self.grid[coord].damaged())
    }

    /// Get an iterator over the coordinates of this ship.
    pub fn coords(&self) -> impl 'a + Iterator<Item = Coordinate> {
        self.info.cells.iter().copied()
    }

    /// Get an iterator over the coordinates of this ship and whether those coords have
    /// been hit.
    pub fn hits(&self) -> impl 'a + Iterator<Item = (Coordinate, bool)> {
        let grid = self.grid;
        self.coords().map(move |coord| (coord, grid[coord].damaged()))
    }
}

/// Reference to a particular cell in the grid.
#[derive(Debug, Copy, Clone)]
pub struct CellRef<'a> {
    /// Coordinate of this cell.
    coord: Coordinate,

    /// Contents of this cell.
    cell: Cell,

    /// Reference to the ship that occupies this cell if any.
    ship: Option<ShipRef<'a>>,
}

impl<'a> CellRef<'a> {
    /// The grid coordinate of this cell.
    pub fn coord(&self) -> Coordinate {
        self.coord
    }

    /// The contents of this cell.
    pub fn cell(&self) -> Cell {
        self.cell
    }

    /// Whether this cell has been hit previously.
    pub fn damaged(&self) -> bool {
        self.cell.damaged()
    }

    /// The ship reference for the ship that occupies this cell, if any.
    pub fn ship(&self) -> Option<ShipRef<'a>> {
        self.ship
    }
}

/// Result of a shot on a single player's board.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShotOutcome {
    /// The shot did not hit anything.
    Miss,
    /// The shot hit a ship of the given kind, but did not sink it.
    Hit(ShipKind),
    /// The shot sank a ship of the given kind, but the player has more ships left.
    Sunk(ShipKind),
    /// The shot sank a ship of the given kind, and all of the player's ships are now
    /// sunk.
    Defeated(ShipKind),
}

impl ShotOutcome {
    /// Returns true if the shot struck a ship.
    pub fn is_hit(&self) -> bool {
        self.ship().is_some()
    }

    /// Get the kind of the ship that was hit.
    pub fn ship(&self) -> Option<ShipKind> {
        match *self {
            ShotOutcome::Miss => None,
            ShotOutcome::Hit(kind) | ShotOutcome::Sunk(kind) | ShotOutcome::Defeated(kind) => {
                Some(kind)
            }
        }
    }
}

/// A single player's finished board: every ship placed, legal under the placement
/// rules. Produced by [`FleetBuilder::build`].
#[derive(Debug, Clone)]
pub struct Board {
    /// Grid of cells occupied by ships.
    grid: Grid<Cell>,

    /// All ships, indexed by [`ShipId`].
    ships: Vec<ShipInfo>,
}

impl Board {
    pub(crate) fn new(grid: Grid<Cell>, ships: Vec<ShipInfo>) -> Self {
        Self { grid, ships }
    }

    /// Get the [`Dimensions`] of this [`Board`].
    pub fn dimensions(&self) -> Dimensions {
        self.grid.dim
    }

    /// Returns true if all of this player's ships have been sunk.
    pub fn defeated(&self) -> bool {
        self.iter_ships().all(|ship| ship.sunk())
    }

    /// Get an iterator over all ships on this board.
    pub fn iter_ships(&self) -> impl Iterator<Item = ShipRef<'_>> {
        let grid = &self.grid;
        self.ships
            .iter()
            .enumerate()
            .map(move |(id, info)| ShipRef {
                id: ShipId(id),
                grid,
                info,
            })
    }

    /// Get the ship with the specified ID if it exists.
    pub fn get_ship(&self, id: ShipId) -> Option<ShipRef<'_>> {
        self.ships.get(id.0).map(|info| ShipRef {
            id,
            grid: &self.grid,
            info,
        })
    }

    /// Get a reference to the cell at the given coordinate. Returns None if the
    /// coordinate is out of bounds.
    pub fn get(&self, coord: Coordinate) -> Option<CellRef<'_>> {
        self.grid.get(coord).map(|&cell| CellRef {
            coord,
            cell,
            ship: cell.ship().and_then(|id| self.get_ship(id)),
        })
    }

    /// Returns true if the coordinate is in bounds and holds a ship segment.
    pub fn is_ship(&self, coord: Coordinate) -> bool {
        self.grid.get(coord).map_or(false, Cell::is_ship)
    }

    /// Kind of the ship at the given coordinate, if any.
    pub fn ship_kind_at(&self, coord: Coordinate) -> Option<ShipKind> {
        self.get(coord).and_then(|cell| cell.ship()).map(|ship| ship.kind())
    }

    /// Number of cells occupied by ships.
    pub fn ship_cells(&self) -> usize {
        self.grid.cells.iter().filter(|cell| cell.is_ship()).count()
    }

    /// Fire a shot at this board, returning a result indicating why the shot was aborted
    /// or what it hit.
    pub fn shoot(&mut self, coord: Coordinate) -> Result<ShotOutcome, ShotError> {
        if self.defeated() {
            return Err(ShotError::new(CannotShootReason::AlreadyDefeated, coord));
        }
        let hit_ship = match self.grid.get_mut(coord) {
            None => return Err(ShotError::new(CannotShootReason::OutOfBounds, coord)),
            Some(cell) if cell.damaged() => {
                return Err(ShotError::new(CannotShootReason::AlreadyShot, coord))
            }
            Some(cell) => {
                cell.damage();
                cell.ship()
            }
        };
        Ok(match hit_ship.and_then(|id| self.get_ship(id)) {
            None => ShotOutcome::Miss,
            Some(ship) if !ship.sunk() => ShotOutcome::Hit(ship.kind()),
            Some(ship) if self.defeated() => ShotOutcome::Defeated(ship.kind()),
            Some(ship) => ShotOutcome::Sunk(ship.kind()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ships::{Fleet, Orientation};

    fn small_board() -> Board {
        let fleet = Fleet::new().with(ShipKind::TWO, 1).with(ShipKind::ONE, 1);
        let mut builder = FleetBuilder::new(Dimensions::new(4, 4), fleet);
        builder
            .place(ShipKind::TWO, Coordinate::new(0, 0), Orientation::Horizontal)
            .unwrap();
        builder
            .place(ShipKind::ONE, Coordinate::new(3, 3), Orientation::Horizontal)
            .unwrap();
        builder.build().unwrap()
    }

    #[test]
    fn cell_refs_point_at_ships() {
        let board = small_board();
        assert_eq!(board.ship_cells(), 3);
        let cell = board.get(Coordinate::new(0, 1)).unwrap();
        assert_eq!(cell.coord(), Coordinate::new(0, 1));
        assert!(cell.cell().is_ship());
        assert_eq!(cell.ship().unwrap().kind(), ShipKind::TWO);
        assert_eq!(
            cell.ship().unwrap().coords().collect::<Vec<_>>(),
            vec![Coordinate::new(0, 0), Coordinate::new(0, 1)]
        );
        assert!(board.get(Coordinate::new(4, 0)).is_none());
        assert!(!board.is_ship(Coordinate::new(1, 1)));
        assert_eq!(board.ship_kind_at(Coordinate::new(3, 3)), Some(ShipKind::ONE));
    }

    #[test]
    fn shooting_reports_hits_sinks_and_defeat() {
        let mut board = small_board();
        assert_eq!(board.shoot(Coordinate::new(2, 2)), Ok(ShotOutcome::Miss));
        assert_eq!(
            board.shoot(Coordinate::new(0, 0)),
            Ok(ShotOutcome::Hit(ShipKind::TWO))
        );
        assert_eq!(
            board.shoot(Coordinate::new(0, 0)).unwrap_err().reason(),
            CannotShootReason::AlreadyShot
        );
        assert_eq!(
            board.shoot(Coordinate::new(0, 1)),
            Ok(ShotOutcome::Sunk(ShipKind::TWO))
        );
        assert_eq!(
            board.shoot(Coordinate::new(9, 9)).unwrap_err().reason(),
            CannotShootReason::OutOfBounds
        );
        assert!(!board.defeated());
        assert_eq!(
            board.shoot(Coordinate::new(3, 3)),
            Ok(ShotOutcome::Defeated(ShipKind::ONE))
        );
        assert!(board.defeated());
        assert_eq!(
            board.shoot(Coordinate::new(1, 1)).unwrap_err().reason(),
            CannotShootReason::AlreadyDefeated
        );
    }

    #[test]
    fn ship_hits_track_damage() {
        let mut board = small_board();
        board.shoot(Coordinate::new(0, 1)).unwrap();
        let ship = board.get(Coordinate::new(0, 0)).unwrap().ship().unwrap();
        assert_eq!(
            ship.hits().collect::<Vec<_>>(),
            vec![(Coordinate::new(0, 0), false), (Coordinate::new(0, 1), true)]
        );
        assert!(!ship.sunk());
    }
}
