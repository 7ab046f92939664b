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
//! Errors used by the `Board` and `FleetBuilder`.

use std::fmt::{self, Debug};

use thiserror::Error;

use crate::board::Coordinate;

/// Reason why a ship (or a single ship cell) could not be placed or removed.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
pub enum CannotPlaceReason {
    /// One or more of the cells lies outside the board.
    #[error("the ship does not fit inside the board")]
    OutOfBounds,
    /// One or more of the cells was already occupied.
    #[error("the requested position was already occupied")]
    AlreadyOccupied,
    /// A cell would be adjacent, by edge or corner, to another ship.
    #[error("the ship would touch another ship")]
    TouchesShip,
    /// All ships of the required length have already been placed.
    #[error("no ships of that length are left to place")]
    NoShipsLeft,
    /// The cells joined by a single-cell edit would not form a straight ship.
    #[error("the cells would not form a straight ship")]
    InvalidShape,
    /// The cells given for removal do not hold exactly the requested ship.
    #[error("no such ship is placed there")]
    NotPlaced,
}

/// Error caused when attempting to place or remove a ship in an invalid position.
/// `P` is whatever was being placed: a whole [`Placement`][crate::ships::Placement]
/// or a single [`Coordinate`].
#[derive(Error)]
#[error("could not change ship placement: {reason}")]
pub struct PlaceError<P> {
    #[source]
    reason: CannotPlaceReason,
    placement: P,
}

impl<P> Debug for PlaceError<P> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl<P> PlaceError<P> {
    /// Construct a placement error from a reason and placement.
    pub(crate) fn new(reason: CannotPlaceReason, placement: P) -> Self {
        Self { reason, placement }
    }

    /// Get the reason placement was aborted.
    pub fn reason(&self) -> CannotPlaceReason {
        self.reason
    }

    /// Get a reference to the placement that was attempted.
    pub fn placement(&self) -> &P {
        &self.placement
    }

    /// Extract the placement from this error.
    pub fn into_placement(self) -> P {
        self.placement
    }
}

/// Reason why a particular tile could not be shot.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
pub enum CannotShootReason {
    /// Every ship on the board was already sunk.
    #[error("all ships on the board are already sunk")]
    AlreadyDefeated,

    /// The cell selected was out of bounds on the board.
    #[error("the target coordinate is out of bounds")]
    OutOfBounds,

    /// A shot has already been fired at that cell.
    #[error("the target cell was already shot")]
    AlreadyShot,
}

/// Error returned when trying to shoot a cell.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
#[error("could not shoot cell {coord}: {reason}")]
pub struct ShotError {
    /// Reason why the cell could not be shot.
    reason: CannotShootReason,

    /// The coordinates of the cell.
    coord: Coordinate,
}

impl ShotError {
    /// Construct a shot error with the given reason for the specified cell.
    pub(crate) fn new(reason: CannotShootReason, coord: Coordinate) -> Self {
        Self { reason, coord }
    }

    /// Get the reason the shot failed.
    pub fn reason(&self) -> CannotShootReason {
        self.reason
    }

    /// Get the coordinate of the shot cell.
    pub fn coord(&self) -> Coordinate {
        self.coord
    }
}
