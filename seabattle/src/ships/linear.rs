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
use std::fmt;

use crate::{
    board::Coordinate,
    ships::{Orientation, ShipKind},
};

/// A straight ship placement: what kind of ship, where it starts, and which way it
/// extends.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Placement {
    /// Kind of ship being placed.
    pub kind: ShipKind,
    /// First (top-most or left-most) cell of the ship.
    pub origin: Coordinate,
    /// Direction the ship extends from the origin.
    pub orientation: Orientation,
}

impl Placement {
    /// Construct a placement.
    pub fn new(kind: ShipKind, origin: Coordinate, orientation: Orientation) -> Self {
        Self {
            kind,
            origin,
            orientation,
        }
    }

    /// Get an iterator over the cells covered by this placement.
    pub fn cells(&self) -> impl Iterator<Item = Coordinate> {
        self.kind.project(self.origin, self.orientation)
    }

    /// Recover the placement covering exactly the given cells. The cells must be
    /// sorted row-major and form a contiguous straight run; otherwise returns `None`.
    pub fn from_cells(cells: &[Coordinate]) -> Option<Placement> {
        let (&origin, rest) = cells.split_first()?;
        let orientation = match rest.first() {
            None => return Some(Placement::new(ShipKind::ONE, origin, Orientation::Horizontal)),
            Some(&next) if next == origin + Coordinate::RIGHT => Orientation::Horizontal,
            Some(&next) if next == origin + Coordinate::DOWN => Orientation::Vertical,
            Some(_) => return None,
        };
        let placement = Placement::new(ShipKind::new(cells.len()), origin, orientation);
        if placement.cells().eq(cells.iter().copied()) {
            Some(placement)
        } else {
            None
        }
    }

    /// Returns true if this placement covers the given cell.
    pub fn covers(&self, coord: Coordinate) -> bool {
        self.cells().any(|cell| cell == coord)
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let dir = match self.orientation {
            Orientation::Horizontal => "right",
            Orientation::Vertical => "down",
        };
        write!(f, "{} at {} going {}", self.kind, self.origin, dir)
    }
}
