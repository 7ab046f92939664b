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
//! Types used for defining ships, their placements, and the fleet they make up.
use std::fmt;

use crate::board::Coordinate;

pub use self::{
    fleet::{Fleet, FleetParseError},
    linear::Placement,
};

mod fleet;
mod linear;

/// The kind of a ship, identified by its hull length.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ShipKind(usize);

impl ShipKind {
    /// Single-cell ship.
    pub const ONE: ShipKind = ShipKind(1);
    /// Two-cell ship.
    pub const TWO: ShipKind = ShipKind(2);
    /// Three-cell ship.
    pub const THREE: ShipKind = ShipKind(3);
    /// Four-cell ship.
    pub const FOUR: ShipKind = ShipKind(4);

    /// Construct a ship kind with the specified length. Panics if len is 0.
    pub fn new(len: usize) -> Self {
        assert!(len > 0, "ships must have at least one segment");
        ShipKind(len)
    }

    /// Get the length of this ship.
    pub fn len(self) -> usize {
        self.0
    }

    /// Orientations that produce distinct placements for this kind. A single-cell ship
    /// looks the same either way, so it only has one.
    pub fn orientations(self) -> &'static [Orientation] {
        if self.0 == 1 {
            &[Orientation::Horizontal]
        } else {
            &Orientation::ALL
        }
    }

    /// Get the cells this ship would occupy if it started at `origin` and extended in
    /// the given orientation. Does not account for bounds.
    pub fn project(
        self,
        origin: Coordinate,
        orientation: Orientation,
    ) -> impl Iterator<Item = Coordinate> {
        let delta = orientation.delta();
        (0..self.0 as i32)
            .map(move |step| origin + Coordinate::new(delta.row * step, delta.col * step))
    }
}

impl fmt::Display for ShipKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}-deck", self.0)
    }
}

/// Direction a ship extends from its origin cell.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Orientation {
    /// Extends to the right along a row.
    Horizontal,
    /// Extends downwards along a column.
    Vertical,
}

impl Orientation {
    /// Both orientations.
    pub const ALL: [Orientation; 2] = [Orientation::Horizontal, Orientation::Vertical];

    /// The delta between consecutive cells of a ship with this orientation.
    pub fn delta(self) -> Coordinate {
        match self {
            Orientation::Horizontal => Coordinate::RIGHT,
            Orientation::Vertical => Coordinate::DOWN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projects_straight_runs() {
        let cells: Vec<_> = ShipKind::THREE
            .project(Coordinate::new(2, 1), Orientation::Vertical)
            .collect();
        assert_eq!(
            cells,
            vec![
                Coordinate::new(2, 1),
                Coordinate::new(3, 1),
                Coordinate::new(4, 1)
            ]
        );
        let cells: Vec<_> = ShipKind::TWO
            .project(Coordinate::new(0, 8), Orientation::Horizontal)
            .collect();
        assert_eq!(cells, vec![Coordinate::new(0, 8), Coordinate::new(0, 9)]);
    }

    #[test]
    fn single_cell_has_one_orientation() {
        assert_eq!(ShipKind::ONE.orientations().len(), 1);
        assert_eq!(ShipKind::FOUR.orientations().len(), 2);
    }

    #[test]
    #[should_panic]
    fn zero_length_panics() {
        ShipKind::new(0);
    }
}
