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
use std::{fmt, ops::Add};

use enumflags2::BitFlags;

/// Kinds of adjacency between two cells of the grid.
#[derive(BitFlags, Debug, Copy, Clone, Eq, PartialEq)]
#[repr(u8)]
pub enum Adjacency {
    /// Cells that share an edge: up, right, down and left.
    Edge = 0b01,
    /// Cells that only share a corner.
    Vertex = 0b10,
}

/// Offsets of the edge neighbors, clockwise from up.
static EDGE_OFFSETS: [(i32, i32); 4] = [(-1, 0), (0, 1), (1, 0), (0, -1)];

/// Offsets of the vertex neighbors.
static VERTEX_OFFSETS: [(i32, i32); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// The coordinates of a cell in the grid.
///
/// Ordering is row-major: rows are compared first, then columns. Coordinates are not
/// tied to any particular board, so they may be negative or otherwise outside of the
/// grid. Checking bounds is left to [`Dimensions`][crate::board::Dimensions].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Coordinate {
    /// Vertical position of the cell.
    pub row: i32,
    /// Horizontal position of the cell.
    pub col: i32,
}

impl Coordinate {
    /// Delta of one step down a column.
    pub const DOWN: Coordinate = Coordinate { row: 1, col: 0 };

    /// Delta of one step right along a row.
    pub const RIGHT: Coordinate = Coordinate { row: 0, col: 1 };

    /// Construct a [`Coordinate`] from the given `row` and `col`.
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Iterate the neighbors of this coordinate with the requested kinds of adjacency.
    /// Edge neighbors are always yielded before vertex neighbors.
    pub fn neighbors<B: Into<BitFlags<Adjacency>>>(
        self,
        adjacency: B,
    ) -> impl Iterator<Item = Coordinate> {
        let adjacency = adjacency.into();
        let none: &'static [(i32, i32)] = &[];
        let edge = if adjacency.contains(Adjacency::Edge) {
            &EDGE_OFFSETS[..]
        } else {
            none
        };
        let vertex = if adjacency.contains(Adjacency::Vertex) {
            &VERTEX_OFFSETS[..]
        } else {
            none
        };
        edge.iter().chain(vertex).map(move |&delta| self + delta)
    }

    /// The 4 cells sharing an edge with this one.
    pub fn edge_neighbors(self) -> impl Iterator<Item = Coordinate> {
        self.neighbors(Adjacency::Edge)
    }

    /// The 4 cells sharing only a corner with this one.
    pub fn vertex_neighbors(self) -> impl Iterator<Item = Coordinate> {
        self.neighbors(Adjacency::Vertex)
    }

    /// All 8 surrounding cells.
    pub fn all_neighbors(self) -> impl Iterator<Item = Coordinate> {
        self.neighbors(BitFlags::all())
    }
}

impl Add for Coordinate {
    type Output = Coordinate;

    /// Offset this coordinate by a delta.
    fn add(self, delta: Coordinate) -> Coordinate {
        Coordinate::new(self.row + delta.row, self.col + delta.col)
    }
}

impl Add<(i32, i32)> for Coordinate {
    type Output = Coordinate;

    /// Offset this coordinate by a `(row, col)` delta.
    fn add(self, (row, col): (i32, i32)) -> Coordinate {
        Coordinate::new(self.row + row, self.col + col)
    }
}

impl From<(i32, i32)> for Coordinate {
    /// Construct a [`Coordinate`] from the given `(row, col)` pair.
    fn from((row, col): (i32, i32)) -> Self {
        Self::new(row, col)
    }
}

impl From<Coordinate> for (i32, i32) {
    /// Convert the [`Coordinate`] into a `(row, col)` pair.
    fn from(coord: Coordinate) -> Self {
        (coord.row, coord.col)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn set(coords: &[(i32, i32)]) -> HashSet<Coordinate> {
        coords.iter().copied().map(Coordinate::from).collect()
    }

    #[test]
    fn all_neighbors_of_origin() {
        let found: HashSet<_> = Coordinate::new(0, 0).all_neighbors().collect();
        assert_eq!(
            found,
            set(&[
                (-1, -1),
                (-1, 0),
                (-1, 1),
                (0, -1),
                (0, 1),
                (1, -1),
                (1, 0),
                (1, 1)
            ])
        );
    }

    #[test]
    fn edge_neighbors_of_negative_cell() {
        let found: HashSet<_> = Coordinate::new(-50, -100).edge_neighbors().collect();
        assert_eq!(
            found,
            set(&[(-49, -100), (-50, -99), (-51, -100), (-50, -101)])
        );
    }

    #[test]
    fn vertex_neighbors_of_positive_cell() {
        let found: HashSet<_> = Coordinate::new(50, 100).vertex_neighbors().collect();
        assert_eq!(found, set(&[(49, 99), (49, 101), (51, 99), (51, 101)]));
    }

    #[test]
    fn edge_neighbors_come_first() {
        let all: Vec<_> = Coordinate::new(3, 3).all_neighbors().collect();
        let edge: Vec<_> = Coordinate::new(3, 3).edge_neighbors().collect();
        assert_eq!(&all[..4], &edge[..]);
    }

    #[test]
    fn add_delta() {
        assert_eq!(
            Coordinate::new(-12, 13) + Coordinate::new(-10, -44),
            Coordinate::new(-22, -31)
        );
        assert_eq!(Coordinate::new(12, 13) + (0, 0), Coordinate::new(12, 13));
        assert_eq!(Coordinate::new(2, 2) + Coordinate::DOWN, Coordinate::new(3, 2));
        assert_eq!(Coordinate::new(2, 2) + Coordinate::RIGHT, Coordinate::new(2, 3));
    }

    #[test]
    fn row_major_order() {
        assert!(Coordinate::new(54, 2) > Coordinate::new(4, 200));
        assert!(Coordinate::new(4, 1) < Coordinate::new(4, 2));
        assert_eq!(
            Coordinate::new(54, 2).cmp(&Coordinate::new(54, 2)),
            std::cmp::Ordering::Equal
        );
    }
}
