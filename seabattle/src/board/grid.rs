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
//! Dense cell storage shared between the builder, the finished board, and the
//! knowledge map.

use std::{
    borrow::Borrow,
    ops::{Index, IndexMut},
};

use crate::board::{Coordinate, Dimensions};

/// A rectangular grid holding one `T` per cell.
#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) struct Grid<T> {
    /// Dimensions of this grid.
    pub(crate) dim: Dimensions,
    /// Cells in row-major order.
    pub(crate) cells: Box<[T]>,
}

impl<T: Default> Grid<T> {
    pub(crate) fn new(dim: Dimensions) -> Self {
        let cells = (0..dim.total_size()).map(|_| Default::default()).collect();
        Self { dim, cells }
    }
}

impl<T> Grid<T> {
    /// Get a reference to the cell at the given [`Coordinate`].
    pub(crate) fn get<B: Borrow<Coordinate>>(&self, coord: B) -> Option<&T> {
        self.dim.try_linearize(coord).and_then(|i| self.cells.get(i))
    }

    /// Get a mutable reference to the cell at the given [`Coordinate`].
    pub(crate) fn get_mut<B: Borrow<Coordinate>>(&mut self, coord: B) -> Option<&mut T> {
        self.dim
            .try_linearize(coord)
            .and_then(move |i| self.cells.get_mut(i))
    }

    /// Iterate every cell together with its coordinate, in row-major order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (Coordinate, &T)> {
        let dim = self.dim;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (dim.un_linearize(i), cell))
    }
}

impl<T, B: Borrow<Coordinate>> Index<B> for Grid<T> {
    type Output = T;

    fn index(&self, coord: B) -> &Self::Output {
        self.get(coord).expect("coordinate out of bounds")
    }
}

impl<T, B: Borrow<Coordinate>> IndexMut<B> for Grid<T> {
    fn index_mut(&mut self, coord: B) -> &mut Self::Output {
        self.get_mut(coord).expect("coordinate out of bounds")
    }
}
