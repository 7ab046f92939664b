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
//! Rectangular board dimensions.
use std::{borrow::Borrow, convert::TryFrom};

use crate::board::Coordinate;

/// Simple rectangular dimensions.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Dimensions {
    /// Width of the board. This cooresponds to the `col` [`Coordinate`].
    width: usize,
    /// Height of the board. This cooresponds to the `row` [`Coordinate`].
    height: usize,
}

impl Dimensions {
    /// Create new [`Dimensions`] with the specified width and height.
    /// Panics if `width * height` exceeds `usize::max_value()`, if either side does not
    /// fit in an `i32`, or if `width` or `height` is 0.
    pub fn new(width: usize, height: usize) -> Self {
        match Self::try_new(width, height) {
            Some(dim) => dim,
            None => panic!("invalid board dimensions {}x{}", width, height),
        }
    }

    /// Create new [`Dimensions`] with the specified width and height.
    /// Returns `None` if `width * height` exceeds `usize::max_value()`, if either side
    /// does not fit in an `i32`, or if `width` or `height` is 0.
    pub fn try_new(width: usize, height: usize) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        i32::try_from(width).ok()?;
        i32::try_from(height).ok()?;
        width
            .checked_mul(height)
            .map(|_| Self { width, height })
    }

    /// Get the width of these [`Dimensions`].
    pub fn width(&self) -> usize {
        self.width
    }

    /// Get the height of these [`Dimensions`].
    pub fn height(&self) -> usize {
        self.height
    }

    /// Compute the total number of cells.
    pub fn total_size(&self) -> usize {
        self.width * self.height
    }

    /// Returns true if the coordinate lies inside the board.
    pub fn contains<B: Borrow<Coordinate>>(&self, coord: B) -> bool {
        self.try_linearize(coord).is_some()
    }

    /// Convert a coordinate to a linear index within these dimensions.
    /// Returns `None` if the coordinate is out of bounds.
    pub fn try_linearize<B: Borrow<Coordinate>>(&self, coord: B) -> Option<usize> {
        let c = coord.borrow();
        let row = usize::try_from(c.row).ok()?;
        let col = usize::try_from(c.col).ok()?;
        if row < self.height && col < self.width {
            Some(row * self.width + col)
        } else {
            None
        }
    }

    /// Convert a linear index back into a [`Coordinate`]. Panics if `idx` is not less
    /// than [`total_size`][Self::total_size].
    pub fn un_linearize(&self, idx: usize) -> Coordinate {
        assert!(idx < self.total_size(), "index {} out of bounds", idx);
        // Both sides fit in i32, checked at construction.
        Coordinate::new((idx / self.width) as i32, (idx % self.width) as i32)
    }

    /// Get an iterator over every coordinate of the grid in row-major order. The
    /// iterator does not borrow the dimensions, so it can be restarted by calling this
    /// again.
    pub fn positions(&self) -> impl Iterator<Item = Coordinate> {
        let dim = *self;
        (0..dim.total_size()).map(move |idx| dim.un_linearize(idx))
    }

    /// Get an iterator over rows of this grid. Each row is an iterator over the
    /// coordinates of that row.
    pub fn rows(&self) -> impl Iterator<Item = impl Iterator<Item = Coordinate>> {
        let width = self.width as i32;
        (0..self.height as i32).map(move |row| (0..width).map(move |col| Coordinate::new(row, col)))
    }
}

impl Default for Dimensions {
    /// Construct the default dimensions, a 10x10 board.
    fn default() -> Self {
        Self {
            width: 10,
            height: 10,
        }
    }
}
