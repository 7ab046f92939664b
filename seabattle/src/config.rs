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
//! Game setup parameters, fixed for the lifetime of a game.
use crate::{board::Dimensions, ships::Fleet};

/// Board size and fleet composition shared by both players.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct GameConfig {
    dimensions: Dimensions,
    fleet: Fleet,
}

impl GameConfig {
    /// Construct a config from the given board dimensions and fleet.
    pub fn new(dimensions: Dimensions, fleet: Fleet) -> Self {
        Self { dimensions, fleet }
    }

    /// Size of each player's board.
    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Ships each player places.
    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }
}

impl Default for GameConfig {
    /// A 10x10 board with the standard fleet.
    fn default() -> Self {
        Self::new(Dimensions::default(), Fleet::standard())
    }
}
