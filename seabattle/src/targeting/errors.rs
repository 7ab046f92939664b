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
use thiserror::Error;

use crate::board::{Coordinate, Dimensions};

/// Error returned when the targeting engine cannot pick a shot.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
pub enum TargetingError {
    /// There is nothing left to shoot at: every ship of the fleet has already been
    /// found or every cell has been shot. The game should already be over.
    #[error("no target is left; the opponent's fleet has already been found")]
    NoTarget,

    /// The knowledge map does not cover the board the engine was configured for.
    #[error("knowledge map is {found:?} but the board is {expected:?}")]
    DimensionMismatch {
        /// Dimensions the engine was built with.
        expected: Dimensions,
        /// Dimensions of the knowledge map passed in.
        found: Dimensions,
    },

    /// No fleet placement agrees with what is known. Only happens if the knowledge
    /// map does not describe a legal board.
    #[error("no fleet placement is consistent with the known cells")]
    NoHypothesis,

    /// A generated hypothesis contradicts a resolved cell. This is a defect in the
    /// engine, not something a caller can recover from.
    #[error("hypothesis contradicts the known state of cell {0}")]
    InconsistentHypothesis(Coordinate),
}
