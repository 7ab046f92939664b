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
//! A computer opponent: its own fleet, what it knows of yours, and how it aims.
//!
//! The player never drives turns itself. A shell asks it for a target, applies the
//! shot to the other board, and hands the outcome back with
//! [`record_result`][ComputerPlayer::record_result].
use log::info;
use rand::Rng;
use thiserror::Error;

use crate::{
    board::{Board, Coordinate, Dimensions, ShotError, ShotOutcome},
    config::GameConfig,
    generator::generate_fleet,
    knowledge::{KnowledgeError, KnowledgeMap},
    targeting::{TargetingEngine, TargetingError},
};

/// Error returned when a computer player cannot be set up.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
pub enum PlayerError {
    /// The fleet does not fit on the board.
    #[error("the fleet cannot be placed on the board")]
    NoFleetPlacement,
    /// The supplied board does not match the game's dimensions.
    #[error("board is {found:?} but the game is played on {expected:?}")]
    DimensionMismatch {
        /// Dimensions from the game config.
        expected: Dimensions,
        /// Dimensions of the supplied board.
        found: Dimensions,
    },
}

/// A player controlled by the [`TargetingEngine`].
#[derive(Debug)]
pub struct ComputerPlayer<R> {
    board: Board,
    knowledge: KnowledgeMap,
    engine: TargetingEngine,
    rng: R,
}

impl<R: Rng> ComputerPlayer<R> {
    /// Construct a player that defends the given board.
    pub fn with_board(config: &GameConfig, board: Board, rng: R) -> Result<Self, PlayerError> {
        let expected = config.dimensions();
        let found = board.dimensions();
        if expected != found {
            return Err(PlayerError::DimensionMismatch { expected, found });
        }
        Ok(Self {
            board,
            knowledge: KnowledgeMap::new(expected),
            engine: TargetingEngine::new(config.clone()),
            rng,
        })
    }

    /// This player's own board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// What this player has learned about the opponent's board.
    pub fn knowledge(&self) -> &KnowledgeMap {
        &self.knowledge
    }

    /// Pick the next cell of the opponent's board to shoot.
    pub fn next_target(&mut self) -> Result<Coordinate, TargetingError> {
        self.engine.next_target(&self.knowledge, &mut self.rng)
    }

    /// Learn the outcome of a shot this player fired.
    pub fn record_result(
        &mut self,
        coord: Coordinate,
        outcome: ShotOutcome,
    ) -> Result<(), KnowledgeError> {
        self.knowledge.record(coord, outcome)
    }

    /// Take a shot from the opponent.
    pub fn receive_shot(&mut self, coord: Coordinate) -> Result<ShotOutcome, ShotError> {
        self.board.shoot(coord)
    }

    /// Returns true once every ship of this player has been sunk.
    pub fn defeated(&self) -> bool {
        self.board.defeated()
    }
}

/// Set up a computer player with a randomly placed fleet.
pub fn computer_player<R: Rng>(
    config: &GameConfig,
    mut rng: R,
) -> Result<ComputerPlayer<R>, PlayerError> {
    let board = generate_fleet(config, &mut rng).ok_or(PlayerError::NoFleetPlacement)?;
    info!(
        "computer fleet of {} ships placed on {}x{} board",
        config.fleet().total_ships(),
        config.dimensions().width(),
        config.dimensions().height()
    );
    ComputerPlayer::with_board(config, board, rng)
}
