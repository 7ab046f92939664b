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
//! Computer opponent for the classic game of Battleship.
//!
//! The crate places fleets at random under the usual rules (straight ships, no two
//! ships touching, even at a corner) and picks shots against an opponent by drawing a
//! random fleet that agrees with every shot fired so far.
//!
//! Board size and fleet composition are configured through [`GameConfig`]; nothing
//! assumes the classic 10x10 board.
//!
//! ```
//! use rand::{rngs::StdRng, SeedableRng};
//! use seabattle::{
//!     generate_fleet, GameConfig, KnowledgeMap, ShotOutcome, TargetingEngine,
//! };
//!
//! let config = GameConfig::default();
//! let mut rng = StdRng::seed_from_u64(1);
//! let mut hidden = generate_fleet(&config, &mut rng).unwrap();
//!
//! let engine = TargetingEngine::new(config.clone());
//! let mut knowledge = KnowledgeMap::new(config.dimensions());
//! loop {
//!     let target = engine.next_target(&knowledge, &mut rng).unwrap();
//!     let outcome = hidden.shoot(target).unwrap();
//!     knowledge.record(target, outcome).unwrap();
//!     if let ShotOutcome::Defeated(_) = outcome {
//!         break;
//!     }
//! }
//! assert!(hidden.defeated());
//! ```

pub use crate::{
    board::{
        Board, Cell, Coordinate, Dimensions, FleetBuilder, ShipId, ShotError, ShotOutcome,
    },
    config::GameConfig,
    generator::{generate_fleet, FleetGenerator},
    knowledge::{Knowledge, KnowledgeError, KnowledgeMap},
    player::{computer_player, ComputerPlayer, PlayerError},
    ships::{Fleet, Orientation, Placement, ShipKind},
    targeting::{TargetingEngine, TargetingError},
};

pub mod board;
pub mod config;
pub mod generator;
pub mod knowledge;
pub mod player;
pub mod ships;
pub mod targeting;
