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
//! Random placement of a whole fleet.
//!
//! Placement is an exhaustive backtracking search with randomized move order: for each
//! ship still to be placed, largest first, every legal placement is collected, the
//! candidates are shuffled, and each one is tried in turn until the rest of the fleet
//! fits. The search space is finite, so an impossible board yields `None` rather than
//! looping forever.
use log::{debug, trace};
use rand::{seq::SliceRandom, Rng};

use crate::{
    board::{Board, Coordinate, FleetBuilder},
    config::GameConfig,
    ships::{Placement, ShipKind},
};

/// Randomly completes the placement held by a [`FleetBuilder`].
#[derive(Debug)]
pub struct FleetGenerator<'a> {
    builder: &'a mut FleetBuilder,
}

impl<'a> FleetGenerator<'a> {
    /// Generate into the given builder. Ships already on the builder stay where they
    /// are.
    pub fn new(builder: &'a mut FleetBuilder) -> Self {
        Self { builder }
    }

    /// Place every remaining ship so that each cell it covers passes `usable`.
    ///
    /// On success the builder holds the full placement and the finished [`Board`] is
    /// returned. On failure returns `None` and the builder is left exactly as it was.
    pub fn generate<F, R>(&mut self, usable: F, rng: &mut R) -> Option<Board>
    where
        F: Fn(Coordinate) -> bool,
        R: Rng + ?Sized,
    {
        let mut pending = self.builder.ships_left().ships();
        // Popped from the back, so the largest ship goes first.
        pending.reverse();
        let total = pending.len();
        if self.place_rest(&usable, &mut pending, rng) {
            debug!("placed {} ships", total);
            self.builder.build()
        } else {
            debug!("no placement exists for the remaining {} ships", total);
            None
        }
    }

    fn place_rest<R>(
        &mut self,
        usable: &dyn Fn(Coordinate) -> bool,
        pending: &mut Vec<ShipKind>,
        rng: &mut R,
    ) -> bool
    where
        R: Rng + ?Sized,
    {
        let kind = match pending.pop() {
            Some(kind) => kind,
            None => return true,
        };
        let mut candidates = self.candidates(kind, usable);
        trace!("{} candidates for {}", candidates.len(), kind);
        candidates.shuffle(rng);
        for placement in candidates {
            if self
                .builder
                .place(placement.kind, placement.origin, placement.orientation)
                .is_err()
            {
                continue;
            }
            if self.rest_feasible(pending, usable) && self.place_rest(usable, pending, rng) {
                return true;
            }
            self.builder
                .remove(placement.kind, placement.origin, placement.orientation)
                .expect("a ship that was just placed can be removed");
        }
        pending.push(kind);
        false
    }

    /// Every legal placement of `kind` that only covers usable cells.
    fn candidates(&self, kind: ShipKind, usable: &dyn Fn(Coordinate) -> bool) -> Vec<Placement> {
        let builder = &*self.builder;
        builder
            .positions()
            .flat_map(|origin| {
                kind.orientations()
                    .iter()
                    .map(move |&orientation| Placement::new(kind, origin, orientation))
            })
            .filter(|p| builder.can_place(p.kind, p.origin, p.orientation, usable))
            .collect()
    }

    /// Returns true if every distinct kind still pending has somewhere to go.
    fn rest_feasible(&self, pending: &[ShipKind], usable: &dyn Fn(Coordinate) -> bool) -> bool {
        let mut kinds = pending.to_vec();
        kinds.sort_unstable();
        kinds.dedup();
        kinds.into_iter().all(|kind| {
            self.builder.positions().any(|origin| {
                kind.orientations().iter().any(|&orientation| {
                    self.builder.can_place(kind, origin, orientation, usable)
                })
            })
        })
    }
}

/// Randomly place the full fleet of `config` on an empty board.
pub fn generate_fleet<R: Rng + ?Sized>(config: &GameConfig, rng: &mut R) -> Option<Board> {
    let mut builder = FleetBuilder::from_config(config);
    FleetGenerator::new(&mut builder).generate(|_| true, rng)
}
