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
use std::{collections::BTreeMap, fmt, iter, str::FromStr};

use thiserror::Error;

use crate::ships::ShipKind;

/// Number of ships of each kind, either in a whole fleet or still waiting to be placed.
///
/// Kinds with a count of zero are never stored, so two fleets compare equal whenever
/// they hold the same ships.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Fleet {
    counts: BTreeMap<ShipKind, usize>,
}

impl Fleet {
    /// Construct an empty fleet.
    pub fn new() -> Self {
        Self::default()
    }

    /// The classic fleet: one 4-deck, two 3-deck, three 2-deck and four 1-deck ships.
    pub fn standard() -> Self {
        Self::new()
            .with(ShipKind::FOUR, 1)
            .with(ShipKind::THREE, 2)
            .with(ShipKind::TWO, 3)
            .with(ShipKind::ONE, 4)
    }

    /// Set the number of ships of the given kind.
    pub fn with(mut self, kind: ShipKind, count: usize) -> Self {
        if count == 0 {
            self.counts.remove(&kind);
        } else {
            self.counts.insert(kind, count);
        }
        self
    }

    /// Number of ships of the given kind.
    pub fn count(&self, kind: ShipKind) -> usize {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    /// Iterate `(kind, count)` pairs, largest kind first.
    pub fn iter(&self) -> impl Iterator<Item = (ShipKind, usize)> + '_ {
        self.counts.iter().rev().map(|(&kind, &count)| (kind, count))
    }

    /// Iterate the kinds that have at least one ship, largest first.
    pub fn kinds(&self) -> impl Iterator<Item = ShipKind> + '_ {
        self.counts.keys().rev().copied()
    }

    /// Expand the fleet into one entry per ship, largest first.
    pub fn ships(&self) -> Vec<ShipKind> {
        self.iter()
            .flat_map(|(kind, count)| iter::repeat(kind).take(count))
            .collect()
    }

    /// Total number of ships.
    pub fn total_ships(&self) -> usize {
        self.counts.values().sum()
    }

    /// Total number of cells the ships occupy.
    pub fn total_segments(&self) -> usize {
        self.iter().map(|(kind, count)| kind.len() * count).sum()
    }

    /// Returns true if there are no ships.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Add one ship of the given kind.
    pub fn increment(&mut self, kind: ShipKind) {
        *self.counts.entry(kind).or_insert(0) += 1;
    }

    /// Take one ship of the given kind. Returns false, leaving the fleet unchanged, if
    /// there are none left.
    pub fn decrement(&mut self, kind: ShipKind) -> bool {
        match self.counts.get_mut(&kind) {
            None => false,
            Some(count) if *count == 1 => {
                self.counts.remove(&kind);
                true
            }
            Some(count) => {
                *count -= 1;
                true
            }
        }
    }
}

impl fmt::Display for Fleet {
    /// Formats as `len:count` pairs, e.g. `4:1,3:2,2:3,1:4`.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, (kind, count)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}:{}", kind.len(), count)?;
        }
        Ok(())
    }
}

/// Error returned when parsing a [`Fleet`] from text fails.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum FleetParseError {
    /// An entry was not of the form `len:count`.
    #[error("invalid fleet entry {0:?}, expected len:count")]
    Malformed(String),
    /// A ship length of zero was given.
    #[error("ships must have a length of at least 1")]
    ZeroLength,
    /// The same ship length appeared twice.
    #[error("ship length {0} is listed more than once")]
    Duplicate(usize),
    /// The fleet contained no ships.
    #[error("the fleet has no ships")]
    Empty,
}

impl FromStr for Fleet {
    type Err = FleetParseError;

    /// Parse a comma separated list of `len:count` pairs.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut fleet = Fleet::new();
        let mut seen = Vec::new();
        for entry in s.split(',').map(str::trim).filter(|entry| !entry.is_empty()) {
            let malformed = || FleetParseError::Malformed(entry.to_owned());
            let mut parts = entry.splitn(2, ':');
            let len: usize = parts
                .next()
                .and_then(|part| part.trim().parse().ok())
                .ok_or_else(malformed)?;
            let count: usize = parts
                .next()
                .and_then(|part| part.trim().parse().ok())
                .ok_or_else(malformed)?;
            if len == 0 {
                return Err(FleetParseError::ZeroLength);
            }
            if seen.contains(&len) {
                return Err(FleetParseError::Duplicate(len));
            }
            seen.push(len);
            fleet = fleet.with(ShipKind::new(len), count);
        }
        if fleet.is_empty() {
            Err(FleetParseError::Empty)
        } else {
            Ok(fleet)
        }
    }
}
