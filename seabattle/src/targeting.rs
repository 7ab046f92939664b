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
//! Choosing the next shot.
//!
//! Every decision starts from a *hypothesis*: a complete, legal placement of the
//! opponent's fleet that agrees with everything in the [`KnowledgeMap`]. Known ships
//! that are fully bounded are placed as they are. A ship that has been hit but whose
//! extent is still open (a *damaged* ship) is extended along its row or column into a
//! ship the fleet still has room for. The rest of the fleet is filled in at random.
//!
//! While a damaged ship exists, the engine shoots the open cells next to it that the
//! hypothesis says hold a ship. Otherwise it shoots an unknown cell the hypothesis
//! covers, preferring cells of longer ships.
use std::cmp::Reverse;

use log::{debug, trace, warn};
use rand::{seq::SliceRandom, Rng};

use crate::{
    board::{Board, Coordinate, FleetBuilder},
    config::GameConfig,
    generator::FleetGenerator,
    knowledge::{Knowledge, KnowledgeMap},
    ships::{Orientation, Placement},
};

pub use self::errors::TargetingError;

mod errors;

/// Picks shots against an opponent playing with a known fleet on a known board size.
#[derive(Debug, Clone)]
pub struct TargetingEngine {
    config: GameConfig,
}

impl TargetingEngine {
    /// Construct an engine for games played with the given config.
    pub fn new(config: GameConfig) -> Self {
        Self { config }
    }

    /// The board size and fleet this engine assumes.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Choose the next cell to shoot.
    pub fn next_target<R>(
        &self,
        knowledge: &KnowledgeMap,
        rng: &mut R,
    ) -> Result<Coordinate, TargetingError>
    where
        R: Rng + ?Sized,
    {
        self.check_dimensions(knowledge)?;
        let known_ship_cells = knowledge.resolved().filter(|&(_, is_ship)| is_ship).count();
        if knowledge.unknown_count() == 0
            || known_ship_cells >= self.config.fleet().total_segments()
        {
            return Err(TargetingError::NoTarget);
        }

        let damaged = damaged_clusters(knowledge);
        let hypothesis = self.build_hypothesis(knowledge, &damaged, rng)?;

        if let Some(cluster) = damaged.first() {
            let mut open: Vec<Coordinate> = cluster
                .iter()
                .flat_map(|cell| cell.edge_neighbors())
                .filter(|&n| knowledge.is_unknown(n) && hypothesis.is_ship(n))
                .collect();
            open.sort_unstable();
            open.dedup();
            open.shuffle(rng);
            if let Some(&target) = open.first() {
                debug!(
                    "finishing damaged ship at {} ({} cells known), shooting {}",
                    cluster[0],
                    cluster.len(),
                    target
                );
                return Ok(target);
            }
            debug!(
                "hypothesis has no ship next to damaged ship at {}, searching",
                cluster[0]
            );
        }

        let target = search_target(&hypothesis, knowledge, rng)?;
        debug!("searching, shooting {}", target);
        Ok(target)
    }

    /// Generate a fleet placement consistent with everything in `knowledge`. Each call
    /// draws a fresh random hypothesis.
    pub fn hypothesize<R>(
        &self,
        knowledge: &KnowledgeMap,
        rng: &mut R,
    ) -> Result<Board, TargetingError>
    where
        R: Rng + ?Sized,
    {
        self.check_dimensions(knowledge)?;
        let damaged = damaged_clusters(knowledge);
        self.build_hypothesis(knowledge, &damaged, rng)
    }

    fn check_dimensions(&self, knowledge: &KnowledgeMap) -> Result<(), TargetingError> {
        let expected = self.config.dimensions();
        let found = knowledge.dimensions();
        if expected == found {
            Ok(())
        } else {
            Err(TargetingError::DimensionMismatch { expected, found })
        }
    }

    fn build_hypothesis<R>(
        &self,
        knowledge: &KnowledgeMap,
        damaged: &[Vec<Coordinate>],
        rng: &mut R,
    ) -> Result<Board, TargetingError>
    where
        R: Rng + ?Sized,
    {
        let usable = |coord: Coordinate| knowledge.get(coord) != Some(Knowledge::Empty);
        let mut builder = FleetBuilder::from_config(&self.config);
        seed_bounded_ships(&mut builder, knowledge, damaged)?;

        if let Some(board) = extend_damaged(&mut builder, damaged, &usable, rng) {
            return match contradiction(&board, knowledge) {
                None => Ok(board),
                Some(coord) => {
                    warn!("hypothesis contradicts known cell {}", coord);
                    Err(TargetingError::InconsistentHypothesis(coord))
                }
            };
        }
        if damaged.is_empty() {
            return Err(TargetingError::NoHypothesis);
        }

        // Every legal fleet runs a ship through each damaged cluster, so once the
        // extensions are exhausted a fleet that disagrees with the map means no legal
        // fleet agrees with it.
        debug!("no extension fits the damaged ships, falling back");
        let board = FleetGenerator::new(&mut builder)
            .generate(&usable, rng)
            .ok_or(TargetingError::NoHypothesis)?;
        match contradiction(&board, knowledge) {
            None => Ok(board),
            Some(coord) => {
                debug!("no legal fleet agrees with known cell {}", coord);
                Err(TargetingError::NoHypothesis)
            }
        }
    }
}

/// Find a ship that has been hit but whose extent is not yet known: the first known
/// ship cell, row-major, that shares an edge with an unknown cell, together with every
/// known ship cell edge-connected to it. The result is sorted row-major.
pub fn find_damaged_ship(knowledge: &KnowledgeMap) -> Option<Vec<Coordinate>> {
    knowledge
        .positions()
        .find(|&coord| is_open_ship(knowledge, coord))
        .map(|coord| knowledge.find_connected_cluster(coord, is_ship))
}

/// Returns true if every resolved cell of `knowledge` matches `board`.
pub fn is_consistent(board: &Board, knowledge: &KnowledgeMap) -> bool {
    contradiction(board, knowledge).is_none()
}

fn contradiction(board: &Board, knowledge: &KnowledgeMap) -> Option<Coordinate> {
    knowledge
        .resolved()
        .find(|&(coord, is_ship)| board.is_ship(coord) != is_ship)
        .map(|(coord, _)| coord)
}

fn is_ship(known: Knowledge) -> bool {
    known == Knowledge::Ship
}

fn is_open_ship(knowledge: &KnowledgeMap, coord: Coordinate) -> bool {
    knowledge.get(coord) == Some(Knowledge::Ship)
        && coord.edge_neighbors().any(|n| knowledge.is_unknown(n))
}

/// Every damaged ship cluster, ordered by its first open cell.
fn damaged_clusters(knowledge: &KnowledgeMap) -> Vec<Vec<Coordinate>> {
    let mut clusters: Vec<Vec<Coordinate>> = Vec::new();
    for coord in knowledge.positions() {
        if !is_open_ship(knowledge, coord)
            || clusters
                .iter()
                .any(|cluster| cluster.binary_search(&coord).is_ok())
        {
            continue;
        }
        clusters.push(knowledge.find_connected_cluster(coord, is_ship));
    }
    clusters
}

/// Place every known ship cluster that is not damaged as a ship of its own length.
fn seed_bounded_ships(
    builder: &mut FleetBuilder,
    knowledge: &KnowledgeMap,
    damaged: &[Vec<Coordinate>],
) -> Result<(), TargetingError> {
    let is_damaged = |coord: Coordinate| {
        damaged
            .iter()
            .any(|cluster| cluster.binary_search(&coord).is_ok())
    };
    for (coord, ship) in knowledge.resolved() {
        if !ship || builder.is_ship(coord) || is_damaged(coord) {
            continue;
        }
        let cluster = knowledge.find_connected_cluster(coord, is_ship);
        let placement = Placement::from_cells(&cluster).ok_or_else(|| {
            debug!("known ship at {} is not a straight line", coord);
            TargetingError::NoHypothesis
        })?;
        builder
            .place(placement.kind, placement.origin, placement.orientation)
            .map_err(|err| {
                debug!("known ship {} cannot be placed: {}", placement, err);
                TargetingError::NoHypothesis
            })?;
    }
    Ok(())
}

/// Backtrack over the ships that could contain each damaged cluster, in order, then
/// fill in the rest of the fleet. On failure the builder is left as it was.
fn extend_damaged<R>(
    builder: &mut FleetBuilder,
    damaged: &[Vec<Coordinate>],
    usable: &dyn Fn(Coordinate) -> bool,
    rng: &mut R,
) -> Option<Board>
where
    R: Rng + ?Sized,
{
    let (cluster, rest) = match damaged.split_first() {
        Some(split) => split,
        None => return FleetGenerator::new(builder).generate(usable, rng),
    };
    // An earlier extension may already run through this cluster.
    if cluster.iter().all(|&cell| builder.is_ship(cell)) {
        return extend_damaged(builder, rest, usable, rng);
    }
    let candidates = extensions(builder, cluster, usable, rng);
    trace!("{} extensions for damaged ship at {}", candidates.len(), cluster[0]);
    for placement in candidates {
        if builder
            .place(placement.kind, placement.origin, placement.orientation)
            .is_err()
        {
            continue;
        }
        if let Some(board) = extend_damaged(builder, rest, usable, rng) {
            return Some(board);
        }
        builder
            .remove(placement.kind, placement.origin, placement.orientation)
            .expect("an extension that was just placed can be removed");
    }
    None
}

/// Every placement of a ship still left to place that lies along the row or column of
/// the cluster's first cell, covers the whole cluster, and only uses usable cells.
/// Largest ships come first; placements of the same kind are shuffled.
fn extensions<R>(
    builder: &FleetBuilder,
    cluster: &[Coordinate],
    usable: &dyn Fn(Coordinate) -> bool,
    rng: &mut R,
) -> Vec<Placement>
where
    R: Rng + ?Sized,
{
    let first = cluster[0];
    let dim = builder.dimensions();
    let mut all = Vec::new();
    for kind in builder.ships_left().kinds() {
        let mut group: Vec<Placement> = kind
            .orientations()
            .iter()
            .flat_map(|&orientation| {
                let (start, steps) = match orientation {
                    Orientation::Horizontal => (Coordinate::new(first.row, 0), dim.width()),
                    Orientation::Vertical => (Coordinate::new(0, first.col), dim.height()),
                };
                let delta = orientation.delta();
                (0..steps as i32).map(move |step| {
                    let origin = start + Coordinate::new(delta.row * step, delta.col * step);
                    Placement::new(kind, origin, orientation)
                })
            })
            .filter(|p| {
                builder.can_place(p.kind, p.origin, p.orientation, usable)
                    && cluster.iter().all(|&cell| p.covers(cell))
            })
            .collect();
        group.shuffle(rng);
        all.extend(group);
    }
    all
}

/// Unknown cells the hypothesis puts a ship on, longest ship first, ties in random
/// order.
fn search_target<R>(
    hypothesis: &Board,
    knowledge: &KnowledgeMap,
    rng: &mut R,
) -> Result<Coordinate, TargetingError>
where
    R: Rng + ?Sized,
{
    let mut candidates: Vec<(Coordinate, usize)> = knowledge
        .positions()
        .filter(|&coord| knowledge.is_unknown(coord))
        .filter_map(|coord| hypothesis.ship_kind_at(coord).map(|kind| (coord, kind.len())))
        .collect();
    trace!("{} search candidates", candidates.len());
    candidates.shuffle(rng);
    candidates.sort_by_key(|&(_, len)| Reverse(len));
    candidates
        .first()
        .map(|&(coord, _)| coord)
        .ok_or(TargetingError::NoTarget)
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::{
        board::Dimensions,
        ships::{Fleet, ShipKind},
    };

    fn c(row: i32, col: i32) -> Coordinate {
        Coordinate::new(row, col)
    }

    fn mark(map: &mut KnowledgeMap, cells: &[(i32, i32)], value: Knowledge) {
        for &cell in cells {
            map.set(cell.into(), value).unwrap();
        }
    }

    #[test]
    fn bounded_hit_is_not_damaged() {
        let mut map = KnowledgeMap::new(Dimensions::default());
        mark(&mut map, &[(3, 3)], Knowledge::Ship);
        mark(&mut map, &[(2, 3), (4, 3), (3, 2), (3, 4)], Knowledge::Empty);
        assert_eq!(find_damaged_ship(&map), None);

        let engine = TargetingEngine::new(GameConfig::default());
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..10 {
            let target = engine.next_target(&map, &mut rng).unwrap();
            assert!(map.is_unknown(target));
            let hypothesis = engine.hypothesize(&map, &mut rng).unwrap();
            assert!(is_consistent(&hypothesis, &map));
            assert_eq!(hypothesis.ship_kind_at(c(3, 3)), Some(ShipKind::ONE));
        }
    }

    #[test]
    fn open_pair_is_hunted() {
        let mut map = KnowledgeMap::new(Dimensions::default());
        mark(&mut map, &[(5, 5), (5, 6)], Knowledge::Ship);
        assert_eq!(find_damaged_ship(&map), Some(vec![c(5, 5), c(5, 6)]));

        let allowed = [c(5, 4), c(5, 7), c(4, 5), c(6, 5), c(4, 6), c(6, 6)];
        let engine = TargetingEngine::new(GameConfig::default());
        let mut rng = StdRng::seed_from_u64(9);
        let mut picked = Vec::new();
        for _ in 0..20 {
            let target = engine.next_target(&map, &mut rng).unwrap();
            assert!(allowed.contains(&target), "unexpected target {}", target);
            picked.push(target);
        }
        assert!(picked.contains(&c(5, 4)), "never shot left of the pair");
        assert!(picked.contains(&c(5, 7)), "never shot right of the pair");
    }

    #[test]
    fn three_run_with_one_open_end() {
        let mut map = KnowledgeMap::new(Dimensions::default());
        mark(&mut map, &[(0, 2), (1, 2), (2, 2)], Knowledge::Ship);
        mark(
            &mut map,
            &[(0, 1), (0, 3), (1, 1), (1, 3), (2, 1), (2, 3)],
            Knowledge::Empty,
        );
        assert_eq!(find_damaged_ship(&map), Some(vec![c(0, 2), c(1, 2), c(2, 2)]));

        let engine = TargetingEngine::new(GameConfig::default());
        let mut rng = StdRng::seed_from_u64(1);
        // Only a four-deck ship can still hold three known cells, so the hypothesis must
        // extend down the column.
        assert_eq!(engine.next_target(&map, &mut rng), Ok(c(3, 2)));
    }

    #[test]
    fn horizontal_hits_extend_along_the_row() {
        let mut map = KnowledgeMap::new(Dimensions::default());
        mark(&mut map, &[(5, 5), (5, 6)], Knowledge::Ship);
        mark(&mut map, &[(5, 4)], Knowledge::Empty);
        let engine = TargetingEngine::new(GameConfig::default());
        let mut rng = StdRng::seed_from_u64(13);
        for _ in 0..10 {
            assert_eq!(engine.next_target(&map, &mut rng), Ok(c(5, 7)));
        }
    }

    #[test]
    fn nothing_left_to_find() {
        let config = GameConfig::new(
            Dimensions::new(4, 4),
            Fleet::new().with(ShipKind::TWO, 1),
        );
        let engine = TargetingEngine::new(config);
        let mut map = KnowledgeMap::new(Dimensions::new(4, 4));
        mark(&mut map, &[(1, 1), (1, 2)], Knowledge::Ship);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            engine.next_target(&map, &mut rng),
            Err(TargetingError::NoTarget)
        );
    }

    #[test]
    fn rejects_other_board_sizes() {
        let engine = TargetingEngine::new(GameConfig::default());
        assert_eq!(engine.config().dimensions(), Dimensions::default());
        let map = KnowledgeMap::new(Dimensions::new(8, 8));
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            engine.next_target(&map, &mut rng),
            Err(TargetingError::DimensionMismatch {
                expected: Dimensions::default(),
                found: Dimensions::new(8, 8),
            })
        );
    }

    #[test]
    fn impossible_knowledge_has_no_hypothesis() {
        let config = GameConfig::new(
            Dimensions::new(3, 3),
            Fleet::new().with(ShipKind::THREE, 1),
        );
        let engine = TargetingEngine::new(config);
        let mut map = KnowledgeMap::new(Dimensions::new(3, 3));
        mark(&mut map, &[(0, 1), (1, 0), (1, 2), (2, 1)], Knowledge::Empty);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            engine.hypothesize(&map, &mut rng).unwrap_err(),
            TargetingError::NoHypothesis
        );
    }

    #[test]
    fn bent_hits_have_no_hypothesis() {
        let engine = TargetingEngine::new(GameConfig::default());
        let mut map = KnowledgeMap::new(Dimensions::default());
        mark(&mut map, &[(4, 4), (4, 5), (5, 5)], Knowledge::Ship);
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(
            engine.hypothesize(&map, &mut rng).unwrap_err(),
            TargetingError::NoHypothesis
        );
        assert_eq!(
            engine.next_target(&map, &mut rng),
            Err(TargetingError::NoHypothesis)
        );

        // Closing the same cells in gives the same answer.
        mark(
            &mut map,
            &[(3, 4), (3, 5), (4, 3), (4, 6), (5, 4), (5, 6), (6, 5)],
            Knowledge::Empty,
        );
        assert_eq!(
            engine.hypothesize(&map, &mut rng).unwrap_err(),
            TargetingError::NoHypothesis
        );
    }

    #[test]
    fn overlong_run_has_no_hypothesis() {
        let engine = TargetingEngine::new(GameConfig::default());
        let mut map = KnowledgeMap::new(Dimensions::default());
        mark(
            &mut map,
            &[(4, 2), (4, 3), (4, 4), (4, 5), (4, 6)],
            Knowledge::Ship,
        );
        let mut rng = StdRng::seed_from_u64(8);
        for _ in 0..5 {
            assert_eq!(
                engine.next_target(&map, &mut rng),
                Err(TargetingError::NoHypothesis)
            );
        }
    }

    #[test]
    fn contradictions_are_reported_by_cell() {
        let config = GameConfig::new(
            Dimensions::new(4, 4),
            Fleet::new().with(ShipKind::TWO, 1),
        );
        let mut builder = FleetBuilder::from_config(&config);
        builder
            .place(ShipKind::TWO, c(0, 0), Orientation::Horizontal)
            .unwrap();
        let board = builder.build().unwrap();

        let mut map = KnowledgeMap::new(Dimensions::new(4, 4));
        mark(&mut map, &[(0, 0)], Knowledge::Ship);
        mark(&mut map, &[(3, 3)], Knowledge::Empty);
        assert!(is_consistent(&board, &map));
        assert_eq!(contradiction(&board, &map), None);

        let mut ship_on_water = map.clone();
        mark(&mut ship_on_water, &[(0, 1)], Knowledge::Empty);
        assert!(!is_consistent(&board, &ship_on_water));
        assert_eq!(contradiction(&board, &ship_on_water), Some(c(0, 1)));

        let mut water_on_ship = map;
        mark(&mut water_on_ship, &[(2, 2)], Knowledge::Ship);
        assert!(!is_consistent(&board, &water_on_ship));
        assert_eq!(contradiction(&board, &water_on_ship), Some(c(2, 2)));
    }
}
