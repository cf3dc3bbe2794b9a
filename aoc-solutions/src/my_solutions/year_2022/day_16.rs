//! Proboscidea Volcanium: release as much pressure as possible before the
//! volcano erupts.
//!
//! The tunnel graph is reduced to the start valve plus valves with a positive
//! flow rate, connected by shortest-path distances. Part 1 is a memoised
//! search over (valve, time left, opened set); part 2 records the best
//! pressure for every opened set reachable in 26 minutes and pairs up
//! disjoint sets.

use std::collections::{HashMap, VecDeque};
use std::sync::LazyLock;

use anyhow::{anyhow, bail};
use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};
use itertools::Itertools;
use regex::Regex;
use tracing::debug;

use crate::utils::dp_cache::{DpCache, DpProblem, HashMapBackend};
use crate::utils::parse::invalid;

const START: &str = "AA";
const SOLO_MINUTES: u32 = 30;
const PAIR_MINUTES: u32 = 26;
/// Opened sets are stored as bits of a `u64`
const MAX_USEFUL_VALVES: usize = 63;

static VALVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Valve ([A-Z]{2}) has flow rate=(\d+); tunnels? leads? to valves? ([A-Z]{2}(?:, [A-Z]{2})*)$")
        .expect("valid valve regex")
});

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2022, day = 16, tags = ["2022", "graph", "dp"])]
pub struct Solver;

/// Useful valves `0..rates.len()` plus the start valve at index `rates.len()`
#[derive(Debug, Clone)]
pub struct Network {
    rates: Vec<u32>,
    /// Minutes to walk between reduced nodes; `None` when unreachable
    distances: Vec<Vec<Option<u32>>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct State {
    at: usize,
    time_left: u32,
    opened: u64,
}

impl Network {
    fn start(&self) -> usize {
        self.rates.len()
    }

    /// States reachable by walking to an unopened valve and opening it
    fn moves(&self, state: &State) -> impl Iterator<Item = State> + '_ {
        let State {
            at,
            time_left,
            opened,
        } = *state;
        (0..self.rates.len()).filter_map(move |next| {
            if opened & (1 << next) != 0 {
                return None;
            }
            let walk = self.distances[at][next]?;
            (walk + 1 < time_left).then(|| State {
                at: next,
                time_left: time_left - walk - 1,
                opened: opened | 1 << next,
            })
        })
    }

    fn released(&self, state: &State) -> u32 {
        self.rates[state.at] * state.time_left
    }

    fn initial(&self, time_left: u32) -> State {
        State {
            at: self.start(),
            time_left,
            opened: 0,
        }
    }

    /// Best pressure for every opened set reachable within `time_left`
    fn best_by_opened_set(&self, time_left: u32) -> HashMap<u64, u32> {
        let mut best = HashMap::new();
        let mut stack = vec![(self.initial(time_left), 0)];
        while let Some((state, pressure)) = stack.pop() {
            let entry = best.entry(state.opened).or_insert(0);
            *entry = (*entry).max(pressure);
            stack.extend(
                self.moves(&state)
                    .map(|next| (next, pressure + self.released(&next))),
            );
        }
        best
    }
}

/// Pressure still to be released from a state, assuming the best choices
impl DpProblem<State, u32> for Network {
    fn deps(&self, state: &State) -> Vec<State> {
        self.moves(state).collect()
    }

    fn compute(&self, state: &State, deps: Vec<u32>) -> u32 {
        self.moves(state)
            .zip(deps)
            .map(|(next, future)| self.released(&next) + future)
            .max()
            .unwrap_or(0)
    }
}

fn parse_network(input: &str) -> anyhow::Result<Network> {
    let mut ids: HashMap<&str, usize> = HashMap::new();
    let mut valves: Vec<(&str, u32, Vec<&str>)> = Vec::new();

    for (line_idx, line) in input.trim().lines().enumerate() {
        let caps = VALVE
            .captures(line.trim())
            .ok_or_else(|| anyhow!("(line {}) unrecognised valve '{}'", line_idx + 1, line))?;
        let name = caps.get(1).map_or("", |m| m.as_str());
        let rate = caps[2].parse()?;
        let tunnels = caps.get(3).map_or("", |m| m.as_str()).split(", ").collect();
        if ids.insert(name, valves.len()).is_some() {
            bail!("(line {}) valve {} defined twice", line_idx + 1, name);
        }
        valves.push((name, rate, tunnels));
    }

    let start = *ids
        .get(START)
        .ok_or_else(|| anyhow!("no start valve {}", START))?;
    let adjacency = valves
        .iter()
        .map(|(name, _, tunnels)| {
            tunnels
                .iter()
                .map(|t| {
                    ids.get(t)
                        .copied()
                        .ok_or_else(|| anyhow!("valve {} leads to unknown valve {}", name, t))
                })
                .collect::<anyhow::Result<Vec<_>>>()
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let useful: Vec<usize> = valves
        .iter()
        .positions(|(_, rate, _)| *rate > 0)
        .collect();
    if useful.len() > MAX_USEFUL_VALVES {
        bail!(
            "{} valves have a positive flow rate, at most {} are supported",
            useful.len(),
            MAX_USEFUL_VALVES
        );
    }

    let nodes: Vec<usize> = useful.iter().copied().chain([start]).collect();
    let distances = nodes
        .iter()
        .map(|&from| {
            let reach = bfs(&adjacency, from);
            nodes.iter().map(|&to| reach[to]).collect()
        })
        .collect();

    debug!(
        valves = valves.len(),
        useful = useful.len(),
        "reduced tunnel network"
    );
    Ok(Network {
        rates: useful.iter().map(|&v| valves[v].1).collect(),
        distances,
    })
}

fn bfs(adjacency: &[Vec<usize>], from: usize) -> Vec<Option<u32>> {
    let mut dist = vec![None; adjacency.len()];
    dist[from] = Some(0);
    let mut queue = VecDeque::from([from]);
    while let Some(node) = queue.pop_front() {
        let d = dist[node].unwrap_or(0);
        for &next in &adjacency[node] {
            if dist[next].is_none() {
                dist[next] = Some(d + 1);
                queue.push_back(next);
            }
        }
    }
    dist
}

impl AocParser for Solver {
    type SharedData<'a> = Network;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        parse_network(input).map_err(invalid)
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let initial = shared.initial(SOLO_MINUTES);
        let cache = DpCache::with_problem(HashMapBackend::new(), shared.clone());
        let best = cache.get(&initial);
        debug!(states = cache.into_backend().len(), "explored valve states");
        Ok(best.to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let mut sets: Vec<(u64, u32)> = shared.best_by_opened_set(PAIR_MINUTES).into_iter().collect();
        sets.sort_unstable_by(|a, b| b.1.cmp(&a.1));

        let mut best = 0;
        for (i, &(mine, my_pressure)) in sets.iter().enumerate() {
            // Sorted descending: no later pair can beat the record
            if my_pressure * 2 < best {
                break;
            }
            for &(theirs, their_pressure) in &sets[i..] {
                if my_pressure + their_pressure <= best {
                    break;
                }
                if mine & theirs == 0 {
                    best = my_pressure + their_pressure;
                }
            }
        }
        Ok(best.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    const EXAMPLE: &str = indoc! {"
        Valve AA has flow rate=0; tunnels lead to valves DD, II, BB
        Valve BB has flow rate=13; tunnels lead to valves CC, AA
        Valve CC has flow rate=2; tunnels lead to valves DD, BB
        Valve DD has flow rate=20; tunnels lead to valves CC, AA, EE
        Valve EE has flow rate=3; tunnels lead to valves FF, DD
        Valve FF has flow rate=0; tunnels lead to valves EE, GG
        Valve GG has flow rate=0; tunnels lead to valves FF, HH
        Valve HH has flow rate=22; tunnel leads to valve GG
        Valve II has flow rate=0; tunnels lead to valves AA, JJ
        Valve JJ has flow rate=21; tunnel leads to valve II
    "};

    #[test]
    fn test_example() {
        let mut shared = Solver::parse(EXAMPLE).unwrap();
        assert_eq!(<Solver as PartSolver<1>>::solve(&mut shared).unwrap(), "1651");
        assert_eq!(<Solver as PartSolver<2>>::solve(&mut shared).unwrap(), "1707");
    }

    #[test]
    fn test_reduced_network() {
        let network = Solver::parse(EXAMPLE).unwrap();
        // BB, CC, DD, EE, HH, JJ are useful; AA is appended as start
        assert_eq!(network.rates, vec![13, 2, 20, 3, 22, 21]);
        assert_eq!(network.start(), 6);
        // AA -> HH: AA, DD, EE, FF, GG, HH
        assert_eq!(network.distances[6][4], Some(5));
    }

    #[test]
    fn test_unreachable_in_time_valves_skipped() {
        let network = Solver::parse(EXAMPLE).unwrap();
        // Every useful valve is at least one step away, so two minutes open nothing
        let best = network.best_by_opened_set(2);
        assert_eq!(best, HashMap::from([(0, 0)]));

        // Three minutes open one neighbour of AA for a single minute
        let best = network.best_by_opened_set(3);
        assert_eq!(best.len(), 3);
        assert_eq!(best[&1], 13);
        assert_eq!(best[&(1 << 2)], 20);
        assert!(network.moves(&network.initial(3)).all(|s| s.time_left == 1));
    }

    #[test]
    fn test_single_valve() {
        let mut shared =
            Solver::parse("Valve AA has flow rate=0; tunnels lead to valves BB\nValve BB has flow rate=10; tunnels lead to valves AA")
                .unwrap();
        // Walk 1 minute, open 1 minute, 28 minutes of flow
        assert_eq!(<Solver as PartSolver<1>>::solve(&mut shared).unwrap(), "280");
    }

    #[test]
    fn test_parse_errors() {
        assert!(Solver::parse("Valve BB has flow rate=1; tunnel leads to valve BB").is_err());
        assert!(Solver::parse("Valve AA has flow rate=0; tunnel leads to valve ZZ").is_err());
        assert!(Solver::parse("Valve AA flows").is_err());
    }
}
