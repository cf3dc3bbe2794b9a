use std::sync::LazyLock;

use anyhow::bail;
use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};
use regex::Regex;
use tracing::{debug, info};

use crate::utils::parse::invalid;

const ORE: usize = 0;
const CLAY: usize = 1;
const OBSIDIAN: usize = 2;
const GEODE: usize = 3;

const QUALITY_MINUTES: u32 = 24;
const LONG_MINUTES: u32 = 32;
const SURVIVING_BLUEPRINTS: usize = 3;

static BLUEPRINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"Blueprint (\d+):\s+",
        r"Each ore robot costs (\d+) ore\.\s+",
        r"Each clay robot costs (\d+) ore\.\s+",
        r"Each obsidian robot costs (\d+) ore and (\d+) clay\.\s+",
        r"Each geode robot costs (\d+) ore and (\d+) obsidian\."
    ))
    .expect("valid blueprint regex")
});

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2022, day = 19, tags = ["2022", "search"])]
pub struct Solver;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blueprint {
    pub id: u32,
    /// `costs[robot][resource]` for ore, clay and obsidian
    costs: [[u32; 3]; 4],
    /// Most of each resource any robot costs; more robots than this never helps
    max_spend: [u32; 3],
}

impl Blueprint {
    fn new(id: u32, costs: [[u32; 3]; 4]) -> Self {
        let max_spend = std::array::from_fn(|resource| costs.iter().map(|c| c[resource]).max().unwrap_or(0));
        Self { id, costs, max_spend }
    }

    /// Most geodes that can be opened in `minutes`
    pub fn max_geodes(&self, minutes: u32) -> u32 {
        let mut search = Search {
            blueprint: self,
            best: 0,
        };
        search.run(minutes, [1, 0, 0, 0], [0; 4]);
        debug!(blueprint = self.id, minutes, geodes = search.best, "blueprint searched");
        search.best
    }
}

struct Search<'a> {
    blueprint: &'a Blueprint,
    best: u32,
}

impl Search<'_> {
    /// Depth-first over which robot to build next, skipping the idle minutes
    fn run(&mut self, time_left: u32, robots: [u32; 4], stock: [u32; 4]) {
        let idle = stock[GEODE] + robots[GEODE] * time_left;
        self.best = self.best.max(idle);

        // Even a new geode robot every remaining minute cannot beat the record
        if idle + time_left * time_left.saturating_sub(1) / 2 <= self.best {
            return;
        }

        for robot in [GEODE, OBSIDIAN, CLAY, ORE] {
            if robot != GEODE && robots[robot] >= self.blueprint.max_spend[robot] {
                continue;
            }
            let Some(wait) = self.wait_for(robot, &robots, &stock) else {
                continue;
            };
            if wait + 1 >= time_left {
                continue;
            }

            let elapsed = wait + 1;
            let cost = &self.blueprint.costs[robot];
            let next_stock = std::array::from_fn(|r| {
                stock[r] + robots[r] * elapsed - cost.get(r).copied().unwrap_or(0)
            });
            let mut next_robots = robots;
            next_robots[robot] += 1;
            self.run(time_left - elapsed, next_robots, next_stock);
        }
    }

    /// Minutes of collecting before `robot` is affordable; `None` if never
    fn wait_for(&self, robot: usize, robots: &[u32; 4], stock: &[u32; 4]) -> Option<u32> {
        self.blueprint.costs[robot]
            .iter()
            .enumerate()
            .try_fold(0, |wait, (resource, &cost)| {
                let missing = cost.saturating_sub(stock[resource]);
                if missing == 0 {
                    Some(wait)
                } else if robots[resource] == 0 {
                    None
                } else {
                    Some(wait.max(missing.div_ceil(robots[resource])))
                }
            })
    }
}

fn parse_blueprints(input: &str) -> anyhow::Result<Vec<Blueprint>> {
    let mut blueprints = Vec::new();
    let mut last_end = 0;

    for caps in BLUEPRINT.captures_iter(input) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let gap = input[last_end..whole.start()].trim();
        if !gap.is_empty() {
            bail!("unrecognised text before blueprint: '{}'", gap);
        }
        last_end = whole.end();

        let (_, values): (_, [&str; 7]) = caps.extract();
        let [id, ore, clay, obs_ore, obs_clay, geode_ore, geode_obs] = values.map(str::parse::<u32>);
        blueprints.push(Blueprint::new(
            id?,
            [
                [ore?, 0, 0],
                [clay?, 0, 0],
                [obs_ore?, obs_clay?, 0],
                [geode_ore?, 0, geode_obs?],
            ],
        ));
    }

    let rest = input[last_end..].trim();
    if !rest.is_empty() {
        bail!("unrecognised text after blueprints: '{}'", rest);
    }
    if blueprints.is_empty() {
        bail!("no blueprints in input");
    }
    Ok(blueprints)
}

impl AocParser for Solver {
    type SharedData<'a> = Vec<Blueprint>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        parse_blueprints(input).map_err(invalid)
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let quality: u64 = shared
            .iter()
            .map(|bp| u64::from(bp.id) * u64::from(bp.max_geodes(QUALITY_MINUTES)))
            .sum();
        info!(quality, "quality levels summed");
        Ok(quality.to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let product: u64 = shared
            .iter()
            .take(SURVIVING_BLUEPRINTS)
            .map(|bp| bp.max_geodes(LONG_MINUTES) as u64)
            .product();
        Ok(product.to_string())
    }
}
