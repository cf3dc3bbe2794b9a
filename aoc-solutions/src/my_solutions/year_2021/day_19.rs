//! Beacon Scanner: register overlapping 3-D scanner reports into one frame.
//!
//! Each scanner reports beacon positions relative to itself, in an unknown
//! orientation. Two reports overlap when, for one of the 24 cube rotations,
//! enough pairwise beacon differences coincide; the translation then falls
//! out of any shared difference.

use std::collections::{HashMap, HashSet};
use std::ops::{Add, Sub};
use std::sync::LazyLock;

use anyhow::{anyhow, bail};
use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};
use itertools::Itertools;
use regex::Regex;
use tracing::{debug, info};

use crate::utils::parse::invalid;

/// Beacons two scanners must share to be considered overlapping
const OVERLAPPING_BEACONS: usize = 12;
/// Difference vectors produced by `OVERLAPPING_BEACONS` shared beacons
const OVERLAPPING_DIFFERENCES: usize = OVERLAPPING_BEACONS * (OVERLAPPING_BEACONS - 1) / 2;

static HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^--- scanner (\d+) ---$").expect("valid header regex"));
static POSITION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(-?\d+),(-?\d+),(-?\d+)$").expect("valid position regex"));

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2021, day = 19, tags = ["2021", "geometry"])]
pub struct Solver;

/// Reports are read as `i32` and widened, so sums and differences across a
/// merged region stay far from `i64` limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Point(pub [i64; 3]);

impl Point {
    pub const ORIGIN: Point = Point([0, 0, 0]);

    pub fn manhattan(self, other: Point) -> u64 {
        (0..3).map(|i| self.0[i].abs_diff(other.0[i])).sum()
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point(std::array::from_fn(|i| self.0[i] + rhs.0[i]))
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point(std::array::from_fn(|i| self.0[i] - rhs.0[i]))
    }
}

/// A proper rotation of the cube, stored as a row-major integer matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rotation([[i64; 3]; 3]);

/// Rotations bringing each of the six faces to point along +z
const FACES: [Rotation; 6] = [
    Rotation([[1, 0, 0], [0, 1, 0], [0, 0, 1]]),
    Rotation([[1, 0, 0], [0, 0, -1], [0, 1, 0]]),
    Rotation([[0, 0, -1], [0, 1, 0], [1, 0, 0]]),
    Rotation([[1, 0, 0], [0, 0, 1], [0, -1, 0]]),
    Rotation([[0, 0, 1], [0, 1, 0], [-1, 0, 0]]),
    Rotation([[1, 0, 0], [0, -1, 0], [0, 0, -1]]),
];

/// Quarter turn about z: x -> y, y -> -x
const SPIN: Rotation = Rotation([[0, -1, 0], [1, 0, 0], [0, 0, 1]]);

impl Rotation {
    pub const IDENTITY: Rotation = FACES[0];

    /// All 24 rotations: six facing directions, four spins each
    pub fn all() -> Vec<Rotation> {
        FACES
            .iter()
            .flat_map(|face| {
                std::iter::successors(Some(*face), |r| Some(SPIN.compose(r))).take(4)
            })
            .collect()
    }

    pub fn apply(&self, p: Point) -> Point {
        Point(std::array::from_fn(|row| {
            (0..3).map(|col| self.0[row][col] * p.0[col]).sum()
        }))
    }

    /// `self ∘ other`: apply `other` first
    pub fn compose(&self, other: &Rotation) -> Rotation {
        Rotation(std::array::from_fn(|row| {
            std::array::from_fn(|col| (0..3).map(|k| self.0[row][k] * other.0[k][col]).sum())
        }))
    }

    pub fn determinant(&self) -> i64 {
        let m = &self.0;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }
}

#[derive(Debug, Clone)]
pub struct Scanner {
    pub id: u32,
    pub beacons: Vec<Point>,
}

/// Beacons and scanner positions expressed in the reference scanner's frame
#[derive(Debug, Clone)]
pub struct Cloud {
    beacons: HashSet<Point>,
    scanners: Vec<Point>,
    /// `a - b -> a` for every ordered pair of distinct beacons
    differences: HashMap<Point, Point>,
}

impl Cloud {
    fn new(reference: &Scanner) -> Self {
        let mut cloud = Cloud {
            beacons: HashSet::new(),
            scanners: vec![Point::ORIGIN],
            differences: HashMap::new(),
        };
        for &beacon in &reference.beacons {
            cloud.insert(beacon);
        }
        cloud
    }

    fn insert(&mut self, beacon: Point) {
        if !self.beacons.insert(beacon) {
            return;
        }
        for &other in &self.beacons {
            if other != beacon {
                self.differences.insert(beacon - other, beacon);
                self.differences.insert(other - beacon, other);
            }
        }
    }

    pub fn beacon_count(&self) -> usize {
        self.beacons.len()
    }

    pub fn scanners(&self) -> &[Point] {
        &self.scanners
    }

    /// Largest manhattan distance between any two scanners
    pub fn range(&self) -> u64 {
        self.scanners
            .iter()
            .tuple_combinations()
            .map(|(a, b)| a.manhattan(*b))
            .max()
            .unwrap_or(0)
    }

    /// Find the rotation and translation placing `scanner` into this cloud
    fn locate(&self, scanner: &Scanner) -> Option<(Rotation, Point)> {
        Rotation::all().into_iter().find_map(|rotation| {
            let rotated: Vec<Point> = scanner.beacons.iter().map(|&b| rotation.apply(b)).collect();

            // Vote on the translation implied by each shared difference
            let mut shared = 0;
            let mut votes: HashMap<Point, usize> = HashMap::new();
            for (i, &a) in rotated.iter().enumerate() {
                for &b in &rotated[i + 1..] {
                    for (diff, from) in [(a - b, a), (b - a, b)] {
                        if let Some(&mine) = self.differences.get(&diff) {
                            shared += 1;
                            *votes.entry(mine - from).or_default() += 1;
                        }
                    }
                }
            }
            if shared < OVERLAPPING_DIFFERENCES {
                return None;
            }

            let (shift, _) = votes.into_iter().max_by_key(|&(shift, count)| (count, shift))?;
            let matching = rotated
                .iter()
                .filter(|&&b| self.beacons.contains(&(b + shift)))
                .count();
            (matching >= OVERLAPPING_BEACONS).then_some((rotation, shift))
        })
    }

    /// Merge `scanner` if it overlaps; returns whether it was merged
    fn try_merge(&mut self, scanner: &Scanner) -> bool {
        let Some((rotation, shift)) = self.locate(scanner) else {
            return false;
        };
        for &beacon in &scanner.beacons {
            self.insert(rotation.apply(beacon) + shift);
        }
        self.scanners.push(shift);
        debug!(
            scanner = scanner.id,
            position = ?shift.0,
            beacons = self.beacons.len(),
            "merged scanner"
        );
        true
    }
}

/// Fold every scanner into the frame of the first one
pub fn merge_all(scanners: &[Scanner]) -> anyhow::Result<Cloud> {
    let (reference, rest) = scanners
        .split_first()
        .ok_or_else(|| anyhow!("no scanners in input"))?;

    let mut cloud = Cloud::new(reference);
    let mut pending: Vec<&Scanner> = rest.iter().collect();

    while !pending.is_empty() {
        let before = pending.len();
        pending.retain(|scanner| !cloud.try_merge(scanner));
        if pending.len() == before {
            bail!(
                "{} scanner(s) do not overlap the merged region: {}",
                pending.len(),
                pending.iter().map(|s| s.id).join(", ")
            );
        }
    }

    info!(
        scanners = cloud.scanners.len(),
        beacons = cloud.beacons.len(),
        "all scanners merged"
    );
    Ok(cloud)
}

#[derive(Debug)]
pub struct SharedData {
    scanners: Vec<Scanner>,
    merged: Option<Cloud>,
}

impl SharedData {
    fn merged(&mut self) -> Result<&Cloud, SolveError> {
        let cloud = match self.merged.take() {
            Some(cloud) => cloud,
            None => merge_all(&self.scanners).map_err(SolveError::failed)?,
        };
        Ok(self.merged.insert(cloud))
    }
}

fn parse_position(line: &str) -> anyhow::Result<Point> {
    let caps = POSITION
        .captures(line)
        .ok_or_else(|| anyhow!("expected 'x,y,z', got '{}'", line))?;
    let mut point = [0; 3];
    for (axis, value) in point.iter_mut().enumerate() {
        let coordinate: i32 = caps[axis + 1].parse()?;
        *value = coordinate.into();
    }
    Ok(Point(point))
}

fn parse_scanners(input: &str) -> anyhow::Result<Vec<Scanner>> {
    let mut scanners = Vec::new();
    let mut lines = input.lines().enumerate().peekable();

    loop {
        // Skip blank separators
        while lines.next_if(|(_, l)| l.trim().is_empty()).is_some() {}
        let Some((line_idx, header)) = lines.next() else {
            break;
        };
        let id = HEADER
            .captures(header.trim())
            .ok_or_else(|| anyhow!("(line {}) expected scanner header, got '{}'", line_idx + 1, header))?[1]
            .parse()?;

        let mut beacons = Vec::new();
        while let Some((line_idx, line)) = lines.next_if(|(_, l)| !l.trim().is_empty()) {
            beacons.push(
                parse_position(line.trim()).map_err(|e| anyhow!("(line {}) {}", line_idx + 1, e))?,
            );
        }
        scanners.push(Scanner { id, beacons });
    }

    if scanners.is_empty() {
        bail!("no scanners in input");
    }
    Ok(scanners)
}

impl AocParser for Solver {
    type SharedData<'a> = SharedData;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let scanners = parse_scanners(input).map_err(invalid)?;
        Ok(SharedData {
            scanners,
            merged: None,
        })
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(shared.merged()?.beacon_count().to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(shared.merged()?.range().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use proptest::prelude::*;
    use std::fmt::Write;

    /// xorshift64, enough to scatter test beacons deterministically
    struct Rng(u64);

    impl Rng {
        fn next(&mut self) -> u64 {
            self.0 ^= self.0 << 13;
            self.0 ^= self.0 >> 7;
            self.0 ^= self.0 << 17;
            self.0
        }

        fn coord(&mut self, span: i64) -> i64 {
            (self.next() % (2 * span as u64 + 1)) as i64 - span
        }

        fn point(&mut self, span: i64) -> Point {
            Point([self.coord(span), self.coord(span), self.coord(span)])
        }
    }

    fn transpose(r: &Rotation) -> Rotation {
        Rotation(std::array::from_fn(|row| std::array::from_fn(|col| r.0[col][row])))
    }

    /// Scanners each seeing 24 beacons, consecutive scanners sharing 12.
    /// Returns the puzzle text, distinct beacon count and true scanner positions.
    fn synthetic(seed: u64, scanner_count: usize) -> (String, usize, Vec<Point>) {
        let mut rng = Rng(seed | 1);
        let rotations = Rotation::all();

        let total = OVERLAPPING_BEACONS * (scanner_count + 1);
        let mut unique = HashSet::new();
        let mut world = Vec::new();
        while world.len() < total {
            let p = rng.point(1000);
            if unique.insert(p) {
                world.push(p);
            }
        }

        let mut text = String::new();
        let mut positions = Vec::new();
        for k in 0..scanner_count {
            let position = if k == 0 { Point::ORIGIN } else { rng.point(500) };
            let rotation = if k == 0 {
                Rotation::IDENTITY
            } else {
                rotations[(rng.next() % 24) as usize]
            };
            let inverse = transpose(&rotation);
            positions.push(position);

            writeln!(text, "--- scanner {k} ---").unwrap();
            for beacon in &world[k * OVERLAPPING_BEACONS..(k + 2) * OVERLAPPING_BEACONS] {
                let local = inverse.apply(*beacon - position);
                writeln!(text, "{},{},{}", local.0[0], local.0[1], local.0[2]).unwrap();
            }
            text.push('\n');
        }
        (text, total, positions)
    }

    fn max_distance(points: &[Point]) -> u64 {
        points
            .iter()
            .tuple_combinations()
            .map(|(a, b)| a.manhattan(*b))
            .max()
            .unwrap_or(0)
    }

    fn solve_both(input: &str) -> (String, String) {
        let mut shared = Solver::parse(input).unwrap();
        let part1 = <Solver as PartSolver<1>>::solve(&mut shared).unwrap();
        let part2 = <Solver as PartSolver<2>>::solve(&mut shared).unwrap();
        (part1, part2)
    }

    #[test]
    fn test_rotation_group_has_24_proper_rotations() {
        let all = Rotation::all();
        let unique: HashSet<_> = all.iter().copied().collect();
        assert_eq!(unique.len(), 24);
        assert!(unique.contains(&Rotation::IDENTITY));
        assert!(all.iter().all(|r| r.determinant() == 1));
    }

    #[test]
    fn test_rotation_group_closed_under_composition() {
        let all: HashSet<_> = Rotation::all().into_iter().collect();
        for a in &all {
            for b in &all {
                assert!(all.contains(&a.compose(b)));
            }
        }
    }

    #[test]
    fn test_rotation_preserves_manhattan_length() {
        let p = Point([3, -7, 11]);
        for r in Rotation::all() {
            assert_eq!(r.apply(p).manhattan(Point::ORIGIN), 21);
        }
    }

    #[test]
    fn test_synthetic_field_merges() {
        let (input, beacons, positions) = synthetic(0x5eed, 5);
        let (part1, part2) = solve_both(&input);
        assert_eq!(part1, beacons.to_string());
        assert_eq!(part2, max_distance(&positions).to_string());
    }

    #[test]
    fn test_merged_scanner_positions_recovered() {
        let (input, _, positions) = synthetic(42, 4);
        let shared = Solver::parse(&input).unwrap();
        let cloud = merge_all(&shared.scanners).unwrap();
        let found: HashSet<_> = cloud.scanners().iter().copied().collect();
        let expected: HashSet<_> = positions.into_iter().collect();
        assert_eq!(found, expected);
    }

    #[test]
    fn test_disconnected_scanner_fails() {
        let (mut input, _, _) = synthetic(7, 3);
        input.push_str("--- scanner 9 ---\n1,2,3\n4,5,6\n");
        let mut shared = Solver::parse(&input).unwrap();
        let err = <Solver as PartSolver<1>>::solve(&mut shared).unwrap_err();
        assert!(err.to_string().contains("9"));
    }

    #[test]
    fn test_extreme_coordinates() {
        let input = indoc! {"
            --- scanner 0 ---
            2147483647,2147483647,2147483647
            -2147483648,-2147483648,-2147483648

            --- scanner 1 ---
            -2147483648,2147483647,0
            2147483647,-2147483648,0
        "};
        let mut shared = Solver::parse(input).unwrap();
        assert!(<Solver as PartSolver<1>>::solve(&mut shared).is_err());

        let (part1, part2) = solve_both(input.split("\n\n").next().unwrap());
        assert_eq!((part1.as_str(), part2.as_str()), ("2", "0"));

        // Corner to corner of the largest accepted report
        let far = Point([i32::MAX.into(); 3]).manhattan(Point([i32::MIN.into(); 3]));
        assert_eq!(far, 3 * (u32::MAX as u64));
    }

    #[test]
    fn test_parse_errors() {
        assert!(Solver::parse("--- scanner 0 ---\n2147483648,0,0").is_err());
        assert!(Solver::parse("").is_err());
        assert!(Solver::parse("--- scanner x ---\n1,2,3").is_err());
        assert!(Solver::parse("--- scanner 0 ---\n1,2").is_err());
        assert!(Solver::parse("1,2,3").is_err());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(6))]

        /// Merging in any scanner order yields the same beacon count and range
        #[test]
        fn prop_merge_order_invariant(seed in any::<u64>(), shift in 0usize..4) {
            let (input, beacons, positions) = synthetic(seed, 4);
            let mut scanners = parse_scanners(&input).unwrap();
            scanners.rotate_left(shift);

            let cloud = merge_all(&scanners).unwrap();
            prop_assert_eq!(cloud.beacon_count(), beacons);
            prop_assert_eq!(cloud.range(), max_distance(&positions));
        }
    }
}
