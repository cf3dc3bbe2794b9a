use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, bail};
use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};

use crate::utils::parse::invalid;

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2022, day = 13, tags = ["2022", "parsing"])]
pub struct Solver;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Packet {
    Int(u32),
    List(Vec<Packet>),
}

impl Packet {
    fn divider(value: u32) -> Packet {
        Packet::List(vec![Packet::List(vec![Packet::Int(value)])])
    }
}

impl Ord for Packet {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Packet::Int(a), Packet::Int(b)) => a.cmp(b),
            (Packet::List(a), Packet::List(b)) => a.cmp(b),
            (Packet::Int(a), Packet::List(b)) => std::slice::from_ref(&Packet::Int(*a)).cmp(b.as_slice()),
            (Packet::List(a), Packet::Int(b)) => a.as_slice().cmp(std::slice::from_ref(&Packet::Int(*b))),
        }
    }
}

impl PartialOrd for Packet {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Packet::Int(v) => write!(f, "{v}"),
            Packet::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Recursive-descent parser over the packet bytes
struct PacketParser<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl PacketParser<'_> {
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn expect(&mut self, byte: u8) -> anyhow::Result<()> {
        match self.peek() {
            Some(b) if b == byte => {
                self.pos += 1;
                Ok(())
            }
            Some(b) => bail!("expected '{}' at {}, found '{}'", byte as char, self.pos, b as char),
            None => bail!("expected '{}', found end of packet", byte as char),
        }
    }

    fn packet(&mut self) -> anyhow::Result<Packet> {
        match self.peek() {
            Some(b'[') => self.list(),
            Some(b'0'..=b'9') => self.int(),
            Some(b) => bail!("unexpected '{}' at {}", b as char, self.pos),
            None => bail!("unexpected end of packet"),
        }
    }

    fn int(&mut self) -> anyhow::Result<Packet> {
        let start = self.pos;
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.pos += 1;
        }
        let digits = std::str::from_utf8(&self.bytes[start..self.pos])?;
        Ok(Packet::Int(digits.parse()?))
    }

    fn list(&mut self) -> anyhow::Result<Packet> {
        self.expect(b'[')?;
        let mut items = Vec::new();
        if self.peek() == Some(b']') {
            self.pos += 1;
            return Ok(Packet::List(items));
        }
        loop {
            items.push(self.packet()?);
            match self.peek() {
                Some(b',') => self.pos += 1,
                _ => break,
            }
        }
        self.expect(b']')?;
        Ok(Packet::List(items))
    }
}

impl FromStr for Packet {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = PacketParser {
            bytes: s.as_bytes(),
            pos: 0,
        };
        let packet = parser.list()?;
        if parser.pos != s.len() {
            bail!("trailing characters after packet at {}", parser.pos);
        }
        Ok(packet)
    }
}

fn parse_pairs(input: &str) -> anyhow::Result<Vec<(Packet, Packet)>> {
    let lines: Vec<(usize, &str)> = input
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
        .collect();

    if lines.len() % 2 != 0 {
        bail!("packets must come in pairs, found {}", lines.len());
    }

    lines
        .chunks_exact(2)
        .map(|pair| {
            let parse = |(line_no, text): (usize, &str)| {
                text.parse::<Packet>()
                    .map_err(|e| anyhow!("(line {}) {}", line_no, e))
            };
            Ok((parse(pair[0])?, parse(pair[1])?))
        })
        .collect()
}

impl AocParser for Solver {
    type SharedData<'a> = Vec<(Packet, Packet)>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        parse_pairs(input).map_err(invalid)
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(shared
            .iter()
            .enumerate()
            .filter(|(_, (left, right))| left <= right)
            .map(|(idx, _)| idx + 1)
            .sum::<usize>()
            .to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let dividers = [Packet::divider(2), Packet::divider(6)];

        // Position in the sorted list is one plus the number of smaller packets
        let key: usize = dividers
            .iter()
            .enumerate()
            .map(|(i, divider)| {
                let smaller = shared
                    .iter()
                    .flat_map(|(a, b)| [a, b])
                    .filter(|packet| *packet < divider)
                    .count();
                smaller + i + 1
            })
            .product();
        Ok(key.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    const EXAMPLE: &str = indoc! {"
        [1,1,3,1,1]
        [1,1,5,1,1]

        [[1],[2,3,4]]
        [[1],4]

        [9]
        [[8,7,6]]

        [[4,4],4,4]
        [[4,4],4,4,4]

        [7,7,7,7]
        [7,7,7]

        []
        [3]

        [[[]]]
        [[]]

        [1,[2,[3,[4,[5,6,7]]]],8,9]
        [1,[2,[3,[4,[5,6,0]]]],8,9]
    "};

    #[test]
    fn test_example() {
        let mut shared = Solver::parse(EXAMPLE).unwrap();
        assert_eq!(<Solver as PartSolver<1>>::solve(&mut shared).unwrap(), "13");
        assert_eq!(<Solver as PartSolver<2>>::solve(&mut shared).unwrap(), "140");
    }

    #[test]
    fn test_mixed_comparison_wraps_integer() {
        let a: Packet = "[[1],[2,3,4]]".parse().unwrap();
        let b: Packet = "[[1],4]".parse().unwrap();
        assert!(a < b);
        assert_eq!("[3]".parse::<Packet>().unwrap().cmp(&"[[3]]".parse().unwrap()), Ordering::Equal);
    }

    #[test]
    fn test_display_matches_input() {
        let text = "[1,[2,[3,[4,[5,6,7]]]],8,9]";
        assert_eq!(text.parse::<Packet>().unwrap().to_string(), text);
        assert_eq!("[]".parse::<Packet>().unwrap().to_string(), "[]");
    }

    #[test]
    fn test_malformed_packets() {
        assert!("[1,2".parse::<Packet>().is_err());
        assert!("[1,,2]".parse::<Packet>().is_err());
        assert!("[1]]".parse::<Packet>().is_err());
        assert!("7".parse::<Packet>().is_err());
        let err = Solver::parse("[1]\n[x]\n").unwrap_err();
        assert!(err.to_string().contains("(line 2)"));
        assert!(Solver::parse("[1]\n").is_err());
    }
}
