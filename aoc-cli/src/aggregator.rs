//! Reorders streamed solver results into year/day/part order
//!
//! Workers finish in any order; a result is released once every key before
//! it has been released.

use crate::executor::{SolverResult, WorkItem};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Position of a result in the output: ascending year, day, part
#[derive(Debug, Ord, PartialOrd, Eq, PartialEq, Clone, Copy, Hash)]
pub struct ResultKey {
    pub year: u16,
    pub day: u8,
    pub part: u8,
}

impl ResultKey {
    /// Every key a batch of work items will produce
    pub fn expected(work_items: &[WorkItem]) -> Vec<ResultKey> {
        work_items
            .iter()
            .flat_map(|w| {
                w.parts.clone().map(|part| ResultKey {
                    year: w.year,
                    day: w.day,
                    part,
                })
            })
            .collect()
    }
}

impl From<&SolverResult> for ResultKey {
    fn from(r: &SolverResult) -> Self {
        Self {
            year: r.year,
            day: r.day,
            part: r.part,
        }
    }
}

impl fmt::Display for ResultKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{:02} Part {}", self.year, self.day, self.part)
    }
}

/// Buffers out-of-order results until their predecessors arrive
pub struct ResultAggregator {
    /// Keys not yet released
    outstanding: BTreeSet<ResultKey>,
    /// Received results waiting on an earlier key
    pending: BTreeMap<ResultKey, SolverResult>,
}

impl ResultAggregator {
    pub fn new(expected_keys: impl IntoIterator<Item = ResultKey>) -> Self {
        Self {
            outstanding: expected_keys.into_iter().collect(),
            pending: BTreeMap::new(),
        }
    }

    /// Add a result and return the run of results now ready, in order
    pub fn add(&mut self, result: SolverResult) -> Vec<SolverResult> {
        self.pending.insert(ResultKey::from(&result), result);

        let mut ready = Vec::new();
        while let Some(&next) = self.outstanding.first()
            && let Some(result) = self.pending.remove(&next)
        {
            self.outstanding.remove(&next);
            ready.push(result);
        }
        ready
    }

    /// Release whatever is still buffered, in order
    pub fn drain(&mut self) -> Vec<SolverResult> {
        let drained = std::mem::take(&mut self.pending);
        for key in drained.keys() {
            self.outstanding.remove(key);
        }
        drained.into_values().collect()
    }

    /// Keys that never produced a result
    pub fn missing(&self) -> impl Iterator<Item = &ResultKey> {
        self.outstanding.iter()
    }

    pub fn is_complete(&self) -> bool {
        self.outstanding.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use proptest::prelude::*;

    fn key(year: u16, day: u8, part: u8) -> ResultKey {
        ResultKey { year, day, part }
    }

    fn make_result(k: ResultKey) -> SolverResult {
        SolverResult {
            year: k.year,
            day: k.day,
            part: k.part,
            answer: Ok(k.to_string()),
            solve_duration: TimeDelta::milliseconds(10),
            parse_duration: Some(TimeDelta::milliseconds(5)),
        }
    }

    fn keys_of(results: &[SolverResult]) -> Vec<ResultKey> {
        results.iter().map(ResultKey::from).collect()
    }

    #[test]
    fn test_expected_keys_from_work() {
        let work = [
            WorkItem {
                year: 2021,
                day: 19,
                parts: 1..=2,
            },
            WorkItem {
                year: 2022,
                day: 25,
                parts: 1..=1,
            },
        ];
        assert_eq!(
            ResultKey::expected(&work),
            vec![key(2021, 19, 1), key(2021, 19, 2), key(2022, 25, 1)]
        );
        assert_eq!(key(2022, 3, 2).to_string(), "2022/03 Part 2");
    }

    #[test]
    fn test_out_of_order_results() {
        let mut agg = ResultAggregator::new([key(2022, 3, 1), key(2022, 3, 2), key(2022, 4, 1)]);

        assert!(agg.add(make_result(key(2022, 3, 2))).is_empty());
        assert!(agg.add(make_result(key(2022, 4, 1))).is_empty());

        let ready = agg.add(make_result(key(2022, 3, 1)));
        assert_eq!(
            keys_of(&ready),
            vec![key(2022, 3, 1), key(2022, 3, 2), key(2022, 4, 1)]
        );
        assert!(agg.is_complete());
    }

    #[test]
    fn test_failed_results_ordered_like_answers() {
        let mut agg = ResultAggregator::new([key(2021, 19, 1), key(2021, 19, 2)]);

        let mut failed = make_result(key(2021, 19, 2));
        failed.answer = Err(crate::error::ExecutorError::ChannelSend.into());
        assert!(agg.add(failed).is_empty());

        let ready = agg.add(make_result(key(2021, 19, 1)));
        assert!(ready[0].answer.is_ok());
        assert!(ready[1].answer.is_err());
        assert!(agg.is_complete());
    }

    #[test]
    fn test_drain_reports_missing() {
        let mut agg = ResultAggregator::new([key(2022, 16, 1), key(2022, 16, 2), key(2022, 17, 1)]);
        agg.add(make_result(key(2022, 17, 1)));
        agg.add(make_result(key(2022, 16, 2)));

        let remaining = agg.drain();
        assert_eq!(keys_of(&remaining), vec![key(2022, 16, 2), key(2022, 17, 1)]);
        assert_eq!(agg.missing().copied().collect::<Vec<_>>(), vec![key(2022, 16, 1)]);
        assert!(!agg.is_complete());
    }

    proptest! {
        /// Any arrival order releases every result exactly once, sorted
        #[test]
        fn prop_any_arrival_order_is_released_sorted(
            arrival in Just(
                (2021u16..=2022)
                    .flat_map(|year| (1u8..=5).flat_map(move |day| (1u8..=2).map(move |part| key(year, day, part))))
                    .collect::<Vec<_>>()
            ).prop_shuffle()
        ) {
            let mut sorted = arrival.clone();
            sorted.sort();

            let mut agg = ResultAggregator::new(arrival.clone());
            let mut released = Vec::new();
            for k in arrival {
                released.extend(agg.add(make_result(k)));
            }

            prop_assert!(agg.is_complete());
            prop_assert!(agg.drain().is_empty());
            prop_assert_eq!(keys_of(&released), sorted);
        }
    }
}
