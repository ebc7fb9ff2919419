//! Three equivalent ways of summing the integers `1..=n`.

use clap::ValueEnum;
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SumStrategy {
    /// Materialize `1..=n` and fold it
    Reduce,
    /// n(n+1)/2
    ClosedForm,
    /// Accumulate in a loop
    Loop,
}

impl SumStrategy {
    pub const ALL: [SumStrategy; 3] = [
        SumStrategy::Reduce,
        SumStrategy::ClosedForm,
        SumStrategy::Loop,
    ];
}

impl Display for SumStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                SumStrategy::Reduce => "reduce",
                SumStrategy::ClosedForm => "closed-form",
                SumStrategy::Loop => "loop",
            }
        )
    }
}

/// Largest `n` the reduce strategy will materialize.
pub const MAX_REDUCE_N: u64 = 10_000_000;

/// Largest `n` whose sum still fits in a `u64`.
pub const MAX_N: u64 = 6_074_000_999;

/// Builds the whole sequence before reducing it. O(n) time and space.
/// `None` when the sum overflows.
pub fn sum_by_reduce(n: u64) -> Option<u64> {
    let values: Vec<u64> = (1..=n).collect();
    values.iter().try_fold(0u64, |acc, cur| acc.checked_add(*cur))
}

/// O(1). The even factor is halved first so the product only overflows
/// when the result itself does not fit.
pub fn sum_closed_form(n: u64) -> Option<u64> {
    if n % 2 == 0 {
        (n / 2).checked_mul(n + 1)
    } else {
        n.checked_mul(n / 2 + 1)
    }
}

/// O(n) time, O(1) space.
pub fn sum_by_loop(n: u64) -> Option<u64> {
    let mut total: u64 = 0;
    for i in 1..=n {
        total = total.checked_add(i)?;
    }
    Some(total)
}

pub fn sum_to_n(n: u64, strategy: SumStrategy) -> Option<u64> {
    match strategy {
        SumStrategy::Reduce => sum_by_reduce(n),
        SumStrategy::ClosedForm => sum_closed_form(n),
        SumStrategy::Loop => sum_by_loop(n),
    }
}
