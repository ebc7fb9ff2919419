use super::ui;
use crate::core::sum::{MAX_N, MAX_REDUCE_N, SumStrategy, sum_to_n};
use anyhow::{Result, anyhow, bail};

/// A single strategy prints the bare number; no strategy compares all three.
/// Reduce is skipped in the comparison when `n` is too large to materialize.
pub fn render(n: u64, strategy: Option<SumStrategy>) -> Result<String> {
    if n > MAX_N {
        bail!("Sum of 1..={n} does not fit in 64 bits, n must be at most {MAX_N}");
    }

    if let Some(strategy) = strategy {
        if strategy == SumStrategy::Reduce && n > MAX_REDUCE_N {
            bail!("The reduce strategy is limited to n <= {MAX_REDUCE_N}");
        }
        return Ok(checked_sum(n, strategy)?.to_string());
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Strategy"), ui::header_cell("Sum")]);
    for strategy in SumStrategy::ALL {
        let sum = if strategy == SumStrategy::Reduce && n > MAX_REDUCE_N {
            ui::style_text("skipped", ui::StyleType::Subtle)
        } else {
            checked_sum(n, strategy)?.to_string()
        };
        table.add_row(vec![
            comfy_table::Cell::new(strategy.to_string()),
            ui::number_cell(sum),
        ]);
    }
    Ok(format!(
        "Sum of 1..={}\n\n{}",
        ui::style_text(&n.to_string(), ui::StyleType::Title),
        table
    ))
}

fn checked_sum(n: u64, strategy: SumStrategy) -> Result<u64> {
    sum_to_n(n, strategy).ok_or_else(|| anyhow!("Sum of 1..={n} overflowed with {strategy}"))
}

pub fn run(n: u64, strategy: Option<SumStrategy>) -> Result<()> {
    println!("{}", render(n, strategy)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_single_strategy() {
        assert_eq!(render(10, Some(SumStrategy::Loop)).unwrap(), "55");
        assert_eq!(render(0, Some(SumStrategy::ClosedForm)).unwrap(), "0");
        assert_eq!(
            render(MAX_N, Some(SumStrategy::ClosedForm)).unwrap(),
            "18446744070963499500"
        );
    }

    #[test]
    fn test_render_all_strategies() {
        let output = render(100, None).unwrap();
        for name in ["reduce", "closed-form", "loop"] {
            assert!(output.contains(name), "missing {name} in {output}");
        }
        assert_eq!(output.matches("5050").count(), 3);
    }

    #[test]
    fn test_render_rejects_overflowing_n() {
        for strategy in [None, Some(SumStrategy::ClosedForm), Some(SumStrategy::Loop)] {
            let err = render(6_074_001_000, strategy).unwrap_err();
            assert!(err.to_string().contains("does not fit in 64 bits"));
        }
    }

    #[test]
    fn test_render_caps_reduce() {
        let err = render(MAX_REDUCE_N + 1, Some(SumStrategy::Reduce)).unwrap_err();
        assert!(err.to_string().contains("limited to n <= 10000000"));
    }
}
