use backtester::{simulate, Backtester};
use chrono::{TimeZone, Utc};
use configuration::SimulationParams;
use core_types::Sample;
use proptest::prelude::*;

/// Samples one hour apart, so every permutation sorts back to the same order.
fn sample_sequence() -> impl Strategy<Value = Vec<Sample>> {
    prop::collection::vec((1.0f64..100_000.0, 0.0f64..100.0), 1..48).prop_map(|points| {
        points
            .into_iter()
            .enumerate()
            .map(|(i, (price, sentiment))| {
                Sample::new(
                    Utc.timestamp_opt(1_600_000_000 + i as i64 * 3_600, 0).unwrap(),
                    price,
                    sentiment,
                )
            })
            .collect()
    })
}

fn sequence_and_permutation() -> impl Strategy<Value = (Vec<Sample>, Vec<Sample>)> {
    sample_sequence().prop_flat_map(|samples| {
        let shuffled = Just(samples.clone()).prop_shuffle();
        (Just(samples), shuffled)
    })
}

proptest! {
    #[test]
    fn balances_never_go_negative(samples in sample_sequence(), threshold in -20.0f64..120.0) {
        let result = simulate(&samples, threshold).unwrap();
        prop_assert!(result.final_volatile_balance >= 0.0);
        prop_assert!(result.final_stable_balance >= 0.0);
    }

    #[test]
    fn trade_counts_are_consistent(samples in sample_sequence(), threshold in 0.0f64..100.0) {
        let result = simulate(&samples, threshold).unwrap();
        prop_assert!(result.num_trades >= result.winning_trades);
        prop_assert_eq!(result.trades.len(), result.num_trades);
        prop_assert_eq!(
            result.trades.iter().filter(|t| t.is_win).count(),
            result.winning_trades
        );
        if result.num_trades == 0 {
            prop_assert_eq!(result.win_rate_pct, 0.0);
        }
        prop_assert!(result.num_trades < samples.len().max(1));
    }

    #[test]
    fn repeated_runs_are_identical(samples in sample_sequence(), threshold in 0.0f64..100.0) {
        let first = simulate(&samples, threshold).unwrap();
        let second = simulate(&samples, threshold).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn permuted_input_gives_the_same_result(
        (samples, shuffled) in sequence_and_permutation(),
        threshold in 0.0f64..100.0,
    ) {
        prop_assert_eq!(
            simulate(&samples, threshold).unwrap(),
            simulate(&shuffled, threshold).unwrap()
        );
    }

    #[test]
    fn without_fees_value_only_moves_with_price(
        samples in sample_sequence(),
        threshold in 0.0f64..100.0,
    ) {
        let params = SimulationParams {
            platform_fee_rate: 0.0,
            flat_fee: 0.0,
            ..SimulationParams::default()
        };
        let result = Backtester::new(params).unwrap().run(&samples, threshold).unwrap();

        for trade in &result.trades {
            let (given, received) = match trade.side {
                core_types::TradeSide::Buy => (trade.amount_in, trade.amount_out * trade.price),
                core_types::TradeSide::Sell => (trade.amount_in * trade.price, trade.amount_out),
            };
            prop_assert!((given - received).abs() <= 1e-9 * given.abs().max(1.0));
        }
    }
}
