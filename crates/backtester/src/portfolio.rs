use configuration::SimulationParams;
use core_types::{Sample, TradeFill, TradeSide};

/// The two-asset holding of a single simulation run.
///
/// Created from the initial allocation at the start of a run and dropped at
/// the end; it never outlives the run that owns it. Each conversion computes
/// both legs before touching either balance, so a trade is applied whole.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioState {
    pub volatile_balance: f64,
    pub stable_balance: f64,
    /// Price of the most recent conversion, or the opening price before any trade.
    pub last_trade_price: f64,
}

impl PortfolioState {
    /// Splits `initial_capital` evenly between the two assets at `opening_price`.
    pub fn new(initial_capital: f64, opening_price: f64) -> Self {
        let initial_volatile = initial_capital / opening_price;
        Self {
            volatile_balance: initial_volatile / 2.0,
            stable_balance: initial_capital / 2.0,
            last_trade_price: opening_price,
        }
    }

    /// Total holding value in stable-asset units.
    pub fn value_at(&self, price: f64) -> f64 {
        self.volatile_balance * price + self.stable_balance
    }

    /// Converts the entire stable balance into the volatile asset.
    ///
    /// The platform fee is taken from the stable amount before conversion, the
    /// flat fee from the volatile amount received. Returns `None` when there is
    /// no stable balance to convert.
    pub fn buy_all(&mut self, sample: &Sample, params: &SimulationParams) -> Option<TradeFill> {
        if self.stable_balance <= 0.0 {
            return None;
        }

        let amount_in = self.stable_balance;
        let platform_fee = amount_in * params.platform_fee_rate;
        let amount_out = (amount_in - platform_fee) / sample.price - params.flat_fee;

        // Floor at zero: only reachable when the flat fee exceeds the whole position.
        self.volatile_balance = (self.volatile_balance + amount_out).max(0.0);
        self.stable_balance = 0.0;

        Some(self.settle(
            sample,
            TradeSide::Buy,
            amount_in,
            amount_out,
            platform_fee,
            params.flat_fee,
        ))
    }

    /// Converts everything above the reserve (less the flat fee) into the stable asset.
    ///
    /// Returns `None` when the balance is at or below the reserve, or when
    /// nothing would be left to sell after the flat fee.
    pub fn sell_excess(&mut self, sample: &Sample, params: &SimulationParams) -> Option<TradeFill> {
        if self.volatile_balance <= params.reserve {
            return None;
        }

        let available = self.volatile_balance - params.reserve - params.flat_fee;
        if available <= 0.0 {
            return None;
        }

        let proceeds = available * sample.price;
        let platform_fee = proceeds * params.platform_fee_rate;
        let amount_out = proceeds - platform_fee;

        self.stable_balance += amount_out;
        self.volatile_balance = params.reserve;

        Some(self.settle(
            sample,
            TradeSide::Sell,
            available,
            amount_out,
            platform_fee,
            params.flat_fee,
        ))
    }

    fn settle(
        &mut self,
        sample: &Sample,
        side: TradeSide,
        amount_in: f64,
        amount_out: f64,
        platform_fee: f64,
        flat_fee: f64,
    ) -> TradeFill {
        let is_win = side.is_win(sample.price, self.last_trade_price);
        self.last_trade_price = sample.price;

        TradeFill {
            timestamp: sample.timestamp,
            side,
            price: sample.price,
            amount_in,
            amount_out,
            platform_fee,
            flat_fee,
            is_win,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PortfolioState;
    use chrono::{TimeZone, Utc};
    use configuration::SimulationParams;
    use core_types::{Sample, TradeSide};

    fn sample(price: f64) -> Sample {
        Sample::new(Utc.timestamp_opt(0, 0).unwrap(), price, 50.0)
    }

    #[test]
    fn opens_with_an_even_split() {
        let state = PortfolioState::new(1000.0, 100.0);
        assert_eq!(state.volatile_balance, 5.0);
        assert_eq!(state.stable_balance, 500.0);
        assert_eq!(state.value_at(100.0), 1000.0);
    }

    #[test]
    fn buy_all_applies_platform_fee_then_flat_fee() {
        let params = SimulationParams::default();
        let mut state = PortfolioState::new(1000.0, 100.0);

        let fill = state.buy_all(&sample(80.0), &params).unwrap();

        let expected_out = (500.0 - 500.0 * 0.0009) / 80.0 - 0.0001;
        assert_eq!(fill.side, TradeSide::Buy);
        assert_eq!(fill.amount_in, 500.0);
        assert_eq!(fill.platform_fee, 500.0 * 0.0009);
        assert_eq!(fill.amount_out, expected_out);
        assert!(fill.is_win);
        assert_eq!(state.stable_balance, 0.0);
        assert_eq!(state.volatile_balance, 5.0 + expected_out);
        assert_eq!(state.last_trade_price, 80.0);
    }

    #[test]
    fn buy_all_is_a_no_op_without_stable_balance() {
        let params = SimulationParams::default();
        let mut state = PortfolioState::new(1000.0, 100.0);
        state.buy_all(&sample(100.0), &params).unwrap();

        let before = state.clone();
        assert!(state.buy_all(&sample(90.0), &params).is_none());
        assert_eq!(state, before);
    }

    #[test]
    fn sell_excess_keeps_the_reserve() {
        let params = SimulationParams::default();
        let mut state = PortfolioState::new(1000.0, 100.0);

        let fill = state.sell_excess(&sample(120.0), &params).unwrap();

        let available = 5.0 - 0.01 - 0.0001;
        let proceeds = available * 120.0;
        assert_eq!(fill.side, TradeSide::Sell);
        assert_eq!(fill.amount_in, available);
        assert_eq!(fill.amount_out, proceeds - proceeds * 0.0009);
        assert!(fill.is_win);
        assert_eq!(state.volatile_balance, 0.01);
        assert_eq!(state.stable_balance, 500.0 + (proceeds - proceeds * 0.0009));
    }

    #[test]
    fn sell_excess_skips_when_flat_fee_eats_the_excess() {
        let params = SimulationParams {
            flat_fee: 1.0,
            ..SimulationParams::default()
        };
        let mut state = PortfolioState::new(1000.0, 100.0);
        state.volatile_balance = 0.5;

        assert!(state.sell_excess(&sample(100.0), &params).is_none());
        assert_eq!(state.volatile_balance, 0.5);
    }

    #[test]
    fn buy_all_never_leaves_a_negative_balance() {
        let params = SimulationParams {
            flat_fee: 10.0,
            ..SimulationParams::default()
        };
        let mut state = PortfolioState::new(1000.0, 100.0);
        state.volatile_balance = 0.0;
        state.stable_balance = 1.0;

        let fill = state.buy_all(&sample(100.0), &params).unwrap();
        assert!(fill.amount_out < 0.0);
        assert_eq!(state.volatile_balance, 0.0);
        assert_eq!(state.stable_balance, 0.0);
    }

    #[test]
    fn fee_free_conversions_preserve_value() {
        let params = SimulationParams {
            platform_fee_rate: 0.0,
            flat_fee: 0.0,
            reserve: 0.0,
            ..SimulationParams::default()
        };
        let mut state = PortfolioState::new(1000.0, 100.0);

        state.buy_all(&sample(125.0), &params).unwrap();
        let after_buy = state.value_at(125.0);
        state.sell_excess(&sample(125.0), &params).unwrap();

        assert!((after_buy - state.value_at(125.0)).abs() < 1e-9);
        assert_eq!(state.volatile_balance, 0.0);
    }
}
