use serde::{Deserialize, Serialize};

/// The direction of a rebalancing conversion.
///
/// `Buy` converts the stable balance into the volatile asset, `Sell` converts
/// the volatile balance (above the reserve) into the stable asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    /// Whether a trade on this side at `price` beats the previous trade price.
    ///
    /// Buying below the last trade price is a win, selling above it is a win.
    /// Only the immediately preceding trade is consulted.
    pub fn is_win(&self, price: f64, last_trade_price: f64) -> bool {
        match self {
            TradeSide::Buy => price < last_trade_price,
            TradeSide::Sell => price > last_trade_price,
        }
    }
}
