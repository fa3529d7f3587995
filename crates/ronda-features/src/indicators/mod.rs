//! Technical indicator primitives.
//!
//! Each indicator is a pure function over a price or volume series and
//! returns a vector aligned with the input, with `None` for positions that
//! fall inside the indicator's warmup window. The feature engine trims
//! warmup rows; indicators never pad with synthetic data.

mod momentum;
mod trend;
mod volatility;

pub use momentum::{momentum, rsi};
pub use trend::{bollinger_position, ema, price_vs_ma, sma};
pub use volatility::{daily_returns, rolling_volatility, volume_ratio};
