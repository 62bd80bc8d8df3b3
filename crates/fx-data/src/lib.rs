//! Provider adapters.
//!
//! Each adapter turns one upstream API into [`ProviderData`]. Response
//! parsing lives in plain functions so it can be tested without a network.
//!
//! [`ProviderData`]: fx_core::ProviderData

mod alpha_vantage;
mod http;
mod parse;
mod replay;
mod tradingview;
mod truefx;
mod twelve_data;

pub use alpha_vantage::{AlphaVantageConfig, AlphaVantageProvider};
pub use http::HttpSettings;
pub use parse::parse_timestamp;
pub use replay::ReplayProvider;
pub use tradingview::{TradingViewConfig, TradingViewProvider};
pub use truefx::{TrueFxProvider, TRUEFX_PAIRS};
pub use twelve_data::{TwelveDataConfig, TwelveDataProvider};
