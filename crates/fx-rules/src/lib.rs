//! Provider-specific signal rules.
//!
//! Each rule turns one provider's normalized data plus the computed
//! indicators into a [`Signal`](fx_core::Signal):
//! - Momentum only (quote snapshots)
//! - Momentum + single moving average
//! - Momentum + dual moving average + support/resistance
//! - Third-party technical summary
//! - Session placeholder (synthetic, no market data)

mod confluence;
mod momentum;
mod registry;
mod session;
mod summary;
mod trend;

pub use confluence::{ConfluenceConfig, ConfluenceRule};
pub use momentum::{MomentumRule, MomentumThresholds};
pub use registry::{RuleInfo, RuleRegistry, RuleSettings};
pub use session::{SessionCheckpoint, SessionRule, SESSION_CHECKPOINTS};
pub use summary::SummaryRule;
pub use trend::{TrendConfig, TrendRule};
