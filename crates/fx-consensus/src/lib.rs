//! Consensus over per-provider signals.
//!
//! [`aggregate`] is the pure vote-counting step. [`ConsensusEngine`] runs
//! every provider pipeline concurrently and feeds the outcomes into it.

mod aggregator;
mod engine;
mod report;

pub use aggregator::{aggregate, agreement_level, summarize};
pub use engine::{ConsensusEngine, FetchMode};
pub use report::ConsensusReport;
