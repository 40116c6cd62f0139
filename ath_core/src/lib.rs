//! All-time-high watch engine.
//!
//! Given a daily price series the engine answers three questions: where the
//! all-time-high is, what the lowest point of the current drawdown was, and
//! where the current price sits between the two. It also produces normalized
//! drawdown curves, one per "new high to new high" episode, for overlay
//! comparison.
//!
//! The pipeline, leaf first:
//!
//! - [`segment`] partitions the series into episodes and picks the active one.
//! - [`locate`] pins a daily extreme down to a minute timestamp, falling back
//!   to the market close of that day when intraday data is unavailable.
//! - [`curves`] turns episodes into normalized trajectories.
//! - [`status`] computes the relative-position facts.
//! - [`analysis`] wires a [`DataProvider`](market_data::providers::DataProvider)
//!   through all of the above.

pub mod analysis;
pub mod context;
pub mod curves;
pub mod error;
pub mod locate;
pub mod segment;
pub mod status;
pub mod tz;

pub use analysis::{Analysis, AnalysisRequest, CurrentPrice, analyze};
pub use context::AnalysisContext;
pub use curves::{Curve, CurveFilter, CurvePoint, build_curves};
pub use error::AnalysisError;
pub use locate::{ExtremeLocator, Extremum, FallbackReason, Refinement, Seek};
pub use segment::{Episode, Segmentation, segment};
pub use status::{Status, report};
