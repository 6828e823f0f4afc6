//! Link planning and reconciliation.
//!
//! [`plan`] maps a resolved theme onto an app's real config locations and
//! [`LinkExecutor`] makes the filesystem match, one operation at a time.

pub mod executor;
pub mod plan;
pub mod scripts;
pub mod symlink;

pub use executor::{ApplyOutcome, CommandRun, LinkExecutor, LinkFailure, LinkStatus, LinkSuccess};
pub use plan::{LinkOperation, plan, plan_for_target};
pub use scripts::ScriptPlan;
