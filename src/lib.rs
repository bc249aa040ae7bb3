//! Parametric retrofit measures for whole-building energy models.
//!
//! A [`domain::BuildingModel`] is edited in place by the measures in
//! [`measures`], usually driven through a [`workflow::Workflow`]. The model
//! edits themselves live in [`retrofit`].

pub mod config;
pub mod domain;
pub mod error;
pub mod measures;
pub mod messages;
pub mod retrofit;
pub mod telemetry;
pub mod units;
pub mod workflow;

pub use domain::BuildingModel;
pub use error::{Result, RetrofitError};
pub use workflow::{MeasureSelection, Workflow, WorkflowReport};
