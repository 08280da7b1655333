// glowcart/src/pipeline/mod.rs

//! A small synchronous step pipeline: named steps, each with `before`, `on`
//! and `after` handlers operating on a shared `&mut TData`. Checkout is
//! expressed as one of these so extra steps or hooks can be slotted in.

pub mod control;
pub mod definition;
pub mod execution;
pub mod hooks;
pub mod step;

pub use control::{PipelineControl, PipelineResult};
pub use definition::{Handler, Pipeline};
pub use step::{SkipCondition, StepDef};
