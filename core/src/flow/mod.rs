// storefront/src/flow/mod.rs

//! A small named-step flow runner.
//!
//! Checkout and payment-callback processing are both short, ordered
//! sequences of async steps over a shared context. A [`Flow`] holds the step
//! list, the handlers bound to each step, and runs them in order until a
//! handler stops the flow or fails.

pub mod control;
pub mod definition;
pub mod state;
pub mod step;

pub use control::{FlowOutcome, StepControl};
pub use definition::{Flow, StepHandler};
pub use state::FlowState;
pub use step::{SkipCondition, StepDef};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("Handler missing for non-optional step: {step_name}")]
    HandlerMissing { step_name: String },

    #[error("Flow '{flow}' was halted before producing a result")]
    Halted { flow: &'static str },

    #[error("Flow '{flow}' completed without setting {missing}")]
    Incomplete { flow: &'static str, missing: &'static str },
}
