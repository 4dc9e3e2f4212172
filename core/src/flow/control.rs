// storefront/src/flow/control.rs

/// Returned by a step handler to keep going or end the flow early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepControl {
  Continue,
  /// Halt now. Remaining handlers and steps are not run.
  Stop,
}

/// How a full flow run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowOutcome {
  Completed,
  Stopped,
}
