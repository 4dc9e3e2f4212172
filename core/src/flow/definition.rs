// storefront/src/flow/definition.rs

use super::control::{FlowOutcome, StepControl};
use super::state::FlowState;
use super::step::{SkipCondition, StepDef};
use super::FlowError;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use tracing::{event, instrument, span, Instrument, Level};

/// A boxed async step handler over `FlowState<TData>`.
pub type StepHandler<TData, Err> = Box<
  dyn Fn(FlowState<TData>) -> Pin<Box<dyn Future<Output = Result<StepControl, Err>> + Send>> + Send + Sync,
>;

/// An ordered list of named steps with the handlers bound to them.
///
/// `Err` is what handlers return; it must absorb [`FlowError`] so that a
/// misconfigured flow (a required step with no handler) surfaces through
/// the same channel as handler failures.
pub struct Flow<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  name: &'static str,
  steps: Vec<StepDef<TData>>,
  handlers: HashMap<String, Vec<StepHandler<TData, Err>>>,
}

impl<TData, Err> Flow<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  /// Creates a flow from `(step name, optional, skip condition)` triples.
  pub fn new(name: &'static str, step_defs: &[(&str, bool, Option<SkipCondition<TData>>)]) -> Self {
    let steps = step_defs
      .iter()
      .map(|(step_name, optional, skip_if)| StepDef {
        name: (*step_name).to_string(),
        optional: *optional,
        skip_if: skip_if.clone(),
      })
      .collect();

    Self {
      name,
      steps,
      handlers: HashMap::new(),
    }
  }

  pub fn name(&self) -> &'static str {
    self.name
  }

  pub fn step_names(&self) -> Vec<&str> {
    self.steps.iter().map(|s| s.name.as_str()).collect()
  }

  /// Binds a handler to `step_name`. Several handlers on one step run in
  /// registration order.
  ///
  /// # Panics
  /// If the step was not declared in [`Flow::new`]. That is a setup bug,
  /// not a runtime condition.
  pub fn on_step<F, UserErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(FlowState<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<StepControl, UserErr>> + Send + 'static,
    UserErr: Into<Err> + Send + Sync + 'static,
  {
    if !self.steps.iter().any(|s| s.name == step_name) {
      panic!("Flow '{}' setup error: step '{}' is not declared.", self.name, step_name);
    }
    let handler: StepHandler<TData, Err> = Box::new(move |state| {
      let fut = handler_fn(state);
      Box::pin(async move { fut.await.map_err(Into::into) })
    });
    self.handlers.entry(step_name.to_string()).or_default().push(handler);
  }

  #[instrument(
    name = "Flow::run",
    skip_all,
    fields(flow = self.name, num_steps = self.steps.len()),
    err(Display)
  )]
  pub async fn run(&self, state: FlowState<TData>) -> Result<FlowOutcome, Err> {
    for (step_idx, step_def) in self.steps.iter().enumerate() {
      let step_span = span!(
        Level::INFO,
        "flow_step",
        step_name = step_def.name.as_str(),
        step_index = step_idx
      );

      if step_def.should_skip(&state) {
        event!(parent: &step_span, Level::DEBUG, "Step skipped by its skip condition.");
        continue;
      }

      let handlers = match self.handlers.get(&step_def.name) {
        Some(handlers) if !handlers.is_empty() => handlers,
        _ if step_def.optional => {
          event!(parent: &step_span, Level::DEBUG, "Optional step has no handlers, skipping.");
          continue;
        }
        _ => {
          event!(parent: &step_span, Level::ERROR, "Non-optional step has no handlers.");
          return Err(Err::from(FlowError::HandlerMissing {
            step_name: step_def.name.clone(),
          }));
        }
      };

      for handler in handlers {
        match handler(state.clone()).instrument(step_span.clone()).await {
          Ok(StepControl::Continue) => {}
          Ok(StepControl::Stop) => {
            event!(parent: &step_span, Level::INFO, "Flow stopped by step handler.");
            return Ok(FlowOutcome::Stopped);
          }
          Err(e) => {
            event!(parent: &step_span, Level::WARN, error = %e, "Step handler failed.");
            return Err(e);
          }
        }
      }
    }

    event!(Level::DEBUG, "Flow completed.");
    Ok(FlowOutcome::Completed)
  }
}
