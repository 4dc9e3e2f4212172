// tests/flow_tests.rs
mod common;

use common::setup_tracing;
use serial_test::serial;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use storefront::{Flow, FlowError, FlowOutcome, FlowState, StepControl};

#[derive(Debug, Default)]
struct TestContext {
  counter: i32,
  steps_executed: Vec<String>,
  stop_at: Option<&'static str>,
}

#[derive(Debug, thiserror::Error)]
enum TestError {
  #[error("flow error: {0}")]
  Flow(#[from] FlowError),

  #[error("handler failed: {0}")]
  Handler(String),
}

static HANDLER_CALLS: AtomicUsize = AtomicUsize::new(0);

fn recording_step(flow: &mut Flow<TestContext, TestError>, step: &'static str) {
  flow.on_step(step, move |ctx: FlowState<TestContext>| async move {
    HANDLER_CALLS.fetch_add(1, Ordering::SeqCst);
    let mut guard = ctx.write();
    guard.counter += 1;
    guard.steps_executed.push(step.to_string());
    if guard.stop_at == Some(step) {
      return Ok(StepControl::Stop);
    }
    Ok::<_, TestError>(StepControl::Continue)
  });
}

#[tokio::test]
#[serial]
async fn test_flow_runs_steps_in_order() {
  setup_tracing();
  HANDLER_CALLS.store(0, Ordering::SeqCst);
  let mut flow = Flow::<TestContext, TestError>::new("ordered", &[("a", false, None), ("b", false, None), ("c", false, None)]);
  recording_step(&mut flow, "a");
  recording_step(&mut flow, "b");
  recording_step(&mut flow, "c");

  let ctx = FlowState::new(TestContext::default());
  let outcome = flow.run(ctx.clone()).await.unwrap();

  assert_eq!(outcome, FlowOutcome::Completed);
  assert_eq!(ctx.read().steps_executed, vec!["a", "b", "c"]);
  assert_eq!(HANDLER_CALLS.load(Ordering::SeqCst), 3);
}

#[tokio::test]
#[serial]
async fn test_flow_stops_when_a_step_says_stop() {
  setup_tracing();
  HANDLER_CALLS.store(0, Ordering::SeqCst);
  let mut flow = Flow::<TestContext, TestError>::new("stopping", &[("a", false, None), ("b", false, None), ("c", false, None)]);
  recording_step(&mut flow, "a");
  recording_step(&mut flow, "b");
  recording_step(&mut flow, "c");

  let ctx = FlowState::new(TestContext {
    stop_at: Some("b"),
    ..Default::default()
  });
  let outcome = flow.run(ctx.clone()).await.unwrap();

  assert_eq!(outcome, FlowOutcome::Stopped);
  assert_eq!(ctx.read().steps_executed, vec!["a", "b"]);
  assert_eq!(HANDLER_CALLS.load(Ordering::SeqCst), 2);
}

#[tokio::test]
#[serial]
async fn test_flow_propagates_handler_error() {
  setup_tracing();
  let mut flow = Flow::<TestContext, TestError>::new("failing", &[("good", false, None), ("bad", false, None), ("never", false, None)]);
  recording_step(&mut flow, "good");
  flow.on_step("bad", |ctx: FlowState<TestContext>| async move {
    ctx.write().steps_executed.push("bad".to_string());
    Err::<StepControl, _>(TestError::Handler("boom".to_string()))
  });
  recording_step(&mut flow, "never");

  let ctx = FlowState::new(TestContext::default());
  match flow.run(ctx.clone()).await {
    Err(TestError::Handler(msg)) => assert_eq!(msg, "boom"),
    other => panic!("Expected TestError::Handler, got {:?}", other),
  }
  assert_eq!(ctx.read().steps_executed, vec!["good", "bad"]);
}

#[tokio::test]
#[serial]
async fn test_flow_skips_step_when_condition_holds() {
  setup_tracing();
  let mut flow = Flow::<TestContext, TestError>::new(
    "skipping",
    &[
      ("first", false, None),
      ("skipped", false, Some(Arc::new(|ctx: &TestContext| ctx.counter > 0))),
      ("last", false, None),
    ],
  );
  recording_step(&mut flow, "first");
  recording_step(&mut flow, "skipped");
  recording_step(&mut flow, "last");

  let ctx = FlowState::new(TestContext::default());
  assert_eq!(flow.run(ctx.clone()).await.unwrap(), FlowOutcome::Completed);
  assert_eq!(ctx.read().steps_executed, vec!["first", "last"]);
}

#[tokio::test]
#[serial]
async fn test_required_step_without_handler_is_an_error() {
  setup_tracing();
  let flow = Flow::<TestContext, TestError>::new("unwired", &[("missing", false, None)]);
  match flow.run(FlowState::new(TestContext::default())).await {
    Err(TestError::Flow(FlowError::HandlerMissing { step_name })) => assert_eq!(step_name, "missing"),
    other => panic!("Expected HandlerMissing, got {:?}", other),
  }
}

#[tokio::test]
#[serial]
async fn test_optional_step_without_handler_is_skipped() {
  setup_tracing();
  let mut flow = Flow::<TestContext, TestError>::new("optional", &[("maybe", true, None), ("always", false, None)]);
  recording_step(&mut flow, "always");

  let ctx = FlowState::new(TestContext::default());
  assert_eq!(flow.run(ctx.clone()).await.unwrap(), FlowOutcome::Completed);
  assert_eq!(ctx.read().steps_executed, vec!["always"]);
  assert_eq!(flow.step_names(), vec!["maybe", "always"]);
}

#[test]
#[should_panic(expected = "is not declared")]
fn test_binding_an_undeclared_step_panics() {
  let mut flow = Flow::<TestContext, TestError>::new("typo", &[("real", false, None)]);
  recording_step(&mut flow, "reel");
}
