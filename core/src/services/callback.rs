// storefront/src/services/callback.rs

//! Gateway postback processing: verify the payment and settle the order.

use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::error::{ShopError, ShopResult};
use crate::flow::{Flow, FlowError, FlowState, SkipCondition, StepControl};
use crate::gateway::{PaymentGateway, PaymentSignature};
use crate::models::{Order, OrderStatus, Settlement};
use crate::store::Store;

const FLOW_NAME: &str = "payment_callback";

/// Fields the gateway posts back. Any of them may be missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentCallback {
  #[serde(rename = "razorpay_order_id")]
  pub gateway_order_id: Option<String>,
  #[serde(rename = "razorpay_payment_id")]
  pub gateway_payment_id: Option<String>,
  #[serde(rename = "razorpay_signature")]
  pub gateway_signature: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CallbackOutcome {
  /// Signature verified; the order is `paid` and its lines left the cart.
  Paid { order: Order },
  /// Signature rejected; the order is `failed` and the cart is untouched.
  Failed { order: Order },
  /// No order id, or no local order with that gateway id. Nothing changed.
  Ignored,
  /// The order had already left `created`. Nothing changed.
  AlreadySettled { order: Order },
}

struct CallbackCtx {
  store: Arc<dyn Store>,
  gateway: Arc<dyn PaymentGateway>,
  callback: PaymentCallback,
  order: Option<Order>,
  verified: bool,
  outcome: Option<CallbackOutcome>,
}

#[derive(Clone)]
pub struct PaymentCallbackHandler {
  store: Arc<dyn Store>,
  gateway: Arc<dyn PaymentGateway>,
  flow: Arc<Flow<CallbackCtx, ShopError>>,
}

impl PaymentCallbackHandler {
  pub fn new(store: Arc<dyn Store>, gateway: Arc<dyn PaymentGateway>) -> Self {
    Self {
      store,
      gateway,
      flow: Arc::new(build_callback_flow()),
    }
  }

  #[instrument(
    name = "callback::handle",
    skip(self, callback),
    fields(gateway_order_id = ?callback.gateway_order_id),
    err(Display)
  )]
  pub async fn handle(&self, callback: PaymentCallback) -> ShopResult<CallbackOutcome> {
    let state = FlowState::new(CallbackCtx {
      store: self.store.clone(),
      gateway: self.gateway.clone(),
      callback,
      order: None,
      verified: false,
      outcome: None,
    });

    // Early exits stop the flow after recording their outcome, so the
    // outcome is read the same way whether the flow completed or stopped.
    self.flow.run(state.clone()).await?;
    let outcome = state.write().outcome.take();
    outcome.ok_or_else(|| {
      FlowError::Incomplete {
        flow: FLOW_NAME,
        missing: "outcome",
      }
      .into()
    })
  }
}

fn current_order(ctx: &CallbackCtx) -> ShopResult<Order> {
  ctx.order.clone().ok_or_else(|| {
    ShopError::from(FlowError::Incomplete {
      flow: FLOW_NAME,
      missing: "order",
    })
  })
}

fn build_callback_flow() -> Flow<CallbackCtx, ShopError> {
  let unless_paid: SkipCondition<CallbackCtx> =
    Arc::new(|ctx: &CallbackCtx| !matches!(ctx.outcome, Some(CallbackOutcome::Paid { .. })));

  let mut flow = Flow::<CallbackCtx, ShopError>::new(
    FLOW_NAME,
    &[
      ("match_local_order", false, None),
      ("skip_settled_order", false, None),
      ("verify_signature", false, None),
      ("settle_order", false, None),
      ("release_ordered_items", false, Some(unless_paid)),
    ],
  );

  flow.on_step("match_local_order", |ctx: FlowState<CallbackCtx>| async move {
    let (store, gateway_order_id) = {
      let guard = ctx.read();
      let id = guard
        .callback
        .gateway_order_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string);
      (guard.store.clone(), id)
    };

    let Some(gateway_order_id) = gateway_order_id else {
      warn!("Callback without a gateway order id; ignoring.");
      ctx.write().outcome = Some(CallbackOutcome::Ignored);
      return Ok(StepControl::Stop);
    };

    match store.find_order_by_gateway_id(&gateway_order_id).await? {
      Some(order) => {
        ctx.write().order = Some(order);
        Ok::<_, ShopError>(StepControl::Continue)
      }
      None => {
        warn!(%gateway_order_id, "Callback for an unknown gateway order; ignoring.");
        ctx.write().outcome = Some(CallbackOutcome::Ignored);
        Ok(StepControl::Stop)
      }
    }
  });

  flow.on_step("skip_settled_order", |ctx: FlowState<CallbackCtx>| async move {
    let mut guard = ctx.write();
    let order = current_order(&guard)?;
    if order.status.is_terminal() {
      info!(order_id = %order.id, status = %order.status, "Order already settled; repeated callback ignored.");
      guard.outcome = Some(CallbackOutcome::AlreadySettled { order });
      return Ok(StepControl::Stop);
    }
    Ok::<_, ShopError>(StepControl::Continue)
  });

  flow.on_step("verify_signature", |ctx: FlowState<CallbackCtx>| async move {
    let mut guard = ctx.write();
    let order = current_order(&guard)?;
    let payment = PaymentSignature {
      order_id: order.gateway_order_id.clone().unwrap_or_default(),
      payment_id: guard.callback.gateway_payment_id.clone().unwrap_or_default(),
      signature: guard.callback.gateway_signature.clone().unwrap_or_default(),
    };
    match guard.gateway.verify_signature(&payment) {
      Ok(()) => {
        info!(order_id = %order.id, "Payment signature verified.");
        guard.verified = true;
      }
      Err(ShopError::Signature { .. }) => {
        warn!(order_id = %order.id, "Payment signature rejected.");
        guard.verified = false;
      }
      Err(other) => return Err(other),
    }
    Ok::<_, ShopError>(StepControl::Continue)
  });

  flow.on_step("settle_order", |ctx: FlowState<CallbackCtx>| async move {
    let (store, order, settlement) = {
      let guard = ctx.read();
      let order = current_order(&guard)?;
      let settlement = if guard.verified {
        Settlement::Paid {
          payment_id: guard.callback.gateway_payment_id.clone().unwrap_or_default(),
          signature: guard.callback.gateway_signature.clone().unwrap_or_default(),
        }
      } else {
        Settlement::Failed
      };
      (guard.store.clone(), order, settlement)
    };

    let outcome = match store.settle_order(order.id, settlement).await? {
      Some(settled) if settled.status == OrderStatus::Paid => CallbackOutcome::Paid { order: settled },
      Some(settled) => CallbackOutcome::Failed { order: settled },
      None => {
        // Another delivery settled it between the check and the update.
        let latest = store
          .find_order_by_gateway_id(order.gateway_order_id.as_deref().unwrap_or_default())
          .await?
          .unwrap_or(order);
        info!(order_id = %latest.id, status = %latest.status, "Order settled concurrently.");
        ctx.write().outcome = Some(CallbackOutcome::AlreadySettled { order: latest });
        return Ok(StepControl::Stop);
      }
    };
    info!(?outcome, "Order settled.");
    ctx.write().outcome = Some(outcome);
    Ok::<_, ShopError>(StepControl::Continue)
  });

  flow.on_step("release_ordered_items", |ctx: FlowState<CallbackCtx>| async move {
    let (store, order) = {
      let guard = ctx.read();
      (guard.store.clone(), current_order(&guard)?)
    };
    let lines = store.order_lines(order.id).await?;
    let cart = store.get_or_create_cart(order.user_id).await?;
    let released = store.release_cart_items(cart.id, &lines).await?;
    info!(order_id = %order.id, cart_id = %cart.id, released, "Ordered items released from cart.");
    Ok::<_, ShopError>(StepControl::Continue)
  });

  flow
}
