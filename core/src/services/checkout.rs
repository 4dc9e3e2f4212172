// storefront/src/services/checkout.rs

//! Checkout: snapshot the cart, open a local order, open the matching
//! gateway order, and hand back what the payment form needs.

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::error::{ShopError, ShopResult};
use crate::flow::{Flow, FlowError, FlowOutcome, FlowState, StepControl};
use crate::gateway::{CaptureMode, CreateOrderRequest, PaymentGateway};
use crate::models::{CartLine, NewOrder, Order, OrderLine};
use crate::money::Money;
use crate::services::cart::compute_total;
use crate::store::Store;

const FLOW_NAME: &str = "checkout";

#[derive(Debug, Clone)]
pub struct CheckoutSettings {
  /// ISO currency code sent to the gateway, e.g. `INR`.
  pub currency: String,
}

impl Default for CheckoutSettings {
  fn default() -> Self {
    Self {
      currency: "INR".to_string(),
    }
  }
}

/// Everything needed to render the gateway's payment form.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutSession {
  pub order_id: Uuid,
  pub gateway_order_id: String,
  pub amount_minor: i64,
  pub currency: String,
  pub gateway_key_id: String,
  pub total: Money,
  pub lines: Vec<CartLine>,
}

struct CheckoutCtx {
  store: Arc<dyn Store>,
  gateway: Arc<dyn PaymentGateway>,
  currency: String,
  user_id: Uuid,
  lines: Vec<CartLine>,
  total: Money,
  order: Option<Order>,
  amount_minor: i64,
  gateway_order_id: Option<String>,
}

#[derive(Clone)]
pub struct CheckoutOrchestrator {
  store: Arc<dyn Store>,
  gateway: Arc<dyn PaymentGateway>,
  settings: CheckoutSettings,
  flow: Arc<Flow<CheckoutCtx, ShopError>>,
}

impl CheckoutOrchestrator {
  pub fn new(store: Arc<dyn Store>, gateway: Arc<dyn PaymentGateway>, settings: CheckoutSettings) -> Self {
    Self {
      store,
      gateway,
      settings,
      flow: Arc::new(build_checkout_flow()),
    }
  }

  /// Starts checkout for the user's current cart.
  ///
  /// Fails with `EmptyCart` (no order created) when the cart totals zero,
  /// and with `Gateway` when the remote order cannot be opened. In the
  /// latter case the local order stays in `created`.
  #[instrument(name = "checkout::start_checkout", skip(self), err(Display))]
  pub async fn start_checkout(&self, user_id: Uuid) -> ShopResult<CheckoutSession> {
    let state = FlowState::new(CheckoutCtx {
      store: self.store.clone(),
      gateway: self.gateway.clone(),
      currency: self.settings.currency.clone(),
      user_id,
      lines: Vec::new(),
      total: Money::ZERO,
      order: None,
      amount_minor: 0,
      gateway_order_id: None,
    });

    match self.flow.run(state.clone()).await? {
      FlowOutcome::Completed => {}
      FlowOutcome::Stopped => return Err(FlowError::Halted { flow: FLOW_NAME }.into()),
    }

    let guard = state.read();
    let order = guard.order.as_ref().ok_or(FlowError::Incomplete {
      flow: FLOW_NAME,
      missing: "order",
    })?;
    let gateway_order_id = guard.gateway_order_id.clone().ok_or(FlowError::Incomplete {
      flow: FLOW_NAME,
      missing: "gateway_order_id",
    })?;

    info!(order_id = %order.id, %gateway_order_id, amount_minor = guard.amount_minor, "Checkout session ready.");
    Ok(CheckoutSession {
      order_id: order.id,
      gateway_order_id,
      amount_minor: guard.amount_minor,
      currency: guard.currency.clone(),
      gateway_key_id: self.gateway.key_id().to_string(),
      total: guard.total,
      lines: guard.lines.clone(),
    })
  }
}

fn build_checkout_flow() -> Flow<CheckoutCtx, ShopError> {
  let mut flow = Flow::<CheckoutCtx, ShopError>::new(
    FLOW_NAME,
    &[
      ("load_cart", false, None),
      ("ensure_cart_not_empty", false, None),
      ("create_local_order", false, None),
      ("request_gateway_order", false, None),
      ("attach_gateway_order", false, None),
    ],
  );

  flow.on_step("load_cart", |ctx: FlowState<CheckoutCtx>| async move {
    let (store, user_id) = {
      let guard = ctx.read();
      (guard.store.clone(), guard.user_id)
    };
    let cart = store.get_or_create_cart(user_id).await?;
    let lines = store.cart_lines(cart.id).await?;
    let total = compute_total(&lines);
    info!(cart_id = %cart.id, lines = lines.len(), %total, "Cart snapshot taken.");
    {
      let mut guard = ctx.write();
      guard.lines = lines;
      guard.total = total;
    }
    Ok::<_, ShopError>(StepControl::Continue)
  });

  flow.on_step("ensure_cart_not_empty", |ctx: FlowState<CheckoutCtx>| async move {
    let total = ctx.read().total;
    if total.is_zero() {
      warn!("Checkout refused: cart is empty.");
      return Err(ShopError::EmptyCart);
    }
    Ok(StepControl::Continue)
  });

  flow.on_step("create_local_order", |ctx: FlowState<CheckoutCtx>| async move {
    let (store, new_order) = {
      let guard = ctx.read();
      let lines = guard
        .lines
        .iter()
        .map(|line| OrderLine {
          product_id: line.product.id,
          product_name: line.product.name.clone(),
          unit_price: line.product.price,
          quantity: line.item.quantity,
        })
        .collect();
      (
        guard.store.clone(),
        NewOrder {
          user_id: guard.user_id,
          amount: guard.total,
          lines,
        },
      )
    };
    let order = store.create_order(new_order).await?;
    info!(order_id = %order.id, amount = %order.amount, "Local order created.");
    ctx.write().order = Some(order);
    Ok::<_, ShopError>(StepControl::Continue)
  });

  flow.on_step("request_gateway_order", |ctx: FlowState<CheckoutCtx>| async move {
    let (gateway, order_id, total, currency) = {
      let guard = ctx.read();
      let order_id = guard.order.as_ref().map(|o| o.id).ok_or(FlowError::Incomplete {
        flow: FLOW_NAME,
        missing: "order",
      })?;
      (guard.gateway.clone(), order_id, guard.total, guard.currency.clone())
    };
    let amount_minor = total.to_minor_units()?;

    let mut notes = BTreeMap::new();
    notes.insert("internal_order_id".to_string(), order_id.to_string());
    let request = CreateOrderRequest {
      amount_minor,
      currency,
      capture: CaptureMode::Automatic,
      notes,
    };

    let gateway_order = gateway.create_order(request).await.map_err(|e| {
      warn!(%order_id, error = %e, "Gateway order creation failed; local order left in 'created'.");
      e
    })?;
    {
      let mut guard = ctx.write();
      guard.amount_minor = amount_minor;
      guard.gateway_order_id = Some(gateway_order.id);
    }
    Ok::<_, ShopError>(StepControl::Continue)
  });

  flow.on_step("attach_gateway_order", |ctx: FlowState<CheckoutCtx>| async move {
    let (store, order_id, gateway_order_id) = {
      let guard = ctx.read();
      match (guard.order.as_ref(), guard.gateway_order_id.clone()) {
        (Some(order), Some(gateway_order_id)) => (guard.store.clone(), order.id, gateway_order_id),
        _ => {
          return Err(ShopError::from(FlowError::Incomplete {
            flow: FLOW_NAME,
            missing: "gateway_order_id",
          }))
        }
      }
    };
    store.attach_gateway_order(order_id, &gateway_order_id).await?;
    if let Some(order) = ctx.write().order.as_mut() {
      order.gateway_order_id = Some(gateway_order_id);
    }
    Ok(StepControl::Continue)
  });

  flow
}
