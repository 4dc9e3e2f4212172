// src/lib.rs

//! Storefront: catalog, per-user carts, and checkout through a payment
//! gateway.
//!
//!  - [`Catalog`] lists products and fetches one by id.
//!  - [`CartManager`] keeps one cart per user and merges repeated adds into
//!    a single line.
//!  - [`CheckoutOrchestrator`] snapshots the cart into a local order and
//!    opens the matching gateway order.
//!  - [`PaymentCallbackHandler`] verifies the gateway postback and moves the
//!    order to `paid` or `failed` exactly once.
//!
//! Storage and the payment gateway are ports ([`Store`], [`PaymentGateway`])
//! injected as trait objects, so the same services run against PostgreSQL
//! and Razorpay in production and against [`MemoryStore`] and
//! [`MockGateway`] in tests.

pub mod error;
pub mod flow;
pub mod gateway;
pub mod models;
pub mod money;
pub mod services;
pub mod store;

pub use crate::error::{ShopError, ShopResult};
pub use crate::flow::{Flow, FlowError, FlowOutcome, FlowState, StepControl};
pub use crate::gateway::{
  CaptureMode, CreateOrderRequest, GatewayOrder, MockGateway, PaymentGateway, PaymentSignature, RazorpayConfig,
  RazorpayGateway,
};
pub use crate::models::{
  Cart, CartItem, CartLine, CartView, NewOrder, NewProduct, Order, OrderLine, OrderStatus, Product, Settlement,
};
pub use crate::money::Money;
pub use crate::services::{
  compute_total, parse_quantity, CallbackOutcome, CartManager, Catalog, CheckoutOrchestrator, CheckoutSession,
  CheckoutSettings, Orders, PaymentCallback, PaymentCallbackHandler,
};
pub use crate::store::{MemoryStore, Store};
