// storefront/src/services/mod.rs

pub mod callback;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod orders;

pub use callback::{CallbackOutcome, PaymentCallback, PaymentCallbackHandler};
pub use cart::{compute_total, parse_quantity, CartManager};
pub use catalog::Catalog;
pub use checkout::{CheckoutOrchestrator, CheckoutSession, CheckoutSettings};
pub use orders::Orders;
