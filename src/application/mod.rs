//! Application services orchestrating the domain over the ports.
//!
//! Each service holds `Arc<dyn Port>` handles injected by the composition
//! root; there is no ambient global state and no in-process locking.

mod payment_service;
mod session_engine;
mod tokens;
mod user_service;

pub use payment_service::PaymentService;
pub use session_engine::SessionEngine;
pub use tokens::JwtIssuer;
pub use user_service::UserService;
