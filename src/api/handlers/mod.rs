//! HTTP request handlers.

pub mod auth_handler;
pub mod pay_order_template_handler;
pub mod user_handler;

pub use auth_handler::auth_routes;
pub use pay_order_template_handler::pay_order_template_routes;
pub use user_handler::user_routes;
