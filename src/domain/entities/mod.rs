//! Domain entities, rebuilt from untrusted records through `from_json`.

mod auth_identity;
mod pay_order_template;
mod user;

pub use auth_identity::AuthIdentity;
pub use pay_order_template::PayOrderTemplate;
pub use user::User;
