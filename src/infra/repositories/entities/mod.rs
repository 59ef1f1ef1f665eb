//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod pay_order_template;
pub mod user;
