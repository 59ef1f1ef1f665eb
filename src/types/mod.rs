//! Shared response types.

mod response;

pub use response::{Created, NoContent};
