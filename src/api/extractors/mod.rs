//! Custom request extractors.

mod dto_json;

pub use dto_json::DtoJson;
