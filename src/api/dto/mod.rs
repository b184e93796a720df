//! Data Transfer Objects for REST request/response serialization.
//!
//! All prices are serialized as JSON strings to prevent precision loss on
//! decimal values. Requests accept either strings or numbers.

pub mod alert_dto;
pub mod common_dto;
pub mod product_dto;
pub mod refresh_dto;

pub use alert_dto::*;
pub use common_dto::*;
pub use product_dto::*;
pub use refresh_dto::*;
