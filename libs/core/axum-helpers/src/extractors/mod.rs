//! Extractors whose rejections render as the standard [`ErrorResponse`](crate::ErrorResponse).

pub mod json_body;
pub mod query_params;

pub use json_body::JsonBody;
pub use query_params::QueryParams;
