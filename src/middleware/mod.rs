// src/middleware/mod.rs

pub mod cors;
pub mod json_body;

pub use cors::cors_layer;
pub use json_body::JsonBody;
