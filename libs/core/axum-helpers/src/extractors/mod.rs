//! Extractors that reject with the shared JSON error envelope.

pub mod id_path;
pub mod json_body;
pub mod request_context;

pub use id_path::IdPath;
pub use json_body::JsonBody;
pub use request_context::{REQUEST_ID_HEADER, RequestCtx, RequestTimeout};
