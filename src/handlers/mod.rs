//! # HTTP Request Handlers
//!
//! ## Available Handlers
//!
//! - **Home** (`home`) - Static homepage and the 404 fallback
//! - **Status** (`status`) - Liveness plus database connectivity

mod home;
mod status;

pub use home::*;
pub use status::*;
