//! Request handlers.

pub mod health;
pub mod pages;
pub mod videos;

pub use health::*;
pub use pages::*;
pub use videos::*;
