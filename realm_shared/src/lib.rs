//! `realm_shared`
//!
//! Libraries shared across the client stack.
//!
//! Design goals:
//! - Clear separation of concerns (wire, math, config, render).
//! - Serialization kept explicit and versionable.
//! - Traits for abstraction and dependency injection.
//! - No `unsafe`.

pub mod config;
pub mod math;
pub mod render;
pub mod wire;

pub mod prelude {
    //! Commonly used exports.

    pub use crate::config::*;
    pub use crate::math::*;
    pub use crate::render::*;
    pub use crate::wire::*;
}
