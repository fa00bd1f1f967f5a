//! # IRONCLAD Shared
//!
//! Common types used by the terrain core and the simulation.
//!
//! ## CRITICAL RULE
//!
//! This crate must NEVER depend on a GPU or window-related crate.
//! Rendering collaborators consume these types, they do not define them.

#![deny(missing_docs)]

pub mod math;

pub use math::Vec3;
