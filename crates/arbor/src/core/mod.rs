//! The scene engine: node arena, redraw, input dispatch and the ambient
//! types they share.

/// Surface backends.
pub mod backend;
/// TOML configuration.
pub mod config;
/// Debug tree dumps.
pub mod dump;
/// Core error types.
pub mod error;
/// Input event types.
pub mod event;
/// Key bindings.
pub mod keymap;
/// Node names.
pub mod state;
/// Styles and colors.
pub mod style;

/// Widget hook context.
pub mod context;
/// Dirty-rect bookkeeping and redraw passes.
mod dirty;
/// Input routing and the message bus.
pub mod dispatch;
/// Node identifiers.
pub mod id;
/// Per-node engine state.
pub mod node;
/// The scene arena.
pub mod scene;

pub use context::Context;
pub use dispatch::Pointer;
pub use id::{NodeId, TypedId};
pub use node::{Node, Opacity, Props};
pub use scene::Scene;
