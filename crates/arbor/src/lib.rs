//! Arbor: a retained-mode scene graph with dirty-rectangle redraw.
//!
//! A [`Scene`] owns an arena of nodes. Each node carries a [`Widget`] for its
//! behaviour, a rect relative to its parent, interaction flags and a pair of
//! backend surfaces. The host loop feeds input through
//! [`Scene::handle_event`] and calls [`Scene::tick`] once per frame; only
//! regions that changed since the previous frame are recomposited.
//!
//! # Module Organization
//!
//! - [`geom`] - Geometry primitives (Rect, Point, Expanse, Anchor)
//! - [`widgets`] - Built-in widgets, including the [`Hub`](widgets::Hub)
//!   view switcher
//! - [`model`] - Subject/observer change notification
//! - [`timer`] - Pausable clocks

#![warn(missing_docs)]

// Internal core module - re-export specific items below
mod core;

pub use arbor_geom as geom;

pub mod message;
pub mod model;
pub mod timer;
pub mod widget;
pub mod widgets;

pub use core::{Context, Node, NodeId, Opacity, Pointer, Props, Scene, TypedId};
pub use core::{backend, config, dump, error, event, keymap, state, style};

pub use widget::{EventOutcome, Widget, WidgetState};
