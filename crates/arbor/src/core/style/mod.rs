//! Style lookup. A style maps a key to a renderer that produces a surface
//! for a widget of a given size and state. Nodes carry their own map and
//! lookups fall back to the parent chain.

/// RGBA color type.
mod color;
/// The stock style map.
mod default;

use std::{collections::HashMap, fmt, rc::Rc};

pub use color::Color;
pub use default::{default_style, solid};

use crate::{
    backend::{Backend, SurfaceId},
    error::Result,
    geom::Expanse,
    widget::WidgetState,
};

/// Style key for button backgrounds.
pub const BUTTON: &str = "button";
/// Style key for the root background.
pub const BACKGROUND: &str = "background";

/// Inputs to a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleArgs {
    /// Surface size to produce.
    pub size: Expanse,
    /// Interaction state of the requesting widget.
    pub state: WidgetState,
}

impl StyleArgs {
    /// Arguments for an idle widget.
    pub fn new(size: Expanse) -> Self {
        Self {
            size,
            state: WidgetState::Idle,
        }
    }
}

/// A renderer produces a new surface. The caller owns the result.
pub type Renderer = Rc<dyn Fn(&mut dyn Backend, &StyleArgs) -> Result<SurfaceId>>;

/// Something that can resolve a style key.
pub trait StyleProvider {
    /// Return the renderer for a key, if this provider has one.
    fn style(&self, key: &str) -> Option<Renderer>;
}

/// A map from style keys to renderers.
#[derive(Clone, Default)]
pub struct StyleMap {
    /// Registered renderers.
    entries: HashMap<String, Renderer>,
}

impl StyleMap {
    /// An empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(
        mut self,
        key: &str,
        f: impl Fn(&mut dyn Backend, &StyleArgs) -> Result<SurfaceId> + 'static,
    ) -> Self {
        self.insert(key, f);
        self
    }

    /// Register a renderer, replacing any existing one for the key.
    pub fn insert(
        &mut self,
        key: &str,
        f: impl Fn(&mut dyn Backend, &StyleArgs) -> Result<SurfaceId> + 'static,
    ) {
        self.entries.insert(key.to_string(), Rc::new(f));
    }

    /// Copy every entry of `other` into this map.
    pub fn merge(&mut self, other: &Self) {
        for (k, v) in &other.entries {
            self.entries.insert(k.clone(), Rc::clone(v));
        }
    }

    /// Is there a renderer for this key?
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Is the map empty?
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered keys, sorted.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

impl StyleProvider for StyleMap {
    fn style(&self, key: &str) -> Option<Renderer> {
        self.entries.get(key).cloned()
    }
}

impl fmt::Debug for StyleMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.keys()).finish()
    }
}
