use std::result::Result as StdResult;

use thiserror::Error;

use crate::{NodeId, geom};

/// Result type for arbor operations.
pub type Result<T> = StdResult<T, Error>;

/// Core error type.
#[derive(PartialEq, Eq, Error, Debug, Clone)]
pub enum Error {
    #[error("no style registered for key: {0}")]
    /// No node on the parent chain provides a renderer for this key.
    StyleNotFound(String),

    #[error("a node named {0} is already registered")]
    /// A hub node name was registered twice.
    DuplicateNode(String),

    #[error("registering {child:?} under {parent:?} would create a cycle")]
    /// Reparenting would make a node its own ancestor.
    WouldCreateCycle {
        /// Requested parent.
        parent: NodeId,
        /// Requested child.
        child: NodeId,
    },

    #[error("node not found: {0:?}")]
    /// The node id does not refer to a live node.
    NodeNotFound(NodeId),

    #[error("{child:?} is not a child of {parent:?}")]
    /// The node is not attached to the given parent.
    NotAChild {
        /// Expected parent.
        parent: NodeId,
        /// Node that was not found among the parent's children.
        child: NodeId,
    },

    #[error("invalid operation: {0}")]
    /// The operation is not permitted in the current state.
    InvalidOperation(String),

    #[error("widget for {0:?} is already in use")]
    /// A widget hook tried to reach its own widget through the scene.
    ReentrantWidget(NodeId),

    #[error("widget type mismatch for {0:?}")]
    /// Typed widget access with the wrong type.
    WrongWidgetType(NodeId),

    #[error("resource: {0}")]
    /// Font, image or surface failure from the backend.
    Resource(String),

    #[error("config: {0}")]
    /// Configuration could not be loaded.
    Config(String),

    #[error("parse error: {0}")]
    /// A name, key or message failed to parse.
    Parse(String),

    #[error("internal: {0}")]
    /// Internal failure, such as a failed write to a dump buffer.
    Internal(String),
}

impl From<geom::Error> for Error {
    fn from(e: geom::Error) -> Self {
        Self::Parse(e.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Self::Config(e.to_string())
    }
}

impl From<image::ImageError> for Error {
    fn from(e: image::ImageError) -> Self {
        Self::Resource(e.to_string())
    }
}
