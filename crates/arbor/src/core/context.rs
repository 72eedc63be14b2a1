use crate::{
    backend::{Backend, SurfaceId},
    core::{dispatch::Pointer, id::NodeId, node::Props, scene::Scene},
    error::{Error, Result},
    geom::{Anchor, Expanse, Point, Rect},
    message::Message,
    style::StyleArgs,
    widget::Widget,
};

/// The handle a widget hook receives. It names the node the hook runs for
/// and exposes the scene operations a widget commonly needs. Anything else
/// is reachable through [`scene`](Self::scene).
pub struct Context<'a> {
    /// The scene.
    scene: &'a mut Scene,
    /// The node the hook runs for.
    node: NodeId,
}

impl<'a> Context<'a> {
    /// Create a context for a node.
    pub(crate) fn new(scene: &'a mut Scene, node: NodeId) -> Self {
        Self { scene, node }
    }

    /// The node this context is bound to.
    pub fn id(&self) -> NodeId {
        self.node
    }

    /// The whole scene.
    pub fn scene(&mut self) -> &mut Scene {
        self.scene
    }

    /// The whole scene, read-only.
    pub fn scene_ref(&self) -> &Scene {
        self.scene
    }

    /// The node's rect in its parent.
    pub fn rect(&self) -> Rect {
        self.scene.node(self.node).map(|n| n.rect()).unwrap_or_default()
    }

    /// The node's size.
    pub fn size(&self) -> Expanse {
        self.rect().size()
    }

    /// Pointer state as of the last mouse event.
    pub fn pointer(&self) -> Pointer {
        self.scene.pointer()
    }

    /// The surface backend.
    pub fn backend(&mut self) -> &mut dyn Backend {
        self.scene.backend_mut()
    }

    /// Resolve a style for this node and render it.
    pub fn style_render(&mut self, key: &str, args: &StyleArgs) -> Result<SurfaceId> {
        self.scene.style_render(self.node, key, args)
    }

    /// Replace this node's background.
    pub fn set_background(&mut self, surface: SurfaceId) -> Result<()> {
        self.scene.set_background(self.node, surface)
    }

    /// Send a message to this node's ancestors.
    pub fn send_message(&mut self, message: Message) -> Result<()> {
        self.scene.send_message(self.node, message)
    }

    /// Create a widget with its own properties and attach it to this node.
    pub fn add_child(&mut self, widget: impl Widget) -> Result<NodeId> {
        let id = self.scene.create(widget)?;
        self.register(id)?;
        Ok(id)
    }

    /// Create a widget with explicit properties and attach it to this node.
    pub fn add_child_with(&mut self, widget: impl Widget, props: Props) -> Result<NodeId> {
        let id = self.scene.create_with(widget, props)?;
        self.register(id)?;
        Ok(id)
    }

    /// Attach an existing node to this node.
    pub fn register(&mut self, child: NodeId) -> Result<()> {
        self.scene.register(self.node, child)
    }

    /// Show a node.
    pub fn show(&mut self, id: NodeId) -> Result<()> {
        self.scene.show(id)
    }

    /// Hide a node.
    pub fn hide(&mut self, id: NodeId) -> Result<()> {
        self.scene.hide(id)
    }

    /// Move a node within its parent.
    pub fn set_pos(&mut self, id: NodeId, p: Point) -> Result<()> {
        self.scene.set_pos(id, p)
    }

    /// Move a node so that an anchor lands on `p`.
    pub fn set_anchor(&mut self, id: NodeId, anchor: Anchor, p: Point) -> Result<()> {
        self.scene.set_anchor(id, anchor, p)
    }

    /// A node's rect in its parent.
    pub fn rect_of(&self, id: NodeId) -> Result<Rect> {
        self.scene
            .node(id)
            .map(|n| n.rect())
            .ok_or(Error::NodeNotFound(id))
    }

    /// Route keyboard input at this node to a child, or stop routing.
    pub fn set_key_listener(&mut self, listener: Option<NodeId>) -> Result<()> {
        self.scene.set_key_listener(self.node, listener)
    }

    /// Can the node receive keyboard input? Typability cascades, so a node
    /// under a non-typable ancestor cannot.
    pub fn is_typable(&self, id: NodeId) -> bool {
        self.scene.can_type(id)
    }

    /// Force a full repaint of this node.
    pub fn mark_dirty(&mut self) {
        self.scene.mark_dirty(self.node);
    }
}
