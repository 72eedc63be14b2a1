use std::any::Any;

use slotmap::SlotMap;
use tracing::{debug, trace, warn};

use crate::{
    backend::{Backend, SurfaceId},
    core::{
        Context, dirty,
        dispatch::{self, Pointer},
        id::{NodeId, TypedId},
        keymap::KeyMap,
        node::{Node, Opacity, Props},
    },
    error::{Error, Result},
    event::Event,
    geom::{Anchor, Expanse, Point, Rect},
    message::Message,
    style::{Renderer, StyleArgs, StyleMap, StyleProvider, default_style},
    widget::Widget,
    widgets::Root,
};

/// The scene arena. Owns every node, the backend the nodes paint through,
/// the key bindings and the outbox of unhandled messages.
///
/// The host loop feeds input with [`handle_event`](Self::handle_event) and
/// calls [`tick`](Self::tick) once per frame.
pub struct Scene {
    /// Node storage.
    pub(crate) nodes: SlotMap<NodeId, Node>,
    /// The root node, sized to the display.
    pub(crate) root: NodeId,
    /// Surface backend.
    pub(crate) backend: Box<dyn Backend>,
    /// Key bindings consulted when the listener chain ignores a key.
    pub(crate) keymap: KeyMap,
    /// Messages no node handled.
    pub(crate) outbox: Vec<Message>,
    /// Pointer state recorded from mouse events.
    pub(crate) pointer: Pointer,
}

impl Scene {
    /// Create a scene with a root of the given size. The root carries the
    /// default style map and the standard key bindings.
    pub fn new(backend: impl Backend, size: Expanse) -> Result<Self> {
        let mut scene = Self {
            nodes: SlotMap::with_key(),
            root: NodeId::default(),
            backend: Box::new(backend),
            keymap: KeyMap::standard(),
            outbox: Vec::new(),
            pointer: Pointer::default(),
        };
        let root = Root::new();
        let props = root.props().size(size);
        scene.root = scene.spawn(Box::new(root), props, default_style())?;
        Ok(scene)
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Look up a node.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Look up a node, failing if it does not exist.
    fn get(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(id).ok_or(Error::NodeNotFound(id))
    }

    /// Look up a node mutably, failing if it does not exist.
    fn get_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes.get_mut(id).ok_or(Error::NodeNotFound(id))
    }

    /// Does the node exist?
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of nodes in the arena, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Is the arena empty? Never true for a constructed scene.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The surface backend.
    pub fn backend(&self) -> &dyn Backend {
        self.backend.as_ref()
    }

    /// The surface backend, mutably.
    pub fn backend_mut(&mut self) -> &mut dyn Backend {
        self.backend.as_mut()
    }

    /// The backend as its concrete type.
    pub fn backend_as<B: Backend>(&self) -> Option<&B> {
        (self.backend.as_ref() as &dyn Any).downcast_ref::<B>()
    }

    /// The backend as its concrete type, mutably.
    pub fn backend_as_mut<B: Backend>(&mut self) -> Option<&mut B> {
        (self.backend.as_mut() as &mut dyn Any).downcast_mut::<B>()
    }

    /// Current key bindings.
    pub fn keymap(&self) -> &KeyMap {
        &self.keymap
    }

    /// Replace the key bindings.
    pub fn set_keymap(&mut self, keymap: KeyMap) {
        self.keymap = keymap;
    }

    /// Pointer state as of the last mouse event.
    pub fn pointer(&self) -> Pointer {
        self.pointer
    }

    /// Drain the messages no node handled.
    pub fn take_messages(&mut self) -> Vec<Message> {
        std::mem::take(&mut self.outbox)
    }

    /// Create a detached node with the widget's own properties.
    pub fn create(&mut self, widget: impl Widget) -> Result<NodeId> {
        let props = widget.props();
        self.spawn(Box::new(widget), props, StyleMap::default())
    }

    /// Create a detached node with explicit properties.
    pub fn create_with(&mut self, widget: impl Widget, props: Props) -> Result<NodeId> {
        self.spawn(Box::new(widget), props, StyleMap::default())
    }

    /// Create a detached node and return a typed handle to it.
    pub fn add<W: Widget>(&mut self, widget: W) -> Result<TypedId<W>> {
        self.create(widget).map(TypedId::new)
    }

    /// Insert a node, allocate its surfaces and run its creation hooks. A
    /// failing hook removes the node again.
    fn spawn(&mut self, widget: Box<dyn Widget>, props: Props, style: StyleMap) -> Result<NodeId> {
        let mut node = Node::new(widget, props);
        node.style = style;
        if node.opacity != Opacity::Transparent {
            let alpha = node.opacity == Opacity::Translucent;
            let size = node.rect.size();
            node.background = Some(self.backend.create_surface(size, alpha));
            node.display = Some(self.backend.create_surface(size, alpha));
        }
        let name = node.name.clone();
        let id = self.nodes.insert(node);
        debug!(?id, %name, "created node");
        let mounted = self
            .with_hook(id, |w, ctx| w.on_mount(ctx))
            .and_then(|()| self.refresh_background(id));
        if let Err(e) = mounted {
            warn!(?id, %name, error = %e, "node creation failed");
            self.destroy(id);
            return Err(e);
        }
        Ok(id)
    }

    /// Run a widget hook with a context for its node. The widget is taken
    /// out of the arena for the duration, so a hook that reaches its own
    /// widget through the scene gets [`Error::ReentrantWidget`].
    pub(crate) fn with_hook<R>(
        &mut self,
        id: NodeId,
        f: impl FnOnce(&mut dyn Widget, &mut Context<'_>) -> Result<R>,
    ) -> Result<R> {
        let mut widget = self
            .get_mut(id)?
            .widget
            .take()
            .ok_or(Error::ReentrantWidget(id))?;
        let out = f(widget.as_mut(), &mut Context::new(self, id));
        // The node may have been removed by its own hook.
        if let Some(node) = self.nodes.get_mut(id) {
            node.widget = Some(widget);
        }
        out
    }

    /// Is the widget for this node currently running a hook?
    pub(crate) fn is_busy(&self, id: NodeId) -> bool {
        self.nodes.get(id).is_some_and(|n| n.widget.is_none())
    }

    /// Run a closure against the node's widget, downcast to its concrete type.
    pub fn with_widget<W: Widget, R>(
        &mut self,
        id: impl Into<NodeId>,
        f: impl FnOnce(&mut W, &mut Context<'_>) -> Result<R>,
    ) -> Result<R> {
        let id = id.into();
        self.with_hook(id, |w, ctx| {
            let w = (w as &mut dyn Any)
                .downcast_mut::<W>()
                .ok_or(Error::WrongWidgetType(id))?;
            f(w, ctx)
        })
    }

    /// Borrow the node's widget as its concrete type.
    pub fn widget_ref<W: Widget>(&self, id: impl Into<NodeId>) -> Result<&W> {
        let id = id.into();
        let w = self
            .get(id)?
            .widget
            .as_deref()
            .ok_or(Error::ReentrantWidget(id))?;
        (w as &dyn Any)
            .downcast_ref::<W>()
            .ok_or(Error::WrongWidgetType(id))
    }

    /// Is `ancestor` a strict ancestor of `node`?
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cur = self.nodes.get(node).and_then(|n| n.parent);
        while let Some(id) = cur {
            if id == ancestor {
                return true;
            }
            cur = self.nodes.get(id).and_then(|n| n.parent);
        }
        false
    }

    /// Attach `child` to `parent`, detaching it from any current parent
    /// first. The child is drawn fresh in its new parent and its subtree
    /// refreshes backgrounds against the new style chain.
    pub fn register(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.get(parent)?;
        if parent == child || self.is_ancestor(child, parent) {
            return Err(Error::WouldCreateCycle { parent, child });
        }
        if let Some(old) = self.get(child)?.parent {
            self.unregister(old, child)?;
        }

        let node = self.get_mut(child)?;
        node.dirty_rects.clear();
        node.dirty_area = 0;
        node.old_rect = None;
        node.old_visible = None;
        node.parent = Some(parent);
        let (z, visible) = (node.z, node.visible);

        let p = self.get(parent)?;
        let idx = p
            .children
            .iter()
            .position(|c| self.nodes.get(*c).is_some_and(|n| n.z > z))
            .unwrap_or(p.children.len());
        self.get_mut(parent)?.children.insert(idx, child);
        debug!(?parent, ?child, "registered");

        if visible {
            dirty::mark_dirty(self, child);
        }
        self.refresh_subtree(child)
    }

    /// Detach `child` from `parent`. The region it occupied in the last
    /// drawn frame is queued for repaint in the parent.
    pub fn unregister(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        let node = self.get(child)?;
        if node.parent != Some(parent) {
            return Err(Error::NotAChild { parent, child });
        }
        dirty::detach(self, child);

        let p = self.get_mut(parent)?;
        p.children.retain(|c| *c != child);
        if p.key_listener == Some(child) {
            p.key_listener = None;
        }

        let node = self.get_mut(child)?;
        node.parent = None;
        if let (Some(true), Some(old)) = (node.old_visible, node.old_rect) {
            dirty::add_dirty_rect(self, parent, old);
        }
        debug!(?parent, ?child, "unregistered");
        Ok(())
    }

    /// Detach a node and delete its subtree. `on_remove` hooks run
    /// children-first before any node is deleted.
    pub fn remove(&mut self, id: NodeId) -> Result<()> {
        if id == self.root {
            return Err(Error::InvalidOperation("cannot remove the root".into()));
        }
        if let Some(parent) = self.get(id)?.parent {
            self.unregister(parent, id)?;
        }
        let doomed = self.postorder(id);
        for &n in &doomed {
            if let Some(mut widget) = self.nodes.get_mut(n).and_then(|node| node.widget.take()) {
                widget.on_remove(&mut Context::new(self, n));
            }
        }
        for n in doomed {
            self.destroy(n);
        }
        debug!(?id, "removed subtree");
        Ok(())
    }

    /// Delete a single node and free its surfaces.
    fn destroy(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.remove(id) {
            for s in [node.background, node.display].into_iter().flatten() {
                self.backend.free_surface(s);
            }
        }
    }

    /// The subtree rooted at `id`, children before parents.
    fn postorder(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if let Some(node) = self.nodes.get(id) {
            for &child in &node.children {
                out.extend(self.postorder(child));
            }
            out.push(id);
        }
        out
    }

    /// Is a predicate true for the node and every ancestor?
    fn cascades(&self, id: NodeId, f: impl Fn(&Node) -> bool) -> bool {
        let mut cur = Some(id);
        while let Some(i) = cur {
            match self.nodes.get(i) {
                Some(n) if f(n) => cur = n.parent,
                _ => return false,
            }
        }
        true
    }

    /// Effective visibility: the node and all its ancestors are visible.
    pub fn is_visible(&self, id: NodeId) -> bool {
        self.cascades(id, |n| n.visible)
    }

    /// Effective hoverability.
    pub fn can_hover(&self, id: NodeId) -> bool {
        self.cascades(id, |n| n.hoverable)
    }

    /// Effective clickability.
    pub fn can_click(&self, id: NodeId) -> bool {
        self.cascades(id, |n| n.clickable)
    }

    /// Effective typability.
    pub fn can_type(&self, id: NodeId) -> bool {
        self.cascades(id, |n| n.typable)
    }

    /// Is the node or any ancestor paused?
    pub fn is_paused(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id) && !self.cascades(id, |n| !n.paused)
    }

    /// Locally visible and not paused.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes.get(id).is_some_and(Node::is_alive)
    }

    /// Make the node visible and resume it.
    pub fn show(&mut self, id: NodeId) -> Result<()> {
        self.get_mut(id)?.visible = true;
        self.unpause(id)
    }

    /// Hide the node and pause it.
    pub fn hide(&mut self, id: NodeId) -> Result<()> {
        self.get_mut(id)?.visible = false;
        self.pause(id)
    }

    /// Pause the node and notify its widget.
    pub fn pause(&mut self, id: NodeId) -> Result<()> {
        self.get_mut(id)?.paused = true;
        if self.is_busy(id) {
            return Ok(());
        }
        self.with_hook(id, |w, ctx| w.on_pause(ctx))
    }

    /// Resume the node.
    pub fn unpause(&mut self, id: NodeId) -> Result<()> {
        self.get_mut(id)?.paused = false;
        Ok(())
    }

    /// Set local hoverability.
    pub fn set_hoverable(&mut self, id: NodeId, v: bool) -> Result<()> {
        self.get_mut(id)?.hoverable = v;
        Ok(())
    }

    /// Set local clickability.
    pub fn set_clickable(&mut self, id: NodeId, v: bool) -> Result<()> {
        self.get_mut(id)?.clickable = v;
        Ok(())
    }

    /// Set local typability.
    pub fn set_typable(&mut self, id: NodeId, v: bool) -> Result<()> {
        self.get_mut(id)?.typable = v;
        Ok(())
    }

    /// Move the node within its parent.
    pub fn set_pos(&mut self, id: NodeId, p: Point) -> Result<()> {
        let mut rect = self.get(id)?.rect;
        rect.set_pos(p);
        self.move_to(id, rect)
    }

    /// Move the node so that an anchor lands on `p`.
    pub fn set_anchor(&mut self, id: NodeId, anchor: Anchor, p: Point) -> Result<()> {
        let mut rect = self.get(id)?.rect;
        rect.set_anchor(anchor, p);
        self.move_to(id, rect)
    }

    /// Apply a position change, settling queued rects at the old position
    /// first.
    fn move_to(&mut self, id: NodeId, rect: Rect) -> Result<()> {
        if self.get(id)?.rect == rect {
            return Ok(());
        }
        dirty::detach(self, id);
        self.get_mut(id)?.rect = rect;
        Ok(())
    }

    /// Resize the node. Surfaces are reallocated and the widget regenerates
    /// its background.
    pub fn set_size(&mut self, id: NodeId, size: Expanse) -> Result<()> {
        if self.get(id)?.rect.size() == size {
            return Ok(());
        }
        dirty::detach(self, id);
        let node = self.nodes.get_mut(id).ok_or(Error::NodeNotFound(id))?;
        node.rect.set_size(size);
        if node.opacity != Opacity::Transparent {
            let alpha = node.opacity == Opacity::Translucent;
            let old = [node.background.take(), node.display.take()];
            node.background = Some(self.backend.create_surface(size, alpha));
            node.display = Some(self.backend.create_surface(size, alpha));
            for s in old.into_iter().flatten() {
                self.backend.free_surface(s);
            }
        }
        self.refresh_background(id)
    }

    /// Change the paint order. Siblings are re-sorted and the parent is
    /// repainted.
    pub fn set_z(&mut self, id: NodeId, z: i32) -> Result<()> {
        let node = self.get_mut(id)?;
        if node.z == z {
            return Ok(());
        }
        node.z = z;
        if let Some(parent) = node.parent {
            let mut children = std::mem::take(&mut self.get_mut(parent)?.children);
            children.sort_by_key(|c| self.nodes.get(*c).map_or(0, |n| n.z));
            self.get_mut(parent)?.children = children;
            dirty::mark_dirty(self, parent);
        }
        Ok(())
    }

    /// Screen position of the node.
    pub fn abs_pos(&self, id: NodeId) -> Result<Point> {
        let mut pos = self.get(id)?.rect.tl;
        let mut cur = self.get(id)?.parent;
        while let Some(p) = cur {
            let node = self.get(p)?;
            pos = pos + node.rect.tl;
            cur = node.parent;
        }
        Ok(pos)
    }

    /// Merge styles into the node's map and refresh the subtree.
    pub fn style_add(&mut self, id: NodeId, style: &StyleMap) -> Result<()> {
        self.get_mut(id)?.style.merge(style);
        self.refresh_subtree(id)
    }

    /// Resolve a style key through the node's parent chain.
    pub fn style_get(&self, id: NodeId, key: &str) -> Result<Renderer> {
        let mut cur = Some(id);
        while let Some(i) = cur {
            let node = self.get(i)?;
            if let Some(r) = node.style.style(key) {
                return Ok(r);
            }
            cur = node.parent;
        }
        Err(Error::StyleNotFound(key.to_string()))
    }

    /// Resolve a style and render it.
    pub fn style_render(&mut self, id: NodeId, key: &str, args: &StyleArgs) -> Result<SurfaceId> {
        let render = self.style_get(id, key)?;
        render(self.backend.as_mut(), args)
    }

    /// Replace the node's background. The node takes the surface's size.
    /// Transparent nodes cannot hold a background; the surface is freed.
    pub fn set_background(&mut self, id: NodeId, surface: SurfaceId) -> Result<()> {
        let node = self.nodes.get_mut(id).ok_or(Error::NodeNotFound(id))?;
        if node.opacity == Opacity::Transparent {
            warn!(?id, "transparent node rejected a background");
            self.backend.free_surface(surface);
            return Ok(());
        }
        let size = self
            .backend
            .surface_size(surface)
            .ok_or_else(|| Error::Resource(format!("unknown surface {surface:?}")))?;
        if let Some(old) = node.background.replace(surface)
            && old != surface
        {
            self.backend.free_surface(old);
        }
        if node.rect.size() != size {
            node.rect.set_size(size);
            let alpha = node.opacity == Opacity::Translucent;
            if let Some(old) = node.display.replace(self.backend.create_surface(size, alpha)) {
                self.backend.free_surface(old);
            }
        }
        dirty::mark_dirty(self, id);
        Ok(())
    }

    /// Ask the node's widget to regenerate its background. A widget that is
    /// running a hook is expected to refresh itself and is skipped.
    pub fn refresh_background(&mut self, id: NodeId) -> Result<()> {
        if self.is_busy(id) {
            trace!(?id, "skipping background refresh for busy widget");
            return Ok(());
        }
        self.with_hook(id, |w, ctx| w.refresh_background(ctx))
    }

    /// Refresh backgrounds for a node and all its descendants.
    fn refresh_subtree(&mut self, id: NodeId) -> Result<()> {
        self.refresh_background(id)?;
        for child in self.get(id)?.children.clone() {
            self.refresh_subtree(child)?;
        }
        Ok(())
    }

    /// Route keyboard input at `id` to `listener`, which must be a child.
    pub fn set_key_listener(&mut self, id: NodeId, listener: Option<NodeId>) -> Result<()> {
        if let Some(l) = listener
            && self.get(l)?.parent != Some(id)
        {
            return Err(Error::NotAChild {
                parent: id,
                child: l,
            });
        }
        self.get_mut(id)?.key_listener = listener;
        Ok(())
    }

    /// Force a full repaint of the node on the next draw.
    pub fn mark_dirty(&mut self, id: NodeId) {
        dirty::mark_dirty(self, id);
    }

    /// Queue a region of the node, in its local coordinates, for repaint.
    pub fn add_dirty_rect(&mut self, id: NodeId, rect: Rect) {
        dirty::add_dirty_rect(self, id, rect);
    }

    /// Will the next draw repaint the node completely?
    pub fn is_dirty(&self, id: NodeId) -> bool {
        self.nodes.get(id).is_some_and(Node::is_dirty)
    }

    /// Feed one input event through the tree.
    pub fn handle_event(&mut self, event: Event) -> Result<()> {
        dispatch::handle_event(self, event)
    }

    /// Send a message from `from` to its ancestors. Messages nobody handles
    /// land in the outbox.
    pub fn send_message(&mut self, from: NodeId, message: impl Into<Message>) -> Result<()> {
        dispatch::send_message(self, from, message.into())
    }

    /// One frame: hover tracking, widget updates, then draw. Returns whether
    /// anything was presented.
    pub fn tick(&mut self) -> Result<bool> {
        dispatch::track(self)?;
        dispatch::update(self, self.root)?;
        self.draw()
    }

    /// Repaint what changed since the last frame and present it. Returns
    /// whether the root changed.
    pub fn draw(&mut self) -> Result<bool> {
        dirty::draw(self)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        backend::memory::MemoryBackend,
        style::{Color, solid},
        widgets::Container,
    };

    fn scene() -> Result<Scene> {
        Scene::new(MemoryBackend::new(Expanse::new(100, 100)), Expanse::new(100, 100))
    }

    fn boxed(scene: &mut Scene, rect: Rect) -> Result<NodeId> {
        scene.create(Container::new(
            Props::new(rect.w, rect.h).at(rect.tl.x, rect.tl.y),
        ))
    }

    #[test]
    fn register_rejects_cycles() -> Result<()> {
        let mut s = scene()?;
        let a = boxed(&mut s, Rect::new(0, 0, 10, 10))?;
        let b = boxed(&mut s, Rect::new(0, 0, 5, 5))?;
        s.register(a, b)?;
        assert_eq!(
            s.register(b, a),
            Err(Error::WouldCreateCycle { parent: b, child: a })
        );
        assert_eq!(
            s.register(a, a),
            Err(Error::WouldCreateCycle { parent: a, child: a })
        );
        Ok(())
    }

    #[test]
    fn reparent_moves_child() -> Result<()> {
        let mut s = scene()?;
        let root = s.root();
        let a = boxed(&mut s, Rect::new(0, 0, 10, 10))?;
        let b = boxed(&mut s, Rect::new(20, 0, 10, 10))?;
        let c = boxed(&mut s, Rect::new(1, 1, 2, 2))?;
        s.register(root, a)?;
        s.register(root, b)?;
        s.register(a, c)?;
        s.register(b, c)?;
        assert!(s.node(a).is_some_and(|n| n.children().is_empty()));
        assert_eq!(s.node(b).map(|n| n.children().to_vec()), Some(vec![c]));
        assert_eq!(s.node(c).and_then(Node::parent), Some(b));
        assert_eq!(s.abs_pos(c)?, Point::new(21, 1));
        assert_eq!(
            s.unregister(a, c),
            Err(Error::NotAChild { parent: a, child: c })
        );
        Ok(())
    }

    #[test]
    fn children_sorted_by_z() -> Result<()> {
        let mut s = scene()?;
        let root = s.root();
        let a = s.create(Container::new(Props::new(1, 1).z(2)))?;
        let b = s.create(Container::new(Props::new(1, 1)))?;
        let c = s.create(Container::new(Props::new(1, 1)))?;
        for n in [a, b, c] {
            s.register(root, n)?;
        }
        assert_eq!(s.node(root).map(|n| n.children().to_vec()), Some(vec![b, c, a]));
        s.set_z(b, 5)?;
        assert_eq!(s.node(root).map(|n| n.children().to_vec()), Some(vec![c, a, b]));
        Ok(())
    }

    #[test]
    fn visibility_cascades() -> Result<()> {
        let mut s = scene()?;
        let root = s.root();
        let parent = boxed(&mut s, Rect::new(0, 0, 10, 10))?;
        let child = boxed(&mut s, Rect::new(0, 0, 5, 5))?;
        s.register(root, parent)?;
        s.register(parent, child)?;

        s.hide(parent)?;
        s.show(child)?;
        assert!(!s.is_visible(child));
        assert!(s.node(child).is_some_and(Node::visible));
        assert!(s.is_paused(child));
        assert!(s.is_alive(child));

        s.show(parent)?;
        assert!(s.is_visible(child));
        assert!(!s.is_paused(child));

        s.set_hoverable(parent, false)?;
        assert!(!s.can_hover(child));
        assert!(s.can_click(child));
        assert!(!s.can_type(child));
        Ok(())
    }

    #[test]
    fn remove_frees_surfaces() -> Result<()> {
        let mut s = scene()?;
        let root = s.root();
        let count = |s: &Scene| {
            s.backend_as::<MemoryBackend>()
                .map(MemoryBackend::surface_count)
                .unwrap_or_default()
        };
        let before = count(&s);
        let a = boxed(&mut s, Rect::new(0, 0, 10, 10))?;
        let b = boxed(&mut s, Rect::new(0, 0, 5, 5))?;
        s.register(root, a)?;
        s.register(a, b)?;
        assert_eq!(count(&s), before + 4);
        s.remove(a)?;
        assert_eq!(count(&s), before);
        assert!(!s.contains(a) && !s.contains(b));
        assert!(s.remove(root).is_err());
        Ok(())
    }

    #[test]
    fn style_lookup_walks_parents() -> Result<()> {
        let mut s = scene()?;
        let root = s.root();
        let a = boxed(&mut s, Rect::new(0, 0, 10, 10))?;
        assert_eq!(
            s.style_get(a, "panel").err(),
            Some(Error::StyleNotFound("panel".into()))
        );
        s.register(root, a)?;
        assert!(s.style_get(a, crate::style::BUTTON).is_ok());
        s.style_add(a, &StyleMap::new().with("panel", solid(Color::WHITE)))?;
        let surface = s.style_render(a, "panel", &StyleArgs::new(Expanse::new(2, 2)))?;
        assert_eq!(s.backend().surface_size(surface), Some(Expanse::new(2, 2)));
        assert!(s.style_get(root, "panel").is_err());
        Ok(())
    }

    #[test]
    fn transparent_nodes_reject_backgrounds() -> Result<()> {
        let mut s = scene()?;
        let t = s.create(Container::new(
            Props::new(10, 10).opacity(Opacity::Transparent),
        ))?;
        let surface = s.backend_mut().create_surface(Expanse::new(3, 3), true);
        s.set_background(t, surface)?;
        assert_eq!(s.backend().surface_size(surface), None);
        assert_eq!(s.node(t).map(Node::rect), Some(Rect::new(0, 0, 10, 10)));
        Ok(())
    }

    #[test]
    fn background_resizes_node() -> Result<()> {
        let mut s = scene()?;
        let a = boxed(&mut s, Rect::new(0, 0, 10, 10))?;
        let surface = s.backend_mut().create_surface(Expanse::new(3, 4), true);
        s.set_background(a, surface)?;
        let node = s.node(a);
        assert_eq!(node.map(Node::rect), Some(Rect::new(0, 0, 3, 4)));
        let display = node.and_then(Node::display);
        assert_eq!(
            display.and_then(|d| s.backend().surface_size(d)),
            Some(Expanse::new(3, 4))
        );
        Ok(())
    }

    #[test]
    fn typed_access() -> Result<()> {
        let mut s = scene()?;
        let root = s.root();
        let a = s.add(Container::new(Props::new(1, 1)))?;
        assert!(s.widget_ref::<Container>(a).is_ok());
        assert_eq!(
            s.widget_ref::<Root>(a).err(),
            Some(Error::WrongWidgetType(a.id()))
        );
        let inner = s.with_widget::<Root, _>(root, |_, ctx| {
            let id = ctx.id();
            ctx.scene().with_widget::<Root, _>(id, |_, _| Ok(()))
        });
        assert_eq!(inner, Err(Error::ReentrantWidget(root)));
        Ok(())
    }
}
