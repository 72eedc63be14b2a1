use crate::{
    backend::SurfaceId,
    core::id::NodeId,
    geom::{Expanse, Point, Rect},
    state::NodeName,
    style::StyleMap,
    widget::Widget,
};

/// How a node takes part in compositing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opacity {
    /// No surfaces of its own. Children are composited straight into the
    /// nearest non-transparent ancestor, and dirty regions pass through.
    Transparent,
    /// Surfaces keep per-pixel alpha.
    Translucent,
    /// Surfaces are opaque.
    Opaque,
}

/// Construction properties for a node. Widgets supply defaults through
/// [`Widget::props`]; callers can override them with
/// [`Scene::create_with`](crate::Scene::create_with).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Props {
    /// Width.
    pub w: u32,
    /// Height.
    pub h: u32,
    /// X offset in the parent.
    pub x: i32,
    /// Y offset in the parent.
    pub y: i32,
    /// Locally visible.
    pub visible: bool,
    /// Receives pointer motion.
    pub hoverable: bool,
    /// Receives clicks.
    pub clickable: bool,
    /// Can become a key listener.
    pub typable: bool,
    /// Compositing mode.
    pub opacity: Opacity,
    /// Paint order among siblings.
    pub z: i32,
}

impl Default for Props {
    fn default() -> Self {
        Self {
            w: 0,
            h: 0,
            x: 0,
            y: 0,
            visible: true,
            hoverable: true,
            clickable: true,
            typable: false,
            opacity: Opacity::Translucent,
            z: 0,
        }
    }
}

impl Props {
    /// Default properties with a size.
    pub fn new(w: u32, h: u32) -> Self {
        Self {
            w,
            h,
            ..Self::default()
        }
    }

    /// Set the size.
    pub fn size(mut self, size: Expanse) -> Self {
        self.w = size.w;
        self.h = size.h;
        self
    }

    /// Set the position.
    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Start hidden.
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Set hoverability.
    pub fn hoverable(mut self, v: bool) -> Self {
        self.hoverable = v;
        self
    }

    /// Set clickability.
    pub fn clickable(mut self, v: bool) -> Self {
        self.clickable = v;
        self
    }

    /// Set typability.
    pub fn typable(mut self, v: bool) -> Self {
        self.typable = v;
        self
    }

    /// Set the compositing mode.
    pub fn opacity(mut self, o: Opacity) -> Self {
        self.opacity = o;
        self
    }

    /// Set the paint order.
    pub fn z(mut self, z: i32) -> Self {
        self.z = z;
        self
    }

    /// The rectangle these properties describe.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }
}

/// Engine state for one node in the scene arena.
pub struct Node {
    /// Widget behaviour. Taken out while one of its hooks runs.
    pub(crate) widget: Option<Box<dyn Widget>>,
    /// Name, from the widget.
    pub(crate) name: NodeName,

    /// Parent in the arena tree.
    pub(crate) parent: Option<NodeId>,
    /// Children, stably sorted by z.
    pub(crate) children: Vec<NodeId>,

    /// Geometry relative to the parent.
    pub(crate) rect: Rect,
    /// Paint order among siblings.
    pub(crate) z: i32,

    /// Local visibility.
    pub(crate) visible: bool,
    /// Local hoverability.
    pub(crate) hoverable: bool,
    /// Local clickability.
    pub(crate) clickable: bool,
    /// Local typability.
    pub(crate) typable: bool,
    /// Local pause flag.
    pub(crate) paused: bool,
    /// Is the pointer currently over this node, as far as it has been told?
    pub(crate) hovered: bool,

    /// Compositing mode.
    pub(crate) opacity: Opacity,
    /// Widget content. Absent for transparent nodes.
    pub(crate) background: Option<SurfaceId>,
    /// Composited content. Absent for transparent nodes.
    pub(crate) display: Option<SurfaceId>,

    /// Explicit full-repaint flag.
    pub(crate) dirty: bool,
    /// Queued regions in local coordinates.
    pub(crate) dirty_rects: Vec<Rect>,
    /// Sum of the areas of `dirty_rects`.
    pub(crate) dirty_area: u64,
    /// Rect as of the last drawn frame.
    pub(crate) old_rect: Option<Rect>,
    /// Visibility as of the last drawn frame. `None` until drawn in the
    /// current parent.
    pub(crate) old_visible: Option<bool>,

    /// Local styles.
    pub(crate) style: StyleMap,
    /// Child currently receiving keyboard input.
    pub(crate) key_listener: Option<NodeId>,
}

impl Node {
    /// Build a detached node with no surfaces yet.
    pub(crate) fn new(widget: Box<dyn Widget>, props: Props) -> Self {
        Self {
            name: widget.name(),
            widget: Some(widget),
            parent: None,
            children: Vec::new(),
            rect: props.rect(),
            z: props.z,
            visible: props.visible,
            hoverable: props.hoverable,
            clickable: props.clickable,
            typable: props.typable,
            paused: false,
            hovered: false,
            opacity: props.opacity,
            background: None,
            display: None,
            dirty: false,
            dirty_rects: Vec::new(),
            dirty_area: 0,
            old_rect: None,
            old_visible: None,
            style: StyleMap::default(),
            key_listener: None,
        }
    }

    /// The node's name.
    pub fn name(&self) -> &NodeName {
        &self.name
    }

    /// The node's parent, if attached.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The node's children in paint order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Geometry relative to the parent.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Position relative to the parent.
    pub fn pos(&self) -> Point {
        self.rect.tl
    }

    /// Paint order.
    pub fn z(&self) -> i32 {
        self.z
    }

    /// Compositing mode.
    pub fn opacity(&self) -> Opacity {
        self.opacity
    }

    /// Is the node transparent?
    pub fn is_transparent(&self) -> bool {
        self.opacity == Opacity::Transparent
    }

    /// Is the node root of its tree?
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Local visibility flag. See [`Scene::is_visible`](crate::Scene::is_visible)
    /// for the effective value.
    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Local pause flag.
    pub fn paused(&self) -> bool {
        self.paused
    }

    /// Visible and not paused, locally.
    pub fn is_alive(&self) -> bool {
        self.visible && !self.paused
    }

    /// Local typability flag.
    pub fn typable(&self) -> bool {
        self.typable
    }

    /// Is the pointer over this node?
    pub fn hovered(&self) -> bool {
        self.hovered
    }

    /// The keyboard listener child, if any.
    pub fn key_listener(&self) -> Option<NodeId> {
        self.key_listener
    }

    /// Regions queued for repaint, in local coordinates.
    pub fn dirty_rects(&self) -> &[Rect] {
        &self.dirty_rects
    }

    /// Total queued area.
    pub fn dirty_area(&self) -> u64 {
        self.dirty_area
    }

    /// The composited display surface.
    pub fn display(&self) -> Option<SurfaceId> {
        self.display
    }

    /// The widget content surface.
    pub fn background(&self) -> Option<SurfaceId> {
        self.background
    }

    /// Will the next draw repaint this node completely? True for a node never
    /// drawn in its current parent (when visible), for an explicit full
    /// repaint, and for a change of geometry or visibility since the last
    /// frame.
    pub fn is_dirty(&self) -> bool {
        match (self.old_visible, self.old_rect) {
            (None, _) => self.visible,
            (Some(old_visible), old_rect) => {
                self.dirty || old_rect != Some(self.rect) || old_visible != self.visible
            }
        }
    }

    /// Regions in parent space that this node's change since the last frame
    /// touches. Old and new rects merge into their bounding box when that
    /// box is no larger than the two rects together.
    pub fn transition_rects(&self) -> Vec<Rect> {
        let before = match self.old_visible {
            Some(true) => self.old_rect,
            _ => None,
        };
        let now = self.visible.then_some(self.rect);
        match (before, now) {
            (Some(old), Some(new)) => {
                let bbox = old.union(&new);
                if bbox.area() <= old.area() + new.area() {
                    vec![bbox]
                } else {
                    vec![old, new]
                }
            }
            (Some(old), None) => vec![old],
            (None, Some(new)) => vec![new],
            (None, None) => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::Container;

    fn node(rect: Rect) -> Node {
        Node::new(
            Box::new(Container::new(Props::default())),
            Props::new(rect.w, rect.h).at(rect.tl.x, rect.tl.y),
        )
    }

    #[test]
    fn never_drawn_is_dirty_when_visible() {
        let mut n = node(Rect::new(0, 0, 10, 10));
        assert!(n.is_dirty());
        n.visible = false;
        assert!(!n.is_dirty());
    }

    #[test]
    fn dirty_after_change() {
        let mut n = node(Rect::new(0, 0, 10, 10));
        n.old_rect = Some(n.rect);
        n.old_visible = Some(true);
        assert!(!n.is_dirty());
        n.rect = n.rect.shift(1, 0);
        assert!(n.is_dirty());
        n.rect = n.rect.shift(-1, 0);
        n.visible = false;
        assert!(n.is_dirty());
        n.visible = true;
        n.dirty = true;
        assert!(n.is_dirty());
    }

    #[test]
    fn transitions() {
        let mut n = node(Rect::new(0, 0, 10, 10));
        assert_eq!(n.transition_rects(), vec![Rect::new(0, 0, 10, 10)]);

        n.old_visible = Some(true);
        n.old_rect = Some(Rect::new(0, 0, 10, 10));
        // A small move merges into one box.
        n.rect = Rect::new(2, 0, 10, 10);
        assert_eq!(n.transition_rects(), vec![Rect::new(0, 0, 12, 10)]);
        // A far move keeps both rects.
        n.rect = Rect::new(100, 100, 10, 10);
        assert_eq!(
            n.transition_rects(),
            vec![Rect::new(0, 0, 10, 10), Rect::new(100, 100, 10, 10)]
        );
        // Adjacent rects tie and merge.
        n.rect = Rect::new(10, 0, 10, 10);
        assert_eq!(n.transition_rects(), vec![Rect::new(0, 0, 20, 10)]);

        n.visible = false;
        assert_eq!(n.transition_rects(), vec![Rect::new(0, 0, 10, 10)]);
        n.old_visible = Some(false);
        assert!(n.transition_rects().is_empty());
    }
}
