//! Dirty-region bookkeeping and the redraw passes.
//!
//! Every non-transparent node owns a display surface holding its composited
//! content. A node either repaints completely on the next frame (it is
//! dirty) or repaints a list of queued regions. Queued regions propagate to
//! ancestors, so a parent's list always covers what its children will
//! change on screen.

use slotmap::SlotMap;
use tracing::trace;

use crate::{
    backend::{Backend, SurfaceId},
    core::{id::NodeId, node::Node, scene::Scene},
    error::Result,
    geom::{Point, Rect},
    style::Color,
};

/// Clip a rect to a node's local bounds, dropping empty results.
fn clip(node: &Node, r: Rect) -> Option<Rect> {
    r.intersect(&node.rect.local()).filter(|r| !r.is_empty())
}

/// Queue `rect`, in the node's local coordinates, for repaint and propagate
/// it up the tree. A node whose queue would cover more than its own area is
/// escalated to a full repaint instead.
pub(crate) fn add_dirty_rect(scene: &mut Scene, id: NodeId, rect: Rect) {
    let (mut cur, mut rect) = (id, rect);
    loop {
        let Some(node) = scene.nodes.get_mut(cur) else {
            return;
        };
        if !node.visible {
            return;
        }
        if node.is_transparent() {
            let Some(parent) = node.parent else {
                return;
            };
            rect = rect.translate(node.rect.tl);
            cur = parent;
            continue;
        }
        if node.is_dirty() {
            return;
        }
        let Some(r) = clip(node, rect) else {
            return;
        };
        if node.dirty_area + r.area() > node.rect.area() {
            trace!(id = ?cur, "dirty area exceeds node, escalating");
            mark_dirty(scene, cur);
            return;
        }
        node.dirty_rects.push(r);
        node.dirty_area += r.area();
        let Some(parent) = node.parent else {
            return;
        };
        rect = r.translate(node.rect.tl);
        cur = parent;
    }
}

/// Remove a previously queued rect from the node and its ancestors. Stops at
/// the first level that never queued it: a dirty or hidden node, or one the
/// rect does not reach. A rect missing anywhere else is a bookkeeping bug.
pub(crate) fn clean_dirty_rect(scene: &mut Scene, id: NodeId, rect: Rect) {
    let (mut cur, mut rect) = (id, rect);
    // Cleared once the walk passes a hidden transparent node, which may
    // never have forwarded the rect.
    let mut strict = true;
    loop {
        let Some(node) = scene.nodes.get_mut(cur) else {
            return;
        };
        if node.is_transparent() {
            strict &= node.visible;
            let Some(parent) = node.parent else {
                return;
            };
            rect = rect.translate(node.rect.tl);
            cur = parent;
            continue;
        }
        let Some(r) = clip(node, rect) else {
            return;
        };
        let Some(i) = node.dirty_rects.iter().position(|q| *q == r) else {
            debug_assert!(
                !strict || !node.visible || node.is_dirty(),
                "queued rect {r:?} missing from {cur:?}"
            );
            return;
        };
        node.dirty_rects.remove(i);
        debug_assert!(node.dirty_area >= r.area(), "dirty area underflow");
        node.dirty_area = node.dirty_area.saturating_sub(r.area());
        let Some(parent) = node.parent else {
            return;
        };
        rect = r.translate(node.rect.tl);
        cur = parent;
    }
}

/// Flag the node for a full repaint. Its queued rects are withdrawn from the
/// ancestors, since the full repaint covers them.
pub(crate) fn mark_dirty(scene: &mut Scene, id: NodeId) {
    let Some(node) = scene.nodes.get_mut(id) else {
        return;
    };
    let rects = std::mem::take(&mut node.dirty_rects);
    node.dirty = true;
    node.dirty_area = 0;
    let (tl, parent) = (node.rect.tl, node.parent);
    if let Some(parent) = parent {
        for r in rects {
            clean_dirty_rect(scene, parent, r.translate(tl));
        }
    }
}

/// Prepare a node to move or leave its parent. Ancestor copies of queued
/// rects are found through the node's current position, so they are
/// withdrawn now and the node repaints in full. A transparent node does the
/// same for the nodes it forwards for.
pub(crate) fn detach(scene: &mut Scene, id: NodeId) {
    let Some(node) = scene.nodes.get(id) else {
        return;
    };
    if node.is_transparent() {
        for child in node.children.clone() {
            detach(scene, child);
        }
    }
    mark_dirty(scene, id);
}

/// Run the collect, paint and settle passes, then present the root if it
/// changed.
pub(crate) fn draw(scene: &mut Scene) -> Result<bool> {
    let root = scene.root;
    collect(scene, root);

    let Scene { nodes, backend, .. } = scene;
    let backend = backend.as_mut();
    paint(nodes, backend, root)?;

    let Some(node) = nodes.get(root) else {
        return Ok(false);
    };
    let changed = node.is_dirty() || !node.dirty_rects.is_empty();
    let (display, pos) = (node.display, node.rect.tl);
    settle(nodes, root);

    if changed {
        trace!("presenting frame");
        if let Some(display) = display {
            backend.blit_to_display(display, pos)?;
        }
        backend.present()?;
    }
    Ok(changed)
}

/// Turn child changes into queued regions on their parents, deepest first.
fn collect(scene: &mut Scene, id: NodeId) {
    let Some(node) = scene.nodes.get(id) else {
        return;
    };
    if !node.visible {
        return;
    }
    for child in node.children.clone() {
        let Some(c) = scene.nodes.get(child) else {
            continue;
        };
        if !c.visible && c.old_visible != Some(true) {
            continue;
        }
        collect(scene, child);
        let (Some(c), Some(p)) = (scene.nodes.get(child), scene.nodes.get(id)) else {
            continue;
        };
        if c.is_dirty() && !p.is_dirty() {
            for r in c.transition_rects() {
                add_dirty_rect(scene, id, r);
            }
        }
    }
}

/// Repaint display surfaces, children before parents.
fn paint(nodes: &SlotMap<NodeId, Node>, backend: &mut dyn Backend, id: NodeId) -> Result<()> {
    let Some(node) = nodes.get(id) else {
        return Ok(());
    };
    if !node.visible {
        return Ok(());
    }
    for &child in &node.children {
        paint(nodes, backend, child)?;
    }
    let Some(display) = node.display else {
        return Ok(());
    };
    if node.is_dirty() {
        refresh(nodes, backend, node, display, node.rect.local())?;
    } else {
        for &r in &node.dirty_rects {
            refresh(nodes, backend, node, display, r)?;
        }
    }
    Ok(())
}

/// Rebuild one region of a node's display from its background and children.
fn refresh(
    nodes: &SlotMap<NodeId, Node>,
    backend: &mut dyn Backend,
    node: &Node,
    display: SurfaceId,
    area: Rect,
) -> Result<()> {
    backend.fill(display, area, Color::CLEAR)?;
    if let Some(bg) = node.background {
        backend.blit(display, bg, area.tl, area)?;
    }
    blit_children(nodes, backend, display, node, Point::zero(), area)
}

/// Composite a node's visible children into `display`, clipped to `area`.
/// Transparent children are expanded in place.
fn blit_children(
    nodes: &SlotMap<NodeId, Node>,
    backend: &mut dyn Backend,
    display: SurfaceId,
    node: &Node,
    offset: Point,
    area: Rect,
) -> Result<()> {
    for &c in &node.children {
        let Some(child) = nodes.get(c) else {
            continue;
        };
        if !child.visible {
            continue;
        }
        let rect = child.rect.translate(offset);
        let Some(part) = rect.intersect(&area).filter(|r| !r.is_empty()) else {
            continue;
        };
        if child.is_transparent() {
            blit_children(nodes, backend, display, child, rect.tl, part)?;
        } else if let Some(src) = child.display {
            backend.blit(display, src, part.tl, part.translate(-rect.tl))?;
        }
    }
    Ok(())
}

/// Reset frame state and snapshot geometry for the next frame. Children of
/// hidden nodes keep their state until the node is shown again.
fn settle(nodes: &mut SlotMap<NodeId, Node>, root: NodeId) {
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        let Some(node) = nodes.get_mut(id) else {
            continue;
        };
        node.dirty = false;
        node.dirty_rects.clear();
        node.dirty_area = 0;
        node.old_rect = Some(node.rect);
        node.old_visible = Some(node.visible);
        if node.visible {
            stack.extend(node.children.iter().copied());
        }
    }
}
