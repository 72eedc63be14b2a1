//! Input routing, hover tracking, per-tick updates and the message bus.
//!
//! Mouse events descend the tree in local coordinates. Keyboard events follow
//! the chain of key listeners from the root and bubble back up. Messages
//! climb from a sender through its ancestors.

use tracing::{debug, trace};

use crate::{
    core::{id::NodeId, scene::Scene},
    error::{Error, Result},
    event::{
        Event,
        key::Key,
        mouse::{Button, Buttons},
    },
    geom::Point,
    message::{AppCommand, Message},
    widget::EventOutcome,
};

/// Pointer state as last reported by the host.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Pointer {
    /// Screen position.
    pub pos: Point,
    /// Movement of the last event.
    pub rel: Point,
    /// Buttons held.
    pub buttons: Buttons,
}

/// How a motion event relates to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Motion {
    /// The pointer moved onto the node.
    Enter,
    /// The pointer moved off the node.
    Exit,
    /// The pointer moved within the node.
    Within,
}

/// Feed an event through the tree.
pub(crate) fn handle_event(scene: &mut Scene, event: Event) -> Result<()> {
    let root = scene.root;
    match event {
        Event::KeyDown(key) => route_key(scene, key, true),
        Event::KeyUp(key) => route_key(scene, key, false),
        Event::MouseMove {
            start,
            end,
            buttons,
        } => {
            scene.pointer = Pointer {
                pos: end,
                rel: end - start,
                buttons,
            };
            route_move(scene, root, start, end, buttons)
        }
        Event::MouseDown { pos, button } => {
            press(scene, pos, button, true)?;
            route_button(scene, root, pos, button, true)
        }
        Event::MouseUp { pos, button } => {
            press(scene, pos, button, false)?;
            route_button(scene, root, pos, button, false)
        }
        Event::Resize(size) => {
            debug!(?size, "resize");
            scene.set_size(root, size)
        }
        Event::Quit => {
            scene.outbox.push(AppCommand::Quit.into());
            Ok(())
        }
    }
}

/// Record a button transition in the pointer state. A press away from the
/// last known position moves the pointer there first, so hover bits agree
/// with the nodes under it before the button is delivered.
fn press(scene: &mut Scene, pos: Point, button: Button, held: bool) -> Result<()> {
    if pos != scene.pointer.pos {
        let p = &mut scene.pointer;
        p.rel = pos - p.pos;
        p.pos = pos;
        track(scene)?;
    }
    scene.pointer.buttons.set(button, held);
    Ok(())
}

/// Route a motion event to `id`. Coordinates are in the parent's space.
fn route_move(scene: &mut Scene, id: NodeId, start: Point, end: Point, buttons: Buttons) -> Result<()> {
    let Some(node) = scene.nodes.get(id) else {
        return Ok(());
    };
    if !node.hoverable || !node.is_alive() {
        return Ok(());
    }
    let motion = match (node.rect.collide_point(start), node.rect.collide_point(end)) {
        (true, true) => Motion::Within,
        (false, true) => Motion::Enter,
        (true, false) => Motion::Exit,
        (false, false) => return Ok(()),
    };
    let tl = node.rect.tl;
    deliver_move(scene, id, motion, start - tl, end - tl, buttons)?;
    let children = scene.nodes.get(id).map(|n| n.children.clone()).unwrap_or_default();
    for child in children {
        route_move(scene, child, start - tl, end - tl, buttons)?;
    }
    Ok(())
}

/// Run the node's own motion hook, keeping the hover bit in step.
/// Coordinates are local.
fn deliver_move(
    scene: &mut Scene,
    id: NodeId,
    motion: Motion,
    start: Point,
    end: Point,
    buttons: Buttons,
) -> Result<()> {
    let Some(node) = scene.nodes.get_mut(id) else {
        return Ok(());
    };
    let motion = match (motion, node.hovered) {
        (Motion::Enter, true) => Motion::Within,
        (Motion::Exit, false) => return Ok(()),
        (m, _) => m,
    };
    match motion {
        Motion::Enter => {
            node.hovered = true;
            scene.with_hook(id, |w, ctx| w.mouse_enter(start, end, buttons, ctx))
        }
        Motion::Exit => {
            node.hovered = false;
            scene.with_hook(id, |w, ctx| w.mouse_exit(start, end, buttons, ctx))
        }
        Motion::Within => scene.with_hook(id, |w, ctx| w.mouse_motion(start, end, buttons, ctx)),
    }
}

/// Route a button event to `id`. `pos` is in the parent's space.
fn route_button(scene: &mut Scene, id: NodeId, pos: Point, button: Button, down: bool) -> Result<()> {
    let Some(node) = scene.nodes.get(id) else {
        return Ok(());
    };
    if !node.clickable || !node.is_alive() || !node.rect.collide_point(pos) {
        return Ok(());
    }
    let local = pos - node.rect.tl;
    if down {
        scene.with_hook(id, |w, ctx| w.mouse_down(local, button, ctx))?;
    } else {
        scene.with_hook(id, |w, ctx| w.mouse_up(local, button, ctx))?;
    }

    let mut children = scene.nodes.get(id).map(|n| n.children.clone()).unwrap_or_default();
    if down {
        children.reverse();
    }
    for child in children {
        let Some(c) = scene.nodes.get(child) else {
            continue;
        };
        let hit = c.clickable && c.is_alive() && c.rect.collide_point(local);
        if down
            && hit
            && c.typable
            && let Some(n) = scene.nodes.get_mut(id)
        {
            n.key_listener = Some(child);
        }
        route_button(scene, child, local, button, down)?;
    }
    Ok(())
}

/// The listener chain from the root down, following alive listeners.
fn listener_chain(scene: &Scene) -> Vec<NodeId> {
    let mut chain = vec![scene.root];
    let mut cur = scene.root;
    while let Some(next) = scene.nodes.get(cur).and_then(|n| n.key_listener) {
        let ok = scene
            .nodes
            .get(next)
            .is_some_and(|n| n.parent == Some(cur) && n.is_alive());
        if !ok || chain.contains(&next) {
            break;
        }
        chain.push(next);
        cur = next;
    }
    chain
}

/// Deliver a key deepest-first along the listener chain. An ignored key-down
/// falls back to the key map: the bound message goes to the deepest listener
/// first and bubbles from there.
fn route_key(scene: &mut Scene, key: Key, down: bool) -> Result<()> {
    let chain = listener_chain(scene);
    for &id in chain.iter().rev() {
        let outcome = if down {
            scene.with_hook(id, |w, ctx| w.key_down(key, ctx))?
        } else {
            scene.with_hook(id, |w, ctx| w.key_up(key, ctx))?
        };
        if outcome != EventOutcome::Ignore {
            trace!(?id, %key, ?outcome, "key handled");
            return Ok(());
        }
    }
    if !down {
        return Ok(());
    }
    if let Some(message) = scene.keymap.get(&key).cloned() {
        let target = chain.last().copied().unwrap_or(scene.root);
        debug!(%key, %message, "key binding");
        let outcome = scene.with_hook(target, |w, ctx| w.handle_message(target, &message, ctx))?;
        if outcome == EventOutcome::Ignore {
            send_message(scene, target, message)?;
        }
    }
    Ok(())
}

/// Walk the sender's ancestors until one handles the message. Ancestors that
/// are running a hook are passed over.
pub(crate) fn send_message(scene: &mut Scene, from: NodeId, message: Message) -> Result<()> {
    let mut sender = from;
    let mut cur = scene.nodes.get(from).ok_or(Error::NodeNotFound(from))?.parent;
    while let Some(id) = cur {
        if scene.is_busy(id) {
            trace!(?id, %message, "skipping busy ancestor");
        } else {
            let outcome = scene.with_hook(id, |w, ctx| w.handle_message(sender, &message, ctx))?;
            if outcome != EventOutcome::Ignore {
                trace!(?id, %message, "message handled");
                return Ok(());
            }
        }
        sender = id;
        cur = scene.nodes.get(id).and_then(|n| n.parent);
    }
    debug!(%message, "unhandled message");
    scene.outbox.push(message);
    Ok(())
}

/// Reconcile hover bits with the pointer, synthesizing enter and exit
/// events for nodes that moved under or away from it.
pub(crate) fn track(scene: &mut Scene) -> Result<()> {
    let (root, pos) = (scene.root, scene.pointer.pos);
    track_node(scene, root, pos)
}

/// Track one node. `pos` is in the parent's space.
fn track_node(scene: &mut Scene, id: NodeId, pos: Point) -> Result<()> {
    let Some(node) = scene.nodes.get(id) else {
        return Ok(());
    };
    // Hover bits below a dead node are kept, so the exit is delivered once
    // it comes back.
    if !node.is_alive() {
        return Ok(());
    }
    let inside = node.rect.collide_point(pos);
    let (tl, hovered) = (node.rect.tl, node.hovered);
    let hover = scene.can_hover(id);
    let Pointer { rel, buttons, .. } = scene.pointer;
    let (start, end) = (pos - rel - tl, pos - tl);

    if hover && inside && !hovered {
        deliver_move(scene, id, Motion::Enter, start, end, buttons)?;
    } else if hovered && (!hover || !inside) {
        deliver_move(scene, id, Motion::Exit, start, end, buttons)?;
    }

    let children = scene.nodes.get(id).map(|n| n.children.clone()).unwrap_or_default();
    for child in children {
        track_node(scene, child, pos - tl)?;
    }
    Ok(())
}

/// Run `update` hooks over the alive part of the tree, parents first.
pub(crate) fn update(scene: &mut Scene, id: NodeId) -> Result<()> {
    if !scene.is_alive(id) {
        return Ok(());
    }
    scene.with_hook(id, |w, ctx| w.update(ctx))?;
    let children = scene.nodes.get(id).map(|n| n.children.clone()).unwrap_or_default();
    for child in children {
        update(scene, child)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        Context, Props, Widget,
        backend::memory::MemoryBackend,
        event::key::KeyCode,
        geom::Expanse,
        message::HubCommand,
    };

    /// Shared event log.
    type Log = Rc<RefCell<Vec<String>>>;

    /// Records the hooks it receives.
    struct Recorder {
        /// Label used in the log.
        tag: &'static str,
        /// Shared log.
        log: Log,
        /// Handle keys and messages instead of ignoring them.
        handles: bool,
    }

    impl Recorder {
        fn push(&self, what: String) {
            self.log.borrow_mut().push(format!("{}:{what}", self.tag));
        }
    }

    impl Widget for Recorder {
        fn mouse_enter(&mut self, _: Point, end: Point, _: Buttons, _: &mut Context<'_>) -> Result<()> {
            self.push(format!("enter {},{}", end.x, end.y));
            Ok(())
        }

        fn mouse_exit(&mut self, _: Point, end: Point, _: Buttons, _: &mut Context<'_>) -> Result<()> {
            self.push(format!("exit {},{}", end.x, end.y));
            Ok(())
        }

        fn mouse_motion(&mut self, _: Point, end: Point, _: Buttons, _: &mut Context<'_>) -> Result<()> {
            self.push(format!("motion {},{}", end.x, end.y));
            Ok(())
        }

        fn mouse_down(&mut self, pos: Point, _: Button, _: &mut Context<'_>) -> Result<()> {
            self.push(format!("down {},{}", pos.x, pos.y));
            Ok(())
        }

        fn key_down(&mut self, key: Key, _: &mut Context<'_>) -> Result<EventOutcome> {
            self.push(format!("key {key}"));
            Ok(if self.handles {
                EventOutcome::Handle
            } else {
                EventOutcome::Ignore
            })
        }

        fn handle_message(
            &mut self,
            _: NodeId,
            message: &Message,
            _: &mut Context<'_>,
        ) -> Result<EventOutcome> {
            self.push(format!("message {message}"));
            Ok(if self.handles {
                EventOutcome::Handle
            } else {
                EventOutcome::Ignore
            })
        }
    }

    fn setup() -> Result<(Scene, Log)> {
        let scene = Scene::new(MemoryBackend::new(Expanse::new(100, 100)), Expanse::new(100, 100))?;
        Ok((scene, Log::default()))
    }

    fn record(s: &mut Scene, log: &Log, tag: &'static str, props: Props, handles: bool) -> Result<NodeId> {
        s.create_with(
            Recorder {
                tag,
                log: Rc::clone(log),
                handles,
            },
            props,
        )
    }

    fn drain(log: &Log) -> Vec<String> {
        std::mem::take(&mut *log.borrow_mut())
    }

    fn moved(from: (i32, i32), to: (i32, i32)) -> Event {
        Event::MouseMove {
            start: from.into(),
            end: to.into(),
            buttons: Buttons::NONE,
        }
    }

    #[test]
    fn motion_enter_exit() -> Result<()> {
        let (mut s, log) = setup()?;
        let root = s.root();
        let a = record(&mut s, &log, "a", Props::new(20, 20).at(10, 10), false)?;
        let b = record(&mut s, &log, "b", Props::new(5, 5).at(5, 5), false)?;
        s.register(root, a)?;
        s.register(a, b)?;

        s.handle_event(moved((0, 0), (12, 12)))?;
        assert_eq!(drain(&log), vec!["a:enter 2,2"]);
        s.handle_event(moved((12, 12), (16, 16)))?;
        assert_eq!(drain(&log), vec!["a:motion 6,6", "b:enter 1,1"]);
        s.handle_event(moved((16, 16), (50, 50)))?;
        assert_eq!(drain(&log), vec!["a:exit 40,40", "b:exit 35,35"]);
        assert!(!s.node(a).is_some_and(|n| n.hovered()));

        // Tracking agrees with routing, so a tick fires nothing.
        s.tick()?;
        assert!(drain(&log).is_empty());
        Ok(())
    }

    #[test]
    fn tracking_synthesizes_enter() -> Result<()> {
        let (mut s, log) = setup()?;
        let root = s.root();
        s.handle_event(moved((0, 0), (50, 50)))?;
        let a = record(&mut s, &log, "a", Props::new(10, 10).at(0, 0), false)?;
        s.register(root, a)?;
        s.tick()?;
        assert!(drain(&log).is_empty());

        s.set_pos(a, Point::new(45, 45))?;
        s.tick()?;
        assert_eq!(drain(&log), vec!["a:enter 5,5"]);
        s.tick()?;
        assert!(drain(&log).is_empty());

        s.set_hoverable(a, false)?;
        s.tick()?;
        assert_eq!(drain(&log), vec!["a:exit 5,5"]);
        Ok(())
    }

    #[test]
    fn hidden_subtree_exits_when_shown() -> Result<()> {
        let (mut s, log) = setup()?;
        let root = s.root();
        let a = record(&mut s, &log, "a", Props::new(20, 20).at(10, 10), false)?;
        let b = record(&mut s, &log, "b", Props::new(5, 5), false)?;
        s.register(root, a)?;
        s.register(a, b)?;
        s.handle_event(moved((0, 0), (12, 12)))?;
        assert_eq!(drain(&log), vec!["a:enter 2,2", "b:enter 2,2"]);

        s.hide(a)?;
        s.handle_event(moved((12, 12), (50, 50)))?;
        s.tick()?;
        assert!(drain(&log).is_empty());
        assert!(s.node(b).is_some_and(|n| n.hovered()));

        s.show(a)?;
        s.tick()?;
        assert_eq!(drain(&log), vec!["a:exit 40,40", "b:exit 40,40"]);
        assert!(!s.node(b).is_some_and(|n| n.hovered()));
        Ok(())
    }

    #[test]
    fn press_elsewhere_moves_the_pointer() -> Result<()> {
        let (mut s, log) = setup()?;
        let root = s.root();
        let a = record(&mut s, &log, "a", Props::new(20, 20).at(10, 10), false)?;
        s.register(root, a)?;
        s.handle_event(Event::MouseDown {
            pos: Point::new(15, 15),
            button: Button::Left,
        })?;
        assert_eq!(drain(&log), vec!["a:enter 5,5", "a:down 5,5"]);
        assert!(s.node(a).is_some_and(|n| n.hovered()));
        Ok(())
    }

    #[test]
    fn clicks_reach_overlapping_children_top_first() -> Result<()> {
        let (mut s, log) = setup()?;
        let root = s.root();
        let low = record(&mut s, &log, "low", Props::new(10, 10), false)?;
        let high = record(&mut s, &log, "high", Props::new(10, 10).at(5, 5).z(1), false)?;
        let off = record(&mut s, &log, "off", Props::new(10, 10).clickable(false), false)?;
        for n in [low, high, off] {
            s.register(root, n)?;
        }
        s.handle_event(moved((50, 50), (6, 7)))?;
        drain(&log);
        s.handle_event(Event::MouseDown {
            pos: Point::new(6, 7),
            button: Button::Left,
        })?;
        assert_eq!(drain(&log), vec!["high:down 1,2", "low:down 6,7"]);
        assert_eq!(s.pointer().pos, Point::new(6, 7));
        assert!(s.pointer().buttons.left);
        Ok(())
    }

    #[test]
    fn keys_follow_listener_chain() -> Result<()> {
        let (mut s, log) = setup()?;
        let root = s.root();
        let outer = record(&mut s, &log, "outer", Props::new(50, 50).typable(true), true)?;
        let inner = record(&mut s, &log, "inner", Props::new(10, 10).typable(true), false)?;
        s.register(root, outer)?;
        s.register(outer, inner)?;

        // Clicking a typable node makes it the listener at every level.
        s.handle_event(Event::MouseDown {
            pos: Point::new(1, 1),
            button: Button::Left,
        })?;
        assert_eq!(s.node(root).and_then(|n| n.key_listener()), Some(outer));
        assert_eq!(s.node(outer).and_then(|n| n.key_listener()), Some(inner));
        drain(&log);

        s.handle_event(Event::KeyDown(Key::from('x')))?;
        assert_eq!(drain(&log), vec!["inner:key x", "outer:key x"]);
        assert!(s.take_messages().is_empty());

        // A paused listener drops out of the chain.
        s.pause(inner)?;
        s.handle_event(Event::KeyDown(Key::from('x')))?;
        assert_eq!(drain(&log), vec!["outer:key x"]);
        Ok(())
    }

    #[test]
    fn ignored_keys_use_the_keymap() -> Result<()> {
        let (mut s, log) = setup()?;
        let root = s.root();
        let game = record(&mut s, &log, "game", Props::new(10, 10).typable(true), false)?;
        s.register(root, game)?;
        s.set_key_listener(root, Some(game))?;

        s.handle_event(Event::KeyDown(KeyCode::Esc.into()))?;
        assert_eq!(drain(&log), vec!["game:key esc", "game:message exit"]);
        assert_eq!(s.take_messages(), vec![Message::Hub(HubCommand::Exit)]);

        // Unbound keys vanish.
        s.handle_event(Event::KeyDown(Key::from('z')))?;
        assert!(s.take_messages().is_empty());
        Ok(())
    }

    #[test]
    fn messages_bubble_until_handled() -> Result<()> {
        let (mut s, log) = setup()?;
        let root = s.root();
        let top = record(&mut s, &log, "top", Props::new(50, 50), true)?;
        let mid = record(&mut s, &log, "mid", Props::new(50, 50), false)?;
        let leaf = record(&mut s, &log, "leaf", Props::new(5, 5), false)?;
        s.register(root, top)?;
        s.register(top, mid)?;
        s.register(mid, leaf)?;

        s.send_message(leaf, Message::enter("game"))?;
        assert_eq!(drain(&log), vec!["mid:message enter:game", "top:message enter:game"]);
        assert!(s.take_messages().is_empty());

        s.send_message(top, AppCommand::Restart)?;
        assert!(drain(&log).is_empty());
        assert_eq!(s.take_messages(), vec![Message::App(AppCommand::Restart)]);
        Ok(())
    }

    #[test]
    fn quit_and_resize() -> Result<()> {
        let (mut s, _) = setup()?;
        s.handle_event(Event::Quit)?;
        assert_eq!(s.take_messages(), vec![Message::App(AppCommand::Quit)]);
        s.handle_event(Event::Resize(Expanse::new(40, 30)))?;
        let root = s.root();
        assert_eq!(s.node(root).map(|n| n.rect().size()), Some(Expanse::new(40, 30)));
        Ok(())
    }
}
