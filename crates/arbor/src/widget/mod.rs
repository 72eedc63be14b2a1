//! Widget trait, interaction states and event outcomes.

use std::any::{Any, type_name};

use crate::{
    Context, NodeId, Props,
    error::Result,
    event::{
        key::Key,
        mouse::{Button, Buttons},
    },
    geom::Point,
    message::Message,
    state::NodeName,
};

/// The result of a keyboard or message handler.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum EventOutcome {
    /// The event was processed and propagation stops.
    Handle,
    /// The event was swallowed without a state change and propagation stops.
    Consume,
    /// The event was not handled and bubbles to the parent.
    Ignore,
}

/// Pointer interaction state of a clickable widget.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Hash)]
pub enum WidgetState {
    /// Pointer elsewhere.
    #[default]
    Idle,
    /// Pointer over the widget, no button held.
    Hover,
    /// Pointer entered with the button already held.
    Push,
    /// Button pressed on the widget and the pointer is over it.
    Press,
    /// Button pressed on the widget and the pointer left it.
    Pull,
}

/// Widgets are the behaviour attached to nodes in the scene arena. Every hook
/// has a default, so a widget implements only what it reacts to. Mouse
/// coordinates are local to the widget's node.
#[allow(unused_variables)]
pub trait Widget: Any {
    /// Construction properties used by [`Scene::create`](crate::Scene::create).
    fn props(&self) -> Props {
        Props::default()
    }

    /// Name used in dumps and logs.
    fn name(&self) -> NodeName {
        let name = type_name::<Self>();
        let short = name.rsplit("::").next().unwrap_or(name);
        NodeName::convert(short)
    }

    /// Called once when the node is created, before the first background
    /// refresh. Widgets create their children here.
    fn on_mount(&mut self, ctx: &mut Context<'_>) -> Result<()> {
        Ok(())
    }

    /// Regenerate the background surface. Called after creation, on resize,
    /// on style changes and after registration under a new parent.
    fn refresh_background(&mut self, ctx: &mut Context<'_>) -> Result<()> {
        Ok(())
    }

    /// Per-tick update. Only called for alive nodes.
    fn update(&mut self, ctx: &mut Context<'_>) -> Result<()> {
        Ok(())
    }

    /// The pointer entered the node.
    fn mouse_enter(
        &mut self,
        start: Point,
        end: Point,
        buttons: Buttons,
        ctx: &mut Context<'_>,
    ) -> Result<()> {
        Ok(())
    }

    /// The pointer left the node.
    fn mouse_exit(
        &mut self,
        start: Point,
        end: Point,
        buttons: Buttons,
        ctx: &mut Context<'_>,
    ) -> Result<()> {
        Ok(())
    }

    /// The pointer moved within the node.
    fn mouse_motion(
        &mut self,
        start: Point,
        end: Point,
        buttons: Buttons,
        ctx: &mut Context<'_>,
    ) -> Result<()> {
        Ok(())
    }

    /// A button was pressed over the node.
    fn mouse_down(&mut self, pos: Point, button: Button, ctx: &mut Context<'_>) -> Result<()> {
        Ok(())
    }

    /// A button was released over the node.
    fn mouse_up(&mut self, pos: Point, button: Button, ctx: &mut Context<'_>) -> Result<()> {
        Ok(())
    }

    /// A key was pressed while this node was on the listener chain.
    fn key_down(&mut self, key: Key, ctx: &mut Context<'_>) -> Result<EventOutcome> {
        Ok(EventOutcome::Ignore)
    }

    /// A key was released while this node was on the listener chain.
    fn key_up(&mut self, key: Key, ctx: &mut Context<'_>) -> Result<EventOutcome> {
        Ok(EventOutcome::Ignore)
    }

    /// A message sent by a descendant. `sender` is the direct child it
    /// arrived from. Returning `Ignore` passes it to the parent.
    fn handle_message(
        &mut self,
        sender: NodeId,
        message: &Message,
        ctx: &mut Context<'_>,
    ) -> Result<EventOutcome> {
        Ok(EventOutcome::Ignore)
    }

    /// The node was paused (directly, or by being hidden).
    fn on_pause(&mut self, ctx: &mut Context<'_>) -> Result<()> {
        Ok(())
    }

    /// The node is about to be deleted from the arena.
    fn on_remove(&mut self, ctx: &mut Context<'_>) {}
}

/// Convert widgets into boxed trait objects.
impl<W> From<W> for Box<dyn Widget>
where
    W: Widget + 'static,
{
    fn from(widget: W) -> Self {
        Box::new(widget)
    }
}
