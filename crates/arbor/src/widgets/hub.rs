//! A hub shows exactly one of its registered nodes at a time.

use tracing::debug;

use crate::{
    Context, NodeId, Opacity, Props,
    error::{Error, Result},
    geom::Expanse,
    message::{HubCommand, Message},
    state::NodeName,
    widget::{EventOutcome, Widget},
};

/// An exclusive view switcher. Named nodes are registered hidden; entering
/// one hides the current location and shows the new one. The center node is
/// where [`HubCommand::Exit`] returns to.
///
/// The hub is transparent, so its children composite directly into the
/// hub's parent.
#[derive(Debug)]
pub struct Hub {
    /// Hub size.
    size: Expanse,
    /// Named nodes in registration order.
    nodes: Vec<(NodeName, NodeId)>,
    /// Home node.
    center: Option<NodeId>,
    /// The node currently shown.
    location: Option<NodeId>,
}

impl Hub {
    /// An empty hub.
    pub fn new(size: Expanse) -> Self {
        Self {
            size,
            nodes: Vec::new(),
            center: None,
            location: None,
        }
    }

    /// Register a node under a name. The node starts hidden.
    pub fn register_node(&mut self, ctx: &mut Context<'_>, name: &str, child: NodeId) -> Result<()> {
        let name = NodeName::convert(name);
        if self.node(name.as_str()).is_some() {
            return Err(Error::DuplicateNode(name.to_string()));
        }
        ctx.hide(child)?;
        ctx.register(child)?;
        debug!(%name, ?child, "hub node registered");
        self.nodes.push((name, child));
        Ok(())
    }

    /// Register the center node, entering it if the hub has no location yet.
    pub fn register_center(&mut self, ctx: &mut Context<'_>, child: NodeId) -> Result<()> {
        self.center = Some(child);
        ctx.register(child)?;
        if self.location.is_none() {
            self.enter_node(ctx, child)?;
        } else {
            ctx.hide(child)?;
        }
        Ok(())
    }

    /// Make `child` the visible node. Keyboard input follows it if it is
    /// typable.
    pub fn enter_node(&mut self, ctx: &mut Context<'_>, child: NodeId) -> Result<()> {
        if self.location == Some(child) {
            return Ok(());
        }
        let from = self.location;
        if let Some(old) = from {
            ctx.hide(old)?;
        }
        ctx.show(child)?;
        self.location = Some(child);
        let listener = ctx.is_typable(child).then_some(child);
        ctx.set_key_listener(listener)?;
        debug!(?from, to = ?child, "hub entered node");
        Ok(())
    }

    /// The node currently shown.
    pub fn location(&self) -> Option<NodeId> {
        self.location
    }

    /// The home node.
    pub fn center(&self) -> Option<NodeId> {
        self.center
    }

    /// Look up a registered node by name.
    pub fn node(&self, name: &str) -> Option<NodeId> {
        let name = NodeName::convert(name);
        self.nodes.iter().find(|(n, _)| *n == name).map(|(_, id)| *id)
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &NodeName> {
        self.nodes.iter().map(|(n, _)| n)
    }
}

impl Widget for Hub {
    fn props(&self) -> Props {
        Props::new(self.size.w, self.size.h)
            .opacity(Opacity::Transparent)
            .typable(true)
    }

    fn handle_message(
        &mut self,
        _sender: NodeId,
        message: &Message,
        ctx: &mut Context<'_>,
    ) -> Result<EventOutcome> {
        let target = match message {
            Message::Hub(HubCommand::Exit) => self.center.filter(|c| self.location != Some(*c)),
            Message::Hub(HubCommand::Enter(name)) => self.node(name),
            Message::App(_) => None,
        };
        let Some(target) = target else {
            return Ok(EventOutcome::Ignore);
        };
        self.enter_node(ctx, target)?;
        Ok(EventOutcome::Handle)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        Scene, TypedId, backend::memory::MemoryBackend, message::AppCommand, widgets::Container,
    };

    struct Fixture {
        scene: Scene,
        hub: TypedId<Hub>,
        menu: NodeId,
        game: NodeId,
        help: NodeId,
    }

    fn fixture() -> Result<Fixture> {
        let mut scene = Scene::new(MemoryBackend::new(Expanse::new(100, 100)), Expanse::new(100, 100))?;
        let root = scene.root();
        let hub = scene.add(Hub::new(Expanse::new(100, 100)))?;
        scene.register(root, hub.into())?;
        let menu = scene.create(Container::new(Props::new(50, 50)))?;
        let game = scene.create(Container::new(Props::new(50, 50).typable(true)))?;
        let help = scene.create(Container::new(Props::new(50, 50)))?;
        scene.with_widget(hub, |h: &mut Hub, ctx| {
            h.register_center(ctx, menu)?;
            h.register_node(ctx, "game", game)?;
            h.register_node(ctx, "help", help)
        })?;
        Ok(Fixture {
            scene,
            hub,
            menu,
            game,
            help,
        })
    }

    fn shown(f: &Fixture) -> Vec<NodeId> {
        [f.menu, f.game, f.help]
            .into_iter()
            .filter(|id| f.scene.is_visible(*id))
            .collect()
    }

    #[test]
    fn exactly_one_visible() -> Result<()> {
        let mut f = fixture()?;
        assert_eq!(shown(&f), vec![f.menu]);
        assert_eq!(f.scene.widget_ref::<Hub>(f.hub)?.location(), Some(f.menu));

        f.scene.send_message(f.menu, Message::enter("game"))?;
        assert_eq!(shown(&f), vec![f.game]);
        assert!(f.scene.is_paused(f.menu));
        let hub = f.hub.id();
        assert_eq!(f.scene.node(hub).and_then(|n| n.key_listener()), Some(f.game));

        f.scene.send_message(f.game, Message::enter("help"))?;
        assert_eq!(shown(&f), vec![f.help]);
        // Help is not typable, so keys stop at the hub.
        assert_eq!(f.scene.node(hub).and_then(|n| n.key_listener()), None);

        f.scene.send_message(f.help, HubCommand::Exit)?;
        assert_eq!(shown(&f), vec![f.menu]);
        assert!(f.scene.take_messages().is_empty());
        Ok(())
    }

    #[test]
    fn typability_cascades_into_views() -> Result<()> {
        let mut f = fixture()?;
        let hub = f.hub.id();
        f.scene.set_typable(hub, false)?;
        f.scene.send_message(f.menu, Message::enter("game"))?;
        assert_eq!(shown(&f), vec![f.game]);
        assert!(!f.scene.can_type(f.game));
        assert_eq!(f.scene.node(hub).and_then(|n| n.key_listener()), None);
        Ok(())
    }

    #[test]
    fn unknown_messages_bubble() -> Result<()> {
        let mut f = fixture()?;
        // Exit at the center and unknown names pass through to the outbox.
        f.scene.send_message(f.menu, HubCommand::Exit)?;
        f.scene.send_message(f.menu, Message::enter("nowhere"))?;
        f.scene.send_message(f.menu, AppCommand::Quit)?;
        assert_eq!(
            f.scene.take_messages(),
            vec![
                Message::Hub(HubCommand::Exit),
                Message::enter("nowhere"),
                Message::App(AppCommand::Quit),
            ]
        );
        assert_eq!(shown(&f), vec![f.menu]);
        Ok(())
    }

    #[test]
    fn duplicate_names() -> Result<()> {
        let mut f = fixture()?;
        let other = f.scene.create(Container::new(Props::new(5, 5)))?;
        let res = f
            .scene
            .with_widget(f.hub, |h: &mut Hub, ctx| h.register_node(ctx, "Game", other));
        assert_eq!(res, Err(Error::DuplicateNode("game".into())));
        let hub = f.scene.widget_ref::<Hub>(f.hub)?;
        assert_eq!(hub.node("game"), Some(f.game));
        assert_eq!(hub.names().map(NodeName::as_str).collect::<Vec<_>>(), vec!["game", "help"]);
        Ok(())
    }
}
