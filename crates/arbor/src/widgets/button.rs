//! Button widget.

use tracing::debug;

use crate::{
    Context, NodeId, Props,
    error::{Error, Result},
    event::mouse::{Button as MouseButton, Buttons},
    geom::{Anchor, Expanse, Point},
    message::Message,
    style::{BUTTON, Color, StyleArgs},
    widget::{Widget, WidgetState},
    widgets::Text,
};

/// A labelled button that sends a message when clicked.
///
/// The interaction state follows the pointer: `Hover` while over the button,
/// `Push` when entered with the button already held, `Press` while held
/// after a press on the button, and `Pull` when the pointer leaves while
/// pressed. Releasing in `Press` sends the message.
pub struct Button {
    /// Label text.
    label: String,
    /// Message sent on click.
    message: Message,
    /// Button size.
    size: Expanse,
    /// Interaction state.
    state: WidgetState,
    /// The label node, once mounted.
    text: Option<NodeId>,
}

impl Button {
    /// Construct a button.
    pub fn new(label: impl Into<String>, message: impl Into<Message>, size: Expanse) -> Self {
        Self {
            label: label.into(),
            message: message.into(),
            size,
            state: WidgetState::Idle,
            text: None,
        }
    }

    /// The label text.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The message sent on click.
    pub fn message(&self) -> &Message {
        &self.message
    }

    /// Current interaction state.
    pub fn state(&self) -> WidgetState {
        self.state
    }

    /// The label node.
    pub fn text(&self) -> Option<NodeId> {
        self.text
    }

    /// Move to a new state, sending the message on a completed click.
    fn set_state(&mut self, ctx: &mut Context<'_>, state: WidgetState) -> Result<()> {
        if state == self.state {
            return Ok(());
        }
        let clicked = self.state == WidgetState::Press && state == WidgetState::Hover;
        self.state = state;
        if clicked {
            debug!(label = %self.label, message = %self.message, "button clicked");
            ctx.send_message(self.message.clone())?;
        }
        self.refresh_background(ctx)
    }
}

impl Widget for Button {
    fn props(&self) -> Props {
        Props::new(self.size.w, self.size.h)
    }

    fn on_mount(&mut self, ctx: &mut Context<'_>) -> Result<()> {
        let font_size = (self.size.h / 3).max(14);
        let text = Text::new(self.label.clone())
            .with_size(font_size)
            .with_color(Color::WHITE);
        self.text = Some(ctx.add_child(text)?);
        Ok(())
    }

    fn refresh_background(&mut self, ctx: &mut Context<'_>) -> Result<()> {
        let args = StyleArgs {
            size: ctx.size(),
            state: self.state,
        };
        let surface = match ctx.style_render(BUTTON, &args) {
            Ok(s) => s,
            Err(Error::StyleNotFound(key)) => {
                debug!(%key, "no button style, using a flat fill");
                let s = ctx.backend().create_surface(args.size, true);
                ctx.backend()
                    .fill(s, args.size.rect(), Color::grey(80).with_alpha(160))?;
                s
            }
            Err(e) => return Err(e),
        };
        ctx.set_background(surface)
    }

    fn update(&mut self, ctx: &mut Context<'_>) -> Result<()> {
        if self.state == WidgetState::Pull && !ctx.pointer().buttons.left {
            self.set_state(ctx, WidgetState::Idle)?;
        }
        if let Some(text) = self.text {
            let mut center = ctx.rect().local().center();
            if self.state == WidgetState::Press {
                center = center + Point::new(-1, 1);
            }
            ctx.set_anchor(text, Anchor::Center, center)?;
        }
        Ok(())
    }

    fn mouse_enter(
        &mut self,
        _start: Point,
        _end: Point,
        buttons: Buttons,
        ctx: &mut Context<'_>,
    ) -> Result<()> {
        let next = match self.state {
            WidgetState::Press | WidgetState::Pull => WidgetState::Press,
            _ if buttons.left => WidgetState::Push,
            _ => WidgetState::Hover,
        };
        self.set_state(ctx, next)
    }

    fn mouse_exit(
        &mut self,
        _start: Point,
        _end: Point,
        _buttons: Buttons,
        ctx: &mut Context<'_>,
    ) -> Result<()> {
        let next = match self.state {
            WidgetState::Press | WidgetState::Pull => WidgetState::Pull,
            _ => WidgetState::Idle,
        };
        self.set_state(ctx, next)
    }

    fn mouse_down(&mut self, _pos: Point, button: MouseButton, ctx: &mut Context<'_>) -> Result<()> {
        if button == MouseButton::Left {
            self.set_state(ctx, WidgetState::Press)?;
        }
        Ok(())
    }

    fn mouse_up(&mut self, _pos: Point, button: MouseButton, ctx: &mut Context<'_>) -> Result<()> {
        if button == MouseButton::Left && self.state != WidgetState::Idle {
            self.set_state(ctx, WidgetState::Hover)?;
        }
        Ok(())
    }

    fn on_pause(&mut self, ctx: &mut Context<'_>) -> Result<()> {
        self.set_state(ctx, WidgetState::Idle)
    }
}
