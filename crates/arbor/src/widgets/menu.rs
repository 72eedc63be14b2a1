use crate::{
    Context, NodeId, Props,
    error::Result,
    geom::{Expanse, Point},
    message::Message,
    widget::Widget,
    widgets::Button,
};

/// Left margin of the button column.
const MARGIN_X: i32 = 10;
/// Top of the button column, leaving room for a title.
const FIRST_Y: i32 = 210;
/// Vertical gap between buttons.
const GAP: i32 = 10;

/// A column of buttons. Buttons are a fifth of the menu wide and a tenth of
/// its height tall.
#[derive(Debug)]
pub struct Menu {
    /// Menu size.
    size: Expanse,
    /// Buttons in display order.
    buttons: Vec<NodeId>,
}

impl Menu {
    /// An empty menu.
    pub fn new(size: Expanse) -> Self {
        Self {
            size,
            buttons: Vec::new(),
        }
    }

    /// Append a button that sends `message` when clicked.
    pub fn add_button(
        &mut self,
        ctx: &mut Context<'_>,
        label: &str,
        message: impl Into<Message>,
    ) -> Result<NodeId> {
        let size = Expanse::new(self.size.w / 5, self.size.h / 10);
        let id = ctx.add_child(Button::new(label, message, size))?;
        self.buttons.push(id);
        self.layout(ctx)?;
        Ok(id)
    }

    /// The buttons, top to bottom.
    pub fn buttons(&self) -> &[NodeId] {
        &self.buttons
    }

    /// Stack the buttons vertically.
    fn layout(&self, ctx: &mut Context<'_>) -> Result<()> {
        let mut y = FIRST_Y;
        for &b in &self.buttons {
            ctx.set_pos(b, Point::new(MARGIN_X, y))?;
            y += ctx.rect_of(b)?.h as i32 + GAP;
        }
        Ok(())
    }
}

impl Widget for Menu {
    fn props(&self) -> Props {
        Props::new(self.size.w, self.size.h)
    }

    fn update(&mut self, ctx: &mut Context<'_>) -> Result<()> {
        self.layout(ctx)
    }
}
