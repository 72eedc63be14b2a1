use crate::{Context, Props, error::Result, style::Color, widget::Widget};

/// Default label font.
pub const DEFAULT_FONT: &str = "default";

/// A single line of text. The node takes the size of the rendered text and
/// does not take part in pointer input.
#[derive(Debug, Clone)]
pub struct Text {
    /// Content.
    text: String,
    /// Font name passed to the backend.
    font: String,
    /// Font size in pixels.
    size: u32,
    /// Text color.
    color: Color,
}

impl Text {
    /// White 16px text in the default font.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font: DEFAULT_FONT.into(),
            size: 16,
            color: Color::WHITE,
        }
    }

    /// Use a different font.
    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        self.font = font.into();
        self
    }

    /// Use a different font size.
    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    /// Use a different color.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// The current content.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the content, re-rendering if it changed.
    pub fn set_text(&mut self, ctx: &mut Context<'_>, text: impl Into<String>) -> Result<()> {
        let text = text.into();
        if text == self.text {
            return Ok(());
        }
        self.text = text;
        self.render(ctx)
    }

    /// Render the text and install it as the node's background.
    fn render(&self, ctx: &mut Context<'_>) -> Result<()> {
        let surface = ctx
            .backend()
            .render_text(&self.font, &self.text, self.size, self.color)?;
        ctx.set_background(surface)
    }
}

impl Widget for Text {
    fn props(&self) -> Props {
        Props::default().hoverable(false).clickable(false)
    }

    fn refresh_background(&mut self, ctx: &mut Context<'_>) -> Result<()> {
        self.render(ctx)
    }
}
