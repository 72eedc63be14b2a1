use crate::{Context, Props, error::Result, style::Color, widget::Widget};

/// A node with no behaviour of its own, used to group children. It can
/// optionally paint a flat color.
#[derive(Debug, Clone)]
pub struct Container {
    /// Construction properties.
    props: Props,
    /// Background fill.
    fill: Option<Color>,
}

impl Container {
    /// A container with the given properties.
    pub fn new(props: Props) -> Self {
        Self { props, fill: None }
    }

    /// Paint the container with a flat color.
    pub fn with_fill(mut self, color: Color) -> Self {
        self.fill = Some(color);
        self
    }

    /// The fill color, if any.
    pub fn fill(&self) -> Option<Color> {
        self.fill
    }
}

impl Widget for Container {
    fn props(&self) -> Props {
        self.props
    }

    fn refresh_background(&mut self, ctx: &mut Context<'_>) -> Result<()> {
        let Some(color) = self.fill else {
            return Ok(());
        };
        let size = ctx.size();
        let surface = ctx.backend().create_surface(size, color.a != 255);
        ctx.backend().fill(surface, size.rect(), color)?;
        ctx.set_background(surface)
    }
}
