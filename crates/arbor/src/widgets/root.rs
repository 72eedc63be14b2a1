use tracing::debug;

use crate::{
    Context, Opacity, Props,
    error::{Error, Result},
    style::{BACKGROUND, Color, StyleArgs},
    widget::Widget,
};

/// The widget at the base of every scene. It paints the `background` style
/// and accepts keyboard focus so key listeners can hang beneath it.
#[derive(Debug, Default)]
pub struct Root;

impl Root {
    /// Construct a root widget.
    pub fn new() -> Self {
        Self
    }
}

impl Widget for Root {
    fn props(&self) -> Props {
        Props::default().opacity(Opacity::Opaque).typable(true)
    }

    fn refresh_background(&mut self, ctx: &mut Context<'_>) -> Result<()> {
        let args = StyleArgs::new(ctx.size());
        let surface = match ctx.style_render(BACKGROUND, &args) {
            Ok(s) => s,
            Err(Error::StyleNotFound(key)) => {
                debug!(%key, "no root background style, using black");
                let s = ctx.backend().create_surface(args.size, false);
                ctx.backend().fill(s, args.size.rect(), Color::BLACK)?;
                s
            }
            Err(e) => return Err(e),
        };
        ctx.set_background(surface)
    }
}
