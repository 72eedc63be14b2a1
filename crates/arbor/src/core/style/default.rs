use super::{BACKGROUND, BUTTON, Color, StyleArgs, StyleMap};
use crate::{
    backend::{Backend, SurfaceId},
    error::Result,
    widget::WidgetState,
};

/// Default root background.
const BACKGROUND_COLOR: Color = Color::rgb(0x20, 0x24, 0x2c);

/// Button backgrounds are a translucent grey that lightens with interaction.
fn button(backend: &mut dyn Backend, args: &StyleArgs) -> Result<SurfaceId> {
    let shade = match args.state {
        WidgetState::Idle => 0,
        WidgetState::Hover | WidgetState::Push => 40,
        WidgetState::Press | WidgetState::Pull => 60,
    };
    let surface = backend.create_surface(args.size, true);
    backend.fill(surface, args.size.rect(), Color::grey(shade).with_alpha(100))?;
    Ok(surface)
}

/// A renderer that fills the requested size with one color.
pub fn solid(color: Color) -> impl Fn(&mut dyn Backend, &StyleArgs) -> Result<SurfaceId> {
    move |backend, args| {
        let surface = backend.create_surface(args.size, color.a != 255);
        backend.fill(surface, args.size.rect(), color)?;
        Ok(surface)
    }
}

/// The style map installed on every scene root.
pub fn default_style() -> StyleMap {
    StyleMap::new()
        .with(BUTTON, button)
        .with(BACKGROUND, solid(BACKGROUND_COLOR))
}
