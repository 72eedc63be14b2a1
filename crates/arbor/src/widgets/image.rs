use std::path::{Path, PathBuf};

use crate::{Context, Props, error::Result, widget::Widget};

/// An image loaded from disk. The node takes the image's size.
#[derive(Debug, Clone)]
pub struct Image {
    /// Source file.
    path: PathBuf,
}

impl Image {
    /// An image widget for a file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The source file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Widget for Image {
    fn props(&self) -> Props {
        Props::default().hoverable(false).clickable(false)
    }

    fn refresh_background(&mut self, ctx: &mut Context<'_>) -> Result<()> {
        let surface = ctx.backend().load_image(&self.path)?;
        ctx.set_background(surface)
    }
}

#[cfg(test)]
mod tests {
    use std::{env, fs, process};

    use image::{Rgba, RgbaImage};

    use super::*;
    use crate::{
        Scene,
        backend::memory::MemoryBackend,
        error::Error,
        geom::{Expanse, Point},
        style::Color,
    };

    #[test]
    fn loads_and_sizes() -> Result<()> {
        let path = env::temp_dir().join(format!("arbor-image-{}.png", process::id()));
        RgbaImage::from_pixel(3, 2, Rgba([255, 0, 0, 255]))
            .save(&path)
            .map_err(Error::from)?;

        let mut s = Scene::new(MemoryBackend::new(Expanse::new(10, 10)), Expanse::new(10, 10))?;
        let img = s.create(Image::new(&path))?;
        let node = s.node(img);
        assert_eq!(node.map(|n| n.rect().size()), Some(Expanse::new(3, 2)));
        let bg = node.and_then(|n| n.background());
        let m = s.backend_as::<MemoryBackend>();
        assert_eq!(
            m.zip(bg).and_then(|(m, bg)| m.pixel(bg, Point::new(2, 1))),
            Some(Color::rgb(255, 0, 0))
        );
        fs::remove_file(&path).ok();
        Ok(())
    }

    #[test]
    fn missing_file() -> Result<()> {
        let mut s = Scene::new(MemoryBackend::new(Expanse::new(10, 10)), Expanse::new(10, 10))?;
        assert!(matches!(
            s.create(Image::new("/nonexistent/arbor.png")),
            Err(Error::Resource(_))
        ));
        Ok(())
    }
}
