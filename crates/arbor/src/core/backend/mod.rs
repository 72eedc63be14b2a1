/// In-memory raster backend.
pub mod memory;

use std::{any::Any, path::Path};

use slotmap::new_key_type;

use crate::{
    error::Result,
    geom::{Expanse, Point, Rect},
    style::Color,
};

new_key_type! {
    /// Handle to a surface owned by a backend.
    pub struct SurfaceId;
}

/// The raster surface contract the scene paints through. Surfaces are owned
/// by the backend and addressed by handle; the scene frees every surface it
/// creates.
pub trait Backend: Any {
    /// Allocate a surface. Surfaces with `alpha` start fully transparent,
    /// others start opaque black.
    fn create_surface(&mut self, size: Expanse, alpha: bool) -> SurfaceId;

    /// Release a surface. Unknown handles are ignored.
    fn free_surface(&mut self, id: SurfaceId);

    /// The size of a surface, if it exists.
    fn surface_size(&self, id: SurfaceId) -> Option<Expanse>;

    /// Fill a region of a surface. The region is clipped to the surface.
    fn fill(&mut self, surface: SurfaceId, rect: Rect, color: Color) -> Result<()>;

    /// Composite the `src_clip` region of `src` onto `dst` with its top-left
    /// at `dst_pos`. Both sides are clipped.
    fn blit(&mut self, dst: SurfaceId, src: SurfaceId, dst_pos: Point, src_clip: Rect)
    -> Result<()>;

    /// Render a line of text into a new surface sized to fit it.
    fn render_text(&mut self, font: &str, text: &str, size: u32, color: Color)
    -> Result<SurfaceId>;

    /// Decode an image file into a new surface.
    fn load_image(&mut self, path: &Path) -> Result<SurfaceId>;

    /// Copy a surface onto the presentation target.
    fn blit_to_display(&mut self, surface: SurfaceId, pos: Point) -> Result<()>;

    /// Flip the presentation target.
    fn present(&mut self) -> Result<()>;
}
