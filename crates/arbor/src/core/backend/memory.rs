use std::path::Path;

use slotmap::SlotMap;
use tracing::trace;

use super::{Backend, SurfaceId};
use crate::{
    error::{Error, Result},
    geom::{Expanse, Point, Rect},
    style::Color,
};

/// Call counters, used to assert how much work a frame did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    /// Surfaces created, including text and image surfaces.
    pub creates: usize,
    /// Surfaces freed.
    pub frees: usize,
    /// Fill calls.
    pub fills: usize,
    /// Surface-to-surface blits.
    pub blits: usize,
    /// Blits onto the presentation target.
    pub display_blits: usize,
    /// Present calls.
    pub presents: usize,
}

/// A pixel buffer.
#[derive(Debug, Clone)]
struct Surface {
    /// Dimensions.
    size: Expanse,
    /// Does the surface keep per-pixel alpha?
    alpha: bool,
    /// Row-major pixels.
    pixels: Vec<Color>,
}

impl Surface {
    /// Allocate a cleared surface.
    fn new(size: Expanse, alpha: bool) -> Self {
        let fill = if alpha { Color::CLEAR } else { Color::BLACK };
        Self {
            size,
            alpha,
            pixels: vec![fill; size.area() as usize],
        }
    }

    /// Pixel index for a local point, if it lies on the surface.
    fn index(&self, p: Point) -> Option<usize> {
        self.size
            .rect()
            .collide_point(p)
            .then(|| p.y as usize * self.size.w as usize + p.x as usize)
    }

    /// Read a pixel.
    fn get(&self, p: Point) -> Option<Color> {
        self.index(p).map(|i| self.pixels[i])
    }

    /// Write a pixel, compositing over what is there.
    fn put(&mut self, p: Point, c: Color) {
        if let Some(i) = self.index(p) {
            let mut out = c.over(self.pixels[i]);
            if !self.alpha {
                out.a = 255;
            }
            self.pixels[i] = out;
        }
    }
}

/// A backend that keeps every surface in memory. Used by tests and the
/// headless demo; text is drawn as solid glyph cells.
#[derive(Debug)]
pub struct MemoryBackend {
    /// Live surfaces.
    surfaces: SlotMap<SurfaceId, Surface>,
    /// The presentation target.
    display: Surface,
    /// Call counters.
    stats: Stats,
    /// Every fill since the last reset, clipped to its surface.
    fill_log: Vec<(SurfaceId, Rect)>,
}

impl MemoryBackend {
    /// Create a backend with a display of the given size.
    pub fn new(display: Expanse) -> Self {
        Self {
            surfaces: SlotMap::with_key(),
            display: Surface::new(display, false),
            stats: Stats::default(),
            fill_log: Vec::new(),
        }
    }

    /// Call counters since creation or the last reset.
    pub fn stats(&self) -> Stats {
        self.stats
    }

    /// Zero the call counters and forget logged fills.
    pub fn reset_stats(&mut self) {
        self.stats = Stats::default();
        self.fill_log.clear();
    }

    /// Regions filled on a surface since the last reset, in call order. A
    /// node refresh starts with a fill, so this shows what a frame repainted.
    pub fn fills_on(&self, surface: SurfaceId) -> Vec<Rect> {
        self.fill_log
            .iter()
            .filter(|(s, _)| *s == surface)
            .map(|(_, r)| *r)
            .collect()
    }

    /// The number of live surfaces.
    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    /// Read a pixel from a surface.
    pub fn pixel(&self, surface: SurfaceId, p: Point) -> Option<Color> {
        self.surfaces.get(surface).and_then(|s| s.get(p))
    }

    /// Read a pixel from the presentation target.
    pub fn display_pixel(&self, p: Point) -> Option<Color> {
        self.display.get(p)
    }

    /// Look up a surface mutably.
    fn surface_mut(&mut self, id: SurfaceId) -> Result<&mut Surface> {
        self.surfaces
            .get_mut(id)
            .ok_or_else(|| Error::Resource(format!("unknown surface {id:?}")))
    }
}

/// Copy the clipped region of `src` onto `dst`.
fn composite(dst: &mut Surface, src: &Surface, dst_pos: Point, src_clip: Rect) {
    let Some(clip) = src_clip.intersect(&src.size.rect()) else {
        return;
    };
    // Shift the destination by however much the clip was trimmed on the
    // top-left.
    let origin = dst_pos + (clip.tl - src_clip.tl);
    for y in 0..clip.h as i32 {
        for x in 0..clip.w as i32 {
            if let Some(c) = src.get(clip.tl.shift(x, y)) {
                dst.put(origin.shift(x, y), c);
            }
        }
    }
}

impl Backend for MemoryBackend {
    fn create_surface(&mut self, size: Expanse, alpha: bool) -> SurfaceId {
        self.stats.creates += 1;
        self.surfaces.insert(Surface::new(size, alpha))
    }

    fn free_surface(&mut self, id: SurfaceId) {
        if self.surfaces.remove(id).is_some() {
            self.stats.frees += 1;
        }
    }

    fn surface_size(&self, id: SurfaceId) -> Option<Expanse> {
        self.surfaces.get(id).map(|s| s.size)
    }

    fn fill(&mut self, surface: SurfaceId, rect: Rect, color: Color) -> Result<()> {
        self.stats.fills += 1;
        let s = self
            .surfaces
            .get_mut(surface)
            .ok_or_else(|| Error::Resource(format!("unknown surface {surface:?}")))?;
        let Some(area) = rect.intersect(&s.size.rect()) else {
            return Ok(());
        };
        self.fill_log.push((surface, area));
        let color = if s.alpha { color } else { color.with_alpha(255) };
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                if let Some(i) = s.index(Point::new(x, y)) {
                    s.pixels[i] = color;
                }
            }
        }
        Ok(())
    }

    fn blit(
        &mut self,
        dst: SurfaceId,
        src: SurfaceId,
        dst_pos: Point,
        src_clip: Rect,
    ) -> Result<()> {
        self.stats.blits += 1;
        if dst == src {
            return Err(Error::InvalidOperation("blit onto itself".into()));
        }
        let Some([d, s]) = self.surfaces.get_disjoint_mut([dst, src]) else {
            return Err(Error::Resource(format!("unknown surface in blit {src:?} -> {dst:?}")));
        };
        composite(d, s, dst_pos, src_clip);
        Ok(())
    }

    fn render_text(&mut self, font: &str, text: &str, size: u32, color: Color) -> Result<SurfaceId> {
        if font.is_empty() {
            return Err(Error::Resource("no font named".into()));
        }
        let cell = Expanse::new((size / 2).max(1), size.max(1));
        let glyphs = text.chars().count() as u32;
        let id = self.create_surface(Expanse::new(cell.w * glyphs, cell.h), true);
        let s = self.surface_mut(id)?;
        for (i, c) in text.chars().enumerate() {
            if c.is_whitespace() {
                continue;
            }
            let x0 = i as i32 * cell.w as i32;
            // Leave a one pixel gutter between glyphs when there is room.
            let w = if cell.w > 1 { cell.w - 1 } else { cell.w };
            for y in 0..cell.h as i32 {
                for x in 0..w as i32 {
                    s.put(Point::new(x0 + x, y), color);
                }
            }
        }
        trace!(font, text, size, "rendered text");
        Ok(id)
    }

    fn load_image(&mut self, path: &Path) -> Result<SurfaceId> {
        let img = image::open(path)
            .map_err(|e| Error::Resource(format!("{}: {e}", path.display())))?
            .to_rgba8();
        let (w, h) = img.dimensions();
        let id = self.create_surface(Expanse::new(w, h), true);
        let s = self.surface_mut(id)?;
        for (x, y, px) in img.enumerate_pixels() {
            let [r, g, b, a] = px.0;
            if let Some(i) = s.index(Point::new(x as i32, y as i32)) {
                s.pixels[i] = Color::rgba(r, g, b, a);
            }
        }
        Ok(id)
    }

    fn blit_to_display(&mut self, surface: SurfaceId, pos: Point) -> Result<()> {
        self.stats.display_blits += 1;
        let src = self
            .surfaces
            .get(surface)
            .ok_or_else(|| Error::Resource(format!("unknown surface {surface:?}")))?;
        let clip = src.size.rect();
        composite(&mut self.display, src, pos, clip);
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        self.stats.presents += 1;
        Ok(())
    }
}
