use std::io::{self, Write};

use termcolor::{Buffer, Color, ColorSpec, WriteColor};

use crate::{
    NodeId,
    core::{node::Opacity, scene::Scene},
    error::{Error, Result},
};

/// Render the subtree under `root` as colored text, one node per line with
/// its geometry and flags. This is a debug function.
pub fn dump(scene: &Scene, root: NodeId) -> Result<String> {
    let mut buffer = Buffer::ansi();
    dump_node(&mut buffer, scene, root, 0)
        .map_err(|e| Error::Internal(format!("dump failed: {e}")))?;
    Ok(String::from_utf8_lossy(buffer.as_slice()).into_owned())
}

/// Like [`dump`], without color codes.
pub fn dump_plain(scene: &Scene, root: NodeId) -> Result<String> {
    let mut buffer = Buffer::no_color();
    dump_node(&mut buffer, scene, root, 0)
        .map_err(|e| Error::Internal(format!("dump failed: {e}")))?;
    Ok(String::from_utf8_lossy(buffer.as_slice()).into_owned())
}

/// Write one node and recurse into its children.
fn dump_node(buffer: &mut Buffer, scene: &Scene, id: NodeId, level: usize) -> io::Result<()> {
    let Some(node) = scene.node(id) else {
        return Err(io::Error::other(format!("missing node {id:?}")));
    };
    let indent = "    ".repeat(level);

    write!(buffer, "{indent}")?;
    buffer.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
    write!(buffer, "{}", node.name())?;
    buffer.reset()?;

    let r = node.rect();
    write!(buffer, " {}x{} at ({}, {})", r.w, r.h, r.tl.x, r.tl.y)?;
    if node.z() != 0 {
        write!(buffer, " z={}", node.z())?;
    }

    let mut flags = Vec::new();
    if !node.visible() {
        flags.push(("hidden", Color::Yellow));
    }
    if node.paused() {
        flags.push(("paused", Color::Yellow));
    }
    if node.hovered() {
        flags.push(("hover", Color::Magenta));
    }
    if node.opacity() == Opacity::Transparent {
        flags.push(("transparent", Color::Blue));
    }
    if node.is_dirty() {
        flags.push(("dirty", Color::Red));
    }
    for (flag, color) in flags {
        write!(buffer, " ")?;
        buffer.set_color(ColorSpec::new().set_fg(Some(color)))?;
        write!(buffer, "{flag}")?;
        buffer.reset()?;
    }
    if let Some(listener) = node.key_listener()
        && let Some(l) = scene.node(listener)
    {
        write!(buffer, " keys->{}", l.name())?;
    }
    writeln!(buffer)?;

    for &child in node.children() {
        dump_node(buffer, scene, child, level + 1)?;
    }
    Ok(())
}
