//! Built-in widgets.

/// Button widget.
pub mod button;
/// Plain container widget.
pub mod container;
/// Exclusive view switcher.
pub mod hub;
/// Image widget.
pub mod image;
/// Button menu.
pub mod menu;
/// Root widget.
pub(crate) mod root;
/// Text label widget.
pub mod text;

pub use button::Button;
pub use container::Container;
pub use hub::Hub;
pub use image::Image;
pub use menu::Menu;
pub use root::Root;
pub use text::Text;
