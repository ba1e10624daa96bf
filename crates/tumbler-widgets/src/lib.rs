//! Animated on/off toggle switch for Tumbler.
//!
//! The switch is split the way the widget tree consumes it:
//!
//! - [`ToggleStyle`] resolves every color, outline, icon and geometry value
//!   for the current frame, from code or YAML.
//! - [`ToggleVisualController`] turns gestures into animated positions and
//!   change requests.
//! - [`TogglePainter`] draws one frame onto any [`tumbler_core::Canvas`].
//! - [`Toggle`] wires the three into a [`tumbler_core::Widget`].

pub mod decoration;
pub mod error;
pub mod toggle;
pub mod toggle_controller;
pub mod toggle_painter;
pub mod toggle_style;

#[cfg(test)]
mod testing;

pub use decoration::{
    DecodeCallback, DecodeHandle, DecodedImage, ImageErrorListener, ImageProvider, ImageState,
    ListenerId, RepaintGuard, RepaintNotifier, StaticImageProvider, ThumbDecoration,
};
pub use error::{ImageError, StyleError};
pub use toggle::{Toggle, ToggleChanged};
pub use toggle_controller::{ChangeCallback, ToggleState, ToggleVisualController};
pub use toggle_painter::{GeometrySnapshot, ToggleFrame, TogglePainter};
pub use toggle_style::{
    IconTheme, OnOffLabels, ThumbIcon, ThumbImage, ThumbMotion, ToggleGeometry, ToggleStyle,
    TrackOutline,
};
