//! Core types and traits for Tumbler widgets.
//!
//! This crate provides the foundation the toggle switch is built on:
//! - Geometric primitives: [`Point`], [`Size`], [`Rect`], [`CornerRadius`]
//! - Color representation: [`Color`] with interpolation and compositing
//! - Animation timelines: [`AnimationController`], [`CurvedAnimation`]
//! - Input: [`Event`], [`LayoutDirection`], [`Platform`]
//! - Painting: the [`Canvas`] trait, [`DrawCommand`] and [`RecordingCanvas`]

mod animation;
mod canvas;
mod color;
mod constraints;
pub mod draw;
mod event;
mod geometry;
mod platform;
pub mod widget;

pub use animation::{AnimationController, AnimationStatus, CubicBezier, Curve, CurvedAnimation};
pub use canvas::RecordingCanvas;
pub use color::{Color, ColorParseError};
pub use constraints::Constraints;
pub use draw::{BoxStyle, DrawCommand, ImageId, Shadow, StrokeStyle};
pub use event::{Event, GestureState, Key, LayoutDirection, MouseButton, MouseCursor};
pub use geometry::{lerp, CornerRadius, Point, Rect, Size};
pub use platform::{HapticFeedback, NoHaptics, Platform, TargetPlatform};
pub use widget::{AccessibleRole, Canvas, FontWeight, LayoutResult, TextStyle, TypeId, Widget};
