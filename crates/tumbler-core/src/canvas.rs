//! Canvas implementations for rendering.

use crate::draw::{BoxStyle, DrawCommand, ImageId, StrokeStyle};
use crate::widget::{Canvas, TextStyle};
use crate::{Color, CornerRadius, Point, Rect};

/// A Canvas implementation that records draw operations as `DrawCommand`s.
///
/// Commands issued inside a clip or opacity scope are wrapped in
/// [`DrawCommand::Clip`] / [`DrawCommand::Opacity`] so the recording keeps
/// the full paint state of every primitive.
///
/// This is useful for:
/// - Testing (verify what was painted)
/// - Serialization (send commands to a GPU or WASM backend)
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    commands: Vec<DrawCommand>,
    clip_stack: Vec<(Rect, CornerRadius)>,
    opacity_stack: Vec<f32>,
}

impl RecordingCanvas {
    /// Create a new empty recording canvas.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the recorded draw commands.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Take ownership of the recorded commands, clearing the canvas.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Get the number of recorded commands.
    #[must_use]
    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    /// Check if no commands have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Clear all recorded commands.
    pub fn clear(&mut self) {
        self.commands.clear();
        self.clip_stack.clear();
        self.opacity_stack.clear();
    }

    /// Get the clip stack depth.
    #[must_use]
    pub fn clip_depth(&self) -> usize {
        self.clip_stack.len()
    }

    /// Get the opacity stack depth.
    #[must_use]
    pub fn opacity_depth(&self) -> usize {
        self.opacity_stack.len()
    }

    fn record(&mut self, command: DrawCommand) {
        let mut command = command;
        for (bounds, radius) in self.clip_stack.iter().rev() {
            command = command.with_clip(*bounds, *radius);
        }
        for alpha in self.opacity_stack.iter().rev() {
            command = command.with_opacity(*alpha);
        }
        self.commands.push(command);
    }
}

impl Canvas for RecordingCanvas {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.record(DrawCommand::filled_rect(rect, color));
    }

    fn fill_rounded_rect(&mut self, rect: Rect, radius: CornerRadius, color: Color) {
        self.record(DrawCommand::rounded_rect(rect, radius, color));
    }

    fn stroke_rounded_rect(&mut self, rect: Rect, radius: CornerRadius, color: Color, width: f32) {
        self.record(DrawCommand::stroked_rect(
            rect,
            radius,
            StrokeStyle { color, width },
        ));
    }

    fn draw_box(&mut self, rect: Rect, radius: CornerRadius, style: &BoxStyle) {
        self.record(DrawCommand::Rect {
            bounds: rect,
            radius,
            style: style.clone(),
        });
    }

    fn draw_text(&mut self, text: &str, position: Point, style: &TextStyle) {
        self.record(DrawCommand::Text {
            content: text.to_string(),
            position,
            style: style.clone(),
        });
    }

    fn draw_image(&mut self, image: ImageId, rect: Rect, radius: CornerRadius) {
        self.record(DrawCommand::Image {
            image,
            bounds: rect,
            radius,
        });
    }

    fn push_clip(&mut self, rect: Rect, radius: CornerRadius) {
        self.clip_stack.push((rect, radius));
    }

    fn pop_clip(&mut self) {
        self.clip_stack.pop();
    }

    fn push_opacity(&mut self, alpha: f32) {
        self.opacity_stack.push(alpha.clamp(0.0, 1.0));
    }

    fn pop_opacity(&mut self) {
        self.opacity_stack.pop();
    }
}
