//! Per-frame geometry and painting of a toggle.
//!
//! [`TogglePainter::geometry`] is a pure function of a [`ToggleFrame`]; it
//! derives every size, position and color for the frame into a
//! [`GeometrySnapshot`]. [`TogglePainter::paint`] draws that snapshot and
//! keeps the thumb decoration cached between frames.

use crate::decoration::{ListenerId, RepaintNotifier, ThumbDecoration};
use crate::toggle_controller::ToggleState;
use crate::toggle_style::{ThumbMotion, ToggleGeometry, ToggleStyle, TrackOutline};
use tumbler_core::{
    lerp, AnimationStatus, Canvas, Color, CornerRadius, CubicBezier, Curve, FontWeight,
    LayoutDirection, Point, Rect, Size, TextStyle,
};

/// Growth of the focus ring beyond the track.
pub const FOCUS_RING_INFLATE: f32 = 1.75;
/// Stroke width of the focus ring.
pub const FOCUS_RING_WIDTH: f32 = 3.5;
/// Inset of the track outline.
pub const TRACK_OUTLINE_INSET: f32 = 1.0;
/// Distance of the on label from the track's leading end.
pub const ON_LABEL_PADDING: f32 = 11.0;
/// Distance of the off label from the track's trailing end.
pub const OFF_LABEL_PADDING: f32 = 8.0;

const SEQUENCE_GROW: CubicBezier = CubicBezier::new(0.31, 0.0, 0.56, 1.0);
const SEQUENCE_SETTLE: CubicBezier = CubicBezier::new(0.2, 0.0, 0.0, 1.0);
/// Segment weights of the sequenced thumb motion, playing forward.
const SEQUENCE_WEIGHTS: [f32; 3] = [11.0, 72.0, 17.0];

/// Everything the painter needs for one frame.
#[derive(Debug, Clone, Copy)]
pub struct ToggleFrame<'a> {
    /// Animated values
    pub state: ToggleState,
    /// Appearance
    pub style: &'a ToggleStyle,
    /// Area the track is centered in
    pub bounds: Rect,
    /// Ambient reading direction
    pub direction: LayoutDirection,
    /// Draw the focus ring
    pub focused: bool,
    /// Whether the toggle accepts input
    pub enabled: bool,
}

impl<'a> ToggleFrame<'a> {
    /// An enabled, unfocused, left-to-right frame.
    #[must_use]
    pub const fn new(state: ToggleState, style: &'a ToggleStyle, bounds: Rect) -> Self {
        Self {
            state,
            style,
            bounds,
            direction: LayoutDirection::Ltr,
            focused: false,
            enabled: true,
        }
    }

    /// Set the reading direction.
    #[must_use]
    pub const fn direction(mut self, direction: LayoutDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Set focus.
    #[must_use]
    pub const fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Set whether the toggle is enabled.
    #[must_use]
    pub const fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// Derived layout and colors of one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometrySnapshot {
    /// Position mirrored for the reading direction
    pub visual_position: f32,
    /// Track bounds
    pub track_rect: Rect,
    /// Thumb bounds
    pub thumb_rect: Rect,
    /// Thumb radius of the side the toggle is on
    pub thumb_radius: f32,
    /// Track fill
    pub track_color: Color,
    /// Track outline, if configured
    pub track_outline: Option<TrackOutline>,
    /// Thumb fill, composited over the surface color
    pub thumb_color: Color,
    /// Icon glyph color
    pub icon_color: Color,
    /// Opacity of the on label
    pub on_label_opacity: f32,
    /// Opacity of the off label
    pub off_label_opacity: f32,
}

impl GeometrySnapshot {
    /// Center of the thumb.
    #[must_use]
    pub fn thumb_center(&self) -> Point {
        self.thumb_rect.center()
    }

    /// Corner radius of the track.
    #[must_use]
    pub fn track_radius(&self) -> CornerRadius {
        CornerRadius::uniform(self.track_rect.height / 2.0)
    }

    /// Corner radius of the thumb.
    #[must_use]
    pub fn thumb_corner_radius(&self) -> CornerRadius {
        CornerRadius::uniform(self.thumb_rect.width.min(self.thumb_rect.height) / 2.0)
    }
}

/// Paints toggles and caches the thumb decoration between frames.
#[derive(Debug, Default)]
pub struct TogglePainter {
    decoration: Option<ThumbDecoration>,
    notifier: RepaintNotifier,
    generation: u64,
    disposed: bool,
}

impl TogglePainter {
    /// Create a painter with an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener called when an image finishes decoding outside a
    /// paint call.
    pub fn add_listener(&self, listener: impl Fn() + 'static) -> ListenerId {
        self.notifier.add_listener(listener)
    }

    /// Unregister a repaint listener.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.notifier.remove_listener(id)
    }

    /// The cached decoration, if one has been built.
    #[must_use]
    pub fn decoration(&self) -> Option<&ThumbDecoration> {
        self.decoration.as_ref()
    }

    /// Number of decorations built so far.
    #[must_use]
    pub const fn decoration_generation(&self) -> u64 {
        self.generation
    }

    /// Whether [`dispose`](Self::dispose) has run.
    #[must_use]
    pub const fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Compute the frame's geometry.
    #[must_use]
    pub fn geometry(frame: &ToggleFrame<'_>) -> GeometrySnapshot {
        let state = &frame.state;
        let style = frame.style;
        let g = &style.geometry;
        let position = state.position;
        let reaction = state.reaction;

        let visual_position = frame.direction.visual(position);

        let (inactive_radius, active_radius) = pressed_radii(g, position, reaction);
        let thumb_radius = if position >= 0.5 {
            active_radius
        } else {
            inactive_radius
        };

        let extension = reaction * g.thumb_extension;
        let inactive_size = stretched(inactive_radius, extension);
        let active_size = stretched(active_radius, extension);

        let mut thumb_size = match style.thumb_motion {
            ThumbMotion::Lerp => inactive_size.lerp(&active_size, position),
            ThumbMotion::Sequenced if state.reaction_status.is_completed() => {
                stretched(g.pressed_thumb_radius, extension)
            }
            ThumbMotion::Sequenced => {
                let forward = state.position_status.is_dismissed()
                    || state.position_status == AnimationStatus::Forward;
                sequenced_size(
                    inactive_size,
                    g.transitional_thumb_size,
                    active_size,
                    position,
                    forward,
                )
            }
        };
        if let Some(offset) = g.thumb_offset {
            thumb_size = thumb_size.shrink((position - offset).abs().mul_add(-2.0, 1.0));
        }

        let track_color = style
            .inactive_track_color
            .lerp(&style.active_track_color, position);
        let track_outline = blend_outline(
            style.inactive_track_outline,
            style.active_track_outline,
            state.color_position,
        );
        let thumb_color = Color::alpha_blend(&thumb_fill(style, state), &style.surface_color);
        let icon_color = style
            .inactive_icon_color
            .lerp(&style.active_icon_color, position);

        let bounds = frame.bounds;
        let track_rect = Rect::new(
            bounds.x + (bounds.width - g.track_width) / 2.0,
            bounds.y + (bounds.height - g.track_height) / 2.0,
            g.track_width,
            g.track_height,
        );
        // The press stretch grows toward the middle: travel shrinks by it and
        // the thumb's outer edge stays at its resting place.
        let travel = (g.track_inner_length() - extension).max(0.0);
        let thumb_center = Point::new(
            visual_position.mul_add(
                travel,
                track_rect.x + g.track_height / 2.0 + extension / 2.0,
            ),
            track_rect.center().y,
        );
        let thumb_rect = Rect::new(
            thumb_center.x - thumb_size.width / 2.0,
            thumb_center.y - thumb_size.height / 2.0,
            thumb_size.width,
            thumb_size.height,
        );

        GeometrySnapshot {
            visual_position,
            track_rect,
            thumb_rect,
            thumb_radius,
            track_color,
            track_outline,
            thumb_color,
            icon_color,
            on_label_opacity: (1.0 - reaction) * position,
            off_label_opacity: (1.0 - reaction) * (1.0 - position),
        }
    }

    /// Paint one frame. Returns the geometry it painted.
    ///
    /// Painting a disposed painter draws nothing.
    pub fn paint(&mut self, canvas: &mut dyn Canvas, frame: &ToggleFrame<'_>) -> GeometrySnapshot {
        let geo = Self::geometry(frame);
        if self.disposed {
            tracing::debug!("paint on disposed toggle painter skipped");
            return geo;
        }
        let _painting = self.notifier.begin_paint();

        let track_radius = geo.track_radius();
        canvas.fill_rounded_rect(geo.track_rect, track_radius, geo.track_color);
        if let Some(outline) = geo.track_outline {
            canvas.stroke_rounded_rect(
                geo.track_rect.inset(TRACK_OUTLINE_INSET),
                track_radius,
                outline.color,
                outline.width,
            );
        }
        if frame.focused {
            canvas.stroke_rounded_rect(
                geo.track_rect.inflate(FOCUS_RING_INFLATE),
                track_radius.grow(FOCUS_RING_INFLATE),
                frame.style.focus_color,
                FOCUS_RING_WIDTH,
            );
        }

        paint_labels(canvas, frame, &geo);
        self.paint_thumb(canvas, frame, &geo);
        paint_icon(canvas, frame, &geo);
        geo
    }

    /// Release the cached decoration. Runs once; `Drop` calls it too.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        if let Some(mut decoration) = self.decoration.take() {
            decoration.dispose();
        }
        tracing::debug!(decorations = self.generation, "toggle painter disposed");
    }

    fn paint_thumb(&mut self, canvas: &mut dyn Canvas, frame: &ToggleFrame<'_>, geo: &GeometrySnapshot) {
        let image = frame
            .style
            .thumb_image(frame.enabled, frame.state.position);
        let cached = self
            .decoration
            .as_ref()
            .is_some_and(|d| d.matches(geo.thumb_color, image));
        if !cached {
            if let Some(mut previous) = self.decoration.take() {
                previous.dispose();
            }
            self.generation += 1;
            tracing::debug!(
                generation = self.generation,
                color = %geo.thumb_color.to_hex_with_alpha(),
                image = image.map(|i| i.id().0),
                "thumb decoration rebuilt"
            );
            self.decoration = Some(ThumbDecoration::new(geo.thumb_color, image, &self.notifier));
        }
        if let Some(decoration) = &self.decoration {
            decoration.paint(canvas, geo.thumb_rect, geo.thumb_corner_radius());
        }
    }
}

impl Drop for TogglePainter {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Thumb radii of the off and on sides for the current press.
///
/// At the ends of travel only the side the thumb is on grows with the
/// press; the other stays at rest.
fn pressed_radii(g: &ToggleGeometry, position: f32, reaction: f32) -> (f32, f32) {
    let inactive = lerp(g.inactive_thumb_radius, g.pressed_thumb_radius, reaction);
    let active = lerp(g.active_thumb_radius, g.pressed_thumb_radius, reaction);
    if position == 0.0 {
        (inactive, g.active_thumb_radius)
    } else if position == 1.0 {
        (g.inactive_thumb_radius, active)
    } else {
        (inactive, active)
    }
}

fn stretched(radius: f32, extension: f32) -> Size {
    Size::new(radius.mul_add(2.0, extension), radius * 2.0)
}

fn eased(curve: CubicBezier, t: f32) -> f32 {
    Curve::Cubic(curve).transform(f64::from(t)) as f32
}

/// Thumb size through the three-segment grow sequence.
///
/// Forward: grow to the transitional size, settle into the active size, hold.
/// Reverse plays the mirror image with flipped curves.
fn sequenced_size(inactive: Size, transitional: Size, active: Size, t: f32, forward: bool) -> Size {
    let total: f32 = SEQUENCE_WEIGHTS.iter().sum();
    let t = t.clamp(0.0, 1.0);
    if forward {
        let first = SEQUENCE_WEIGHTS[0] / total;
        let second = first + SEQUENCE_WEIGHTS[1] / total;
        if t < first {
            inactive.lerp(&transitional, eased(SEQUENCE_GROW, t / first))
        } else if t < second {
            let local = (t - first) / (second - first);
            transitional.lerp(&active, eased(SEQUENCE_SETTLE, local))
        } else {
            active
        }
    } else {
        let first = SEQUENCE_WEIGHTS[2] / total;
        let second = first + SEQUENCE_WEIGHTS[1] / total;
        if t < first {
            inactive
        } else if t < second {
            let local = (t - first) / (second - first);
            inactive.lerp(&transitional, eased(SEQUENCE_SETTLE.flipped(), local))
        } else {
            let local = (t - second) / (1.0 - second);
            transitional.lerp(&active, eased(SEQUENCE_GROW.flipped(), local))
        }
    }
}

/// Outline for the frame: blended when both ends exist, otherwise shown only
/// on the configured side.
fn blend_outline(
    inactive: Option<TrackOutline>,
    active: Option<TrackOutline>,
    t: f32,
) -> Option<TrackOutline> {
    match (inactive, active) {
        (Some(off), Some(on)) => Some(TrackOutline::new(
            off.color.lerp(&on.color, t),
            lerp(off.width, on.width, t),
        )),
        (Some(off), None) if t < 0.5 => Some(off),
        (None, Some(on)) if t >= 0.5 => Some(on),
        _ => None,
    }
}

/// Uncomposited thumb fill.
///
/// While pressed both ends use the pressed colors; while easing on the start
/// is pressed; while easing off the end is pressed.
fn thumb_fill(style: &ToggleStyle, state: &ToggleState) -> Color {
    let (from, to) = if !state.reaction_status.is_dismissed() {
        (
            style.inactive_pressed_thumb_color,
            style.active_pressed_thumb_color,
        )
    } else {
        match state.position_status {
            AnimationStatus::Forward => {
                (style.inactive_pressed_thumb_color, style.active_thumb_color)
            }
            AnimationStatus::Reverse => {
                (style.inactive_thumb_color, style.active_pressed_thumb_color)
            }
            AnimationStatus::Dismissed | AnimationStatus::Completed => {
                (style.inactive_thumb_color, style.active_thumb_color)
            }
        }
    };
    from.lerp(&to, state.color_position)
}

fn paint_labels(canvas: &mut dyn Canvas, frame: &ToggleFrame<'_>, geo: &GeometrySnapshot) {
    let style = frame.style;
    let Some(labels) = style.labels.as_ref().filter(|_| style.accessible_labels) else {
        return;
    };
    let track = geo.track_rect;
    let top = track.center().y - labels.size / 2.0;
    let (on_x, off_x) = if frame.direction.is_rtl() {
        (
            track.right() - ON_LABEL_PADDING - labels.size,
            track.x + OFF_LABEL_PADDING,
        )
    } else {
        (
            track.x + ON_LABEL_PADDING,
            track.right() - OFF_LABEL_PADDING - labels.size,
        )
    };

    canvas.push_clip(track, geo.track_radius());
    draw_label(
        canvas,
        &labels.on_text,
        Point::new(on_x, top),
        labels.on_color,
        labels.size,
        geo.on_label_opacity,
    );
    draw_label(
        canvas,
        &labels.off_text,
        Point::new(off_x, top),
        labels.off_color,
        labels.size,
        geo.off_label_opacity,
    );
    canvas.pop_clip();
}

fn draw_label(
    canvas: &mut dyn Canvas,
    text: &str,
    origin: Point,
    color: Color,
    size: f32,
    opacity: f32,
) {
    if opacity <= 0.0 {
        return;
    }
    canvas.push_opacity(opacity);
    canvas.draw_text(
        text,
        origin,
        &TextStyle {
            size,
            color,
            weight: FontWeight::Medium,
            family: None,
        },
    );
    canvas.pop_opacity();
}

fn paint_icon(canvas: &mut dyn Canvas, frame: &ToggleFrame<'_>, geo: &GeometrySnapshot) {
    let style = frame.style;
    let Some(icon) = style.thumb_icon(frame.state.position) else {
        return;
    };
    let size = icon.resolved_size(&style.icon_theme);
    let center = geo.thumb_center();
    canvas.draw_text(
        &icon.glyph,
        Point::new(center.x - size / 2.0, center.y - size / 2.0),
        &TextStyle {
            size,
            color: geo.icon_color,
            ..TextStyle::default()
        },
    );
}
