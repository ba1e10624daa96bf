//! Toggle appearance: colors, geometry, icons, images and labels.
//!
//! A [`ToggleStyle`] is a plain value handed to the painter every frame. It
//! can be built in code, started from [`ToggleStyle::material`] or
//! [`ToggleStyle::cupertino`], or loaded from YAML/JSON:
//!
//! ```
//! use tumbler_widgets::ToggleStyle;
//!
//! let style = ToggleStyle::from_yaml(
//!     r##"
//! active_track_color: "#34c759"
//! geometry:
//!   track_width: 60.0
//!   track_height: 36.0
//! "##,
//! )
//! .unwrap();
//! assert_eq!(style.geometry.track_inner_length(), 24.0);
//! ```

use crate::decoration::{ImageErrorListener, ImageProvider};
use crate::error::{ImageError, StyleError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;
use tumbler_core::{Color, ImageId, Platform, Size, TargetPlatform};

/// Default glyph size when neither the icon nor the theme sets one.
pub const DEFAULT_ICON_SIZE: f32 = 16.0;

/// Geometry constants of the track and thumb.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToggleGeometry {
    /// Track width
    pub track_width: f32,
    /// Track height
    pub track_height: f32,
    /// Thumb radius when on
    pub active_thumb_radius: f32,
    /// Thumb radius when off
    pub inactive_thumb_radius: f32,
    /// Thumb radius while pressed
    pub pressed_thumb_radius: f32,
    /// Intermediate thumb size for [`ThumbMotion::Sequenced`]
    pub transitional_thumb_size: Size,
    /// Horizontal stretch added to the thumb at full press
    pub thumb_extension: f32,
    /// Position at which the thumb is at full size; the thumb contracts
    /// with distance from it
    pub thumb_offset: Option<f32>,
}

impl Default for ToggleGeometry {
    fn default() -> Self {
        Self {
            track_width: 52.0,
            track_height: 32.0,
            active_thumb_radius: 12.0,
            inactive_thumb_radius: 8.0,
            pressed_thumb_radius: 14.0,
            transitional_thumb_size: Size::new(34.0, 22.0),
            thumb_extension: 0.0,
            thumb_offset: None,
        }
    }
}

impl ToggleGeometry {
    /// Travel distance between the two resting thumb centers.
    #[must_use]
    pub fn track_inner_length(&self) -> f32 {
        self.track_width - self.track_height
    }

    /// Largest thumb radius any state can reach.
    #[must_use]
    pub fn max_thumb_radius(&self) -> f32 {
        self.active_thumb_radius
            .max(self.inactive_thumb_radius)
            .max(self.pressed_thumb_radius)
    }

    /// Check every constant is in range.
    pub fn validate(&self) -> Result<(), StyleError> {
        let positive = [
            ("track_width", self.track_width),
            ("track_height", self.track_height),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(StyleError::InvalidGeometry { field, value });
            }
        }
        let non_negative = [
            ("active_thumb_radius", self.active_thumb_radius),
            ("inactive_thumb_radius", self.inactive_thumb_radius),
            ("pressed_thumb_radius", self.pressed_thumb_radius),
            ("thumb_extension", self.thumb_extension),
            (
                "transitional_thumb_size.width",
                self.transitional_thumb_size.width,
            ),
            (
                "transitional_thumb_size.height",
                self.transitional_thumb_size.height,
            ),
        ];
        for (field, value) in non_negative {
            if !(value >= 0.0) {
                return Err(StyleError::InvalidGeometry { field, value });
            }
        }
        if self.track_width <= self.track_height {
            return Err(StyleError::InvalidGeometry {
                field: "track_width",
                value: self.track_width,
            });
        }
        if let Some(offset) = self.thumb_offset {
            if !(0.0..=1.0).contains(&offset) {
                return Err(StyleError::InvalidGeometry {
                    field: "thumb_offset",
                    value: offset,
                });
            }
        }
        Ok(())
    }
}

/// How the thumb size moves between its off and on sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ThumbMotion {
    /// Straight interpolation by position.
    #[default]
    Lerp,
    /// Grow through the transitional size in three eased segments.
    Sequenced,
}

/// Track outline for one state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackOutline {
    /// Outline color
    pub color: Color,
    /// Outline stroke width
    #[serde(default = "default_outline_width")]
    pub width: f32,
}

const fn default_outline_width() -> f32 {
    2.0
}

impl TrackOutline {
    /// Create an outline.
    #[must_use]
    pub const fn new(color: Color, width: f32) -> Self {
        Self { color, width }
    }
}

/// Glyph drawn centered on the thumb.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThumbIcon {
    /// Glyph text, usually a single symbol
    pub glyph: String,
    /// Glyph size; falls back to the icon theme
    #[serde(default)]
    pub size: Option<f32>,
}

impl ThumbIcon {
    /// Create an icon with no explicit size.
    #[must_use]
    pub fn new(glyph: impl Into<String>) -> Self {
        Self {
            glyph: glyph.into(),
            size: None,
        }
    }

    /// Set the glyph size.
    #[must_use]
    pub const fn size(mut self, size: f32) -> Self {
        self.size = Some(size);
        self
    }

    /// Size after applying theme and default fallbacks.
    #[must_use]
    pub fn resolved_size(&self, theme: &IconTheme) -> f32 {
        self.size.or(theme.size).unwrap_or(DEFAULT_ICON_SIZE)
    }
}

/// Ambient icon defaults.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct IconTheme {
    /// Default glyph size
    #[serde(default)]
    pub size: Option<f32>,
}

/// Text labels drawn inside the track when accessible labels are enabled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnOffLabels {
    /// Label shown while on
    pub on_text: String,
    /// Label shown while off
    pub off_text: String,
    /// Color of the on label
    pub on_color: Color,
    /// Color of the off label
    pub off_color: Color,
    /// Glyph size
    #[serde(default = "default_label_size")]
    pub size: f32,
}

const fn default_label_size() -> f32 {
    12.0
}

/// Image painted over the thumb fill.
///
/// The error listener belongs to the image slot, so a failure is only ever
/// reported to the listener of the image that failed.
#[derive(Clone)]
pub struct ThumbImage {
    provider: Rc<dyn ImageProvider>,
    on_error: Option<ImageErrorListener>,
}

impl ThumbImage {
    /// Create an image slot without an error listener.
    #[must_use]
    pub fn new(provider: Rc<dyn ImageProvider>) -> Self {
        Self {
            provider,
            on_error: None,
        }
    }

    /// Report decode failures to `listener`.
    #[must_use]
    pub fn on_error(mut self, listener: impl Fn(&ImageError) + 'static) -> Self {
        self.on_error = Some(Rc::new(listener));
        self
    }

    /// Report decode failures to an existing shared listener.
    #[must_use]
    pub fn with_listener(mut self, listener: ImageErrorListener) -> Self {
        self.on_error = Some(listener);
        self
    }

    /// The provider that decodes this image.
    #[must_use]
    pub fn provider(&self) -> &Rc<dyn ImageProvider> {
        &self.provider
    }

    /// Identity of the source image.
    #[must_use]
    pub fn id(&self) -> ImageId {
        self.provider.id()
    }

    /// The slot's error listener, if any.
    #[must_use]
    pub fn listener(&self) -> Option<&ImageErrorListener> {
        self.on_error.as_ref()
    }

    /// Same source image and same error listener.
    #[must_use]
    pub fn same_identity(&self, other: &Self) -> bool {
        let same_listener = match (&self.on_error, &other.on_error) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        self.id() == other.id() && same_listener
    }
}

impl PartialEq for ThumbImage {
    fn eq(&self, other: &Self) -> bool {
        self.same_identity(other)
    }
}

impl fmt::Debug for ThumbImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThumbImage")
            .field("id", &self.id())
            .field("has_listener", &self.on_error.is_some())
            .finish()
    }
}

/// Complete appearance of a toggle for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToggleStyle {
    /// Track color when on
    pub active_track_color: Color,
    /// Track color when off
    pub inactive_track_color: Color,
    /// Thumb color when on
    pub active_thumb_color: Color,
    /// Thumb color when off
    pub inactive_thumb_color: Color,
    /// Thumb color while pressed on the on side
    pub active_pressed_thumb_color: Color,
    /// Thumb color while pressed on the off side
    pub inactive_pressed_thumb_color: Color,
    /// Track outline when on
    pub active_track_outline: Option<TrackOutline>,
    /// Track outline when off
    pub inactive_track_outline: Option<TrackOutline>,
    /// Icon color when on
    pub active_icon_color: Color,
    /// Icon color when off
    pub inactive_icon_color: Color,
    /// Icon shown while on
    pub active_thumb_icon: Option<ThumbIcon>,
    /// Icon shown while off
    pub inactive_thumb_icon: Option<ThumbIcon>,
    /// Image shown while on
    #[serde(skip)]
    pub active_thumb_image: Option<ThumbImage>,
    /// Image shown while off
    #[serde(skip)]
    pub inactive_thumb_image: Option<ThumbImage>,
    /// On/off track labels
    pub labels: Option<OnOffLabels>,
    /// Draw the track labels
    pub accessible_labels: bool,
    /// Focus ring color
    pub focus_color: Color,
    /// Color the thumb is composited over
    pub surface_color: Color,
    /// Icon fallbacks
    pub icon_theme: IconTheme,
    /// Track and thumb geometry
    pub geometry: ToggleGeometry,
    /// Thumb size animation
    pub thumb_motion: ThumbMotion,
    /// Host platform
    pub platform: Platform,
}

impl Default for ToggleStyle {
    fn default() -> Self {
        Self::material()
    }
}

impl ToggleStyle {
    /// Material 3 switch.
    #[must_use]
    pub fn material() -> Self {
        let outline = Color::from_argb32(0xFF79_747E);
        Self {
            active_track_color: Color::from_argb32(0xFF67_50A4),
            inactive_track_color: Color::from_argb32(0xFFE6_E0E9),
            active_thumb_color: Color::WHITE,
            inactive_thumb_color: outline,
            active_pressed_thumb_color: Color::from_argb32(0xFFEA_DDFF),
            inactive_pressed_thumb_color: Color::from_argb32(0xFF49_454F),
            active_track_outline: Some(TrackOutline::new(Color::TRANSPARENT, 2.0)),
            inactive_track_outline: Some(TrackOutline::new(outline, 2.0)),
            active_icon_color: Color::from_argb32(0xFF21_005D),
            inactive_icon_color: Color::from_argb32(0xFFE6_E0E9),
            active_thumb_icon: None,
            inactive_thumb_icon: None,
            active_thumb_image: None,
            inactive_thumb_image: None,
            labels: None,
            accessible_labels: false,
            focus_color: Color::from_argb32(0x1F67_50A4),
            surface_color: Color::from_argb32(0xFFFE_F7FF),
            icon_theme: IconTheme::default(),
            geometry: ToggleGeometry::default(),
            thumb_motion: ThumbMotion::Sequenced,
            platform: Platform::native(TargetPlatform::Android),
        }
    }

    /// iOS-style switch with a stretching white thumb.
    #[must_use]
    pub fn cupertino() -> Self {
        Self {
            active_track_color: Color::from_argb32(0xFF34_C759),
            inactive_track_color: Color::from_argb32(0x2878_7880),
            active_thumb_color: Color::WHITE,
            inactive_thumb_color: Color::WHITE,
            active_pressed_thumb_color: Color::WHITE,
            inactive_pressed_thumb_color: Color::WHITE,
            active_track_outline: None,
            inactive_track_outline: None,
            active_icon_color: Color::BLACK,
            inactive_icon_color: Color::BLACK,
            active_thumb_icon: None,
            inactive_thumb_icon: None,
            active_thumb_image: None,
            inactive_thumb_image: None,
            labels: Some(OnOffLabels {
                on_text: "I".to_string(),
                off_text: "O".to_string(),
                on_color: Color::WHITE,
                off_color: Color::from_argb32(0xFFB3_B3B3),
                size: default_label_size(),
            }),
            accessible_labels: false,
            focus_color: Color::from_argb32(0xCC00_7AFF),
            surface_color: Color::WHITE,
            icon_theme: IconTheme::default(),
            geometry: ToggleGeometry {
                track_width: 51.0,
                track_height: 31.0,
                active_thumb_radius: 14.0,
                inactive_thumb_radius: 14.0,
                pressed_thumb_radius: 14.0,
                transitional_thumb_size: Size::new(28.0, 28.0),
                thumb_extension: 7.0,
                thumb_offset: None,
            },
            thumb_motion: ThumbMotion::Lerp,
            platform: Platform::native(TargetPlatform::Ios),
        }
    }

    /// Load a style from YAML, filling unspecified fields from the Material
    /// preset.
    pub fn from_yaml(yaml: &str) -> Result<Self, StyleError> {
        let style: Self = serde_yaml_ng::from_str(yaml)?;
        style.validate()?;
        Ok(style)
    }

    /// Load a style from JSON, filling unspecified fields from the Material
    /// preset.
    pub fn from_json(json: &str) -> Result<Self, StyleError> {
        let style: Self = serde_json::from_str(json)?;
        style.validate()?;
        Ok(style)
    }

    /// Serialize to YAML. Thumb images are not serialized.
    pub fn to_yaml(&self) -> Result<String, StyleError> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Check geometry and label constants are in range.
    pub fn validate(&self) -> Result<(), StyleError> {
        self.geometry.validate()?;
        if let Some(labels) = &self.labels {
            if !(labels.size > 0.0) {
                return Err(StyleError::InvalidGeometry {
                    field: "labels.size",
                    value: labels.size,
                });
            }
        }
        for icon in [&self.active_thumb_icon, &self.inactive_thumb_icon]
            .into_iter()
            .flatten()
        {
            if let Some(size) = icon.size.filter(|s| !(*s > 0.0)) {
                return Err(StyleError::InvalidGeometry {
                    field: "thumb_icon.size",
                    value: size,
                });
            }
        }
        Ok(())
    }

    /// Set the on/off track labels and turn them on.
    #[must_use]
    pub fn with_labels(mut self, labels: OnOffLabels) -> Self {
        self.labels = Some(labels);
        self.accessible_labels = true;
        self
    }

    /// Set the thumb icons.
    #[must_use]
    pub fn with_icons(mut self, active: Option<ThumbIcon>, inactive: Option<ThumbIcon>) -> Self {
        self.active_thumb_icon = active;
        self.inactive_thumb_icon = inactive;
        self
    }

    /// Set the thumb images.
    #[must_use]
    pub fn with_images(
        mut self,
        active: Option<ThumbImage>,
        inactive: Option<ThumbImage>,
    ) -> Self {
        self.active_thumb_image = active;
        self.inactive_thumb_image = inactive;
        self
    }

    /// Set the host platform.
    #[must_use]
    pub const fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Image slot for the thumb: the active image while enabled and at
    /// least half on, the inactive image otherwise.
    #[must_use]
    pub fn thumb_image(&self, enabled: bool, position: f32) -> Option<&ThumbImage> {
        if enabled && position >= 0.5 {
            self.active_thumb_image.as_ref()
        } else {
            self.inactive_thumb_image.as_ref()
        }
    }

    /// Icon for the thumb: the active icon from half on.
    #[must_use]
    pub fn thumb_icon(&self, position: f32) -> Option<&ThumbIcon> {
        if position >= 0.5 {
            self.active_thumb_icon.as_ref()
        } else {
            self.inactive_thumb_icon.as_ref()
        }
    }
}
