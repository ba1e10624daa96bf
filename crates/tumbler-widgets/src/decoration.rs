//! Cached thumb decoration and its image-decode subscription.
//!
//! The painter keeps one [`ThumbDecoration`] alive between frames. It is
//! rebuilt only when the thumb color, the image, or the image's error
//! listener changes; a rebuilt decoration cancels the decode subscription of
//! the one it replaces.
//!
//! Decode results arrive through a callback handed to the host's
//! [`ImageProvider`]. A completion that lands while a paint call is running
//! (a provider answering synchronously from its cache) updates the
//! decoration without notifying repaint listeners; the paint in progress
//! already reflects it.

use crate::error::ImageError;
use crate::toggle_style::ThumbImage;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use tumbler_core::{BoxStyle, Canvas, Color, CornerRadius, ImageId, Rect, Shadow, Size, StrokeStyle};

/// Listener told about a failed decode for one image slot.
pub type ImageErrorListener = Rc<dyn Fn(&ImageError)>;

/// Completion callback handed to an [`ImageProvider`].
pub type DecodeCallback = Box<dyn FnOnce(Result<DecodedImage, ImageError>)>;

/// Key shadow under the thumb.
pub const THUMB_KEY_SHADOW: Shadow = Shadow {
    color: Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.15,
    },
    offset_x: 0.0,
    offset_y: 3.0,
    blur: 8.0,
};

/// Ambient shadow under the thumb.
pub const THUMB_AMBIENT_SHADOW: Shadow = Shadow {
    color: Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.06,
    },
    offset_x: 0.0,
    offset_y: 3.0,
    blur: 1.0,
};

/// Hairline drawn around the thumb.
pub const THUMB_HAIRLINE: StrokeStyle = StrokeStyle {
    color: Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.04,
    },
    width: 1.0,
};

/// A decoded image held by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecodedImage {
    /// Handle into the host's image cache
    pub id: ImageId,
    /// Intrinsic size in pixels
    pub size: Size,
}

/// Source of thumb images, implemented by the host.
pub trait ImageProvider {
    /// Identity of the source image; equal ids mean the same image.
    fn id(&self) -> ImageId;

    /// Start decoding. `on_complete` is called at most once, possibly before
    /// `resolve` returns. Cancelling the returned handle ends the
    /// subscription.
    fn resolve(&self, on_complete: DecodeCallback) -> DecodeHandle;
}

/// Cancelable subscription to an in-flight decode.
///
/// Cancelling is idempotent and dropping the handle cancels it.
pub struct DecodeHandle {
    cancelled: Rc<Cell<bool>>,
    on_cancel: Option<Box<dyn FnOnce()>>,
}

impl DecodeHandle {
    /// A handle that runs `on_cancel` the first time it is cancelled.
    #[must_use]
    pub fn new(on_cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancelled: Rc::new(Cell::new(false)),
            on_cancel: Some(Box::new(on_cancel)),
        }
    }

    /// A handle with nothing to cancel.
    #[must_use]
    pub fn detached() -> Self {
        Self {
            cancelled: Rc::new(Cell::new(false)),
            on_cancel: None,
        }
    }

    /// Cancel the subscription.
    pub fn cancel(&mut self) {
        if self.cancelled.replace(true) {
            return;
        }
        if let Some(on_cancel) = self.on_cancel.take() {
            on_cancel();
        }
    }

    /// Whether the handle has been cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

impl Drop for DecodeHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for DecodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodeHandle")
            .field("cancelled", &self.cancelled.get())
            .finish_non_exhaustive()
    }
}

/// Provider that answers from memory, synchronously.
///
/// Useful for images the host already decoded, and for headless rendering.
#[derive(Debug, Clone)]
pub struct StaticImageProvider {
    id: ImageId,
    result: Result<DecodedImage, ImageError>,
}

impl StaticImageProvider {
    /// Provider that always yields a decoded image of `size`.
    #[must_use]
    pub const fn ready(id: u64, size: Size) -> Self {
        Self {
            id: ImageId(id),
            result: Ok(DecodedImage {
                id: ImageId(id),
                size,
            }),
        }
    }

    /// Provider that always fails with `error`.
    #[must_use]
    pub const fn failing(id: u64, error: ImageError) -> Self {
        Self {
            id: ImageId(id),
            result: Err(error),
        }
    }
}

impl ImageProvider for StaticImageProvider {
    fn id(&self) -> ImageId {
        self.id
    }

    fn resolve(&self, on_complete: DecodeCallback) -> DecodeHandle {
        on_complete(self.result.clone());
        DecodeHandle::detached()
    }
}

/// Identifies a registered repaint listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(ListenerId, Rc<dyn Fn()>)>,
}

/// Repaint listeners plus the flag marking a paint in progress.
#[derive(Clone, Default)]
pub struct RepaintNotifier {
    painting: Rc<Cell<bool>>,
    listeners: Rc<RefCell<Listeners>>,
}

impl RepaintNotifier {
    /// Create a notifier with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener called when a repaint is needed.
    pub fn add_listener(&self, listener: impl Fn() + 'static) -> ListenerId {
        let mut listeners = self.listeners.borrow_mut();
        let id = ListenerId(listeners.next_id);
        listeners.next_id += 1;
        listeners.entries.push((id, Rc::new(listener)));
        id
    }

    /// Unregister a listener. Returns whether it was registered.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.entries.len();
        listeners.entries.retain(|(entry, _)| *entry != id);
        listeners.entries.len() != before
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().entries.len()
    }

    /// Whether a paint call is running.
    #[must_use]
    pub fn is_painting(&self) -> bool {
        self.painting.get()
    }

    /// Mark a paint call as running until the guard is dropped.
    #[must_use]
    pub fn begin_paint(&self) -> RepaintGuard {
        RepaintGuard {
            painting: Rc::clone(&self.painting),
            was_painting: self.painting.replace(true),
        }
    }

    /// Call every listener, unless a paint call is running.
    ///
    /// Returns whether listeners were called.
    pub fn notify(&self) -> bool {
        if self.painting.get() {
            return false;
        }
        // Snapshot first so a listener may add or remove listeners.
        let listeners: Vec<Rc<dyn Fn()>> = self
            .listeners
            .borrow()
            .entries
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener();
        }
        true
    }
}

impl fmt::Debug for RepaintNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepaintNotifier")
            .field("painting", &self.painting.get())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Scope of a running paint call; see [`RepaintNotifier::begin_paint`].
#[derive(Debug)]
pub struct RepaintGuard {
    painting: Rc<Cell<bool>>,
    was_painting: bool,
}

impl Drop for RepaintGuard {
    fn drop(&mut self) {
        self.painting.set(self.was_painting);
    }
}

/// Progress of the decoration's image.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageState {
    /// No image configured.
    None,
    /// Waiting for the provider.
    Pending,
    /// Decoded and ready to draw.
    Ready(DecodedImage),
    /// Decode failed; the fill color is drawn alone.
    Failed(ImageError),
    /// The decoration was disposed before the decode finished.
    Disposed,
}

/// Thumb fill color plus optional image, with its decode subscription.
pub struct ThumbDecoration {
    color: Color,
    image: Option<ThumbImage>,
    state: Rc<RefCell<ImageState>>,
    handle: Option<DecodeHandle>,
    disposed: bool,
}

impl ThumbDecoration {
    /// Build a decoration, starting the image decode if there is an image.
    #[must_use]
    pub fn new(color: Color, image: Option<&ThumbImage>, notifier: &RepaintNotifier) -> Self {
        let initial = if image.is_some() {
            ImageState::Pending
        } else {
            ImageState::None
        };
        let state = Rc::new(RefCell::new(initial));
        let handle = image.map(|image| {
            tracing::debug!(image = image.id().0, "resolving thumb image");
            let on_complete = completion(
                Rc::downgrade(&state),
                image.listener().cloned(),
                notifier.clone(),
            );
            image.provider().resolve(on_complete)
        });
        Self {
            color,
            image: image.cloned(),
            state,
            handle,
            disposed: false,
        }
    }

    /// Whether this decoration was built for the same cache key.
    #[must_use]
    pub fn matches(&self, color: Color, image: Option<&ThumbImage>) -> bool {
        let same_image = match (&self.image, image) {
            (Some(a), Some(b)) => a.same_identity(b),
            (None, None) => true,
            _ => false,
        };
        self.color == color && same_image
    }

    /// Fill color.
    #[must_use]
    pub const fn color(&self) -> Color {
        self.color
    }

    /// Current image progress.
    #[must_use]
    pub fn image_state(&self) -> ImageState {
        self.state.borrow().clone()
    }

    /// The decoded image, once ready.
    #[must_use]
    pub fn decoded(&self) -> Option<DecodedImage> {
        match *self.state.borrow() {
            ImageState::Ready(image) => Some(image),
            _ => None,
        }
    }

    /// Whether [`dispose`](Self::dispose) has run.
    #[must_use]
    pub const fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Paint shadows, fill, hairline and (when decoded) the image.
    pub fn paint(&self, canvas: &mut dyn Canvas, rect: Rect, radius: CornerRadius) {
        let style = BoxStyle {
            fill: Some(self.color),
            stroke: Some(THUMB_HAIRLINE),
            shadows: vec![THUMB_KEY_SHADOW, THUMB_AMBIENT_SHADOW],
        };
        canvas.draw_box(rect, radius, &style);
        if let Some(image) = self.decoded() {
            canvas.draw_image(image.id, rect, radius);
        }
    }

    /// Release the decode subscription. Runs once; later calls do nothing.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        if let Some(mut handle) = self.handle.take() {
            handle.cancel();
        }
        let mut state = self.state.borrow_mut();
        if matches!(*state, ImageState::Pending) {
            *state = ImageState::Disposed;
        }
        tracing::debug!(color = %self.color.to_hex_with_alpha(), "thumb decoration disposed");
    }
}

impl Drop for ThumbDecoration {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for ThumbDecoration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThumbDecoration")
            .field("color", &self.color)
            .field("image", &self.image)
            .field("state", &*self.state.borrow())
            .field("disposed", &self.disposed)
            .finish()
    }
}

fn completion(
    state: Weak<RefCell<ImageState>>,
    listener: Option<ImageErrorListener>,
    notifier: RepaintNotifier,
) -> DecodeCallback {
    Box::new(move |result| {
        let Some(state) = state.upgrade() else {
            return;
        };
        if !matches!(*state.borrow(), ImageState::Pending) {
            return;
        }
        match result {
            Ok(image) => {
                *state.borrow_mut() = ImageState::Ready(image);
                notifier.notify();
            }
            Err(error) => {
                tracing::warn!(%error, "thumb image decode failed");
                *state.borrow_mut() = ImageState::Failed(error.clone());
                if error != ImageError::Cancelled {
                    if let Some(listener) = listener {
                        listener(&error);
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;
    use tumbler_core::{DrawCommand, RecordingCanvas};

    /// Provider that holds its callback until the test completes it.
    struct DeferredProvider {
        id: u64,
        pending: RefCell<Option<DecodeCallback>>,
        cancels: Rc<Cell<usize>>,
    }

    impl DeferredProvider {
        fn new(id: u64) -> Rc<Self> {
            Rc::new(Self {
                id,
                pending: RefCell::new(None),
                cancels: Rc::new(Cell::new(0)),
            })
        }

        fn complete(&self, result: Result<DecodedImage, ImageError>) {
            let callback = self.pending.borrow_mut().take();
            if let Some(callback) = callback {
                callback(result);
            }
        }
    }

    impl ImageProvider for DeferredProvider {
        fn id(&self) -> ImageId {
            ImageId(self.id)
        }

        fn resolve(&self, on_complete: DecodeCallback) -> DecodeHandle {
            *self.pending.borrow_mut() = Some(on_complete);
            let cancels = Rc::clone(&self.cancels);
            DecodeHandle::new(move || cancels.set(cancels.get() + 1))
        }
    }

    fn decoded(id: u64) -> DecodedImage {
        DecodedImage {
            id: ImageId(id),
            size: Size::new(16.0, 16.0),
        }
    }

    // ===== DecodeHandle Tests =====

    #[test]
    fn test_decode_handle_cancel_idempotent() {
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        let mut handle = DecodeHandle::new(move || c.set(c.get() + 1));
        handle.cancel();
        handle.cancel();
        assert!(handle.is_cancelled());
        drop(handle);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_decode_handle_drop_cancels() {
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        drop(DecodeHandle::new(move || c.set(c.get() + 1)));
        assert_eq!(count.get(), 1);
    }

    // ===== RepaintNotifier Tests =====

    #[test]
    fn test_notifier_calls_listeners() {
        let notifier = RepaintNotifier::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let id = notifier.add_listener(move || h.set(h.get() + 1));
        assert!(notifier.notify());
        assert_eq!(hits.get(), 1);
        assert!(notifier.remove_listener(id));
        assert!(!notifier.remove_listener(id));
        notifier.notify();
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_notifier_suppressed_while_painting() {
        let notifier = RepaintNotifier::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        notifier.add_listener(move || h.set(h.get() + 1));
        {
            let _guard = notifier.begin_paint();
            assert!(notifier.is_painting());
            assert!(!notifier.notify());
        }
        assert!(!notifier.is_painting());
        assert!(notifier.notify());
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_nested_guards_restore_outer_state() {
        let notifier = RepaintNotifier::new();
        let outer = notifier.begin_paint();
        {
            let _inner = notifier.begin_paint();
        }
        assert!(notifier.is_painting());
        drop(outer);
        assert!(!notifier.is_painting());
    }

    // ===== ThumbDecoration Tests =====

    #[test]
    fn test_decoration_without_image() {
        let d = ThumbDecoration::new(Color::WHITE, None, &RepaintNotifier::new());
        assert_eq!(d.image_state(), ImageState::None);
        assert!(d.matches(Color::WHITE, None));
        assert!(!d.matches(Color::BLACK, None));
    }

    #[test]
    fn test_decoration_static_image_ready_immediately() {
        let image = ThumbImage::new(Rc::new(StaticImageProvider::ready(4, Size::new(8.0, 8.0))));
        let d = ThumbDecoration::new(Color::WHITE, Some(&image), &RepaintNotifier::new());
        assert_eq!(d.decoded().map(|i| i.id), Some(ImageId(4)));

        let mut canvas = RecordingCanvas::new();
        d.paint(&mut canvas, Rect::new(0.0, 0.0, 8.0, 8.0), CornerRadius::uniform(4.0));
        assert_eq!(canvas.command_count(), 2);
        match &canvas.commands()[0] {
            DrawCommand::Rect { style, .. } => {
                assert_eq!(style.shadows, vec![THUMB_KEY_SHADOW, THUMB_AMBIENT_SHADOW]);
                assert_eq!(style.stroke, Some(THUMB_HAIRLINE));
            }
            other => panic!("Expected Rect, got {other:?}"),
        }
    }

    #[test]
    fn test_deferred_completion_notifies_repaint() {
        let provider = DeferredProvider::new(1);
        let notifier = RepaintNotifier::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        notifier.add_listener(move || h.set(h.get() + 1));

        let image = ThumbImage::new(provider.clone());
        let d = ThumbDecoration::new(Color::WHITE, Some(&image), &notifier);
        assert_eq!(d.image_state(), ImageState::Pending);

        provider.complete(Ok(decoded(1)));
        assert_eq!(d.decoded(), Some(decoded(1)));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_failure_reports_to_slot_listener() {
        let errors = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&errors);
        let image = ThumbImage::new(Rc::new(StaticImageProvider::failing(
            2,
            ImageError::Decode("bad header".into()),
        )))
        .on_error(move |e| sink.borrow_mut().push(e.clone()));

        let d = ThumbDecoration::new(Color::WHITE, Some(&image), &RepaintNotifier::new());
        assert!(matches!(d.image_state(), ImageState::Failed(_)));
        assert_eq!(
            errors.borrow().as_slice(),
            &[ImageError::Decode("bad header".into())]
        );
    }

    #[test]
    fn test_cancelled_result_not_reported() {
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let image = ThumbImage::new(Rc::new(StaticImageProvider::failing(
            2,
            ImageError::Cancelled,
        )))
        .on_error(move |_| h.set(h.get() + 1));
        let _d = ThumbDecoration::new(Color::WHITE, Some(&image), &RepaintNotifier::new());
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn test_dispose_cancels_once() {
        let provider = DeferredProvider::new(7);
        let image = ThumbImage::new(provider.clone());
        let mut d = ThumbDecoration::new(Color::WHITE, Some(&image), &RepaintNotifier::new());
        d.dispose();
        d.dispose();
        drop(d);
        assert_eq!(provider.cancels.get(), 1);
    }

    #[test]
    fn test_completion_after_dispose_ignored() {
        let provider = DeferredProvider::new(7);
        let notifier = RepaintNotifier::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        notifier.add_listener(move || h.set(h.get() + 1));

        let image = ThumbImage::new(provider.clone());
        let mut d = ThumbDecoration::new(Color::WHITE, Some(&image), &notifier);
        d.dispose();
        provider.complete(Ok(decoded(7)));
        assert_eq!(d.image_state(), ImageState::Disposed);
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn test_matches_tracks_listener_identity() {
        let provider = DeferredProvider::new(9);
        let listener: ImageErrorListener = Rc::new(|_| {});
        let a = ThumbImage::new(provider.clone()).with_listener(Rc::clone(&listener));
        let d = ThumbDecoration::new(Color::WHITE, Some(&a), &RepaintNotifier::new());

        let same = ThumbImage::new(provider.clone()).with_listener(listener);
        let other = ThumbImage::new(provider).on_error(|_| {});
        assert!(d.matches(Color::WHITE, Some(&same)));
        assert!(!d.matches(Color::WHITE, Some(&other)));
        assert!(!d.matches(Color::WHITE, None));
    }
}
