//! The drawing surface component.
//!
//! Owns the raster bitmap, maps client coordinates onto it and turns
//! pointer/touch motion into line segments as they arrive. The host only
//! ever gets a [`CanvasHandle`], which exposes whole-bitmap operations.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::error::Result;
use crate::events::{Dispatcher, InputEvent, Listener, Subscription};
use crate::export;
use crate::raster::Surface;
use crate::types::{ClientRect, Point, StrokeStyle, WHITE};

/// What a resize does to existing drawing content.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResizePolicy {
    /// Reallocate and repaint blank. Prior strokes are lost.
    #[default]
    Discard,
    /// Reallocate, repaint blank, then re-rasterize every segment drawn
    /// since the last clear at the new resolution.
    Replay,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StrokeState {
    Idle,
    /// `last` is the pen position in backing pixels.
    Drawing { last: Point },
}

/// One rendered segment in logical coordinates (CSS pixels relative to the
/// surface's top-left corner).
#[derive(Clone, Copy, Debug, PartialEq)]
struct Segment {
    from: Point,
    to: Point,
}

pub struct DrawingCanvas {
    surface: Option<Surface>,
    rect: ClientRect,
    dpr: f32,
    style: StrokeStyle,
    background: u32,
    state: StrokeState,
    policy: ResizePolicy,
    log: Vec<Segment>,
}

impl Default for DrawingCanvas {
    fn default() -> Self {
        Self::new(ResizePolicy::default())
    }
}

impl DrawingCanvas {
    /// An unmounted canvas. Strokes are ignored until [`initialize`](Self::initialize).
    pub fn new(policy: ResizePolicy) -> Self {
        Self {
            surface: None,
            rect: ClientRect::default(),
            dpr: 1.0,
            style: StrokeStyle::default(),
            background: WHITE,
            state: StrokeState::Idle,
            policy,
            log: Vec::new(),
        }
    }

    /// Create, initialize and share a canvas in one go.
    pub fn mount(rect: ClientRect, dpr: f32, policy: ResizePolicy) -> Rc<RefCell<Self>> {
        let mut canvas = Self::new(policy);
        canvas.initialize(rect, dpr);
        Rc::new(RefCell::new(canvas))
    }

    /// Size the backing bitmap to `rect` × `dpr`, set the transform to a
    /// uniform `dpr` scale and paint it blank.
    pub fn initialize(&mut self, rect: ClientRect, dpr: f32) {
        let width = backing_len(rect.width, dpr);
        let height = backing_len(rect.height, dpr);

        let mut surface = Surface::new(width, height, self.background);
        surface.set_scale(dpr);

        self.rect = rect;
        self.dpr = dpr;
        self.surface = Some(surface);
        self.state = StrokeState::Idle;
        log::debug!(
            "canvas initialized: {}x{} css @ {dpr} -> {width}x{height} px",
            rect.width,
            rect.height
        );
    }

    /// Re-run initialization for a new footprint. Under
    /// [`ResizePolicy::Replay`] the stroke log is re-rasterized afterwards.
    pub fn resize(&mut self, rect: ClientRect, dpr: f32) {
        self.initialize(rect, dpr);
        match self.policy {
            ResizePolicy::Discard => {
                if !self.log.is_empty() {
                    log::debug!("resize discarded {} segments", self.log.len());
                }
                self.log.clear();
            }
            ResizePolicy::Replay => self.replay(),
        }
    }

    fn replay(&mut self) {
        let Some(surface) = self.surface.as_mut() else { return };
        let (sx, sy) = logical_to_backing(&self.rect, surface);
        for seg in &self.log {
            let from = Point::new(seg.from.x * sx, seg.from.y * sy);
            let to = Point::new(seg.to.x * sx, seg.to.y * sy);
            surface.stroke_segment(from, to, &self.style);
        }
        log::debug!("resize replayed {} segments", self.log.len());
    }

    /// Client coordinates to backing pixels:
    /// `(client - offset) * backing / displayed`, per axis.
    pub fn map_client_point(&self, client: Point) -> Option<Point> {
        let surface = self.surface.as_ref()?;
        let (sx, sy) = logical_to_backing(&self.rect, surface);
        Some(Point::new((client.x - self.rect.left) * sx, (client.y - self.rect.top) * sy))
    }

    /// Pointer-down / touch-start. Sets the path origin; draws nothing.
    pub fn begin_stroke(&mut self, client: Point) {
        let Some(at) = self.map_client_point(client) else {
            log::debug!("stroke ignored: canvas not initialized");
            return;
        };
        self.state = StrokeState::Drawing { last: at };
        log::trace!("stroke begin at {at:?}");
    }

    /// Pointer-move / touch-move. Draws one segment when a stroke is in
    /// progress; returns whether any pixel changed.
    pub fn extend_stroke(&mut self, client: Point) -> bool {
        let StrokeState::Drawing { last } = self.state else {
            return false;
        };
        let Some(to) = self.map_client_point(client) else { return false };
        let Some(surface) = self.surface.as_mut() else { return false };

        let changed = surface.stroke_segment(last, to, &self.style);
        self.state = StrokeState::Drawing { last: to };

        if self.policy == ResizePolicy::Replay {
            let (sx, sy) = logical_to_backing(&self.rect, surface);
            self.log.push(Segment {
                from: Point::new(last.x / sx, last.y / sy),
                to: Point::new(to.x / sx, to.y / sy),
            });
        }
        changed
    }

    /// Pointer-up / pointer-leave / touch-end.
    pub fn end_stroke(&mut self) {
        if self.is_drawing() {
            log::trace!("stroke end");
        }
        self.state = StrokeState::Idle;
    }

    /// Route one input event; returns whether pixels changed.
    pub fn handle_event(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::PointerDown(_) | InputEvent::TouchStart(_) => {
                if let Some(p) = event.position() {
                    self.begin_stroke(p);
                }
                false
            }
            InputEvent::PointerMove(_) | InputEvent::TouchMove(_) => match event.position() {
                Some(p) => self.extend_stroke(p),
                None => false,
            },
            InputEvent::PointerUp(_) | InputEvent::PointerLeave | InputEvent::TouchEnd => {
                self.end_stroke();
                false
            }
            InputEvent::Resize { rect, dpr } => {
                self.resize(*rect, *dpr);
                true
            }
        }
    }

    /// Repaint the whole bitmap with the background. Ends any stroke in
    /// progress first. Returns `false` if the canvas is not initialized.
    pub fn clear(&mut self) -> bool {
        let Some(surface) = self.surface.as_mut() else { return false };
        self.state = StrokeState::Idle;
        surface.fill(self.background);
        self.log.clear();
        true
    }

    /// Encode the bitmap as PNG. `Ok(None)` if the canvas is not initialized.
    pub fn export_png(&self) -> Result<Option<Vec<u8>>> {
        match self.surface.as_ref() {
            Some(surface) => export::encode_png(surface.frame()).map(Some),
            None => Ok(None),
        }
    }

    pub fn state(&self) -> StrokeState {
        self.state
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.state, StrokeState::Drawing { .. })
    }

    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    /// Backing width and height in device pixels.
    pub fn dimensions(&self) -> Option<(usize, usize)> {
        self.surface.as_ref().map(|s| (s.width(), s.height()))
    }

    pub fn client_rect(&self) -> ClientRect {
        self.rect
    }

    pub fn device_pixel_ratio(&self) -> f32 {
        self.dpr
    }

    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }

    pub fn policy(&self) -> ResizePolicy {
        self.policy
    }

    /// Register `canvas` for input events. Dropping the guard unregisters it.
    pub fn attach(canvas: &Rc<RefCell<Self>>, dispatcher: &Dispatcher) -> Subscription {
        let listener: Rc<RefCell<dyn Listener>> = canvas.clone();
        dispatcher.subscribe(Rc::downgrade(&listener))
    }
}

impl Listener for DrawingCanvas {
    fn on_event(&mut self, event: &InputEvent) {
        self.handle_event(event);
    }
}

/// Rounded backing length, never below one pixel.
fn backing_len(css: f32, dpr: f32) -> usize {
    let px = (css * dpr).round();
    if px.is_finite() && px >= 1.0 { px as usize } else { 1 }
}

/// Per-axis scale from logical to backing pixels.
fn logical_to_backing(rect: &ClientRect, surface: &Surface) -> (f32, f32) {
    let ratio = |backing: usize, css: f32| if css > 0.0 { backing as f32 / css } else { 1.0 };
    (ratio(surface.width(), rect.width), ratio(surface.height(), rect.height))
}

/// Non-owning reference held by the host page.
///
/// Every operation is a silent no-op when the canvas has been dropped,
/// is not yet initialized, or is borrowed elsewhere.
#[derive(Clone, Default)]
pub struct CanvasHandle {
    canvas: Weak<RefCell<DrawingCanvas>>,
}

impl CanvasHandle {
    pub fn new(canvas: &Rc<RefCell<DrawingCanvas>>) -> Self {
        Self { canvas: Rc::downgrade(canvas) }
    }

    /// A handle that never resolves.
    pub fn detached() -> Self {
        Self::default()
    }

    fn with<R>(&self, f: impl FnOnce(&mut DrawingCanvas) -> R) -> Option<R> {
        let canvas = self.canvas.upgrade()?;
        let mut canvas = canvas.try_borrow_mut().ok()?;
        Some(f(&mut canvas))
    }

    /// True when the canvas exists and has a bitmap.
    pub fn is_available(&self) -> bool {
        self.with(|c| c.surface().is_some()).unwrap_or(false)
    }

    pub fn clear(&self) -> bool {
        self.with(DrawingCanvas::clear).unwrap_or(false)
    }

    pub fn export_png(&self) -> Result<Option<Vec<u8>>> {
        self.with(|c| c.export_png()).unwrap_or(Ok(None))
    }

    pub fn dimensions(&self) -> Option<(usize, usize)> {
        self.with(|c| c.dimensions()).flatten()
    }

    pub fn is_drawing(&self) -> bool {
        self.with(|c| c.is_drawing()).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rect() -> ClientRect {
        ClientRect::new(16.0, 40.0, 100.0, 50.0)
    }

    fn all_white(c: &DrawingCanvas) -> bool {
        c.surface().unwrap().frame().pixels.iter().all(|&p| p == WHITE)
    }

    #[test]
    fn initialize_sizes_backing_by_dpr_and_paints_white() {
        let mut c = DrawingCanvas::default();
        c.initialize(rect(), 2.0);
        assert_eq!(c.dimensions(), Some((200, 100)));
        assert_eq!(c.surface().unwrap().scale(), 2.0);
        assert!(all_white(&c));
        assert_eq!(c.state(), StrokeState::Idle);
    }

    #[test]
    fn corners_map_to_backing_extent() {
        let mut c = DrawingCanvas::default();
        c.initialize(rect(), 2.0);
        assert_eq!(c.map_client_point(Point::new(16.0, 40.0)), Some(Point::new(0.0, 0.0)));
        assert_eq!(c.map_client_point(Point::new(116.0, 90.0)), Some(Point::new(200.0, 100.0)));
    }

    #[test]
    fn strokes_before_initialize_are_ignored() {
        let mut c = DrawingCanvas::default();
        c.begin_stroke(Point::new(20.0, 50.0));
        assert_eq!(c.state(), StrokeState::Idle);
        assert!(!c.extend_stroke(Point::new(30.0, 60.0)));
        assert!(c.export_png().unwrap().is_none());
        assert!(!c.clear());
    }

    #[test]
    fn begin_draws_nothing_extend_draws_end_returns_idle() {
        let mut c = DrawingCanvas::default();
        c.initialize(rect(), 1.0);

        c.begin_stroke(Point::new(26.0, 60.0));
        assert!(c.is_drawing());
        assert!(all_white(&c));

        assert!(c.extend_stroke(Point::new(66.0, 60.0)));
        assert_eq!(c.state(), StrokeState::Drawing { last: Point::new(50.0, 20.0) });
        assert!(!all_white(&c));

        c.end_stroke();
        assert_eq!(c.state(), StrokeState::Idle);
    }

    #[test]
    fn extend_while_idle_is_a_no_op() {
        let mut c = DrawingCanvas::default();
        c.initialize(rect(), 1.0);
        assert!(!c.extend_stroke(Point::new(50.0, 60.0)));
        assert!(all_white(&c));
    }

    #[test]
    fn begin_while_drawing_restarts_the_path() {
        let mut c = DrawingCanvas::default();
        c.initialize(rect(), 1.0);
        c.begin_stroke(Point::new(20.0, 50.0));
        c.begin_stroke(Point::new(60.0, 70.0));
        assert_eq!(c.state(), StrokeState::Drawing { last: Point::new(44.0, 30.0) });
        assert!(all_white(&c));
    }

    #[test]
    fn resize_sets_scale_instead_of_compounding() {
        let mut c = DrawingCanvas::default();
        c.initialize(rect(), 2.0);
        c.resize(rect(), 2.0);
        c.resize(rect(), 2.0);
        assert_eq!(c.surface().unwrap().scale(), 2.0);
        assert_eq!(c.dimensions(), Some((200, 100)));
    }

    #[test]
    fn discard_policy_blanks_on_resize() {
        let mut c = DrawingCanvas::new(ResizePolicy::Discard);
        c.initialize(rect(), 1.0);
        c.begin_stroke(Point::new(20.0, 50.0));
        c.extend_stroke(Point::new(100.0, 80.0));
        c.resize(ClientRect::new(16.0, 40.0, 200.0, 50.0), 1.0);
        assert_eq!(c.dimensions(), Some((200, 50)));
        assert!(all_white(&c));
        assert!(!c.is_drawing());
    }

    #[test]
    fn replay_policy_redraws_at_new_resolution() {
        let mut c = DrawingCanvas::new(ResizePolicy::Replay);
        c.initialize(rect(), 1.0);
        c.begin_stroke(Point::new(26.0, 65.0));
        c.extend_stroke(Point::new(106.0, 65.0));
        c.end_stroke();

        c.resize(rect(), 2.0);
        assert_eq!(c.dimensions(), Some((200, 100)));
        // Logical (50, 25) lands on backing (100, 50).
        let s = c.surface().unwrap();
        assert_ne!(s.pixel(100, 49), Some(WHITE));
        assert_eq!(s.pixel(100, 10), Some(WHITE));
    }

    #[test]
    fn clear_empties_replay_log() {
        let mut c = DrawingCanvas::new(ResizePolicy::Replay);
        c.initialize(rect(), 1.0);
        c.begin_stroke(Point::new(26.0, 65.0));
        c.extend_stroke(Point::new(106.0, 65.0));
        assert!(c.clear());
        assert!(!c.is_drawing());
        c.resize(rect(), 1.0);
        assert!(all_white(&c));
    }

    #[test]
    fn handle_event_routes_touch_and_pointer() {
        let mut c = DrawingCanvas::default();
        c.initialize(rect(), 1.0);

        c.handle_event(&InputEvent::TouchStart(vec![Point::new(20.0, 50.0), Point::new(0.0, 0.0)]));
        assert_eq!(c.state(), StrokeState::Drawing { last: Point::new(4.0, 10.0) });
        assert!(c.handle_event(&InputEvent::TouchMove(vec![Point::new(40.0, 50.0)])));
        c.handle_event(&InputEvent::TouchEnd);
        assert!(!c.is_drawing());

        c.handle_event(&InputEvent::PointerDown(Point::new(20.0, 60.0)));
        c.handle_event(&InputEvent::PointerLeave);
        assert!(!c.handle_event(&InputEvent::PointerMove(Point::new(60.0, 60.0))));
    }

    #[test]
    fn handle_goes_silent_after_canvas_drops() {
        let canvas = DrawingCanvas::mount(rect(), 1.0, ResizePolicy::Discard);
        let handle = CanvasHandle::new(&canvas);
        assert!(handle.is_available());
        assert_eq!(handle.dimensions(), Some((100, 50)));

        drop(canvas);
        assert!(!handle.is_available());
        assert!(!handle.clear());
        assert!(handle.export_png().unwrap().is_none());
        assert_eq!(handle.dimensions(), None);
    }

    #[test]
    fn attached_canvas_receives_dispatched_events() {
        let dispatcher = Dispatcher::new();
        let canvas = DrawingCanvas::mount(rect(), 1.0, ResizePolicy::Discard);
        let sub = DrawingCanvas::attach(&canvas, &dispatcher);

        dispatcher.dispatch(&InputEvent::PointerDown(Point::new(20.0, 50.0)));
        assert!(canvas.borrow().is_drawing());

        drop(sub);
        dispatcher.dispatch(&InputEvent::PointerUp(Point::new(20.0, 50.0)));
        assert!(canvas.borrow().is_drawing());
    }
}
