//! Turns polled mouse state into page input.
//!
//! The window only tells us "where is the mouse, is the button held" once per
//! frame. [`PointerTracker`] diffs consecutive samples into the discrete
//! events a browser would fire: down/move/up over the canvas, leave when the
//! mouse exits it, and button presses.

use crate::events::InputEvent;
use crate::layout::{PageLayout, PageRegion};
use crate::types::Point;

/// One frame's worth of mouse state, in client (CSS) coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MouseSample {
    /// `None` while the mouse is outside the window.
    pub pos: Option<Point>,
    pub left_down: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PageAction {
    Canvas(InputEvent),
    Clear,
    Download,
}

#[derive(Debug, Default)]
pub struct PointerTracker {
    was_down: bool,
    was_inside: bool,
    last_pos: Option<Point>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, sample: MouseSample, layout: &PageLayout) -> Vec<PageAction> {
        let mut out = Vec::new();
        let inside = sample.pos.is_some_and(|p| layout.canvas.contains(p));
        let pressed = sample.left_down && !self.was_down;
        let released = !sample.left_down && self.was_down;
        let moved = sample.pos != self.last_pos;

        if self.was_inside && !inside {
            out.push(PageAction::Canvas(InputEvent::PointerLeave));
        }

        if let Some(p) = sample.pos {
            if pressed {
                match layout.hit(p) {
                    Some(PageRegion::Canvas) => out.push(PageAction::Canvas(InputEvent::PointerDown(p))),
                    Some(PageRegion::ClearButton) => out.push(PageAction::Clear),
                    Some(PageRegion::DownloadButton) => out.push(PageAction::Download),
                    None => {}
                }
            } else if moved && inside {
                out.push(PageAction::Canvas(InputEvent::PointerMove(p)));
            }

            if released && inside {
                out.push(PageAction::Canvas(InputEvent::PointerUp(p)));
            }
        }

        self.was_down = sample.left_down;
        self.was_inside = inside;
        self.last_pos = sample.pos;
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn at(x: f32, y: f32, down: bool) -> MouseSample {
        MouseSample { pos: Some(Point::new(x, y)), left_down: down }
    }

    #[test]
    fn drag_across_canvas_emits_down_moves_up() {
        let layout = PageLayout::for_canvas(200.0, 100.0);
        let mut t = PointerTracker::new();

        assert_eq!(t.update(at(20.0, 60.0, false), &layout), vec![PageAction::Canvas(InputEvent::PointerMove(Point::new(20.0, 60.0)))]);
        assert_eq!(t.update(at(20.0, 60.0, true), &layout), vec![PageAction::Canvas(InputEvent::PointerDown(Point::new(20.0, 60.0)))]);
        assert_eq!(t.update(at(30.0, 70.0, true), &layout), vec![PageAction::Canvas(InputEvent::PointerMove(Point::new(30.0, 70.0)))]);
        assert_eq!(t.update(at(30.0, 70.0, true), &layout), vec![]);
        assert_eq!(t.update(at(30.0, 70.0, false), &layout), vec![PageAction::Canvas(InputEvent::PointerUp(Point::new(30.0, 70.0)))]);
    }

    #[test]
    fn leaving_canvas_emits_leave() {
        let layout = PageLayout::for_canvas(200.0, 100.0);
        let mut t = PointerTracker::new();
        t.update(at(20.0, 60.0, true), &layout);

        assert_eq!(t.update(at(1.0, 1.0, true), &layout), vec![PageAction::Canvas(InputEvent::PointerLeave)]);
        assert_eq!(
            t.update(MouseSample { pos: None, left_down: true }, &layout),
            vec![]
        );
    }

    #[test]
    fn pressing_buttons_emits_actions() {
        let layout = PageLayout::for_canvas(448.0, 256.0);
        let mut t = PointerTracker::new();
        let c = layout.clear_button;
        let d = layout.download_button;

        assert_eq!(t.update(at(c.left + 2.0, c.top + 2.0, true), &layout), vec![PageAction::Clear]);
        t.update(at(c.left + 2.0, c.top + 2.0, false), &layout);
        assert_eq!(t.update(at(d.left + 2.0, d.top + 2.0, true), &layout), vec![PageAction::Download]);
        // Holding the button does not repeat the action
        assert_eq!(t.update(at(d.left + 2.0, d.top + 2.0, true), &layout), vec![]);
    }
}
