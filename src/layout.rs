// Where things sit on the page, in CSS pixels.
// Visual: title on top, the white drawing box in the middle, "Clear" at the
// bottom left and "Download Drawing" at the bottom right.

use crate::draw::text_width;
use crate::page::{CLEAR_LABEL, DOWNLOAD_LABEL, PREPARING_LABEL};
use crate::types::{ClientRect, Point};

pub const PADDING: f32 = 16.0;
pub const HEADER_HEIGHT: f32 = 48.0;
pub const FOOTER_HEIGHT: f32 = 56.0;
pub const BUTTON_HEIGHT: f32 = 32.0;
pub const BUTTON_PADDING_X: f32 = 12.0;
/// Glyph scale for page text (5x7 glyphs drawn at 10x14 CSS pixels).
pub const TEXT_SCALE: i32 = 2;

/// Which part of the page a point falls on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageRegion {
    Canvas,
    ClearButton,
    DownloadButton,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageLayout {
    pub width: f32,
    pub height: f32,
    /// Top-left corner of the title text.
    pub title: Point,
    pub canvas: ClientRect,
    pub clear_button: ClientRect,
    pub download_button: ClientRect,
}

impl PageLayout {
    /// Page just big enough to show a canvas of the given CSS size.
    pub fn for_canvas(canvas_width: f32, canvas_height: f32) -> Self {
        Self::for_window(
            canvas_width + 2.0 * PADDING,
            canvas_height + HEADER_HEIGHT + FOOTER_HEIGHT,
        )
    }

    /// Lay out a page of the given CSS size; the canvas takes whatever the
    /// header and footer leave, never less than one pixel per side.
    pub fn for_window(width: f32, height: f32) -> Self {
        let canvas = ClientRect::new(
            PADDING,
            HEADER_HEIGHT,
            (width - 2.0 * PADDING).max(1.0),
            (height - HEADER_HEIGHT - FOOTER_HEIGHT).max(1.0),
        );

        let button_top = canvas.bottom() + (FOOTER_HEIGHT - BUTTON_HEIGHT) / 2.0;
        let clear_w = text_width(CLEAR_LABEL, TEXT_SCALE) as f32 + 2.0 * BUTTON_PADDING_X;
        // Sized for the longer label so the button does not jump while preparing.
        let label_w = text_width(DOWNLOAD_LABEL, TEXT_SCALE).max(text_width(PREPARING_LABEL, TEXT_SCALE));
        let download_w = label_w as f32 + 2.0 * BUTTON_PADDING_X;

        let clear_button = ClientRect::new(PADDING, button_top, clear_w, BUTTON_HEIGHT);
        let download_button = ClientRect::new(
            (width - PADDING - download_w).max(clear_button.right() + PADDING),
            button_top,
            download_w,
            BUTTON_HEIGHT,
        );

        let title_h = 7.0 * TEXT_SCALE as f32;
        Self {
            width,
            height,
            title: Point::new(PADDING, (HEADER_HEIGHT - title_h) / 2.0),
            canvas,
            clear_button,
            download_button,
        }
    }

    pub fn hit(&self, p: Point) -> Option<PageRegion> {
        if self.canvas.contains(p) {
            Some(PageRegion::Canvas)
        } else if self.clear_button.contains(p) {
            Some(PageRegion::ClearButton)
        } else if self.download_button.contains(p) {
            Some(PageRegion::DownloadButton)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn page_wraps_requested_canvas() {
        let l = PageLayout::for_canvas(448.0, 256.0);
        assert_eq!(l.canvas, ClientRect::new(16.0, 48.0, 448.0, 256.0));
        assert_eq!(l.width, 480.0);
        assert_eq!(l.height, 360.0);
    }

    #[test]
    fn buttons_sit_in_footer_without_overlap() {
        let l = PageLayout::for_canvas(448.0, 256.0);
        assert!(l.clear_button.top >= l.canvas.bottom());
        assert!(l.clear_button.right() < l.download_button.left);
        assert!(l.download_button.right() <= l.width);
    }

    #[test]
    fn hit_testing() {
        let l = PageLayout::for_canvas(200.0, 100.0);
        assert_eq!(l.hit(Point::new(20.0, 60.0)), Some(PageRegion::Canvas));
        assert_eq!(
            l.hit(Point::new(l.clear_button.left + 1.0, l.clear_button.top + 1.0)),
            Some(PageRegion::ClearButton)
        );
        assert_eq!(
            l.hit(Point::new(l.download_button.left + 1.0, l.download_button.top + 1.0)),
            Some(PageRegion::DownloadButton)
        );
        assert_eq!(l.hit(Point::new(1.0, 1.0)), None);
    }

    #[test]
    fn tiny_window_keeps_a_canvas() {
        let l = PageLayout::for_window(10.0, 10.0);
        assert_eq!(l.canvas.width, 1.0);
        assert_eq!(l.canvas.height, 1.0);
    }
}
