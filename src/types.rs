// Core types shared by the surface, the page and the window.

/// Opaque white, the blank-page colour.
pub const WHITE: u32 = 0x00_FF_FF_FF;
/// Opaque black, the pen colour.
pub const BLACK: u32 = 0x00_00_00_00;

#[derive(Clone, Debug, PartialEq)]
pub struct FrameBuffer {
    pub width: usize,      // how wide the frame is (pixels)
    pub height: usize,     // how tall the frame is (pixels)
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    /// A `width * height` buffer with every pixel set to `color`.
    pub fn filled(width: usize, height: usize, color: u32) -> Self {
        Self { width, height, pixels: vec![color; width * height] }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y * self.width + x])
    }
}

/// A position in either client (CSS) or backing pixels, depending on context.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// On-screen footprint of an element in CSS pixels: offset from the page
/// origin plus displayed size.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ClientRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl ClientRect {
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self { left, top, width, height }
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// Half-open containment: the right and bottom edges are outside.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x < self.right() && p.y >= self.top && p.y < self.bottom()
    }
}

/// How the ends of a segment are finished.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineCap {
    /// Flat end exactly at the endpoint.
    Butt,
    /// Half-disc around the endpoint. Consecutive segments sharing an
    /// endpoint therefore meet in a round join.
    #[default]
    Round,
    /// Flat end pushed out by half the line width.
    Square,
}

/// Pen used for every segment of a stroke.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeStyle {
    pub color: u32,
    /// Width in CSS units; the surface transform scales it to backing pixels.
    pub width: f32,
    pub cap: LineCap,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self { color: BLACK, width: 2.0, cap: LineCap::Round }
    }
}

#[inline]
pub fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

#[inline]
pub fn unpack_rgb(px: u32) -> (u8, u8, u8) {
    (((px >> 16) & 0xFF) as u8, ((px >> 8) & 0xFF) as u8, (px & 0xFF) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_packing_matches_minifb_layout() {
        assert_eq!(pack_rgb(0x12, 0x34, 0x56), 0x00_12_34_56);
        assert_eq!(unpack_rgb(0x00_AB_CD_EF), (0xAB, 0xCD, 0xEF));
    }

    #[test]
    fn rect_contains_is_half_open() {
        let r = ClientRect::new(10.0, 20.0, 100.0, 50.0);
        assert!(r.contains(Point::new(10.0, 20.0)));
        assert!(r.contains(Point::new(109.9, 69.9)));
        assert!(!r.contains(Point::new(110.0, 30.0)));
        assert!(!r.contains(Point::new(50.0, 70.0)));
    }

    #[test]
    fn default_pen_is_black_two_units_round() {
        let s = StrokeStyle::default();
        assert_eq!(s.color, BLACK);
        assert_eq!(s.width, 2.0);
        assert_eq!(s.cap, LineCap::Round);
    }
}
