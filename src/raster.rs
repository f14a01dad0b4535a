// Software raster surface: the pixel grid the pen draws into.
// Visual: this is exactly what shows up inside the canvas box and what
// ends up inside drawing.png.

use crate::types::{pack_rgb, unpack_rgb, FrameBuffer, LineCap, Point, StrokeStyle};

/// A bitmap in backing pixels plus the uniform scale applied to pen widths.
///
/// Segment endpoints are given in backing pixels; only the stroke width is
/// expressed in CSS units and goes through the scale.
#[derive(Clone, Debug)]
pub struct Surface {
    fb: FrameBuffer,
    scale: f32,
}

impl Surface {
    /// Create a `width * height` surface already filled with `background`.
    pub fn new(width: usize, height: usize, background: u32) -> Self {
        Self { fb: FrameBuffer::filled(width, height, background), scale: 1.0 }
    }

    pub fn width(&self) -> usize {
        self.fb.width
    }

    pub fn height(&self) -> usize {
        self.fb.height
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Replace the transform with a uniform scale. Never multiplies onto the
    /// previous value, so repeated resizes cannot compound it.
    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.fb
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        self.fb.get(x, y)
    }

    /// Paint every pixel with `color`.
    /// Visual: the box turns blank.
    pub fn fill(&mut self, color: u32) {
        self.fb.pixels.fill(color);
    }

    /// Rasterize one straight segment with the given pen.
    ///
    /// Coverage is anti-aliased over one pixel at the edge. Returns `true`
    /// if at least one pixel was touched.
    pub fn stroke_segment(&mut self, from: Point, to: Point, style: &StrokeStyle) -> bool {
        let half = style.width * self.scale * 0.5;
        if half.is_nan() || half <= 0.0 {
            return false;
        }

        let (mut a, mut b) = (from, to);
        let len = (b.x - a.x).hypot(b.y - a.y);
        if len == 0.0 && style.cap != LineCap::Round {
            return false;
        }
        if style.cap == LineCap::Square {
            let (ux, uy) = ((b.x - a.x) / len * half, (b.y - a.y) / len * half);
            a = Point::new(a.x - ux, a.y - uy);
            b = Point::new(b.x + ux, b.y + uy);
        }

        // Scan just the bounding box of the capsule, clipped to the surface.
        let pad = half + 1.0;
        let x0 = (a.x.min(b.x) - pad).floor().max(0.0) as usize;
        let y0 = (a.y.min(b.y) - pad).floor().max(0.0) as usize;
        let x1 = ((a.x.max(b.x) + pad).ceil().max(0.0) as usize).min(self.fb.width);
        let y1 = ((a.y.max(b.y) + pad).ceil().max(0.0) as usize).min(self.fb.height);

        let mut touched = false;
        for y in y0..y1 {
            for x in x0..x1 {
                let p = Point::new(x as f32 + 0.5, y as f32 + 0.5);
                let (dist, t) = segment_distance(p, a, b);
                if style.cap != LineCap::Round && !(0.0..=1.0).contains(&t) {
                    continue;
                }
                let coverage = (half + 0.5 - dist).clamp(0.0, 1.0);
                if coverage <= 0.0 {
                    continue;
                }
                let idx = y * self.fb.width + x;
                self.fb.pixels[idx] = blend(self.fb.pixels[idx], style.color, coverage);
                touched = true;
            }
        }
        touched
    }
}

/// Distance from `p` to segment `a..b`, plus the unclamped projection
/// parameter (0 at `a`, 1 at `b`).
fn segment_distance(p: Point, a: Point, b: Point) -> (f32, f32) {
    let (abx, aby) = (b.x - a.x, b.y - a.y);
    let len2 = abx * abx + aby * aby;
    if len2 == 0.0 {
        return ((p.x - a.x).hypot(p.y - a.y), 0.0);
    }
    let t = ((p.x - a.x) * abx + (p.y - a.y) * aby) / len2;
    let tc = t.clamp(0.0, 1.0);
    let (cx, cy) = (a.x + abx * tc, a.y + aby * tc);
    ((p.x - cx).hypot(p.y - cy), t)
}

/// Source-over with a coverage factor in [0,1], in sRGB space like a 2D canvas.
#[inline]
fn blend(dst: u32, src: u32, coverage: f32) -> u32 {
    if coverage >= 1.0 {
        return src;
    }
    let (dr, dg, db) = unpack_rgb(dst);
    let (sr, sg, sb) = unpack_rgb(src);
    let inv = 1.0 - coverage;
    let mix = |s: u8, d: u8| (s as f32 * coverage + d as f32 * inv).round().clamp(0.0, 255.0) as u8;
    pack_rgb(mix(sr, dr), mix(sg, dg), mix(sb, db))
}
