// Software drawing for the page around the canvas.
// Visual effects provided here:
// 1) A light page background with the title on top.
// 2) The canvas bitmap copied 1:1 into its box, with a thin grey border.
// 3) Two buttons ("Clear" and "Download Drawing") drawn with a tiny 5x7 font.

use crate::layout::{PageLayout, TEXT_SCALE};
use crate::page::{DownloadStatus, HostPage};
use crate::export::SaveTarget;
use crate::types::{ClientRect, FrameBuffer};

pub const PAGE_BG: u32 = 0x00_F4_F4_F5;
pub const BORDER: u32 = 0x00_D1_D5_DB;
pub const TEXT: u32 = 0x00_11_18_1C;
pub const DANGER_BG: u32 = 0x00_FD_D0_DF;
pub const DANGER_TEXT: u32 = 0x00_C2_0E_4D;
pub const PRIMARY_BG: u32 = 0x00_00_6F_EE;
pub const PRIMARY_BUSY_BG: u32 = 0x00_66_AA_F9;
pub const PRIMARY_TEXT: u32 = 0x00_FF_FF_FF;

/// Everything the page paints besides the canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageView<'a> {
    pub title: &'a str,
    pub clear_label: &'a str,
    pub download_label: &'a str,
    pub busy: bool,
}

impl<T: SaveTarget> From<&HostPage<T>> for PageView<'static> {
    fn from(page: &HostPage<T>) -> Self {
        Self {
            title: page.title(),
            clear_label: page.clear_label(),
            download_label: page.download_label(),
            busy: page.status() == DownloadStatus::Preparing,
        }
    }
}

/// Paint the whole page into `screen` (device pixels), resizing `screen`
/// first if the layout changed.
/// Visual: this is the frame the window shows.
pub fn compose_page(
    screen: &mut FrameBuffer,
    layout: &PageLayout,
    dpr: f32,
    canvas: Option<&FrameBuffer>,
    view: &PageView<'_>,
) {
    let w = device_len(layout.width, dpr);
    let h = device_len(layout.height, dpr);
    if screen.width != w || screen.height != h {
        *screen = FrameBuffer::filled(w, h, PAGE_BG);
    } else {
        screen.pixels.fill(PAGE_BG);
    }

    let text_px = ((TEXT_SCALE as f32) * dpr).round().max(1.0) as i32;

    // Title
    draw_text_5x7(
        screen,
        device(layout.title.x, dpr),
        device(layout.title.y, dpr),
        view.title,
        TEXT,
        text_px,
    );

    // Canvas pixels, then a 1px border just outside them
    let cr = layout.canvas;
    let (cx, cy) = (device(cr.left, dpr), device(cr.top, dpr));
    if let Some(bitmap) = canvas {
        blit(screen, bitmap, cx, cy);
    }
    stroke_rect(
        screen,
        cx - 1,
        cy - 1,
        device(cr.width, dpr) + 2,
        device(cr.height, dpr) + 2,
        BORDER,
    );

    // Buttons
    draw_button(screen, &layout.clear_button, dpr, text_px, view.clear_label, DANGER_BG, DANGER_TEXT);
    let primary = if view.busy { PRIMARY_BUSY_BG } else { PRIMARY_BG };
    draw_button(screen, &layout.download_button, dpr, text_px, view.download_label, primary, PRIMARY_TEXT);
}

fn draw_button(
    fb: &mut FrameBuffer,
    rect: &ClientRect,
    dpr: f32,
    text_px: i32,
    label: &str,
    bg: u32,
    fg: u32,
) {
    let (x, y) = (device(rect.left, dpr), device(rect.top, dpr));
    let (w, h) = (device(rect.width, dpr), device(rect.height, dpr));
    fill_rect(fb, x, y, w, h, bg);

    // Center the label inside the button
    let tx = x + (w - text_width(label, text_px)) / 2;
    let ty = y + (h - 7 * text_px) / 2;
    draw_text_5x7(fb, tx, ty, label, fg, text_px);
}

#[inline]
fn device(css: f32, dpr: f32) -> i32 {
    (css * dpr).round() as i32
}

#[inline]
fn device_len(css: f32, dpr: f32) -> usize {
    (css * dpr).round().max(1.0) as usize
}

/* ---------- Software drawing: pixels, rectangles, blits ---------- */

/// Put a pixel on the framebuffer if (x,y) is inside bounds.
/// Visual: the exact pixel at (x,y) changes color.
#[inline]
fn put_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }
    let idx = y * fb.width + x;
    fb.pixels[idx] = color;
}

/// Solid rectangle, clipped to the framebuffer.
pub fn fill_rect(fb: &mut FrameBuffer, x: i32, y: i32, w: i32, h: i32, color: u32) {
    let x0 = x.max(0) as usize;
    let y0 = y.max(0) as usize;
    let x1 = (x + w).clamp(0, fb.width as i32) as usize;
    let y1 = (y + h).clamp(0, fb.height as i32) as usize;
    for row in y0..y1 {
        let ofs = row * fb.width;
        if x0 < x1 {
            fb.pixels[ofs + x0..ofs + x1].fill(color);
        }
    }
}

/// 1px rectangle outline.
pub fn stroke_rect(fb: &mut FrameBuffer, x: i32, y: i32, w: i32, h: i32, color: u32) {
    if w <= 0 || h <= 0 {
        return;
    }
    for i in 0..w {
        put_pixel(fb, x + i, y, color);
        put_pixel(fb, x + i, y + h - 1, color);
    }
    for j in 0..h {
        put_pixel(fb, x, y + j, color);
        put_pixel(fb, x + w - 1, y + j, color);
    }
}

/// Copy `src` into `dst` with its top-left corner at (x,y), clipped.
pub fn blit(dst: &mut FrameBuffer, src: &FrameBuffer, x: i32, y: i32) {
    for sy in 0..src.height {
        let dy = y + sy as i32;
        if dy < 0 || dy as usize >= dst.height {
            continue;
        }
        // Clip the row horizontally once, then copy the slice
        let sx0 = (-x).max(0) as usize;
        let dx0 = x.max(0) as usize;
        if sx0 >= src.width || dx0 >= dst.width {
            continue;
        }
        let n = (src.width - sx0).min(dst.width - dx0);
        let s = sy * src.width + sx0;
        let d = dy as usize * dst.width + dx0;
        dst.pixels[d..d + n].copy_from_slice(&src.pixels[s..s + n]);
    }
}

/* ---------- 5x7 bitmap font (uppercase, digits, a little punctuation) ---------- */

/// Return a 5x7 glyph bitmap. Lowercase letters share the uppercase glyphs.
/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    // Helper macro to define a glyph quickly
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch.to_ascii_uppercase() {
        // Digits 0..9
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'B' => g!(0b11110,0b10001,0b10001,0b11110,0b10001,0b10001,0b11110),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'G' => g!(0b01110,0b10001,0b10000,0b10111,0b10001,0b10001,0b01111),
        'H' => g!(0b10001,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'J' => g!(0b00111,0b00010,0b00010,0b00010,0b00010,0b10010,0b01100),
        'K' => g!(0b10001,0b10010,0b10100,0b11000,0b10100,0b10010,0b10001),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'M' => g!(0b10001,0b11011,0b10101,0b10101,0b10001,0b10001,0b10001),
        'N' => g!(0b10001,0b10001,0b11001,0b10101,0b10011,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'Q' => g!(0b01110,0b10001,0b10001,0b10001,0b10101,0b10010,0b01101),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'U' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'V' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b01010,0b00100),
        'W' => g!(0b10001,0b10001,0b10001,0b10101,0b10101,0b10101,0b01010),
        'X' => g!(0b10001,0b10001,0b01010,0b00100,0b01010,0b10001,0b10001),
        'Y' => g!(0b10001,0b10001,0b01010,0b00100,0b00100,0b00100,0b00100),
        'Z' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b10000,0b11111),

        // Punctuation: space, vertical bar, colon, dot
        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),

        _ => None,
    }
}

/// Width in pixels of `text` drawn at `scale` (no trailing gap).
pub fn text_width(text: &str, scale: i32) -> i32 {
    let n = text.chars().count() as i32;
    if n == 0 { 0 } else { n * 6 * scale - scale }
}

/// Draw a single 5x7 character at (x,y), each font pixel a `scale`×`scale` block.
fn draw_char_5x7(fb: &mut FrameBuffer, x: i32, y: i32, ch: char, color: u32, scale: i32) {
    if let Some(rows) = glyph5x7(ch) {
        for (ry, rowbits) in rows.iter().enumerate() {
            for rx in 0..5 {
                if (rowbits & (1 << (4 - rx))) != 0 {
                    fill_rect(fb, x + rx * scale, y + ry as i32 * scale, scale, scale, color);
                }
            }
        }
    }
}

/// Draw a text string using 5x7 glyphs.
/// Visual: each glyph is 5x7 font pixels with 1 font pixel of spacing.
pub fn draw_text_5x7(fb: &mut FrameBuffer, mut x: i32, y: i32, text: &str, color: u32, scale: i32) {
    for ch in text.chars() {
        draw_char_5x7(fb, x, y, ch, color, scale);
        x += 6 * scale; // 5 pixels glyph width + 1 pixel spacing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BLACK, WHITE};

    #[test]
    fn every_label_character_has_a_glyph() {
        for label in ["Draw and Download", "Clear", "Download Drawing", "Preparing Download..."] {
            for ch in label.chars() {
                assert!(glyph5x7(ch).is_some(), "missing glyph {ch:?}");
            }
        }
    }

    #[test]
    fn text_width_counts_cells() {
        assert_eq!(text_width("", 2), 0);
        assert_eq!(text_width("A", 1), 5);
        assert_eq!(text_width("AB", 2), 22);
    }

    #[test]
    fn blit_clips_at_edges() {
        let mut dst = FrameBuffer::filled(4, 4, WHITE);
        let src = FrameBuffer::filled(3, 3, BLACK);
        blit(&mut dst, &src, 2, -1);
        assert_eq!(dst.get(2, 0), Some(BLACK));
        assert_eq!(dst.get(3, 1), Some(BLACK));
        assert_eq!(dst.get(2, 2), Some(WHITE));
        assert_eq!(dst.get(1, 0), Some(WHITE));
    }

    #[test]
    fn compose_places_canvas_at_device_offset() {
        let layout = PageLayout::for_canvas(20.0, 10.0);
        let bitmap = FrameBuffer::filled(40, 20, BLACK);
        let mut screen = FrameBuffer::filled(1, 1, 0);
        let view = PageView { title: "T", clear_label: "C", download_label: "D", busy: false };

        compose_page(&mut screen, &layout, 2.0, Some(&bitmap), &view);

        assert_eq!(screen.width, (layout.width * 2.0) as usize);
        assert_eq!(screen.get(32, 96), Some(BLACK));
        assert_eq!(screen.get(31, 95), Some(BORDER));
        assert_eq!(screen.get(0, 0), Some(PAGE_BG));
    }
}
