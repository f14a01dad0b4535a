// Desktop window that hosts the page.
// Visual: a resizable window showing the title, the white drawing box and
// the two buttons. The mouse draws inside the box.

use crate::error::{Error, Result};
use crate::input::MouseSample;
use crate::layout::PageLayout;
use crate::types::{FrameBuffer, Point};
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

pub struct PageWindow {
    window: Window, // the on-screen window you see
    dpr: f32,
}

impl PageWindow {
    /// Create a window big enough for `layout` at `dpr` device pixels per CSS pixel.
    /// Visual: a new empty window appears with your chosen title.
    pub fn new(title: &str, layout: &PageLayout, dpr: f32) -> Result<Self> {
        let width = (layout.width * dpr).round().max(1.0) as usize;
        let height = (layout.height * dpr).round().max(1.0) as usize;
        let options = WindowOptions { resize: true, ..WindowOptions::default() };
        let mut window = Window::new(title, width, height, options)
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        window.set_target_fps(60);
        log::info!("window opened: {width}x{height} px @ {dpr}");
        Ok(Self { window, dpr })
    }

    /// Push the pixels for this frame to the screen.
    /// Visual: the window immediately displays the new frame.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<()> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// True while ESC is held down (we'll exit when this is pressed).
    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    /// Keyboard shortcut for the Clear button.
    pub fn c_pressed_once(&self) -> bool {
        self.window.is_key_pressed(Key::C, KeyRepeat::No)
    }

    /// Keyboard shortcut for the Download button.
    pub fn s_pressed_once(&self) -> bool {
        self.window.is_key_pressed(Key::S, KeyRepeat::No)
    }

    /// Current window size in CSS pixels.
    pub fn css_size(&self) -> (f32, f32) {
        let (w, h) = self.window.get_size();
        (w as f32 / self.dpr, h as f32 / self.dpr)
    }

    /// Mouse position in CSS pixels (None outside the window) and button state.
    pub fn mouse_sample(&self) -> MouseSample {
        let pos = self
            .window
            .get_mouse_pos(MouseMode::Discard)
            .map(|(x, y)| Point::new(x / self.dpr, y / self.dpr));
        MouseSample { pos, left_down: self.window.get_mouse_down(MouseButton::Left) }
    }

    pub fn dpr(&self) -> f32 {
        self.dpr
    }
}
