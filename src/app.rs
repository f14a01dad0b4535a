// The page's main loop.
// What you SEE:
// • A window titled "Draw and Download" with a white drawing box.
// • Hold Left Mouse inside the box: a black 2px line follows the mouse.
// • "Clear" (or C) blanks the box. "Download Drawing" (or S) writes drawing.png.
// • Resizing the window resizes the box (blank again unless --replay-on-resize). ESC quits.

use std::cell::RefCell;

use crate::canvas::{CanvasHandle, DrawingCanvas};
use crate::config::Config;
use crate::draw::{compose_page, PageView, PAGE_BG};
use crate::error::Result;
use crate::events::{Dispatcher, InputEvent};
use crate::export::DirectoryTarget;
use crate::input::{PageAction, PointerTracker};
use crate::layout::PageLayout;
use crate::page::HostPage;
use crate::types::FrameBuffer;
use crate::window::PageWindow;

pub fn run(config: Config) -> Result<()> {
    let dpr = config.dpr;
    let mut layout = PageLayout::for_canvas(config.canvas_width, config.canvas_height);

    /* --- Canvas: mounted, listening, and shared with the page ---
       Visual: the box starts out white. */
    let canvas = DrawingCanvas::mount(layout.canvas, dpr, config.policy);
    let dispatcher = Dispatcher::new();
    let _listening = DrawingCanvas::attach(&canvas, &dispatcher);

    let mut page = HostPage::new(DirectoryTarget::new(&config.out_dir));
    page.attach(CanvasHandle::new(&canvas));

    let mut window = PageWindow::new(page.title(), &layout, dpr)?;
    let mut tracker = PointerTracker::new();
    let mut screen = FrameBuffer::filled(1, 1, PAGE_BG);

    /* ------------------------------ Main loop ------------------------------ */
    while window.is_open() && !window.esc_pressed() {
        /* 1) Window resized? Lay the page out again and tell the canvas. */
        let (w, h) = window.css_size();
        if (w, h) != (layout.width, layout.height) {
            layout = PageLayout::for_window(w, h);
            dispatcher.dispatch(&InputEvent::Resize { rect: layout.canvas, dpr });
        }

        /* 2) Mouse → canvas events / button presses */
        let mut clear = window.c_pressed_once();
        let mut download = window.s_pressed_once();
        for action in tracker.update(window.mouse_sample(), &layout) {
            match action {
                PageAction::Canvas(event) => {
                    dispatcher.dispatch(&event);
                }
                PageAction::Clear => clear = true,
                PageAction::Download => download = true,
            }
        }

        if clear {
            page.clear();
        }
        if download {
            // Show the busy label for one frame while the PNG is prepared.
            let result = page.download_with(|p| {
                render(&mut screen, &layout, dpr, &canvas, &PageView::from(p));
                if let Err(e) = window.present(&screen) {
                    log::warn!("could not show download status: {e}");
                }
            });
            // A failed save must not close the window.
            if let Err(e) = result {
                log::warn!("continuing after failed download: {e}");
            }
        }

        /* 3) Compose and present */
        render(&mut screen, &layout, dpr, &canvas, &PageView::from(&page));
        window.present(&screen)?;
    }

    log::info!("window closed");
    Ok(())
}

fn render(
    screen: &mut FrameBuffer,
    layout: &PageLayout,
    dpr: f32,
    canvas: &RefCell<DrawingCanvas>,
    view: &PageView<'_>,
) {
    let canvas = canvas.borrow();
    compose_page(screen, layout, dpr, canvas.surface().map(|s| s.frame()), view);
}
