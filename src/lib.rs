//! A freehand drawing page: a raster canvas you draw on with the mouse (or
//! touch events), plus "Clear" and "Download Drawing" actions that export
//! the bitmap as `drawing.png`.
//!
//! The drawing core (`canvas`, `raster`, `events`, `page`, `export`) runs
//! headless; `window` and `app` put it on screen with `minifb`.

pub mod app;
pub mod canvas;
pub mod config;
pub mod draw;
pub mod error;
pub mod events;
pub mod export;
pub mod input;
pub mod layout;
pub mod page;
pub mod raster;
pub mod types;
pub mod window;

pub use canvas::{CanvasHandle, DrawingCanvas, ResizePolicy, StrokeState};
pub use error::{Error, Result};
pub use page::{DownloadStatus, HostPage};
