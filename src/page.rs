//! The host page: one canvas, a "Clear" button and a "Download Drawing" button.
//!
//! The page never draws strokes. It only asks the canvas for whole-bitmap
//! operations through a [`CanvasHandle`].

use std::path::PathBuf;

use crate::canvas::CanvasHandle;
use crate::error::Result;
use crate::export::{ExportedImage, SaveTarget};

pub const TITLE: &str = "Draw and Download";
pub const CLEAR_LABEL: &str = "Clear";
pub const DOWNLOAD_LABEL: &str = "Download Drawing";
pub const PREPARING_LABEL: &str = "Preparing Download...";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DownloadStatus {
    #[default]
    Ready,
    Preparing,
}

pub struct HostPage<T: SaveTarget> {
    canvas: CanvasHandle,
    target: T,
    status: DownloadStatus,
}

impl<T: SaveTarget> HostPage<T> {
    /// A page with no canvas attached yet; both actions are no-ops until
    /// [`attach`](Self::attach).
    pub fn new(target: T) -> Self {
        Self { canvas: CanvasHandle::detached(), target, status: DownloadStatus::Ready }
    }

    /// Point the page at a (new) canvas instance.
    pub fn attach(&mut self, canvas: CanvasHandle) {
        self.canvas = canvas;
    }

    /// Repaint the canvas blank. Returns `false`, doing nothing, when the
    /// canvas is unavailable.
    pub fn clear(&mut self) -> bool {
        let cleared = self.canvas.clear();
        if cleared {
            log::info!("canvas cleared");
        } else {
            log::debug!("clear skipped: canvas unavailable");
        }
        cleared
    }

    /// Encode the canvas as PNG and hand it to the save target under the
    /// fixed download name.
    ///
    /// `Ok(None)` when the canvas is unavailable. The status reads
    /// [`DownloadStatus::Preparing`] for the duration of the call and is
    /// back to `Ready` on every exit path.
    pub fn download(&mut self) -> Result<Option<PathBuf>> {
        self.download_with(|_| {})
    }

    /// [`download`](Self::download), calling `on_preparing` once the status
    /// reads `Preparing` and before encoding starts.
    pub fn download_with(&mut self, on_preparing: impl FnOnce(&Self)) -> Result<Option<PathBuf>> {
        if !self.canvas.is_available() {
            log::debug!("download skipped: canvas unavailable");
            return Ok(None);
        }

        self.status = DownloadStatus::Preparing;
        on_preparing(self);
        let result = self.export_and_save();
        self.status = DownloadStatus::Ready;

        match &result {
            Ok(Some(path)) => log::info!("download ready: {}", path.display()),
            Ok(None) => log::debug!("download skipped: canvas went away"),
            Err(e) => log::error!("download failed: {e}"),
        }
        result
    }

    fn export_and_save(&mut self) -> Result<Option<PathBuf>> {
        let Some(bytes) = self.canvas.export_png()? else {
            return Ok(None);
        };
        let path = self.target.save(&ExportedImage::png(bytes))?;
        Ok(Some(path))
    }

    pub fn status(&self) -> DownloadStatus {
        self.status
    }

    pub fn canvas(&self) -> &CanvasHandle {
        &self.canvas
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn title(&self) -> &'static str {
        TITLE
    }

    pub fn clear_label(&self) -> &'static str {
        CLEAR_LABEL
    }

    pub fn download_label(&self) -> &'static str {
        match self.status {
            DownloadStatus::Ready => DOWNLOAD_LABEL,
            DownloadStatus::Preparing => PREPARING_LABEL,
        }
    }
}
