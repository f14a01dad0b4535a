// Turns the bitmap into a PNG file the user can keep.
// Visual: after "Download Drawing", drawing.png appears in the output folder
// and looks exactly like the canvas box.

use std::fs;
use std::path::{Path, PathBuf};

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use crate::error::{Error, Result};
use crate::types::{unpack_rgb, FrameBuffer};

/// Fixed name of the downloaded file.
pub const DOWNLOAD_FILENAME: &str = "drawing.png";

/// Encode a 0x00RRGGBB framebuffer as an 8-bit RGB PNG.
pub fn encode_png(fb: &FrameBuffer) -> Result<Vec<u8>> {
    let width = u32::try_from(fb.width).map_err(|_| Error::Encode("width too large".into()))?;
    let height = u32::try_from(fb.height).map_err(|_| Error::Encode("height too large".into()))?;
    if fb.pixels.len() != fb.width * fb.height {
        return Err(Error::Encode(format!(
            "buffer holds {} pixels, expected {}x{}",
            fb.pixels.len(),
            fb.width,
            fb.height
        )));
    }

    // Unpack to tightly packed RGB bytes (what the PNG encoder expects).
    let mut rgb = Vec::with_capacity(fb.pixels.len() * 3);
    for &px in &fb.pixels {
        let (r, g, b) = unpack_rgb(px);
        rgb.extend_from_slice(&[r, g, b]);
    }

    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes).write_image(&rgb, width, height, ExtendedColorType::Rgb8)?;
    log::debug!("encoded {}x{} png, {} bytes", fb.width, fb.height, bytes.len());
    Ok(bytes)
}

/// One-shot encoded snapshot handed to a [`SaveTarget`].
#[derive(Clone, Debug, PartialEq)]
pub struct ExportedImage {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl ExportedImage {
    pub fn png(bytes: Vec<u8>) -> Self {
        Self { filename: DOWNLOAD_FILENAME.to_string(), bytes }
    }
}

/// "Save this in-memory file for the user."
pub trait SaveTarget {
    /// Persist `image` and report where it went.
    fn save(&mut self, image: &ExportedImage) -> Result<PathBuf>;
}

/// Writes downloads into a folder, overwriting any previous file of the same name.
#[derive(Clone, Debug)]
pub struct DirectoryTarget {
    dir: PathBuf,
}

impl DirectoryTarget {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl SaveTarget for DirectoryTarget {
    fn save(&mut self, image: &ExportedImage) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(&image.filename);
        fs::write(&path, &image.bytes)?;
        log::info!("saved {} ({} bytes)", path.display(), image.bytes.len());
        Ok(path)
    }
}

/// Keeps every download in memory; handy for embedding and tests.
#[derive(Clone, Debug, Default)]
pub struct MemoryTarget {
    pub saved: Vec<ExportedImage>,
}

impl SaveTarget for MemoryTarget {
    fn save(&mut self, image: &ExportedImage) -> Result<PathBuf> {
        self.saved.push(image.clone());
        Ok(PathBuf::from(&image.filename))
    }
}
