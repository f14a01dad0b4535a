//! Command-line configuration.

use std::path::PathBuf;

use clap::Parser;

use crate::canvas::ResizePolicy;
use crate::error::{Error, Result};

#[derive(Parser, Debug, Clone)]
#[command(name = "sketchpad", version, about = "Draw with the mouse, clear, and download the drawing as PNG")]
pub struct Args {
    /// Canvas width in CSS pixels
    #[arg(long, default_value_t = 448.0)]
    pub width: f32,

    /// Canvas height in CSS pixels
    #[arg(long, default_value_t = 256.0)]
    pub height: f32,

    /// Device pixels per CSS pixel
    #[arg(long, default_value_t = 1.0)]
    pub dpr: f32,

    /// Folder that receives drawing.png
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Redraw existing strokes after a window resize instead of blanking
    #[arg(long)]
    pub replay_on_resize: bool,
}

/// Validated settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub dpr: f32,
    pub out_dir: PathBuf,
    pub policy: ResizePolicy,
}

impl TryFrom<Args> for Config {
    type Error = Error;

    fn try_from(args: Args) -> Result<Self> {
        if !(args.dpr.is_finite() && args.dpr > 0.0) {
            return Err(Error::Config(format!("dpr must be a positive number, got {}", args.dpr)));
        }
        for (name, v) in [("width", args.width), ("height", args.height)] {
            if !(v.is_finite() && v >= 1.0) {
                return Err(Error::Config(format!("{name} must be at least 1, got {v}")));
            }
        }
        Ok(Self {
            canvas_width: args.width,
            canvas_height: args.height,
            dpr: args.dpr,
            out_dir: args.out_dir,
            policy: if args.replay_on_resize { ResizePolicy::Replay } else { ResizePolicy::Discard },
        })
    }
}
