//! Fitting an arbitrary-sized image onto the fixed flag canvas.
//!
//! Flags are tiny (20×14 by default, up to 48×32), so resampling always
//! goes through a Lanczos filter; nearest-neighbor aliases badly at these
//! sizes.

use std::str::FromStr;

use image::imageops::{self, FilterType};

use crate::{error::Error, grid::PixelGrid};

/// How an imported image is mapped onto the flag canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FitMode {
    /// Resize to exactly the target size. Aspect ratio is not preserved.
    #[default]
    Stretch,

    /// Scale to fit inside the target, preserving aspect ratio, centered on
    /// an opaque black canvas.
    Pad,
}

impl FromStr for FitMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "stretch" => Ok(FitMode::Stretch),
            "pad" => Ok(FitMode::Pad),
            _ => Err(Error::InvalidImage(format!("unrecognized fit mode {s:?}"))),
        }
    }
}

/// Fit a source grid onto a `target_width` × `target_height` canvas.
///
/// The output is always exactly the target size, for either mode. An empty
/// source or a zero target dimension is an [`Error::InvalidImage`].
pub fn fit(
    source: &PixelGrid,
    target_width: u32,
    target_height: u32,
    mode: FitMode,
) -> Result<PixelGrid, Error> {
    if source.is_empty() {
        return Err(Error::InvalidImage("source image has no pixels".into()));
    }
    if target_width == 0 || target_height == 0 {
        return Err(Error::InvalidImage(format!(
            "invalid target size {target_width}x{target_height}"
        )));
    }

    match mode {
        FitMode::Stretch => Ok(resample(source, target_width, target_height)),
        FitMode::Pad => {
            let scale = f64::min(
                target_width as f64 / source.width() as f64,
                target_height as f64 / source.height() as f64,
            );
            let scaled_width = ((source.width() as f64 * scale).round() as u32)
                .clamp(1, target_width);
            let scaled_height = ((source.height() as f64 * scale).round() as u32)
                .clamp(1, target_height);
            let scaled = resample(source, scaled_width, scaled_height);

            // Integer centering; odd slack lands on the trailing edge.
            let offset_x = (target_width - scaled_width) / 2;
            let offset_y = (target_height - scaled_height) / 2;

            let mut canvas = PixelGrid::new(target_width, target_height);
            for y in 0..scaled_height {
                for x in 0..scaled_width {
                    canvas.set_pixel(offset_x + x, offset_y + y, scaled.pixel(x, y));
                }
            }

            Ok(canvas)
        }
    }
}

fn resample(source: &PixelGrid, width: u32, height: u32) -> PixelGrid {
    if source.width() == width && source.height() == height {
        return source.clone();
    }

    let resized = imageops::resize(&source.to_image(), width, height, FilterType::Lanczos3);
    PixelGrid::from_image(&resized)
}
