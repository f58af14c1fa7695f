//! Image loading and encoding.
//!
//! The extraction core treats the photograph as an opaque base64
//! payload; this module is where bytes become that payload. The file is
//! format-sniffed before encoding so a bad path fails here with a clear
//! message instead of deep inside an oracle round.

use crate::error::{CliError, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use gantry_domain::ImageData;
use image::ImageFormat;
use std::fs;
use std::path::Path;

/// Read, validate, and base64-encode a photograph.
pub fn load_image(path: &Path) -> Result<ImageData> {
    let bytes = fs::read(path)?;

    let format = image::guess_format(&bytes)
        .map_err(|e| CliError::InvalidImage(format!("{}: {}", path.display(), e)))?;

    let media_type = match format {
        ImageFormat::Jpeg => "image/jpeg",
        ImageFormat::Png => "image/png",
        ImageFormat::WebP => "image/webp",
        ImageFormat::Gif => "image/gif",
        other => {
            return Err(CliError::InvalidImage(format!(
                "{}: unsupported format {:?}",
                path.display(),
                other
            )))
        }
    };

    Ok(ImageData::new(media_type, STANDARD.encode(&bytes)))
}
