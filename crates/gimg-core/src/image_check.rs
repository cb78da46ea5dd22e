//! Image header probing, resolution bounds, and save-format conversion.
//!
//! Only the header is decoded to check dimensions; a full decode happens
//! only when the saved format differs from the downloaded one.

use anyhow::{Context, Result};
use image::{ImageFormat, ImageReader};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Cursor;
use std::str::FromStr;

use crate::error::ScrapeError;

/// Largest accepted value on either axis when parsing a resolution.
pub const MAX_AXIS: u32 = 10_000;

/// Width x height in pixels. Serialized as `"WIDTHxHEIGHT"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Resolution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || format!("invalid resolution {:?}, expected WIDTHxHEIGHT", s);
        let (w, h) = s.trim().split_once(['x', 'X']).ok_or_else(bad)?;
        let width: u32 = w.trim().parse().map_err(|_| bad())?;
        let height: u32 = h.trim().parse().map_err(|_| bad())?;
        if width > MAX_AXIS || height > MAX_AXIS {
            return Err(format!("resolution {} is unreasonably large", s.trim()));
        }
        Ok(Self { width, height })
    }
}

impl TryFrom<String> for Resolution {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Resolution> for String {
    fn from(r: Resolution) -> Self {
        r.to_string()
    }
}

/// Inclusive bounds on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolutionBounds {
    pub min: Resolution,
    pub max: Resolution,
}

impl ResolutionBounds {
    pub const fn new(min: Resolution, max: Resolution) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, r: Resolution) -> bool {
        (self.min.width..=self.max.width).contains(&r.width)
            && (self.min.height..=self.max.height).contains(&r.height)
    }

    pub fn check(&self, r: Resolution) -> Result<(), ScrapeError> {
        if self.contains(r) {
            Ok(())
        } else {
            Err(ScrapeError::InvalidResolution {
                actual: r,
                bounds: *self,
            })
        }
    }
}

/// Format and dimensions read from an image header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbedImage {
    pub format: ImageFormat,
    pub resolution: Resolution,
}

/// Reads format and dimensions without decoding pixel data.
pub fn probe(bytes: &[u8]) -> Result<ProbedImage> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .context("read image header")?;
    let format = reader
        .format()
        .ok_or_else(|| anyhow::anyhow!("unrecognized image format"))?;
    let (width, height) = reader.into_dimensions().context("decode image dimensions")?;
    Ok(ProbedImage {
        format,
        resolution: Resolution::new(width, height),
    })
}

/// Format images are written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveFormat {
    #[default]
    Jpg,
    Jpeg,
    Png,
    /// Keep whatever format the server sent.
    Original,
}

impl SaveFormat {
    fn target(self) -> Option<(ImageFormat, &'static str)> {
        match self {
            SaveFormat::Jpg => Some((ImageFormat::Jpeg, "jpg")),
            SaveFormat::Jpeg => Some((ImageFormat::Jpeg, "jpeg")),
            SaveFormat::Png => Some((ImageFormat::Png, "png")),
            SaveFormat::Original => None,
        }
    }
}

impl FromStr for SaveFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jpg" => Ok(SaveFormat::Jpg),
            "jpeg" => Ok(SaveFormat::Jpeg),
            "png" => Ok(SaveFormat::Png),
            "original" => Ok(SaveFormat::Original),
            other => Err(format!(
                "unsupported save format {:?} (jpg, jpeg, png, original)",
                other
            )),
        }
    }
}

fn extension_of(format: ImageFormat) -> &'static str {
    format.extensions_str().first().copied().unwrap_or("img")
}

/// Produces the bytes to write and the file extension for `format`.
///
/// Bytes pass through untouched when the downloaded format already matches;
/// otherwise the image is decoded, flattened to RGB and re-encoded.
pub fn encode_for_save(
    bytes: &[u8],
    probed: &ProbedImage,
    format: SaveFormat,
) -> Result<(Vec<u8>, &'static str)> {
    let Some((target, ext)) = format.target() else {
        return Ok((bytes.to_vec(), extension_of(probed.format)));
    };
    if probed.format == target {
        return Ok((bytes.to_vec(), ext));
    }

    let decoded = image::load_from_memory_with_format(bytes, probed.format)
        .with_context(|| format!("decode {:?} image", probed.format))?;
    let rgb = image::DynamicImage::ImageRgb8(decoded.to_rgb8());
    let mut out = Cursor::new(Vec::new());
    rgb.write_to(&mut out, target)
        .with_context(|| format!("encode {:?}", target))?;
    Ok((out.into_inner(), ext))
}
