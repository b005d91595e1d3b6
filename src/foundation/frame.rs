use crate::foundation::error::{RecolorError, RecolorResult};

/// Channel layout of an 8-bit [`ImageFrame`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum PixelFormat {
    /// Single channel.
    Gray8,
    /// Three channels, red first.
    Rgb8,
    /// Four channels, straight (non-premultiplied) alpha last.
    Rgba8,
}

impl PixelFormat {
    /// Number of interleaved channels per pixel.
    pub fn channels(self) -> usize {
        match self {
            Self::Gray8 => 1,
            Self::Rgb8 => 3,
            Self::Rgba8 => 4,
        }
    }

    /// Layout for a channel count, if supported.
    pub fn from_channels(channels: usize) -> Option<Self> {
        match channels {
            1 => Some(Self::Gray8),
            3 => Some(Self::Rgb8),
            4 => Some(Self::Rgba8),
            _ => None,
        }
    }
}

/// A host-resident 8-bit image, tightly packed and row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageFrame {
    width: u32,
    height: u32,
    format: PixelFormat,
    data: Vec<u8>,
}

impl ImageFrame {
    /// Wrap `data` as a `width`x`height` image in `format`.
    ///
    /// Fails when a dimension is zero or `data` does not hold exactly
    /// `width * height * channels` bytes.
    pub fn new(width: u32, height: u32, format: PixelFormat, data: Vec<u8>) -> RecolorResult<Self> {
        let expected = buffer_len(width, height, format)?;
        if data.len() != expected {
            return Err(RecolorError::contract(format!(
                "{format:?} frame {width}x{height} expects {expected} bytes, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            format,
            data,
        })
    }

    /// An image with every pixel set to `px`.
    ///
    /// `px` must have exactly `format.channels()` entries.
    pub fn filled(width: u32, height: u32, format: PixelFormat, px: &[u8]) -> RecolorResult<Self> {
        if px.len() != format.channels() {
            return Err(RecolorError::contract(format!(
                "fill pixel has {} channels, {format:?} needs {}",
                px.len(),
                format.channels()
            )));
        }
        let len = buffer_len(width, height, format)?;
        let data = px.repeat(len / format.channels());
        Self::new(width, height, format, data)
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Channel layout.
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Interleaved channel count.
    pub fn channels(&self) -> usize {
        self.format.channels()
    }

    /// Raw pixel bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw pixel bytes.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consume the frame, returning the pixel bytes.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        (self.width as usize) * self.channels()
    }

    /// Channels of the pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let c = self.channels();
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * c;
        self.data.get(idx..idx + c)
    }

    /// Convert a decoded image. Layouts other than L8/RGB8/RGBA8 are converted to RGBA8.
    pub fn from_dynamic(img: image::DynamicImage) -> RecolorResult<Self> {
        let (width, height) = (img.width(), img.height());
        match img {
            image::DynamicImage::ImageLuma8(buf) => {
                Self::new(width, height, PixelFormat::Gray8, buf.into_raw())
            }
            image::DynamicImage::ImageRgb8(buf) => {
                Self::new(width, height, PixelFormat::Rgb8, buf.into_raw())
            }
            image::DynamicImage::ImageRgba8(buf) => {
                Self::new(width, height, PixelFormat::Rgba8, buf.into_raw())
            }
            other => Self::new(width, height, PixelFormat::Rgba8, other.to_rgba8().into_raw()),
        }
    }

    /// Convert into an `image` buffer for encoding.
    pub fn into_dynamic(self) -> RecolorResult<image::DynamicImage> {
        let (w, h) = (self.width, self.height);
        let invalid = || RecolorError::contract("frame buffer does not match its dimensions");
        let img = match self.format {
            PixelFormat::Gray8 => image::DynamicImage::ImageLuma8(
                image::GrayImage::from_raw(w, h, self.data).ok_or_else(invalid)?,
            ),
            PixelFormat::Rgb8 => image::DynamicImage::ImageRgb8(
                image::RgbImage::from_raw(w, h, self.data).ok_or_else(invalid)?,
            ),
            PixelFormat::Rgba8 => image::DynamicImage::ImageRgba8(
                image::RgbaImage::from_raw(w, h, self.data).ok_or_else(invalid)?,
            ),
        };
        Ok(img)
    }

    /// Drop the alpha channel (RGBA8 to RGB8), or expand gray to RGB8.
    pub fn to_rgb8(&self) -> Self {
        let data = match self.format {
            PixelFormat::Rgb8 => self.data.clone(),
            PixelFormat::Rgba8 => self
                .data
                .chunks_exact(4)
                .flat_map(|px| [px[0], px[1], px[2]])
                .collect(),
            PixelFormat::Gray8 => self.data.iter().flat_map(|&g| [g, g, g]).collect(),
        };
        Self {
            width: self.width,
            height: self.height,
            format: PixelFormat::Rgb8,
            data,
        }
    }
}

fn buffer_len(width: u32, height: u32, format: PixelFormat) -> RecolorResult<usize> {
    if width == 0 || height == 0 {
        return Err(RecolorError::contract(format!(
            "frame dimensions must be non-zero, got {width}x{height}"
        )));
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(format.channels()))
        .ok_or_else(|| RecolorError::contract("frame buffer size overflow"))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/frame.rs"]
mod tests;
