use std::path::Path;

use crate::{
    buffer::PixelBuffer,
    error::{TuneError, TuneResult},
};

/// Decodes a PNG into a 4-channel buffer, preserving alpha.
///
/// 3-channel sources are promoted to RGBA with an opaque alpha plane; any
/// other decoded channel count is rejected as an unsupported layout.
pub fn load_image(path: &Path) -> TuneResult<PixelBuffer> {
    let img = image::open(path)
        .map_err(|err| TuneError::decode(format!("load '{}': {err}", path.display())))?;

    match img.color().channel_count() {
        4 => {
            let rgba = img.to_rgba8();
            let (width, height) = rgba.dimensions();
            PixelBuffer::from_rgba(width, height, rgba.into_raw())
        }
        3 => {
            let rgb = img.to_rgb8();
            let (width, height) = rgb.dimensions();
            let mut data = Vec::with_capacity(width as usize * height as usize * 4);
            for px in rgb.as_raw().chunks_exact(3) {
                data.extend_from_slice(px);
                data.push(u8::MAX);
            }
            PixelBuffer::from_rgba(width, height, data)
        }
        channels => Err(TuneError::UnsupportedChannels { channels }),
    }
}

/// Encodes a buffer as PNG at `path`, overwriting any existing file.
pub fn save_image(path: &Path, buffer: &PixelBuffer) -> TuneResult<()> {
    if buffer.is_empty() {
        return Err(TuneError::encode("no image data to save"));
    }

    let (width, height) = (buffer.width(), buffer.height());
    match buffer.channels() {
        4 => {
            let img = image::RgbaImage::from_raw(width, height, buffer.data().to_vec())
                .ok_or_else(|| TuneError::encode("buffer does not match its dimensions"))?;
            img.save(path)
        }
        3 => {
            let img = image::RgbImage::from_raw(width, height, buffer.data().to_vec())
                .ok_or_else(|| TuneError::encode("buffer does not match its dimensions"))?;
            img.save(path)
        }
        channels => return Err(TuneError::UnsupportedChannels { channels }),
    }
    .map_err(|err| TuneError::encode(format!("write '{}': {err}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_rejects_empty_buffer() {
        let buf = PixelBuffer::from_rgba(0, 0, Vec::new()).unwrap();
        let err = save_image(Path::new("unused.png"), &buf).unwrap_err();
        assert!(matches!(err, TuneError::Encode(_)));
    }

    #[test]
    fn load_missing_path_is_decode_error() {
        let err = load_image(Path::new("definitely/not/here.png")).unwrap_err();
        assert!(matches!(err, TuneError::Decode(_)));
    }
}
