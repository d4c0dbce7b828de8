use crate::error::{TuneError, TuneResult};

/// Row-major 8-bit raster. Channel order at the API boundary is RGB(A).
///
/// The codec always hands out 4-channel buffers (3-channel sources are
/// promoted on load), but 3-channel buffers remain representable so the
/// operations' no-alpha no-op contract stays testable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    channels: u8,
    data: Vec<u8>,
}

impl PixelBuffer {
    pub fn from_raw(width: u32, height: u32, channels: u8, data: Vec<u8>) -> TuneResult<Self> {
        if channels != 3 && channels != 4 {
            return Err(TuneError::UnsupportedChannels { channels });
        }
        let expected = width as usize * height as usize * channels as usize;
        if data.len() != expected {
            return Err(TuneError::decode(format!(
                "buffer length {} does not match {width}x{height}x{channels}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> TuneResult<Self> {
        Self::from_raw(width, height, 4, data)
    }

    /// Solid-color RGBA buffer.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let px = width as usize * height as usize;
        let mut data = Vec::with_capacity(px * 4);
        for _ in 0..px {
            data.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            channels: 4,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn has_alpha(&self) -> bool {
        self.channels == 4
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Alpha bytes in row-major order. Empty iterator for 3-channel buffers.
    pub fn alphas(&self) -> impl Iterator<Item = u8> + '_ {
        let stride = self.channels as usize;
        self.data
            .chunks_exact(stride)
            .filter(move |_| stride == 4)
            .map(|px| px[3])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_rejects_bad_length() {
        assert!(PixelBuffer::from_rgba(2, 2, vec![0u8; 15]).is_err());
        assert!(PixelBuffer::from_rgba(2, 2, vec![0u8; 16]).is_ok());
    }

    #[test]
    fn from_raw_rejects_odd_channel_counts() {
        let err = PixelBuffer::from_raw(1, 1, 2, vec![0u8; 2]).unwrap_err();
        assert!(matches!(
            err,
            crate::TuneError::UnsupportedChannels { channels: 2 }
        ));
    }

    #[test]
    fn filled_writes_every_pixel() {
        let buf = PixelBuffer::filled(3, 2, [1, 2, 3, 4]);
        assert_eq!(buf.data().len(), 3 * 2 * 4);
        for px in buf.data().chunks_exact(4) {
            assert_eq!(px, [1, 2, 3, 4]);
        }
    }

    #[test]
    fn alphas_yields_fourth_channel_only() {
        let buf = PixelBuffer::from_rgba(2, 1, vec![9, 9, 9, 10, 9, 9, 9, 20]).unwrap();
        assert_eq!(buf.alphas().collect::<Vec<_>>(), vec![10, 20]);

        let rgb = PixelBuffer::from_raw(2, 1, 3, vec![9; 6]).unwrap();
        assert_eq!(rgb.alphas().count(), 0);
    }
}
