// crates/showcut-core/src/frame.rs
//
// Packed RGB24 frame passed between the frame source, the resizer and the
// slice encoders. No ffmpeg types here so synthetic sources in tests can
// build frames directly.
//
// Layout: row-major, 3 bytes per pixel in R, G, B order, no row padding.
// `data.len() == width * height * 3` always holds.

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RgbFrame {
    pub width:  u32,
    pub height: u32,
    pub data:   Vec<u8>,
}

impl RgbFrame {
    /// Wrap an existing packed buffer. `None` if the length does not match.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        (data.len() == Self::byte_len(width, height)).then_some(Self { width, height, data })
    }

    /// Frame filled with one colour.
    pub fn solid(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let data = rgb.iter().copied().cycle().take(Self::byte_len(width, height)).collect();
        Self { width, height, data }
    }

    pub fn byte_len(width: u32, height: u32) -> usize {
        width as usize * height as usize * 3
    }

    pub fn row_bytes(&self) -> usize {
        self.width as usize * 3
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let i = (y as usize * self.width as usize + x as usize) * 3;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    /// Full-height column `[x, x + width)`.
    ///
    /// Returns `None` when the column does not fit inside the frame; callers
    /// check slice validity first, so this never clamps.
    pub fn crop(&self, x: u32, width: u32) -> Option<RgbFrame> {
        if width == 0 || x.checked_add(width)? > self.width {
            return None;
        }
        let src_row = self.row_bytes();
        let dst_row = width as usize * 3;
        let start   = x as usize * 3;
        let mut data = Vec::with_capacity(dst_row * self.height as usize);
        for row in self.data.chunks_exact(src_row) {
            data.extend_from_slice(&row[start..start + dst_row]);
        }
        Some(RgbFrame { width, height: self.height, data })
    }
}
