use ndarray::ArrayView3;

use crate::shared::region::Region;

// BT.601 luma weights in 14-bit fixed point (sum = 1 << 14).
const LUMA_R: u32 = 4899;
const LUMA_G: u32 = 9617;
const LUMA_B: u32 = 1868;
const LUMA_SHIFT: u32 = 14;

/// A single captured frame: contiguous RGB bytes in row-major order.
///
/// Format conversion happens at I/O boundaries only; the domain layer
/// treats pixel data as opaque.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
            index,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
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

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Frame data length must match dimensions")
    }

    /// Single-channel luma plane, one byte per pixel.
    ///
    /// Weights match OpenCV's `COLOR_RGB2GRAY` so cascades trained there
    /// see the same intensities. Two-channel frames are gray + alpha; the
    /// alpha byte is dropped. Extra channels beyond RGB are ignored.
    pub fn to_grayscale(&self) -> Vec<u8> {
        let step = self.channels as usize;
        match step {
            0 => Vec::new(),
            1 => self.data.clone(),
            2 => self.data.chunks_exact(step).map(|px| px[0]).collect(),
            _ => self
                .data
                .chunks_exact(step)
                .map(|px| {
                    let y = px[0] as u32 * LUMA_R
                        + px[1] as u32 * LUMA_G
                        + px[2] as u32 * LUMA_B
                        + (1 << (LUMA_SHIFT - 1));
                    (y >> LUMA_SHIFT) as u8
                })
                .collect(),
        }
    }

    /// Copies the pixels under `region` into a new frame.
    ///
    /// The region is clamped to the frame first; returns `None` when
    /// nothing of it lies inside the frame.
    pub fn crop(&self, region: &Region) -> Option<Frame> {
        let r = region.clamp_to(self.width, self.height)?;
        let step = self.channels as usize;
        let row_len = r.width as usize * step;
        let mut data = Vec::with_capacity(row_len * r.height as usize);
        for row in r.y as usize..(r.y + r.height) as usize {
            let start = (row * self.width as usize + r.x as usize) * step;
            data.extend_from_slice(&self.data[start..start + row_len]);
        }
        Some(Frame::new(
            data,
            r.width as u32,
            r.height as u32,
            self.channels,
            self.index,
        ))
    }

    fn shape(&self) -> (usize, usize, usize) {
        (
            self.height as usize,
            self.width as usize,
            self.channels as usize,
        )
    }
}
