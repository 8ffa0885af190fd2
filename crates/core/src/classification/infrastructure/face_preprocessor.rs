use serde::{Deserialize, Serialize};

use crate::classification::domain::emotion::ClassifyError;
use crate::shared::frame::Frame;

/// Channel order the classifier network was trained on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelOrder {
    Rgb,
    /// OpenCV's native pixel order.
    #[default]
    Bgr,
}

impl std::str::FromStr for ChannelOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rgb" => Ok(ChannelOrder::Rgb),
            "bgr" => Ok(ChannelOrder::Bgr),
            other => Err(format!("channel order must be 'rgb' or 'bgr', got '{other}'")),
        }
    }
}

impl std::fmt::Display for ChannelOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChannelOrder::Rgb => write!(f, "rgb"),
            ChannelOrder::Bgr => write!(f, "bgr"),
        }
    }
}

/// Resize an RGB face crop to `size x size` and normalize to [0,1] NHWC
/// float32, emitting channels in `order`.
///
/// Gray (and gray + alpha) crops are replicated into all three channels.
/// Bilinear sampling uses half-pixel centres with edge clamping, the same
/// convention as OpenCV's `INTER_LINEAR`.
pub fn preprocess(
    face: &Frame,
    size: u32,
    order: ChannelOrder,
) -> Result<ndarray::Array4<f32>, ClassifyError> {
    let channel_map: [usize; 3] = match (face.channels(), order) {
        (0, _) => return Err(ClassifyError::UnsupportedChannels(0)),
        (1 | 2, _) => [0, 0, 0],
        (_, ChannelOrder::Rgb) => [0, 1, 2],
        (_, ChannelOrder::Bgr) => [2, 1, 0],
    };

    let s = size as usize;
    let mut tensor = ndarray::Array4::<f32>::zeros((1, s, s, 3));
    if face.is_empty() || s == 0 {
        return Ok(tensor);
    }

    let src = face.as_ndarray();
    let src_h = face.height() as usize;
    let src_w = face.width() as usize;
    let ys = sample_axis(src_h, s);
    let xs = sample_axis(src_w, s);

    for (y, &(y0, y1, fy)) in ys.iter().enumerate() {
        for (x, &(x0, x1, fx)) in xs.iter().enumerate() {
            for (dst_c, &src_c) in channel_map.iter().enumerate() {
                let top = lerp(src[[y0, x0, src_c]], src[[y0, x1, src_c]], fx);
                let bottom = lerp(src[[y1, x0, src_c]], src[[y1, x1, src_c]], fx);
                tensor[[0, y, x, dst_c]] = lerp_f(top, bottom, fy) / 255.0;
            }
        }
    }

    Ok(tensor)
}

/// For each destination index: (lower source index, upper source index,
/// weight of the upper one).
fn sample_axis(src_len: usize, dst_len: usize) -> Vec<(usize, usize, f32)> {
    let scale = src_len as f64 / dst_len as f64;
    let last = src_len - 1;
    (0..dst_len)
        .map(|d| {
            let pos = ((d as f64 + 0.5) * scale - 0.5).max(0.0);
            let lo = (pos.floor() as usize).min(last);
            let hi = (lo + 1).min(last);
            let frac = if lo == last { 0.0 } else { (pos - lo as f64) as f32 };
            (lo, hi, frac)
        })
        .collect()
}

fn lerp(a: u8, b: u8, t: f32) -> f32 {
    lerp_f(a as f32, b as f32, t)
}

fn lerp_f(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
