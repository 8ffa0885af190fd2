use std::path::PathBuf;

use crate::shared::frame::Frame;
use crate::shared::stream_metadata::StreamMetadata;

/// Where frames are captured from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CaptureSource {
    /// A live device opened through a named capture input format
    /// (`v4l2`, `avfoundation`, `dshow`, ...).
    Camera { device: String, format: String },
    /// A recorded video file, decoded through the regular demuxers.
    File(PathBuf),
}

impl std::fmt::Display for CaptureSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaptureSource::Camera { device, format } => write!(f, "camera {device} ({format})"),
            CaptureSource::File(path) => write!(f, "file {}", path.display()),
        }
    }
}

/// Produces frames from a camera or a recorded stream.
///
/// Implementations handle I/O details (device negotiation, codecs,
/// pixel formats) while the pipeline only sees RGB `Frame`s.
pub trait FrameSource: Send {
    /// Opens the source and returns its stream properties.
    fn open(
        &mut self,
        source: &CaptureSource,
    ) -> Result<StreamMetadata, Box<dyn std::error::Error>>;

    /// Returns an iterator over frames in capture order. Blocks until the
    /// next frame is available; ends when the stream does.
    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_>;

    /// Releases the device or file.
    fn close(&mut self);
}
