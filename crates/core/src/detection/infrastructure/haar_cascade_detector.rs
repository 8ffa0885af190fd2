//! Haar cascade face detector using OpenCV's `CascadeClassifier`.
//!
//! Runs on the gray-scale plane of each frame. No tracking; regions come
//! back in the classifier's order.
use std::path::Path;

use opencv::core::{Mat, Rect, Size, Vector};
use opencv::objdetect::CascadeClassifier;
use opencv::prelude::*;

use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::constants::{
    DEFAULT_MIN_FACE_SIZE, DEFAULT_MIN_NEIGHBORS, DEFAULT_SCALE_FACTOR,
};
use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// `detectMultiScale` tuning.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CascadeParams {
    /// Image pyramid step; must be > 1.0.
    pub scale_factor: f64,
    /// Neighbouring hits needed to keep a candidate.
    pub min_neighbors: i32,
    /// Smallest face side length in pixels.
    pub min_size: i32,
}

impl Default for CascadeParams {
    fn default() -> Self {
        Self {
            scale_factor: DEFAULT_SCALE_FACTOR,
            min_neighbors: DEFAULT_MIN_NEIGHBORS,
            min_size: DEFAULT_MIN_FACE_SIZE,
        }
    }
}

pub struct HaarCascadeDetector {
    classifier: CascadeClassifier,
    params: CascadeParams,
}

impl HaarCascadeDetector {
    /// Load a cascade XML file.
    ///
    /// OpenCV silently yields an empty classifier for unreadable files, so
    /// both a missing file and an empty classifier are reported as errors.
    pub fn new(cascade_path: &Path, params: CascadeParams) -> Result<Self, Box<dyn std::error::Error>> {
        if !cascade_path.is_file() {
            return Err(format!("Haar cascade not found: {}", cascade_path.display()).into());
        }
        let path = cascade_path
            .to_str()
            .ok_or_else(|| format!("Haar cascade path is not UTF-8: {}", cascade_path.display()))?;

        let classifier = CascadeClassifier::new(path)?;
        if classifier.empty()? {
            return Err(format!("Haar cascade is empty: {}", cascade_path.display()).into());
        }

        Ok(Self { classifier, params })
    }
}

impl FaceDetector for HaarCascadeDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Region>, Box<dyn std::error::Error>> {
        if frame.is_empty() {
            return Ok(Vec::new());
        }

        let gray = gray_plane(frame)?;
        let mat = Mat::from_slice(&gray)?;
        let mat = mat.reshape(1, frame.height() as i32)?;

        let mut faces = Vector::<Rect>::new();
        self.classifier.detect_multi_scale(
            &mat,
            &mut faces,
            self.params.scale_factor,
            self.params.min_neighbors,
            0,
            Size::new(self.params.min_size, self.params.min_size),
            Size::new(0, 0),
        )?;

        Ok(faces
            .iter()
            .map(|r| Region::new(r.x, r.y, r.width, r.height))
            .collect())
    }
}

/// One luma byte per pixel, or an error for frames without pixel data.
fn gray_plane(frame: &Frame) -> Result<Vec<u8>, String> {
    let gray = frame.to_grayscale();
    let expected = frame.width() as usize * frame.height() as usize;
    if gray.len() != expected {
        return Err(format!(
            "cannot detect faces in a {}-channel frame",
            frame.channels()
        ));
    }
    Ok(gray)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::constants::DEFAULT_CASCADE_PATH;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_params() {
        let p = CascadeParams::default();
        assert_eq!(p.scale_factor, 1.1);
        assert_eq!(p.min_neighbors, 5);
        assert_eq!(p.min_size, 30);
    }

    #[test]
    fn test_missing_cascade_is_error() {
        let result = HaarCascadeDetector::new(
            Path::new("/nonexistent/haarcascade.xml"),
            CascadeParams::default(),
        );
        let err = result.err().unwrap();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_invalid_cascade_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("broken.xml");
        fs::write(&path, "<opencv_storage></opencv_storage>").unwrap();
        assert!(HaarCascadeDetector::new(&path, CascadeParams::default()).is_err());
    }

    #[test]
    fn test_gray_plane_accepts_gray_and_color() {
        let gray = Frame::new(vec![7; 6], 3, 2, 1, 0);
        assert_eq!(gray_plane(&gray).unwrap(), vec![7; 6]);
        let color = Frame::new(vec![255; 18], 3, 2, 3, 0);
        assert_eq!(gray_plane(&color).unwrap(), vec![255; 6]);
    }

    #[test]
    fn test_gray_plane_rejects_frame_without_channels() {
        let frame = Frame::new(Vec::new(), 3, 2, 0, 0);
        let err = gray_plane(&frame).unwrap_err();
        assert!(err.contains("0-channel"));
    }

    #[test]
    #[ignore = "needs OpenCV's haarcascade_frontalface_default.xml at the platform default path"]
    fn test_blank_frame_has_no_faces() {
        let path = Path::new(DEFAULT_CASCADE_PATH);
        let mut detector = HaarCascadeDetector::new(path, CascadeParams::default()).unwrap();
        let frame = Frame::new(vec![128; 160 * 120 * 3], 160, 120, 3, 0);
        assert!(detector.detect(&frame).unwrap().is_empty());

        let empty = Frame::new(Vec::new(), 0, 0, 3, 1);
        assert!(detector.detect(&empty).unwrap().is_empty());
    }
}
