use crate::classification::domain::emotion::Prediction;
use crate::shared::frame::Frame;

/// Domain interface for emotion inference on a cropped color face.
///
/// `&mut self` because inference sessions hold mutable run state.
pub trait EmotionClassifier: Send {
    fn classify(&mut self, face: &Frame) -> Result<Prediction, Box<dyn std::error::Error>>;
}
