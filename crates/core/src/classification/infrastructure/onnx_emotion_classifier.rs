//! Emotion classifier using ONNX Runtime via `ort`.
//!
//! Expects an NHWC float32 input `[1, S, S, 3]` in [0,1] and a single
//! output of per-label scores.
use std::path::Path;

use crate::classification::domain::emotion::Prediction;
use crate::classification::domain::emotion_classifier::EmotionClassifier;
use crate::classification::infrastructure::execution_provider::preferred_execution_providers;
use crate::classification::infrastructure::face_preprocessor::{preprocess, ChannelOrder};
use crate::shared::constants::CLASSIFIER_INPUT_SIZE;
use crate::shared::frame::Frame;

pub struct OnnxEmotionClassifier {
    session: ort::session::Session,
    input_size: u32,
    channel_order: ChannelOrder,
}

impl OnnxEmotionClassifier {
    /// Load an emotion model.
    ///
    /// The input resolution is read from the model's input shape
    /// (expecting NHWC). Falls back to 224 if the shape is dynamic.
    pub fn new(
        model_path: &Path,
        channel_order: ChannelOrder,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let session = ort::session::Session::builder()?
            .with_execution_providers(preferred_execution_providers())?
            .commit_from_file(model_path)?;

        let input_size = session
            .inputs()
            .first()
            .and_then(|input| {
                if let ort::value::ValueType::Tensor { ref shape, .. } = input.dtype() {
                    // [N, H, W, C]
                    if shape.len() == 4 && shape[1] > 0 {
                        Some(shape[1] as u32)
                    } else {
                        None
                    }
                } else {
                    None
                }
            })
            .unwrap_or(CLASSIFIER_INPUT_SIZE);

        log::debug!(
            "Loaded emotion model {} (input {input_size}x{input_size}, {channel_order})",
            model_path.display()
        );

        Ok(Self {
            session,
            input_size,
            channel_order,
        })
    }
}

impl EmotionClassifier for OnnxEmotionClassifier {
    fn classify(&mut self, face: &Frame) -> Result<Prediction, Box<dyn std::error::Error>> {
        if face.is_empty() {
            return Err("Cannot classify an empty face crop".into());
        }

        let input_tensor = preprocess(face, self.input_size, self.channel_order)?;
        let input_value = ort::value::Tensor::from_array(input_tensor)?;
        let outputs = self.session.run(ort::inputs![input_value])?;
        if outputs.len() == 0 {
            return Err("Emotion model produced no outputs".into());
        }

        let scores = outputs[0].try_extract_array::<f32>()?;
        let scores: Vec<f32> = scores.iter().copied().collect();
        Ok(Prediction::from_scores(scores)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_model_is_error() {
        let result = OnnxEmotionClassifier::new(
            Path::new("/nonexistent/emotiondetector.onnx"),
            ChannelOrder::Bgr,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_garbage_model_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("model.onnx");
        fs::write(&path, b"not an onnx graph").unwrap();
        assert!(OnnxEmotionClassifier::new(&path, ChannelOrder::Rgb).is_err());
    }
}
