pub mod execution_provider;
pub mod face_preprocessor;
pub mod onnx_emotion_classifier;
