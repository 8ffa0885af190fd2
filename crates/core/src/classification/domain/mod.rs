pub mod emotion;
pub mod emotion_classifier;
