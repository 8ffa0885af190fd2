use crate::classification::domain::emotion::Emotion;

/// Reports a detected emotion to the outside world.
///
/// Returns the receiver's acknowledgement text. No retries: the caller
/// decides what a failure means.
pub trait EmotionNotifier: Send {
    fn notify(&self, emotion: Emotion) -> Result<String, Box<dyn std::error::Error>>;
}
