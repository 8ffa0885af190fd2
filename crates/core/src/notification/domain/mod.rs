pub mod emotion_notifier;
