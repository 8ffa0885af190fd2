pub mod detect_first_emotion_use_case;
pub mod pipeline_logger;
