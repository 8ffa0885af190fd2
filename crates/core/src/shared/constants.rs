#[cfg(not(target_os = "windows"))]
pub const DEFAULT_MODEL_PATH: &str = "/app/backend/face_emotion_detection/emotiondetector.onnx";
#[cfg(target_os = "windows")]
pub const DEFAULT_MODEL_PATH: &str = "emotiondetector.onnx";

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:5000/play_category";

#[cfg(target_os = "macos")]
pub const DEFAULT_CASCADE_PATH: &str =
    "/opt/homebrew/share/opencv4/haarcascades/haarcascade_frontalface_default.xml";
#[cfg(target_os = "windows")]
pub const DEFAULT_CASCADE_PATH: &str = "haarcascade_frontalface_default.xml";
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
pub const DEFAULT_CASCADE_PATH: &str =
    "/usr/share/opencv4/haarcascades/haarcascade_frontalface_default.xml";

#[cfg(target_os = "macos")]
pub const DEFAULT_CAMERA_DEVICE: &str = "0";
#[cfg(target_os = "macos")]
pub const DEFAULT_CAMERA_FORMAT: &str = "avfoundation";

#[cfg(target_os = "windows")]
pub const DEFAULT_CAMERA_DEVICE: &str = "video=Integrated Camera";
#[cfg(target_os = "windows")]
pub const DEFAULT_CAMERA_FORMAT: &str = "dshow";

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
pub const DEFAULT_CAMERA_DEVICE: &str = "/dev/video0";
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
pub const DEFAULT_CAMERA_FORMAT: &str = "v4l2";

/// Side length of the square classifier input.
pub const CLASSIFIER_INPUT_SIZE: u32 = 224;

pub const DEFAULT_SCALE_FACTOR: f64 = 1.1;
pub const DEFAULT_MIN_NEIGHBORS: i32 = 5;
pub const DEFAULT_MIN_FACE_SIZE: i32 = 30;

pub const PREVIEW_WINDOW_TITLE: &str = "Real-time Emotion Detection";
