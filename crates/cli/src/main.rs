use std::path::PathBuf;
use std::process;

use clap::Parser;

use moodcue_core::classification::infrastructure::face_preprocessor::ChannelOrder;
use moodcue_core::classification::infrastructure::onnx_emotion_classifier::OnnxEmotionClassifier;
use moodcue_core::config::{ConfigOverrides, Settings};
use moodcue_core::detection::infrastructure::haar_cascade_detector::HaarCascadeDetector;
use moodcue_core::notification::infrastructure::http_notifier::HttpNotifier;
use moodcue_core::pipeline::detect_first_emotion_use_case::{DetectFirstEmotionUseCase, Outcome};
use moodcue_core::pipeline::pipeline_logger::StdoutPipelineLogger;
use moodcue_core::preview::domain::frame_observer::{FrameObserver, NullFrameObserver};
use moodcue_core::preview::infrastructure::highgui_preview::HighguiPreview;
use moodcue_core::shared::model_resolver;
use moodcue_core::video::infrastructure::ffmpeg_capture::FfmpegCapture;

/// Watch the camera until a face shows up, classify its emotion and
/// report it to the music backend once.
#[derive(Parser, Debug)]
#[command(name = "moodcue", version)]
struct Cli {
    /// Emotion model (ONNX, NHWC float input).
    #[arg(long, env = "MODEL_PATH")]
    model: Option<PathBuf>,

    /// Where to download the model from when it is not on disk.
    #[arg(long, env = "MODEL_URL")]
    model_url: Option<String>,

    /// Endpoint that receives {"category": "<emotion>"}.
    #[arg(long, env = "BACKEND_URL")]
    backend_url: Option<String>,

    /// Haar cascade XML for frontal faces.
    #[arg(long, env = "HAAR_CASCADE_PATH")]
    cascade: Option<PathBuf>,

    /// Camera device (e.g. /dev/video0, "0" on macOS, "video=..." on Windows).
    #[arg(long, env = "CAMERA_DEVICE")]
    device: Option<String>,

    /// Capture input format (v4l2, avfoundation, dshow).
    #[arg(long)]
    input_format: Option<String>,

    /// Read frames from a video file instead of the camera.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Channel order the model expects: bgr or rgb.
    #[arg(long)]
    channel_order: Option<ChannelOrder>,

    /// Haar cascade pyramid scale step (> 1.0).
    #[arg(long)]
    scale_factor: Option<f64>,

    /// Neighbouring detections needed to keep a face.
    #[arg(long)]
    min_neighbors: Option<i32>,

    /// Smallest face side length in pixels.
    #[arg(long)]
    min_face_size: Option<i32>,

    /// Backend request timeout in seconds.
    #[arg(long)]
    timeout: Option<f64>,

    /// Show the camera feed with face boxes; press q to quit.
    #[arg(long)]
    preview: bool,

    /// JSON config file; command line and environment take precedence.
    #[arg(long, env = "MOODCUE_CONFIG")]
    config: Option<PathBuf>,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            model: self.model.clone(),
            model_url: self.model_url.clone(),
            backend_url: self.backend_url.clone(),
            cascade: self.cascade.clone(),
            device: self.device.clone(),
            input_format: self.input_format.clone(),
            input: self.input.clone(),
            channel_order: self.channel_order,
            scale_factor: self.scale_factor,
            min_neighbors: self.min_neighbors,
            min_face_size: self.min_face_size,
            timeout_secs: self.timeout,
            preview: self.preview.then_some(true),
        }
    }
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let settings = load_settings(&cli)?;
    log::debug!("{settings:?}");

    log::info!("Resolving model: {}", settings.model_path.display());
    let model_path = model_resolver::resolve(
        &settings.model_path,
        settings.model_url.as_deref(),
        Some(Box::new(download_progress)),
    )?;

    let detector = HaarCascadeDetector::new(&settings.cascade_path, settings.cascade)?;
    let classifier = OnnxEmotionClassifier::new(&model_path, settings.channel_order)?;
    let notifier = HttpNotifier::new(&settings.backend_url, settings.timeout)?;
    let observer: Box<dyn FrameObserver> = if settings.preview {
        Box::new(HighguiPreview::new())
    } else {
        Box::new(NullFrameObserver)
    };

    let mut use_case = DetectFirstEmotionUseCase::new(
        Box::new(FfmpegCapture::new()),
        Box::new(detector),
        Box::new(classifier),
        Box::new(notifier),
        observer,
        Box::new(StdoutPipelineLogger::default()),
    );

    match use_case.execute(&settings.capture_source())? {
        Outcome::Notified {
            emotion,
            frame_index,
        } => log::info!(
            "Sent '{emotion}' to {} (frame {frame_index})",
            settings.backend_url
        ),
        Outcome::StreamEnded { frames } => {
            log::warn!("Stream ended after {frames} frames without a report")
        }
        Outcome::Stopped { frames } => log::info!("Stopped after {frames} frames"),
    }
    Ok(())
}

fn load_settings(cli: &Cli) -> Result<Settings, Box<dyn std::error::Error>> {
    let file = match &cli.config {
        Some(path) => {
            log::info!("Loading config from {}", path.display());
            ConfigOverrides::from_file(path)?
        }
        None => ConfigOverrides::default(),
    };
    Ok(Settings::resolve(cli.overrides().or(file))?)
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading emotion model... {pct}%");
        if downloaded >= total {
            eprintln!();
        }
    } else {
        eprint!("\rDownloading emotion model... {downloaded} bytes");
    }
}
