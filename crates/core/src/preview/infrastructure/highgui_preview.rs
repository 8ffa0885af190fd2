use opencv::core::{Mat, Point, Rect, Scalar};
use opencv::prelude::*;
use opencv::{highgui, imgproc};

use crate::preview::domain::frame_observer::{FaceAnnotation, FrameObserver, ObserverSignal};
use crate::shared::constants::PREVIEW_WINDOW_TITLE;
use crate::shared::frame::Frame;

const QUIT_KEY: u8 = b'q';
const BOX_THICKNESS: i32 = 2;
const LABEL_SCALE: f64 = 0.9;
const LABEL_OFFSET: i32 = 10;

fn box_color() -> Scalar {
    // BGR green
    Scalar::new(0.0, 255.0, 0.0, 0.0)
}

/// Live OpenCV window showing each frame with face boxes and labels.
///
/// Pressing `q` in the window stops the loop.
pub struct HighguiPreview {
    window: String,
    opened: bool,
}

impl HighguiPreview {
    pub fn new() -> Self {
        Self::with_title(PREVIEW_WINDOW_TITLE)
    }

    pub fn with_title(title: &str) -> Self {
        Self {
            window: title.to_string(),
            opened: false,
        }
    }

    fn render(&self, frame: &Frame, faces: &[FaceAnnotation]) -> opencv::Result<Mat> {
        let rgb = Mat::from_slice(frame.data())?;
        let rgb = rgb.reshape(frame.channels() as i32, frame.height() as i32)?;
        let mut canvas = Mat::default();
        imgproc::cvt_color_def(&rgb, &mut canvas, imgproc::COLOR_RGB2BGR)?;

        for face in faces {
            let r = face.region;
            imgproc::rectangle(
                &mut canvas,
                Rect::new(r.x, r.y, r.width, r.height),
                box_color(),
                BOX_THICKNESS,
                imgproc::LINE_8,
                0,
            )?;
            if let Some(prediction) = &face.prediction {
                imgproc::put_text(
                    &mut canvas,
                    prediction.emotion.as_str(),
                    Point::new(r.x, r.y - LABEL_OFFSET),
                    imgproc::FONT_HERSHEY_SIMPLEX,
                    LABEL_SCALE,
                    box_color(),
                    BOX_THICKNESS,
                    imgproc::LINE_8,
                    false,
                )?;
            }
        }
        Ok(canvas)
    }
}

impl Default for HighguiPreview {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameObserver for HighguiPreview {
    fn observe(
        &mut self,
        frame: &Frame,
        faces: &[FaceAnnotation],
    ) -> Result<ObserverSignal, Box<dyn std::error::Error>> {
        if frame.is_empty() {
            return Ok(ObserverSignal::Continue);
        }
        let canvas = self.render(frame, faces)?;
        highgui::imshow(&self.window, &canvas)?;
        self.opened = true;

        let key = highgui::wait_key(1)?;
        Ok(signal_for_key(key))
    }
}

impl Drop for HighguiPreview {
    fn drop(&mut self) {
        if self.opened {
            if let Err(e) = highgui::destroy_window(&self.window) {
                log::warn!("Failed to close preview window: {e}");
            }
        }
    }
}

/// `wait_key` returns -1 when no key was pressed; only the low byte
/// carries the character.
fn signal_for_key(key: i32) -> ObserverSignal {
    if key >= 0 && (key & 0xFF) as u8 == QUIT_KEY {
        ObserverSignal::Stop
    } else {
        ObserverSignal::Continue
    }
}
