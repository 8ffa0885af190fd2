use std::time::Instant;

use crate::classification::domain::emotion::{Emotion, Prediction};
use crate::classification::domain::emotion_classifier::EmotionClassifier;
use crate::detection::domain::face_detector::FaceDetector;
use crate::notification::domain::emotion_notifier::EmotionNotifier;
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::preview::domain::frame_observer::{FaceAnnotation, FrameObserver, ObserverSignal};
use crate::shared::frame::Frame;
use crate::shared::region::Region;
use crate::video::domain::frame_source::{CaptureSource, FrameSource};

/// How a run ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The backend accepted a report; nothing else was sent.
    Notified { emotion: Emotion, frame_index: usize },
    /// The source ran dry (or delivered a frame that could not be read)
    /// before any report went through.
    StreamEnded { frames: usize },
    /// The frame observer asked to stop.
    Stopped { frames: usize },
}

/// Capture → detect → classify → notify, until one report succeeds.
///
/// Per-frame failures (detection, inference, network) are logged and
/// skipped; only a source that cannot be opened is an error.
pub struct DetectFirstEmotionUseCase {
    source: Box<dyn FrameSource>,
    detector: Box<dyn FaceDetector>,
    classifier: Box<dyn EmotionClassifier>,
    notifier: Box<dyn EmotionNotifier>,
    observer: Box<dyn FrameObserver>,
    logger: Box<dyn PipelineLogger>,
}

impl DetectFirstEmotionUseCase {
    pub fn new(
        source: Box<dyn FrameSource>,
        detector: Box<dyn FaceDetector>,
        classifier: Box<dyn EmotionClassifier>,
        notifier: Box<dyn EmotionNotifier>,
        observer: Box<dyn FrameObserver>,
        logger: Box<dyn PipelineLogger>,
    ) -> Self {
        Self {
            source,
            detector,
            classifier,
            notifier,
            observer,
            logger,
        }
    }

    pub fn execute(
        &mut self,
        capture: &CaptureSource,
    ) -> Result<Outcome, Box<dyn std::error::Error>> {
        let metadata = match self.source.open(capture) {
            Ok(metadata) => metadata,
            Err(e) => {
                self.source.close();
                return Err(e);
            }
        };
        self.logger.info(&format!("Capturing from {metadata}"));

        let outcome = self.scan();
        self.source.close();
        self.logger.summary();
        Ok(outcome)
    }

    fn scan(&mut self) -> Outcome {
        let mut scanned = 0;

        for item in self.source.frames() {
            let frame = match item {
                Ok(frame) if !frame.is_empty() => frame,
                Ok(frame) => {
                    log::warn!("Frame {} is empty, stopping capture", frame.index());
                    break;
                }
                Err(e) => {
                    log::error!("Failed to read frame: {e}");
                    break;
                }
            };
            scanned += 1;
            self.logger.progress(scanned);

            let regions = detect(self.detector.as_mut(), self.logger.as_mut(), &frame);

            let mut annotations = Vec::with_capacity(regions.len());
            for region in regions {
                let prediction = classify(
                    self.classifier.as_mut(),
                    self.logger.as_mut(),
                    &frame,
                    &region,
                );

                if let Some(prediction) = &prediction {
                    let started = Instant::now();
                    let sent = self.notifier.notify(prediction.emotion);
                    self.logger.timing("notify", elapsed_ms(started));
                    match sent {
                        Ok(ack) => {
                            self.logger.info(&format!(
                                "Reported {} from frame {}: {}",
                                prediction.emotion,
                                frame.index(),
                                ack.trim()
                            ));
                            return Outcome::Notified {
                                emotion: prediction.emotion,
                                frame_index: frame.index(),
                            };
                        }
                        Err(e) => log::error!("Failed to report {}: {e}", prediction.emotion),
                    }
                }

                annotations.push(FaceAnnotation { region, prediction });
            }

            match self.observer.observe(&frame, &annotations) {
                Ok(ObserverSignal::Continue) => {}
                Ok(ObserverSignal::Stop) => {
                    self.logger.info("Stopped by user");
                    return Outcome::Stopped { frames: scanned };
                }
                Err(e) => log::warn!("Preview failed on frame {}: {e}", frame.index()),
            }
        }

        Outcome::StreamEnded { frames: scanned }
    }
}

/// A detection failure yields no faces for this frame.
fn detect(
    detector: &mut dyn FaceDetector,
    logger: &mut dyn PipelineLogger,
    frame: &Frame,
) -> Vec<Region> {
    let started = Instant::now();
    let regions = match detector.detect(frame) {
        Ok(regions) => regions,
        Err(e) => {
            log::warn!("Face detection failed on frame {}: {e}", frame.index());
            return Vec::new();
        }
    };
    logger.timing("detect", elapsed_ms(started));
    logger.metric("faces", regions.len() as f64);
    regions
}

fn classify(
    classifier: &mut dyn EmotionClassifier,
    logger: &mut dyn PipelineLogger,
    frame: &Frame,
    region: &Region,
) -> Option<Prediction> {
    let Some(face) = frame.crop(region) else {
        log::debug!("Face {region:?} lies outside frame {}", frame.index());
        return None;
    };

    let started = Instant::now();
    let result = classifier.classify(&face);
    logger.timing("classify", elapsed_ms(started));

    match result {
        Ok(prediction) => {
            log::info!("Frame {}: {prediction}", frame.index());
            Some(prediction)
        }
        Err(e) => {
            log::warn!("Emotion inference failed on frame {}: {e}", frame.index());
            None
        }
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}
