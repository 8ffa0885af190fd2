use crate::classification::domain::emotion::Prediction;
use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// One detected face and, if classification succeeded, its verdict.
#[derive(Clone, Debug, PartialEq)]
pub struct FaceAnnotation {
    pub region: Region,
    pub prediction: Option<Prediction>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObserverSignal {
    Continue,
    Stop,
}

/// Sees every processed frame together with its faces.
///
/// Lets an interactive front end (a preview window) end the loop early.
pub trait FrameObserver: Send {
    fn observe(
        &mut self,
        frame: &Frame,
        faces: &[FaceAnnotation],
    ) -> Result<ObserverSignal, Box<dyn std::error::Error>>;
}

/// Observer that ignores frames and never stops the loop.
pub struct NullFrameObserver;

impl FrameObserver for NullFrameObserver {
    fn observe(
        &mut self,
        _frame: &Frame,
        _faces: &[FaceAnnotation],
    ) -> Result<ObserverSignal, Box<dyn std::error::Error>> {
        Ok(ObserverSignal::Continue)
    }
}
