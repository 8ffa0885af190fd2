/// Properties of an opened capture stream.
#[derive(Clone, Debug, PartialEq)]
pub struct StreamMetadata {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub codec: String,
    /// Human-readable description of where frames come from.
    pub source: String,
}

impl std::fmt::Display for StreamMetadata {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}x{} @ {:.1} fps, {})",
            self.source, self.width, self.height, self.fps, self.codec
        )
    }
}
