use thiserror::Error;

/// Emotions the classifier can report, in model output order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Emotion {
    Happy,
    Neutral,
    Sad,
}

impl Emotion {
    /// All labels, indexed by model output position.
    pub const ALL: &[Emotion] = &[Emotion::Happy, Emotion::Neutral, Emotion::Sad];

    pub fn from_index(index: usize) -> Option<Emotion> {
        Self::ALL.get(index).copied()
    }

    /// Lower-case wire name, as sent to the backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Happy => "happy",
            Emotion::Neutral => "neutral",
            Emotion::Sad => "sad",
        }
    }
}

impl std::fmt::Display for Emotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum ClassifyError {
    #[error("model produced {got} scores, expected at least {expected}")]
    ShortOutput { got: usize, expected: usize },
    #[error("arg-max index {0} is outside the label set")]
    UnknownIndex(usize),
    #[error("cannot build classifier input from a {0}-channel face")]
    UnsupportedChannels(u8),
}

/// Index and value of the largest score.
///
/// Ties go to the first occurrence. A NaN never beats a number, so a
/// single NaN cannot hijack the result. Empty input yields `None`.
pub fn argmax(scores: &[f32]) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &score) in scores.iter().enumerate() {
        best = match best {
            None => Some((i, score)),
            Some((_, b)) if b.is_nan() && !score.is_nan() => Some((i, score)),
            Some((_, b)) if score > b => Some((i, score)),
            keep => keep,
        };
    }
    best
}

/// Classifier verdict for one face.
#[derive(Clone, Debug, PartialEq)]
pub struct Prediction {
    pub emotion: Emotion,
    /// Score of the winning label.
    pub score: f32,
    /// Raw model output, one entry per label.
    pub scores: Vec<f32>,
}

impl Prediction {
    /// Maps a raw score vector to a label via arg-max.
    pub fn from_scores(scores: Vec<f32>) -> Result<Prediction, ClassifyError> {
        let expected = Emotion::ALL.len();
        if scores.len() < expected {
            return Err(ClassifyError::ShortOutput {
                got: scores.len(),
                expected,
            });
        }
        let (index, score) = argmax(&scores).ok_or(ClassifyError::ShortOutput {
            got: 0,
            expected,
        })?;
        let emotion = Emotion::from_index(index).ok_or(ClassifyError::UnknownIndex(index))?;
        Ok(Prediction {
            emotion,
            score,
            scores,
        })
    }
}

impl std::fmt::Display for Prediction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({:.2})", self.emotion, self.score)
    }
}
