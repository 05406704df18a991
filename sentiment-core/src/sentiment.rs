use {
    std::fmt,
    once_cell::sync::Lazy,
    serde::Serialize,
    vader_sentiment::SentimentIntensityAnalyzer,
};

// lexicon is parsed once per process
static ANALYZER: Lazy<SentimentIntensityAnalyzer> = Lazy::new(SentimentIntensityAnalyzer::new);

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// Display order used by the chart legend and the result page.
    pub const ALL: [SentimentLabel; 3] = [SentimentLabel::Positive, SentimentLabel::Negative, SentimentLabel::Neutral];

    pub fn from_polarity(polarity: f64) -> Self {
        if polarity > 0.0 {
            SentimentLabel::Positive
        } else if polarity < 0.0 {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Negative => "Negative",
            SentimentLabel::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scores comments with the VADER lexicon model. The `compound` score is
/// already normalized to `[-1, 1]`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SentimentClassifier;

impl SentimentClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Forces the lexicon to load, so the first submission does not pay for it.
    pub fn warm_up(&self) {
        Lazy::force(&ANALYZER);
    }

    pub fn polarity(&self, comment: &str) -> f64 {
        ANALYZER.polarity_scores(comment)
            .get("compound")
            .copied()
            .unwrap_or(0.0)
    }

    pub fn classify(&self, comment: &str) -> SentimentLabel {
        SentimentLabel::from_polarity(self.polarity(comment))
    }

    pub fn classify_all(&self, comments: &[String]) -> Vec<SentimentLabel> {
        comments.iter().map(|comment| self.classify(comment)).collect()
    }
}
