use {
    serde::Serialize,
    crate::sentiment::SentimentLabel,
};

#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SentimentTally {
    positive: usize,
    negative: usize,
    neutral: usize,
}

/// Comments paired with the label assigned to each of them.
#[derive(Debug, Clone)]
pub struct ClassifiedComments {
    comments: Vec<String>,
    labels: Vec<SentimentLabel>,
}

impl SentimentTally {
    pub fn from_labels(labels: &[SentimentLabel]) -> Self {
        labels.iter().fold(Self::default(), |mut tally, label| {
            *tally.count_mut(*label) += 1;
            tally
        })
    }

    pub fn get(&self, label: SentimentLabel) -> usize {
        match label {
            SentimentLabel::Positive => self.positive,
            SentimentLabel::Negative => self.negative,
            SentimentLabel::Neutral => self.neutral,
        }
    }

    pub fn total(&self) -> usize {
        self.positive + self.negative + self.neutral
    }

    /// Share of `label` in percent, `0.0` for an empty tally.
    pub fn percentage(&self, label: SentimentLabel) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.get(label) as f64 * 100.0 / total as f64,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (SentimentLabel, usize)> + '_ {
        SentimentLabel::ALL.into_iter().map(move |label| (label, self.get(label)))
    }

    fn count_mut(&mut self, label: SentimentLabel) -> &mut usize {
        match label {
            SentimentLabel::Positive => &mut self.positive,
            SentimentLabel::Negative => &mut self.negative,
            SentimentLabel::Neutral => &mut self.neutral,
        }
    }
}

impl ClassifiedComments {
    /// `labels` must be parallel to `comments`; extra entries on either side are dropped.
    pub fn new(mut comments: Vec<String>, mut labels: Vec<SentimentLabel>) -> Self {
        let len = comments.len().min(labels.len());
        comments.truncate(len);
        labels.truncate(len);

        Self {
            comments,
            labels,
        }
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    pub fn labels(&self) -> &[SentimentLabel] {
        &self.labels
    }

    pub fn with_label(&self, label: SentimentLabel) -> Vec<String> {
        self.comments.iter()
            .zip(self.labels.iter())
            .filter(|(_, v)| **v == label)
            .map(|(comment, _)| comment.clone())
            .collect()
    }

    pub fn positive(&self) -> Vec<String> {
        self.with_label(SentimentLabel::Positive)
    }

    pub fn negative(&self) -> Vec<String> {
        self.with_label(SentimentLabel::Negative)
    }

    pub fn neutral(&self) -> Vec<String> {
        self.with_label(SentimentLabel::Neutral)
    }

    pub fn tally(&self) -> SentimentTally {
        SentimentTally::from_labels(&self.labels)
    }
}
