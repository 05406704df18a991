use {
    std::{fmt, fs, io, path::{Path, PathBuf}},
    rand::Rng,
    tracing::{debug, info},
    crate::{
        sentiment::SentimentLabel,
        video_id::VideoId,
    },
};

pub const WORDCLOUD_DIR: &str = "wordclouds";
pub const CHART_DIR: &str = "charts";
pub const THUMB_DIR: &str = "thumbs";

const PIE_CHART_FILE: &str = "sentiment_pie.png";

const DEFAULT_RETAINED_SUBMISSIONS: usize = 100;

/// Where generated images live under the static asset root.
#[derive(Debug, Clone)]
pub struct ArtifactLayout {
    root: PathBuf,
    retain_submissions: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubmissionId(String);

/// A file to write and the reference the result page uses to link it.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub path: PathBuf,
    pub reference: String,
}

impl ArtifactLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            retain_submissions: DEFAULT_RETAINED_SUBMISSIONS,
        }
    }

    /// Number of submission directories kept per kind, the newest one included.
    pub fn with_retention(mut self, retain_submissions: usize) -> Self {
        self.retain_submissions = retain_submissions.max(1);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn wordcloud_dir(&self) -> PathBuf {
        self.root.join(WORDCLOUD_DIR)
    }

    pub fn chart_dir(&self) -> PathBuf {
        self.root.join(CHART_DIR)
    }

    pub fn thumb_dir(&self) -> PathBuf {
        self.root.join(THUMB_DIR)
    }

    pub fn bootstrap(&self) -> io::Result<()> {
        for dir in [self.wordcloud_dir(), self.chart_dir(), self.thumb_dir()] {
            fs::create_dir_all(&dir)?;
        }
        info!("artifact directories ready under {}", self.root.display());
        Ok(())
    }

    pub fn pie_chart(&self, submission: &SubmissionId) -> Artifact {
        self.artifact(&[CHART_DIR, submission.as_str(), PIE_CHART_FILE])
    }

    pub fn wordcloud(&self, submission: &SubmissionId, label: SentimentLabel) -> Artifact {
        let file_name = format!("wordcloud_{}.png", label);
        self.artifact(&[WORDCLOUD_DIR, submission.as_str(), &file_name])
    }

    pub fn thumbnail(&self, video_id: &VideoId) -> Artifact {
        // identifiers come straight from user input
        let stem: String = video_id.as_str()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        let file_name = format!("{}.jpg", stem);
        self.artifact(&[THUMB_DIR, &file_name])
    }

    /// Per-submission directories keep concurrent submissions from overwriting each other.
    /// The oldest ones are pruned first so at most `retain_submissions` remain.
    pub fn prepare_submission(&self, submission: &SubmissionId) -> io::Result<()> {
        for dir in self.submission_dirs() {
            fs::create_dir_all(&dir)?;
            prune_oldest(&dir, self.retain_submissions - 1)?;
            fs::create_dir_all(dir.join(submission.as_str()))?;
        }
        fs::create_dir_all(self.thumb_dir())?;
        Ok(())
    }

    /// Removes whatever a failed submission left behind.
    pub fn discard_submission(&self, submission: &SubmissionId) -> io::Result<()> {
        for dir in self.submission_dirs() {
            remove_dir_if_present(&dir.join(submission.as_str()))?;
        }
        Ok(())
    }

    fn submission_dirs(&self) -> [PathBuf; 2] {
        [self.chart_dir(), self.wordcloud_dir()]
    }

    fn artifact(&self, segments: &[&str]) -> Artifact {
        Artifact {
            path: segments.iter().fold(self.root.clone(), |path, segment| path.join(segment)),
            reference: segments.join("/"),
        }
    }
}

fn prune_oldest(dir: &Path, keep: usize) -> io::Result<()> {
    let mut submissions = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            submissions.push((entry.metadata()?.modified()?, entry.path()));
        }
    }

    if submissions.len() <= keep {
        return Ok(());
    }

    submissions.sort();
    let excess = submissions.len() - keep;
    for (_, path) in submissions.into_iter().take(excess) {
        debug!("pruning old submission {}", path.display());
        remove_dir_if_present(&path)?;
    }

    Ok(())
}

// a concurrent prune may have removed it already
fn remove_dir_if_present(path: &Path) -> io::Result<()> {
    match fs::remove_dir_all(path) {
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

impl SubmissionId {
    pub fn random() -> Self {
        let mut id = [0u8; 12];
        rand::thread_rng().fill(&mut id);
        Self(id.iter().map(|byte| format!("{:02x}", byte)).collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
