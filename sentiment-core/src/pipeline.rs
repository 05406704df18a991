use {
    std::{fmt, io},
    tracing::{info, warn, info_span, Instrument},
    serde::Serialize,
    thiserror::Error,
    typed_builder::TypedBuilder,
    crate::{
        aggregate::{ClassifiedComments, SentimentTally},
        artifacts::{ArtifactLayout, SubmissionId},
        config::Config,
        render::{RenderError, Renderer},
        sentiment::{SentimentClassifier, SentimentLabel},
        thumbnail::download_thumbnail,
        video_id::{extract_video_id, VideoId},
        youtube::{YoutubeClient, YoutubeError},
    },
};

pub const INVALID_URL_MESSAGE: &str = "Invalid YouTube URL.";

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Invalid YouTube URL.")]
    InvalidUrl,
    #[error(transparent)]
    ExternalService(#[from] YoutubeError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("failed to prepare output directories: {0}")]
    Storage(#[from] io::Error),
    #[error("unexpected failure: {0}")]
    Unexpected(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Processing,
    Completed,
    Failed,
}

/// Everything the result page shows for one submission.
#[derive(TypedBuilder, Serialize, Debug, Clone)]
pub struct AnalysisReport {
    #[builder(setter(into))]
    submission_id: String,
    #[builder(setter(into))]
    video_title: String,
    #[builder(setter(into))]
    video_url: String,
    #[builder(default)]
    thumbnail: Option<String>,
    #[builder(setter(into))]
    pie_chart: String,
    #[builder(default)]
    wordcloud_positive: Option<String>,
    #[builder(default)]
    wordcloud_negative: Option<String>,
    tally: SentimentTally,
    comment_count: usize,
}

struct RenderedArtifacts {
    thumbnail: Option<String>,
    pie_chart: String,
    wordcloud_positive: Option<String>,
    wordcloud_negative: Option<String>,
}

/// Runs one submission from URL to report.
pub struct Analyzer {
    youtube: YoutubeClient,
    http: reqwest::Client,
    classifier: SentimentClassifier,
    layout: ArtifactLayout,
    renderer: Renderer,
    max_comments: usize,
}

impl AnalysisError {
    /// Text shown on the result page. Invalid input gets a fixed message, the rest carry their detail.
    pub fn user_message(&self) -> String {
        match self {
            AnalysisError::InvalidUrl => INVALID_URL_MESSAGE.to_owned(),
            other => format!("Error: {}", other),
        }
    }
}

impl fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SubmissionState::Idle => "idle",
            SubmissionState::Processing => "processing",
            SubmissionState::Completed => "completed",
            SubmissionState::Failed => "failed",
        })
    }
}

impl AnalysisReport {
    pub fn submission_id(&self) -> &str {
        &self.submission_id
    }

    pub fn video_title(&self) -> &str {
        &self.video_title
    }

    pub fn video_url(&self) -> &str {
        &self.video_url
    }

    pub fn thumbnail(&self) -> Option<&str> {
        self.thumbnail.as_deref()
    }

    pub fn pie_chart(&self) -> &str {
        &self.pie_chart
    }

    pub fn wordcloud_positive(&self) -> Option<&str> {
        self.wordcloud_positive.as_deref()
    }

    pub fn wordcloud_negative(&self) -> Option<&str> {
        self.wordcloud_negative.as_deref()
    }

    pub fn tally(&self) -> &SentimentTally {
        &self.tally
    }

    pub fn comment_count(&self) -> usize {
        self.comment_count
    }
}

impl Analyzer {
    pub fn new(youtube: YoutubeClient, http: reqwest::Client, layout: ArtifactLayout, renderer: Renderer, max_comments: usize) -> Self {
        Self {
            youtube,
            http,
            classifier: SentimentClassifier::new(),
            layout,
            renderer,
            max_comments,
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.youtube.request_timeout())
            .build()?;
        let youtube = YoutubeClient::new(http.clone(), &config.youtube)?;

        Ok(Self::new(
            youtube,
            http,
            ArtifactLayout::new(config.storage.static_root()).with_retention(config.storage.retain_submissions),
            Renderer::new(&config.rendering),
            config.youtube.max_comments,
        ))
    }

    pub fn layout(&self) -> &ArtifactLayout {
        &self.layout
    }

    pub async fn analyze(&self, url: &str) -> Result<AnalysisReport, AnalysisError> {
        let submission = SubmissionId::random();
        let span = info_span!("submission", id = %submission);

        async move {
            info!(state = %SubmissionState::Idle, "received submission for {}", url);
            let result = self.process(url, submission).await;

            match &result {
                Ok(report) => info!(
                    state = %SubmissionState::Completed,
                    "analyzed {} comments for \"{}\"", report.comment_count(), report.video_title()
                ),
                Err(err) => warn!(state = %SubmissionState::Failed, "submission failed: {}", err),
            }

            result
        }.instrument(span).await
    }

    async fn process(&self, url: &str, submission: SubmissionId) -> Result<AnalysisReport, AnalysisError> {
        let video_id = extract_video_id(url).ok_or(AnalysisError::InvalidUrl)?;
        info!(state = %SubmissionState::Processing, "processing video {}", video_id);

        let (comments, metadata) = tokio::try_join!(
            self.youtube.comments(&video_id, self.max_comments),
            self.youtube.video_details(&video_id),
        )?;

        let classified = self.classify(comments).await?;
        let tally = classified.tally();

        let artifacts = match self.render_artifacts(&submission, &video_id, &metadata.thumbnail_url, &classified).await {
            Ok(v) => v,
            Err(err) => {
                if let Err(cleanup_err) = self.layout.discard_submission(&submission) {
                    warn!("failed to remove artifacts of submission {}: {}", submission, cleanup_err);
                }
                return Err(err);
            }
        };

        Ok(AnalysisReport::builder()
            .submission_id(submission.as_str())
            .video_title(metadata.title)
            .video_url(url)
            .thumbnail(artifacts.thumbnail)
            .pie_chart(artifacts.pie_chart)
            .wordcloud_positive(artifacts.wordcloud_positive)
            .wordcloud_negative(artifacts.wordcloud_negative)
            .tally(tally)
            .comment_count(classified.len())
            .build())
    }

    async fn render_artifacts(
        &self,
        submission: &SubmissionId,
        video_id: &VideoId,
        thumbnail_url: &str,
        classified: &ClassifiedComments,
    ) -> Result<RenderedArtifacts, AnalysisError> {
        self.layout.prepare_submission(submission)?;

        let thumbnail_artifact = self.layout.thumbnail(video_id);
        let thumbnail = download_thumbnail(&self.http, thumbnail_url, &thumbnail_artifact.path)
            .await
            .map(|_| thumbnail_artifact.reference);

        let pie_chart = self.renderer.pie_chart(classified.tally(), &self.layout.pie_chart(submission)).await?;
        let wordcloud_positive = self.renderer
            .word_cloud(classified.positive(), &self.layout.wordcloud(submission, SentimentLabel::Positive))
            .await?;
        let wordcloud_negative = self.renderer
            .word_cloud(classified.negative(), &self.layout.wordcloud(submission, SentimentLabel::Negative))
            .await?;

        Ok(RenderedArtifacts {
            thumbnail,
            pie_chart,
            wordcloud_positive,
            wordcloud_negative,
        })
    }

    async fn classify(&self, comments: Vec<String>) -> Result<ClassifiedComments, AnalysisError> {
        let classifier = self.classifier;

        tokio::task::spawn_blocking(move || {
            let labels = classifier.classify_all(&comments);
            ClassifiedComments::new(comments, labels)
        })
            .await
            .map_err(|err| AnalysisError::Unexpected(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_url_message_is_fixed() {
        assert_eq!(AnalysisError::InvalidUrl.user_message(), "Invalid YouTube URL.");
    }

    #[test]
    fn service_failures_carry_detail() {
        let err = AnalysisError::from(YoutubeError::Api {
            status: 403,
            message: "quota exceeded".to_owned(),
        });

        assert_eq!(err.user_message(), "Error: youtube api returned status 403: quota exceeded");
    }

    #[test]
    fn report_serializes_for_templates() {
        let report = AnalysisReport::builder()
            .submission_id("abc")
            .video_title("Title")
            .video_url("https://example.com/watch?v=x")
            .pie_chart("charts/abc/sentiment_pie.png")
            .tally(SentimentTally::from_labels(&[SentimentLabel::Positive]))
            .comment_count(1)
            .build();

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["tally"]["positive"], 1);
        assert_eq!(value["thumbnail"], serde_json::Value::Null);
        assert_eq!(value["comment_count"], 1);
    }
}
