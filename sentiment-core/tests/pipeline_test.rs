use {
    sentiment_core::{
        artifacts::ArtifactLayout,
        config::YoutubeConfig,
        pipeline::{AnalysisError, Analyzer},
        render::Renderer,
        sentiment::SentimentLabel,
        youtube::{YoutubeClient, UNKNOWN_TITLE},
    },
    serde_json::{json, Value},
    tempfile::TempDir,
    wiremock::{
        matchers::{method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    },
};

const VIDEO_URL: &str = "https://example.com/watch?v=abc123";

struct Harness {
    server: MockServer,
    static_root: TempDir,
    analyzer: Analyzer,
}

impl Harness {
    async fn start() -> Self {
        Self::with_layout(|root| ArtifactLayout::new(root)).await
    }

    async fn with_layout(layout: impl FnOnce(&std::path::Path) -> ArtifactLayout) -> Self {
        let server = MockServer::start().await;
        let static_root = tempfile::tempdir().unwrap();

        let http = reqwest::Client::new();
        let youtube = YoutubeClient::new(http.clone(), &YoutubeConfig::new("test-key", server.uri())).unwrap();
        let layout = layout(static_root.path());
        layout.bootstrap().unwrap();
        let analyzer = Analyzer::new(youtube, http, layout, Renderer::default(), 300);

        Self {
            server,
            static_root,
            analyzer,
        }
    }

    async fn comments(&self, texts: &[&str]) {
        Mock::given(method("GET"))
            .and(path("/commentThreads"))
            .and(query_param("videoId", "abc123"))
            .and(query_param("textFormat", "plainText"))
            .respond_with(ResponseTemplate::new(200).set_body_json(comment_page(texts, None)))
            .mount(&self.server)
            .await;
    }

    async fn video(&self, body: Value) {
        Mock::given(method("GET"))
            .and(path("/videos"))
            .and(query_param("id", "abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    async fn thumbnail(&self, status: u16) {
        Mock::given(method("GET"))
            .and(path("/vi/abc123/hqdefault.jpg"))
            .respond_with(ResponseTemplate::new(status).set_body_bytes(vec![0xff, 0xd8, 0xff, 0xe0]))
            .mount(&self.server)
            .await;
    }

    fn video_with_thumbnail(&self, title: &str) -> Value {
        json!({
            "items": [{
                "snippet": {
                    "title": title,
                    "thumbnails": {
                        "high": { "url": format!("{}/vi/abc123/hqdefault.jpg", self.server.uri()) }
                    }
                }
            }]
        })
    }

    fn exists(&self, reference: &str) -> bool {
        self.static_root.path().join(reference).is_file()
    }

    fn submissions_in(&self, dir: &str) -> usize {
        std::fs::read_dir(self.static_root.path().join(dir)).unwrap().count()
    }
}

fn comment_page(texts: &[&str], next_page_token: Option<&str>) -> Value {
    let items: Vec<Value> = texts.iter()
        .map(|text| json!({ "snippet": { "topLevelComment": { "snippet": { "textDisplay": text } } } }))
        .collect();

    match next_page_token {
        Some(token) => json!({ "items": items, "nextPageToken": token }),
        None => json!({ "items": items }),
    }
}

#[tokio::test]
async fn classifies_and_renders_two_comments() {
    let harness = Harness::start().await;
    harness.comments(&["great!", "terrible."]).await;
    harness.video(harness.video_with_thumbnail("Some video")).await;
    harness.thumbnail(200).await;

    let report = harness.analyzer.analyze(VIDEO_URL).await.unwrap();

    assert_eq!(report.video_title(), "Some video");
    assert_eq!(report.video_url(), VIDEO_URL);
    assert_eq!(report.comment_count(), 2);
    assert_eq!(report.tally().get(SentimentLabel::Positive), 1);
    assert_eq!(report.tally().get(SentimentLabel::Negative), 1);
    assert_eq!(report.tally().get(SentimentLabel::Neutral), 0);

    let positive = report.wordcloud_positive().expect("positive word cloud");
    let negative = report.wordcloud_negative().expect("negative word cloud");
    assert!(positive.ends_with("/wordcloud_Positive.png"));
    assert!(negative.ends_with("/wordcloud_Negative.png"));
    assert!(harness.exists(positive));
    assert!(harness.exists(negative));

    assert!(report.pie_chart().ends_with("/sentiment_pie.png"));
    assert!(harness.exists(report.pie_chart()));

    assert_eq!(report.thumbnail(), Some("thumbs/abc123.jpg"));
    assert!(harness.exists("thumbs/abc123.jpg"));
}

#[tokio::test]
async fn neutral_comments_are_counted_but_not_clouded() {
    let harness = Harness::start().await;
    harness.comments(&["the video was uploaded on tuesday", "great!"]).await;
    harness.video(harness.video_with_thumbnail("Some video")).await;
    harness.thumbnail(200).await;

    let report = harness.analyzer.analyze(VIDEO_URL).await.unwrap();

    assert_eq!(report.tally().get(SentimentLabel::Neutral), 1);
    assert_eq!(report.tally().total(), report.comment_count());
    assert!(report.wordcloud_positive().is_some());
    assert!(report.wordcloud_negative().is_none());
}

#[tokio::test]
async fn no_comments_still_renders_pie_chart() {
    let harness = Harness::start().await;
    harness.comments(&[]).await;
    harness.video(harness.video_with_thumbnail("Quiet video")).await;
    harness.thumbnail(200).await;

    let report = harness.analyzer.analyze(VIDEO_URL).await.unwrap();

    assert_eq!(report.comment_count(), 0);
    assert_eq!(report.tally().total(), 0);
    for label in SentimentLabel::ALL {
        assert_eq!(report.tally().get(label), 0);
    }
    assert!(report.wordcloud_positive().is_none());
    assert!(report.wordcloud_negative().is_none());
    assert!(harness.exists(report.pie_chart()));

    let wordcloud_dir = harness.static_root.path().join("wordclouds").join(report.submission_id());
    assert_eq!(std::fs::read_dir(wordcloud_dir).unwrap().count(), 0);
}

#[tokio::test]
async fn unknown_video_uses_placeholder_title() {
    let harness = Harness::start().await;
    harness.comments(&["great!"]).await;
    harness.video(json!({ "items": [] })).await;

    let report = harness.analyzer.analyze(VIDEO_URL).await.unwrap();

    assert_eq!(report.video_title(), UNKNOWN_TITLE);
    assert_eq!(report.thumbnail(), None);
    assert_eq!(report.comment_count(), 1);
    assert!(!harness.exists("thumbs/abc123.jpg"));
}

#[tokio::test]
async fn failed_thumbnail_download_is_ignored() {
    let harness = Harness::start().await;
    harness.comments(&["great!"]).await;
    harness.video(harness.video_with_thumbnail("Some video")).await;
    harness.thumbnail(404).await;

    let report = harness.analyzer.analyze(VIDEO_URL).await.unwrap();

    assert_eq!(report.thumbnail(), None);
    assert!(!harness.exists("thumbs/abc123.jpg"));
    assert!(harness.exists(report.pie_chart()));
}

#[tokio::test]
async fn invalid_url_stops_before_any_request() {
    let harness = Harness::start().await;

    let err = harness.analyzer.analyze("https://example.com/watch").await.unwrap_err();

    assert!(matches!(err, AnalysisError::InvalidUrl));
    assert_eq!(err.user_message(), "Invalid YouTube URL.");
    assert_eq!(harness.server.received_requests().await.unwrap().len(), 0);
    assert_eq!(std::fs::read_dir(harness.static_root.path().join("charts")).unwrap().count(), 0);
}

#[tokio::test]
async fn service_failure_aborts_with_detail() {
    let harness = Harness::start().await;
    Mock::given(method("GET"))
        .and(path("/commentThreads"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": { "code": 403, "message": "The video has disabled comments." }
        })))
        .mount(&harness.server)
        .await;
    harness.video(harness.video_with_thumbnail("Some video")).await;

    let err = harness.analyzer.analyze(VIDEO_URL).await.unwrap_err();

    assert!(matches!(err, AnalysisError::ExternalService(_)));
    assert!(err.user_message().starts_with("Error: "));
    assert!(err.user_message().contains("The video has disabled comments."));
    assert_eq!(std::fs::read_dir(harness.static_root.path().join("charts")).unwrap().count(), 0);
}

#[tokio::test]
async fn repeated_submissions_agree_but_do_not_share_files() {
    let harness = Harness::start().await;
    harness.comments(&["great!", "terrible.", "I love it", "boring and bad", "ok"]).await;
    harness.video(harness.video_with_thumbnail("Some video")).await;
    harness.thumbnail(200).await;

    let first = harness.analyzer.analyze(VIDEO_URL).await.unwrap();
    let second = harness.analyzer.analyze(VIDEO_URL).await.unwrap();

    assert_eq!(first.tally(), second.tally());
    assert_eq!(first.comment_count(), second.comment_count());
    assert_ne!(first.submission_id(), second.submission_id());
    assert_ne!(first.pie_chart(), second.pie_chart());
    assert!(harness.exists(first.pie_chart()));
    assert!(harness.exists(second.pie_chart()));
}

#[tokio::test]
async fn only_recent_submissions_are_kept() {
    let harness = Harness::with_layout(|root| ArtifactLayout::new(root).with_retention(2)).await;
    harness.comments(&["great!", "terrible."]).await;
    harness.video(harness.video_with_thumbnail("Some video")).await;
    harness.thumbnail(200).await;

    let mut reports = Vec::new();
    for _ in 0..3 {
        reports.push(harness.analyzer.analyze(VIDEO_URL).await.unwrap());
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }

    assert_eq!(harness.submissions_in("charts"), 2);
    assert_eq!(harness.submissions_in("wordclouds"), 2);
    assert!(!harness.exists(reports[0].pie_chart()));
    assert!(harness.exists(reports[2].pie_chart()));
}

#[tokio::test]
async fn failed_submission_removes_its_directories() {
    let harness = Harness::start().await;
    harness.comments(&["great!"]).await;
    harness.video(harness.video_with_thumbnail("Some video")).await;
    harness.thumbnail(200).await;

    let wordclouds = harness.static_root.path().join("wordclouds");
    std::fs::remove_dir(&wordclouds).unwrap();
    std::fs::write(&wordclouds, b"not a directory").unwrap();

    let err = harness.analyzer.analyze(VIDEO_URL).await.unwrap_err();

    assert!(matches!(err, AnalysisError::Storage(_)));
    assert_eq!(harness.submissions_in("charts"), 0);
}

#[tokio::test]
async fn transport_failures_do_not_reveal_the_api_key() {
    let static_root = tempfile::tempdir().unwrap();
    let http = reqwest::Client::new();
    let youtube = YoutubeClient::new(http.clone(), &YoutubeConfig::new("SECRET-KEY-123", "http://127.0.0.1:1")).unwrap();
    let layout = ArtifactLayout::new(static_root.path());
    layout.bootstrap().unwrap();
    let analyzer = Analyzer::new(youtube, http, layout, Renderer::default(), 300);

    let err = analyzer.analyze(VIDEO_URL).await.unwrap_err();

    assert!(matches!(err, AnalysisError::ExternalService(_)));
    assert!(err.user_message().starts_with("Error: "));
    assert!(!err.user_message().contains("SECRET-KEY-123"));
    assert!(!format!("{:?}", err).contains("SECRET-KEY-123"));
}
