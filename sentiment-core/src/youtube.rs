use {
    tracing::{debug, info},
    serde::Deserialize,
    reqwest::StatusCode,
    thiserror::Error,
    crate::{
        config::{ConfigError, YoutubeConfig},
        video_id::VideoId,
    },
};

pub const UNKNOWN_TITLE: &str = "Unknown Title";

// upper bound the API accepts for commentThreads.maxResults
const MAX_PAGE_SIZE: usize = 100;

const API_KEY_HEADER: &str = "X-Goog-Api-Key";

#[derive(Error, Debug)]
pub enum YoutubeError {
    /// Carries no request url, so the credential never reaches logs or pages.
    #[error("request to youtube api failed: {0}")]
    Transport(reqwest::Error),
    #[error("youtube api returned status {status}: {message}")]
    Api {
        status: u16,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct VideoMetadata {
    pub title: String,
    pub thumbnail_url: String,
}

pub struct YoutubeClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentThreadListResponse {
    #[serde(default)]
    items: Vec<CommentThread>,
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentThread {
    snippet: CommentThreadSnippet,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentThreadSnippet {
    top_level_comment: TopLevelComment,
}

#[derive(Deserialize)]
struct TopLevelComment {
    snippet: CommentSnippet,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentSnippet {
    #[serde(default)]
    text_display: String,
}

#[derive(Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<Video>,
}

#[derive(Deserialize)]
struct Video {
    snippet: Option<VideoSnippet>,
}

#[derive(Deserialize)]
struct VideoSnippet {
    title: Option<String>,
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Deserialize, Default)]
struct Thumbnails {
    high: Option<Thumbnail>,
}

#[derive(Deserialize)]
struct Thumbnail {
    url: String,
}

#[derive(Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorBody,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

impl VideoMetadata {
    pub fn unknown() -> Self {
        Self {
            title: UNKNOWN_TITLE.to_owned(),
            thumbnail_url: String::new(),
        }
    }
}

impl YoutubeClient {
    pub fn new(client: reqwest::Client, config: &YoutubeConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            client,
            endpoint: config.endpoint(),
            api_key: config.api_key()?,
        })
    }

    /// Top-level comments as plain text, in the order the API returns them,
    /// following page tokens until `max_results` comments are collected.
    pub async fn comments(&self, video_id: &VideoId, max_results: usize) -> Result<Vec<String>, YoutubeError> {
        let mut comments = Vec::new();
        let mut page_token: Option<String> = None;

        while comments.len() < max_results {
            let page_size = (max_results - comments.len()).min(MAX_PAGE_SIZE).to_string();
            let mut query = vec![
                ("part", "snippet"),
                ("videoId", video_id.as_str()),
                ("maxResults", page_size.as_str()),
                ("textFormat", "plainText"),
            ];
            if let Some(token) = page_token.as_deref() {
                query.push(("pageToken", token));
            }

            let page: CommentThreadListResponse = self.get("commentThreads", &query).await?;
            debug!("fetched {} comment threads for {}", page.items.len(), video_id);

            if page.items.is_empty() {
                break;
            }
            comments.extend(page.items.into_iter().map(|thread| thread.snippet.top_level_comment.snippet.text_display));

            page_token = match page.next_page_token {
                Some(v) if !v.is_empty() && page_token.as_deref() != Some(v.as_str()) => Some(v),
                _ => break,
            };
        }

        comments.truncate(max_results);
        info!("fetched {} comments for {}", comments.len(), video_id);

        Ok(comments)
    }

    /// An unknown video is not an error: it yields the placeholder title and no thumbnail.
    pub async fn video_details(&self, video_id: &VideoId) -> Result<VideoMetadata, YoutubeError> {
        let query = [
            ("part", "snippet"),
            ("id", video_id.as_str()),
        ];
        let response: VideoListResponse = self.get("videos", &query).await?;

        let snippet = match response.items.into_iter().next().and_then(|video| video.snippet) {
            Some(v) => v,
            None => {
                info!("no video found for {}", video_id);
                return Ok(VideoMetadata::unknown());
            }
        };

        Ok(VideoMetadata {
            title: snippet.title.filter(|v| !v.is_empty()).unwrap_or(UNKNOWN_TITLE.to_owned()),
            thumbnail_url: snippet.thumbnails.high.map(|v| v.url).unwrap_or_default(),
        })
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, resource: &str, query: &[(&str, &str)]) -> Result<T, YoutubeError> {
        let res = self.client.get(format!("{}/{}", self.endpoint, resource))
            .query(query)
            .header(API_KEY_HEADER, self.api_key.as_str())
            .send()
            .await
            .map_err(YoutubeError::transport)?;

        let status = res.status();
        if status != StatusCode::OK {
            let body = res.text().await.unwrap_or_default();
            return Err(YoutubeError::Api {
                status: status.as_u16(),
                message: api_error_message(&body, status),
            });
        }

        res.json().await.map_err(YoutubeError::transport)
    }
}

impl YoutubeError {
    fn transport(err: reqwest::Error) -> Self {
        YoutubeError::Transport(err.without_url())
    }
}

fn api_error_message(body: &str, status: StatusCode) -> String {
    serde_json::from_str::<ApiErrorResponse>(body)
        .map(|v| v.error.message)
        .unwrap_or_else(|_| status.canonical_reason().unwrap_or("unknown error").to_owned())
}
