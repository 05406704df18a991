use {
    std::fmt,
    serde::Serialize,
    url::form_urlencoded,
};

const QUERY_PARAMETER: &str = "v";

#[derive(Serialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returns the first non-empty `v` query parameter of `url`.
///
/// Only the query matters: the text after the first `?` up to any fragment.
/// Scheme, host and port are never validated.
pub fn extract_video_id(url: &str) -> Option<VideoId> {
    let without_fragment = url.split('#').next().unwrap_or_default();
    let (_, query) = without_fragment.split_once('?')?;

    form_urlencoded::parse(query.as_bytes())
        .filter(|(name, _)| name == QUERY_PARAMETER)
        .map(|(_, value)| value.into_owned())
        .find(|value| !value.is_empty())
        .map(VideoId)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(url: &str) -> Option<String> {
        extract_video_id(url).map(|v| v.as_str().to_owned())
    }

    #[test]
    fn extracts_watch_parameter() {
        assert_eq!(extract("https://www.youtube.com/watch?v=dQw4w9WgXcQ"), Some("dQw4w9WgXcQ".to_owned()));
        assert_eq!(extract("https://example.com/watch?v=abc123"), Some("abc123".to_owned()));
    }

    #[test]
    fn parameter_position_does_not_matter() {
        assert_eq!(extract("https://www.youtube.com/watch?list=PL1&v=abc&t=42s"), Some("abc".to_owned()));
        assert_eq!(extract("https://www.youtube.com/watch?feature=share&v=xyz#comments"), Some("xyz".to_owned()));
    }

    #[test]
    fn first_non_empty_value_wins() {
        assert_eq!(extract("https://example.com/watch?v=&v=second&v=third"), Some("second".to_owned()));
    }

    #[test]
    fn value_is_percent_decoded() {
        assert_eq!(extract("https://example.com/watch?v=a%2Db"), Some("a-b".to_owned()));
    }

    #[test]
    fn relative_reference_is_accepted() {
        assert_eq!(extract("watch?v=abc"), Some("abc".to_owned()));
        assert_eq!(extract("/watch?v=abc"), Some("abc".to_owned()));
    }

    #[test]
    fn missing_parameter_is_none() {
        assert_eq!(extract("https://example.com/watch"), None);
        assert_eq!(extract("https://example.com/watch?video=abc"), None);
        assert_eq!(extract("https://example.com/watch?v="), None);
        assert_eq!(extract("https://youtu.be/dQw4w9WgXcQ"), None);
    }

    #[test]
    fn host_and_port_are_not_validated() {
        assert_eq!(extract("https://exa mple.com/watch?v=abc"), Some("abc".to_owned()));
        assert_eq!(extract("https://www.youtube.com:99999/watch?v=abc"), Some("abc".to_owned()));
        assert_eq!(extract("http://[::1/watch?v=abc"), Some("abc".to_owned()));
        assert_eq!(extract("?v=abc"), Some("abc".to_owned()));
    }

    #[test]
    fn fragment_is_not_part_of_the_query() {
        assert_eq!(extract("https://example.com/watch#section?v=abc"), None);
        assert_eq!(extract("https://example.com/watch?t=1#v=abc"), None);
    }

    #[test]
    fn text_without_query_is_none() {
        assert_eq!(extract(""), None);
        assert_eq!(extract("not a url"), None);
        assert_eq!(extract("http://[::1"), None);
    }
}
