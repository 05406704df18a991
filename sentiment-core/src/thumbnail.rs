use {
    std::path::{Path, PathBuf},
    tracing::{debug, warn},
    reqwest::StatusCode,
};

/// Best-effort download: every failure is logged and turned into `None`.
pub async fn download_thumbnail(client: &reqwest::Client, url: &str, destination: &Path) -> Option<PathBuf> {
    if url.is_empty() {
        debug!("no thumbnail url, skipping download");
        return None;
    }

    let res = match client.get(url).send().await {
        Ok(v) => v,
        Err(err) => {
            warn!("failed to download thumbnail from {}: {}", url, err);
            return None;
        }
    };

    if res.status() != StatusCode::OK {
        warn!("thumbnail host returned status {} for {}", res.status().as_u16(), url);
        return None;
    }

    let bytes = match res.bytes().await {
        Ok(v) => v,
        Err(err) => {
            warn!("failed to read thumbnail body from {}: {}", url, err);
            return None;
        }
    };

    if let Err(err) = tokio::fs::write(destination, &bytes).await {
        warn!("failed to save thumbnail to {}: {}", destination.display(), err);
        return None;
    }

    Some(destination.to_path_buf())
}
