pub mod glyphs;
pub mod pie_chart;
pub mod word_cloud;

use {
    tracing::info,
    thiserror::Error,
    crate::{
        aggregate::SentimentTally,
        artifacts::Artifact,
        config::RenderingConfig,
        render::{
            pie_chart::pie_chart_image,
            word_cloud::{word_cloud_image, WordCloudOptions},
        },
    },
};

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to encode image: {0}")]
    Image(#[from] image::ImageError),
    #[error("rendering task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Turns aggregated data into image files. Drawing happens on the blocking pool.
#[derive(Debug, Clone)]
pub struct Renderer {
    pie_chart_size: u32,
    word_cloud: WordCloudOptions,
}

impl Renderer {
    pub fn new(config: &RenderingConfig) -> Self {
        Self {
            pie_chart_size: config.pie_chart_size,
            word_cloud: WordCloudOptions {
                width: config.wordcloud_width,
                height: config.wordcloud_height,
                max_words: config.max_words,
            },
        }
    }

    /// Always writes a chart, an all-zero tally included.
    pub async fn pie_chart(&self, tally: SentimentTally, artifact: &Artifact) -> Result<String, RenderError> {
        let size = self.pie_chart_size;
        let path = artifact.path.clone();

        tokio::task::spawn_blocking(move || pie_chart_image(&tally, size).save(&path)).await??;
        info!("rendered pie chart to {}", artifact.path.display());

        Ok(artifact.reference.clone())
    }

    /// Returns `None`, writing nothing, when there are no texts.
    pub async fn word_cloud(&self, texts: Vec<String>, artifact: &Artifact) -> Result<Option<String>, RenderError> {
        if texts.is_empty() {
            return Ok(None);
        }

        let options = self.word_cloud.clone();
        let path = artifact.path.clone();

        tokio::task::spawn_blocking(move || word_cloud_image(&texts, &options).save(&path)).await??;
        info!("rendered word cloud to {}", artifact.path.display());

        Ok(Some(artifact.reference.clone()))
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(&RenderingConfig::default())
    }
}
