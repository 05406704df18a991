use {
    std::path::PathBuf,
    actix_files::Files,
    actix_web::web,
    sentiment_core::artifacts::{ArtifactLayout, CHART_DIR, THUMB_DIR, WORDCLOUD_DIR},
    crate::handlers,
};

/// Form routes plus the generated images, served straight from the artifact directories.
pub fn configure_routes(cfg: &mut web::ServiceConfig, layout: &ArtifactLayout) {
    cfg
        .route("/", web::get().to(handlers::index))
        .route("/", web::post().to(handlers::submit))
        .service(artifact_files(WORDCLOUD_DIR, layout.wordcloud_dir()))
        .service(artifact_files(CHART_DIR, layout.chart_dir()))
        .service(artifact_files(THUMB_DIR, layout.thumb_dir()));
}

fn artifact_files(mount: &str, dir: PathBuf) -> Files {
    Files::new(&format!("/{}", mount), dir)
        .default_handler(web::route().to(handlers::not_found))
}
