use {
    actix_web::{web, App, HttpServer},
    tracing::info,
    sentiment_core::{
        config::Config,
        pipeline::Analyzer,
        sentiment::SentimentClassifier,
    },
    sentiment_web::{
        handlers,
        server::configure_routes,
        templates::Templates,
        utils::init_logging,
    },
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = Config::load();
    config.validate()?;

    let analyzer = web::Data::new(Analyzer::from_config(&config)?);
    analyzer.layout().bootstrap()?;
    SentimentClassifier::new().warm_up();

    let templates = web::Data::new(Templates::new()?);
    let layout = analyzer.layout().clone();

    info!("serving artifacts from {}", layout.root().display());
    info!("listening on {}:{}", config.server.host, config.server.port);

    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(analyzer.clone())
            .app_data(templates.clone())
            .configure(|cfg| configure_routes(cfg, &layout))
            .default_service(web::route().to(handlers::not_found))
    });
    if let Some(workers) = config.server.workers {
        server = server.workers(workers);
    }

    server
        .bind((config.server.host.as_str(), config.server.port))?
        .run()
        .await?;

    Ok(())
}
