use {
    tracing::Level,
    tracing_subscriber::{
        prelude::*,
        filter::filter_fn,
        EnvFilter,
    },
};

pub fn init_logging() {
    tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish()
        .with(filter_fn(|metadata| {
            let target = metadata.target();
            if target.starts_with("hyper") || target.starts_with("reqwest") {
                metadata.level() <= &Level::WARN
            } else {
                true
            }
        }))
        .init();
}
