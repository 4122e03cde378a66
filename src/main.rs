//! Article Relay — Binary Entrypoint
//! Boots the Axum command surface, wiring the pipeline, shared HTTP client,
//! ledger, and metrics.

use anyhow::Context;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use article_relay::api::{self, AppState};
use article_relay::catalog::{SitemapIndex, SourceCatalog};
use article_relay::config::RelayConfig;
use article_relay::fetcher::HttpArticleFetcher;
use article_relay::ledger::Ledger;
use article_relay::metrics::Metrics;
use article_relay::pipeline::PipelineController;
use article_relay::publisher::WordPressPublisher;
use article_relay::translate::RestTranslator;

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("article_relay=info,warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when the vars come from the environment.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = RelayConfig::from_env().context("loading configuration")?;

    // Recorder must be installed before the pipeline registers its series.
    let metrics = Metrics::init();

    // One client for every remote call; the timeout bounds each of them.
    let client = reqwest::Client::builder()
        .timeout(cfg.http_timeout)
        .build()
        .context("building http client")?;

    let ledger = Ledger::open(&cfg.ledger_path).context("opening ledger")?;
    let catalog = SourceCatalog::new(Box::new(SitemapIndex::new(
        cfg.sitemap_url.clone(),
        client.clone(),
    )));
    let fetcher = HttpArticleFetcher::new(client.clone());
    let translator = RestTranslator::new(
        cfg.translate_url.clone(),
        cfg.translate_api_key.clone(),
        cfg.lang_from.clone(),
        cfg.lang_to.clone(),
        client.clone(),
    );
    let publisher = WordPressPublisher::new(&cfg.site_url, &cfg.wp_login, &cfg.wp_password, client);

    let pipeline = PipelineController::new(
        catalog,
        Box::new(fetcher),
        Box::new(translator),
        Box::new(publisher),
        ledger,
    );

    let router = api::create_router(AppState::new(pipeline)).merge(metrics.router());

    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr)
        .await
        .with_context(|| format!("binding {}", cfg.bind_addr))?;
    tracing::info!(addr = %cfg.bind_addr, lang = %format!("{}->{}", cfg.lang_from, cfg.lang_to), "relay listening");
    axum::serve(listener, router).await.context("serving")?;
    Ok(())
}
