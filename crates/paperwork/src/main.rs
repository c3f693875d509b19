//! `paperwork`: local form-filling service entry point.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from environment variables.
//! 2. Initialise the telemetry pipeline (tracing, optional OTLP export).
//! 3. Load or create the device key.
//! 4. Build the form registry, answer vault, and document assembler.
//! 5. Build the Axum router and serve until Ctrl-C.

mod answers;
mod assembler;
mod config;
mod crypto;
mod forms;
mod keys;
mod server;
mod telemetry;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use answers::{AnswerVault, FileAnswerStore};
use assembler::{DirTemplateSource, DocumentAssembler};
use config::Config;
use forms::FormRegistry;
use keys::{FileKeyStore, KeyManager};
use server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init_telemetry(cfg.otel_exporter_otlp_endpoint.as_deref(), &cfg.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        listen_addr = %cfg.listen_addr,
        "paperwork starting"
    );

    // -----------------------------------------------------------------------
    // 3. Device key
    // -----------------------------------------------------------------------
    tokio::fs::create_dir_all(&cfg.data_dir)
        .await
        .with_context(|| format!("creating data directory {}", cfg.data_dir.display()))?;
    let key_store = Arc::new(FileKeyStore::new(cfg.key_file()));
    let key_path = key_store.path().to_owned();
    let keys = KeyManager::new(key_store);
    keys.get_or_create_key()
        .await
        .context("device key could not be loaded or created")?;
    info!(key_file = %key_path.display(), "device key ready");

    // -----------------------------------------------------------------------
    // 4. Forms, answers, templates
    // -----------------------------------------------------------------------
    let forms = FormRegistry::builtin()?;
    for def in forms.iter() {
        if !cfg.template_dir.join(def.pdf_template_ref).is_file() {
            warn!(form_id = def.id, template = def.pdf_template_ref, "template missing");
        }
    }
    info!(forms = forms.len(), "form registry ready");

    let vault = AnswerVault::new(Arc::new(FileAnswerStore::new(cfg.answers_file())));
    let assembler = DocumentAssembler::new(
        Arc::new(DirTemplateSource::new(&cfg.template_dir)),
        cfg.template_load_timeout(),
    );

    // -----------------------------------------------------------------------
    // 5. HTTP server
    // -----------------------------------------------------------------------
    let shutdown = CancellationToken::new();
    let state = AppState::new(keys, vault, forms, assembler, shutdown.clone());
    let router = server::router::build(state);

    let addr = cfg.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(addr = %addr, "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    info!("paperwork stopped");
    Ok(())
}

/// Resolve on Ctrl-C and cancel every in-flight assembly.
async fn shutdown_signal(shutdown: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "could not listen for Ctrl-C");
        return shutdown.cancelled().await;
    }
    info!("shutdown requested");
    shutdown.cancel();
}
