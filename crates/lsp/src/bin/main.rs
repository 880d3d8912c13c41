// Copyright (c) 2025 xmlview-lsp contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

use tower_lsp::{LspService, Server};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() {
    // Initialize logging; stdout carries the protocol, so log to stderr
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    tracing::info!("Starting xmlview-lsp server");

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(xmlview_lsp_lsp::backend::XmlViewBackend::new);

    Server::new(stdin, stdout, socket).serve(service).await;
}
