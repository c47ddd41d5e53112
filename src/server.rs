//! HTTP Server
//!
//! Axum HTTP 服务器启动与优雅关闭

use std::future::Future;

use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::ServerConfig;
use crate::error::{Error, Result};

/// HTTP 服务器
pub struct Server {
    config: ServerConfig,
    router: Router,
}

impl Server {
    pub fn new(config: ServerConfig, router: Router) -> Self {
        Self { config, router }
    }

    async fn bind(&self) -> Result<TcpListener> {
        let addr = self.config.addr();
        TcpListener::bind(&addr)
            .await
            .map_err(|source| Error::Bind { addr, source })
    }

    /// 启动服务器
    pub async fn run(self) -> Result<()> {
        let listener = self.bind().await?;

        info!("Starting HTTP server on {}", self.config.addr());

        axum::serve(listener, self.router).await.map_err(Error::Serve)
    }

    /// 启动服务器（带优雅关闭）
    pub async fn run_with_shutdown<F>(self, shutdown_signal: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = self.bind().await?;

        info!(
            "Starting HTTP server on {} (with graceful shutdown)",
            self.config.addr()
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(Error::Serve)
    }
}

/// 等待 Ctrl-C
pub async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received shutdown signal"),
        Err(e) => tracing::error!(error = %e, "Failed to listen for shutdown signal"),
    }
}
