//! Crate Error Types
//!
//! 启动阶段错误（配置、日志、监听、服务）。请求处理中的错误使用 [`crate::HttpException`]。

use thiserror::Error;

use crate::config::ConfigError;

/// 框架错误
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to initialize logging: {0}")]
    Logging(String),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
