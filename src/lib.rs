//! TurboAPI - 高性能 Web 框架
//!
//! 在 axum 之上提供简洁的应用/路由 API，参数提取与校验基于 serde。
//!
//! 顶层命名空间汇总了编写服务所需的全部名称：
//! - 应用与路由: [`TurboApi`], [`ApiRouter`]
//! - 参数: [`Path`], [`Query`], [`Header`], [`Cookie`], [`Body`], [`Depends`], [`Security`]
//! - 响应: [`JsonResponse`], [`HtmlResponse`], [`PlainTextResponse`], [`RedirectResponse`], [`Response`]
//! - 请求: [`Request`]
//! - 中间件: [`Middleware`]
//! - 异常: [`HttpException`]
//!
//! ```rust,ignore
//! use turboapi::prelude::*;
//!
//! async fn read_item(Path(item_id): Path<u64>) -> JsonResponse<serde_json::Value> {
//!     JsonResponse::new(serde_json::json!({ "item_id": item_id }))
//! }
//!
//! #[tokio::main]
//! async fn main() -> turboapi::Result<()> {
//!     TurboApi::new()
//!         .get("/items/:item_id", read_item)
//!         .serve(&ServerConfig::default())
//!         .await
//! }
//! ```

pub mod applications;
pub mod config;
pub mod error;
pub mod exceptions;
pub mod logging;
pub mod middleware;
pub mod params;
pub mod prelude;
pub mod responses;
pub mod routing;
pub mod server;

/// 框架版本
pub const VERSION: &str = "0.1.0";

pub use applications::TurboApi;
pub use routing::ApiRouter;
pub use params::{Body, Cookie, Depends, Header, Path, Query, Security};
pub use responses::{HtmlResponse, JsonResponse, PlainTextResponse, RedirectResponse, Response};
pub use axum::extract::Request;
pub use middleware::Middleware;
pub use exceptions::HttpException;

pub use config::{load_config, AppConfig};
pub use error::{Error, Result};

// 供实现 `Dependency` / `SecurityScheme` 时使用
pub use async_trait::async_trait;
