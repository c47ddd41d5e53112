//! HTTP Middleware
//!
//! `Middleware` 是对 tower layer 的命名包装，通过 `TurboApi::add_middleware` 注册，
//! 先注册的位于最外层。

use std::convert::Infallible;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{DefaultBodyLimit, Request},
    http::HeaderValue,
    middleware::{self as axum_middleware, Next},
    response::{IntoResponse, Response},
    routing::Route,
    Router,
};
use tower::{Layer, Service};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::CorsConfig;

type ApplyFn = dyn Fn(Router) -> Router + Send + Sync;

/// 中间件
#[derive(Clone)]
pub struct Middleware {
    name: String,
    apply: Arc<ApplyFn>,
}

impl Middleware {
    /// 包装任意 tower layer
    pub fn layer<L>(name: impl Into<String>, layer: L) -> Self
    where
        L: Layer<Route> + Clone + Send + Sync + 'static,
        L::Service: Service<Request> + Clone + Send + 'static,
        <L::Service as Service<Request>>::Response: IntoResponse + 'static,
        <L::Service as Service<Request>>::Error: Into<Infallible> + 'static,
        <L::Service as Service<Request>>::Future: Send + 'static,
    {
        Self {
            name: name.into(),
            apply: Arc::new(move |router: Router| router.layer(layer.clone())),
        }
    }

    /// 跨域中间件
    ///
    /// `allow_origins` 含 `"*"` 时允许任意来源，无法解析的来源会被忽略。
    pub fn cors(config: &CorsConfig) -> Self {
        let allow_origin = if config.allow_origins.iter().any(|origin| origin == "*") {
            AllowOrigin::any()
        } else {
            let origins: Vec<HeaderValue> = config
                .allow_origins
                .iter()
                .filter_map(|origin| match HeaderValue::from_str(origin) {
                    Ok(value) => Some(value),
                    Err(_) => {
                        tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                        None
                    }
                })
                .collect();
            AllowOrigin::list(origins)
        };

        let cors = CorsLayer::new()
            .allow_origin(allow_origin)
            .allow_methods(Any)
            .allow_headers(Any)
            .max_age(Duration::from_secs(config.max_age_secs));

        Self::layer("cors", cors)
    }

    /// 请求追踪
    pub fn trace() -> Self {
        Self::layer("trace", TraceLayer::new_for_http())
    }

    /// 请求体大小限制
    pub fn body_limit(bytes: usize) -> Self {
        Self::layer("body_limit", DefaultBodyLimit::max(bytes))
    }

    /// 4xx / 5xx 响应日志
    pub fn error_logging() -> Self {
        Self::layer(
            "error_logging",
            axum_middleware::from_fn(error_logging_middleware),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn apply(&self, router: Router) -> Router {
        (self.apply)(router)
    }
}

impl fmt::Debug for Middleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Middleware").field("name", &self.name).finish()
    }
}

/// HTTP 状态码错误日志中间件
///
/// 拦截 HTTP 响应，当状态码为 4xx 或 5xx 时记录日志。
/// `HttpException` 自身的 detail 在 `into_response()` 中记录。
pub async fn error_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;
    let status = response.status();

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            "HTTP server error"
        );
    } else if status.is_client_error() {
        tracing::warn!(
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            "HTTP client error"
        );
    }

    response
}
