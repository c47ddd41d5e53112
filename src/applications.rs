//! Application
//!
//! `TurboApi` 组合路由、中间件、共享依赖与异常处理，构建最终的 axum `Router`

use std::future::Future;
use std::sync::Arc;

use axum::{
    handler::Handler,
    http::StatusCode,
    middleware::map_response,
    response::{IntoResponse, Response},
    Extension, Router,
};

use crate::config::{AppConfig, ServerConfig};
use crate::error::Result;
use crate::exceptions::HttpException;
use crate::middleware::Middleware;
use crate::routing::{ApiRouter, RouteInfo};
use crate::server::Server;

type ExceptionHandler = Arc<dyn Fn(&HttpException) -> Response + Send + Sync>;

/// Web 应用
///
/// ```rust,ignore
/// let app = TurboApi::new()
///     .with_title("Inventory")
///     .get("/ping", ping)
///     .include_router(items_router())
///     .add_middleware(Middleware::trace());
///
/// app.serve(&ServerConfig::default()).await?;
/// ```
pub struct TurboApi {
    title: String,
    version: String,
    description: Option<String>,
    root: ApiRouter,
    middleware: Vec<Middleware>,
    provided: Vec<Middleware>,
    exception_handler: Option<ExceptionHandler>,
}

impl Default for TurboApi {
    fn default() -> Self {
        Self::new()
    }
}

impl TurboApi {
    pub fn new() -> Self {
        Self {
            title: "TurboAPI".to_string(),
            version: crate::VERSION.to_string(),
            description: None,
            root: ApiRouter::new(),
            middleware: Vec::new(),
            provided: Vec::new(),
            exception_handler: None,
        }
    }

    /// 按配置创建应用
    ///
    /// 中间件顺序（外 → 内）：CORS（启用时）、请求追踪、错误日志、请求体大小限制。
    pub fn from_config(config: &AppConfig) -> Self {
        let mut app = Self::new()
            .with_title(config.app.title.clone())
            .with_version(config.app.version.clone());
        app.description = config.app.description.clone();

        if config.cors.enabled {
            app = app.add_middleware(Middleware::cors(&config.cors));
        }

        app.add_middleware(Middleware::trace())
            .add_middleware(Middleware::error_logging())
            .add_middleware(Middleware::body_limit(config.limits.body_limit_bytes))
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn get<H, T>(mut self, path: &str, handler: H) -> Self
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        self.root = self.root.get(path, handler);
        self
    }

    pub fn post<H, T>(mut self, path: &str, handler: H) -> Self
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        self.root = self.root.post(path, handler);
        self
    }

    pub fn put<H, T>(mut self, path: &str, handler: H) -> Self
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        self.root = self.root.put(path, handler);
        self
    }

    pub fn patch<H, T>(mut self, path: &str, handler: H) -> Self
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        self.root = self.root.patch(path, handler);
        self
    }

    pub fn delete<H, T>(mut self, path: &str, handler: H) -> Self
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        self.root = self.root.delete(path, handler);
        self
    }

    /// 挂载路由分组
    pub fn include_router(mut self, router: ApiRouter) -> Self {
        self.root = self.root.include_router(router);
        self
    }

    /// 注册中间件，先注册的位于最外层
    pub fn add_middleware(mut self, middleware: Middleware) -> Self {
        tracing::debug!(middleware = middleware.name(), "Adding middleware");
        self.middleware.push(middleware);
        self
    }

    /// 注册共享值，依赖中通过 `params::provided::<T>()` 读取
    pub fn provide<T>(mut self, value: T) -> Self
    where
        T: Clone + Send + Sync + 'static,
    {
        self.provided
            .push(Middleware::layer(std::any::type_name::<T>(), Extension(value)));
        self
    }

    /// 自定义 `HttpException` 的渲染方式
    pub fn exception_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&HttpException) -> Response + Send + Sync + 'static,
    {
        self.exception_handler = Some(Arc::new(handler));
        self
    }

    /// 已注册路由（完整路径）
    pub fn routes(&self) -> &[RouteInfo] {
        self.root.routes()
    }

    /// 构建 axum `Router`
    pub fn into_router(self) -> Router {
        let mut router = self
            .root
            .into_router()
            .method_not_allowed_fallback(method_not_allowed)
            .fallback(not_found);

        if let Some(handler) = self.exception_handler {
            router = router.layer(map_response(move |mut response: Response| {
                let handler = handler.clone();
                async move {
                    match response.extensions_mut().remove::<HttpException>() {
                        Some(exception) => handler(&exception),
                        None => response,
                    }
                }
            }));
        }

        for provided in &self.provided {
            router = provided.apply(router);
        }

        // 先注册的最后应用，位于最外层
        for middleware in self.middleware.iter().rev() {
            router = middleware.apply(router);
        }

        router
    }

    /// 启动服务器
    pub async fn serve(self, config: &ServerConfig) -> Result<()> {
        self.server(config).run().await
    }

    /// 启动服务器（带优雅关闭）
    pub async fn serve_with_shutdown<F>(self, config: &ServerConfig, shutdown_signal: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.server(config).run_with_shutdown(shutdown_signal).await
    }

    fn server(self, config: &ServerConfig) -> Server {
        tracing::info!(
            title = %self.title,
            version = %self.version,
            routes = self.routes().len(),
            "Building application"
        );
        Server::new(config.clone(), self.into_router())
    }
}

async fn not_found() -> Response {
    HttpException::not_found("Not Found").into_response()
}

async fn method_not_allowed() -> Response {
    HttpException::new(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Method, Request},
    };
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    async fn hello() -> &'static str {
        "hello"
    }

    async fn teapot() -> std::result::Result<&'static str, HttpException> {
        Err(HttpException::new(StatusCode::IM_A_TEAPOT, "short and stout"))
    }

    async fn call(app: TurboApi, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app.into_router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[test]
    fn test_defaults() {
        let app = TurboApi::new();
        assert_eq!(app.title(), "TurboAPI");
        assert_eq!(app.version(), "0.1.0");
        assert_eq!(app.description(), None);
        assert!(app.routes().is_empty());
    }

    #[test]
    fn test_from_config() {
        let mut config = AppConfig::default();
        config.app.title = "Inventory".to_string();
        config.app.description = Some("Stock levels".to_string());
        config.cors.enabled = true;

        let app = TurboApi::from_config(&config);
        assert_eq!(app.title(), "Inventory");
        assert_eq!(app.description(), Some("Stock levels"));
        let names: Vec<&str> = app.middleware.iter().map(Middleware::name).collect();
        assert_eq!(names, vec!["cors", "trace", "error_logging", "body_limit"]);
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_not_found() {
        let app = TurboApi::new().get("/hello", hello);
        let (status, body) = call(app, "/missing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "detail": "Not Found" }));
    }

    #[tokio::test]
    async fn test_exception_handler_rerenders_exceptions() {
        let app = TurboApi::new()
            .get("/teapot", teapot)
            .exception_handler(|exception| {
                (
                    exception.status(),
                    axum::Json(json!({ "error": exception.detail(), "code": exception.status().as_u16() })),
                )
                    .into_response()
            });

        let (status, body) = call(app, "/teapot").await;
        assert_eq!(status, StatusCode::IM_A_TEAPOT);
        assert_eq!(body, json!({ "error": "short and stout", "code": 418 }));
    }

    #[tokio::test]
    async fn test_wrong_method_is_json_method_not_allowed() {
        let app = TurboApi::new().get("/hello", hello);
        let request = Request::builder()
            .method(Method::POST)
            .uri("/hello")
            .body(Body::empty())
            .unwrap();
        let response = app.into_router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[header::ALLOW], "GET,HEAD");

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({ "detail": "Method Not Allowed" }));
    }

    #[tokio::test]
    async fn test_exception_handler_rerenders_not_found_fallback() {
        let app = TurboApi::new()
            .get("/hello", hello)
            .exception_handler(|exception| {
                (
                    exception.status(),
                    axum::Json(json!({ "message": exception.detail() })),
                )
                    .into_response()
            });

        let (status, body) = call(app, "/missing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "message": "Not Found" }));
    }

    #[tokio::test]
    async fn test_exception_handler_leaves_plain_responses() {
        let app = TurboApi::new()
            .get("/hello", hello)
            .exception_handler(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response());

        let request = Request::builder().uri("/hello").body(Body::empty()).unwrap();
        let response = app.into_router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
