//! HTTP Exceptions
//!
//! 处理器、提取器与路由回退统一使用的错误类型，响应格式与 FastAPI 一致：
//! `{"detail": ...}`

use axum::{
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

/// HTTP 异常
///
/// 可以在处理器中直接作为错误返回（`Result<T, HttpException>`），
/// 也是所有参数提取器的拒绝类型。
#[derive(Debug, Clone, Error)]
#[error("{status}: {detail}")]
pub struct HttpException {
    status: StatusCode,
    detail: Value,
    headers: HeaderMap,
}

impl HttpException {
    /// 创建 HTTP 异常
    pub fn new(status: StatusCode, detail: impl Into<Value>) -> Self {
        Self {
            status,
            detail: detail.into(),
            headers: HeaderMap::new(),
        }
    }

    pub fn bad_request(detail: impl Into<Value>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, detail)
    }

    pub fn unauthorized(detail: impl Into<Value>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, detail)
    }

    pub fn forbidden(detail: impl Into<Value>) -> Self {
        Self::new(StatusCode::FORBIDDEN, detail)
    }

    pub fn not_found(detail: impl Into<Value>) -> Self {
        Self::new(StatusCode::NOT_FOUND, detail)
    }

    pub fn unprocessable(detail: impl Into<Value>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, detail)
    }

    pub fn internal(detail: impl Into<Value>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, detail)
    }

    /// 创建参数校验错误（422）
    ///
    /// `loc` 为出错位置，例如 `["query", "limit"]`；`kind` 为错误类别。
    pub fn validation(loc: &[&str], msg: impl Into<String>, kind: &str) -> Self {
        Self::unprocessable(json!([{
            "loc": loc,
            "msg": msg.into(),
            "type": kind,
        }]))
    }

    /// 附加响应头
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn detail(&self) -> &Value {
        &self.detail
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// 按默认格式渲染，不附加扩展信息
    pub fn render(&self) -> Response {
        let body = json!({ "detail": self.detail });
        (self.status, self.headers.clone(), Json(body)).into_response()
    }
}

impl IntoResponse for HttpException {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status.as_u16(), detail = %self.detail, "HTTP exception");
        } else {
            tracing::warn!(status = %self.status.as_u16(), detail = %self.detail, "HTTP exception");
        }

        let mut response = self.render();
        // 供应用级异常处理器重新渲染
        response.extensions_mut().insert(self);
        response
    }
}
