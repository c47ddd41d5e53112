//! Response Types
//!
//! JSON / HTML / 纯文本 / 重定向响应，均可直接从处理器返回

use axum::{
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{Html, IntoResponse},
    Json,
};
use serde::Serialize;

use crate::exceptions::HttpException;

pub use axum::response::Response;

/// 为响应类型生成 `with_status` / `with_header` 构建方法
macro_rules! response_builder {
    ($ty:ident $(<$param:ident>)?) => {
        impl$(<$param>)? $ty$(<$param>)? {
            /// 设置状态码
            pub fn with_status(mut self, status: StatusCode) -> Self {
                self.status = status;
                self
            }

            /// 附加响应头
            pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
                self.headers.insert(name, value);
                self
            }

            pub fn status(&self) -> StatusCode {
                self.status
            }
        }
    };
}

/// JSON 响应
#[derive(Debug, Clone)]
pub struct JsonResponse<T> {
    content: T,
    status: StatusCode,
    headers: HeaderMap,
}

impl<T: Serialize> JsonResponse<T> {
    pub fn new(content: T) -> Self {
        Self {
            content,
            status: StatusCode::OK,
            headers: HeaderMap::new(),
        }
    }
}

response_builder!(JsonResponse<T>);

impl<T: Serialize> IntoResponse for JsonResponse<T> {
    fn into_response(self) -> Response {
        (self.status, self.headers, Json(self.content)).into_response()
    }
}

/// HTML 响应
#[derive(Debug, Clone)]
pub struct HtmlResponse {
    content: String,
    status: StatusCode,
    headers: HeaderMap,
}

impl HtmlResponse {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            status: StatusCode::OK,
            headers: HeaderMap::new(),
        }
    }
}

response_builder!(HtmlResponse);

impl IntoResponse for HtmlResponse {
    fn into_response(self) -> Response {
        (self.status, self.headers, Html(self.content)).into_response()
    }
}

/// 纯文本响应
#[derive(Debug, Clone)]
pub struct PlainTextResponse {
    content: String,
    status: StatusCode,
    headers: HeaderMap,
}

impl PlainTextResponse {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            status: StatusCode::OK,
            headers: HeaderMap::new(),
        }
    }
}

response_builder!(PlainTextResponse);

impl IntoResponse for PlainTextResponse {
    fn into_response(self) -> Response {
        (self.status, self.headers, self.content).into_response()
    }
}

/// 重定向响应
///
/// 默认 307 Temporary Redirect，保留原请求方法。
#[derive(Debug, Clone)]
pub struct RedirectResponse {
    location: String,
    status: StatusCode,
    headers: HeaderMap,
}

impl RedirectResponse {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            status: StatusCode::TEMPORARY_REDIRECT,
            headers: HeaderMap::new(),
        }
    }

    /// 308 Permanent Redirect
    pub fn permanent(location: impl Into<String>) -> Self {
        Self::new(location).with_status(StatusCode::PERMANENT_REDIRECT)
    }

    /// 303 See Other，常用于表单提交后的跳转
    pub fn see_other(location: impl Into<String>) -> Self {
        Self::new(location).with_status(StatusCode::SEE_OTHER)
    }

    pub fn location(&self) -> &str {
        &self.location
    }
}

response_builder!(RedirectResponse);

impl IntoResponse for RedirectResponse {
    fn into_response(self) -> Response {
        let location = match HeaderValue::try_from(self.location.as_str()) {
            Ok(value) => value,
            Err(_) => {
                return HttpException::internal(format!(
                    "Invalid redirect location: {:?}",
                    self.location
                ))
                .into_response();
            }
        };

        let mut headers = self.headers;
        headers.insert(header::LOCATION, location);
        (self.status, headers).into_response()
    }
}
