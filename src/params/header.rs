//! Header parameter extraction

use std::collections::HashMap;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{request::Parts, HeaderMap};
use serde::de::DeserializeOwned;

use super::deserialize_map;
use crate::exceptions::HttpException;

/// 将请求头提取为结构体
///
/// 请求头名称转为小写，`-` 替换为 `_`，因此字段 `user_agent` 对应 `User-Agent`。
///
/// ```rust,ignore
/// #[derive(Deserialize)]
/// struct ClientHeaders {
///     user_agent: Option<String>,
///     x_request_id: Option<String>,
/// }
///
/// async fn handler(Header(headers): Header<ClientHeaders>) { /* ... */ }
/// ```
pub struct Header<T>(pub T);

param_wrapper!(Header);

/// 转换请求头为键值表，非 ASCII 值被忽略
fn headers_to_map(headers: &HeaderMap) -> HashMap<String, String> {
    let mut result = HashMap::new();

    for (name, value) in headers.iter() {
        if let Ok(value_str) = value.to_str() {
            result.insert(name.as_str().replace('-', "_"), value_str.to_string());
        }
    }

    result
}

#[async_trait]
impl<T, S> FromRequestParts<S> for Header<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = HttpException;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let map = headers_to_map(&parts.headers);
        deserialize_map("header", &map).map(Header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Request, StatusCode};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct ClientHeaders {
        user_agent: String,
        x_retry_count: Option<u8>,
    }

    async fn extract(headers: &[(&str, &str)]) -> Result<Header<ClientHeaders>, HttpException> {
        let mut builder = Request::builder().uri("/");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        Header::<ClientHeaders>::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_hyphenated_names_map_to_fields() {
        let headers = extract(&[("User-Agent", "curl/8.0"), ("X-Retry-Count", "3")])
            .await
            .unwrap();
        assert_eq!(headers.user_agent, "curl/8.0");
        assert_eq!(headers.x_retry_count, Some(3));
    }

    #[tokio::test]
    async fn test_optional_header_absent() {
        let headers = extract(&[("user-agent", "test")]).await.unwrap();
        assert_eq!(headers.x_retry_count, None);
    }

    #[tokio::test]
    async fn test_missing_required_header() {
        let err = extract(&[("x-retry-count", "1")]).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.detail()[0]["loc"], serde_json::json!(["header", "user_agent"]));
    }

    #[tokio::test]
    async fn test_invalid_header_value_type() {
        let err = extract(&[("user-agent", "test"), ("x-retry-count", "lots")])
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
