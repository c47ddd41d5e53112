//! Cookie parameter extraction

use std::collections::HashMap;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts, HeaderMap};
use serde::de::DeserializeOwned;

use super::deserialize_map;
use crate::exceptions::HttpException;

/// 将请求 Cookie 提取为结构体，字段名即 Cookie 名
pub struct Cookie<T>(pub T);

param_wrapper!(Cookie);

/// 解析所有 `Cookie` 请求头（`a=1; b=2`），同名时后者覆盖前者
fn cookies_to_map(headers: &HeaderMap) -> HashMap<String, String> {
    let mut result = HashMap::new();

    for value in headers.get_all(header::COOKIE) {
        let Ok(value) = value.to_str() else {
            continue;
        };
        for pair in value.split(';') {
            if let Some((name, value)) = pair.trim().split_once('=') {
                let name = name.trim();
                if !name.is_empty() {
                    result.insert(name.to_string(), value.trim().trim_matches('"').to_string());
                }
            }
        }
    }

    result
}

#[async_trait]
impl<T, S> FromRequestParts<S> for Cookie<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = HttpException;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let map = cookies_to_map(&parts.headers);
        deserialize_map("cookie", &map).map(Cookie)
    }
}
