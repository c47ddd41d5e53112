//! Query parameter extraction

use async_trait::async_trait;
use axum::extract::{self, FromRequestParts};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use super::rejection;
use crate::exceptions::HttpException;

/// 从查询字符串中提取结构体
///
/// 可选参数使用 `Option<T>` 字段，默认值使用 `#[serde(default)]`。
pub struct Query<T>(pub T);

param_wrapper!(Query);

#[async_trait]
impl<T, S> FromRequestParts<S> for Query<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = HttpException;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match extract::Query::<T>::from_request_parts(parts, state).await {
            Ok(extract::Query(value)) => Ok(Query(value)),
            Err(e) => Err(rejection("query", e.status(), e.body_text())),
        }
    }
}
