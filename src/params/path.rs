//! Path parameter extraction

use async_trait::async_trait;
use axum::extract::{self, FromRequestParts};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use super::rejection;
use crate::exceptions::HttpException;

/// 从路由路径参数中提取值，例如 `/items/:item_id`
///
/// 单个参数可直接提取为标量，多个参数使用元组或结构体。
pub struct Path<T>(pub T);

param_wrapper!(Path);

#[async_trait]
impl<T, S> FromRequestParts<S> for Path<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = HttpException;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match extract::Path::<T>::from_request_parts(parts, state).await {
            Ok(extract::Path(value)) => Ok(Path(value)),
            Err(e) => Err(rejection("path", e.status(), e.body_text())),
        }
    }
}
