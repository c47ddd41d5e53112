//! Request body extraction

use async_trait::async_trait;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::Json;
use serde::de::DeserializeOwned;

use super::{field_of, validation_error};
use crate::exceptions::HttpException;

/// 将 JSON 请求体反序列化为目标类型
///
/// - 缺少 `Content-Type: application/json` → 415
/// - JSON 语法错误 → 400
/// - 结构不匹配 → 422
pub struct Body<T>(pub T);

param_wrapper!(Body);

#[async_trait]
impl<T, S> FromRequest<S> for Body<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = HttpException;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Body(value)),
            Err(e) if e.status() == StatusCode::UNPROCESSABLE_ENTITY => {
                let message = e.body_text();
                Err(validation_error("body", &body_fields(&message), message))
            }
            Err(e) => Err(HttpException::new(e.status(), e.body_text())),
        }
    }
}

/// JSON 错误信息中的字段路径，如 `address.city: invalid type ...`
fn body_fields(message: &str) -> Vec<String> {
    let detail = message
        .split_once("target type: ")
        .map_or(message, |(_, detail)| detail);

    let (mut fields, rest) = match detail.split_once(": ") {
        Some((path, rest)) if !path.is_empty() && !path.contains(' ') => {
            (path.split('.').map(String::from).collect(), rest)
        }
        _ => (Vec::new(), detail),
    };
    fields.extend(field_of(rest));
    fields
}
