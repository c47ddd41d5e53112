//! Security schemes
//!
//! 认证方案作为特殊的依赖：凭据缺失或无效时返回 401/403。

use std::marker::PhantomData;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts, HeaderValue};

use crate::exceptions::HttpException;

/// 认证方案
#[async_trait]
pub trait SecurityScheme: Sized + Send + 'static {
    async fn authenticate(parts: &mut Parts) -> Result<Self, HttpException>;
}

/// 安全依赖参数
pub struct Security<T>(pub T);

param_wrapper!(Security);

impl<T: SecurityScheme> Security<T> {
    /// 在依赖内部执行认证
    pub async fn extract(parts: &mut Parts) -> Result<Self, HttpException> {
        T::authenticate(parts).await.map(Security)
    }
}

#[async_trait]
impl<T, S> FromRequestParts<S> for Security<T>
where
    T: SecurityScheme,
    S: Send + Sync,
{
    type Rejection = HttpException;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Self::extract(parts).await
    }
}

/// `Authorization: Bearer <token>` 认证
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpBearer {
    pub token: String,
}

fn bearer_challenge(detail: &str) -> HttpException {
    HttpException::unauthorized(detail)
        .with_header(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"))
}

#[async_trait]
impl SecurityScheme for HttpBearer {
    async fn authenticate(parts: &mut Parts) -> Result<Self, HttpException> {
        let value = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or_else(|| bearer_challenge("Not authenticated"))?
            .to_str()
            .map_err(|_| bearer_challenge("Invalid authentication credentials"))?;

        let (scheme, token) = value
            .split_once(' ')
            .ok_or_else(|| bearer_challenge("Invalid authentication credentials"))?;

        let token = token.trim();
        if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
            return Err(bearer_challenge("Invalid authentication credentials"));
        }

        Ok(HttpBearer {
            token: token.to_string(),
        })
    }
}

/// API Key 请求头名称
///
/// ```rust,ignore
/// struct XApiKey;
///
/// impl ApiKeyName for XApiKey {
///     const NAME: &'static str = "x-api-key";
/// }
///
/// async fn handler(Security(key): Security<ApiKeyHeader<XApiKey>>) { /* ... */ }
/// ```
pub trait ApiKeyName: Send + Sync + 'static {
    const NAME: &'static str;
}

/// 从指定请求头读取 API Key
pub struct ApiKeyHeader<N> {
    key: String,
    _name: PhantomData<N>,
}

impl<N: ApiKeyName> ApiKeyHeader<N> {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn header_name() -> &'static str {
        N::NAME
    }
}

impl<N> std::fmt::Debug for ApiKeyHeader<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyHeader").finish_non_exhaustive()
    }
}

#[async_trait]
impl<N: ApiKeyName> SecurityScheme for ApiKeyHeader<N> {
    async fn authenticate(parts: &mut Parts) -> Result<Self, HttpException> {
        let key = parts
            .headers
            .get(N::NAME)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| HttpException::forbidden("Not authenticated"))?;

        Ok(ApiKeyHeader {
            key: key.to_string(),
            _name: PhantomData,
        })
    }
}
