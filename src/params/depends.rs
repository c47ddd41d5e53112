//! Dependency injection
//!
//! 依赖以类型表达：实现 [`Dependency`] 的类型可以作为 `Depends<T>` 参数出现在任意处理器中，
//! 解析时可以继续提取其它参数或依赖。

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::exceptions::HttpException;

/// 可注入的依赖
///
/// ```rust,ignore
/// struct Pagination { skip: u32, limit: u32 }
///
/// #[async_trait]
/// impl Dependency for Pagination {
///     async fn resolve(parts: &mut Parts) -> Result<Self, HttpException> {
///         let Query(params) = Query::<PageParams>::from_request_parts(parts, &()).await?;
///         Ok(Pagination { skip: params.skip, limit: params.limit.min(100) })
///     }
/// }
///
/// async fn list(Depends(page): Depends<Pagination>) { /* ... */ }
/// ```
#[async_trait]
pub trait Dependency: Sized + Send + 'static {
    async fn resolve(parts: &mut Parts) -> Result<Self, HttpException>;
}

/// 依赖注入参数
pub struct Depends<T>(pub T);

param_wrapper!(Depends);

impl<T: Dependency> Depends<T> {
    /// 在其它依赖内部解析子依赖
    pub async fn extract(parts: &mut Parts) -> Result<Self, HttpException> {
        T::resolve(parts).await.map(Depends)
    }
}

#[async_trait]
impl<T, S> FromRequestParts<S> for Depends<T>
where
    T: Dependency,
    S: Send + Sync,
{
    type Rejection = HttpException;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Self::extract(parts).await
    }
}

/// 读取通过 `TurboApi::provide` 注册的共享值
///
/// 未注册时返回 500，属于应用装配错误。
pub fn provided<T>(parts: &Parts) -> Result<T, HttpException>
where
    T: Clone + Send + Sync + 'static,
{
    parts.extensions.get::<T>().cloned().ok_or_else(|| {
        let type_name = std::any::type_name::<T>();
        tracing::error!(dependency = type_name, "Dependency not provided");
        HttpException::internal(format!("Dependency not provided: {}", type_name))
    })
}
