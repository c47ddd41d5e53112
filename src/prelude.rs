//! 常用名称，`use turboapi::prelude::*;`

pub use crate::config::{AppConfig, ServerConfig};
pub use crate::params::{provided, ApiKeyHeader, ApiKeyName, Dependency, HttpBearer, SecurityScheme};
pub use crate::{
    ApiRouter, Body, Cookie, Depends, Header, HtmlResponse, HttpException, JsonResponse,
    Middleware, Path, PlainTextResponse, Query, RedirectResponse, Request, Response, Security,
    TurboApi,
};

pub use axum::http::{request::Parts, StatusCode};
pub use axum::response::IntoResponse;
