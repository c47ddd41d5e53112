//! Parameter Markers
//!
//! 处理器参数提取器：路径、查询、请求头、Cookie、请求体、依赖注入与安全方案。
//! 所有提取失败均以 [`HttpException`] 拒绝，校验类错误为 422。

/// 为单字段包装类型实现 `into_inner` / `Deref` / `Debug`
macro_rules! param_wrapper {
    ($name:ident) => {
        impl<T> $name<T> {
            /// 取出内部值
            pub fn into_inner(self) -> T {
                self.0
            }
        }

        impl<T> std::ops::Deref for $name<T> {
            type Target = T;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl<T: std::fmt::Debug> std::fmt::Debug for $name<T> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

mod body;
mod cookie;
mod depends;
mod header;
mod path;
mod query;
mod security;

use std::collections::HashMap;

use axum::http::StatusCode;
use serde::de::DeserializeOwned;

use crate::exceptions::HttpException;

pub use body::Body;
pub use cookie::Cookie;
pub use depends::{provided, Dependency, Depends};
pub use header::Header;
pub use path::Path;
pub use query::Query;
pub use security::{ApiKeyHeader, ApiKeyName, HttpBearer, Security, SecurityScheme};

/// 将框架的提取拒绝转换为 HTTP 异常
///
/// 400/422 视为参数校验失败，其余状态码原样保留。
fn rejection(location: &str, status: StatusCode, message: String) -> HttpException {
    if status == StatusCode::BAD_REQUEST || status == StatusCode::UNPROCESSABLE_ENTITY {
        let fields: Vec<String> = field_of(&message).into_iter().collect();
        validation_error(location, &fields, message)
    } else {
        HttpException::new(status, message)
    }
}

/// 参数校验异常，`loc` 为参数位置加上字段路径
fn validation_error(location: &str, fields: &[String], message: String) -> HttpException {
    let mut loc = vec![location];
    loc.extend(fields.iter().map(String::as_str));
    HttpException::validation(&loc, message, "value_error")
}

/// 从反序列化错误信息中取出字段名
///
/// 识别 serde 的 ``missing field `x` `` / ``unknown field `x` `` 与路径参数的
/// ``Cannot parse `x` with value ...``；其余错误不携带字段名。
fn field_of(message: &str) -> Option<String> {
    for marker in ["missing field `", "unknown field `"] {
        if let Some(name) = backticked_after(message, marker) {
            return Some(name.to_string());
        }
    }

    let start = message.find("Cannot parse `")? + "Cannot parse `".len();
    let rest = &message[start..];
    let end = rest.find('`')?;
    rest[end..]
        .starts_with("` with value")
        .then(|| rest[..end].to_string())
}

fn backticked_after<'a>(message: &'a str, marker: &str) -> Option<&'a str> {
    let start = message.find(marker)? + marker.len();
    let rest = &message[start..];
    rest.find('`').map(|end| &rest[..end])
}

/// 将字符串键值对反序列化为目标结构体
///
/// 借助 urlencoded 往返完成 `"123"` -> `i64` 之类的类型转换。
fn deserialize_map<T: DeserializeOwned>(
    location: &str,
    map: &HashMap<String, String>,
) -> Result<T, HttpException> {
    let encoded = serde_urlencoded::to_string(map)
        .map_err(|e| validation_error(location, &[], e.to_string()))?;

    serde_urlencoded::from_str(&encoded).map_err(|e| {
        let message = e.to_string();
        let fields: Vec<String> = field_of(&message).into_iter().collect();
        validation_error(location, &fields, message)
    })
}
