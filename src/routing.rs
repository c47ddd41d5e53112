//! API Router
//!
//! 带前缀与标签的路由分组，最终转换为 axum `Router`

use axum::{
    handler::Handler,
    http::Method,
    routing::{self, MethodRouter},
    Router,
};

/// 已注册路由的描述
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteInfo {
    pub method: Method,
    pub path: String,
    pub tags: Vec<String>,
}

/// 路由分组
///
/// ```rust,ignore
/// let items = ApiRouter::new()
///     .with_prefix("/items")
///     .with_tags(["items"])
///     .get("/:item_id", read_item)
///     .post("/", create_item);
///
/// let app = TurboApi::new().include_router(items);
/// ```
#[derive(Debug, Default)]
pub struct ApiRouter {
    prefix: String,
    tags: Vec<String>,
    routes: Vec<RouteInfo>,
    router: Router,
}

/// 规范化前缀：补全开头的 `/`，去掉结尾的 `/`，根路径视为空前缀
fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

/// 规范化路由路径：空路径视为 `"/"`，补全开头的 `/`
fn normalize_path(path: &str) -> String {
    let trimmed = path.trim();
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

/// 拼接前缀与路径，`"/"` 在非空前缀下折叠为前缀本身
fn join_path(prefix: &str, path: &str) -> String {
    match (prefix.is_empty(), path) {
        (true, _) => path.to_string(),
        (false, "/") | (false, "") => prefix.to_string(),
        (false, _) => format!("{}{}", prefix, path),
    }
}

/// 分组标签在前，其余标签去重后追加
fn merge_tags<'a>(group: &[String], others: impl Iterator<Item = &'a String>) -> Vec<String> {
    let mut tags = group.to_vec();
    for tag in others {
        if !tags.contains(tag) {
            tags.push(tag.clone());
        }
    }
    tags
}

impl ApiRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置挂载前缀
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = normalize_prefix(prefix);
        self
    }

    /// 设置分组标签，作用于本分组内注册的所有路由
    ///
    /// 已有路由的标签中，旧的分组标签被替换，路由自身（如挂载子分组带来）的标签保留在后。
    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let previous = std::mem::replace(&mut self.tags, tags.into_iter().map(Into::into).collect());
        for route in &mut self.routes {
            let own = route.tags.iter().filter(|tag| !previous.contains(tag));
            route.tags = merge_tags(&self.tags, own);
        }
        self
    }

    pub fn get<H, T>(self, path: &str, handler: H) -> Self
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        self.add(Method::GET, path, routing::get(handler))
    }

    pub fn post<H, T>(self, path: &str, handler: H) -> Self
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        self.add(Method::POST, path, routing::post(handler))
    }

    pub fn put<H, T>(self, path: &str, handler: H) -> Self
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        self.add(Method::PUT, path, routing::put(handler))
    }

    pub fn patch<H, T>(self, path: &str, handler: H) -> Self
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        self.add(Method::PATCH, path, routing::patch(handler))
    }

    pub fn delete<H, T>(self, path: &str, handler: H) -> Self
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        self.add(Method::DELETE, path, routing::delete(handler))
    }

    fn add(mut self, method: Method, path: &str, method_router: MethodRouter) -> Self {
        let path = normalize_path(path);
        tracing::debug!(method = %method, path = %path, "Registering route");
        self.router = self.router.route(&path, method_router);
        self.routes.push(RouteInfo {
            method,
            path,
            tags: self.tags.clone(),
        });
        self
    }

    /// 挂载子分组，子分组的路由路径加上其自身前缀，标签合并
    pub fn include_router(mut self, other: ApiRouter) -> Self {
        let ApiRouter {
            prefix,
            tags: _,
            routes,
            router,
        } = other;

        for route in routes {
            self.routes.push(RouteInfo {
                tags: merge_tags(&self.tags, route.tags.iter()),
                method: route.method,
                path: join_path(&prefix, &route.path),
            });
        }

        self.router = if prefix.is_empty() {
            self.router.merge(router)
        } else {
            self.router.nest(&prefix, router)
        };
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// 已注册路由，路径相对于本分组（不含本分组前缀）
    pub fn routes(&self) -> &[RouteInfo] {
        &self.routes
    }

    /// 转换为 axum `Router`，本分组前缀由挂载方处理
    pub fn into_router(self) -> Router {
        self.router
    }
}
