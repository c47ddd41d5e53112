//! TurboAPI 示例服务
//!
//! 加载配置、初始化日志，启动一个带健康检查与商品接口的演示应用

use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use turboapi::config::{load_config, print_config};
use turboapi::logging::init_logging;
use turboapi::prelude::*;
use turboapi::server::shutdown_signal;

/// Ping 响应
#[derive(Serialize)]
struct PingResponse {
    status: &'static str,
    version: &'static str,
}

/// Ping endpoint - 健康检查
async fn ping() -> JsonResponse<PingResponse> {
    JsonResponse::new(PingResponse {
        status: "ok",
        version: turboapi::VERSION,
    })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Item {
    name: String,
    price: f64,
}

/// 内存商品表
#[derive(Clone, Default)]
struct ItemStore(Arc<RwLock<Vec<Item>>>);

impl ItemStore {
    fn read(&self) -> Result<Vec<Item>, HttpException> {
        self.0
            .read()
            .map(|items| items.clone())
            .map_err(|_| HttpException::internal("Item store unavailable"))
    }

    fn push(&self, item: Item) -> Result<usize, HttpException> {
        let mut items = self
            .0
            .write()
            .map_err(|_| HttpException::internal("Item store unavailable"))?;
        items.push(item);
        Ok(items.len() - 1)
    }
}

#[turboapi::async_trait]
impl Dependency for ItemStore {
    async fn resolve(parts: &mut Parts) -> Result<Self, HttpException> {
        provided::<ItemStore>(parts)
    }
}

async fn list_items(Depends(store): Depends<ItemStore>) -> Result<JsonResponse<Vec<Item>>, HttpException> {
    Ok(JsonResponse::new(store.read()?))
}

async fn read_item(
    Depends(store): Depends<ItemStore>,
    Path(item_id): Path<usize>,
) -> Result<JsonResponse<Item>, HttpException> {
    store
        .read()?
        .into_iter()
        .nth(item_id)
        .map(JsonResponse::new)
        .ok_or_else(|| HttpException::not_found("Item not found"))
}

async fn create_item(
    Depends(store): Depends<ItemStore>,
    Body(item): Body<Item>,
) -> Result<JsonResponse<serde_json::Value>, HttpException> {
    let id = store.push(item)?;
    Ok(JsonResponse::new(serde_json::json!({ "id": id })).with_status(StatusCode::CREATED))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_logging(&config.log)?;

    tracing::info!("TurboAPI v{} demo", turboapi::VERSION);
    print_config(&config);

    let items = ApiRouter::new()
        .with_prefix("/items")
        .with_tags(["items"])
        .get("/", list_items)
        .post("/", create_item)
        .get("/:item_id", read_item);

    let app = TurboApi::from_config(&config)
        .provide(ItemStore::default())
        .get("/ping", ping)
        .include_router(items);

    app.serve_with_shutdown(&config.server, shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
