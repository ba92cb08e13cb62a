//! HTTP Server - 提供 Memory REST API
//!
//! 路由挂载在 `server.base_path` 之下（例如 "/api"），健康检查固定在 `/health`。

use std::future::Future;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    routing::{get, put},
    Router,
};
use pinmap_config::ServerConfig;
use pinmap_core::{DATA_PATH, SEARCH_PATH};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    create_memory, delete_memory, health_handler, list_memories, search_memories, update_memory,
};
use crate::state::AppState;

/// 运行 HTTP 服务器，收到 Ctrl-C 后优雅退出
pub async fn run_server(state: AppState, config: &ServerConfig) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    let app = create_router(state, config);

    let listener = TcpListener::bind(addr).await?;

    serve(listener, app, shutdown_signal()).await
}

/// 在已绑定的监听器上提供服务，直到 `shutdown` 完成
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    tracing::info!("Pinmap server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("Pinmap server stopped");
    Ok(())
}

/// 创建路由
pub fn create_router(state: AppState, config: &ServerConfig) -> Router {
    let state = Arc::new(state);

    let api = Router::new()
        .route(DATA_PATH, get(list_memories).post(create_memory))
        .route(
            &format!("{}/:id", DATA_PATH),
            put(update_memory).delete(delete_memory),
        )
        .route(SEARCH_PATH, get(search_memories));

    let app = Router::new().route("/health", get(health_handler));

    let mut app = match mount_point(&config.base_path) {
        Some(prefix) => app.nest(&prefix, api),
        None => app.merge(api),
    };

    if let Some(ref dir) = config.static_dir {
        let dir = pinmap_config::expand_tilde(dir).unwrap_or_else(|| PathBuf::from(dir));
        tracing::info!("Serving static files from {:?}", dir);
        app = app.fallback_service(ServeDir::new(dir));
    }

    let mut app = app.layer(TraceLayer::new_for_http());
    if config.cors {
        app = app.layer(CorsLayer::permissive());
    }

    app.with_state(state)
}

/// 规范化挂载前缀；空字符串或 "/" 表示挂在根路径
fn mount_point(base_path: &str) -> Option<String> {
    let trimmed = base_path.trim_end_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
