use std::path::PathBuf;

use clap::Parser;
use pinmap_config::{Config, ConfigManager, StorageType};
use pinmap_server::{logging::init_logging, run_server, AppState};

#[derive(Parser, Debug, Clone)]
#[command(name = "pinmap-server")]
#[command(about = "Pinmap Memory HTTP Server")]
#[command(version)]
struct Cli {
    /// Enable debug mode
    #[arg(long, env = "DEBUG", default_value = "false")]
    debug: bool,

    /// Server host (overrides config)
    #[arg(long, env = "PINMAP_HOST")]
    host: Option<String>,

    /// Server port (overrides config)
    #[arg(long, env = "PORT")]
    port: Option<u16>,

    /// API mount point, e.g. "/api" (overrides config)
    #[arg(long, env = "PINMAP_BASE_PATH")]
    base_path: Option<String>,

    /// Storage backend: json or memory (overrides config)
    #[arg(long, env = "PINMAP_STORAGE")]
    storage: Option<StorageType>,

    /// Storage directory (overrides config)
    #[arg(long, env = "PINMAP_STORAGE_PATH")]
    storage_path: Option<String>,

    /// Static front-end directory (overrides config)
    #[arg(long, env = "PINMAP_STATIC_DIR")]
    static_dir: Option<String>,

    /// Log level (overrides config)
    #[arg(long)]
    log_level: Option<String>,

    /// Config file path
    #[arg(long, env = "PINMAP_CONFIG", default_value = "~/.pinmap/config.json")]
    config: String,

    /// Disable hot-reload
    #[arg(long, default_value = "false")]
    no_watch: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 展开配置文件路径
    let config_path = pinmap_config::expand_tilde(&cli.config)
        .unwrap_or_else(|| PathBuf::from(&cli.config));

    #[allow(unused_mut)]
    let mut config_manager = ConfigManager::load(&config_path).await?;
    let config = apply_overrides(&cli, config_manager.snapshot().await);
    ConfigManager::validate(&config)?;

    // 日志级别来自配置，加载阶段的日志在初始化之后补记
    let log_level = cli.log_level.clone().unwrap_or_else(|| {
        if cli.debug {
            "debug".to_string()
        } else {
            config.logging.level.to_string()
        }
    });
    init_logging(&log_level, config.logging.json)?;

    // 热重载后 api 段对新请求生效；监听地址与存储需要重启
    #[cfg(feature = "hot-reload")]
    if !cli.no_watch {
        if let Err(e) = config_manager.watch(|| tracing::info!("Config hot-reloaded")) {
            tracing::warn!("Failed to start config watcher: {}", e);
        }
    }

    tracing::info!("Config loaded from {:?}", config_path);
    tracing::info!("Starting Pinmap Server on {}:{}", config.server.host, config.server.port);
    tracing::info!("  Storage: {}", config.storage.storage_type);
    tracing::info!("  Mount point: {:?}", config.server.base_path);
    tracing::info!("  List limit: {}, search limit: {}", config.api.list_limit, config.api.search_limit);

    let state = AppState::from_manager(&config_manager, &config.storage).await?;

    run_server(state, &config.server).await
}

/// 命令行参数覆盖配置文件中的值
fn apply_overrides(cli: &Cli, mut config: Config) -> Config {
    if let Some(ref host) = cli.host {
        config.server.host = host.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(ref base_path) = cli.base_path {
        config.server.base_path = base_path.clone();
    }
    if let Some(storage) = cli.storage {
        config.storage.storage_type = storage;
    }
    if let Some(ref path) = cli.storage_path {
        config.storage.path = Some(path.clone());
    }
    if let Some(ref dir) = cli.static_dir {
        config.server.static_dir = Some(dir.clone());
    }
    config
}
