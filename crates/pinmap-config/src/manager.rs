//! 配置文件的加载、校验、持久化与热重载

use std::path::{Path, PathBuf};
use std::sync::Arc;

use regex::Regex;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::config::{Config, ConfigError, ConfigResult};

/// 配置管理器
///
/// 克隆共享同一份 `Config`；`get()` 返回的句柄在热重载后看到新值。
#[derive(Clone)]
pub struct ConfigManager {
    path: PathBuf,
    config: Arc<RwLock<Config>>,
    #[cfg(feature = "hot-reload")]
    watcher: Option<Arc<notify::RecommendedWatcher>>,
}

impl ConfigManager {
    /// 读取配置文件；文件不存在时写入默认配置
    pub async fn load(path: &Path) -> ConfigResult<Self> {
        let config = if path.exists() {
            info!("Loading config from {:?}", path);
            read_config(path).await?
        } else {
            info!("No config at {:?}, writing defaults", path);
            let defaults = Config::default();
            write_config(path, &defaults).await?;
            defaults
        };

        Self::validate(&config)?;
        Ok(Self::new(config, path.to_path_buf()))
    }

    pub fn new(config: Config, path: PathBuf) -> Self {
        Self {
            path,
            config: Arc::new(RwLock::new(config)),
            #[cfg(feature = "hot-reload")]
            watcher: None,
        }
    }

    /// 共享的配置句柄
    pub fn get(&self) -> Arc<RwLock<Config>> {
        Arc::clone(&self.config)
    }

    pub async fn snapshot(&self) -> Config {
        self.config.read().await.clone()
    }

    pub async fn save(&self) -> ConfigResult<()> {
        let config = self.snapshot().await;
        write_config(&self.path, &config).await?;
        info!("Config saved to {:?}", self.path);
        Ok(())
    }

    /// 在副本上修改，校验通过后替换并保存；失败时原配置不变
    pub async fn update<F>(&self, f: F) -> ConfigResult<()>
    where
        F: FnOnce(&mut Config) -> ConfigResult<()>,
    {
        {
            let mut config = self.config.write().await;
            let mut updated = config.clone();
            f(&mut updated)?;
            Self::validate(&updated)?;
            *config = updated;
        }
        self.save().await
    }

    pub fn validate(config: &Config) -> ConfigResult<()> {
        let invalid = |message: String| Err(ConfigError::Validation(message));

        if config.server.port == 0 {
            return invalid("server.port cannot be 0".to_string());
        }

        let base_path = &config.server.base_path;
        if !base_path.is_empty() && !base_path.starts_with('/') {
            return invalid(format!("server.base_path must start with '/': {}", base_path));
        }

        if config.api.list_limit == 0 || config.api.search_limit == 0 {
            return invalid("api limits must be greater than 0".to_string());
        }

        let [lng, lat] = config.client.initial_center;
        if !(-180.0..=180.0).contains(&lng) || !(-90.0..=90.0).contains(&lat) {
            return invalid(format!(
                "client.initial_center out of range: [{}, {}]",
                lng, lat
            ));
        }

        if config.client.fly_speed <= 0.0 {
            return invalid("client.fly_speed must be greater than 0".to_string());
        }

        Ok(())
    }
}

async fn read_config(path: &Path) -> ConfigResult<Config> {
    let raw = tokio::fs::read_to_string(path).await?;
    let expanded = expand_env_vars(&raw)?;
    Ok(serde_json::from_str(&expanded)?)
}

async fn write_config(path: &Path, config: &Config) -> ConfigResult<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, serde_json::to_string_pretty(config)?).await?;
    Ok(())
}

/// 展开 `${VAR}` 与 `${VAR:-default}`
fn expand_env_vars(content: &str) -> ConfigResult<String> {
    let pattern = Regex::new(r"\$\{([^}:]+)(?::-([^}]*))?\}")
        .map_err(|e| ConfigError::Validation(format!("Invalid pattern: {}", e)))?;

    let mut missing = None;
    let expanded = pattern.replace_all(content, |caps: &regex::Captures| {
        let name = &caps[1];
        match (std::env::var(name), caps.get(2)) {
            (Ok(value), _) => value,
            (Err(_), Some(default)) => default.as_str().to_string(),
            (Err(_), None) => {
                missing.get_or_insert_with(|| name.to_string());
                String::new()
            }
        }
    });

    match missing {
        Some(name) => Err(ConfigError::EnvVarNotFound(name)),
        None => Ok(expanded.into_owned()),
    }
}

#[cfg(feature = "hot-reload")]
impl ConfigManager {
    /// 监听配置文件，修改后重新读取并校验，成功时替换共享配置并调用 `on_reload`
    ///
    /// 监听的是所在目录，按文件名过滤，因此以重命名方式保存的编辑器也能触发。
    /// 校验失败的修改会被忽略，保留当前配置。
    pub fn watch<F>(&mut self, on_reload: F) -> ConfigResult<()>
    where
        F: Fn() + Send + 'static,
    {
        use notify::{EventKind, RecursiveMode, Watcher};

        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .ok_or_else(|| ConfigError::InvalidPath(format!("{:?}", self.path)))?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let (tx, rx) = std::sync::mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
            let Ok(event) = res else { return };
            let touches_file = event
                .paths
                .iter()
                .any(|p| p.file_name() == Some(file_name.as_os_str()));
            if touches_file && matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                let _ = tx.send(());
            }
        })?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        self.watcher = Some(Arc::new(watcher));

        let path = self.path.clone();
        let shared = Arc::clone(&self.config);
        std::thread::spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(e) => {
                    warn!("Config watcher could not start a runtime: {}", e);
                    return;
                }
            };

            while rx.recv().is_ok() {
                debug!("Config file changed: {:?}", path);
                let result = runtime.block_on(async {
                    let config = read_config(&path).await?;
                    Self::validate(&config)?;
                    *shared.write().await = config;
                    Ok::<(), ConfigError>(())
                });

                match result {
                    Ok(()) => {
                        info!("Config reloaded from {:?}", path);
                        on_reload();
                    }
                    Err(e) => warn!("Ignoring config change: {}", e),
                }
            }
        });

        info!("Watching config file {:?}", self.path);
        Ok(())
    }
}
