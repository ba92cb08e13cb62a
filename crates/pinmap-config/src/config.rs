use serde::{Deserialize, Serialize};

/// 主配置结构体
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub version: String,
    pub server: ServerConfig,
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
    pub client: ClientConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            server: ServerConfig::default(),
            api: ApiConfig::default(),
            storage: StorageConfig::default(),
            logging: LoggingConfig::default(),
            client: ClientConfig::default(),
        }
    }
}

impl Config {
    /// 获取配置值的快捷方法
    pub fn get_value(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();
        match parts.as_slice() {
            ["version"] => Some(self.version.clone()),
            ["server", "port"] => Some(self.server.port.to_string()),
            ["server", "host"] => Some(self.server.host.clone()),
            ["server", "cors"] => Some(self.server.cors.to_string()),
            ["server", "base_path"] => Some(self.server.base_path.clone()),
            ["server", "static_dir"] => self.server.static_dir.clone(),
            ["api", "list_limit"] => Some(self.api.list_limit.to_string()),
            ["api", "search_limit"] => Some(self.api.search_limit.to_string()),
            ["api", "default_place"] => Some(self.api.default_place.clone()),
            ["storage", "type"] => Some(self.storage.storage_type.to_string()),
            ["storage", "path"] => self.storage.path.clone(),
            ["logging", "level"] => Some(self.logging.level.to_string()),
            ["logging", "json"] => Some(self.logging.json.to_string()),
            ["client", "server_url"] => Some(self.client.server_url.clone()),
            ["client", "fly_zoom"] => Some(self.client.fly_zoom.to_string()),
            ["client", "fly_speed"] => Some(self.client.fly_speed.to_string()),
            ["client", "initial_zoom"] => Some(self.client.initial_zoom.to_string()),
            ["client", "marker_color"] => Some(self.client.marker_color.clone()),
            _ => None,
        }
    }

    /// 设置配置值
    pub fn set_value(&mut self, key: &str, value: &str) -> ConfigResult<()> {
        let parts: Vec<&str> = key.split('.').collect();
        match parts.as_slice() {
            ["server", "port"] => {
                self.server.port = parse(value, "port number")?;
            }
            ["server", "host"] => {
                self.server.host = value.to_string();
            }
            ["server", "cors"] => {
                self.server.cors = parse(value, "boolean")?;
            }
            ["server", "base_path"] => {
                self.server.base_path = value.to_string();
            }
            ["server", "static_dir"] => {
                self.server.static_dir = Some(value.to_string());
            }
            ["api", "list_limit"] => {
                self.api.list_limit = parse(value, "number")?;
            }
            ["api", "search_limit"] => {
                self.api.search_limit = parse(value, "number")?;
            }
            ["api", "default_place"] => {
                self.api.default_place = value.to_string();
            }
            ["storage", "type"] => {
                self.storage.storage_type = value.parse()?;
            }
            ["storage", "path"] => {
                self.storage.path = Some(value.to_string());
            }
            ["logging", "level"] => {
                self.logging.level = value.parse()?;
            }
            ["logging", "json"] => {
                self.logging.json = parse(value, "boolean")?;
            }
            ["client", "server_url"] => {
                self.client.server_url = value.to_string();
            }
            ["client", "fly_zoom"] => {
                self.client.fly_zoom = parse(value, "number")?;
            }
            ["client", "fly_speed"] => {
                self.client.fly_speed = parse(value, "number")?;
            }
            ["client", "initial_zoom"] => {
                self.client.initial_zoom = parse(value, "number")?;
            }
            ["client", "marker_color"] => {
                self.client.marker_color = value.to_string();
            }
            _ => return Err(ConfigError::KeyNotFound(key.to_string())),
        }
        Ok(())
    }
}

fn parse<T: std::str::FromStr>(value: &str, what: &str) -> ConfigResult<T> {
    value
        .parse()
        .map_err(|_| ConfigError::Validation(format!("Invalid {}: {}", what, value)))
}

/// Server 配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub cors: bool,
    /// API 挂载前缀，例如 "/api"；空字符串表示挂在根路径
    pub base_path: String,
    /// 前端静态文件目录
    #[serde(skip_serializing_if = "Option::is_none")]
    pub static_dir: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8081,
            host: "127.0.0.1".to_string(),
            cors: true,
            base_path: String::new(),
            static_dir: None,
        }
    }
}

/// API 行为配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    pub list_limit: usize,
    pub search_limit: usize,
    pub default_place: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            list_limit: 100,
            search_limit: 10,
            default_place: "Pinned location".to_string(),
        }
    }
}

/// Storage 类型
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    #[default]
    Json,
    Memory,
}

impl std::fmt::Display for StorageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageType::Json => write!(f, "json"),
            StorageType::Memory => write!(f, "memory"),
        }
    }
}

impl std::str::FromStr for StorageType {
    type Err = ConfigError;

    fn from_str(s: &str) -> ConfigResult<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(StorageType::Json),
            "memory" => Ok(StorageType::Memory),
            _ => Err(ConfigError::Validation(format!("Invalid storage type: {}", s))),
        }
    }
}

/// Storage 配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    #[serde(rename = "type")]
    pub storage_type: StorageType,
    pub path: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            storage_type: StorageType::Json,
            path: Some("~/.pinmap/memories".to_string()),
        }
    }
}

/// 日志级别
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> ConfigResult<Self> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::Validation(format!("Invalid log level: {}", s))),
        }
    }
}

/// Logging 配置
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    /// 输出 JSON 格式日志
    pub json: bool,
}

/// 客户端配置（地图初始视角、飞行参数、服务地址）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    pub server_url: String,
    pub fly_zoom: f64,
    pub fly_speed: f64,
    /// [lng, lat]
    pub initial_center: [f64; 2],
    pub initial_zoom: f64,
    pub marker_color: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:8081".to_string(),
            fly_zoom: 15.0,
            fly_speed: 0.8,
            initial_center: [-79.38, 43.65],
            initial_zoom: 11.0,
            marker_color: "#b86b3a".to_string(),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Watch error: {0}")]
    #[cfg(feature = "hot-reload")]
    Watch(#[from] notify::Error),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
