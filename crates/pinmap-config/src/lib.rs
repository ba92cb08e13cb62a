pub mod config;
pub mod manager;

pub use config::{
    ApiConfig, ClientConfig, Config, ConfigError, ConfigResult, LogLevel, LoggingConfig,
    ServerConfig, StorageConfig, StorageType,
};
pub use manager::ConfigManager;

use std::path::PathBuf;

/// 获取 Pinmap 配置目录路径
pub fn pinmap_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".pinmap"))
}

/// 获取默认 memories 目录
pub fn default_memories_dir() -> Option<PathBuf> {
    pinmap_dir().map(|dir| dir.join("memories"))
}

/// 初始化 Pinmap 目录结构
pub async fn init_pinmap_dirs() -> ConfigResult<()> {
    if let Some(root) = pinmap_dir() {
        tokio::fs::create_dir_all(&root).await?;
        tokio::fs::create_dir_all(root.join("memories")).await?;
    }
    Ok(())
}

/// 展开路径中的 ~ 为用户主目录
pub fn expand_tilde(path: &str) -> Option<PathBuf> {
    if let Some(rest) = path.strip_prefix("~/") {
        dirs::home_dir().map(|home| home.join(rest))
    } else {
        Some(PathBuf::from(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pinmap_dir() {
        let dir = pinmap_dir();
        assert!(dir.is_some());
        assert!(dir.unwrap().to_string_lossy().contains(".pinmap"));
    }

    #[test]
    fn test_expand_tilde() {
        let expanded = expand_tilde("~/.pinmap/config.json");
        assert!(expanded.is_some());
        assert!(!expanded.unwrap().to_string_lossy().starts_with("~"));

        assert_eq!(expand_tilde("/tmp/x"), Some(PathBuf::from("/tmp/x")));
    }
}
