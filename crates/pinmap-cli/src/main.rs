mod terminal;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use pinmap_client::{ClientState, HttpMemoryApi, MemoryApi};
use pinmap_config::{Config, ConfigManager};
use pinmap_core::{format_timestamp, CreateMemoryRequest, LngLat, Memory, UpdateMemoryRequest};
use serde_json::Value;

use terminal::{TerminalMap, TerminalPage};

#[derive(Parser)]
#[command(name = "pinmap-cli")]
#[command(about = "CLI tool for pinmap")]
#[command(version)]
struct Cli {
    /// Server URL (overrides client.server_url)
    #[arg(long, env = "PINMAP_SERVER_URL")]
    server_url: Option<String>,

    /// API mount point on the server, e.g. "/api"
    #[arg(long, env = "PINMAP_BASE_PATH", default_value = "")]
    base_path: String,

    /// Enable debug mode
    #[arg(long, short, default_value = "false")]
    debug: bool,

    /// Config file path
    #[arg(long, env = "PINMAP_CONFIG", default_value = "~/.pinmap/config.json")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 列出最近的记录
    List,
    /// 按地点或内容检索
    Search {
        /// 检索词（不区分大小写）
        terms: String,
    },
    /// 新建记录
    Add {
        /// 记录内容
        #[arg(long)]
        text: String,
        #[arg(long)]
        place: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        lng: Option<f64>,
    },
    /// 在坐标处钉一条记录，随后刷新列表
    Pin {
        #[arg(allow_hyphen_values = true)]
        lng: f64,
        #[arg(allow_hyphen_values = true)]
        lat: f64,
        text: String,
    },
    /// 定位到某条记录
    Locate { id: String },
    /// 修改记录
    Update {
        id: String,
        #[arg(long)]
        text: Option<String>,
        #[arg(long)]
        place: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        lng: Option<f64>,
    },
    /// 删除记录
    Delete { id: String },
    /// 检查服务器状态
    Health,
    /// 配置管理命令
    Config(ConfigArgs),
}

#[derive(Args, Clone)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// 获取配置值
    Get {
        /// 配置键 (如: server.port, api.search_limit)
        key: String,
    },
    /// 设置配置值
    Set {
        /// 配置键 (如: server.port, api.search_limit)
        key: String,
        /// 配置值
        value: String,
    },
    /// 初始化默认配置
    Init {
        /// 强制覆盖已有配置
        #[arg(long, default_value = "false")]
        force: bool,
    },
    /// 显示当前配置
    Show,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config_path =
        pinmap_config::expand_tilde(&cli.config).unwrap_or_else(|| PathBuf::from(&cli.config));
    log::debug!("Config path: {:?}", config_path);

    let command = match cli.command {
        Commands::Config(args) => return handle_config(args, config_path).await,
        command => command,
    };

    let config = ConfigManager::load(&config_path).await?.snapshot().await;
    let server_url = cli
        .server_url
        .clone()
        .unwrap_or_else(|| config.client.server_url.clone());
    log::debug!("Server URL: {}{}", server_url, cli.base_path);

    let api = HttpMemoryApi::new(&server_url).with_base_path(&cli.base_path);

    match command {
        Commands::List => list(api, config).await,
        Commands::Search { terms } => {
            let memories = api.search(&terms).await?;
            if memories.is_empty() {
                println!("{}", format!("No memories match \"{}\"", terms).dimmed());
            }
            for memory in &memories {
                print_memory(memory);
            }
            Ok(())
        }
        Commands::Add {
            text,
            place,
            lat,
            lng,
        } => {
            let request = CreateMemoryRequest {
                place,
                text: Some(text),
                lat: lat.map(Value::from),
                lng: lng.map(Value::from),
            };
            let memory = api.create(&request).await?;
            println!("{}", format!("✅ Saved {}", memory.id).green());
            print_memory(&memory);
            Ok(())
        }
        Commands::Pin { lng, lat, text } => pin(api, config, LngLat::new(lng, lat), &text).await,
        Commands::Locate { id } => locate(api, config, &id).await,
        Commands::Update {
            id,
            text,
            place,
            lat,
            lng,
        } => {
            let request = UpdateMemoryRequest {
                place,
                text,
                lat: lat.map(Value::from),
                lng: lng.map(Value::from),
            };
            let memory = api.update(&id, &request).await?;
            println!("{}", format!("✅ Updated {}", memory.id).green());
            print_memory(&memory);
            Ok(())
        }
        Commands::Delete { id } => {
            let memory = api.delete(&id).await?;
            println!("{}", format!("🗑  Deleted {}", memory.id).green());
            Ok(())
        }
        Commands::Health => {
            if api.health_check().await {
                println!("{}", format!("✅ {} is healthy", api.server_url()).green());
                Ok(())
            } else {
                println!("{}", format!("❌ {} is not reachable", api.server_url()).red());
                std::process::exit(1);
            }
        }
        Commands::Config(_) => Ok(()),
    }
}

async fn list(api: HttpMemoryApi, config: Config) -> anyhow::Result<()> {
    let mut state = ClientState::new(
        api,
        TerminalMap::default(),
        TerminalPage::default(),
        config.client,
    );
    state.load().await;
    if state.fetch_failed() {
        anyhow::bail!("could not load memories from {}", state.api().server_url());
    }

    let cards = state.page().cards.len();
    if cards > 0 {
        println!();
        println!(
            "{}",
            format!("{} memories, {} on the map", cards, state.marker_count()).cyan()
        );
    }
    Ok(())
}

async fn pin(api: HttpMemoryApi, config: Config, at: LngLat, text: &str) -> anyhow::Result<()> {
    let mut state = ClientState::new(
        api,
        TerminalMap::default(),
        TerminalPage::quiet(),
        config.client,
    );
    state.load().await;

    state.on_map_click(at);
    match state.submit(text).await {
        Some(memory) => {
            println!("{}", format!("✅ Saved {}", memory.id).green());
            println!(
                "{}",
                format!(
                    "{} memories, {} on the map",
                    state.page().cards.len(),
                    state.map().placed()
                )
                .dimmed()
            );
            Ok(())
        }
        None => std::process::exit(1),
    }
}

async fn locate(api: HttpMemoryApi, config: Config, id: &str) -> anyhow::Result<()> {
    let mut state = ClientState::new(
        api,
        TerminalMap::default(),
        TerminalPage::quiet(),
        config.client,
    );
    state.load().await;

    if !state.on_card_click(id) {
        println!("{}", format!("⚠️  {} has no location on the map", id).yellow());
        return Ok(());
    }

    if let Some(card) = state.page().cards.iter().find(|c| c.id == id) {
        println!("{}", card.place.bold());
        println!("  {}", card.text);
    }
    Ok(())
}

fn print_memory(memory: &Memory) {
    println!("{}", memory.place.bold());
    println!("  {}", memory.text);
    let location = match memory.coordinate() {
        Some(at) => format!("{:.4}, {:.4}", at.lat, at.lng),
        None => "no location".to_string(),
    };
    println!(
        "  {}",
        format!(
            "{}  {}  {}",
            format_timestamp(&memory.created_at),
            location,
            memory.id
        )
        .dimmed()
    );
}

async fn handle_config(args: ConfigArgs, config_path: PathBuf) -> anyhow::Result<()> {
    match args.command {
        ConfigCommands::Get { key } => {
            let manager = ConfigManager::load(&config_path).await?;
            let config = manager.snapshot().await;

            match config.get_value(&key) {
                Some(value) => {
                    println!("{}", format!("{} = {}", key, value).green());
                }
                None => {
                    println!("{}", format!("❌ Key not found: {}", key).red());
                    std::process::exit(1);
                }
            }
        }
        ConfigCommands::Set { key, value } => {
            let manager = ConfigManager::load(&config_path).await?;

            if let Err(e) = manager.update(|config| config.set_value(&key, &value)).await {
                eprintln!("{}", format!("❌ Failed to set value: {}", e).red());
                std::process::exit(1);
            }
            println!("{}", format!("✅ Set {} = {}", key, value).green());
        }
        ConfigCommands::Init { force } => {
            if config_path.exists() && !force {
                println!(
                    "{}",
                    format!("⚠️  Config already exists at {:?}", config_path).yellow()
                );
                println!("{}", "Use --force to overwrite".dimmed());
                return Ok(());
            }

            // 初始化目录
            pinmap_config::init_pinmap_dirs().await?;

            let manager = ConfigManager::new(Config::default(), config_path.clone());
            manager.save().await?;

            println!(
                "{}",
                format!("✅ Config initialized at {:?}", config_path).green()
            );
            println!("{}", "You can edit this file to customize your settings".dimmed());
        }
        ConfigCommands::Show => {
            let manager = ConfigManager::load(&config_path).await?;
            let config = manager.snapshot().await;

            println!("{}", "📋 Current Configuration:".cyan().bold());
            println!();
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
