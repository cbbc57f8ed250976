use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sqlkit::{config::AppConfig, logging, AppContext, Verb};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "sqlkit", about = "Load SQL files by statement kind and logical path")]
struct Cli {
    /// 配置文件（不含扩展名也可以）
    #[arg(short, long, default_value = "config/default")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 打印 `<verb>/<path>` 对应的 SQL，例如 `show select users.by-id`
    Show { verb: Verb, path: String },
    /// 按完整 key 打印 SQL，例如 `raw select/users/by-id`
    Raw { key: String },
    /// 在数据库上预编译 `<verb>/<path>` 对应的 SQL，检查语法
    Prepare { verb: Verb, path: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. 加载配置
    let app_config = AppConfig::from_file(&cli.config)
        .context(format!("Failed to load configuration from {}", cli.config))?;

    // 2. 初始化日志
    logging::init_logging(&app_config.logging).context("Failed to initialize logging")?;
    info!("Configuration loaded: {app_config:?}");

    // 3. 创建 AppContext，只有 prepare 需要数据库连接
    let connect = matches!(cli.command, Command::Prepare { .. });
    let app_context = AppContext::from_config(&app_config, connect).await?;

    let result = run(&app_context, cli.command).await;
    if let Err(e) = &result {
        error!("sqlkit failed: {e:?}");
    }
    result
}

async fn run(ctx: &AppContext, command: Command) -> Result<()> {
    match command {
        Command::Show { verb, path } => {
            let sql = ctx.loader.load(verb, &path)?;
            println!("{sql}");
        }
        Command::Raw { key } => {
            let sql = ctx.loader.resolve(&key)?;
            println!("{sql}");
        }
        Command::Prepare { verb, path } => {
            ctx.prepare(verb, &path).await?;
            let sql = ctx.loader.load(verb, &path)?; // 已在缓存中
            println!("{sql}");
            info!("{verb} query '{path}' prepared successfully");
        }
    }
    Ok(())
}
