use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// 创建 MySQL 连接池。这里只用来预编译语句，连接数不需要太多
pub async fn create_pool(database_url: &str) -> Result<MySqlPool, sqlx::Error> {
    let connect_options = MySqlConnectOptions::from_str(database_url)?;

    let pool = MySqlPoolOptions::new()
        .max_connections(4)
        .min_connections(1)
        // 连接不上时尽快失败，而不是一直挂着
        .acquire_timeout(Duration::from_secs(3))
        .connect_with(connect_options)
        .await?;

    info!("MySQL pool connected (max 4 connections)");
    Ok(pool)
}
