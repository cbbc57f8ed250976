use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::{self, create_pool};
use crate::sql::{QueryLoader, Verb};
use anyhow::{Context as _, Result};
use sqlx::mysql::MySqlStatement;
use sqlx::MySqlPool;
use tracing::info;

/// 启动时构建一次，按引用传给所有需要加载 SQL 的地方
#[derive(Clone, Debug)]
pub struct AppContext {
    pub loader: Arc<QueryLoader>,
    pub pool: Option<MySqlPool>,
}

impl AppContext {
    pub fn new(loader: QueryLoader, pool: Option<MySqlPool>) -> Arc<Self> {
        Arc::new(Self {
            loader: Arc::new(loader),
            pool,
        })
    }

    /// 按配置创建加载器；`connect` 为 true 时同时连接数据库
    pub async fn from_config(config: &AppConfig, connect: bool) -> Result<Arc<Self>> {
        let loader = QueryLoader::from_config(&config.loader)
            .context("Invalid loader prefix configuration")?;
        info!("QueryLoader initialized: {loader:?}");

        let pool = if connect {
            let url = config
                .database_url
                .as_deref()
                .context("database_url is not configured")?;
            Some(create_pool(url).await.context("Failed to connect to MySQL")?)
        } else {
            None
        };

        Ok(Self::new(loader, pool))
    }

    pub fn pool(&self) -> Result<&MySqlPool> {
        self.pool.as_ref().context("AppContext was created without a database pool")
    }

    pub async fn prepare(&self, verb: Verb, path: &str) -> Result<MySqlStatement<'static>> {
        let pool = self.pool()?;
        let statement = db::prepare_verb(pool, &self.loader, verb, path)
            .await
            .context(format!("Failed to prepare {verb} query '{path}'"))?;
        Ok(statement)
    }
}
