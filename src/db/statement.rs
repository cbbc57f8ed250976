use sqlx::mysql::{MySql, MySqlStatement};
use sqlx::{Executor, Statement};
use tracing::{error, info};

use crate::error::StatementError;
use crate::sql::{QueryLoader, Verb};

/// 通过加载器取出 key 对应的 SQL，并在给定连接（或连接池）上预编译
///
/// SQL 资源不存在时直接返回 [`StatementError::Load`]，不会访问数据库。
pub async fn prepare<'c, E>(
    executor: E,
    loader: &QueryLoader,
    key: &str,
) -> Result<MySqlStatement<'static>, StatementError>
where
    E: Executor<'c, Database = MySql>,
{
    let sql = loader.resolve(key)?;
    let statement = executor.prepare(&*sql).await.map_err(|e| {
        error!("Failed to prepare SQL for key '{key}': {e:?}");
        e
    })?;
    info!("Prepared statement for key '{key}'");

    // 预编译结果借用了 SQL 文本，转成自有版本再返回
    Ok(Statement::to_owned(&statement))
}

/// `prefix(verb) + path` 版本的 [`prepare`]
pub async fn prepare_verb<'c, E>(
    executor: E,
    loader: &QueryLoader,
    verb: Verb,
    path: &str,
) -> Result<MySqlStatement<'static>, StatementError>
where
    E: Executor<'c, Database = MySql>,
{
    let key = format!("{}{}", loader.prefix(verb), path);
    prepare(executor, loader, &key).await
}
