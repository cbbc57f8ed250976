//! 进程级共享的加载器。
//!
//! 优先通过 [`AppContext`](crate::AppContext) 显式传递 [`QueryLoader`]；确实需要全局访问时，
//! 在启动阶段调用一次 [`init`]，之后用 [`loader`] 或这里的便捷函数读取。
//! 未初始化前访问返回 [`LoaderError::NotInitialized`]。

use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::error::{LoaderError, Result};
use crate::sql::{QueryLoader, Verb};

static GLOBAL_LOADER: OnceCell<QueryLoader> = OnceCell::new();

/// 安装全局加载器，只能调用一次
pub fn init(loader: QueryLoader) -> Result<&'static QueryLoader> {
    GLOBAL_LOADER
        .set(loader)
        .map_err(|_| LoaderError::AlreadyInitialized)?;
    self::loader()
}

pub fn loader() -> Result<&'static QueryLoader> {
    GLOBAL_LOADER.get().ok_or(LoaderError::NotInitialized)
}

pub fn resolve(key: &str) -> Result<Arc<str>> {
    loader()?.resolve(key)
}

pub fn load(verb: Verb, path: &str) -> Result<Arc<str>> {
    loader()?.load(verb, path)
}
