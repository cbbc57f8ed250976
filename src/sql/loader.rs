use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, info, warn};

use crate::config::LoaderConfig;
use crate::error::{LoaderError, Result};
use crate::sql::store::{FsStore, ResourceStore};
use crate::sql::strip::strip_comments;
use crate::sql::verb::{UnknownVerb, Verb};

pub const DEFAULT_BASE_PATH: &str = "/sql/";

/// 保证以且仅以一个 `/` 结尾
fn with_trailing_slash(s: &str) -> String {
    format!("{}/", s.trim_end_matches('/'))
}

/// 按语句类别组织的 SQL 文件加载器
///
/// 资源目录结构：
///
/// ```text
/// /{base_path}
///  ├─ delete/
///  │   └─ users/
///  │       └─ by-id.sql
///  ├─ insert/
///  │   └─ user.sql
///  ├─ select/
///  (...)
/// ```
///
/// `loader.delete("users.by-id")`、`loader.delete("users/by-id")` 和
/// `loader.delete("users/by-id.sql")` 都会读取 `/sql/delete/users/by-id.sql`。
///
/// 加载结果按传入的 key（类别前缀 + 调用方路径）缓存，同一个 key 只会读取一次文件；
/// 缓存条目在加载器生命周期内不会失效。
pub struct QueryLoader {
    store: Box<dyn ResourceStore>,
    base_path: String,
    prefixes: [String; 12],
    cache: RwLock<HashMap<String, Arc<str>>>,
}

impl QueryLoader {
    pub fn new(store: impl ResourceStore + 'static) -> Self {
        QueryLoader {
            store: Box::new(store),
            base_path: DEFAULT_BASE_PATH.to_string(),
            prefixes: Verb::ALL.map(Verb::default_prefix),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// 按配置创建基于磁盘目录的加载器
    pub fn from_config(config: &LoaderConfig) -> Result<Self, UnknownVerb> {
        let mut loader = QueryLoader::new(FsStore::new(&config.resource_root));
        loader.apply_config(config)?;
        Ok(loader)
    }

    /// 应用基础路径和类别前缀覆盖；前缀表里出现未知类别时报错
    pub fn apply_config(&mut self, config: &LoaderConfig) -> Result<&mut Self, UnknownVerb> {
        self.set_base_path(&config.base_path);
        for (name, prefix) in &config.prefixes {
            let verb: Verb = name.parse()?;
            self.set_prefix(verb, prefix);
        }
        Ok(self)
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn set_base_path(&mut self, path: impl AsRef<str>) -> &mut Self {
        self.base_path = with_trailing_slash(path.as_ref());
        self
    }

    pub fn with_base_path(mut self, path: impl AsRef<str>) -> Self {
        self.set_base_path(path);
        self
    }

    pub fn prefix(&self, verb: Verb) -> &str {
        &self.prefixes[verb.index()]
    }

    pub fn set_prefix(&mut self, verb: Verb, prefix: impl AsRef<str>) -> &mut Self {
        self.prefixes[verb.index()] = with_trailing_slash(prefix.as_ref());
        self
    }

    pub fn with_prefix(mut self, verb: Verb, prefix: impl AsRef<str>) -> Self {
        self.set_prefix(verb, prefix);
        self
    }

    /// key 对应的资源路径：去掉末尾的 `.sql`，`.` 换成 `/`，再拼上基础路径和扩展名
    pub fn resource_path(&self, key: &str) -> String {
        let stem = key.strip_suffix(".sql").unwrap_or(key);
        format!("{}{}.sql", self.base_path, stem.replace('.', "/"))
    }

    /// 加载 key 对应的 SQL（已去掉注释和空行）
    pub fn resolve(&self, key: &str) -> Result<Arc<str>> {
        if let Some(sql) = self.cached(key) {
            debug!("SQL cache hit for key '{key}'");
            return Ok(sql);
        }

        let path = self.resource_path(key);
        let reader = match self.store.open(&path) {
            Ok(Some(reader)) => reader,
            Ok(None) => {
                warn!("SQL resource not found: key '{key}', path {path}");
                return Err(LoaderError::NotFound {
                    key: key.to_string(),
                    path,
                });
            }
            Err(e) => return Err(LoaderError::io(path, e)),
        };
        // 读到一半出错不写缓存
        let sql: Arc<str> = strip_comments(reader)
            .map_err(|e| LoaderError::io(&path, e))?
            .into();

        // 并发首次加载同一个 key 时各自读取，后写入者覆盖，内容相同
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), Arc::clone(&sql));
        info!("Loaded SQL resource {path} for key '{key}'");

        Ok(sql)
    }

    /// `prefix(verb) + path` 再交给 [`resolve`](Self::resolve)
    pub fn load(&self, verb: Verb, path: &str) -> Result<Arc<str>> {
        self.resolve(&format!("{}{}", self.prefix(verb), path))
    }

    pub fn select(&self, path: &str) -> Result<Arc<str>> {
        self.load(Verb::Select, path)
    }

    pub fn insert(&self, path: &str) -> Result<Arc<str>> {
        self.load(Verb::Insert, path)
    }

    pub fn update(&self, path: &str) -> Result<Arc<str>> {
        self.load(Verb::Update, path)
    }

    pub fn delete(&self, path: &str) -> Result<Arc<str>> {
        self.load(Verb::Delete, path)
    }

    pub fn merge(&self, path: &str) -> Result<Arc<str>> {
        self.load(Verb::Merge, path)
    }

    pub fn create(&self, path: &str) -> Result<Arc<str>> {
        self.load(Verb::Create, path)
    }

    pub fn alter(&self, path: &str) -> Result<Arc<str>> {
        self.load(Verb::Alter, path)
    }

    pub fn rename(&self, path: &str) -> Result<Arc<str>> {
        self.load(Verb::Rename, path)
    }

    pub fn truncate(&self, path: &str) -> Result<Arc<str>> {
        self.load(Verb::Truncate, path)
    }

    pub fn drop(&self, path: &str) -> Result<Arc<str>> {
        self.load(Verb::Drop, path)
    }

    pub fn grant(&self, path: &str) -> Result<Arc<str>> {
        self.load(Verb::Grant, path)
    }

    pub fn revoke(&self, path: &str) -> Result<Arc<str>> {
        self.load(Verb::Revoke, path)
    }

    fn cached(&self, key: &str) -> Option<Arc<str>> {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    pub fn is_cached(&self, key: &str) -> bool {
        self.cached(key).is_some()
    }

    pub fn cached_count(&self) -> usize {
        self.cache.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl fmt::Debug for QueryLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryLoader")
            .field("base_path", &self.base_path)
            .field("prefixes", &self.prefixes)
            .field("cached", &self.cached_count())
            .finish_non_exhaustive()
    }
}
