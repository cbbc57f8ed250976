use std::borrow::Cow;
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor};
use std::path::PathBuf;

use tracing::debug;

pub type ResourceReader<'a> = Box<dyn BufRead + Send + 'a>;

/// 只读的 SQL 资源存储，按资源路径（如 `/sql/select/users/by-id.sql`）打开文本流
///
/// 资源不存在时返回 `Ok(None)`；其他 I/O 错误原样返回。
pub trait ResourceStore: Send + Sync {
    fn open(&self, path: &str) -> io::Result<Option<ResourceReader<'_>>>;
}

impl<S: ResourceStore + ?Sized> ResourceStore for std::sync::Arc<S> {
    fn open(&self, path: &str) -> io::Result<Option<ResourceReader<'_>>> {
        (**self).open(path)
    }
}

/// 资源路径统一去掉开头的 `/`，按相对路径处理
fn relative(path: &str) -> &str {
    path.trim_start_matches('/')
}

/// 从磁盘目录读取资源，资源路径相对于 `root`
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FsStore { root: root.into() }
    }

    fn locate(&self, path: &str) -> PathBuf {
        relative(path)
            .split('/')
            .filter(|seg| !seg.is_empty())
            .fold(self.root.clone(), |acc, seg| acc.join(seg))
    }
}

impl ResourceStore for FsStore {
    fn open(&self, path: &str) -> io::Result<Option<ResourceReader<'_>>> {
        let file_path = self.locate(path);
        debug!("Opening SQL resource {path} at {file_path:?}");
        let file = match File::open(&file_path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };
        // 目录不算资源
        if !file.metadata()?.is_file() {
            return Ok(None);
        }
        Ok(Some(Box::new(BufReader::new(file))))
    }
}

/// 内存中的资源表，可以用 `include_str!` 在编译期嵌入
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    files: HashMap<String, Cow<'static, str>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从静态表构建，例如
    ///
    /// ```ignore
    /// MemoryStore::from_static(&[
    ///     ("/sql/select/users/by-id.sql", include_str!("../sql/select/users/by-id.sql")),
    /// ]);
    /// ```
    pub fn from_static(entries: &[(&'static str, &'static str)]) -> Self {
        let files = entries
            .iter()
            .map(|(path, text)| (relative(path).to_string(), Cow::Borrowed(*text)))
            .collect();
        MemoryStore { files }
    }

    pub fn insert(&mut self, path: &str, text: impl Into<Cow<'static, str>>) -> &mut Self {
        self.files.insert(relative(path).to_string(), text.into());
        self
    }

    pub fn with(mut self, path: &str, text: impl Into<Cow<'static, str>>) -> Self {
        self.insert(path, text);
        self
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl ResourceStore for MemoryStore {
    fn open(&self, path: &str) -> io::Result<Option<ResourceReader<'_>>> {
        Ok(self
            .files
            .get(relative(path))
            .map(|text| Box::new(Cursor::new(text.as_bytes())) as ResourceReader<'_>))
    }
}
