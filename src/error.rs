use std::io;

/// 加载 SQL 资源时可能出现的错误
#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    #[error("SQL resource not found for key '{key}' (looked up {path})")]
    NotFound { key: String, path: String },

    #[error("failed to read SQL resource {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("global query loader has not been initialized")]
    NotInitialized,

    #[error("global query loader is already initialized")]
    AlreadyInitialized,
}

impl LoaderError {
    pub fn io(path: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// 是否为资源不存在（调用方据此区分“没有这个查询”与真正的 I/O 故障）
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

// 预编译语句的错误：要么 SQL 没加载出来，要么数据库拒绝了它
#[derive(Debug, thiserror::Error)]
pub enum StatementError {
    #[error(transparent)]
    Load(#[from] LoaderError),

    #[error("database rejected prepared statement: {0}")]
    Database(#[from] sqlx::Error),
}

pub type Result<T, E = LoaderError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_key_and_path() {
        let err = LoaderError::NotFound {
            key: "select/users.by-id".to_string(),
            path: "/sql/select/users/by-id.sql".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("select/users.by-id"));
        assert!(msg.contains("/sql/select/users/by-id.sql"));
        assert!(err.is_not_found());
    }

    #[test]
    fn load_error_converts_into_statement_error() {
        let err: StatementError = LoaderError::NotInitialized.into();
        assert!(matches!(err, StatementError::Load(LoaderError::NotInitialized)));
        assert_eq!(err.to_string(), "global query loader has not been initialized");
    }
}
