use std::fmt;
use std::str::FromStr;

/// SQL 语句类别，每个类别对应资源根目录下的一个子目录
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Select,
    Insert,
    Update,
    Delete,
    Merge,
    Create,
    Alter,
    Rename,
    Truncate,
    Drop,
    Grant,
    Revoke,
}

impl Verb {
    pub const ALL: [Verb; 12] = [
        Verb::Select,
        Verb::Insert,
        Verb::Update,
        Verb::Delete,
        Verb::Merge,
        Verb::Create,
        Verb::Alter,
        Verb::Rename,
        Verb::Truncate,
        Verb::Drop,
        Verb::Grant,
        Verb::Revoke,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Verb::Select => "select",
            Verb::Insert => "insert",
            Verb::Update => "update",
            Verb::Delete => "delete",
            Verb::Merge => "merge",
            Verb::Create => "create",
            Verb::Alter => "alter",
            Verb::Rename => "rename",
            Verb::Truncate => "truncate",
            Verb::Drop => "drop",
            Verb::Grant => "grant",
            Verb::Revoke => "revoke",
        }
    }

    /// 默认目录前缀，例如 `select/`
    pub fn default_prefix(self) -> String {
        format!("{}/", self.as_str())
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown SQL verb '{0}'")]
pub struct UnknownVerb(pub String);

impl FromStr for Verb {
    type Err = UnknownVerb;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Verb::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownVerb(s.to_string()))
    }
}
