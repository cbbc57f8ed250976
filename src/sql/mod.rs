pub mod global;
pub mod loader;
pub mod store;
pub mod strip;
pub mod verb;

pub use loader::{QueryLoader, DEFAULT_BASE_PATH};
pub use store::{FsStore, MemoryStore, ResourceReader, ResourceStore};
pub use strip::{strip_comments, LINE_SEPARATOR};
pub use verb::{UnknownVerb, Verb};
