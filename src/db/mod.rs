pub mod pool;
pub mod statement;

pub use pool::create_pool;
pub use statement::{prepare, prepare_verb};
