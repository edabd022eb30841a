pub mod key;
pub mod value;

pub use key::{CacheKey, CacheKeyFor};
pub use value::Json;
