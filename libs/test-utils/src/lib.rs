pub mod containers;
pub mod fakes;
pub mod faulty_cache;
pub mod fixtures;
pub mod schema;
pub mod tiers;

pub use containers::{TestPostgresContainer, TestRedisContainer};
pub use fakes::{InMemoryEventStore, InMemoryVenueStore};
pub use faulty_cache::{Fault, FaultySharedCache};
pub use fixtures::*;
pub use schema::SCHEMA_SQL;
pub use tiers::{TEST_L1_TTL, TEST_L2_TTL, TestTiers};
