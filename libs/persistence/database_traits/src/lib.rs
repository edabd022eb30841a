pub mod dao;

pub use dao::{FilterDao, GenericDao, InventoryDao};
