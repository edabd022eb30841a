pub mod error_handling;
pub mod query_helpers;

pub use error_handling::{
    is_check_violation, is_foreign_key_violation, is_out_of_range,
    is_unique_violation,
};
pub use query_helpers::{
    FilterBuilder, PgParam, PgParamBox, PgParamVec, escape_like,
};
