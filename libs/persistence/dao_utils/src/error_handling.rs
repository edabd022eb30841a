use tokio_postgres::error::SqlState;

pub fn is_unique_violation(err: &tokio_postgres::Error) -> bool {
    err.code() == Some(&SqlState::UNIQUE_VIOLATION)
}

pub fn is_check_violation(err: &tokio_postgres::Error) -> bool {
    err.code() == Some(&SqlState::CHECK_VIOLATION)
}

pub fn is_out_of_range(err: &tokio_postgres::Error) -> bool {
    err.code() == Some(&SqlState::NUMERIC_VALUE_OUT_OF_RANGE)
}

pub fn is_foreign_key_violation(err: &tokio_postgres::Error) -> bool {
    err.code() == Some(&SqlState::FOREIGN_KEY_VIOLATION)
}
