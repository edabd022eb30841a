use deadpool_redis::{Config, CreatePoolError, Pool, Runtime};
pub use deadpool_redis::{PoolError, redis::RedisError};
use tracing::{info, instrument};
use url::Url;
pub mod cache;
pub mod config;
pub mod core;
pub mod macros;

#[derive(Debug, thiserror::Error)]
pub enum RedisConnectError {
    #[error("Invalid redis url: {0}")]
    Url(#[from] url::ParseError),
    #[error("Failed to create redis pool: {0}")]
    Pool(#[from] CreatePoolError),
}

pub fn redis_url<C>(config: &C) -> Result<Url, url::ParseError>
where
    C: config::DbConnectConfig,
{
    Url::parse(&format!(
        "redis://{}:{}/{}",
        config.host(),
        config.port(),
        config.db()
    ))
}

#[instrument(skip_all, name = "connect-redis")]
pub fn connect_redis_db<C>(config: &C) -> Result<Pool, RedisConnectError>
where
    C: config::DbConnectConfig,
{
    let url = redis_url(config)?;

    info!(redis.url = %url, redis.connect = true);

    let cfg = Config {
        url: Some(url.to_string()),
        pool: Some(deadpool_redis::PoolConfig::default()),
        connection: None,
    };

    let pool = cfg.create_pool(Some(Runtime::Tokio1))?;
    Ok(pool)
}
