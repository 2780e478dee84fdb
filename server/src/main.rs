use todo_server::{Config, ServerError};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = Config::load()?;
    todo_server::start(config).await
}
