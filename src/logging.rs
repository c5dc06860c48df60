//! 日志初始化：tracing + EnvFilter
//! - 默认 info，`--debug` 时为 debug
//! - 显式设置 RUST_LOG 时以它为准
//! - 日志写到 stderr，stdout 留给命令输出

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

pub(crate) fn init(debug: bool) -> Result<()> {
    let default_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(debug)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}
