use anyhow::Result;
use gimps_submit::utils::logging;
use gimps_submit::{App, Config};
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    logging::init();

    // 加载配置：可选的 TOML 文件 + 环境变量
    let config = match std::env::var("GIMPS_SUBMIT_CONFIG") {
        Ok(path) => Config::from_toml_file(Path::new(&path))?.with_env_overrides(),
        Err(_) => Config::from_env(),
    };

    // 初始化并运行应用
    App::initialize(config).await?.run().await?;

    Ok(())
}
