use pos_core::{HttpBackend, PosState, setup_environment};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 设置环境 (dotenv, 配置, 工作目录, 日志)
    let config = setup_environment()?;
    tracing::info!(
        environment = %config.environment,
        work_dir = %config.work_dir,
        policy = %config.overconsumption_policy,
        "POS core starting"
    );

    // 2. 后端
    let backend = Arc::new(HttpBackend::from_config(&config)?);

    // 3. 初始化状态 (快照恢复 + 远端加载)
    let state = PosState::initialize(&config, backend.clone(), backend).await?;

    // 4. 后台任务
    let tasks = state.start_background_tasks();

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");
    state.shutdown(tasks).await;
    Ok(())
}
