use ticket_server::{Config, Server, init_logger_with_file, print_banner};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 加载 .env 与配置
    dotenv::dotenv().ok();
    let config = Config::from_env()?;

    // 2. 工作目录与日志 (guard 必须存活到进程结束)
    config.ensure_work_dir_structure()?;
    let logs_dir = config.logs_dir();
    let _log_guard = init_logger_with_file(&config.log_level, config.log_json, Some(&logs_dir));

    print_banner();
    tracing::info!(
        environment = %config.environment,
        work_dir = %config.work_dir,
        "Ticket server starting..."
    );

    // 3. 启动 HTTP 服务器 (状态在 run 中初始化)
    let server = Server::new(config);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
