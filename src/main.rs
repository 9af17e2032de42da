use aop_showcase::aop::Journal;
use aop_showcase::app::{create_router, simple};
use aop_showcase::app::simple::handler::AppState;
use aop_showcase::infrastructure::{config::AppConfig, logger::Logger};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    config.validate()?;
    Logger::init(&config.logging);

    info!("启动 AOP 演示服务器...");

    let journal = Journal::new(config.journal.capacity);
    info!(capacity = journal.capacity(), "观察日志已创建");
    let state = AppState::new(simple::advised_service(journal));
    let app = create_router(state, config.timeout());

    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;

    info!("🚀 AOP 演示服务器运行在 http://{}", addr);
    info!("📖 可用端点:");
    info!("   GET /beforeAndAfter?name=User             - before / after 通知");
    info!("   GET /around                               - around 通知");
    info!("   GET /afterReturning                       - 成功返回后的通知");
    info!("   GET /afterThrowing                        - 抛出异常后的通知");
    info!("   GET /annotatedMethod                      - 标记匹配");
    info!("   GET /secondAnnotatedMethod                - 第二个标记");
    info!("   GET /thirdAnnotatedMethod                 - 两个标记同时存在");
    info!("   GET /directlyCallMethodThatIsNotAdvised   - 经由代理调用");
    info!("   GET /indirectlyCallMethodThatIsNotAdvised - 服务内部调用，绕过代理");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("服务器已停止");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("监听 Ctrl-C 失败: {}", e);
    }
}
