use freight_rateio::{api, AppConfig, DailySequence, TripRegistry};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载配置
    let config = AppConfig::load()?;

    // 初始化日志 - 本地时间格式, RUST_LOG 优先
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log.level))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    info!("Starting server with config: {:?}", config);

    // 行程编号序列由这里注入
    let registry = Arc::new(TripRegistry::new(Arc::new(DailySequence::new())));
    let app = api::router(api::AppState {
        registry,
        scale: config.output.scale,
    });

    // 启动服务器
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  POST /api/rateio/calculate  - allocate freight by weight");
    info!("  POST /api/rateio/batch      - allocate many trips in parallel");
    info!("  POST /api/trips             - open a trip session");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
