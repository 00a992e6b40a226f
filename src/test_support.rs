//! 测试辅助：在本地随机端口上启动模拟的上游服务

use axum::Router;
use tokio::net::TcpListener;

/// 启动模拟服务，返回其基础 URL
pub async fn spawn_mock(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}
