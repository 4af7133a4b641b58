//! # ChainHoldem Gateway
//!
//! Ethereum チェーンへのHTTPプロキシ。
//!
//! ## エンドポイント
//! - `POST /sign` - メッセージ署名 + カード導出
//! - `POST /deploy` - ChainHoldemコントラクトのデプロイ
//! - `POST /call` - コントラクトメソッドの呼び出し
//! - `GET /healthcheck` - 死活監視
//!
//! 鍵（`private_ext`）はリクエストごとに受け取り、ログにも状態にも残さない。

mod abi;
mod artifact;
mod chain;
mod config;
mod endpoints;
mod error;
mod signing;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use chain::RpcChainClient;
use config::{GatewayConfig, GatewayState};
use endpoints::{handle_call, handle_deploy, handle_healthcheck, handle_sign};
use signing::signer_for;

/// Gatewayのルーターを構築する。
fn build_router(state: Arc<GatewayState>) -> Router {
    Router::new()
        .route("/sign", post(handle_sign))
        .route("/deploy", post(handle_deploy))
        .route("/call", post(handle_call))
        .route("/healthcheck", get(handle_healthcheck))
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "シグナルハンドラの登録に失敗");
        std::future::pending::<()>().await;
    }
    tracing::info!("シャットダウンします");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = GatewayConfig::from_env()?;
    tracing::info!(
        rpc_url = %config.rpc_url,
        contract = %config.contract_name,
        artifacts_dir = %config.artifacts_dir.display(),
        mode = %config.signing_mode,
        "設定を読み込みました"
    );

    // HTTPクライアントは一度だけ構築してチェーンクライアントに渡す
    let http_client = alloy_transport_http::Client::new();
    let chain = RpcChainClient::new(
        &config.rpc_url,
        http_client,
        config.gas_limit,
        config.gas_price_wei,
        std::time::Duration::from_secs(config.tx_timeout_secs),
    )?;

    let listen_addr = config.listen_addr.clone();
    let state = Arc::new(GatewayState {
        signer: signer_for(config.signing_mode),
        chain: Box::new(chain),
        config,
    });

    let app = build_router(state);

    tracing::info!("Gatewayを {} で起動します", listen_addr);
    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

// ---------------------------------------------------------------------------
// テスト
// ---------------------------------------------------------------------------
