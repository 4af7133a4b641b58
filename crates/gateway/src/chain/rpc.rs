//! # JSON-RPC によるトランザクション送信
//!
//! alloyのProviderにリクエストごとのウォレットを持たせて送信する。
//! nonce・chain idはProviderのfillerが取得し、ガスは設定値を固定で使う。
//! HTTPクライアントは起動時に構築したものを明示的に渡す。
//! 送信とreceipt待ちはそれぞれ設定したタイムアウトで打ち切る。

use std::time::Duration;

use alloy_network::{EthereumWallet, TransactionBuilder};
use alloy_primitives::{Address, Bytes};
use alloy_provider::{Provider, ProviderBuilder};
use alloy_rpc_client::RpcClient;
use alloy_rpc_types::{TransactionReceipt, TransactionRequest};
use alloy_signer_local::PrivateKeySigner;
use alloy_transport_http::Http;

use super::{CallOutcome, ChainClient, DeployOutcome};
use crate::error::GatewayError;

/// Ethereum JSON-RPC へのトランザクション送信実装。
pub struct RpcChainClient {
    /// JSON-RPC エンドポイント
    rpc_url: reqwest::Url,
    /// 共有HTTPクライアント
    http_client: alloy_transport_http::Client,
    /// ガスリミット
    gas_limit: u64,
    /// ガス価格（wei）
    gas_price_wei: u128,
    /// 送信・receipt待ちのタイムアウト
    tx_timeout: Duration,
}

impl RpcChainClient {
    pub fn new(
        rpc_url: &str,
        http_client: alloy_transport_http::Client,
        gas_limit: u64,
        gas_price_wei: u128,
        tx_timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let rpc_url = reqwest::Url::parse(rpc_url)
            .map_err(|e| GatewayError::Internal(format!("ETH_RPC_URLが不正です: {e}")))?;
        Ok(Self {
            rpc_url,
            http_client,
            gas_limit,
            gas_price_wei,
            tx_timeout,
        })
    }

    /// 署名者のウォレットでトランザクションを送信し、receiptを待つ。
    async fn submit(
        &self,
        signer: PrivateKeySigner,
        tx: TransactionRequest,
    ) -> Result<TransactionReceipt, GatewayError> {
        let from = signer.address();
        let transport = Http::with_client(self.http_client.clone(), self.rpc_url.clone());
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_client(RpcClient::new(transport, false));

        let tx = tx
            .with_from(from)
            .with_gas_limit(self.gas_limit)
            .with_gas_price(self.gas_price_wei);

        let pending = tokio::time::timeout(self.tx_timeout, provider.send_transaction(tx))
            .await
            .map_err(|_| {
                GatewayError::Chain(format!(
                    "トランザクション送信がタイムアウトしました（{:?}）",
                    self.tx_timeout
                ))
            })?
            .map_err(|e| GatewayError::Chain(format!("トランザクション送信失敗: {e}")))?;
        tracing::info!(tx_hash = %pending.tx_hash(), %from, "トランザクションを送信");

        pending
            .with_timeout(Some(self.tx_timeout))
            .get_receipt()
            .await
            .map_err(|e| GatewayError::Chain(format!("receipt取得失敗: {e}")))
    }
}

#[async_trait::async_trait]
impl ChainClient for RpcChainClient {
    async fn deploy(
        &self,
        signer: PrivateKeySigner,
        code: Bytes,
    ) -> Result<DeployOutcome, GatewayError> {
        let tx = TransactionRequest::default().with_deploy_code(code);
        let receipt = self.submit(signer, tx).await?;

        if !receipt.status() {
            return Err(GatewayError::Chain(format!(
                "デプロイトランザクションがrevertしました: {}",
                receipt.transaction_hash
            )));
        }
        let contract_address = receipt.contract_address.ok_or_else(|| {
            GatewayError::Chain("receiptにcontract_addressがありません".to_string())
        })?;

        Ok(DeployOutcome {
            contract_address,
            transaction_hash: receipt.transaction_hash,
        })
    }

    async fn call(
        &self,
        signer: PrivateKeySigner,
        to: Address,
        input: Bytes,
    ) -> Result<CallOutcome, GatewayError> {
        let tx = TransactionRequest::default().with_to(to).with_input(input);
        let receipt = self.submit(signer, tx).await?;

        Ok(CallOutcome {
            transaction_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            success: receipt.status(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 不正なRPC URLが起動時に拒否されることを確認
    #[test]
    fn test_invalid_rpc_url() {
        let result = RpcChainClient::new(
            "not a url",
            alloy_transport_http::Client::new(),
            1,
            1,
            Duration::from_secs(1),
        );
        assert!(matches!(result, Err(GatewayError::Internal(_))));
    }

    /// RPCに接続できない場合にChainエラーになることを確認
    #[tokio::test]
    async fn test_unreachable_rpc_is_chain_error() {
        // 空きポートを確保してすぐ閉じる
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client = RpcChainClient::new(
            &format!("http://127.0.0.1:{port}"),
            alloy_transport_http::Client::new(),
            1_500_000,
            30_000_000_000,
            Duration::from_secs(5),
        )
        .unwrap();

        let result = client
            .deploy(PrivateKeySigner::random(), Bytes::from_static(&[0x60, 0x00]))
            .await;
        assert!(matches!(result, Err(GatewayError::Chain(_))), "{result:?}");
    }

    /// 応答しないRPCでリクエストが打ち切られ、Chainエラーになることを確認
    #[tokio::test]
    async fn test_unresponsive_rpc_times_out() {
        let stalled_rpc = axum::Router::new().route(
            "/",
            axum::routing::post(|| async {
                std::future::pending::<axum::Json<serde_json::Value>>().await
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            axum::serve(listener, stalled_rpc).await.unwrap();
        });
        tokio::time::sleep(Duration::from_millis(50)).await;

        let client = RpcChainClient::new(
            &format!("http://127.0.0.1:{port}"),
            alloy_transport_http::Client::new(),
            1_500_000,
            30_000_000_000,
            Duration::from_millis(200),
        )
        .unwrap();

        let result = tokio::time::timeout(
            Duration::from_secs(10),
            client.call(
                PrivateKeySigner::random(),
                Address::repeat_byte(0x42),
                Bytes::from_static(&[0x01]),
            ),
        )
        .await
        .expect("タイムアウトが効いていない");
        match result {
            Err(GatewayError::Chain(msg)) => assert!(msg.contains("タイムアウト"), "{msg}"),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
