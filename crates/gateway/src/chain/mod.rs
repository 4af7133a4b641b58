//! # Ethereum トランザクション送信
//!
//! デプロイ・メソッド呼び出しのトランザクション送信を抽象化する。
//! JSON-RPC実装は `rpc` サブモジュールを参照。

pub mod rpc;

pub use rpc::RpcChainClient;

use alloy_primitives::{Address, Bytes, B256};
use alloy_signer_local::PrivateKeySigner;

use crate::error::GatewayError;

/// デプロイ結果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployOutcome {
    /// デプロイされたコントラクトアドレス
    pub contract_address: Address,
    /// デプロイトランザクションのハッシュ
    pub transaction_hash: B256,
}

/// メソッド呼び出し結果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallOutcome {
    /// トランザクションハッシュ
    pub transaction_hash: B256,
    /// 取り込まれたブロック番号
    pub block_number: Option<u64>,
    /// receipt status
    pub success: bool,
}

/// トランザクション送信の抽象インターフェース。
///
/// 署名者はリクエストごとに渡され、実装はリクエスト間で鍵を保持しない。
#[async_trait::async_trait]
pub trait ChainClient: Send + Sync {
    /// コントラクト作成トランザクションを送信し、receiptを待つ。
    ///
    /// `code` はバイトコードにABIエンコード済みのコンストラクタ引数を連結したもの。
    async fn deploy(
        &self,
        signer: PrivateKeySigner,
        code: Bytes,
    ) -> Result<DeployOutcome, GatewayError>;

    /// `to` に `input` を送るトランザクションを送信し、receiptを待つ。
    async fn call(
        &self,
        signer: PrivateKeySigner,
        to: Address,
        input: Bytes,
    ) -> Result<CallOutcome, GatewayError>;
}
