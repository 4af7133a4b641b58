//! エンドポイントテスト用のモックとヘルパー。

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use alloy_primitives::{Address, Bytes, B256};
use alloy_signer_local::PrivateKeySigner;

use crate::chain::{CallOutcome, ChainClient, DeployOutcome};
use crate::config::{GatewayConfig, GatewayState};
use crate::error::GatewayError;
use crate::signing::{signer_for, SigningMode};

/// テスト用の秘密鍵（アドレス 0x2c7536e3605d9c16a7a3d7b1898e529396a65c23）
pub const TEST_KEY: &str = "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

/// テスト用ABI（ChainHoldemの一部）
pub const TEST_ABI: &str = r#"[
    {
        "type": "constructor",
        "inputs": [{"name": "_commission", "type": "uint256", "internalType": "uint256"}],
        "stateMutability": "nonpayable"
    },
    {
        "type": "function",
        "name": "revealCards",
        "inputs": [
            {"name": "gameId", "type": "uint256", "internalType": "uint256"},
            {"name": "cardHash", "type": "bytes", "internalType": "bytes"},
            {"name": "hash", "type": "string", "internalType": "string"}
        ],
        "outputs": [],
        "stateMutability": "nonpayable"
    },
    {
        "type": "function",
        "name": "setCommission",
        "inputs": [{"name": "_commission", "type": "uint256", "internalType": "uint256"}],
        "outputs": [],
        "stateMutability": "nonpayable"
    }
]"#;

/// テスト用の作成バイトコード
pub const TEST_BYTECODE: &str = "6080604052348015600e575f80fd5b50603e80601a5f395ff3fe";

/// モックが返すコントラクトアドレス
pub fn mock_contract_address() -> Address {
    Address::repeat_byte(0x42)
}

/// 一時ディレクトリに `<name>.json` を書き出し、そのディレクトリを返す。
pub fn write_test_artifact(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("holdem-artifacts-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();

    let artifact = serde_json::json!({
        "abi": serde_json::from_str::<serde_json::Value>(TEST_ABI).unwrap(),
        "data": { "bytecode": { "object": TEST_BYTECODE } }
    });
    std::fs::write(
        dir.join(format!("{name}.json")),
        serde_json::to_vec_pretty(&artifact).unwrap(),
    )
    .unwrap();
    dir
}

/// モックが受け取ったトランザクション。
#[derive(Debug, Clone, PartialEq)]
pub enum SentTx {
    Deploy { from: Address, code: Bytes },
    Call { from: Address, to: Address, input: Bytes },
}

/// テスト用のモックChainClient。
/// RPCに接続せず、送信内容を記録して固定の結果を返す。
#[derive(Clone, Default)]
pub struct MockChainClient {
    pub sent: Arc<Mutex<Vec<SentTx>>>,
    /// trueならChainエラーを返す
    pub fail: bool,
}

impl MockChainClient {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<SentTx> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ChainClient for MockChainClient {
    async fn deploy(
        &self,
        signer: PrivateKeySigner,
        code: Bytes,
    ) -> Result<DeployOutcome, GatewayError> {
        if self.fail {
            return Err(GatewayError::Chain("mock: connection refused".to_string()));
        }
        self.sent.lock().unwrap().push(SentTx::Deploy {
            from: signer.address(),
            code,
        });
        Ok(DeployOutcome {
            contract_address: mock_contract_address(),
            transaction_hash: B256::repeat_byte(0xab),
        })
    }

    async fn call(
        &self,
        signer: PrivateKeySigner,
        to: Address,
        input: Bytes,
    ) -> Result<CallOutcome, GatewayError> {
        if self.fail {
            return Err(GatewayError::Chain("mock: connection refused".to_string()));
        }
        self.sent.lock().unwrap().push(SentTx::Call {
            from: signer.address(),
            to,
            input,
        });
        Ok(CallOutcome {
            transaction_hash: B256::repeat_byte(0xcd),
            block_number: Some(7),
            success: true,
        })
    }
}

/// テスト用GatewayStateを構築するヘルパー
pub fn test_state(mode: SigningMode, chain: MockChainClient) -> Arc<GatewayState> {
    let config = GatewayConfig {
        artifacts_dir: write_test_artifact("ChainHoldem"),
        signing_mode: mode,
        ..GatewayConfig::default()
    };
    Arc::new(GatewayState {
        config,
        signer: signer_for(mode),
        chain: Box::new(chain),
    })
}
