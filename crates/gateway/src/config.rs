//! # Gateway設定・共有状態
//!
//! 環境変数からの設定読み込みとGatewayの共有状態の定義。

use std::path::PathBuf;

use anyhow::Context;

use crate::chain::ChainClient;
use crate::signing::{MessageSigner, SigningMode};

/// デプロイ時のコンストラクタ引数の既定値（手数料 0.01 ETH）
const DEFAULT_CONSTRUCTOR_ARGS: &str = r#"["10000000000000000"]"#;

/// Gateway設定。起動時に一度だけ読み込む。
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// HTTPリッスンアドレス
    pub listen_addr: String,
    /// Ethereum JSON-RPC エンドポイント
    pub rpc_url: String,
    /// コンパイル済みアーティファクト（`<name>.json`）のディレクトリ
    pub artifacts_dir: PathBuf,
    /// デプロイ・呼び出し対象のコントラクト名
    pub contract_name: String,
    /// デプロイ時のコンストラクタ引数
    pub constructor_args: Vec<serde_json::Value>,
    /// /sign の署名方式
    pub signing_mode: SigningMode,
    /// トランザクションのガスリミット
    pub gas_limit: u64,
    /// トランザクションのガス価格（wei）
    pub gas_price_wei: u128,
    /// 送信・receipt待ちのタイムアウト（秒）
    pub tx_timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            rpc_url: "http://localhost:8545".to_string(),
            artifacts_dir: PathBuf::from("/usr/src/app/src/contracts/artifacts"),
            contract_name: "ChainHoldem".to_string(),
            constructor_args: vec![serde_json::Value::String("10000000000000000".to_string())],
            signing_mode: SigningMode::Wallet,
            gas_limit: 1_500_000,
            gas_price_wei: 30_000_000_000,
            tx_timeout_secs: 120,
        }
    }
}

impl GatewayConfig {
    /// 環境変数から構築する。未設定の項目は既定値を使う。
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        let listen_addr = std::env::var("LISTEN_ADDR").unwrap_or(defaults.listen_addr);
        let rpc_url = std::env::var("ETH_RPC_URL").unwrap_or(defaults.rpc_url);
        let artifacts_dir = std::env::var("CONTRACT_ARTIFACTS_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.artifacts_dir);
        let contract_name = std::env::var("CONTRACT_NAME").unwrap_or(defaults.contract_name);

        let constructor_args_json = std::env::var("CONTRACT_CONSTRUCTOR_ARGS")
            .unwrap_or_else(|_| DEFAULT_CONSTRUCTOR_ARGS.to_string());
        let constructor_args: Vec<serde_json::Value> =
            serde_json::from_str(&constructor_args_json)
                .context("CONTRACT_CONSTRUCTOR_ARGSはJSON配列である必要があります")?;

        let signing_mode = match std::env::var("SIGNING_MODE") {
            Ok(mode) => mode.parse()?,
            Err(_) => defaults.signing_mode,
        };

        let gas_limit = match std::env::var("TX_GAS_LIMIT") {
            Ok(v) => v.parse().context("TX_GAS_LIMITは整数である必要があります")?,
            Err(_) => defaults.gas_limit,
        };
        let gas_price_wei = match std::env::var("TX_GAS_PRICE_WEI") {
            Ok(v) => v.parse().context("TX_GAS_PRICE_WEIは整数である必要があります")?,
            Err(_) => defaults.gas_price_wei,
        };
        let tx_timeout_secs = match std::env::var("TX_TIMEOUT_SECS") {
            Ok(v) => v.parse().context("TX_TIMEOUT_SECSは整数である必要があります")?,
            Err(_) => defaults.tx_timeout_secs,
        };
        if tx_timeout_secs == 0 {
            anyhow::bail!("TX_TIMEOUT_SECSは1以上である必要があります");
        }

        Ok(Self {
            listen_addr,
            rpc_url,
            artifacts_dir,
            contract_name,
            constructor_args,
            signing_mode,
            gas_limit,
            gas_price_wei,
            tx_timeout_secs,
        })
    }
}

/// Gatewayの共有状態。リクエスト間で読み取り専用。
pub struct GatewayState {
    /// 設定
    pub config: GatewayConfig,
    /// /sign の署名方式（トレイトで抽象化）
    pub signer: Box<dyn MessageSigner>,
    /// Ethereumへのトランザクション送信（トレイトで抽象化）
    pub chain: Box<dyn ChainClient>,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 既定値が元のデプロイ設定と一致することを確認
    #[test]
    fn test_defaults() {
        let config = GatewayConfig::default();
        assert_eq!(config.contract_name, "ChainHoldem");
        assert_eq!(config.gas_limit, 1_500_000);
        assert_eq!(config.gas_price_wei, 30_000_000_000);
        assert_eq!(config.tx_timeout_secs, 120);
        assert_eq!(config.signing_mode, SigningMode::Wallet);

        let parsed: Vec<serde_json::Value> = serde_json::from_str(DEFAULT_CONSTRUCTOR_ARGS).unwrap();
        assert_eq!(parsed, config.constructor_args);
    }
}
