//! # POST /deploy
//!
//! 設定されたコントラクトを `private_ext` のアカウントからデプロイする。

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use holdem_types::{DeployRequest, DeployResponse, LinkResponse};

use crate::abi::encode_constructor;
use crate::artifact::ContractArtifact;
use crate::config::GatewayState;
use crate::error::GatewayError;
use crate::signing::load_wallet;

/// POST /deploy - コントラクトのデプロイ。
///
/// 作成バイトコードにABIエンコードしたコンストラクタ引数を連結して送信し、
/// receiptのコントラクトアドレスを返す。
#[tracing::instrument(skip_all, fields(request_id = %uuid::Uuid::new_v4()))]
pub async fn handle_deploy(
    State(state): State<Arc<GatewayState>>,
    body: Result<Json<DeployRequest>, JsonRejection>,
) -> Result<Json<LinkResponse<DeployResponse>>, GatewayError> {
    let Json(body) = body?;
    let wallet = load_wallet(&body.private_ext)?;

    let artifact =
        ContractArtifact::load(&state.config.artifacts_dir, &state.config.contract_name).await?;
    let mut code = artifact.bytecode()?;
    code.extend(encode_constructor(&artifact.abi, &state.config.constructor_args)?);

    tracing::info!(
        address = %wallet.address(),
        contract = %state.config.contract_name,
        "コントラクトをデプロイ"
    );
    let outcome = state.chain.deploy(wallet, code.into()).await?;
    tracing::info!(
        contract_address = %outcome.contract_address,
        tx_hash = %outcome.transaction_hash,
        "デプロイ完了"
    );

    Ok(Json(LinkResponse::ok(DeployResponse {
        contract_address: outcome.contract_address.to_string(),
        transaction_hash: outcome.transaction_hash.to_string(),
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints::test_helpers::{
        mock_contract_address, test_state, MockChainClient, SentTx, TEST_BYTECODE, TEST_KEY,
    };
    use crate::signing::SigningMode;
    use alloy_primitives::U256;

    fn deploy_request(private_ext: &str) -> Result<Json<DeployRequest>, JsonRejection> {
        Ok(Json(DeployRequest {
            private_ext: private_ext.to_string(),
        }))
    }

    /// バイトコード + 手数料のコンストラクタ引数が送信されることを確認
    #[tokio::test]
    async fn test_deploy_sends_code_and_constructor_args() {
        let chain = MockChainClient::default();
        let state = test_state(SigningMode::Wallet, chain.clone());

        let result = handle_deploy(State(state), deploy_request(TEST_KEY)).await;
        assert!(result.is_ok(), "handle_deploy failed: {:?}", result.err());
        let link = result.unwrap().0.link;
        assert_eq!(
            link.contract_address.to_lowercase(),
            format!("0x{}", hex::encode(mock_contract_address()))
        );

        let mut expected = hex::decode(TEST_BYTECODE).unwrap();
        expected.extend(U256::from(10_000_000_000_000_000u64).to_be_bytes::<32>());

        let sent = chain.sent();
        assert_eq!(sent.len(), 1);
        match &sent[0] {
            SentTx::Deploy { from, code } => {
                assert_eq!(hex::encode(from), "2c7536e3605d9c16a7a3d7b1898e529396a65c23");
                assert_eq!(code.to_vec(), expected);
            }
            other => panic!("unexpected tx: {other:?}"),
        }
    }

    /// アーティファクトがない場合は送信せずArtifactエラーになることを確認
    #[tokio::test]
    async fn test_deploy_missing_artifact() {
        let chain = MockChainClient::default();
        let mut state = test_state(SigningMode::Wallet, chain.clone());
        Arc::get_mut(&mut state).unwrap().config.contract_name = "Missing".to_string();

        let err = handle_deploy(State(state), deploy_request(TEST_KEY)).await.unwrap_err();
        assert!(matches!(err, GatewayError::Artifact(_)));
        assert!(chain.sent().is_empty());
    }

    /// RPCの失敗が502になることを確認
    #[tokio::test]
    async fn test_deploy_chain_failure() {
        let state = test_state(SigningMode::Wallet, MockChainClient::failing());

        let err = handle_deploy(State(state), deploy_request(TEST_KEY)).await.unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_deploy_bad_key() {
        let chain = MockChainClient::default();
        let state = test_state(SigningMode::Wallet, chain.clone());

        let err = handle_deploy(State(state), deploy_request("nope")).await.unwrap_err();
        assert!(matches!(err, GatewayError::Signing(_)));
        assert!(chain.sent().is_empty());
    }
}
