//! # POST /call
//!
//! デプロイ済みコントラクトのメソッドをトランザクションとして呼び出す。
//!
//! `revealCards` は `args_json = {game_id, hash}` を受け取り、
//! `keccak256(hash)` への呼び出し元の署名を `card_hash` として
//! `revealCards(game_id, card_hash, hash)` を呼ぶ。
//! それ以外のメソッドは `args_json` の配列をABIの入力型に合わせて変換する。

use std::sync::Arc;

use alloy_primitives::Address;
use alloy_signer_local::PrivateKeySigner;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use holdem_crypto::to_hex_prefixed;
use holdem_types::{CallRequest, CallResponse, LinkResponse, RevealCardsArgs};
use serde_json::Value;

use crate::abi::encode_function_call;
use crate::artifact::ContractArtifact;
use crate::config::GatewayState;
use crate::error::GatewayError;
use crate::signing::{load_wallet, personal_sign_keccak};

/// カード公開メソッド名
pub const REVEAL_CARDS: &str = "revealCards";

/// POST /call - コントラクトメソッドの呼び出し。
#[tracing::instrument(skip_all, fields(request_id = %uuid::Uuid::new_v4()))]
pub async fn handle_call(
    State(state): State<Arc<GatewayState>>,
    body: Result<Json<CallRequest>, JsonRejection>,
) -> Result<Json<LinkResponse<CallResponse>>, GatewayError> {
    let Json(body) = body?;

    let to: Address = body
        .contract_address
        .trim()
        .parse()
        .map_err(|e| GatewayError::BadRequest(format!("contract_addressが不正です: {e}")))?;
    let wallet = load_wallet(&body.private_ext)?;

    let artifact =
        ContractArtifact::load(&state.config.artifacts_dir, &state.config.contract_name).await?;
    if artifact.abi.function(&body.method).is_none() {
        return Err(GatewayError::BadRequest(format!(
            "ABIにメソッドがありません: {}",
            body.method
        )));
    }

    let args = build_args(&wallet, &body.method, body.args_json).await?;
    let input = encode_function_call(&artifact.abi, &body.method, &args)?;

    tracing::info!(
        address = %wallet.address(),
        contract_address = %to,
        method = %body.method,
        "メソッドを呼び出し"
    );
    let outcome = state.chain.call(wallet, to, input.into()).await?;
    if !outcome.success {
        tracing::warn!(tx_hash = %outcome.transaction_hash, method = %body.method, "トランザクションがrevertしました");
    }

    Ok(Json(LinkResponse::ok(CallResponse {
        transaction_hash: outcome.transaction_hash.to_string(),
        block_number: outcome.block_number,
        success: outcome.success,
    })))
}

/// `args_json` をメソッド引数の配列に変換する。
///
/// JSON文字列で渡された場合は先にパースする。`null` は引数なし。
async fn build_args(
    wallet: &PrivateKeySigner,
    method: &str,
    args_json: Value,
) -> Result<Vec<Value>, GatewayError> {
    let args_json = match args_json {
        Value::String(text) => serde_json::from_str(&text)
            .map_err(|e| GatewayError::BadRequest(format!("args_jsonのパースに失敗: {e}")))?,
        other => other,
    };

    if method == REVEAL_CARDS {
        let args: RevealCardsArgs = serde_json::from_value(args_json).map_err(|e| {
            GatewayError::BadRequest(format!("revealCardsの引数は{{game_id, hash}}です: {e}"))
        })?;
        let (_, card_hash) = personal_sign_keccak(wallet, &args.hash).await?;
        return Ok(vec![
            args.game_id,
            Value::String(to_hex_prefixed(&card_hash)),
            Value::String(args.hash),
        ]);
    }

    match args_json {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => Ok(items),
        _ => Err(GatewayError::BadRequest(format!(
            "{method}のargs_jsonは配列である必要があります"
        ))),
    }
}
