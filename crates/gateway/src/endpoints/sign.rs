//! # POST /sign
//!
//! `private_ext`の鍵でメッセージに署名し、署名と導出したカードを返す。
//! 署名方式は起動時の `SIGNING_MODE` で決まる。

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use holdem_crypto::to_hex_prefixed;
use holdem_types::{LinkResponse, SignRequest, SignResponse};

use crate::config::GatewayState;
use crate::error::GatewayError;

/// POST /sign - メッセージ署名 + カード導出。
///
/// walletモードでは `keccak256(msg)` をpersonal signし、署名の r, s, v から
/// 5枚のカードを導出する。localモードではカードを返さない。
#[tracing::instrument(skip_all, fields(request_id = %uuid::Uuid::new_v4()))]
pub async fn handle_sign(
    State(state): State<Arc<GatewayState>>,
    body: Result<Json<SignRequest>, JsonRejection>,
) -> Result<Json<LinkResponse<SignResponse>>, GatewayError> {
    let Json(body) = body?;

    let signed = state.signer.sign(&body.private_ext, &body.msg).await?;
    tracing::info!(mode = %state.signer.mode(), "メッセージに署名");

    Ok(Json(LinkResponse::ok(SignResponse {
        hash: to_hex_prefixed(&signed.hash),
        signature: to_hex_prefixed(&signed.signature),
        cards: signed.cards,
    })))
}
