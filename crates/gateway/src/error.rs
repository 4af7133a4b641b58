//! # Gateway エラー型
//!
//! 全エンドポイントで共通のエラー型。
//! レスポンスは `{ "error": ..., "status": "ERROR" }` 形式のJSONで返す。

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::Json;
use holdem_crypto::{CardError, CryptoError};
use holdem_types::ErrorResponse;

/// Gatewayエラー型。
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// 不正なリクエスト（JSONパース失敗、不正なアドレス、未知のメソッド）
    #[error("不正なリクエスト: {0}")]
    BadRequest(String),
    /// 署名構成要素のパース失敗
    #[error("署名のパースに失敗: {0}")]
    Parse(#[from] CardError),
    /// 署名失敗（鍵の不正、署名処理の失敗）
    #[error("署名に失敗: {0}")]
    Signing(String),
    /// Ethereum RPC エラー
    #[error("Ethereum RPC エラー: {0}")]
    Chain(String),
    /// コントラクトアーティファクトの読み込み・解釈に失敗
    #[error("コントラクトアーティファクトの読み込みに失敗: {0}")]
    Artifact(String),
    /// 内部エラー
    #[error("内部エラー: {0}")]
    Internal(String),
}

impl GatewayError {
    /// エラー種別に対応するHTTPステータス。
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::BadRequest(_) | GatewayError::Parse(_) => StatusCode::BAD_REQUEST,
            GatewayError::Signing(_) => StatusCode::UNPROCESSABLE_ENTITY,
            GatewayError::Chain(_) => StatusCode::BAD_GATEWAY,
            GatewayError::Artifact(_) | GatewayError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<CryptoError> for GatewayError {
    fn from(e: CryptoError) -> Self {
        match e {
            CryptoError::Signature(card) => GatewayError::Parse(card),
            other => GatewayError::Signing(other.to_string()),
        }
    }
}

impl From<JsonRejection> for GatewayError {
    fn from(rejection: JsonRejection) -> Self {
        GatewayError::BadRequest(rejection.body_text())
    }
}

impl axum::response::IntoResponse for GatewayError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "リクエスト処理に失敗");
        } else {
            tracing::warn!(error = %self, "リクエストを拒否");
        }
        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    /// エラー種別ごとのHTTPステータスを確認
    #[test]
    fn test_status_mapping() {
        assert_eq!(
            GatewayError::BadRequest("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GatewayError::Parse(CardError::InvalidHex("zz".into())).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GatewayError::Signing("x".into()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(GatewayError::Chain("x".into()).status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            GatewayError::Artifact("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    /// 暗号エラーが適切なGatewayエラーに変換されることを確認
    #[test]
    fn test_crypto_error_conversion() {
        let parse: GatewayError = CryptoError::Signature(CardError::InvalidLength {
            expected: 65,
            actual: 64,
        })
        .into();
        assert!(matches!(parse, GatewayError::Parse(_)));

        let signing: GatewayError = CryptoError::InvalidKey("bad".into()).into();
        assert!(matches!(signing, GatewayError::Signing(_)));
    }

    /// エラーレスポンスが200以外かつ構造化JSONであることを確認
    #[tokio::test]
    async fn test_error_response_body() {
        let response = GatewayError::Chain("接続拒否".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.status, "ERROR");
        assert!(body.error.contains("接続拒否"));
    }
}
