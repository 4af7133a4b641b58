//! # ChainHoldem Gateway 共有型定義
//!
//! GatewayのHTTP APIで送受信されるデータ構造をRust構造体として提供する。
//! CLIからも同じ型でGatewayを呼び出す。
//!
//! ## エンコーディング規則
//! - Hex（`0x`付き）: ハッシュ、署名、アドレス
//! - 10進整数: カードインデックス（0〜51）

use std::fmt;

use serde::{Deserialize, Serialize};

/// 成功レスポンスの`status`値
pub const STATUS_OK: &str = "OK";
/// 失敗レスポンスの`status`値
pub const STATUS_ERROR: &str = "ERROR";

/// 秘密鍵をDebug出力に載せないためのマスク文字列
const REDACTED: &str = "<redacted>";

// ---------------------------------------------------------------------------
// レスポンスエンベロープ
// ---------------------------------------------------------------------------

/// 成功時のレスポンス。`{ "link": ..., "status": "OK" }`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinkResponse<T> {
    /// エンドポイント固有の結果
    pub link: T,
    /// 常に`"OK"`
    pub status: String,
}

impl<T> LinkResponse<T> {
    /// 結果を成功エンベロープで包む。
    pub fn ok(link: T) -> Self {
        Self {
            link,
            status: STATUS_OK.to_string(),
        }
    }
}

/// 失敗時のレスポンス。`{ "error": ..., "status": "ERROR" }`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    /// エラーメッセージ
    pub error: String,
    /// 常に`"ERROR"`
    pub status: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            status: STATUS_ERROR.to_string(),
        }
    }
}

/// クライアント側で成功・失敗どちらのエンベロープも受け取るための型。
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum GatewayReply<T> {
    /// 成功
    Ok(LinkResponse<T>),
    /// 失敗
    Err(ErrorResponse),
}

/// GET /healthcheck のレスポンス
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    /// 常に`"ok"`
    pub status: String,
}

// ---------------------------------------------------------------------------
// /sign
// ---------------------------------------------------------------------------

/// POST /sign のリクエスト。
///
/// `private_ext`は16進数の秘密鍵またはBIP-39ニーモニック。
/// Debug出力ではマスクされる。
#[derive(Clone, Serialize, Deserialize)]
pub struct SignRequest {
    /// 署名対象メッセージ
    pub msg: String,
    /// 署名に使う鍵（秘密鍵hex or ニーモニック）
    pub private_ext: String,
}

impl fmt::Debug for SignRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignRequest")
            .field("msg", &self.msg)
            .field("private_ext", &REDACTED)
            .finish()
    }
}

/// POST /sign のレスポンス（`link`の中身）。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SignResponse {
    /// 署名対象ハッシュ（`0x`付きhex）
    pub hash: String,
    /// 65バイト署名 r || s || v（`0x`付きhex）
    pub signature: String,
    /// 署名から導出した5枚のカード。ローカル署名モードでは導出しない。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cards: Option<[u8; 5]>,
}

// ---------------------------------------------------------------------------
// /deploy
// ---------------------------------------------------------------------------

/// POST /deploy のリクエスト。
#[derive(Clone, Serialize, Deserialize)]
pub struct DeployRequest {
    /// デプロイに使うアカウントの鍵
    pub private_ext: String,
}

impl fmt::Debug for DeployRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeployRequest")
            .field("private_ext", &REDACTED)
            .finish()
    }
}

/// POST /deploy のレスポンス（`link`の中身）。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeployResponse {
    /// デプロイされたコントラクトのアドレス
    pub contract_address: String,
    /// デプロイトランザクションのハッシュ
    pub transaction_hash: String,
}

// ---------------------------------------------------------------------------
// /call
// ---------------------------------------------------------------------------

/// POST /call のリクエスト。
#[derive(Clone, Serialize, Deserialize)]
pub struct CallRequest {
    /// 送信元アカウントの鍵
    pub private_ext: String,
    /// 呼び出し先コントラクトアドレス
    pub contract_address: String,
    /// ABI上のメソッド名
    pub method: String,
    /// メソッド引数。`revealCards`はオブジェクト、それ以外は配列。
    /// JSON文字列で渡された場合はパースしてから解釈する。
    #[serde(default)]
    pub args_json: serde_json::Value,
}

impl fmt::Debug for CallRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallRequest")
            .field("private_ext", &REDACTED)
            .field("contract_address", &self.contract_address)
            .field("method", &self.method)
            .field("args_json", &self.args_json)
            .finish()
    }
}

/// `revealCards`の引数。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevealCardsArgs {
    /// ゲームID（数値または10進/16進文字列）
    pub game_id: serde_json::Value,
    /// カード配布時に使われたハッシュ
    pub hash: String,
}

/// POST /call のレスポンス（`link`の中身）。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CallResponse {
    /// トランザクションハッシュ
    pub transaction_hash: String,
    /// 取り込まれたブロック番号
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
    /// 実行成功したか（receipt status）
    pub success: bool,
}
