//! # メッセージ署名方式の抽象化
//!
//! /sign で使う署名処理を抽象化するトレイト。
//! 環境変数 `SIGNING_MODE` で実装を切り替える。
//!
//! 現在の署名方式:
//! - `wallet` - ウォレット経由のpersonal sign。署名からカードを導出する。
//! - `local` - 生の秘密鍵によるローカル署名。カードは導出しない。

pub mod local;
pub mod wallet;

use std::fmt;
use std::str::FromStr;

use holdem_crypto::{Hand, SIGNATURE_LEN};

use crate::error::GatewayError;

pub use local::LocalKeySigner;
pub use wallet::{load_wallet, personal_sign_keccak, WalletSigner};

/// 署名方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningMode {
    /// ウォレット経由の署名 + カード導出
    Wallet,
    /// ローカル鍵による署名（カード導出なし）
    Local,
}

impl fmt::Display for SigningMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SigningMode::Wallet => f.write_str("wallet"),
            SigningMode::Local => f.write_str("local"),
        }
    }
}

/// 未知の署名方式
#[derive(Debug, thiserror::Error)]
#[error("未知の署名方式です: {0}（wallet または local）")]
pub struct UnknownSigningMode(String);

impl FromStr for SigningMode {
    type Err = UnknownSigningMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wallet" => Ok(SigningMode::Wallet),
            "local" => Ok(SigningMode::Local),
            other => Err(UnknownSigningMode(other.to_string())),
        }
    }
}

/// 署名結果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedMessage {
    /// 署名対象のハッシュ
    pub hash: [u8; 32],
    /// r || s || v
    pub signature: [u8; SIGNATURE_LEN],
    /// 署名から導出したカード（導出しない方式ではNone）
    pub cards: Option<Hand>,
}

/// メッセージ署名のトレイト。
///
/// 実装はリクエストごとに`private_ext`から鍵を構築し、共有状態を持たない。
#[async_trait::async_trait]
pub trait MessageSigner: Send + Sync {
    /// この実装の署名方式。
    fn mode(&self) -> SigningMode;

    /// `private_ext`の鍵で`msg`に署名する。
    async fn sign(&self, private_ext: &str, msg: &str) -> Result<SignedMessage, GatewayError>;
}

/// 署名方式に対応する実装を構築する。
pub fn signer_for(mode: SigningMode) -> Box<dyn MessageSigner> {
    match mode {
        SigningMode::Wallet => Box::new(WalletSigner),
        SigningMode::Local => Box::new(LocalKeySigner),
    }
}
