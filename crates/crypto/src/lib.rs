//! # ChainHoldem 暗号処理
//!
//! Gatewayが利用する暗号処理をまとめる。
//!
//! | 用途 | アルゴリズム |
//! |------|------------|
//! | ハッシュ | Keccak-256 |
//! | メッセージ署名 | secp256k1 ECDSA（リカバリ可能, EIP-191 personal message） |
//! | カード導出 | (r, s, v) の線形結合 + 線形合同漸化式（`cards`モジュール） |

pub mod cards;

use std::fmt;

use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use sha3::{Digest, Keccak256};

pub use cards::{
    cards_from_signature, derive_cards, parse_component, CardError, Hand, SignatureParts,
    DECK_SIZE, HAND_SIZE, SIGNATURE_LEN,
};

/// personal messageのプレフィックス
const PERSONAL_MESSAGE_PREFIX: &str = "\x19Ethereum Signed Message:\n";

/// EIP-155以前の`v`オフセット（v = 27 + recovery id）
const LEGACY_V_OFFSET: u8 = 27;

/// 暗号処理のエラー型
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    /// 秘密鍵として解釈できない
    #[error("不正な秘密鍵: {0}")]
    InvalidKey(String),
    /// ECDSA署名に失敗
    #[error("ECDSA署名に失敗しました")]
    SigningFailed,
    /// 署名から公開鍵を復元できない
    #[error("署名からの公開鍵復元に失敗しました")]
    RecoveryFailed,
    /// 署名の形式が不正
    #[error(transparent)]
    Signature(#[from] CardError),
}

/// Keccak-256ハッシュ計算。
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// personal message形式でハッシュする。
///
/// `keccak256("\x19Ethereum Signed Message:\n" || len(message) || message)`
pub fn hash_personal_message(message: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(PERSONAL_MESSAGE_PREFIX.as_bytes());
    hasher.update(message.len().to_string().as_bytes());
    hasher.update(message);
    hasher.finalize().into()
}

/// 文字列メッセージをKeccak-256でハッシュする。
///
/// `0x`付きの正しい16進文字列はバイト列として、それ以外はUTF-8文字列としてハッシュする
/// （web3のsha3/soliditySha3と同じ扱い）。
pub fn keccak256_message(message: &str) -> [u8; 32] {
    match message.strip_prefix("0x").map(hex::decode) {
        Some(Ok(bytes)) => keccak256(&bytes),
        _ => keccak256(message.as_bytes()),
    }
}

/// `0x`付き16進文字列に変換する。
pub fn to_hex_prefixed(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// ローカルで保持するsecp256k1秘密鍵。
///
/// Debug出力にはアドレスのみを含める。
pub struct EthKey {
    signing_key: SigningKey,
}

impl EthKey {
    /// 既存の署名鍵から構築する。
    pub fn new(signing_key: SigningKey) -> Self {
        Self { signing_key }
    }

    /// `0x`付き/なしの32バイト16進秘密鍵から構築する。
    pub fn from_hex(key_hex: &str) -> Result<Self, CryptoError> {
        let body = key_hex.trim();
        let body = body.strip_prefix("0x").unwrap_or(body);
        let bytes = hex::decode(body)
            .map_err(|e| CryptoError::InvalidKey(format!("16進デコードに失敗: {e}")))?;
        if bytes.len() != 32 {
            return Err(CryptoError::InvalidKey(format!(
                "秘密鍵は32バイトである必要があります（{}バイト）",
                bytes.len()
            )));
        }
        let signing_key = SigningKey::from_slice(&bytes)
            .map_err(|_| CryptoError::InvalidKey("secp256k1の秘密鍵として不正".to_string()))?;
        Ok(Self::new(signing_key))
    }

    /// 20バイトのアドレス。
    pub fn address(&self) -> [u8; 20] {
        address_from_verifying_key(self.signing_key.verifying_key())
    }

    /// `0x`付きのアドレス文字列（小文字）。
    pub fn address_hex(&self) -> String {
        to_hex_prefixed(&self.address())
    }

    /// 32バイトのハッシュにリカバリ可能な署名を行い、r || s || v の65バイトを返す。
    pub fn sign_hash(&self, hash: &[u8; 32]) -> Result<[u8; SIGNATURE_LEN], CryptoError> {
        let (signature, recovery_id) = self
            .signing_key
            .sign_prehash_recoverable(hash)
            .map_err(|_| CryptoError::SigningFailed)?;

        let mut out = [0u8; SIGNATURE_LEN];
        out[..64].copy_from_slice(&signature.to_bytes());
        out[64] = recovery_id.to_byte() + LEGACY_V_OFFSET;
        Ok(out)
    }

    /// メッセージをpersonal message形式でハッシュして署名する。
    /// (ハッシュ, 署名) を返す。
    pub fn sign_personal_message(
        &self,
        message: &[u8],
    ) -> Result<([u8; 32], [u8; SIGNATURE_LEN]), CryptoError> {
        let hash = hash_personal_message(message);
        let signature = self.sign_hash(&hash)?;
        Ok((hash, signature))
    }
}

impl fmt::Debug for EthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EthKey")
            .field("address", &self.address_hex())
            .finish_non_exhaustive()
    }
}

/// 署名とハッシュから署名者アドレスを復元する。
///
/// `v` は 27/28 と 0/1 のどちらも受け付ける。
pub fn recover_address(hash: &[u8; 32], signature: &[u8]) -> Result<[u8; 20], CryptoError> {
    if signature.len() != SIGNATURE_LEN {
        return Err(CardError::InvalidLength {
            expected: SIGNATURE_LEN,
            actual: signature.len(),
        }
        .into());
    }
    let sig = Signature::from_slice(&signature[..64]).map_err(|_| CryptoError::RecoveryFailed)?;
    let v = signature[64];
    let v = if v >= LEGACY_V_OFFSET { v - LEGACY_V_OFFSET } else { v };
    let recovery_id = RecoveryId::from_byte(v).ok_or(CryptoError::RecoveryFailed)?;

    let verifying_key = VerifyingKey::recover_from_prehash(hash, &sig, recovery_id)
        .map_err(|_| CryptoError::RecoveryFailed)?;
    Ok(address_from_verifying_key(&verifying_key))
}

fn address_from_verifying_key(key: &VerifyingKey) -> [u8; 20] {
    let point = key.to_encoded_point(false);
    // 先頭の0x04を除いた64バイトをハッシュし、末尾20バイトを使う
    let hash = keccak256(&point.as_bytes()[1..]);
    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    address
}
