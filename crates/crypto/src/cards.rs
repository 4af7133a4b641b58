//! # 署名からのカード導出
//!
//! ECDSA署名の (r, s, v) を混ぜ合わせたシードから、52枚デッキのカードインデックスを
//! 5枚生成する。暗号学的な乱数ではなく、同じ署名からは常に同じ手札が得られる。
//!
//! ## アルゴリズム
//! 1. `seed = 3*s + 5*r + 7*v`
//! 2. 5回繰り返す: `seed mod 52` を出力し、`seed = 31*seed + 13` で更新
//!
//! r, s は最大256ビットのため、全ての演算を `BigUint` で行い切り捨てを発生させない。

use num_bigint::BigUint;

/// デッキの枚数
pub const DECK_SIZE: u32 = 52;

/// 1回の導出で生成するカード枚数
pub const HAND_SIZE: usize = 5;

/// 署名のバイト長（r: 32, s: 32, v: 1）
pub const SIGNATURE_LEN: usize = 65;

/// 生成順に並んだカードインデックス（各要素は 0..52）
pub type Hand = [u8; HAND_SIZE];

/// 署名のパースエラー。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CardError {
    /// 16進数として解釈できない
    #[error("不正な16進数: {0}")]
    InvalidHex(String),
    /// 署名長が65バイトでない
    #[error("署名長が不正です: {actual}バイト（期待値: {expected}バイト）")]
    InvalidLength { expected: usize, actual: usize },
}

/// (r, s, v) から5枚のカードを導出する。
///
/// 純粋関数であり失敗しない。
pub fn derive_cards(r: &BigUint, s: &BigUint, v: &BigUint) -> Hand {
    let mut seed = s * 3u32 + r * 5u32 + v * 7u32;
    let deck = BigUint::from(DECK_SIZE);

    let mut hand = [0u8; HAND_SIZE];
    for card in hand.iter_mut() {
        // 剰余は 52 未満なので最下位ワードに収まる
        let index = (&seed % &deck).iter_u32_digits().next().unwrap_or(0);
        *card = index as u8;
        seed = seed * 31u32 + 13u32;
    }
    hand
}

/// 署名の構成要素。65バイト署名を固定オフセットで分割したもの。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureParts {
    pub r: BigUint,
    pub s: BigUint,
    pub v: BigUint,
}

impl SignatureParts {
    /// 65バイトの署名を r: [0,32), s: [32,64), v: [64,65) に分割する。
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CardError> {
        if bytes.len() != SIGNATURE_LEN {
            return Err(CardError::InvalidLength {
                expected: SIGNATURE_LEN,
                actual: bytes.len(),
            });
        }
        Ok(Self {
            r: BigUint::from_bytes_be(&bytes[..32]),
            s: BigUint::from_bytes_be(&bytes[32..64]),
            v: BigUint::from_bytes_be(&bytes[64..]),
        })
    }

    /// `0x`付き/なしの16進署名文字列から構築する。
    pub fn from_hex(signature: &str) -> Result<Self, CardError> {
        let bytes = decode_hex(signature)?;
        Self::from_bytes(&bytes)
    }

    /// 分割済みの構成要素からカードを導出する。
    pub fn derive_cards(&self) -> Hand {
        derive_cards(&self.r, &self.s, &self.v)
    }
}

/// 署名の構成要素1つ（16進文字列）を整数にパースする。
///
/// 空文字列・奇数長・16進以外の文字はエラーとし、0として扱うことはしない。
pub fn parse_component(component: &str) -> Result<BigUint, CardError> {
    let bytes = decode_hex(component)?;
    if bytes.is_empty() {
        return Err(CardError::InvalidHex("空の構成要素".to_string()));
    }
    Ok(BigUint::from_bytes_be(&bytes))
}

/// 16進署名文字列を分割し、カードを導出する。
pub fn cards_from_signature(signature: &str) -> Result<Hand, CardError> {
    Ok(SignatureParts::from_hex(signature)?.derive_cards())
}

fn decode_hex(s: &str) -> Result<Vec<u8>, CardError> {
    let body = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(body).map_err(|e| CardError::InvalidHex(format!("{e}")))
}
