//! # ウォレット経由の署名
//!
//! `private_ext`（秘密鍵hexまたはBIP-39ニーモニック）からウォレットを構築し、
//! `keccak256(msg)` をpersonal signする。署名の r, s, v からカードを導出する。

use std::str::FromStr;

use alloy_signer::Signer;
use alloy_signer_local::coins_bip39::English;
use alloy_signer_local::{MnemonicBuilder, PrivateKeySigner};
use holdem_crypto::{cards_from_signature, keccak256_message, to_hex_prefixed, SIGNATURE_LEN};

use super::{MessageSigner, SignedMessage, SigningMode};
use crate::error::GatewayError;

/// `private_ext`からウォレット（署名者）を構築する。
///
/// 空白区切りの複数語はニーモニックとみなし、最初のアカウント（m/44'/60'/0'/0/0）を使う。
/// それ以外は32バイトの16進秘密鍵として解釈する。
/// エラーメッセージに鍵の内容は含めない。
pub fn load_wallet(private_ext: &str) -> Result<PrivateKeySigner, GatewayError> {
    let input = private_ext.trim();
    if input.is_empty() {
        return Err(GatewayError::Signing("private_extが空です".to_string()));
    }

    if input.split_whitespace().count() > 1 {
        MnemonicBuilder::<English>::default()
            .phrase(input)
            .index(0u32)
            .and_then(|builder| builder.build())
            .map_err(|_| GatewayError::Signing("ニーモニックから鍵を導出できません".to_string()))
    } else {
        PrivateKeySigner::from_str(input)
            .map_err(|_| GatewayError::Signing("秘密鍵として解釈できません".to_string()))
    }
}

/// `keccak256(msg)` をウォレットでpersonal signする。
/// (ハッシュ, 署名) を返す。
pub async fn personal_sign_keccak(
    wallet: &PrivateKeySigner,
    msg: &str,
) -> Result<([u8; 32], [u8; SIGNATURE_LEN]), GatewayError> {
    let hash = keccak256_message(msg);
    let signature = wallet
        .sign_message(&hash)
        .await
        .map_err(|e| GatewayError::Signing(format!("personal signに失敗: {e}")))?;
    Ok((hash, signature.as_bytes()))
}

/// ウォレット経由の署名 + カード導出。
pub struct WalletSigner;

#[async_trait::async_trait]
impl MessageSigner for WalletSigner {
    fn mode(&self) -> SigningMode {
        SigningMode::Wallet
    }

    async fn sign(&self, private_ext: &str, msg: &str) -> Result<SignedMessage, GatewayError> {
        let wallet = load_wallet(private_ext)?;
        let (hash, signature) = personal_sign_keccak(&wallet, msg).await?;

        // 署名の16進表現を固定オフセットで r, s, v に分割してカードを導出
        let cards = cards_from_signature(&to_hex_prefixed(&signature))?;
        tracing::debug!(address = %wallet.address(), ?cards, "署名からカードを導出");

        Ok(SignedMessage {
            hash,
            signature,
            cards: Some(cards),
        })
    }
}
