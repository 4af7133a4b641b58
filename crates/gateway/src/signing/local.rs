//! # ローカル鍵による署名
//!
//! `private_ext`の秘密鍵で、メッセージ本体をpersonal message形式でハッシュして署名する。
//! 署名処理はk256で直接行い、カードは導出しない。

use holdem_crypto::EthKey;

use super::{load_wallet, MessageSigner, SignedMessage, SigningMode};
use crate::error::GatewayError;

/// ローカル鍵による署名（カード導出なし）。
pub struct LocalKeySigner;

#[async_trait::async_trait]
impl MessageSigner for LocalKeySigner {
    fn mode(&self) -> SigningMode {
        SigningMode::Local
    }

    async fn sign(&self, private_ext: &str, msg: &str) -> Result<SignedMessage, GatewayError> {
        // 鍵の解釈（hex / ニーモニック）はウォレットと共通
        let key = EthKey::new(load_wallet(private_ext)?.credential().clone());
        let (hash, signature) = key.sign_personal_message(msg.as_bytes())?;
        tracing::debug!(address = %key.address_hex(), "ローカル鍵で署名");

        Ok(SignedMessage {
            hash,
            signature,
            cards: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use holdem_crypto::{hash_personal_message, recover_address};

    const TEST_KEY: &str = "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

    /// メッセージ本体のpersonal hashに署名し、カードを導出しないことを確認
    #[tokio::test]
    async fn test_local_sign() {
        let signed = LocalKeySigner.sign(TEST_KEY, "hello world").await.unwrap();

        assert_eq!(signed.hash, hash_personal_message(b"hello world"));
        assert_eq!(
            signed.hash.as_slice(),
            alloy_primitives::eip191_hash_message("hello world").as_slice()
        );
        assert!(signed.cards.is_none());

        let signer = recover_address(&signed.hash, &signed.signature).unwrap();
        assert_eq!(hex::encode(signer), "2c7536e3605d9c16a7a3d7b1898e529396a65c23");
    }

    /// 不正な鍵がSigningエラーになることを確認
    #[tokio::test]
    async fn test_local_sign_rejects_bad_key() {
        let err = LocalKeySigner.sign("0x00", "hello").await.unwrap_err();
        assert!(matches!(err, GatewayError::Signing(_)));
    }
}
