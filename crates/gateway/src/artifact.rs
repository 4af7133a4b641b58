//! # コントラクトアーティファクト
//!
//! コンパイル済みアーティファクト（`<CONTRACT_ARTIFACTS_DIR>/<name>.json`）を読み込む。
//! 形式はRemixの出力（`abi` と `data.bytecode.object`）。

use std::path::Path;

use alloy_json_abi::JsonAbi;
use serde::Deserialize;

use crate::error::GatewayError;

/// コンパイル済みコントラクト。
#[derive(Debug, Clone, Deserialize)]
pub struct ContractArtifact {
    /// コントラクトABI
    pub abi: JsonAbi,
    /// コンパイル出力
    pub data: ArtifactData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactData {
    pub bytecode: ArtifactBytecode,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactBytecode {
    /// 作成用バイトコード（16進、`0x`なし）
    pub object: String,
}

impl ContractArtifact {
    /// `dir/<name>.json` を読み込む。
    pub async fn load(dir: &Path, name: &str) -> Result<Self, GatewayError> {
        let path = dir.join(format!("{name}.json"));
        let content = tokio::fs::read_to_string(&path).await.map_err(|e| {
            GatewayError::Artifact(format!("{}の読み込みに失敗: {e}", path.display()))
        })?;
        Self::from_json(&content)
    }

    /// JSON文字列から構築する。
    pub fn from_json(content: &str) -> Result<Self, GatewayError> {
        serde_json::from_str(content)
            .map_err(|e| GatewayError::Artifact(format!("アーティファクトのパースに失敗: {e}")))
    }

    /// 作成用バイトコードをデコードする。
    ///
    /// 未リンクのライブラリプレースホルダを含む場合はエラー。
    pub fn bytecode(&self) -> Result<Vec<u8>, GatewayError> {
        let object = self.data.bytecode.object.trim();
        let object = object.strip_prefix("0x").unwrap_or(object);
        if object.is_empty() {
            return Err(GatewayError::Artifact("バイトコードが空です".to_string()));
        }
        hex::decode(object)
            .map_err(|e| GatewayError::Artifact(format!("バイトコードのデコードに失敗: {e}")))
    }
}
