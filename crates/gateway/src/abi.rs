//! # ABIエンコード
//!
//! JSONで受け取った引数をABIのパラメータ型に変換してエンコードする。
//! 配列・タプルは要素ごとに変換し、`string` 型の引数は受け取った文字列を加工せずに使う。

use alloy_dyn_abi::{DynSolType, DynSolValue, JsonAbiExt, Specifier};
use alloy_json_abi::{JsonAbi, Param};

use crate::error::GatewayError;

/// コンストラクタ引数をエンコードする（セレクタなし）。
///
/// ABIにコンストラクタがなければ引数は空でなければならない。
pub fn encode_constructor(
    abi: &JsonAbi,
    args: &[serde_json::Value],
) -> Result<Vec<u8>, GatewayError> {
    match &abi.constructor {
        Some(constructor) => {
            let values = coerce_params(&constructor.inputs, args)?;
            constructor
                .abi_encode_input(&values)
                .map_err(|e| GatewayError::BadRequest(format!("コンストラクタ引数のエンコードに失敗: {e}")))
        }
        None if args.is_empty() => Ok(Vec::new()),
        None => Err(GatewayError::BadRequest(
            "ABIにコンストラクタがないのに引数が指定されています".to_string(),
        )),
    }
}

/// メソッド呼び出しのcalldata（セレクタ + 引数）をエンコードする。
///
/// オーバーロードがある場合は引数の数が一致する最初の定義を使う。
pub fn encode_function_call(
    abi: &JsonAbi,
    method: &str,
    args: &[serde_json::Value],
) -> Result<Vec<u8>, GatewayError> {
    let overloads = abi
        .function(method)
        .ok_or_else(|| GatewayError::BadRequest(format!("ABIにメソッドがありません: {method}")))?;
    let function = overloads
        .iter()
        .find(|f| f.inputs.len() == args.len())
        .ok_or_else(|| {
            GatewayError::BadRequest(format!(
                "{method}の引数の数が一致しません（{}個）",
                args.len()
            ))
        })?;

    let values = coerce_params(&function.inputs, args)?;
    function
        .abi_encode_input(&values)
        .map_err(|e| GatewayError::BadRequest(format!("{method}の引数のエンコードに失敗: {e}")))
}

fn coerce_params(
    params: &[Param],
    args: &[serde_json::Value],
) -> Result<Vec<DynSolValue>, GatewayError> {
    if params.len() != args.len() {
        return Err(GatewayError::BadRequest(format!(
            "引数の数が一致しません（期待値: {}, 実際: {}）",
            params.len(),
            args.len()
        )));
    }

    params
        .iter()
        .zip(args)
        .map(|(param, arg)| {
            let ty = param.resolve().map_err(|e| {
                GatewayError::Artifact(format!("パラメータ型{}を解釈できません: {e}", param.ty))
            })?;
            coerce_value(&ty, arg).map_err(|e| {
                GatewayError::BadRequest(format!("引数{}を{}に変換できません: {e}", param.name, param.ty))
            })
        })
        .collect()
}

/// JSON値をABI型に合わせて変換する。
///
/// 配列・タプルはJSON配列を要素ごとに変換し、`string`は文字列をそのまま使う。
/// それ以外のスカラー型だけを `coerce_str` で解釈する。
fn coerce_value(ty: &DynSolType, arg: &serde_json::Value) -> Result<DynSolValue, String> {
    use serde_json::Value;

    match (ty, arg) {
        (DynSolType::String, Value::String(s)) => Ok(DynSolValue::String(s.clone())),
        (DynSolType::Array(inner), Value::Array(items)) => items
            .iter()
            .map(|item| coerce_value(inner, item))
            .collect::<Result<Vec<_>, _>>()
            .map(DynSolValue::Array),
        (DynSolType::FixedArray(inner, len), Value::Array(items)) => {
            if items.len() != *len {
                return Err(format!("要素数が一致しません（期待値: {len}, 実際: {}）", items.len()));
            }
            items
                .iter()
                .map(|item| coerce_value(inner, item))
                .collect::<Result<Vec<_>, _>>()
                .map(DynSolValue::FixedArray)
        }
        (DynSolType::Tuple(types), Value::Array(items)) => {
            if items.len() != types.len() {
                return Err(format!(
                    "タプルの要素数が一致しません（期待値: {}, 実際: {}）",
                    types.len(),
                    items.len()
                ));
            }
            types
                .iter()
                .zip(items)
                .map(|(ty, item)| coerce_value(ty, item))
                .collect::<Result<Vec<_>, _>>()
                .map(DynSolValue::Tuple)
        }
        (_, Value::String(s)) => ty.coerce_str(s).map_err(|e| e.to_string()),
        (_, Value::Number(_) | Value::Bool(_)) => {
            ty.coerce_str(&arg.to_string()).map_err(|e| e.to_string())
        }
        (_, other) => Err(format!("JSON値{other}は{ty}に対応しません")),
    }
}
