//! # Gatewayエンドポイント
//!
//! 成功時は `{ "link": ..., "status": "OK" }`、失敗時は `GatewayError` 経由で
//! `{ "error": ..., "status": "ERROR" }` を返す。

pub mod call;
pub mod deploy;
pub mod health;
pub mod sign;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use call::handle_call;
pub use deploy::handle_deploy;
pub use health::handle_healthcheck;
pub use sign::handle_sign;
