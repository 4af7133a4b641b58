//! # holdem-cli
//!
//! ChainHoldem の補助コマンド。
//!
//! - `cards <SIGNATURE>` - 65バイト署名から5枚のカードを導出
//! - `sign --msg <MSG>` - ローカル鍵で署名（鍵は `HOLDEM_PRIVATE_EXT`）
//! - `request sign|health` - 起動中のGatewayを呼び出す

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use holdem_crypto::{cards_from_signature, to_hex_prefixed, EthKey, Hand};
use holdem_types::{GatewayReply, HealthResponse, SignRequest, SignResponse};
use serde::de::DeserializeOwned;

#[derive(Parser)]
#[command(name = "holdem-cli", version, about = "ChainHoldem CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 署名（r || s || v の16進）から5枚のカードを導出する
    Cards {
        /// 65バイト署名（`0x`付き・なしどちらも可）
        signature: String,
    },
    /// メッセージのpersonal hashにローカル鍵で署名する
    Sign {
        /// 署名対象メッセージ
        #[arg(long)]
        msg: String,
        /// 16進秘密鍵
        #[arg(long, env = "HOLDEM_PRIVATE_EXT", hide_env_values = true)]
        private_ext: String,
    },
    /// 起動中のGatewayを呼び出す
    Request {
        /// GatewayのベースURL
        #[arg(long, env = "HOLDEM_GATEWAY_URL", default_value = "http://127.0.0.1:8080")]
        url: String,
        #[command(subcommand)]
        endpoint: RequestCommand,
    },
}

#[derive(Subcommand)]
enum RequestCommand {
    /// POST /sign
    Sign {
        #[arg(long)]
        msg: String,
        #[arg(long, env = "HOLDEM_PRIVATE_EXT", hide_env_values = true)]
        private_ext: String,
    },
    /// GET /healthcheck
    Health,
}

fn format_cards(cards: &Hand) -> String {
    cards
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn cmd_cards(signature: &str) -> anyhow::Result<Hand> {
    cards_from_signature(signature).context("署名からカードを導出できません")
}

fn cmd_sign(msg: &str, private_ext: &str) -> anyhow::Result<(String, String, Hand)> {
    let key = EthKey::from_hex(private_ext).context("HOLDEM_PRIVATE_EXTを秘密鍵として解釈できません")?;
    let (hash, signature) = key.sign_personal_message(msg.as_bytes())?;
    let signature_hex = to_hex_prefixed(&signature);
    let cards = cards_from_signature(&signature_hex)?;
    Ok((to_hex_prefixed(&hash), signature_hex, cards))
}

/// Gatewayのエンベロープを解いて`link`を取り出す。
async fn unwrap_reply<T: DeserializeOwned>(response: reqwest::Response) -> anyhow::Result<T> {
    let status = response.status();
    let reply: GatewayReply<T> = response
        .json()
        .await
        .with_context(|| format!("Gatewayの応答を解釈できません（HTTP {status}）"))?;
    match reply {
        GatewayReply::Ok(ok) => Ok(ok.link),
        GatewayReply::Err(err) => bail!("Gatewayエラー（HTTP {status}）: {}", err.error),
    }
}

async fn request_sign(
    client: &reqwest::Client,
    url: &str,
    msg: &str,
    private_ext: &str,
) -> anyhow::Result<SignResponse> {
    let response = client
        .post(format!("{}/sign", url.trim_end_matches('/')))
        .json(&SignRequest {
            msg: msg.to_string(),
            private_ext: private_ext.to_string(),
        })
        .send()
        .await
        .context("Gatewayに接続できません")?;
    unwrap_reply(response).await
}

async fn request_health(client: &reqwest::Client, url: &str) -> anyhow::Result<HealthResponse> {
    let response = client
        .get(format!("{}/healthcheck", url.trim_end_matches('/')))
        .send()
        .await
        .context("Gatewayに接続できません")?;
    if !response.status().is_success() {
        bail!("healthcheckが失敗しました（HTTP {}）", response.status());
    }
    Ok(response.json().await?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Cards { signature } => {
            println!("{}", format_cards(&cmd_cards(&signature)?));
        }
        Commands::Sign { msg, private_ext } => {
            let (hash, signature, cards) = cmd_sign(&msg, &private_ext)?;
            println!("hash:      {hash}");
            println!("signature: {signature}");
            println!("cards:     {}", format_cards(&cards));
        }
        Commands::Request { url, endpoint } => {
            let client = reqwest::Client::new();
            match endpoint {
                RequestCommand::Sign { msg, private_ext } => {
                    let link = request_sign(&client, &url, &msg, &private_ext).await?;
                    println!("{}", serde_json::to_string_pretty(&link)?);
                }
                RequestCommand::Health => {
                    let health = request_health(&client, &url).await?;
                    println!("{}", health.status);
                }
            }
        }
    }

    Ok(())
}
