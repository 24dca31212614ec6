use crate::{
    error::{ProviderError, ProviderResult},
    provider::ChainDataProvider,
};
use async_trait::async_trait;
use reqwest::{
    Client,
    header::{CONTENT_TYPE, HeaderMap, HeaderValue},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Value, json};
use std::time::Duration;
use tonsub_chain::{BlockHeader, BlockIdExt, BlockShards, MASTERCHAIN_SHARD, MASTERCHAIN_WORKCHAIN, MasterchainInfo, Seqno, ShardBlockKey};
use tonsub_core::trace;

const JSON_RPC_PATH: &str = "/api/v2/jsonRPC";
const JSON_RPC_ID: &str = "ton-http-api";
const JSON_RPC_VERSION: &str = "2.0";

pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct JsonRpcConfig {
    pub endpoint: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl JsonRpcConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self { endpoint: endpoint.into(), api_key: None, timeout_ms: DEFAULT_TIMEOUT_MS }
    }

    pub fn with_api_key(self, api_key: impl Into<String>) -> Self {
        Self { api_key: Some(api_key.into()), ..self }
    }

    /// The JSON-RPC url, tolerating a trailing `/` in the endpoint
    pub fn url(&self) -> String {
        format!("{}{JSON_RPC_PATH}", self.endpoint.strip_suffix('/').unwrap_or(&self.endpoint))
    }
}

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    method: &'a str,
    params: Value,
    id: &'static str,
    jsonrpc: &'static str,
}

impl<'a> JsonRpcRequest<'a> {
    fn new(method: &'a str, params: Value) -> Self {
        Self { method, params, id: JSON_RPC_ID, jsonrpc: JSON_RPC_VERSION }
    }
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    ok: bool,
    #[serde(default)]
    result: Option<Value>,
}

/// Decodes the body of a JSON-RPC response into the expected result type
fn decode_response<T: DeserializeOwned>(status: u16, body: &str) -> ProviderResult<T> {
    let response: JsonRpcResponse = match serde_json::from_str(body) {
        Ok(response) if status == 200 => response,
        _ => return Err(ProviderError::Rejected(format!("status {status}: {body}"))),
    };
    if !response.ok {
        return Err(ProviderError::Rejected(body.to_string()));
    }
    let result = response.result.ok_or_else(|| ProviderError::BrokenResponse("missing result".to_string()))?;
    serde_json::from_value(result).map_err(|err| ProviderError::BrokenResponse(err.to_string()))
}

fn block_header_params(workchain: i32, shard: i64, seqno: Seqno) -> Value {
    json!({ "workchain": workchain, "shard": shard.to_string(), "seqno": seqno })
}

/// [`ChainDataProvider`] backed by the TON HTTP API v2 JSON-RPC endpoint
#[derive(Debug, Clone)]
pub struct JsonRpcProvider {
    client: Client,
    url: String,
}

impl JsonRpcProvider {
    pub fn new(config: &JsonRpcConfig) -> ProviderResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(api_key) = config.api_key.as_deref() {
            let value = HeaderValue::from_str(api_key).map_err(|err| ProviderError::InvalidConfig(format!("api key: {err}")))?;
            headers.insert("X-API-Key", value);
        }
        let client = Client::builder().default_headers(headers).timeout(Duration::from_millis(config.timeout_ms)).build()?;
        Ok(Self { client, url: config.url() })
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> ProviderResult<T> {
        trace!("[JsonRpcProvider] {method} {params}");
        let response = self.client.post(&self.url).json(&JsonRpcRequest::new(method, params)).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        decode_response(status, &body)
    }
}

#[async_trait]
impl ChainDataProvider for JsonRpcProvider {
    async fn get_masterchain_info(&self) -> ProviderResult<MasterchainInfo> {
        self.call("getMasterchainInfo", json!({})).await
    }

    async fn get_master_header(&self, seqno: Seqno) -> ProviderResult<BlockHeader> {
        self.call("getBlockHeader", block_header_params(MASTERCHAIN_WORKCHAIN, MASTERCHAIN_SHARD, seqno)).await
    }

    async fn get_shards(&self, seqno: Seqno) -> ProviderResult<Vec<BlockIdExt>> {
        let shards: BlockShards = self.call("shards", json!({ "seqno": seqno })).await?;
        Ok(shards.shards)
    }

    async fn get_shard_header(&self, key: ShardBlockKey) -> ProviderResult<BlockHeader> {
        self.call("getBlockHeader", block_header_params(key.workchain, key.shard, key.seqno)).await
    }
}
