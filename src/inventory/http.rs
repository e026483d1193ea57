// ==========================================
// 仓库拣料核对系统 - 库存服务 HTTP 客户端
// ==========================================
// 端点（相对 base_url）:
// - GET  /current   → LineItemRecord[]
// - POST /upload    → LineItemRecord[]（multipart, 字段名 "file"）
// - POST /finalize  → { message }
// ==========================================

use crate::domain::line_item::LineItemRecord;
use crate::domain::session::{FinalizePayload, FinalizeReceipt};
use crate::inventory::client::InventoryService;
use crate::inventory::error::{InventoryError, InventoryResult};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::instrument;

pub struct HttpInventoryClient {
    client: Client,
    base_url: String,
}

impl HttpInventoryClient {
    /// 创建客户端
    ///
    /// # 参数
    /// - base_url: 服务根地址，例如 `http://localhost:8080/api/picking`
    /// - timeout: 单次请求超时
    pub fn new(base_url: &str, timeout: Duration) -> InventoryResult<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(InventoryError::InvalidBaseUrl(base_url));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| InventoryError::Transport(format!("HTTP client error: {e}")))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// 检查状态码并解析 JSON 响应体
    async fn read_json<T: DeserializeOwned>(resp: Response) -> InventoryResult<T> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(InventoryError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }
        resp.json::<T>()
            .await
            .map_err(|e| InventoryError::Decode(e.to_string()))
    }
}

#[async_trait]
impl InventoryService for HttpInventoryClient {
    #[instrument(skip(self), fields(base = %self.base_url))]
    async fn fetch_current_items(&self) -> InventoryResult<Vec<LineItemRecord>> {
        let resp = self.client.get(self.endpoint("current")).send().await?;
        let records: Vec<LineItemRecord> = Self::read_json(resp).await?;
        tracing::debug!(rows = records.len(), "当前清单已获取");
        Ok(records)
    }

    #[instrument(skip(self, content), fields(base = %self.base_url, bytes = content.len()))]
    async fn upload_structure(
        &self,
        file_name: &str,
        content: Vec<u8>,
    ) -> InventoryResult<Vec<LineItemRecord>> {
        if content.is_empty() {
            return Err(InventoryError::Rejected(format!("文件为空: {}", file_name)));
        }

        let form = Form::new().part("file", Part::bytes(content).file_name(file_name.to_string()));
        let resp = self
            .client
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .await?;

        let records: Vec<LineItemRecord> = Self::read_json(resp).await?;
        tracing::info!(rows = records.len(), file = file_name, "结构文件已解析");
        Ok(records)
    }

    #[instrument(skip(self, payload), fields(base = %self.base_url, rows = payload.items_by_unique_id.len()))]
    async fn finalize(&self, payload: &FinalizePayload) -> InventoryResult<FinalizeReceipt> {
        let resp = self
            .client
            .post(self.endpoint("finalize"))
            .json(payload)
            .send()
            .await?;
        Self::read_json(resp).await
    }
}
