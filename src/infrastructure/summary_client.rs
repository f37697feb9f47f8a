// プロジェクトサマリー作成フロークライアント
//
// NJRAのサマリー作成フロー（flowUrl）を呼び出し、結果のJSONをそのまま返す。
// 再試行は行わない。タイムアウトはreqwestクライアント側で設定する。

use crate::domain::RequestParams;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, instrument};
use url::Url;

/// リクエストタイムアウト（秒）
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// 接続タイムアウト（秒）
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// APIキーを送るヘッダー名
pub const API_KEY_HEADER: &str = "x-api-key";

/// APIシークレットを送るヘッダー名
pub const API_SECRET_HEADER: &str = "x-api-secret";

/// サマリー作成呼び出しのエラー型
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PrepareError {
    /// フローURLが絶対URLとして解釈できない
    #[error("フローURLが不正です: {0}")]
    InvalidFlowUrl(String),

    /// HTTPエラー（ステータスコード付き）
    #[error("HTTPエラー: status={status}, message={message}")]
    HttpError {
        /// HTTPステータスコード
        status: u16,
        /// レスポンスボディ
        message: String,
    },

    /// タイムアウトまたは接続失敗
    #[error("ネットワークエラー: {0}")]
    NetworkError(String),

    /// その他のリクエスト失敗
    #[error("リクエスト失敗: {0}")]
    RequestFailed(String),

    /// HTTPクライアントの構築失敗
    #[error("HTTPクライアントの構築に失敗: {0}")]
    ClientBuild(String),
}

/// プロジェクトサマリー作成処理
///
/// 外部のサマリー作成APIを抽象化し、本番用のHTTPクライアントと
/// テスト用モックを差し替えられるようにする。
#[async_trait]
pub trait SummaryPreparer: Send + Sync {
    /// プロジェクトサマリーを作成
    ///
    /// # 引数
    /// * `params` - 検証済みのリクエストパラメータ
    /// * `form_id` - サマリーフォームID
    /// * `flow_url` - 呼び出し先フローURL
    /// * `api_key` - APIキー
    /// * `api_secret` - APIシークレット
    ///
    /// # 戻り値
    /// * 成功時は外部APIの結果（形式は不透明）
    async fn prepare_project_summary(
        &self,
        params: &RequestParams,
        form_id: &str,
        flow_url: &str,
        api_key: &str,
        api_secret: &str,
    ) -> Result<Value, PrepareError>;
}

/// フローへ送るリクエストボディ
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FlowRequestBody<'a> {
    form_id: &'a str,
    params: &'a RequestParams,
}

/// reqwestによるサマリー作成フロークライアント
#[derive(Clone)]
pub struct FlowSummaryClient {
    client: Client,
}

impl std::fmt::Debug for FlowSummaryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlowSummaryClient").finish_non_exhaustive()
    }
}

impl FlowSummaryClient {
    /// タイムアウト設定済みのクライアントを作成
    pub fn new() -> Result<Self, PrepareError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| PrepareError::ClientBuild(e.to_string()))?;

        Ok(Self { client })
    }

    /// フローにPOSTして結果を取得
    #[instrument(skip_all, fields(application_id = %params.application_id, refs_only = %params.refs_only))]
    async fn post_summary(
        &self,
        params: &RequestParams,
        form_id: &str,
        flow_url: &str,
        api_key: &str,
        api_secret: &str,
    ) -> Result<Value, PrepareError> {
        let url = Url::parse(flow_url).map_err(|e| {
            error!(error = %e, "フローURLの解析に失敗");
            PrepareError::InvalidFlowUrl(e.to_string())
        })?;
        debug!(host = url.host_str().unwrap_or_default(), "サマリー作成フローを呼び出し");

        let response = self
            .client
            .post(url)
            .header(API_KEY_HEADER, api_key)
            .header(API_SECRET_HEADER, api_secret)
            .json(&FlowRequestBody { form_id, params })
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "サマリー作成リクエスト失敗");
                if e.is_timeout() || e.is_connect() {
                    PrepareError::NetworkError(e.to_string())
                } else {
                    PrepareError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!(error = %e, status = %status, "レスポンスボディの読み取りに失敗");
            PrepareError::RequestFailed(e.to_string())
        })?;

        if !status.is_success() {
            error!(status = %status, body = %body, "サマリー作成フローがエラーを返却");
            return Err(PrepareError::HttpError {
                status: status.as_u16(),
                message: body,
            });
        }

        info!(status = %status, "サマリー作成フロー呼び出し成功");
        Ok(parse_flow_response(&body))
    }
}

#[async_trait]
impl SummaryPreparer for FlowSummaryClient {
    async fn prepare_project_summary(
        &self,
        params: &RequestParams,
        form_id: &str,
        flow_url: &str,
        api_key: &str,
        api_secret: &str,
    ) -> Result<Value, PrepareError> {
        self.post_summary(params, form_id, flow_url, api_key, api_secret)
            .await
    }
}

/// フローのレスポンスボディを解釈
///
/// 空ならnull、JSONとして解釈できなければ文字列として扱う。
fn parse_flow_response(body: &str) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
}
