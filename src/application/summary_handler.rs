/// プロジェクトサマリー作成ハンドラー
///
/// リクエストボディの必須フィールドを検証し、シークレットを読み込んで
/// 外部のサマリー作成APIへ委譲する。
use lambda_http::http::header::{HeaderValue, CONTENT_TYPE};
use lambda_http::http::StatusCode;
use lambda_http::{Body, Request, Response};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::domain::ExtractedParams;
use crate::infrastructure::{ConfigError, SecretSource, Secrets, SummaryPreparer};

/// 外部API失敗時に返す汎用メッセージ
pub const PREPARE_FAILURE_MESSAGE: &str = "Failed to prepare project summary";

const APPLICATION_JSON: &str = "application/json";
const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// ハンドラーのエラー型
///
/// ここに含まれるエラーは構造化レスポンスに変換せず、
/// Lambdaランタイムへそのまま伝播させる。
#[derive(Debug, Error)]
pub enum SummaryHandlerError {
    /// シークレット未設定（デプロイ時の設定不備）
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("レスポンスのシリアライズに失敗: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("レスポンスの構築に失敗: {0}")]
    Response(#[from] lambda_http::http::Error),
}

/// プロジェクトサマリー作成リクエストを処理するハンドラー
///
/// # 処理フロー
/// 1. ボディから6フィールドを抽出（refsOnlyは未指定時false）
/// 2. 必須フィールドを検証し、欠落があれば400を返す
/// 3. シークレットを読み込む（欠落時はエラーを伝播）
/// 4. 外部APIを呼び出し、結果をそのまま200で返す
/// 5. 外部API失敗時は汎用メッセージで500を返す
pub struct ProjectSummaryHandler<S, P>
where
    S: SecretSource,
    P: SummaryPreparer,
{
    /// シークレットの取得元（リクエストごとに読み直す）
    secret_source: S,
    /// サマリー作成API
    preparer: P,
}

impl<S, P> ProjectSummaryHandler<S, P>
where
    S: SecretSource,
    P: SummaryPreparer,
{
    pub fn new(secret_source: S, preparer: P) -> Self {
        Self {
            secret_source,
            preparer,
        }
    }

    /// HTTPリクエストを処理
    ///
    /// # 戻り値
    /// * `Ok(Response)` - 200（外部APIの結果）、400（入力不備）、500（外部API失敗）
    /// * `Err(SummaryHandlerError)` - シークレット未設定などの致命的エラー
    pub async fn handle(&self, request: &Request) -> Result<Response<Body>, SummaryHandlerError> {
        let extracted = ExtractedParams::from_body(request.body());
        info!(params = ?extracted, "Preparing Project Summary");

        let params = match extracted.validate() {
            Ok(params) => params,
            Err(err) => {
                warn!(missing = %err, "入力検証エラー");
                return json_response(StatusCode::BAD_REQUEST, &err.to_response_body());
            }
        };

        let secrets = Secrets::load(&self.secret_source).inspect_err(|err| {
            error!(error = %err, "シークレットの読み込みに失敗");
        })?;

        let result = self
            .preparer
            .prepare_project_summary(
                &params,
                secrets.form_id(),
                secrets.flow_url(),
                secrets.api_key(),
                secrets.api_secret(),
            )
            .await;

        match result {
            Ok(summary) => {
                info!(result = %summary, "Success");
                summary_response(summary)
            }
            Err(err) => {
                error!(
                    error = %err,
                    application_id = %params.application_id,
                    "プロジェクトサマリーの作成に失敗"
                );
                json_response(StatusCode::INTERNAL_SERVER_ERROR, &[PREPARE_FAILURE_MESSAGE])
            }
        }
    }
}

/// JSONボディのレスポンスを構築
fn json_response<T: Serialize + ?Sized>(
    status: StatusCode,
    body: &T,
) -> Result<Response<Body>, SummaryHandlerError> {
    let json = serde_json::to_string(body)?;
    let response = Response::builder()
        .status(status)
        .header(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON))
        .body(Body::Text(json))?;
    Ok(response)
}

/// 外部APIの結果をそのまま200レスポンスにする
///
/// 文字列の結果はJSONでくくらず、テキストとして返す。
fn summary_response(summary: Value) -> Result<Response<Body>, SummaryHandlerError> {
    match summary {
        Value::String(text) => {
            let response = Response::builder()
                .status(StatusCode::OK)
                .header(CONTENT_TYPE, HeaderValue::from_static(TEXT_PLAIN))
                .body(Body::Text(text))?;
            Ok(response)
        }
        other => json_response(StatusCode::OK, &other),
    }
}
