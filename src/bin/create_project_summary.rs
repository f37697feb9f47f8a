/// プロジェクトサマリー作成HTTP Lambdaエントリポイント
///
/// Lambda Function URL経由のHTTPリクエストを受け取り、
/// 入力検証後にNJRAのサマリー作成フローへ委譲する。
use lambda_http::{run, service_fn, Body, Error, Request, Response};
use project_summary::application::ProjectSummaryHandler;
use project_summary::infrastructure::{
    init_logging, EnvSecretSource, FlowSummaryClient, SecretSource, SummaryPreparer,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Error> {
    // 構造化ログを初期化
    init_logging();

    info!("プロジェクトサマリーLambda関数を初期化");

    // HTTPクライアントはコールドスタート時に1回だけ構築する。
    // シークレットは環境変数から毎リクエスト読み直す。
    let preparer = FlowSummaryClient::new()?;
    let handler = ProjectSummaryHandler::new(EnvSecretSource, preparer);

    run(service_fn(|request| function_handler(&handler, request))).await
}

/// HTTPリクエストハンドラー
///
/// 設定エラーなどの致命的エラーはLambdaランタイムへそのまま返す。
async fn function_handler<S, P>(
    handler: &ProjectSummaryHandler<S, P>,
    request: Request,
) -> Result<Response<Body>, Error>
where
    S: SecretSource,
    P: SummaryPreparer,
{
    let response = handler.handle(&request).await?;

    info!(status = response.status().as_u16(), "レスポンス送信");

    Ok(response)
}
