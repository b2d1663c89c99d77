/// アクセス検証Lambda関数
///
/// 起動時にHTTPクライアントとHealthLakeEntityValidatorを1度だけ構築し、
/// 静的な認証情報がなければAWSのデフォルトプロバイダーチェーンを署名に使う。
/// 各呼び出しでValidationHandlerにアクセス検証を委譲する。
/// 検証失敗はLambdaのエラーとして返却する。
use fhir_access_lambda::application::ValidationHandler;
use fhir_access_lambda::infrastructure::{
    EntityValidator, FUNCTION_TIMEOUT_SECS, HealthLakeEntityValidator, ValidatorConfig,
    default_credentials_provider, init_logging, new_http_client,
};
use lambda_runtime::{Error, LambdaEvent, service_fn};
use serde_json::Value;
use tracing::{Instrument, error, info, info_span, warn};

#[tokio::main]
async fn main() -> Result<(), Error> {
    // 構造化ログを初期化
    init_logging();

    let config = ValidatorConfig::from_env().inspect_err(|err| {
        error!(error = %err, "バリデーター設定読み込み失敗");
    })?;
    let client = new_http_client().inspect_err(|err| {
        error!(error = %err, "HTTPクライアント構築失敗");
    })?;

    info!(
        region = config.region(),
        datastore_configured = config.datastore_id().is_some(),
        function_timeout_secs = FUNCTION_TIMEOUT_SECS,
        "アクセス検証Lambdaを初期化"
    );

    let mut validator = HealthLakeEntityValidator::from_config(&config, client);
    if !validator.has_credentials() {
        match default_credentials_provider().await {
            Some(provider) => validator = validator.with_credentials_provider(provider),
            None => warn!("認証情報プロバイダーが見つかりません（エンティティ実在確認は失敗します）"),
        }
    }
    let handler = ValidationHandler::new(validator);
    let handler = &handler;

    // Lambda関数を初期化して実行
    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        handle(handler, event).await
    }))
    .await?;
    Ok(())
}

/// Lambda関数のメインハンドラー
///
/// # 処理フロー
/// 1. request_id付きのspanを開始
/// 2. ValidationHandlerでアクセス検証
/// 3. 失敗時はエラーを返却（Lambda側で失敗として記録される）
async fn handle<V>(handler: &ValidationHandler<V>, event: LambdaEvent<Value>) -> Result<(), Error>
where
    V: EntityValidator,
{
    let span = info_span!("invocation", request_id = %event.context.request_id);

    handler.handle(&event.payload).instrument(span).await?;
    Ok(())
}
