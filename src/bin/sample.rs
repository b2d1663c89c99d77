/// サンプルLambda関数
///
/// 各呼び出しで固定ラベルのサンプル操作を実行し、常に成功を返す。
use fhir_access_lambda::application::SampleHandler;
use fhir_access_lambda::infrastructure::{SampleOps, TracingSampleOps, init_logging};
use lambda_runtime::{Error, LambdaEvent, service_fn};
use serde_json::Value;
use tracing::info_span;

#[tokio::main]
async fn main() -> Result<(), Error> {
    // 構造化ログを初期化
    init_logging();

    let handler = SampleHandler::new(TracingSampleOps);
    let handler = &handler;

    // Lambda関数を初期化して実行
    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        handle(handler, event)
    }))
    .await?;
    Ok(())
}

fn handle<S>(handler: &SampleHandler<S>, event: LambdaEvent<Value>) -> Result<(), Error>
where
    S: SampleOps,
{
    let _span = info_span!("invocation", request_id = %event.context.request_id).entered();

    handler.handle(&event.payload);
    Ok(())
}
