/// サンプルハンドラー
///
/// サンプルLambdaが呼び出された際に、固定ラベルでサンプル操作を実行する。
use serde_json::Value;
use tracing::info;

use crate::infrastructure::SampleOps;

/// サンプル操作に渡すラベル
pub const SAMPLE_LABEL: &str = "the handler";

pub struct SampleHandler<S>
where
    S: SampleOps,
{
    ops: S,
}

impl<S> SampleHandler<S>
where
    S: SampleOps,
{
    pub fn new(ops: S) -> Self {
        Self { ops }
    }

    /// 呼び出しを処理（失敗しない）
    pub fn handle(&self, _event: &Value) {
        info!("サンプルハンドラーを実行");
        self.ops.run(SAMPLE_LABEL);
    }
}
