//! サンプルケイパビリティ
//!
//! 文字列を1つ受け取り、観測可能な結果を返さない外部操作。

use tracing::debug;

/// サンプル操作トレイト（テスト用の抽象化）
pub trait SampleOps: Send + Sync {
    fn run(&self, label: &str);
}

/// ログ出力のみを行うサンプル操作
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSampleOps;

impl SampleOps for TracingSampleOps {
    fn run(&self, label: &str) {
        debug!(label = label, "サンプル操作を実行");
    }
}
