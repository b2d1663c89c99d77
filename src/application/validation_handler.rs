/// アクセス検証ハンドラー
///
/// 検証Lambdaが呼び出された際に、固定のアクセス検証リクエストを
/// EntityValidatorへ送信する。イベントペイロードは参照しない。
use serde_json::Value;
use thiserror::Error;
use tracing::{error, info};

use crate::domain::AccessRequest;
use crate::infrastructure::{EntityValidator, EntityValidatorError};

/// アクセス検証ハンドラーのエラー型
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationHandlerError {
    /// アクセス検証ケイパビリティが失敗
    #[error("Access check failed: {0}")]
    AccessCheck(#[from] EntityValidatorError),
}

/// アクセス検証リクエストを処理するハンドラー
pub struct ValidationHandler<V>
where
    V: EntityValidator,
{
    validator: V,
}

impl<V> ValidationHandler<V>
where
    V: EntityValidator,
{
    pub fn new(validator: V) -> Self {
        Self { validator }
    }

    /// 呼び出しを処理
    ///
    /// # 処理フロー
    /// 1. 固定メッセージをログ出力
    /// 2. 固定のAccessRequestでアクセス可否を判定
    /// 3. 判定失敗時はログ出力してエラーを返却
    pub async fn handle(&self, _event: &Value) -> Result<(), ValidationHandlerError> {
        info!("アクセス検証ハンドラーを実行");

        let request = AccessRequest::placeholder();

        if let Err(err) = self.validator.can_access_resource(&request).await {
            error!(
                error = %err,
                full_access = request.full_access,
                identifier_count = request.identifiers.len(),
                extension_count = request.extensions.len(),
                "アクセス検証に失敗"
            );
            return Err(err.into());
        }

        Ok(())
    }
}
