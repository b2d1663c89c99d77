//! エンティティアクセス検証モジュール
//!
//! FHIRリソースのExtensionが参照するエンティティへのアクセス可否を判定する。
//! - ポリシー評価（許可IDとの照合）はドメイン層で行う
//! - 参照先エンティティの実在確認はHealthLake FHIR R4 APIで行う（SigV4署名付き）

use std::time::SystemTime;

use async_trait::async_trait;
use aws_credential_types::Credentials;
use aws_credential_types::provider::{ProvideCredentials, SharedCredentialsProvider};
use aws_sigv4::http_request::{SignableBody, SignableRequest, SigningParams, SigningSettings, sign};
use aws_sigv4::sign::v4;
use reqwest::StatusCode;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use super::http_client::HttpClient;
use super::validator_config::ValidatorConfig;
use crate::domain::access_policy::{self, AccessViolation};
use crate::domain::{AccessRequest, EntityReference};

/// SigV4署名のサービス名
const SIGNING_SERVICE: &str = "healthlake";

/// 静的認証情報のプロバイダー名
const STATIC_PROVIDER_NAME: &str = "healthlake-validator-static";

/// エンティティ検証のエラー型
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EntityValidatorError {
    /// ポリシー違反
    #[error(transparent)]
    Policy(#[from] AccessViolation),
    /// HealthLakeがアクセスを拒否
    #[error("Access denied for {reference}: status={status}")]
    AccessDenied {
        reference: EntityReference,
        status: u16,
    },
    /// 参照先エンティティが存在しない
    #[error("Entity not found: {0}")]
    EntityNotFound(EntityReference),
    /// 実在確認が必要だがデータストアが未設定
    #[error("HealthLakeデータストアが設定されていません")]
    DatastoreNotConfigured,
    /// 実在確認が必要だが認証情報がない
    #[error("HealthLakeへの署名に使う認証情報がありません")]
    MissingCredentials,
    /// 認証情報の取得またはSigV4署名に失敗
    #[error("SigV4署名エラー: {0}")]
    Signing(String),
    /// HTTPエラー（ステータスコード付き）
    #[error("HTTPエラー: status={status}, message={message}")]
    HttpError { status: u16, message: String },
    /// ネットワークエラー
    #[error("ネットワークエラー: {0}")]
    NetworkError(String),
}

/// エンティティアクセス検証トレイト（テスト用の抽象化）
#[async_trait]
pub trait EntityValidator: Send + Sync {
    /// リクエストが参照するリソースにアクセス可能か判定する
    ///
    /// # 戻り値
    /// * `Ok(())` - アクセス可能
    /// * `Err(EntityValidatorError)` - アクセス不可または判定失敗
    async fn can_access_resource(&self, request: &AccessRequest)
    -> Result<(), EntityValidatorError>;
}

/// HealthLake FHIR R4 APIを使用したエンティティ検証実装
pub struct HealthLakeEntityValidator {
    region: String,
    datastore_id: Option<String>,
    /// FHIRベースURLの上書き（HealthLake以外のエンドポイント用）
    base_url: Option<String>,
    credentials: Option<SharedCredentialsProvider>,
    client: HttpClient,
}

impl std::fmt::Debug for HealthLakeEntityValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthLakeEntityValidator")
            .field("region", &self.region)
            .field("datastore_id", &self.datastore_id)
            .field("base_url", &self.base_url)
            .field("has_credentials", &self.credentials.is_some())
            .finish_non_exhaustive()
    }
}

impl HealthLakeEntityValidator {
    /// 認証情報・リージョン・HTTPクライアントからバリデーターを作成
    ///
    /// アクセスキーまたはシークレットキーが空の場合は認証情報なしとなり、
    /// `with_credentials_provider`で後から設定する。
    pub fn new(
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
        region: impl Into<String>,
        client: HttpClient,
    ) -> Self {
        let access_key = access_key.into();
        let secret_key = secret_key.into();
        let credentials = (!access_key.is_empty() && !secret_key.is_empty()).then(|| {
            SharedCredentialsProvider::new(Credentials::new(
                access_key,
                secret_key,
                None,
                None,
                STATIC_PROVIDER_NAME,
            ))
        });

        Self {
            region: region.into(),
            datastore_id: None,
            base_url: None,
            credentials,
            client,
        }
    }

    /// 設定からバリデーターを作成
    pub fn from_config(config: &ValidatorConfig, client: HttpClient) -> Self {
        let validator = Self::new(
            config.access_key(),
            config.secret_key(),
            config.region(),
            client,
        );
        match config.datastore_id() {
            Some(id) => validator.with_datastore_id(id),
            None => validator,
        }
    }

    pub fn with_datastore_id(mut self, datastore_id: impl Into<String>) -> Self {
        self.datastore_id = Some(datastore_id.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into().trim_end_matches('/').to_string());
        self
    }

    pub fn with_credentials_provider(mut self, provider: SharedCredentialsProvider) -> Self {
        self.credentials = Some(provider);
        self
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// 署名用の認証情報が設定されているか
    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    /// FHIR R4ベースURL
    fn datastore_url(&self) -> Option<String> {
        self.base_url.clone().or_else(|| {
            self.datastore_id.as_ref().map(|id| {
                format!(
                    "https://healthlake.{}.amazonaws.com/datastore/{}/r4",
                    self.region, id
                )
            })
        })
    }

    /// エンティティ取得URLを構築
    fn entity_url(&self, reference: &EntityReference) -> Result<String, EntityValidatorError> {
        let base = self
            .datastore_url()
            .ok_or(EntityValidatorError::DatastoreNotConfigured)?;
        Ok(format!("{}/{}", base, reference.path()))
    }

    /// GETリクエストのSigV4署名ヘッダーを生成
    async fn signing_headers(&self, url: &str) -> Result<Vec<(String, String)>, EntityValidatorError> {
        let provider = self
            .credentials
            .as_ref()
            .ok_or(EntityValidatorError::MissingCredentials)?;
        let credentials = provider
            .provide_credentials()
            .await
            .map_err(|e| EntityValidatorError::Signing(e.to_string()))?;

        let identity = credentials.into();
        let params: SigningParams<'_> = v4::SigningParams::builder()
            .identity(&identity)
            .region(&self.region)
            .name(SIGNING_SERVICE)
            .time(SystemTime::now())
            .settings(SigningSettings::default())
            .build()
            .map_err(|e| EntityValidatorError::Signing(e.to_string()))?
            .into();

        let request = SignableRequest::new("GET", url, std::iter::empty(), SignableBody::Bytes(&[]))
            .map_err(|e| EntityValidatorError::Signing(e.to_string()))?;
        let (instructions, _signature) = sign(request, &params)
            .map_err(|e| EntityValidatorError::Signing(e.to_string()))?
            .into_parts();

        Ok(instructions
            .headers()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect())
    }

    /// 参照先エンティティの実在を確認する
    #[instrument(skip(self), fields(reference = %reference))]
    async fn verify_entity(&self, reference: &EntityReference) -> Result<(), EntityValidatorError> {
        let url = self.entity_url(reference)?;
        let headers = self.signing_headers(&url).await?;
        debug!(url = %url, "エンティティを取得");

        let mut builder = self
            .client
            .get(&url)
            .header("Accept", "application/fhir+json");
        for (name, value) in headers {
            builder = builder.header(name, value);
        }

        let response = builder.send().await.map_err(|e| {
            warn!(error = %e, "エンティティ取得リクエスト失敗");
            EntityValidatorError::NetworkError(e.to_string())
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!(status = %status, error = %e, "エラーレスポンスの本文読み込みに失敗");
                String::new()
            }
        };
        Err(classify_failure(status, reference, body))
    }
}

/// 失敗レスポンスのステータスコードをエラーに変換
fn classify_failure(
    status: StatusCode,
    reference: &EntityReference,
    body: String,
) -> EntityValidatorError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => EntityValidatorError::AccessDenied {
            reference: reference.clone(),
            status: status.as_u16(),
        },
        StatusCode::NOT_FOUND | StatusCode::GONE => {
            EntityValidatorError::EntityNotFound(reference.clone())
        }
        _ => EntityValidatorError::HttpError {
            status: status.as_u16(),
            message: body,
        },
    }
}

#[async_trait]
impl EntityValidator for HealthLakeEntityValidator {
    async fn can_access_resource(
        &self,
        request: &AccessRequest,
    ) -> Result<(), EntityValidatorError> {
        let references = access_policy::evaluate(request)?;

        if references.is_empty() {
            debug!(
                extension_count = request.extensions.len(),
                "参照エンティティなし、アクセス許可"
            );
            return Ok(());
        }

        for reference in &references {
            self.verify_entity(reference).await?;
        }

        info!(
            reference_count = references.len(),
            "全参照エンティティへのアクセスを確認"
        );
        Ok(())
    }
}
