/// アクセスポリシー評価
///
/// AccessRequestのExtensionから参照エンティティを収集し、
/// 許可されたID以外への参照を拒否する。
/// 参照先の実在確認はインフラ層（EntityValidator）の責務。
use thiserror::Error;

use super::access_request::AccessRequest;
use super::entity_reference::{EntityReference, ParsedReference, ReferenceParseError};
use super::extension::Extension;

/// ポリシー違反
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessViolation {
    /// 許可されていないエンティティへの参照
    #[error("Access to {0} is not permitted")]
    NotPermitted(EntityReference),
    /// 解釈できない参照
    #[error("Invalid reference in extension {url}: {source}")]
    InvalidReference {
        url: String,
        #[source]
        source: ReferenceParseError,
    },
}

/// リクエストを評価し、実在確認が必要なエンティティ参照を返す
///
/// 重複した参照は1件にまとめる。contained参照はスキップする。
pub fn evaluate(request: &AccessRequest) -> Result<Vec<EntityReference>, AccessViolation> {
    let mut references = Vec::new();
    collect_references(&request.extensions, &mut references)?;

    if let Some(denied) = references.iter().find(|r| !request.permits(r.id())) {
        return Err(AccessViolation::NotPermitted(denied.clone()));
    }

    Ok(references)
}

fn collect_references(
    extensions: &[Extension],
    out: &mut Vec<EntityReference>,
) -> Result<(), AccessViolation> {
    for ext in extensions {
        if let Some(reference) = ext.reference() {
            let parsed = EntityReference::parse(reference).map_err(|source| {
                AccessViolation::InvalidReference {
                    url: ext.url.clone(),
                    source,
                }
            })?;
            if let ParsedReference::Entity(entity) = parsed {
                if !out.contains(&entity) {
                    out.push(entity);
                }
            }
        }
        collect_references(&ext.extension, out)?;
    }
    Ok(())
}
