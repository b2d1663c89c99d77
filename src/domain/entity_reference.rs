/// FHIRリテラル参照のパース
///
/// 以下の形式を扱う:
/// - `Type/id`
/// - `Type/id/_history/version`
/// - `https://host/base/Type/id`（絶対URL）
/// - `#id`（contained参照、エンティティ参照ではない）
use std::fmt;

use thiserror::Error;
use url::Url;

/// 参照パースのエラー型
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceParseError {
    #[error("Empty reference")]
    Empty,
    #[error("Malformed reference: {0}")]
    Malformed(String),
}

/// パース結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedReference {
    /// 外部エンティティへの参照
    Entity(EntityReference),
    /// 同一リソース内のcontained参照
    Contained(String),
}

/// `Type/id`形式のエンティティ参照
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityReference {
    resource_type: String,
    id: String,
}

impl EntityReference {
    pub fn new(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }

    /// リテラル参照文字列をパースする
    pub fn parse(reference: &str) -> Result<ParsedReference, ReferenceParseError> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(ReferenceParseError::Empty);
        }

        if let Some(local_id) = reference.strip_prefix('#') {
            return Ok(ParsedReference::Contained(local_id.to_string()));
        }

        let segments: Vec<String> = if reference.contains("://") {
            let url = Url::parse(reference)
                .map_err(|_| ReferenceParseError::Malformed(reference.to_string()))?;
            url.path_segments()
                .map(|s| s.filter(|s| !s.is_empty()).map(str::to_string).collect())
                .unwrap_or_default()
        } else {
            reference
                .split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        };

        // 末尾の `_history/{version}` を取り除く
        let segments = match segments.len() {
            n if n >= 4 && segments[n - 2] == "_history" => &segments[..n - 2],
            _ => &segments[..],
        };

        match segments {
            [.., resource_type, id] if is_resource_type(resource_type) && is_resource_id(id) => {
                Ok(ParsedReference::Entity(Self::new(resource_type, id)))
            }
            _ => Err(ReferenceParseError::Malformed(reference.to_string())),
        }
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// FHIR REST APIの相対パス（`Type/id`）
    pub fn path(&self) -> String {
        format!("{}/{}", self.resource_type, self.id)
    }
}

impl fmt::Display for EntityReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.resource_type, self.id)
    }
}

/// FHIRのリソース型名は大文字で始まる英字のみ
fn is_resource_type(segment: &str) -> bool {
    let mut chars = segment.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_alphabetic())
}

/// FHIRのid: `[A-Za-z0-9\-\.]{1,64}`（パス操作になる`.`と`..`は除く）
fn is_resource_id(segment: &str) -> bool {
    (1..=64).contains(&segment.len())
        && segment != "."
        && segment != ".."
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
}
