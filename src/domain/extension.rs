/// FHIR Extensionモデル
///
/// アクセス検証に必要な範囲のExtension要素のみを表現する。
/// `Default`はすべてのフィールドが空のExtension（プレースホルダー）となる。
use serde::{Deserialize, Serialize};

/// FHIR Reference要素
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    /// リテラル参照（例: "Organization/123"）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// 参照先のリソース型
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    /// 表示用テキスト
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

impl Reference {
    /// リテラル参照を持つReferenceを作成
    pub fn literal(reference: impl Into<String>) -> Self {
        Self {
            reference: Some(reference.into()),
            ..Default::default()
        }
    }
}

/// FHIR Extension要素
///
/// value[x]のうち文字列系・真偽値・Referenceのみをサポートする。
/// ネストしたExtensionは`extension`に保持される。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extension {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Extensionの定義URL
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<Extension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_string: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_boolean: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_reference: Option<Reference>,
}

impl Extension {
    /// Reference値を持つExtensionを作成
    pub fn with_reference(url: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            value_reference: Some(Reference::literal(reference)),
            ..Default::default()
        }
    }

    /// このExtensionのリテラル参照を取得
    pub fn reference(&self) -> Option<&str> {
        self.value_reference
            .as_ref()
            .and_then(|r| r.reference.as_deref())
    }

    /// 値もネストも持たない空のExtensionかどうか
    pub fn is_empty(&self) -> bool {
        *self == Extension::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_extension_is_empty() {
        let ext = Extension::default();

        assert!(ext.is_empty());
        assert!(ext.reference().is_none());
        assert_eq!(serde_json::to_value(&ext).unwrap(), json!({}));
    }

    #[test]
    fn test_deserialize_reference_extension() {
        let value = json!({
            "url": "http://example.org/fhir/StructureDefinition/managing-organization",
            "valueReference": {
                "reference": "Organization/org-1",
                "type": "Organization",
                "display": "Example Hospice"
            }
        });

        let ext: Extension = serde_json::from_value(value).unwrap();

        assert_eq!(ext.reference(), Some("Organization/org-1"));
        assert_eq!(
            ext.value_reference.unwrap().resource_type.as_deref(),
            Some("Organization")
        );
    }

    #[test]
    fn test_deserialize_nested_extension() {
        let value = json!({
            "url": "http://example.org/fhir/StructureDefinition/care-team",
            "extension": [
                { "url": "role", "valueCode": "nurse" },
                { "url": "member", "valueReference": { "reference": "Practitioner/p-9" } }
            ]
        });

        let ext: Extension = serde_json::from_value(value).unwrap();

        assert_eq!(ext.extension.len(), 2);
        assert_eq!(ext.extension[0].value_code.as_deref(), Some("nurse"));
        assert_eq!(ext.extension[1].reference(), Some("Practitioner/p-9"));
        assert!(!ext.is_empty());
    }

    #[test]
    fn test_serialize_uses_fhir_field_names() {
        let ext = Extension::with_reference("http://example.org/ext", "Patient/abc");

        let value = serde_json::to_value(&ext).unwrap();

        assert_eq!(
            value,
            json!({
                "url": "http://example.org/ext",
                "valueReference": { "reference": "Patient/abc" }
            })
        );
    }
}
