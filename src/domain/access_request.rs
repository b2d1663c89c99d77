/// リソースアクセス検証リクエスト
///
/// "can access resource" ケイパビリティへの引数をまとめた値。
use super::extension::Extension;

/// アクセス検証リクエスト
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessRequest {
    /// 全エンティティへのアクセスを許可するか
    pub full_access: bool,
    /// アクセスを許可されたエンティティIDの一覧
    pub identifiers: Vec<String>,
    /// 検証対象リソースのExtension
    pub extensions: Vec<Extension>,
}

impl AccessRequest {
    pub fn new(full_access: bool, identifiers: Vec<String>, extensions: Vec<Extension>) -> Self {
        Self {
            full_access,
            identifiers,
            extensions,
        }
    }

    /// 検証Lambdaが毎回送信する固定リクエスト
    ///
    /// フラグはtrue、ID一覧は空、Extensionは空のものを1件だけ持つ。
    pub fn placeholder() -> Self {
        Self::new(true, Vec::new(), vec![Extension::default()])
    }

    /// 指定IDへのアクセスが許可されているか
    pub fn permits(&self, id: &str) -> bool {
        self.full_access || self.identifiers.iter().any(|allowed| allowed == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_literals() {
        let request = AccessRequest::placeholder();

        assert!(request.full_access);
        assert!(request.identifiers.is_empty());
        assert_eq!(request.extensions.len(), 1);
        assert!(request.extensions[0].is_empty());
    }

    #[test]
    fn test_permits_with_full_access() {
        let request = AccessRequest::new(true, vec![], vec![]);
        assert!(request.permits("anything"));
    }

    #[test]
    fn test_permits_listed_identifier_only() {
        let request = AccessRequest::new(false, vec!["org-1".to_string()], vec![]);

        assert!(request.permits("org-1"));
        assert!(!request.permits("org-2"));
    }
}
