//! 스캐너 설정 주입 — 설정 적용 함수와 Options 레코드
//!
//! [`ConfigSource`]는 "호출자가 제공한 값으로 역직렬화한다"는 설정 적용
//! 함수의 Rust 표현입니다. [`ScannerConfig`]는 kind별로 스캐너명 →
//! `ConfigSource` 매핑을 들고, [`Options`]는 코어가 소비하는 이미 파싱된
//! 설정 레코드입니다 (설정 파일 로딩은 호출자의 책임).

use std::collections::HashMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::ecosystem::Ecosystem;
use crate::error::IndexerError;
use crate::scanner::ScannerKind;
use crate::store::Store;

/// 설정 적용 함수
///
/// 스캐너의 configure 훅에 전달되어, 스캐너가 제공한 값(`target`)으로
/// 원시 설정을 역직렬화합니다. 값이 없는 빈 소스는 no-op으로, 설정이
/// 공급되지 않은 configurable 스캐너에도 훅이 항상 실행되도록 합니다.
///
/// # 사용 예시
/// ```
/// use serde::Deserialize;
/// use strata_indexer::ConfigSource;
///
/// #[derive(Default, Deserialize)]
/// struct MyScannerConfig {
///     mirror_url: String,
/// }
///
/// let source = ConfigSource::new(serde_json::json!({"mirror_url": "https://mirror.example"}));
/// let mut config = MyScannerConfig::default();
/// source.apply(&mut config).unwrap();
/// assert_eq!(config.mirror_url, "https://mirror.example");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigSource(Option<serde_json::Value>);

impl ConfigSource {
    /// 원시 설정 값을 감싸는 소스를 생성합니다.
    pub fn new(value: serde_json::Value) -> Self {
        Self(Some(value))
    }

    /// no-op 소스를 생성합니다. `apply`는 target을 건드리지 않습니다.
    pub fn empty() -> Self {
        Self(None)
    }

    /// 값이 없는 no-op 소스인지 반환합니다.
    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// 호출자가 제공한 값으로 설정을 역직렬화합니다.
    ///
    /// 소스가 비어 있으면 target은 변경되지 않습니다. 값이 있으면 target은
    /// 역직렬화 결과로 교체됩니다.
    pub fn apply<T: DeserializeOwned>(&self, target: &mut T) -> Result<(), IndexerError> {
        let Some(value) = &self.0 else {
            return Ok(());
        };
        *target = serde_json::from_value(value.clone())
            .map_err(|err| IndexerError::InvalidConfig(err.to_string()))?;
        Ok(())
    }
}

/// kind별 스캐너 설정 매핑
///
/// 각 맵은 스캐너명을 키로 합니다. 스캐너명은 kind 내에서만 유일하므로
/// 맵도 kind별로 분리됩니다.
#[derive(Debug, Clone, Default)]
pub struct ScannerConfig {
    /// 패키지 스캐너 설정
    pub package: HashMap<String, ConfigSource>,
    /// 배포판 스캐너 설정
    pub dist: HashMap<String, ConfigSource>,
    /// 저장소 스캐너 설정
    pub repo: HashMap<String, ConfigSource>,
    /// 파일 스캐너 설정
    pub file: HashMap<String, ConfigSource>,
}

impl ScannerConfig {
    /// kind에 해당하는 설정 맵을 반환합니다.
    pub fn for_kind(&self, kind: ScannerKind) -> &HashMap<String, ConfigSource> {
        match kind {
            ScannerKind::Package => &self.package,
            ScannerKind::Distribution => &self.dist,
            ScannerKind::Repository => &self.repo,
            ScannerKind::File => &self.file,
        }
    }
}

/// 코어가 소비하는 설정 레코드
///
/// 호출자가 구성하여 [`LayerScanner::new`](crate::LayerScanner::new)에
/// 전달합니다.
pub struct Options {
    /// 영속화 백엔드
    pub store: Arc<dyn Store>,
    /// 스캐너 인스턴스 생산자 묶음
    pub ecosystems: Vec<Ecosystem>,
    /// kind별 스캐너 설정
    pub scanner_config: ScannerConfig,
    /// RPC 스캐너에 전달되는 전송 핸들
    pub client: reqwest::Client,
}

impl Options {
    /// 스토어만 지정한 기본 Options를 생성합니다.
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            ecosystems: Vec::new(),
            scanner_config: ScannerConfig::default(),
            client: reqwest::Client::new(),
        }
    }

    /// 생태계 목록을 지정합니다.
    pub fn with_ecosystems(mut self, ecosystems: Vec<Ecosystem>) -> Self {
        self.ecosystems = ecosystems;
        self
    }

    /// 스캐너 설정을 지정합니다.
    pub fn with_scanner_config(mut self, scanner_config: ScannerConfig) -> Self {
        self.scanner_config = scanner_config;
        self
    }

    /// 전송 클라이언트를 지정합니다.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde::Deserialize;

    #[derive(Debug, Default, PartialEq, Deserialize)]
    struct MirrorConfig {
        url: String,
        #[serde(default)]
        timeout_secs: u64,
    }

    #[test]
    fn apply_deserializes_into_target() {
        let source = ConfigSource::new(serde_json::json!({
            "url": "https://mirror.example",
            "timeout_secs": 30,
        }));
        assert!(!source.is_empty());

        let mut config = MirrorConfig::default();
        source.apply(&mut config).unwrap();
        assert_eq!(config.url, "https://mirror.example");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn empty_source_is_noop() {
        let source = ConfigSource::empty();
        assert!(source.is_empty());

        let mut config = MirrorConfig {
            url: "unchanged".to_owned(),
            timeout_secs: 7,
        };
        source.apply(&mut config).unwrap();
        assert_eq!(config.url, "unchanged");
        assert_eq!(config.timeout_secs, 7);
    }

    #[test]
    fn apply_rejects_mismatched_shape() {
        let source = ConfigSource::new(serde_json::json!({"url": 42}));
        let mut config = MirrorConfig::default();
        let err = source.apply(&mut config).unwrap_err();
        assert!(matches!(err, IndexerError::InvalidConfig(_)));
    }

    #[test]
    fn default_source_is_empty() {
        assert!(ConfigSource::default().is_empty());
    }

    #[test]
    fn for_kind_selects_the_right_map() {
        let mut config = ScannerConfig::default();
        config
            .package
            .insert("rpm".to_owned(), ConfigSource::empty());
        config
            .repo
            .insert("rhel-repos".to_owned(), ConfigSource::empty());

        assert!(config.for_kind(ScannerKind::Package).contains_key("rpm"));
        assert!(config
            .for_kind(ScannerKind::Repository)
            .contains_key("rhel-repos"));
        assert!(config.for_kind(ScannerKind::Distribution).is_empty());
        assert!(config.for_kind(ScannerKind::File).is_empty());
    }
}
