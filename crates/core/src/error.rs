//! 에러 타입 — 도메인별 에러 정의

/// Strata 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum StrataError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 다이제스트 파싱/검증 에러
    #[error("digest error: {0}")]
    Digest(#[from] DigestError),

    /// 인덱싱 파이프라인 에러
    #[error("index error: {0}")]
    Index(#[from] IndexError),

    /// 스토리지 에러
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 콘텐츠 다이제스트 에러
///
/// `"sha256:<hex>"` 형식의 다이제스트 문자열을 파싱/검증할 때 발생합니다.
#[derive(Debug, thiserror::Error)]
pub enum DigestError {
    /// `알고리즘:hex` 형식이 아님
    #[error("malformed digest '{0}': expected '<algorithm>:<hex>'")]
    Malformed(String),

    /// 지원하지 않는 해시 알고리즘
    #[error("unsupported digest algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// hex 길이가 알고리즘과 맞지 않음
    #[error("bad digest length for {algorithm}: expected {expected}, got {actual}")]
    BadLength {
        /// 해시 알고리즘명
        algorithm: &'static str,
        /// 알고리즘이 요구하는 hex 길이
        expected: usize,
        /// 실제 hex 길이
        actual: usize,
    },

    /// hex가 아닌 문자 포함
    #[error("digest contains non-hex character: {0:?}")]
    NotHex(char),
}

/// 인덱싱 파이프라인 에러
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// 레이어 스캔 실패
    #[error("scan failed: {0}")]
    ScanFailed(String),

    /// 스캐너 설정 실패
    #[error("scanner configuration failed: {0}")]
    Configuration(String),

    /// 생태계 확장 실패
    #[error("ecosystem expansion failed: {0}")]
    Ecosystem(String),

    /// 스캔 취소됨
    #[error("scan cancelled")]
    Cancelled,
}

/// 스토리지 에러
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// 연결 실패
    #[error("connection failed: {0}")]
    Connection(String),

    /// 쿼리 실패
    #[error("query failed: {0}")]
    Query(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::InvalidValue {
            field: "scan_concurrency".to_owned(),
            reason: "out of range".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("scan_concurrency"));
        assert!(msg.contains("out of range"));
    }

    #[test]
    fn digest_error_display() {
        let err = DigestError::BadLength {
            algorithm: "sha256",
            expected: 64,
            actual: 10,
        };
        let msg = err.to_string();
        assert!(msg.contains("sha256"));
        assert!(msg.contains("64"));
        assert!(msg.contains("10"));
    }

    #[test]
    fn index_error_display() {
        let err = IndexError::ScanFailed("layer unreadable".to_owned());
        assert!(err.to_string().contains("layer unreadable"));
        assert_eq!(IndexError::Cancelled.to_string(), "scan cancelled");
    }

    #[test]
    fn wraps_into_strata_error() {
        let err: StrataError = IndexError::ScanFailed("boom".to_owned()).into();
        assert!(matches!(err, StrataError::Index(IndexError::ScanFailed(_))));

        let err: StrataError = StorageError::Query("bad sql".to_owned()).into();
        assert!(matches!(err, StrataError::Storage(StorageError::Query(_))));

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: StrataError = io.into();
        assert!(matches!(err, StrataError::Io(_)));
    }
}
