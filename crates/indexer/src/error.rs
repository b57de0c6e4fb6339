//! 인덱서 에러 타입
//!
//! [`IndexerError`]는 레이어 스캔 코어에서 발생할 수 있는 모든 에러를
//! 나타냅니다. `From<IndexerError> for StrataError` 구현을 통해 `?` 연산자로
//! 상위 에러 타입으로 자연스럽게 전파됩니다.
//!
//! # 에러 분류 정책
//!
//! - **네트워크 주소 실패** (`AddressResolution`, 해당 `Io` kind): 스캐너가
//!   외부 리소스에 접근하지 못한 것으로 보고 빈 성공으로 강등됩니다.
//!   [`IndexerError::is_address_error`]가 판별합니다.
//! - **그 외 모든 에러**: 해당 스캔 호출 전체를 중단시킵니다 (fail-fast).

use std::io::ErrorKind;

use strata_core::error::{IndexError, StorageError, StrataError};

/// 레이어 스캔 코어의 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum IndexerError {
    /// 스캐너 실행 실패 (일반)
    #[error("scanner '{scanner}' failed: {reason}")]
    Scan {
        /// 스캐너명
        scanner: String,
        /// 실패 사유
        reason: String,
    },

    /// 네트워크 주소 해석 실패 — 외부 리소스 접근 불가
    ///
    /// 스캐너가 깨진 것이 아니라 이 레이어에 대해 리소스에 닿지 못한
    /// 것으로 취급되어, 빈 성공 스캔으로 강등됩니다.
    #[error("address resolution failed: {0}")]
    AddressResolution(String),

    /// 스토어 연산 실패
    #[error("store error during {op}: {reason}")]
    Store {
        /// 실패한 스토어 연산명
        op: &'static str,
        /// 실패 사유
        reason: String,
    },

    /// 스캔 완료 마킹 실패
    ///
    /// `set_layer_scanned`의 실패는 치명적 영속성 실패이며 원인 에러를
    /// 감싸서 전파됩니다.
    #[error("could not set layer scanned: {source}")]
    MarkScanned {
        /// 원인 에러
        #[source]
        source: Box<IndexerError>,
    },

    /// 스캐너 설정 훅 실패
    #[error("scanner '{scanner}' configuration failed: {reason}")]
    Configuration {
        /// 스캐너명
        scanner: String,
        /// 실패 사유
        reason: String,
    },

    /// 설정 값 역직렬화 실패
    #[error("config value rejected: {0}")]
    InvalidConfig(String),

    /// 생태계 확장 실패
    #[error("failed to extract scanners from ecosystem '{name}': {reason}")]
    Ecosystem {
        /// 생태계명
        name: String,
        /// 실패 사유
        reason: String,
    },

    /// 스캔 취소됨
    #[error("scan cancelled")]
    Cancelled,

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl IndexerError {
    /// 네트워크 주소 실패 여부를 판별합니다.
    ///
    /// 문자열 매칭이 아니라 안정적인 에러 범주로 판별합니다: 전용
    /// `AddressResolution` 변종이거나, `Io`의 kind가 주소/경로 도달 불가
    /// 계열인 경우입니다.
    pub fn is_address_error(&self) -> bool {
        match self {
            Self::AddressResolution(_) => true,
            Self::Io(err) => matches!(
                err.kind(),
                ErrorKind::AddrNotAvailable
                    | ErrorKind::HostUnreachable
                    | ErrorKind::NetworkUnreachable
            ),
            _ => false,
        }
    }
}

impl From<IndexerError> for StrataError {
    fn from(err: IndexerError) -> Self {
        match err {
            IndexerError::Scan { .. } | IndexerError::AddressResolution(_) => {
                StrataError::Index(IndexError::ScanFailed(err.to_string()))
            }
            IndexerError::Store { .. } | IndexerError::MarkScanned { .. } => {
                StrataError::Storage(StorageError::Query(err.to_string()))
            }
            IndexerError::Configuration { .. } | IndexerError::InvalidConfig(_) => {
                StrataError::Index(IndexError::Configuration(err.to_string()))
            }
            IndexerError::Ecosystem { .. } => {
                StrataError::Index(IndexError::Ecosystem(err.to_string()))
            }
            IndexerError::Cancelled => StrataError::Index(IndexError::Cancelled),
            IndexerError::Io(io) => StrataError::Io(io),
        }
    }
}
