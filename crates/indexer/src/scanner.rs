//! 스캐너 계약 — kind별 capability trait과 선택 기능 정의
//!
//! 모든 스캐너는 [`VersionedScanner`]를 구현하고, 네 가지 kind 계약
//! ([`PackageScanner`], [`DistributionScanner`], [`RepositoryScanner`],
//! [`FileScanner`]) 중 정확히 하나를 구현합니다. [`Scanner`]는 네 계약을
//! 하나의 합 타입으로 묶어 kind별 디스패치를 정적으로 표현합니다.
//!
//! # 선택 기능
//!
//! 스캐너는 두 가지 직교하는 선택 기능을 가질 수 있습니다:
//!
//! - [`ConfigurableScanner`]: 구성 시점에 설정 적용 함수를 받습니다.
//! - [`RpcScanner`]: 설정 적용 함수에 더해 전송 클라이언트를 받습니다
//!   (네트워크 접근을 함의).
//!
//! Rust에는 런타임 구조적 capability 질의가 없으므로, 스캐너는
//! [`VersionedScanner::as_configurable`] / [`VersionedScanner::as_rpc`]를
//! 오버라이드하여 자신의 capability 집합을 명시적으로 선언합니다.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use strata_core::types::{Distribution, FileEntry, Layer, Package, Repository};

use crate::config::ConfigSource;
use crate::error::IndexerError;

/// dyn-compatible Future 타입 별칭
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// 스캐너 kind — 닫힌 집합
///
/// 스캐너를 출력 타입으로 구분합니다. 스캐너명은 kind 내에서 유일해야
/// 합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScannerKind {
    /// 패키지 스캐너 (RPM, dpkg 등)
    Package,
    /// OS 배포판 스캐너 (os-release 등)
    Distribution,
    /// 패키지 저장소 스캐너
    Repository,
    /// 파일 스캐너
    File,
}

impl ScannerKind {
    /// kind의 소문자 표기를 반환합니다.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Package => "package",
            Self::Distribution => "distribution",
            Self::Repository => "repository",
            Self::File => "file",
        }
    }
}

impl fmt::Display for ScannerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 모든 스캐너가 구현하는 기본 계약
///
/// `name`은 kind 내에서 유일한 안정적 식별자이고, `version`은 스토어가
/// 이전 스캔의 유효성을 판단하는 데 사용하는 버전 메타데이터입니다.
/// (다이제스트, 이름, 버전) 삼중쌍이 스캔 완료 기록의 키가 됩니다.
pub trait VersionedScanner: Send + Sync {
    /// 스캐너명 (kind 내 유일)
    fn name(&self) -> &str;

    /// 스캐너 구현의 버전 메타데이터
    fn version(&self) -> &str;

    /// 스캐너 kind
    fn kind(&self) -> ScannerKind;

    /// 선택 기능: 설정 주입. 구현하는 스캐너만 오버라이드합니다.
    fn as_configurable(&mut self) -> Option<&mut dyn ConfigurableScanner> {
        None
    }

    /// 선택 기능: 설정 주입 + 전송 클라이언트. 구현하는 스캐너만
    /// 오버라이드합니다.
    fn as_rpc(&mut self) -> Option<&mut dyn RpcScanner> {
        None
    }
}

/// 패키지 스캐너 계약
pub trait PackageScanner: VersionedScanner {
    /// 레이어에서 패키지를 추출합니다.
    fn scan<'a>(&'a self, layer: &'a Layer) -> BoxFuture<'a, Result<Vec<Package>, IndexerError>>;
}

/// 배포판 스캐너 계약
pub trait DistributionScanner: VersionedScanner {
    /// 레이어에서 OS 배포판을 식별합니다.
    fn scan<'a>(
        &'a self,
        layer: &'a Layer,
    ) -> BoxFuture<'a, Result<Vec<Distribution>, IndexerError>>;
}

/// 저장소 스캐너 계약
pub trait RepositoryScanner: VersionedScanner {
    /// 레이어에서 패키지 저장소를 식별합니다.
    fn scan<'a>(&'a self, layer: &'a Layer)
        -> BoxFuture<'a, Result<Vec<Repository>, IndexerError>>;
}

/// 파일 스캐너 계약
pub trait FileScanner: VersionedScanner {
    /// 레이어에서 관심 파일을 추출합니다.
    fn scan<'a>(&'a self, layer: &'a Layer) -> BoxFuture<'a, Result<Vec<FileEntry>, IndexerError>>;
}

/// 선택 기능: 구성 시점에 설정 적용 함수를 받는 스캐너
pub trait ConfigurableScanner {
    /// 설정을 적용합니다. 실패하면 해당 스캐너는 목록에서 제외됩니다.
    fn configure(&mut self, config: &ConfigSource) -> Result<(), IndexerError>;
}

/// 선택 기능: 설정 적용 함수와 전송 클라이언트를 받는 스캐너
///
/// [`ConfigurableScanner`]의 상위 집합입니다. 스캐너가 둘 다 구현하면
/// RPC 쪽이 우선합니다.
pub trait RpcScanner {
    /// 설정과 전송 클라이언트를 적용합니다. 실패하면 해당 스캐너는
    /// 목록에서 제외됩니다.
    fn configure(
        &mut self,
        config: &ConfigSource,
        client: &reqwest::Client,
    ) -> Result<(), IndexerError>;
}

/// kind별 스캐너의 합 타입
///
/// 런타임 타입 판별 대신 variant별로 올바르게 타입이 지정된 scan 함수를
/// 들고 다닙니다. 결과 봉투(Findings)가 같은 네 갈래 모양을 갖습니다.
pub enum Scanner {
    /// 패키지 스캐너
    Package(Box<dyn PackageScanner>),
    /// 배포판 스캐너
    Distribution(Box<dyn DistributionScanner>),
    /// 저장소 스캐너
    Repository(Box<dyn RepositoryScanner>),
    /// 파일 스캐너
    File(Box<dyn FileScanner>),
}

impl VersionedScanner for Scanner {
    fn name(&self) -> &str {
        match self {
            Self::Package(s) => s.name(),
            Self::Distribution(s) => s.name(),
            Self::Repository(s) => s.name(),
            Self::File(s) => s.name(),
        }
    }

    fn version(&self) -> &str {
        match self {
            Self::Package(s) => s.version(),
            Self::Distribution(s) => s.version(),
            Self::Repository(s) => s.version(),
            Self::File(s) => s.version(),
        }
    }

    fn kind(&self) -> ScannerKind {
        match self {
            Self::Package(s) => s.kind(),
            Self::Distribution(s) => s.kind(),
            Self::Repository(s) => s.kind(),
            Self::File(s) => s.kind(),
        }
    }

    fn as_configurable(&mut self) -> Option<&mut dyn ConfigurableScanner> {
        match self {
            Self::Package(s) => s.as_configurable(),
            Self::Distribution(s) => s.as_configurable(),
            Self::Repository(s) => s.as_configurable(),
            Self::File(s) => s.as_configurable(),
        }
    }

    fn as_rpc(&mut self) -> Option<&mut dyn RpcScanner> {
        match self {
            Self::Package(s) => s.as_rpc(),
            Self::Distribution(s) => s.as_rpc(),
            Self::Repository(s) => s.as_rpc(),
            Self::File(s) => s.as_rpc(),
        }
    }
}

impl fmt::Debug for Scanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scanner")
            .field("name", &self.name())
            .field("kind", &self.kind())
            .field("version", &self.version())
            .finish()
    }
}
