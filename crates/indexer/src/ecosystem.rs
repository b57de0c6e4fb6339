//! 생태계 — OS/런타임 단위의 스캐너 묶음과 kind별 확장
//!
//! [`Ecosystem`]은 특정 OS 계열이나 런타임을 겨냥한 스캐너 생산자
//! 묶음입니다. 각 생태계는 kind별로 0개 이상의 스캐너를 생산하는 팩토리를
//! 노출하며, 구성 시점에 [`expand_ecosystems`]가 이를 kind별 스캐너
//! 목록으로 평탄화합니다.
//!
//! # 확장
//!
//! 새 생태계를 추가하려면 `Ecosystem::new(..)`에 팩토리를 등록합니다:
//!
//! ```ignore
//! let rhel = Ecosystem::new("rhel")
//!     .with_package_scanners(|| Ok(vec![Box::new(RpmScanner::default())]))
//!     .with_repository_scanners(|| Ok(vec![Box::new(RhelRepoScanner::default())]));
//! ```

use tracing::debug;

use crate::error::IndexerError;
use crate::scanner::{
    DistributionScanner, FileScanner, PackageScanner, RepositoryScanner, Scanner,
};

/// 패키지 스캐너 팩토리
pub type PackageScannerFactory =
    Box<dyn Fn() -> Result<Vec<Box<dyn PackageScanner>>, IndexerError> + Send + Sync>;
/// 배포판 스캐너 팩토리
pub type DistributionScannerFactory =
    Box<dyn Fn() -> Result<Vec<Box<dyn DistributionScanner>>, IndexerError> + Send + Sync>;
/// 저장소 스캐너 팩토리
pub type RepositoryScannerFactory =
    Box<dyn Fn() -> Result<Vec<Box<dyn RepositoryScanner>>, IndexerError> + Send + Sync>;
/// 파일 스캐너 팩토리
pub type FileScannerFactory =
    Box<dyn Fn() -> Result<Vec<Box<dyn FileScanner>>, IndexerError> + Send + Sync>;

/// 스캐너 생산자 묶음
///
/// 팩토리는 실패할 수 있으며, 실패는 [`LayerScanner::new`](crate::LayerScanner::new)
/// 전체를 실패시킵니다.
pub struct Ecosystem {
    name: String,
    package_scanners: Option<PackageScannerFactory>,
    distribution_scanners: Option<DistributionScannerFactory>,
    repository_scanners: Option<RepositoryScannerFactory>,
    file_scanners: Option<FileScannerFactory>,
}

impl Ecosystem {
    /// 빈 생태계를 생성합니다.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            package_scanners: None,
            distribution_scanners: None,
            repository_scanners: None,
            file_scanners: None,
        }
    }

    /// 생태계명을 반환합니다.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 패키지 스캐너 팩토리를 등록합니다.
    pub fn with_package_scanners<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Result<Vec<Box<dyn PackageScanner>>, IndexerError> + Send + Sync + 'static,
    {
        self.package_scanners = Some(Box::new(factory));
        self
    }

    /// 배포판 스캐너 팩토리를 등록합니다.
    pub fn with_distribution_scanners<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Result<Vec<Box<dyn DistributionScanner>>, IndexerError> + Send + Sync + 'static,
    {
        self.distribution_scanners = Some(Box::new(factory));
        self
    }

    /// 저장소 스캐너 팩토리를 등록합니다.
    pub fn with_repository_scanners<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Result<Vec<Box<dyn RepositoryScanner>>, IndexerError> + Send + Sync + 'static,
    {
        self.repository_scanners = Some(Box::new(factory));
        self
    }

    /// 파일 스캐너 팩토리를 등록합니다.
    pub fn with_file_scanners<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Result<Vec<Box<dyn FileScanner>>, IndexerError> + Send + Sync + 'static,
    {
        self.file_scanners = Some(Box::new(factory));
        self
    }
}

/// kind별로 분할된 스캐너 목록
#[derive(Default, Debug)]
pub(crate) struct ScannerSet {
    pub(crate) package: Vec<Scanner>,
    pub(crate) distribution: Vec<Scanner>,
    pub(crate) repository: Vec<Scanner>,
    pub(crate) file: Vec<Scanner>,
}

/// 생태계 목록을 kind별 스캐너 목록으로 확장합니다.
///
/// 생태계의 등록 순서와 팩토리가 생산한 순서가 그대로 유지됩니다.
/// 팩토리 실패는 생태계명을 붙여 전파됩니다.
pub(crate) fn expand_ecosystems(ecosystems: &[Ecosystem]) -> Result<ScannerSet, IndexerError> {
    let mut set = ScannerSet::default();

    for eco in ecosystems {
        let fail = |err: IndexerError| IndexerError::Ecosystem {
            name: eco.name.clone(),
            reason: err.to_string(),
        };

        if let Some(factory) = &eco.package_scanners {
            let scanners = factory().map_err(fail)?;
            set.package.extend(scanners.into_iter().map(Scanner::Package));
        }
        if let Some(factory) = &eco.distribution_scanners {
            let scanners = factory().map_err(fail)?;
            set.distribution
                .extend(scanners.into_iter().map(Scanner::Distribution));
        }
        if let Some(factory) = &eco.repository_scanners {
            let scanners = factory().map_err(fail)?;
            set.repository
                .extend(scanners.into_iter().map(Scanner::Repository));
        }
        if let Some(factory) = &eco.file_scanners {
            let scanners = factory().map_err(fail)?;
            set.file.extend(scanners.into_iter().map(Scanner::File));
        }

        debug!(
            ecosystem = %eco.name,
            packages = set.package.len(),
            distributions = set.distribution.len(),
            repositories = set.repository.len(),
            files = set.file.len(),
            "ecosystem expanded"
        );
    }

    Ok(set)
}
