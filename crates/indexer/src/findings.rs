//! 결과 봉투 — 스캔 호출 한 번의 kind별 산출물과 타입별 스토어 라우팅
//!
//! [`Findings`]는 스캐너의 다형성(4종 출력 타입)과 kind별로 타입이 지정된
//! 스토어 표면 사이를 타입 정보를 잃지 않고 잇습니다. 네 필드 중 최대
//! 하나만 채워지며, 아무것도 채워지지 않고 에러도 없으면 성공한 no-op
//! 스캔입니다.

use tracing::{debug, error, warn};

use strata_core::types::{Distribution, FileEntry, Layer, Package, Repository};

use crate::error::IndexerError;
use crate::scanner::{Scanner, VersionedScanner};
use crate::store::Store;

/// (레이어, 스캐너) 워크 아이템 한 건의 산출물
#[derive(Debug, Default)]
pub(crate) struct Findings {
    packages: Option<Vec<Package>>,
    distributions: Option<Vec<Distribution>>,
    repositories: Option<Vec<Repository>>,
    files: Option<Vec<FileEntry>>,
}

impl Findings {
    /// 스캐너를 실행하여 kind에 맞는 필드에 결과를 담고, 에러를 분류합니다.
    ///
    /// 네트워크 주소 실패는 경고 후 성공으로 강등됩니다 — 필드가 비어
    /// 있으므로 이어지는 `persist`는 no-op이 됩니다. 그 외 에러는 기록 후
    /// 전파됩니다.
    pub(crate) async fn collect(
        &mut self,
        scanner: &Scanner,
        layer: &Layer,
    ) -> Result<(), IndexerError> {
        let err = match scanner {
            Scanner::Package(s) => s
                .scan(layer)
                .await
                .map(|found| self.packages = Some(found))
                .err(),
            Scanner::Distribution(s) => s
                .scan(layer)
                .await
                .map(|found| self.distributions = Some(found))
                .err(),
            Scanner::Repository(s) => s
                .scan(layer)
                .await
                .map(|found| self.repositories = Some(found))
                .err(),
            Scanner::File(s) => s
                .scan(layer)
                .await
                .map(|found| self.files = Some(found))
                .err(),
        };

        match err {
            None => Ok(()),
            Some(err) if err.is_address_error() => {
                warn!(
                    scanner = scanner.name(),
                    layer = %layer.digest,
                    error = %err,
                    "scanner not able to access resources"
                );
                Ok(())
            }
            Some(err) => {
                error!(
                    scanner = scanner.name(),
                    layer = %layer.digest,
                    error = %err,
                    "scan failed"
                );
                Err(err)
            }
        }
    }

    /// 채워진 필드를 해당 타입의 인덱스 연산으로 라우팅합니다.
    ///
    /// 아무 필드도 채워지지 않았으면 no-op입니다.
    pub(crate) async fn persist(
        &self,
        store: &dyn Store,
        scanner: &Scanner,
        layer: &Layer,
    ) -> Result<(), IndexerError> {
        if let Some(packages) = &self.packages {
            debug!(count = packages.len(), "scan returned packages");
            return store.index_packages(packages, layer, scanner).await;
        }
        if let Some(distributions) = &self.distributions {
            debug!(count = distributions.len(), "scan returned distributions");
            return store
                .index_distributions(distributions, layer, scanner)
                .await;
        }
        if let Some(repositories) = &self.repositories {
            debug!(count = repositories.len(), "scan returned repositories");
            return store.index_repositories(repositories, layer, scanner).await;
        }
        if let Some(files) = &self.files {
            debug!(count = files.len(), "scan returned files");
            return store.index_files(files, layer, scanner).await;
        }
        debug!("scan returned nothing");
        Ok(())
    }

    /// 채워진 kind 필드 수 (0 또는 1)
    #[cfg(test)]
    fn populated(&self) -> usize {
        usize::from(self.packages.is_some())
            + usize::from(self.distributions.is_some())
            + usize::from(self.repositories.is_some())
            + usize::from(self.files.is_some())
    }
}
