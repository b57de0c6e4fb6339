//! 영속화 계약 — 스캔 완료 기록과 kind별 인덱스 연산
//!
//! [`Store`]는 레이어 스캔 코어가 소비하는 영속화 백엔드의 인터페이스입니다.
//! 구현체는 동시 사용에 안전해야 하며, 코어는 스토어 위에 어떤 락도 잡지
//! 않습니다.
//!
//! # 멱등성 계약
//!
//! (레이어 다이제스트, 스캐너명, 스캐너 버전) 삼중쌍이 스캔 완료 기록의
//! 키입니다. `set_layer_scanned`가 반환된 뒤의 `layer_scanned` 조회는
//! 반드시 `true`를 관찰해야 합니다 (durable-before-visible).

use strata_core::types::{Digest, Distribution, FileEntry, Layer, Package, Repository};

use crate::error::IndexerError;
use crate::scanner::{BoxFuture, VersionedScanner};

/// 영속화 백엔드 계약
///
/// 모든 메서드는 dyn-compatible하도록 [`BoxFuture`]를 반환합니다.
pub trait Store: Send + Sync {
    /// (다이제스트, 스캐너명, 버전) 조합의 스캔이 이전에 성공적으로
    /// 완료되었는지 조회합니다.
    fn layer_scanned<'a>(
        &'a self,
        digest: &'a Digest,
        scanner: &'a dyn VersionedScanner,
    ) -> BoxFuture<'a, Result<bool, IndexerError>>;

    /// 스캔 완료를 기록합니다.
    ///
    /// 이후의 `layer_scanned` 조회가 `true`를 관찰하기 전에 기록이 durable
    /// 해야 합니다. 코어는 이 호출을 kind별 인덱스 호출 *이전*에 수행하므로
    /// 구현은 그 순서를 견뎌야 합니다.
    fn set_layer_scanned<'a>(
        &'a self,
        digest: &'a Digest,
        scanner: &'a dyn VersionedScanner,
    ) -> BoxFuture<'a, Result<(), IndexerError>>;

    /// (레이어, 스캐너)에 연관된 패키지 발견 결과를 영속화합니다.
    fn index_packages<'a>(
        &'a self,
        packages: &'a [Package],
        layer: &'a Layer,
        scanner: &'a dyn VersionedScanner,
    ) -> BoxFuture<'a, Result<(), IndexerError>>;

    /// (레이어, 스캐너)에 연관된 배포판 발견 결과를 영속화합니다.
    fn index_distributions<'a>(
        &'a self,
        distributions: &'a [Distribution],
        layer: &'a Layer,
        scanner: &'a dyn VersionedScanner,
    ) -> BoxFuture<'a, Result<(), IndexerError>>;

    /// (레이어, 스캐너)에 연관된 저장소 발견 결과를 영속화합니다.
    fn index_repositories<'a>(
        &'a self,
        repositories: &'a [Repository],
        layer: &'a Layer,
        scanner: &'a dyn VersionedScanner,
    ) -> BoxFuture<'a, Result<(), IndexerError>>;

    /// (레이어, 스캐너)에 연관된 파일 발견 결과를 영속화합니다.
    fn index_files<'a>(
        &'a self,
        files: &'a [FileEntry],
        layer: &'a Layer,
        scanner: &'a dyn VersionedScanner,
    ) -> BoxFuture<'a, Result<(), IndexerError>>;
}
