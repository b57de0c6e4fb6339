//! 레이어 스캔 오케스트레이터 -- 동시성 제어와 (레이어 x 스캐너) fan-out
//!
//! [`LayerScanner`]는 인덱서 수명 동안 한 번 구성되며, 스캔 호출마다
//! 고유 레이어 x 스캐너 조합을 워크 아이템으로 펼친 뒤 세마포어로 전역
//! in-flight 상한을 강제합니다. 첫 에러가 공유 취소 토큰을 통해 나머지
//! 작업을 중단시킵니다 (fail-fast).
//!
//! # 내부 아키텍처
//!
//! ```text
//! scan(manifest, layers)
//!     |                      +-- permit 획득 (취소와 race)
//!     dedupe(digest)         |        |
//!     |                      |   layer_scanned? --yes--> skip
//!     (layer x scanner) --> JoinSet   |
//!                            |   Findings::collect (에러 분류)
//!                            |        |
//!                            |   set_layer_scanned
//!                            |        |
//!                            +-- Findings::persist --> Store
//! ```

use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use strata_core::types::{Digest, Layer};

use crate::config::{ConfigSource, Options, ScannerConfig};
use crate::ecosystem::expand_ecosystems;
use crate::error::IndexerError;
use crate::findings::Findings;
use crate::scanner::{Scanner, ScannerKind, VersionedScanner};
use crate::store::Store;

/// 레이어 스캔 오케스트레이터
///
/// 스캐너 목록은 구성 이후 불변이며, 스캔 호출 간에 공유됩니다.
/// 개별 스캐너와 스토어 구현은 동시 호출에 안전해야 합니다.
pub struct LayerScanner {
    /// 영속화 백엔드
    store: Arc<dyn Store>,
    /// 스캔 호출당 허용되는 최대 in-flight 워크 아이템 수
    inflight: usize,
    /// 구성/필터링이 끝난 kind별 스캐너 목록
    ps: Vec<Arc<Scanner>>,
    ds: Vec<Arc<Scanner>>,
    rs: Vec<Arc<Scanner>>,
    fs: Vec<Arc<Scanner>>,
    /// 완료된 (레이어, 스캐너) 스캔 수
    scans_completed: Arc<AtomicU64>,
    /// 이미 스캔되어 건너뛴 수
    scans_skipped: Arc<AtomicU64>,
}

impl std::fmt::Debug for LayerScanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayerScanner")
            .field("inflight", &self.inflight)
            .field("ps", &self.ps.len())
            .field("ds", &self.ds.len())
            .field("rs", &self.rs.len())
            .field("fs", &self.fs.len())
            .field("scans_completed", &self.scans_completed.load(Ordering::Relaxed))
            .field("scans_skipped", &self.scans_skipped.load(Ordering::Relaxed))
            .finish()
    }
}

impl LayerScanner {
    /// 새 LayerScanner를 생성합니다.
    ///
    /// `concurrent`가 1 미만이면 경고 후 호스트의 가용 병렬도를 사용합니다.
    /// 생태계 확장이 실패하면 생성 전체가 실패합니다. 설정 주입에 실패한
    /// 스캐너는 경고/에러 로그와 함께 목록에서 제외될 뿐 생성을 실패시키지
    /// 않습니다.
    pub fn new(concurrent: i64, opts: Options) -> Result<Self, IndexerError> {
        let inflight = effective_concurrency(concurrent);

        let set = expand_ecosystems(&opts.ecosystems)?;
        let Options {
            store,
            scanner_config,
            client,
            ..
        } = opts;

        let ps = configure_and_filter(set.package, ScannerKind::Package, &scanner_config, &client);
        let ds = configure_and_filter(
            set.distribution,
            ScannerKind::Distribution,
            &scanner_config,
            &client,
        );
        let rs = configure_and_filter(
            set.repository,
            ScannerKind::Repository,
            &scanner_config,
            &client,
        );
        let fs = configure_and_filter(set.file, ScannerKind::File, &scanner_config, &client);

        debug!(
            concurrent = inflight,
            packages = ps.len(),
            distributions = ds.len(),
            repositories = rs.len(),
            files = fs.len(),
            "layer scanner constructed"
        );

        Ok(Self {
            store,
            inflight,
            ps: seal(ps),
            ds: seal(ds),
            rs: seal(rs),
            fs: seal(fs),
            scans_completed: Arc::new(AtomicU64::new(0)),
            scans_skipped: Arc::new(AtomicU64::new(0)),
        })
    }

    /// 유효 동시성 상한을 반환합니다.
    pub fn concurrency(&self) -> usize {
        self.inflight
    }

    /// 필터링 후 살아남은 스캐너 수를 반환합니다.
    pub fn scanner_count(&self) -> usize {
        self.ps.len() + self.ds.len() + self.rs.len() + self.fs.len()
    }

    /// 완료된 (레이어, 스캐너) 스캔 수를 반환합니다.
    pub fn scans_completed(&self) -> u64 {
        self.scans_completed.load(Ordering::Relaxed)
    }

    /// 스캔 완료 기록 덕에 건너뛴 수를 반환합니다.
    pub fn scans_skipped(&self) -> u64 {
        self.scans_skipped.load(Ordering::Relaxed)
    }

    /// 각 고유 레이어를 모든 스캐너로 스캔하고 결과를 인덱싱합니다.
    ///
    /// 모든 워크 아이템을 즉시 스폰한 뒤 세마포어로 동시 실행 수만
    /// 제한합니다. permit 획득은 워크 아이템 내부에서 일어나므로 취소가
    /// 대기 중인 획득을 즉시 거부할 수 있습니다.
    ///
    /// `cancel`은 호출자의 취소 신호입니다. 내부적으로 자식 토큰을 만들어
    /// 사용하므로 첫 에러로 인한 fail-fast 취소가 호출자 토큰에 보이지
    /// 않습니다. 첫 번째 에러가 반환되며, 나머지 작업은 취소를 관찰하고
    /// 종료합니다.
    pub async fn scan(
        &self,
        manifest: &Digest,
        layers: &[Layer],
        cancel: CancellationToken,
    ) -> Result<(), IndexerError> {
        if cancel.is_cancelled() {
            return Err(IndexerError::Cancelled);
        }

        let cancel = cancel.child_token();
        let sem = Arc::new(Semaphore::new(self.inflight));
        let mut tasks: JoinSet<Result<(), IndexerError>> = JoinSet::new();

        // 이미지가 같은 레이어를 여러 번 나열할 수 있으므로 다이제스트로
        // 중복을 제거합니다.
        let mut seen: HashSet<Digest> = HashSet::new();
        for layer in layers {
            if !seen.insert(layer.digest.clone()) {
                continue;
            }
            for scanner in self
                .ps
                .iter()
                .chain(self.ds.iter())
                .chain(self.rs.iter())
                .chain(self.fs.iter())
            {
                let store = Arc::clone(&self.store);
                let scanner = Arc::clone(scanner);
                let layer = layer.clone();
                let manifest = manifest.clone();
                let sem = Arc::clone(&sem);
                let cancel = cancel.clone();
                let scans_completed = Arc::clone(&self.scans_completed);
                let scans_skipped = Arc::clone(&self.scans_skipped);

                tasks.spawn(async move {
                    let _permit = tokio::select! {
                        _ = cancel.cancelled() => return Err(IndexerError::Cancelled),
                        permit = sem.clone().acquire_owned() => {
                            permit.map_err(|_| IndexerError::Cancelled)?
                        }
                    };
                    tokio::select! {
                        _ = cancel.cancelled() => Err(IndexerError::Cancelled),
                        res = scan_layer(
                            store.as_ref(),
                            &scanner,
                            &layer,
                            &manifest,
                            &scans_completed,
                            &scans_skipped,
                        ) => res,
                    }
                });
            }
        }

        debug!(
            manifest = %manifest,
            layers = seen.len(),
            work_items = tasks.len(),
            "scan started"
        );

        let mut first_err: Option<IndexerError> = None;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    if first_err.is_none() {
                        cancel.cancel();
                        first_err = Some(err);
                    }
                }
                Err(join_err) if join_err.is_panic() => {
                    // 스캐너 패닉은 프로그래머 에러입니다. 복구하지 않고
                    // 호출자 스레드에서 그대로 재개합니다.
                    error!(manifest = %manifest, "scan task panicked");
                    cancel.cancel();
                    std::panic::resume_unwind(join_err.into_panic());
                }
                Err(_) => {
                    if first_err.is_none() {
                        first_err = Some(IndexerError::Cancelled);
                    }
                }
            }
        }

        debug!(manifest = %manifest, "scan done");
        match first_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// (레이어, 스캐너) 워크 아이템 하나를 처리합니다.
///
/// 순서: 완료 기록 조회 -> 스캐너 실행(결과 봉투) -> 완료 마킹 -> 결과
/// 영속화. 완료 마킹이 인덱스 호출보다 먼저이므로, 둘 사이에서 중단되면
/// "스캔됨, 결과 없음" 기록이 남습니다. 스캐너가 결정적이라면 재스캔해도
/// 정확도가 나아지지 않으므로 감수하는 트레이드오프입니다.
async fn scan_layer(
    store: &dyn Store,
    scanner: &Scanner,
    layer: &Layer,
    manifest: &Digest,
    scans_completed: &AtomicU64,
    scans_skipped: &AtomicU64,
) -> Result<(), IndexerError> {
    debug!(
        manifest = %manifest,
        scanner = scanner.name(),
        kind = %scanner.kind(),
        layer = %layer.digest,
        "scan start"
    );

    if store.layer_scanned(&layer.digest, scanner).await? {
        debug!(
            scanner = scanner.name(),
            layer = %layer.digest,
            "layer already scanned"
        );
        scans_skipped.fetch_add(1, Ordering::Relaxed);
        return Ok(());
    }

    let mut findings = Findings::default();
    findings.collect(scanner, layer).await?;

    store
        .set_layer_scanned(&layer.digest, scanner)
        .await
        .map_err(|err| IndexerError::MarkScanned {
            source: Box::new(err),
        })?;

    findings.persist(store, scanner, layer).await?;
    scans_completed.fetch_add(1, Ordering::Relaxed);

    debug!(
        manifest = %manifest,
        scanner = scanner.name(),
        kind = %scanner.kind(),
        layer = %layer.digest,
        "scan done"
    );
    Ok(())
}

/// kind 목록 하나에 대해 설정 주입과 필터링을 수행합니다.
///
/// 결정 규칙 (설정 존재 x Configurable x RPC):
/// - 설정이 있으나 스캐너가 어떤 설정 계약도 구현하지 않음 -> 경고 후 제외
/// - RPC 계약 구현 (Configurable 동시 구현 포함) -> RPC configure 호출,
///   실패 시 제외
/// - Configurable만 구현 -> configure 호출, 실패 시 제외
/// - 설정도 계약도 없음 -> 그대로 유지
///
/// 설정이 공급되지 않은 경우에도 no-op 적용 함수를 전달하여 선택적
/// configure 훅이 항상 실행되게 합니다. 살아남은 스캐너의 상대 순서는
/// 유지됩니다.
fn configure_and_filter(
    scanners: Vec<Scanner>,
    kind: ScannerKind,
    config: &ScannerConfig,
    client: &reqwest::Client,
) -> Vec<Scanner> {
    let cfg_map = config.for_kind(kind);
    let mut kept = Vec::with_capacity(scanners.len());

    for mut scanner in scanners {
        let name = scanner.name().to_owned();

        // 등록된 목록과 스캐너가 주장하는 kind가 다르면 디스패치가 깨지므로
        // 제외합니다.
        if scanner.kind() != kind {
            warn!(
                scanner = %name,
                kind = %scanner.kind(),
                expected = %kind,
                "unknown scanner kind for this list, skipping"
            );
            continue;
        }

        let (cfg, have_cfg) = match cfg_map.get(&name) {
            Some(cfg) => (cfg.clone(), true),
            None => (ConfigSource::empty(), false),
        };

        let has_configurable = scanner.as_configurable().is_some();
        let has_rpc = scanner.as_rpc().is_some();

        if have_cfg && !has_configurable && !has_rpc {
            warn!(
                scanner = %name,
                "configuration present for an unconfigurable scanner, skipping"
            );
            continue;
        }

        let configured = if has_rpc {
            // Configurable을 함께 구현해도 RPC가 우선합니다. RPC 훅은
            // 같은 설정 함수에 전송 클라이언트를 더해 받는 상위 집합입니다.
            scanner
                .as_rpc()
                .map_or(Ok(()), |rpc| rpc.configure(&cfg, client))
        } else if has_configurable {
            scanner
                .as_configurable()
                .map_or(Ok(()), |configurable| configurable.configure(&cfg))
        } else {
            Ok(())
        };

        if let Err(err) = configured {
            error!(scanner = %name, error = %err, "configuration failed");
            continue;
        }

        kept.push(scanner);
    }

    kept
}

/// 동시성 인자를 유효 상한으로 정규화합니다.
///
/// 1 미만의 값은 경고 후 호스트의 가용 병렬도로 대체됩니다.
fn effective_concurrency(concurrent: i64) -> usize {
    if concurrent >= 1 {
        return concurrent as usize;
    }
    warn!(value = concurrent, "rectifying nonsense 'concurrent' argument");
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

fn seal(scanners: Vec<Scanner>) -> Vec<Arc<Scanner>> {
    scanners.into_iter().map(Arc::new).collect()
}
