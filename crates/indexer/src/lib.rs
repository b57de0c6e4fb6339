#![doc = include_str!("../README.md")]
//!
//! # Module Structure
//!
//! - [`error`]: Domain error types (`IndexerError`)
//! - [`scanner`]: Scanner capability contracts (`VersionedScanner`, the four
//!   kind traits, `ConfigurableScanner`, `RpcScanner`, the `Scanner` sum type)
//! - [`store`]: Persistence contract (`Store`)
//! - [`config`]: Scanner configuration injection (`ConfigSource`,
//!   `ScannerConfig`, `Options`)
//! - [`ecosystem`]: Scanner bundles and expansion (`Ecosystem`)
//! - [`layer_scanner`]: The concurrency core (`LayerScanner`)
//!
//! # Architecture
//!
//! ```text
//! Options{ecosystems} --> expand --> configure_and_filter --> sealed kind lists
//!                                                                  |
//! scan(manifest, layers) --> dedupe(digest) --> (layer x scanner) work items
//!                                                                  |
//!                                               Semaphore(N) --> scan_layer
//!                                                                  |
//!                           layer_scanned? --skip--+     Findings::collect
//!                                                  |          |
//!                                                  |   set_layer_scanned
//!                                                  |          |
//!                                                  +--- Findings::persist --> Store
//! ```

pub mod config;
pub mod ecosystem;
pub mod error;
pub mod layer_scanner;
pub mod scanner;
pub mod store;

mod findings;

// --- Public API Re-exports ---

// 코어 (스캔 오케스트레이터)
pub use layer_scanner::LayerScanner;

// 설정
pub use config::{ConfigSource, Options, ScannerConfig};

// 에러
pub use error::IndexerError;

// 스캐너 계약
pub use scanner::{
    BoxFuture, ConfigurableScanner, DistributionScanner, FileScanner, PackageScanner,
    RepositoryScanner, RpcScanner, Scanner, ScannerKind, VersionedScanner,
};

// 생태계
pub use ecosystem::Ecosystem;

// 스토어 계약
pub use store::Store;
