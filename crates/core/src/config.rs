//! 설정 관리 — strata.toml 파싱 결과의 런타임 표현
//!
//! 설정 파일 로딩 자체는 호출자(데몬/CLI)의 책임이며, 이 모듈은 파싱이 끝난
//! 형태의 설정 구조체와 검증 규칙만 정의합니다.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// 동시 스캔 상한의 허용 최대값
const MAX_SCAN_CONCURRENCY: i64 = 4096;

/// Strata 통합 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StrataConfig {
    /// 일반 설정
    pub general: GeneralConfig,
    /// 인덱서 설정
    pub indexer: IndexerConfig,
}

impl StrataConfig {
    /// 모든 섹션의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.general.validate()?;
        self.indexer.validate()?;
        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace / debug / info / warn / error)
    pub log_level: String,
    /// 로그 출력 형식 (json / pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "json".to_owned(),
        }
    }
}

impl GeneralConfig {
    /// 설정 값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(ConfigError::InvalidValue {
                    field: "general.log_level".to_owned(),
                    reason: format!("unknown log level '{other}'"),
                });
            }
        }

        match self.log_format.as_str() {
            "json" | "pretty" => Ok(()),
            other => Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("unknown log format '{other}', expected 'json' or 'pretty'"),
            }),
        }
    }
}

/// 인덱서 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexerConfig {
    /// 이미지 전체에서 동시에 실행될 수 있는 스캔 작업 상한.
    /// 1 미만이면 호스트의 가용 병렬도를 사용합니다.
    pub scan_concurrency: i64,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            scan_concurrency: 0, // host parallelism
        }
    }
}

impl IndexerConfig {
    /// 설정 값의 유효성을 검증합니다.
    ///
    /// 1 미만의 값은 "호스트 병렬도 사용"을 의미하므로 유효합니다.
    /// 상한만 검증합니다.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scan_concurrency > MAX_SCAN_CONCURRENCY {
            return Err(ConfigError::InvalidValue {
                field: "indexer.scan_concurrency".to_owned(),
                reason: format!("must be at most {MAX_SCAN_CONCURRENCY}"),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = StrataConfig::default();
        config.validate().unwrap();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.indexer.scan_concurrency, 0);
    }

    #[test]
    fn rejects_unknown_log_level() {
        let config = StrataConfig {
            general: GeneralConfig {
                log_level: "verbose".to_owned(),
                ..Default::default()
            },
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("log_level"));
    }

    #[test]
    fn rejects_unknown_log_format() {
        let config = GeneralConfig {
            log_format: "xml".to_owned(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn negative_concurrency_is_valid() {
        // 1 미만은 "호스트 병렬도 사용"으로 해석되므로 검증을 통과해야 합니다.
        let config = IndexerConfig {
            scan_concurrency: -1,
        };
        config.validate().unwrap();
    }

    #[test]
    fn rejects_excessive_concurrency() {
        let config = IndexerConfig {
            scan_concurrency: 100_000,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn config_serde_roundtrip() {
        let config = StrataConfig {
            general: GeneralConfig {
                log_level: "debug".to_owned(),
                log_format: "pretty".to_owned(),
            },
            indexer: IndexerConfig {
                scan_concurrency: 8,
            },
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: StrataConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.general.log_level, "debug");
        assert_eq!(back.indexer.scan_concurrency, 8);
    }
}
