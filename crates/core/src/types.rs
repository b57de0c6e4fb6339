//! 도메인 타입 — 시스템 전역에서 사용되는 공통 타입
//!
//! 인덱서의 모든 모듈이 공유하는 데이터 구조를 정의합니다.
//! [`Digest`]는 레이어/매니페스트의 콘텐츠 주소이며, [`Layer`]는 구체화된
//! 레이어의 불투명 핸들입니다. 나머지 타입은 스캐너가 레이어에서 추출하는
//! 엔티티(패키지, 배포판, 저장소, 파일)입니다.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::DigestError;

/// 기본 레이어 미디어 타입 (OCI tar+gzip)
pub const MEDIA_TYPE_OCI_LAYER: &str = "application/vnd.oci.image.layer.v1.tar+gzip";

/// 콘텐츠 다이제스트 알고리즘
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DigestAlgorithm {
    /// SHA-256 (hex 64자)
    Sha256,
    /// SHA-512 (hex 128자)
    Sha512,
}

impl DigestAlgorithm {
    /// 알고리즘의 소문자 표기를 반환합니다.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Sha512 => "sha512",
        }
    }

    /// 알고리즘이 요구하는 hex 문자열 길이를 반환합니다.
    pub fn hex_len(&self) -> usize {
        match self {
            Self::Sha256 => 64,
            Self::Sha512 => 128,
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 콘텐츠 다이제스트
///
/// `"sha256:<hex>"` 형식의 콘텐츠 주소입니다. 다이제스트가 같으면 내용이
/// 같다는 전제 하에 레이어 중복 제거의 키로 사용됩니다.
///
/// # 사용 예시
/// ```
/// use strata_core::Digest;
///
/// let d: Digest = "sha256:a3ed95caeb02ffe68cdd9fd84406680ae93d633cb16422d00e8a7c22955b46d4"
///     .parse()
///     .unwrap();
/// assert_eq!(d.hex().len(), 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Digest {
    algorithm: DigestAlgorithm,
    hex: String,
}

impl Digest {
    /// 알고리즘과 hex 문자열로 다이제스트를 생성합니다.
    ///
    /// hex 길이와 문자를 검증합니다. 대문자 hex는 소문자로 정규화됩니다.
    pub fn new(algorithm: DigestAlgorithm, hex: impl Into<String>) -> Result<Self, DigestError> {
        let mut hex = hex.into();
        if hex.len() != algorithm.hex_len() {
            return Err(DigestError::BadLength {
                algorithm: algorithm.as_str(),
                expected: algorithm.hex_len(),
                actual: hex.len(),
            });
        }
        if let Some(c) = hex.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(DigestError::NotHex(c));
        }
        hex.make_ascii_lowercase();
        Ok(Self { algorithm, hex })
    }

    /// `"알고리즘:hex"` 문자열을 파싱합니다.
    pub fn parse(s: &str) -> Result<Self, DigestError> {
        let (algo, hex) = s
            .split_once(':')
            .ok_or_else(|| DigestError::Malformed(s.to_owned()))?;
        let algorithm = match algo {
            "sha256" => DigestAlgorithm::Sha256,
            "sha512" => DigestAlgorithm::Sha512,
            other => return Err(DigestError::UnsupportedAlgorithm(other.to_owned())),
        };
        Self::new(algorithm, hex)
    }

    /// 해시 알고리즘을 반환합니다.
    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    /// hex 부분을 반환합니다 (소문자).
    pub fn hex(&self) -> &str {
        &self.hex
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.hex)
    }
}

impl FromStr for Digest {
    type Err = DigestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// 다이제스트는 JSON/DB 어디서든 "sha256:<hex>" 문자열 하나로 다룹니다.
impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DigestVisitor;

        impl Visitor<'_> for DigestVisitor {
            type Value = Digest;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a digest string like \"sha256:<hex>\"")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Digest, E> {
                Digest::parse(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_str(DigestVisitor)
    }
}

/// 컨테이너 이미지 레이어의 불투명 핸들
///
/// 레이어 페치/압축 해제는 이 크레이트의 범위 밖이며, 스캐너는 이미 구체화된
/// 파일시스템 경로만 전달받습니다. 다이제스트 동일성이 내용 동일성을
/// 함의하므로 스캔 중복 제거의 키로 다이제스트를 사용합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer {
    /// 콘텐츠 다이제스트
    pub digest: Digest,
    /// 압축 해제된 레이어가 구체화된 로컬 경로
    pub local_path: PathBuf,
    /// OCI 미디어 타입
    pub media_type: String,
}

impl Layer {
    /// 기본 미디어 타입으로 레이어 핸들을 생성합니다.
    pub fn new(digest: Digest, local_path: impl Into<PathBuf>) -> Self {
        Self {
            digest,
            local_path: local_path.into(),
            media_type: MEDIA_TYPE_OCI_LAYER.to_owned(),
        }
    }

    /// 미디어 타입을 지정합니다.
    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = media_type.into();
        self
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.digest, self.local_path.display())
    }
}

/// 패키지 구분 (바이너리 / 소스)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PackageKind {
    /// 설치된 바이너리 패키지
    #[default]
    Binary,
    /// 소스 패키지
    Source,
}

/// 레이어에서 발견된 패키지
///
/// 패키지 스캐너(RPM, dpkg 등)가 추출하는 엔티티입니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    /// 패키지명
    pub name: String,
    /// 버전 문자열 (생태계 고유 형식)
    pub version: String,
    /// 바이너리/소스 구분
    pub kind: PackageKind,
    /// 아키텍처 (예: "x86_64"; 알 수 없으면 빈 문자열)
    pub arch: String,
    /// 패키지를 기록한 데이터베이스 경로 (예: "var/lib/rpm")
    pub package_db: String,
    /// 소스 패키지명 (바이너리 패키지인 경우)
    pub source: Option<String>,
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.version)
    }
}

/// 레이어에서 식별된 OS 배포판
///
/// os-release 등의 메타데이터에서 추출합니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Distribution {
    /// 배포판 ID (os-release의 ID, 예: "debian")
    pub did: String,
    /// 배포판명
    pub name: String,
    /// 버전 문자열
    pub version: String,
    /// 버전 ID (os-release의 VERSION_ID)
    pub version_id: String,
    /// 표시용 이름 (os-release의 PRETTY_NAME)
    pub pretty_name: String,
    /// CPE 식별자 (있을 경우)
    pub cpe: Option<String>,
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.pretty_name.is_empty() {
            write!(f, "{} {}", self.name, self.version)
        } else {
            f.write_str(&self.pretty_name)
        }
    }
}

/// 레이어에서 식별된 패키지 저장소
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// 저장소명
    pub name: String,
    /// 저장소 키 (생태계 고유 식별자)
    pub key: String,
    /// 저장소 URI
    pub uri: String,
}

/// 파일 구분
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileKind {
    /// 일반 파일
    #[default]
    Regular,
    /// whiteout — 하위 레이어의 파일 삭제 마커
    Whiteout,
}

/// 레이어에서 발견된 파일
///
/// 파일 스캐너가 추출하는 엔티티입니다. whiteout 파일은 하위 레이어의
/// 동일 경로를 삭제된 것으로 표시합니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// 레이어 루트 기준 경로
    pub path: String,
    /// 파일 구분
    pub kind: FileKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHA256_HEX: &str = "a3ed95caeb02ffe68cdd9fd84406680ae93d633cb16422d00e8a7c22955b46d4";

    #[test]
    fn digest_parse_roundtrip() {
        let s = format!("sha256:{SHA256_HEX}");
        let d = Digest::parse(&s).unwrap();
        assert_eq!(d.algorithm(), DigestAlgorithm::Sha256);
        assert_eq!(d.hex(), SHA256_HEX);
        assert_eq!(d.to_string(), s);
    }

    #[test]
    fn digest_normalizes_uppercase_hex() {
        let upper = SHA256_HEX.to_uppercase();
        let d = Digest::new(DigestAlgorithm::Sha256, upper).unwrap();
        assert_eq!(d.hex(), SHA256_HEX);
    }

    #[test]
    fn digest_rejects_missing_separator() {
        let err = Digest::parse(SHA256_HEX).unwrap_err();
        assert!(matches!(err, DigestError::Malformed(_)));
    }

    #[test]
    fn digest_rejects_unknown_algorithm() {
        let err = Digest::parse(&format!("md5:{SHA256_HEX}")).unwrap_err();
        assert!(matches!(err, DigestError::UnsupportedAlgorithm(_)));
    }

    #[test]
    fn digest_rejects_wrong_length() {
        let err = Digest::parse("sha256:abcd").unwrap_err();
        assert!(matches!(
            err,
            DigestError::BadLength {
                expected: 64,
                actual: 4,
                ..
            }
        ));
    }

    #[test]
    fn digest_rejects_non_hex() {
        let bad = format!("sha256:{}", "z".repeat(64));
        let err = Digest::parse(&bad).unwrap_err();
        assert!(matches!(err, DigestError::NotHex('z')));
    }

    #[test]
    fn digest_equality_is_content_equality() {
        let a = Digest::parse(&format!("sha256:{SHA256_HEX}")).unwrap();
        let b: Digest = format!("sha256:{SHA256_HEX}").parse().unwrap();
        assert_eq!(a, b);

        let mut set = std::collections::HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn digest_serde_as_string() {
        let d = Digest::parse(&format!("sha256:{SHA256_HEX}")).unwrap();
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(json, format!("\"sha256:{SHA256_HEX}\""));

        let back: Digest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, d);
    }

    #[test]
    fn digest_serde_rejects_garbage() {
        let res: Result<Digest, _> = serde_json::from_str("\"not-a-digest\"");
        assert!(res.is_err());
    }

    #[test]
    fn layer_defaults_to_oci_media_type() {
        let digest = Digest::parse(&format!("sha256:{SHA256_HEX}")).unwrap();
        let layer = Layer::new(digest, "/tmp/layers/a3ed95");
        assert_eq!(layer.media_type, MEDIA_TYPE_OCI_LAYER);
        assert!(layer.to_string().contains("sha256:"));

        let layer = layer.with_media_type("application/vnd.docker.image.rootfs.diff.tar.gzip");
        assert!(layer.media_type.starts_with("application/vnd.docker"));
    }

    #[test]
    fn package_display() {
        let pkg = Package {
            name: "openssl".to_owned(),
            version: "3.0.11-1".to_owned(),
            arch: "x86_64".to_owned(),
            package_db: "var/lib/rpm".to_owned(),
            ..Default::default()
        };
        assert_eq!(pkg.to_string(), "openssl 3.0.11-1");
        assert_eq!(pkg.kind, PackageKind::Binary);
    }

    #[test]
    fn distribution_display_prefers_pretty_name() {
        let dist = Distribution {
            did: "debian".to_owned(),
            name: "Debian GNU/Linux".to_owned(),
            version: "12 (bookworm)".to_owned(),
            version_id: "12".to_owned(),
            pretty_name: "Debian GNU/Linux 12 (bookworm)".to_owned(),
            cpe: None,
        };
        assert_eq!(dist.to_string(), "Debian GNU/Linux 12 (bookworm)");

        let bare = Distribution {
            name: "Alpine".to_owned(),
            version: "3.19".to_owned(),
            ..Default::default()
        };
        assert_eq!(bare.to_string(), "Alpine 3.19");
    }

    #[test]
    fn file_entry_serialize_deserialize() {
        let file = FileEntry {
            path: "etc/passwd".to_owned(),
            kind: FileKind::Whiteout,
        };
        let json = serde_json::to_string(&file).unwrap();
        let back: FileEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, file);
    }
}
