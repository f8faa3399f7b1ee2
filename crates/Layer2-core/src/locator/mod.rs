//! Filesystem Locator - 경로 세그먼트 패턴으로 설치 위치 찾기
//!
//! 루트 디렉토리에서 시작해 세그먼트 하나당 디렉토리 한 단계씩 내려가며
//! 이름이 맞는 항목만 남깁니다. 한 단계의 매치가 모두 확정된 뒤에야
//! 다음 세그먼트를 검사합니다 (너비 우선).
//!
//! - 없는 디렉토리, 읽을 수 없는 디렉토리는 매치 0개로 취급 (에러 아님)
//! - 중간 세그먼트는 디렉토리만, 마지막 세그먼트는 파일/디렉토리 모두 허용
//!   (macOS `.app` 번들은 디렉토리)

use mayaconnect_foundation::Result;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::trace;

/// 경로 문자열에서 버전을 추출할 때 쓰는 named group
pub const VERSION_GROUP: &str = "version";

// ============================================================================
// Segment
// ============================================================================

/// 경로 세그먼트 (리터럴 또는 정규식)
#[derive(Debug, Clone)]
pub enum Segment {
    /// 정확히 일치하는 이름
    Literal(String),
    /// 이름 전체가 일치해야 하는 정규식
    Pattern(Regex),
}

impl Segment {
    pub fn literal(name: impl Into<String>) -> Self {
        Segment::Literal(name.into())
    }

    /// 정규식 세그먼트 (이름 전체 매치로 고정)
    pub fn pattern(expression: &str) -> Result<Self> {
        let anchored = Regex::new(&format!("^(?:{})$", expression))?;
        Ok(Segment::Pattern(anchored))
    }

    pub fn matches(&self, name: &str) -> bool {
        match self {
            Segment::Literal(literal) => literal == name,
            Segment::Pattern(regex) => regex.is_match(name),
        }
    }
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Segment::Literal(literal) => f.write_str(literal),
            Segment::Pattern(regex) => write!(f, "/{}/", regex.as_str()),
        }
    }
}

// ============================================================================
// SearchPattern
// ============================================================================

/// 검색 패턴: 시작 디렉토리 + 세그먼트 + 선택적 버전 추출식
#[derive(Debug, Clone)]
pub struct SearchPattern {
    pub root: PathBuf,
    pub segments: Vec<Segment>,
    pub version_expression: Option<Regex>,
}

impl SearchPattern {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            segments: Vec::new(),
            version_expression: None,
        }
    }

    /// 루트 세그먼트를 이어 붙여 시작 디렉토리를 만듭니다.
    ///
    /// Windows 드라이브 문자(`C:`)는 `C:\`로 정규화합니다.
    pub fn from_segments<S: AsRef<str>>(root_segments: &[S], segments: Vec<Segment>) -> Self {
        let mut root = PathBuf::new();
        for (i, segment) in root_segments.iter().enumerate() {
            let segment = segment.as_ref();
            if i == 0 && segment.len() == 2 && segment.ends_with(':') {
                root.push(format!("{}\\", segment));
            } else {
                root.push(segment);
            }
        }

        Self {
            root,
            segments,
            version_expression: None,
        }
    }

    pub fn segment(mut self, segment: Segment) -> Self {
        self.segments.push(segment);
        self
    }

    pub fn segments(mut self, segments: impl IntoIterator<Item = Segment>) -> Self {
        self.segments.extend(segments);
        self
    }

    pub fn version_expression(mut self, expression: Regex) -> Self {
        self.version_expression = Some(expression);
        self
    }
}

// ============================================================================
// LocatedPath
// ============================================================================

/// 찾은 경로와 추출된 버전
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedPath {
    pub path: PathBuf,
    pub version: Option<String>,
}

/// 경로 전체에서 버전 추출 (마지막 매치 사용)
///
/// 버전 디렉토리는 보통 경로 끝쪽에 있으므로, 루트 경로에 섞인
/// 숫자보다 마지막 매치를 우선합니다.
pub fn capture_version(expression: &Regex, path: &Path) -> Option<String> {
    let haystack = path.to_string_lossy();
    expression
        .captures_iter(&haystack)
        .filter_map(|caps| caps.name(VERSION_GROUP).or_else(|| caps.get(0)))
        .map(|m| m.as_str().to_string())
        .filter(|v| !v.is_empty())
        .last()
}

// ============================================================================
// locate
// ============================================================================

/// 패턴에 맞는 모든 경로 찾기
///
/// 버전 추출식이 있으면 매치되지 않는 경로는 결과에서 빠집니다.
pub fn locate(pattern: &SearchPattern) -> Vec<LocatedPath> {
    walk(pattern, &mut |_, _| {})
        .into_iter()
        .filter_map(|path| match &pattern.version_expression {
            Some(expression) => {
                // MAYA_LOCATION 루트에 섞인 숫자가 버전으로 잡히지 않도록 마지막 매치
                let version = capture_version(expression, &path)?;
                Some(LocatedPath {
                    path,
                    version: Some(version),
                })
            }
            None => Some(LocatedPath {
                path,
                version: None,
            }),
        })
        .collect()
}

/// 세그먼트별 너비 우선 탐색
///
/// `on_visit(level, dir)`은 `level`번째 세그먼트로 `dir`을 검사하기 직전에 호출됩니다.
pub(crate) fn walk(
    pattern: &SearchPattern,
    on_visit: &mut dyn FnMut(usize, &Path),
) -> Vec<PathBuf> {
    if !pattern.root.is_dir() {
        trace!(root = %pattern.root.display(), "Search root does not exist");
        return Vec::new();
    }

    let mut current = vec![pattern.root.clone()];
    let last = pattern.segments.len().saturating_sub(1);

    for (level, segment) in pattern.segments.iter().enumerate() {
        let mut next = Vec::new();

        for dir in &current {
            on_visit(level, dir);

            for (name, path) in sorted_entries(dir) {
                if !segment.matches(&name) {
                    continue;
                }
                if level < last && !path.is_dir() {
                    continue;
                }
                next.push(path);
            }
        }

        if next.is_empty() {
            trace!(level, segment = %segment, "No matches, pruning search");
            return Vec::new();
        }

        current = next;
    }

    current
}

/// 디렉토리 항목을 이름순으로 (읽기 실패 시 빈 목록)
fn sorted_entries(dir: &Path) -> Vec<(String, PathBuf)> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            trace!(dir = %dir.display(), error = %e, "Skipping unreadable directory");
            return Vec::new();
        }
    };

    let mut named: Vec<(String, PathBuf)> = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let name = entry.file_name().into_string().ok()?;
            Some((name, entry.path()))
        })
        .collect();
    named.sort();
    named
}
