//! Process Environment - 실행 프로세스에 넘길 환경 변수

use std::collections::BTreeMap;
use tracing::debug;

/// 변수 이름 → 값 (이름순 정렬)
///
/// 실행 한 번마다 새로 만들어지며 다른 실행과 공유하지 않습니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessEnvironment {
    vars: BTreeMap<String, String>,
}

impl ProcessEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// 현재 프로세스 환경 복사
    ///
    /// UTF-8이 아닌 이름이나 값을 가진 변수는 건너뜁니다.
    pub fn from_process() -> Self {
        std::env::vars_os()
            .filter_map(|(key, value)| match (key.into_string(), value.into_string()) {
                (Ok(key), Ok(value)) => Some((key, value)),
                (key, _) => {
                    debug!(key = ?key, "Skipping non UTF-8 environment variable");
                    None
                }
            })
            .collect()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// 값 설정 (기존 값은 덮어씀)
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.vars.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.vars.iter()
    }
}

impl FromIterator<(String, String)> for ProcessEnvironment {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ProcessEnvironment {
    type Item = (&'a String, &'a String);
    type IntoIter = std::collections::btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.vars.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_overwrites() {
        let mut env = ProcessEnvironment::new().with("A", "1");
        env.set("A", "2");
        assert_eq!(env.get("A"), Some("2"));
        assert_eq!(env.len(), 1);
    }

    #[test]
    fn test_iteration_is_sorted() {
        let env: ProcessEnvironment = vec![
            ("B".to_string(), "2".to_string()),
            ("A".to_string(), "1".to_string()),
        ]
        .into_iter()
        .collect();

        let keys: Vec<&String> = env.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["A", "B"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_from_process_skips_non_utf8_values() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        std::env::set_var("MAYACONNECT_TEST_UTF8", "ok");
        std::env::set_var("MAYACONNECT_TEST_BYTES", OsStr::from_bytes(b"\xff\xfe"));

        let env = ProcessEnvironment::from_process();
        assert_eq!(env.get("MAYACONNECT_TEST_UTF8"), Some("ok"));
        assert!(!env.contains("MAYACONNECT_TEST_BYTES"));

        std::env::remove_var("MAYACONNECT_TEST_BYTES");
        std::env::remove_var("MAYACONNECT_TEST_UTF8");
    }
}
