//! Purpose: Resolve the FANBOX session id used to authenticate API calls.
//! Exports: `Cookie`, `CookieFile`, `SessionSource`, `resolve_session`, `default_cookie_path`.
//! Role: Configuration layer shared by the CLI and library callers.
//! Invariants: Precedence is explicit flag, then `FANBOXSESSID`, then the cookie file.
//! Invariants: Default cookie file is `~/.fanbox/cookie.json` (`{"cookies": [...]}`).
#![allow(clippy::result_large_err)]

use super::client::SESSION_COOKIE;
use crate::core::error::{Error, ErrorKind};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SESSION_ENV: &str = "FANBOXSESSID";

/// One browser cookie as saved by the login flow.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Cookie {
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_only: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secure: Option<bool>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct CookieFile {
    pub cookies: Vec<Cookie>,
}

impl CookieFile {
    pub fn load(path: &Path) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path).map_err(|err| {
            let kind = if err.kind() == std::io::ErrorKind::NotFound {
                ErrorKind::NotFound
            } else {
                ErrorKind::Io
            };
            Error::new(kind)
                .with_message(format!("failed to read cookie file {}", path.display()))
                .with_source(err)
        })?;
        serde_json::from_str(&text).map_err(|err| {
            Error::new(ErrorKind::Usage)
                .with_message(format!("invalid cookie file {}", path.display()))
                .with_hint("Expected {\"cookies\": [{\"name\": ..., \"value\": ...}]}.")
                .with_source(err)
        })
    }

    pub fn session_id(&self) -> Option<&str> {
        self.cookies
            .iter()
            .find(|cookie| cookie.name == SESSION_COOKIE)
            .map(|cookie| cookie.value.as_str())
    }
}

/// Where a session id came from; reported in debug logs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionSource {
    Flag,
    Env,
    CookieFile(PathBuf),
}

pub fn default_cookie_path() -> PathBuf {
    let home = std::env::var_os("HOME").unwrap_or_default();
    PathBuf::from(home).join(".fanbox").join("cookie.json")
}

/// Picks the session id from `flag`, then `env`, then the cookie file.
pub fn resolve_session(
    flag: Option<&str>,
    env: Option<&str>,
    cookie_file: Option<&Path>,
) -> Result<(String, SessionSource), Error> {
    if let Some(id) = flag.filter(|id| !id.is_empty()) {
        return Ok((id.to_string(), SessionSource::Flag));
    }
    if let Some(id) = env.filter(|id| !id.is_empty()) {
        return Ok((id.to_string(), SessionSource::Env));
    }
    let path = cookie_file
        .map(Path::to_path_buf)
        .unwrap_or_else(default_cookie_path);
    let file = CookieFile::load(&path).map_err(|err| {
        err.with_hint("Pass --session, set FANBOXSESSID, or save cookies to ~/.fanbox/cookie.json.")
    })?;
    match file.session_id() {
        Some(id) => Ok((id.to_string(), SessionSource::CookieFile(path))),
        None => Err(Error::new(ErrorKind::Permission)
            .with_message(format!("no {SESSION_COOKIE} cookie in {}", path.display()))
            .with_hint("Log in through the browser and save the cookies again.")),
    }
}

#[cfg(test)]
mod tests {
    use super::{CookieFile, SessionSource, resolve_session};
    use crate::core::error::ErrorKind;
    use std::fs;

    #[test]
    fn flag_wins_over_env_and_file() {
        let (id, source) = resolve_session(Some("flag"), Some("env"), None).expect("session");
        assert_eq!(id, "flag");
        assert_eq!(source, SessionSource::Flag);

        let (id, source) = resolve_session(None, Some("env"), None).expect("session");
        assert_eq!(id, "env");
        assert_eq!(source, SessionSource::Env);
    }

    #[test]
    fn cookie_file_supplies_session() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("cookie.json");
        fs::write(
            &path,
            r#"{"cookies":[
                {"name":"p_ab_id","value":"1","domain":".fanbox.cc","path":"/","secure":true},
                {"name":"FANBOXSESSID","value":"123_abc","httpOnly":true,"expiry":1767225600}
            ]}"#,
        )
        .expect("write");

        let file = CookieFile::load(&path).expect("load");
        assert_eq!(file.cookies[1].http_only, Some(true));

        let (id, source) = resolve_session(None, Some(""), Some(&path)).expect("session");
        assert_eq!(id, "123_abc");
        assert_eq!(source, SessionSource::CookieFile(path));
    }

    #[test]
    fn missing_session_cookie_is_permission_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("cookie.json");
        fs::write(&path, r#"{"cookies":[{"name":"other","value":"x"}]}"#).expect("write");
        let err = resolve_session(None, None, Some(&path)).expect_err("no session");
        assert_eq!(err.kind(), ErrorKind::Permission);
    }

    #[test]
    fn missing_cookie_file_is_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = resolve_session(None, None, Some(&dir.path().join("absent.json")))
            .expect_err("no file");
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.hint().is_some());
    }
}
