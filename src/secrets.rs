//! Secrets and OAuth credentials carried in the environment
//!
//! `taskdeck setup` writes them into `.env.local`; the server reads them back
//! through `dotenvy` at startup.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

pub const SECRET_KEY: &str = "TASKDECK_SECRET";
pub const URL_KEY: &str = "TASKDECK_URL";
pub const GOOGLE_ID_KEY: &str = "GOOGLE_CLIENT_ID";
pub const GOOGLE_SECRET_KEY: &str = "GOOGLE_CLIENT_SECRET";
pub const GITHUB_ID_KEY: &str = "GITHUB_CLIENT_ID";
pub const GITHUB_SECRET_KEY: &str = "GITHUB_CLIENT_SECRET";

/// Files read at startup, most specific first. Values already in the
/// process environment are never overridden.
pub const ENV_FILES: [&str; 2] = [".env.local", ".env"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl OAuthCredentials {
    /// Both halves present and non-empty
    fn from_pair(id: Option<String>, secret: Option<String>) -> Option<Self> {
        match (id, secret) {
            (Some(client_id), Some(client_secret))
                if !client_id.trim().is_empty() && !client_secret.trim().is_empty() =>
            {
                Some(Self {
                    client_id,
                    client_secret,
                })
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Secrets {
    pub session_secret: Option<String>,
    pub app_url: Option<String>,
    pub google: Option<OAuthCredentials>,
    pub github: Option<OAuthCredentials>,
}

impl Secrets {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            session_secret: non_empty(SECRET_KEY),
            app_url: non_empty(URL_KEY),
            google: OAuthCredentials::from_pair(non_empty(GOOGLE_ID_KEY), non_empty(GOOGLE_SECRET_KEY)),
            github: OAuthCredentials::from_pair(non_empty(GITHUB_ID_KEY), non_empty(GITHUB_SECRET_KEY)),
        }
    }
}

/// Outcome of reading the env files, reported once logging is up
#[derive(Debug, Default)]
pub struct DotenvReport {
    pub loaded: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

impl DotenvReport {
    pub fn log(&self) {
        for path in &self.loaded {
            debug!(path = %path.display(), "loaded environment file");
        }
        for (path, error) in &self.failed {
            warn!(path = %path.display(), error = %error, "failed to load environment file");
        }
    }
}

/// Load `.env.local` then `.env` from `dir`; missing files are skipped
pub fn load_dotenv(dir: &Path) -> DotenvReport {
    let mut report = DotenvReport::default();
    for name in ENV_FILES {
        let path = dir.join(name);
        match dotenvy::from_path(&path) {
            Ok(()) => report.loaded.push(path),
            Err(e) if e.not_found() => {}
            Err(e) => report.failed.push((path, e.to_string())),
        }
    }
    report
}

/// Random 64-character hex secret
pub fn generate_secret() -> std::io::Result<String> {
    let mut bytes = [0u8; 32];
    getrandom::getrandom(&mut bytes).map_err(|e| std::io::Error::other(e.to_string()))?;
    Ok(hex::encode(bytes))
}

/// Content of `.env.local`
pub fn render_env_file(secret: &str, app_url: &str, secrets: &Secrets) -> String {
    let mut out = format!("{}={}\n{}={}\n", URL_KEY, app_url, SECRET_KEY, secret);
    if let Some(google) = &secrets.google {
        out.push_str(&format!(
            "\n# Google OAuth\n{}={}\n{}={}\n",
            GOOGLE_ID_KEY, google.client_id, GOOGLE_SECRET_KEY, google.client_secret
        ));
    }
    if let Some(github) = &secrets.github {
        out.push_str(&format!(
            "\n# GitHub OAuth\n{}={}\n{}={}\n",
            GITHUB_ID_KEY, github.client_id, GITHUB_SECRET_KEY, github.client_secret
        ));
    }
    out
}

/// Content of `.env.example`: same keys, placeholder values
pub fn render_env_example(app_url: &str, secrets: &Secrets) -> String {
    let placeholders = Secrets {
        google: secrets.google.as_ref().map(|_| OAuthCredentials {
            client_id: "your-google-client-id".to_string(),
            client_secret: "your-google-client-secret".to_string(),
        }),
        github: secrets.github.as_ref().map(|_| OAuthCredentials {
            client_id: "your-github-client-id".to_string(),
            client_secret: "your-github-client-secret".to_string(),
        }),
        ..Secrets::default()
    };
    render_env_file("your-session-secret-here", app_url, &placeholders)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_oauth_requires_both_halves() {
        let secrets = Secrets::from_lookup(lookup(&[
            (GOOGLE_ID_KEY, "gid"),
            (GITHUB_ID_KEY, "hid"),
            (GITHUB_SECRET_KEY, "hsecret"),
            (SECRET_KEY, "  "),
        ]));
        assert!(secrets.google.is_none());
        assert_eq!(
            secrets.github,
            Some(OAuthCredentials {
                client_id: "hid".to_string(),
                client_secret: "hsecret".to_string(),
            })
        );
        assert!(secrets.session_secret.is_none());
    }

    #[test]
    fn test_generate_secret_is_hex() {
        let secret = generate_secret().unwrap();
        assert_eq!(secret.len(), 64);
        assert!(secret.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(secret, generate_secret().unwrap());
    }

    #[test]
    fn test_env_file_only_lists_configured_providers() {
        let secrets = Secrets {
            github: Some(OAuthCredentials {
                client_id: "Iv1.abc".to_string(),
                client_secret: "shh".to_string(),
            }),
            ..Secrets::default()
        };
        let content = render_env_file("s3cret", "http://localhost:3000", &secrets);
        assert!(content.starts_with("TASKDECK_URL=http://localhost:3000\nTASKDECK_SECRET=s3cret\n"));
        assert!(content.contains("GITHUB_CLIENT_ID=Iv1.abc"));
        assert!(!content.contains("GOOGLE_CLIENT_ID"));

        let example = render_env_example("http://localhost:3000", &secrets);
        assert!(example.contains("TASKDECK_SECRET=your-session-secret-here"));
        assert!(example.contains("GITHUB_CLIENT_SECRET=your-github-client-secret"));
        assert!(!example.contains("shh"));
    }

    #[test]
    fn test_malformed_env_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".env.local"), "this line has no equals sign\n").unwrap();

        let report = load_dotenv(dir.path());
        assert!(report.loaded.is_empty());
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, dir.path().join(".env.local"));
    }

    #[test]
    fn test_missing_env_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let report = load_dotenv(dir.path());
        assert!(report.loaded.is_empty());
        assert!(report.failed.is_empty());
    }

    #[test]
    fn test_rendered_file_parses_back() {
        let dir = tempfile::tempdir().unwrap();
        let secrets = Secrets {
            google: Some(OAuthCredentials {
                client_id: "gid.apps.googleusercontent.com".to_string(),
                client_secret: "GOCSPX-xyz".to_string(),
            }),
            ..Secrets::default()
        };
        let path = dir.path().join(".env.local");
        std::fs::write(&path, render_env_file("abc123", "http://localhost:3000", &secrets)).unwrap();

        let parsed: HashMap<String, String> = dotenvy::from_path_iter(&path)
            .unwrap()
            .map(|item| item.unwrap())
            .collect();
        let round = Secrets::from_lookup(|key| parsed.get(key).cloned());
        assert_eq!(round.session_secret.as_deref(), Some("abc123"));
        assert_eq!(round.google, secrets.google);
    }
}
