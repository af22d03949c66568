//! `taskdeck setup`: interactive environment wizard
//!
//! Generates a session secret, walks through optional Google and GitHub OAuth
//! registration, and writes `.env.local` plus a placeholder `.env.example`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use console::style;
use dialoguer::{Confirm, Input};

use crate::secrets::{self, OAuthCredentials, Secrets};
use crate::storage::config;

const DEFAULT_APP_URL: &str = "http://localhost:3000";

// ─── Output ──────────────────────────────────────────────────────────────────

fn info(msg: &str) {
    println!("{} {}", style("[INFO]").cyan(), msg);
}

fn success(msg: &str) {
    println!("{} {}", style("[SUCCESS]").green(), msg);
}

fn warn(msg: &str) {
    println!("{} {}", style("[WARNING]").yellow(), msg);
}

fn error(msg: &str) {
    println!("{} {}", style("[ERROR]").red(), msg);
}

fn step(msg: &str) {
    println!(
        "\n{} {} {}\n",
        style("===").blue().bold(),
        msg,
        style("===").blue().bold()
    );
}

fn header(msg: &str) {
    let line = "=".repeat(msg.len() + 8);
    println!("\n{}", style(&line).magenta());
    println!(
        "{}{}{}",
        style("===  ").magenta(),
        style(msg).magenta().bold(),
        style("  ===").magenta()
    );
    println!("{}\n", style(&line).magenta());
}

fn divider() {
    println!("\n{}\n", "-".repeat(50));
}

// ─── OAuth guides ────────────────────────────────────────────────────────────

struct GuideStep {
    title: &'static str,
    lines: &'static [&'static str],
}

struct OAuthGuide {
    name: &'static str,
    /// Path segment of the callback URL
    callback: &'static str,
    steps: &'static [GuideStep],
}

const GOOGLE: OAuthGuide = OAuthGuide {
    name: "Google",
    callback: "google",
    steps: &[
        GuideStep {
            title: "Step 1: Create a Google Cloud Project",
            lines: &[
                "1. Go to https://console.cloud.google.com/",
                "2. Click \"Select a project\", then \"NEW PROJECT\"",
                "3. Enter a project name (e.g. \"Admin Dashboard\") and click \"CREATE\"",
            ],
        },
        GuideStep {
            title: "Step 2: Configure OAuth Consent Screen",
            lines: &[
                "1. Go to https://console.cloud.google.com/apis/credentials/consent",
                "2. Choose \"External\" (Gmail accounts) or \"Internal\" (Google Workspace)",
                "3. Fill in app name, support email and developer contact",
                "4. Add the scopes userinfo.email, userinfo.profile and openid",
                "5. For External apps, add your own email as a test user",
            ],
        },
        GuideStep {
            title: "Step 3: Create OAuth Client ID",
            lines: &[
                "1. Go to https://console.cloud.google.com/apis/credentials",
                "2. Click \"CREATE CREDENTIALS\" > \"OAuth client ID\"",
                "3. Application type: \"Web application\"",
                "4. Add the authorized origin and redirect URI shown below",
                "5. Click \"CREATE\" and copy the client ID and client secret",
            ],
        },
    ],
};

const GITHUB: OAuthGuide = OAuthGuide {
    name: "GitHub",
    callback: "github",
    steps: &[GuideStep {
        title: "Step 1: Register a GitHub OAuth App",
        lines: &[
            "1. Go to https://github.com/settings/developers",
            "2. Click \"OAuth Apps\", then \"New OAuth App\"",
            "3. Homepage URL and callback URL: see below",
            "4. Click \"Register application\" and note the Client ID",
            "5. Click \"Generate a new client secret\" and copy it",
        ],
    }],
};

fn callback_url(app_url: &str, provider: &str) -> String {
    format!(
        "{}/api/auth/callback/{}",
        app_url.trim_end_matches('/'),
        provider
    )
}

fn prompt_enter(prompt: &str) -> Result<()> {
    Input::<String>::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
        .context("Failed to read input")?;
    Ok(())
}

/// Guided registration for one provider. `None` when skipped or incomplete.
fn collect_oauth(guide: &OAuthGuide, app_url: &str) -> Result<Option<OAuthCredentials>> {
    header(&format!("Setting up {} OAuth", guide.name));
    let wanted = Confirm::new()
        .with_prompt(format!(
            "Do you want to set up {} OAuth authentication?",
            guide.name
        ))
        .default(false)
        .interact()
        .context("Failed to read confirmation")?;
    if !wanted {
        info(&format!("Skipping {} OAuth setup.", guide.name));
        return Ok(None);
    }

    for guide_step in guide.steps {
        step(guide_step.title);
        for line in guide_step.lines {
            info(line);
        }
        prompt_enter("Press Enter when done")?;
    }
    info(&format!("Authorized origin:  {}", app_url));
    info(&format!(
        "Redirect/callback:  {}",
        callback_url(app_url, guide.callback)
    ));

    let client_id: String = Input::new()
        .with_prompt(format!("Enter your {} OAuth Client ID", guide.name))
        .allow_empty(true)
        .interact_text()
        .context("Failed to read client id")?;
    let client_secret: String = Input::new()
        .with_prompt(format!("Enter your {} OAuth Client Secret", guide.name))
        .allow_empty(true)
        .interact_text()
        .context("Failed to read client secret")?;

    if client_id.trim().is_empty() || client_secret.trim().is_empty() {
        error("Client ID and Secret are required; skipping this provider.");
        return Ok(None);
    }
    success(&format!("{} OAuth credentials saved.", guide.name));
    Ok(Some(OAuthCredentials {
        client_id: client_id.trim().to_string(),
        client_secret: client_secret.trim().to_string(),
    }))
}

/// Write `.env.local` and `.env.example` into `dir`
pub fn write_env_files(
    dir: &Path,
    secret: &str,
    app_url: &str,
    secrets: &Secrets,
) -> Result<(PathBuf, PathBuf)> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    let env_file = dir.join(secrets::ENV_FILES[0]);
    let example_file = dir.join(".env.example");

    fs::write(&env_file, secrets::render_env_file(secret, app_url, secrets))
        .with_context(|| format!("Failed to write {}", env_file.display()))?;
    fs::write(&example_file, secrets::render_env_example(app_url, secrets))
        .with_context(|| format!("Failed to write {}", example_file.display()))?;
    Ok((env_file, example_file))
}

fn run_wizard(dir: &Path) -> Result<()> {
    header("taskdeck Setup");
    info("This wizard configures authentication for the taskdeck dashboard.");
    divider();

    let secret = secrets::generate_secret().context("Failed to generate session secret")?;
    success("Generated session secret.");

    let app_url: String = Input::new()
        .with_prompt("Application URL")
        .default(DEFAULT_APP_URL.to_string())
        .interact_text()
        .context("Failed to read application URL")?;

    let secrets = Secrets {
        google: collect_oauth(&GOOGLE, &app_url)?,
        github: collect_oauth(&GITHUB, &app_url)?,
        ..Secrets::default()
    };
    if secrets.google.is_none() && secrets.github.is_none() {
        warn("No OAuth provider configured; only email/password sign-in will be offered.");
    }

    step("Setting up environment variables");
    let (env_file, example_file) = write_env_files(dir, &secret, &app_url, &secrets)?;
    success(&format!(
        "Environment variables written to {}",
        env_file.display()
    ));
    success(&format!(
        "Example environment created at {}",
        example_file.display()
    ));

    let config_path = config::config_path();
    if !config_path.exists() {
        config::save_config(&config::Config::default())
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
        info(&format!("Default settings written to {}", config_path.display()));
    }

    divider();
    success("Setup completed successfully!");
    info("You can now start the dashboard with:");
    println!("\n  taskdeck web\n");
    Ok(())
}

/// Run the wizard; returns the process exit code
pub fn execute(dir: &Path) -> i32 {
    match run_wizard(dir) {
        Ok(()) => 0,
        Err(e) => {
            error(&format!("Setup failed: {:#}", e));
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_env_files() {
        let dir = tempfile::tempdir().unwrap();
        let secrets = Secrets {
            github: Some(OAuthCredentials {
                client_id: "Iv1.123".to_string(),
                client_secret: "gh-secret".to_string(),
            }),
            ..Secrets::default()
        };
        let target = dir.path().join("app");
        let (env_file, example_file) =
            write_env_files(&target, "deadbeef", DEFAULT_APP_URL, &secrets).unwrap();

        let env = fs::read_to_string(&env_file).unwrap();
        assert!(env.contains("TASKDECK_SECRET=deadbeef"));
        assert!(env.contains("GITHUB_CLIENT_SECRET=gh-secret"));

        let example = fs::read_to_string(&example_file).unwrap();
        assert!(!example.contains("deadbeef"));
        assert!(!example.contains("gh-secret"));
        assert!(example.contains("GITHUB_CLIENT_ID=your-github-client-id"));
    }

    #[test]
    fn test_callback_url() {
        assert_eq!(
            callback_url("http://localhost:3000/", "google"),
            "http://localhost:3000/api/auth/callback/google"
        );
    }
}
