//! ghvault-auth - store the GitHub token used by ghvault tools
//!
//! Commands:
//! - login: Validate a fine-grained token and store it
//! - logout: Remove the token from every tier
//! - status: Show where the token lives (masked)
//! - token: Print the raw token for piping

use anyhow::{bail, Context, Result};
use auth::{policy, CredentialStore, StorageLocation};
use clap::{Parser, Subcommand};
use ghvault_core::{Paths, Settings};
use std::io::Read;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ghvault-auth")]
#[command(about = "Store the GitHub token used by ghvault in the OS secret store")]
#[command(version)]
#[command(after_help = r#"TOKENS:
    Only fine-grained personal access tokens (github_pat_...) are accepted.
    Classic tokens (ghp_...) are rejected: their scopes cannot be limited
    to individual repositories.

STORAGE:
    - Default: OS secret store (Keychain, Credential Manager, Secret Service)
    - --insecure-storage: ~/.config/ghvault/token, mode 0600
    - Set `storage: file` in ~/.config/ghvault/config.yaml to make the file the default
    - GHVAULT_CONFIG_DIR overrides the config directory"#)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate and store a token (prompts securely unless --with-token)
    Login {
        /// Read the token from standard input
        #[arg(long)]
        with_token: bool,
        /// Store in a plaintext file instead of the OS secret store
        #[arg(long)]
        insecure_storage: bool,
    },

    /// Remove the stored token from every tier
    Logout,

    /// Show where the token is stored
    Status {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Print the stored token
    Token,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let paths = Paths::new();
    let store = CredentialStore::open(&paths);

    run(cli.command, &paths, &store)
}

/// Dispatch a command. Settings are only read by `login`, so a broken
/// config file never blocks logout or status.
fn run(command: Option<Commands>, paths: &Paths, store: &CredentialStore) -> Result<()> {
    match command {
        Some(Commands::Login {
            with_token,
            insecure_storage,
        }) => {
            let settings = Settings::load(paths)?;
            let raw = read_token(with_token)?;
            let skip_vault = insecure_storage || settings.prefers_file();
            cmd_login(store, paths, &raw, skip_vault)
        }
        Some(Commands::Logout) => cmd_logout(store),
        Some(Commands::Status { json }) => cmd_status(store, json),
        Some(Commands::Token) => cmd_token(store),
        None => cmd_status(store, false),
    }
}

/// Read the token from stdin or a hidden prompt
fn read_token(from_stdin: bool) -> Result<String> {
    let raw = if from_stdin {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read token from stdin")?;
        buf
    } else {
        rpassword::prompt_password("Paste your fine-grained personal access token: ")
            .context("Failed to read token")?
    };

    let raw = raw.trim().to_string();
    if raw.is_empty() {
        bail!("No token provided");
    }
    Ok(raw)
}

/// Validate and store a token
fn cmd_login(store: &CredentialStore, paths: &Paths, raw: &str, skip_vault: bool) -> Result<()> {
    let token = policy::check(raw)?;
    store.set(&token, skip_vault)?;

    if skip_vault {
        println!(
            "warning: Token stored in plaintext at {}",
            paths.token_file().display()
        );
    } else {
        println!("success: Token stored in the OS secret store");
    }

    Ok(())
}

/// Remove the token
fn cmd_logout(store: &CredentialStore) -> Result<()> {
    let failures = store.delete();
    if failures.is_empty() {
        println!("success: Logged out");
        return Ok(());
    }

    for failure in &failures {
        println!("warning: {}", failure);
    }
    println!("warning: Logout incomplete - a token copy may still be stored");
    Ok(())
}

/// Show token location
fn cmd_status(store: &CredentialStore, json: bool) -> Result<()> {
    let found = store.lookup()?;

    if json {
        let status = match &found {
            Some((token, location)) => serde_json::json!({
                "logged_in": true,
                "location": location,
                "type": token.token_type(),
                "token": token.masked(),
            }),
            None => serde_json::json!({
                "logged_in": false,
                "location": StorageLocation::None,
            }),
        };
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    match found {
        Some((token, location)) => {
            println!("Logged in");
            println!("  Storage: {}", location);
            println!("  Type:    {}", token.token_type());
            println!("  Token:   {}", token.masked());
        }
        None => {
            println!("Not logged in. Store a token with: ghvault-auth login");
        }
    }

    Ok(())
}

/// Print the raw token
fn cmd_token(store: &CredentialStore) -> Result<()> {
    match store.get()? {
        Some(token) => {
            println!("{}", token.expose());
            Ok(())
        }
        None => bail!("Not logged in. Store a token with: ghvault-auth login"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auth::{CredentialBackend, CredentialError, FileBackend, MemoryBackend, Token};

    fn memory_store() -> (CredentialStore, MemoryBackend, tempfile::TempDir, Paths) {
        let dir = tempfile::tempdir().unwrap();
        let paths = Paths::rooted(dir.path());
        let vault = MemoryBackend::new();
        let store = CredentialStore::new(vault.clone(), FileBackend::new(paths.token_file()));
        (store, vault, dir, paths)
    }

    #[test]
    fn test_cli_parse() {
        let cli = Cli::try_parse_from(["ghvault-auth", "login"]).unwrap();
        if let Some(Commands::Login {
            with_token,
            insecure_storage,
        }) = cli.command
        {
            assert!(!with_token);
            assert!(!insecure_storage);
        } else {
            panic!("Expected Login command");
        }

        let cli = Cli::try_parse_from([
            "ghvault-auth",
            "login",
            "--with-token",
            "--insecure-storage",
        ])
        .unwrap();
        if let Some(Commands::Login {
            with_token,
            insecure_storage,
        }) = cli.command
        {
            assert!(with_token);
            assert!(insecure_storage);
        } else {
            panic!("Expected Login command");
        }

        let cli = Cli::try_parse_from(["ghvault-auth", "status", "--json"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Status { json: true })));

        let cli = Cli::try_parse_from(["ghvault-auth"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_rejects_token_argument() {
        // Tokens on the command line end up in shell history
        assert!(Cli::try_parse_from(["ghvault-auth", "login", "github_pat_x"]).is_err());
    }

    #[test]
    fn test_login_stores_in_vault() {
        let (store, vault, _dir, paths) = memory_store();
        let raw = format!("github_pat_{}", "A".repeat(22));

        cmd_login(&store, &paths, &raw, false).unwrap();
        assert_eq!(vault.peek().unwrap().expose(), raw);
        assert!(!paths.token_file().exists());
    }

    #[test]
    fn test_login_insecure_storage_writes_file() {
        let (store, vault, _dir, paths) = memory_store();
        let raw = format!("github_pat_{}", "B".repeat(22));

        cmd_login(&store, &paths, &raw, true).unwrap();
        assert!(vault.peek().is_none());
        assert_eq!(
            std::fs::read_to_string(paths.token_file()).unwrap(),
            format!("{}\n", raw)
        );
    }

    #[test]
    fn test_login_rejects_classic_before_storage() {
        let (store, vault, _dir, paths) = memory_store();
        let raw = format!("ghp_{}", "a".repeat(36));

        let err = cmd_login(&store, &paths, &raw, false).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CredentialError>(),
            Some(CredentialError::PolicyRejected(_))
        ));
        assert!(vault.peek().is_none());
        assert!(!paths.token_file().exists());
    }

    #[test]
    fn test_token_command_when_logged_out() {
        let (store, _vault, _dir, _paths) = memory_store();
        assert!(cmd_token(&store).is_err());
        cmd_logout(&store).unwrap();
        cmd_status(&store, true).unwrap();
    }

    #[test]
    fn test_logout_ignores_broken_settings() {
        let (store, _vault, _dir, paths) = memory_store();
        let token = Token::new(format!("github_pat_{}", "C".repeat(22)));
        FileBackend::new(paths.token_file()).set(&token).unwrap();
        std::fs::write(paths.settings_file(), "storage: floppy\n").unwrap();
        assert!(Settings::load(&paths).is_err());

        run(Some(Commands::Status { json: false }), &paths, &store).unwrap();
        run(Some(Commands::Logout), &paths, &store).unwrap();
        assert!(!paths.token_file().exists());
        assert!(store.get().unwrap().is_none());
    }

    #[test]
    fn test_logout_completes_when_a_tier_cannot_be_cleared() {
        let (store, vault, _dir, paths) = memory_store();
        vault.set(&Token::new(format!("github_pat_{}", "D".repeat(22)))).unwrap();
        // A non-empty directory where the token file should be
        std::fs::create_dir_all(paths.token_file().join("blocker")).unwrap();

        cmd_logout(&store).unwrap();
        assert!(vault.peek().is_none());
        assert!(paths.token_file().exists());
    }
}
