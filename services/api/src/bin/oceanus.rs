//! services/api/src/bin/oceanus.rs
//!
//! Terminal client. Keeps the session in a file between invocations and runs
//! the route guard on every `open`.

use api_lib::{
    adapters::FileSessionStorage,
    client::{ApiClient, OceanusClient},
    config::ClientConfig,
    error::ApiError,
};
use clap::{Parser, Subcommand};
use oceanus_core::access::Navigation;
use oceanus_core::upload::{UploadFile, UploadForm};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Oceanus terminal client
#[derive(Parser, Debug)]
#[command(name = "oceanus")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
    /// Log in and print the landing route
    Login {
        email: String,
        password: String,
        /// Keep the session for seven days instead of one hour
        #[arg(long)]
        remember: bool,
    },
    /// Drop the stored session
    Logout,
    /// Show the user behind the stored session
    Whoami,
    /// Exchange the stored token for a fresh one
    Refresh,
    /// Run the route guard for a path
    Open { path: String },
    /// List the sidebar entries for the current role
    Nav,
    /// Register a dataset from local files
    Upload {
        name: String,
        location: String,
        files: Vec<PathBuf>,
        #[arg(long = "type", default_value = "oceanographic")]
        kind: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let client = OceanusClient::new(
        ApiClient::new(config.api_url.clone()),
        Arc::new(FileSessionStorage::new(config.session_file.clone())),
    );

    match run(&client, cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // One line, like a toast.
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(client: &OceanusClient, command: Command) -> Result<(), ApiError> {
    match command {
        Command::Login {
            email,
            password,
            remember,
        } => {
            let landing = client.login(&email, &password, remember).await?;
            println!("{}", landing.path());
        }
        Command::Logout => println!("{}", client.logout()?.path()),
        Command::Whoami => {
            let user = client.whoami().await?;
            println!("{} <{}> ({})", user.name, user.email, user.role);
        }
        Command::Refresh => {
            client.refresh().await?;
            println!("token refreshed");
        }
        Command::Open { path } => match client.open(&path) {
            Navigation::Render(route) => println!("render {}", route.path()),
            Navigation::Redirect(route) => println!("redirect {}", route.path()),
        },
        Command::Nav => {
            for item in client.navigation() {
                println!("{:<16} {}", item.label, item.path);
            }
        }
        Command::Upload {
            name,
            location,
            files,
            kind,
        } => {
            let form = upload_form(name, location, kind, &files)?;
            let resp = client.upload(form).await?;
            println!(
                "{}: {} ({})",
                resp.message, resp.dataset.id, resp.dataset.status
            );
        }
    }
    Ok(())
}

/// Sizes each file from disk. An empty selection is left for form validation to reject.
fn upload_form(
    name: String,
    location: String,
    kind: String,
    files: &[PathBuf],
) -> Result<UploadForm, ApiError> {
    let files = files
        .iter()
        .map(|path| -> Result<UploadFile, ApiError> {
            Ok(UploadFile {
                name: path.display().to_string(),
                size_bytes: std::fs::metadata(path)?.len(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(UploadForm {
        name,
        kind,
        location,
        description: None,
        files,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Result<Command, clap::Error> {
        Cli::try_parse_from(argv).map(|cli| cli.command)
    }

    #[test]
    fn login_takes_an_optional_remember_flag() {
        assert_eq!(
            parse(&["oceanus", "login", "a@b.c", "pw"]).unwrap(),
            Command::Login {
                email: "a@b.c".to_string(),
                password: "pw".to_string(),
                remember: false,
            }
        );
        assert!(matches!(
            parse(&["oceanus", "login", "a@b.c", "pw", "--remember"]).unwrap(),
            Command::Login { remember: true, .. }
        ));
    }

    #[test]
    fn misspelled_or_extra_arguments_are_rejected() {
        assert!(parse(&["oceanus", "login", "a@b.c", "pw", "--remeber"]).is_err());
        assert!(parse(&["oceanus", "login", "a@b.c", "pw", "extra"]).is_err());
        assert!(parse(&["oceanus", "logout", "now"]).is_err());
        assert!(parse(&["oceanus", "teleport"]).is_err());
    }

    #[test]
    fn upload_defaults_its_type_and_collects_files() {
        assert_eq!(
            parse(&["oceanus", "upload", "Reef", "Pacific", "a.csv", "b.csv"]).unwrap(),
            Command::Upload {
                name: "Reef".to_string(),
                location: "Pacific".to_string(),
                files: vec![PathBuf::from("a.csv"), PathBuf::from("b.csv")],
                kind: "oceanographic".to_string(),
            }
        );
        assert!(matches!(
            parse(&["oceanus", "upload", "Reef", "Pacific", "a.csv", "--type", "edna"]).unwrap(),
            Command::Upload { kind, .. } if kind == "edna"
        ));
    }

    #[test]
    fn upload_form_sizes_files_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("casts.csv");
        std::fs::write(&path, vec![0u8; 2048]).unwrap();

        let form = upload_form(
            "Arctic".to_string(),
            "Arctic Ocean".to_string(),
            "sensor".to_string(),
            &[path],
        )
        .unwrap();
        assert_eq!(form.files[0].size_bytes, 2048);

        let missing = upload_form(
            "Arctic".to_string(),
            "Arctic Ocean".to_string(),
            "sensor".to_string(),
            &[dir.path().join("missing.csv")],
        );
        assert!(matches!(missing, Err(ApiError::Io(_))));
    }
}
