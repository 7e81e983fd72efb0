use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use sitegen::config::Config;
use sitegen::server;
use sitegen::service::WebsiteService;

#[derive(Debug, Parser)]
#[command(name = "sitegen", version, about = "Generate HTML websites from a description")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP API (default)
    Serve {
        /// host:port, overrides server.bind
        #[arg(long)]
        bind: Option<String>,
    },
    /// Generate a website and print it as JSON, or write the HTML to a file
    Generate {
        prompt: String,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Simulate a deployment of previously generated HTML
    Deploy {
        #[arg(long)]
        code_file: PathBuf,
        #[arg(long)]
        prompt: String,
    },
    /// Check that the model service answers
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays clean for command output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load();
    let service = Arc::new(WebsiteService::new(&config)?);

    match cli.command.unwrap_or(Command::Serve { bind: None }) {
        Command::Serve { bind } => {
            let bind = bind.unwrap_or_else(|| config.server.bind.clone());
            server::serve(service, &config, &bind).await
        }
        Command::Generate { prompt, out } => {
            let document = service.generate(&prompt).await?;
            match out {
                Some(path) => {
                    std::fs::write(&path, &document.html)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    tracing::info!("Wrote generated website to {}", path.display());
                }
                None => println!("{}", serde_json::to_string_pretty(&document)?),
            }
            Ok(())
        }
        Command::Deploy { code_file, prompt } => {
            let code = std::fs::read_to_string(&code_file)
                .with_context(|| format!("Failed to read {}", code_file.display()))?;
            let record = service.deploy(&code, &prompt)?;
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(())
        }
        Command::Check => {
            let check = service.check_model().await?;
            println!("{}", serde_json::to_string_pretty(&check)?);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_defaults_to_serve() {
        let cli = Cli::try_parse_from(["sitegen"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_serve_bind() {
        let cli = Cli::try_parse_from(["sitegen", "serve", "--bind", "0.0.0.0:9000"]).unwrap();
        match cli.command {
            Some(Command::Serve { bind }) => assert_eq!(bind.as_deref(), Some("0.0.0.0:9000")),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_generate_args() {
        let cli =
            Cli::try_parse_from(["sitegen", "generate", "a bakery", "--out", "site.html"]).unwrap();
        match cli.command {
            Some(Command::Generate { prompt, out }) => {
                assert_eq!(prompt, "a bakery");
                assert_eq!(out, Some(PathBuf::from("site.html")));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_deploy_args() {
        let cli = Cli::try_parse_from([
            "sitegen",
            "deploy",
            "--code-file",
            "x.html",
            "--prompt",
            "a cafe",
        ])
        .unwrap();
        match cli.command {
            Some(Command::Deploy { code_file, prompt }) => {
                assert_eq!(code_file, PathBuf::from("x.html"));
                assert_eq!(prompt, "a cafe");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_deploy_requires_prompt() {
        assert!(Cli::try_parse_from(["sitegen", "deploy", "--code-file", "x.html"]).is_err());
        assert!(Cli::try_parse_from(["sitegen", "generate"]).is_err());
    }

    #[test]
    fn test_check_takes_no_args() {
        let cli = Cli::try_parse_from(["sitegen", "check"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Check)));
        assert!(Cli::try_parse_from(["sitegen", "check", "extra"]).is_err());
    }
}
