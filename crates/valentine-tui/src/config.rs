use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use valentine_core::{Content, ContentError, DEFAULT_HEART_COUNT};

/// A little interactive Valentine, in your terminal
#[derive(Debug, Parser)]
#[command(name = "valentine", version, about)]
pub struct Args {
    /// Recipient name, overrides the one in the content file
    #[arg(long)]
    pub name: Option<String>,

    /// JSON file with the texts to show
    #[arg(long, value_name = "PATH")]
    pub content: Option<PathBuf>,

    /// Seed for the dodging button and the background hearts
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of background hearts (0 turns them off)
    #[arg(long, default_value_t = DEFAULT_HEART_COUNT)]
    pub hearts: usize,

    /// Only move the "no" button when it is activated, not when hovered
    #[arg(long)]
    pub no_hover_dodge: bool,

    /// Write logs to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Print the effective content as JSON and exit
    #[arg(long)]
    pub print_content: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("bad content in {path}: {source}")]
    Content {
        path: PathBuf,
        #[source]
        source: ContentError,
    },
    #[error("--name cannot be blank")]
    BlankName,
}

/// Settings for one run
#[derive(Debug, Clone)]
pub struct Config {
    pub content: Content,
    pub seed: Option<u64>,
    pub heart_count: usize,
    pub hover_dodge: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            content: Content::default(),
            seed: None,
            heart_count: DEFAULT_HEART_COUNT,
            hover_dodge: true,
        }
    }
}

impl Config {
    /// Build the config from CLI arguments, reading the content file if any.
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let path = args.content.clone().or_else(default_content_path);
        let mut content = match path {
            Some(path) => load_content(&path)?,
            None => Content::default(),
        };

        if let Some(name) = &args.name {
            if name.trim().is_empty() {
                return Err(ConfigError::BlankName);
            }
            content = content.with_name(name);
        }

        Ok(Self {
            content,
            seed: args.seed,
            heart_count: args.hearts,
            hover_dodge: !args.no_hover_dodge,
        })
    }
}

/// `<config_dir>/valentine/content.json`, if it exists.
pub fn default_content_path() -> Option<PathBuf> {
    let path = dirs::config_dir()?.join("valentine").join("content.json");
    path.is_file().then_some(path)
}

pub fn load_content(path: &Path) -> Result<Content, ConfigError> {
    let json = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let content = Content::from_json(&json).map_err(|source| ConfigError::Content {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!(
        "loaded content for {} from {}",
        content.name,
        path.display()
    );
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(argv: &[&str]) -> Args {
        Args::parse_from(std::iter::once("valentine").chain(argv.iter().copied()))
    }

    fn temp_file(name: &str, body: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("valentine-{}-{}", std::process::id(), name));
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_flags() {
        let args = parse(&[
            "--seed",
            "7",
            "--hearts",
            "0",
            "--no-hover-dodge",
            "--name",
            "Sam",
        ]);
        assert_eq!(args.seed, Some(7));
        assert_eq!(args.hearts, 0);
        assert!(args.no_hover_dodge);
        assert_eq!(args.name.as_deref(), Some("Sam"));
    }

    #[test]
    fn test_defaults() {
        let args = parse(&[]);
        assert_eq!(args.hearts, DEFAULT_HEART_COUNT);
        assert!(!args.no_hover_dodge);
        assert!(args.content.is_none());
    }

    #[test]
    fn test_name_override() {
        let path = temp_file("name.json", r#"{ "name": "Ini" }"#);
        let args = parse(&["--content", path.to_str().unwrap(), "--name", "Sam"]);
        let config = Config::from_args(&args).unwrap();
        assert_eq!(config.content.name, "Sam");
        assert!(config.hover_dodge);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_blank_name_rejected() {
        let path = temp_file("blank.json", "{}");
        let args = parse(&["--content", path.to_str().unwrap(), "--name", "  "]);
        let result = Config::from_args(&args);
        assert!(matches!(result, Err(ConfigError::BlankName)));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_missing_file() {
        let err = load_content(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_invalid_content_file() {
        let path = temp_file("invalid.json", r#"{ "reasons": [] }"#);
        let err = load_content(&path).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Content {
                source: ContentError::NoReasons,
                ..
            }
        ));
        let _ = fs::remove_file(path);
    }
}
