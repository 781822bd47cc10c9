use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::{AppServices, Clock};
use storage::media::{LocalMediaStore, MediaStore};
use storage::repository::Storage;
use storage::seed::{seed_catalog, seed_demo_content};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use typus_core::SkillCatalog;
use ui::{App, UiApp, build_app_context};
use url::Url;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidMediaBaseUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidMediaBaseUrl { raw } => {
                write!(f, "invalid --media-base-url value: {raw}")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- ui   [--db <sqlite_url>] [--media-dir <path>] [--media-base-url <url>]");
    eprintln!("  cargo run -p app -- seed [--db <sqlite_url>] [--with-demo-videos]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite://dev.sqlite3");
    eprintln!("  --media-dir media");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  TYPUS_DB_URL, TYPUS_MEDIA_DIR, TYPUS_MEDIA_BASE_URL, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Seed,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "seed" => Some(Self::Seed),
            _ => None,
        }
    }
}

struct Args {
    db_url: String,
    media_dir: PathBuf,
    media_base_url: Option<Url>,
    with_demo_videos: bool,
}

impl Args {
    fn from_env() -> Result<Self, ArgsError> {
        let db_url = std::env::var("TYPUS_DB_URL")
            .ok()
            .map_or_else(|| "sqlite://dev.sqlite3".into(), normalize_sqlite_url);
        let media_dir = std::env::var("TYPUS_MEDIA_DIR")
            .map_or_else(|_| PathBuf::from("media"), PathBuf::from);
        let media_base_url = std::env::var("TYPUS_MEDIA_BASE_URL")
            .ok()
            .map(parse_media_base_url)
            .transpose()?;

        Ok(Self {
            db_url,
            media_dir,
            media_base_url,
            with_demo_videos: false,
        })
    }

    fn parse(cmd: Command, args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut parsed = Self::from_env()?;

        while let Some(arg) = args.next() {
            match (cmd, arg.as_str()) {
                (_, "--db") => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    parsed.db_url = normalize_sqlite_url(value);
                }
                (Command::Ui, "--media-dir") => {
                    parsed.media_dir = PathBuf::from(require_value(args, "--media-dir")?);
                }
                (Command::Ui, "--media-base-url") => {
                    let value = require_value(args, "--media-base-url")?;
                    parsed.media_base_url = Some(parse_media_base_url(value)?);
                }
                (Command::Seed, "--with-demo-videos") => parsed.with_demo_videos = true,
                (_, "--help" | "-h") => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(parsed)
    }
}

fn parse_media_base_url(raw: String) -> Result<Url, ArgsError> {
    // Object names are joined onto the base, which needs a trailing slash.
    let with_slash = if raw.ends_with('/') {
        raw.clone()
    } else {
        format!("{raw}/")
    };
    Url::parse(&with_slash).map_err(|_| ArgsError::InvalidMediaBaseUrl { raw })
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    format!("sqlite://{}", absolute(Path::new(&path_str)).display())
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    }
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

fn media_store(args: &Args) -> Result<Arc<dyn MediaStore>, Box<dyn std::error::Error>> {
    let root = absolute(&args.media_dir);
    std::fs::create_dir_all(&root)?;
    let store = match &args.media_base_url {
        Some(base_url) => LocalMediaStore::new(root, base_url.clone()),
        None => LocalMediaStore::with_file_urls(root)?,
    };
    Ok(Arc::new(store))
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "app=info,services=info,storage=info,ui=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // No subcommand launches the UI.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Ui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(cmd, &mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    prepare_sqlite_file(&parsed.db_url)?;

    match cmd {
        Command::Ui => {
            let media = media_store(&parsed)?;
            let services = AppServices::new_sqlite(&parsed.db_url, media, Clock::system()).await?;
            tracing::info!(db = %parsed.db_url, "storage ready");

            let app: Arc<dyn UiApp> = Arc::new(services);
            let context = build_app_context(&app);

            // Some dev setups default to an always-on-top window.
            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("Typus")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
        Command::Seed => {
            let storage = Storage::sqlite(&parsed.db_url).await?;
            let catalog = seed_catalog(&storage, &SkillCatalog::builtin()).await?;
            println!(
                "catalog: {} sports, {} skills",
                catalog.sports, catalog.skills
            );
            if parsed.with_demo_videos {
                let demo = seed_demo_content(&storage).await?;
                println!(
                    "demo content: {} videos, {} trainers",
                    demo.videos, demo.trainers
                );
            }
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    if let Err(err) = run().await {
        tracing::error!(error = %err, "fatal");
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_urls_pass_through() {
        assert_eq!(normalize_sqlite_url("sqlite::memory:".into()), "sqlite::memory:");
        assert_eq!(
            normalize_sqlite_url("sqlite:///tmp/typus.db".into()),
            "sqlite:///tmp/typus.db"
        );
    }

    #[test]
    fn bare_paths_become_absolute_urls() {
        let url = normalize_sqlite_url("data/typus.db".into());
        assert!(url.starts_with("sqlite:///"), "{url}");
        assert!(url.ends_with("data/typus.db"), "{url}");
    }

    #[test]
    fn media_base_url_gets_trailing_slash() {
        let url = parse_media_base_url("https://cdn.example.com/videos".into()).unwrap();
        assert_eq!(url.as_str(), "https://cdn.example.com/videos/");
        assert!(parse_media_base_url("not a url".into()).is_err());
    }

    #[test]
    fn seed_only_flags_are_rejected_for_ui() {
        let mut args = vec!["--with-demo-videos".to_string()].into_iter();
        let err = Args::parse(Command::Ui, &mut args).err().unwrap();
        assert!(matches!(err, ArgsError::UnknownArg(_)));
    }
}
