use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use concierge_common::config::Config;
use concierge_common::lang::parse_language_list;
use concierge_common::telemetry::{self, TelemetryConfig};
use concierge_common::{
    HttpTranslator, IconMap, Language, LogNotifier, SequentialTranslator, TranslatedPage,
};
use concierge_editor_core::{
    Alignment, EditorState, ImageDescriptor, SelectionSpan, TextFormat, format,
};
use miette::{IntoDiagnostic, Result, WrapErr};

#[derive(Parser)]
#[command(version, about = "Concierge - content tools for the hotel guide", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to the configuration file (.toml or .json)
    #[arg(long, global = true, env = "CONCIERGE_CONFIG")]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render page content to the HTML shown to guests
    Preview {
        /// Content file, or `-` for stdin
        file: PathBuf,

        /// JSON file holding the page's image list
        #[arg(long)]
        images: Option<PathBuf>,
    },
    /// Apply a format or alignment to a character range
    Format {
        /// Content file, or `-` for stdin
        file: PathBuf,

        /// bold, italic, underline, h1, h2, bullet, or an alignment
        /// (left, center, right, justify)
        format: String,

        /// First selected character
        start: usize,

        /// One past the last selected character
        end: usize,
    },
    /// Translate a page into every configured language
    Translate {
        /// Content file, or `-` for stdin
        file: PathBuf,

        /// Page title
        #[arg(long)]
        title: String,

        /// Comma-separated language codes (defaults to the configured targets)
        #[arg(long)]
        languages: Option<String>,

        /// Language the page is written in
        #[arg(long)]
        source: Option<String>,
    },
    /// Look up the menu icon for a page title
    Icon {
        /// Page title or keyword
        keyword: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_miette();
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let mut telemetry_config = TelemetryConfig::from_env("concierge-cli");
    if cli.verbose {
        telemetry_config = telemetry_config.with_level(tracing::Level::DEBUG);
    }
    telemetry::init(telemetry_config);

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Preview { file, images } => preview(&config, &file, images.as_deref()).await?,
        Commands::Format {
            file,
            format,
            start,
            end,
        } => format_range(&file, &format, start, end).await?,
        Commands::Translate {
            file,
            title,
            languages,
            source,
        } => translate(&config, &file, title, languages, source).await?,
        Commands::Icon { keyword } => {
            let icons = IconMap::new(&config.icons)?;
            println!("{}", icons.resolve(&keyword));
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            Ok(Config::load(path)?)
        }
        None => Ok(Config::default()),
    }
}

async fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        return tokio::task::spawn_blocking(|| std::io::read_to_string(std::io::stdin()))
            .await
            .into_diagnostic()?
            .into_diagnostic()
            .wrap_err("failed to read stdin");
    }
    tokio::fs::read_to_string(path)
        .await
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to read {}", path.display()))
}

async fn preview(config: &Config, file: &Path, images: Option<&Path>) -> Result<()> {
    let content = read_input(file).await?;
    let images: Vec<ImageDescriptor> = match images {
        Some(path) => {
            let raw = read_input(path).await?;
            serde_json::from_str(&raw)
                .into_diagnostic()
                .wrap_err_with(|| format!("invalid image list in {}", path.display()))?
        }
        None => Vec::new(),
    };

    let mut editor = EditorState::new(&content, images, ()).with_config(&config.editor);
    let folded = editor.fold_inline_images();
    if folded > 0 {
        tracing::info!(folded, "converted inline images");
    }
    println!("{}", editor.render_preview());
    Ok(())
}

async fn format_range(file: &Path, name: &str, start: usize, end: usize) -> Result<()> {
    let content = read_input(file).await?;
    let (start, end) = (start.min(end), start.max(end));
    let text: String = content.chars().skip(start).take(end - start).collect();
    let span = SelectionSpan::new(start, end, text);

    let output = if let Ok(text_format) = name.parse::<TextFormat>() {
        format::apply_format(&content, text_format, &span)
    } else if let Ok(alignment) = name.parse::<Alignment>() {
        format::apply_alignment(&content, alignment, &span)
    } else {
        tracing::warn!(format = name, "unknown format, content left unchanged");
        content
    };
    print!("{output}");
    Ok(())
}

async fn translate(
    config: &Config,
    file: &Path,
    title: String,
    languages: Option<String>,
    source: Option<String>,
) -> Result<()> {
    let content = read_input(file).await?;
    let languages = match languages {
        Some(list) => parse_language_list(&list)?,
        None => config.languages.targets.clone(),
    };
    let source = match source {
        Some(code) => Language::new(&code)?,
        None => config.languages.source.clone(),
    };

    let translator = HttpTranslator::new(&config.translation)?;
    tracing::info!(
        endpoint = translator.endpoint(),
        languages = languages.len(),
        "translating page"
    );
    let orchestrator =
        SequentialTranslator::from_config(translator, LogNotifier, &config.translation);

    let page = TranslatedPage::new(title, content);
    let set = orchestrator.translate_page(&source, &languages, &page).await;

    let fallbacks: Vec<_> = set.fallbacks().map(Language::as_str).collect();
    if !fallbacks.is_empty() {
        tracing::warn!(?fallbacks, "some languages kept the original text");
    }

    let json = serde_json::to_string_pretty(&set).into_diagnostic()?;
    println!("{json}");
    Ok(())
}

fn init_miette() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .with_cause_chain()
                .color(true)
                .context_lines(5)
                .tab_width(2)
                .break_words(true)
                .build(),
        )
    }))
    .expect("couldn't set the miette hook");
    miette::set_panic_hook();
}
