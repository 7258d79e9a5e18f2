use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use lingo_core::tagger::resource;
use lingo_core::{
    AnalysisConfig, ComplexityEngine, LingoError, OutputMode, ReportFormatter, TaggerBackend,
    TaggerConfig,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod input;

#[derive(Parser, Debug)]
#[command(
    name = "lingo",
    version,
    about = "Analyze language complexity metrics from a transcript",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    analyze: AnalyzeArgs,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Download the perceptron tagger model
    FetchTagger {
        /// Base URL serving the three model JSON files
        #[arg(long)]
        url: Option<String>,

        /// Directory to install the model into
        #[arg(long)]
        model_dir: Option<PathBuf>,

        /// Configuration file (TOML)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// Transcript text file (reads stdin when omitted)
    input: Option<PathBuf>,

    /// Quiet mode (only output JSON)
    #[arg(short, long)]
    quiet: bool,

    /// Output results as JSON
    #[arg(long)]
    json: bool,

    /// Configuration file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// User line marker; repeat for several (default: "You:" and "You ")
    #[arg(long = "marker")]
    markers: Vec<String>,

    /// Match user markers regardless of case
    #[arg(long)]
    ignore_case: bool,

    /// Tagger backend
    #[arg(long, value_enum)]
    tagger: Option<TaggerArg>,

    /// Directory holding the perceptron model
    #[arg(long)]
    model_dir: Option<PathBuf>,

    /// Base URL to download the perceptron model from when it is missing
    #[arg(long)]
    download_url: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum TaggerArg {
    Perceptron,
    Spacy,
    Rules,
}

impl From<TaggerArg> for TaggerBackend {
    fn from(arg: TaggerArg) -> Self {
        match arg {
            TaggerArg::Perceptron => TaggerBackend::Perceptron,
            TaggerArg::Spacy => TaggerBackend::Spacy,
            TaggerArg::Rules => TaggerBackend::Rules,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.verbose) {
        eprintln!("warning: {e:#}");
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ERROR: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::FetchTagger {
            url,
            model_dir,
            config,
        }) => fetch_tagger(url, model_dir, config),
        None => analyze(&cli.analyze),
    }
}

fn analyze(args: &AnalyzeArgs) -> Result<()> {
    let config = build_config(args)?;
    let transcript = input::read_transcript(args.input.as_deref())?;

    let engine = ComplexityEngine::new(config);
    let report = engine.analyze(&transcript);
    let output = ReportFormatter::from_config(engine.config()).render(&report)?;

    println!("{}", output.trim_end());
    Ok(())
}

fn fetch_tagger(
    url: Option<String>,
    model_dir: Option<PathBuf>,
    config: Option<PathBuf>,
) -> Result<()> {
    let mut tagger = match config {
        Some(path) => AnalysisConfig::load(&path)?.tagger,
        None => TaggerConfig::default(),
    };
    if url.is_some() {
        tagger.download_url = url;
    }
    if model_dir.is_some() {
        tagger.model_dir = model_dir;
    }

    let files = resource::fetch(&tagger).context("fetching tagger model")?;
    println!("Installed perceptron model to {}", files.weights.display());
    Ok(())
}

/// Merge the config file (if any) with command-line overrides
fn build_config(args: &AnalyzeArgs) -> Result<AnalysisConfig, LingoError> {
    let mut config = match &args.config {
        Some(path) => AnalysisConfig::load(path)?,
        None => AnalysisConfig::default(),
    };

    if !args.markers.is_empty() {
        config = config.with_markers(args.markers.iter().cloned());
    }
    if args.ignore_case {
        config = config.with_case_insensitive_markers(true);
    }
    if let Some(tagger) = args.tagger {
        config = config.with_tagger_backend(tagger.into());
    }
    if let Some(dir) = &args.model_dir {
        config = config.with_model_dir(dir);
    }
    if let Some(url) = &args.download_url {
        config = config.with_download_url(url);
    }
    if args.quiet || args.json {
        config = config.with_output(OutputMode::Json);
    }

    config.validate()?;
    Ok(config)
}

fn init_tracing(verbose: u8) -> Result<()> {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level))?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init()
        .context("Failed to initialize tracing")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("lingo").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults_to_verbose_stdin() {
        let cli = parse(&[]);
        assert!(cli.command.is_none());
        assert!(cli.analyze.input.is_none());

        let config = build_config(&cli.analyze).unwrap();
        assert_eq!(config.output, OutputMode::Verbose);
        assert_eq!(config.markers, vec!["You:".to_string(), "You ".to_string()]);
    }

    #[test]
    fn test_quiet_and_json_select_json() {
        for flag in ["-q", "--quiet", "--json"] {
            let cli = parse(&[flag, "transcript.txt"]);
            let config = build_config(&cli.analyze).unwrap();
            assert_eq!(config.output, OutputMode::Json);
            assert_eq!(cli.analyze.input, Some(PathBuf::from("transcript.txt")));
        }
    }

    #[test]
    fn test_overrides() {
        let cli = parse(&[
            "--marker",
            "Student:",
            "--marker",
            "S:",
            "--ignore-case",
            "--tagger",
            "rules",
            "--model-dir",
            "/tmp/model",
            "-vv",
        ]);
        let config = build_config(&cli.analyze).unwrap();

        assert_eq!(config.markers, vec!["Student:".to_string(), "S:".to_string()]);
        assert!(config.case_insensitive_markers);
        assert_eq!(config.tagger.backend, TaggerBackend::Rules);
        assert_eq!(config.tagger.model_dir, Some(PathBuf::from("/tmp/model")));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_blank_marker_rejected() {
        let cli = parse(&["--marker", "  "]);
        assert!(matches!(
            build_config(&cli.analyze),
            Err(LingoError::Config(_))
        ));
    }

    #[test]
    fn test_config_file_then_flags() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "markers = [\"Learner:\"]\noutput = \"json\"\n[tagger]\nbackend = \"rules\""
        )
        .unwrap();
        let path = file.path().to_str().unwrap();

        let config = build_config(&parse(&["--config", path]).analyze).unwrap();
        assert_eq!(config.markers, vec!["Learner:".to_string()]);
        assert_eq!(config.output, OutputMode::Json);
        assert_eq!(config.tagger.backend, TaggerBackend::Rules);

        let cli = parse(&["--config", path, "--tagger", "perceptron"]);
        let config = build_config(&cli.analyze).unwrap();
        assert_eq!(config.tagger.backend, TaggerBackend::Perceptron);
    }

    #[test]
    fn test_fetch_tagger_subcommand() {
        let cli = parse(&[
            "fetch-tagger",
            "--url",
            "https://example.com/m",
            "--model-dir",
            "/tmp/m",
        ]);
        match cli.command {
            Some(Commands::FetchTagger { url, model_dir, .. }) => {
                assert_eq!(url.as_deref(), Some("https://example.com/m"));
                assert_eq!(model_dir, Some(PathBuf::from("/tmp/m")));
            }
            None => panic!("expected fetch-tagger"),
        }
    }

    #[test]
    fn test_fetch_tagger_without_url_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = fetch_tagger(None, Some(dir.path().to_path_buf()), None);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_tagger_rejected() {
        assert!(Cli::try_parse_from(["lingo", "--tagger", "bert"]).is_err());
    }
}
