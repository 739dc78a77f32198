use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};

use video_weaver::config::Config;
use video_weaver::veo::{
    AspectRatio, CredentialSource, CredentialStatus, EnvCredentials, GenerateOptions, Generator,
    Resolution, VeoError, VideoConfig, VideoModel, DEFAULT_DURATION_SECS, GEMINI_API_KEY_ENV,
    MAX_DURATION_SECS, MIN_DURATION_SECS,
};

/// Parse and validate the clip duration in seconds (2-180)
fn parse_duration(s: &str) -> Result<u32, String> {
    let secs: u32 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid duration", s))?;
    if !(MIN_DURATION_SECS..=MAX_DURATION_SECS).contains(&secs) {
        return Err(format!(
            "Duration must be between {} and {} seconds, got {}",
            MIN_DURATION_SECS, MAX_DURATION_SECS, secs
        ));
    }
    Ok(secs)
}

/// Veo model choice on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
enum ModelArg {
    #[default]
    Fast,
    Quality,
}

impl From<ModelArg> for VideoModel {
    fn from(m: ModelArg) -> Self {
        match m {
            ModelArg::Fast => VideoModel::Fast,
            ModelArg::Quality => VideoModel::Quality,
        }
    }
}

/// Aspect ratio choice on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
enum AspectRatioArg {
    #[default]
    #[value(name = "16:9")]
    Widescreen,
    #[value(name = "9:16")]
    Portrait,
}

impl From<AspectRatioArg> for AspectRatio {
    fn from(a: AspectRatioArg) -> Self {
        match a {
            AspectRatioArg::Widescreen => AspectRatio::Widescreen,
            AspectRatioArg::Portrait => AspectRatio::Portrait,
        }
    }
}

/// Resolution choice on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
enum ResolutionArg {
    #[default]
    #[value(name = "720p")]
    P720,
    #[value(name = "1080p")]
    P1080,
}

impl From<ResolutionArg> for Resolution {
    fn from(r: ResolutionArg) -> Self {
        match r {
            ResolutionArg::P720 => Resolution::P720,
            ResolutionArg::P1080 => Resolution::P1080,
        }
    }
}

/// video-weaver: Prompt-to-video generation with Google's Veo models
#[derive(Parser)]
#[command(name = "video-weaver")]
#[command(version, about = "Prompt-to-video generation with Google's Veo models")]
#[command(long_about = "Describe a video in plain language and video-weaver submits the \
    request to the Veo API, waits for the model to finish, and saves the \
    result as a local MP4 file.")]
#[command(after_help = "EXAMPLES:
    # Generate with the defaults (fast model, 16:9, 720p, 7 seconds)
    video-weaver generate \"An astronaut riding a horse on Mars\"

    # Best quality, portrait, 12 seconds
    video-weaver generate \"A koi pond at dawn\" -m quality -a 9:16 -d 12

    # Save to a specific file
    video-weaver generate \"A red bicycle\" -O bicycle.mp4

    # Check whether an API key is configured
    video-weaver key-status

ENVIRONMENT:
    GEMINI_API_KEY    Required. Your Gemini API key.")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a video from a text prompt
    #[command(after_help = "EXAMPLES:
    video-weaver generate \"An astronaut riding a horse on Mars\"
    video-weaver generate \"A koi pond at dawn\" --model quality --duration 12
    video-weaver generate \"A red bicycle\" --aspect-ratio 9:16 --resolution 1080p

ENVIRONMENT:
    GEMINI_API_KEY    Required. Your Gemini API key.")]
    Generate {
        /// The text prompt describing the video to generate
        prompt: String,

        /// Model to generate with (fast: good quality, quality: best quality)
        #[arg(long, short = 'm', value_enum)]
        model: Option<ModelArg>,

        /// Output aspect ratio
        #[arg(long, short = 'a', value_enum)]
        aspect_ratio: Option<AspectRatioArg>,

        /// Output resolution
        #[arg(long, short = 'r', value_enum)]
        resolution: Option<ResolutionArg>,

        /// Clip duration in seconds (2-180, default: 7)
        #[arg(long, short = 'd', value_parser = parse_duration)]
        duration: Option<u32>,

        /// Output file path (default: video-weaver-<timestamp>.mp4)
        #[arg(long, short = 'O')]
        output: Option<PathBuf>,

        /// Custom config file path (default: ~/.config/video-weaver/config.toml)
        #[arg(long, short = 'c')]
        config: Option<String>,
    },

    /// Report whether a Gemini API key is available
    KeyStatus,
}

/// Format a duration in seconds for display (e.g. "7s", "3m 00s")
fn format_duration(secs: u32) -> String {
    if secs < 60 {
        return format!("{}s", secs);
    }
    format!("{}m {:02}s", secs / 60, secs % 60)
}

/// Format bytes as human-readable string (KB, MB, GB)
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * KB;
    const GB: u64 = 1024 * MB;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Default output filename: video-weaver-<unix-seconds>.mp4
fn default_output_path() -> PathBuf {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    PathBuf::from(format!("video-weaver-{}.mp4", timestamp))
}

/// Display formatted summary of the settings used for this request
fn print_generation_summary(config: &VideoConfig, output: &std::path::Path) {
    println!();
    println!("┌─────────────────────────────────────────┐");
    println!("│         video-weaver v{:<18}│", env!("CARGO_PKG_VERSION"));
    println!("├─────────────────────────────────────────┤");
    println!("│  Model:      {:<27}│", config.model.to_string());
    println!("│  Aspect:     {:<27}│", config.aspect_ratio.to_string());
    println!("│  Resolution: {:<27}│", config.resolution.to_string());
    println!("│  Duration:   {:<27}│", format_duration(config.duration_secs));
    println!("│  Output:     {:<27}│", truncate_for_box(&output.display().to_string()));
    println!("└─────────────────────────────────────────┘");
    println!();
}

/// Truncate long paths so the summary box stays aligned
fn truncate_for_box(s: &str) -> String {
    if s.chars().count() > 27 {
        let tail: String = s.chars().rev().take(24).collect::<Vec<_>>().into_iter().rev().collect();
        format!("...{}", tail)
    } else {
        s.to_string()
    }
}

/// Run the generate command end to end
fn run_generate(
    prompt: &str,
    config: VideoConfig,
    options: GenerateOptions,
    output: PathBuf,
) -> Result<(), String> {
    let credentials = EnvCredentials;

    println!("Checking for a Gemini API key...");
    match credentials.status() {
        CredentialStatus::Present => {}
        CredentialStatus::Absent | CredentialStatus::Unknown => {
            credentials.select();
            return Err("No API key available".to_string());
        }
    }

    print_generation_summary(&config, &output);
    println!("Generating video for: \"{}\"", prompt);
    println!();

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| format!("Failed to create async runtime: {}", e))?;

    rt.block_on(async {
        let generator = Generator::with_options(EnvCredentials, options);

        let asset = generator
            .generate(prompt, &config, |message| println!("  {}", message))
            .await
            .map_err(|e| {
                if matches!(e, VeoError::InvalidApiKey) {
                    eprintln!();
                    eprintln!(
                        "The current API key was rejected. Set a new {} and try again.",
                        GEMINI_API_KEY_ENV
                    );
                }
                e.to_string()
            })?;

        let saved = asset
            .save(&output)
            .await
            .map_err(|e| format!("Failed to save video: {}", e))?;

        println!();
        println!("Video ready!");
        println!("  Path: {}", saved.display());
        println!("  Size: {}", format_size(asset.len() as u64));

        Ok(())
    })
}

/// Run the key-status command
fn run_key_status() {
    let credentials = EnvCredentials;
    match credentials.status() {
        CredentialStatus::Present => {
            println!("API key: present ({} is set)", GEMINI_API_KEY_ENV);
        }
        CredentialStatus::Absent => {
            println!("API key: absent");
            println!();
            credentials.select();
        }
        CredentialStatus::Unknown => {
            println!(
                "API key: unknown ({} could not be read)",
                GEMINI_API_KEY_ENV
            );
        }
    }
}

/// Load .env file and check for GEMINI_API_KEY
///
/// Loads environment variables from a .env file in the working directory.
/// Does not override existing environment variables.
fn load_env() {
    let _ = dotenv::dotenv();

    if std::env::var(GEMINI_API_KEY_ENV).is_err() {
        eprintln!("Warning: {} environment variable not set.", GEMINI_API_KEY_ENV);
        eprintln!("         Video generation requires a Gemini API key.");
        eprintln!(
            "         Set {} in .env or the environment to enable it.\n",
            GEMINI_API_KEY_ENV
        );
    }
}

fn main() {
    // Load .env before anything reads the environment
    load_env();
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Generate {
            prompt,
            model,
            aspect_ratio,
            resolution,
            duration,
            output,
            config: config_path,
        }) => {
            // Load config file
            // If --config is specified, require the file to exist
            // Otherwise, fall back to defaults if default config not found
            let cfg = if let Some(ref path) = config_path {
                match Config::load_from_explicit(PathBuf::from(path)) {
                    Ok(c) => c,
                    Err(e) => {
                        eprintln!("Error: {}", e);
                        std::process::exit(1);
                    }
                }
            } else {
                match Config::load() {
                    Ok(c) => c,
                    Err(e) => {
                        eprintln!("Warning: Failed to load config file: {}", e);
                        eprintln!("Using default settings.\n");
                        Config::default()
                    }
                }
            };

            // Merge settings: CLI args > config file > built-in defaults
            let model = model
                .map(VideoModel::from)
                .or_else(|| {
                    cfg.generation
                        .model
                        .as_deref()
                        .and_then(VideoModel::from_str)
                })
                .unwrap_or_default();

            let aspect_ratio = aspect_ratio
                .map(AspectRatio::from)
                .or_else(|| {
                    cfg.generation
                        .aspect_ratio
                        .as_deref()
                        .and_then(AspectRatio::from_str)
                })
                .unwrap_or_default();

            let resolution = resolution
                .map(Resolution::from)
                .or_else(|| {
                    cfg.generation
                        .resolution
                        .as_deref()
                        .and_then(Resolution::from_str)
                })
                .unwrap_or_default();

            let duration_secs = duration
                .or(cfg.generation.duration_secs)
                .unwrap_or(DEFAULT_DURATION_SECS);

            let video_config = VideoConfig {
                model,
                aspect_ratio,
                resolution,
                duration_secs,
            };

            let mut options = GenerateOptions::default();
            if let Some(secs) = cfg.api.poll_interval_secs {
                options.poll_interval = Duration::from_secs(secs);
            }
            options.base_url = cfg.api.base_url;

            let output = output.unwrap_or_else(default_output_path);

            if let Err(e) = run_generate(&prompt, video_config, options, output) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::KeyStatus) => run_key_status(),
        None => {
            // Show brief help when no command is provided
            println!("video-weaver {}", env!("CARGO_PKG_VERSION"));
            println!("Prompt-to-video generation with Google's Veo models\n");
            println!("USAGE:");
            println!("    video-weaver <COMMAND>\n");
            println!("COMMANDS:");
            println!("    generate    Generate a video from a text prompt");
            println!("    key-status  Report whether a Gemini API key is available");
            println!("    help        Print this message or the help of a subcommand\n");
            println!("Run 'video-weaver --help' for more details and examples.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Duration parsing tests

    #[test]
    fn test_parse_duration_valid() {
        assert_eq!(parse_duration("7").unwrap(), 7);
        assert_eq!(parse_duration("2").unwrap(), 2);
        assert_eq!(parse_duration("180").unwrap(), 180);
    }

    #[test]
    fn test_parse_duration_boundaries() {
        assert!(parse_duration("2").is_ok());
        assert!(parse_duration("180").is_ok());
        assert!(parse_duration("1").is_err());
        assert!(parse_duration("181").is_err());
    }

    #[test]
    fn test_parse_duration_invalid_input() {
        assert!(parse_duration("not_a_number").is_err());
        assert!(parse_duration("").is_err());
        assert!(parse_duration("-5").is_err());
        assert!(parse_duration("7.5").is_err());
    }

    #[test]
    fn test_parse_duration_out_of_range_message() {
        let err = parse_duration("200").unwrap_err();
        assert!(err.contains("between 2 and 180"));
        assert!(err.contains("200"));
    }

    // CLI enum conversion tests

    #[test]
    fn test_model_arg_conversion() {
        assert_eq!(VideoModel::from(ModelArg::Fast), VideoModel::Fast);
        assert_eq!(VideoModel::from(ModelArg::Quality), VideoModel::Quality);
    }

    #[test]
    fn test_aspect_ratio_arg_conversion() {
        assert_eq!(
            AspectRatio::from(AspectRatioArg::Widescreen),
            AspectRatio::Widescreen
        );
        assert_eq!(
            AspectRatio::from(AspectRatioArg::Portrait),
            AspectRatio::Portrait
        );
    }

    #[test]
    fn test_resolution_arg_conversion() {
        assert_eq!(Resolution::from(ResolutionArg::P720), Resolution::P720);
        assert_eq!(Resolution::from(ResolutionArg::P1080), Resolution::P1080);
    }

    // Formatting tests

    #[test]
    fn test_format_duration_seconds_only() {
        assert_eq!(format_duration(7), "7s");
        assert_eq!(format_duration(59), "59s");
    }

    #[test]
    fn test_format_duration_minutes() {
        assert_eq!(format_duration(60), "1m 00s");
        assert_eq!(format_duration(95), "1m 35s");
        assert_eq!(format_duration(180), "3m 00s");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.00 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.00 MB");
    }

    #[test]
    fn test_default_output_path_shape() {
        let path = default_output_path();
        let name = path.to_string_lossy();
        assert!(name.starts_with("video-weaver-"));
        assert!(name.ends_with(".mp4"));
    }

    #[test]
    fn test_truncate_for_box_short_path() {
        assert_eq!(truncate_for_box("clip.mp4"), "clip.mp4");
    }

    #[test]
    fn test_truncate_for_box_long_path() {
        let long = "/home/user/videos/projects/2025/august/clip.mp4";
        let truncated = truncate_for_box(long);
        assert!(truncated.starts_with("..."));
        assert_eq!(truncated.chars().count(), 27);
    }

    // Merge logic tests

    #[test]
    fn test_cli_overrides_config_model() {
        // Mirrors the merge in main(): CLI > config > default
        let cli_model = Some(ModelArg::Quality);
        let config_model = Some("fast".to_string());

        let merged = cli_model
            .map(VideoModel::from)
            .or_else(|| config_model.as_deref().and_then(VideoModel::from_str))
            .unwrap_or_default();

        assert_eq!(merged, VideoModel::Quality);
    }

    #[test]
    fn test_config_used_when_cli_absent() {
        let cli_model: Option<ModelArg> = None;
        let config_model = Some("quality".to_string());

        let merged = cli_model
            .map(VideoModel::from)
            .or_else(|| config_model.as_deref().and_then(VideoModel::from_str))
            .unwrap_or_default();

        assert_eq!(merged, VideoModel::Quality);
    }

    #[test]
    fn test_default_used_when_both_absent() {
        let cli_model: Option<ModelArg> = None;
        let config_model: Option<String> = None;

        let merged = cli_model
            .map(VideoModel::from)
            .or_else(|| config_model.as_deref().and_then(VideoModel::from_str))
            .unwrap_or_default();

        assert_eq!(merged, VideoModel::Fast);
    }

    #[test]
    fn test_unknown_config_model_falls_back_to_default() {
        let cli_model: Option<ModelArg> = None;
        let config_model = Some("veo-2".to_string());

        let merged = cli_model
            .map(VideoModel::from)
            .or_else(|| config_model.as_deref().and_then(VideoModel::from_str))
            .unwrap_or_default();

        assert_eq!(merged, VideoModel::Fast);
    }
}
