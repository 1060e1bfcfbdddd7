use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, anyhow, bail};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use volc_voiceclone::core::voice_clone::SPEAKER_ID_PREFIX;
use volc_voiceclone::utils::timestamped_output_path;
use volc_voiceclone::{
    AudioEncoding, AudioSample, ClientConfig, StatusPoller, SynthesisClient, SynthesisRequest,
    TextType, TrainingStatusReport, VoiceCloneClient,
};

/// Voice cloning and speech synthesis client
#[derive(Parser, Debug)]
#[command(name = "volc-voiceclone")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file (YAML)
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the training status of a speaker
    Status {
        #[arg(short, long)]
        speaker: String,
    },

    /// Synthesize speech with a trained voice
    Synthesize {
        #[arg(short, long)]
        speaker: String,

        /// Text to speak
        #[arg(short, long, conflicts_with = "text_file", required_unless_present = "text_file")]
        text: Option<String>,

        /// Read the text from a file
        #[arg(long, value_name = "FILE")]
        text_file: Option<PathBuf>,

        /// Output encoding (wav, pcm, ogg_opus, mp3)
        #[arg(short, long, default_value = "mp3")]
        encoding: String,

        /// Speed ratio between 0.2 and 3.0
        #[arg(long, default_value_t = 1.0)]
        speed: f32,

        /// Treat the text as SSML
        #[arg(long)]
        ssml: bool,

        /// Exact output file path
        #[arg(short, long, conflicts_with = "prefix", required_unless_present = "prefix")]
        output: Option<PathBuf>,

        /// File name prefix; a timestamp and extension are appended
        #[arg(long)]
        prefix: Option<String>,

        /// Directory for prefixed output files [default: output]
        #[arg(long, requires = "prefix")]
        output_dir: Option<PathBuf>,

        /// Synthesize without first checking that the voice is trained
        #[arg(long)]
        skip_status_check: bool,
    },

    /// Upload a training sample
    Train {
        #[arg(short, long)]
        speaker: String,

        /// Audio file; its extension is sent as the format
        #[arg(short, long, value_name = "FILE")]
        audio: PathBuf,
    },

    /// Wait for a training job to finish
    Wait {
        #[arg(short, long)]
        speaker: String,

        /// Give up after this many seconds
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Upload a training sample and wait for the job to finish
    TrainAndWait {
        #[arg(short, long)]
        speaker: String,

        #[arg(short, long, value_name = "FILE")]
        audio: PathBuf,

        /// Give up after this many seconds
        #[arg(long)]
        timeout: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if it exists (must be done before config loading)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = if let Some(config_path) = &cli.config {
        info!("Loading configuration from {}", config_path.display());
        ClientConfig::from_file(config_path).map_err(|e| anyhow!(e.to_string()))?
    } else {
        ClientConfig::from_env().map_err(|e| anyhow!(e.to_string()))?
    };

    match cli.command {
        Commands::Status { speaker } => {
            check_speaker(&speaker)?;
            let client = VoiceCloneClient::new(config)?;
            let report = client.get_status(&speaker).await?;
            print_report(&report);
        }
        Commands::Synthesize {
            speaker,
            text,
            text_file,
            encoding,
            speed,
            ssml,
            output,
            prefix,
            output_dir,
            skip_status_check,
        } => {
            check_speaker(&speaker)?;
            let text = match (text, text_file) {
                (Some(text), _) => text,
                (None, Some(path)) => tokio::fs::read_to_string(&path)
                    .await
                    .with_context(|| format!("Failed to read {}", path.display()))?,
                (None, None) => bail!("Either --text or --text-file is required"),
            };
            let encoding: AudioEncoding = encoding.parse()?;
            let text_type = if ssml { TextType::Ssml } else { TextType::Plain };
            let request = SynthesisRequest::new(text, speaker.as_str())
                .with_encoding(encoding)
                .with_speed_ratio(speed)
                .with_text_type(text_type);
            request.validate()?;

            let path = match (output, prefix) {
                (Some(path), _) => path,
                (None, Some(prefix)) => {
                    let dir = output_dir.unwrap_or_else(|| PathBuf::from("output"));
                    timestamped_output_path(&dir, &prefix, encoding)?
                }
                (None, None) => bail!("Either --output or --prefix is required"),
            };

            if !skip_status_check {
                let report = VoiceCloneClient::new(config.clone())?
                    .get_status(&speaker)
                    .await?;
                if !report.status.is_success() {
                    bail!(
                        "Voice {} is not ready (status: {}); train it first or pass --skip-status-check",
                        speaker,
                        report.status
                    );
                }
            }

            let client = SynthesisClient::new(config)?;
            let (path, bytes) = client.synthesize_to_file(&request, &path).await?;
            println!("Saved {} bytes to {}", bytes, path.display());
        }
        Commands::Train { speaker, audio } => {
            check_speaker(&speaker)?;
            let client = VoiceCloneClient::new(config)?;
            let submission = client.train_from_path(&audio, &speaker).await?;
            println!("Training submitted for {}", speaker);
            if let Some(base) = submission.base_resp.filter(|b| !b.is_ok()) {
                println!(
                    "Server reported status {}: {}",
                    base.status_code, base.status_message
                );
            }
        }
        Commands::Wait { speaker, timeout } => {
            check_speaker(&speaker)?;
            let timeout = timeout.map_or(config.training_timeout, Duration::from_secs);
            let client = VoiceCloneClient::new(config)?;
            let report = client
                .wait_for_completion_cancellable(&speaker, timeout, ctrl_c_token())
                .await?;
            print_report(&report);
        }
        Commands::TrainAndWait {
            speaker,
            audio,
            timeout,
        } => {
            check_speaker(&speaker)?;
            let timeout = timeout.map_or(config.training_timeout, Duration::from_secs);
            let sample = load_sample(&audio).await?;
            let client = VoiceCloneClient::new(config)?;
            let poller = StatusPoller::new(client.poller().policy().with_timeout(timeout))
                .with_cancellation(ctrl_c_token());
            let report = client.train_and_wait_with(&sample, &speaker, &poller).await?;
            print_report(&report);
        }
    }

    Ok(())
}

fn check_speaker(speaker: &str) -> anyhow::Result<()> {
    if !speaker.starts_with(SPEAKER_ID_PREFIX) {
        bail!(
            "Speaker id '{}' must start with '{}'",
            speaker,
            SPEAKER_ID_PREFIX
        );
    }
    Ok(())
}

async fn load_sample(path: &Path) -> anyhow::Result<AudioSample> {
    AudioSample::from_path(path)
        .await
        .with_context(|| format!("Failed to load training audio {}", path.display()))
}

/// Token cancelled on the first Ctrl-C.
fn ctrl_c_token() -> CancellationToken {
    let token = CancellationToken::new();
    let child = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping after the current status query");
            child.cancel();
        }
    });
    token
}

fn print_report(report: &TrainingStatusReport) {
    println!("Speaker: {}", report.speaker_id);
    println!("Status:  {} ({})", report.status, report.status.code());
    if let Some(demo) = &report.demo_audio {
        println!("Demo:    {}", demo);
    }
}
