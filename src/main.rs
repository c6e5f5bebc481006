//! `tasksplit` command-line entrypoint.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;

use tasksplit::chat::{ChatClient, ChatSession, GenerationParams, ImageAttachment};
use tasksplit::config::Config;
use tasksplit::constants::DEFAULT_SWEEP_MAX_N;
use tasksplit::embedding::{BertEmbedder, EmbeddingProvider};
use tasksplit::ngram::{NGramMode, ngram_similarity, ngram_sweep};
use tasksplit::threshold::TaskType;
use tasksplit::verify::SplitVerifier;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const DEFAULT_SYSTEM_PROMPT: &str = "You are an EV engineer responsible for disassembling \
batteries. You will be given the steps of assembling an EV and you need to design the \
process of disassembling it.";

#[derive(Parser)]
#[command(
    name = "tasksplit",
    about = "Verify task decompositions with BERT embeddings and n-gram similarity"
)]
struct Cli {
    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// N-gram Jaccard similarity between two texts
    Ngram {
        first: String,
        second: String,
        /// N-gram width
        #[arg(short, long, default_value_t = 3)]
        n: usize,
        /// `word` or `character`
        #[arg(long, default_value = "word")]
        mode: NGramMode,
    },

    /// N-gram similarity for every width from 1 to --max-n
    Sweep {
        first: String,
        second: String,
        #[arg(long, default_value_t = DEFAULT_SWEEP_MAX_N)]
        max_n: usize,
        /// `word` or `character`
        #[arg(long, default_value = "word")]
        mode: NGramMode,
    },

    /// Dynamic threshold for a text (`union` or `intersection`)
    Threshold { text: String, task_type: String },

    /// Check that FIRST and SECOND form a valid split of PARENT
    Verify {
        parent: String,
        first: String,
        second: String,
        /// Only print the verdict
        #[arg(long)]
        quiet: bool,
    },

    /// Send one prompt to the chat-completion endpoint
    Chat {
        prompt: String,
        /// Image to attach (vision models only)
        #[arg(long)]
        image: Option<PathBuf>,
        /// System prompt
        #[arg(long)]
        system: Option<String>,
    },
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::from_env()?;
    config.validate()?;

    match cli.command {
        Commands::Ngram {
            first,
            second,
            n,
            mode,
        } => cmd_ngram(&first, &second, n, mode),
        Commands::Sweep {
            first,
            second,
            max_n,
            mode,
        } => cmd_sweep(&first, &second, max_n, mode),
        Commands::Threshold { text, task_type } => cmd_threshold(&config, &text, &task_type),
        Commands::Verify {
            parent,
            first,
            second,
            quiet,
        } => cmd_verify(&config, &parent, &first, &second, quiet),
        Commands::Chat {
            prompt,
            image,
            system,
        } => cmd_chat(&config, &prompt, image.as_deref(), system).await,
    }
}

fn load_embedder(config: &Config) -> Result<BertEmbedder> {
    if config.model_dir.is_none() {
        tracing::warn!("No TASKSPLIT_MODEL_DIR configured, running embedder in stub mode");
    }
    BertEmbedder::load(config.embedder_config()).context("failed to load embedder")
}

fn cmd_ngram(first: &str, second: &str, n: usize, mode: NGramMode) -> Result<()> {
    let similarity = ngram_similarity(first, second, n, mode)?;
    println!(
        "The {n}-gram ({mode}) similarity between '{first}' and '{second}' is: {similarity:.4}"
    );
    Ok(())
}

fn cmd_sweep(first: &str, second: &str, max_n: usize, mode: NGramMode) -> Result<()> {
    let results = ngram_sweep(first, second, 1..=max_n, mode)?;
    for (i, (n, similarity)) in results.iter().enumerate() {
        println!("{n}-gram ({mode}) similarity: {similarity:.4}");
        if i + 1 != results.len() {
            println!("{}", "-".repeat(50));
        }
    }
    Ok(())
}

fn cmd_threshold(config: &Config, text: &str, task_type: &str) -> Result<()> {
    let task_type: TaskType = task_type.parse()?;
    let embedder = load_embedder(config)?;

    let token_length = embedder.token_count(text)?;
    let threshold = config
        .threshold_policy
        .threshold(&embedder, text, task_type)?;

    println!("Task type: {task_type}");
    println!("Token length: {token_length}");
    println!("Threshold: {threshold:.4}");
    Ok(())
}

fn cmd_verify(
    config: &Config,
    parent: &str,
    first: &str,
    second: &str,
    quiet: bool,
) -> Result<()> {
    let embedder = load_embedder(config)?;
    let verifier = SplitVerifier::with_policy(embedder, config.threshold_policy)?;

    let result = verifier.verify(parent, first, second, !quiet)?;

    if !quiet {
        println!("C: '{parent}'");
        println!("A: '{first}'");
        println!("B: '{second}'");
        println!("combined: '{first} {second}'");
        println!(
            "Union similarity: {:.4}, threshold: {:.4}",
            result.union_similarity, result.union_threshold
        );
        println!(
            "Intersection similarity: {:.4}, threshold: {:.4}",
            result.intersection_similarity, result.intersection_threshold
        );
        println!(
            "Union check passed: {}, intersection check passed: {}",
            result.is_union_valid, result.is_intersection_valid
        );
    }
    println!("Split is semantically valid: {}", result.overall_valid);
    Ok(())
}

async fn cmd_chat(
    config: &Config,
    prompt: &str,
    image: Option<&Path>,
    system: Option<String>,
) -> Result<()> {
    let client = ChatClient::new(config.chat_config())?;

    let image = image
        .map(ImageAttachment::from_path)
        .transpose()
        .context("failed to attach image")?;
    if image.is_some() && !client.config().is_multimodal() {
        tracing::warn!(
            model = %client.config().model,
            "Model does not accept images; sending text only"
        );
    }

    let system_prompt = system.unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string());
    let mut session = ChatSession::new(system_prompt);
    let reply = session
        .send(&client, prompt, image, &GenerationParams::default())
        .await?;

    println!("{reply}");
    Ok(())
}
