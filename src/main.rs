use anyhow::{Context, Result};
use clap::Parser;
use glob::Pattern;
use photo_uploader::app::{
    ConsoleConfirmer, ConsoleSink, HttpFormSubmitter, RequiredFieldsValidator, StdoutSubmitter,
};
use photo_uploader::i18n::{Catalog, DefaultText, Translator};
use photo_uploader::selection::DetachedPreviews;
use photo_uploader::upload::{AutoConfirm, CloudinaryTransport, RetryConfirmer};
use photo_uploader::utils::file_walker::collect_candidates;
use photo_uploader::{Collaborators, FormSubmitter, SubmitOutcome, UploadForm, UploaderConfig};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "photo-uploader")]
#[command(about = "Upload photos to Cloudinary and submit a form with their URLs")]
struct Args {
    /// Photos, or folders of photos, to upload
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// JSON config file; flags override its values
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[arg(long, env = "CLOUDINARY_CLOUD_NAME")]
    cloud_name: Option<String>,

    #[arg(long, env = "CLOUDINARY_UPLOAD_PRESET")]
    upload_preset: Option<String>,

    #[arg(long)]
    max_files: Option<usize>,

    #[arg(long)]
    min_files: Option<usize>,

    #[arg(long, value_name = "MB")]
    max_size_mb: Option<u64>,

    /// Upload passes per submission, the first one included
    #[arg(long)]
    max_rounds: Option<u32>,

    /// Only pick up files in folders whose name matches this glob
    #[arg(long, value_name = "GLOB")]
    pattern: Option<String>,

    /// i18next JSON resource file for messages
    #[arg(long, value_name = "FILE")]
    locale: Option<PathBuf>,

    /// Language passed along with the submitted form
    #[arg(long)]
    lang: Option<String>,

    /// Form field as name=value (repeatable)
    #[arg(long = "field", value_name = "NAME=VALUE", value_parser = parse_field)]
    fields: Vec<(String, String)>,

    /// Field that must not be empty (repeatable)
    #[arg(long = "require", value_name = "NAME")]
    required: Vec<String>,

    /// URL to post the form to; the form is printed when absent
    #[arg(long, value_name = "URL")]
    action: Option<String>,

    /// Retry failed uploads without asking
    #[arg(long, conflicts_with = "no_retry")]
    retry: bool,

    /// Never retry failed uploads
    #[arg(long)]
    no_retry: bool,
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(name, value)| (name.trim().to_string(), value.to_string()))
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", raw))
}

fn load_config(args: &Args) -> Result<UploaderConfig> {
    let mut config = match &args.config {
        Some(path) => UploaderConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => UploaderConfig::default(),
    };

    if let Some(cloud_name) = &args.cloud_name {
        config.cloudinary.cloud_name = cloud_name.clone();
    }
    if let Some(upload_preset) = &args.upload_preset {
        config.cloudinary.upload_preset = upload_preset.clone();
    }
    if let Some(max_files) = args.max_files {
        config.limits.max_files = max_files;
    }
    if let Some(min_files) = args.min_files {
        config.min_files = min_files;
    }
    if let Some(max_size_mb) = args.max_size_mb {
        config.limits.max_size_bytes = max_size_mb * 1024 * 1024;
    }
    if let Some(max_rounds) = args.max_rounds {
        config.max_rounds = max_rounds;
    }

    config.validate()?;
    config.validate_transport()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;

    let translator: Arc<dyn Translator> = match &args.locale {
        Some(path) => Arc::new(
            Catalog::from_file(path)
                .with_context(|| format!("failed to load translations from {}", path.display()))?,
        ),
        None => Arc::new(DefaultText),
    };

    let pattern = args
        .pattern
        .as_deref()
        .map(Pattern::new)
        .transpose()
        .context("invalid --pattern")?;
    let candidates =
        collect_candidates(&args.paths, pattern.as_ref()).context("failed to collect files")?;

    let confirmer: Arc<dyn RetryConfirmer> = if args.retry {
        Arc::new(AutoConfirm(true))
    } else if args.no_retry {
        Arc::new(AutoConfirm(false))
    } else {
        Arc::new(ConsoleConfirmer::new(translator.clone()))
    };

    let submitter: Arc<dyn FormSubmitter> = match &args.action {
        Some(action) => Arc::new(HttpFormSubmitter::new(
            action.clone(),
            config.hidden_field.clone(),
            args.fields.clone(),
            args.lang.clone(),
        )),
        None => Arc::new(StdoutSubmitter::new(
            config.hidden_field.clone(),
            args.fields.clone(),
        )),
    };

    let transport = CloudinaryTransport::new(config.cloudinary.clone())
        .context("failed to build HTTP client")?;
    let sink = Arc::new(ConsoleSink::new(translator.clone()));

    let mut form = UploadForm::new(
        &config,
        Collaborators {
            transport: Arc::new(transport),
            confirmer,
            validator: Arc::new(RequiredFieldsValidator::new(
                args.fields.clone(),
                args.required.clone(),
                config.min_files,
            )),
            submitter,
            sink: sink.clone(),
            translator,
            previews: Arc::new(DetachedPreviews),
        },
    );

    form.add_files(candidates);
    if let Some(summary) = form.summary() {
        println!("{}", summary);
        for label in form.file_labels() {
            println!("  {}", label);
        }
    }

    match form.submit().await? {
        SubmitOutcome::Submitted(_) => {
            println!("{}", sink.status_text());
            Ok(())
        }
        SubmitOutcome::NotEnoughFiles { .. } | SubmitOutcome::InvalidForm => {
            anyhow::bail!("form is incomplete, nothing was uploaded")
        }
        SubmitOutcome::Aborted => anyhow::bail!("no photo could be uploaded, form not submitted"),
    }
}
