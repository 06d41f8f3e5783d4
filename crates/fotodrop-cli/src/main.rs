//! Interactive delivery loop for event photo sets.
//!
//! Picks a photographer from the roster, asks for a model id, previews the
//! resolved recipient, and runs the delivery pipeline after confirmation.

use anyhow::{bail, Context, Result};
use clap::Parser;
use fotodrop_cli::assets::list_assets;
use fotodrop_cli::roster::{load_roster, RosterEntry};
use fotodrop_cli::init_tracing;
use fotodrop_core::{
    Config, DeliveryError, DeliveryRequest, DeliveryStatus, Photographer, RecipientRecord,
};
use fotodrop_ledger::{create_ledger, DeliveryLog};
use fotodrop_services::{
    AssetUploader, DeliveryPipeline, GoogleSheets, Notifier, OutcomeRecorder, RecipientResolver,
    SmtpMailer, Spreadsheet,
};
use fotodrop_storage::create_storage;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "fotodrop", about = "Deliver event photo sets to models")]
struct Cli {
    /// Photographer id from the roster (prompted when omitted)
    #[arg(long)]
    photographer: Option<String>,
    /// Model id to deliver (prompted when omitted; implies a single run)
    #[arg(long)]
    model: Option<String>,
    /// Skip the confirmation prompt
    #[arg(long)]
    yes: bool,
    /// Replace an existing delivery: new folder, alias remapped
    #[arg(long)]
    force_resubmit: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    config.validate_pipeline()?;

    let sheet: Arc<dyn Spreadsheet> = Arc::new(GoogleSheets::from_config(&config)?);
    let ledger = create_ledger(&config).await?;
    let storage = create_storage(&config).await?;
    let transport = SmtpMailer::from_config(&config)
        .context("SMTP_HOST and SMTP_FROM must be configured")?;
    let notifier = Notifier::from_config(&config, Arc::new(transport))?;
    let log = Arc::new(DeliveryLog::new(config.delivery_log_path()));

    let public_base_url = config
        .public_base_url()
        .context("PUBLIC_BASE_URL not configured")?
        .to_string();
    let pipeline = DeliveryPipeline::new(
        RecipientResolver::new(sheet.clone()),
        AssetUploader::new(storage, ledger, public_base_url),
        notifier,
        OutcomeRecorder::new(sheet.clone(), log),
        Duration::from_secs(config.external_call_timeout_secs()),
    );
    // The preview resolve before confirmation; the pipeline re-resolves on
    // delivery so the row index is fresh either way.
    let resolver = RecipientResolver::new(sheet);

    let images_dir = PathBuf::from(config.images_dir().unwrap_or("images"));
    let roster_path = PathBuf::from(config.photographers_path().unwrap_or("fotografos.txt"));
    let roster = load_roster(&roster_path)?;

    let photographer = select_photographer(&roster, cli.photographer.as_deref())?;
    println!(
        "Photographer: {} ({})",
        photographer.name, photographer.handle
    );

    let single_run = cli.model.is_some();
    let mut next_model = cli.model.clone();
    loop {
        let model_id = match next_model.take() {
            Some(model_id) => model_id,
            None => prompt("Model id to deliver: ")?,
        };
        if model_id.is_empty() {
            if single_run {
                bail!("No model id given");
            }
            continue;
        }

        match run_one(
            &pipeline,
            &resolver,
            &images_dir,
            &model_id,
            &photographer,
            &cli,
        )
        .await
        {
            Ok(true) => {}
            Ok(false) => println!("Skipped."),
            Err(e) => eprintln!("Delivery aborted: {:#}", e),
        }

        if single_run {
            break;
        }
    }

    Ok(())
}

/// Returns Ok(false) when the operator declined or the folder was unusable.
async fn run_one(
    pipeline: &DeliveryPipeline,
    resolver: &RecipientResolver,
    images_dir: &Path,
    model_id: &str,
    photographer: &Photographer,
    cli: &Cli,
) -> Result<bool> {
    let assets = match list_assets(images_dir, model_id)? {
        Some(assets) if !assets.is_empty() => assets,
        Some(_) => {
            eprintln!("Folder {}/{} has no images", images_dir.display(), model_id);
            return Ok(false);
        }
        None => {
            eprintln!("No folder {}/{}", images_dir.display(), model_id);
            return Ok(false);
        }
    };

    let recipient: RecipientRecord = match resolver.resolve(model_id).await {
        Ok(recipient) => recipient,
        Err(DeliveryError::RecipientNotFound(id)) => {
            eprintln!("Model {} not found in the sheet", id);
            return Ok(false);
        }
        Err(e) => return Err(e.into()),
    };

    if !cli.yes {
        let answer = prompt(&format!(
            "Send model [{}] ({} files) to {} <{}>? (y/N): ",
            model_id,
            assets.len(),
            recipient.name,
            recipient.email
        ))?;
        if !answer.eq_ignore_ascii_case("y") {
            return Ok(false);
        }
    }

    let request = DeliveryRequest {
        model_id: model_id.to_string(),
        local_asset_paths: assets,
        photographer: photographer.clone(),
        force_resubmit: cli.force_resubmit,
    };

    match pipeline.deliver(request).await {
        Ok(report) => {
            match report.status {
                DeliveryStatus::Success => println!("Delivered model {}", report.model_id),
                DeliveryStatus::Failed => eprintln!(
                    "Delivery failed at {}: {}",
                    report
                        .failed_stage
                        .map(|s| s.as_str())
                        .unwrap_or("unknown stage"),
                    report.message
                ),
            }
            Ok(true)
        }
        Err(DeliveryError::AlreadyDelivered(id)) => {
            eprintln!(
                "Model {} was already delivered; rerun with --force-resubmit to replace it",
                id
            );
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

fn select_photographer(roster: &[RosterEntry], wanted: Option<&str>) -> Result<Photographer> {
    if let Some(id) = wanted {
        return roster
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.photographer.clone())
            .with_context(|| format!("No photographer with id {}", id));
    }

    println!("Select a photographer by id:");
    for entry in roster {
        println!("  {} | {}", entry.id, entry.photographer.name);
    }
    loop {
        let id = prompt("Photographer id: ")?;
        if let Some(entry) = roster.iter().find(|e| e.id == id) {
            return Ok(entry.photographer.clone());
        }
        println!("Invalid id, try again.");
    }
}

fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
