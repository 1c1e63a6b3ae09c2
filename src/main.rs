use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use post_api::PostApiService;

mod error;
mod models;
mod services;

use error::AppError;
use models::AppSettings;
use services::{PathPicker, PostEditService};

/// Compose a post from local images, pin products on them and publish it
#[derive(Debug, Parser)]
#[command(name = "post-editor", version)]
struct Cli {
    /// Settings file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Sub-category to publish under
    #[arg(long)]
    category: Option<i64>,

    /// Post text
    #[arg(long, default_value = "")]
    content: String,

    /// Product pin as INDEX:NAME[:URL], INDEX being the image position
    #[arg(long = "pin", value_parser = parse_pin)]
    pins: Vec<PinArg>,

    /// Print the selectable categories and exit
    #[arg(long)]
    list_categories: bool,

    /// Drop images whose upload failed instead of aborting
    #[arg(long)]
    skip_failed: bool,

    /// Images in post order
    images: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
struct PinArg {
    image: usize,
    name: String,
    url: Option<String>,
}

fn parse_pin(raw: &str) -> Result<PinArg, String> {
    let mut parts = raw.splitn(3, ':');
    let image = parts
        .next()
        .and_then(|i| i.trim().parse::<usize>().ok())
        .ok_or_else(|| format!("expected INDEX:NAME[:URL], got '{}'", raw))?;
    let name = parts
        .next()
        .map(str::to_string)
        .ok_or_else(|| format!("missing product name in '{}'", raw))?;
    let url = parts.next().map(str::to_string);
    Ok(PinArg { image, name, url })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let settings = AppSettings::load(&AppSettings::resolve_path(cli.config))?;
    let api = PostApiService::new(settings.api)?;
    let mut service = PostEditService::new(api, settings.composition);

    let categories = service.load_categories().await;
    if cli.list_categories {
        for category in categories {
            println!("{}\t{}", category.id, category.name);
        }
        return Ok(());
    }

    service.pick_images(&PathPicker::new(cli.images))?;

    for pin in &cli.pins {
        let state = service.state_mut();
        state.select(pin.image)?;
        state.add_pin(&pin.name, pin.url.as_deref())?;
    }
    service.state_mut().set_content(cli.content);
    service.flush_events();

    if let Some(category) = cli.category {
        service.choose_category(category)?;
    }

    log::info!(
        "Waiting for {} of {} upload(s)",
        service.uploads_in_flight(),
        service.state().len()
    );
    service.wait_for_uploads().await;

    if cli.skip_failed {
        let dropped = service.remove_failed()?;
        if dropped > 0 {
            log::warn!("Dropped {} image(s) that failed to upload", dropped);
        }
    }

    let post_id = service.submit().await?;
    println!("{}", post_id);
    Ok(())
}
