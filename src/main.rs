use cardscan::adjuster::{AdjustEvent, GraphicAdjuster};
use cardscan::extraction::{Extractor, JsonResponseExtractor};
use cardscan::imaging::RustBackend;
use cardscan::naming::graphic_filename;
use cardscan::types::{ContactField, ContactRecord, GraphicSlot};
use cardscan::vcard::VCardExport;
use cardscan::{config, output, pipeline};
use clap::{Parser, Subcommand};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::error;

/// `FIELD=VALUE` edit applied to the extracted contact.
#[derive(Debug, Clone)]
struct FieldEdit {
    field: ContactField,
    value: String,
}

fn parse_edit(s: &str) -> Result<FieldEdit, String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got '{s}'"))?;
    Ok(FieldEdit {
        field: name.trim().parse()?,
        value: value.to_string(),
    })
}

/// `DX,DY` pan offset in canvas pixels.
#[derive(Debug, Clone, Copy)]
struct PanOffset {
    dx: f64,
    dy: f64,
}

fn parse_pan(s: &str) -> Result<PanOffset, String> {
    let (dx, dy) = s
        .split_once(',')
        .ok_or_else(|| format!("expected DX,DY, got '{s}'"))?;
    let num = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid pan component '{v}': {e}"))
    };
    Ok(PanOffset {
        dx: num(dx)?,
        dy: num(dy)?,
    })
}

/// Extraction response plus user edits.
#[derive(clap::Args, Clone)]
struct ContactArgs {
    /// JSON answer of the extraction service
    #[arg(long)]
    response: PathBuf,

    /// Override a contact field, e.g. --set jobTitle="Head of Sales" (repeatable)
    #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_edit)]
    edits: Vec<FieldEdit>,
}

#[derive(Parser)]
#[command(name = "cardscan")]
#[command(about = "Business card photos to vCard contacts")]
#[command(long_about = "\
Business card photos to vCard contacts

Card images go to a multimodal extraction service; its JSON answer (contact
fields plus optional logoBox/photoBox bounding boxes) is what this tool
consumes. Boxes use 0-1000 normalized coordinates:

  {
    \"fullName\": \"Jane Doe\",
    \"email\": \"jane@acme.example\",
    \"logoBox\": { \"ymin\": 40, \"xmin\": 620, \"ymax\": 300, \"xmax\": 960, \"imageIndex\": 0 }
  }

Typical flow:

  cardscan card --response answer.json front.jpg back.jpg
  cardscan adjust --slot photo --image-index 1 --zoom 1.4 --pan 20,-35 front.jpg back.jpg

Run 'cardscan gen-config' to generate a documented cardscan.toml.")]
#[command(version)]
struct Cli {
    /// Directory results are written to
    #[arg(long, default_value = ".", global = true)]
    output: PathBuf,

    /// Directory containing cardscan.toml
    #[arg(long, default_value = ".", global = true)]
    config_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Crop logo and photo graphics using the extraction bounding boxes
    Crop {
        /// JSON answer of the extraction service
        #[arg(long)]
        response: PathBuf,
        /// Card images, in the order they were submitted
        #[arg(required = true)]
        images: Vec<PathBuf>,
    },
    /// Manually pan/zoom a graphic and save the result
    Adjust {
        /// Graphic slot to produce (logo or photo)
        #[arg(long)]
        slot: GraphicSlot,
        /// Extraction answer; its box picks the starting image
        #[arg(long)]
        response: Option<PathBuf>,
        /// Source image to use (0-based)
        #[arg(long)]
        image_index: Option<usize>,
        /// Zoom factor (clamped to the configured range)
        #[arg(long)]
        zoom: Option<f64>,
        /// Pan offset in canvas pixels
        #[arg(long, value_name = "DX,DY", value_parser = parse_pan, allow_hyphen_values = true)]
        pan: Option<PanOffset>,
        /// Also save the on-screen preview (with the photo guide)
        #[arg(long)]
        preview: bool,
        /// Card images, in the order they were submitted
        #[arg(required = true)]
        images: Vec<PathBuf>,
    },
    /// Write the contact as a .vcf file
    Vcard(ContactArgs),
    /// Crop graphics and write the .vcf in one go
    Card {
        #[command(flatten)]
        contact: ContactArgs,
        /// Card images, in the order they were submitted
        #[arg(required = true)]
        images: Vec<PathBuf>,
    },
    /// Print a stock cardscan.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "command failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let app_config = config::load_config(&cli.config_dir)?;
    init_tracing(&app_config.log_level);
    init_thread_pool(&app_config.processing);
    let backend = RustBackend::new();

    match cli.command {
        Command::Crop { response, images } => {
            let inputs = read_images(&images)?;
            let mut contact = load_contact(&response, &[], &inputs)?;
            let sources = pipeline::decode_sources(&backend, &inputs)?;
            let report =
                pipeline::auto_crop(&backend, &mut contact, &sources, &app_config.crop_config())?;
            let saved = write_graphics(&cli.output, &contact)?;
            output::print_crop_report(&report, &saved);
        }
        Command::Adjust {
            slot,
            response,
            image_index,
            zoom,
            pan,
            preview,
            images,
        } => {
            let inputs = read_images(&images)?;
            let contact = match response {
                Some(path) => load_contact(&path, &[], &inputs)?,
                None => ContactRecord::default(),
            };
            let sources = pipeline::decode_sources(&backend, &inputs)?;
            let mut adjuster = GraphicAdjuster::open(
                &backend,
                &sources,
                slot,
                contact.graphic_box(slot),
                app_config.adjuster_config(),
            )
            .ok_or("no images to adjust")?;

            if let Some(index) = image_index {
                if index >= adjuster.image_count() {
                    return Err(format!(
                        "--image-index {index} out of range ({} images)",
                        adjuster.image_count()
                    )
                    .into());
                }
                adjuster.handle(AdjustEvent::SelectImage(index));
            }
            if let Some(z) = zoom {
                adjuster.handle(AdjustEvent::Zoom(z));
            }
            if let Some(PanOffset { dx, dy }) = pan {
                adjuster.handle(AdjustEvent::Pan { dx, dy });
            }

            std::fs::create_dir_all(&cli.output)?;
            let preview_path = if preview {
                let path = cli.output.join(format!("{slot}-preview.png"));
                adjuster.preview()?.save(&path)?;
                Some(path)
            } else {
                None
            };

            let state = *adjuster.state();
            let image = adjuster.apply()?;
            let path = cli.output.join(graphic_filename(slot, &image));
            std::fs::write(&path, &image.bytes)?;
            output::print_adjust_result(slot, &state, &image, &path, preview_path.as_deref());
        }
        Command::Vcard(args) => {
            let contact = load_contact(&args.response, &args.edits, &[])?;
            let export = VCardExport::from_contact(&contact);
            let path = export.write_to(&cli.output)?;
            output::print_contact(&contact);
            output::print_vcard_saved(&path, export.mime);
        }
        Command::Card { contact, images } => {
            let inputs = read_images(&images)?;
            let mut record = load_contact(&contact.response, &contact.edits, &inputs)?;
            let sources = pipeline::decode_sources(&backend, &inputs)?;
            let report =
                pipeline::auto_crop(&backend, &mut record, &sources, &app_config.crop_config())?;
            let saved = write_graphics(&cli.output, &record)?;
            let export = VCardExport::from_contact(&record);
            let path = export.write_to(&cli.output)?;

            output::print_contact(&record);
            output::print_crop_report(&report, &saved);
            output::print_vcard_saved(&path, export.mime);
        }
        Command::GenConfig => unreachable!("handled before config loading"),
    }

    Ok(())
}

/// Install the tracing subscriber. `RUST_LOG` wins over the configured level.
fn init_tracing(default_level: &str) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; users can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

fn read_images(paths: &[PathBuf]) -> std::io::Result<Vec<Vec<u8>>> {
    paths.iter().map(std::fs::read).collect()
}

/// Run the (replayed) extraction and apply user edits.
fn load_contact(
    response: &Path,
    edits: &[FieldEdit],
    images: &[Vec<u8>],
) -> Result<ContactRecord, Box<dyn Error>> {
    let text = std::fs::read_to_string(response)?;
    let mut contact = JsonResponseExtractor::new(text).extract(images)?.contact;
    for edit in edits {
        contact.set(edit.field, edit.value.clone());
    }
    Ok(contact)
}

/// Save every populated graphic slot into `dir`.
fn write_graphics(
    dir: &Path,
    contact: &ContactRecord,
) -> std::io::Result<Vec<(GraphicSlot, PathBuf)>> {
    let mut saved = Vec::new();
    for slot in GraphicSlot::ALL {
        if let Some(image) = contact.graphic(slot) {
            std::fs::create_dir_all(dir)?;
            let path = dir.join(graphic_filename(slot, image));
            std::fs::write(&path, &image.bytes)?;
            saved.push((slot, path));
        }
    }
    Ok(saved)
}
