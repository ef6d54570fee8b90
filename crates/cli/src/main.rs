mod settings;

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use photo_edit_core::filtering::infrastructure::adjustments::Preset;
use photo_edit_core::filtering::infrastructure::filter_factory::{FilterKind, FilterSettings};
use photo_edit_core::imaging::infrastructure::image_file_reader::ImageFileReader;
use photo_edit_core::imaging::infrastructure::image_file_writer::ImageFileWriter;
use photo_edit_core::pipeline::edit_image_use_case::EditImageUseCase;
use photo_edit_core::pipeline::edit_operation::EditOperation;
use photo_edit_core::pipeline::operation_logger::StdoutOperationLogger;
use photo_edit_core::segmentation::domain::background_remover::{BackgroundMethod, BackgroundSettings};
use photo_edit_core::shared::constants::{IMAGE_EXTENSIONS, MAX_RESIZE_DIMENSION};

use settings::EditorSettings;

/// Apply filters, background removal and recipes to an image file.
#[derive(Parser, Debug)]
#[command(name = "photo-edit")]
struct Cli {
    /// Input image file.
    input: PathBuf,

    /// Output image file; the format follows the extension.
    output: PathBuf,

    /// Filter to apply, in order (repeatable), e.g. --filter vintage --filter vignette.
    #[arg(long = "filter")]
    filters: Vec<FilterKind>,

    /// Adjustment preset: vintage, bw, warm, cool, cinematic or natural.
    /// Runs before any --filter.
    #[arg(long)]
    preset: Option<Preset>,

    /// Resize to this width in pixels (keeps the height unless --height is given).
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=MAX_RESIZE_DIMENSION as i64))]
    width: Option<u32>,

    /// Resize to this height in pixels (keeps the width unless --width is given).
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=MAX_RESIZE_DIMENSION as i64))]
    height: Option<u32>,

    /// Barrel/pincushion correction strength (-100 to 100).
    #[arg(long, allow_hyphen_values = true)]
    lens_correction: Option<f64>,

    /// Red/blue fringe correction strength (0 to 100).
    #[arg(long)]
    chromatic_aberration: Option<f64>,

    /// Remove the background: simple, smart, edge or color. Runs last.
    #[arg(long)]
    remove_background: Option<BackgroundMethod>,

    /// Color distance tolerance for --remove-background color.
    #[arg(long)]
    tolerance: Option<u32>,

    /// Feather radius for --remove-background smart.
    #[arg(long)]
    feather: Option<u32>,

    /// JSON file with a list of operations, applied before the flags above.
    #[arg(long)]
    recipe: Option<PathBuf>,

    /// Number of levels for the posterize filter.
    #[arg(long)]
    posterize_levels: Option<u32>,

    /// Settings file (default: the user config directory).
    #[arg(long)]
    settings: Option<PathBuf>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let settings = match &cli.settings {
        Some(path) => EditorSettings::load_from(path),
        None => EditorSettings::load(),
    };
    let filter_settings = filter_settings(&cli, &settings);

    let mut operations = match &cli.recipe {
        Some(path) => load_recipe(path)?,
        None => Vec::new(),
    };
    operations.extend(flag_operations(&cli, &settings));
    if operations.is_empty() {
        log::warn!("No operations given; the image is re-encoded unchanged");
    }

    let mut use_case = EditImageUseCase::new(
        Box::new(ImageFileReader::new()),
        Box::new(ImageFileWriter::new()),
        operations,
        filter_settings,
        settings.history_capacity,
        Box::new(StdoutOperationLogger::new()),
    )
    .with_history_memory_limit(settings.history_memory_bytes());
    use_case.execute(&cli.input, &cli.output)?;
    log::info!("Output written to {}", cli.output.display());
    Ok(())
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.input.exists() {
        return Err(format!("Input file not found: {}", cli.input.display()).into());
    }
    if !is_image(&cli.output) {
        return Err(format!(
            "Output must have an image extension ({}), got {}",
            IMAGE_EXTENSIONS.join(", "),
            cli.output.display()
        )
        .into());
    }
    if let Some(recipe) = &cli.recipe {
        if !recipe.exists() {
            return Err(format!("Recipe file not found: {}", recipe.display()).into());
        }
    }
    if cli.remove_background.is_none() && (cli.tolerance.is_some() || cli.feather.is_some()) {
        return Err("--tolerance and --feather require --remove-background".into());
    }
    Ok(())
}

/// Settings file values, overridden by any strengths given on the command line.
fn filter_settings(cli: &Cli, settings: &EditorSettings) -> FilterSettings {
    let mut filters = settings.filters.clone();
    if let Some(levels) = cli.posterize_levels {
        filters.posterize_levels = levels;
    }
    if let Some(strength) = cli.lens_correction {
        filters.lens_strength = strength;
    }
    if let Some(strength) = cli.chromatic_aberration {
        filters.chromatic_strength = strength;
    }
    if cli.width.is_some() || cli.height.is_some() {
        filters.resize_width = cli.width;
        filters.resize_height = cli.height;
    }
    filters
}

/// Operations implied by the flags: lens fixes first, then the preset, then
/// `--filter`s in order, then resize, then background removal.
fn flag_operations(cli: &Cli, settings: &EditorSettings) -> Vec<EditOperation> {
    let mut operations = Vec::new();
    if cli.lens_correction.is_some() {
        operations.push(EditOperation::filter(FilterKind::LensCorrection));
    }
    if cli.chromatic_aberration.is_some() {
        operations.push(EditOperation::filter(FilterKind::ChromaticAberration));
    }
    if let Some(preset) = cli.preset {
        operations.push(EditOperation::Preset { preset });
    }
    operations.extend(cli.filters.iter().copied().map(EditOperation::filter));
    if cli.width.is_some() || cli.height.is_some() {
        operations.push(EditOperation::filter(FilterKind::Resize));
    }

    if let Some(method) = cli.remove_background {
        operations.push(EditOperation::RemoveBackground {
            settings: BackgroundSettings {
                method,
                tolerance: cli.tolerance.unwrap_or(settings.background.tolerance),
                feather: cli.feather.unwrap_or(settings.background.feather),
            },
        });
    }
    operations
}

fn load_recipe(path: &Path) -> Result<Vec<EditOperation>, Box<dyn std::error::Error>> {
    let json = fs::read_to_string(path)?;
    let operations: Vec<EditOperation> = serde_json::from_str(&json)
        .map_err(|e| format!("Invalid recipe {}: {e}", path.display()))?;
    log::info!("Loaded {} operations from {}", operations.len(), path.display());
    Ok(operations)
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}
