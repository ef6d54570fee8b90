use crate::segmentation::domain::background_remover::{
    BackgroundMethod, BackgroundRemover, BackgroundSettings,
};

use super::smart_remover::SmartRemover;
use super::threshold_removers::{ColorRemover, EdgeRemover, SimpleRemover};

/// Creates the remover for `settings.method`, with tolerance and feather
/// clamped to their ranges. Logs the chosen configuration.
pub fn create_remover(settings: &BackgroundSettings) -> Box<dyn BackgroundRemover> {
    let settings = settings.clamped();
    log::info!(
        "Using {} background removal (tolerance={}, feather={})",
        settings.method,
        settings.tolerance,
        settings.feather
    );
    match settings.method {
        BackgroundMethod::Simple => Box::new(SimpleRemover),
        BackgroundMethod::Smart => Box::new(SmartRemover::new(settings.feather)),
        BackgroundMethod::Edge => Box::new(EdgeRemover),
        BackgroundMethod::Color => Box::new(ColorRemover::new(settings.tolerance)),
    }
}
