use std::sync::Arc;

use thiserror::Error;

use crate::filtering::domain::pixel_filter::PixelFilter;
use crate::filtering::infrastructure::adjustments::{AdjustmentPipeline, Preset};
use crate::filtering::infrastructure::filter_factory::{create_filter, FilterKind, FilterSettings};
use crate::history::history_stack::HistoryStack;
use crate::pipeline::edit_operation::EditOperation;
use crate::segmentation::domain::background_remover::SegmentationReport;
use crate::segmentation::infrastructure::remover_factory::create_remover;
use crate::selection::domain::selection::{Selection, SelectionError};
use crate::selection::infrastructure::clipboard::{copy_selection, paste_centered, ClipboardImage};
use crate::selection::infrastructure::magic_wand::magic_wand_select;
use crate::shared::pixel_buffer::{PixelBuffer, PixelBufferError};
use crate::shared::region::Region;

/// Label of the snapshot recorded when a session opens.
pub const INITIAL_SNAPSHOT_LABEL: &str = "open";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    #[error(transparent)]
    Buffer(#[from] PixelBufferError),
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error("nothing is selected")]
    EmptySelection,
    #[error("nothing to paste: copy a selection first")]
    NothingToPaste,
}

/// What a successfully applied operation did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OperationOutcome {
    Filtered { filter: FilterKind },
    PresetApplied { preset: Preset },
    BackgroundRemoved(SegmentationReport),
    /// The selection changed; `region` is `None` when nothing is selected.
    SelectionChanged {
        region: Option<Region>,
        pixel_count: usize,
    },
    Copied { region: Region },
    Pasted { region: Region },
}

/// One open image: the working buffer plus its history, selection and
/// clipboard.
///
/// Operations that change pixels commit to the buffer first and then
/// record a snapshot, so the newest history entry always equals the
/// buffer. Selection and clipboard operations leave history alone.
pub struct EditSession {
    buffer: PixelBuffer,
    history: HistoryStack,
    selection: Selection,
    clipboard: Option<ClipboardImage>,
    filter_settings: FilterSettings,
}

impl EditSession {
    pub fn new(buffer: PixelBuffer) -> Self {
        Self::with_history(buffer, HistoryStack::default())
    }

    /// Opens `buffer` with a caller-configured history. The stack is
    /// cleared and seeded with the opening snapshot.
    pub fn with_history(buffer: PixelBuffer, mut history: HistoryStack) -> Self {
        history.clear();
        history.push(buffer.clone(), INITIAL_SNAPSHOT_LABEL);
        Self {
            buffer,
            history,
            selection: Selection::none(),
            clipboard: None,
            filter_settings: FilterSettings::default(),
        }
    }

    /// Opens a session over raw RGBA bytes.
    pub fn from_raw(data: Vec<u8>, width: u32, height: u32) -> Result<Self, EditError> {
        Ok(Self::new(PixelBuffer::new(data, width, height)?))
    }

    /// Settings used by filter operations that carry no override.
    pub fn with_filter_settings(mut self, settings: FilterSettings) -> Self {
        self.filter_settings = settings;
        self
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub fn into_buffer(self) -> PixelBuffer {
        self.buffer
    }

    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn clipboard(&self) -> Option<&ClipboardImage> {
        self.clipboard.as_ref()
    }

    pub fn filter_settings(&self) -> &FilterSettings {
        &self.filter_settings
    }

    /// Latest history snapshot; shares storage with the history stack.
    pub fn snapshot(&self) -> Option<Arc<PixelBuffer>> {
        self.history.current()
    }

    pub fn apply(&mut self, operation: &EditOperation) -> Result<OperationOutcome, EditError> {
        let (width, height) = (self.buffer.width(), self.buffer.height());

        let outcome = match operation {
            EditOperation::Filter { filter, settings } => {
                let settings = settings.as_ref().unwrap_or(&self.filter_settings);
                create_filter(*filter, settings).apply(&mut self.buffer);
                if filter.reshapes() {
                    self.selection.clear();
                }
                OperationOutcome::Filtered { filter: *filter }
            }
            EditOperation::Preset { preset } => {
                AdjustmentPipeline::new(preset.adjustments()).apply(&mut self.buffer);
                OperationOutcome::PresetApplied { preset: *preset }
            }
            EditOperation::RemoveBackground { settings } => {
                let report = create_remover(settings).remove(&mut self.buffer);
                log::info!(
                    "Background removal cleared {} pixels, feathered {}",
                    report.cleared,
                    report.feathered
                );
                OperationOutcome::BackgroundRemoved(report)
            }
            EditOperation::MagicWand { seed, tolerance } => {
                let wand = magic_wand_select(&self.buffer, *seed, *tolerance)?;
                let pixel_count = wand.pixel_count;
                self.selection = Selection::from(wand);
                OperationOutcome::SelectionChanged {
                    region: self.selection.region(),
                    pixel_count,
                }
            }
            EditOperation::SelectRectangle { from, to } => {
                self.selection = Selection::rectangle(*from, *to, width, height);
                self.selection_outcome()
            }
            EditOperation::SelectAll => {
                self.selection.select_all(width, height);
                self.selection_outcome()
            }
            EditOperation::ClearSelection => {
                self.selection.clear();
                self.selection_outcome()
            }
            EditOperation::InvertSelection => {
                self.selection.invert(width, height);
                self.selection_outcome()
            }
            EditOperation::ExpandSelection => {
                self.require_selection()?;
                self.selection.expand(width, height);
                self.selection_outcome()
            }
            EditOperation::ContractSelection => {
                self.require_selection()?;
                self.selection.contract(width, height);
                self.selection_outcome()
            }
            EditOperation::Copy => {
                let clip = copy_selection(&self.buffer, &self.selection)
                    .ok_or(EditError::EmptySelection)?;
                let region = clip.origin();
                self.clipboard = Some(clip);
                OperationOutcome::Copied { region }
            }
            EditOperation::Paste => {
                let clip = self.clipboard.as_ref().ok_or(EditError::NothingToPaste)?;
                let region = paste_centered(&mut self.buffer, clip);
                OperationOutcome::Pasted { region }
            }
        };

        if operation.modifies_pixels() {
            self.history.push(self.buffer.clone(), operation.label());
        }
        log::debug!("Applied {}", operation.label());
        Ok(outcome)
    }

    /// Restores the previous snapshot. Returns `false` at the oldest entry.
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(snapshot) => {
                self.restore(&snapshot);
                true
            }
            None => false,
        }
    }

    /// Re-applies the next snapshot. Returns `false` at the newest entry.
    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(snapshot) => {
                self.restore(&snapshot);
                true
            }
            None => false,
        }
    }

    /// Restores the snapshot at `index` (0 is the oldest). Returns `false`
    /// when no such entry exists. Later entries stay redoable.
    pub fn jump_to(&mut self, index: usize) -> bool {
        match self.history.jump_to(index) {
            Some(snapshot) => {
                self.restore(&snapshot);
                true
            }
            None => false,
        }
    }

    fn restore(&mut self, snapshot: &PixelBuffer) {
        let reshaped =
            snapshot.width() != self.buffer.width() || snapshot.height() != self.buffer.height();
        self.buffer = snapshot.clone();
        if reshaped {
            self.selection.clear();
        }
    }

    fn require_selection(&self) -> Result<(), EditError> {
        if self.selection.is_active() {
            Ok(())
        } else {
            Err(EditError::EmptySelection)
        }
    }

    fn selection_outcome(&self) -> OperationOutcome {
        let pixel_count = match (self.selection.mask(), self.selection.region()) {
            (Some(mask), _) => mask.count(),
            (None, Some(region)) => region.clipped(self.buffer.width(), self.buffer.height()).area() as usize,
            (None, None) => 0,
        };
        OperationOutcome::SelectionChanged {
            region: self.selection.region(),
            pixel_count,
        }
    }
}
