pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];

/// Max snapshots kept by the history stack before the oldest are evicted.
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// Memory ceiling for history snapshots (512 MiB).
pub const DEFAULT_HISTORY_MEMORY_BYTES: usize = 512 * 1024 * 1024;

/// Magic-wand tolerance used when the caller does not pick one.
pub const DEFAULT_WAND_TOLERANCE: u8 = 20;

/// Pixels added/removed per side by selection expand/contract.
pub const SELECTION_STEP: i32 = 10;

/// Contracting a selection never shrinks a side below this.
pub const MIN_CONTRACTED_SIZE: i32 = 20;

/// Largest width or height accepted by resize.
pub const MAX_RESIZE_DIMENSION: u32 = 5000;
