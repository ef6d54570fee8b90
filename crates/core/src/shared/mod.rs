pub mod color;
pub mod constants;
pub mod mask;
pub mod pixel_buffer;
pub mod region;
