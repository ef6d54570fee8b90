pub mod edges;
pub mod filtering;
pub mod history;
pub mod imaging;
pub mod pipeline;
pub mod segmentation;
pub mod selection;
pub mod shared;
