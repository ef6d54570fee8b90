pub mod pixel_filter;
