pub mod clipboard;
pub mod magic_wand;
