pub mod corner_flood_fill;
pub mod remover_factory;
pub mod smart_remover;
pub mod threshold_removers;
