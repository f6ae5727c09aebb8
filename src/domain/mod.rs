pub(crate) mod installer;
pub(crate) mod presets;
pub mod skills;
