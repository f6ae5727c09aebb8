//! Usage: Skills domain (provider replicas, union scan, sync, import, lifecycle ops).

mod engine;
mod fs_ops;
mod import;
mod ops;
mod paths;
mod scan;
mod skill_md;
mod sync;
mod types;

pub use engine::SkillsEngine;
pub use fs_ops::{SkillFs, StdFs};
pub use paths::ProviderRoots;
pub use skill_md::{DEFAULT_DESCRIPTION, MANIFEST_FILE};
pub use types::{
    Provider, Skill, SkillCreateInput, SkillOpResult, SkillScanResult, SyncTargets,
};
