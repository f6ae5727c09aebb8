//! Usage: Small cross-cutting helpers shared by domain and infra modules.

pub(crate) mod error;
pub(crate) mod mutex_ext;
