use crate::shared::error::AppError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Tool ecosystems that own a skills directory.
///
/// Declaration order is significant: it is the tie-break whenever several
/// providers hold a skill with the same name ("first provider wins").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Claude,
    Codex,
    Gemini,
    Antigravity,
    Trae,
}

impl Provider {
    pub const ALL: [Provider; 5] = [
        Provider::Claude,
        Provider::Codex,
        Provider::Gemini,
        Provider::Antigravity,
        Provider::Trae,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Provider::Claude => "claude",
            Provider::Codex => "codex",
            Provider::Gemini => "gemini",
            Provider::Antigravity => "antigravity",
            Provider::Trae => "trae",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Provider::ALL
            .into_iter()
            .find(|p| p.as_str() == s.trim())
            .ok_or_else(|| AppError::invalid(format!("unknown provider={s}")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Skill {
    pub name: String,
    pub path: String,
    pub description: String,
    pub provider: Provider,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkillScanResult {
    pub providers: BTreeMap<Provider, Vec<Skill>>,
    pub all_skills: Vec<String>,
    pub paths: BTreeMap<Provider, String>,
}

/// Outcome record returned by every mutating skill operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillOpResult {
    pub success: bool,
    pub message: String,
}

impl SkillOpResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }

    /// Collapse an internal result into the record, logging failures.
    pub(crate) fn from_outcome(op: &'static str, outcome: Result<String, AppError>) -> Self {
        match outcome {
            Ok(message) => Self::ok(message),
            Err(err) => {
                tracing::warn!(op, "skill operation failed: {}", err);
                Self::fail(format!("{op} failed: {err}"))
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SkillCreateInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub providers: Vec<Provider>,
}

/// Either the literal `"all"` or an explicit provider list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "SyncTargetsRepr")]
pub enum SyncTargets {
    All,
    Only(Vec<Provider>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SyncTargetsRepr {
    Keyword(String),
    List(Vec<Provider>),
}

impl TryFrom<SyncTargetsRepr> for SyncTargets {
    type Error = String;

    fn try_from(repr: SyncTargetsRepr) -> Result<Self, Self::Error> {
        match repr {
            SyncTargetsRepr::Keyword(k) if k.eq_ignore_ascii_case("all") => Ok(SyncTargets::All),
            SyncTargetsRepr::Keyword(k) => Err(format!("expected \"all\" or a provider list, got {k:?}")),
            SyncTargetsRepr::List(list) => Ok(SyncTargets::Only(list)),
        }
    }
}

impl SyncTargets {
    /// Expand to a duplicate-free list in caller order (`All` uses declaration order).
    pub fn resolve(&self) -> Vec<Provider> {
        match self {
            SyncTargets::All => Provider::ALL.to_vec(),
            SyncTargets::Only(list) => dedup_providers(list),
        }
    }
}

pub(crate) fn dedup_providers(list: &[Provider]) -> Vec<Provider> {
    let mut out = Vec::with_capacity(list.len());
    for p in list {
        if !out.contains(p) {
            out.push(*p);
        }
    }
    out
}
