use std::fmt;

/// How a single source relates to a claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerdictStatus {
    Supports,
    Contradicts,
    Irrelevant,
    Error,
}

impl VerdictStatus {
    /// Parses the backend's status label; anything unrecognised counts as `Error`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "supports" | "support" | "supported" => VerdictStatus::Supports,
            "contradicts" | "contradict" | "contradicted" => VerdictStatus::Contradicts,
            "irrelevant" => VerdictStatus::Irrelevant,
            _ => VerdictStatus::Error,
        }
    }
}

impl fmt::Display for VerdictStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerdictStatus::Supports => write!(f, "Supports"),
            VerdictStatus::Contradicts => write!(f, "Contradicts"),
            VerdictStatus::Irrelevant => write!(f, "Irrelevant"),
            VerdictStatus::Error => write!(f, "Error"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VerdictSummary {
    pub supports: u32,
    pub contradicts: u32,
    pub irrelevant: u32,
    pub errors: u32,
}

impl VerdictSummary {
    /// Sum of all counts. Counts come from the server, so this saturates.
    pub fn total(&self) -> u32 {
        self.supports
            .saturating_add(self.contradicts)
            .saturating_add(self.irrelevant)
            .saturating_add(self.errors)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceVerdict {
    pub status: VerdictStatus,
    pub reasoning: String,
    pub quote: Option<String>,
    pub source_url: String,
}

/// Structured outcome of verifying one claim against external sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactCheckReport {
    pub claim: String,
    pub summary: VerdictSummary,
    pub sources: Vec<SourceVerdict>,
}

impl fmt::Display for FactCheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Claim: {}", self.claim)?;
        write!(
            f,
            "Supports: {}, Contradicts: {}, Irrelevant: {}, Errors: {}",
            self.summary.supports,
            self.summary.contradicts,
            self.summary.irrelevant,
            self.summary.errors
        )?;
        for source in &self.sources {
            write!(
                f,
                "\n- [{}] {} ({})",
                source.status, source.reasoning, source.source_url
            )?;
            if let Some(quote) = source.quote.as_deref() {
                write!(f, " \"{quote}\"")?;
            }
        }
        Ok(())
    }
}
