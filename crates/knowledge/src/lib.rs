//! Knowledge loaders for careerchat.
//!
//! Two read-only sources feed the [`KnowledgeContext`]:
//!
//! 1. **Profile document**: a PDF whose page text is extracted and concatenated
//! 2. **Summary**: a plain UTF-8 text file
//!
//! Either source may be missing. A missing or unreadable source never aborts
//! startup; it is replaced by a placeholder sentence and logged as a warning.

use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use careerchat_config::KnowledgeConfig;
use careerchat_core::error::KnowledgeError;
use careerchat_core::knowledge::KnowledgeContext;
use tracing::{debug, warn};

/// Placeholder used when the profile document cannot be loaded.
pub const PROFILE_PLACEHOLDER: &str =
    "Profile document unavailable: no profile details could be loaded.";

/// Placeholder used when the summary file cannot be loaded.
pub const SUMMARY_PLACEHOLDER: &str =
    "Summary unavailable: no professional summary could be loaded.";

/// Extract the text of every page of a PDF, concatenated in page order.
pub fn load_profile_document(path: &Path) -> Result<String, KnowledgeError> {
    if !path.is_file() {
        return Err(KnowledgeError::SourceMissing {
            path: path.to_path_buf(),
        });
    }

    let text = extract_guarded(path, |p| pdf_extract::extract_text(p))?;

    debug!(file = %path.display(), chars = text.len(), "Extracted profile document");
    Ok(text)
}

/// Run a PDF extractor, turning both its errors and its panics into
/// [`KnowledgeError::Extraction`]. Malformed documents can panic inside
/// the parser; this needs `panic = "unwind"`, the workspace default.
fn extract_guarded<F, E>(path: &Path, extract: F) -> Result<String, KnowledgeError>
where
    F: FnOnce(&Path) -> Result<String, E>,
    E: std::fmt::Display,
{
    let extraction_error = |reason: String| KnowledgeError::Extraction {
        path: path.to_path_buf(),
        reason,
    };

    match panic::catch_unwind(AssertUnwindSafe(|| extract(path))) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(extraction_error(e.to_string())),
        Err(payload) => {
            let reason = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".into());
            Err(extraction_error(format!("parser panicked: {reason}")))
        }
    }
}

/// Read a plain-text summary file.
pub fn load_summary(path: &Path) -> Result<String, KnowledgeError> {
    match std::fs::read_to_string(path) {
        Ok(text) => {
            debug!(file = %path.display(), chars = text.len(), "Loaded summary");
            Ok(text)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(KnowledgeError::SourceMissing {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(KnowledgeError::Unreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }),
    }
}

/// Builds the process-wide [`KnowledgeContext`] at startup.
pub struct KnowledgeLoader;

impl KnowledgeLoader {
    /// Load both sources, substituting placeholders for any that fail.
    pub fn load(config: &KnowledgeConfig) -> KnowledgeContext {
        let profile = or_placeholder(
            load_profile_document(&config.profile_pdf),
            PROFILE_PLACEHOLDER,
        );
        let summary = or_placeholder(load_summary(&config.summary), SUMMARY_PLACEHOLDER);
        KnowledgeContext::new(summary, profile)
    }
}

fn or_placeholder(loaded: Result<String, KnowledgeError>, placeholder: &str) -> String {
    match loaded {
        Ok(text) => text,
        Err(e) => {
            warn!(error = %e, "Knowledge source unavailable, using placeholder");
            placeholder.to_string()
        }
    }
}
