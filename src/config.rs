//! Configuration for a [`PdfPile`](crate::pile::PdfPile).
//!
//! All behavior knobs live here as plain values passed in at construction.
//! There is no process-wide state: verbosity is the consumer's business
//! (the crate only emits `log` records), and the reset/scratch policies
//! are per-pile.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// How a publish treats pre-existing destination content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishMode {
    /// Discard any pre-existing destination content; the published
    /// document holds exactly the scratch pages.
    Reset,
    /// Keep pre-existing destination pages and append the scratch pages
    /// after them.
    Append,
}

/// What happens to the scratch document after a successful publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScratchPolicy {
    /// Keep the scratch as-is. Repeated `Append` publishes re-merge pages
    /// that were already published, duplicating them — this matches the
    /// historical behavior some callers depend on.
    #[default]
    Retain,
    /// Clear the scratch, so each publish only contributes pages added
    /// since the previous one.
    ClearAfterPublish,
}

/// Per-pile configuration.
///
/// `Default` gives the historical behavior: first publish resets the
/// destination, scratch is retained across publishes, output is
/// compressed, and the scratch file lives in the system temp directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PileConfig {
    /// Whether the first publish in the pile's lifetime defaults to
    /// [`PublishMode::Reset`]. Flip to `false` before adding any page to
    /// append to a destination from the start.
    pub reset_on_first_publish: bool,

    /// Scratch retention across publishes.
    pub scratch_policy: ScratchPolicy,

    /// Directory for the scratch document. `None` uses the system temp
    /// directory.
    pub scratch_dir: Option<PathBuf>,

    /// Compress the published document before writing.
    pub compress: bool,
}

impl Default for PileConfig {
    fn default() -> Self {
        Self {
            reset_on_first_publish: true,
            scratch_policy: ScratchPolicy::Retain,
            scratch_dir: None,
            compress: true,
        }
    }
}

/// Options for a single `add_page` call.
#[derive(Debug, Clone, Copy)]
pub struct AddOptions {
    /// Publish the destination right after appending. Defaults to `true`;
    /// turn off to batch several adds into one publish.
    pub publish_now: bool,

    /// Force [`PublishMode::Reset`] for this publish regardless of the
    /// pile's history. Only meaningful together with `publish_now`.
    pub force_reset: bool,
}

impl Default for AddOptions {
    fn default() -> Self {
        Self {
            publish_now: true,
            force_reset: false,
        }
    }
}

impl AddOptions {
    /// Append to the scratch without publishing; the caller will publish
    /// later.
    pub fn deferred() -> Self {
        Self {
            publish_now: false,
            force_reset: false,
        }
    }
}
