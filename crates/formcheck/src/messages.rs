// File: src/messages.rs
// Purpose: Fixed message catalogues (English and Welsh)

use serde::{Deserialize, Serialize};

/// The two fixed message sets. Selected once at setup; there is no general
/// i18n machinery behind this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Welsh,
}

/// Page-level message texts for one language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Messages {
    pub this_page_contains_errors: &'static str,
}

const ENGLISH: Messages = Messages {
    this_page_contains_errors:
        "<p>ERROR: This page contains one or more errors. See details below.</p>",
};

const WELSH: Messages = Messages {
    this_page_contains_errors:
        "<p>GWALL: Mae'r dudalen hon yn cynnwys un neu ragor o wallau. Gweler y manylion isod.</p>",
};

impl Language {
    pub fn messages(&self) -> &'static Messages {
        match self {
            Language::English => &ENGLISH,
            Language::Welsh => &WELSH,
        }
    }
}
