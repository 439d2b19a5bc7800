//! Terminal rendering of fatal errors.
//!
//! Every fatal error prints a colored label, the message, and (when the
//! problem is user-fixable) a documentation link. Unexpected errors also
//! print their source chain.

use std::error::Error;

use glance_api::ApiError;
use glance_config::docs;
use glance_run::{APP_DOMAIN, RunError};

const RED: &str = "\x1b[31m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Error class, controls the label and extra guidance.
enum Kind {
    Config,
    Auth,
    Validation,
    Upload,
    Unexpected,
}

pub fn print_error(error: &RunError) {
    let (kind, link) = classify(error);

    let label = match kind {
        Kind::Config => "Config error",
        Kind::Auth => "Auth error",
        Kind::Validation => "Error",
        Kind::Upload => "Upload error",
        Kind::Unexpected => "Unexpected error",
    };

    eprintln!("{RED}{BOLD}{label}:{RESET} {error}");

    match kind {
        Kind::Auth => {
            eprintln!();
            eprintln!("Make sure you copied the token correctly,");
            eprintln!("or generate a new one at {APP_DOMAIN}");
        }
        Kind::Unexpected => {
            let mut source = error.source();
            while let Some(inner) = source {
                eprintln!("{DIM}caused by: {inner}{RESET}");
                source = inner.source();
            }
        }
        _ => {}
    }

    if let Some(link) = link {
        eprintln!("{DIM}Learn more: {link}{RESET}");
    }
}

fn classify(error: &RunError) -> (Kind, Option<&'static str>) {
    match error {
        RunError::Config(e) => (Kind::Config, e.docs_link()),
        RunError::Api(ApiError::Auth) => (Kind::Auth, None),
        RunError::Api(ApiError::SnapshotsLimitExceeded | ApiError::PlanInactive) => {
            (Kind::Validation, None)
        }
        RunError::Api(_) => (Kind::Unexpected, None),
        RunError::Resolve(_) => (Kind::Validation, Some(docs::BUILDS)),
        RunError::Upload(_) => (Kind::Upload, None),
        RunError::Artifact(_) | RunError::MissingBuildPath(_) | RunError::Io(_) => {
            (Kind::Unexpected, None)
        }
    }
}
