//! Request classification.
//!
//! Every intercepted request is labelled before a strategy runs:
//!
//! 1. method other than GET → [`Classification::Ignored`]
//! 2. origin other than the application's → [`Classification::Ignored`]
//! 3. navigation mode, or `Accept` containing `text/html` → [`Classification::Navigation`]
//! 4. anything else → [`Classification::StaticAsset`]

use swcache_core::{Request, RequestMode};
use url::{Origin, Url};

/// Label computed for one intercepted request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Navigation,
    StaticAsset,
    Ignored,
}

/// Classifies requests relative to the application origin.
#[derive(Debug, Clone)]
pub struct Classifier {
    origin: Origin,
}

impl Classifier {
    pub fn new(origin: &Url) -> Self {
        Self { origin: origin.origin() }
    }

    pub fn classify(&self, request: &Request) -> Classification {
        if !request.is_get() {
            return Classification::Ignored;
        }

        if request.url.origin() != self.origin {
            return Classification::Ignored;
        }

        let wants_html = request
            .accept()
            .is_some_and(|accept| accept.to_ascii_lowercase().contains("text/html"));

        if request.mode == RequestMode::Navigate || wants_html {
            Classification::Navigation
        } else {
            Classification::StaticAsset
        }
    }
}
