use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::warn;

/// Decides whether the current caller may upload.
///
/// `login_required` is the hook fired when an unauthenticated caller tries
/// to upload; the presentation layer uses it to open a sign-in prompt.
pub trait AuthGate: Send + Sync {
    fn is_authenticated(&self) -> bool;

    fn login_required(&self);
}

/// Fixed authentication state, for the CLI and tests.
#[derive(Debug, Default)]
pub struct StaticAuth {
    authenticated: bool,
    prompts: AtomicUsize,
}

impl StaticAuth {
    pub fn authenticated() -> Self {
        Self {
            authenticated: true,
            prompts: AtomicUsize::new(0),
        }
    }

    pub fn guest() -> Self {
        Self {
            authenticated: false,
            prompts: AtomicUsize::new(0),
        }
    }

    /// Number of times the login hook has fired
    pub fn login_prompts(&self) -> usize {
        self.prompts.load(Ordering::SeqCst)
    }
}

impl AuthGate for StaticAuth {
    fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    fn login_required(&self) {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        warn!("Upload attempted without a signed-in session; please log in to upload images");
    }
}
