//! Client identity rotation
//!
//! Every page request goes out with a User-Agent drawn from a provider. The
//! provider may come up empty, in which case the fetcher falls back to a fixed
//! identity and logs the degraded mode.

/// Source of client identities (User-Agent strings)
pub trait IdentityProvider: Send + Sync {
    /// Returns the identity for the next request, or `None` if unavailable
    fn next_identity(&self) -> Option<String>;
}

/// Picks a uniformly random User-Agent from a fixed pool
#[derive(Debug, Clone)]
pub struct UserAgentPool {
    agents: Vec<String>,
}

impl UserAgentPool {
    pub fn new(agents: Vec<String>) -> Self {
        Self { agents }
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

impl IdentityProvider for UserAgentPool {
    fn next_identity(&self) -> Option<String> {
        if self.agents.is_empty() {
            return None;
        }
        let index = fastrand::usize(..self.agents.len());
        Some(self.agents[index].clone())
    }
}
