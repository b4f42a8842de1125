//! Network-origin gate.
//!
//! A coarse perimeter control, not a substitute for the credential check:
//! the custodian only answers peers whose address passes the injected
//! policy. Expressed as a trait so the static allowlist can be swapped for
//! an identity-based policy engine without touching the service logic.

use std::collections::HashSet;
use std::net::IpAddr;

/// Decides whether a peer address may reach the custodian at all.
pub trait OriginPolicy: Send + Sync {
    fn is_allowed(&self, origin: IpAddr) -> bool;
}

/// Fixed allowlist of origin addresses, configured at startup.
#[derive(Clone, Debug)]
pub struct StaticAllowlist {
    allowed: HashSet<IpAddr>,
}

impl StaticAllowlist {
    pub fn new(addrs: impl IntoIterator<Item = IpAddr>) -> Self {
        Self {
            allowed: addrs.into_iter().collect(),
        }
    }
}

impl OriginPolicy for StaticAllowlist {
    fn is_allowed(&self, origin: IpAddr) -> bool {
        self.allowed.contains(&origin)
    }
}
