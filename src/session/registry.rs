//! Channel membership
//!
//! Tracks which pages are on the document's events channel. The local page
//! is a member too, so a registry with a single entry means nobody else is
//! around to answer a request.

use super::transport::PeerId;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default)]
pub struct ParticipantRegistry {
    members: BTreeSet<PeerId>,
}

impl ParticipantRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the membership with the list returned by a channel join
    pub fn replace<I>(&mut self, members: I)
    where
        I: IntoIterator<Item = PeerId>,
    {
        self.members = members.into_iter().collect();
    }

    /// Returns true if the peer was not known yet
    pub fn insert(&mut self, peer: &str) -> bool {
        self.members.insert(peer.to_string())
    }

    /// Returns true if the peer was known
    pub fn remove(&mut self, peer: &str) -> bool {
        self.members.remove(peer)
    }

    pub fn contains(&self, peer: &str) -> bool {
        self.members.contains(peer)
    }

    /// Number of members, the local page included
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Whether someone besides the local page is on the channel
    pub fn has_others(&self) -> bool {
        self.members.len() >= 2
    }

    pub fn iter(&self) -> impl Iterator<Item = &PeerId> {
        self.members.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_and_count() {
        let mut registry = ParticipantRegistry::new();
        registry.replace(vec!["me".to_string()]);
        assert_eq!(registry.len(), 1);
        assert!(!registry.has_others());

        assert!(registry.insert("peer-1"));
        assert!(!registry.insert("peer-1"));
        assert!(registry.has_others());
    }

    #[test]
    fn test_peer_leaving() {
        let mut registry = ParticipantRegistry::new();
        registry.replace(vec!["me".to_string(), "peer-1".to_string()]);
        assert!(registry.remove("peer-1"));
        assert!(!registry.remove("peer-1"));
        assert!(!registry.contains("peer-1"));
        assert_eq!(registry.iter().collect::<Vec<_>>(), vec!["me"]);
    }
}
