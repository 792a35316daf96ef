//! Stale listing rejection.
//!
//! Every listing fetch takes a ticket before it starts. When the response
//! arrives the ticket must still be the newest one issued and its folder
//! must still be the one on screen; otherwise the response is dropped.
//!
//! When a navigation fails and is rolled back, the listing it displaced can
//! be resumed as long as its response has not arrived yet.

use std::collections::HashSet;

use nimbus_core::types::FolderId;

/// Proof of which listing request a response belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingTicket {
    seq: u64,
    folder: Option<FolderId>,
}

impl ListingTicket {
    /// Folder the listing was requested for (`None` = root).
    pub fn folder(&self) -> Option<&FolderId> {
        self.folder.as_ref()
    }

    /// Issue order.
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// Whether a listing response made it into the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingOutcome {
    /// The store now shows the response.
    Applied,
    /// A newer request or a navigation superseded the response.
    Stale,
}

/// Issues listing tickets and judges responses.
#[derive(Debug, Default)]
pub struct ListingTracker {
    issued: u64,
    latest: u64,
    in_flight: HashSet<u64>,
}

impl ListingTracker {
    /// Create a tracker with no outstanding requests.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a listing request for `folder`.
    pub fn issue(&mut self, folder: Option<FolderId>) -> ListingTicket {
        self.issued += 1;
        self.latest = self.issued;
        self.in_flight.insert(self.latest);
        ListingTicket {
            seq: self.latest,
            folder,
        }
    }

    /// Sequence number responses are currently judged against.
    pub fn latest(&self) -> u64 {
        self.latest
    }

    /// The response for `ticket` arrived, applied or not.
    pub fn finish(&mut self, ticket: &ListingTicket) {
        self.in_flight.remove(&ticket.seq);
    }

    /// Make the request numbered `seq` the latest again.
    ///
    /// Only possible while its response is still outstanding.
    pub fn resume(&mut self, seq: u64) -> bool {
        if self.in_flight.contains(&seq) {
            self.latest = seq;
            true
        } else {
            false
        }
    }

    /// Whether a response for `ticket` may be applied while `current` is shown.
    pub fn accepts(&self, ticket: &ListingTicket, current: Option<&FolderId>) -> bool {
        ticket.seq == self.latest && ticket.folder.as_ref() == current
    }

    /// Invalidate every outstanding ticket.
    pub fn invalidate(&mut self) {
        self.issued += 1;
        self.latest = self.issued;
    }
}
