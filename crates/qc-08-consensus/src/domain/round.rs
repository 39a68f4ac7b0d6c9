//! Per-view round state.
//!
//! ```text
//!  IDLE ──adopt(candidate)──→ PRE_PREPARED ──2f prepares──→ PREPARED
//!   ↑                                                          │
//!   └──────────── view + 1 ←──── 2f commits (COMMITTED) ←──────┘
//! ```

use shared_types::{Block, Digest, NodeAddress, PhaseVote};
use std::collections::HashSet;
use std::time::{Duration, Instant};

/// Where the local node is within the current view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// No candidate held.
    Idle,
    /// Candidate adopted, collecting prepares.
    PrePrepared,
    /// Prepare quorum reached and commit broadcast, collecting commits.
    Prepared,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::PrePrepared => "pre_prepared",
            Phase::Prepared => "prepared",
        }
    }
}

/// Distinct voters for one phase of one round.
///
/// Seeded with the local node, so the count starts at 1 and a sender is
/// counted at most once.
#[derive(Clone, Debug)]
pub struct VoteTracker {
    voters: HashSet<NodeAddress>,
}

impl VoteTracker {
    pub fn new(local: &NodeAddress) -> Self {
        let mut voters = HashSet::new();
        voters.insert(local.clone());
        Self { voters }
    }

    /// Record a vote. Returns `false` if `sender` already voted.
    pub fn record(&mut self, sender: &NodeAddress) -> bool {
        self.voters.insert(sender.clone())
    }

    pub fn count(&self) -> usize {
        self.voters.len()
    }
}

/// What happened to an incoming Prepare or Commit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoteOutcome {
    /// Wrong digest, wrong view, or no candidate held. Ignored.
    Stale,
    /// The sender already voted in this phase. Ignored.
    Duplicate,
    /// Counted; the phase stays open (or was already closed).
    Counted { count: usize, threshold: usize },
    /// Counted and the phase closed on this vote.
    QuorumReached { count: usize, threshold: usize },
}

impl VoteOutcome {
    pub fn reached_quorum(&self) -> bool {
        matches!(self, VoteOutcome::QuorumReached { .. })
    }
}

/// A block the local node proposed as primary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Proposal {
    pub block: Block,
    pub view: u64,
}

/// Round state for the local node. Never persisted.
#[derive(Clone, Debug)]
pub struct RoundState {
    local: NodeAddress,
    view: u64,
    candidate: Option<Block>,
    self_digest: Digest,
    prepares: VoteTracker,
    commits: VoteTracker,
    prepare_phase_done: bool,
    adopted_at: Option<Instant>,
}

impl RoundState {
    /// Fresh state at view 1.
    pub fn new(local: NodeAddress) -> Self {
        let prepares = VoteTracker::new(&local);
        let commits = VoteTracker::new(&local);
        Self {
            local,
            view: 1,
            candidate: None,
            self_digest: Digest::default(),
            prepares,
            commits,
            prepare_phase_done: false,
            adopted_at: None,
        }
    }

    pub fn view(&self) -> u64 {
        self.view
    }

    pub fn candidate(&self) -> Option<&Block> {
        self.candidate.as_ref()
    }

    pub fn self_digest(&self) -> &Digest {
        &self.self_digest
    }

    pub fn prepare_count(&self) -> usize {
        self.prepares.count()
    }

    pub fn commit_count(&self) -> usize {
        self.commits.count()
    }

    pub fn prepare_phase_done(&self) -> bool {
        self.prepare_phase_done
    }

    pub fn phase(&self) -> Phase {
        match (&self.candidate, self.prepare_phase_done) {
            (None, _) => Phase::Idle,
            (Some(_), false) => Phase::PrePrepared,
            (Some(_), true) => Phase::Prepared,
        }
    }

    /// Hold `block` as this view's candidate.
    ///
    /// Votes already collected stay valid only while the digest is the same;
    /// switching to a different candidate starts the tallies over.
    pub fn adopt(&mut self, block: Block, now: Instant) {
        if block.hash != self.self_digest {
            self.prepares = VoteTracker::new(&self.local);
            self.commits = VoteTracker::new(&self.local);
            self.prepare_phase_done = false;
        }
        self.self_digest = block.hash.clone();
        self.candidate = Some(block);
        self.adopted_at = Some(now);
    }

    /// True when a vote is for the candidate held in the current view.
    pub fn matches(&self, digest: &Digest, view: u64) -> bool {
        self.candidate.is_some()
            && !self.self_digest.is_empty()
            && *digest == self.self_digest
            && view == self.view
    }

    /// Count a Prepare. Quorum is reported once per round.
    pub fn record_prepare(&mut self, vote: &PhaseVote, threshold: usize) -> VoteOutcome {
        if !self.matches(&vote.digest, vote.view) {
            return VoteOutcome::Stale;
        }
        if !self.prepares.record(&vote.sender) {
            return VoteOutcome::Duplicate;
        }
        let count = self.prepares.count();
        if count >= threshold && !self.prepare_phase_done {
            self.prepare_phase_done = true;
            VoteOutcome::QuorumReached { count, threshold }
        } else {
            VoteOutcome::Counted { count, threshold }
        }
    }

    /// Count a Commit. The caller finishes the round on quorum.
    pub fn record_commit(&mut self, vote: &PhaseVote, threshold: usize) -> VoteOutcome {
        if !self.matches(&vote.digest, vote.view) {
            return VoteOutcome::Stale;
        }
        if !self.commits.record(&vote.sender) {
            return VoteOutcome::Duplicate;
        }
        let count = self.commits.count();
        if count >= threshold {
            VoteOutcome::QuorumReached { count, threshold }
        } else {
            VoteOutcome::Counted { count, threshold }
        }
    }

    /// Close the view after a commit quorum: hand back the candidate and
    /// move to the next view.
    pub fn finish(&mut self) -> Option<Block> {
        let block = self.candidate.take();
        self.view += 1;
        self.reset();
        block
    }

    /// Drop the candidate and tallies, keeping the view.
    pub fn reset(&mut self) {
        self.candidate = None;
        self.self_digest = Digest::default();
        self.prepares = VoteTracker::new(&self.local);
        self.commits = VoteTracker::new(&self.local);
        self.prepare_phase_done = false;
        self.adopted_at = None;
    }

    /// A candidate has been held for longer than `timeout`.
    pub fn is_stalled(&self, now: Instant, timeout: Duration) -> bool {
        match self.adopted_at {
            Some(adopted) if self.candidate.is_some() => {
                now.saturating_duration_since(adopted) > timeout
            }
            _ => false,
        }
    }
}
