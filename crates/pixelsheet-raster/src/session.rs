//! Upload-generation tracking.
//!
//! Decoding is asynchronous from the caller's point of view: a user can hand
//! over a second image before the first finishes decoding. Each upload gets a
//! monotonically increasing [`Generation`] token, and only the completion
//! carrying the newest issued token may commit. A stale completion is
//! discarded instead of overwriting a newer canvas.

/// Token identifying one upload within a [`Session`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Generation(u64);

impl Generation {
    pub fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct Session {
    issued: u64,
    committed: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new upload and get its generation token. Issuing a new
    /// generation makes every earlier one stale.
    pub fn begin(&mut self) -> Generation {
        self.issued += 1;
        Generation(self.issued)
    }

    /// Try to commit a completed upload. Returns `false` when the generation
    /// is stale: a newer upload has begun, or a newer one already committed.
    pub fn commit(&mut self, generation: Generation) -> bool {
        if generation.0 < self.issued || generation.0 <= self.committed {
            return false;
        }
        self.committed = generation.0;
        true
    }

    /// Whether `generation` is still the newest issued upload.
    pub fn is_current(&self, generation: Generation) -> bool {
        generation.0 == self.issued && generation.0 > self.committed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_upload_commits() {
        let mut session = Session::new();
        let generation = session.begin();
        assert!(session.is_current(generation));
        assert!(session.commit(generation));
    }

    #[test]
    fn older_completion_cannot_overwrite_newer_upload() {
        let mut session = Session::new();
        let first = session.begin();
        let second = session.begin();
        // The slow first decode finishes after the second upload began.
        assert!(!session.commit(first));
        assert!(session.commit(second));
    }

    #[test]
    fn completions_commit_at_most_once() {
        let mut session = Session::new();
        let generation = session.begin();
        assert!(session.commit(generation));
        assert!(!session.commit(generation));
        assert!(!session.is_current(generation));
    }
}
