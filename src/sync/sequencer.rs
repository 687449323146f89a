/// Orders read completions against read issue order.
///
/// Every read gets a number when it is issued. A completion is applied only
/// when its number is above the last applied one; anything older lost the
/// race to a newer read and is dropped.
#[derive(Debug, Default)]
pub struct ReadSequencer {
    last_issued: u64,
    last_applied: u64,
}

impl ReadSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next sequence number.
    pub fn issue(&mut self) -> u64 {
        self.last_issued += 1;
        self.last_issued
    }

    /// Returns `true` (and records `seq` as applied) when `seq` is newer
    /// than every previously applied read.
    pub fn accept(&mut self, seq: u64) -> bool {
        if seq > self.last_applied {
            self.last_applied = seq;
            true
        } else {
            false
        }
    }

    pub fn last_applied(&self) -> u64 {
        self.last_applied
    }
}
