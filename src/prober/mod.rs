pub mod status;

/// Reply capacity; reads are capped one byte short so the data stays terminated.
pub const MAX_DATA_SIZE: usize = 10;

/// The only reply that counts as healthy.
pub const EXPECTED_RESPONSE: &[u8] = b"OK";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptResult {
    Success,
    ConnectFailure,
    /// Carries the bytes actually received.
    UnexpectedResponse(Vec<u8>),
}

impl AttemptResult {
    pub fn outcome_code(&self) -> i32 {
        match self {
            AttemptResult::Success => 0,
            AttemptResult::ConnectFailure => -1,
            AttemptResult::UnexpectedResponse(_) => -3,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, AttemptResult::Success)
    }
}

/// Fixed-size receive buffer, one per attempt.
pub struct ResponseBuffer {
    data: [u8; MAX_DATA_SIZE],
    len: usize,
}

impl ResponseBuffer {
    pub fn new() -> Self {
        Self {
            data: [0; MAX_DATA_SIZE],
            len: 0,
        }
    }

    /// Writable region handed to the single read.
    pub fn read_slot(&mut self) -> &mut [u8] {
        &mut self.data[..MAX_DATA_SIZE - 1]
    }

    pub fn set_len(&mut self, n: usize) {
        self.len = n.min(MAX_DATA_SIZE - 1);
        self.data[self.len] = 0;
    }

    pub fn received(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /// Received bytes up to the first NUL, or all of them if there is none.
    pub fn terminated(&self) -> &[u8] {
        let received = self.received();
        match received.iter().position(|&b| b == 0) {
            Some(end) => &received[..end],
            None => received,
        }
    }

    pub fn is_expected(&self) -> bool {
        self.terminated() == EXPECTED_RESPONSE
    }
}

impl Default for ResponseBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(bytes: &[u8]) -> ResponseBuffer {
        let mut buf = ResponseBuffer::new();
        let n = bytes.len().min(MAX_DATA_SIZE - 1);
        buf.read_slot()[..n].copy_from_slice(&bytes[..n]);
        buf.set_len(n);
        buf
    }

    #[test]
    fn outcome_codes() {
        assert_eq!(AttemptResult::Success.outcome_code(), 0);
        assert_eq!(AttemptResult::ConnectFailure.outcome_code(), -1);
        assert_eq!(AttemptResult::UnexpectedResponse(b"FAIL".to_vec()).outcome_code(), -3);
    }

    #[test]
    fn read_slot_leaves_room_for_terminator() {
        let mut buf = ResponseBuffer::new();
        assert_eq!(buf.read_slot().len(), MAX_DATA_SIZE - 1);
        buf.set_len(100);
        assert_eq!(buf.received().len(), MAX_DATA_SIZE - 1);
    }

    #[test]
    fn exact_ok_matches() {
        assert!(filled(b"OK").is_expected());
        assert!(filled(b"OK\0").is_expected());
    }

    #[test]
    fn comparison_is_case_sensitive_and_exact() {
        assert!(!filled(b"ok").is_expected());
        assert!(!filled(b"OK\n").is_expected());
        assert!(!filled(b"O").is_expected());
        assert!(!filled(b"").is_expected());
        assert!(!filled(b"OKAY").is_expected());
    }

    #[test]
    fn long_reply_is_truncated_not_overflowed() {
        let buf = filled(b"OK but much longer than nine bytes");
        assert_eq!(buf.received(), b"OK but mu");
        assert!(!buf.is_expected());
    }

    #[test]
    fn terminated_view_stops_at_nul() {
        let buf = filled(b"AB\0CD");
        assert_eq!(buf.received(), b"AB\0CD");
        assert_eq!(buf.terminated(), b"AB");
    }
}
