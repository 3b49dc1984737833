/// Sequential identifier of the form `prefix` + zero-padded number.
///
/// `next` scans existing ids, ignores those that do not parse, and continues
/// from the highest number seen (or from `start`). Gaps are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdSequence {
    pub prefix: &'static str,
    pub width: usize,
    pub start: u64,
}

/// `KYC0001`, `KYC0002`, ...
pub const KYC_ID: IdSequence = IdSequence::new("KYC", 4, 0);
/// `TXN00001`, `TXN00002`, ...
pub const TRANSACTION_ID: IdSequence = IdSequence::new("TXN", 5, 0);
/// `CUST1001`, `CUST1002`, ...
pub const CUSTOMER_ID: IdSequence = IdSequence::new("CUST", 0, 1000);

impl IdSequence {
    pub const fn new(prefix: &'static str, width: usize, start: u64) -> Self {
        Self { prefix, width, start }
    }

    /// Numeric suffix after the prefix, or `None` when the id is not one of ours.
    pub fn parse(&self, id: &str) -> Option<u64> {
        let digits = id.trim().strip_prefix(self.prefix)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }

    pub fn format(&self, n: u64) -> String {
        format!("{}{:0width$}", self.prefix, n, width = self.width)
    }

    pub fn next<'a, I>(&self, ids: I) -> String
    where
        I: IntoIterator<Item = &'a str>,
    {
        let highest = ids
            .into_iter()
            .filter_map(|id| self.parse(id))
            .fold(self.start, u64::max);
        self.format(highest.saturating_add(1))
    }
}
