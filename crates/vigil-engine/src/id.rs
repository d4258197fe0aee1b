//! Alert id generation.

use chrono::Utc;
use parking_lot::Mutex;
use vigil_alert_types::AlertId;

/// Highest sequence number within one millisecond.
pub const MAX_SEQUENCE: u16 = 9999;

/// Generates `ALT-<epoch-millis>-<seq>` ids that never repeat within a
/// process.
///
/// When more than `MAX_SEQUENCE + 1` ids are requested in one millisecond,
/// or the clock steps backwards, the millisecond part is advanced past the
/// last one handed out instead of reusing a value.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: Mutex<Option<(i64, u16)>>,
}

impl IdGenerator {
    /// Create a new generator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce the next id.
    pub fn next_id(&self) -> AlertId {
        let (millis, seq) = self.advance(Utc::now().timestamp_millis());
        AlertId::from_parts(millis, seq)
    }

    fn advance(&self, now_millis: i64) -> (i64, u16) {
        let mut last = self.last.lock();
        let next = match *last {
            Some((millis, seq)) if now_millis <= millis => {
                if seq >= MAX_SEQUENCE {
                    (millis + 1, 0)
                } else {
                    (millis, seq + 1)
                }
            }
            _ => (now_millis, 0),
        };
        *last = Some(next);
        next
    }
}
