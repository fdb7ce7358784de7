//! Terminal rendering of notices.

use at_core::ports::{Notice, NoticeLevel, NoticePort};
use tracing::trace;

/// Prints notices to stderr, keeping stdout for command output.
///
/// The printed line is what the user sees. The matching tracing event is kept
/// at trace, below every default filter, so the stderr layer does not print it
/// a second time.
pub struct ConsoleNotices;

impl NoticePort for ConsoleNotices {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success => {
                trace!(notice = %notice, level = "success", "notice");
                eprintln!("{}", notice);
            }
            NoticeLevel::Error => {
                trace!(notice = %notice, level = "error", "notice");
                eprintln!("error: {}", notice);
            }
        }
    }
}
