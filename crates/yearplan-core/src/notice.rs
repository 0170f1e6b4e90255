//! User-visible success and failure notices.

use std::collections::VecDeque;
use std::fmt;

/// How many notices are kept before the oldest are dropped.
const MAX_NOTICES: usize = 50;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Failure,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Failure,
            message: message.into(),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.level == NoticeLevel::Failure
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[derive(Clone, Debug, Default)]
pub struct Notices {
    queue: VecDeque<Notice>,
}

impl Notices {
    pub fn push(&mut self, notice: Notice) {
        if self.queue.len() == MAX_NOTICES {
            self.queue.pop_front();
        }
        self.queue.push_back(notice);
    }

    /// Take every queued notice, oldest first.
    pub fn drain(&mut self) -> Vec<Notice> {
        self.queue.drain(..).collect()
    }

    pub fn latest(&self) -> Option<&Notice> {
        self.queue.back()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_returns_oldest_first() {
        let mut notices = Notices::default();
        notices.push(Notice::success("Column added"));
        notices.push(Notice::failure("Could not save cell: timeout"));
        assert!(notices.latest().unwrap().is_failure());

        let all = notices.drain();
        assert_eq!(all[0].message, "Column added");
        assert!(notices.is_empty());
    }

    #[test]
    fn queue_is_bounded() {
        let mut notices = Notices::default();
        for i in 0..(MAX_NOTICES + 5) {
            notices.push(Notice::success(format!("n{}", i)));
        }
        assert_eq!(notices.len(), MAX_NOTICES);
        assert_eq!(notices.drain()[0].message, "n5");
    }
}
