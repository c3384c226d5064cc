//! Wrap-around cursor over the daily forecast list.

use crate::model::DailyForecast;

/// Where a card sits in the three-card window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    Previous,
    Current,
    Next,
}

impl Position {
    pub fn as_str(&self) -> &'static str {
        match self {
            Position::Previous => "previous",
            Position::Current => "current",
            Position::Next => "next",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleDay<'a> {
    pub day: &'a DailyForecast,
    pub position: Position,
}

/// Day carousel. `index < days.len()` whenever `days` is non-empty.
#[derive(Debug, Clone, Default)]
pub struct Carousel {
    days: Vec<DailyForecast>,
    index: usize,
}

impl Carousel {
    pub fn new(days: Vec<DailyForecast>) -> Self {
        Self { days, index: 0 }
    }

    pub fn days(&self) -> &[DailyForecast] {
        &self.days
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Cursor position, `None` when there are no days.
    pub fn index(&self) -> Option<usize> {
        (!self.days.is_empty()).then_some(self.index)
    }

    pub fn current(&self) -> Option<&DailyForecast> {
        self.days.get(self.index)
    }

    pub fn previous(&mut self) {
        if self.days.is_empty() {
            return;
        }
        self.index = if self.index == 0 { self.days.len() - 1 } else { self.index - 1 };
    }

    pub fn next(&mut self) {
        if self.days.is_empty() {
            return;
        }
        self.index = if self.index + 1 >= self.days.len() { 0 } else { self.index + 1 };
    }

    /// Move forward `steps` days, wrapping around.
    pub fn advance(&mut self, steps: usize) {
        if self.days.is_empty() {
            return;
        }
        self.index = (self.index + steps % self.days.len()) % self.days.len();
    }

    /// Swap in a freshly fetched list, clamping the cursor into range.
    pub fn replace_days(&mut self, days: Vec<DailyForecast>) {
        self.index = self.index.min(days.len().saturating_sub(1));
        self.days = days;
    }

    /// Previous, current and next day around the cursor; empty when there are no days.
    pub fn visible_window(&self) -> Vec<VisibleDay<'_>> {
        let len = self.days.len();
        if len == 0 {
            return Vec::new();
        }

        let prev = (self.index + len - 1) % len;
        let next = (self.index + 1) % len;

        vec![
            VisibleDay { day: &self.days[prev], position: Position::Previous },
            VisibleDay { day: &self.days[self.index], position: Position::Current },
            VisibleDay { day: &self.days[next], position: Position::Next },
        ]
    }
}
