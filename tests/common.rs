//! Common test utilities for the gridlearn test suite.
//!
//! Provides a learner that plays a fixed script of actions and records every
//! feedback it receives, so engine behavior can be checked deterministically.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use gridlearn::{Action, ActionValues, Feedback, Learner, Position, Result};

/// Shared log of the feedback delivered to a [`ScriptedLearner`].
pub type FeedbackLog = Arc<Mutex<Vec<Feedback>>>;

/// Learner that replays `script` in order, cycling when it runs out.
pub struct ScriptedLearner {
    script: Vec<Action>,
    next: usize,
    log: FeedbackLog,
}

impl ScriptedLearner {
    pub fn new(script: Vec<Action>) -> (Self, FeedbackLog) {
        assert!(!script.is_empty(), "script needs at least one action");
        let log = FeedbackLog::default();
        let learner = Self {
            script,
            next: 0,
            log: Arc::clone(&log),
        };
        (learner, log)
    }
}

impl Learner for ScriptedLearner {
    fn choose_action(&mut self, _position: Position) -> Result<Action> {
        let action = self.script[self.next % self.script.len()];
        self.next += 1;
        Ok(action)
    }

    fn learn(&mut self, feedback: &Feedback) -> Result<()> {
        self.log.lock().unwrap().push(*feedback);
        Ok(())
    }

    fn action_spread(&self, _position: Position) -> ActionValues {
        ActionValues::zeros()
    }

    fn epsilon(&self) -> f64 {
        0.0
    }

    fn name(&self) -> &str {
        "Scripted"
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

/// Rewards recorded so far, in delivery order.
pub fn rewards(log: &FeedbackLog) -> Vec<f64> {
    log.lock().unwrap().iter().map(|feedback| feedback.reward).collect()
}
