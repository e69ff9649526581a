//! Test-only gateways with scripted replies.
//!
//! Tests drive the pipeline against these instead of a live model: replies
//! come from a fixed queue, and every prompt sent is captured for assertions.

use std::cell::RefCell;
use std::collections::VecDeque;

use anyhow::{Result, bail};

use crate::io::gateway::Gateway;

/// Gateway that answers from a fixed queue of replies and records every
/// prompt it receives.
pub struct ScriptedGateway {
    replies: RefCell<VecDeque<String>>,
    seen_prompts: RefCell<Vec<String>>,
}

impl ScriptedGateway {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: RefCell::new(replies.into_iter().map(Into::into).collect()),
            seen_prompts: RefCell::new(Vec::new()),
        }
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.seen_prompts.borrow().clone()
    }

    /// Panic if any scripted replies were left unconsumed; a drained queue
    /// proves the pipeline made exactly the expected number of calls.
    pub fn assert_drained(&self) {
        let remaining = self.replies.borrow().len();
        assert!(
            remaining == 0,
            "scripted gateway still holds {remaining} unconsumed replies"
        );
    }
}

impl Gateway for ScriptedGateway {
    fn complete(&self, prompt: &str) -> Result<String> {
        self.seen_prompts.borrow_mut().push(prompt.to_string());
        match self.replies.borrow_mut().pop_front() {
            Some(reply) => Ok(reply),
            None => bail!("scripted gateway exhausted"),
        }
    }
}

/// Gateway whose every call fails, for exercising error propagation.
pub struct FailingGateway;

impl Gateway for FailingGateway {
    fn complete(&self, _prompt: &str) -> Result<String> {
        bail!("gateway unavailable")
    }
}
