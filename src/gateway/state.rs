use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::pipeline::SearchPipeline;

#[derive(Clone)]
pub struct HandlerState {
    pub pipeline: Arc<SearchPipeline>,

    accepting: Arc<AtomicBool>,
}

impl HandlerState {
    pub fn new(pipeline: Arc<SearchPipeline>) -> Self {
        Self {
            pipeline,
            accepting: Arc::new(AtomicBool::new(true)),
        }
    }

    /// `false` once graceful shutdown has begun.
    pub fn is_accepting(&self) -> bool {
        self.accepting.load(Ordering::Acquire)
    }

    /// Makes `/ready` report not-ready so load balancers stop routing here.
    pub fn begin_drain(&self) {
        self.accepting.store(false, Ordering::Release);
    }
}
