use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use crate::{
    domain::ConfirmOptions,
    models::{ClientContext, ClientError},
    services::ProgramRegistry,
};

/// Per-call execution settings handed to an operation handler.
///
/// Clones share the cancellation flag, so a clone kept by the caller can cancel a running
/// operation. Cancellation is cooperative: handlers check it between network round trips
/// and nothing already accepted by the ledger is undone.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    cancelled: Arc<AtomicBool>,
    confirm_options: Option<ConfirmOptions>,
    programs: Option<Arc<ProgramRegistry>>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_confirm_options(mut self, confirm_options: ConfirmOptions) -> Self {
        self.confirm_options = Some(confirm_options);
        self
    }

    /// Overrides the client's program registry for this call only.
    pub fn with_programs(mut self, programs: Arc<ProgramRegistry>) -> Self {
        self.programs = Some(programs);
        self
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub fn throw_if_canceled(&self) -> Result<(), ClientError> {
        if self.is_cancelled() {
            return Err(ClientError::Cancelled);
        }
        Ok(())
    }

    pub fn confirm_options(&self, ctx: &ClientContext) -> ConfirmOptions {
        self.confirm_options
            .unwrap_or_else(|| ConfirmOptions::from(&ctx.config))
    }

    pub fn programs<'a>(&'a self, ctx: &'a ClientContext) -> &'a ProgramRegistry {
        self.programs.as_deref().unwrap_or(&*ctx.programs)
    }
}
