//! Shared wizard state for the onboarding orchestrator.
//!
//! 向导共享状态：一个状态互斥锁加一个派发锁。

use std::sync::Arc;

use po_core::wizard::WizardState;
use tokio::sync::{Mutex, MutexGuard};

/// Wizard state plus the lock that serializes transitions.
///
/// Take `dispatch_lock` before `state` when both are needed. A transition,
/// its persistence commands and the state swap all happen under
/// `dispatch_lock`. The registration call does not: `submit` releases the
/// lock once `SubmitRequested` has flagged the submission, and re-takes it
/// only to apply the outcome. While the call is out, the `is_submitting`
/// flag in the state is the only guard against a second call.
///
/// 注册请求在派发锁之外执行；期间由状态中的提交标记防止重复提交。
pub struct WizardContext {
    state: Mutex<WizardState>,
    dispatch_lock: Mutex<()>,
}

impl WizardContext {
    pub fn new(initial_state: WizardState) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(initial_state),
            dispatch_lock: Mutex::new(()),
        })
    }

    /// Readers see the last committed state, never a half-applied one.
    pub async fn snapshot(&self) -> WizardState {
        self.state.lock().await.clone()
    }

    pub async fn lock_dispatch(&self) -> MutexGuard<'_, ()> {
        self.dispatch_lock.lock().await
    }

    /// Commits the result of a transition. Callers hold the dispatch lock.
    pub async fn commit(&self, next: WizardState) {
        *self.state.lock().await = next;
    }

    /// True while a registration call is out.
    pub async fn is_submitting(&self) -> bool {
        self.state.lock().await.submission.is_submitting()
    }
}
