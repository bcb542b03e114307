//! Lock-protected focus authority for a single audio zone.

use crate::error::Result;
use crate::listener::FocusListener;
use crate::request::{ClientId, FocusRequest, UserId};
use crate::stack::{Dispatch, EntryState, FocusSnapshot, FocusStack};
use gainkeeper_events::FocusOutcome;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Something the listener has to be told.
enum Notice {
    Result(FocusRequest, FocusOutcome),
    Dispatch(Dispatch),
}

/// Clears the draining flag even if a listener panics.
struct DrainGuard<'a>(&'a AtomicBool);

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Requests of one application uid tracked by a zone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UidFocus {
    /// Ducked-out or pending requests.
    pub losers: Vec<FocusRequest>,
    /// Active requests.
    pub holders: Vec<FocusRequest>,
}

impl UidFocus {
    pub fn is_empty(&self) -> bool {
        self.losers.is_empty() && self.holders.is_empty()
    }
}

/// The single arbitration authority for one audio zone.
///
/// Every operation runs against the stack under one lock and queues its
/// notifications before that lock is released, so the queue order is the
/// order in which the stack changed. One thread at a time drains the queue
/// into the listener with no engine lock held; a listener may call back
/// into the zone, and whatever that call queues is delivered after the
/// current notice. A call can return before its own notices are delivered
/// when another thread is draining.
pub struct AudioFocus {
    zone_id: u32,
    stack: Mutex<FocusStack>,
    outbox: Mutex<VecDeque<Notice>>,
    draining: AtomicBool,
    listener: Arc<dyn FocusListener>,
}

impl AudioFocus {
    pub fn new(zone_id: u32, stack: FocusStack, listener: Arc<dyn FocusListener>) -> Self {
        Self {
            zone_id,
            stack: Mutex::new(stack),
            outbox: Mutex::new(VecDeque::new()),
            draining: AtomicBool::new(false),
            listener,
        }
    }

    pub fn zone_id(&self) -> u32 {
        self.zone_id
    }

    fn lock(&self) -> MutexGuard<'_, FocusStack> {
        self.stack.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn outbox(&self) -> MutexGuard<'_, VecDeque<Notice>> {
        self.outbox.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue dispatches. Callers hold the stack lock.
    fn post(&self, dispatches: Vec<Dispatch>) {
        self.outbox().extend(dispatches.into_iter().map(Notice::Dispatch));
    }

    /// Deliver queued notices unless another thread already is.
    fn drain(&self) {
        loop {
            if self
                .draining
                .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
                .is_err()
            {
                return;
            }

            {
                let _guard = DrainGuard(&self.draining);
                loop {
                    let next = self.outbox().pop_front();
                    match next {
                        Some(notice) => self.deliver(notice),
                        None => break,
                    }
                }
            }

            // Notices queued between the last pop and releasing the flag
            if self.outbox().is_empty() {
                return;
            }
        }
    }

    fn deliver(&self, notice: Notice) {
        match notice {
            Notice::Result(request, outcome) => self.listener.on_result(&request, outcome),
            Notice::Dispatch(dispatch) => {
                tracing::debug!(
                    zone = self.zone_id,
                    client = %dispatch.entry.client_id(),
                    change = ?dispatch.change,
                    "dispatching focus change"
                );
                self.listener.on_dispatch(&dispatch.entry, dispatch.change);
            }
        }
    }

    /// Request focus. The listener hears the outcome exactly once, before
    /// any dispatch the request caused.
    pub fn request(&self, request: FocusRequest) -> Result<FocusOutcome> {
        let decision = {
            let mut stack = self.lock();
            let decision = stack.request(request.clone());
            let outcome = match &decision {
                Ok(decision) => decision.outcome,
                Err(_) => FocusOutcome::Failed,
            };
            self.outbox().push_back(Notice::Result(request.clone(), outcome));
            decision.map(|decision| {
                self.post(decision.dispatches);
                decision.outcome
            })
        };
        self.drain();

        decision.map_err(|e| {
            tracing::error!(zone = self.zone_id, client = %request.client_id, error = %e, "focus arbitration failed");
            e
        })
    }

    /// Release focus held or awaited by `request`.
    pub fn abandon(&self, request: &FocusRequest) -> Result<()> {
        {
            let mut stack = self.lock();
            let dispatches = stack.abandon(request)?;
            self.post(dispatches);
        }
        self.drain();
        Ok(())
    }

    /// Select the user whose settings drive the interaction override.
    pub fn set_user_id_for_settings(&self, user_id: Option<UserId>) {
        self.lock().set_user_id_for_settings(user_id);
    }

    pub fn holders_for_uid(&self, uid: u32) -> Vec<FocusRequest> {
        self.lock().holders_for_uid(uid)
    }

    pub fn losers_for_uid(&self, uid: u32) -> Vec<FocusRequest> {
        self.lock().losers_for_uid(uid)
    }

    /// Everything a uid has in this zone, read under one lock.
    pub fn focus_for_uid(&self, uid: u32) -> UidFocus {
        let stack = self.lock();
        UidFocus {
            losers: stack.losers_for_uid(uid),
            holders: stack.holders_for_uid(uid),
        }
    }

    /// Transiently take focus away from the given requests.
    pub fn transiently_lose(&self, requests: &[FocusRequest]) -> Result<()> {
        {
            let mut stack = self.lock();
            let dispatches = stack.transiently_lose(requests)?;
            self.post(dispatches);
        }
        self.drain();
        Ok(())
    }

    /// Re-arbitrate a request on the host's behalf.
    ///
    /// The client is not sent a result; it learns of a grant through a gain
    /// dispatch.
    pub fn reevaluate_and_regain(&self, request: FocusRequest) -> Result<FocusOutcome> {
        let outcome = {
            let mut stack = self.lock();
            let decision = stack.reevaluate_and_regain(request)?;
            self.post(decision.dispatches);
            decision.outcome
        };
        self.drain();
        Ok(outcome)
    }

    pub fn state_of(&self, client_id: &ClientId) -> Option<EntryState> {
        self.lock().state_of(client_id)
    }

    pub fn snapshot(&self) -> FocusSnapshot {
        self.lock().snapshot()
    }
}
