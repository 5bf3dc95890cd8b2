//! Multi handle wrapper.
//!
//! A [`MultiHandle`] multiplexes many easy handles inside one non-blocking
//! driver. Attaching an easy handle moves a clone of it into the multi
//! handle's member list (the structural hold); the easy handle keeps only a
//! weak back-reference. Detaching or closing drops the hold again.
//!
//! The embedder polls [`MultiHandle::perform`] from its own loop until it
//! reports zero running transfers, collecting completions with
//! [`MultiHandle::info_read`].

use std::cell::{Cell, Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use tracing::{debug, instrument, warn};

use crate::easy::{EasyHandle, PERFORM_RUNNING, RunningGuard};
use crate::error::BindingError;
use crate::host::{MULTI_TYPE_NAME, OutRef, Value};
use crate::module::InterruptFlag;
use crate::native::NativeMulti;

/// Upper bound on a single readiness wait.
const MAX_WAIT: Duration = Duration::from_secs(30 * 86_400);

fn closed() -> BindingError {
    BindingError::Closed {
        type_name: MULTI_TYPE_NAME,
    }
}

pub(crate) struct MultiShared {
    flags: Cell<u32>,
    state: RefCell<MultiState>,
}

struct MultiState {
    native: Option<NativeMulti>,
    members: Vec<EasyHandle>,
}

impl MultiState {
    /// Detaches every member, reporting the first native failure.
    fn detach_all(&mut self) -> Result<(), BindingError> {
        let mut result = Ok(());
        let Some(native) = &self.native else {
            return result;
        };
        for easy in self.members.drain(..) {
            if let Err(e) = easy.detach(native) {
                warn!(easy = easy.id(), error = %e, "failed to detach easy handle");
                if result.is_ok() {
                    result = Err(e);
                }
            }
        }
        result
    }
}

impl Drop for MultiShared {
    fn drop(&mut self) {
        let _ = self.state.get_mut().detach_all();
    }
}

/// Script-visible multi handle (`Curl_Multi_Type`).
#[derive(Clone)]
pub struct MultiHandle(pub(crate) Rc<MultiShared>);

impl MultiHandle {
    /// Creates an empty multi handle.
    ///
    /// # Errors
    ///
    /// Returns a native error if allocation fails.
    #[instrument(level = "debug")]
    pub fn new() -> Result<Self, BindingError> {
        let native = NativeMulti::new()?;
        Ok(Self(Rc::new(MultiShared {
            flags: Cell::new(0),
            state: RefCell::new(MultiState {
                native: Some(native),
                members: Vec::new(),
            }),
        })))
    }

    /// Number of attached easy handles.
    ///
    /// # Errors
    ///
    /// Fails once the handle is closed.
    pub fn length(&self) -> Result<usize, BindingError> {
        Ok(self.state()?.members.len())
    }

    /// Attached-handle count for bookkeeping; a closed handle has no members,
    /// so this reads zero where [`MultiHandle::length`] fails.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0
            .state
            .try_borrow()
            .map_or(0, |state| state.members.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.0
            .state
            .try_borrow()
            .is_ok_and(|state| state.native.is_none())
    }

    /// Whether `easy` is attached here.
    #[must_use]
    pub fn contains(&self, easy: &EasyHandle) -> bool {
        self.0
            .state
            .try_borrow()
            .is_ok_and(|state| state.members.contains(easy))
    }

    fn is_running(&self) -> bool {
        self.0.flags.get() & PERFORM_RUNNING != 0
    }

    fn state(&self) -> Result<Ref<'_, MultiState>, BindingError> {
        let state = self.0.state.try_borrow().map_err(|_| BindingError::Running)?;
        if state.native.is_none() {
            return Err(closed());
        }
        Ok(state)
    }

    /// Borrows the state for a structural change, rejecting it while this
    /// handle or any member is mid-transfer.
    fn state_mut(&self) -> Result<RefMut<'_, MultiState>, BindingError> {
        if self.is_running() {
            return Err(BindingError::Running);
        }
        let state = self
            .0
            .state
            .try_borrow_mut()
            .map_err(|_| BindingError::Running)?;
        if state.native.is_none() {
            return Err(closed());
        }
        if state.members.iter().any(EasyHandle::is_running) {
            return Err(BindingError::Running);
        }
        Ok(state)
    }

    /// Attaches `easy`.
    ///
    /// # Errors
    ///
    /// Fails if either handle is closed or running, if `easy` is already
    /// attached to any multi handle, or if the library refuses it.
    #[instrument(level = "debug", skip_all, fields(easy = easy.id()))]
    pub fn add(&self, easy: &EasyHandle) -> Result<(), BindingError> {
        let mut state = self.state_mut()?;
        let native = state.native.as_ref().ok_or_else(closed)?;
        easy.attach(native, Rc::downgrade(&self.0))?;
        state.members.push(easy.clone());
        debug!(members = state.members.len(), "easy handle attached");
        Ok(())
    }

    /// Detaches `easy`.
    ///
    /// The handle is unlinked even when the library reports a failure, which
    /// is then returned.
    ///
    /// # Errors
    ///
    /// Fails if either handle is closed or running, or if `easy` is not
    /// attached here.
    #[instrument(level = "debug", skip_all, fields(easy = easy.id()))]
    pub fn remove(&self, easy: &EasyHandle) -> Result<(), BindingError> {
        if easy.is_running() {
            return Err(BindingError::Running);
        }
        let mut guard = self.state_mut()?;
        let state = &mut *guard;
        let index = state
            .members
            .iter()
            .position(|member| member == easy)
            .ok_or_else(|| {
                BindingError::invalid_parameter(
                    "Curl_Type is not attached to this Curl_Multi_Type object",
                )
            })?;
        let member = state.members.remove(index);
        let native = state.native.as_ref().ok_or_else(closed)?;
        let result = member.detach(native);
        debug!(members = state.members.len(), "easy handle detached");
        result
    }

    /// Detaches every member and releases the native handle.
    ///
    /// The members stay open and usable.
    ///
    /// # Errors
    ///
    /// Fails while running or when already closed.
    #[instrument(level = "debug", skip(self))]
    pub fn close(&self) -> Result<(), BindingError> {
        let mut state = self.state_mut()?;
        let detached = state.detach_all();
        state.native = None;
        debug!("multi handle closed");
        detached
    }

    /// Drives all attached transfers as far as they can go without blocking.
    ///
    /// A positive `timeout_secs` first waits, for at most that long, until a
    /// socket is ready; a failed wait is treated as readiness. The
    /// non-blocking step is then repeated while the library asks for it,
    /// stopping early when `interrupt` is raised.
    ///
    /// Returns the number of transfers still running. An interrupted drive
    /// reports every attached handle as running.
    ///
    /// # Errors
    ///
    /// Fails if the handle is closed, has no members, is already running, or
    /// the library reports a multi error.
    #[instrument(level = "debug", skip(self, interrupt))]
    pub fn perform(
        &self,
        timeout_secs: f64,
        interrupt: &InterruptFlag,
    ) -> Result<usize, BindingError> {
        let timeout = if timeout_secs > 0.0 {
            Duration::try_from_secs_f64(timeout_secs).map_or(MAX_WAIT, |d| d.min(MAX_WAIT))
        } else {
            Duration::ZERO
        };

        if self.is_running() {
            return Err(BindingError::Running);
        }
        let state = self.state()?;
        if state.members.iter().any(EasyHandle::is_running) {
            return Err(BindingError::Running);
        }
        if state.members.is_empty() {
            return Err(BindingError::invalid_parameter(
                "The Curl_Multi_Type object has no handles",
            ));
        }
        let native = state.native.as_ref().ok_or_else(closed)?;

        let _running = RunningGuard::new(&self.0.flags);
        let _members: Vec<RunningGuard<'_>> = state
            .members
            .iter()
            .map(|easy| RunningGuard::new(easy.flags()))
            .collect();

        match drive(timeout, |t| native.wait(t), || native.perform(), interrupt)? {
            Some(running) => Ok(usize::try_from(running).unwrap_or(usize::MAX)),
            None => Ok(state.members.len()),
        }
    }

    /// Pops one completed transfer.
    ///
    /// When `status` is given the transfer's native result code is stored in
    /// it. The returned handle is still attached.
    ///
    /// # Errors
    ///
    /// Fails while running or once closed.
    pub fn info_read(&self, status: Option<&OutRef>) -> Result<Option<EasyHandle>, BindingError> {
        if self.is_running() {
            return Err(BindingError::Running);
        }
        let state = self.state()?;
        let native = state.native.as_ref().ok_or_else(closed)?;
        let Some((token, code)) = native.info_read()? else {
            return Ok(None);
        };
        let Some(easy) = state.members.iter().find(|easy| easy.id() == token) else {
            warn!(token, "completion for a handle that is no longer attached");
            return Ok(None);
        };
        if let Some(status) = status {
            status.set(Value::Int(i64::from(code)));
        }
        debug!(easy = token, code, "transfer completed");
        Ok(Some(easy.clone()))
    }
}

impl PartialEq for MultiHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// Waits for readiness, then steps until the library stops asking to be
/// called again. `None` means `interrupt` cut the loop short.
///
/// A failed wait only costs the readiness hint; stepping goes ahead.
fn drive<W, S>(
    timeout: Duration,
    wait: W,
    mut step: S,
    interrupt: &InterruptFlag,
) -> Result<Option<u32>, BindingError>
where
    W: FnOnce(Duration) -> Result<u32, BindingError>,
    S: FnMut() -> Result<Option<u32>, BindingError>,
{
    if !timeout.is_zero() {
        if let Err(e) = wait(timeout) {
            warn!(error = %e, "readiness wait failed, driving transfers anyway");
        }
    }
    loop {
        if let Some(running) = step()? {
            debug!(running, "drive step complete");
            return Ok(Some(running));
        }
        if interrupt.is_raised() {
            debug!("drive loop interrupted");
            return Ok(None);
        }
    }
}

impl fmt::Debug for MultiHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiHandle")
            .field("members", &self.len())
            .field("closed", &self.is_closed())
            .finish()
    }
}
