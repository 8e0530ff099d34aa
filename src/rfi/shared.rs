// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! An [`RfiVector`] that many detection producers can feed at once.

use std::sync::Mutex;

use super::{Detection, RfiError, RfiVector, Upsert};

/// A lock around an [`RfiVector`]. The lock is held over the whole
/// find-then-update-or-create, so two threads can never both decide that the
/// same frequency is new.
#[derive(Debug)]
pub struct SharedRfiVector {
    inner: Mutex<RfiVector>,
}

impl SharedRfiVector {
    pub fn new(rfis: RfiVector) -> SharedRfiVector {
        SharedRfiVector {
            inner: Mutex::new(rfis),
        }
    }

    /// See [`RfiVector::record_detection`].
    pub fn record_detection(
        &self,
        detection: &Detection,
        fract_error: f64,
    ) -> Result<Upsert, RfiError> {
        let mut rfis = self.inner.lock().map_err(|_| RfiError::Poisoned)?;
        rfis.record_detection(detection, fract_error)
    }

    /// Run `f` with the collection locked.
    pub fn with<T, F: FnOnce(&RfiVector) -> T>(&self, f: F) -> Result<T, RfiError> {
        let rfis = self.inner.lock().map_err(|_| RfiError::Poisoned)?;
        Ok(f(&rfis))
    }

    pub fn into_inner(self) -> Result<RfiVector, RfiError> {
        self.inner.into_inner().map_err(|_| RfiError::Poisoned)
    }
}
