//! Link readiness and boot-stage transitions.

// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

#[allow(unused_imports)]
use log::{debug, error, info, trace, warn};

use crate::cport::regs::{CPB_RX_E2EFC_EN_0, CPB_RX_E2EFC_EN_1};
use crate::dme::{AttrIo, AttrScope, POWERSTATE_LINKUP, TSB_POWERSTATE};
use crate::io::RegisterIo;
use crate::unipro::UniPro;
use crate::{Error, Result};

impl<R: RegisterIo, A: AttrIo> UniPro<'_, R, A> {
    /// Read the local power state once.  True only if the read succeeded and
    /// reported link-up.
    pub fn poll_link_up(&mut self) -> bool {
        let read = self.dme.attr_read(TSB_POWERSTATE, 0, AttrScope::Local);
        if !read.is_ok() {
            trace!(
                "Power state read failed: status {} result {:#x}",
                read.status, read.result_code
            );
            return false;
        }
        read.value == POWERSTATE_LINKUP
    }

    /// Busy-wait until the link is up.
    ///
    /// There is no timeout, and a failed attribute read counts as "not up
    /// yet".  See [`wait_for_link_up_within()`] for a bounded version.
    pub fn wait_for_link_up(&mut self) {
        while !self.poll_link_up() {
            core::hint::spin_loop();
        }
        info!("UniPro link up");
    }

    /// Disable end-to-end flow control on all CPorts.
    pub fn disable_all_e2efc(&mut self) {
        self.write_reg(CPB_RX_E2EFC_EN_0, 0);
        self.write_reg(CPB_RX_E2EFC_EN_1, 0);
    }

    /// Prepare the CPorts before signalling readiness to the peer, so it
    /// never sees partially configured flow control.
    pub fn prepare_for_readiness(&mut self) {
        self.disable_all_e2efc();
        debug!("E2EFC disabled on all cports");
    }

    /// Reset all CPorts before handing control to the next firmware image,
    /// so no CPort configuration leaks across the boot-stage boundary.
    pub fn prepare_for_handoff(&mut self) -> Result<()> {
        self.reset_all()
    }
}

/// Wait for link-up, giving up after `max_polls` unsuccessful polls.
///
/// For orchestrators and test harnesses that need an escape hatch from
/// [`UniPro::wait_for_link_up()`].
pub fn wait_for_link_up_within<R: RegisterIo, A: AttrIo>(
    unipro: &mut UniPro<'_, R, A>,
    max_polls: usize,
) -> Result<()> {
    for _ in 0..max_polls {
        if unipro.poll_link_up() {
            info!("UniPro link up");
            return Ok(());
        }
        core::hint::spin_loop();
    }

    warn!("UniPro link not up after {max_polls} polls");
    Err(Error::Timeout)
}
