//! Receive path.
//!
//! A CPort only accepts a frame while its receive path is armed: its RX
//! buffer address and the maximum transfer size are registered with the
//! controller.  Completing a frame disarms it, so [`UniPro::receive()`]
//! re-arms after each successful dispatch.  Error and overrun completions
//! are left disarmed - the CPort needs a reset before further use.

// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

#[allow(unused_imports)]
use log::{debug, error, info, trace, warn};

use crate::config::CPORT_BUF_SIZE;
use crate::cport::regs::{
    AHM_ADDRESS_00, CPB_RX_TRANSFERRED_DATA_SIZE_00, REG_RX_PAUSE_SIZE_00, RX_PAUSE_RESTART,
    cport_word, eom_err_bit, eom_nom_bit, eom_reg, eot_bit, eot_reg,
};
use crate::cport::{CPort, CPortId};
use crate::dme::AttrIo;
use crate::io::RegisterIo;
use crate::unipro::UniPro;
use crate::{Error, Result};

/// Frame handler.
///
/// Called with the CPort id and a view of the received bytes (exactly the
/// transferred length).  Its return value becomes the result of
/// [`UniPro::receive()`].
pub type RxHandler<'h> = &'h mut dyn FnMut(CPortId, &[u8]) -> i32;

/// Outcome of one poll of a CPort's receive status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RxStatus {
    /// Nothing has completed
    Idle,
    /// Hardware flagged an error end-of-message
    Error,
    /// Hardware flagged an end-of-transfer (buffer overrun)
    Overflow,
    /// A frame is complete in the RX buffer
    Complete,
}

/// Classify a CPort's bits from the EOM and EOT status words.
///
/// Errors win over data: error-EOM is checked first, then EOT, then normal
/// EOM.
pub fn classify(cportid: CPortId, eom: u32, eot: u32) -> RxStatus {
    if eom & eom_err_bit(cportid) != 0 {
        RxStatus::Error
    } else if eot & eot_bit(cportid) != 0 {
        RxStatus::Overflow
    } else if eom & eom_nom_bit(cportid) != 0 {
        RxStatus::Complete
    } else {
        RxStatus::Idle
    }
}

impl<R: RegisterIo, A: AttrIo> UniPro<'_, R, A> {
    /// Arm, or re-arm, a CPort's receive path.
    pub fn arm_receive(&mut self, cport: &CPort) {
        let cportid = cport.id();

        self.write_reg(cport_word(AHM_ADDRESS_00, cportid), cport.rx_buf());
        self.write_reg(
            cport_word(REG_RX_PAUSE_SIZE_00, cportid),
            RX_PAUSE_RESTART | CPORT_BUF_SIZE as u32,
        );

        trace!("Armed cport {cportid} RX at {:#010X}", cport.rx_buf());
    }

    /// Poll a CPort for a received frame, dispatching it to `handler`.
    ///
    /// Arguments:
    /// - `cportid` - CPort to poll
    /// - `handler` - Optional handler for a completed frame
    /// - `blocking` - Keep polling until a frame completes or an error is
    ///   reported.  If false, poll exactly once.
    ///
    /// Returns the handler's return value, or 0 if no handler was supplied or
    /// a non-blocking poll found nothing.  [`Error::Receive`] and
    /// [`Error::Overflow`] leave the receive path disarmed.
    pub fn receive(
        &mut self,
        cportid: CPortId,
        handler: Option<RxHandler<'_>>,
        blocking: bool,
    ) -> Result<i32> {
        let cport = self.cport(cportid)?;

        loop {
            match self.rx_status(cportid) {
                RxStatus::Error => {
                    error!("UniPro cport {cportid} Rx err");
                    return Err(Error::Receive);
                }
                RxStatus::Overflow => {
                    error!("UniPro cport {cportid} Rx data overflow");
                    return Err(Error::Overflow);
                }
                RxStatus::Complete => return self.dispatch(&cport, handler),
                RxStatus::Idle if !blocking => return Ok(0),
                RxStatus::Idle => core::hint::spin_loop(),
            }
        }
    }

    /// Read this CPort's receive status, without acting on it.
    ///
    /// Returns [`Error::InvalidArgument`], without reading any register, for
    /// an out of range `cportid`.
    pub fn poll_receive(&mut self, cportid: CPortId) -> Result<RxStatus> {
        let cport = self.cport(cportid)?;
        Ok(self.rx_status(cport.id()))
    }
}

// Internal functions
impl<R: RegisterIo, A: AttrIo> UniPro<'_, R, A> {
    // cportid must already have been checked against the table
    fn rx_status(&mut self, cportid: CPortId) -> RxStatus {
        let eom = self.read_reg(eom_reg(cportid));
        let eot = self.read_reg(eot_reg(cportid));
        classify(cportid, eom, eot)
    }

    fn dispatch(&mut self, cport: &CPort, handler: Option<RxHandler<'_>>) -> Result<i32> {
        let cportid = cport.id();
        let len = self.read_reg(cport_word(CPB_RX_TRANSFERRED_DATA_SIZE_00, cportid)) as usize;
        if len > CPORT_BUF_SIZE {
            error!("UniPro cport {cportid} Rx size {len} exceeds buffer");
            return Err(Error::Overflow);
        }

        // Write-one-to-clear
        self.write_reg(eom_reg(cportid), eom_nom_bit(cportid));

        debug!("Received {len} bytes on cport {cportid}");

        let mut rc = 0;
        if let Some(handler) = handler {
            let data = self.regs.slice(cport.rx_buf(), len);
            rc = handler(cportid, data);
        }

        self.arm_receive(cport);
        Ok(rc)
    }
}
