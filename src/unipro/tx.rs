//! Transmit path.

// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

#[allow(unused_imports)]
use log::{debug, error, info, trace, warn};

use crate::config::{CPORT_BUF_SIZE, CPORT_MAX};
use crate::cport::CPortId;
use crate::dme::AttrIo;
use crate::io::RegisterIo;
use crate::unipro::UniPro;
use crate::{Error, Result};

impl<R: RegisterIo, A: AttrIo> UniPro<'_, R, A> {
    /// Send a frame down a CPort.
    ///
    /// The payload is copied into the CPort's TX buffer a byte at a time, and
    /// the end-of-message trigger is hit.  Returns once the frame is queued;
    /// there is no wait for transmission or acknowledgement.  Flow control is
    /// handled by the hardware's credit mechanism.
    ///
    /// Fails with [`Error::InvalidArgument`], writing nothing, for an unknown
    /// CPort or a payload larger than [`CPORT_BUF_SIZE`].
    pub fn send(&mut self, cportid: CPortId, data: &[u8]) -> Result<()> {
        if cportid as usize >= CPORT_MAX || data.len() > CPORT_BUF_SIZE {
            return Err(Error::InvalidArgument);
        }
        let cport = self.cport(cportid)?;

        let tx_buf = cport.tx_buf();
        for (i, byte) in data.iter().enumerate() {
            self.regs.write8(tx_buf + i as u32, *byte);
        }

        // Hit EOM
        self.regs.write8(cport.eom(), 1);

        trace!("Sent {} bytes on cport {cportid}", data.len());
        Ok(())
    }
}
