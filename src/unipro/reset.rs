//! CPort reset.

// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

#[allow(unused_imports)]
use log::{debug, error, info, trace, warn};

use crate::config::CPORT_MAX;
use crate::cport::CPortId;
use crate::cport::regs::{
    CPORT_SW_RESET_BITS, RX_SW_RESET_00, TX_SW_RESET_00, cport_word, tx_queue_empty,
};
use crate::dme::{
    AttrIo, AttrScope, T_CONNECTIONSTATE, T_CREDITSTOSEND, T_LOCALBUFFERSPACE, T_PEERBUFFERSPACE,
};
use crate::io::RegisterIo;
use crate::unipro::UniPro;
use crate::{Error, Result};

/// Connection attributes cleared while a CPort is held in reset, in the
/// order they are written.
pub const RESET_ATTRS: [(u16, &str); 4] = [
    (T_CONNECTIONSTATE, "T_CONNECTIONSTATE"),
    (T_LOCALBUFFERSPACE, "T_LOCALBUFFERSPACE"),
    (T_PEERBUFFERSPACE, "T_PEERBUFFERSPACE"),
    (T_CREDITSTOSEND, "T_CREDITSTOSEND"),
];

impl<R: RegisterIo, A: AttrIo> UniPro<'_, R, A> {
    /// Reset a single CPort.
    ///
    /// Waits for the CPort's TX queue to drain, then holds TX in reset while
    /// the connection attributes are cleared, then strobes RX reset and
    /// releases both.
    ///
    /// The TX queue wait has no timeout.
    ///
    /// If an attribute write fails the sequence stops there with
    /// [`Error::Io`], leaving TX held in reset and the remaining attributes
    /// untouched.
    pub fn reset_one(&mut self, cportid: CPortId) -> Result<()> {
        if cportid as usize >= CPORT_MAX {
            return Err(Error::InvalidArgument);
        }

        let (empty_offset, empty_bit) = tx_queue_empty(cportid);
        while self.read_reg(empty_offset) & empty_bit == 0 {
            core::hint::spin_loop();
        }

        let tx_reset = cport_word(TX_SW_RESET_00, cportid);
        let rx_reset = cport_word(RX_SW_RESET_00, cportid);

        self.write_reg(tx_reset, CPORT_SW_RESET_BITS);

        for (attr, name) in RESET_ATTRS {
            let status = self.dme.attr_write(attr, 0, cportid, AttrScope::Local);
            if !status.is_ok() {
                error!(
                    "Can't reset {name} on cport {cportid}: status {} result {:#x}",
                    status.status, status.result_code
                );
                return Err(Error::Io);
            }
        }

        self.write_reg(rx_reset, CPORT_SW_RESET_BITS);
        self.write_reg(tx_reset, 0);
        self.write_reg(rx_reset, 0);

        trace!("Reset cport {cportid}");
        Ok(())
    }

    /// Reset every CPort in ascending id order, stopping at the first
    /// failure.
    ///
    /// A failure is returned as [`Error::Reset`] carrying the failing CPort's
    /// id.  Later CPorts are left untouched.
    pub fn reset_all(&mut self) -> Result<()> {
        for cportid in 0..CPORT_MAX as CPortId {
            if let Err(e) = self.reset_one(cportid) {
                error!("Can't reset cport {cportid:#x}: {e:?}");
                return Err(Error::Reset(cportid));
            }
        }

        info!("Reset all cports");
        Ok(())
    }
}
