//! Dynamic CPort assignment.
//!
//! The peer boot stage tells us which CPort to use by posting its id,
//! 1-based, to the mailbox.  We acknowledge by echoing the same value back.

// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

#[allow(unused_imports)]
use log::{debug, error, info, trace, warn};

use crate::config::CPORT_MAX;
use crate::cport::CPortId;
use crate::dme::AttrIo;
use crate::io::{Mailbox, RegisterIo};
use crate::unipro::UniPro;
use crate::{Error, Result};

impl<R: RegisterIo, A: AttrIo> UniPro<'_, R, A> {
    /// Receive a dynamically assigned CPort id from the peer.
    ///
    /// Returns the 0-based id.  A mailbox failure is returned as
    /// [`Error::Mailbox`] with the primitive's status.  An id outside the
    /// table fails with [`Error::InvalidArgument`] and is not acknowledged.
    pub fn recv_cport<M: Mailbox>(&self, mailbox: &mut M) -> Result<CPortId> {
        let value = mailbox.read().map_err(Error::Mailbox)?;
        debug!("Mailbox value {value:#x}");

        // 0 wraps and is rejected with the other out of range values
        let cportid = value.wrapping_sub(1);
        if cportid as usize >= CPORT_MAX {
            warn!("Mailbox assigned out of range cport {value:#x}");
            return Err(Error::InvalidArgument);
        }

        let cport = self.lookup(cportid as CPortId).ok_or(Error::InvalidArgument)?;
        let cportid = cport.id();

        mailbox.ack(cportid + 1).map_err(Error::Mailbox)?;

        info!("Assigned cport {cportid}");
        Ok(cportid)
    }
}
