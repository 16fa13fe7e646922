//! Firmware-over-UniPro boot glue.
//!
//! Before loading firmware over UniPro the boot ROM services the control
//! CPort until the peer connects the data CPort
//! ([`crate::config::FW_OVER_UNIPRO_CPORT`]).  The control protocol handler
//! reports that connection through [`DataPort::connected()`]; the data CPort
//! is then armed for receive.
//!
//! ```rust,ignore
//! let data_port = DataPort::new();
//! let mut handler = |cportid, frame: &[u8]| control_protocol(&data_port, cportid, frame);
//! data_port.wait_connected(&mut unipro, &mut handler)?;
//! ```

// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

use core::cell::Cell;

#[allow(unused_imports)]
use log::{debug, error, info, trace, warn};

use crate::config::{CONTROL_CPORT, FW_OVER_UNIPRO_CPORT};
use crate::cport::CPortId;
use crate::dme::AttrIo;
use crate::io::RegisterIo;
use crate::unipro::UniPro;
use crate::{Error, Result};

/// Control handler result which aborts [`DataPort::wait_connected()`]
pub const HANDLER_ABORT: i32 = -1;

/// Connection state of the firmware data CPort.
///
/// Shared by reference between the control protocol handler, which reports
/// connection events, and the boot flow waiting on them.
#[derive(Debug, Default)]
pub struct DataPort {
    connected: Cell<bool>,
    armed: Cell<bool>,
}

impl DataPort {
    /// Create a data port which is neither connected nor armed
    pub const fn new() -> Self {
        Self {
            connected: Cell::new(false),
            armed: Cell::new(false),
        }
    }

    /// The peer has connected the data CPort.  Only one connection is
    /// supported per boot.
    pub fn connected(&self) -> Result<()> {
        if self.connected.get() {
            warn!("Data port already connected");
            return Err(Error::InvalidState);
        }

        info!("Data port connected");
        self.connected.set(true);
        Ok(())
    }

    /// The peer has disconnected the data CPort.
    ///
    /// Fails if it was never connected.  The boot ROM does not support
    /// reconnection, so the connection is not forgotten.
    pub fn disconnected(&self) -> Result<()> {
        if !self.connected.get() {
            return Err(Error::InvalidState);
        }
        debug!("Data port disconnected");
        Ok(())
    }

    /// Whether the peer has connected the data CPort
    pub fn is_connected(&self) -> bool {
        self.connected.get()
    }

    /// Service the control CPort until the data CPort is connected, then arm
    /// the data CPort.
    ///
    /// `handler` runs the control protocol on each control frame, and must
    /// call [`Self::connected()`] when the peer connects.  A handler result
    /// of `-1`, or any receive failure, aborts the wait.  Other handler
    /// results, negative ones included, are logged and the wait carries on
    /// with the next control frame.
    pub fn wait_connected<R, A, F>(
        &self,
        unipro: &mut UniPro<'_, R, A>,
        handler: &mut F,
    ) -> Result<()>
    where
        R: RegisterIo,
        A: AttrIo,
        F: FnMut(CPortId, &[u8]) -> i32,
    {
        while !self.connected.get() {
            let rc = unipro.receive(CONTROL_CPORT, Some(&mut *handler), true)?;
            if rc == HANDLER_ABORT {
                error!("Control handler failed: {rc}");
                return Err(Error::Receive);
            } else if rc < 0 {
                warn!("Control handler returned {rc}, waiting for next frame");
            }
        }

        if !self.armed.get() {
            unipro.init_cport(FW_OVER_UNIPRO_CPORT)?;
            self.armed.set(true);
        }

        Ok(())
    }
}
