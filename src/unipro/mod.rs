//! UniPro CPort protocol engine.
//!
//! See [`crate`] for an overview.  [`UniPro`] is the driver's context
//! object, and the engines are split across the submodules:
//! - [`reset`] - per-CPort and all-CPort reset
//! - [`rx`] - arming and polling of the receive path
//! - [`tx`] - sending a frame
//! - [`assign`] - mailbox based CPort assignment
//! - [`link`] - link-up wait and boot-stage transitions

// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

pub mod assign;
pub mod link;
pub mod reset;
pub mod rx;
pub mod tx;

#[allow(unused_imports)]
use log::{debug, error, info, trace, warn};

use crate::config::UniProConfig;
use crate::cport::regs::REGS_LAST;
use crate::cport::{CPort, CPortId, CPortTable};
use crate::dme::AttrIo;
use crate::io::RegisterIo;
use crate::{Error, Result};

pub use rx::{RxHandler, RxStatus};

/// Driver context.
///
/// Construct exactly once at startup and pass by reference to whatever
/// drives the boot stage.  Holds exclusive borrows of the register and
/// attribute capabilities for as long as it lives.
pub struct UniPro<'a, R: RegisterIo, A: AttrIo> {
    regs: &'a mut R,
    dme: &'a mut A,
    config: UniProConfig,
    table: CPortTable,
}

impl<'a, R: RegisterIo, A: AttrIo> UniPro<'a, R, A> {
    /// Create the driver context.
    ///
    /// Arguments:
    /// - `regs` - Object implementing [`RegisterIo`] to access the UniPro
    ///   registers and CPort buffers
    /// - `dme` - Object implementing [`AttrIo`] to access DME attributes
    /// - `config` - Memory map of the chip
    ///
    /// No hardware is touched.  Call [`Self::init_cport()`] on each CPort
    /// before receiving on it.
    ///
    /// Returns [`Error::InvalidArgument`] if `config` lays out TX windows no
    /// larger than [`crate::config::CPORT_BUF_SIZE`], or places the register
    /// window or any CPort buffer past the end of the address space.
    pub fn new(regs: &'a mut R, dme: &'a mut A, config: UniProConfig) -> Result<Self> {
        debug!(
            "UniPro at {:#010X}, RX buffers {:#010X}, TX buffers {:#010X}",
            config.unipro_base, config.rx_buf_base, config.tx_buf_base
        );

        if config.unipro_base.checked_add(REGS_LAST).is_none() {
            error!("UniPro registers at {:#010X} overflow", config.unipro_base);
            return Err(Error::InvalidArgument);
        }
        let table: CPortTable = CPortTable::new(&config).inspect_err(|_| {
            error!(
                "Invalid CPort buffer layout, TX window {:#X}",
                config.tx_window_size
            )
        })?;

        Ok(Self {
            regs,
            dme,
            config,
            table,
        })
    }

    /// Initialize a CPort, arming its receive path.
    pub fn init_cport(&mut self, cportid: CPortId) -> Result<()> {
        let cport = self.cport(cportid)?;
        self.arm_receive(&cport);
        Ok(())
    }

    /// Look up a CPort
    pub fn lookup(&self, cportid: CPortId) -> Option<&CPort> {
        self.table.lookup(cportid)
    }

    /// The CPort table
    pub fn table(&self) -> &CPortTable {
        &self.table
    }

    /// Memory map in use
    pub fn config(&self) -> &UniProConfig {
        &self.config
    }
}

// Internal functions
impl<R: RegisterIo, A: AttrIo> UniPro<'_, R, A> {
    fn cport(&self, cportid: CPortId) -> Result<CPort> {
        self.table
            .lookup(cportid)
            .copied()
            .ok_or(Error::InvalidArgument)
    }

    fn read_reg(&mut self, offset: u32) -> u32 {
        self.regs.read32(self.config.unipro_base + offset)
    }

    fn write_reg(&mut self, offset: u32, value: u32) {
        self.regs.write32(self.config.unipro_base + offset, value)
    }
}
