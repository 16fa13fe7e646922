//! CPort table.
//!
//! The table is created once, from the memory map, and never grows or
//! shrinks.  Buffer addresses are fixed by the memory map, so every CPort
//! owns its buffers for the lifetime of the driver and no two CPorts alias.

// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

pub mod regs;

use crate::config::{CPORT_BUF_SIZE, CPORT_MAX, UniProConfig};
use crate::{Error, Result};

/// CPort identifier, `0 <= id < CPORT_MAX`
pub type CPortId = u16;

/// A single hardware communication endpoint.
///
/// Only [`CPortTable`] creates these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CPort {
    id: CPortId,
    tx_buf: u32,
    rx_buf: u32,
    eom: u32,
}

impl CPort {
    const UNSET: CPort = CPort {
        id: 0,
        tx_buf: 0,
        rx_buf: 0,
        eom: 0,
    };

    /// This CPort's index in the table
    pub fn id(&self) -> CPortId {
        self.id
    }

    /// Address of the TX buffer
    pub fn tx_buf(&self) -> u32 {
        self.tx_buf
    }

    /// Address of the RX buffer
    pub fn rx_buf(&self) -> u32 {
        self.rx_buf
    }

    /// Address of the end-of-message trigger, the last byte of the TX window
    pub fn eom(&self) -> u32 {
        self.eom
    }
}

/// Static table of CPorts.
///
/// `N` must be at least [`CPORT_MAX`]; a smaller table fails to build.
/// Entries beyond `CPORT_MAX` exist but are never handed out.
pub struct CPortTable<const N: usize = CPORT_MAX> {
    cports: [CPort; N],
}

impl<const N: usize> CPortTable<N> {
    /// Lay out the table according to `config`.
    ///
    /// Returns [`Error::InvalidArgument`] if a TX window is too small to hold
    /// a full frame ahead of its EOM trigger, or if any buffer would run past
    /// the end of the 32-bit address space.
    pub const fn new(config: &UniProConfig) -> Result<Self> {
        const { assert!(N >= CPORT_MAX, "CPort table smaller than CPORT_MAX") };

        if config.tx_window_size as usize <= CPORT_BUF_SIZE {
            return Err(Error::InvalidArgument);
        }

        let mut cports = [CPort::UNSET; N];
        let mut i = 0;
        while i < N {
            let Some((tx_buf, eom)) = window(config.tx_buf_base, i, config.tx_window_size)
            else {
                return Err(Error::InvalidArgument);
            };
            let Some((rx_buf, _)) = window(config.rx_buf_base, i, CPORT_BUF_SIZE as u32) else {
                return Err(Error::InvalidArgument);
            };
            cports[i] = CPort {
                id: i as CPortId,
                tx_buf,
                rx_buf,
                eom,
            };
            i += 1;
        }

        Ok(Self { cports })
    }

    /// Look up a CPort by id.  Returns `None` for `id >= CPORT_MAX`.
    pub fn lookup(&self, id: CPortId) -> Option<&CPort> {
        if id as usize >= CPORT_MAX {
            return None;
        }
        self.cports.get(id as usize)
    }

    /// Iterate over the usable CPorts, in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = &CPort> {
        self.cports.iter().take(CPORT_MAX)
    }
}

/// First and last address of window `index` of `size` bytes starting at
/// `base`, or `None` if it does not fit below 4GB.  `size` must be non-zero.
const fn window(base: u32, index: usize, size: u32) -> Option<(u32, u32)> {
    if index > u32::MAX as usize {
        return None;
    }
    let Some(offset) = (index as u32).checked_mul(size) else {
        return None;
    };
    let Some(first) = base.checked_add(offset) else {
        return None;
    };
    let Some(last) = first.checked_add(size - 1) else {
        return None;
    };
    Some((first, last))
}
