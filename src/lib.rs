//! UniPro CPort data-link driver for bridge boot ROMs.
//!
//! This crate drives the fixed set of UniPro CPorts (hardware communication
//! endpoints) on a bridge microcontroller while it is still executing from
//! boot ROM - before any operating system, timer service or interrupt
//! handling is available.  Everything is polled from a single thread of
//! control.
//!
//! `no_std`, and performs no dynamic memory allocation.
//!
//! ## Architecture
//!
//! Each CPort owns two buffers in dedicated on-chip memory:
//! - a **TX buffer**, written by software one byte at a time, and pushed onto
//!   the link by hitting the CPort's end-of-message (EOM) trigger
//! - an **RX buffer**, written by the hardware, whose address is registered
//!   with the receive engine ("arming") before each frame
//!
//! The driver is built around a single context object, [`unipro::UniPro`],
//! which is constructed once at startup.  It borrows the two hardware
//! capabilities it needs and owns the static [`cport::CPortTable`]:
//! - [`io::RegisterIo`] - volatile 8/32-bit access to the UniPro register
//!   window and the CPort buffers
//! - [`dme::AttrIo`] - read/write of DME attributes on the local or peer
//!   link entity
//!
//! The engines are methods on the context object:
//! - **Reset** - [`unipro::UniPro::reset_one()`] and
//!   [`unipro::UniPro::reset_all()`]
//! - **RX** - [`unipro::UniPro::arm_receive()`] and
//!   [`unipro::UniPro::receive()`]
//! - **TX** - [`unipro::UniPro::send()`]
//! - **Assignment** - [`unipro::UniPro::recv_cport()`], using an
//!   [`io::Mailbox`]
//! - **Link readiness** - [`unipro::UniPro::wait_for_link_up()`],
//!   [`unipro::UniPro::prepare_for_readiness()`] and
//!   [`unipro::UniPro::prepare_for_handoff()`]
//!
//! As the context object holds exclusive borrows of the hardware, and every
//! engine takes `&mut self`, a CPort's reset sequence can never interleave
//! with RX or TX use of the same CPort.
//!
//! [`fwou`] contains the boot-stage glue which waits for the peer to connect
//! the firmware-over-UniPro data CPort.
//!
//! ## Getting Started
//!
//! ```rust,ignore
//! use unipro_cport::config::{CONTROL_CPORT, UniProConfig};
//! use unipro_cport::io::MmioIo;
//! use unipro_cport::unipro::UniPro;
//!
//! let mut regs = MmioIo::new();
//! let mut dme = ChipDme::new(); // implement dme::AttrIo for your chip
//! let mut unipro = UniPro::new(&mut regs, &mut dme, UniProConfig::TSB)?;
//!
//! unipro.wait_for_link_up();
//! unipro.prepare_for_readiness();
//! unipro.init_cport(CONTROL_CPORT)?;
//! let rc = unipro.receive(CONTROL_CPORT, Some(&mut |cportid, data: &[u8]| {
//!     // Handle frame
//!     0
//! }), true)?;
//! ```
//!
//! ## Logging
//!
//! The crate logs through the [`log`] facade.  No logger is installed by the
//! crate itself.

// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

#![no_std]

pub mod config;
pub mod cport;
pub mod dme;
pub mod fwou;
pub mod io;
pub mod unipro;

const EIO: i32 = 5;
const EINVAL: i32 = 22;

/// Driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Unknown CPort, oversize payload or malformed mailbox value
    InvalidArgument,
    /// Attribute access failed
    Io,
    /// Resetting this CPort failed, stopping a reset of all CPorts
    Reset(cport::CPortId),
    /// Hardware reported an error while receiving a frame
    Receive,
    /// Receive buffer overrun
    Overflow,
    /// Mailbox primitive failed, with its status
    Mailbox(i32),
    /// Operation not valid in the current connection state
    InvalidState,
    /// Gave up polling
    Timeout,
}

impl Error {
    /// Integer return code for this error, as used at the boot-stage
    /// orchestrator boundary.
    pub fn code(&self) -> i32 {
        match self {
            Error::InvalidArgument => -EINVAL,
            Error::Io | Error::Reset(_) => -EIO,
            Error::Mailbox(status) => *status,
            Error::Receive | Error::Overflow | Error::InvalidState | Error::Timeout => -1,
        }
    }
}

/// Type to represent the result of a driver operation
pub type Result<T> = core::result::Result<T, Error>;
