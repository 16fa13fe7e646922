//! Hardware access traits consumed by the driver.
//!
//! This module contains the register access and mailbox capabilities the
//! driver needs from its host environment, plus [`MmioIo`], a direct
//! volatile implementation of [`RegisterIo`] for use on the chip itself.
//!
//! # Address Space
//!
//! The methods use absolute addresses as they appear in the bridge's memory
//! map: the UniPro register window, the RX buffer RAM and the TX buffer
//! window are all described by [`crate::config::UniProConfig`].
//!
//! Implementations used for simulation are responsible for translating these
//! addresses to whatever internal representation they use.

// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

use core::sync::atomic::{Ordering, fence};

/// Trait for accessing the UniPro registers and CPort buffers.
///
/// Every access must be a genuine, ordered side effect: implementations may
/// not cache, merge, elide or reorder them.  The driver relies on this when
/// it writes reset strobes and then polls status bits.
pub trait RegisterIo {
    /// Ordered 8-bit read
    fn read8(&mut self, addr: u32) -> u8;

    /// Ordered 32-bit read
    fn read32(&mut self, addr: u32) -> u32;

    /// Ordered 8-bit write
    fn write8(&mut self, addr: u32, value: u8);

    /// Ordered 32-bit write
    fn write32(&mut self, addr: u32, value: u32);

    /// Read-only view of `len` bytes of buffer memory starting at `addr`.
    ///
    /// Only used on an RX buffer once the hardware has signalled
    /// end-of-message for it, so the contents are stable for the lifetime of
    /// the returned slice.
    fn slice(&self, addr: u32, len: usize) -> &[u8];
}

/// Single-slot mailbox shared with the peer boot stage.
///
/// Errors carry the primitive's raw status, which the driver propagates
/// without interpretation.
pub trait Mailbox {
    /// Read the pending mailbox value
    fn read(&mut self) -> core::result::Result<u32, i32>;

    /// Acknowledge a mailbox value
    fn ack(&mut self, value: u16) -> core::result::Result<(), i32>;
}

/// [`RegisterIo`] implementation using direct volatile memory access.
#[derive(Clone, Copy)]
pub struct MmioIo;

impl MmioIo {
    /// Create a new MmioIo instance.
    ///
    /// ```rust,ignore
    /// static mut REGS: MmioIo = MmioIo::new();
    /// ```
    // We need a new() rather than a default() as it must be const.
    #[allow(clippy::new_without_default)]
    pub const fn new() -> Self {
        Self {}
    }
}

impl RegisterIo for MmioIo {
    fn read8(&mut self, addr: u32) -> u8 {
        unsafe { core::ptr::read_volatile(addr as *const u8) }
    }

    fn read32(&mut self, addr: u32) -> u32 {
        unsafe { core::ptr::read_volatile(addr as *const u32) }
    }

    fn write8(&mut self, addr: u32, value: u8) {
        unsafe { core::ptr::write_volatile(addr as *mut u8, value) }
    }

    fn write32(&mut self, addr: u32, value: u32) {
        unsafe { core::ptr::write_volatile(addr as *mut u32, value) }
    }

    fn slice(&self, addr: u32, len: usize) -> &[u8] {
        // Buffer reads must not be hoisted above the status read that
        // reported the frame complete.
        fence(Ordering::Acquire);
        unsafe { core::slice::from_raw_parts(addr as *const u8, len) }
    }
}
