//! DME attribute access.
//!
//! Attributes are the link-management configuration registers exposed by the
//! UniPro stack, addressed by a 16-bit id and a selector (0, or the CPort id
//! for per-CPort attributes).  Their access primitive is chip-specific, so
//! the driver consumes it through [`AttrIo`].
//!
//! Each access reports two independent codes which are always surfaced
//! together:
//! - `status` - transport-level status of the access primitive itself, 0 on
//!   success
//! - `result_code` - the UniPro configuration result code returned by the
//!   link entity

// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

/// CPort connection state
pub const T_CONNECTIONSTATE: u16 = 0x4020;
/// Local receive buffer space
pub const T_LOCALBUFFERSPACE: u16 = 0x4028;
/// Peer receive buffer space
pub const T_PEERBUFFERSPACE: u16 = 0x4029;
/// Credits pending transmission to the peer
pub const T_CREDITSTOSEND: u16 = 0x402a;

/// Bridge-specific power state attribute
pub const TSB_POWERSTATE: u16 = 0xd083;
/// [`TSB_POWERSTATE`] value once the link is up
pub const POWERSTATE_LINKUP: u32 = 0x2;

/// Which link entity an attribute access targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrScope {
    /// This bridge's own attribute
    Local,
    /// The attribute of the peer at the other end of the link
    Peer,
}

/// Outcome of an attribute write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttrStatus {
    /// UniPro configuration result code
    pub result_code: u32,
    /// Transport status, 0 on success
    pub status: i32,
}

impl AttrStatus {
    /// A successful write: zero status and result code
    pub const fn ok() -> Self {
        Self {
            result_code: 0,
            status: 0,
        }
    }

    /// Whether the access primitive succeeded
    pub fn is_ok(&self) -> bool {
        self.status == 0
    }
}

/// Outcome of an attribute read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttrRead {
    /// Value read, only meaningful if [`Self::is_ok()`]
    pub value: u32,
    /// UniPro configuration result code
    pub result_code: u32,
    /// Transport status, 0 on success
    pub status: i32,
}

impl AttrRead {
    /// Whether the access primitive succeeded
    pub fn is_ok(&self) -> bool {
        self.status == 0
    }
}

/// Trait for accessing DME attributes.
pub trait AttrIo {
    /// Read attribute `attr` with `selector` on the local or peer entity
    fn attr_read(&mut self, attr: u16, selector: u16, scope: AttrScope) -> AttrRead;

    /// Write `value` to attribute `attr` with `selector` on the local or peer
    /// entity
    fn attr_write(&mut self, attr: u16, value: u32, selector: u16, scope: AttrScope)
    -> AttrStatus;
}
