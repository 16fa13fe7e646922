//! Build-time constants and the bridge memory map.

// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

/// Number of CPorts driven by the boot ROM
pub const CPORT_MAX: usize = 8;

/// Size of each CPort's RX buffer, and the largest frame that can be sent
pub const CPORT_BUF_SIZE: usize = 0x2000;

/// CPort carrying the control protocol during boot
pub const CONTROL_CPORT: u16 = 0;

/// CPort the peer connects to stream firmware over UniPro
pub const FW_OVER_UNIPRO_CPORT: u16 = 1;

/// Memory map used by the driver.
///
/// All addresses are absolute, as passed to [`crate::io::RegisterIo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniProConfig {
    /// Base of the UniPro controller register window
    pub unipro_base: u32,
    /// Base of the RX buffer RAM.  CPort `n` receives into
    /// `rx_buf_base + n * CPORT_BUF_SIZE`.
    pub rx_buf_base: u32,
    /// Base of the TX buffer window.  CPort `n` transmits from
    /// `tx_buf_base + n * tx_window_size`.
    pub tx_buf_base: u32,
    /// Size of each CPort's TX window.  The last byte of the window is the
    /// CPort's end-of-message trigger.
    pub tx_window_size: u32,
}

impl UniProConfig {
    /// Memory map of the Toshiba APBridge/GPBridge (ES2 and ES3)
    pub const TSB: UniProConfig = UniProConfig {
        unipro_base: 0x4005_0000,
        rx_buf_base: 0x2000_0000,
        tx_buf_base: 0x5000_0000,
        tx_window_size: 0x2_0000,
    };
}

impl Default for UniProConfig {
    fn default() -> Self {
        Self::TSB
    }
}

// The EOM trigger must sit beyond the payload area of the TX window.
const _: () = assert!(UniProConfig::TSB.tx_window_size as usize > CPORT_BUF_SIZE);
