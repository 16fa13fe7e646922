//! UniPro controller register map and CPort bit positions.
//!
//! Offsets are relative to [`crate::config::UniProConfig::unipro_base`].
//! Per-CPort word registers are laid out as arrays with a 4 byte stride.
//! Status registers pack several CPorts into each 32-bit word, so the
//! helpers below return both the register offset and the CPort's bit mask.

// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

use crate::cport::CPortId;

/// RX buffer address, per CPort
pub const AHM_ADDRESS_00: u32 = 0x0000;
/// RX pause/restart control and size, per CPort
pub const REG_RX_PAUSE_SIZE_00: u32 = 0x0400;
/// Bytes transferred into the RX buffer, per CPort
pub const CPB_RX_TRANSFERRED_DATA_SIZE_00: u32 = 0x0800;
/// TX software reset, per CPort
pub const TX_SW_RESET_00: u32 = 0x0c00;
/// RX software reset, per CPort
pub const RX_SW_RESET_00: u32 = 0x1000;
/// RX end-of-message status, 2 bits per CPort, write-one-to-clear
pub const AHM_RX_EOM_INT_BEF_0: u32 = 0x1410;
/// RX end-of-transfer (overrun) status, 1 bit per CPort
pub const AHM_RX_EOT_INT_BEF_0: u32 = 0x1510;
/// TX queue empty status, 1 bit per CPort
pub const CPB_TXQUEUEEMPTY_0: u32 = 0x1600;
/// End-to-end flow control enable, CPorts 0-31
pub const CPB_RX_E2EFC_EN_0: u32 = 0x1700;
/// End-to-end flow control enable, CPorts 32-63
pub const CPB_RX_E2EFC_EN_1: u32 = 0x1704;

/// Offset of the last register byte the driver touches
pub const REGS_LAST: u32 = CPB_RX_E2EFC_EN_1 + 3;

/// Restart bit in [`REG_RX_PAUSE_SIZE_00`]
pub const RX_PAUSE_RESTART: u32 = 1 << 31;

/// Reset strobe pattern for the TX and RX software reset registers
pub const CPORT_SW_RESET_BITS: u32 = 0x3;

/// Offset of a CPort's entry in a per-CPort word register array
pub const fn cport_word(base: u32, cportid: CPortId) -> u32 {
    base + ((cportid as u32) << 2)
}

/// Register offset and bit for a CPort's TX queue empty flag
pub const fn tx_queue_empty(cportid: CPortId) -> (u32, u32) {
    let id = cportid as u32;
    (CPB_TXQUEUEEMPTY_0 + ((id >> 5) << 2), 1 << (id & 31))
}

/// Register offset for the EOM status word holding a CPort's bits
pub const fn eom_reg(cportid: CPortId) -> u32 {
    AHM_RX_EOM_INT_BEF_0 + (((cportid as u32) >> 4) << 2)
}

/// Normal end-of-message bit within the EOM status word
pub const fn eom_nom_bit(cportid: CPortId) -> u32 {
    0x01 << (((cportid as u32) & 15) << 1)
}

/// Error end-of-message bit within the EOM status word
pub const fn eom_err_bit(cportid: CPortId) -> u32 {
    0x02 << (((cportid as u32) & 15) << 1)
}

/// Register offset for the EOT status word holding a CPort's bit
pub const fn eot_reg(cportid: CPortId) -> u32 {
    AHM_RX_EOT_INT_BEF_0 + (((cportid as u32) >> 5) << 2)
}

/// End-of-transfer bit within the EOT status word
pub const fn eot_bit(cportid: CPortId) -> u32 {
    1 << ((cportid as u32) & 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eom_bits() {
        assert_eq!(eom_nom_bit(0), 0x1);
        assert_eq!(eom_err_bit(0), 0x2);
        assert_eq!(eom_nom_bit(3), 0x40);
        assert_eq!(eom_err_bit(3), 0x80);
        assert_eq!(eom_err_bit(15), 0x8000_0000);
        assert_eq!(eom_reg(3), AHM_RX_EOM_INT_BEF_0);
        assert_eq!(eom_reg(16), AHM_RX_EOM_INT_BEF_0 + 4);
        assert_eq!(eom_nom_bit(16), 0x1);
    }

    #[test]
    fn test_eom_bits_never_overlap() {
        for a in 0..16 {
            assert_eq!(eom_nom_bit(a) & eom_err_bit(a), 0);
            for b in (0..16).filter(|b| *b != a) {
                let mask_a = eom_nom_bit(a) | eom_err_bit(a);
                let mask_b = eom_nom_bit(b) | eom_err_bit(b);
                assert_eq!(mask_a & mask_b, 0);
            }
        }
    }

    #[test]
    fn test_single_bit_registers() {
        assert_eq!(eot_bit(2), 0x4);
        assert_eq!(eot_reg(31), AHM_RX_EOT_INT_BEF_0);
        assert_eq!(eot_reg(32), AHM_RX_EOT_INT_BEF_0 + 4);
        assert_eq!(tx_queue_empty(1), (CPB_TXQUEUEEMPTY_0, 0x2));
        assert_eq!(tx_queue_empty(33), (CPB_TXQUEUEEMPTY_0 + 4, 0x2));
    }

    #[test]
    fn test_cport_word() {
        assert_eq!(cport_word(TX_SW_RESET_00, 0), TX_SW_RESET_00);
        assert_eq!(cport_word(TX_SW_RESET_00, 3), TX_SW_RESET_00 + 12);
    }
}
