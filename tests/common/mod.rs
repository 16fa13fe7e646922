// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

//! Simulated bridge used by the integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use log::LevelFilter;
use simple_logger::SimpleLogger;

use unipro_cport::config::{CPORT_BUF_SIZE, CPORT_MAX, UniProConfig};
use unipro_cport::cport::CPortId;
use unipro_cport::cport::regs;
use unipro_cport::dme::{AttrIo, AttrRead, AttrScope, AttrStatus};
use unipro_cport::io::{Mailbox, RegisterIo};

pub const CONFIG: UniProConfig = UniProConfig {
    unipro_base: 0x4000_0000,
    rx_buf_base: 0x2000_0000,
    tx_buf_base: 0x5000_0000,
    tx_window_size: 0x4000,
};

pub fn init_logging() {
    let _ = SimpleLogger::new().with_level(LevelFilter::Trace).init();
}

/// Absolute address of a register offset
pub fn reg(offset: u32) -> u32 {
    CONFIG.unipro_base + offset
}

pub fn rx_buf(cportid: CPortId) -> u32 {
    CONFIG.rx_buf_base + (cportid as u32 * CPORT_BUF_SIZE as u32)
}

pub fn tx_buf(cportid: CPortId) -> u32 {
    CONFIG.tx_buf_base + (cportid as u32 * CONFIG.tx_window_size)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Write32 { addr: u32, value: u32 },
    Write8 { addr: u32, value: u8 },
    AttrWrite { attr: u16, value: u32, selector: u16 },
    AttrRead { attr: u16 },
}

pub type EventLog = Rc<RefCell<Vec<Event>>>;

/// Bits that appear in a register after it has been read a number of times
struct Delayed {
    addr: u32,
    bits: u32,
    reads_left: usize,
}

pub struct SimRegs {
    log: EventLog,
    words: HashMap<u32, u32>,
    rx_ram: Vec<u8>,
    tx_ram: Vec<u8>,
    delayed: Vec<Delayed>,
    reads: HashMap<u32, usize>,
}

impl SimRegs {
    pub fn new(log: EventLog) -> Self {
        let mut words = HashMap::new();
        // TX queues start out empty
        words.insert(reg(regs::CPB_TXQUEUEEMPTY_0), u32::MAX);
        Self {
            log,
            words,
            rx_ram: vec![0; CPORT_MAX * CPORT_BUF_SIZE],
            tx_ram: vec![0; CPORT_MAX * CONFIG.tx_window_size as usize],
            delayed: Vec::new(),
            reads: HashMap::new(),
        }
    }

    pub fn word(&self, addr: u32) -> u32 {
        self.words.get(&addr).copied().unwrap_or(0)
    }

    pub fn set_word(&mut self, addr: u32, value: u32) {
        self.words.insert(addr, value);
    }

    /// OR `bits` into the register at `addr` once it has been read
    /// `reads` times.
    pub fn set_bits_after(&mut self, addr: u32, bits: u32, reads: usize) {
        self.delayed.push(Delayed {
            addr,
            bits,
            reads_left: reads,
        });
    }

    pub fn read_count(&self, addr: u32) -> usize {
        self.reads.get(&addr).copied().unwrap_or(0)
    }

    /// Simulate the hardware completing a frame on a CPort
    pub fn deliver(&mut self, cportid: CPortId, payload: &[u8]) {
        let start = rx_buf(cportid) - CONFIG.rx_buf_base;
        let start = start as usize;
        self.rx_ram[start..start + payload.len()].copy_from_slice(payload);
        self.set_word(
            reg(regs::cport_word(
                regs::CPB_RX_TRANSFERRED_DATA_SIZE_00,
                cportid,
            )),
            payload.len() as u32,
        );
        let eom = reg(regs::eom_reg(cportid));
        let value = self.word(eom) | regs::eom_nom_bit(cportid);
        self.set_word(eom, value);
    }

    pub fn tx_bytes(&self, cportid: CPortId, len: usize) -> &[u8] {
        let start = (tx_buf(cportid) - CONFIG.tx_buf_base) as usize;
        &self.tx_ram[start..start + len]
    }

    fn is_w1c(addr: u32) -> bool {
        (0..CPORT_MAX as CPortId).any(|id| addr == reg(regs::eom_reg(id)))
    }

    fn rx_index(addr: u32) -> Option<usize> {
        let end = CONFIG.rx_buf_base + (CPORT_MAX * CPORT_BUF_SIZE) as u32;
        (CONFIG.rx_buf_base..end)
            .contains(&addr)
            .then(|| (addr - CONFIG.rx_buf_base) as usize)
    }

    fn tx_index(addr: u32) -> Option<usize> {
        let end = CONFIG.tx_buf_base + CPORT_MAX as u32 * CONFIG.tx_window_size;
        (CONFIG.tx_buf_base..end)
            .contains(&addr)
            .then(|| (addr - CONFIG.tx_buf_base) as usize)
    }
}

impl RegisterIo for SimRegs {
    fn read8(&mut self, addr: u32) -> u8 {
        if let Some(i) = Self::rx_index(addr) {
            self.rx_ram[i]
        } else if let Some(i) = Self::tx_index(addr) {
            self.tx_ram[i]
        } else {
            panic!("read8 from unmapped address {addr:#010X}")
        }
    }

    fn read32(&mut self, addr: u32) -> u32 {
        *self.reads.entry(addr).or_default() += 1;

        let mut raised = 0;
        self.delayed.retain_mut(|d| {
            if d.addr != addr {
                true
            } else if d.reads_left == 0 {
                raised |= d.bits;
                false
            } else {
                d.reads_left -= 1;
                true
            }
        });
        if raised != 0 {
            let value = self.word(addr) | raised;
            self.set_word(addr, value);
        }

        self.word(addr)
    }

    fn write8(&mut self, addr: u32, value: u8) {
        self.log.borrow_mut().push(Event::Write8 { addr, value });
        if let Some(i) = Self::tx_index(addr) {
            self.tx_ram[i] = value;
        } else {
            panic!("write8 to unmapped address {addr:#010X}")
        }
    }

    fn write32(&mut self, addr: u32, value: u32) {
        self.log.borrow_mut().push(Event::Write32 { addr, value });
        if Self::is_w1c(addr) {
            let current = self.word(addr);
            self.set_word(addr, current & !value);
        } else {
            self.set_word(addr, value);
        }
    }

    fn slice(&self, addr: u32, len: usize) -> &[u8] {
        let start = Self::rx_index(addr).expect("slice outside RX RAM");
        &self.rx_ram[start..start + len]
    }
}

pub struct SimDme {
    log: EventLog,
    /// Index of the attribute write which fails, counting from 0
    pub fail_write: Option<usize>,
    pub writes: usize,
    /// Scripted reads, used in order
    pub reads: VecDeque<AttrRead>,
    /// Returned once `reads` is exhausted
    pub default_read: AttrRead,
    pub read_count: usize,
}

impl SimDme {
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            fail_write: None,
            writes: 0,
            reads: VecDeque::new(),
            default_read: AttrRead {
                value: 0,
                result_code: 0,
                status: 0,
            },
            read_count: 0,
        }
    }
}

impl AttrIo for SimDme {
    fn attr_read(&mut self, attr: u16, _selector: u16, scope: AttrScope) -> AttrRead {
        assert_eq!(scope, AttrScope::Local);
        self.log.borrow_mut().push(Event::AttrRead { attr });
        self.read_count += 1;
        self.reads.pop_front().unwrap_or(self.default_read)
    }

    fn attr_write(
        &mut self,
        attr: u16,
        value: u32,
        selector: u16,
        scope: AttrScope,
    ) -> AttrStatus {
        assert_eq!(scope, AttrScope::Local);
        self.log.borrow_mut().push(Event::AttrWrite {
            attr,
            value,
            selector,
        });
        let index = self.writes;
        self.writes += 1;
        if self.fail_write == Some(index) {
            AttrStatus {
                result_code: 0x1,
                status: -5,
            }
        } else {
            AttrStatus::ok()
        }
    }
}

pub struct SimMailbox {
    pub value: Result<u32, i32>,
    pub ack_result: Result<(), i32>,
    pub acked: Vec<u16>,
}

impl SimMailbox {
    pub fn new(value: Result<u32, i32>) -> Self {
        Self {
            value,
            ack_result: Ok(()),
            acked: Vec::new(),
        }
    }
}

impl Mailbox for SimMailbox {
    fn read(&mut self) -> Result<u32, i32> {
        self.value
    }

    fn ack(&mut self, value: u16) -> Result<(), i32> {
        self.acked.push(value);
        self.ack_result
    }
}

/// A fresh simulated bridge: registers, attributes and their shared log
pub fn sim() -> (SimRegs, SimDme, EventLog) {
    init_logging();
    let log = EventLog::default();
    (SimRegs::new(log.clone()), SimDme::new(log.clone()), log)
}
