//! Host test doubles for the register block and the clock

use core::cell::{Cell, RefCell};

use heapless::{Deque, Vec};
use spinel_hal::registers::{status, PinDirections};
use spinel_hal::{Monotonic, SpiRegisters};

/// Maximum number of data register writes recorded by the stub
pub const MAX_RECORDED: usize = 256;

/// How the stub raises the transfer-complete flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Flag always reads as set
    Immediate,
    /// Flag never sets
    Never,
    /// Flag sets only when the test calls [`BusStub::complete_exchange`]
    Manual,
}

/// What the data register returns on read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Peer {
    /// The last byte written
    Echo,
    /// The byte latched by the last completed exchange (MISO tied to MOSI)
    Loopback,
    /// Bytes queued with [`BusStub::queue`], zero once drained
    Script,
}

/// Register block stub
pub struct BusStub {
    completion: Completion,
    peer: Peer,
    control: Cell<u8>,
    status: Cell<u8>,
    shift: Cell<u8>,
    latch: Cell<u8>,
    script: RefCell<Deque<u8, 64>>,
    writes: RefCell<Vec<u8, MAX_RECORDED>>,
    reads: Cell<usize>,
    idle_polls: Cell<usize>,
    pins: Cell<Option<PinDirections>>,
}

impl BusStub {
    pub fn new(completion: Completion, peer: Peer) -> Self {
        Self {
            completion,
            peer,
            control: Cell::new(0),
            status: Cell::new(0),
            shift: Cell::new(0),
            latch: Cell::new(0),
            script: RefCell::new(Deque::new()),
            writes: RefCell::new(Vec::new()),
            reads: Cell::new(0),
            idle_polls: Cell::new(0),
            pins: Cell::new(None),
        }
    }

    /// Stub that completes every byte at once and echoes writes
    pub fn immediate() -> Self {
        Self::new(Completion::Immediate, Peer::Echo)
    }

    /// Queue bytes for the data register to return
    pub fn queue(&self, bytes: &[u8]) {
        let mut script = self.script.borrow_mut();
        for &byte in bytes {
            let _ = script.push_back(byte);
        }
    }

    /// Finish the exchange currently on the wire
    pub fn complete_exchange(&self) {
        if self.peer == Peer::Loopback {
            self.latch.set(self.shift.get());
        }
        self.status.set(self.status.get() | status::SPIF);
    }

    /// Bytes written to the data register, in order
    pub fn writes(&self) -> Vec<u8, MAX_RECORDED> {
        self.writes.borrow().clone()
    }

    /// Number of data register reads
    pub fn reads(&self) -> usize {
        self.reads.get()
    }

    /// Status polls that found the flag clear
    pub fn idle_polls(&self) -> usize {
        self.idle_polls.get()
    }

    /// Last pin directions applied
    pub fn pins(&self) -> Option<PinDirections> {
        self.pins.get()
    }
}

impl SpiRegisters for BusStub {
    fn read_control(&self) -> u8 {
        self.control.get()
    }

    fn write_control(&self, value: u8) {
        self.control.set(value);
    }

    fn read_status(&self) -> u8 {
        let value = match self.completion {
            Completion::Immediate => self.status.get() | status::SPIF,
            Completion::Never | Completion::Manual => self.status.get(),
        };
        if value & status::SPIF == 0 {
            self.idle_polls.set(self.idle_polls.get() + 1);
        }
        value
    }

    fn write_status(&self, value: u8) {
        let flags = self.status.get() & !status::SPI2X;
        self.status.set(flags | (value & status::SPI2X));
    }

    fn read_data(&self) -> u8 {
        self.reads.set(self.reads.get() + 1);
        // Reading data clears the flag
        self.status.set(self.status.get() & !status::SPIF);

        match self.peer {
            Peer::Echo => self.shift.get(),
            Peer::Loopback => self.latch.get(),
            Peer::Script => self.script.borrow_mut().pop_front().unwrap_or(0),
        }
    }

    fn write_data(&self, value: u8) {
        self.shift.set(value);
        let _ = self.writes.borrow_mut().push(value);
    }

    fn set_pin_directions(&self, pins: PinDirections) {
        self.pins.set(Some(pins));
    }
}

/// Clock that advances by a fixed step every time it is read
pub struct FakeClock {
    now: Cell<u64>,
    step: u64,
}

impl FakeClock {
    pub fn new(step: u64) -> Self {
        Self {
            now: Cell::new(0),
            step,
        }
    }

    /// Current time without advancing
    pub fn peek(&self) -> u64 {
        self.now.get()
    }
}

impl Monotonic for FakeClock {
    fn now_ms(&self) -> u64 {
        let now = self.now.get();
        self.now.set(now + self.step);
        now
    }
}
