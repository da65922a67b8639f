//! bitspi-dummy - In-memory lines for testing
//!
//! This crate provides line and delay implementations that live in memory and
//! record everything the transfer engine does to them. It's useful for tests
//! and for running the CLI without hardware.
//!
//! All handles created from one [`DummyBus`] share its state. The data-in
//! line is fed from a queue of bits which is filled either by a script
//! ([`DummyBus::scripted`]) or by an echo peripheral ([`DummyBus::echo`]) that
//! latches data-out on every clock rising edge following a data-out write.

#![no_std]

extern crate alloc;

use alloc::collections::VecDeque;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::time::Duration;

use bitspi_core::{BitOrder, Connection, Delay, InputLine, Line, OutputLine};

/// Something that happened on the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Clock driven to a level
    Clock(bool),
    /// Slave-select driven to a level
    Select(bool),
    /// Data-out driven to a level
    DataOut(bool),
    /// Data-in sampled, with the value returned
    Sample(bool),
    /// Delay requested
    Sleep(Duration),
    /// Line released
    Released(Line),
}

#[derive(Debug, Default)]
struct State {
    clock: Option<bool>,
    select: Option<bool>,
    data_out: Option<bool>,
    /// Data-out was driven since the last rising edge
    data_out_fresh: bool,
    echo: bool,
    incoming: VecDeque<bool>,
    events: Vec<Event>,
}

impl State {
    fn drive(&mut self, line: Line, high: bool) {
        match line {
            Line::Clock => {
                let rising = high && self.clock != Some(true);
                self.clock = Some(high);
                self.events.push(Event::Clock(high));
                if rising && self.echo && self.data_out_fresh {
                    self.incoming.push_back(self.data_out.unwrap_or(false));
                    self.data_out_fresh = false;
                }
            }
            Line::Select => {
                self.select = Some(high);
                self.events.push(Event::Select(high));
            }
            Line::DataOut => {
                self.data_out = Some(high);
                self.data_out_fresh = true;
                self.events.push(Event::DataOut(high));
            }
            Line::DataIn => unreachable!("data-in is not an output"),
        }
    }

    fn sample(&mut self) -> bool {
        let bit = self.incoming.pop_front().unwrap_or(false);
        self.events.push(Event::Sample(bit));
        bit
    }
}

/// Connection built entirely from dummy lines
pub type DummyConnection =
    Connection<DummyOutput, DummyOutput, DummyOutput, DummyInput, DummyDelay>;

/// Shared in-memory bus
#[derive(Debug, Clone, Default)]
pub struct DummyBus {
    state: Rc<RefCell<State>>,
}

impl DummyBus {
    /// Bus whose data-in replays the bits clocked out on data-out
    pub fn echo() -> Self {
        let bus = Self::default();
        bus.state.borrow_mut().echo = true;
        bus
    }

    /// Bus whose data-in returns `bits` in order, then low
    pub fn scripted(bits: impl IntoIterator<Item = bool>) -> Self {
        let bus = Self::default();
        bus.feed(bits);
        bus
    }

    /// Queue more bits for data-in
    pub fn feed(&self, bits: impl IntoIterator<Item = bool>) {
        self.state.borrow_mut().incoming.extend(bits);
    }

    /// Queue the low `bit_count` bits of `value` so that a `read(bit_count)`
    /// under `order` returns them
    pub fn feed_value(&self, value: u64, bit_count: u32, order: BitOrder) {
        self.feed((0..bit_count).map(|pulse| (value >> order.bit_index(pulse, bit_count)) & 1 != 0));
    }

    /// Clock line handle
    pub fn clock(&self) -> DummyOutput {
        self.output(Line::Clock)
    }

    /// Slave-select line handle
    pub fn select(&self) -> DummyOutput {
        self.output(Line::Select)
    }

    /// Data-out line handle
    pub fn data_out(&self) -> DummyOutput {
        self.output(Line::DataOut)
    }

    /// Data-in line handle
    pub fn data_in(&self) -> DummyInput {
        DummyInput {
            state: self.state.clone(),
        }
    }

    /// Delay handle; records the request instead of sleeping
    pub fn delay(&self) -> DummyDelay {
        DummyDelay {
            state: self.state.clone(),
        }
    }

    /// Connection using all four lines of this bus
    pub fn connect(&self, order: BitOrder) -> DummyConnection {
        log::debug!("dummy: connecting ({})", order);
        Connection::new(
            self.clock(),
            self.select(),
            Some(self.data_in()),
            Some(self.data_out()),
            order,
            self.delay(),
        )
    }

    /// Last level driven on the clock (`None` if never driven)
    pub fn clock_level(&self) -> Option<bool> {
        self.state.borrow().clock
    }

    /// Last level driven on slave-select (`None` if never driven)
    pub fn select_level(&self) -> Option<bool> {
        self.state.borrow().select
    }

    /// Last level driven on data-out (`None` if never driven)
    pub fn data_out_level(&self) -> Option<bool> {
        self.state.borrow().data_out
    }

    /// Everything recorded so far
    pub fn events(&self) -> Vec<Event> {
        self.state.borrow().events.clone()
    }

    /// Forget recorded events (line levels and queued bits are kept)
    pub fn clear_events(&self) {
        self.state.borrow_mut().events.clear();
    }

    /// Number of clock rising edges recorded
    pub fn pulses(&self) -> usize {
        let mut clock = None;
        let mut count = 0;
        for event in self.state.borrow().events.iter() {
            if let Event::Clock(high) = *event {
                if high && clock != Some(true) {
                    count += 1;
                }
                clock = Some(high);
            }
        }
        count
    }

    /// Data-out level at every clock rising edge, in order
    pub fn clocked_out(&self) -> Vec<bool> {
        let mut data_out = false;
        let mut bits = Vec::new();
        for event in self.state.borrow().events.iter() {
            match *event {
                Event::DataOut(level) => data_out = level,
                Event::Clock(true) => bits.push(data_out),
                _ => {}
            }
        }
        bits
    }

    fn output(&self, line: Line) -> DummyOutput {
        DummyOutput {
            line,
            state: self.state.clone(),
        }
    }
}

/// Output line recording into a [`DummyBus`]
#[derive(Debug)]
pub struct DummyOutput {
    line: Line,
    state: Rc<RefCell<State>>,
}

impl OutputLine for DummyOutput {
    fn set(&mut self, high: bool) {
        self.state.borrow_mut().drive(self.line, high);
    }

    fn release(self) {
        self.state
            .borrow_mut()
            .events
            .push(Event::Released(self.line));
    }
}

/// Input line fed from a [`DummyBus`] queue
#[derive(Debug)]
pub struct DummyInput {
    state: Rc<RefCell<State>>,
}

impl InputLine for DummyInput {
    fn get(&mut self) -> bool {
        self.state.borrow_mut().sample()
    }

    fn release(self) {
        self.state
            .borrow_mut()
            .events
            .push(Event::Released(Line::DataIn));
    }
}

/// Delay that records instead of sleeping
#[derive(Debug)]
pub struct DummyDelay {
    state: Rc<RefCell<State>>,
}

impl Delay for DummyDelay {
    fn sleep(&mut self, duration: Duration) {
        self.state.borrow_mut().events.push(Event::Sleep(duration));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use bitspi_core::{Error, NoLine, DEFAULT_DWELL};

    const ORDERS: [BitOrder; 2] = [
        BitOrder::MostSignificantFirst,
        BitOrder::LeastSignificantFirst,
    ];

    #[test]
    fn test_idle_levels() {
        let bus = DummyBus::echo();
        assert_eq!(bus.clock_level(), None);

        let _conn = bus.connect(BitOrder::MostSignificantFirst);
        assert_eq!(bus.clock_level(), Some(false));
        assert_eq!(bus.select_level(), Some(true));
        assert_eq!(bus.data_out_level(), Some(false));
        assert_eq!(bus.pulses(), 0);
    }

    #[test]
    fn test_idle_levels_without_data_out() {
        let bus = DummyBus::default();
        let _conn: Connection<_, _, NoLine, _, _> = Connection::new(
            bus.clock(),
            bus.select(),
            Some(bus.data_in()),
            None,
            BitOrder::MostSignificantFirst,
            bus.delay(),
        );
        assert_eq!(bus.clock_level(), Some(false));
        assert_eq!(bus.select_level(), Some(true));
        assert_eq!(bus.data_out_level(), None);
    }

    #[test]
    fn test_select_pairing() {
        let bus = DummyBus::echo();
        let mut conn = bus.connect(BitOrder::MostSignificantFirst);

        for _ in 0..3 {
            let mut slave = conn.select_slave().unwrap();
            assert_eq!(bus.select_level(), Some(false));
            slave.write(0x5Au8, 8).unwrap();
            assert_eq!(bus.select_level(), Some(false));
            drop(slave);
            assert_eq!(bus.select_level(), Some(true));
        }

        let selects: Vec<Event> = bus
            .events()
            .into_iter()
            .filter(|e| matches!(e, Event::Select(_)))
            .collect();
        assert_eq!(
            selects,
            vec![
                Event::Select(true),
                Event::Select(false),
                Event::Select(true),
                Event::Select(false),
                Event::Select(true),
                Event::Select(false),
                Event::Select(true),
            ]
        );
    }

    #[test]
    fn test_echo_round_trip_all_bytes() {
        for order in ORDERS {
            let bus = DummyBus::echo();
            let mut conn = bus.connect(order);
            for value in 0..=255u8 {
                let mut slave = conn.select_slave().unwrap();
                slave.write(value, 8).unwrap();
                assert_eq!(slave.read(8).unwrap(), u64::from(value), "{:?}", order);
            }
        }
    }

    #[test]
    fn test_echo_round_trip_wide_words() {
        for order in ORDERS {
            let bus = DummyBus::echo();
            let mut conn = bus.connect(order);

            conn.write(0xBEEFu16, 16).unwrap();
            assert_eq!(conn.read(16).unwrap(), 0xBEEF);

            conn.write(0xDEAD_BEEFu32, 32).unwrap();
            assert_eq!(conn.read(32).unwrap(), 0xDEAD_BEEF);

            conn.write(0x0123_4567_89AB_CDEFu64, 64).unwrap();
            assert_eq!(conn.read(64).unwrap(), 0x0123_4567_89AB_CDEF);

            // Partial widths keep only the low bits
            conn.write(0xFFu8, 4).unwrap();
            assert_eq!(conn.read(4).unwrap(), 0xF);
        }
    }

    #[test]
    fn test_bit_order_symmetry() {
        for value in [0x01u8, 0x80, 0xA5, 0x3C, 0xF0] {
            let msb = DummyBus::default();
            msb.connect(BitOrder::MostSignificantFirst)
                .write(value, 8)
                .unwrap();

            let lsb = DummyBus::default();
            lsb.connect(BitOrder::LeastSignificantFirst)
                .write(value, 8)
                .unwrap();

            let mut reversed = lsb.clocked_out();
            reversed.reverse();
            assert_eq!(msb.clocked_out(), reversed);
        }
    }

    #[test]
    fn test_clocked_out_follows_index_formula() {
        let bus = DummyBus::default();
        bus.connect(BitOrder::MostSignificantFirst)
            .write(0b0000_0011u8, 8)
            .unwrap();
        assert_eq!(
            bus.clocked_out(),
            vec![true, true, false, false, false, false, false, false]
        );
    }

    #[test]
    fn test_width_guards() {
        let bus = DummyBus::echo();
        let mut conn = bus.connect(BitOrder::MostSignificantFirst);
        bus.clear_events();

        assert!(matches!(
            conn.write(0xFFu8, 9),
            Err(Error::InvalidArgument { .. })
        ));
        assert!(matches!(
            conn.read(65),
            Err(Error::InvalidArgument { .. })
        ));
        assert!(bus.events().is_empty());

        // Still usable afterwards
        conn.write(0x42u8, 8).unwrap();
        assert_eq!(conn.read(8).unwrap(), 0x42);
    }

    #[test]
    fn test_write_without_data_out() {
        let bus = DummyBus::default();
        let mut conn: Connection<_, _, NoLine, _, _> = Connection::new(
            bus.clock(),
            bus.select(),
            Some(bus.data_in()),
            None,
            BitOrder::MostSignificantFirst,
            bus.delay(),
        );
        assert_eq!(
            conn.write_bit(true),
            Err(Error::UnsupportedOperation(Line::DataOut))
        );
    }

    #[test]
    fn test_pulse_shape() {
        let bus = DummyBus::default();
        let mut conn = bus.connect(BitOrder::LeastSignificantFirst);
        bus.clear_events();

        conn.write(0x96u8, 8).unwrap();
        assert_eq!(bus.pulses(), 8);

        let events = bus.events();
        for pulse in events.chunks(4) {
            assert!(matches!(pulse[0], Event::DataOut(_)));
            assert_eq!(pulse[1], Event::Clock(true));
            match pulse[2] {
                Event::Sleep(d) => assert!(d >= DEFAULT_DWELL),
                other => panic!("expected dwell, got {:?}", other),
            }
            assert_eq!(pulse[3], Event::Clock(false));
        }

        bus.clear_events();
        conn.read(5).unwrap();
        assert_eq!(bus.pulses(), 5);
        for pulse in bus.events().chunks(4) {
            assert_eq!(pulse[0], Event::Clock(true));
            assert!(matches!(pulse[1], Event::Sleep(_)));
            assert_eq!(pulse[2], Event::Clock(false));
            assert!(matches!(pulse[3], Event::Sample(_)));
        }
    }

    #[test]
    fn test_scripted_read() {
        for order in ORDERS {
            let bus = DummyBus::default();
            bus.feed_value(0xC0FFEE, 24, order);
            let mut conn = bus.connect(order);
            assert_eq!(conn.read(24).unwrap(), 0xC0FFEE);

            // Exhausted script reads low
            assert_eq!(conn.read(8).unwrap(), 0);
        }
    }

    #[test]
    fn test_read_bytes_from_script() {
        let bus = DummyBus::default();
        let order = BitOrder::LeastSignificantFirst;
        bus.feed_value(0xEF, 8, order);
        bus.feed_value(0x40, 8, order);
        bus.feed_value(0x18, 8, order);

        let mut conn = bus.connect(order);
        let mut id = [0u8; 3];
        let mut slave = conn.select_slave().unwrap();
        slave.write_bytes(&[0x9F]).unwrap();
        slave.read_bytes(&mut id).unwrap();
        slave.release();

        assert_eq!(id, [0xEF, 0x40, 0x18]);
        assert_eq!(bus.select_level(), Some(true));
    }

    #[test]
    fn test_close_releases_all_lines() {
        let bus = DummyBus::echo();
        let conn = bus.connect(BitOrder::MostSignificantFirst);
        bus.clear_events();
        conn.close();
        assert_eq!(
            bus.events(),
            vec![
                Event::Released(Line::Clock),
                Event::Released(Line::Select),
                Event::Released(Line::DataOut),
                Event::Released(Line::DataIn),
            ]
        );
    }
}
