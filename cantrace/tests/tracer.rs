use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::convert::Infallible;
use std::rc::Rc;

use cantrace::config::{Config, LineEnding};
use cantrace::control::Command;
use cantrace::core::{nb, Clock, Instant, RxFifo, VirtualUart};
use cantrace::frame::{RxElement, PAYLOAD_LEN};
use cantrace::tracer::{Parts, Traced, Tracer};
use embedded_hal::serial;

#[derive(Default)]
struct Fifo {
    elements: Rc<RefCell<VecDeque<RxElement>>>,
    fail_next: Rc<Cell<bool>>,
}

#[derive(Debug)]
struct ReadFailed;

impl RxFifo for Fifo {
    type Message = RxElement;
    type Error = ReadFailed;

    fn fill_level(&self) -> usize {
        self.elements.borrow().len()
    }

    fn receive(&mut self) -> nb::Result<RxElement, ReadFailed> {
        if self.fail_next.replace(false) {
            return Err(nb::Error::Other(ReadFailed));
        }
        self.elements
            .borrow_mut()
            .pop_front()
            .ok_or(nb::Error::WouldBlock)
    }
}

#[derive(Default)]
struct Serial {
    written: Rc<RefCell<Vec<u8>>>,
}

impl serial::Write<u8> for Serial {
    type Error = Infallible;

    fn write(&mut self, word: u8) -> nb::Result<(), Infallible> {
        self.written.borrow_mut().push(word);
        Ok(())
    }

    fn flush(&mut self) -> nb::Result<(), Infallible> {
        Ok(())
    }
}

#[derive(Default)]
struct Tick(Rc<Cell<u32>>);

impl Clock for Tick {
    fn now(&self) -> Instant {
        Instant::from_ticks(self.0.get())
    }
}

#[derive(Default)]
struct ChannelState {
    inbox: VecDeque<Vec<u8>>,
    sent: Vec<Vec<u8>>,
    fail: bool,
}

#[derive(Default, Clone)]
struct Channel(Rc<RefCell<ChannelState>>);

impl Channel {
    fn push(&self, message: &[u8]) {
        self.0.borrow_mut().inbox.push_back(message.to_vec());
    }

    fn sent(&self) -> Vec<Vec<u8>> {
        self.0.borrow().sent.clone()
    }
}

#[derive(Debug)]
struct TransmitFailed;

impl VirtualUart for Channel {
    type Error = TransmitFailed;

    fn transmit(&mut self, data: &[u8]) -> Result<(), TransmitFailed> {
        let mut state = self.0.borrow_mut();
        if state.fail {
            return Err(TransmitFailed);
        }
        state.sent.push(data.to_vec());
        Ok(())
    }

    fn read(&mut self, buffer: &mut [u8]) -> Option<usize> {
        let message = self.0.borrow_mut().inbox.pop_front()?;
        let len = message.len().min(buffer.len());
        buffer[..len].copy_from_slice(&message[..len]);
        Some(len)
    }
}

struct Bench {
    elements: Rc<RefCell<VecDeque<RxElement>>>,
    fail_read: Rc<Cell<bool>>,
    written: Rc<RefCell<Vec<u8>>>,
    tick: Rc<Cell<u32>>,
    control: Channel,
    data: Channel,
    tracer: Tracer<Fifo, Serial, Tick, Channel, Channel>,
}

impl Bench {
    fn new(config: Config) -> Self {
        let fifo = Fifo::default();
        let serial = Serial::default();
        let clock = Tick::default();
        let control = Channel::default();
        let data = Channel::default();
        Self {
            elements: fifo.elements.clone(),
            fail_read: fifo.fail_next.clone(),
            written: serial.written.clone(),
            tick: clock.0.clone(),
            control: control.clone(),
            data: data.clone(),
            tracer: Tracer::new(
                Parts {
                    fifo,
                    serial,
                    clock,
                    control,
                    data,
                },
                config,
            ),
        }
    }

    fn receive(&self, std_id: u32, dlc: u32, data: &[u8]) {
        let mut payload = [0; PAYLOAD_LEN];
        payload[..data.len()].copy_from_slice(data);
        // Hardware timestamp that must not show up in the line
        let element = RxElement::from_raw([std_id << 18, (dlc << 16) | 0xbeef], payload);
        self.elements.borrow_mut().push_back(element);
    }

    fn written(&self) -> Vec<u8> {
        self.written.borrow().clone()
    }
}

#[test]
fn starts_inactive() {
    let mut bench = Bench::new(Config::default());
    bench.receive(0x123, 8, &[1, 2, 3]);

    let report = bench.tracer.poll();

    assert_eq!(report.traced, None);
    assert!(!bench.tracer.is_active());
    assert_eq!(bench.elements.borrow().len(), 1);
    assert!(bench.written().is_empty());
    assert!(bench.data.sent().is_empty());
}

#[test]
fn start_command_enables_tracing() {
    let mut bench = Bench::new(Config::default());
    bench.receive(0x123, 8, &[0xde, 0xad, 0xbe, 0xef]);
    bench.control.push(b"start");
    bench.tick.set(1500);

    let report = bench.tracer.poll();
    assert_eq!(report.traced, None);
    assert_eq!(report.control, Some(Command::Start));
    assert_eq!(bench.control.sent(), vec![b"start".to_vec()]);
    assert!(bench.tracer.is_active());

    let report = bench.tracer.poll();
    assert_eq!(
        report.traced,
        Some(Traced {
            sequence: 1,
            serial_failed: false,
            remote_failed: false,
        })
    );

    let line = bench.written();
    assert_eq!(line.len(), 233);
    assert_eq!(&line[..52], b"0000001 000000001.500 FB 00000123 Rx 08 DE AD BE EF ");
    assert_eq!(line[232], b'\n');
    assert_eq!(bench.data.sent(), vec![line.clone()]);
    assert_eq!(bench.tracer.last_line(), &line[..]);
    assert!(bench.elements.borrow().is_empty());
}

#[test]
fn one_frame_per_poll() {
    let mut bench = Bench::new(Config {
        start_active: true,
        ..Config::default()
    });
    bench.receive(0x001, 1, &[0x11]);
    bench.receive(0x002, 2, &[0x22, 0x22]);

    bench.tick.set(10);
    assert_eq!(bench.tracer.poll().traced.map(|t| t.sequence), Some(1));
    assert_eq!(bench.elements.borrow().len(), 1);

    bench.tick.set(62_003);
    assert_eq!(bench.tracer.poll().traced.map(|t| t.sequence), Some(2));
    assert_eq!(bench.tracer.poll().traced, None);
    assert_eq!(bench.tracer.sequence(), 2);

    let written = bench.written();
    assert_eq!(written.len(), 2 * 233);
    let second = &written[233..];
    assert_eq!(&second[..45], b"0000002 000000062.003 FB 00000002 Rx 02 22 22");
}

#[test]
fn stop_on_data_channel_is_echoed_on_control_channel() {
    let mut bench = Bench::new(Config {
        start_active: true,
        ..Config::default()
    });
    bench.data.push(b"stopping");
    bench.receive(0x123, 8, &[]);

    let report = bench.tracer.poll();
    // The frame was traced before the channels were checked.
    assert!(report.traced.is_some());
    assert_eq!(report.data, Some(Command::Stop));
    assert!(!bench.tracer.is_active());
    assert_eq!(bench.control.sent(), vec![b"stopping".to_vec()]);

    bench.receive(0x124, 8, &[]);
    assert_eq!(bench.tracer.poll().traced, None);
}

#[test]
fn unrecognized_messages_keep_state() {
    let mut bench = Bench::new(Config::default());
    bench.control.push(b"hello");
    let report = bench.tracer.poll();
    assert_eq!(report.control, Some(Command::Unrecognized));
    assert!(!bench.tracer.is_active());
    assert_eq!(bench.control.sent(), vec![b"hello".to_vec()]);
}

#[test]
fn echo_can_be_disabled() {
    let mut bench = Bench::new(Config {
        echo: false,
        ..Config::default()
    });
    bench.control.push(b"start");
    bench.tracer.poll();
    assert!(bench.tracer.is_active());
    assert!(bench.control.sent().is_empty());
}

#[test]
fn remote_failure_is_reported_and_tracing_continues() {
    let mut bench = Bench::new(Config {
        start_active: true,
        ..Config::default()
    });
    bench.data.0.borrow_mut().fail = true;
    bench.receive(0x123, 8, &[]);
    bench.receive(0x123, 8, &[]);

    let traced = bench.tracer.poll().traced.unwrap();
    assert!(traced.remote_failed);
    assert!(!traced.serial_failed);
    assert_eq!(bench.written().len(), 233);

    bench.data.0.borrow_mut().fail = false;
    let traced = bench.tracer.poll().traced.unwrap();
    assert_eq!(traced.sequence, 2);
    assert!(!traced.remote_failed);
    assert_eq!(bench.data.sent().len(), 1);
}

#[test]
fn failed_read_does_not_consume_a_sequence_number() {
    let mut bench = Bench::new(Config {
        start_active: true,
        ..Config::default()
    });
    bench.receive(0x123, 8, &[]);
    bench.fail_read.set(true);

    let report = bench.tracer.poll();
    assert_eq!(report.traced, None);
    assert_eq!(bench.tracer.sequence(), 0);
    assert!(bench.written().is_empty());

    assert_eq!(bench.tracer.poll().traced.map(|t| t.sequence), Some(1));
    assert_eq!(&bench.written()[..8], b"0000001 ");
}

#[test]
fn crlf_lines() {
    let mut bench = Bench::new(Config {
        start_active: true,
        line_ending: LineEnding::CrLf,
        ..Config::default()
    });
    bench.receive(0x7ff, 15, &[0xff; PAYLOAD_LEN]);
    bench.tracer.poll();

    let line = bench.written();
    assert_eq!(line.len(), 234);
    assert_eq!(&line[25..39], b"000007FF Rx 64");
    assert_eq!(&line[229..], b"FF \r\n");
}

#[test]
fn apply_and_release() {
    let mut bench = Bench::new(Config::default());
    bench.tracer.apply(Command::Start);
    assert!(bench.tracer.is_active());
    bench.tracer.apply(Command::Stop);
    assert!(!bench.tracer.is_active());

    let parts = bench.tracer.release();
    assert_eq!(parts.fifo.fill_level(), 0);
}
