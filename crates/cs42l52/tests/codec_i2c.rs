//! Bus-level tests: drive the codec through `I2cTransport` against a scripted
//! embedded-hal I2C mock and check the exact byte sequence on the wire.

// Test files do arithmetic on expected register values; allow at file level.
#![allow(clippy::arithmetic_side_effects)]
#![allow(clippy::indexing_slicing)]
#![allow(clippy::expect_used)]

use cs42l52::registers::DEFAULTS;
use cs42l52::{BiasLevel, BoardLink, CodecConfig, Cs42l52, Error, I2cTransport};
use embedded_hal::i2c::ErrorKind;
use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

const ADDR: u8 = 0x4A;

fn write(bytes: [u8; 2]) -> I2cTransaction {
    I2cTransaction::write(ADDR, bytes.to_vec())
}

/// Everything `Cs42l52::attach` puts on the bus for a revision-1 chip whose
/// registers hold their power-on defaults.
fn attach_sequence() -> Vec<I2cTransaction> {
    vec![
        // Chip ID, single read with MAP auto-increment set
        I2cTransaction::write_read(ADDR, vec![0x81], vec![0xE1]),
        // Required setup
        write([0x00, 0x99]),
        write([0x3E, 0xBA]),
        write([0x47, 0x80]),
        I2cTransaction::write_read(ADDR, vec![0xB2], vec![0x3B]),
        write([0x32, 0xBB]),
        write([0x32, 0x3B]),
        write([0x00, 0x00]),
        // Cache fill, two SMBus-sized blocks
        I2cTransaction::write_read(ADDR, vec![0x80], DEFAULTS[..32].to_vec()),
        I2cTransaction::write_read(ADDR, vec![0xA0], DEFAULTS[32..].to_vec()),
        // Standby: charge pump and codec powered up
        write([0x02, 0x00]),
    ]
}

#[test]
fn attach_stream_and_detach() {
    let mut expectations = attach_sequence();
    expectations.extend([
        // hw_params(48 kHz) at 12.288 MHz
        write([0x05, 0x20]),
        write([0x06, 0x24]),
        // digital_mute(true)
        write([0x0D, 0x63]),
        // detach -> bias Off
        write([0x02, 0x9F]),
        write([0x03, 0x07]),
    ]);
    let mut i2c = I2cMock::new(&expectations);

    let config = CodecConfig::default();
    let mut codec = Cs42l52::attach(I2cTransport::new(i2c.clone(), config.i2c_address), config)
        .expect("attach");
    assert_eq!(codec.revision(), 1);
    assert_eq!(codec.bias_level(), BiasLevel::Standby);

    codec.hw_params(48_000).expect("hw_params");
    codec.digital_mute(true).expect("mute");

    let transport = codec.detach().expect("detach");
    assert_eq!(transport.address(), ADDR);
    i2c.done();
}

#[test]
fn reads_never_hit_the_bus() {
    let mut i2c = I2cMock::new(&attach_sequence());
    let codec = Cs42l52::attach(I2cTransport::new(i2c.clone(), ADDR), CodecConfig::default())
        .expect("attach");

    // No further expectations: any bus access here would fail the mock.
    // Raw 0x00 sits below the 0x34 offset and wraps to 0xCC.
    assert_eq!(
        codec.control_get("Master Playback Volume").expect("get"),
        (0xCC, Some(0xCC))
    );
    assert_eq!(codec.cache().read(0x1F).expect("tone"), 0x88);
    i2c.done();
}

#[test]
fn volume_write_goes_straight_to_chip() {
    let mut expectations = attach_sequence();
    expectations.extend([write([0x20, 0x34 + 150]), write([0x21, 0x34 + 120])]);
    let mut i2c = I2cMock::new(&expectations);

    let mut codec = Cs42l52::attach(I2cTransport::new(i2c.clone(), ADDR), CodecConfig::default())
        .expect("attach");
    codec
        .control_put("Master Playback Volume", 150, Some(120))
        .expect("put");
    assert_eq!(
        codec.control_get("Master Playback Volume").expect("get"),
        (150, Some(120))
    );
    i2c.done();
}

#[test]
fn omap3_board_stream_start() {
    let board = BoardLink::omap3_evm();
    let mut expectations = attach_sequence();
    expectations.extend([write([0x05, 0x2B]), write([0x06, 0x24])]);
    let mut i2c = I2cMock::new(&expectations);

    let transport = I2cTransport::new(i2c.clone(), board.i2c_address);
    let mut codec = Cs42l52::attach(transport, board.config()).expect("attach");
    let entry = board.hw_params(&mut codec, 48_000).expect("hw_params");
    assert_eq!(entry.mclk_hz, 27_000_000);
    assert_eq!(codec.sysclk(), 27_000_000);
    i2c.done();
}

#[test]
fn bus_error_on_chip_id_fails_attach() {
    let expectations =
        [I2cTransaction::write_read(ADDR, vec![0x81], vec![0x00]).with_error(ErrorKind::Other)];
    let mut i2c = I2cMock::new(&expectations);

    let result = Cs42l52::attach(I2cTransport::new(i2c.clone(), ADDR), CodecConfig::default());
    assert_eq!(
        result.err(),
        Some(Error::TransportRead {
            expected: 1,
            got: 0
        })
    );
    i2c.done();
}

#[test]
fn bus_error_on_write_keeps_cached_value() {
    let mut expectations = attach_sequence();
    expectations.push(write([0x0D, 0x63]).with_error(ErrorKind::Other));
    let mut i2c = I2cMock::new(&expectations);

    let mut codec = Cs42l52::attach(I2cTransport::new(i2c.clone(), ADDR), CodecConfig::default())
        .expect("attach");
    assert_eq!(
        codec.digital_mute(true),
        Err(Error::TransportWrite {
            reg: 0x0D,
            written: 0
        })
    );
    assert_eq!(codec.cache().read(0x0D).expect("read"), 0x63);
    i2c.done();
}
