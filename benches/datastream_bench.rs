//! Decode and apply throughput for a representative host write.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use tn3270r::datastream::{DataStreamMessage, DatastreamDecoder};
use tn3270r::ebcdic::CodePage;
use tn3270r::screen::Screen;

/// A full-screen write for a model 2 terminal: 24 rows of one protected
/// label field and one unprotected input field each.
fn full_screen_record() -> Vec<u8> {
    let mut record = vec![0x00, 0x00, 0x00, 0x00, 0x00, 0x05, 0x02];
    for row in 0..24u16 {
        let address = row * 80;
        let (b1, b2) = tn3270r::datastream::address::encode_buffer_address_12bit(address);
        record.extend_from_slice(&[0x11, b1, b2]); // SBA
        record.extend_from_slice(&[0x1D, 0x60]); // SF protected
        record.extend_from_slice(&[0xC6, 0xC9, 0xC5, 0xD3, 0xC4, 0x7A]); // FIELD:
        record.extend_from_slice(&[0x1D, 0x40]); // SF unprotected
        let (b1, b2) = tn3270r::datastream::address::encode_buffer_address_12bit(address + 79);
        record.extend_from_slice(&[0x3C, b1, b2, 0x40]); // RA blanks to row end
    }
    record
}

fn bench_decode(c: &mut Criterion) {
    let decoder = DatastreamDecoder::new(CodePage::Cp037);
    let record = full_screen_record();
    c.bench_function("decode_full_screen_write", |b| {
        b.iter(|| decoder.decode(black_box(&record)).unwrap())
    });
}

fn bench_apply(c: &mut Criterion) {
    let decoder = DatastreamDecoder::new(CodePage::Cp037);
    let record = full_screen_record();
    let orders = match decoder.decode(&record).unwrap() {
        DataStreamMessage::Write { orders, .. } => orders,
        other => panic!("unexpected message: {other:?}"),
    };
    c.bench_function("apply_full_screen_write", |b| {
        b.iter(|| {
            let mut screen = Screen::new(24, 80);
            screen.process_orders(black_box(&orders)).unwrap();
            screen
        })
    });
}

criterion_group!(benches, bench_decode, bench_apply);
criterion_main!(benches);
