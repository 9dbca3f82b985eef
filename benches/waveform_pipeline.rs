//! Benchmarks for the parse → encode → render pipeline
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use wavesense::config::ExportConfig;
use wavesense::{
    parser, RecordingSurface, RenderEngine, SignalClassifier, ViewState, WaveJson,
    WaveformDocument, WaveformEncoder,
};

/// Counter-style dump with `rows` samples
fn counter_dump(rows: usize) -> String {
    let mut out = String::from("0 time\n1 clk\n2 rst\n3 en\n4 count\n=====\n");
    let mut count: u8 = 0;
    for row in 0..rows {
        let en = row % 7 != 0;
        if en {
            count = count.wrapping_add(1);
        }
        out.push_str(&format!(
            "{} 1 {} {} {:02x}\n",
            row * 10,
            u8::from(row < 2),
            u8::from(en),
            count
        ));
    }
    out
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for rows in [1_000, 10_000, 100_000].iter() {
        let dump = counter_dump(*rows);
        group.throughput(Throughput::Bytes(dump.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &dump, |b, dump| {
            b.iter(|| black_box(parser::parse(dump)));
        });
    }

    group.finish();
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_wavejson");
    let encoder = WaveformEncoder::default();
    let export = ExportConfig::default();

    for rows in [1_000, 10_000, 100_000].iter() {
        let document = parser::parse(&counter_dump(*rows));
        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &document, |b, doc| {
            b.iter(|| black_box(WaveJson::from_document(doc, &encoder, &export)));
        });
    }

    group.finish();
}

fn render_once(engine: &RenderEngine, document: &WaveformDocument, view: &ViewState) -> usize {
    let (width, height) = engine.frame_size(document, 1200.0);
    let mut surface = RecordingSurface::new(width, height);
    engine.render(document, view, &mut surface);
    surface.commands().len()
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let document = parser::parse(&counter_dump(100_000));
    let view = ViewState {
        hovered_sample: Some(10),
        hovered_signal: Some(3),
        ..ViewState::default()
    };

    for cap in [200, 2_000, 20_000].iter() {
        let engine = RenderEngine::new(SignalClassifier::default(), *cap);
        group.throughput(Throughput::Elements(*cap as u64));
        group.bench_with_input(BenchmarkId::from_parameter(cap), &engine, |b, engine| {
            b.iter(|| black_box(render_once(engine, &document, &view)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse, bench_encode, bench_render);
criterion_main!(benches);
