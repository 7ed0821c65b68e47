use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use rtrb::RingBuffer;

use soundmask::nodes::RtrbSink;
use soundmask::synth::synthesize_with;
use soundmask::{AudioEngine, SampleBuffer, SoundClass, Voice};

pub fn criterion_benchmark(c: &mut Criterion) {
    for class in SoundClass::ALL {
        c.bench_function(&format!("synthesize({class}, 48kHz, 1s)"), |b| {
            let mut rng = SmallRng::seed_from_u64(7);
            b.iter(|| synthesize_with(black_box(class), 48_000, 1.0, &mut rng))
        });
    }

    c.bench_function("AudioEngine.process()", |b| {
        let (producer, mut consumer) = RingBuffer::new(1024);
        let mut engine = AudioEngine::with_output(48_000, RtrbSink::mono(producer));
        engine.load(Voice::Ambience, SampleBuffer::new(vec![0.1; 48_000], 48_000)).unwrap();

        b.iter(move || {
            engine.process();
            while consumer.pop().is_ok() {}
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
