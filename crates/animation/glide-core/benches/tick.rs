use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use glide_core::{
    EaseType, LoopMode, Record, Segment, TargetId, TransitionType, Tweener, Value,
};
use glide_test_fixtures::MemoryTargets;

const FAMILIES: [TransitionType; 5] = [
    TransitionType::Sine,
    TransitionType::Cubic,
    TransitionType::Back,
    TransitionType::Bounce,
    TransitionType::Elastic,
];

fn populated(records: u64) -> (Tweener, MemoryTargets) {
    let mut tw = Tweener::default();
    let mut host = MemoryTargets::new();
    for i in 0..records {
        let target = TargetId(i);
        host.insert(target, "x", Value::Float(0.0));
        host.insert(target, "pos", Value::Vec2([0.0, 0.0]));
        let family = FAMILIES[(i % FAMILIES.len() as u64) as usize];
        tw.register(
            Record::new(target, "x")
                .with_segment(Segment::new(0.0, 100.0, 2.0).with_ease(family, EaseType::InOut))
                .with_loops(0, LoopMode::PingPong),
        )
        .expect("register float");
        tw.register(
            Record::new(target, "pos")
                .with_segment(Segment::new(Value::Vec2([0.0, 0.0]), Value::Vec2([10.0, 5.0]), 1.5))
                .with_loops(0, LoopMode::Linear),
        )
        .expect("register vec2");
    }
    (tw, host)
}

fn bench_tick(c: &mut Criterion) {
    for records in [100u64, 500] {
        let (mut tw, mut host) = populated(records);
        c.bench_function(&format!("tick_{}_records", records * 2), |b| {
            b.iter(|| {
                host.clear_writes();
                black_box(tw.tick(black_box(1.0 / 60.0), &mut host))
            })
        });
    }

    c.bench_function("register_and_drain_200", |b| {
        b.iter_batched(
            || populated(0),
            |(mut tw, mut host)| {
                for i in 0..200u64 {
                    host.insert(TargetId(i), "x", Value::Float(0.0));
                    let rec = tw
                        .acquire_record(TargetId(i), "x")
                        .with_segment(Segment::new(0.0, 1.0, 0.1));
                    tw.register(rec).expect("register");
                }
                for _ in 0..8 {
                    tw.tick(1.0 / 60.0, &mut host);
                }
                black_box(tw.active_count())
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_tick);
criterion_main!(benches);
