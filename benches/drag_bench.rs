//! Benchmarks for the pointer-move hot path.
//!
//! Pointer moves arrive every few milliseconds during a drag and must stay
//! cheap: translate, clamp, and write into local state, no I/O.
//!
//! Run with: `cargo bench --bench drag_bench`

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use overlaykit::{MemoryStore, OverlayController, OverlayDraft, OverlayStore, Point, PointerDown, Rect, Size};

const CONTAINER: Rect = Rect::new(24.0, 96.0, 1280.0, 500.0);

/// Controller holding `count` overlays, with a drag live on the last one.
fn dragging_controller(count: usize) -> OverlayController {
    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        let store = Arc::new(MemoryStore::new());
        let mut last = String::new();
        for i in 0..count {
            let draft = OverlayDraft::text(format!("overlay {i}")).at(Point::new(50.0, 50.0));
            last = store.create(&draft).await.unwrap().id;
        }
        let mut controller = OverlayController::new(store);
        controller.refresh().await;
        let origin = Point::new(CONTAINER.left + 50.0, CONTAINER.top + 50.0);
        assert!(controller.start_drag(&last, PointerDown::primary(origin.x + 10.0, origin.y + 10.0), origin));
        controller
    })
}

fn bench_clamp(c: &mut Criterion) {
    let size = Size::new(200.0, 60.0);
    let offset = Point::new(12.0, 8.0);
    c.bench_function("rect_place", |b| {
        let mut x = 0.0;
        b.iter(|| {
            x = (x + 7.0) % 2000.0;
            black_box(CONTAINER.place(black_box(Point::new(x - 300.0, x / 3.0)), offset, size))
        });
    });
}

fn bench_update_drag(c: &mut Criterion) {
    let mut group = c.benchmark_group("update_drag");
    for count in [1usize, 16, 128] {
        let mut controller = dragging_controller(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            let mut step = 0.0;
            b.iter(|| {
                step = (step + 3.0) % 1500.0;
                black_box(controller.update_drag(Point::new(step, step / 2.0), &CONTAINER))
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_clamp, bench_update_drag);
criterion_main!(benches);
