//! Benchmarks for toggle geometry and painting.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tumbler_core::{AnimationStatus, Constraints, LayoutDirection, RecordingCanvas, Rect, Widget};
use tumbler_widgets::{Toggle, ToggleFrame, TogglePainter, ToggleState, ToggleStyle};

const BOUNDS: Rect = Rect::new(0.0, 0.0, 54.0, 32.0);

fn mid_animation() -> ToggleState {
    ToggleState {
        position: 0.4,
        reaction: 0.0,
        color_position: 0.35,
        position_status: AnimationStatus::Forward,
        reaction_status: AnimationStatus::Dismissed,
    }
}

fn bench_geometry_material(c: &mut Criterion) {
    let style = ToggleStyle::material();
    let state = mid_animation();

    c.bench_function("geometry_material_sequenced", |b| {
        b.iter(|| TogglePainter::geometry(&ToggleFrame::new(black_box(state), &style, BOUNDS)))
    });
}

fn bench_geometry_cupertino_rtl(c: &mut Criterion) {
    let style = ToggleStyle::cupertino();
    let state = mid_animation();

    c.bench_function("geometry_cupertino_rtl", |b| {
        b.iter(|| {
            TogglePainter::geometry(
                &ToggleFrame::new(black_box(state), &style, BOUNDS)
                    .direction(LayoutDirection::Rtl),
            )
        })
    });
}

fn bench_paint_cached(c: &mut Criterion) {
    let style = ToggleStyle::cupertino();
    let state = ToggleState::at_rest(true);
    let mut painter = TogglePainter::new();
    let mut canvas = RecordingCanvas::new();

    c.bench_function("paint_cached_decoration", |b| {
        b.iter(|| {
            canvas.clear();
            painter.paint(
                &mut canvas,
                &ToggleFrame::new(black_box(state), &style, BOUNDS).focused(true),
            )
        })
    });
}

fn bench_drag_frame(c: &mut Criterion) {
    c.bench_function("toggle_drag_tick_paint", |b| {
        b.iter(|| {
            let mut toggle = Toggle::new(false).on_changed(|_| {});
            let size = toggle.measure(Constraints::unbounded());
            toggle.layout(Rect::from_size(size));
            let mut canvas = RecordingCanvas::new();
            toggle.set_value(black_box(true));
            while toggle.tick(1.0 / 60.0) {
                canvas.clear();
                toggle.paint(&mut canvas);
            }
            canvas.command_count()
        })
    });
}

criterion_group!(
    benches,
    bench_geometry_material,
    bench_geometry_cupertino_rtl,
    bench_paint_cached,
    bench_drag_frame,
);
criterion_main!(benches);
