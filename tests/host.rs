use mandelbrot_field::{
    host::{self, HostError, MemoryHost, SurfaceHost},
    screen::Size,
    Colour, Config, Evaluator,
};

#[test]
fn render_presents_one_full_frame() {
    let evaluator = Evaluator::new(Config::coarse()).unwrap();
    let mut memory_host = MemoryHost::new(Size::new(4, 4));

    host::render(&evaluator, &mut memory_host).unwrap();

    let frame = memory_host.last_frame().unwrap();
    assert_eq!(frame.size, Size::new(4, 4));
    assert_eq!(frame.colours.len(), 16);
    assert_eq!(frame.get(2, 2), Some(evaluator.evaluate(0.5, 0.5).colour));
    assert_eq!(frame.get(4, 0), None);
}

#[test]
fn render_follows_host_resizes() {
    let evaluator = Evaluator::new(Config::detailed()).unwrap();
    let mut memory_host = MemoryHost::new(Size::new(8, 6));

    host::render(&evaluator, &mut memory_host).unwrap();
    memory_host.resize(Size::new(3, 2));
    host::render(&evaluator, &mut memory_host).unwrap();

    let sizes: Vec<_> = memory_host.frames().iter().map(|frame| frame.size).collect();
    assert_eq!(sizes, [Size::new(8, 6), Size::new(3, 2)]);
}

#[test]
fn present_rejects_mismatched_buffer() {
    let mut memory_host = MemoryHost::new(Size::new(2, 2));
    let error = memory_host
        .present(Size::new(2, 2), &[Colour::BLACK; 3])
        .unwrap_err();
    assert!(matches!(error, HostError::BufferSize { actual: 3, .. }));
    assert!(memory_host.frames().is_empty());
}

#[test]
fn frame_bytes_are_clamped() {
    let evaluator = Evaluator::new(Config::coarse()).unwrap();
    let mut memory_host = MemoryHost::new(Size::new(4, 4));
    host::render(&evaluator, &mut memory_host).unwrap();

    let bytes = memory_host.last_frame().unwrap().to_rgba8();
    assert_eq!(bytes.len(), 16 * 4);
    // (2, 2) is inside the set: red is -14 before clamping.
    let offset = (2 * 4 + 2) * 4;
    assert_eq!(bytes[offset], 0);
    assert_eq!(bytes[offset + 3], 255);
}

#[test]
fn render_in_dedicated_pool_matches_global_pool() {
    let evaluator = Evaluator::new(Config::detailed()).unwrap();
    let pool = mandelbrot_field::grid::worker_pool(3).unwrap();
    assert_eq!(pool.current_num_threads(), 3);

    let mut pooled = MemoryHost::new(Size::new(19, 11));
    host::render_in(&pool, &evaluator, &mut pooled).unwrap();
    let mut global = MemoryHost::new(Size::new(19, 11));
    host::render(&evaluator, &mut global).unwrap();

    assert_eq!(pooled.frames(), global.frames());
}
