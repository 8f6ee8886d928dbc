use pixmatch::{match_all, match_best, GrayImage, PixMatchError};

fn ramp16() -> GrayImage {
    let mut data = Vec::with_capacity(256);
    for y in 0..16u16 {
        for x in 0..16u16 {
            data.push((x + y) as u8);
        }
    }
    GrayImage::from_raw(data, 16, 16).unwrap()
}

fn textured(width: usize, height: usize, salt: usize) -> GrayImage {
    let mut data = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            data.push((((x * 13 + salt) ^ (y * 7) ^ (x * y)) & 0xFF) as u8);
        }
    }
    GrayImage::from_raw(data, width, height).unwrap()
}

fn patch(src: &GrayImage, x0: usize, y0: usize, width: usize, height: usize) -> GrayImage {
    let mut data = Vec::with_capacity(width * height);
    for y in y0..y0 + height {
        for x in x0..x0 + width {
            data.push(src.get(x, y).unwrap());
        }
    }
    GrayImage::from_raw(data, width, height).unwrap()
}

#[test]
fn identity_ramp_matches_at_origin() {
    // Every window of a linear ramp is an additive shift of every other, so
    // all anchors score the same and the (y, x) tie-break must pick (0, 0).
    let source = ramp16();
    let template = patch(&source, 0, 0, 4, 4);

    let found = match_best(&source, &template, 0.99).unwrap().unwrap();
    assert_eq!((found.x, found.y), (0, 0));
    assert!(found.confidence >= 1.0 - 1e-6);
    assert!(found.confidence <= 1.0);
}

#[test]
fn offset_patch_found_at_its_anchor() {
    let source = textured(16, 16, 0);
    let template = patch(&source, 5, 3, 4, 4);

    let found = match_best(&source, &template, 0.99).unwrap().unwrap();
    assert_eq!((found.x, found.y), (5, 3));
    assert!(found.confidence >= 1.0 - 1e-6);
}

#[test]
fn flat_template_is_rejected() {
    let source = ramp16();
    let template = GrayImage::from_raw(vec![0u8; 16], 4, 4).unwrap();

    let err = match_best(&source, &template, 0.8).err().unwrap();
    assert!(matches!(err, PixMatchError::DegenerateTemplate { .. }));

    let err = match_all(&source, &template, 0.8, 10).err().unwrap();
    assert!(matches!(err, PixMatchError::DegenerateTemplate { .. }));
}

#[test]
fn uncorrelated_scene_yields_nothing() {
    let source = textured(64, 64, 0);
    // A 16x16 pattern from an unrelated generator never reaches 0.9.
    let mut data = Vec::with_capacity(256);
    for y in 0..16usize {
        for x in 0..16usize {
            data.push((((x * 29 + 5) ^ (y * 23) ^ (x * x + y)) & 0xFF) as u8);
        }
    }
    let template = GrayImage::from_raw(data, 16, 16).unwrap();

    assert_eq!(match_best(&source, &template, 0.9).unwrap(), None);
    assert!(match_all(&source, &template, 0.9, 10).unwrap().is_empty());
}

#[test]
fn tiled_targets_are_all_found_and_separated() {
    let template = textured(16, 16, 3);
    let mut data = Vec::with_capacity(64 * 16);
    for y in 0..16 {
        for x in 0..64 {
            data.push(template.get(x % 16, y).unwrap());
        }
    }
    let source = GrayImage::from_raw(data, 64, 16).unwrap();

    let found = match_all(&source, &template, 0.9, 10).unwrap();
    let positions: Vec<(u32, u32)> = found.iter().map(|m| (m.x, m.y)).collect();
    assert_eq!(positions, vec![(0, 0), (16, 0), (32, 0), (48, 0)]);
    for m in &found {
        assert!(m.confidence >= 1.0 - 1e-6);
    }

    // Pairwise separation: no two kept anchors within half a template side.
    for (i, a) in found.iter().enumerate() {
        for b in &found[i + 1..] {
            let dx = a.x.abs_diff(b.x);
            let dy = a.y.abs_diff(b.y);
            assert!(dx.max(dy) >= 8);
        }
    }
}

#[test]
fn brightness_shift_preserves_the_match() {
    let source = ramp16();
    let template = patch(&source, 0, 0, 4, 4);
    let baseline = match_best(&source, &template, 0.99).unwrap().unwrap();

    // +40 stays below 255 for a ramp peaking at 30, so nothing clamps.
    let shifted: Vec<u8> = source.as_slice().iter().map(|&v| v + 40).collect();
    let bright = GrayImage::from_raw(shifted, 16, 16).unwrap();

    let found = match_best(&bright, &template, 0.99).unwrap().unwrap();
    assert_eq!((found.x, found.y), (baseline.x, baseline.y));
    assert!((found.confidence - baseline.confidence).abs() <= 1e-3);
}

#[test]
fn contrast_scale_preserves_the_match() {
    // Cap base values at 127 so a 1.5x gain never saturates.
    let mut data = Vec::with_capacity(32 * 32);
    for y in 0..32usize {
        for x in 0..32usize {
            data.push((((x * 13) ^ (y * 7) ^ (x * y)) & 0x7F) as u8);
        }
    }
    let source = GrayImage::from_raw(data, 32, 32).unwrap();
    let template = patch(&source, 9, 7, 8, 8);
    let baseline = match_best(&source, &template, 0.9).unwrap().unwrap();
    assert_eq!((baseline.x, baseline.y), (9, 7));

    let scaled: Vec<u8> = source
        .as_slice()
        .iter()
        .map(|&v| (f64::from(v) * 1.5).round() as u8)
        .collect();
    let gained = GrayImage::from_raw(scaled, 32, 32).unwrap();

    let found = match_best(&gained, &template, 0.9).unwrap().unwrap();
    assert_eq!((found.x, found.y), (9, 7));
    assert!((found.confidence - baseline.confidence).abs() <= 1e-3);
}

#[test]
fn best_agrees_with_first_of_all() {
    let source = textured(40, 30, 11);
    let template = patch(&source, 17, 9, 6, 6);

    let best = match_best(&source, &template, 0.5).unwrap().unwrap();
    let all = match_all(&source, &template, 0.5, 1).unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0], best);
}

#[test]
fn results_are_ordered_thresholded_and_bounded() {
    let source = textured(48, 48, 2);
    let template = patch(&source, 20, 12, 8, 8);

    let found = match_all(&source, &template, 0.3, 5).unwrap();
    assert!(!found.is_empty());
    assert!(found.len() <= 5);
    for m in &found {
        assert!(m.confidence >= 0.3);
        assert!(m.confidence >= -1.0 && m.confidence <= 1.0);
    }
    for pair in found.windows(2) {
        assert!(pair[0].confidence >= pair[1].confidence);
    }
    assert_eq!((found[0].x, found[0].y), (20, 12));
}

#[test]
fn repeated_searches_are_deterministic() {
    let source = textured(56, 41, 9);
    let template = patch(&source, 23, 14, 7, 7);

    let first = match_all(&source, &template, 0.2, 8).unwrap();
    let second = match_all(&source, &template, 0.2, 8).unwrap();
    assert_eq!(first, second);

    let best_a = match_best(&source, &template, 0.2).unwrap();
    let best_b = match_best(&source, &template, 0.2).unwrap();
    assert_eq!(best_a, best_b);
}

#[test]
fn invalid_parameters_are_rejected() {
    let source = textured(16, 16, 0);
    let template = patch(&source, 0, 0, 4, 4);

    for bad in [-0.1, 1.1, f64::NAN] {
        let err = match_best(&source, &template, bad).err().unwrap();
        assert!(matches!(err, PixMatchError::InvalidThreshold { .. }));
    }

    let err = match_all(&source, &template, 0.8, 0).err().unwrap();
    assert_eq!(err, PixMatchError::InvalidMaxCount { value: 0 });

    let wide = textured(20, 4, 0);
    let err = match_best(&source, &wide, 0.8).err().unwrap();
    assert_eq!(
        err,
        PixMatchError::TemplateLargerThanSource {
            tpl_width: 20,
            tpl_height: 4,
            img_width: 16,
            img_height: 16,
        }
    );

    let tall = textured(4, 20, 0);
    assert!(matches!(
        match_all(&source, &tall, 0.8, 10).err().unwrap(),
        PixMatchError::TemplateLargerThanSource { .. }
    ));
}

#[test]
fn template_as_large_as_source_is_allowed() {
    let source = textured(12, 12, 4);
    let template = patch(&source, 0, 0, 12, 12);

    let found = match_best(&source, &template, 0.99).unwrap().unwrap();
    assert_eq!((found.x, found.y), (0, 0));
    assert!(found.confidence >= 1.0 - 1e-6);
}
