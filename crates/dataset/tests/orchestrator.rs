mod support;

use docwarp_common::error::ErrorKind;
use docwarp_render_engine::SceneStep;
use support::{Workspace, NO_TARGET_PRESET};

#[test]
fn apply_effect_writes_rgba_render() {
    let ws = Workspace::new("apply_rgba");
    let (mut orchestrator, _) = ws.orchestrator();

    let output = orchestrator.apply_effect("Fold TL", &ws.source).unwrap();
    assert_eq!(output, ws.root.join("scratch").join("temp.png"));

    let img = image::open(&output).unwrap();
    assert!(img.color().has_alpha());
}

#[test]
fn previous_effect_does_not_leak_into_next_render() {
    let ws = Workspace::new("no_leak");

    let (mut first, _) = ws.orchestrator();
    first.apply_effect("Curl TL", &ws.source).unwrap();
    let after_curl = std::fs::read(first.apply_effect("Y-Left", &ws.source).unwrap()).unwrap();

    let (mut fresh, _) = ws.orchestrator();
    let clean = std::fs::read(fresh.apply_effect("Y-Left", &ws.source).unwrap()).unwrap();

    assert_eq!(after_curl, clean);
}

#[test]
fn every_plan_starts_with_a_reset() {
    let ws = Workspace::new("reset_first");
    let (mut orchestrator, state) = ws.orchestrator();

    for effect in ["Curl BR", "Hard Crumpled 2", "Plus(+)"] {
        orchestrator.apply_effect(effect, &ws.source).unwrap();
    }

    let state = state.lock().unwrap();
    assert_eq!(state.plans.len(), 3);
    for plan in &state.plans {
        assert_eq!(plan.steps.first(), Some(&SceneStep::ResetScene));
        assert_eq!(plan.steps.last(), Some(&SceneStep::RenderStill));
    }
}

#[test]
fn only_curl_family_is_smoothed() {
    let ws = Workspace::new("smoothing");
    let (mut orchestrator, state) = ws.orchestrator();

    orchestrator.apply_effect("Curl All Corners", &ws.source).unwrap();
    orchestrator.apply_effect("Crease TL", &ws.source).unwrap();

    let state = state.lock().unwrap();
    let smooth = |i: usize| {
        state.plans[i]
            .steps
            .iter()
            .any(|s| matches!(s, SceneStep::ShadeSmooth { .. }))
    };
    assert!(smooth(0));
    assert!(!smooth(1));
}

#[test]
fn unknown_effect_never_reaches_the_engine() {
    let ws = Workspace::new("unknown");
    let (mut orchestrator, state) = ws.orchestrator();

    let err = orchestrator.apply_effect("Fold Sideways", &ws.source).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownEffect);
    assert!(state.lock().unwrap().plans.is_empty());
}

#[test]
fn unreadable_source_is_image_load_failure() {
    let ws = Workspace::new("bad_source");
    let (mut orchestrator, _) = ws.orchestrator();

    let err = orchestrator
        .apply_effect("Y-Left", &ws.root.join("missing.png"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ImageLoadFailure);

    let notes = ws.root.join("notes.txt");
    std::fs::write(&notes, b"hello").unwrap();
    let err = orchestrator.apply_effect("Y-Left", &notes).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ImageLoadFailure);
}

#[test]
fn truncated_source_never_reaches_the_engine() {
    let ws = Workspace::new("truncated_source");
    let (mut orchestrator, state) = ws.orchestrator();

    let page = ws.root.join("torn.png");
    image::RgbImage::from_fn(48, 48, |x, y| {
        image::Rgb([(x * 5) as u8, (y * 3) as u8, (x + y) as u8])
    })
    .save(&page)
    .unwrap();
    let bytes = std::fs::read(&page).unwrap();
    std::fs::write(&page, &bytes[..bytes.len() / 2]).unwrap();

    let err = orchestrator.apply_effect("Curl TL", &page).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ImageLoadFailure);
    assert!(state.lock().unwrap().plans.is_empty());
}

#[test]
fn preset_without_target_renders_untextured() {
    let ws = Workspace::new("no_target");
    ws.overwrite_preset("fold_h.blend", NO_TARGET_PRESET);
    let (mut orchestrator, _) = ws.orchestrator();

    let output = orchestrator.render_effect("Fold Horizontal", &ws.source).unwrap();
    assert!(!output.texture_attached);
    assert!(output.path.is_file());
}

#[test]
fn export_preset_through_orchestrator() {
    let ws = Workspace::new("export");
    let (orchestrator, _) = ws.orchestrator();
    let dest = ws.root.join("copy.blend");

    let bytes = orchestrator.export_preset("Cross(X)", &dest).unwrap();
    assert_eq!(bytes, "crease_cross.blend".len() as u64);
    assert_eq!(
        std::fs::read(&dest).unwrap(),
        std::fs::read(ws.presets.join("crease_cross.blend")).unwrap()
    );
}
