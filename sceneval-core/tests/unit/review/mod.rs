use super::*;

#[test]
fn bullets_and_numbered_lines_become_suggestions() {
    let text = "Here is my review:\n\
                - Add a wide establishing shot\n\
                * Keep the lantern in frame\n\
                • Shorten the fade-in\n\
                10. Check costume continuity\n\
                2) Reduce effect count\n\
                ---\n\
                -   \n\
                Closing remarks.";
    assert_eq!(
        parse_suggestions(text),
        vec![
            "Add a wide establishing shot",
            "Keep the lantern in frame",
            "Shorten the fade-in",
            "Check costume continuity",
            "Reduce effect count",
        ]
    );
}

#[test]
fn prose_without_markers_yields_nothing() {
    assert!(parse_suggestions("Looks fine overall.\nNo changes needed.").is_empty());
}

#[test]
fn prompt_embeds_scene_json() {
    let scene = Scene {
        id: Some("scene-042".to_string()),
        ..Scene::default()
    };
    let prompt = build_prompt(&scene);
    assert!(prompt.contains("\"id\": \"scene-042\""));
    assert!(prompt.contains("bulleted list"));
}

#[test]
fn request_carries_model_settings() {
    let scene = Scene::default();
    let cfg = AssistantConfig {
        enabled: true,
        model_name: "reviewer-large".to_string(),
        temperature: 0.7,
    };
    let req = ReviewRequest::new(&scene, &cfg);
    assert_eq!(req.model_name, "reviewer-large");
    assert_eq!(req.temperature, 0.7);
    assert!(!req.prompt.is_empty());
}

#[test]
fn prompt_keeps_scene_data_for_non_finite_numbers() {
    let scene = Scene {
        id: Some("scene-nan".to_string()),
        duration: Some(f64::NAN),
        ..Scene::default()
    };
    let prompt = build_prompt(&scene);
    assert!(!prompt.contains("<unserializable scene>"));
    assert!(prompt.contains("\"id\": \"scene-nan\""));
    assert!(prompt.contains("\"duration\": null"));
}
