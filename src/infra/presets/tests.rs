use super::*;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Profile {
    model: String,
}

#[test]
fn load_without_file_is_empty() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let store = PresetStore::<Profile>::new(tmp.path().join(".claude_presets/presets.json"));
    assert!(store.load().is_empty());
}

#[test]
fn save_then_load_keeps_every_preset() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let store = PresetStore::<Profile>::new(tmp.path().join(".claude_presets/presets.json"));

    let mut presets = Presets::new();
    presets.insert(
        "work".to_string(),
        Profile {
            model: "opus".to_string(),
        },
    );
    presets.insert(
        "home".to_string(),
        Profile {
            model: "sonnet".to_string(),
        },
    );
    store.save(&presets).expect("save");

    assert_eq!(store.load(), presets);
    assert!(store.path().is_file());
}
