use claude_config_hub_lib::skills::{
    Provider, ProviderRoots, SkillCreateInput, SkillsEngine, SyncTargets, MANIFEST_FILE,
};
use std::io::Write;
use std::path::{Path, PathBuf};

fn engine(home: &Path) -> SkillsEngine {
    SkillsEngine::new(ProviderRoots::from_home(home)).with_staging_dir(home.join("staging"))
}

fn skill_dir(home: &Path, provider: Provider, name: &str) -> PathBuf {
    ProviderRoots::from_home(home).root(provider).join(name)
}

fn write_skill(home: &Path, provider: Provider, name: &str, body: &str) {
    let dir = skill_dir(home, provider, name);
    std::fs::create_dir_all(&dir).expect("mkdir");
    std::fs::write(dir.join(MANIFEST_FILE), body).expect("write manifest");
}

fn manifest(home: &Path, provider: Provider, name: &str) -> String {
    std::fs::read_to_string(skill_dir(home, provider, name).join(MANIFEST_FILE)).expect("read")
}

fn zip_with(path: &Path, entries: &[(&str, &str)]) {
    let file = std::fs::File::create(path).expect("create zip");
    let mut zip = zip::ZipWriter::new(file);
    let opts = zip::write::FileOptions::<()>::default();
    for (name, body) in entries {
        zip.start_file(*name, opts).expect("start file");
        zip.write_all(body.as_bytes()).expect("write entry");
    }
    zip.finish().expect("finish zip");
}

#[test]
fn lifecycle_across_providers() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let home = tmp.path();
    let engine = engine(home);
    engine.ensure_roots();

    // claude and codex both own "review" with different content; only claude has "lint".
    write_skill(home, Provider::Claude, "review", "description: claude review\n");
    write_skill(home, Provider::Codex, "review", "description: codex review\n");
    write_skill(home, Provider::Claude, "lint", "description: lint things\n");

    let scan = engine.scan();
    assert_eq!(scan.all_skills, ["lint", "review"]);
    assert_eq!(scan.providers[&Provider::Codex].len(), 1);

    let first = engine.sync(&SyncTargets::All);
    assert!(first.success, "{}", first.message);
    for provider in Provider::ALL {
        assert_eq!(manifest(home, provider, "lint"), "description: lint things\n");
    }
    // Existing complete copies are never overwritten.
    assert_eq!(manifest(home, Provider::Codex, "review"), "description: codex review\n");
    assert_eq!(manifest(home, Provider::Gemini, "review"), "description: claude review\n");

    let second = engine.sync(&SyncTargets::All);
    assert!(second.success);
    assert!(second.message.contains("(0 copied)"), "{}", second.message);

    let created = engine.create(&SkillCreateInput {
        name: "review".to_string(),
        description: Some("replacement".to_string()),
        providers: vec![Provider::Codex],
    });
    assert!(created.success);
    assert_eq!(manifest(home, Provider::Codex, "review"), "description: codex review\n");

    let deleted = engine.delete("review");
    assert!(deleted.success);
    for provider in Provider::ALL {
        assert!(!skill_dir(home, provider, "review").exists());
    }
    assert_eq!(engine.scan().all_skills, ["lint"]);
}

#[test]
fn archive_imports_resolve_names_by_layout() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let home = tmp.path();
    let engine = engine(home);

    let wrapped = home.join("download.zip");
    zip_with(
        &wrapped,
        &[("foo/SKILL.md", "description: foo\n"), ("foo/run.sh", "echo foo\n")],
    );
    let flat = home.join("bar.zip");
    zip_with(
        &flat,
        &[("SKILL.md", "description: bar\n"), ("script.py", "print('bar')\n")],
    );

    assert!(engine.import_skill(&wrapped, &[Provider::Claude]).success);
    assert!(engine
        .import_skill(&flat, &[Provider::Gemini, Provider::Trae])
        .success);

    assert_eq!(manifest(home, Provider::Claude, "foo"), "description: foo\n");
    assert!(skill_dir(home, Provider::Claude, "foo").join("run.sh").is_file());
    assert_eq!(manifest(home, Provider::Trae, "bar"), "description: bar\n");
    assert!(skill_dir(home, Provider::Gemini, "bar").join("script.py").is_file());

    let staging = home.join("staging");
    let leftovers = std::fs::read_dir(&staging).map(|d| d.count()).unwrap_or(0);
    assert_eq!(leftovers, 0);
}

#[test]
fn copy_skills_replaces_destination_entirely() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let home = tmp.path();
    let engine = engine(home);
    write_skill(home, Provider::Codex, "deploy", "description: fresh\n");

    let dest = home.join("project/.claude/skills");
    let stale = dest.join("deploy");
    std::fs::create_dir_all(&stale).expect("mkdir");
    std::fs::write(stale.join(MANIFEST_FILE), "description: stale\n").expect("write");
    std::fs::write(stale.join("obsolete.txt"), "old").expect("write");

    let out = engine.copy_skills(&["deploy".to_string()], &dest);
    assert!(out.success, "{}", out.message);
    assert_eq!(
        std::fs::read_to_string(stale.join(MANIFEST_FILE)).expect("read"),
        "description: fresh\n"
    );
    assert!(!stale.join("obsolete.txt").exists());
}
