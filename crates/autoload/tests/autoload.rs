use std::{
    path::Path,
    sync::{Arc, Mutex},
};

use cmdload::{
    AutoloadError, AutoloadOptions, Autoloader, Exports, ImportSelector, ModuleRegistry,
    PathParams, Plugin, ProgramRoot,
};

type Command = fn() -> &'static str;

fn fn_a() -> &'static str {
    "a"
}

fn fn_b() -> &'static str {
    "b"
}

fn fn_c() -> &'static str {
    "c"
}

fn registry() -> ModuleRegistry<Command> {
    ModuleRegistry::new()
        .with("a", || Ok(Exports::new().with("default", fn_a as Command)))
        .with("b", || Ok(Exports::new().with("default", fn_b as Command)))
        .with("c", || Ok(Exports::new().with("named", fn_c as Command)))
}

fn write(dir: &Path, files: &[&str]) {
    for file in files {
        let path = dir.join(file);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "export default () => {}").unwrap();
    }
}

fn run_names(plugin: &Plugin<Command>) -> Vec<&'static str> {
    plugin.handlers().iter().map(|f| f()).collect()
}

#[tokio::test]
async fn registers_matched_modules_in_order() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir.path().join("commands"), &["a.ts", "b.ts", "notes.md"]);

    let autoloader = Autoloader::new(ProgramRoot::new(dir.path()), registry());
    let plugin = autoloader
        .load(AutoloadOptions::new().patterns("*.ts"), Plugin::new("bot"))
        .await
        .unwrap();

    assert_eq!(plugin.name(), "bot");
    assert_eq!(run_names(&plugin), vec!["a", "b"]);
}

#[tokio::test]
async fn default_patterns_cover_nested_sources() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir.path().join("commands"), &["b.mjs", "nested/a.ts", "skip.txt"]);

    let autoloader = Autoloader::new(ProgramRoot::new(dir.path()), registry());
    let plugin = autoloader
        .load(AutoloadOptions::new(), Plugin::<Command>::default())
        .await
        .unwrap();

    assert_eq!(run_names(&plugin), vec!["b", "a"]);
}

#[tokio::test]
async fn empty_directory_fails_with_no_matches() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("commands")).unwrap();

    let autoloader = Autoloader::new(ProgramRoot::new(dir.path()), registry());
    let err = autoloader
        .load(AutoloadOptions::new(), Plugin::<Command>::default())
        .await
        .unwrap_err();

    assert!(matches!(err, AutoloadError::NoMatches));
}

#[tokio::test]
async fn missing_export_names_file_and_export() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir.path().join("commands"), &["c.ts"]);

    let autoloader = Autoloader::new(ProgramRoot::new(dir.path()), registry());
    let err = autoloader
        .load(AutoloadOptions::new(), Plugin::<Command>::default())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "c.ts doesn't provide export default");
}

#[tokio::test]
async fn first_export_selector_picks_named_export() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir.path().join("commands"), &["a.ts", "c.ts"]);

    let autoloader = Autoloader::new(ProgramRoot::new(dir.path()), registry());
    let plugin = autoloader
        .load(
            AutoloadOptions::new().import(ImportSelector::first_export()),
            Plugin::<Command>::default(),
        )
        .await
        .unwrap();

    assert_eq!(run_names(&plugin), vec!["a", "c"]);
}

#[tokio::test]
async fn unregistered_module_is_a_load_error() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir.path().join("commands"), &["a.ts", "unknown.ts"]);

    let autoloader = Autoloader::new(ProgramRoot::new(dir.path()), registry());
    let err = autoloader
        .load(AutoloadOptions::new(), Plugin::<Command>::default())
        .await
        .unwrap_err();

    assert!(matches!(err, AutoloadError::Load(_)));
    assert!(err.to_string().contains("unknown.ts"));
}

#[tokio::test]
async fn hooks_see_every_file() {
    let dir = tempfile::tempdir().unwrap();
    let commands = dir.path().join("handlers");
    write(&commands, &["a.ts", "b.ts"]);

    let loaded: Arc<Mutex<Vec<String>>> = Arc::default();
    let loaded_hook = Arc::clone(&loaded);
    let finished: Arc<Mutex<Vec<PathParams>>> = Arc::default();
    let finished_hook = Arc::clone(&finished);

    let autoloader = Autoloader::new(ProgramRoot::new(dir.path()), registry());
    let plugin = autoloader
        .load(
            AutoloadOptions::new()
                .path("./handlers")
                .patterns(["*.ts"])
                .on_load(move |p| loaded_hook.lock().unwrap().push(p.relative.clone()))
                .on_finish(move |all| finished_hook.lock().unwrap().extend_from_slice(all)),
            Plugin::<Command>::default(),
        )
        .await
        .unwrap();

    assert_eq!(plugin.len(), 2);
    assert_eq!(*loaded.lock().unwrap(), vec!["a.ts", "b.ts"]);

    let finished = finished.lock().unwrap();
    assert_eq!(finished.len(), 2);
    let expected = url::Url::from_file_path(commands.join("b.ts")).unwrap();
    assert_eq!(finished[1].absolute, expected.as_str());
}

#[tokio::test]
async fn fail_glob_off_returns_empty_plugin() {
    let dir = tempfile::tempdir().unwrap();

    let autoloader = Autoloader::new(ProgramRoot::new(dir.path()), registry());
    let plugin = autoloader
        .load(AutoloadOptions::new().fail_glob(false), Plugin::<Command>::default())
        .await
        .unwrap();

    assert!(plugin.is_empty());
}

#[tokio::test]
async fn relative_root_resolves_against_working_dir() {
    // Relative to the test's working directory.
    let dir = tempfile::tempdir_in(".").unwrap();
    assert!(dir.path().is_relative());
    write(&dir.path().join("bot/commands"), &["a.ts"]);

    let autoloader = Autoloader::new(ProgramRoot::new(dir.path().join("bot")), registry());
    let plugin = autoloader
        .load(AutoloadOptions::new(), Plugin::<Command>::default())
        .await
        .unwrap();

    assert_eq!(run_names(&plugin), vec!["a"]);
    assert!(autoloader.root().dir().is_absolute());
}
