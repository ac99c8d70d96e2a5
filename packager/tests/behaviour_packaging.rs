//! Behaviour-driven tests for binary distribution packaging.
//!
//! These scenarios drive the `bdist` pipeline end to end from a generated
//! `dist.toml` in a scratch source tree. Tests use the rstest-bdd v0.5.0
//! mutable world pattern.

use camino::{Utf8Path, Utf8PathBuf};
use flate2::read::GzDecoder;
use fmipp_packager::config::DistConfig;
use fmipp_packager::dist::emit::EmitOutput;
use fmipp_packager::dist::manifest::MissingArtifactPolicy;
use fmipp_packager::dist::naming::ArchiveFormat;
use fmipp_packager::error::PackagerError;
use fmipp_packager::pipeline::{PipelineContext, run_bdist};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::collections::BTreeMap;
use std::fs;
use std::io::Read;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// World types
// ---------------------------------------------------------------------------

#[derive(Default)]
struct PackagingWorld {
    temp_dir: Option<TempDir>,
    policy: MissingArtifactPolicy,
    declared: Vec<String>,
    format: ArchiveFormat,
    output: Option<EmitOutput>,
    packaging_error: Option<PackagerError>,
    runs: Vec<Vec<u8>>,
}

#[fixture]
fn world() -> PackagingWorld {
    let world = PackagingWorld {
        temp_dir: Some(TempDir::new().expect("temp dir")),
        ..PackagingWorld::default()
    };
    write_file(&world, "fmipp/__init__.py", b"from fmipp.export import *\n");
    write_file(&world, "fmipp/export/__init__.py", b"");
    world
}

/// Return the root of the scratch source tree.
fn root(world: &PackagingWorld) -> Utf8PathBuf {
    let path = world.temp_dir.as_ref().expect("temp_dir set").path();
    Utf8PathBuf::from_path_buf(path.to_path_buf()).expect("utf8 temp dir")
}

fn write_file(world: &PackagingWorld, relative: &str, contents: &[u8]) {
    let path = root(world).join(relative);
    fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    fs::write(path, contents).expect("write");
}

fn dist_dir(world: &PackagingWorld) -> Utf8PathBuf {
    root(world).join("dist")
}

/// Render `dist.toml` from the world and run the pipeline once.
fn run_packaging(world: &mut PackagingWorld) {
    let declared: Vec<String> = world
        .declared
        .iter()
        .map(|path| format!("\"{path}\""))
        .collect();
    let config_source = format!(
        concat!(
            "[metadata]\n",
            "name = \"fmipp\"\n",
            "version = \"1.3\"\n",
            "description = \"FMI++ Python Interface for Windows\"\n",
            "long_description_file = \"README.txt\"\n",
            "platforms = [\"Windows\"]\n",
            "\n",
            "[distribution]\n",
            "packages = [\"fmipp\", \"fmipp.export\"]\n",
            "platform_tag = \"win_amd64\"\n",
            "missing_artifacts = \"{policy}\"\n",
            "\n",
            "[package_data]\n",
            "fmipp = [{declared}]\n",
        ),
        policy = world.policy,
        declared = declared.join(", "),
    );
    write_file(world, "dist.toml", config_source.as_bytes());

    let config = DistConfig::load(&root(world).join("dist.toml")).expect("config loads");
    let context = PipelineContext {
        quiet: true,
        ..PipelineContext::new(&config)
    };
    match run_bdist(&context, world.format, &config.dist_dir(), &mut Vec::new()) {
        Ok(output) => {
            world
                .runs
                .push(fs::read(&output.archive_path).expect("read archive"));
            world.output = Some(output);
        }
        Err(err) => world.packaging_error = Some(err),
    }
}

/// Read every archive entry into memory, keyed by path.
fn archive_entries(world: &PackagingWorld) -> BTreeMap<String, Vec<u8>> {
    let output = world.output.as_ref().expect("output set");
    match world.format {
        ArchiveFormat::Wheel => read_wheel(&output.archive_path),
        ArchiveFormat::Gztar => read_gztar(&output.archive_path),
    }
}

fn read_wheel(path: &Utf8Path) -> BTreeMap<String, Vec<u8>> {
    let file = fs::File::open(path).expect("open wheel");
    let mut archive = zip::ZipArchive::new(file).expect("readable zip");
    let mut entries = BTreeMap::new();
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).expect("entry");
        let mut contents = Vec::new();
        entry.read_to_end(&mut contents).expect("read entry");
        entries.insert(entry.name().to_owned(), contents);
    }
    entries
}

fn read_gztar(path: &Utf8Path) -> BTreeMap<String, Vec<u8>> {
    let file = fs::File::open(path).expect("open bundle");
    let mut archive = tar::Archive::new(GzDecoder::new(file));
    let mut entries = BTreeMap::new();
    for entry in archive.entries().expect("entries") {
        let mut entry = entry.expect("entry");
        let name = entry.path().expect("path").to_string_lossy().into_owned();
        let mut contents = Vec::new();
        entry.read_to_end(&mut contents).expect("read entry");
        entries.insert(name, contents);
    }
    entries
}

fn entry_text(entries: &BTreeMap<String, Vec<u8>>, suffix: &str) -> String {
    let (_, contents) = entries
        .iter()
        .find(|(name, _)| name.ends_with(suffix))
        .unwrap_or_else(|| panic!("no entry ending in {suffix}"));
    String::from_utf8(contents.clone()).expect("utf8 entry")
}

// ---------------------------------------------------------------------------
// Step definitions
// ---------------------------------------------------------------------------

#[given("a long description \"{text}\"")]
fn given_long_description(world: &mut PackagingWorld, text: String) {
    write_file(world, "README.txt", text.as_bytes());
}

#[given("no long description")]
#[expect(unused_variables, reason = "rstest-bdd requires the world parameter")]
fn given_no_long_description(world: &mut PackagingWorld) {
    // The fixture never creates README.txt.
}

#[given("the missing artifact policy \"{policy}\"")]
fn given_policy(world: &mut PackagingWorld, policy: String) {
    world.policy = match policy.as_str() {
        "abort" => MissingArtifactPolicy::Abort,
        "warn" => MissingArtifactPolicy::Warn,
        "defer" => MissingArtifactPolicy::Defer,
        other => panic!("unknown policy {other}"),
    };
}

#[given("an artifact \"{path}\" on disk")]
fn given_artifact_on_disk(world: &mut PackagingWorld, path: String) {
    write_file(world, &format!("fmipp/{path}"), format!("bytes of {path}").as_bytes());
    world.declared.push(path);
}

#[given("an artifact \"{path}\" that is missing")]
fn given_missing_artifact(world: &mut PackagingWorld, path: String) {
    world.declared.push(path);
}

#[when("a wheel is built")]
fn when_wheel_built(world: &mut PackagingWorld) {
    world.format = ArchiveFormat::Wheel;
    run_packaging(world);
}

#[when("a wheel is built twice")]
fn when_wheel_built_twice(world: &mut PackagingWorld) {
    world.format = ArchiveFormat::Wheel;
    run_packaging(world);
    run_packaging(world);
}

#[when("a gztar bundle is built")]
fn when_gztar_built(world: &mut PackagingWorld) {
    world.format = ArchiveFormat::Gztar;
    run_packaging(world);
}

#[then("the archive is named \"{name}\"")]
fn then_archive_named(world: &mut PackagingWorld, name: String) {
    let output = world.output.as_ref().expect("output set");
    assert_eq!(output.archive_path, dist_dir(world).join(&name));
    assert!(output.archive_path.exists(), "archive file must exist");
}

#[then("the archive contains \"{entry}\"")]
fn then_archive_contains(world: &mut PackagingWorld, entry: String) {
    let entries = archive_entries(world);
    assert!(
        entries.contains_key(&entry),
        "missing {entry}: {:?}",
        entries.keys().collect::<Vec<_>>()
    );
}

#[then("the archive does not contain \"{entry}\"")]
fn then_archive_lacks(world: &mut PackagingWorld, entry: String) {
    let entries = archive_entries(world);
    assert!(!entries.contains_key(&entry), "unexpected entry {entry}");
}

#[then("the metadata body is \"{body}\"")]
fn then_metadata_body(world: &mut PackagingWorld, body: String) {
    let metadata = entry_text(&archive_entries(world), ".dist-info/METADATA");
    let (_, actual) = metadata.split_once("\n\n").expect("metadata body");
    assert_eq!(actual, body);
}

#[then("the archive is marked as not pure")]
fn then_not_pure(world: &mut PackagingWorld) {
    let wheel = entry_text(&archive_entries(world), "/WHEEL");
    assert!(wheel.contains("Root-Is-Purelib: false"), "WHEEL was: {wheel}");
}

#[then("packaging fails naming \"{fragment}\"")]
fn then_fails_naming(world: &mut PackagingWorld, fragment: String) {
    let err = world.packaging_error.as_ref().expect("expected a packaging error");
    assert!(
        matches!(
            err,
            PackagerError::MissingArtifact { .. } | PackagerError::MissingArtifacts { .. }
        ),
        "unexpected error: {err}"
    );
    assert!(err.to_string().contains(&fragment), "error was: {err}");
}

#[then("packaging fails with a missing description error")]
fn then_fails_missing_description(world: &mut PackagingWorld) {
    assert!(matches!(
        world.packaging_error,
        Some(PackagerError::MissingDescriptionFile { .. })
    ));
}

#[then("no archive is written")]
fn then_no_archive(world: &mut PackagingWorld) {
    assert!(world.output.is_none());
    let leftovers = fs::read_dir(dist_dir(world)).map_or(0, Iterator::count);
    assert_eq!(leftovers, 0, "output directory must stay empty");
}

#[then("both archives are byte-identical")]
fn then_identical(world: &mut PackagingWorld) {
    assert_eq!(world.runs.len(), 2);
    assert_eq!(world.runs[0], world.runs[1]);
}

// ---------------------------------------------------------------------------
// Scenario bindings
// ---------------------------------------------------------------------------

#[scenario(
    path = "tests/features/packaging.feature",
    name = "Wheel carries the long description and declared libraries"
)]
fn scenario_wheel_contents(world: PackagingWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/packaging.feature",
    name = "Missing static library aborts packaging"
)]
fn scenario_missing_library(world: PackagingWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/packaging.feature",
    name = "Missing long description aborts packaging"
)]
fn scenario_missing_description(world: PackagingWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/packaging.feature",
    name = "Rebuilding produces an identical archive"
)]
fn scenario_idempotent(world: PackagingWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/packaging.feature",
    name = "Warn policy skips a missing library"
)]
fn scenario_warn_skips(world: PackagingWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/packaging.feature",
    name = "Warn policy still requires licence files"
)]
fn scenario_warn_licence(world: PackagingWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/packaging.feature",
    name = "Deferred check fails when bytes are copied"
)]
fn scenario_defer(world: PackagingWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/packaging.feature",
    name = "Tarball bundle carries the payload"
)]
fn scenario_gztar(world: PackagingWorld) {
    let _ = world;
}
