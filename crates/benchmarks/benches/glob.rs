use std::path::Path;

use cmdload::{MatchOptions, scan::scan_blocking};

const PATTERN: &str = "**/*.{ts,js,cjs,mjs}";

fn main() {
    divan::main();
}

/// Synthetic bot layout: `groups` folders of `per_group` command files plus
/// some non-matching noise.
fn command_tree(groups: usize, per_group: usize) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for g in 0..groups {
        let group = dir.path().join(format!("group{g}"));
        std::fs::create_dir_all(&group).unwrap();
        for c in 0..per_group {
            let ext = ["ts", "js", "mjs", "cjs"][c % 4];
            std::fs::write(group.join(format!("cmd{c}.{ext}")), "").unwrap();
            std::fs::write(group.join(format!("cmd{c}.md")), "").unwrap();
        }
    }
    dir
}

fn scan(root: &Path, patterns: &[String], options: &MatchOptions) -> usize {
    scan_blocking(root, patterns, options).unwrap().len()
}

#[divan::bench(args = [10, 100])]
fn default_pattern(bencher: divan::Bencher, groups: usize) {
    let dir = command_tree(groups, 20);
    let patterns = vec![PATTERN.to_string()];
    let options = MatchOptions::default();
    bencher.bench(|| scan(divan::black_box(dir.path()), &patterns, &options));
}

#[divan::bench(args = [10, 100])]
fn many_patterns_with_ignore(bencher: divan::Bencher, groups: usize) {
    let dir = command_tree(groups, 20);
    let patterns = vec!["**/*.ts".to_string(), "**/*.js".to_string(), "**/*.mjs".to_string()];
    let options = MatchOptions {
        ignore: vec!["group1*/**".to_string()],
        ..Default::default()
    };
    bencher.bench(|| scan(divan::black_box(dir.path()), &patterns, &options));
}
