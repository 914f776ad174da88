//! # macrohex Test Harness
//!
//! Discovers YAML suites under `tests/suites`, compiles each case through an
//! in-memory file set, and compares the output or error against the case's
//! expectation.
//!
//! ```yaml
//! - name: "test name"
//!   input: "!a"                      # becomes main.macrohex
//!   files:                           # optional extra files
//!     lib.macrohex: "!b"
//!   std: false                       # optional, inject files under std/
//!   expected: "a"                    # for success tests
//!   expect_error: "substring"        # for error tests
//!   expect_error_code: "macrohex::resolution::undefined_macro"
//!   expect_warning: "substring"      # optional
//!   skip: false                      # optional
//! ```

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use macrohex::cli::output::BufferedLog;
use macrohex::config::CompilerConfig;
use macrohex::engine::{compile, CompileContext, MemoryLoader, SharedLog};
use serde::Deserialize;
use walkdir::WalkDir;

pub const SUITE_ROOT: &str = "tests/suites";
const MAIN_FILE: &str = "main.macrohex";

// =============================================================================
// CORE TYPES
// =============================================================================

#[derive(Debug, Deserialize, Clone)]
pub struct TestCase {
    pub name: String,
    pub input: String,
    #[serde(default)]
    pub files: BTreeMap<String, String>,
    #[serde(default)]
    pub std: bool,
    pub expected: Option<String>,
    pub expect_error: Option<String>,
    pub expect_error_code: Option<String>,
    pub expect_warning: Option<String>,
    #[serde(default)]
    pub skip: bool,
}

#[derive(Debug, Clone)]
pub enum TestResult {
    Pass,
    Fail {
        file: String,
        name: String,
        reason: String,
    },
    Skipped {
        file: String,
        name: String,
    },
}

// =============================================================================
// DISCOVERY AND LOADING
// =============================================================================

/// Every `.yaml`/`.yml` file under `root`, sorted.
pub fn discover_yaml_files<P: AsRef<Path>>(root: P) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.file_type().is_file()
                && e.path()
                    .extension()
                    .is_some_and(|ext| ext == "yaml" || ext == "yml")
        })
        .map(|e| e.path().to_path_buf())
        .collect();
    files.sort();
    files
}

pub fn load_test_cases(path: &Path) -> Vec<TestCase> {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("failed to read {}: {}", path.display(), e));
    serde_yaml::from_str(&content)
        .unwrap_or_else(|e| panic!("failed to parse YAML in {}: {}", path.display(), e))
}

// =============================================================================
// EXECUTION
// =============================================================================

fn config_for(case: &TestCase) -> CompilerConfig {
    CompilerConfig {
        include_std: case.std,
        std_path: Some(PathBuf::from("std")),
        ..CompilerConfig::default()
    }
}

pub fn run_test_case(case: &TestCase, file: &str) -> TestResult {
    let file = file.to_string();
    let name = case.name.clone();
    if case.skip {
        return TestResult::Skipped { file, name };
    }

    let mut loader = MemoryLoader::new().with_file(MAIN_FILE, case.input.as_str());
    for (path, text) in &case.files {
        loader.insert(path, text.as_str());
    }
    let log = Rc::new(RefCell::new(BufferedLog::new(false)));
    let mut ctx = CompileContext::new(config_for(case), loader, SharedLog(log.clone()));
    let result = compile(&mut ctx, Path::new(MAIN_FILE));

    let mut failures = Vec::new();
    match (&result, &case.expected) {
        (Ok(output), Some(expected)) if output != expected.trim_end() => failures.push(format!(
            "expected output:\n{}\nactual output:\n{}",
            expected.trim_end(),
            output
        )),
        (Ok(_), _) if case.expect_error.is_some() || case.expect_error_code.is_some() => {
            failures.push("expected an error but compilation succeeded".to_string())
        }
        (Err(error), _) => {
            let message = error.to_string();
            let code = error.error_code();
            let expected_any = case.expect_error.is_some() || case.expect_error_code.is_some();
            if !expected_any {
                failures.push(format!("unexpected error: {}", message));
            }
            if let Some(substring) = &case.expect_error {
                if !message.contains(substring.as_str()) {
                    failures.push(format!("error {:?} lacks {:?}", message, substring));
                }
            }
            if let Some(expected_code) = &case.expect_error_code {
                if &code != expected_code {
                    failures.push(format!("error code {} != {}", code, expected_code));
                }
            }
        }
        _ => {}
    }
    if let Some(substring) = &case.expect_warning {
        let warnings = log.borrow().warnings();
        if !warnings.iter().any(|w| w.contains(substring.as_str())) {
            failures.push(format!("no warning containing {:?} in {:?}", substring, warnings));
        }
    }

    if failures.is_empty() {
        TestResult::Pass
    } else {
        TestResult::Fail {
            file,
            name,
            reason: failures.join("\n"),
        }
    }
}

/// Runs every suite, printing failures. Returns `(passed, failed, skipped)`.
pub fn run_all_tests(filter: Option<&str>) -> (usize, usize, usize) {
    let (mut passed, mut failed, mut skipped) = (0, 0, 0);
    for path in discover_yaml_files(SUITE_ROOT) {
        let file = path.display().to_string();
        for case in load_test_cases(&path) {
            if filter.is_some_and(|f| !case.name.to_lowercase().contains(f)) {
                skipped += 1;
                continue;
            }
            match run_test_case(&case, &file) {
                TestResult::Pass => passed += 1,
                TestResult::Skipped { file, name } => {
                    skipped += 1;
                    println!("SKIP {} :: {}", file, name);
                }
                TestResult::Fail { file, name, reason } => {
                    failed += 1;
                    eprintln!("FAIL {} :: {}\n{}\n", file, name, reason);
                }
            }
        }
    }
    (passed, failed, skipped)
}
