#![allow(dead_code)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const ORCID: &str = "0000-0002-1825-0097";

pub struct TestEnv {
    _tmp: TempDir,
    pub home: PathBuf,
    pub work: PathBuf,
    pub mirror: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let home = tmp.path().join("home");
        let work = tmp.path().join("site");
        fs::create_dir_all(&home).expect("create isolated home");
        fs::create_dir_all(&work).expect("create site dir");

        let mirror = make_fixture_mirror(tmp.path());

        Self {
            _tmp: tmp,
            home,
            work,
            mirror,
        }
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("orcid-site");
        cmd.env("HOME", &self.home)
            .env_remove("RUST_LOG")
            .current_dir(&self.work);
        cmd
    }

    pub fn mirror_arg(&self) -> &str {
        self.mirror.to_str().expect("mirror path utf8")
    }

    pub fn run_json(&self, args: &[&str]) -> Value {
        let mut cmd = self.cmd();
        let out = cmd
            .arg("--json")
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }

    pub fn fetch_json(&self, extra: &[&str]) -> Value {
        let mut args = vec!["fetch", "--orcid", ORCID, "--api", self.mirror_arg()];
        args.extend_from_slice(extra);
        self.run_json(&args)
    }

    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.work.join(rel)).expect("read work file")
    }
}

fn write_json(path: &Path, v: &Value) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create fixture dir");
    }
    fs::write(path, serde_json::to_string_pretty(v).expect("serialize")).expect("write fixture");
}

/// Four works: a BibTeX citation (2019), metadata only (2023), a broken
/// citation (2021), and metadata with no date.
fn make_fixture_mirror(base: &Path) -> PathBuf {
    let mirror = base.join("mirror");
    let record = mirror.join(ORCID);

    write_json(
        &record.join("works.json"),
        &serde_json::json!({"group": [
            {"work-summary": [{"put-code": 101, "title": {"title": {"value": "Engines"}}}]},
            {"work-summary": [{"put-code": 102, "title": {"title": {"value": "Graphs"}}}]},
            {"work-summary": [{"put-code": 103, "title": {"title": {"value": "Broken"}}}]},
            {"work-summary": [{"put-code": 104, "title": {"title": {"value": "Undated Note"}}}]}
        ]}),
    );
    write_json(
        &record.join("work/101.json"),
        &serde_json::json!({
            "put-code": 101,
            "external-ids": {"external-id": [
                {"external-id-type": "doi", "external-id-value": "https://doi.org/10.1000/engines"}
            ]},
            "citation": {
                "citation-type": "bibtex",
                "citation-value": "@article{Lovelace_2019, title={Engines}, author={Lovelace, Ada}, year={2019}}"
            }
        }),
    );
    write_json(
        &record.join("work/102.json"),
        &serde_json::json!({
            "put-code": 102,
            "title": {"title": {"value": "Graphs"}},
            "publication-date": {"year": {"value": "2023"}},
            "contributors": {"contributor": [{"credit-name": {"value": "Ada Lovelace"}}]},
            "external-ids": {"external-id": [
                {"external-id-type": "url", "external-id-value": "https://example.org/graphs"}
            ]}
        }),
    );
    write_json(
        &record.join("work/103.json"),
        &serde_json::json!({
            "put-code": 103,
            "citation": {
                "citation-type": "bibtex",
                "citation-value": "@inproceedings{broken, year = {2021}, title = {Broken"
            }
        }),
    );
    write_json(
        &record.join("work/104.json"),
        &serde_json::json!({
            "put-code": 104,
            "title": {"title": {"value": "Undated Note"}}
        }),
    );

    mirror
}
