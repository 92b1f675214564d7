use crate::domain::orcid::{OrcidId, WorkDetail, WorkSummary, WorksResponse};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Read access to one ORCID record's works.
pub trait WorkSource {
    fn describe(&self) -> String;
    fn list_works(&self, id: &OrcidId) -> anyhow::Result<Vec<WorkSummary>>;
    fn work_detail(&self, id: &OrcidId, put_code: i64) -> anyhow::Result<WorkDetail>;
}

pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// `http(s)://...` talks to the ORCID API; anything else is a local mirror
/// directory laid out like the API (`<id>/works.json`, `<id>/work/<put-code>.json`).
pub fn open_source(api: &str, timeout_ms: u64) -> anyhow::Result<Box<dyn WorkSource>> {
    if is_remote(api) {
        Ok(Box::new(HttpSource::new(api, timeout_ms)?))
    } else {
        Ok(Box::new(MirrorSource {
            root: PathBuf::from(api),
        }))
    }
}

fn first_summaries(resp: WorksResponse) -> Vec<WorkSummary> {
    resp.group
        .into_iter()
        .enumerate()
        .filter_map(|(i, g)| {
            let first = g.work_summary.into_iter().next();
            if first.is_none() {
                tracing::warn!(group = i, "work group has no summary, skipping");
            }
            first
        })
        .collect()
}

pub struct HttpSource {
    client: reqwest::blocking::Client,
    base: String,
}

impl HttpSource {
    pub fn new(base: &str, timeout_ms: u64) -> anyhow::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .user_agent(concat!("orcid-site/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base: base.trim_end_matches('/').to_string(),
        })
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> anyhow::Result<T> {
        tracing::debug!(%url, "GET");
        let resp = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()?
            .error_for_status()?;
        Ok(resp.json()?)
    }
}

impl WorkSource for HttpSource {
    fn describe(&self) -> String {
        self.base.clone()
    }

    fn list_works(&self, id: &OrcidId) -> anyhow::Result<Vec<WorkSummary>> {
        let resp: WorksResponse = self.get_json(&format!("{}/{}/works", self.base, id))?;
        Ok(first_summaries(resp))
    }

    fn work_detail(&self, id: &OrcidId, put_code: i64) -> anyhow::Result<WorkDetail> {
        self.get_json(&format!("{}/{}/work/{}", self.base, id, put_code))
    }
}

pub struct MirrorSource {
    root: PathBuf,
}

impl MirrorSource {
    fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
        tracing::debug!(path = %path.display(), "read");
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))?;
        Ok(serde_json::from_str(&raw)?)
    }
}

impl WorkSource for MirrorSource {
    fn describe(&self) -> String {
        self.root.to_string_lossy().to_string()
    }

    fn list_works(&self, id: &OrcidId) -> anyhow::Result<Vec<WorkSummary>> {
        let path = self.root.join(id.as_str()).join("works.json");
        Ok(first_summaries(Self::read_json(&path)?))
    }

    fn work_detail(&self, id: &OrcidId, put_code: i64) -> anyhow::Result<WorkDetail> {
        let path = self
            .root
            .join(id.as_str())
            .join("work")
            .join(format!("{}.json", put_code));
        Self::read_json(&path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::publications::fetch_publications;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use tempfile::TempDir;

    struct Seen {
        path: String,
        accept: Option<String>,
    }

    // Serves `routes` (path, status, body) for exactly `requests` connections.
    fn serve(
        routes: Vec<(String, u16, String)>,
        requests: usize,
    ) -> (String, mpsc::Receiver<Seen>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("addr");
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            for stream in listener.incoming().take(requests) {
                let mut stream = stream.expect("accept");
                let mut reader = BufReader::new(stream.try_clone().expect("clone"));
                let mut request_line = String::new();
                reader.read_line(&mut request_line).expect("request line");
                let path = request_line
                    .split_whitespace()
                    .nth(1)
                    .unwrap_or("")
                    .to_string();
                let mut accept = None;
                loop {
                    let mut line = String::new();
                    reader.read_line(&mut line).expect("header");
                    let line = line.trim_end();
                    if line.is_empty() {
                        break;
                    }
                    if let Some((name, value)) = line.split_once(':') {
                        if name.eq_ignore_ascii_case("accept") {
                            accept = Some(value.trim().to_string());
                        }
                    }
                }
                let (status, body) = routes
                    .iter()
                    .find(|(p, _, _)| *p == path)
                    .map(|(_, s, b)| (*s, b.clone()))
                    .unwrap_or((404, "{}".to_string()));
                let reason = if status == 200 { "OK" } else { "Not Found" };
                let resp = format!(
                    "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    reason,
                    body.len(),
                    body
                );
                stream.write_all(resp.as_bytes()).expect("write response");
                let _ = tx.send(Seen { path, accept });
            }
        });
        (format!("http://{}/v3.0/", addr), rx)
    }

    #[test]
    fn http_source_requests_json_from_api_paths() {
        let id: OrcidId = "0000-0002-1825-0097".parse().expect("id");
        let works = serde_json::json!({"group": [
            {"work-summary": [{"put-code": 7, "title": {"title": {"value": "Seven"}}}]}
        ]})
        .to_string();
        let (base, seen) = serve(
            vec![(format!("/v3.0/{}/works", id), 200, works)],
            1,
        );

        let src = open_source(&base, 5000).expect("open");
        assert_eq!(src.describe(), base.trim_end_matches('/'));
        let listed = src.list_works(&id).expect("list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].put_code, 7);

        let req = seen.recv().expect("request seen");
        assert_eq!(req.path, format!("/v3.0/{}/works", id));
        assert_eq!(req.accept.as_deref(), Some("application/json"));
    }

    #[test]
    fn http_error_on_work_detail_aborts_fetch() {
        let id: OrcidId = "0000-0002-1825-0097".parse().expect("id");
        let works = serde_json::json!({"group": [
            {"work-summary": [{"put-code": 1}]},
            {"work-summary": [{"put-code": 2}]}
        ]})
        .to_string();
        let detail = serde_json::json!({
            "put-code": 1,
            "citation": {"citation-type": "bibtex", "citation-value": "@misc{one, year={2020}}"}
        })
        .to_string();
        let (base, seen) = serve(
            vec![
                (format!("/v3.0/{}/works", id), 200, works),
                (format!("/v3.0/{}/work/1", id), 200, detail),
            ],
            3,
        );

        let src = open_source(&base, 5000).expect("open");
        let err = fetch_publications(src.as_ref(), &id).expect_err("404 must fail");
        assert!(err.to_string().contains("work 2"), "{}", err);

        let paths: Vec<String> = seen.iter().take(3).map(|s| s.path).collect();
        assert_eq!(
            paths,
            vec![
                format!("/v3.0/{}/works", id),
                format!("/v3.0/{}/work/1", id),
                format!("/v3.0/{}/work/2", id),
            ]
        );
    }

    #[test]
    fn remote_detection() {
        assert!(is_remote("https://pub.orcid.org/v3.0"));
        assert!(!is_remote("./mirror"));
    }

    #[test]
    fn mirror_reads_first_summary_per_group() {
        let tmp = TempDir::new().expect("tmp");
        let id: OrcidId = "0000-0002-1825-0097".parse().expect("id");
        let dir = tmp.path().join(id.as_str());
        std::fs::create_dir_all(dir.join("work")).expect("mkdir");
        std::fs::write(
            dir.join("works.json"),
            serde_json::json!({"group": [
                {"work-summary": [{"put-code": 1}, {"put-code": 2}]},
                {"work-summary": []},
                {"work-summary": [{"put-code": 3}]}
            ]})
            .to_string(),
        )
        .expect("write works");
        std::fs::write(
            dir.join("work/3.json"),
            serde_json::json!({"put-code": 3, "title": {"title": {"value": "Three"}}}).to_string(),
        )
        .expect("write detail");

        let src = open_source(tmp.path().to_str().expect("utf8"), 1000).expect("open");
        let works = src.list_works(&id).expect("list");
        let codes: Vec<i64> = works.iter().map(|w| w.put_code).collect();
        assert_eq!(codes, vec![1, 3]);
        let detail = src.work_detail(&id, 3).expect("detail");
        assert_eq!(detail.title_text(), Some("Three"));
        assert!(src.work_detail(&id, 1).is_err());
    }
}
