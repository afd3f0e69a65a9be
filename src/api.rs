use anyhow::{Result, anyhow};
use serde::Deserialize;

// ── Wire types ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Session {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// One persisted transcript entry. `type` distinguishes user prompts from the
/// agent's messages; `agent_plan_text` carries the raw plan markdown.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct HistoryItem {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FileEntry {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Envelope shared by the filesystem endpoints: `status` is "success" or
/// "error", with `message` carrying the error text.
#[derive(Debug, Clone, Deserialize)]
struct FilesResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    contents: Vec<FileEntry>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct FileContentResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct StatusResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: Option<String>,
}

// ── Client ────────────────────────────────────────────────────────────────────

/// Thin REST client over the backend. Every method is a single round trip;
/// non-2xx responses become errors carrying the status and body.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: String,
}

impl ApiClient {
    pub fn new(server: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base: server.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    pub async fn list_sessions(&self) -> Result<Vec<Session>> {
        let resp = self.http.get(format!("{}/sessions", self.base)).send().await?;
        Ok(check(resp).await?.json().await?)
    }

    pub async fn create_session(&self) -> Result<Session> {
        let resp = self.http.post(format!("{}/sessions", self.base)).send().await?;
        Ok(check(resp).await?.json().await?)
    }

    pub async fn history(&self, session_id: &str) -> Result<Vec<HistoryItem>> {
        let resp = self
            .http
            .get(format!("{}/sessions/{}", self.base, session_id))
            .send()
            .await?;
        Ok(check(resp).await?.json().await?)
    }

    /// Kick off an agent run. Results arrive on the event channel, not here.
    pub async fn run_agent(&self, prompt: &str, session_id: &str, client_id: &str) -> Result<()> {
        let body = serde_json::json!({
            "user_prompt": prompt,
            "session_id": session_id,
            "client_id": client_id,
        });
        let resp = self
            .http
            .post(format!("{}/agent/run", self.base))
            .json(&body)
            .send()
            .await?;
        check(resp).await?;
        Ok(())
    }

    /// Flat listing of the session workspace under `path` ("." for the root).
    pub async fn list_files(&self, session_id: &str, path: &str) -> Result<Vec<FileEntry>> {
        let resp = self
            .http
            .get(format!("{}/sessions/{}/files", self.base, session_id))
            .query(&[("path", path)])
            .send()
            .await?;
        let body: FilesResponse = check(resp).await?.json().await?;
        if body.status == "error" {
            return Err(anyhow!(body.message.unwrap_or_else(|| "file listing failed".to_string())));
        }
        Ok(body.contents)
    }

    pub async fn file_content(&self, session_id: &str, path: &str) -> Result<String> {
        let resp = self
            .http
            .get(format!("{}/sessions/{}/file_content", self.base, session_id))
            .query(&[("path", path)])
            .send()
            .await?;
        let body: FileContentResponse = check(resp).await?.json().await?;
        if body.status == "error" {
            return Err(anyhow!(body.message.unwrap_or_else(|| "file read failed".to_string())));
        }
        Ok(body.content)
    }

    pub async fn save_file(&self, session_id: &str, path: &str, content: &str) -> Result<()> {
        let body = serde_json::json!({ "path": path, "content": content });
        let resp = self
            .http
            .post(format!("{}/sessions/{}/files", self.base, session_id))
            .json(&body)
            .send()
            .await?;
        let body: StatusResponse = check(resp).await?.json().await?;
        if body.status == "error" {
            return Err(anyhow!(body.message.unwrap_or_else(|| "file save failed".to_string())));
        }
        Ok(())
    }
}

async fn check(resp: reqwest::Response) -> Result<reqwest::Response> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status();
    let text = resp.text().await.unwrap_or_default();
    Err(anyhow!("API error {}: {}", status, text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:8000/");
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[test]
    fn history_items_decode_with_missing_text() {
        let items: Vec<HistoryItem> =
            serde_json::from_str(r#"[{"type": "user", "text": "hi"}, {"type": "status"}]"#).unwrap();
        assert_eq!(items[0].kind, "user");
        assert_eq!(items[1].text, "");
    }

    #[test]
    fn file_path_query_is_encoded() {
        // Built the same way list_files/file_content build theirs
        let req = reqwest::Client::new()
            .get("http://localhost:8000/sessions/s1/files")
            .query(&[("path", "src/my file.py")])
            .build()
            .unwrap();
        let query = req.url().query().unwrap();
        assert!(query.starts_with("path="));
        assert!(!query.contains(' '));
    }

    #[test]
    fn file_entries_decode() {
        let entries: Vec<FileEntry> = serde_json::from_str(
            r#"[{"name": "src", "path": "src", "type": "directory"},
                {"name": "main.py", "path": "main.py", "type": "file"}]"#,
        )
        .unwrap();
        assert_eq!(entries[0].kind, "directory");
        assert_eq!(entries[1].path, "main.py");
    }
}
