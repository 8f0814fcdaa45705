//! Supabase-compatible REST remote.
//!
//! Auth goes through GoTrue (`/auth/v1`), rows through PostgREST
//! (`/rest/v1/<table>`). The access token from sign-in is cached in
//! `session.json` so later invocations stay signed in. Tokens are not
//! refreshed: once the server rejects one, run `daybook login` again.

use super::{AuthEvent, AuthListener, AuthListeners, RemoteBackend, RemoteRow, RemoteUser};
use crate::error::{DaybookError, Result};
use crate::model::Record;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, warn};

const SESSION_FILENAME: &str = "session.json";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredSession {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    user: RemoteUser,
}

#[derive(Debug, Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

pub struct RestRemote {
    client: Client,
    base_url: String,
    api_key: String,
    table: String,
    session_path: PathBuf,
    listeners: AuthListeners,
}

impl RestRemote {
    pub fn new(
        base_url: &str,
        api_key: &str,
        table: &str,
        data_dir: impl Into<PathBuf>,
    ) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            table: table.to_string(),
            session_path: data_dir.into().join(SESSION_FILENAME),
            listeners: AuthListeners::default(),
        })
    }

    pub fn is_configured(&self) -> bool {
        !self.base_url.is_empty() && !self.api_key.is_empty()
    }

    fn ensure_configured(&self) -> Result<()> {
        if self.is_configured() {
            Ok(())
        } else {
            Err(DaybookError::Remote(
                "Remote backend is not configured. Set remote-url and remote-key with `daybook config`."
                    .into(),
            ))
        }
    }

    fn load_session(&self) -> Result<Option<StoredSession>> {
        if !self.session_path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.session_path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn save_session(&self, session: &StoredSession) -> Result<()> {
        if let Some(parent) = self.session_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.session_path, serde_json::to_string_pretty(session)?)?;
        Ok(())
    }

    fn clear_session(&self) -> Result<()> {
        if self.session_path.exists() {
            fs::remove_file(&self.session_path)?;
        }
        Ok(())
    }

    fn access_token(&self) -> Result<String> {
        self.load_session()?
            .map(|s| s.access_token)
            .ok_or(DaybookError::NotSignedIn)
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    fn authorized(&self, request: RequestBuilder, token: &str) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(token)
    }
}

fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(DaybookError::Remote(format!("{} {}", status, body.trim())))
}

impl RemoteBackend for RestRemote {
    fn session_user(&self) -> Result<Option<RemoteUser>> {
        Ok(self.load_session()?.map(|s| s.user))
    }

    fn subscribe(&mut self, listener: AuthListener) {
        self.listeners.push(listener);
    }

    fn sign_in(&mut self, email: &str, password: &str) -> Result<AuthEvent> {
        self.ensure_configured()?;
        let url = format!("{}/auth/v1/token?grant_type=password", self.base_url);
        debug!(%url, "signing in");

        let response = self
            .client
            .post(&url)
            .header("apikey", &self.api_key)
            .json(&PasswordGrant { email, password })
            .send()?;
        let session: StoredSession = check(response)?.json()?;
        self.save_session(&session)?;

        let event = AuthEvent::signed_in(session.user);
        self.listeners.notify(&event);
        Ok(event)
    }

    fn sign_out(&mut self) -> Result<AuthEvent> {
        if let Some(session) = self.load_session()? {
            if self.is_configured() {
                let url = format!("{}/auth/v1/logout", self.base_url);
                let sent = self
                    .authorized(self.client.post(&url), &session.access_token)
                    .send()
                    .map_err(DaybookError::from)
                    .and_then(check);
                if let Err(e) = sent {
                    warn!("Server sign-out failed, clearing local session anyway: {}", e);
                }
            }
        }
        self.clear_session()?;

        let event = AuthEvent::signed_out();
        self.listeners.notify(&event);
        Ok(event)
    }

    fn upsert_records(&self, user: &RemoteUser, records: &[Record]) -> Result<usize> {
        self.ensure_configured()?;
        let token = self.access_token()?;
        let rows: Vec<RemoteRow> = records
            .iter()
            .map(|r| RemoteRow::from_record(r, user.id))
            .collect();

        let url = format!("{}?on_conflict=id", self.table_url());
        debug!(%url, rows = rows.len(), "upserting");
        let response = self
            .authorized(self.client.post(&url), &token)
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&rows)
            .send()?;
        check(response)?;
        Ok(rows.len())
    }

    fn select_records(&self, user: &RemoteUser) -> Result<Vec<Record>> {
        self.ensure_configured()?;
        let token = self.access_token()?;
        let url = format!(
            "{}?select=*&user_id=eq.{}&order=created_at.desc",
            self.table_url(),
            user.id
        );
        debug!(%url, "selecting");
        let response = self.authorized(self.client.get(&url), &token).send()?;
        let rows: Vec<RemoteRow> = check(response)?.json()?;
        Ok(rows.into_iter().map(RemoteRow::into_record).collect())
    }
}
