use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Whatsapp,
    Sms,
    Email,
    Instagram,
}

impl Channel {
    pub const ALL: [Channel; 4] = [Channel::Whatsapp, Channel::Sms, Channel::Email, Channel::Instagram];
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MessageTemplate {
    pub id: Uuid,
    pub name: String,
    pub body: String,
    #[serde(default)]
    pub channels: BTreeSet<Channel>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NewTemplate {
    pub name: String,
    pub body: String,
    #[serde(default)]
    pub channels: BTreeSet<Channel>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TemplatePatch {
    pub name: Option<String>,
    pub body: Option<String>,
    pub channels: Option<BTreeSet<Channel>>,
}

fn validate_body(body: &str) -> Result<String, ModelError> {
    if body.trim().is_empty() {
        return Err(ModelError::validation("template body required"));
    }
    Ok(body.to_string())
}

impl MessageTemplate {
    pub fn create(input: NewTemplate, now: DateTime<Utc>) -> Result<Self, ModelError> {
        Ok(Self {
            id: Uuid::new_v4(),
            name: crate::validate_name("template name", &input.name)?,
            body: validate_body(&input.body)?,
            channels: input.channels,
            created_at: now,
        })
    }

    pub fn apply(&mut self, patch: TemplatePatch) -> Result<(), ModelError> {
        let name = patch.name.as_deref().map(|n| crate::validate_name("template name", n)).transpose()?;
        let body = patch.body.as_deref().map(validate_body).transpose()?;
        if let Some(n) = name { self.name = n; }
        if let Some(b) = body { self.body = b; }
        if let Some(c) = patch.channels { self.channels = c; }
        Ok(())
    }

    pub fn placeholders(&self) -> Vec<String> {
        placeholders(&self.body)
    }
}

/// One `{token}` occurrence: byte range in the body and the token name.
fn tokens(body: &str) -> Vec<(usize, usize, &str)> {
    let mut out = Vec::new();
    let bytes = body.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'{' {
            let rest = &body[i + 1..];
            let len = rest
                .bytes()
                .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_')
                .count();
            if len > 0 && rest.as_bytes().get(len) == Some(&b'}') {
                out.push((i, i + len + 2, &rest[..len]));
                i += len + 2;
                continue;
            }
        }
        i += 1;
    }
    out
}

/// Placeholder names in order of first appearance, deduplicated.
pub fn placeholders(body: &str) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for (_, _, name) in tokens(body) {
        if !seen.iter().any(|s| s == name) {
            seen.push(name.to_string());
        }
    }
    seen
}

/// Replace known `{token}`s; unknown tokens stay as written.
pub fn render(body: &str, vars: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(body.len());
    let mut last = 0;
    for (start, end, name) in tokens(body) {
        if let Some(value) = vars.get(name) {
            out.push_str(&body[last..start]);
            out.push_str(value);
            last = end;
        }
    }
    out.push_str(&body[last..]);
    out
}

/// Templates seeded for a user who has none stored yet.
pub fn default_templates(now: DateTime<Utc>) -> Vec<MessageTemplate> {
    let all: BTreeSet<Channel> = [Channel::Whatsapp, Channel::Sms].into_iter().collect();
    [
        (
            "Appointment confirmation",
            "Hi {client_name}! Your session at {studio_name} is confirmed for {date} at {time}. See you soon!",
        ),
        (
            "Reminder",
            "Hi {client_name}, a reminder of your appointment tomorrow, {date} at {time}. Questions? Call {studio_phone}.",
        ),
        (
            "Aftercare",
            "Thanks for visiting {studio_name}, {client_name}! Keep the tattoo clean and moisturized, and avoid sun and pools for two weeks.",
        ),
    ]
    .into_iter()
    .map(|(name, body)| MessageTemplate {
        id: Uuid::new_v4(),
        name: name.to_string(),
        body: body.to_string(),
        channels: all.clone(),
        created_at: now,
    })
    .collect()
}
