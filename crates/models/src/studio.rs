use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Singleton studio profile, one per account.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StudioData {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub owner_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub instagram: String,
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default)]
    pub opening_hours: String,
}

fn default_currency_symbol() -> String { "$".into() }

impl Default for StudioData {
    fn default() -> Self {
        Self {
            name: String::new(),
            owner_name: String::new(),
            phone: String::new(),
            email: String::new(),
            address: String::new(),
            instagram: String::new(),
            currency_symbol: default_currency_symbol(),
            opening_hours: String::new(),
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StudioPatch {
    pub name: Option<String>,
    pub owner_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub instagram: Option<String>,
    pub currency_symbol: Option<String>,
    pub opening_hours: Option<String>,
}

impl StudioData {
    pub fn apply(&mut self, patch: StudioPatch) -> Result<(), ModelError> {
        let email = patch.email.as_deref().map(crate::validate_optional_email).transpose()?;
        if let Some(sym) = &patch.currency_symbol {
            if sym.trim().is_empty() {
                return Err(ModelError::validation("currency symbol required"));
            }
        }
        if let Some(e) = email { self.email = e; }
        if let Some(n) = patch.name { self.name = n.trim().to_string(); }
        if let Some(o) = patch.owner_name { self.owner_name = o.trim().to_string(); }
        if let Some(p) = patch.phone { self.phone = p.trim().to_string(); }
        if let Some(a) = patch.address { self.address = a.trim().to_string(); }
        if let Some(i) = patch.instagram { self.instagram = i.trim().trim_start_matches('@').to_string(); }
        if let Some(c) = patch.currency_symbol { self.currency_symbol = c.trim().to_string(); }
        if let Some(h) = patch.opening_hours { self.opening_hours = h; }
        Ok(())
    }
}
