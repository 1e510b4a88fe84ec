use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use models::money::format_cents;
use models::template::{self, Channel, MessageTemplate, NewTemplate, TemplatePatch};

use super::appointment_service::AppointmentService;
use super::studio_service::StudioService;
use crate::clock::Clock;
use crate::errors::ServiceError;
use crate::storage::{Collection, DataKind, KvStore, UserScope};

/// Message templates with `{placeholder}` tokens.
#[derive(Clone)]
pub struct TemplateService {
    templates: Collection<MessageTemplate>,
    appointments: AppointmentService,
    studio: StudioService,
    clock: Arc<dyn Clock>,
}

/// A rendered message and the channels it may be sent through.
#[derive(Clone, Debug, serde::Serialize)]
pub struct RenderedMessage {
    pub template_id: Uuid,
    pub text: String,
    pub channels: Vec<Channel>,
    /// Tokens left unreplaced because no value was known.
    pub unresolved: Vec<String>,
}

impl TemplateService {
    pub fn new(store: Arc<dyn KvStore>, appointments: AppointmentService, studio: StudioService, clock: Arc<dyn Clock>) -> Self {
        Self { templates: Collection::new(store, DataKind::MessageTemplates), appointments, studio, clock }
    }

    #[instrument(skip(self, scope, input), fields(user_id = %scope.user_id()))]
    pub async fn create(&self, scope: &UserScope, input: NewTemplate) -> Result<MessageTemplate, ServiceError> {
        self.seed_if_missing(scope).await?;
        let t = MessageTemplate::create(input, self.clock.now_utc())?;
        let stored = t.clone();
        self.templates.update(scope, move |items| { items.push(stored); Ok(()) }).await?;
        info!(template_id = %t.id, "template_created");
        Ok(t)
    }

    pub async fn get(&self, scope: &UserScope, id: Uuid) -> Result<Option<MessageTemplate>, ServiceError> {
        Ok(self.list(scope).await?.into_iter().find(|t| t.id == id))
    }

    /// All templates; a user with nothing stored gets the defaults seeded.
    pub async fn list(&self, scope: &UserScope) -> Result<Vec<MessageTemplate>, ServiceError> {
        self.seed_if_missing(scope).await?;
        self.templates.load(scope).await
    }

    async fn seed_if_missing(&self, scope: &UserScope) -> Result<(), ServiceError> {
        if self.templates.load_one::<serde_json::Value>(scope).await?.is_some() {
            return Ok(());
        }
        let defaults = template::default_templates(self.clock.now_utc());
        self.templates.save(scope, &defaults).await?;
        info!(user_id = %scope.user_id(), count = defaults.len(), "default_templates_seeded");
        Ok(())
    }

    pub async fn update(&self, scope: &UserScope, id: Uuid, patch: TemplatePatch) -> Result<MessageTemplate, ServiceError> {
        self.seed_if_missing(scope).await?;
        self.templates
            .update(scope, |items| {
                let t = items.iter_mut().find(|t| t.id == id).ok_or_else(|| ServiceError::not_found("template"))?;
                t.apply(patch)?;
                Ok(t.clone())
            })
            .await
    }

    pub async fn set_channel(&self, scope: &UserScope, id: Uuid, channel: Channel, enabled: bool) -> Result<MessageTemplate, ServiceError> {
        self.seed_if_missing(scope).await?;
        self.templates
            .update(scope, |items| {
                let t = items.iter_mut().find(|t| t.id == id).ok_or_else(|| ServiceError::not_found("template"))?;
                if enabled {
                    t.channels.insert(channel);
                } else {
                    t.channels.remove(&channel);
                }
                Ok(t.clone())
            })
            .await
    }

    /// Deleting every template leaves an empty list; defaults are not re-seeded.
    pub async fn delete(&self, scope: &UserScope, id: Uuid) -> Result<bool, ServiceError> {
        let mut items = self.list(scope).await?;
        let before = items.len();
        items.retain(|t| t.id != id);
        if items.len() == before {
            return Ok(false);
        }
        self.templates.save(scope, &items).await?;
        Ok(true)
    }

    /// Fill a template from an appointment and the studio profile.
    #[instrument(skip(self, scope), fields(user_id = %scope.user_id()))]
    pub async fn render_for_appointment(&self, scope: &UserScope, template_id: Uuid, appointment_id: Uuid) -> Result<RenderedMessage, ServiceError> {
        let t = self.get(scope, template_id).await?.ok_or_else(|| ServiceError::not_found("template"))?;
        let appt = self.appointments.require(scope, appointment_id).await?;
        let studio = self.studio.get(scope).await?;

        let mut vars: HashMap<String, String> = HashMap::new();
        vars.insert("client_name".into(), appt.client_name.clone());
        vars.insert("date".into(), appt.date.format("%d/%m/%Y").to_string());
        vars.insert("time".into(), appt.time.format("%H:%M").to_string());
        vars.insert("duration".into(), format!("{} min", appt.duration_minutes));
        if let Some(price) = appt.price_cents {
            vars.insert("price".into(), format_cents(price, &studio.currency_symbol));
        }
        for (key, value) in [
            ("studio_name", &studio.name),
            ("studio_phone", &studio.phone),
            ("studio_address", &studio.address),
        ] {
            if !value.is_empty() {
                vars.insert(key.into(), value.clone());
            }
        }

        let text = template::render(&t.body, &vars);
        let unresolved = t.placeholders().into_iter().filter(|p| !vars.contains_key(p)).collect();
        Ok(RenderedMessage { template_id: t.id, text, channels: t.channels.iter().copied().collect(), unresolved })
    }
}
