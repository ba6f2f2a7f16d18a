//! Version/Location Registry: idempotent upserts over a freshly loaded record.

use crate::accessor::{RecordAccessor, UpdateOutcome};
use crate::error::RecordError;
use crate::model::{Location, LocationType, Registry};

impl RecordAccessor {
    /// Attach `uri` to `version`, replacing any location with the same
    /// `(type, recipe)`. A missing version is a logged no-op.
    pub fn upsert_location(
        &self,
        id: &str,
        version: &str,
        uri: &str,
        kind: LocationType,
        recipe: Option<&str>,
    ) -> Result<UpdateOutcome, RecordError> {
        self.update(id, |record| {
            let Some(target) = record.version_mut(version) else {
                tracing::info!(
                    id = %id,
                    version = %version,
                    kind = %kind,
                    "version not found; location not written"
                );
                return UpdateOutcome::VersionMissing;
            };

            let replaced = target.upsert_location(Location::new(uri, kind, recipe));
            tracing::debug!(
                id = %id,
                version = %version,
                kind = %kind,
                recipe = ?recipe,
                replaced,
                "upserted location"
            );
            UpdateOutcome::Written
        })
    }

    /// Record that a third-party registry lists this vocabulary, keyed by `url`.
    pub fn upsert_registry(
        &self,
        id: &str,
        title: &str,
        url: &str,
        landing_page: Option<&str>,
    ) -> Result<(), RecordError> {
        self.update(id, |record| {
            record.registries.retain(|r| r.url != url);
            record.registries.push(Registry {
                title: title.to_string(),
                url: url.to_string(),
                landing_page: landing_page.map(str::to_string),
            });
            UpdateOutcome::Written
        })?;
        Ok(())
    }
}
