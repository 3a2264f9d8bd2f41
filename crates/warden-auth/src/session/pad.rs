//! One-time pad hand-offs.
//!
//! A pad is a short-lived entry naming a user and a redirect location. It is
//! registered in the owner's session set like a token, so it counts against
//! the concurrency cap. Completing a pad clears every login of its owner.

use std::collections::HashMap;

use tracing::info;
use uuid::Uuid;

use warden_cache::keys;
use warden_core::error::AppError;
use warden_core::result::AppResult;
use warden_entity::PadGrant;

use super::validator::{SessionValidator, parse_user_id};

impl SessionValidator {
    /// Issue a pad that hands `user_id` off to `redirect`.
    pub async fn issue_pad(
        &self,
        user_id: Uuid,
        remote: &str,
        redirect: &str,
    ) -> AppResult<PadGrant> {
        let result = self.create_pad(user_id, remote, redirect).await;
        self.observe("issue_pad", result)
    }

    /// Look up where a pad sends its redeemer.
    ///
    /// The pad is left in place.
    pub async fn redeem_pad(&self, pad: &str) -> AppResult<String> {
        let result = self.read_redirect(pad).await;
        self.observe("redeem_pad", result)
    }

    /// Consume a pad and revoke every session of its owner.
    ///
    /// Returns the owner so the caller can finish the hand-off, typically by
    /// resetting the password.
    pub async fn complete_pad(&self, pad: &str) -> AppResult<Uuid> {
        let result = self.finish_pad(pad).await;
        self.observe("complete_pad", result)
    }

    async fn create_pad(
        &self,
        user_id: Uuid,
        remote: &str,
        redirect: &str,
    ) -> AppResult<PadGrant> {
        if redirect.is_empty() {
            return Err(AppError::validation("Pad redirect must not be empty"));
        }
        self.check_count(user_id).await?;

        let pad = self.tokens.token();
        let owner = user_id.to_string();
        let fields = [
            (keys::FIELD_USER_ID, owner.as_str()),
            (keys::FIELD_REMOTE, remote),
            (keys::FIELD_REDIRECT, redirect),
        ];
        let expires_at = self
            .register("issue_pad", user_id, &keys::pad(&pad), &fields, self.config.pad_ttl())
            .await?;

        info!(user_id = %user_id, remote, "One-time pad issued");
        Ok(PadGrant {
            pad,
            user_id,
            redirect: redirect.to_string(),
            expires_at,
        })
    }

    /// Read a pad's fields.
    ///
    /// An absent pad has no fields and reads as a pad without an owner.
    async fn read_pad(
        &self,
        operation: &'static str,
        pad: &str,
    ) -> AppResult<HashMap<String, String>> {
        self.call("get_fields", self.store.get_fields(&keys::pad(pad)))
            .await
            .map_err(|e| AppError::wrap(operation, e))
    }

    /// The owner recorded on a pad.
    fn pad_owner(
        operation: &'static str,
        fields: &mut HashMap<String, String>,
    ) -> AppResult<Uuid> {
        let owner = fields
            .remove(keys::FIELD_USER_ID)
            .ok_or_else(|| AppError::internal(format!("{operation}: pad has no owner")))?;
        if owner.is_empty() {
            return Err(AppError::validation("Pad owner is empty"));
        }
        parse_user_id(operation, &owner)
    }

    async fn read_redirect(&self, pad: &str) -> AppResult<String> {
        let mut fields = self.read_pad("redeem_pad", pad).await?;
        Self::pad_owner("redeem_pad", &mut fields)?;

        let redirect = fields
            .remove(keys::FIELD_REDIRECT)
            .ok_or_else(|| AppError::internal("redeem_pad: pad has no redirect"))?;
        if redirect.is_empty() {
            return Err(AppError::validation("Pad redirect is empty"));
        }
        Ok(redirect)
    }

    async fn finish_pad(&self, pad: &str) -> AppResult<Uuid> {
        let mut fields = self.read_pad("complete_pad", pad).await?;
        let user_id = Self::pad_owner("complete_pad", &mut fields)?;
        self.clear_logins(user_id).await?;

        // The pad may have lagged out of the set; make sure it is gone.
        self.call(
            "delete_fields",
            self.store.delete_fields(&keys::pad(pad), &PAD_FIELDS),
        )
        .await
        .map_err(|e| AppError::wrap("complete_pad", e))?;

        info!(user_id = %user_id, "One-time pad completed");
        Ok(user_id)
    }

    /// Delete every token and pad registered to `user_id`.
    async fn clear_logins(&self, user_id: Uuid) -> AppResult<()> {
        let set = keys::logins(user_id);
        let members = self
            .call("members", self.store.members(&set))
            .await
            .map_err(|e| AppError::wrap("clear_logins", e))?;

        for member in &members {
            self.call("delete_fields", self.store.delete_fields(member, &PAD_FIELDS))
                .await
                .map_err(|e| AppError::wrap("clear_logins", e))?;
        }

        self.call("remove_members", self.store.remove_members(&set, &members))
            .await
            .map_err(|e| AppError::wrap("clear_logins", e))?;

        info!(user_id = %user_id, cleared = members.len(), "Cleared all logins");
        Ok(())
    }
}

/// Every field a token or pad hash can carry.
const PAD_FIELDS: [&str; 3] = [keys::FIELD_USER_ID, keys::FIELD_REMOTE, keys::FIELD_REDIRECT];
