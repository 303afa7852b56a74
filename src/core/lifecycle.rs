//! Explicit «discover once, poll repeatedly» state machine:
//!
//! ```text
//! Unconfigured ──resolved──▶ Resolved ──polled──▶ Polling ◀──polled── ReauthRequired (account)
//!      │                        ▲                    │                          ▲
//!  auth failure              resolved           auth failure                    │
//!      ▼                        │                    └──────────────────────────┘
//! ReauthRequired ───────────────┘
//! ```
//!
//! A missing metering point during resolution is fatal. Transient failures never change the phase.
//! A rejected key keeps the known account, so that recovery re-validates the same metering point
//! instead of discovering it again.

use crate::{
    api::innonet,
    core::{
        account::{Account, ApiKey},
        sample::TariffSample,
    },
};

#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub enum Phase {
    /// The API key is known, but the metering point is not.
    Unconfigured { api_key: ApiKey },

    /// The metering point is resolved, nothing has been published yet.
    Resolved { account: Account },

    Polling {
        account: Account,

        /// Last published sample, `None` when the last cycle published unavailable values.
        last_sample: Option<TariffSample>,
    },

    /// The key got rejected. Every tick retries with the known account, or resolves it again
    /// when there is none.
    ReauthRequired { api_key: ApiKey, account: Option<Account> },
}

impl Phase {
    pub fn new(account_or_key: Result<Account, ApiKey>) -> Self {
        match account_or_key {
            Ok(account) => Self::Resolved { account },
            Err(api_key) => Self::Unconfigured { api_key },
        }
    }

    /// Account to poll with, `None` when it must be resolved first.
    #[must_use]
    pub const fn account(&self) -> Option<&Account> {
        match self {
            Self::Resolved { account }
            | Self::Polling { account, .. }
            | Self::ReauthRequired { account: Some(account), .. } => Some(account),
            Self::Unconfigured { .. } | Self::ReauthRequired { account: None, .. } => None,
        }
    }

    pub const fn api_key(&self) -> &ApiKey {
        match self {
            Self::Unconfigured { api_key } | Self::ReauthRequired { api_key, .. } => api_key,
            Self::Resolved { account } | Self::Polling { account, .. } => &account.api_key,
        }
    }

    #[must_use]
    pub const fn is_reauth_required(&self) -> bool {
        matches!(self, Self::ReauthRequired { .. })
    }

    #[cfg(test)]
    pub const fn last_sample(&self) -> Option<&TariffSample> {
        match self {
            Self::Polling { last_sample, .. } => last_sample.as_ref(),
            _ => None,
        }
    }

    pub fn on_resolved(&mut self, account: Account) {
        *self = Self::Resolved { account };
    }

    /// Apply the resolution failure.
    ///
    /// # Errors
    ///
    /// Returns the error back when it is fatal to the setup.
    pub fn on_resolution_failed(&mut self, error: innonet::Error) -> Result<(), innonet::Error> {
        match error {
            innonet::Error::Authentication => {
                self.require_reauth();
                Ok(())
            }
            innonet::Error::NotFound(_) => Err(error),
            innonet::Error::Transient(_) | innonet::Error::UnexpectedPayload(_) => Ok(()),
        }
    }

    /// Record the published outcome of a successful poll.
    pub fn on_polled(&mut self, sample: Option<TariffSample>) {
        if let Some(account) = self.account() {
            *self = Self::Polling { account: account.clone(), last_sample: sample };
        }
    }

    pub fn on_poll_failed(&mut self, error: &innonet::Error) {
        if matches!(error, innonet::Error::Authentication) {
            self.require_reauth();
        }
    }

    fn require_reauth(&mut self) {
        *self = Self::ReauthRequired {
            api_key: self.api_key().clone(),
            account: self.account().cloned(),
        };
    }
}
