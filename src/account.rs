//! The logged-in user's own record, as read and written by the profile
//! editor. Independent of the deck.

use base64::{engine::general_purpose, Engine};
use serde::{Deserialize, Serialize};

use crate::profile::{PhotoRef, ProfileId};

/// `GET /user/<username>` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: ProfileId,
    pub username: String,
    pub fullname: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub photo_data: Option<String>,
    #[serde(default)]
    pub photo_name: Option<String>,
}

impl UserAccount {
    pub fn photo(&self) -> Option<PhotoRef> {
        PhotoRef::resolve(self.photo_data.as_deref())
    }
}

/// `PUT /user/<username>` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountUpdate {
    pub fullname: String,
    pub email: String,
    pub photo_data: Option<String>,
    pub photo_name: Option<String>,
}

/// Editable copy of an account. The username can't change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountDraft {
    original: UserAccount,
    pub fullname: String,
    pub email: String,
    photo_data: Option<String>,
    photo_name: Option<String>,
}

impl AccountDraft {
    pub fn new(account: UserAccount) -> Self {
        Self {
            fullname: account.fullname.clone(),
            email: account.email.clone(),
            photo_data: account.photo_data.clone(),
            photo_name: account.photo_name.clone(),
            original: account,
        }
    }

    pub fn username(&self) -> &str {
        &self.original.username
    }

    /// Attach a picked image file; stored as bare base64.
    pub fn set_photo_file(&mut self, file_name: impl Into<String>, bytes: &[u8]) {
        self.photo_data = Some(general_purpose::STANDARD.encode(bytes));
        self.photo_name = Some(file_name.into());
    }

    /// Attach an image given as a data URL; only the part after the
    /// first comma is kept.
    pub fn set_photo_data_url(
        &mut self,
        file_name: impl Into<String>,
        data_url: &str,
    ) {
        let payload = match data_url.split_once(',') {
            Some((_, payload)) if !payload.is_empty() => payload,
            _ => data_url,
        };
        self.photo_data = Some(payload.to_owned());
        self.photo_name = Some(file_name.into());
    }

    pub fn photo(&self) -> Option<PhotoRef> {
        PhotoRef::resolve(self.photo_data.as_deref())
    }

    pub fn is_dirty(&self) -> bool {
        self.fullname != self.original.fullname
            || self.email != self.original.email
            || self.photo_data != self.original.photo_data
            || self.photo_name != self.original.photo_name
    }

    /// Drop all edits.
    pub fn reset(&mut self) {
        *self = Self::new(self.original.clone());
    }

    pub fn to_update(&self) -> AccountUpdate {
        AccountUpdate {
            fullname: self.fullname.trim().to_owned(),
            email: self.email.trim().to_owned(),
            photo_data: self.photo_data.clone().filter(|p| !p.is_empty()),
            photo_name: self.photo_name.clone().filter(|n| !n.is_empty()),
        }
    }

    /// The account as it will look once the update is accepted.
    pub fn applied(&self) -> UserAccount {
        let update = self.to_update();
        UserAccount {
            id: self.original.id,
            username: self.original.username.clone(),
            fullname: update.fullname,
            email: update.email,
            photo_data: update.photo_data,
            photo_name: update.photo_name,
        }
    }
}
