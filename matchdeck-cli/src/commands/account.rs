use std::path::PathBuf;

use clap::Subcommand;
use matchdeck::{AccountDraft, HttpApi, PhotoRef, UserAccount};

use crate::error::AppError;

#[derive(Clone, Debug, Subcommand)]
pub enum Account {
    #[command(about = "Print the account record")]
    Show,
    #[command(about = "Change name, email or photo")]
    Edit {
        #[clap(long, help = "New full name")]
        fullname: Option<String>,
        #[clap(long, help = "New email address")]
        email: Option<String>,
        #[clap(long, value_parser, help = "Image file to upload as photo")]
        photo: Option<PathBuf>,
    },
}

impl Account {
    pub async fn run(
        &self,
        api: &HttpApi,
        username: &str,
    ) -> Result<(), AppError> {
        let account = api.fetch_account(username).await?;

        match self {
            Account::Show => println!("{}", render_account(&account)),
            Account::Edit {
                fullname,
                email,
                photo,
            } => {
                let mut draft = AccountDraft::new(account);
                if let Some(fullname) = fullname {
                    draft.fullname = fullname.clone();
                }
                if let Some(email) = email {
                    draft.email = email.clone();
                }
                if let Some(path) = photo {
                    let bytes = tokio::fs::read(path).await.map_err(|e| {
                        AppError::PhotoReadError(path.display().to_string(), e)
                    })?;
                    let name = path
                        .file_name()
                        .map(|name| name.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    draft.set_photo_file(name, &bytes);
                }

                if !draft.is_dirty() {
                    println!("Nothing to update");
                    return Ok(());
                }
                api.update_account(draft.username(), &draft.to_update())
                    .await?;
                log::info!("account {} updated", draft.username());
                println!("{}", render_account(&draft.applied()));
            }
        }

        Ok(())
    }
}

fn render_photo(photo: Option<PhotoRef>) -> String {
    match photo {
        Some(PhotoRef::Url(url)) => url.to_string(),
        Some(PhotoRef::InlineBase64 { bytes, mime }) => {
            format!("{} ({} bytes)", mime, bytes.len())
        }
        Some(PhotoRef::DataUri(_)) => "data uri".to_owned(),
        None => "none".to_owned(),
    }
}

pub fn render_account(account: &UserAccount) -> String {
    format!(
        "username: {}\nfullname: {}\nemail:    {}\nphoto:    {}",
        account.username,
        account.fullname,
        account.email,
        render_photo(account.photo()),
    )
}
